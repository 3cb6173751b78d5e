// Copyright 2018 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Compute API (v2.1) clients.
//!
//! Every client wraps a [RestClient](../rest_client/struct.RestClient.html)
//! for the `compute` service and maps one API area to async methods returning
//! typed responses. Unexpected status codes become errors of the
//! corresponding [ErrorKind](../enum.ErrorKind.html).
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example(client: tempest::rest_client::RestClient) -> tempest::Result<()> {
//! use std::time::Duration;
//!
//! use tempest::compute::{wait_for_server_status, ServerCreate, ServerStatus, ServersClient};
//!
//! let servers = ServersClient::new(client);
//! let request = ServerCreate::new("test-vm", "1").with_image("cirros");
//! let created = servers.create_server(&request).await?;
//! let server = wait_for_server_status(
//!     &servers,
//!     created.id,
//!     ServerStatus::Active,
//!     true,
//!     Duration::from_secs(1),
//!     Duration::from_secs(300),
//! )
//! .await?;
//! println!("{} is {}", server.name, server.status);
//! # Ok(())
//! # }
//! ```

mod aggregates;
mod availability_zones;
mod flavors;
mod hypervisors;
mod keypairs;
mod limits;
mod protocol;
mod quotas;
mod security_groups;
mod servers;
mod waiters;

pub use self::aggregates::AggregatesClient;
pub use self::availability_zones::AvailabilityZoneClient;
pub use self::flavors::FlavorsClient;
pub use self::hypervisors::{HypervisorsClient, ServicesClient};
pub use self::keypairs::KeyPairsClient;
pub use self::limits::LimitsClient;
pub use self::protocol::*;
pub use self::quotas::{QuotaClassesClient, QuotasClient};
pub use self::security_groups::{
    SecurityGroupsClient, MAX_MICROVERSION as SECURITY_GROUPS_MAX_MICROVERSION,
};
pub use self::servers::ServersClient;
pub use self::waiters::{
    wait_for_server_status, wait_for_server_termination, ServerStatusWaiter,
    ServerTerminationWaiter,
};
