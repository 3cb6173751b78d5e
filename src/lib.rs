// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Integration testing for OpenStack clouds.
//!
//! This crate provides thin REST clients for the Compute (Nova) and Identity
//! (Keystone) APIs together with the machinery needed to write live tests
//! against a running cloud:
//!
//! * [Configuration](config/index.html) loaded from YAML or the environment
//! * [Authentication](auth/index.html) against Identity API v3
//! * Low-level [REST client](rest_client/index.html) with status checking
//! * [Compute](compute/index.html) and [Identity](identity/index.html) clients
//! * [Credential providers](credentials/index.html) creating throw-away
//!   projects and users
//! * A [test context](testing/index.html) with cleanups and skip helpers
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> tempest::Result<()> {
//! let config = tempest::Config::from_env_or_file()?;
//! let mut ctx = tempest::testing::TestContext::new(config, "ServersTest")?;
//! let primary = ctx.primary().await?;
//! let servers = primary.servers.list_servers(false, &Default::default()).await?;
//! println!("{} servers visible", servers.len());
//! ctx.tear_down().await
//! # }
//! ```

#![crate_name = "tempest"]
#![crate_type = "lib"]
// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
#![warn(
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]

#[macro_use]
mod utils;

pub mod auth;
pub mod clients;
pub mod common;
#[cfg(feature = "compute")]
pub mod compute;
pub mod config;
pub mod credentials;
mod error;
pub mod identity;
pub mod rest_client;
pub mod testing;

pub use crate::clients::Manager;
pub use crate::common::{ApiVersion, IdOrName};
pub use crate::config::Config;
pub use crate::error::{check_response, expected_success, Error, ErrorKind, Result};
pub use crate::utils::Query;

#[cfg(test)]
pub(crate) mod test_utils;
