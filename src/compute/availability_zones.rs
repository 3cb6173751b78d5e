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

//! Availability zones API.

use super::super::Result;
use super::protocol::*;

service_client! {
    /// Availability zones API.
    AvailabilityZoneClient
}

impl AvailabilityZoneClient {
    /// List availability zones.
    ///
    /// The detailed listing includes hosts and services and requires admin.
    pub async fn list_availability_zones(&self, detail: bool) -> Result<Vec<AvailabilityZone>> {
        let path: &[&str] = if detail {
            &["os-availability-zone", "detail"]
        } else {
            &["os-availability-zone"]
        };
        let root: AvailabilityZonesRoot = self.client.get(path).fetch(&[200]).await?;
        Ok(root.availability_zone_info)
    }
}
