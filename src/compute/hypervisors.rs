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

//! Hypervisors and compute services API.

use super::super::Result;
use super::protocol::*;

service_client! {
    /// Hypervisors API (admin only).
    HypervisorsClient
}

service_client! {
    /// Compute services API (admin only).
    ServicesClient
}

impl HypervisorsClient {
    /// List hypervisors, optionally with details.
    pub async fn list_hypervisors(&self, detail: bool) -> Result<Vec<Hypervisor>> {
        let path: &[&str] = if detail {
            &["os-hypervisors", "detail"]
        } else {
            &["os-hypervisors"]
        };
        let root: HypervisorsRoot = self.client.get(path).fetch(&[200]).await?;
        Ok(root.hypervisors)
    }

    /// Get a hypervisor.
    pub async fn show_hypervisor<S: AsRef<str>>(&self, id: S) -> Result<Hypervisor> {
        let root: HypervisorRoot = self
            .client
            .get(&["os-hypervisors", id.as_ref()])
            .fetch(&[200])
            .await?;
        Ok(root.hypervisor)
    }
}

impl ServicesClient {
    /// List compute services, optionally filtered by host and binary.
    pub async fn list_services(
        &self,
        host: Option<&str>,
        binary: Option<&str>,
    ) -> Result<Vec<ComputeService>> {
        let mut request = self.client.get(&["os-services"]);
        if let Some(host) = host {
            request = request.query("host", host);
        }
        if let Some(binary) = binary {
            request = request.query("binary", binary);
        }
        let root: ServicesRoot = request.fetch(&[200]).await?;
        Ok(root.services)
    }
}

#[cfg(test)]
pub mod test {
    use httpmock::MockServer;
    use serde_json::json;

    use super::{HypervisorsClient, ServicesClient};
    use crate::rest_client::COMPUTE;
    use crate::test_utils;

    #[tokio::test]
    async fn test_list_hypervisors() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let _mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/compute/v2.1/os-hypervisors");
                then.status(200).json_body(json!({
                    "hypervisors": [
                        {"id": 1, "hypervisor_hostname": "compute1", "state": "up", "status": "enabled"},
                        {"id": "c48f6247-abe4-4a24-824e-ea39e108874f",
                         "hypervisor_hostname": "compute2", "state": "up", "status": "enabled"}
                    ]
                }));
            })
            .await;

        let client = HypervisorsClient::new(test_utils::rest_client(&server, COMPUTE));
        let hypervisors = client.list_hypervisors(false).await.unwrap();
        assert_eq!(hypervisors[0].id, "1");
        assert_eq!(hypervisors[1].hypervisor_hostname, "compute2");
    }

    #[tokio::test]
    async fn test_list_services() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/compute/v2.1/os-services")
                    .query_param("binary", "nova-compute");
                then.status(200).json_body(json!({
                    "services": [{
                        "id": 1,
                        "binary": "nova-compute",
                        "host": "compute1",
                        "zone": "nova",
                        "status": "enabled",
                        "state": "up",
                        "updated_at": "2012-10-29T13:42:02.000000",
                        "disabled_reason": null
                    }]
                }));
            })
            .await;

        let client = ServicesClient::new(test_utils::rest_client(&server, COMPUTE));
        let services = client
            .list_services(None, Some("nova-compute"))
            .await
            .unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].host, "compute1");
        assert_eq!(services[0].state, "up");
        mock.assert_async().await;
    }
}
