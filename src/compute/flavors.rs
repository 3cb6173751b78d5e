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

//! Flavors API.

use std::collections::HashMap;

use log::{debug, trace};
use serde_json::json;

use super::super::{Error, ErrorKind, Query, Result};
use super::protocol::*;

service_client! {
    /// Flavors API: flavors, their extra specs and access lists.
    FlavorsClient
}

impl FlavorsClient {
    /// List flavors, optionally with details.
    pub async fn list_flavors(&self, detail: bool, filters: &Query) -> Result<Vec<Flavor>> {
        trace!("Listing flavors with {:?}", filters);
        let path: &[&str] = if detail {
            &["flavors", "detail"]
        } else {
            &["flavors"]
        };
        let root: FlavorsRoot = self
            .client
            .get(path)
            .query_all(filters)
            .fetch(&[200])
            .await?;
        trace!("Received flavors: {:?}", root.flavors);
        Ok(root.flavors)
    }

    /// Get a flavor.
    pub async fn show_flavor<S: AsRef<str>>(&self, id: S) -> Result<Flavor> {
        trace!("Fetching flavor {}", id.as_ref());
        let root: FlavorRoot = self
            .client
            .get(&["flavors", id.as_ref()])
            .fetch(&[200])
            .await?;
        Ok(root.flavor)
    }

    /// Create a flavor.
    pub async fn create_flavor(&self, request: &FlavorCreate) -> Result<Flavor> {
        debug!("Creating a flavor with {:?}", request);
        let root: FlavorRoot = self
            .client
            .post(&["flavors"])
            .json(&FlavorCreateRoot { flavor: request })
            .fetch(&[200])
            .await?;
        debug!("Created flavor {}", root.flavor.id);
        Ok(root.flavor)
    }

    /// Delete a flavor.
    pub async fn delete_flavor<S: AsRef<str>>(&self, id: S) -> Result<()> {
        debug!("Deleting flavor {}", id.as_ref());
        let _ = self
            .client
            .delete(&["flavors", id.as_ref()])
            .send(&[202])
            .await?;
        Ok(())
    }

    /// Set extra specs, keeping the other specs.
    pub async fn set_flavor_extra_spec<S: AsRef<str>>(
        &self,
        id: S,
        specs: HashMap<String, String>,
    ) -> Result<HashMap<String, String>> {
        let root: ExtraSpecsRoot = self
            .client
            .post(&["flavors", id.as_ref(), "os-extra_specs"])
            .json(&ExtraSpecsRoot { extra_specs: specs })
            .fetch(&[200])
            .await?;
        Ok(root.extra_specs)
    }

    /// List extra specs.
    pub async fn list_flavor_extra_specs<S: AsRef<str>>(
        &self,
        id: S,
    ) -> Result<HashMap<String, String>> {
        let root: ExtraSpecsRoot = self
            .client
            .get(&["flavors", id.as_ref(), "os-extra_specs"])
            .fetch(&[200])
            .await?;
        Ok(root.extra_specs)
    }

    /// Get one extra spec.
    pub async fn show_flavor_extra_spec<S1, S2>(&self, id: S1, key: S2) -> Result<String>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let mut spec: HashMap<String, String> = self
            .client
            .get(&["flavors", id.as_ref(), "os-extra_specs", key.as_ref()])
            .fetch(&[200])
            .await?;
        take_spec(&mut spec, key.as_ref())
    }

    /// Update one extra spec.
    pub async fn update_flavor_extra_spec<S1, S2, S3>(
        &self,
        id: S1,
        key: S2,
        value: S3,
    ) -> Result<String>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: AsRef<str>,
    {
        let mut body = HashMap::new();
        let _ = body.insert(key.as_ref(), value.as_ref());
        let mut spec: HashMap<String, String> = self
            .client
            .put(&["flavors", id.as_ref(), "os-extra_specs", key.as_ref()])
            .json(&body)
            .fetch(&[200])
            .await?;
        take_spec(&mut spec, key.as_ref())
    }

    /// Remove one extra spec.
    pub async fn unset_flavor_extra_spec<S1, S2>(&self, id: S1, key: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let _ = self
            .client
            .delete(&["flavors", id.as_ref(), "os-extra_specs", key.as_ref()])
            .send(&[200])
            .await?;
        Ok(())
    }

    /// List projects having access to a private flavor.
    pub async fn list_flavor_access<S: AsRef<str>>(&self, id: S) -> Result<Vec<FlavorAccess>> {
        let root: FlavorAccessRoot = self
            .client
            .get(&["flavors", id.as_ref(), "os-flavor-access"])
            .fetch(&[200])
            .await?;
        Ok(root.flavor_access)
    }

    /// Grant a project access to a private flavor.
    pub async fn add_flavor_access<S1, S2>(&self, id: S1, project_id: S2) -> Result<Vec<FlavorAccess>>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        debug!("Granting project {} access to flavor {}", project_id.as_ref(), id.as_ref());
        let root: FlavorAccessRoot = self
            .client
            .post(&["flavors", id.as_ref(), "action"])
            .json(&json!({"addTenantAccess": {"tenant": project_id.as_ref()}}))
            .fetch(&[200])
            .await?;
        Ok(root.flavor_access)
    }

    /// Revoke access of a project to a private flavor.
    pub async fn remove_flavor_access<S1, S2>(
        &self,
        id: S1,
        project_id: S2,
    ) -> Result<Vec<FlavorAccess>>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        debug!("Revoking access of project {} to flavor {}", project_id.as_ref(), id.as_ref());
        let root: FlavorAccessRoot = self
            .client
            .post(&["flavors", id.as_ref(), "action"])
            .json(&json!({"removeTenantAccess": {"tenant": project_id.as_ref()}}))
            .fetch(&[200])
            .await?;
        Ok(root.flavor_access)
    }
}

fn take_spec(spec: &mut HashMap<String, String>, key: &str) -> Result<String> {
    spec.remove(key).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidResponse,
            format!("Extra spec {} is missing in the response", key),
        )
    })
}

#[cfg(test)]
pub mod test {
    use std::collections::HashMap;

    use httpmock::MockServer;
    use serde_json::json;

    use super::FlavorsClient;
    use crate::compute::FlavorCreate;
    use crate::rest_client::COMPUTE;
    use crate::{test_utils, ErrorKind, Query};

    async fn flavors_client(server: &MockServer) -> FlavorsClient {
        let _ = test_utils::mock_keystone(server).await;
        FlavorsClient::new(test_utils::rest_client(server, COMPUTE))
    }

    #[tokio::test]
    async fn test_create_flavor() {
        let server = MockServer::start_async().await;
        let client = flavors_client(&server).await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/compute/v2.1/flavors").json_body(json!({
                    "flavor": {
                        "name": "test-flavor",
                        "ram": 512,
                        "vcpus": 1,
                        "disk": 10,
                        "id": "f1",
                        "os-flavor-access:is_public": false
                    }
                }));
                then.status(200).json_body(json!({
                    "flavor": {
                        "id": "f1",
                        "name": "test-flavor",
                        "ram": 512,
                        "vcpus": 1,
                        "disk": 10,
                        "swap": "",
                        "OS-FLV-EXT-DATA:ephemeral": 0,
                        "os-flavor-access:is_public": false,
                        "rxtx_factor": 1.0
                    }
                }));
            })
            .await;

        let request = FlavorCreate::new("test-flavor", 512, 1, 10)
            .with_id("f1")
            .with_public(false);
        let flavor = client.create_flavor(&request).await.unwrap();
        assert_eq!(flavor.id, "f1");
        assert_eq!(flavor.swap, 0);
        assert!(!flavor.is_public);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_flavors() {
        let server = MockServer::start_async().await;
        let client = flavors_client(&server).await;
        let _mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/compute/v2.1/flavors/detail")
                    .query_param("minRam", "1024");
                then.status(200).json_body(json!({
                    "flavors": [
                        {"id": "2", "name": "m1.small", "ram": 2048, "vcpus": 1, "disk": 20},
                        {"id": "3", "name": "m1.medium", "ram": 4096, "vcpus": 2, "disk": 40}
                    ]
                }));
            })
            .await;

        let flavors = client
            .list_flavors(true, &Query::new().with("minRam", 1024))
            .await
            .unwrap();
        assert_eq!(flavors.len(), 2);
        assert!(flavors.iter().all(|f| f.ram >= 1024));
        assert!(flavors[0].is_public);
    }

    #[tokio::test]
    async fn test_extra_specs() {
        let server = MockServer::start_async().await;
        let client = flavors_client(&server).await;
        let _set = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/compute/v2.1/flavors/f1/os-extra_specs")
                    .json_body(json!({"extra_specs": {"hw:numa_nodes": "1"}}));
                then.status(200)
                    .json_body(json!({"extra_specs": {"hw:numa_nodes": "1"}}));
            })
            .await;
        let _update = server
            .mock_async(|when, then| {
                when.method("PUT")
                    .path("/compute/v2.1/flavors/f1/os-extra_specs/hw:numa_nodes")
                    .json_body(json!({"hw:numa_nodes": "2"}));
                then.status(200).json_body(json!({"hw:numa_nodes": "2"}));
            })
            .await;
        let _missing = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/compute/v2.1/flavors/f1/os-extra_specs/missing");
                then.status(404).json_body(json!({
                    "itemNotFound": {"code": 404, "message": "Flavor f1 has no extra specs with key missing."}
                }));
            })
            .await;

        let mut specs = HashMap::new();
        let _ = specs.insert("hw:numa_nodes".to_string(), "1".to_string());
        let result = client.set_flavor_extra_spec("f1", specs).await.unwrap();
        assert_eq!(result["hw:numa_nodes"], "1");
        assert_eq!(
            client
                .update_flavor_extra_spec("f1", "hw:numa_nodes", "2")
                .await
                .unwrap(),
            "2"
        );
        let err = client
            .show_flavor_extra_spec("f1", "missing")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_flavor_access() {
        let server = MockServer::start_async().await;
        let client = flavors_client(&server).await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/compute/v2.1/flavors/f1/action")
                    .json_body(json!({"addTenantAccess": {"tenant": "p1"}}));
                then.status(200).json_body(json!({
                    "flavor_access": [{"flavor_id": "f1", "tenant_id": "p1"}]
                }));
            })
            .await;

        let access = client.add_flavor_access("f1", "p1").await.unwrap();
        assert_eq!(access.len(), 1);
        assert_eq!(access[0].tenant_id, "p1");
        mock.assert_async().await;
    }
}
