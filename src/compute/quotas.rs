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

//! Quotas and quota classes API.

use log::debug;
use serde_json::json;

use super::super::rest_client::RestRequest;
use super::super::Result;
use super::protocol::*;

service_client! {
    /// Quota sets API.
    QuotasClient
}

service_client! {
    /// Quota classes API.
    QuotaClassesClient
}

fn with_user<'c>(request: RestRequest<'c>, user_id: Option<&str>) -> RestRequest<'c> {
    match user_id {
        Some(user_id) => request.query("user_id", user_id),
        None => request,
    }
}

impl QuotasClient {
    /// Quotas of a project, or of a user within it.
    pub async fn show_quota_set<S: AsRef<str>>(
        &self,
        project_id: S,
        user_id: Option<&str>,
    ) -> Result<QuotaSet> {
        let request = self.client.get(&["os-quota-sets", project_id.as_ref()]);
        let root: QuotaSetRoot = with_user(request, user_id).fetch(&[200]).await?;
        Ok(root.quota_set)
    }

    /// Default quotas.
    pub async fn show_default_quota_set<S: AsRef<str>>(&self, project_id: S) -> Result<QuotaSet> {
        let root: QuotaSetRoot = self
            .client
            .get(&["os-quota-sets", project_id.as_ref(), "defaults"])
            .fetch(&[200])
            .await?;
        Ok(root.quota_set)
    }

    /// Update quotas of a project, or of a user within it.
    pub async fn update_quota_set<S: AsRef<str>>(
        &self,
        project_id: S,
        user_id: Option<&str>,
        update: &QuotaSetUpdate,
    ) -> Result<QuotaSet> {
        debug!(
            "Updating quotas of project {} (user {:?}) with {:?}",
            project_id.as_ref(),
            user_id,
            update
        );
        let request = self
            .client
            .put(&["os-quota-sets", project_id.as_ref()])
            .json(&QuotaSetUpdateRoot { quota_set: update });
        let root: QuotaSetRoot = with_user(request, user_id).fetch(&[200]).await?;
        Ok(root.quota_set)
    }

    /// Reset quotas of a project (or a user) to the defaults.
    pub async fn delete_quota_set<S: AsRef<str>>(
        &self,
        project_id: S,
        user_id: Option<&str>,
    ) -> Result<()> {
        debug!("Resetting quotas of project {} (user {:?})", project_id.as_ref(), user_id);
        let request = self.client.delete(&["os-quota-sets", project_id.as_ref()]);
        let _ = with_user(request, user_id).send(&[202]).await?;
        Ok(())
    }
}

impl QuotaClassesClient {
    /// Quotas of a quota class (only `default` is used by Nova).
    pub async fn show_quota_class_set<S: AsRef<str>>(&self, class: S) -> Result<QuotaSet> {
        let root: QuotaClassSetRoot = self
            .client
            .get(&["os-quota-class-sets", class.as_ref()])
            .fetch(&[200])
            .await?;
        Ok(root.quota_class_set)
    }

    /// Update quotas of a quota class.
    pub async fn update_quota_class_set<S: AsRef<str>>(
        &self,
        class: S,
        update: &QuotaSet,
    ) -> Result<QuotaSet> {
        debug!("Updating quota class {} with {:?}", class.as_ref(), update);
        let root: QuotaClassSetRoot = self
            .client
            .put(&["os-quota-class-sets", class.as_ref()])
            .json(&json!({ "quota_class_set": update }))
            .fetch(&[200])
            .await?;
        Ok(root.quota_class_set)
    }
}

#[cfg(test)]
pub mod test {
    use httpmock::MockServer;
    use serde_json::json;

    use super::{QuotaClassesClient, QuotasClient};
    use crate::compute::{QuotaSet, QuotaSetUpdate};
    use crate::rest_client::COMPUTE;
    use crate::test_utils;

    #[tokio::test]
    async fn test_quota_sets() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let show = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/compute/v2.1/os-quota-sets/p1")
                    .query_param("user_id", "u1");
                then.status(200).json_body(json!({
                    "quota_set": {"id": "p1", "cores": 20, "instances": 10, "ram": 51200}
                }));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method("PUT")
                    .path("/compute/v2.1/os-quota-sets/p1")
                    .json_body(json!({"quota_set": {"instances": 5}}));
                then.status(200).json_body(json!({
                    "quota_set": {"cores": 20, "instances": 5, "ram": 51200}
                }));
            })
            .await;
        let reset = server
            .mock_async(|when, then| {
                when.method("DELETE").path("/compute/v2.1/os-quota-sets/p1");
                then.status(202);
            })
            .await;

        let client = QuotasClient::new(test_utils::rest_client(&server, COMPUTE));
        let quotas = client.show_quota_set("p1", Some("u1")).await.unwrap();
        assert_eq!(quotas.instances, Some(10));
        assert_eq!(quotas.id.as_deref(), Some("p1"));

        let request = QuotaSetUpdate {
            quotas: QuotaSet {
                instances: Some(5),
                ..QuotaSet::default()
            },
            force: None,
        };
        let quotas = client.update_quota_set("p1", None, &request).await.unwrap();
        assert_eq!(quotas.instances, Some(5));
        client.delete_quota_set("p1", None).await.unwrap();

        show.assert_async().await;
        update.assert_async().await;
        reset.assert_async().await;
    }

    #[tokio::test]
    async fn test_quota_classes() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let _mock = server
            .mock_async(|when, then| {
                when.method("PUT")
                    .path("/compute/v2.1/os-quota-class-sets/default")
                    .json_body(json!({"quota_class_set": {"cores": 40}}));
                then.status(200)
                    .json_body(json!({"quota_class_set": {"cores": 40, "instances": 10}}));
            })
            .await;

        let client = QuotaClassesClient::new(test_utils::rest_client(&server, COMPUTE));
        let update = QuotaSet {
            cores: Some(40),
            ..QuotaSet::default()
        };
        let result = client
            .update_quota_class_set("default", &update)
            .await
            .unwrap();
        assert_eq!(result.cores, Some(40));
    }
}
