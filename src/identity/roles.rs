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

//! Roles and role assignments API.

use log::debug;
use serde_json::json;

use super::super::{Query, Result};
use super::protocol::*;

service_client! {
    /// Roles and role assignments API.
    RolesClient
}

impl RolesClient {
    /// Create a role.
    pub async fn create_role(&self, request: &RoleCreate) -> Result<Role> {
        debug!("Creating a role with {:?}", request);
        let root: RoleRoot = self
            .client
            .post(&["roles"])
            .json(&json!({ "role": request }))
            .fetch(&[201])
            .await?;
        Ok(root.role)
    }

    /// Get a role.
    pub async fn show_role<S: AsRef<str>>(&self, id: S) -> Result<Role> {
        let root: RoleRoot = self
            .client
            .get(&["roles", id.as_ref()])
            .fetch(&[200])
            .await?;
        Ok(root.role)
    }

    /// List roles.
    pub async fn list_roles(&self, filters: &Query) -> Result<Vec<Role>> {
        let root: RolesRoot = self
            .client
            .get(&["roles"])
            .query_all(filters)
            .fetch(&[200])
            .await?;
        Ok(root.roles)
    }

    /// Update a role.
    pub async fn update_role<S: AsRef<str>>(&self, id: S, update: &RoleUpdate) -> Result<Role> {
        let root: RoleRoot = self
            .client
            .patch(&["roles", id.as_ref()])
            .json(&json!({ "role": update }))
            .fetch(&[200])
            .await?;
        Ok(root.role)
    }

    /// Delete a role.
    pub async fn delete_role<S: AsRef<str>>(&self, id: S) -> Result<()> {
        debug!("Deleting role {}", id.as_ref());
        let _ = self
            .client
            .delete(&["roles", id.as_ref()])
            .send(&[204])
            .await?;
        Ok(())
    }

    /// Grant a role to a user on a project.
    pub async fn assign_user_role_on_project<S1, S2, S3>(
        &self,
        project_id: S1,
        user_id: S2,
        role_id: S3,
    ) -> Result<()>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: AsRef<str>,
    {
        debug!(
            "Granting role {} to user {} on project {}",
            role_id.as_ref(),
            user_id.as_ref(),
            project_id.as_ref()
        );
        let _ = self
            .client
            .put(&[
                "projects",
                project_id.as_ref(),
                "users",
                user_id.as_ref(),
                "roles",
                role_id.as_ref(),
            ])
            .send(&[204])
            .await?;
        Ok(())
    }

    /// List roles of a user on a project.
    pub async fn list_user_roles_on_project<S1, S2>(
        &self,
        project_id: S1,
        user_id: S2,
    ) -> Result<Vec<Role>>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let root: RolesRoot = self
            .client
            .get(&[
                "projects",
                project_id.as_ref(),
                "users",
                user_id.as_ref(),
                "roles",
            ])
            .fetch(&[200])
            .await?;
        Ok(root.roles)
    }

    /// Check that a user has a role on a project.
    ///
    /// Fails with `NotFound` when the role is not assigned.
    pub async fn check_user_role_existence_on_project<S1, S2, S3>(
        &self,
        project_id: S1,
        user_id: S2,
        role_id: S3,
    ) -> Result<()>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: AsRef<str>,
    {
        let _ = self
            .client
            .head(&[
                "projects",
                project_id.as_ref(),
                "users",
                user_id.as_ref(),
                "roles",
                role_id.as_ref(),
            ])
            .send(&[204])
            .await?;
        Ok(())
    }

    /// Revoke a role from a user on a project.
    pub async fn delete_role_from_user_on_project<S1, S2, S3>(
        &self,
        project_id: S1,
        user_id: S2,
        role_id: S3,
    ) -> Result<()>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: AsRef<str>,
    {
        debug!(
            "Revoking role {} from user {} on project {}",
            role_id.as_ref(),
            user_id.as_ref(),
            project_id.as_ref()
        );
        let _ = self
            .client
            .delete(&[
                "projects",
                project_id.as_ref(),
                "users",
                user_id.as_ref(),
                "roles",
                role_id.as_ref(),
            ])
            .send(&[204])
            .await?;
        Ok(())
    }

    /// Grant a role to a user on a domain.
    pub async fn assign_user_role_on_domain<S1, S2, S3>(
        &self,
        domain_id: S1,
        user_id: S2,
        role_id: S3,
    ) -> Result<()>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: AsRef<str>,
    {
        debug!(
            "Granting role {} to user {} on domain {}",
            role_id.as_ref(),
            user_id.as_ref(),
            domain_id.as_ref()
        );
        let _ = self
            .client
            .put(&[
                "domains",
                domain_id.as_ref(),
                "users",
                user_id.as_ref(),
                "roles",
                role_id.as_ref(),
            ])
            .send(&[204])
            .await?;
        Ok(())
    }

    /// List role assignments, e.g. filtered by `user.id` or `scope.project.id`.
    pub async fn list_role_assignments(&self, filters: &Query) -> Result<Vec<RoleAssignment>> {
        let root: RoleAssignmentsRoot = self
            .client
            .get(&["role_assignments"])
            .query_all(filters)
            .fetch(&[200])
            .await?;
        Ok(root.role_assignments)
    }
}

#[cfg(test)]
pub mod test {
    use httpmock::MockServer;
    use serde_json::json;

    use super::RolesClient;
    use crate::identity::RoleCreate;
    use crate::rest_client::IDENTITY;
    use crate::{test_utils, ErrorKind, Query};

    fn client(server: &MockServer) -> RolesClient {
        RolesClient::new(test_utils::rest_client(server, IDENTITY))
    }

    #[tokio::test]
    async fn test_create_role() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let _ = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/identity/v3/roles")
                    .json_body(json!({"role": {"name": "reader-test"}}));
                then.status(201).json_body(json!({
                    "role": {"id": "r9", "name": "reader-test", "domain_id": null}
                }));
            })
            .await;
        let role = client(&server)
            .create_role(&RoleCreate::new("reader-test"))
            .await
            .unwrap();
        assert_eq!(role.id, "r9");
        assert!(role.domain_id.is_none());
    }

    #[tokio::test]
    async fn test_project_assignment() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let path = "/identity/v3/projects/p1/users/u1/roles/r1";
        let assign = server
            .mock_async(|when, then| {
                when.method("PUT").path(path);
                then.status(204);
            })
            .await;
        let check = server
            .mock_async(|when, then| {
                when.method("HEAD").path(path);
                then.status(204);
            })
            .await;
        let list = server
            .mock_async(|when, then| {
                when.method("GET").path("/identity/v3/projects/p1/users/u1/roles");
                then.status(200).json_body(json!({
                    "roles": [{"id": "r1", "name": "member"}]
                }));
            })
            .await;
        let revoke = server
            .mock_async(|when, then| {
                when.method("DELETE").path(path);
                then.status(204);
            })
            .await;

        let client = client(&server);
        client
            .assign_user_role_on_project("p1", "u1", "r1")
            .await
            .unwrap();
        client
            .check_user_role_existence_on_project("p1", "u1", "r1")
            .await
            .unwrap();
        let roles = client.list_user_roles_on_project("p1", "u1").await.unwrap();
        assert_eq!(roles[0].name, "member");
        client
            .delete_role_from_user_on_project("p1", "u1", "r1")
            .await
            .unwrap();

        assign.assert_async().await;
        check.assert_async().await;
        list.assert_async().await;
        revoke.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_missing_assignment() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let _ = server
            .mock_async(|when, then| {
                when.method("HEAD")
                    .path("/identity/v3/projects/p1/users/u1/roles/r2");
                then.status(404);
            })
            .await;
        let err = client(&server)
            .check_user_role_existence_on_project("p1", "u1", "r2")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_role_assignments() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/identity/v3/role_assignments")
                    .query_param("user.id", "u1");
                then.status(200).json_body(json!({
                    "role_assignments": [
                        {"role": {"id": "r1"}, "user": {"id": "u1"},
                         "scope": {"project": {"id": "p1"}}}
                    ]
                }));
            })
            .await;
        let assignments = client(&server)
            .list_role_assignments(&Query::new().with("user.id", "u1"))
            .await
            .unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].role.id, "r1");
        mock.assert_async().await;
    }
}
