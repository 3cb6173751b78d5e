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

//! Users API.

use log::debug;
use serde_json::json;

use super::super::{Query, Result};
use super::protocol::*;

service_client! {
    /// Users API.
    UsersClient
}

impl UsersClient {
    /// Create a user.
    pub async fn create_user(&self, request: &UserCreate) -> Result<User> {
        debug!("Creating a user with {:?}", request);
        let root: UserRoot = self
            .client
            .post(&["users"])
            .json(&json!({ "user": request }))
            .fetch(&[201])
            .await?;
        debug!("Created user {}", root.user.id);
        Ok(root.user)
    }

    /// Get a user.
    pub async fn show_user<S: AsRef<str>>(&self, id: S) -> Result<User> {
        let root: UserRoot = self
            .client
            .get(&["users", id.as_ref()])
            .fetch(&[200])
            .await?;
        Ok(root.user)
    }

    /// List users.
    pub async fn list_users(&self, filters: &Query) -> Result<Vec<User>> {
        let root: UsersRoot = self
            .client
            .get(&["users"])
            .query_all(filters)
            .fetch(&[200])
            .await?;
        Ok(root.users)
    }

    /// Update a user.
    pub async fn update_user<S: AsRef<str>>(&self, id: S, update: &UserUpdate) -> Result<User> {
        debug!("Updating user {} with {:?}", id.as_ref(), update);
        let root: UserRoot = self
            .client
            .patch(&["users", id.as_ref()])
            .json(&json!({ "user": update }))
            .fetch(&[200])
            .await?;
        Ok(root.user)
    }

    /// Delete a user.
    pub async fn delete_user<S: AsRef<str>>(&self, id: S) -> Result<()> {
        debug!("Deleting user {}", id.as_ref());
        let _ = self
            .client
            .delete(&["users", id.as_ref()])
            .send(&[204])
            .await?;
        Ok(())
    }

    /// Change the password of a user.
    ///
    /// Existing tokens of the user are revoked by the server.
    pub async fn update_user_password<S1, S2, S3>(
        &self,
        id: S1,
        original_password: S2,
        password: S3,
    ) -> Result<()>
    where
        S1: AsRef<str>,
        S2: Into<String>,
        S3: Into<String>,
    {
        debug!("Changing password of user {}", id.as_ref());
        let body = PasswordChangeRoot {
            user: PasswordChange {
                original_password: original_password.into(),
                password: password.into(),
            },
        };
        let _ = self
            .client
            .post(&["users", id.as_ref(), "password"])
            .json(&body)
            .send(&[204])
            .await?;
        Ok(())
    }

    /// List projects the user has a role on.
    pub async fn list_user_projects<S: AsRef<str>>(&self, id: S) -> Result<Vec<Project>> {
        let root: ProjectsRoot = self
            .client
            .get(&["users", id.as_ref(), "projects"])
            .fetch(&[200])
            .await?;
        Ok(root.projects)
    }
}

#[cfg(test)]
pub mod test {
    use httpmock::MockServer;
    use serde_json::json;

    use super::UsersClient;
    use crate::identity::UserCreate;
    use crate::rest_client::IDENTITY;
    use crate::{test_utils, ErrorKind};

    fn client(server: &MockServer) -> UsersClient {
        UsersClient::new(test_utils::rest_client(server, IDENTITY))
    }

    #[tokio::test]
    async fn test_create_user() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/identity/v3/users").json_body(json!({
                    "user": {
                        "name": "u1",
                        "password": "secret",
                        "default_project_id": "p1",
                        "email": "u1@example.com",
                        "enabled": true
                    }
                }));
                then.status(201).json_body(json!({
                    "user": {
                        "id": "u1id", "name": "u1", "domain_id": "default",
                        "default_project_id": "p1", "email": "u1@example.com",
                        "enabled": true, "password_expires_at": null
                    }
                }));
            })
            .await;
        let user = client(&server)
            .create_user(
                &UserCreate::new("u1", "secret")
                    .with_default_project_id("p1")
                    .with_email("u1@example.com")
                    .with_enabled(true),
            )
            .await
            .unwrap();
        assert_eq!(user.id, "u1id");
        assert_eq!(user.email.as_deref(), Some("u1@example.com"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_user_password() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/identity/v3/users/u1id/password")
                    .json_body(json!({
                        "user": {"original_password": "old", "password": "new"}
                    }));
                then.status(204);
            })
            .await;
        client(&server)
            .update_user_password("u1id", "old", "new")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_user_password_wrong_original() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let _ = server
            .mock_async(|when, then| {
                when.method("POST").path("/identity/v3/users/u1id/password");
                then.status(401).json_body(json!({
                    "error": {"code": 401, "message": "The request you have made requires authentication.",
                              "title": "Unauthorized"}
                }));
            })
            .await;
        let err = client(&server)
            .update_user_password("u1id", "wrong", "new")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_list_user_projects() {
        let server = MockServer::start_async().await;
        let _ = test_utils::mock_keystone(&server).await;
        let _ = server
            .mock_async(|when, then| {
                when.method("GET").path("/identity/v3/users/u1id/projects");
                then.status(200).json_body(json!({
                    "projects": [
                        {"id": "p1", "name": "one", "domain_id": "default"},
                        {"id": "p2", "name": "two", "domain_id": "default"}
                    ]
                }));
            })
            .await;
        let projects = client(&server).list_user_projects("u1id").await.unwrap();
        let ids: Vec<_> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }
}
