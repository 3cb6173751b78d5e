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

//! Mock cloud for unit tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use httpmock::{Mock, MockServer};
use serde_json::{json, Value};

use crate::auth::{endpoint_filters, AuthProvider, Credentials, InterfaceType};
use crate::rest_client::{RestClient, Service};

pub const TOKEN: &str = "gAAAAABtesttoken";
pub const USER_ID: &str = "423f19a4ac1e4f48bbb4180756e6eb6c";
pub const PROJECT_ID: &str = "a6944d763bf64ee6a275f1263fae0352";

pub fn credentials() -> Credentials {
    Credentials::new("admin", "pa$$w0rd", "Default").with_project("admin", "Default")
}

pub fn token_body(server: &MockServer) -> Value {
    let expires_at = (Utc::now() + Duration::hours(1)).to_rfc3339();
    json!({
        "token": {
            "methods": ["password"],
            "expires_at": expires_at,
            "user": {
                "id": USER_ID,
                "name": "admin",
                "domain": {"id": "default", "name": "Default"}
            },
            "project": {
                "id": PROJECT_ID,
                "name": "admin",
                "domain": {"id": "default", "name": "Default"}
            },
            "roles": [
                {"id": "r1", "name": "admin"},
                {"id": "r2", "name": "member"}
            ],
            "catalog": [
                {
                    "type": "identity",
                    "name": "keystone",
                    "endpoints": [{
                        "interface": "public",
                        "region": "RegionOne",
                        "url": server.url("/identity")
                    }]
                },
                {
                    "type": "compute",
                    "name": "nova",
                    "endpoints": [{
                        "interface": "public",
                        "region": "RegionOne",
                        "url": server.url("/compute/v2.1")
                    }]
                }
            ]
        }
    })
}

/// Keystone token endpoint returning a catalog pointing back at the server.
pub async fn mock_keystone(server: &MockServer) -> Mock<'_> {
    let body = token_body(server);
    server
        .mock_async(|when, then| {
            when.method("POST").path("/identity/v3/auth/tokens");
            then.status(201)
                .header("content-type", "application/json")
                .header("x-subject-token", TOKEN)
                .json_body(body);
        })
        .await
}

pub fn auth_provider(server: &MockServer) -> Arc<AuthProvider> {
    Arc::new(AuthProvider::new(server.url("/identity"), credentials()).unwrap())
}

pub fn rest_client(server: &MockServer, service: Service) -> RestClient {
    RestClient::new(
        auth_provider(server),
        service,
        endpoint_filters(InterfaceType::Public, None),
    )
}
