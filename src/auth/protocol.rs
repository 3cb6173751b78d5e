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

//! JSON structures and protocol bits for the Identity V3 token API.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{Credentials, Scope};
use crate::IdOrName;

const PASSWORD_METHOD: &str = "password";

#[derive(Clone, Debug, Serialize)]
pub struct UserAndPassword {
    #[serde(flatten)]
    pub user: IdOrName,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<IdOrName>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PasswordAuth {
    pub user: UserAndPassword,
}

#[derive(Clone, Debug, Serialize)]
pub struct Identity {
    pub methods: Vec<&'static str>,
    pub password: PasswordAuth,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProjectScope {
    #[serde(flatten)]
    pub project: IdOrName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<IdOrName>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SystemScope {
    pub all: bool,
}

#[derive(Clone, Debug, Serialize)]
pub enum AuthScope {
    #[serde(rename = "project")]
    Project(ProjectScope),
    #[serde(rename = "domain")]
    Domain(IdOrName),
    #[serde(rename = "system")]
    System(SystemScope),
}

#[derive(Clone, Debug, Serialize)]
pub struct Auth {
    pub identity: Identity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<AuthScope>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AuthRoot {
    pub auth: Auth,
}

impl AuthRoot {
    /// Build a password authentication request from credentials.
    pub fn from_credentials(credentials: &Credentials) -> Option<AuthRoot> {
        let user = credentials.user()?;
        let password = credentials.password.clone()?;
        let domain = match user {
            IdOrName::Id(..) => None,
            IdOrName::Name(..) => credentials.user_domain(),
        };

        let scope = match credentials.scope() {
            Scope::Project { project, domain } => {
                Some(AuthScope::Project(ProjectScope { project, domain }))
            }
            Scope::Domain(domain) => Some(AuthScope::Domain(domain)),
            Scope::System => Some(AuthScope::System(SystemScope { all: true })),
            Scope::Unscoped => None,
        };

        Some(AuthRoot {
            auth: Auth {
                identity: Identity {
                    methods: vec![PASSWORD_METHOD],
                    password: PasswordAuth {
                        user: UserAndPassword {
                            user,
                            password,
                            domain,
                        },
                    },
                },
                scope,
            },
        })
    }
}

/// A reference to an entity with an ID and (usually) a name.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct NamedRef {
    /// Entity ID.
    pub id: String,
    /// Entity name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Domain the entity belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Box<NamedRef>>,
}

/// A single endpoint of a catalog record.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Endpoint {
    /// Endpoint ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Interface (public, internal or admin).
    pub interface: String,
    /// Region name.
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint URL.
    pub url: String,
}

/// A service in the catalog.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CatalogRecord {
    /// Service ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Service name.
    #[serde(default)]
    pub name: Option<String>,
    /// Service type.
    #[serde(rename = "type")]
    pub service_type: String,
    /// Endpoints of the service.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Token details as returned by the Identity service.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenInfo {
    /// Expiration time.
    pub expires_at: DateTime<FixedOffset>,
    /// Issue time.
    #[serde(default)]
    pub issued_at: Option<DateTime<FixedOffset>>,
    /// Authentication methods used.
    #[serde(default)]
    pub methods: Vec<String>,
    /// Audit IDs.
    #[serde(default)]
    pub audit_ids: Vec<String>,
    /// The authenticated user.
    pub user: NamedRef,
    /// Project for project-scoped tokens.
    #[serde(default)]
    pub project: Option<NamedRef>,
    /// Domain for domain-scoped tokens.
    #[serde(default)]
    pub domain: Option<NamedRef>,
    /// System scope for system-scoped tokens.
    #[serde(default)]
    pub system: Option<serde_json::Value>,
    /// Roles of the user within the scope.
    #[serde(default)]
    pub roles: Vec<NamedRef>,
    /// Service catalog (missing for unscoped tokens).
    #[serde(default)]
    pub catalog: Vec<CatalogRecord>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TokenRoot {
    pub token: TokenInfo,
}

#[cfg(test)]
pub mod test {
    use serde_json::json;

    use super::{AuthRoot, TokenRoot};
    use crate::auth::Credentials;

    #[test]
    fn test_auth_body_project_scope() {
        let creds = Credentials::new("admin", "secret", "Default").with_project("admin", "Default");
        let body = AuthRoot::from_credentials(&creds).unwrap();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "auth": {
                    "identity": {
                        "methods": ["password"],
                        "password": {
                            "user": {
                                "name": "admin",
                                "password": "secret",
                                "domain": {"name": "Default"}
                            }
                        }
                    },
                    "scope": {
                        "project": {
                            "name": "admin",
                            "domain": {"name": "Default"}
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_auth_body_system_scope_with_user_id() {
        let mut creds = Credentials::default().with_system_scope();
        creds.user_id = Some("u1".into());
        creds.password = Some("secret".into());
        let body = AuthRoot::from_credentials(&creds).unwrap();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "auth": {
                    "identity": {
                        "methods": ["password"],
                        "password": {"user": {"id": "u1", "password": "secret"}}
                    },
                    "scope": {"system": {"all": true}}
                }
            })
        );
    }

    #[test]
    fn test_auth_body_unscoped() {
        let creds = Credentials::new("demo", "secret", "Default");
        let body = serde_json::to_value(AuthRoot::from_credentials(&creds).unwrap()).unwrap();
        assert!(body["auth"].get("scope").is_none());
        assert!(AuthRoot::from_credentials(&Credentials::default()).is_none());
    }

    #[test]
    fn test_token_parse() {
        let root: TokenRoot = serde_json::from_value(json!({
            "token": {
                "methods": ["password"],
                "expires_at": "2015-11-06T15:32:17.893769Z",
                "issued_at": "2015-11-06T14:32:17.893797Z",
                "audit_ids": ["ZzZwkUflQfygX7pdYDBCQQ"],
                "user": {
                    "id": "423f19a4ac1e4f48bbb4180756e6eb6c",
                    "name": "admin",
                    "domain": {"id": "default", "name": "Default"}
                },
                "project": {
                    "id": "a6944d763bf64ee6a275f1263fae0352",
                    "name": "admin",
                    "domain": {"id": "default", "name": "Default"}
                },
                "roles": [{"id": "51cc68287d524c759f47c811e6463340", "name": "admin"}],
                "catalog": [{
                    "type": "compute",
                    "name": "nova",
                    "endpoints": [
                        {"interface": "public", "region": "RegionOne",
                         "url": "http://localhost/compute/v2.1"}
                    ]
                }]
            }
        }))
        .unwrap();
        assert_eq!(root.token.user.name.as_deref(), Some("admin"));
        assert_eq!(
            root.token.project.as_ref().map(|p| p.id.as_str()),
            Some("a6944d763bf64ee6a275f1263fae0352")
        );
        assert_eq!(root.token.roles[0].name.as_deref(), Some("admin"));
        assert_eq!(root.token.catalog[0].service_type, "compute");
        assert_eq!(root.token.expires_at.timestamp(), 1446823937);
    }
}
