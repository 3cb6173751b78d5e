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

//! JSON structures of the Identity V3 admin API.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// A reference by ID, optionally with a name.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct IdRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A project.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub domain_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub is_domain: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProjectRoot {
    pub project: Project,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProjectsRoot {
    pub projects: Vec<Project>,
}

/// A project creation request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProjectCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl ProjectCreate {
    /// Project with the given name in the default domain.
    pub fn new<S: Into<String>>(name: S) -> ProjectCreate {
        ProjectCreate {
            name: name.into(),
            ..ProjectCreate::default()
        }
    }

    /// Create the project in a domain.
    pub fn with_domain_id<S: Into<String>>(mut self, domain_id: S) -> ProjectCreate {
        self.domain_id = Some(domain_id.into());
        self
    }

    /// Set a description.
    pub fn with_description<S: Into<String>>(mut self, description: S) -> ProjectCreate {
        self.description = Some(description.into());
        self
    }

    /// Enable or disable the project.
    pub fn with_enabled(mut self, enabled: bool) -> ProjectCreate {
        self.enabled = Some(enabled);
        self
    }
}

/// A project update, only present fields are changed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// A user.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub domain_id: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_project_id: Option<String>,
    #[serde(default)]
    pub password_expires_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserRoot {
    pub user: User,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UsersRoot {
    pub users: Vec<User>,
}

/// A user creation request.
#[derive(Clone, Default, Serialize)]
pub struct UserCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl std::fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCreate")
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "<omitted>"))
            .field("domain_id", &self.domain_id)
            .field("default_project_id", &self.default_project_id)
            .field("email", &self.email)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl UserCreate {
    /// User with the given name and password.
    pub fn new<S1, S2>(name: S1, password: S2) -> UserCreate
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        UserCreate {
            name: name.into(),
            password: Some(password.into()),
            ..UserCreate::default()
        }
    }

    /// Create the user in a domain.
    pub fn with_domain_id<S: Into<String>>(mut self, domain_id: S) -> UserCreate {
        self.domain_id = Some(domain_id.into());
        self
    }

    /// Set the default project.
    pub fn with_default_project_id<S: Into<String>>(mut self, project_id: S) -> UserCreate {
        self.default_project_id = Some(project_id.into());
        self
    }

    /// Set an e-mail.
    pub fn with_email<S: Into<String>>(mut self, email: S) -> UserCreate {
        self.email = Some(email.into());
        self
    }

    /// Enable or disable the user.
    pub fn with_enabled(mut self, enabled: bool) -> UserCreate {
        self.enabled = Some(enabled);
        self
    }
}

/// A user update, only present fields are changed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project_id: Option<String>,
}

#[derive(Clone, Serialize)]
pub(crate) struct PasswordChange {
    pub original_password: String,
    pub password: String,
}

#[derive(Clone, Serialize)]
pub(crate) struct PasswordChangeRoot {
    pub user: PasswordChange,
}

/// A role.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub domain_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RoleRoot {
    pub role: Role,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RolesRoot {
    pub roles: Vec<Role>,
}

/// A role creation request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RoleCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoleCreate {
    /// Global role with the given name.
    pub fn new<S: Into<String>>(name: S) -> RoleCreate {
        RoleCreate {
            name: name.into(),
            ..RoleCreate::default()
        }
    }
}

/// A role update, only present fields are changed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RoleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Target of a role assignment.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AssignmentScope {
    #[serde(default)]
    pub project: Option<IdRef>,
    #[serde(default)]
    pub domain: Option<IdRef>,
    #[serde(default)]
    pub system: Option<serde_json::Value>,
}

/// A role assignment.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RoleAssignment {
    pub role: IdRef,
    #[serde(default)]
    pub user: Option<IdRef>,
    #[serde(default)]
    pub group: Option<IdRef>,
    #[serde(default)]
    pub scope: AssignmentScope,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RoleAssignmentsRoot {
    pub role_assignments: Vec<RoleAssignment>,
}

/// A domain.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DomainRoot {
    pub domain: Domain,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DomainsRoot {
    pub domains: Vec<Domain>,
}

/// A domain creation request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DomainCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl DomainCreate {
    /// Domain with the given name.
    pub fn new<S: Into<String>>(name: S) -> DomainCreate {
        DomainCreate {
            name: name.into(),
            ..DomainCreate::default()
        }
    }

    /// Set a description.
    pub fn with_description<S: Into<String>>(mut self, description: S) -> DomainCreate {
        self.description = Some(description.into());
        self
    }
}

/// A domain update, only present fields are changed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DomainUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CatalogRoot {
    pub catalog: Vec<crate::auth::CatalogRecord>,
}
