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

//! Authentication using Identity API v3.
//!
//! Only password authentication is supported. Identity API v2 is not and
//! will not be supported.

mod catalog;
pub(crate) mod protocol;
pub(crate) mod provider;

use std::fmt;

use serde::{Deserialize, Serialize};

use super::IdOrName;

pub use osauth::{EndpointFilters, InterfaceType, ValidInterfaces};

pub use self::catalog::ServiceCatalog;
pub use self::protocol::{CatalogRecord, Endpoint, NamedRef, TokenInfo};
pub use self::provider::{AuthData, AuthProvider};

pub(crate) const AUTH_HEADER: &str = "X-Auth-Token";
const MISSING_SUBJECT_HEADER: &str = "Missing X-Subject-Token header";
const INVALID_SUBJECT_HEADER: &str = "Invalid X-Subject-Token header";
// Required validity time in minutes. Here we refresh the token if it expires
// in 10 minutes or less.
const TOKEN_MIN_VALIDITY: i64 = 10;

/// A scope of a token.
#[derive(Clone, Debug, PartialEq)]
pub enum Scope {
    /// A token scoped to a project.
    Project {
        /// Project ID or name.
        project: IdOrName,
        /// ID or name of the project domain.
        domain: Option<IdOrName>,
    },
    /// A token scoped to a domain.
    Domain(IdOrName),
    /// A system-scoped token.
    System,
    /// No scope.
    Unscoped,
}

/// Filters accepting one interface, optionally limited to a region.
pub fn endpoint_filters(interface: InterfaceType, region: Option<String>) -> EndpointFilters {
    let mut filters = EndpointFilters::default();
    filters.interfaces = ValidInterfaces::one(interface);
    filters.region = region;
    filters
}

/// A set of credentials.
///
/// Either a user name or a user ID must be provided together with a password.
/// The token scope is derived from the other fields, see [scope](#method.scope).
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Credentials {
    /// User name.
    #[serde(default)]
    pub username: Option<String>,
    /// User ID.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Password.
    #[serde(default)]
    pub password: Option<String>,
    /// Name of the user domain.
    #[serde(default)]
    pub user_domain_name: Option<String>,
    /// ID of the user domain.
    #[serde(default)]
    pub user_domain_id: Option<String>,
    /// Project name.
    #[serde(default)]
    pub project_name: Option<String>,
    /// Project ID.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Name of the project domain.
    #[serde(default)]
    pub project_domain_name: Option<String>,
    /// ID of the project domain.
    #[serde(default)]
    pub project_domain_id: Option<String>,
    /// Domain name for domain-scoped tokens.
    #[serde(default)]
    pub domain_name: Option<String>,
    /// Domain ID for domain-scoped tokens.
    #[serde(default)]
    pub domain_id: Option<String>,
    /// System scope (normally `all`).
    #[serde(default)]
    pub system: Option<String>,
    /// Roles this user is known to have.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("user_id", &self.user_id)
            .field("password", &self.password.as_ref().map(|_| "<omitted>"))
            .field("user_domain_name", &self.user_domain_name)
            .field("user_domain_id", &self.user_domain_id)
            .field("project_name", &self.project_name)
            .field("project_id", &self.project_id)
            .field("project_domain_name", &self.project_domain_name)
            .field("project_domain_id", &self.project_domain_id)
            .field("domain_name", &self.domain_name)
            .field("domain_id", &self.domain_id)
            .field("system", &self.system)
            .field("roles", &self.roles)
            .finish()
    }
}

fn id_or_name(id: &Option<String>, name: &Option<String>) -> Option<IdOrName> {
    match (id, name) {
        (Some(id), _) => Some(IdOrName::Id(id.clone())),
        (None, Some(name)) => Some(IdOrName::Name(name.clone())),
        (None, None) => None,
    }
}

impl Credentials {
    /// Create password credentials for a user in a domain.
    pub fn new<S1, S2, S3>(username: S1, password: S2, user_domain_name: S3) -> Credentials
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Credentials {
            username: Some(username.into()),
            password: Some(password.into()),
            user_domain_name: Some(user_domain_name.into()),
            ..Credentials::default()
        }
    }

    /// Scope to a project given by its name.
    pub fn with_project<S1, S2>(mut self, project_name: S1, project_domain_name: S2) -> Credentials
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        self.project_name = Some(project_name.into());
        self.project_domain_name = Some(project_domain_name.into());
        self
    }

    /// Scope to a project given by its ID.
    pub fn with_project_id<S: Into<String>>(mut self, project_id: S) -> Credentials {
        self.project_id = Some(project_id.into());
        self
    }

    /// Scope to a domain given by its name.
    pub fn with_domain<S: Into<String>>(mut self, domain_name: S) -> Credentials {
        self.domain_name = Some(domain_name.into());
        self
    }

    /// Request a system-scoped token.
    pub fn with_system_scope(mut self) -> Credentials {
        self.system = Some("all".into());
        self
    }

    /// The user reference used for authentication.
    pub fn user(&self) -> Option<IdOrName> {
        id_or_name(&self.user_id, &self.username)
    }

    /// The domain of the user (irrelevant when a user ID is used).
    pub fn user_domain(&self) -> Option<IdOrName> {
        id_or_name(&self.user_domain_id, &self.user_domain_name)
    }

    /// Token scope derived from the credentials.
    ///
    /// System scope wins over project scope which wins over domain scope.
    pub fn scope(&self) -> Scope {
        if self.system.is_some() {
            Scope::System
        } else if let Some(project) = id_or_name(&self.project_id, &self.project_name) {
            Scope::Project {
                project,
                domain: id_or_name(&self.project_domain_id, &self.project_domain_name),
            }
        } else if let Some(domain) = id_or_name(&self.domain_id, &self.domain_name) {
            Scope::Domain(domain)
        } else {
            Scope::Unscoped
        }
    }

    /// Whether the credentials can be used for authentication.
    ///
    /// A user name needs a user domain, a user ID does not.
    pub fn is_valid(&self) -> bool {
        if self.password.is_none() {
            return false;
        }

        if self.user_id.is_some() {
            true
        } else {
            self.username.is_some() && self.user_domain().is_some()
        }
    }
}
