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

//! Credentials created on the fly.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::super::auth::Credentials;
use super::super::clients::Manager;
use super::super::common::data_utils::{rand_name, rand_password};
use super::super::config::Config;
use super::super::identity::{ProjectCreate, UserCreate};
use super::super::utils::one;
use super::super::{Error, ErrorKind, Query, Result};
use super::{CredentialProvider, CredentialType};

const PASSWORD_LENGTH: usize = 16;

#[derive(Debug, Clone)]
struct CreatedAccount {
    credentials: Credentials,
    user_id: String,
    project_id: String,
}

/// Credentials backed by projects and users created with admin credentials.
///
/// Every credential type gets its own project and user, both removed by
/// `clear_creds`.
#[derive(Debug)]
pub struct DynamicCredentials {
    config: Config,
    admin_credentials: Credentials,
    name: String,
    admin: Option<Manager>,
    domain_id: Option<String>,
    role_ids: HashMap<String, String>,
    accounts: HashMap<CredentialType, CreatedAccount>,
}

impl DynamicCredentials {
    /// Create a provider using the admin credentials from the configuration.
    pub fn new<S: Into<String>>(config: Config, name: S) -> Result<DynamicCredentials> {
        let admin_credentials = config.auth.admin_credentials().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidCredentials,
                "Dynamic credentials require admin_username, admin_password \
                 and admin_project_name",
            )
        })?;
        Ok(DynamicCredentials {
            config,
            admin_credentials,
            name: name.into(),
            admin: None,
            domain_id: None,
            role_ids: HashMap::new(),
            accounts: HashMap::new(),
        })
    }

    fn admin(&mut self) -> Result<Manager> {
        if let Some(ref admin) = self.admin {
            return Ok(admin.clone());
        }
        let admin = Manager::new(&self.config, self.admin_credentials.clone())?;
        self.admin = Some(admin.clone());
        Ok(admin)
    }

    async fn domain_id(&mut self, admin: &Manager) -> Result<String> {
        if let Some(ref id) = self.domain_id {
            return Ok(id.clone());
        }
        let name = &self.config.auth.default_credentials_domain_name;
        let domains = admin
            .domains
            .list_domains(&Query::new().with("name", name))
            .await?;
        let domain = one(
            domains,
            format!("Domain {} was not found", name),
            format!("Too many domains named {}", name),
        )?;
        self.domain_id = Some(domain.id.clone());
        Ok(domain.id)
    }

    async fn role_id(&mut self, admin: &Manager, role: &str) -> Result<String> {
        if let Some(id) = self.role_ids.get(role) {
            return Ok(id.clone());
        }
        let roles = admin
            .roles
            .list_roles(&Query::new().with("name", role))
            .await?;
        let found = one(
            roles,
            format!("Role {} was not found", role),
            format!("Too many roles named {}", role),
        )?;
        let _ = self.role_ids.insert(role.to_string(), found.id.clone());
        Ok(found.id)
    }

    fn roles_for(&self, kind: &CredentialType) -> Vec<String> {
        let mut roles = match kind {
            CredentialType::Admin => vec![self.config.identity.admin_role.clone()],
            CredentialType::Roles(roles) => roles.clone(),
            CredentialType::Primary | CredentialType::Alt => Vec::new(),
        };
        for role in &self.config.auth.tempest_roles {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
        roles
    }

    async fn create_account(&mut self, kind: &CredentialType) -> Result<CreatedAccount> {
        let admin = self.admin()?;
        let domain_id = self.domain_id(&admin).await?;
        let domain_name = self.config.auth.default_credentials_domain_name.clone();

        let project_name = rand_name(format!("{}-project", self.name));
        let project = admin
            .projects
            .create_project(
                &ProjectCreate::new(project_name.clone())
                    .with_domain_id(domain_id.clone())
                    .with_description(format!("{} {} project", self.name, kind)),
            )
            .await?;

        let username = rand_name(format!("{}-user", self.name));
        let password = rand_password(PASSWORD_LENGTH);
        let user_request = UserCreate::new(username.clone(), password.clone())
            .with_domain_id(domain_id)
            .with_default_project_id(project.id.clone())
            .with_email(format!("{}@example.com", username));
        let user = match admin.users.create_user(&user_request).await {
            Ok(user) => user,
            Err(e) => {
                if let Err(cleanup) = admin.projects.delete_project(&project.id).await {
                    warn!("Cannot delete project {}: {}", project.id, cleanup);
                }
                return Err(e);
            }
        };

        let account = CreatedAccount {
            credentials: Credentials {
                roles: self.roles_for(kind),
                ..Credentials::new(username, password, domain_name.clone())
                    .with_project(project_name, domain_name)
            },
            user_id: user.id,
            project_id: project.id,
        };

        for role in account.credentials.roles.clone() {
            let assigned = match self.role_id(&admin, &role).await {
                Ok(role_id) => {
                    admin
                        .roles
                        .assign_user_role_on_project(&account.project_id, &account.user_id, role_id)
                        .await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = assigned {
                let _ = delete_account(&admin, &account).await;
                return Err(e);
            }
        }

        info!(
            "Created {} credentials: user {} in project {}",
            kind, account.user_id, account.project_id
        );
        Ok(account)
    }
}

fn ignore_not_found(result: Result<()>, what: &str) -> Result<()> {
    match result {
        Err(ref e) if e.kind() == ErrorKind::NotFound => {
            warn!("{} was already deleted", what);
            Ok(())
        }
        Err(e) => {
            warn!("Cannot delete {}: {}", what, e);
            Err(e)
        }
        Ok(()) => Ok(()),
    }
}

async fn delete_account(admin: &Manager, account: &CreatedAccount) -> Result<()> {
    let user = ignore_not_found(
        admin.users.delete_user(&account.user_id).await,
        &format!("user {}", account.user_id),
    );
    let project = ignore_not_found(
        admin.projects.delete_project(&account.project_id).await,
        &format!("project {}", account.project_id),
    );
    user.and(project)
}

#[async_trait]
impl CredentialProvider for DynamicCredentials {
    async fn get_creds(&mut self, kind: &CredentialType) -> Result<Credentials> {
        if let Some(account) = self.accounts.get(kind) {
            return Ok(account.credentials.clone());
        }
        debug!("Creating {} credentials for {}", kind, self.name);
        let account = self.create_account(kind).await?;
        let credentials = account.credentials.clone();
        let _ = self.accounts.insert(kind.clone(), account);
        Ok(credentials)
    }

    async fn get_creds_by_roles(
        &mut self,
        roles: &[String],
        force_new: bool,
    ) -> Result<Credentials> {
        let kind = CredentialType::roles(roles.iter().cloned());
        if force_new {
            if let Some(old) = self.accounts.remove(&kind) {
                debug!("Replacing {} credentials for {}", kind, self.name);
                let admin = self.admin()?;
                delete_account(&admin, &old).await?;
            }
        }
        self.get_creds(&kind).await
    }

    async fn clear_creds(&mut self) -> Result<()> {
        if self.accounts.is_empty() {
            return Ok(());
        }
        let admin = self.admin()?;
        let accounts: Vec<_> = self.accounts.drain().map(|(_, account)| account).collect();
        let mut result = Ok(());

        for account in &accounts {
            let deleted = ignore_not_found(
                admin.users.delete_user(&account.user_id).await,
                &format!("user {}", account.user_id),
            );
            result = result.and(deleted);
        }
        for account in &accounts {
            let deleted = ignore_not_found(
                admin.projects.delete_project(&account.project_id).await,
                &format!("project {}", account.project_id),
            );
            result = result.and(deleted);
        }

        result
    }

    fn is_multi_user(&self) -> bool {
        true
    }

    fn is_multi_tenant(&self) -> bool {
        true
    }

    fn is_admin_available(&self) -> bool {
        true
    }

    fn is_role_available(&self, _role: &str) -> bool {
        true
    }
}
