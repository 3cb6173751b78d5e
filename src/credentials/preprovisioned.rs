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

//! Pre-provisioned accounts guarded by lock files.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, trace, warn};
use serde::Deserialize;

use super::super::auth::Credentials;
use super::super::config::Config;
use super::super::{Error, ErrorKind, Result};
use super::{CredentialProvider, CredentialType};

const ADMIN_TYPE: &str = "admin";

/// An entry of the accounts file.
///
/// ```yaml
/// - username: tempest-user-1
///   password: secret
///   project_name: tempest-project-1
///   roles: [member]
/// - username: admin
///   password: secret
///   project_name: admin
///   types: [admin]
/// ```
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
    /// Project name.
    #[serde(default)]
    pub project_name: Option<String>,
    /// Project ID.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Domain of the user and the project.
    #[serde(default)]
    pub domain_name: Option<String>,
    /// Roles of the user in the project.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Special account types, currently only `admin`.
    #[serde(default)]
    pub types: Vec<String>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"<omitted>")
            .field("project_name", &self.project_name)
            .field("project_id", &self.project_id)
            .field("domain_name", &self.domain_name)
            .field("roles", &self.roles)
            .field("types", &self.types)
            .finish()
    }
}

impl Account {
    fn is_admin(&self, admin_role: &str) -> bool {
        self.types.iter().any(|t| t == ADMIN_TYPE) || self.roles.iter().any(|r| r == admin_role)
    }

    fn matches(&self, kind: &CredentialType, admin_role: &str) -> bool {
        match kind {
            CredentialType::Admin => self.is_admin(admin_role),
            CredentialType::Primary | CredentialType::Alt => !self.is_admin(admin_role),
            CredentialType::Roles(roles) => {
                roles.iter().all(|role| self.roles.contains(role))
                    && (!self.is_admin(admin_role) || roles.iter().any(|r| r == admin_role))
            }
        }
    }

    fn project_key(&self) -> Option<&str> {
        self.project_id.as_deref().or(self.project_name.as_deref())
    }

    fn lock_name(&self, default_domain: &str) -> String {
        let domain = self.domain_name.as_deref().unwrap_or(default_domain);
        let raw = format!("{}@{}", self.username, domain);
        let mut name: String = raw
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        name.push_str(".lock");
        name
    }

    fn credentials(&self, default_domain: &str) -> Credentials {
        let domain = self
            .domain_name
            .clone()
            .unwrap_or_else(|| default_domain.to_string());
        let mut credentials = Credentials::new(
            self.username.clone(),
            self.password.clone(),
            domain.clone(),
        );
        if let Some(ref project_id) = self.project_id {
            credentials = credentials.with_project_id(project_id.clone());
        } else if let Some(ref project_name) = self.project_name {
            credentials = credentials.with_project(project_name.clone(), domain);
        }
        credentials.roles = self.roles.clone();
        credentials
    }
}

/// Credentials from a list of existing accounts.
///
/// An account is claimed by atomically creating a lock file, so that
/// concurrent test runs never share an account.
#[derive(Debug)]
pub struct PreProvisionedCredentials {
    name: String,
    accounts: Vec<Account>,
    lock_dir: PathBuf,
    admin_role: String,
    default_domain: String,
    held: HashMap<CredentialType, (usize, PathBuf)>,
}

fn release(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            trace!("Released lock {:?}", path);
            Ok(())
        }
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Lock {:?} was already removed", path);
            Ok(())
        }
        Err(e) => Err(Error::new(
            ErrorKind::InvalidCredentials,
            format!("Cannot remove lock {}: {}", path.display(), e),
        )),
    }
}

impl PreProvisionedCredentials {
    /// Read accounts from the file configured in `auth.test_accounts_file`.
    pub fn new<S: Into<String>>(config: &Config, name: S) -> Result<PreProvisionedCredentials> {
        let path = config.auth.test_accounts_file.as_ref().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidConfig,
                "auth.test_accounts_file is required for pre-provisioned credentials",
            )
        })?;
        let file = File::open(path).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot read {}: {}", path.display(), e),
            )
        })?;
        let accounts: Vec<Account> = serde_yaml::from_reader(file).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot parse {}: {}", path.display(), e),
            )
        })?;
        debug!("Loaded {} accounts from {}", accounts.len(), path.display());
        Ok(PreProvisionedCredentials::from_accounts(
            name,
            accounts,
            config.auth.lock_path(),
            config.identity.admin_role.clone(),
            config.auth.default_credentials_domain_name.clone(),
        ))
    }

    /// Create a provider from a list of accounts.
    pub fn from_accounts<S: Into<String>>(
        name: S,
        accounts: Vec<Account>,
        lock_dir: PathBuf,
        admin_role: String,
        default_domain: String,
    ) -> PreProvisionedCredentials {
        PreProvisionedCredentials {
            name: name.into(),
            accounts,
            lock_dir,
            admin_role,
            default_domain,
            held: HashMap::new(),
        }
    }

    fn claim(&self, kind: &CredentialType) -> Result<(usize, PathBuf)> {
        fs::create_dir_all(&self.lock_dir).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot create {}: {}", self.lock_dir.display(), e),
            )
        })?;

        let ours: HashSet<usize> = self.held.values().map(|(idx, _)| *idx).collect();
        for (idx, account) in self.accounts.iter().enumerate() {
            if ours.contains(&idx) || !account.matches(kind, &self.admin_role) {
                continue;
            }

            let path = self.lock_dir.join(account.lock_name(&self.default_domain));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    writeln!(file, "{}", self.name)?;
                    debug!("Claimed account {} for {} credentials", account.username, kind);
                    return Ok((idx, path));
                }
                Err(ref e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    trace!("Account {} is in use", account.username);
                }
                Err(e) => {
                    return Err(Error::new(
                        ErrorKind::InvalidCredentials,
                        format!("Cannot create lock {}: {}", path.display(), e),
                    ))
                }
            }
        }

        Err(Error::new(
            ErrorKind::InvalidCredentials,
            format!("No free pre-provisioned account for {} credentials", kind),
        ))
    }
}

#[async_trait]
impl CredentialProvider for PreProvisionedCredentials {
    async fn get_creds(&mut self, kind: &CredentialType) -> Result<Credentials> {
        if let Some((idx, _)) = self.held.get(kind) {
            return Ok(self.accounts[*idx].credentials(&self.default_domain));
        }
        let (idx, path) = self.claim(kind)?;
        let _ = self.held.insert(kind.clone(), (idx, path));
        Ok(self.accounts[idx].credentials(&self.default_domain))
    }

    async fn get_creds_by_roles(
        &mut self,
        roles: &[String],
        force_new: bool,
    ) -> Result<Credentials> {
        let kind = CredentialType::roles(roles.iter().cloned());
        if force_new {
            if let Some((_, path)) = self.held.remove(&kind) {
                release(&path)?;
            }
        }
        self.get_creds(&kind).await
    }

    async fn clear_creds(&mut self) -> Result<()> {
        let mut result = Ok(());
        for (_, (_, path)) in self.held.drain() {
            result = result.and(release(&path));
        }
        result
    }

    fn is_multi_user(&self) -> bool {
        self.accounts.len() > 1
    }

    fn is_multi_tenant(&self) -> bool {
        let projects: HashSet<&str> = self
            .accounts
            .iter()
            .filter_map(Account::project_key)
            .collect();
        projects.len() > 1
    }

    fn is_admin_available(&self) -> bool {
        self.accounts
            .iter()
            .any(|account| account.is_admin(&self.admin_role))
    }

    fn is_role_available(&self, role: &str) -> bool {
        self.accounts
            .iter()
            .any(|account| account.roles.iter().any(|r| r == role))
    }
}

impl Drop for PreProvisionedCredentials {
    fn drop(&mut self) {
        for (_, (_, path)) in self.held.drain() {
            if let Err(e) = release(&path) {
                warn!("{}", e);
            }
        }
    }
}
