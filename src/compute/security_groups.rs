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

//! Security groups API (proxied to networking, removed in microversion 2.36).

use log::debug;
use serde_json::json;

use super::super::common::{ApiVersion, Microversion};
use super::super::rest_client::RestClient;
use super::super::Result;
use super::protocol::*;

/// The last microversion exposing security group proxies.
pub const MAX_MICROVERSION: Microversion = Microversion::Version(ApiVersion(2, 35));

/// Security groups API.
///
/// Requests never use a microversion newer than 2.35.
#[derive(Clone, Debug)]
pub struct SecurityGroupsClient {
    client: RestClient,
}

fn capped(client: RestClient) -> RestClient {
    match client.microversion() {
        Some(version) if version > MAX_MICROVERSION => client.with_microversion(MAX_MICROVERSION),
        _ => client,
    }
}

impl SecurityGroupsClient {
    /// Create a client on top of a REST client.
    pub fn new(client: RestClient) -> SecurityGroupsClient {
        SecurityGroupsClient {
            client: capped(client),
        }
    }

    /// Use the given microversion (capped at 2.35) for all requests.
    pub fn with_microversion<V: Into<Option<Microversion>>>(self, version: V) -> SecurityGroupsClient {
        SecurityGroupsClient::new(self.client.with_microversion(version))
    }

    /// Underlying REST client.
    #[inline]
    pub fn rest_client(&self) -> &RestClient {
        &self.client
    }

    /// List security groups.
    pub async fn list_security_groups(&self) -> Result<Vec<SecurityGroup>> {
        let root: SecurityGroupsRoot = self
            .client
            .get(&["os-security-groups"])
            .fetch(&[200])
            .await?;
        Ok(root.security_groups)
    }

    /// Get a security group.
    pub async fn show_security_group<S: AsRef<str>>(&self, id: S) -> Result<SecurityGroup> {
        let root: SecurityGroupRoot = self
            .client
            .get(&["os-security-groups", id.as_ref()])
            .fetch(&[200])
            .await?;
        Ok(root.security_group)
    }

    /// Create a security group.
    pub async fn create_security_group<S1, S2>(
        &self,
        name: S1,
        description: S2,
    ) -> Result<SecurityGroup>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let request = SecurityGroupCreate {
            name: name.into(),
            description: description.into(),
        };
        debug!("Creating security group {}", request.name);
        let root: SecurityGroupRoot = self
            .client
            .post(&["os-security-groups"])
            .json(&json!({ "security_group": request }))
            .fetch(&[200])
            .await?;
        Ok(root.security_group)
    }

    /// Update name and description of a security group.
    pub async fn update_security_group<S1, S2, S3>(
        &self,
        id: S1,
        name: S2,
        description: S3,
    ) -> Result<SecurityGroup>
    where
        S1: AsRef<str>,
        S2: Into<String>,
        S3: Into<String>,
    {
        let request = SecurityGroupCreate {
            name: name.into(),
            description: description.into(),
        };
        let root: SecurityGroupRoot = self
            .client
            .put(&["os-security-groups", id.as_ref()])
            .json(&json!({ "security_group": request }))
            .fetch(&[200])
            .await?;
        Ok(root.security_group)
    }

    /// Delete a security group.
    pub async fn delete_security_group<S: AsRef<str>>(&self, id: S) -> Result<()> {
        debug!("Deleting security group {}", id.as_ref());
        let _ = self
            .client
            .delete(&["os-security-groups", id.as_ref()])
            .send(&[202])
            .await?;
        Ok(())
    }

    /// Create a rule in a security group.
    pub async fn create_security_group_rule(
        &self,
        request: &SecurityGroupRuleCreate,
    ) -> Result<SecurityGroupRule> {
        debug!("Creating security group rule {:?}", request);
        let root: SecurityGroupRuleRoot = self
            .client
            .post(&["os-security-group-rules"])
            .json(&json!({ "security_group_rule": request }))
            .fetch(&[200])
            .await?;
        Ok(root.security_group_rule)
    }

    /// Delete a security group rule.
    pub async fn delete_security_group_rule<S: AsRef<str>>(&self, id: S) -> Result<()> {
        debug!("Deleting security group rule {}", id.as_ref());
        let _ = self
            .client
            .delete(&["os-security-group-rules", id.as_ref()])
            .send(&[202])
            .await?;
        Ok(())
    }
}
