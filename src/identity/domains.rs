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

//! Domains API.

use log::debug;
use serde_json::json;

use super::super::{Query, Result};
use super::protocol::*;

service_client! {
    /// Domains API.
    DomainsClient
}

impl DomainsClient {
    /// Create a domain.
    pub async fn create_domain(&self, request: &DomainCreate) -> Result<Domain> {
        debug!("Creating a domain with {:?}", request);
        let root: DomainRoot = self
            .client
            .post(&["domains"])
            .json(&json!({ "domain": request }))
            .fetch(&[201])
            .await?;
        Ok(root.domain)
    }

    /// Get a domain.
    pub async fn show_domain<S: AsRef<str>>(&self, id: S) -> Result<Domain> {
        let root: DomainRoot = self
            .client
            .get(&["domains", id.as_ref()])
            .fetch(&[200])
            .await?;
        Ok(root.domain)
    }

    /// List domains.
    pub async fn list_domains(&self, filters: &Query) -> Result<Vec<Domain>> {
        let root: DomainsRoot = self
            .client
            .get(&["domains"])
            .query_all(filters)
            .fetch(&[200])
            .await?;
        Ok(root.domains)
    }

    /// Update a domain.
    pub async fn update_domain<S: AsRef<str>>(
        &self,
        id: S,
        update: &DomainUpdate,
    ) -> Result<Domain> {
        debug!("Updating domain {} with {:?}", id.as_ref(), update);
        let root: DomainRoot = self
            .client
            .patch(&["domains", id.as_ref()])
            .json(&json!({ "domain": update }))
            .fetch(&[200])
            .await?;
        Ok(root.domain)
    }

    /// Delete a domain.
    ///
    /// Enabled domains cannot be deleted, disable them with `update_domain`
    /// first (the server responds with 403 otherwise).
    pub async fn delete_domain<S: AsRef<str>>(&self, id: S) -> Result<()> {
        debug!("Deleting domain {}", id.as_ref());
        let _ = self
            .client
            .delete(&["domains", id.as_ref()])
            .send(&[204])
            .await?;
        Ok(())
    }
}
