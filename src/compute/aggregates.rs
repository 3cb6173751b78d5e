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

//! Host aggregates API.

use std::collections::HashMap;

use log::{debug, trace};
use serde_json::json;

use super::super::Result;
use super::protocol::*;

service_client! {
    /// Host aggregates API (admin only).
    AggregatesClient
}

impl AggregatesClient {
    /// List aggregates.
    pub async fn list_aggregates(&self) -> Result<Vec<Aggregate>> {
        let root: AggregatesRoot = self.client.get(&["os-aggregates"]).fetch(&[200]).await?;
        trace!("Received aggregates: {:?}", root.aggregates);
        Ok(root.aggregates)
    }

    /// Get an aggregate.
    pub async fn show_aggregate<S: AsRef<str>>(&self, id: S) -> Result<Aggregate> {
        let root: AggregateRoot = self
            .client
            .get(&["os-aggregates", id.as_ref()])
            .fetch(&[200])
            .await?;
        Ok(root.aggregate)
    }

    /// Create an aggregate, optionally exposed as an availability zone.
    pub async fn create_aggregate<S: Into<String>>(
        &self,
        name: S,
        availability_zone: Option<String>,
    ) -> Result<Aggregate> {
        let request = AggregateUpdate {
            name: Some(name.into()),
            availability_zone,
        };
        debug!("Creating an aggregate with {:?}", request);
        let root: AggregateRoot = self
            .client
            .post(&["os-aggregates"])
            .json(&json!({ "aggregate": request }))
            .fetch(&[200])
            .await?;
        debug!("Created aggregate {}", root.aggregate.id);
        Ok(root.aggregate)
    }

    /// Update name and/or availability zone of an aggregate.
    pub async fn update_aggregate<S: AsRef<str>>(
        &self,
        id: S,
        update: &AggregateUpdate,
    ) -> Result<Aggregate> {
        let root: AggregateRoot = self
            .client
            .put(&["os-aggregates", id.as_ref()])
            .json(&json!({ "aggregate": update }))
            .fetch(&[200])
            .await?;
        Ok(root.aggregate)
    }

    /// Delete an aggregate.
    pub async fn delete_aggregate<S: AsRef<str>>(&self, id: S) -> Result<()> {
        debug!("Deleting aggregate {}", id.as_ref());
        let _ = self
            .client
            .delete(&["os-aggregates", id.as_ref()])
            .send(&[200])
            .await?;
        Ok(())
    }

    /// Add a compute host to an aggregate.
    pub async fn add_host<S1, S2>(&self, id: S1, host: S2) -> Result<Aggregate>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        debug!("Adding host {} to aggregate {}", host.as_ref(), id.as_ref());
        let root: AggregateRoot = self
            .client
            .post(&["os-aggregates", id.as_ref(), "action"])
            .json(&json!({"add_host": {"host": host.as_ref()}}))
            .fetch(&[200])
            .await?;
        Ok(root.aggregate)
    }

    /// Remove a compute host from an aggregate.
    pub async fn remove_host<S1, S2>(&self, id: S1, host: S2) -> Result<Aggregate>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        debug!("Removing host {} from aggregate {}", host.as_ref(), id.as_ref());
        let root: AggregateRoot = self
            .client
            .post(&["os-aggregates", id.as_ref(), "action"])
            .json(&json!({"remove_host": {"host": host.as_ref()}}))
            .fetch(&[200])
            .await?;
        Ok(root.aggregate)
    }

    /// Set metadata items, a `None` value removes the item.
    pub async fn set_metadata<S: AsRef<str>>(
        &self,
        id: S,
        metadata: HashMap<String, Option<String>>,
    ) -> Result<Aggregate> {
        let root: AggregateRoot = self
            .client
            .post(&["os-aggregates", id.as_ref(), "action"])
            .json(&json!({"set_metadata": {"metadata": metadata}}))
            .fetch(&[200])
            .await?;
        Ok(root.aggregate)
    }
}
