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

//! Projects API.

use log::debug;
use serde_json::json;

use super::super::{Query, Result};
use super::protocol::*;

service_client! {
    /// Projects API.
    ProjectsClient
}

impl ProjectsClient {
    /// Create a project.
    pub async fn create_project(&self, request: &ProjectCreate) -> Result<Project> {
        debug!("Creating a project with {:?}", request);
        let root: ProjectRoot = self
            .client
            .post(&["projects"])
            .json(&json!({ "project": request }))
            .fetch(&[201])
            .await?;
        debug!("Created project {}", root.project.id);
        Ok(root.project)
    }

    /// Get a project.
    pub async fn show_project<S: AsRef<str>>(&self, id: S) -> Result<Project> {
        let root: ProjectRoot = self
            .client
            .get(&["projects", id.as_ref()])
            .fetch(&[200])
            .await?;
        Ok(root.project)
    }

    /// List projects.
    pub async fn list_projects(&self, filters: &Query) -> Result<Vec<Project>> {
        let root: ProjectsRoot = self
            .client
            .get(&["projects"])
            .query_all(filters)
            .fetch(&[200])
            .await?;
        Ok(root.projects)
    }

    /// Update a project.
    pub async fn update_project<S: AsRef<str>>(
        &self,
        id: S,
        update: &ProjectUpdate,
    ) -> Result<Project> {
        debug!("Updating project {} with {:?}", id.as_ref(), update);
        let root: ProjectRoot = self
            .client
            .patch(&["projects", id.as_ref()])
            .json(&json!({ "project": update }))
            .fetch(&[200])
            .await?;
        Ok(root.project)
    }

    /// Delete a project.
    pub async fn delete_project<S: AsRef<str>>(&self, id: S) -> Result<()> {
        debug!("Deleting project {}", id.as_ref());
        let _ = self
            .client
            .delete(&["projects", id.as_ref()])
            .send(&[204])
            .await?;
        Ok(())
    }
}
