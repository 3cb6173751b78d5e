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


use std::time::Duration;

use tempest::common::data_utils::rand_uuid;
use tempest::common::{DeletionWaiter, Waiter};
use tempest::identity::{ProjectCreate, ProjectUpdate};
use tempest::testing::assert_error_kind;
use tempest::{ErrorKind, Query};

#[macro_use]
mod common;

#[tokio::test]
async fn test_project_crud() {
    common::run("ProjectsTest", |ctx| {
        Box::pin(async move {
            skip_if!(ctx.skip_unless_admin());
            let admin = ctx.admin().await.expect("Cannot get admin credentials");
            let project = ctx
                .create_test_project(&admin)
                .await
                .expect("Failed to create a project");
            assert!(project.enabled);
            assert_eq!(
                project.domain_id.as_deref(),
                Some(ctx.config().identity.default_domain_id.as_str())
            );

            let shown = admin
                .projects
                .show_project(&project.id)
                .await
                .expect("Failed to show the project");
            assert_eq!(shown.name, project.name);

            let listed = admin
                .projects
                .list_projects(&Query::new().with("name", &project.name))
                .await
                .expect("Failed to list projects");
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].id, project.id);

            let new_name = ctx.rand_name("project-updated");
            let update = ProjectUpdate {
                name: Some(new_name.clone()),
                description: Some("updated by tests".to_string()),
                enabled: Some(false),
            };
            let updated = admin
                .projects
                .update_project(&project.id, &update)
                .await
                .expect("Failed to update the project");
            assert_eq!(updated.name, new_name);
            assert_eq!(updated.description.as_deref(), Some("updated by tests"));
            assert!(!updated.enabled);

            let disabled = admin
                .projects
                .list_projects(&Query::new().with("enabled", false))
                .await
                .expect("Failed to list disabled projects");
            assert!(disabled.iter().any(|p| p.id == project.id));
        })
    })
    .await;
}

#[tokio::test]
async fn test_project_delete() {
    common::run("ProjectDeleteTest", |ctx| {
        Box::pin(async move {
            skip_if!(ctx.skip_unless_admin());
            let admin = ctx.admin().await.expect("Cannot get admin credentials");

            let request = ProjectCreate::new(ctx.rand_name("project"))
                .with_domain_id(ctx.config().identity.default_domain_id.clone())
                .with_description("short lived")
                .with_enabled(false);
            let project = admin
                .projects
                .create_project(&request)
                .await
                .expect("Failed to create a project");
            assert!(!project.enabled);
            assert_eq!(project.description.as_deref(), Some("short lived"));

            admin
                .projects
                .delete_project(&project.id)
                .await
                .expect("Failed to delete the project");
            let projects = admin.projects.clone();
            let id = project.id.clone();
            DeletionWaiter::new(
                format!("project {}", project.id),
                move || {
                    let projects = projects.clone();
                    let id = id.clone();
                    async move { projects.show_project(id).await.map(|_| ()) }
                },
                Duration::from_secs(30),
                Duration::from_secs(1),
            )
            .wait()
            .await
            .expect("Project was not deleted");
            let _ = assert_error_kind(
                admin.projects.show_project(&project.id).await,
                ErrorKind::NotFound,
            );
        })
    })
    .await;
}

#[tokio::test]
async fn test_projects_negative() {
    common::run("ProjectsNegativeTest", |ctx| {
        Box::pin(async move {
            let primary = ctx.primary().await.expect("Cannot get primary credentials");

            let request = ProjectCreate::new(ctx.rand_name("project"));
            let _ = assert_error_kind(
                primary.projects.create_project(&request).await,
                ErrorKind::Forbidden,
            );
            let _ = assert_error_kind(
                primary.projects.list_projects(&Query::new()).await,
                ErrorKind::Forbidden,
            );

            if ctx.skip_unless_admin().is_none() {
                let admin = ctx.admin().await.expect("Cannot get admin credentials");
                let _ = assert_error_kind(
                    admin.projects.show_project(rand_uuid()).await,
                    ErrorKind::NotFound,
                );
                let _ = assert_error_kind(
                    admin.projects.delete_project(rand_uuid()).await,
                    ErrorKind::NotFound,
                );

                let project = ctx
                    .create_test_project(&admin)
                    .await
                    .expect("Failed to create a project");
                let duplicate = ProjectCreate::new(project.name.clone())
                    .with_domain_id(ctx.config().identity.default_domain_id.clone());
                let _ = assert_error_kind(
                    admin.projects.create_project(&duplicate).await,
                    ErrorKind::Conflict,
                );
                let too_long = ProjectCreate::new("a".repeat(65));
                let _ = assert_error_kind(
                    admin.projects.create_project(&too_long).await,
                    ErrorKind::BadRequest,
                );
            }
        })
    })
    .await;
}
