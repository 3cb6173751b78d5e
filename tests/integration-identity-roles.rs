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


use tempest::common::data_utils::rand_uuid;
use tempest::identity::{RoleCreate, RoleUpdate};
use tempest::testing::assert_error_kind;
use tempest::{ErrorKind, Query};

#[macro_use]
mod common;

#[tokio::test]
async fn test_role_crud() {
    common::run("RolesTest", |ctx| {
        Box::pin(async move {
            skip_if!(ctx.skip_unless_admin());
            let admin = ctx.admin().await.expect("Cannot get admin credentials");
            let role = ctx
                .create_test_role(&admin)
                .await
                .expect("Failed to create a role");

            let shown = admin
                .roles
                .show_role(&role.id)
                .await
                .expect("Failed to show the role");
            assert_eq!(shown, role);

            let listed = admin
                .roles
                .list_roles(&Query::new().with("name", &role.name))
                .await
                .expect("Failed to list roles");
            assert_eq!(listed, vec![role.clone()]);

            let new_name = ctx.rand_name("role-updated");
            let update = RoleUpdate {
                name: Some(new_name.clone()),
                description: Some("updated by tests".to_string()),
            };
            let updated = admin
                .roles
                .update_role(&role.id, &update)
                .await
                .expect("Failed to update the role");
            assert_eq!(updated.name, new_name);
            assert_eq!(updated.description.as_deref(), Some("updated by tests"));
        })
    })
    .await;
}

#[tokio::test]
async fn test_role_assignments() {
    common::run("RoleAssignmentsTest", |ctx| {
        Box::pin(async move {
            skip_if!(ctx.skip_unless_admin());
            let admin = ctx.admin().await.expect("Cannot get admin credentials");
            let project = ctx
                .create_test_project(&admin)
                .await
                .expect("Failed to create a project");
            let (user, _) = ctx
                .create_test_user(&admin, None)
                .await
                .expect("Failed to create a user");
            let role = ctx
                .create_test_role(&admin)
                .await
                .expect("Failed to create a role");
            let roles = &admin.roles;

            roles
                .assign_user_role_on_project(&project.id, &user.id, &role.id)
                .await
                .expect("Failed to assign the role on the project");
            let on_project = roles
                .list_user_roles_on_project(&project.id, &user.id)
                .await
                .expect("Failed to list roles on the project");
            assert_eq!(on_project, vec![role.clone()]);
            roles
                .check_user_role_existence_on_project(&project.id, &user.id, &role.id)
                .await
                .expect("Role assignment does not exist");

            let domain_id = ctx.config().identity.default_domain_id.clone();
            roles
                .assign_user_role_on_domain(&domain_id, &user.id, &role.id)
                .await
                .expect("Failed to assign the role on the domain");

            let query = Query::new()
                .with("user.id", &user.id)
                .with("role.id", &role.id);
            let assignments = roles
                .list_role_assignments(&query)
                .await
                .expect("Failed to list role assignments");
            assert_eq!(assignments.len(), 2);
            assert!(assignments.iter().any(|a| a
                .scope
                .project
                .as_ref()
                .map_or(false, |p| p.id == project.id)));
            assert!(assignments.iter().any(|a| a
                .scope
                .domain
                .as_ref()
                .map_or(false, |d| d.id == domain_id)));

            roles
                .delete_role_from_user_on_project(&project.id, &user.id, &role.id)
                .await
                .expect("Failed to delete the role assignment");
            let _ = assert_error_kind(
                roles
                    .check_user_role_existence_on_project(&project.id, &user.id, &role.id)
                    .await,
                ErrorKind::NotFound,
            );
            let on_project = roles
                .list_user_roles_on_project(&project.id, &user.id)
                .await
                .expect("Failed to list roles on the project");
            assert!(on_project.is_empty());
        })
    })
    .await;
}

#[tokio::test]
async fn test_roles_negative() {
    common::run("RolesNegativeTest", |ctx| {
        Box::pin(async move {
            let primary = ctx.primary().await.expect("Cannot get primary credentials");

            let _ = assert_error_kind(
                primary
                    .roles
                    .create_role(&RoleCreate::new(ctx.rand_name("role")))
                    .await,
                ErrorKind::Forbidden,
            );

            if ctx.skip_unless_admin().is_none() {
                let admin = ctx.admin().await.expect("Cannot get admin credentials");
                let _ = assert_error_kind(
                    admin.roles.show_role(rand_uuid()).await,
                    ErrorKind::NotFound,
                );
                let _ = assert_error_kind(
                    admin.roles.delete_role(rand_uuid()).await,
                    ErrorKind::NotFound,
                );

                let role = ctx
                    .create_test_role(&admin)
                    .await
                    .expect("Failed to create a role");
                let _ = assert_error_kind(
                    admin
                        .roles
                        .create_role(&RoleCreate::new(role.name.clone()))
                        .await,
                    ErrorKind::Conflict,
                );

                let project = ctx
                    .create_test_project(&admin)
                    .await
                    .expect("Failed to create a project");
                let _ = assert_error_kind(
                    admin
                        .roles
                        .assign_user_role_on_project(&project.id, rand_uuid(), &role.id)
                        .await,
                    ErrorKind::NotFound,
                );
            }
        })
    })
    .await;
}
