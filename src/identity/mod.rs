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

//! Identity API (v3) clients.
//!
//! Administrative clients for tokens, projects, users, roles and domains.
//! Authentication itself lives in the [auth](../auth/index.html) module.

mod domains;
mod projects;
mod protocol;
mod roles;
mod tokens;
mod users;

pub use self::domains::DomainsClient;
pub use self::projects::ProjectsClient;
pub use self::protocol::*;
pub use self::roles::RolesClient;
pub use self::tokens::TokensClient;
pub use self::users::UsersClient;
