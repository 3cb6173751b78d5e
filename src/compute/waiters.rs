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

//! Waiting for servers to change their state.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};

use super::super::common::Waiter;
use super::super::{Error, ErrorKind, Result};
use super::protocol::{Server, ServerStatus};
use super::servers::ServersClient;

/// Waiter for a server to reach a status.
#[derive(Debug)]
pub struct ServerStatusWaiter {
    client: ServersClient,
    id: String,
    target: ServerStatus,
    ready_wait: bool,
    interval: Duration,
    timeout: Duration,
    last_status: Option<ServerStatus>,
    last_task_state: Option<String>,
}

/// Waiter for a server to disappear.
#[derive(Debug)]
pub struct ServerTerminationWaiter {
    client: ServersClient,
    id: String,
    ignore_error: bool,
    interval: Duration,
    timeout: Duration,
    last_status: Option<ServerStatus>,
}

impl ServerStatusWaiter {
    /// Create a waiter.
    ///
    /// With `ready_wait` the server must also have no task in progress.
    pub fn new<S: Into<String>>(
        client: ServersClient,
        id: S,
        target: ServerStatus,
        ready_wait: bool,
        interval: Duration,
        timeout: Duration,
    ) -> ServerStatusWaiter {
        ServerStatusWaiter {
            client,
            id: id.into(),
            target,
            ready_wait,
            interval,
            timeout,
            last_status: None,
            last_task_state: None,
        }
    }
}

#[async_trait]
impl Waiter<Server> for ServerStatusWaiter {
    fn default_wait_timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    fn default_delay(&self) -> Duration {
        self.interval
    }

    fn timeout_error(&self) -> Error {
        Error::new(
            ErrorKind::TimedOut,
            format!(
                "Server {} failed to reach {} status and task state \"None\" within \
                 the required time ({} s). Current status: {}. Current task state: {}.",
                self.id,
                self.target,
                self.timeout.as_secs(),
                self.last_status.unwrap_or_default(),
                self.last_task_state.as_deref().unwrap_or("None"),
            ),
        )
    }

    async fn poll(&mut self) -> Result<Option<Server>> {
        let server = self.client.show_server(&self.id).await?;
        let status = server.status;
        if self.last_status != Some(status) || self.last_task_state != server.task_state {
            debug!(
                "Server {} is now in status {} with task state {:?}",
                self.id, status, server.task_state
            );
        }
        self.last_status = Some(status);
        self.last_task_state = server.task_state.clone();

        if self.target == ServerStatus::Building && status != ServerStatus::Unknown {
            return Ok(Some(server));
        }

        if status == self.target {
            if !self.ready_wait || server.task_state.is_none() {
                debug!("Server {} reached status {}", self.id, self.target);
                return Ok(Some(server));
            }
        } else if status == ServerStatus::Error {
            let details = server
                .fault
                .as_ref()
                .map(|fault| format!(": {}", fault.message))
                .unwrap_or_default();
            return Err(Error::new(
                ErrorKind::BuildError,
                format!("Server {} failed to build and is in ERROR status{}", self.id, details),
            ));
        }

        trace!(
            "Still waiting for server {} to reach {}, current is {}",
            self.id,
            self.target,
            status
        );
        Ok(None)
    }
}

impl ServerTerminationWaiter {
    /// Create a waiter.
    ///
    /// Unless `ignore_error` is set, a server in `ERROR` fails the wait.
    pub fn new<S: Into<String>>(
        client: ServersClient,
        id: S,
        ignore_error: bool,
        interval: Duration,
        timeout: Duration,
    ) -> ServerTerminationWaiter {
        ServerTerminationWaiter {
            client,
            id: id.into(),
            ignore_error,
            interval,
            timeout,
            last_status: None,
        }
    }
}

#[async_trait]
impl Waiter<()> for ServerTerminationWaiter {
    fn default_wait_timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    fn default_delay(&self) -> Duration {
        self.interval
    }

    fn timeout_error(&self) -> Error {
        Error::new(
            ErrorKind::TimedOut,
            format!(
                "Server {} failed to delete within the required time ({} s). \
                 Current status: {}.",
                self.id,
                self.timeout.as_secs(),
                self.last_status.unwrap_or_default(),
            ),
        )
    }

    async fn poll(&mut self) -> Result<Option<()>> {
        let server = match self.client.show_server(&self.id).await {
            Ok(server) => server,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Server {} was deleted", self.id);
                return Ok(Some(()));
            }
            Err(e) => return Err(e),
        };
        self.last_status = Some(server.status);

        if server.status == ServerStatus::Error && !self.ignore_error {
            return Err(Error::new(
                ErrorKind::DeleteError,
                format!("Server {} failed to delete and is in ERROR status", self.id),
            ));
        }

        trace!(
            "Still waiting for server {} to be deleted, current status is {}",
            self.id,
            server.status
        );
        Ok(None)
    }
}

/// Wait for a server to reach the given status.
pub async fn wait_for_server_status<S: Into<String>>(
    client: &ServersClient,
    id: S,
    status: ServerStatus,
    ready_wait: bool,
    interval: Duration,
    timeout: Duration,
) -> Result<Server> {
    ServerStatusWaiter::new(client.clone(), id, status, ready_wait, interval, timeout)
        .wait()
        .await
}

/// Wait for a server to be deleted.
pub async fn wait_for_server_termination<S: Into<String>>(
    client: &ServersClient,
    id: S,
    ignore_error: bool,
    interval: Duration,
    timeout: Duration,
) -> Result<()> {
    ServerTerminationWaiter::new(client.clone(), id, ignore_error, interval, timeout)
        .wait()
        .await
}
