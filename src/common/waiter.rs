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

//! Waiters.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use tokio::time::{sleep, Instant};

use super::super::{Error, ErrorKind, Result};

/// A bounded poll loop.
///
/// Implementors provide a single `poll` step, the loop itself is provided.
#[async_trait]
pub trait Waiter<T: Send>: Send {
    /// Default timeout for this action.
    ///
    /// `None` means waiting forever.
    fn default_wait_timeout(&self) -> Option<Duration>;

    /// Default delay between two retries.
    fn default_delay(&self) -> Duration;

    /// Error to return on timeout.
    fn timeout_error(&self) -> Error;

    /// Update the current state of the action.
    ///
    /// Returns `Some(T)` once the action is finished.
    async fn poll(&mut self) -> Result<Option<T>>;

    /// Wait for the default amount of time.
    async fn wait(self) -> Result<T>
    where
        Self: Sized,
    {
        let timeout = self.default_wait_timeout();
        self.wait_for_optional(timeout).await
    }

    /// Wait for the given amount of time.
    async fn wait_for(self, timeout: Duration) -> Result<T>
    where
        Self: Sized,
    {
        self.wait_for_optional(Some(timeout)).await
    }

    /// Wait for an optional timeout.
    async fn wait_for_optional(mut self, timeout: Option<Duration>) -> Result<T>
    where
        Self: Sized,
    {
        let start = Instant::now();
        loop {
            if let Some(result) = self.poll().await? {
                return Ok(result);
            }

            if let Some(duration) = timeout {
                if start.elapsed() >= duration {
                    return Err(self.timeout_error());
                }
            }

            sleep(self.default_delay()).await;
        }
    }
}

/// Wait for resource deletion.
///
/// The probe is expected to fetch the resource; the resource is considered
/// deleted once the probe fails with `NotFound`.
#[derive(Debug)]
pub struct DeletionWaiter<F> {
    probe: F,
    description: String,
    wait_timeout: Duration,
    delay: Duration,
}

impl<F> DeletionWaiter<F> {
    /// Create a new waiter.
    pub fn new<S: Into<String>>(
        description: S,
        probe: F,
        wait_timeout: Duration,
        delay: Duration,
    ) -> DeletionWaiter<F> {
        DeletionWaiter {
            probe,
            description: description.into(),
            wait_timeout,
            delay,
        }
    }
}

#[async_trait]
impl<F, Fut> Waiter<()> for DeletionWaiter<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<()>> + Send,
{
    fn default_wait_timeout(&self) -> Option<Duration> {
        Some(self.wait_timeout)
    }

    fn default_delay(&self) -> Duration {
        self.delay
    }

    fn timeout_error(&self) -> Error {
        Error::new(
            ErrorKind::TimedOut,
            format!(
                "Failed to delete {} within the required time ({} s)",
                self.description,
                self.wait_timeout.as_secs()
            ),
        )
    }

    async fn poll(&mut self) -> Result<Option<()>> {
        match (self.probe)().await {
            Ok(()) => {
                trace!("Still waiting for {} to be deleted", self.description);
                Ok(None)
            }
            Err(ref e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} was deleted", self.description);
                Ok(Some(()))
            }
            Err(e) => {
                debug!("Failed to delete {} - {}", self.description, e);
                Err(e)
            }
        }
    }
}
