//! Lifetime scope for requests issued by a view.
//!
//! A view owns one [`ViewScope`]. Work started through the scope races
//! against the scope's cancellation token; once the scope is torn down
//! (explicitly or by drop) pending work is cancelled and any result that
//! still arrives is discarded instead of being applied.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cancellation scope tied to one view's lifetime.
///
/// Dropping the scope tears it down.
#[derive(Debug)]
pub struct ViewScope {
    name: &'static str,
    cancel_token: CancellationToken,
    /// Held while a completion is applied; cleared by teardown.
    alive: Arc<Mutex<bool>>,
}

impl ViewScope {
    /// New active scope. `name` labels log lines.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cancel_token: CancellationToken::new(),
            alive: Arc::new(Mutex::new(true)),
        }
    }

    /// Whether the scope has not been torn down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.cancel_token.is_cancelled()
    }

    /// Token cancelled when the scope is torn down.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Await `fut` unless the scope is torn down first.
    ///
    /// Returns `None` when the scope ends before `fut` completes.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            () = self.cancel_token.cancelled() => None,
            out = fut => self.is_active().then_some(out),
        }
    }

    /// Spawn `fut` and hand its output to `apply` if the scope is still
    /// active when it completes.
    ///
    /// The task resolves to `true` when `apply` ran and `false` when the
    /// result was discarded. Teardown never returns while `apply` is running,
    /// so nothing is applied after teardown.
    pub fn spawn_with<F, A>(&self, fut: F, apply: A) -> JoinHandle<bool>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
        A: FnOnce(F::Output) + Send + 'static,
    {
        let token = self.cancel_token.clone();
        let alive = Arc::clone(&self.alive);
        let name = self.name;

        tokio::spawn(async move {
            let out = tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(target: "campus.views", view = name, "Request cancelled by teardown");
                    return false;
                }
                out = fut => out,
            };

            let alive = alive.lock().unwrap_or_else(PoisonError::into_inner);
            if !*alive {
                debug!(target: "campus.views", view = name, "Late completion discarded");
                return false;
            }
            apply(out);
            true
        })
    }

    /// End the scope: cancel pending work and refuse later completions.
    pub fn teardown(&self) {
        let mut alive = self.alive.lock().unwrap_or_else(PoisonError::into_inner);
        if *alive {
            *alive = false;
            self.cancel_token.cancel();
            debug!(target: "campus.views", view = self.name, "View torn down");
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.teardown();
    }
}
