//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::time::Duration;

use crate::db::{AsyncDbPool, OpContext};
use crate::repositories::Repositories;
use crate::services::Services;

/// Cloning is cheap since both Services and AsyncDbPool use Arc internally.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Direct access to the pool for health probes.
    pub db_pool: AsyncDbPool,
    pub app_name: String,
    /// Deadline given to every store operation started by a request.
    pub request_timeout: Duration,
    /// Cancelled on shutdown; request contexts derive from it.
    root: OpContext,
}

impl AppState {
    /// Builds repositories and services on top of `pool`.
    pub fn new(pool: AsyncDbPool, app_name: impl Into<String>, request_timeout: Duration) -> Self {
        let repos = Repositories::new(pool.clone());
        Self {
            services: Services::new(repos),
            db_pool: pool,
            app_name: app_name.into(),
            request_timeout,
            root: OpContext::new(),
        }
    }

    /// Context for one request's store calls.
    pub fn op_context(&self) -> OpContext {
        self.root.child().deadline_in(self.request_timeout)
    }

    /// Aborts every in-flight store operation.
    pub fn cancel_operations(&self) {
        self.root.cancel();
    }
}
