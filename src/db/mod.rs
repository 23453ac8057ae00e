//! Database access: pool bootstrap, per-operation context and SQL builders.

mod context;
mod pool;
pub mod sql;

pub use context::OpContext;
pub use pool::{AsyncDbPool, DatabaseCredentials, PgConnector, PoolConnector, RetryPolicy, connect};
