//! Explicit teardown for process-wide resources.
//!
//! Store and cache clients are built once in `main`, shared behind `Arc`,
//! and closed through this trait after the server stops accepting requests.

use async_trait::async_trait;

#[async_trait]
pub trait Shutdown: Send + Sync {
    /// Name used in shutdown logs.
    fn name(&self) -> &'static str;

    /// Releases the resource. Calling it twice must be harmless.
    async fn shutdown(&self) -> anyhow::Result<()>;
}
