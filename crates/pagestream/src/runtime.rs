//! The tokio runtime list controllers spawn fetches on.
//!
//! Inside an async context the ambient runtime is used. Elsewhere, e.g. from
//! a GUI thread, a shared multi-threaded runtime is created on first use.
//! Call [`init_global`] before that to configure it.

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

static GLOBAL_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Errors from runtime setup.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The tokio runtime could not be built.
    #[error("failed to create async runtime: {0}")]
    CreationFailed(#[from] std::io::Error),
    /// [`init_global`] was called after the runtime already existed.
    #[error("global async runtime is already initialized")]
    AlreadyInitialized,
}

/// Settings for the shared runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Worker thread count. Defaults to the number of cores.
    pub worker_threads: Option<usize>,
    /// Name prefix for runtime threads.
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "pagestream-io".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Set the number of worker threads.
    pub fn with_worker_threads(mut self, count: usize) -> Self {
        self.worker_threads = Some(count);
        self
    }

    /// Set the thread name prefix.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    fn build(&self) -> Result<Runtime, RuntimeError> {
        let mut builder = Builder::new_multi_thread();
        builder.thread_name(&self.thread_name).enable_all();
        if let Some(workers) = self.worker_threads {
            builder.worker_threads(workers);
        }
        Ok(builder.build()?)
    }
}

/// Create the shared runtime with `config`.
pub fn init_global(config: RuntimeConfig) -> Result<&'static Runtime, RuntimeError> {
    let runtime = config.build()?;
    GLOBAL_RUNTIME
        .set(runtime)
        .map_err(|_| RuntimeError::AlreadyInitialized)?;
    global()
}

/// The shared runtime, created with default settings on first use.
///
/// Must not be first called from inside an async context.
pub fn global() -> Result<&'static Runtime, RuntimeError> {
    if let Some(runtime) = GLOBAL_RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = RuntimeConfig::default().build()?;
    Ok(GLOBAL_RUNTIME.get_or_init(move || runtime))
}

/// A handle to the ambient runtime if there is one, else to the shared one.
pub fn handle() -> Result<Handle, RuntimeError> {
    match Handle::try_current() {
        Ok(handle) => Ok(handle),
        Err(_) => Ok(global()?.handle().clone()),
    }
}

/// Spawn `future` on [`handle`]'s runtime.
pub fn spawn<F>(future: F) -> Result<JoinHandle<F::Output>, RuntimeError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    Ok(handle()?.spawn(future))
}

/// Run `future` to completion on the shared runtime, blocking this thread.
///
/// Must not be called from inside an async context.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, RuntimeError> {
    Ok(global()?.block_on(future))
}
