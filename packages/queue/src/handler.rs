//! Job handler trait and registry.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use ticket_core::{JobResult, QueuedJob};

/// Result type for job handlers.
pub type HandlerResult = Result<JobResult, String>;

/// Future type for async job handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

/// Trait for job handlers.
///
/// Implement this trait to define how jobs with a specific name are
/// processed. An `Err` propagates to the queue's retry policy.
pub trait JobHandler: Send + Sync + 'static {
    /// The job name this handler processes.
    fn name(&self) -> &str;

    /// Process a job and return the result.
    fn handle(&self, job: &QueuedJob) -> HandlerFuture;
}

/// Registry for job handlers.
///
/// Maps job names to their handlers for dynamic dispatch.
#[derive(Default)]
pub struct JobHandlerRegistry {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobHandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a job name.
    pub fn register<H: JobHandler>(&mut self, handler: H) {
        let name = handler.name().to_string();
        self.handlers.insert(name, Arc::new(handler));
    }

    /// Get a handler for a job name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn JobHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Check if a handler exists for a job name.
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// List all registered job names.
    pub fn job_names(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }
}

/// A simple function-based job handler.
pub struct FnHandler<F>
where
    F: Fn(&QueuedJob) -> HandlerFuture + Send + Sync + 'static,
{
    name: String,
    handler: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&QueuedJob) -> HandlerFuture + Send + Sync + 'static,
{
    /// Create a new function-based handler.
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> JobHandler for FnHandler<F>
where
    F: Fn(&QueuedJob) -> HandlerFuture + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, job: &QueuedJob) -> HandlerFuture {
        (self.handler)(job)
    }
}
