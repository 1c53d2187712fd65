//! Logger capability
//!
//! The logger is a [`tracing::Dispatch`], the handle `tracing` uses for a
//! configured subscriber. Carrying it on the context lets a request log to
//! its own subscriber without installing a process-wide default.

use crate::context::Context;
use crate::key::CapabilityKind;
use tracing::{Dispatch, Subscriber};

/// Structured logging handle
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Wrap an existing dispatch
    #[inline]
    #[must_use]
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Build from any subscriber
    #[must_use]
    pub fn from_subscriber<S>(subscriber: S) -> Self
    where
        S: Subscriber + Send + Sync + 'static,
    {
        Self::new(Dispatch::new(subscriber))
    }

    /// Underlying dispatch
    #[inline]
    #[must_use]
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the current thread's default subscriber
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl From<Dispatch> for Logger {
    fn from(dispatch: Dispatch) -> Self {
        Self::new(dispatch)
    }
}

/// Capability kind for the logger
#[derive(Debug, Clone, Copy)]
pub struct LoggerKind;

impl CapabilityKind for LoggerKind {
    type Value = Logger;
    const NAME: &'static str = "logger";
}

/// Derive a context carrying `logger`
#[inline]
#[must_use]
pub fn with_logger(ctx: &Context, logger: Logger) -> Context {
    ctx.attach::<LoggerKind>(logger)
}

/// Logger on `ctx`, or `None` if none is configured
#[inline]
#[must_use]
pub fn logger_from(ctx: &Context) -> Option<Logger> {
    ctx.retrieve::<LoggerKind>().cloned()
}
