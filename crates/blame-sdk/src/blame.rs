use std::sync::{Arc, PoisonError};

use blame_core::{Console, Options, OptionsPatch, Sink, SourceTrace, StderrSink, Target, TraceService};

use crate::middleware::{ChainKey, Middleware};
use crate::pipeline::{self, Shared};
use crate::registry::Interceptor;

/// Traps console methods so every call also prints where it came from.
///
/// Wrappers keep working after the engine is dropped. [`ConsoleBlame::restore`]
/// on any engine over the same target detaches them.
pub struct ConsoleBlame<T: Target = Console> {
    interceptor: Interceptor<T>,
    shared: Arc<Shared>,
}

impl ConsoleBlame<Console> {
    /// An engine over the process-wide console.
    pub fn global() -> Self {
        Self::new(Console::global())
    }
}

impl<T: Target> ConsoleBlame<T> {
    /// Reads sources from disk and writes annotations to standard error.
    pub fn new(target: T) -> Self {
        Self::with_parts(target, Arc::new(SourceTrace::new()), Arc::new(StderrSink))
    }

    /// Supply the trace service and output sink explicitly.
    pub fn with_parts(target: T, trace: Arc<dyn TraceService>, sink: Arc<dyn Sink>) -> Self {
        Self {
            interceptor: Interceptor::new(target),
            shared: Arc::new(Shared::new(trace, sink)),
        }
    }

    pub fn target(&self) -> &T {
        self.interceptor.target()
    }

    /// Current options.
    pub fn options(&self) -> Options {
        self.shared.options()
    }

    /// Overlay `patch` onto the current options. Applies to wrappers that
    /// are already installed.
    pub fn configure(&mut self, patch: &OptionsPatch) -> &mut Self {
        self.shared
            .options
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(patch);
        tracing::debug!("Configured: {patch:?}");
        self
    }

    /// Trap the named methods. Unknown, non-callable or already trapped
    /// names are skipped.
    pub fn trap<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let shared = &self.shared;
        self.interceptor
            .install(names, |name, original| pipeline::wrap(name, original, shared.clone()));
        self
    }

    /// Trap every method the target currently has.
    pub fn trap_all(&mut self) -> &mut Self {
        let shared = &self.shared;
        self.interceptor
            .install_all(|name, original| pipeline::wrap(name, original, shared.clone()));
        self
    }

    /// Put back every trapped original, including those trapped by engines
    /// that no longer exist.
    pub fn restore(&mut self) -> &mut Self {
        self.interceptor.restore();
        self
    }

    pub fn restore_one(&mut self, name: &str) -> &mut Self {
        self.interceptor.restore_one(name);
        self
    }

    pub fn is_trapped(&self, name: &str) -> bool {
        self.interceptor.is_trapped(name)
    }

    pub fn trapped(&self) -> Vec<String> {
        self.interceptor.trapped().map(String::from).collect()
    }

    /// Append a stage to the chain it is tagged with.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        let key = middleware.key();
        self.shared
            .middleware
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(middleware);
        tracing::debug!("Added {key} middleware");
        self
    }

    /// Append several stages, in order.
    pub fn use_all(&mut self, middleware: impl IntoIterator<Item = Middleware>) -> &mut Self {
        for m in middleware {
            self.use_middleware(m);
        }
        self
    }

    /// Number of stages registered for `key`.
    pub fn middleware_len(&self, key: ChainKey) -> usize {
        self.shared.middleware().len(key)
    }
}
