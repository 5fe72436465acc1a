use std::sync::{Arc, PoisonError, RwLock};

use blame_core::render::{location_line, source_lines};
use blame_core::{BlameError, Call, Frame, Marker, Method, Options, Result, Sink, TraceService};

use crate::middleware::{Args, MiddlewareRegistry};

/// Position of the invoking call site in a resolved marker. Index 0 is the
/// wrapper itself.
const CALLER_FRAME: usize = 1;

/// State shared by an engine and every wrapper it generated.
pub(crate) struct Shared {
    pub(crate) options: RwLock<Options>,
    pub(crate) middleware: RwLock<MiddlewareRegistry>,
    pub(crate) trace: Arc<dyn TraceService>,
    pub(crate) sink: Arc<dyn Sink>,
}

impl Shared {
    pub(crate) fn new(trace: Arc<dyn TraceService>, sink: Arc<dyn Sink>) -> Self {
        Self {
            options: RwLock::new(Options::default()),
            middleware: RwLock::new(MiddlewareRegistry::default()),
            trace,
            sink,
        }
    }

    pub(crate) fn options(&self) -> Options {
        self.options
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn middleware(&self) -> MiddlewareRegistry {
        self.middleware
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Build the generated wrapper for `original`.
pub(crate) fn wrap(name: &str, original: Method, shared: Arc<Shared>) -> Method {
    let name = name.to_string();
    Method::generated(original.clone(), move |call| run(&shared, &name, &original, call))
}

/// One intercepted call: `console` chain, frame resolution, `file` chain,
/// `code` chain. Options and stages are snapshotted up front so a stage may
/// reconfigure the engine mid-call.
fn run(shared: &Shared, name: &str, original: &Method, call: &Call<'_>) -> Result<()> {
    let options = shared.options();
    let middleware = shared.middleware();
    tracing::trace!(
        "Intercepted `{name}` from {}:{}",
        call.origin.file(),
        call.origin.line()
    );

    let args: Args = call.args.to_vec();
    middleware
        .console
        .dispatch(&args, &|args: &Args| original.invoke(&call.with_args(args)))?;

    let marker = Marker::capture(call.origin);
    let frames = shared.trace.resolve(&marker, options.trace_options())?;
    let len = frames.len();
    let frame = frames
        .into_iter()
        .nth(CALLER_FRAME)
        .ok_or(BlameError::MissingFrame {
            index: CALLER_FRAME,
            len,
        })?;

    let colors = options.color.should_use_colors(shared.sink.is_terminal());
    middleware.file.dispatch(&frame, &|frame: &Frame| {
        shared
            .sink
            .write_line(&location_line(&options, frame, colors))?;
        Ok(())
    })?;
    middleware.code.dispatch(&frame, &|frame: &Frame| {
        for line in source_lines(&options, frame, colors) {
            shared.sink.write_line(&line)?;
        }
        Ok(())
    })?;

    Ok(())
}
