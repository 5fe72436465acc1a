//! Trap console methods so every call also reports where it came from.
//!
//! # Example
//! ```no_run
//! use blame_sdk::{ConsoleBlame, Middleware, OptionsPatch};
//! use serde_json::json;
//!
//! let mut blame = ConsoleBlame::global();
//! blame
//!     .trap(["log", "error"])
//!     .configure(&OptionsPatch::new().context_size(2))
//!     .use_middleware(Middleware::file(|next, frame| {
//!         let mut frame = frame.clone();
//!         frame.file = frame.file.replace("crates/", "");
//!         next.run_with(&frame)
//!     }));
//!
//! blame.target().log(&[json!("hello")]).unwrap(); // prints location and source
//! blame.restore();
//! ```

mod blame;
mod middleware;
mod pipeline;
mod registry;

pub use blame::ConsoleBlame;
pub use middleware::{Args, Chain, ChainKey, Middleware, MiddlewareRegistry, Next, Stage};
pub use registry::Interceptor;

// Re-export core types that SDK users may need
pub use blame_core::{
    BlameError, Call, ColorMode, Console, Frame, MemorySink, Method, Options, OptionsPatch, Sink,
    SourceTrace, SourceWindow, StderrSink, Target, TraceService,
};
