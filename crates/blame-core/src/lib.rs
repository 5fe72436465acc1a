pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod target;
pub mod trace;

pub use config::{ColorMode, Options, OptionsPatch};
pub use error::{BlameError, Result};
pub use model::{Call, Frame, Marker, Member, Method, SourceWindow, TraceOptions};
pub use render::{MemorySink, Sink, StderrSink, StdoutSink, Style};
pub use target::{Console, Target};
pub use trace::{SourceCache, SourceTrace, TraceService};
