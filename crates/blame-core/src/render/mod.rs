pub mod block;
pub mod sink;
pub mod style;
pub mod template;

pub use block::{location_line, source_lines};
pub use sink::{MemorySink, Sink, StderrSink, StdoutSink};
pub use style::Style;
