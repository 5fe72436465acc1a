pub mod frame;
pub mod method;

pub use frame::{Frame, Marker, SourceWindow, TraceOptions};
pub use method::{Call, Member, Method};
