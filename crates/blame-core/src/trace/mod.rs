pub mod source;

pub use source::{SourceCache, SourceTrace};

use crate::error::Result;
use crate::model::{Frame, Marker, TraceOptions};

/// Turns a captured [`Marker`] into caller frames, innermost first.
///
/// Implementations own path normalization, 1-based numbering and clipping of
/// source windows to the file's real line range.
pub trait TraceService: Send + Sync {
    fn resolve(&self, marker: &Marker, options: TraceOptions) -> Result<Vec<Frame>>;
}
