use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;

/// Source lines around a call site, keyed by absolute 1-based line number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceWindow(BTreeMap<u32, String>);

impl SourceWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a window whose first entry is line `first`.
    pub fn from_lines<I, S>(first: u32, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            (first..)
                .zip(lines)
                .map(|(number, code)| (number, code.into()))
                .collect(),
        )
    }

    pub fn insert(&mut self, line: u32, code: impl Into<String>) {
        self.0.insert(line, code.into());
    }

    pub fn get(&self, line: u32) -> Option<&str> {
        self.0.get(&line).map(String::as_str)
    }

    /// Rows in ascending line order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.0.iter().map(|(number, code)| (*number, code.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last_line(&self) -> Option<u32> {
        self.0.keys().next_back().copied()
    }
}

/// A resolved caller location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub file: String,
    /// 1-based.
    pub line: u32,
    /// 1-based.
    pub column: u32,
    pub source: Option<SourceWindow>,
}

impl Frame {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            source: None,
        }
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line(), location.column())
    }

    pub fn with_source(mut self, source: SourceWindow) -> Self {
        self.source = Some(source);
        self
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// What the trace service should attach to each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceOptions {
    pub sources: bool,
    pub context_size: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            sources: true,
            context_size: 3,
        }
    }
}

/// A captured call stack, innermost site first.
///
/// Index 0 is always the site that took the capture (the wrapper itself);
/// index 1 is the code that invoked the wrapped method.
#[derive(Debug, Clone)]
pub struct Marker {
    sites: Vec<&'static Location<'static>>,
}

impl Marker {
    /// Capture a marker for a call that originated at `origin`.
    #[track_caller]
    pub fn capture(origin: &'static Location<'static>) -> Self {
        Self {
            sites: vec![Location::caller(), origin],
        }
    }

    pub fn from_sites(sites: Vec<&'static Location<'static>>) -> Self {
        Self { sites }
    }

    pub fn sites(&self) -> &[&'static Location<'static>] {
        &self.sites
    }
}
