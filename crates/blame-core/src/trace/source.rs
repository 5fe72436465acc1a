use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::model::{Frame, Marker, SourceWindow, TraceOptions};

use super::TraceService;

type Lines = Arc<Vec<String>>;

/// Reads source files on demand and keeps them for the life of the cache.
///
/// Paths recorded by the compiler are usually relative to the workspace root,
/// so relative paths are tried against each search root in order. Files that
/// cannot be read are remembered as missing and not retried.
#[derive(Debug)]
pub struct SourceCache {
    roots: Vec<PathBuf>,
    files: RwLock<HashMap<String, Option<Lines>>>,
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCache {
    /// Search the working directory and each of its ancestors.
    pub fn new() -> Self {
        let roots = std::env::current_dir()
            .map(|cwd| cwd.ancestors().map(Path::to_path_buf).collect())
            .unwrap_or_default();
        Self::with_roots(roots)
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            files: RwLock::new(HashMap::new()),
        }
    }

    /// All lines of `file`, or `None` when it cannot be found or read.
    pub fn lines(&self, file: &str) -> Option<Lines> {
        if let Some(cached) = self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(file)
        {
            return cached.clone();
        }

        tracing::debug!("Source cache miss: {file}");
        let loaded = self.load(file);
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file.to_string(), loaded.clone());
        loaded
    }

    /// Lines `[line - context_size, line + context_size]` clipped to the file.
    pub fn window(&self, file: &str, line: u32, context_size: usize) -> Option<SourceWindow> {
        let lines = self.lines(file)?;
        let last = u32::try_from(lines.len()).unwrap_or(u32::MAX);
        let context = u32::try_from(context_size).unwrap_or(u32::MAX);

        let start = line.saturating_sub(context).max(1);
        let end = line.saturating_add(context).min(last);
        if line == 0 || start > end {
            return None;
        }

        let rows = lines[(start - 1) as usize..end as usize].iter().cloned();
        Some(SourceWindow::from_lines(start, rows))
    }

    pub fn len(&self) -> usize {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn locate(&self, file: &str) -> Option<PathBuf> {
        let path = Path::new(file);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        self.roots
            .iter()
            .map(|root| root.join(path))
            .find(|candidate| candidate.is_file())
    }

    fn load(&self, file: &str) -> Option<Lines> {
        let Some(path) = self.locate(file) else {
            tracing::warn!("Source file not found: {file}");
            return None;
        };
        match fs::read_to_string(&path) {
            Ok(content) => Some(Arc::new(content.lines().map(String::from).collect())),
            Err(e) => {
                tracing::warn!("Failed to read source {}: {e}", path.display());
                None
            }
        }
    }
}

/// Default trace service: one frame per marker site, with a source window
/// read through a [`SourceCache`].
#[derive(Debug, Default)]
pub struct SourceTrace {
    cache: SourceCache,
}

impl SourceTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: SourceCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &SourceCache {
        &self.cache
    }

    /// A frame for an arbitrary position, decorated per `options`.
    pub fn frame_at(&self, file: &str, line: u32, column: u32, options: TraceOptions) -> Frame {
        let frame = Frame::new(file, line, column);
        if !options.sources {
            return frame;
        }
        match self.cache.window(file, line, options.context_size) {
            Some(window) => frame.with_source(window),
            None => frame,
        }
    }
}

impl TraceService for SourceTrace {
    fn resolve(&self, marker: &Marker, options: TraceOptions) -> Result<Vec<Frame>> {
        Ok(marker
            .sites()
            .iter()
            .map(|site| self.frame_at(site.file(), site.line(), site.column(), options))
            .collect())
    }
}
