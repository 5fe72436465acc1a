use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BlameError;
use crate::model::TraceOptions;

const ENV_PREFIX: &str = "CONSOLE_BLAME_";

/// Whether location and source lines are decorated with ANSI styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Decorate when standard error is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean. `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

impl FromStr for ColorMode {
    type Err = BlameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" | "true" | "1" => Ok(ColorMode::Always),
            "never" | "false" | "0" => Ok(ColorMode::Never),
            other => Err(BlameError::Config(format!("unknown color mode: {other}"))),
        }
    }
}

/// Engine options. Formats use printf-style placeholders: `line_format`
/// receives `(line_number, code)`, `path_format` receives `(file, line, column)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    pub line_format: String,
    pub path_format: String,
    /// Number of lines printed before and after the call-site line.
    pub context_size: usize,
    /// Print the source window at all?
    pub sources: bool,
    pub color: ColorMode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            line_format: "%d | %s".to_string(),
            path_format: "%s:%d:%d".to_string(),
            context_size: 3,
            sources: true,
            color: ColorMode::Auto,
        }
    }
}

impl Options {
    /// Overlay every key set in `patch`, leaving the others untouched.
    pub fn merge(&mut self, patch: &OptionsPatch) {
        if let Some(line_format) = &patch.line_format {
            self.line_format = line_format.clone();
        }
        if let Some(path_format) = &patch.path_format {
            self.path_format = path_format.clone();
        }
        if let Some(context_size) = patch.context_size {
            self.context_size = context_size;
        }
        if let Some(sources) = patch.sources {
            self.sources = sources;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }

    pub fn trace_options(&self) -> TraceOptions {
        TraceOptions {
            sources: self.sources,
            context_size: self.context_size,
        }
    }
}

/// A partial set of options, as accepted by `configure`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorMode>,
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_format(mut self, format: impl Into<String>) -> Self {
        self.line_format = Some(format.into());
        self
    }

    pub fn path_format(mut self, format: impl Into<String>) -> Self {
        self.path_format = Some(format.into());
        self
    }

    pub fn context_size(mut self, size: usize) -> Self {
        self.context_size = Some(size);
        self
    }

    pub fn sources(mut self, sources: bool) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn color(mut self, color: ColorMode) -> Self {
        self.color = Some(color);
        self
    }

    /// Parse a JSON object such as `{"contextSize": 5, "lineFormat": "%d\t%s"}`.
    pub fn from_json(json: &str) -> Result<Self, BlameError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read `CONSOLE_BLAME_*` variables from the process environment.
    pub fn from_env() -> Result<Self, BlameError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Read options through an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BlameError> {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        let context_size = var("CONTEXT_SIZE")
            .map(|v| {
                v.trim()
                    .parse::<usize>()
                    .map_err(|e| BlameError::Config(format!("CONTEXT_SIZE={v}: {e}")))
            })
            .transpose()?;
        let sources = var("SOURCES")
            .map(|v| match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(BlameError::Config(format!("SOURCES={v}: expected a boolean"))),
            })
            .transpose()?;
        let color = var("COLOR").map(|v| v.parse::<ColorMode>()).transpose()?;

        Ok(Self {
            line_format: var("LINE_FORMAT"),
            path_format: var("PATH_FORMAT"),
            context_size,
            sources,
            color,
        })
    }

    /// Keys set in `other` win.
    pub fn and(mut self, other: OptionsPatch) -> Self {
        self.line_format = other.line_format.or(self.line_format);
        self.path_format = other.path_format.or(self.path_format);
        self.context_size = other.context_size.or(self.context_size);
        self.sources = other.sources.or(self.sources);
        self.color = other.color.or(self.color);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
