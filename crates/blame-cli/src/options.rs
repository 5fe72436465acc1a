use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use blame_core::{ColorMode, OptionsPatch};
use clap::Args;

/// Options shared by every subcommand. Precedence, lowest first: config file,
/// `CONSOLE_BLAME_*` environment variables, flags.
#[derive(Args, Debug, Default)]
pub struct OptionArgs {
    /// Lines of source shown before and after the call site
    #[arg(long, global = true)]
    pub context_size: Option<usize>,

    /// Source row format, placeholders: line number, code
    #[arg(long, global = true)]
    pub line_format: Option<String>,

    /// Location format, placeholders: file, line, column
    #[arg(long, global = true)]
    pub path_format: Option<String>,

    /// Print only the location, no source lines
    #[arg(long, global = true)]
    pub no_sources: bool,

    /// When to color output: auto, always, never
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// JSON file with options (keys: lineFormat, pathFormat, contextSize, sources, color)
    #[arg(long, global = true, env = "CONSOLE_BLAME_CONFIG")]
    pub config: Option<PathBuf>,
}

impl OptionArgs {
    pub fn patch(&self) -> Result<OptionsPatch> {
        let file = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                OptionsPatch::from_json(&json)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => OptionsPatch::default(),
        };
        let env = OptionsPatch::from_env().context("Invalid CONSOLE_BLAME_* variable")?;

        Ok(file.and(env).and(self.flags()))
    }

    fn flags(&self) -> OptionsPatch {
        OptionsPatch {
            line_format: self.line_format.clone(),
            path_format: self.path_format.clone(),
            context_size: self.context_size,
            sources: self.no_sources.then_some(false),
            color: self.color,
        }
    }
}
