use anyhow::Result;
use blame_core::render::{location_line, source_lines};
use blame_core::{Options, OptionsPatch, Sink, SourceTrace, StdoutSink};
use clap::Args;

#[derive(Args)]
pub struct ShowArgs {
    /// Source file, absolute or relative to the current directory
    pub file: String,

    /// 1-based line of the call site
    #[arg(short, long)]
    pub line: u32,

    /// 1-based column of the call site
    #[arg(short, long, default_value = "1")]
    pub column: u32,
}

pub fn run(args: &ShowArgs, patch: &OptionsPatch) -> Result<()> {
    let mut options = Options::default();
    options.merge(patch);

    let trace = SourceTrace::new();
    if options.sources && trace.cache().lines(&args.file).is_none() {
        anyhow::bail!("Cannot read source file '{}'", args.file);
    }
    let frame = trace.frame_at(&args.file, args.line, args.column, options.trace_options());
    if options.sources && frame.source.is_none() {
        tracing::warn!("Line {} is outside {}", args.line, args.file);
    }

    let sink = StdoutSink;
    let colors = options.color.should_use_colors(sink.is_terminal());
    sink.write_line(&location_line(&options, &frame, colors))?;
    for line in source_lines(&options, &frame, colors) {
        sink.write_line(&line)?;
    }
    Ok(())
}
