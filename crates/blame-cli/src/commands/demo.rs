use anyhow::{Context, Result};
use blame_core::OptionsPatch;
use blame_sdk::ConsoleBlame;
use clap::Args;
use serde_json::json;

#[derive(Args)]
pub struct DemoArgs {
    /// Method to trap (repeatable; default: every console method)
    #[arg(short, long = "trap", value_name = "METHOD")]
    pub methods: Vec<String>,

    /// Message passed to console.log
    #[arg(default_value = "hello from console-blame")]
    pub message: String,
}

pub fn run(args: &DemoArgs, patch: &OptionsPatch) -> Result<()> {
    let mut blame = ConsoleBlame::global();
    blame.configure(patch);
    if args.methods.is_empty() {
        blame.trap_all();
    } else {
        blame.trap(&args.methods);
    }
    tracing::info!("Trapped: {}", blame.trapped().join(", "));

    let console = blame.target().clone();
    console
        .log(&[json!(args.message)])
        .context("console.log failed")?;
    console
        .warn(&[json!("%d method(s) trapped"), json!(blame.trapped().len())])
        .context("console.warn failed")?;

    blame.restore();
    console
        .log(&[json!("console restored, this line is not annotated")])
        .context("console.log failed")?;
    Ok(())
}
