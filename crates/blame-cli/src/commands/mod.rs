pub mod demo;
pub mod show;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the location line and source window for a file position
    Show(show::ShowArgs),
    /// Trap the console, log a few lines, then restore it
    Demo(demo::DemoArgs),
}
