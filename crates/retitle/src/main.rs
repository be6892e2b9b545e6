use crate::prelude::*;
use clap::Parser;

mod error;
mod inspect;
mod prelude;
mod rename;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Rename academic PDF papers after the titles extracted from them"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "RETITLE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Rename every PDF in a folder after its extracted title
    Rename(rename::Options),

    /// Show the metadata and extracted title of a single PDF
    Inspect(inspect::Options),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Rename(options) => rename::run(options, app.global),
        SubCommands::Inspect(options) => inspect::run(options, app.global),
    }
}
