use anyhow::Result;
use clap::{ArgMatches, Command};

use super::load_site;

pub fn make_subcommand() -> Command {
    Command::new("index").about("Render the homepage")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let site = load_site(args)?;
    let path = site.render_index()?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}
