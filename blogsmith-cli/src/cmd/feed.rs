use anyhow::Result;
use clap::{ArgMatches, Command};

use super::load_site;

pub fn make_subcommand() -> Command {
    Command::new("feed").about("Generate the RSS feed from the posts")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    load_site(args)?.render_feed()?;
    Ok(())
}
