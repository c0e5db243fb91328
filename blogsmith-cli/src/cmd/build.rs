use anyhow::Result;
use clap::{ArgMatches, Command};

use super::load_site;

pub fn make_subcommand() -> Command {
    Command::new("build").about("Render the homepage, every post and the RSS feed")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let site = load_site(args)?;
    let summary = site.render_all()?;

    tracing::info!(
        "wrote {} pages and {}",
        summary.pages.len(),
        summary
            .feed
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "no feed".into())
    );
    if summary.suggestions > 0 {
        tracing::info!("{} writing suggestions, see above", summary.suggestions);
    }

    Ok(())
}
