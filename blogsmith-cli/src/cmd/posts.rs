use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

use super::load_site;

pub fn make_subcommand() -> Command {
    Command::new("posts")
        .about("Render blog posts to HTML")
        .arg(
            Arg::new("filter")
                .value_name("FILE_NAME")
                .help("Only render posts whose file name contains this text"),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let site = load_site(args)?;
    let filter = args.get_one::<String>("filter").map(String::as_str);

    let (written, _) = site.render_posts(filter)?;
    if written.is_empty() {
        tracing::warn!("no posts matched");
    }

    Ok(())
}
