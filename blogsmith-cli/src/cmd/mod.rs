use anyhow::{Context, Result};
use blogsmith_core::{Site, SiteBuilder};
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::BlogsmithConfig;

pub mod build;
pub mod feed;
pub mod index;
pub mod posts;

/// Options shared by every subcommand. No defaults here so that config
/// file and environment values are not shadowed.
pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("DIR")
                .help("Directory containing the markdown posts [default: ./source]")
                .global(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for generated files [default: .]")
                .global(true),
        )
        .arg(
            Arg::new("index")
                .long("index")
                .value_name("FILE")
                .help("Markdown for the homepage [default: ./index.md]")
                .global(true),
        )
        .arg(
            Arg::new("theme")
                .short('t')
                .long("theme")
                .value_name("DIR")
                .help("Directory of templates overriding the built-in ones [default: ./theme]")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file [default: ./blogsmith.toml]")
                .global(true),
        )
        .arg(
            Arg::new("converter")
                .long("converter")
                .value_name("BACKEND")
                .value_parser(["pandoc", "builtin"])
                .help("Markdown converter to use")
                .global(true),
        )
        .arg(
            Arg::new("no_lint")
                .long("no-lint")
                .help("Skip the local prose checks")
                .action(ArgAction::SetTrue)
                .global(true),
        )
}

/// Resolve configuration and assemble the site for one run.
pub fn load_site(args: &ArgMatches) -> Result<Site> {
    let config = BlogsmithConfig::load(args)?;
    let build = config.build_config().clone();

    SiteBuilder::new()
        .source_dir(&build.source)
        .output_dir(&build.output)
        .index_file(&build.index)
        .theme_dir(&build.theme)
        .config(config.site_config())
        .build()
        .with_context(|| format!("failed to set up site from {}", build.source))
}
