use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

mod cmd;
mod config;

fn cli() -> Command {
    cmd::add_build_args(
        Command::new("blogsmith")
            .about("Turn a folder of markdown posts into a blog, a homepage and an RSS feed")
            .version(env!("CARGO_PKG_VERSION"))
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("More output, repeat for more")
                    .action(ArgAction::Count)
                    .global(true),
            ),
    )
    .subcommand(cmd::build::make_subcommand())
    .subcommand(cmd::posts::make_subcommand())
    .subcommand(cmd::index::make_subcommand())
    .subcommand(cmd::feed::make_subcommand())
}

/// Plain text on stdout. `RUST_LOG` wins over `-v`.
fn init_tracing(args: &ArgMatches) {
    let filter = match args.get_count("verbose") {
        0 => "blogsmith=info,blogsmith_core=info",
        1 => "blogsmith=debug,blogsmith_core=debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stdout)
        .init();
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let Some((name, args)) = matches.subcommand() else {
        unreachable!("subcommand_required is set");
    };
    // Global args are propagated down into the subcommand's matches
    init_tracing(args);

    match name {
        "build" => cmd::build::execute(args),
        "posts" => cmd::posts::execute(args),
        "index" => cmd::index::execute(args),
        "feed" => cmd::feed::execute(args),
        _ => unreachable!("unknown subcommand {name}"),
    }
}
