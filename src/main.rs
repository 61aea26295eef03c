use clap::Parser;
use tracing_subscriber::EnvFilter;

use replacer::{ReplacerArgs, ReplacerError};

/// Render `*.template` files in a workspace from a configuration file.
#[derive(Debug, Parser)]
#[command(name = "replacer", version)]
struct Cli {
    #[command(flatten)]
    args: ReplacerArgs,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let action = cli.args.action();
    let result = cli
        .args
        .into_builder()
        .and_then(|builder| builder.handle_and_print(&action));

    if let Err(e) = result {
        if let ReplacerError::TemplatesFailed { report, .. } = &e {
            eprintln!("{report}");
        }
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
