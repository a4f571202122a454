use clap::{Parser, Subcommand};
use hitwatch_core::cli;
use hitwatch_core::cli::watch::WatchArgs;
use hitwatch_core::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "hitwatch",
    version,
    about = "hitwatch: live access-log traffic monitor"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow an access log and print traffic reports and alerts
    Watch(WatchArgs),

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: cli::conf::ConfigCmd,
    },

    /// Replay a log file into another one, about one line per second
    Emit(cli::emit::EmitArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging();

    match cli.command {
        Command::Watch(args) => cli::watch::run(args),
        Command::Config { cmd } => cli::conf::run(cmd),
        Command::Emit(args) => cli::emit::run(args),
    }
}
