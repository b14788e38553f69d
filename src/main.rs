use clap::Parser;

use snipdesk::bootstrap::{init_tracing_subscriber, resolve_config, wire_dependencies};
use snipdesk::cli::{self, Cli, CliCommand};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let resolved = resolve_config(cli.config.as_deref())?;
    init_tracing_subscriber(&resolved.log_dir(), !cli.command.is_interactive())?;
    tracing::debug!(config = ?resolved.config, "configuration resolved");

    let mut stdout = std::io::stdout();
    match cli.command {
        CliCommand::Config { action } => cli::run_config(action, &resolved, &mut stdout),
        CliCommand::Snippets(command) => {
            let deps = wire_dependencies(&resolved.config).await?;
            cli::run(command, &deps, &mut stdout).await
        }
    }
}
