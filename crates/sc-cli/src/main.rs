use clap::Parser;
use sc_cli::{commands, Cli, Commands, Console};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn dispatch(cli: &Cli, console: &mut Console<'_>) -> anyhow::Result<ExitCode> {
    let workdir = cli.workdir()?;
    match &cli.command {
        Commands::Run(args) => {
            commands::run::execute(args, workdir, console)?;
        }
        Commands::Generate(args) => commands::generate::execute(args, console)?,
        Commands::Setup => {
            let existing = commands::setup::execute(workdir, console)?;
            return Ok(ExitCode::from(existing.min(u8::MAX as usize) as u8));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose());

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();
    let mut console = Console {
        stdin: &mut stdin,
        stdout: &mut stdout,
        stderr: &mut stderr,
    };

    match dispatch(&cli, &mut console) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
