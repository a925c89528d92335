use std::path::PathBuf;

use clap::{CommandFactory, Parser};

mod handlers;

use handlers::{CommandHandler, Context, printing, utils::WriteAdapter};
use waxlog_client::CatalogClient;
use waxlog_core::{config::Settings, logger::init_logger};

/// Options configurable via the CLI.
#[derive(Debug, Parser)]
#[command(name = "waxlog", version = env!("CARGO_PKG_VERSION"), about)]
struct Flags {
    /// config file path
    #[clap(long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Base URL of the catalog API, e.g. `https://waxlog.example/api`
    #[clap(long, value_hint = clap::ValueHint::Url)]
    api_base: Option<String>,
    /// Set the log level.
    #[clap(long)]
    log_level: Option<log::LevelFilter>,
    /// subcommand to run
    #[clap(subcommand)]
    subcommand: Option<handlers::Command>,
}

#[test]
fn verify_cli() {
    Flags::command().debug_assert();
}

#[cfg(not(tarpaulin_include))]
fn main() -> anyhow::Result<()> {
    clap_complete::CompleteEnv::with_factory(Flags::command).complete();

    let flags = Flags::parse();

    let config_file: PathBuf = match &flags.config {
        Some(config) => config.clone(),
        None => Settings::get_config_path()?,
    };
    let settings = Settings::init(config_file, flags.api_base, flags.log_level)?;

    init_logger(settings.client.log_level);

    let Some(command) = flags.subcommand else {
        eprintln!("No subcommand provided");
        return Ok(());
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result: anyhow::Result<()> = rt.block_on(async {
        let ctx = Context {
            client: CatalogClient::from_settings(&settings.client)?,
            pagination: settings.pagination,
        };

        let mut stdout_adapter = WriteAdapter(std::io::stdout());
        let mut stderr_adapter = WriteAdapter(std::io::stderr());

        command
            .handle(
                &ctx,
                &mut stdout_adapter,
                &mut stderr_adapter,
                &std::io::stdin(),
            )
            .await
    });

    if let Err(e) = result {
        log::debug!("command failed: {e:?}");
        eprint!("{}", printing::error(&e)?);
        std::process::exit(1);
    }

    Ok(())
}
