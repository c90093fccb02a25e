use clap::Parser;
use dotenvy::dotenv;
use safejourney::{
    config,
    core::{app::AppController, generator::generate_catalog},
    errors::Result,
    shell,
};
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "safejourney")]
#[command(about = "Browse a safety-rated study abroad catalog from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to $SAFEJOURNEY_CONFIG, then ./config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the generated catalog; overrides config and environment
    #[arg(long)]
    seed: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, value_parser = ["error", "warn", "info", "debug", "trace"], default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load .env first so RUST_LOG from it reaches the log filter
    let dotenv_path = dotenv();

    // 2. Initialize tracing; stdout belongs to the console, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    match dotenv_path {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }

    // 3. Load the application configuration
    let mut app_config = config::load_app_configuration(cli.config.as_deref())
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    if let Some(seed) = cli.seed {
        app_config.catalog.seed = Some(seed);
    }
    info!("Successfully processed application configuration.");

    // 4. Generate the catalog
    let catalog = generate_catalog(&app_config.catalog);
    let app = AppController::new(catalog, app_config.session.clone());

    // 5. Run the console
    shell::run_shell(app, app_config.timers).await
}
