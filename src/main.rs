use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sealbox::config::{Config, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.merge_cli(&cli);
    settings.validate();

    // Run the command
    sealbox::ops::run(cli, settings).await
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("sealbox=debug")
    } else {
        EnvFilter::new("sealbox=info")
    };

    // Stdout belongs to the command output; logs go to stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
