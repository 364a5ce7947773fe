use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use healthmon_core::{PatientRegistry, datetime};

mod menu;

use menu::Menu;

#[derive(Parser)]
#[command(name = "healthmon")]
#[command(about = "In-memory patient record manager with an interactive menu")]
struct Cli {
    /// Log level for healthmon crates; `RUST_LOG` covers everything else
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Main entry point for the healthmon menu
///
/// Loads `.env` if present, installs logging on stderr so it does not interleave with the
/// menu on stdout, then runs the menu against a fresh registry until the user exits.
/// All patient data is discarded when the process ends.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("healthmon_core={}", cli.log_level).parse()?)
                .add_directive(format!("healthmon_run={}", cli.log_level).parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("++ Starting healthmon menu");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut menu = Menu::new(PatientRegistry::new(), stdin.lock(), stdout.lock())
        .with_clock(datetime::now);
    menu.run()?;

    Ok(())
}
