//! Point d'entrée CLI pour landxml-cli

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// `.env` du répertoire courant, sinon celui placé à côté de l'exécutable
/// (ex: `LANDXML_CONFIG=minimal`)
fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(".env")));
    if let Some(path) = beside_exe {
        let _ = dotenvy::from_path(path);
    }
}

mod cli;

use cli::Commands;

/// Inspecter les plans LandXML et les exporter en GeoJSON
#[derive(Parser)]
#[command(name = "landxml-cli")]
#[command(author, version)]
#[command(about = "Inspecter les plans LandXML et exporter monuments et parcelles en GeoJSON")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Info { path } => {
            cli::cmd_info(&path)?;
        }
        Commands::ToGeojson {
            path,
            output,
            config,
            report,
            jobs,
        } => {
            info!(path = %path.display(), output = %output.display(), "Export vers GeoJSON");
            cli::cmd_export(&path, &output, config.as_deref(), report.as_deref(), jobs)?;
        }
    }

    Ok(())
}

/// Niveau issu de `-q`/`-v`; `RUST_LOG` affine par module (ex: `landxml=trace`)
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
