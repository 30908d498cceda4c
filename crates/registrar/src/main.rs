// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registrar - university academic-records backend.
//!
//! This is the binary entry point for the Registrar server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod serve;
mod shutdown;

use clap::{Parser, Subcommand};
use registrar_config::RegistrarConfig;
use registrar_core::RegistrarError;

/// Registrar - semester registration, enrollment and term rollover.
#[derive(Parser, Debug)]
#[command(name = "registrar", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Run diagnostic checks against the environment.
    Doctor {
        /// Run additional intensive checks.
        #[arg(long)]
        deep: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

fn load_config(path: Option<&std::path::Path>) -> RegistrarConfig {
    let loaded = match path {
        Some(path) => registrar_config::load_and_validate_path(path),
        None => registrar_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            registrar_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

async fn run_migrate(config: &RegistrarConfig) -> Result<(), RegistrarError> {
    let db = registrar_storage::Database::open_with(
        &config.storage.database_path,
        config.storage.wal_mode,
    )
    .await?;
    db.close().await?;
    println!(
        "registrar: migrations applied to {}",
        config.storage.database_path
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Migrate) => run_migrate(&config).await,
        Some(Commands::Doctor { deep, plain }) => {
            doctor::run_doctor(&config, cli.config.as_deref(), deep, plain).await
        }
        None => {
            println!("registrar: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("registrar: {e}");
        std::process::exit(1);
    }
}
