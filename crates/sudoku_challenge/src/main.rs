//! Sudoku Challenge - leaderboard server CLI

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use sudoku_challenge::{LeaderboardService, PersonRepository, ServerConfig, router};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
        } => {
            let mut config = ServerConfig::load(config.as_deref())?;
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(db_path) = db_path {
                config = config.with_db_path(db_path);
            }
            run_server(config).await
        }
        Command::Migrate { db_path } => run_migrate(db_path),
        Command::Top { db_path } => print_top(db_path),
    }
}

/// Run the HTTP leaderboard server
#[instrument(skip_all, fields(addr = %config.bind_addr(), db_path = %config.db_path()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    let repository = PersonRepository::new(config.db_path().clone())?;
    let applied = repository.run_migrations()?;
    info!(applied, "Database ready");

    let app = router(LeaderboardService::new(repository));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Server ready at http://{}/", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Apply migrations only
#[instrument]
fn run_migrate(db_path: String) -> Result<()> {
    let repository = PersonRepository::new(db_path)?;
    let applied = repository.run_migrations()?;
    info!(applied, "Migrations complete");
    Ok(())
}

/// Print the leaderboard to stdout
#[instrument]
fn print_top(db_path: String) -> Result<()> {
    let repository = PersonRepository::new(db_path)?;
    let service = LeaderboardService::new(repository);

    println!("{:>3}  {:<32} {:>10}", "#", "Player", "Points");
    for (rank, person) in service.get_top()?.iter().enumerate() {
        println!(
            "{:>3}  {:<32} {:>10}",
            rank + 1,
            person.full_name().as_deref().unwrap_or("-"),
            person.points()
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sudoku_challenge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
