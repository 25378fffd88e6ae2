//! # User Roster
//!
//! - `user-roster run` starts the terminal front end against `ROSTER_API_URL`.
//! - `user-roster serve-mock` serves an in-memory `/users` resource to run it against.
//!
//! Logging goes to stderr; set `RUST_LOG` to change the level (default `info`).

use actor_framework::tracing::setup_tracing;
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use user_roster::clients::{HttpUserStore, RandomUserClient};
use user_roster::config::{Cli, Command, MockArgs, RunArgs};
use user_roster::lifecycle::RosterSystem;
use user_roster::{mock_server, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing("info");
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args).await,
        Command::ServeMock(args) => serve_mock(args).await,
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let timeout = args.http_timeout();
    let store = HttpUserStore::new(&args.api_url, timeout).context("building the REST client")?;
    let profiles = RandomUserClient::new(&args.random_user_url, timeout)
        .context("building the random profile client")?;

    info!(api_url = %args.api_url, "Starting front end");
    let mut system = RosterSystem::start(Arc::new(store), Arc::new(profiles));

    println!("{}", terminal::HELP);
    let outcome = terminal::run(
        &system.client,
        &mut system.notices,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await;

    system.shutdown().await;
    outcome.context("terminal session failed")
}

async fn serve_mock(args: MockArgs) -> Result<()> {
    let seed = match &args.seed {
        Some(path) => mock_server::load_seed(path)
            .with_context(|| format!("loading seed {}", path.display()))?,
        None => Vec::new(),
    };
    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("binding {}", args.addr))?;

    mock_server::serve(listener, seed, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
    .context("mock server failed")
}
