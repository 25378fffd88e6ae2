//! Command line and environment configuration.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Manage user profiles against a json-server style REST API
#[derive(Debug, Parser)]
#[command(name = "user-roster", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive front end on the terminal
    Run(RunArgs),

    /// Serve an in-memory `/users` resource
    ServeMock(MockArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Root of the REST API; `/users` is appended
    #[arg(long, env = "ROSTER_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Random profile generator endpoint
    #[arg(
        long,
        env = "ROSTER_RANDOM_USER_URL",
        default_value = "https://randomuser.me/api/"
    )]
    pub random_user_url: String,

    /// Timeout for every outbound HTTP call, in seconds (at least 1)
    #[arg(
        long = "http-timeout",
        value_name = "SECS",
        env = "ROSTER_HTTP_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub http_timeout_secs: u64,
}

impl RunArgs {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[derive(Debug, Clone, Args)]
pub struct MockArgs {
    /// Address to listen on
    #[arg(long, env = "ROSTER_MOCK_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// JSON file with initial users: `{ "users": [...] }` or a bare array
    #[arg(long, env = "ROSTER_MOCK_SEED")]
    pub seed: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["user-roster", "run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.api_url.starts_with("http"));
        assert!(args.http_timeout() > Duration::ZERO);
    }

    #[test]
    fn test_zero_http_timeout_is_rejected() {
        let err = Cli::try_parse_from(["user-roster", "run", "--http-timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from(["user-roster", "run", "--http-timeout", "1"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.http_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_serve_mock_flags() {
        let cli = Cli::try_parse_from([
            "user-roster",
            "serve-mock",
            "--addr",
            "127.0.0.1:4000",
            "--seed",
            "db.json",
        ])
        .unwrap();
        let Command::ServeMock(args) = cli.command else {
            panic!("expected serve-mock");
        };
        assert_eq!(args.addr.port(), 4000);
        assert_eq!(args.seed, Some(PathBuf::from("db.json")));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
