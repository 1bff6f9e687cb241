//! Tagwatch CLI
//!
//! Starts the page poller and the read API.

use std::env;
use std::process;
use tagwatch_server::{config::ServerConfig, start_server, ServerError};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Help,
    Serve { config_path: Option<String> },
}

fn parse_args(args: &[String]) -> Invocation {
    match args.get(1).map(String::as_str) {
        Some("--help") | Some("-h") => Invocation::Help,
        Some("--config") => Invocation::Serve {
            config_path: args.get(2).cloned(),
        },
        _ => Invocation::Serve { config_path: None },
    }
}

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    if let Err(e) = run(parse_args(&args)).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(invocation: Invocation) -> Result<(), ServerError> {
    let config = match invocation {
        Invocation::Help => {
            print_help();
            return Ok(());
        }
        Invocation::Serve {
            config_path: Some(path),
        } => ServerConfig::from_file(&path)?,
        Invocation::Serve { config_path: None } => {
            warn!("No config file specified, using default configuration");
            eprintln!("Usage: tagwatch --config <path-to-config.toml>");
            ServerConfig::default_config()
        }
    };

    start_server(config).await
}

fn print_help() {
    println!("Tagwatch - Page Tag Monitor");
    println!();
    println!("USAGE:");
    println!("    tagwatch --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    -h, --help         Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    bind_address / bind_port       HTTP listen address (default 127.0.0.1:8000)");
    println!("    database_path                  SQLite file (default page_content.db)");
    println!("    [poller] monitored_url         Page to poll (required)");
    println!("    [poller] poll_interval_seconds Seconds between fetches (default 30)");
    println!("    [poller] fetch_timeout_seconds Fetch timeout (default 10)");
    println!("    [poller] timezone              IANA zone for timestamps (default America/Sao_Paulo)");
    println!("    [poller] dedup_mode            exact | substring (default exact)");
    println!();
}
