mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use glyphgate_gateway::{start_server, GatewayState};
use glyphgate_understanding::{GeminiClient, OcrService};

use config::Config;

#[derive(Parser)]
#[command(name = "glyphgate")]
#[command(about = "GlyphGate: handwriting-friendly OCR over a Gemini vision model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the OCR HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Query the health endpoint of a running server
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                bind_address: bind.unwrap_or(config.bind_address),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://{}:{}/api/health", config.bind_address, config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("GlyphGate is not running on port {}", config.port);
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    let Some(api_key) = config.gemini_api_key.clone() else {
        eprintln!("FATAL ERROR: GEMINI_API_KEY environment variable is not set.");
        eprintln!("Please set it before running. Example: export GEMINI_API_KEY=\"YOUR_API_KEY\"");
        std::process::exit(1);
    };

    glyphgate_logging::init_logger(&config.log_dir, &config.log_level);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.bind_address, config.port))?;

    info!(
        addr = %addr,
        static_dir = %config.static_dir.display(),
        max_body_bytes = config.max_body_bytes,
        "Starting GlyphGate"
    );

    let gemini = GeminiClient::new(api_key).with_base_url(&config.gemini_base_url);
    let ocr = Arc::new(OcrService::new(Arc::new(gemini)));

    let state = GatewayState::new(ocr)
        .with_static_dir(&config.static_dir)
        .with_max_body_bytes(config.max_body_bytes);

    start_server(addr, state).await
}
