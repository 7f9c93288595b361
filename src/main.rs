use anyhow::Result;
use clap::{Arg, Command};
use std::sync::Arc;
use tracing::{info, warn};

use study_scout::api::start_http_server;
use study_scout::llm::create_model;
use study_scout::pipeline::Orchestrator;
use study_scout::youtube::{VideoProvider, YouTubeClient};
use study_scout::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Study Scout")
        .version("0.1.0")
        .about("Video discovery and verification backend for study sessions")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on (overrides config)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML config file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(if verbose {
            "study_scout=debug,tower_http=debug,info"
        } else {
            "study_scout=info,warn"
        })
        .init();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    if let Some(port) = matches.get_one::<String>("port") {
        config.server.port = port.parse()?;
    }

    // Missing model credential is a hard startup failure
    config.validate()?;

    info!("🚀 Study Scout starting...");
    info!("{}", config.summary());

    let model = create_model(&config.model)?;

    let video: Option<Arc<dyn VideoProvider>> = match YouTubeClient::new(&config.youtube) {
        Ok(client) => Some(Arc::new(client)),
        Err(_) => None,
    };

    let orchestrator = Arc::new(Orchestrator::new(
        Some(Arc::from(model)),
        video,
        config.pipeline.skip_verification,
    ));

    start_http_server(orchestrator, config.server.port).await
}
