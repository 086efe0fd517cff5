mod console;
mod lobby;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use duet::model::IceServerConfig;
use duet::model::utils::{DEFAULT_CANDIDATE_FLUSH_DELAY_MS, DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2};
use duet::peer::{Launch, LocalMedia, PeerConfig, PeerSession, WebRtcEngine, WsConnector};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleObserver;
use crate::lobby::TerminalLobby;

#[derive(Parser)]
#[command(name = "duet")]
#[command(about = "Join a two-party audio/video call through a room relay")]
struct Cli {
    /// WebSocket address of the room relay
    #[arg(long, env = "DUET_SIGNALING_URL")]
    url: String,

    /// Room to join; without it the lobby opens
    #[arg(short, long, env = "DUET_ROOM")]
    room: Option<String>,

    #[arg(long = "stun", default_values = [DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2])]
    stun: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_CANDIDATE_FLUSH_DELAY_MS)]
    candidate_delay_ms: u64,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("duet_peer={0},duet={0}", cli.log_level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = PeerConfig::default()
        .with_ice_servers(vec![IceServerConfig::stun(cli.stun.clone())])
        .with_candidate_flush_delay(Duration::from_millis(cli.candidate_delay_ms));

    let engine = Arc::new(WebRtcEngine::new(config.ice_servers.clone()));
    let session = PeerSession::new(config, engine, Arc::new(ConsoleObserver));
    let connector = WsConnector::parse(&cli.url)?;
    let lobby = TerminalLobby;
    let media = LocalMedia::audio_video("duet-local");
    info!("Using room relay at {}", cli.url);

    let mut room = cli.room;
    let handle = loop {
        let launch = session
            .launch(room.as_deref(), media.clone(), &connector, &lobby)
            .await
            .context("Failed to start the call")?;

        match launch {
            Launch::Running(handle) => break handle,
            Launch::Lobby => room = Some(lobby.choose_room()?),
        }
    };

    println!(
        "{} {}",
        "📞 Joined room".green().bold(),
        handle.room_id().to_string().bold()
    );
    println!("{}", "   m: mic  c: camera  s: state  q: quit".dimmed());

    console::run(handle).await
}
