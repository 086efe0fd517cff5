use anyhow::Result;
use colored::*;
use duet::peer::{PeerError, RemoteStream, SessionHandle, SessionObserver};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints remote media and failures as the call progresses.
pub struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_remote_stream(&self, stream: &RemoteStream) {
        let tracks: Vec<String> = stream
            .tracks()
            .iter()
            .map(|t| format!("{} ({})", t.id, t.kind))
            .collect();
        println!("{} {}", "🎥 Remote stream:".cyan(), tracks.join(", "));
    }

    fn on_failure(&self, error: &PeerError) {
        eprintln!("{} {}", "⚠️".red(), error.to_string().red());
    }
}

fn on_off(enabled: bool) -> ColoredString {
    if enabled { "on".green() } else { "off".red() }
}

/// Reads single-letter commands from stdin until `q` or the session ends.
pub async fn run(handle: SessionHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut state = handle.watch_state();
    let mut channel_closed = false;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "m" => match handle.media().toggle_mic() {
                        Some(enabled) => println!("🎙️  mic {}", on_off(enabled)),
                        None => println!("no microphone track"),
                    },
                    "c" => match handle.media().toggle_camera() {
                        Some(enabled) => println!("📷 camera {}", on_off(enabled)),
                        None => println!("no camera track"),
                    },
                    "s" => println!("negotiation: {}", handle.state().to_string().bold()),
                    "q" => break,
                    "" => {}
                    other => println!("unknown command {other:?}"),
                }
            }

            changed = state.changed() => {
                if changed.is_err() {
                    println!("{}", "🔌 Signaling channel closed".yellow());
                    channel_closed = true;
                    break;
                }
                let current = *state.borrow_and_update();
                println!("{} {}", "↔".blue(), current.to_string().bold());
            }
        }
    }

    if channel_closed {
        handle.closed().await;
    } else {
        handle.abort();
    }
    Ok(())
}
