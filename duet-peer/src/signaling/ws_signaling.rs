use crate::error::{PeerError, Result};
use crate::signaling::{SignalingConnector, SignalingLink, SignalingOutput};
use async_trait::async_trait;
use duet_core::SignalEnvelope;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

/// Connects to the room relay over a WebSocket.
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: Url,
}

impl WsConnector {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(url: &str) -> Result<Self> {
        Url::parse(url)
            .map(Self::new)
            .map_err(|e| PeerError::Signaling(format!("invalid signaling url {url}: {e}")))
    }
}

#[async_trait]
impl SignalingConnector for WsConnector {
    async fn connect(&self) -> Result<SignalingLink> {
        let (socket, _) = connect_async(self.url.as_str())
            .await
            .map_err(PeerError::signaling)?;
        info!("Signaling socket open: {}", self.url);

        let (mut sender, mut receiver) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        let (in_tx, in_rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                if let Err(e) = sender.send(msg).await {
                    warn!("Signaling send failed: {}", e);
                    break;
                }
            }
            let _ = sender.close().await;
        });

        tokio::spawn(async move {
            while let Some(frame) = receiver.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        debug!("WS IN: {}", text);
                        if in_tx.send(text).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Signaling socket error: {}", e);
                        break;
                    }
                }
            }
            info!("Signaling socket closed");
        });

        Ok(SignalingLink {
            output: Arc::new(WsSignaling { tx: out_tx }),
            inbound: in_rx,
        })
    }
}

pub struct WsSignaling {
    tx: mpsc::UnboundedSender<Message>,
}

#[async_trait]
impl SignalingOutput for WsSignaling {
    async fn send_envelope(&self, envelope: SignalEnvelope) -> Result<()> {
        let json = envelope.to_json()?;
        self.tx
            .send(Message::Text(json))
            .map_err(|_| PeerError::Signaling("signaling socket is closed".to_owned()))
    }
}
