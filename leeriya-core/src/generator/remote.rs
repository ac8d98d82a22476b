use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use leeriya_types::room_state::PlaybackState;
use leeriya_types::RoomState;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use super::mock::MockGeneratorSession;
use super::{AudioChunkCallback, GeneratorSession};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

fn http_base(ws_endpoint: &str) -> String {
    ws_endpoint
        .replacen("wss://", "https://", 1)
        .replacen("ws://", "http://", 1)
}

/// Where to reach the remote live-music backend and how to authenticate.
#[derive(Debug, Clone)]
pub struct RemoteSessionConfig {
    pub ws_endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, thiserror::Error)]
enum RemoteInitError {
    #[error("session negotiation failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("websocket connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Adapter speaking to an external realtime-audio backend, embedding a
/// [`MockGeneratorSession`] it falls back to (and may re-route operations
/// to, permanently, for the lifetime of the session) if initialization
/// fails for any reason. Preferred over an inheritance-based design: the
/// runtime `using_mock` flag is the single source of truth for which path
/// every subsequent call takes.
pub struct RemoteGeneratorSession {
    config: RemoteSessionConfig,
    on_audio_chunk: AudioChunkCallback,
    mock: Arc<MockGeneratorSession>,
    using_mock: Mutex<bool>,
    writer: Mutex<Option<WsSink>>,
    receive_task: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl RemoteGeneratorSession {
    pub fn new(config: RemoteSessionConfig, on_audio_chunk: AudioChunkCallback) -> Self {
        RemoteGeneratorSession {
            config,
            mock: Arc::new(MockGeneratorSession::new(on_audio_chunk.clone())),
            on_audio_chunk,
            using_mock: Mutex::new(false),
            writer: Mutex::new(None),
            receive_task: Mutex::new(None),
            cancel: CancellationToken::new(),
        }
    }

    /// Negotiates a session over HTTP (so the backend can allocate model
    /// capacity and hand back a short-lived connect URL) before opening the
    /// realtime WebSocket stream.
    async fn start_real_session(&self) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>, RemoteInitError> {
        let client = reqwest::Client::new();
        let mut request = client.post(format!("{}/sessions", http_base(&self.config.ws_endpoint)));
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        request
            .json(&serde_json::json!({"model": self.config.model}))
            .send()
            .await?
            .error_for_status()?;

        let mut url = self.config.ws_endpoint.clone();
        if let Some(key) = &self.config.api_key {
            let sep = if url.contains('?') { '&' } else { '?' };
            url = format!("{url}{sep}key={key}");
        }
        let (stream, _response) = connect_async(url).await?;
        Ok(stream)
    }

    async fn send_json(&self, value: serde_json::Value) {
        if let Some(sink) = self.writer.lock().await.as_mut() {
            if let Ok(text) = serde_json::to_string(&value) {
                let _ = sink.send(Message::text(text)).await;
            }
        }
    }

    async fn apply_prompts(&self, state: &RoomState) {
        let prompts: Vec<serde_json::Value> = if state.prompts.is_empty() {
            vec![serde_json::json!({"text": "minimal techno", "weight": 1.0})]
        } else {
            state
                .prompts
                .iter()
                .map(|p| serde_json::json!({"text": p.text, "weight": p.weight}))
                .collect()
        };
        self.send_json(serde_json::json!({"type": "set_prompts", "prompts": prompts}))
            .await;
    }

    async fn apply_config(&self, state: &RoomState) {
        self.send_json(serde_json::json!({
            "type": "set_config",
            "config": state.music_config,
        }))
        .await;
    }
}

#[async_trait]
impl GeneratorSession for RemoteGeneratorSession {
    async fn start(&self) {
        match self.start_real_session().await {
            Ok(stream) => {
                let (sink, mut read) = stream.split();
                *self.writer.lock().await = Some(sink);
                *self.using_mock.lock().await = false;
                let cancel = self.cancel.clone();
                let callback = self.on_audio_chunk.clone();
                let handle = tokio::spawn(async move {
                    loop {
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            msg = read.next() => {
                                match msg {
                                    Some(Ok(Message::Binary(bytes))) => callback(bytes.to_vec()),
                                    Some(Ok(_)) => {}
                                    Some(Err(err)) => {
                                        log::warn!("remote generator receive error: {err}");
                                        tokio::time::sleep(Duration::from_millis(250)).await;
                                    }
                                    None => break,
                                }
                            }
                        }
                    }
                });
                *self.receive_task.lock().await = Some(handle);
            }
            Err(err) => {
                log::warn!("remote generator init failed, falling back to mock: {err}");
                *self.using_mock.lock().await = true;
                self.mock.start().await;
            }
        }
    }

    async fn close(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.receive_task.lock().await.take() {
            let _ = handle.await;
        }
        if *self.using_mock.lock().await {
            self.mock.close().await;
        } else if let Some(mut sink) = self.writer.lock().await.take() {
            let _ = sink.close().await;
        }
    }

    async fn apply_state(&self, state: &RoomState) {
        if *self.using_mock.lock().await {
            self.mock.apply_state(state).await;
            return;
        }
        self.apply_prompts(state).await;
        self.apply_config(state).await;
        match state.playback_state {
            PlaybackState::Playing => self.play().await,
            PlaybackState::Paused => self.pause().await,
            PlaybackState::Stopped => self.stop().await,
        }
    }

    async fn play(&self) {
        if *self.using_mock.lock().await {
            self.mock.play().await;
        } else {
            self.send_json(serde_json::json!({"type": "transport", "command": "play"}))
                .await;
        }
    }

    async fn pause(&self) {
        if *self.using_mock.lock().await {
            self.mock.pause().await;
        } else {
            self.send_json(serde_json::json!({"type": "transport", "command": "pause"}))
                .await;
        }
    }

    async fn stop(&self) {
        if *self.using_mock.lock().await {
            self.mock.stop().await;
        } else {
            self.send_json(serde_json::json!({"type": "transport", "command": "stop"}))
                .await;
        }
    }

    async fn reset_context(&self) {
        if *self.using_mock.lock().await {
            self.mock.reset_context().await;
        } else {
            self.send_json(serde_json::json!({"type": "transport", "command": "reset_context"}))
                .await;
        }
    }
}
