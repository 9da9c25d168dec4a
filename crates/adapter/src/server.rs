//! TCP server for the control adapter
//!
//! Accepts connections, validates handshake and sequencing per client, and
//! forwards commands to the game loop through a bounded channel. Replies
//! produced by the game loop arrive on `out_rx` and are routed to clients.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::protocol::*;
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage};

const ENV_HOST: &str = "G2048_AI_HOST";
const ENV_PORT: &str = "G2048_AI_PORT";
const ENV_MAX_PENDING: &str = "G2048_AI_MAX_PENDING";
const ENV_DISABLED: &str = "G2048_AI_DISABLED";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Capacity of the command queue toward the game loop.
    pub max_pending_commands: usize,
    /// Reported in `welcome`.
    pub board_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_pending_commands: 16,
            board_size: crate::types::BOARD_SIZE,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `G2048_AI_*` environment variables.
    ///
    /// Unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup(ENV_HOST)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = lookup(ENV_PORT)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = lookup(ENV_MAX_PENDING)
            .and_then(|s| s.trim().parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            max_pending_commands,
            board_size: defaults.board_size,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))
    }
}

/// Check if the adapter is disabled via `G2048_AI_DISABLED`.
pub fn is_disabled() -> bool {
    std::env::var(ENV_DISABLED)
        .map(|v| disabled_flag(&v))
        .unwrap_or(false)
}

fn disabled_flag(v: &str) -> bool {
    let v = v.trim();
    v == "1" || v.eq_ignore_ascii_case("true")
}

/// Handle to a connected client
struct ClientHandle {
    id: u64,
    handshaken: bool,
    stream_observations: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<String>,
}

/// Shared server state
struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
}

impl ServerState {
    async fn send_to(&self, client_id: u64, line: String) {
        let clients = self.clients.read().await;
        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(line);
        }
    }

    async fn broadcast(&self, line: String) {
        let clients = self.clients.read().await;
        for c in clients.iter().filter(|c| c.handshaken && c.stream_observations) {
            let _ = c.tx.send(line.clone());
        }
    }

    async fn is_handshaken(&self, client_id: u64) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    /// Record `seq` if it is strictly greater than the last one seen.
    async fn check_and_update_seq(&self, client_id: u64, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return false;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn complete_handshake(&self, client_id: u64, hello: &HelloMessage) {
        let mut clients = self.clients.write().await;
        if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
            client.handshaken = true;
            client.stream_observations = hello.stream_observations;
            client.last_seq = Some(hello.seq);
        }
    }

    async fn remove(&self, client_id: u64) {
        self.clients.write().await.retain(|c| c.id != client_id);
    }
}

/// Start the TCP server.
///
/// `ready_tx` receives the bound address once the listener is up, which lets
/// callers bind port 0. Runs until the listener fails.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind adapter on {}", addr))?;
    let bound = listener.local_addr()?;
    log::info!("adapter listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState {
        config,
        clients: RwLock::new(Vec::new()),
    });

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        state.send_to(client_id, line).await
                    }
                    OutboundMessage::Broadcast { line } => state.broadcast(line).await,
                }
            }
        });
    }

    let mut next_client_id = 0u64;
    loop {
        let (socket, peer) = listener.accept().await?;
        next_client_id += 1;
        let client_id = next_client_id;
        log::info!("client {} connected from {}", client_id, peer);

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, Arc::clone(&state), command_tx).await {
                log::warn!("client {} error: {:#}", client_id, e);
            }
            state.remove(client_id).await;
            log::info!("client {} disconnected", client_id);
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: u64,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    state.clients.write().await.push(ClientHandle {
        id: client_id,
        handshaken: false,
        stream_observations: false,
        last_seq: None,
        tx: tx.clone(),
    });

    let write_task = tokio::spawn(async move {
        while let Some(mut line) = rx.recv().await {
            line.push('\n');
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let reply = |msg: ServerMessage| match to_line(&msg) {
        Ok(line) => {
            let _ = tx.send(line);
        }
        Err(e) => log::error!("failed to encode reply: {}", e),
    };

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    reply(create_error(
                        hello.seq,
                        ErrorCode::OutOfOrder,
                        "seq must be strictly increasing",
                    ));
                    continue;
                }

                state.complete_handshake(client_id, &hello).await;
                log::info!("client {} hello as {:?}", client_id, hello.client);
                reply(create_welcome(hello.seq, client_id, state.config.board_size));

                if hello.stream_observations {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    });
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    reply(create_error(
                        cmd.seq,
                        ErrorCode::HandshakeRequired,
                        "send hello before command",
                    ));
                    continue;
                }

                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    reply(create_error(
                        cmd.seq,
                        ErrorCode::OutOfOrder,
                        "seq must be strictly increasing",
                    ));
                    continue;
                }

                let Some(actions) = cmd.to_actions() else {
                    reply(create_error(
                        cmd.seq,
                        ErrorCode::InvalidCommand,
                        "command needs action or actions",
                    ));
                    continue;
                };

                // Backpressure: bounded queue. The ack comes from the game loop.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Actions(actions),
                    })
                    .is_err()
                {
                    reply(create_error(
                        cmd.seq,
                        ErrorCode::Backpressure,
                        "command queue is full",
                    ));
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                reply(create_error(
                    unknown.seq,
                    ErrorCode::InvalidCommand,
                    "unknown message type",
                ));
            }

            Err(e) => {
                log::debug!("client {} sent invalid message: {}", client_id, e);
                reply(create_error(
                    extract_seq_best_effort(trimmed).unwrap_or(0),
                    ErrorCode::InvalidCommand,
                    &e.to_string(),
                ));
            }
        }
    }

    drop(reply);
    drop(tx);
    state.remove(client_id).await;
    let _ = write_task.await;
    Ok(())
}
