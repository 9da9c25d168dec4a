//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server. The game loop stays
//! the only owner of the session: it drains [`InboundCommand`]s, applies
//! them, and answers through [`Adapter::send`].

use anyhow::{Context, Result};
use arrayvec::ArrayVec;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::core::GameSnapshot;
use crate::protocol::{build_observation, create_ack, to_line, ServerMessage, MAX_ACTIONS};
use crate::server::{is_disabled, run_server, ServerConfig};
use crate::types::{GameAction, Score};

/// Command delivered to the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub client_id: u64,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    /// Apply in order, then ack once.
    Actions(ArrayVec<GameAction, MAX_ACTIONS>),
    /// A client just completed its handshake and wants the current state.
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    ToClient { client_id: u64, line: String },
    /// Sent to every client that asked for observations.
    Broadcast { line: String },
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    /// Sequence number of server-initiated observations.
    obs_seq: u64,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `G2048_AI_DISABLED` is set.
    pub fn start_from_env() -> Result<Option<Self>> {
        if is_disabled() {
            log::info!("adapter disabled via G2048_AI_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    /// Start the server on a background runtime.
    ///
    /// Bind failures surface in the log, not here.
    pub fn start(config: ServerConfig) -> Result<Self> {
        config.socket_addr()?;

        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None).await {
                log::error!("adapter stopped: {:#}", e);
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            obs_seq: 0,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    /// Acknowledge a command after it was applied.
    pub fn ack(
        &self,
        client_id: u64,
        seq: u64,
        moved: bool,
        score_gained: Score,
        game_over: bool,
    ) {
        self.send_message(
            Some(client_id),
            &create_ack(seq, moved, score_gained, game_over),
        );
    }

    /// Send the current state to one client, or to all streaming clients.
    pub fn observe<const N: usize>(&mut self, client_id: Option<u64>, snap: &GameSnapshot<N>) {
        self.obs_seq += 1;
        let msg = build_observation(self.obs_seq, snap);
        self.send_message(client_id, &msg);
    }

    fn send_message(&self, client_id: Option<u64>, msg: &ServerMessage) {
        let line = match to_line(msg) {
            Ok(line) => line,
            Err(e) => {
                log::error!("failed to encode adapter message: {}", e);
                return;
            }
        };
        self.send(match client_id {
            Some(client_id) => OutboundMessage::ToClient { client_id, line },
            None => OutboundMessage::Broadcast { line },
        });
    }
}
