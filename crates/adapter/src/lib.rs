//! Adapter module - external control via TCP socket with JSON protocol
//!
//! This crate lets bots and scripts play the game through a TCP socket. The
//! game loop remains the single owner of the session; the server only
//! validates and forwards commands and relays replies.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to the socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Observation Streaming**: Server sends the board after every change
//! 4. **Commanding**: Client sends `command` with one `action` or a list of `actions`
//!
//! Every client message carries a `seq` that must strictly increase per
//! connection.
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: handshake, optionally `"stream_observations": false`
//! - **command**: `left`, `right`, `up`, `down` or `restart`
//!
//! ## Server → Client
//!
//! - **welcome**: protocol version, client id, board size
//! - **ack**: command applied; whether the board moved and the points gained
//! - **error**: `handshake_required`, `invalid_command`, `backpressure`, `out_of_order`
//! - **observation**: board, score, legal directions, game over flag
//!
//! # Environment Variables
//!
//! - `G2048_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `G2048_AI_PORT`: Port number (default: 7878)
//! - `G2048_AI_MAX_PENDING`: Command queue capacity (default: 16)
//! - `G2048_AI_DISABLED`: Set to "1" or "true" to disable adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":"my-bot"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000000,"protocol_version":"1.0.0","client_id":1,"board_size":4}
//! Server -> Client: {"type":"observation","seq":1,"ts":1700000000001,"board":[[0,2,0,0],...],...}
//! Client -> Server: {"type":"command","seq":2,"action":"left"}
//! Server -> Client: {"type":"ack","seq":2,"ts":1700000000002,"moved":true,"score_gained":0,"game_over":false}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use protocol::*;
pub use runtime::{Adapter, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{is_disabled, run_server, ServerConfig};
