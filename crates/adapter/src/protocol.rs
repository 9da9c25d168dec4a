//! Protocol module - JSON message types for the control adapter
//!
//! Every message is one JSON object per line with a `type` tag and a `seq`
//! number. Client messages are deserialized here; server messages are built
//! with the `create_*` helpers and serialized with [`to_line`].

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::GameSnapshot;
use crate::types::{Direction, GameAction, Score, Tile};

pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Upper bound on actions in a single command.
pub const MAX_ACTIONS: usize = 16;

// ============== Client -> Game Messages ==============

/// Client hello message (first message on a connection)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HelloMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    /// Free-form client name, used in logs.
    #[serde(default)]
    pub client: String,
    /// Receive an observation after every state change.
    #[serde(default = "default_true")]
    pub stream_observations: bool,
}

fn default_true() -> bool {
    true
}

/// Wire name of a [`GameAction`], matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionName(pub GameAction);

impl<'de> Deserialize<'de> for ActionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        GameAction::from_str(&s)
            .map(ActionName)
            .ok_or_else(|| serde::de::Error::custom("unknown action"))
    }
}

/// Bounded list of actions. Longer lists are rejected while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionList(pub ArrayVec<GameAction, MAX_ACTIONS>);

impl<'de> Deserialize<'de> for ActionList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = ActionList;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an array of action strings")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = ArrayVec::<GameAction, MAX_ACTIONS>::new();
                while let Some(ActionName(a)) = seq.next_element::<ActionName>()? {
                    out.try_push(a)
                        .map_err(|_| serde::de::Error::custom("too many actions"))?;
                }
                Ok(ActionList(out))
            }
        }

        deserializer.deserialize_seq(V)
    }
}

/// Command message: one `action` or a list of `actions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    #[serde(default)]
    pub action: Option<ActionName>,
    #[serde(default)]
    pub actions: Option<ActionList>,
}

impl CommandMessage {
    /// The actions to apply in order, or `None` when the command names none.
    pub fn to_actions(&self) -> Option<ArrayVec<GameAction, MAX_ACTIONS>> {
        let mut out = ArrayVec::new();
        if let Some(ActionName(a)) = self.action {
            out.push(a);
        }
        if let Some(list) = &self.actions {
            for &a in &list.0 {
                out.try_push(a).ok()?;
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

/// Message with a `type` this server does not handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Parsed incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

/// Parse one line received from a client.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Header<'a> {
                #[serde(rename = "type", borrow)]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let header = serde_json::from_str::<Header>(json)?;
            match header.msg_type {
                Some("hello") | Some("command") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: header.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Best-effort `seq` lookup for lines that are not valid messages, so the
/// error reply can still be correlated.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let rest = s[start + 5..].trim_start().strip_prefix(':')?.trim_start();
    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    InvalidCommand,
    Backpressure,
    OutOfOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeMessage {
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub board_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckMessage {
    pub seq: u64,
    pub ts: u64,
    pub moved: bool,
    pub score_gained: Score,
    pub game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMessage {
    pub seq: u64,
    pub ts: u64,
    pub episode_id: u32,
    pub move_count: u32,
    pub score: Score,
    pub last_score_gained: Score,
    pub max_tile: Tile,
    pub game_over: bool,
    /// Rows top to bottom, 0 for an empty cell.
    pub board: Vec<Vec<Tile>>,
    /// Directions that would change the board.
    pub legal: Vec<String>,
}

/// Any message the server writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

/// Serialize a message as one protocol line (no trailing newline).
pub fn to_line(msg: &ServerMessage) -> serde_json::Result<String> {
    serde_json::to_string(msg)
}

pub fn create_welcome(seq: u64, client_id: u64, board_size: usize) -> ServerMessage {
    ServerMessage::Welcome(WelcomeMessage {
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client_id,
        board_size,
    })
}

pub fn create_ack(seq: u64, moved: bool, score_gained: Score, game_over: bool) -> ServerMessage {
    ServerMessage::Ack(AckMessage {
        seq,
        ts: current_timestamp_ms(),
        moved,
        score_gained,
        game_over,
    })
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ServerMessage {
    ServerMessage::Error(ErrorMessage {
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    })
}

/// Observation of a session snapshot.
pub fn build_observation<const N: usize>(seq: u64, snap: &GameSnapshot<N>) -> ServerMessage {
    ServerMessage::Observation(ObservationMessage {
        seq,
        ts: current_timestamp_ms(),
        episode_id: snap.episode_id,
        move_count: snap.move_count,
        score: snap.score,
        last_score_gained: snap.last_score_gained,
        max_tile: snap.max_tile,
        game_over: snap.game_over,
        board: snap.board.iter().map(|row| row.to_vec()).collect(),
        legal: Direction::ALL
            .iter()
            .filter(|d| snap.legal[d.index()])
            .map(|d| d.as_str().to_string())
            .collect(),
    })
}

fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
