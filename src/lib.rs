//! TUI 2048 (workspace facade crate).
//!
//! Re-exports the crates under `crates/` as `tui_2048::{core,adapter,term,input,store,types}`
//! and adds the [`app`] glue used by the binary.

pub mod app;

pub use tui_2048_adapter as adapter;
pub use tui_2048_core as core;
pub use tui_2048_input as input;
pub use tui_2048_store as store;
pub use tui_2048_term as term;
pub use tui_2048_types as types;

pub use app::{App, AppEvent, BatchOutcome};
