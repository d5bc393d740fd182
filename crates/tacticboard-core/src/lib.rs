//! Tactics Board Core Library
//!
//! Platform-agnostic model and editing logic for a sports tactics board:
//! player tokens, pass and movement lines, undo/redo, and save/load.

pub mod board;
pub mod codec;
pub mod config;
pub mod diagram;
pub mod gesture;
pub mod history;
pub mod palette;
pub mod persistence;

pub use board::Board;
pub use codec::{DecodeError, EncodeError};
pub use config::BoardConfig;
pub use diagram::{Diagram, DiagramError, LineAnnotation, LineId, TOKEN_HIT_RADIUS, Token, TokenId};
pub use gesture::{
    DegenerateLinePolicy, DrawMode, GestureContext, GestureInterpreter, GestureOutcome,
    GestureState, PointerEvent,
};
pub use history::{History, HistoryError};
pub use palette::{PaletteError, Team};
