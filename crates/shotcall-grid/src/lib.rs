//! ShotCall Grid - Grid editor interaction
//!
//! Maps shots onto a row/column grid and turns press/drag/release gestures
//! into interval commits:
//! - Grid geometry and interval <-> placement conversion
//! - Edge classification and the drag/resize state machine

pub mod drag;
pub mod layout;

pub use drag::{classify_edge, DragCommit, DragKind, DragPhase, DragSession, GridMode, GridSyncEngine};
pub use layout::{GridCell, GridGeometry, GridPlacement};
