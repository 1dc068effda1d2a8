//! Text buffer behind the note pane's edit mode.
//!
//! Provides a rope-backed buffer with cursor management. Persistence and
//! history live in [`crate::session`]; the buffer only edits text.

mod buffer;

pub use buffer::{Cursor, Direction, EditKind, NoteBuffer};
