//! Terminal UI components.
//!
//! - [`layout`]: wrapping note text into rows
//! - [`viewport`]: scroll position and visible range management
//!
//! The screen is the asset browser on the left, the note pane on the right,
//! and two footer rows: a message line (toast or hovered link) above the
//! status bar.

pub mod layout;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{link_picker_content_top, link_picker_rect};
pub use render::{
    browser_inner_area, editor_columns, line_number_width, note_inner_area, render,
    split_main_columns,
};

pub const BROWSER_WIDTH_PERCENT: u16 = 30;
pub const NOTE_WIDTH_PERCENT: u16 = 70;
pub const FOOTER_ROWS: u16 = 2;
