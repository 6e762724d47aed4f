pub mod popup;
pub mod preview;
pub mod search_panel;
pub mod slot_grid;
pub mod theme;

pub use theme::Theme;
