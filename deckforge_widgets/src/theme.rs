use ratatui::style::Color;

/// Color theme for the deck builder TUI
pub struct Theme;

impl Theme {
    // Backgrounds
    pub const BG: Color = Color::Rgb(11, 14, 20);
    pub const PANEL_BG: Color = Color::Rgb(24, 28, 44);

    // Slot cells
    pub const SLOT_BORDER: Color = Color::Rgb(108, 117, 125);
    pub const SLOT_EMPTY: Color = Color::Rgb(58, 64, 80);
    pub const CARD_BACK: Color = Color::Rgb(66, 60, 120);
    pub const MAIN_CARD: Color = Color::Rgb(76, 160, 240);
    pub const EXTRA_CARD: Color = Color::Rgb(150, 84, 216);

    // Controls
    pub const CURSOR: Color = Color::Rgb(255, 214, 10);
    pub const BUTTON: Color = Color::Rgb(255, 183, 3);
    pub const BUTTON_DISABLED: Color = Color::Rgb(84, 88, 104);
    pub const ADD_ICON: Color = Color::Rgb(6, 214, 160);
    pub const REMOVE_ICON: Color = Color::Rgb(230, 57, 70);

    // Feedback
    pub const ERROR: Color = Color::Rgb(230, 57, 70);
    pub const SUCCESS: Color = Color::Rgb(6, 214, 160);

    // Text
    pub const GOLD: Color = Color::Rgb(255, 183, 3);
    pub const BRIGHT_TEXT: Color = Color::Rgb(255, 255, 255);
    pub const MUTED_TEXT: Color = Color::Rgb(160, 160, 180);
    pub const DIM_TEXT: Color = Color::Rgb(100, 100, 120);
}
