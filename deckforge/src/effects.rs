use ratatui::style::Color;
use tachyonfx::fx;
use tachyonfx::{Effect, EffectManager, Interpolation, Motion};

/// Our keyed effect manager using tachyonfx's built-in EffectManager
pub type FxManager = EffectManager<&'static str>;

// ─── Effect Factories ────────────────────────────────────────────────

const DARK: Color = Color::Rgb(11, 14, 20);

/// Startup: the freshly synced grids materialize from empty space
pub fn startup_coalesce() -> Effect {
    fx::coalesce((450, Interpolation::CubicOut))
}

/// Quick sweep across the screen after a successful mutation re-sync
pub fn grid_refresh_sweep() -> Effect {
    fx::sweep_in(
        Motion::LeftToRight,
        8,
        2,
        DARK,
        (300, Interpolation::QuadOut),
    )
}

/// Pulsing shimmer while the error popup is up
pub fn popup_shimmer() -> Effect {
    let shift = fx::hsl_shift_fg([12.0, 0.0, 0.12], (900, Interpolation::SineInOut));
    fx::repeating(fx::ping_pong(shift))
}
