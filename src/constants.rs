pub const RENDER_WIDTH: i32 = 1280;              // Default window width
pub const RENDER_HEIGHT: i32 = 720;              // Default window height
pub const FPS: u32 = 60;                         // Frames per second

pub const DEFAULT_SLIDE_DURATION_MS: u64 = 3700; // Hold per slide (12 slides ≈ 44s total)
pub const TRANSITION_SETTLE_MS: u64 = 50;        // Gap between deactivate and activate
pub const ENTER_ANIMATION_SECS: f32 = 0.8;       // Slide-in animation length (seconds)

pub const SWIPE_MIN_DISTANCE: f32 = 50.0;        // Minimum horizontal travel (px)
pub const SWIPE_MAX_DURATION_MS: u64 = 500;      // Gesture must complete within this

pub const TAP_BAND_TOP: f32 = 0.15;              // Tap zones live in this vertical band,
pub const TAP_BAND_BOTTOM: f32 = 0.80;           // as fractions of window height

pub const TOAST_FADE_SECS: f32 = 0.3;            // Toast fade in/out (seconds)
pub const TOAST_HOLD_SECS: f32 = 3.0;            // Toast hold at full opacity (seconds)

pub const PROGRESS_BAR_WIDTH: f32 = 320.0;
pub const PROGRESS_BAR_HEIGHT: f32 = 6.0;
pub const HUD_MARGIN: f32 = 20.0;
pub const CONTROL_BUTTON_SIZE: f32 = 36.0;       // Clickable control hit box (px)
pub const CONTROL_BUTTON_SPACING: f32 = 48.0;    // Center-to-center in the control row
