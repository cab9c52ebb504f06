use raylib::prelude::*;

use crate::constants::SWIPE_MIN_DISTANCE;
use crate::gesture::{Swipe, SwipeTracker, TapZone, tap_zone};
use crate::hud::{ControlButton, control_at};

/// A discrete intent aimed at the sequencer or the shell around it. Every
/// input channel (keys, drag swipes, tap zones) funnels into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Advance,
    Retreat,
    TogglePause,
    Restart,
    Goto(usize),
    ToggleFullscreen,
    ToggleHelp,
    CloseOverlay,
}

const DIGIT_KEYS: [(KeyboardKey, usize); 10] = [
    (KeyboardKey::KEY_ONE, 0),
    (KeyboardKey::KEY_TWO, 1),
    (KeyboardKey::KEY_THREE, 2),
    (KeyboardKey::KEY_FOUR, 3),
    (KeyboardKey::KEY_FIVE, 4),
    (KeyboardKey::KEY_SIX, 5),
    (KeyboardKey::KEY_SEVEN, 6),
    (KeyboardKey::KEY_EIGHT, 7),
    (KeyboardKey::KEY_NINE, 8),
    (KeyboardKey::KEY_ZERO, 9),
];

/// Polls raylib once per frame and translates key presses and pointer
/// gestures into commands.
pub struct InputMap {
    swipe: SwipeTracker,
    press_origin: Option<Vector2>,
}

impl InputMap {
    pub fn new() -> Self {
        Self {
            swipe: SwipeTracker::new(),
            press_origin: None,
        }
    }

    pub fn poll(&mut self, rl: &RaylibHandle, now_ms: u64, commands: &mut Vec<Command>) {
        self.poll_keys(rl, commands);
        self.poll_pointer(rl, now_ms, commands);
    }

    fn poll_keys(&self, rl: &RaylibHandle, commands: &mut Vec<Command>) {
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            commands.push(Command::TogglePause);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            commands.push(Command::Retreat);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            commands.push(Command::Advance);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            commands.push(Command::Restart);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F) {
            commands.push(Command::ToggleFullscreen);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_H) {
            commands.push(Command::ToggleHelp);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            commands.push(Command::CloseOverlay);
        }
        for (key, index) in DIGIT_KEYS {
            if rl.is_key_pressed(key) {
                commands.push(Command::Goto(index));
            }
        }
    }

    /// A pointer press-and-release is either a swipe (enough fast horizontal
    /// travel), a click on a HUD control button, or a tap classified by
    /// zone. Anything in between is dropped.
    fn poll_pointer(&mut self, rl: &RaylibHandle, now_ms: u64, commands: &mut Vec<Command>) {
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            let pos = rl.get_mouse_position();
            self.press_origin = Some(pos);
            self.swipe.begin(pos.x, pos.y, now_ms);
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            let pos = rl.get_mouse_position();
            let origin = self.press_origin.take();
            match self.swipe.end(pos.x, pos.y, now_ms) {
                Some(Swipe::Left) => commands.push(Command::Advance),
                Some(Swipe::Right) => commands.push(Command::Retreat),
                None => {
                    let travelled = origin
                        .map(|o| (pos.x - o.x).hypot(pos.y - o.y))
                        .unwrap_or(f32::MAX);
                    if travelled < SWIPE_MIN_DISTANCE {
                        let width = rl.get_screen_width() as f32;
                        let height = rl.get_screen_height() as f32;
                        if let Some(command) = click_command(pos.x, pos.y, width, height) {
                            commands.push(command);
                        }
                    }
                }
            }
        }
    }
}

/// Classifies a click: HUD control buttons win over the tap zones, so a
/// press on a control never doubles as a navigation tap.
fn click_command(x: f32, y: f32, width: f32, height: f32) -> Option<Command> {
    if let Some(button) = control_at(x, y, width, height) {
        return Some(match button {
            ControlButton::Previous => Command::Retreat,
            ControlButton::PlayPause => Command::TogglePause,
            ControlButton::Next => Command::Advance,
            ControlButton::Restart => Command::Restart,
            ControlButton::Fullscreen => Command::ToggleFullscreen,
        });
    }
    match tap_zone(x, y, width, height)? {
        TapZone::Previous => Some(Command::Retreat),
        TapZone::Next => Some(Command::Advance),
        TapZone::TogglePause => Some(Command::TogglePause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CONTROL_BUTTON_SPACING, HUD_MARGIN};

    #[test]
    fn control_buttons_emit_their_commands() {
        let (w, h) = (1280.0, 720.0);
        let cy = h - 2.0 * HUD_MARGIN;
        let center = w * 0.5;
        assert_eq!(
            click_command(center - 2.0 * CONTROL_BUTTON_SPACING, cy, w, h),
            Some(Command::Retreat)
        );
        assert_eq!(
            click_command(center - CONTROL_BUTTON_SPACING, cy, w, h),
            Some(Command::TogglePause)
        );
        assert_eq!(click_command(center, cy, w, h), Some(Command::Advance));
        assert_eq!(
            click_command(center + CONTROL_BUTTON_SPACING, cy, w, h),
            Some(Command::Restart)
        );
        assert_eq!(
            click_command(center + 2.0 * CONTROL_BUTTON_SPACING, cy, w, h),
            Some(Command::ToggleFullscreen)
        );
        assert_eq!(
            click_command(center + 3.0 * CONTROL_BUTTON_SPACING, cy, w, h),
            None,
            "past the row's end there is nothing to click"
        );
    }

    #[test]
    fn clicks_inside_the_band_still_navigate() {
        let (w, h) = (1280.0, 720.0);
        assert_eq!(click_command(100.0, 400.0, w, h), Some(Command::Retreat));
        assert_eq!(click_command(1200.0, 400.0, w, h), Some(Command::Advance));
        assert_eq!(
            click_command(640.0, 400.0, w, h),
            Some(Command::TogglePause)
        );
    }
}
