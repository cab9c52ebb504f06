use raylib::prelude::*;

use crate::constants::{
    CONTROL_BUTTON_SIZE, CONTROL_BUTTON_SPACING, HUD_MARGIN, PROGRESS_BAR_HEIGHT,
    PROGRESS_BAR_WIDTH, TOAST_FADE_SECS, TOAST_HOLD_SECS,
};

/// One of the clickable controls in the bottom row, mirroring the keyboard
/// commands for pointer-only viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlButton {
    Previous,
    PlayPause,
    Next,
    Restart,
    Fullscreen,
}

const CONTROL_BUTTONS: [ControlButton; 5] = [
    ControlButton::Previous,
    ControlButton::PlayPause,
    ControlButton::Next,
    ControlButton::Restart,
    ControlButton::Fullscreen,
];

fn control_center(slot: usize, screen_width: f32, screen_height: f32) -> (f32, f32) {
    let offset =
        (slot as f32 - (CONTROL_BUTTONS.len() as f32 - 1.0) / 2.0) * CONTROL_BUTTON_SPACING;
    (
        screen_width * 0.5 + offset,
        screen_height - 2.0 * HUD_MARGIN,
    )
}

/// Hit-tests the control row. The row sits below the tap band, so a press
/// landing here is a button press, never a tap-zone navigation.
pub fn control_at(x: f32, y: f32, screen_width: f32, screen_height: f32) -> Option<ControlButton> {
    let half = CONTROL_BUTTON_SIZE * 0.5;
    for (slot, button) in CONTROL_BUTTONS.iter().enumerate() {
        let (cx, cy) = control_center(slot, screen_width, screen_height);
        if (x - cx).abs() <= half && (y - cy).abs() <= half {
            return Some(*button);
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn color(self) -> Color {
        match self {
            ToastKind::Info => Color::new(50, 120, 190, 255),
            ToastKind::Success => Color::new(60, 150, 90, 255),
            ToastKind::Error => Color::new(190, 60, 60, 255),
        }
    }
}

/// A transient notification: fade in, hold, fade out.
#[derive(Debug)]
pub struct Toast {
    message: String,
    kind: ToastKind,
    age: f32,
}

impl Toast {
    fn new(message: String, kind: ToastKind) -> Self {
        Self {
            message,
            kind,
            age: 0.0,
        }
    }

    fn lifetime() -> f32 {
        TOAST_FADE_SECS + TOAST_HOLD_SECS + TOAST_FADE_SECS
    }

    fn expired(&self) -> bool {
        self.age >= Self::lifetime()
    }

    fn alpha(&self) -> f32 {
        if self.age < TOAST_FADE_SECS {
            self.age / TOAST_FADE_SECS
        } else if self.age < TOAST_FADE_SECS + TOAST_HOLD_SECS {
            1.0
        } else {
            ((Self::lifetime() - self.age) / TOAST_FADE_SECS).max(0.0)
        }
    }
}

/// The control surface drawn over the slides: progress bar, slide counter,
/// play/pause glyph, and at most one live toast (a new one replaces it).
pub struct Hud {
    toast: Option<Toast>,
}

impl Hud {
    pub fn new() -> Self {
        Self { toast: None }
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(Toast::new(message.into(), kind));
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(toast) = &mut self.toast {
            toast.age += dt;
            if toast.expired() {
                self.toast = None;
            }
        }
    }

    pub fn draw(
        &self,
        d: &mut RaylibDrawHandle,
        screen_width: f32,
        screen_height: f32,
        progress: f32,
        current: usize,
        total: usize,
        paused: bool,
    ) {
        self.draw_progress_bar(d, screen_width, screen_height, progress);
        self.draw_counter(d, screen_width, screen_height, current, total);
        self.draw_controls(d, screen_width, screen_height, paused);
        self.draw_toast(d, screen_width);
    }

    fn draw_progress_bar(
        &self,
        d: &mut RaylibDrawHandle,
        screen_width: f32,
        screen_height: f32,
        progress: f32,
    ) {
        let x = (screen_width - PROGRESS_BAR_WIDTH) * 0.5;
        let y = screen_height - 5.0 * HUD_MARGIN;
        d.draw_rectangle_rec(
            Rectangle::new(x, y, PROGRESS_BAR_WIDTH, PROGRESS_BAR_HEIGHT),
            Color::WHITE.fade(0.25),
        );
        d.draw_rectangle_rec(
            Rectangle::new(
                x,
                y,
                PROGRESS_BAR_WIDTH * progress.clamp(0.0, 1.0),
                PROGRESS_BAR_HEIGHT,
            ),
            Color::GOLD,
        );
    }

    fn draw_counter(
        &self,
        d: &mut RaylibDrawHandle,
        screen_width: f32,
        screen_height: f32,
        current: usize,
        total: usize,
    ) {
        let text = format!("{} / {}", current + 1, total);
        let font_size = 20;
        let width = d.measure_text(&text, font_size);
        d.draw_text(
            &text,
            (screen_width as i32 - width) / 2,
            (screen_height - 4.0 * HUD_MARGIN) as i32,
            font_size,
            Color::WHITE.fade(0.9),
        );
    }

    fn draw_controls(
        &self,
        d: &mut RaylibDrawHandle,
        screen_width: f32,
        screen_height: f32,
        paused: bool,
    ) {
        let color = Color::WHITE.fade(0.85);
        for (slot, button) in CONTROL_BUTTONS.iter().enumerate() {
            let (cx, cy) = control_center(slot, screen_width, screen_height);
            d.draw_circle(
                cx as i32,
                cy as i32,
                CONTROL_BUTTON_SIZE * 0.5,
                Color::BLACK.fade(0.45),
            );
            match button {
                ControlButton::PlayPause => {
                    if paused {
                        // Play triangle: pressing it resumes.
                        d.draw_triangle(
                            Vector2::new(cx - 6.0, cy - 8.0),
                            Vector2::new(cx - 6.0, cy + 8.0),
                            Vector2::new(cx + 8.0, cy),
                            color,
                        );
                    } else {
                        d.draw_rectangle_rec(
                            Rectangle::new(cx - 7.0, cy - 8.0, 5.0, 16.0),
                            color,
                        );
                        d.draw_rectangle_rec(Rectangle::new(cx + 2.0, cy - 8.0, 5.0, 16.0), color);
                    }
                }
                _ => {
                    // Labels match the keyboard bindings in the help overlay.
                    let label = match button {
                        ControlButton::Previous => "<",
                        ControlButton::Next => ">",
                        ControlButton::Restart => "R",
                        ControlButton::Fullscreen => "F",
                        ControlButton::PlayPause => unreachable!(),
                    };
                    let font_size = 20;
                    let width = d.measure_text(label, font_size);
                    d.draw_text(
                        label,
                        cx as i32 - width / 2,
                        cy as i32 - font_size / 2,
                        font_size,
                        color,
                    );
                }
            }
        }
    }

    fn draw_toast(&self, d: &mut RaylibDrawHandle, screen_width: f32) {
        let Some(toast) = &self.toast else {
            return;
        };
        let alpha = toast.alpha();
        let font_size = 18;
        let text_width = d.measure_text(&toast.message, font_size) as f32;
        let pad = 12.0;
        let rect = Rectangle::new(
            screen_width - text_width - 2.0 * pad - HUD_MARGIN,
            HUD_MARGIN,
            text_width + 2.0 * pad,
            font_size as f32 + 2.0 * pad,
        );
        d.draw_rectangle_rounded(rect, 0.3, 8, toast.kind.color().fade(0.9 * alpha));
        d.draw_text(
            &toast.message,
            (rect.x + pad) as i32,
            (rect.y + pad) as i32,
            font_size,
            Color::WHITE.fade(alpha),
        );
    }
}
