use crate::constants::{
    SWIPE_MAX_DURATION_MS, SWIPE_MIN_DISTANCE, TAP_BAND_BOTTOM, TAP_BAND_TOP,
};

/// Direction of a recognized horizontal swipe. Swiping left requests the
/// next slide, swiping right the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Left,
    Right,
}

/// Third of the tap band a press-and-release landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapZone {
    Previous,
    TogglePause,
    Next,
}

#[derive(Debug, Clone, Copy)]
struct Origin {
    x: f32,
    y: f32,
    started_ms: u64,
}

/// Tracks one pointer gesture at a time. A gesture qualifies as a swipe when
/// it travels at least `SWIPE_MIN_DISTANCE` horizontally, more horizontally
/// than vertically, and completes within `SWIPE_MAX_DURATION_MS`.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    origin: Option<Origin>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, x: f32, y: f32, now_ms: u64) {
        self.origin = Some(Origin {
            x,
            y,
            started_ms: now_ms,
        });
    }

    pub fn in_progress(&self) -> bool {
        self.origin.is_some()
    }

    /// Ends the gesture and classifies it. Non-qualifying gestures return
    /// `None` so the caller can fall back to tap-zone handling.
    pub fn end(&mut self, x: f32, y: f32, now_ms: u64) -> Option<Swipe> {
        let origin = self.origin.take()?;
        if now_ms.saturating_sub(origin.started_ms) > SWIPE_MAX_DURATION_MS {
            return None;
        }
        let dx = x - origin.x;
        let dy = y - origin.y;
        if dx.abs() < SWIPE_MIN_DISTANCE || dx.abs() <= dy.abs() {
            return None;
        }
        Some(if dx < 0.0 { Swipe::Left } else { Swipe::Right })
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }
}

/// Classifies a tap by horizontal third inside the central vertical band.
/// Taps above or below the band (title area, HUD controls) do not navigate.
pub fn tap_zone(x: f32, y: f32, width: f32, height: f32) -> Option<TapZone> {
    if y < height * TAP_BAND_TOP || y > height * TAP_BAND_BOTTOM {
        return None;
    }
    let third = width / 3.0;
    Some(if x < third {
        TapZone::Previous
    } else if x > 2.0 * third {
        TapZone::Next
    } else {
        TapZone::TogglePause
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_horizontal_drag_is_a_swipe() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(200.0, 300.0, 0);
        assert_eq!(tracker.end(140.0, 310.0, 200), Some(Swipe::Left));

        tracker.begin(200.0, 300.0, 1000);
        assert_eq!(tracker.end(260.0, 290.0, 1200), Some(Swipe::Right));
    }

    #[test]
    fn slow_gesture_is_not_a_swipe() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(200.0, 300.0, 0);
        assert_eq!(tracker.end(100.0, 300.0, 600), None);
    }

    #[test]
    fn short_travel_is_not_a_swipe() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(200.0, 300.0, 0);
        assert_eq!(tracker.end(160.0, 300.0, 100), None);
    }

    #[test]
    fn vertical_drag_is_not_a_swipe() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(200.0, 100.0, 0);
        assert_eq!(tracker.end(130.0, 400.0, 200), None);
    }

    #[test]
    fn gesture_is_consumed_once() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(200.0, 300.0, 0);
        assert_eq!(tracker.end(120.0, 300.0, 100), Some(Swipe::Left));
        assert_eq!(tracker.end(120.0, 300.0, 100), None);
        assert!(!tracker.in_progress());
    }

    #[test]
    fn cancelled_gesture_yields_nothing() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(200.0, 300.0, 0);
        tracker.cancel();
        assert_eq!(tracker.end(100.0, 300.0, 100), None);
    }

    #[test]
    fn tap_zones_split_the_band_in_thirds() {
        let (w, h) = (1200.0, 800.0);
        assert_eq!(tap_zone(100.0, 400.0, w, h), Some(TapZone::Previous));
        assert_eq!(tap_zone(600.0, 400.0, w, h), Some(TapZone::TogglePause));
        assert_eq!(tap_zone(1100.0, 400.0, w, h), Some(TapZone::Next));
    }

    #[test]
    fn taps_outside_the_band_are_ignored() {
        let (w, h) = (1200.0, 800.0);
        assert_eq!(tap_zone(600.0, 50.0, w, h), None);
        assert_eq!(tap_zone(600.0, 780.0, w, h), None);
    }
}
