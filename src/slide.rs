use raylib::prelude::*;

use crate::constants::ENTER_ANIMATION_SECS;

/// Enter-animation clock, kept separate from the texture so the easing is
/// testable without a window.
#[derive(Debug, Default)]
pub struct EnterAnimation {
    timer: f32,
    running: bool,
}

impl EnterAnimation {
    pub fn restart(&mut self) {
        self.timer = 0.0;
        self.running = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        self.timer += dt;
        if self.timer >= ENTER_ANIMATION_SECS {
            self.running = false;
            self.timer = ENTER_ANIMATION_SECS;
        }
    }

    /// Eased progress in [0, 1]; 1.0 once settled.
    pub fn progress(&self) -> f32 {
        let t = (self.timer / ENTER_ANIMATION_SECS).min(1.0);
        1.0 - (1.0 - t).powi(3) // easeOutCubic
    }
}

/// One slide's presentation state: its texture, whether it carries the
/// "current" marker, and the slide-in animation restarted on activation.
pub struct Slide {
    texture: Texture2D,
    active: bool,
    enter: EnterAnimation,
}

impl Slide {
    pub fn new(texture: Texture2D) -> Self {
        Self {
            texture,
            active: false,
            enter: EnterAnimation::default(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.enter.restart();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn update(&mut self, dt: f32) {
        if self.active {
            self.enter.update(dt);
        }
    }

    /// Draws the slide letterboxed into the window, fading and rising into
    /// place while the enter animation runs.
    pub fn draw(&self, d: &mut RaylibDrawHandle, screen_width: f32, screen_height: f32) {
        if !self.active {
            return;
        }
        let t = self.enter.progress();

        let tex_width = self.texture.width() as f32;
        let tex_height = self.texture.height() as f32;
        let scale = (screen_width / tex_width).min(screen_height / tex_height);
        let scaled_width = tex_width * scale;
        let scaled_height = tex_height * scale;

        let rise = (1.0 - t) * 40.0;
        let dest = Rectangle::new(
            (screen_width - scaled_width) * 0.5,
            (screen_height - scaled_height) * 0.5 + rise,
            scaled_width,
            scaled_height,
        );

        d.draw_texture_pro(
            &self.texture,
            Rectangle::new(0.0, 0.0, tex_width, tex_height),
            dest,
            Vector2::zero(),
            0.0,
            Color::WHITE.fade(t),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_animation_settles_after_its_duration() {
        let mut anim = EnterAnimation::default();
        anim.restart();
        assert!(anim.progress() < 0.05);
        anim.update(ENTER_ANIMATION_SECS / 2.0);
        let midway = anim.progress();
        assert!(midway > 0.0 && midway < 1.0);
        anim.update(ENTER_ANIMATION_SECS);
        assert_eq!(anim.progress(), 1.0);
    }

    #[test]
    fn restart_rewinds_a_settled_animation() {
        let mut anim = EnterAnimation::default();
        anim.restart();
        anim.update(2.0 * ENTER_ANIMATION_SECS);
        assert_eq!(anim.progress(), 1.0);
        anim.restart();
        assert!(anim.progress() < 0.05);
    }

    #[test]
    fn ease_out_front_loads_the_motion() {
        let mut anim = EnterAnimation::default();
        anim.restart();
        anim.update(ENTER_ANIMATION_SECS / 2.0);
        // easeOutCubic covers well over half the distance by midpoint.
        assert!(anim.progress() > 0.8);
    }
}
