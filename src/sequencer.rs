use std::collections::VecDeque;

use anyhow::{Result, bail};
use tracing::debug;

use crate::constants::TRANSITION_SETTLE_MS;

/// An independent reason autoplay is suspended. Sources are tracked
/// separately so resuming one never cancels a pause owned by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspendSource {
    Modal,
    Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    SlideDeactivated { index: usize },
    SlideActivated { index: usize },
    PlaybackChanged { paused: bool },
    LoopCompleted,
}

/// A delayed activation of the incoming slide. A single replaceable slot:
/// every navigation operation overwrites it, so a stale schedule can never
/// co-fire with a fresh one.
#[derive(Debug, Clone, Copy)]
struct PendingActivation {
    index: usize,
    due_ms: u64,
}

/// The slide-advancement state machine. Owns the authoritative index and
/// pause flags; everything visual subscribes through the event queue.
///
/// All operations take `now_ms`, a monotonic millisecond clock supplied by
/// the caller, which keeps the whole machine deterministic under test.
pub struct Sequencer {
    durations: Vec<u64>,
    current: usize,
    manual_paused: bool,
    modal_suspended: bool,
    visibility_suspended: bool,
    cycle_start_ms: u64,
    active_duration_ms: u64,
    pending: Option<PendingActivation>,
    events: VecDeque<SequencerEvent>,
}

impl Sequencer {
    /// `durations` holds the resolved hold time per slide, in order: the
    /// default hold for images, the probed length for bounded videos.
    pub fn new(durations: Vec<u64>, now_ms: u64) -> Result<Self> {
        if durations.is_empty() {
            bail!("slide deck is empty, nothing to sequence");
        }
        let active_duration_ms = durations[0];
        let mut events = VecDeque::new();
        events.push_back(SequencerEvent::SlideActivated { index: 0 });
        Ok(Self {
            durations,
            current: 0,
            manual_paused: false,
            modal_suspended: false,
            visibility_suspended: false,
            cycle_start_ms: now_ms,
            active_duration_ms,
            pending: None,
            events,
        })
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Effective paused state: any suspend source or a manual pause.
    pub fn is_paused(&self) -> bool {
        self.manual_paused || self.modal_suspended || self.visibility_suspended
    }

    pub fn manual_paused(&self) -> bool {
        self.manual_paused
    }

    pub fn progress(&self) -> f32 {
        (self.current + 1) as f32 / self.durations.len() as f32
    }

    pub fn poll_event(&mut self) -> Option<SequencerEvent> {
        self.events.pop_front()
    }

    /// Move to the next slide. Landing back on slide 0 while playing means a
    /// full loop just finished.
    pub fn advance(&mut self, now_ms: u64) {
        let target = (self.current + 1) % self.durations.len();
        self.move_to(target, now_ms);
        if target == 0 && !self.is_paused() {
            debug!("sequencer: loop completed");
            self.events.push_back(SequencerEvent::LoopCompleted);
        }
    }

    pub fn retreat(&mut self, now_ms: u64) {
        let n = self.durations.len();
        let target = (self.current + n - 1) % n;
        self.move_to(target, now_ms);
    }

    /// Jump to an arbitrary slide. Out-of-range and same-index requests are
    /// silently ignored.
    pub fn goto_index(&mut self, index: usize, now_ms: u64) {
        if index >= self.durations.len() || index == self.current {
            return;
        }
        self.move_to(index, now_ms);
    }

    pub fn toggle_pause(&mut self, now_ms: u64) {
        self.manual_paused = !self.manual_paused;
        let paused = self.is_paused();
        if !paused {
            // Restart elapsed-time accounting so a stale window cannot
            // trigger an immediate advance on resume.
            self.cycle_start_ms = now_ms;
        }
        debug!(paused, "sequencer: manual pause toggled");
        self.events
            .push_back(SequencerEvent::PlaybackChanged { paused });
    }

    pub fn suspend(&mut self, source: SuspendSource, _now_ms: u64) {
        let was_paused = self.is_paused();
        match source {
            SuspendSource::Modal => self.modal_suspended = true,
            SuspendSource::Visibility => self.visibility_suspended = true,
        }
        if !was_paused {
            debug!(?source, "sequencer: suspended");
            self.events
                .push_back(SequencerEvent::PlaybackChanged { paused: true });
        }
    }

    /// Clears one suspend source. Playback only resumes once no other
    /// source remains active and the user has not paused explicitly.
    pub fn resume(&mut self, source: SuspendSource, now_ms: u64) {
        let was_paused = self.is_paused();
        match source {
            SuspendSource::Modal => self.modal_suspended = false,
            SuspendSource::Visibility => self.visibility_suspended = false,
        }
        if was_paused && !self.is_paused() {
            self.cycle_start_ms = now_ms;
            debug!(?source, "sequencer: resumed");
            self.events
                .push_back(SequencerEvent::PlaybackChanged { paused: false });
        }
    }

    /// Back to slide 0 with a clean schedule and all pause flags cleared.
    pub fn restart(&mut self, now_ms: u64) {
        let was_paused = self.is_paused();
        self.pending = None;
        self.manual_paused = false;
        self.modal_suspended = false;
        self.visibility_suspended = false;
        self.events
            .push_back(SequencerEvent::SlideDeactivated { index: self.current });
        self.current = 0;
        self.pending = Some(PendingActivation {
            index: 0,
            due_ms: now_ms + TRANSITION_SETTLE_MS,
        });
        self.cycle_start_ms = now_ms;
        debug!("sequencer: restarted");
        if was_paused {
            self.events
                .push_back(SequencerEvent::PlaybackChanged { paused: false });
        }
    }

    /// The single authoritative scheduler step, called once per frame.
    /// Fires a due activation first, then auto-advances once the active
    /// slide's window has elapsed.
    pub fn tick(&mut self, now_ms: u64) {
        if let Some(pending) = self.pending {
            if now_ms >= pending.due_ms {
                self.pending = None;
                // The active duration is resolved at the moment the slide
                // becomes active.
                self.active_duration_ms = self.durations[pending.index];
                self.events
                    .push_back(SequencerEvent::SlideActivated { index: pending.index });
            }
        }
        if !self.is_paused()
            && now_ms.saturating_sub(self.cycle_start_ms) >= self.active_duration_ms
        {
            self.advance(now_ms);
        }
    }

    fn move_to(&mut self, target: usize, now_ms: u64) {
        self.events
            .push_back(SequencerEvent::SlideDeactivated { index: self.current });
        self.current = target;
        // Replaces any schedule still in flight.
        self.pending = Some(PendingActivation {
            index: target,
            due_ms: now_ms + TRANSITION_SETTLE_MS,
        });
        if !self.is_paused() {
            self.cycle_start_ms = now_ms;
        }
        debug!(target, "sequencer: slide change");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sequencer(n: usize, duration_ms: u64) -> Sequencer {
        Sequencer::new(vec![duration_ms; n], 0).unwrap()
    }

    fn drain(seq: &mut Sequencer) -> Vec<SequencerEvent> {
        std::iter::from_fn(|| seq.poll_event()).collect()
    }

    #[test]
    fn empty_deck_is_a_configuration_error() {
        assert!(Sequencer::new(Vec::new(), 0).is_err());
    }

    #[test]
    fn advance_wraps_modulo_deck_length() {
        let mut seq = sequencer(5, 3700);
        for k in 1..=11 {
            seq.advance(0);
            assert_eq!(seq.current_index(), k % 5);
        }
    }

    #[test]
    fn retreat_is_the_inverse_of_advance() {
        let mut seq = sequencer(12, 3700);
        for start in 0..12 {
            seq.goto_index(start, 0);
            seq.advance(0);
            seq.retreat(0);
            assert_eq!(seq.current_index(), start);
        }
    }

    #[test]
    fn retreat_from_zero_wraps_to_last() {
        let mut seq = sequencer(12, 3700);
        seq.retreat(0);
        assert_eq!(seq.current_index(), 11);
    }

    #[test]
    fn goto_same_or_out_of_range_is_a_noop() {
        let mut seq = sequencer(12, 3700);
        drain(&mut seq);
        seq.goto_index(0, 0);
        seq.goto_index(12, 0);
        seq.goto_index(usize::MAX, 0);
        assert_eq!(seq.current_index(), 0);
        assert!(drain(&mut seq).is_empty());
    }

    #[test]
    fn toggle_pause_twice_restores_original_state() {
        let mut seq = sequencer(12, 3700);
        assert!(!seq.is_paused());
        seq.toggle_pause(0);
        assert!(seq.is_paused());
        seq.toggle_pause(0);
        assert!(!seq.is_paused());
    }

    #[test]
    fn suspend_sources_are_independent() {
        let mut seq = sequencer(12, 3700);
        seq.suspend(SuspendSource::Modal, 0);
        seq.suspend(SuspendSource::Visibility, 0);
        seq.resume(SuspendSource::Modal, 0);
        assert!(seq.is_paused(), "visibility suspend must still hold");
        seq.resume(SuspendSource::Visibility, 0);
        assert!(!seq.is_paused());
    }

    #[test]
    fn resume_never_cancels_a_manual_pause() {
        let mut seq = sequencer(12, 3700);
        seq.toggle_pause(0);
        seq.suspend(SuspendSource::Modal, 0);
        seq.resume(SuspendSource::Modal, 0);
        assert!(seq.is_paused());
        seq.toggle_pause(100);
        assert!(!seq.is_paused());
    }

    #[test]
    fn suspend_and_resume_emit_playback_changes_once() {
        let mut seq = sequencer(12, 3700);
        drain(&mut seq);
        seq.suspend(SuspendSource::Modal, 0);
        seq.suspend(SuspendSource::Visibility, 0);
        let events = drain(&mut seq);
        assert_eq!(
            events,
            vec![SequencerEvent::PlaybackChanged { paused: true }],
            "second suspend source must not re-announce the pause"
        );
        seq.resume(SuspendSource::Modal, 0);
        assert!(drain(&mut seq).is_empty());
        seq.resume(SuspendSource::Visibility, 0);
        assert_eq!(
            drain(&mut seq),
            vec![SequencerEvent::PlaybackChanged { paused: false }]
        );
    }

    #[test]
    fn autoplay_advances_after_each_window() {
        let mut seq = sequencer(12, 5000);
        for t in (0..=5000u64).step_by(100) {
            seq.tick(t);
        }
        assert_eq!(seq.current_index(), 1);
    }

    #[test]
    fn full_loop_emits_exactly_one_completion() {
        let mut seq = sequencer(12, 5000);
        let mut completions = 0;
        for t in (0..=60_100u64).step_by(100) {
            seq.tick(t);
            while let Some(event) = seq.poll_event() {
                if event == SequencerEvent::LoopCompleted {
                    completions += 1;
                }
            }
        }
        assert_eq!(seq.current_index(), 0);
        assert_eq!(completions, 1);
    }

    #[test]
    fn video_duration_overrides_the_default_hold() {
        let mut durations = vec![5000; 12];
        durations[3] = 7500;
        let mut seq = Sequencer::new(durations, 0).unwrap();
        seq.goto_index(3, 0);
        seq.tick(TRANSITION_SETTLE_MS);
        assert_eq!(seq.current_index(), 3);
        // The 5000ms default must not fire on the video slide.
        seq.tick(5000);
        assert_eq!(seq.current_index(), 3);
        seq.tick(7500);
        assert_eq!(seq.current_index(), 4);
    }

    #[test]
    fn paused_sequencer_never_auto_advances() {
        let mut seq = sequencer(12, 3700);
        seq.toggle_pause(0);
        for t in (0..=60_000u64).step_by(500) {
            seq.tick(t);
        }
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn resume_restarts_the_window_from_now() {
        let mut seq = sequencer(12, 3700);
        seq.toggle_pause(0);
        seq.tick(10_000);
        assert_eq!(seq.current_index(), 0);
        seq.toggle_pause(10_000);
        // No spurious advance from the stale 10s of elapsed time.
        seq.tick(10_100);
        assert_eq!(seq.current_index(), 0);
        seq.tick(13_700);
        assert_eq!(seq.current_index(), 1);
    }

    #[test]
    fn manual_navigation_replaces_a_pending_activation() {
        let mut seq = sequencer(12, 3700);
        drain(&mut seq);
        seq.advance(0);
        seq.retreat(10);
        seq.tick(10 + TRANSITION_SETTLE_MS);
        let activations: Vec<_> = drain(&mut seq)
            .into_iter()
            .filter(|e| matches!(e, SequencerEvent::SlideActivated { .. }))
            .collect();
        assert_eq!(
            activations,
            vec![SequencerEvent::SlideActivated { index: 0 }],
            "only the latest navigation may activate"
        );
    }

    #[test]
    fn advance_to_zero_while_paused_is_not_a_completion() {
        let mut seq = sequencer(3, 3700);
        seq.goto_index(2, 0);
        seq.toggle_pause(0);
        drain(&mut seq);
        seq.advance(0);
        assert_eq!(seq.current_index(), 0);
        assert!(!drain(&mut seq).contains(&SequencerEvent::LoopCompleted));
    }

    #[test]
    fn restart_clears_pauses_and_returns_to_zero() {
        let mut seq = sequencer(12, 3700);
        seq.goto_index(7, 0);
        seq.toggle_pause(0);
        seq.suspend(SuspendSource::Modal, 0);
        seq.restart(1000);
        assert_eq!(seq.current_index(), 0);
        assert!(!seq.is_paused());
        seq.tick(1000 + TRANSITION_SETTLE_MS);
        let events = drain(&mut seq);
        assert!(events.contains(&SequencerEvent::SlideActivated { index: 0 }));
    }

    proptest! {
        #[test]
        fn advance_arithmetic_is_modular(n in 1usize..64, start in 0usize..64, k in 0usize..256) {
            let start = start % n;
            let mut seq = sequencer(n, 3700);
            seq.goto_index(start, 0);
            for _ in 0..k {
                seq.advance(0);
            }
            prop_assert_eq!(seq.current_index(), (start + k) % n);
        }

        #[test]
        fn retreat_then_advance_is_identity(n in 1usize..64, start in 0usize..64) {
            let start = start % n;
            let mut seq = sequencer(n, 3700);
            seq.goto_index(start, 0);
            seq.retreat(0);
            seq.advance(0);
            prop_assert_eq!(seq.current_index(), start);
        }
    }
}
