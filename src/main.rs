use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod constants;
mod deck;
mod gesture;
mod hud;
mod input;
mod media;
mod sequencer;
mod slide;
mod texture_loader;

use crate::constants::*;
use crate::deck::{Deck, MediaKind};
use crate::hud::{Hud, ToastKind};
use crate::input::{Command, InputMap};
use crate::sequencer::{Sequencer, SequencerEvent, SuspendSource};
use crate::slide::Slide;
use crate::texture_loader::{load_sorted_media_paths, load_texture_with_exif_rotation};

/// Auto-advancing wedding-invitation slideshow.
#[derive(Parser)]
#[command(name = "invitation-slideshow", version)]
struct Args {
    /// Directory holding the deck's images and videos, shown in file-name order
    deck_dir: PathBuf,

    /// Hold per slide, in milliseconds (bounded videos override this)
    #[arg(long, default_value_t = DEFAULT_SLIDE_DURATION_MS)]
    duration_ms: u64,

    /// Start in fullscreen
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    // --- Load the deck ---
    let paths = load_sorted_media_paths(&args.deck_dir)?;
    let mut deck = Deck::from_paths(paths)
        .with_context(|| format!("no usable deck in {}", args.deck_dir.display()))?;
    media::probe_deck_durations(&mut deck);
    info!(slides = deck.len(), "deck loaded");

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH, RENDER_HEIGHT)
        .title("Wedding Invitation")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    // Escape closes the help overlay, not the window.
    rl.set_exit_key(None);
    if args.fullscreen {
        rl.toggle_fullscreen();
    }

    // --- Build slide visuals ---
    let mut slides = load_slide_textures(&mut rl, &thread, &deck);

    let start = Instant::now();
    let now_ms = start.elapsed().as_millis() as u64;
    let mut sequencer = Sequencer::new(deck.hold_durations_ms(args.duration_ms), now_ms)?;
    let mut hud = Hud::new();
    let mut input = InputMap::new();
    let mut help_open = false;
    let mut was_hidden = false;
    let mut commands: Vec<Command> = Vec::new();

    hud.notify("Welcome to our wedding invitation!", ToastKind::Success);

    // --- Main loop ---
    while !rl.window_should_close() {
        let now_ms = start.elapsed().as_millis() as u64;
        let dt = rl.get_frame_time();

        // Window hidden/minimized acts as a soft pause that never cancels
        // the user's own pause or the help overlay's.
        let hidden = rl.is_window_hidden() || rl.is_window_minimized();
        if hidden != was_hidden {
            if hidden {
                sequencer.suspend(SuspendSource::Visibility, now_ms);
            } else {
                sequencer.resume(SuspendSource::Visibility, now_ms);
            }
            was_hidden = hidden;
        }

        commands.clear();
        input.poll(&rl, now_ms, &mut commands);
        for &command in &commands {
            apply_command(
                command,
                now_ms,
                &mut sequencer,
                &mut hud,
                &mut help_open,
                &mut rl,
            );
        }

        sequencer.tick(now_ms);

        while let Some(event) = sequencer.poll_event() {
            match event {
                SequencerEvent::SlideDeactivated { index } => {
                    if let Some(slide) = slides.get_mut(index) {
                        slide.deactivate();
                    }
                }
                SequencerEvent::SlideActivated { index } => {
                    if let Some(slide) = slides.get_mut(index) {
                        slide.activate();
                    }
                }
                SequencerEvent::PlaybackChanged { .. } => {
                    // The HUD glyph reads the sequencer state directly.
                }
                SequencerEvent::LoopCompleted => {
                    hud.notify("Complete love story! Starting again...", ToastKind::Success);
                }
            }
        }

        for slide in slides.iter_mut() {
            slide.update(dt);
        }
        hud.update(dt);

        // --- Render ---
        let screen_width = rl.get_screen_width() as f32;
        let screen_height = rl.get_screen_height() as f32;
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);

        for slide in slides.iter() {
            slide.draw(&mut d, screen_width, screen_height);
        }
        hud.draw(
            &mut d,
            screen_width,
            screen_height,
            sequencer.progress(),
            sequencer.current_index(),
            sequencer.len(),
            sequencer.is_paused(),
        );
        if help_open {
            draw_help_overlay(&mut d, screen_width, screen_height);
        }
    }

    Ok(())
}

fn apply_command(
    command: Command,
    now_ms: u64,
    sequencer: &mut Sequencer,
    hud: &mut Hud,
    help_open: &mut bool,
    rl: &mut RaylibHandle,
) {
    // The help overlay is modal: while open, only commands that close it
    // are honored.
    if *help_open && !matches!(command, Command::ToggleHelp | Command::CloseOverlay) {
        return;
    }
    match command {
        Command::Advance => sequencer.advance(now_ms),
        Command::Retreat => sequencer.retreat(now_ms),
        Command::Goto(index) => sequencer.goto_index(index, now_ms),
        Command::TogglePause => {
            sequencer.toggle_pause(now_ms);
            if sequencer.manual_paused() {
                hud.notify("Slideshow paused", ToastKind::Info);
            } else {
                hud.notify("Slideshow resumed", ToastKind::Success);
            }
        }
        Command::Restart => {
            sequencer.restart(now_ms);
            hud.notify("Slideshow restarted!", ToastKind::Success);
        }
        Command::ToggleFullscreen => {
            // Best effort; a refused switch must never touch the sequencer.
            let entering = !rl.is_window_fullscreen();
            rl.toggle_fullscreen();
            if fullscreen_request_failed(entering, rl.is_window_fullscreen()) {
                hud.notify("Fullscreen not available", ToastKind::Error);
            }
        }
        Command::ToggleHelp => {
            *help_open = !*help_open;
            if *help_open {
                sequencer.suspend(SuspendSource::Modal, now_ms);
            } else {
                sequencer.resume(SuspendSource::Modal, now_ms);
            }
        }
        Command::CloseOverlay => {
            if *help_open {
                *help_open = false;
                sequencer.resume(SuspendSource::Modal, now_ms);
            }
        }
    }
}

/// Only an *entering* request that left the window windowed is a platform
/// refusal worth reporting; leaving fullscreen ends with a windowed window
/// by definition.
fn fullscreen_request_failed(entering: bool, now_fullscreen: bool) -> bool {
    entering && !now_fullscreen
}

/// Loads one texture per deck entry. Media failures are recoverable: the
/// slide gets a placeholder and the show goes on.
fn load_slide_textures(rl: &mut RaylibHandle, thread: &RaylibThread, deck: &Deck) -> Vec<Slide> {
    let mut slides = Vec::with_capacity(deck.len());
    for source in deck.slides() {
        let texture = match source.kind {
            MediaKind::Image => load_texture_with_exif_rotation(rl, thread, &source.path),
            MediaKind::Video => media::extract_poster_frame(&source.path).and_then(|png| {
                let image = Image::load_image_from_mem(".png", &png)
                    .map_err(|e| anyhow::anyhow!("bad poster frame: {e}"))?;
                rl.load_texture_from_image(thread, &image)
                    .map_err(|e| anyhow::anyhow!("poster texture failed: {e}"))
            }),
        };
        let texture = match texture {
            Ok(texture) => texture,
            Err(e) => {
                warn!(path = %source.path.display(), error = %e, "slide media failed, using placeholder");
                let placeholder =
                    Image::gen_image_color(RENDER_WIDTH, RENDER_HEIGHT, Color::DARKGRAY);
                match rl.load_texture_from_image(thread, &placeholder) {
                    Ok(texture) => texture,
                    Err(e) => {
                        // Only reachable with an unusable GPU context.
                        panic!("failed to create placeholder texture: {e}");
                    }
                }
            }
        };
        slides.push(Slide::new(texture));
    }
    slides
}

fn draw_help_overlay(d: &mut RaylibDrawHandle, screen_width: f32, screen_height: f32) {
    d.draw_rectangle(
        0,
        0,
        screen_width as i32,
        screen_height as i32,
        Color::BLACK.fade(0.7),
    );
    let lines = [
        "Controls",
        "",
        "Space        play / pause",
        "Left/Right   previous / next slide",
        "1-9, 0       jump to slide",
        "R            restart from the beginning",
        "F            fullscreen",
        "H / Escape   close this help",
        "",
        "Swipe or tap the left/right side to navigate.",
    ];
    let font_size = 22;
    let line_height = 30;
    let block_height = (lines.len() as i32) * line_height;
    let mut y = (screen_height as i32 - block_height) / 2;
    for line in lines {
        let width = d.measure_text(line, font_size);
        d.draw_text(
            line,
            (screen_width as i32 - width) / 2,
            y,
            font_size,
            Color::WHITE,
        );
        y += line_height;
    }
}

#[cfg(test)]
mod tests {
    use super::fullscreen_request_failed;

    #[test]
    fn leaving_fullscreen_is_never_reported_as_a_failure() {
        // Exit request: the window ends up windowed, which is success.
        assert!(!fullscreen_request_failed(false, false));
        // Refused enter request is the only reportable case.
        assert!(fullscreen_request_failed(true, false));
        assert!(!fullscreen_request_failed(true, true));
    }
}
