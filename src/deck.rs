use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Classifies a file by extension. Unsupported files are skipped by the
/// directory scan rather than treated as errors.
pub fn media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path.extension().and_then(|s| s.to_str())?;
    match ext.to_lowercase().as_str() {
        "png" | "jpg" | "jpeg" | "bmp" | "gif" => Some(MediaKind::Image),
        "mp4" | "mov" | "webm" | "mkv" => Some(MediaKind::Video),
        _ => None,
    }
}

/// One entry in the fixed ordered deck. Defined once at startup, never
/// created or destroyed afterwards.
#[derive(Debug, Clone)]
pub struct SlideSource {
    pub path: PathBuf,
    pub kind: MediaKind,
    /// Probed length for videos; `None` for images or when probing failed.
    pub video_duration_ms: Option<u64>,
}

impl SlideSource {
    /// The resolved hold time for this slide: a bounded video plays for its
    /// own length, everything else holds for the default.
    pub fn hold_duration_ms(&self, default_ms: u64) -> u64 {
        match self.kind {
            MediaKind::Video => self
                .video_duration_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(default_ms),
            MediaKind::Image => default_ms,
        }
    }
}

/// The ordered slide catalogue.
pub struct Deck {
    slides: Vec<SlideSource>,
}

impl Deck {
    /// Builds the deck from pre-sorted media paths. An empty deck is a
    /// configuration error, reported once at startup.
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Self> {
        let slides: Vec<SlideSource> = paths
            .into_iter()
            .filter_map(|path| {
                media_kind(&path).map(|kind| SlideSource {
                    path,
                    kind,
                    video_duration_ms: None,
                })
            })
            .collect();
        if slides.is_empty() {
            bail!("no slides found, deck directory holds no supported media");
        }
        Ok(Self { slides })
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[SlideSource] {
        &self.slides
    }

    pub fn slides_mut(&mut self) -> &mut [SlideSource] {
        &mut self.slides
    }

    /// Per-slide hold durations in deck order, ready for the sequencer.
    pub fn hold_durations_ms(&self, default_ms: u64) -> Vec<u64> {
        self.slides
            .iter()
            .map(|slide| slide.hold_duration_ms(default_ms))
            .collect()
    }
}
