use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use crate::deck::{Deck, MediaKind};

/// Fills in probed durations for every video slide. Probe failures are
/// platform-capability errors: logged and left as `None`, so those slides
/// simply hold for the default duration.
pub fn probe_deck_durations(deck: &mut Deck) {
    for slide in deck.slides_mut() {
        if slide.kind != MediaKind::Video {
            continue;
        }
        match probe_video_duration_ms(&slide.path) {
            Ok(ms) => {
                debug!(path = %slide.path.display(), ms, "probed video duration");
                slide.video_duration_ms = Some(ms);
            }
            Err(e) => {
                warn!(path = %slide.path.display(), error = %e, "video probe failed, using default hold");
            }
        }
    }
}

/// Asks ffprobe for the container duration.
pub fn probe_video_duration_ms(path: &Path) -> Result<u64> {
    let output = Command::new("ffprobe")
        .args(["-v", "error"])
        .args(["-show_entries", "format=duration"])
        .args(["-of", "csv=p=0"])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .context("failed to run ffprobe")?;
    if !output.status.success() {
        bail!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    parse_ffprobe_duration(&String::from_utf8_lossy(&output.stdout))
}

fn parse_ffprobe_duration(raw: &str) -> Result<u64> {
    let seconds: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("unparseable ffprobe duration {raw:?}"))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        bail!("video has no finite duration");
    }
    Ok((seconds * 1000.0).round() as u64)
}

/// Extracts the first frame of a video as PNG bytes, read from ffmpeg's
/// stdout. The poster stands in for playback: advancing is scheduled on the
/// probed duration, so a failed or suppressed video start never stalls the
/// show.
pub fn extract_poster_frame(path: &Path) -> Result<Vec<u8>> {
    let output = Command::new("ffmpeg")
        .args(["-loglevel", "error"])
        .arg("-i")
        .arg(path)
        .args(["-frames:v", "1"])
        .args(["-f", "image2pipe"])
        .args(["-c:v", "png"])
        .arg("pipe:1")
        .stdin(Stdio::null())
        .output()
        .context("failed to run ffmpeg")?;
    if !output.status.success() {
        bail!(
            "ffmpeg poster extraction failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    if output.stdout.is_empty() {
        bail!("ffmpeg produced no poster frame for {}", path.display());
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ffprobe_durations_parse_to_milliseconds() {
        assert_eq!(parse_ffprobe_duration("7.5\n").unwrap(), 7500);
        assert_eq!(parse_ffprobe_duration("0.041667").unwrap(), 42);
        assert_eq!(parse_ffprobe_duration("120").unwrap(), 120_000);
    }

    #[test]
    fn bad_durations_are_errors() {
        assert!(parse_ffprobe_duration("N/A").is_err());
        assert!(parse_ffprobe_duration("").is_err());
        assert!(parse_ffprobe_duration("0").is_err());
        assert!(parse_ffprobe_duration("-3.0").is_err());
    }
}
