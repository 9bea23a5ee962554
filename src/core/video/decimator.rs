use std::path::{Path, PathBuf};

use crate::core::error::PipelineError;
use crate::core::video::io::VideoBackend;

/// Re-encodes `source_path` keeping every `multiplier`-th frame, written at
/// the source's own fps and resolution. The frame rate metadata is left
/// unchanged on purpose: dropping frames at the same nominal fps compresses
/// wall-clock duration, so motion plays back sped up.
///
/// A multiplier of 1 is a pass-through and returns the input path without
/// re-encoding. For m > 1 the output lands next to the input with a
/// `_processed` suffix and contains exactly `ceil(n / m)` frames, the first
/// of which is always source frame 0.
pub fn decimate(
    backend: &dyn VideoBackend,
    source_path: &Path,
    multiplier: u32,
) -> Result<PathBuf, PipelineError> {
    if multiplier <= 1 {
        return Ok(source_path.to_path_buf());
    }

    let mut source = backend.open(source_path)?;
    let timing = source.timing()?;
    if timing.frame_count == 0 {
        return Err(PipelineError::invalid_video(source_path, "zero frames"));
    }

    let output_path = processed_path(source_path);
    let mut sink = backend.create(&output_path, timing.fps, source.width(), source.height())?;

    log::info!(
        "re-encoding {} at {}x speed",
        source_path.display(),
        multiplier
    );

    let mut counter: u64 = 0;
    let mut written: u64 = 0;
    while let Some(frame) = source.read_frame()? {
        if counter % multiplier as u64 == 0 {
            sink.write_frame(&frame, None)?;
            written += 1;
        }
        counter += 1;
    }
    sink.finish()?;

    log::debug!("decimation kept {}/{} frames", written, counter);
    Ok(output_path)
}

/// `videos/clip.mp4` -> `videos/clip_processed.mp4`.
fn processed_path(source_path: &Path) -> PathBuf {
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    source_path.with_file_name(format!("{stem}_processed.mp4"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::video::io::{MemoryBackend, MemoryVideo};

    #[test]
    fn test_multiplier_one_is_passthrough() {
        let backend = MemoryBackend::new();
        backend.insert("clip.mp4", MemoryVideo::synthetic(30, 64, 48, 10));

        let out = decimate(&backend, Path::new("clip.mp4"), 1).unwrap();
        assert_eq!(out, PathBuf::from("clip.mp4"));
        // no new artifact
        assert_eq!(backend.paths().len(), 1);
    }

    #[test]
    fn test_keeps_every_mth_frame() {
        let backend = MemoryBackend::new();
        backend.insert("clip.mp4", MemoryVideo::synthetic(30, 64, 48, 10));

        let out = decimate(&backend, Path::new("clip.mp4"), 3).unwrap();
        assert_eq!(out, PathBuf::from("clip_processed.mp4"));

        let video = backend.video(&out).unwrap();
        // ceil(10 / 3) = 4, source indices 0, 3, 6, 9
        assert_eq!(video.frames.len(), 4);
        let kept: Vec<u64> = video.frames.iter().map(|f| f.frame_number).collect();
        assert_eq!(kept, vec![0, 3, 6, 9]);
        // same nominal fps as the source
        assert_eq!(video.fps, 30);
    }

    #[test]
    fn test_exact_multiple_frame_count() {
        let backend = MemoryBackend::new();
        backend.insert("clip.mp4", MemoryVideo::synthetic(30, 64, 48, 2700));

        let out = decimate(&backend, Path::new("clip.mp4"), 2).unwrap();
        assert_eq!(backend.video(&out).unwrap().frames.len(), 1350);
    }

    #[test]
    fn test_zero_frames_rejected() {
        let backend = MemoryBackend::new();
        backend.insert("clip.mp4", MemoryVideo::new(30, 64, 48));

        let err = decimate(&backend, Path::new("clip.mp4"), 2).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidVideo { .. }));
    }

    #[test]
    fn test_unreadable_source_rejected() {
        let backend = MemoryBackend::new();
        let err = decimate(&backend, Path::new("missing.mp4"), 2).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidVideo { .. }));
    }
}
