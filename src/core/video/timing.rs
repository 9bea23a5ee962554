use std::path::Path;

use serde::Serialize;

use crate::core::error::PipelineError;

const ONE_MINUTE: f64 = 60.0;
const TWO_MINUTES: f64 = 120.0;
const FIVE_MINUTES: f64 = 300.0;

/// Frame-rate and length of a source video, fixed once read from the
/// container. A zero fps would make every duration computation divide by
/// zero, so construction rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoTiming {
    pub fps: u32,
    pub frame_count: u64,
}

impl VideoTiming {
    pub fn new(fps: u32, frame_count: u64, path: &Path) -> Result<Self, PipelineError> {
        if fps == 0 {
            return Err(PipelineError::invalid_video(path, "zero fps"));
        }
        Ok(Self { fps, frame_count })
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count as f64 / self.fps as f64
    }
}

/// Maps a video's duration to the decimation factor used to speed up long
/// recordings. Bracket upper bounds are inclusive: exactly 60s still plays
/// at original speed.
pub fn speed_multiplier(duration_secs: f64) -> u32 {
    if duration_secs <= ONE_MINUTE {
        1
    } else if duration_secs <= TWO_MINUTES {
        2
    } else if duration_secs <= FIVE_MINUTES {
        3
    } else {
        4
    }
}

/// Client-facing summary of a source video and the speed decision made for
/// it. Serialized into the upload response by the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub fps: u32,
    pub frame_count: u64,
    pub duration: String,
    pub is_long: bool,
    pub speed_multiplier: u32,
    pub processed_duration: String,
}

impl VideoInfo {
    pub fn from_timing(timing: &VideoTiming) -> Self {
        let duration = timing.duration_secs();
        let multiplier = speed_multiplier(duration);
        Self {
            fps: timing.fps,
            frame_count: timing.frame_count,
            duration: clock(duration),
            is_long: duration > ONE_MINUTE,
            speed_multiplier: multiplier,
            processed_duration: clock(duration / multiplier as f64),
        }
    }
}

/// `H:MM:SS` with unpadded hours, e.g. `0:01:30`.
fn clock(secs: f64) -> String {
    let total = secs as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
