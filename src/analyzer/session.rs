use std::fmt::Write as _;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::analyzer::debouncer::{FrameObservation, TransitionEvent};
use crate::analyzer::classifier::PostureClass;

/// Timeline timestamp: `MM:SS`, or `HH:MM:SS` once an hour has elapsed,
/// all components zero-padded.
pub fn format_timestamp(secs: f64) -> String {
    let hours = (secs / 3600.0) as u64;
    let minutes = ((secs % 3600.0) / 60.0) as u64;
    let seconds = (secs % 60.0) as u64;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Human duration: `1h 2m 3s`, dropping the hour unit when zero and both
/// hour and minute units when both are zero.
pub fn format_duration(secs: f64) -> String {
    let hours = (secs / 3600.0) as u64;
    let minutes = ((secs % 3600.0) / 60.0) as u64;
    let seconds = (secs % 60.0) as u64;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Running counters for one video pass. Good/bad counts only ever cover
/// frames where a subject was classified; bad-classified frames below the
/// debounce threshold count toward neither, so
/// `good_frames + bad_frames <= total_frames` always holds.
#[derive(Debug, Default)]
pub struct SessionStats {
    good_frames: u64,
    bad_frames: u64,
    total_frames: u64,
    timeline: Vec<TransitionEvent>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, observation: &FrameObservation) {
        self.total_frames += 1;
        if observation.posture == PostureClass::Good {
            self.good_frames += 1;
        }
        if observation.is_bad_active {
            self.bad_frames += 1;
        }
        if let Some(transition) = &observation.transition {
            self.timeline.push(transition.clone());
        }
    }

    pub fn good_frames(&self) -> u64 {
        self.good_frames
    }

    pub fn bad_frames(&self) -> u64 {
        self.bad_frames
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn timeline(&self) -> &[TransitionEvent] {
        &self.timeline
    }

    /// Closes the session: converts frame counts to durations at the given
    /// fps and stamps the report with the generation time.
    pub fn finalize(self, fps: u32, video_source: &Path, processing_secs: f64) -> SessionReport {
        let fps = fps.max(1) as f64;
        let total = self.total_frames;
        let percentage = |frames: u64| {
            if total > 0 {
                frames as f64 / total as f64 * 100.0
            } else {
                0.0
            }
        };

        SessionReport {
            date: Local::now().format("%Y%m%d_%H%M%S").to_string(),
            video_source: video_source.display().to_string(),
            processing_secs,
            total_frames: self.total_frames,
            good_frames: self.good_frames,
            bad_frames: self.bad_frames,
            good_percentage: percentage(self.good_frames),
            bad_percentage: percentage(self.bad_frames),
            total_duration: format_duration(self.total_frames as f64 / fps),
            good_duration: format_duration(self.good_frames as f64 / fps),
            bad_duration: format_duration(self.bad_frames as f64 / fps),
            timeline: self.timeline,
        }
    }
}

/// Finalized session summary. Rendered to the plain-text report file and
/// serializable for the HTTP layer's JSON response.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub date: String,
    pub video_source: String,
    pub processing_secs: f64,
    pub total_frames: u64,
    pub good_frames: u64,
    pub bad_frames: u64,
    pub good_percentage: f64,
    pub bad_percentage: f64,
    pub total_duration: String,
    pub good_duration: String,
    pub bad_duration: String,
    pub timeline: Vec<TransitionEvent>,
}

impl SessionReport {
    /// The human-readable report text: header, time analysis, then the
    /// posture timeline with a `Duration:` line between consecutive entries
    /// only, never after the last.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Session Statistics");
        let _ = writeln!(out, "================");
        let _ = writeln!(out, "Date: {}", self.date);
        let _ = writeln!(out, "Video Source: {}", self.video_source);
        let _ = writeln!(out, "Processing Time: {:.2} seconds", self.processing_secs);
        let _ = writeln!(out);
        let _ = writeln!(out, "Time Analysis:");
        let _ = writeln!(out, "Total Duration: {}", self.total_duration);
        let _ = writeln!(
            out,
            "Good Posture Duration: {} ({:.1}%)",
            self.good_duration, self.good_percentage
        );
        let _ = writeln!(
            out,
            "Bad Posture Duration: {} ({:.1}%)",
            self.bad_duration, self.bad_percentage
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Posture Timeline:");
        let _ = writeln!(out, "================");
        for (i, entry) in self.timeline.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}: {} posture begins",
                entry.timestamp,
                entry.posture.label()
            );
            if let Some(next) = self.timeline.get(i + 1) {
                let _ = writeln!(out, "Duration: {}", next.timestamp);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::video::io::{Annotation, AnnotationColor};
    use crate::core::video::frame::BoundingBox;
    use std::path::PathBuf;

    fn observation(
        posture: PostureClass,
        is_bad_active: bool,
        transition: Option<TransitionEvent>,
    ) -> FrameObservation {
        FrameObservation {
            posture,
            is_bad_active,
            annotation: Annotation {
                color: AnnotationColor::Green,
                status_text: "Good Posture".to_string(),
                confidence: 0.9,
                bbox: BoundingBox::new(0, 0, 10, 10),
            },
            transition,
        }
    }

    fn transition(timestamp: &str, posture: PostureClass) -> TransitionEvent {
        TransitionEvent {
            timestamp: timestamp.to_string(),
            posture,
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(3.37), "00:03");
        assert_eq!(format_timestamp(65.0), "01:05");
        assert_eq!(format_timestamp(3600.0), "01:00:00");
        assert_eq!(format_timestamp(3725.0), "01:02:05");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(9.0), "9s");
        assert_eq!(format_duration(65.0), "1m 5s");
        assert_eq!(format_duration(3725.0), "1h 2m 5s");
        assert_eq!(format_duration(0.0), "0s");
    }

    #[test]
    fn test_counting_semantics() {
        let mut stats = SessionStats::new();
        stats.observe(&observation(
            PostureClass::Good,
            false,
            Some(transition("00:00", PostureClass::Good)),
        ));
        // bad frame still below threshold: neither good nor bad
        stats.observe(&observation(
            PostureClass::Bad,
            false,
            Some(transition("00:01", PostureClass::Bad)),
        ));
        // bad frame past threshold
        stats.observe(&observation(PostureClass::Bad, true, None));

        assert_eq!(stats.total_frames(), 3);
        assert_eq!(stats.good_frames(), 1);
        assert_eq!(stats.bad_frames(), 1);
        assert!(stats.good_frames() + stats.bad_frames() <= stats.total_frames());
        assert_eq!(stats.timeline().len(), 2);
    }

    #[test]
    fn test_finalize_empty_session() {
        let stats = SessionStats::new();
        let report = stats.finalize(30, &PathBuf::from("a.mp4"), 1.0);

        assert_eq!(report.total_frames, 0);
        assert_eq!(report.good_percentage, 0.0);
        assert_eq!(report.bad_percentage, 0.0);
        assert_eq!(report.total_duration, "0s");
        assert!(report.timeline.is_empty());
    }

    #[test]
    fn test_render_sections_and_timeline() {
        let mut stats = SessionStats::new();
        for i in 0..90 {
            let t = if i == 0 {
                Some(transition("00:00", PostureClass::Good))
            } else if i == 30 {
                Some(transition("00:01", PostureClass::Bad))
            } else if i == 60 {
                Some(transition("00:02", PostureClass::Good))
            } else {
                None
            };
            let posture = if (30..60).contains(&i) {
                PostureClass::Bad
            } else {
                PostureClass::Good
            };
            stats.observe(&observation(posture, false, t));
        }

        let report = stats.finalize(30, &PathBuf::from("clip.mp4"), 2.5);
        let text = report.render();

        assert!(text.starts_with("Session Statistics\n================\n"));
        assert!(text.contains("Video Source: clip.mp4"));
        assert!(text.contains("Processing Time: 2.50 seconds"));
        assert!(text.contains("Total Duration: 3s"));
        assert!(text.contains("Good Posture Duration: 2s (66.7%)"));
        assert!(text.contains("Bad Posture Duration: 0s (0.0%)"));
        assert!(text.contains(
            "00:00: Good posture begins\nDuration: 00:01\n00:01: Bad posture begins\nDuration: 00:02\n00:02: Good posture begins\n"
        ));
        // no Duration line after the final entry
        assert!(text.trim_end().ends_with("00:02: Good posture begins"));
    }

    #[test]
    fn test_report_serializes() {
        let report = SessionStats::new().finalize(30, &PathBuf::from("a.mp4"), 0.5);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_frames"], 0);
        assert_eq!(json["video_source"], "a.mp4");
    }
}
