use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;

use crate::analyzer::classifier::PostureClassifier;
use crate::analyzer::debouncer::{PostureDebouncer, BAD_POSTURE_THRESHOLD};
use crate::analyzer::overlay::draw_annotation;
use crate::analyzer::session::{SessionReport, SessionStats};
use crate::core::error::PipelineError;
use crate::core::video::decimator::decimate;
use crate::core::video::io::VideoBackend;
use crate::core::video::timing::{speed_multiplier, VideoInfo};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory receiving the annotated video and the report.
    pub output_dir: PathBuf,
    pub bad_posture_threshold: u32,
    /// Progress is logged every this many frames; 0 disables it.
    pub progress_interval: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("recordings"),
            bad_posture_threshold: BAD_POSTURE_THRESHOLD,
            progress_interval: 30,
        }
    }
}

/// Artifacts produced by one completed pass.
#[derive(Debug)]
pub struct ProcessingOutcome {
    pub video_path: PathBuf,
    pub report_path: PathBuf,
    pub report: SessionReport,
    pub video_info: VideoInfo,
}

/// Sequences one full analysis pass: speed decision, optional decimation,
/// then classify / debounce / annotate / accumulate frame by frame.
///
/// Strictly single-threaded and synchronous; throughput is bounded by the
/// classifier, not I/O. All decoder/encoder handles are scoped to one
/// `process_video` call and dropped on every exit path.
pub struct PosturePipeline {
    config: PipelineConfig,
}

impl PosturePipeline {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn process_video(
        &self,
        backend: &dyn VideoBackend,
        classifier: &dyn PostureClassifier,
        video_path: &Path,
    ) -> Result<ProcessingOutcome, PipelineError> {
        let started = Instant::now();
        log::info!("starting video processing: {}", video_path.display());

        let original_timing = {
            let source = backend.open(video_path)?;
            source.timing()?
        };
        if original_timing.frame_count == 0 {
            return Err(PipelineError::invalid_video(video_path, "zero frames"));
        }
        let video_info = VideoInfo::from_timing(&original_timing);
        log::info!(
            "original video duration: {} ({} frames @ {} fps)",
            video_info.duration,
            original_timing.frame_count,
            original_timing.fps
        );

        let multiplier = speed_multiplier(original_timing.duration_secs());
        let work_path = decimate(backend, video_path, multiplier)?;

        let mut source = backend.open(&work_path)?;
        let timing = source.timing()?;
        let fps = timing.fps;
        let total_frames = timing.frame_count;

        fs::create_dir_all(&self.config.output_dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let output_path = self.config.output_dir.join(format!("recording_{stamp}.mp4"));
        let report_path = self.config.output_dir.join(format!("stats_{stamp}.txt"));

        let mut sink = backend.create(&output_path, fps, source.width(), source.height())?;
        let mut debouncer = PostureDebouncer::with_threshold(self.config.bad_posture_threshold);
        let mut stats = SessionStats::new();

        let mut frame_count: u64 = 0;
        loop {
            let mut frame = match source.read_frame()? {
                Some(frame) => frame,
                None => break,
            };
            frame_count += 1;
            let elapsed_secs = frame_count as f64 / fps as f64;

            // interval 0 turns progress logging off
            let interval = self.config.progress_interval;
            if interval > 0 && frame_count % interval == 0 && total_frames > 0 {
                log::debug!(
                    "progress: {:.1}% ({}/{} frames)",
                    frame_count as f64 / total_frames as f64 * 100.0,
                    frame_count,
                    total_frames
                );
            }

            let classification = match classifier.classify(&frame) {
                Ok(classification) => classification,
                Err(err) => {
                    // Release the encoder handle before discarding the
                    // half-written artifact.
                    drop(sink);
                    self.discard_partial(backend, &output_path);
                    return Err(err);
                }
            };

            match classification {
                Some(classification) => {
                    let observation = debouncer.observe(&classification, elapsed_secs);
                    draw_annotation(&mut frame, &observation.annotation);
                    sink.write_frame(&frame, Some(&observation.annotation))?;
                    stats.observe(&observation);
                }
                // No subject in frame: written through untouched, excluded
                // from all counts.
                None => sink.write_frame(&frame, None)?,
            }
        }
        sink.finish()?;

        let report = stats.finalize(fps, video_path, started.elapsed().as_secs_f64());
        fs::write(&report_path, report.render())?;

        log::info!(
            "processing completed in {:.2}s, output: {}, stats: {}",
            report.processing_secs,
            output_path.display(),
            report_path.display()
        );

        Ok(ProcessingOutcome {
            video_path: output_path,
            report_path,
            report,
            video_info,
        })
    }

    fn discard_partial(&self, backend: &dyn VideoBackend, path: &Path) {
        if let Err(err) = backend.remove(path) {
            log::warn!("could not remove partial output {}: {err}", path.display());
        }
    }
}

impl Default for PosturePipeline {
    fn default() -> Self {
        Self::new()
    }
}
