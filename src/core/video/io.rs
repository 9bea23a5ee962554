use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::core::error::PipelineError;
use crate::core::video::frame::{BoundingBox, Frame};
use crate::core::video::timing::VideoTiming;

/// Overlay color for one annotated frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationColor {
    Green,
    Orange,
    Red,
}

/// Per-frame annotation descriptor handed to the encoder along with the
/// frame: the pipeline burns the bounding box into the pixels itself, text
/// rendering is the encoder's job.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub color: AnnotationColor,
    pub status_text: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Annotation {
    /// Text drawn above the bounding box, e.g. `Good Posture (0.92)`.
    pub fn label(&self) -> String {
        format!("{} ({:.2})", self.status_text, self.confidence)
    }
}

/// Decoder handle for one open video. Exclusively owned by whoever opened
/// it; frames come back in playback order.
pub trait VideoSource {
    fn timing(&self) -> Result<VideoTiming, PipelineError>;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// `Ok(None)` on stream exhaustion.
    fn read_frame(&mut self) -> Result<Option<Frame>, PipelineError>;
}

/// Encoder handle for one output video.
pub trait VideoSink {
    fn write_frame(
        &mut self,
        frame: &Frame,
        annotation: Option<&Annotation>,
    ) -> Result<(), PipelineError>;
    fn finish(&mut self) -> Result<(), PipelineError>;
}

/// Container I/O collaborator. Real codec backends live outside this crate;
/// everything here talks to one through this trait.
pub trait VideoBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn VideoSource>, PipelineError>;
    fn create(
        &self,
        path: &Path,
        fps: u32,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn VideoSink>, PipelineError>;
    /// Deletes a written artifact, used to discard partial output after a
    /// mid-stream failure.
    fn remove(&self, path: &Path) -> Result<(), PipelineError>;
}

/// A fully decoded video held in memory.
#[derive(Debug, Clone)]
pub struct MemoryVideo {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub frames: Vec<Frame>,
    pub annotations: Vec<Option<Annotation>>,
}

impl MemoryVideo {
    pub fn new(fps: u32, width: u32, height: u32) -> Self {
        Self {
            fps,
            width,
            height,
            frames: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Synthetic video of `frame_count` uniform frames.
    pub fn synthetic(fps: u32, width: u32, height: u32, frame_count: u64) -> Self {
        let mut video = Self::new(fps, width, height);
        for n in 0..frame_count {
            video.frames.push(Frame::filled(width, height, 128, n));
            video.annotations.push(None);
        }
        video
    }
}

/// In-memory backend: a path-keyed store of [`MemoryVideo`]s. Stands in for
/// the codec collaborator in tests and lets the whole pipeline run without
/// touching real containers.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    videos: Arc<Mutex<HashMap<PathBuf, MemoryVideo>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, video: MemoryVideo) {
        self.videos.lock().unwrap().insert(path.into(), video);
    }

    pub fn video(&self, path: &Path) -> Option<MemoryVideo> {
        self.videos.lock().unwrap().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.videos.lock().unwrap().keys().cloned().collect()
    }
}

impl VideoBackend for MemoryBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn VideoSource>, PipelineError> {
        let video = self
            .video(path)
            .ok_or_else(|| PipelineError::invalid_video(path, "cannot open source"))?;
        Ok(Box::new(MemorySource {
            path: path.to_path_buf(),
            video,
            cursor: 0,
        }))
    }

    fn create(
        &self,
        path: &Path,
        fps: u32,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn VideoSink>, PipelineError> {
        self.insert(path, MemoryVideo::new(fps, width, height));
        Ok(Box::new(MemorySink {
            path: path.to_path_buf(),
            videos: Arc::clone(&self.videos),
        }))
    }

    fn remove(&self, path: &Path) -> Result<(), PipelineError> {
        self.videos.lock().unwrap().remove(path);
        Ok(())
    }
}

struct MemorySource {
    path: PathBuf,
    video: MemoryVideo,
    cursor: usize,
}

impl VideoSource for MemorySource {
    fn timing(&self) -> Result<VideoTiming, PipelineError> {
        VideoTiming::new(self.video.fps, self.video.frames.len() as u64, &self.path)
    }

    fn width(&self) -> u32 {
        self.video.width
    }

    fn height(&self) -> u32 {
        self.video.height
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, PipelineError> {
        let frame = self.video.frames.get(self.cursor).cloned();
        if frame.is_some() {
            self.cursor += 1;
        }
        Ok(frame)
    }
}

struct MemorySink {
    path: PathBuf,
    videos: Arc<Mutex<HashMap<PathBuf, MemoryVideo>>>,
}

impl VideoSink for MemorySink {
    fn write_frame(
        &mut self,
        frame: &Frame,
        annotation: Option<&Annotation>,
    ) -> Result<(), PipelineError> {
        let mut videos = self.videos.lock().unwrap();
        let video = videos
            .get_mut(&self.path)
            .ok_or_else(|| PipelineError::invalid_video(&self.path, "sink target removed"))?;
        video.frames.push(frame.clone());
        video.annotations.push(annotation.cloned());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}
