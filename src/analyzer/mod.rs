//! Frame-stream posture analysis pipeline.
//!
//! One pass over a seated-subject video:
//! 1. Speed decision - long videos are decimated before analysis
//! 2. Per-frame classification through the injected model capability
//! 3. Streak-based debouncing of the noisy classification signal
//! 4. Session accumulation into an annotated video plus a text report

pub mod classifier;
pub mod debouncer;
pub mod overlay;
pub mod pipeline;
pub mod session;

pub use classifier::{FrameClassification, MockClassifier, PostureClass, PostureClassifier};
pub use debouncer::{FrameObservation, PostureDebouncer, TransitionEvent, BAD_POSTURE_THRESHOLD};
pub use pipeline::{PipelineConfig, PosturePipeline, ProcessingOutcome};
pub use session::{format_duration, format_timestamp, SessionReport, SessionStats};
