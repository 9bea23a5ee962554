use serde::Serialize;

use crate::analyzer::classifier::{FrameClassification, PostureClass};
use crate::analyzer::session::format_timestamp;
use crate::core::video::io::{Annotation, AnnotationColor};

/// Consecutive bad-classified frames required before bad posture is
/// considered active.
pub const BAD_POSTURE_THRESHOLD: u32 = 200;

/// One entry in the posture timeline, recorded whenever the per-frame label
/// differs from the previous classified frame's label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionEvent {
    pub timestamp: String,
    pub posture: PostureClass,
}

/// What the debouncer says about one classified frame.
#[derive(Debug, Clone)]
pub struct FrameObservation {
    /// Raw per-frame label, driving the timeline.
    pub posture: PostureClass,
    /// Debounced flag gating the bad statistic and the red annotation.
    pub is_bad_active: bool,
    pub annotation: Annotation,
    pub transition: Option<TransitionEvent>,
}

/// Streak-based hysteresis over the classification stream.
///
/// Two outputs deliberately disagree: the timeline label flips the moment
/// the raw class changes, while `is_bad_active` lags until the bad streak
/// reaches the threshold. Bad-classified frames below the threshold sit in
/// a warning zone counted toward neither statistic.
pub struct PostureDebouncer {
    threshold: u32,
    consecutive_bad: u32,
    is_bad_active: bool,
    current_posture: Option<PostureClass>,
}

impl PostureDebouncer {
    pub fn new() -> Self {
        Self::with_threshold(BAD_POSTURE_THRESHOLD)
    }

    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            threshold,
            consecutive_bad: 0,
            is_bad_active: false,
            current_posture: None,
        }
    }

    /// Feeds one classified frame through the state machine. Frames with no
    /// classification must not be passed here; skipping them entirely is
    /// what keeps them out of every counter.
    pub fn observe(
        &mut self,
        classification: &FrameClassification,
        elapsed_secs: f64,
    ) -> FrameObservation {
        let posture = classification.class;

        // The first classified frame always transitions from the unset state.
        let transition = if self.current_posture != Some(posture) {
            self.current_posture = Some(posture);
            Some(TransitionEvent {
                timestamp: format_timestamp(elapsed_secs),
                posture,
            })
        } else {
            None
        };

        let (color, status_text) = match posture {
            PostureClass::Bad => {
                self.consecutive_bad += 1;
                if self.consecutive_bad >= self.threshold {
                    self.is_bad_active = true;
                    (
                        AnnotationColor::Red,
                        format!("Bad Posture! ({})", self.consecutive_bad),
                    )
                } else {
                    (
                        AnnotationColor::Orange,
                        format!("Warning ({}/{})", self.consecutive_bad, self.threshold),
                    )
                }
            }
            PostureClass::Good => {
                self.consecutive_bad = 0;
                self.is_bad_active = false;
                (AnnotationColor::Green, "Good Posture".to_string())
            }
        };

        FrameObservation {
            posture,
            is_bad_active: self.is_bad_active,
            annotation: Annotation {
                color,
                status_text,
                confidence: classification.confidence,
                bbox: classification.bbox,
            },
            transition,
        }
    }

    pub fn consecutive_bad(&self) -> u32 {
        self.consecutive_bad
    }

    pub fn is_bad_active(&self) -> bool {
        self.is_bad_active
    }

    pub fn reset(&mut self) {
        self.consecutive_bad = 0;
        self.is_bad_active = false;
        self.current_posture = None;
    }
}

impl Default for PostureDebouncer {
    fn default() -> Self {
        Self::new()
    }
}
