use serde::Serialize;

use crate::core::error::PipelineError;
use crate::core::video::frame::{BoundingBox, Frame};

/// Per-frame posture label produced by the detection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostureClass {
    Good,
    Bad,
}

impl PostureClass {
    pub fn label(&self) -> &'static str {
        match self {
            PostureClass::Good => "Good",
            PostureClass::Bad => "Bad",
        }
    }
}

/// One detection on one frame. `None` from the classifier means no subject
/// was found in the frame; such frames never touch posture state or counts.
#[derive(Debug, Clone)]
pub struct FrameClassification {
    pub bbox: BoundingBox,
    pub class: PostureClass,
    pub confidence: f32,
}

/// The injected detection-model capability. The model itself (weights,
/// runtime) is an external collaborator; the pipeline only ever calls this.
pub trait PostureClassifier {
    fn classify(&self, frame: &Frame) -> Result<Option<FrameClassification>, PipelineError>;
}

type ClassPattern = Box<dyn Fn(u64) -> Option<PostureClass> + Send + Sync>;

/// Deterministic stand-in classifier driven by a frame-number pattern.
pub struct MockClassifier {
    pattern: ClassPattern,
    confidence: f32,
}

impl MockClassifier {
    pub fn with_pattern<F>(pattern: F) -> Self
    where
        F: Fn(u64) -> Option<PostureClass> + Send + Sync + 'static,
    {
        Self {
            pattern: Box::new(pattern),
            confidence: 0.9,
        }
    }

    pub fn always(class: PostureClass) -> Self {
        Self::with_pattern(move |_| Some(class))
    }
}

impl PostureClassifier for MockClassifier {
    fn classify(&self, frame: &Frame) -> Result<Option<FrameClassification>, PipelineError> {
        Ok((self.pattern)(frame.frame_number).map(|class| FrameClassification {
            bbox: BoundingBox::new(10, 10, (frame.width as i32) - 10, (frame.height as i32) - 10),
            class,
            confidence: self.confidence,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_classifier_pattern() {
        let classifier = MockClassifier::with_pattern(|n| {
            if n % 2 == 0 {
                Some(PostureClass::Bad)
            } else {
                None
            }
        });

        let classified = classifier
            .classify(&Frame::filled(64, 64, 128, 4))
            .unwrap()
            .unwrap();
        assert_eq!(classified.class, PostureClass::Bad);
        assert_eq!(classified.bbox, BoundingBox::new(10, 10, 54, 54));

        assert!(classifier
            .classify(&Frame::filled(64, 64, 128, 5))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_mock_classifier_always() {
        let classifier = MockClassifier::always(PostureClass::Good);
        for n in 0..5 {
            let classified = classifier
                .classify(&Frame::filled(32, 32, 0, n))
                .unwrap()
                .unwrap();
            assert_eq!(classified.class, PostureClass::Good);
        }
    }
}
