use crate::detection::domain::landmarks::LandmarkFrame;
use crate::gesture::domain::gesture::GestureVerdict;
use crate::gesture::domain::gesture_classifier::GestureClassifier;

/// How the per-hand verdicts of one frame are reduced to a single verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Single images: the first hand (in source order) with a gesture wins.
    FirstMatch,
    /// Live stream: every hand is classified and the last one with a
    /// gesture wins.
    LastWrite,
}

pub struct FrameResolver {
    classifier: GestureClassifier,
    mode: ResolutionMode,
}

impl FrameResolver {
    pub fn new(classifier: GestureClassifier, mode: ResolutionMode) -> Self {
        Self { classifier, mode }
    }

    /// Reduces a frame to one verdict. No hands means `None`, face or not.
    pub fn resolve(&self, frame: &LandmarkFrame) -> GestureVerdict {
        let face = frame.face.as_ref();
        let mut matches = frame
            .hands
            .iter()
            .map(|hand| self.classifier.classify(hand, face))
            .filter(|verdict| !verdict.is_none());

        let found = match self.mode {
            ResolutionMode::FirstMatch => matches.next(),
            ResolutionMode::LastWrite => matches.last(),
        };
        found.unwrap_or_default()
    }
}
