use std::path::Path;

use serde::Serialize;

use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::gesture::domain::frame_resolver::{FrameResolver, ResolutionMode};
use crate::gesture::domain::gesture::{GestureLabel, GestureVerdict, ReactionAsset};
use crate::gesture::domain::gesture_classifier::GestureClassifier;
use crate::shared::config::GestureConfig;
use crate::shared::error::SessionError;
use crate::shared::frame::Frame;
use crate::video::domain::video_reader::VideoReader;

/// Single-image gesture detection: read → landmarks → first matching hand.
pub struct DetectGestureUseCase {
    reader: Box<dyn VideoReader>,
    detector: Box<dyn LandmarkDetector>,
    resolver: FrameResolver,
}

impl DetectGestureUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        detector: Box<dyn LandmarkDetector>,
        config: GestureConfig,
    ) -> Self {
        Self {
            reader,
            detector,
            resolver: FrameResolver::new(
                GestureClassifier::new(config),
                ResolutionMode::FirstMatch,
            ),
        }
    }

    pub fn execute(&mut self, image_path: &Path) -> Result<GestureVerdict, SessionError> {
        let source = image_path.display().to_string();

        let frame = self.read_single_frame(image_path, &source);
        self.reader.close();
        let frame = frame?;

        let landmarks = self
            .detector
            .detect(&frame)
            .map_err(|e| SessionError::DependencyUnavailable(e.to_string()))?;

        let verdict = self.resolver.resolve(&landmarks);
        log::info!(
            "{source}: {} hand(s), face={}, gesture={} ({:.2})",
            landmarks.hands.len(),
            landmarks.face.is_some(),
            verdict.label().as_str(),
            verdict.confidence()
        );
        Ok(verdict)
    }

    fn read_single_frame(
        &mut self,
        image_path: &Path,
        source: &str,
    ) -> Result<Frame, SessionError> {
        self.reader
            .open(image_path)
            .map_err(|e| SessionError::unreadable(source, e))?;

        match self.reader.frames().next() {
            Some(Ok(frame)) => Ok(frame),
            Some(Err(e)) => Err(SessionError::unreadable(source, e)),
            None => Err(SessionError::unreadable(source, "no image data")),
        }
    }
}

/// JSON document printed by the batch entry point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GestureReport {
    Detected {
        success: bool,
        gesture: GestureLabel,
        confidence: f64,
        reaction: Option<ReactionAsset>,
    },
    Failed {
        success: bool,
        error: String,
    },
}

impl GestureReport {
    pub fn detected(verdict: &GestureVerdict) -> Self {
        Self::Detected {
            success: true,
            gesture: verdict.label(),
            confidence: verdict.confidence(),
            reaction: verdict.reaction(),
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self::Failed {
            success: false,
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Detected { .. })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Result<GestureVerdict, SessionError>> for GestureReport {
    fn from(result: Result<GestureVerdict, SessionError>) -> Self {
        match result {
            Ok(verdict) => Self::detected(&verdict),
            Err(e) => Self::failed(e),
        }
    }
}
