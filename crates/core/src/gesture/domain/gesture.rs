use std::fmt;

use serde::Serialize;

/// Gestures the classifier can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    ThumbsUp,
    Pointing,
    TouchingHead,
    None,
}

impl GestureLabel {
    /// Name used in structured output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "thumbs_up",
            Self::Pointing => "pointing",
            Self::TouchingHead => "touching_head",
            Self::None => "none",
        }
    }

    /// The reaction a label triggers. `None` triggers nothing.
    pub fn reaction(&self) -> Option<ReactionAsset> {
        match self {
            Self::ThumbsUp => Some(ReactionAsset::Thumb),
            Self::Pointing => Some(ReactionAsset::Point),
            Self::TouchingHead => Some(ReactionAsset::Head),
            Self::None => None,
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThumbsUp => write!(f, "Thumb Up"),
            Self::Pointing => write!(f, "Pointing"),
            Self::TouchingHead => write!(f, "Touching Head"),
            Self::None => write!(f, "None"),
        }
    }
}

/// Reaction images shown in response to a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReactionAsset {
    #[serde(rename = "reaction_thumb")]
    Thumb,
    #[serde(rename = "reaction_point")]
    Point,
    #[serde(rename = "reaction_head")]
    Head,
}

impl ReactionAsset {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Thumb => "reaction_thumb",
            Self::Point => "reaction_point",
            Self::Head => "reaction_head",
        }
    }

    /// The gesture this reaction answers.
    pub fn gesture(&self) -> GestureLabel {
        match self {
            Self::Thumb => GestureLabel::ThumbsUp,
            Self::Point => GestureLabel::Pointing,
            Self::Head => GestureLabel::TouchingHead,
        }
    }
}

impl fmt::Display for ReactionAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Classifier output for one hand or one frame.
///
/// A `None` label always carries zero confidence and no reaction; every other
/// label carries the reaction returned by [`GestureLabel::reaction`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureVerdict {
    label: GestureLabel,
    confidence: f64,
    reaction: Option<ReactionAsset>,
}

impl GestureVerdict {
    pub fn none() -> Self {
        Self {
            label: GestureLabel::None,
            confidence: 0.0,
            reaction: None,
        }
    }

    /// Builds a verdict for `label`. Confidence is ignored for `None`.
    pub fn recognized(label: GestureLabel, confidence: f64) -> Self {
        match label.reaction() {
            Some(reaction) => Self {
                label,
                confidence,
                reaction: Some(reaction),
            },
            None => Self::none(),
        }
    }

    pub fn label(&self) -> GestureLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reaction(&self) -> Option<ReactionAsset> {
        self.reaction
    }

    pub fn is_none(&self) -> bool {
        self.label == GestureLabel::None
    }
}

impl Default for GestureVerdict {
    fn default() -> Self {
        Self::none()
    }
}
