//! Normalized landmark sets reported by the hand and face mesh models.
//!
//! Coordinates are in `[0, 1]` image space with `y` growing downward, so a
//! joint that is "above" another has the smaller `y`.

use thiserror::Error;

use crate::shared::constants::{FACE_MESH_MIN_POINTS, HAND_LANDMARK_COUNT};

/// MediaPipe hand joint indices. Stable contract with the landmark source.
pub mod hand {
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_PIP: usize = 14;
    pub const RING_TIP: usize = 16;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;
}

/// Face mesh vertex sitting on the forehead.
pub const FOREHEAD: usize = 10;

#[derive(Error, Debug, PartialEq)]
pub enum LandmarkError {
    #[error("hand landmark set must have {expected} points, got {actual}")]
    HandPointCount { expected: usize, actual: usize },
    #[error("face mesh must have at least {expected} points, got {actual}")]
    FacePointCount { expected: usize, actual: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// True when this point lies strictly higher in the image than `other`.
    pub fn is_above(&self, other: &Landmark) -> bool {
        self.y < other.y
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; HAND_LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; HAND_LANDMARK_COUNT] =
            points
                .try_into()
                .map_err(|_| LandmarkError::HandPointCount {
                    expected: HAND_LANDMARK_COUNT,
                    actual: points.len(),
                })?;
        Ok(Self { points })
    }

    pub fn point(&self, joint: usize) -> &Landmark {
        &self.points[joint]
    }

    pub fn points(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.points
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<Landmark>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Landmark>) -> Result<Self, LandmarkError> {
        if points.len() < FACE_MESH_MIN_POINTS {
            return Err(LandmarkError::FacePointCount {
                expected: FACE_MESH_MIN_POINTS,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn forehead(&self) -> &Landmark {
        &self.points[FOREHEAD]
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }
}

/// Everything the landmark source reported for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkFrame {
    /// In the order the source reported them.
    pub hands: Vec<HandLandmarks>,
    pub face: Option<FaceLandmarks>,
}

impl LandmarkFrame {
    pub fn new(hands: Vec<HandLandmarks>, face: Option<FaceLandmarks>) -> Self {
        Self { hands, face }
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty() && self.face.is_none()
    }
}
