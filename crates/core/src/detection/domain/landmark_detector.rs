use crate::detection::domain::landmarks::LandmarkFrame;
use crate::shared::frame::Frame;

/// Domain interface for hand + face mesh landmark estimation.
///
/// Implementations may hold models or processes across frames, hence `&mut self`.
pub trait LandmarkDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<LandmarkFrame, Box<dyn std::error::Error>>;
}
