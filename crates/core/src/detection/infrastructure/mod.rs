pub mod landmark_wire;
pub mod subprocess_landmark_detector;
