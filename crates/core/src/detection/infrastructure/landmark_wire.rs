//! JSON response format of the external landmark program.
//!
//! One line per frame:
//! `{"hands": [{"landmarks": [{"x":0.1,"y":0.2,"z":0.0}, ...]}], "face": {"landmarks": [...]}, "error": null}`
//! Unknown fields (handedness, scores) are ignored.

use serde::Deserialize;

use crate::detection::domain::landmarks::{FaceLandmarks, HandLandmarks, Landmark, LandmarkFrame};

#[derive(Deserialize, Debug)]
struct PointJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct LandmarkSetJson {
    landmarks: Vec<PointJson>,
}

impl LandmarkSetJson {
    fn into_points(self) -> Vec<Landmark> {
        self.landmarks
            .into_iter()
            .map(|p| Landmark::new(p.x, p.y, p.z))
            .collect()
    }
}

#[derive(Deserialize, Debug)]
pub struct DetectionResponse {
    #[serde(default)]
    hands: Vec<LandmarkSetJson>,
    #[serde(default)]
    face: Option<LandmarkSetJson>,
    #[serde(default)]
    error: Option<String>,
}

impl DetectionResponse {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Error the landmark program reported for this frame, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Converts to domain landmarks, dropping malformed sets with a warning.
    pub fn into_landmark_frame(self) -> LandmarkFrame {
        let hands = self
            .hands
            .into_iter()
            .filter_map(|set| match HandLandmarks::from_slice(&set.into_points()) {
                Ok(hand) => Some(hand),
                Err(e) => {
                    log::warn!("Skipping hand: {e}");
                    None
                }
            })
            .collect();

        let face = self
            .face
            .and_then(|set| match FaceLandmarks::new(set.into_points()) {
                Ok(face) => Some(face),
                Err(e) => {
                    log::warn!("Ignoring face: {e}");
                    None
                }
            });

        LandmarkFrame::new(hands, face)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::landmark_set_json;
    use super::*;

    #[test]
    fn test_empty_response() {
        let frame = DetectionResponse::parse(r#"{"hands": [], "face": null}"#)
            .unwrap()
            .into_landmark_frame();
        assert!(frame.is_empty());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let resp = DetectionResponse::parse("{}").unwrap();
        assert!(resp.error().is_none());
        assert!(resp.into_landmark_frame().is_empty());
    }

    #[test]
    fn test_hands_keep_source_order() {
        let json = format!(
            r#"{{"hands": [{}, {}]}}"#,
            landmark_set_json(21, 0.1, &[]),
            landmark_set_json(21, 0.9, &[])
        );
        let frame = DetectionResponse::parse(&json).unwrap().into_landmark_frame();
        assert_eq!(frame.hands.len(), 2);
        assert_eq!(frame.hands[0].point(0).y, 0.1);
        assert_eq!(frame.hands[1].point(0).y, 0.9);
    }

    #[test]
    fn test_malformed_hand_is_skipped() {
        let json = format!(
            r#"{{"hands": [{}, {}]}}"#,
            landmark_set_json(5, 0.1, &[]),
            landmark_set_json(21, 0.4, &[])
        );
        let frame = DetectionResponse::parse(&json).unwrap().into_landmark_frame();
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(frame.hands[0].point(0).y, 0.4);
    }

    #[test]
    fn test_face_mesh_forehead() {
        let json = format!(
            r#"{{"face": {}}}"#,
            landmark_set_json(478, 0.5, &[(10, 0.25)])
        );
        let frame = DetectionResponse::parse(&json).unwrap().into_landmark_frame();
        assert_eq!(frame.face.unwrap().forehead().y, 0.25);
    }

    #[test]
    fn test_truncated_face_is_dropped() {
        let json = format!(r#"{{"face": {}}}"#, landmark_set_json(11, 0.5, &[]));
        let frame = DetectionResponse::parse(&json).unwrap().into_landmark_frame();
        assert!(frame.face.is_none());
    }

    #[test]
    fn test_extra_fields_and_missing_z() {
        let json = r#"{"hands": [], "face": null, "error": "model warming up", "fps": 30}"#;
        let resp = DetectionResponse::parse(json).unwrap();
        assert_eq!(resp.error(), Some("model warming up"));

        let point: PointJson = serde_json::from_str(r#"{"x": 0.1, "y": 0.2}"#).unwrap();
        assert_eq!(point.z, 0.0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(DetectionResponse::parse("hands: []").is_err());
    }
}
