//! Rule-based gesture classification over a single hand.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//! touching head, thumbs up, pointing. Only the vertical coordinate is
//! consulted, so the rules assume an upright hand facing the camera.

use crate::detection::domain::landmarks::{hand, FaceLandmarks, HandLandmarks};
use crate::gesture::domain::gesture::{GestureLabel, GestureVerdict};
use crate::shared::config::GestureConfig;

/// (tip, pip) pairs of the four non-thumb fingers.
const FINGERS: [(usize, usize); 4] = [
    (hand::INDEX_TIP, hand::INDEX_PIP),
    (hand::MIDDLE_TIP, hand::MIDDLE_PIP),
    (hand::RING_TIP, hand::RING_PIP),
    (hand::PINKY_TIP, hand::PINKY_PIP),
];

#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, hand: &HandLandmarks, face: Option<&FaceLandmarks>) -> GestureVerdict {
        let label = if self.is_touching_head(hand, face) {
            GestureLabel::TouchingHead
        } else if is_thumbs_up(hand) {
            GestureLabel::ThumbsUp
        } else if is_pointing(hand) {
            GestureLabel::Pointing
        } else {
            return GestureVerdict::none();
        };
        GestureVerdict::recognized(label, self.config.confidences.for_label(label))
    }

    /// Middle fingertip at or above the forehead, within the margin below it.
    fn is_touching_head(&self, hand: &HandLandmarks, face: Option<&FaceLandmarks>) -> bool {
        let Some(face) = face else {
            return false;
        };
        // summed in f64: an f32 sum rounds up and admits tips just past the margin
        let middle_tip = f64::from(hand.point(hand::MIDDLE_TIP).y);
        middle_tip <= f64::from(face.forehead().y) + self.config.touching_head_margin
    }
}

/// A finger is extended when its tip is strictly above its PIP joint.
fn is_extended(hand: &HandLandmarks, (tip, pip): (usize, usize)) -> bool {
    hand.point(tip).is_above(hand.point(pip))
}

fn is_thumbs_up(hand: &HandLandmarks) -> bool {
    let thumb_up = hand
        .point(hand::THUMB_TIP)
        .is_above(hand.point(hand::THUMB_IP));
    thumb_up && FINGERS.iter().all(|&f| !is_extended(hand, f))
}

fn is_pointing(hand: &HandLandmarks) -> bool {
    is_extended(hand, FINGERS[0]) && FINGERS[1..].iter().all(|&f| !is_extended(hand, f))
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::detection::domain::landmarks::Landmark;
    use crate::gesture::domain::gesture::ReactionAsset;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn classifier() -> GestureClassifier {
        GestureClassifier::default()
    }

    #[test]
    fn test_thumbs_up_without_face() {
        let v = classifier().classify(&thumbs_up_hand(), None);
        assert_eq!(v.label(), GestureLabel::ThumbsUp);
        assert_relative_eq!(v.confidence(), 0.95);
        assert_eq!(v.reaction(), Some(ReactionAsset::Thumb));
    }

    #[test]
    fn test_thumbs_up_with_distant_face() {
        // Middle tip at 0.65, forehead at 0.1: 0.65 > 0.15, not touching
        let face = face_with_forehead_at(0.1);
        let v = classifier().classify(&thumbs_up_hand(), Some(&face));
        assert_eq!(v.label(), GestureLabel::ThumbsUp);
    }

    #[test]
    fn test_pointing() {
        let v = classifier().classify(&pointing_hand(), None);
        assert_eq!(v.label(), GestureLabel::Pointing);
        assert_relative_eq!(v.confidence(), 0.90);
        assert_eq!(v.reaction(), Some(ReactionAsset::Point));
    }

    #[test]
    fn test_no_rule_matches() {
        let v = classifier().classify(&open_palm_hand(), None);
        assert_eq!(v, GestureVerdict::none());
        assert_eq!(v.confidence(), 0.0);
        assert_eq!(v.reaction(), None);
    }

    #[test]
    fn test_touching_head_beats_thumbs_up() {
        // Forehead at 0.30, middle tip raised from 0.65 to 0.32 <= 0.35
        let hand = raised(&thumbs_up_hand(), 0.33);
        assert_eq!(classifier().classify(&hand, None).label(), GestureLabel::ThumbsUp);

        let face = face_with_forehead_at(0.30);
        let v = classifier().classify(&hand, Some(&face));
        assert_eq!(v.label(), GestureLabel::TouchingHead);
        assert_relative_eq!(v.confidence(), 0.92);
        assert_eq!(v.reaction(), Some(ReactionAsset::Head));
    }

    #[test]
    fn test_touching_head_requires_face() {
        let hand = with_middle_tip(&open_palm_hand(), 0.0);
        assert_eq!(classifier().classify(&hand, None).label(), GestureLabel::None);
    }

    #[rstest]
    #[case::well_above(0.10, true)]
    #[case::at_forehead(0.30, true)]
    #[case::within_margin(0.34, true)]
    #[case::below_margin(0.36, false)]
    #[case::far_below(0.90, false)]
    fn test_touching_head_margin(#[case] middle_tip_y: f32, #[case] touching: bool) {
        let hand = with_middle_tip(&open_palm_hand(), middle_tip_y);
        let face = face_with_forehead_at(0.30);
        let v = classifier().classify(&hand, Some(&face));
        assert_eq!(v.label() == GestureLabel::TouchingHead, touching);
    }

    #[rstest]
    #[case::next_f32_past_margin(f32::from_bits(0.35f32.to_bits() + 1), false)]
    #[case::nearest_f32_to_margin(0.35, true)]
    #[case::last_f32_within_margin(f32::from_bits(0.35f32.to_bits() - 1), true)]
    fn test_touching_head_margin_boundary(#[case] middle_tip_y: f32, #[case] touching: bool) {
        let hand = with_middle_tip(&open_palm_hand(), middle_tip_y);
        let face = face_with_forehead_at(0.3);
        let v = classifier().classify(&hand, Some(&face));
        assert_eq!(v.label() == GestureLabel::TouchingHead, touching);
    }

    #[test]
    fn test_custom_margin_and_confidences() {
        let mut config = GestureConfig::default();
        config.touching_head_margin = 0.0;
        config.confidences.touching_head = 0.5;
        let c = GestureClassifier::new(config);
        let face = face_with_forehead_at(0.30);

        let at = with_middle_tip(&open_palm_hand(), 0.30);
        let v = c.classify(&at, Some(&face));
        assert_eq!(v.label(), GestureLabel::TouchingHead);
        assert_relative_eq!(v.confidence(), 0.5);

        let below = with_middle_tip(&open_palm_hand(), 0.32);
        assert_eq!(c.classify(&below, Some(&face)).label(), GestureLabel::None);
    }

    #[test]
    fn test_thumbs_up_rejects_equal_thumb_height() {
        let mut p = *thumbs_up_hand().points();
        p[hand::THUMB_TIP].y = p[hand::THUMB_IP].y;
        let v = classifier().classify(&HandLandmarks::new(p), None);
        assert_eq!(v.label(), GestureLabel::None);
    }

    #[rstest]
    #[case::index(hand::INDEX_TIP, hand::INDEX_PIP)]
    #[case::middle(hand::MIDDLE_TIP, hand::MIDDLE_PIP)]
    #[case::ring(hand::RING_TIP, hand::RING_PIP)]
    #[case::pinky(hand::PINKY_TIP, hand::PINKY_PIP)]
    fn test_thumbs_up_rejects_any_extended_finger(#[case] tip: usize, #[case] pip: usize) {
        let mut p = *thumbs_up_hand().points();
        p[tip].y = p[pip].y - 0.01;
        let v = classifier().classify(&HandLandmarks::new(p), None);
        assert_ne!(v.label(), GestureLabel::ThumbsUp);
    }

    #[test]
    fn test_curled_finger_level_with_pip_counts_as_closed() {
        let mut p = *thumbs_up_hand().points();
        p[hand::RING_TIP].y = p[hand::RING_PIP].y;
        let v = classifier().classify(&HandLandmarks::new(p), None);
        assert_eq!(v.label(), GestureLabel::ThumbsUp);
    }

    #[test]
    fn test_extended_index_turns_thumbs_up_into_pointing() {
        let mut p = *thumbs_up_hand().points();
        p[hand::INDEX_TIP].y = 0.40;
        let v = classifier().classify(&HandLandmarks::new(p), None);
        assert_eq!(v.label(), GestureLabel::Pointing);
    }

    #[rstest]
    #[case::middle(hand::MIDDLE_TIP, hand::MIDDLE_PIP)]
    #[case::ring(hand::RING_TIP, hand::RING_PIP)]
    #[case::pinky(hand::PINKY_TIP, hand::PINKY_PIP)]
    fn test_pointing_rejects_second_extended_finger(#[case] tip: usize, #[case] pip: usize) {
        let mut p = *pointing_hand().points();
        p[tip].y = p[pip].y - 0.01;
        let v = classifier().classify(&HandLandmarks::new(p), None);
        assert_eq!(v.label(), GestureLabel::None);
    }

    #[test]
    fn test_x_and_z_are_ignored() {
        let mut p = *pointing_hand().points();
        for (i, lm) in p.iter_mut().enumerate() {
            *lm = Landmark::new(i as f32 * 0.03, lm.y, -(i as f32));
        }
        let v = classifier().classify(&HandLandmarks::new(p), None);
        assert_eq!(v.label(), GestureLabel::Pointing);
    }
}
