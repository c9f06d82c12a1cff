use gesture_reaction_core::detection::domain::landmarks::{Landmark, LandmarkFrame};
use gesture_reaction_core::shared::frame::Frame;

const HAND_COLOR: [u8; 3] = [0x30, 0xd1, 0x58];
const FOREHEAD_COLOR: [u8; 3] = [0xff, 0x45, 0x3a];
const DOT_RADIUS: i64 = 2;

/// Draws hand joints and the forehead point onto `frame`.
///
/// Landmarks are normalized; points outside the frame are clipped.
pub fn draw_landmarks(frame: &mut Frame, landmarks: &LandmarkFrame) {
    for hand in &landmarks.hands {
        for point in hand.points() {
            draw_dot(frame, point, HAND_COLOR);
        }
    }
    if let Some(face) = &landmarks.face {
        draw_dot(frame, face.forehead(), FOREHEAD_COLOR);
    }
}

fn draw_dot(frame: &mut Frame, point: &Landmark, color: [u8; 3]) {
    let width = frame.width() as i64;
    let height = frame.height() as i64;
    let (Some(cx), Some(cy)) = (to_pixel(point.x, width), to_pixel(point.y, height)) else {
        return;
    };

    let mut pixels = frame.as_ndarray_mut();
    for y in (cy - DOT_RADIUS).max(0)..=(cy + DOT_RADIUS).min(height - 1) {
        for x in (cx - DOT_RADIUS).max(0)..=(cx + DOT_RADIUS).min(width - 1) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy > DOT_RADIUS * DOT_RADIUS {
                continue;
            }
            for (c, value) in color.iter().enumerate() {
                pixels[[y as usize, x as usize, c]] = *value;
            }
        }
    }
}

/// Scales a normalized coordinate to pixels, clamped just outside the frame
/// so extreme values cannot overflow the dot bounds. `None` for NaN or infinity.
fn to_pixel(coord: f32, extent: i64) -> Option<i64> {
    let pixel = (coord * extent as f32).round();
    if !pixel.is_finite() {
        return None;
    }
    Some(pixel.clamp(-(DOT_RADIUS + 1) as f32, (extent + DOT_RADIUS + 1) as f32) as i64)
}
