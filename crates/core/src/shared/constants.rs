use crate::gesture::domain::gesture::ReactionAsset;

/// Directory (relative to the working directory) holding the reaction images.
pub const DEFAULT_ASSETS_DIR: &str = "assets";

pub const REACTION_ASSET_EXTENSION: &str = "jpg";

/// Static asset table: every reaction the classifier can emit, in catalog order.
pub const REACTION_ASSETS: &[ReactionAsset] =
    &[ReactionAsset::Thumb, ReactionAsset::Point, ReactionAsset::Head];

/// Hand skeleton size of the MediaPipe hand landmark model.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Face mesh size without iris refinement (478 with it).
pub const FACE_MESH_MIN_POINTS: usize = 468;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Handshake line printed by the landmark program once its models are loaded.
pub const LANDMARK_READY_SIGNAL: &str = "READY";

/// Appended to errors raised before the landmark program is up.
pub const LANDMARK_PROGRAM_HINT: &str = "Set landmark_program and landmark_args (or pass \
--landmark-program) to an estimator that prints READY, then answers each \
width/height/channels header plus RGB frame with one JSON line of hand and face landmarks";

pub const SETTINGS_DIR_NAME: &str = "Gesture Reaction";
