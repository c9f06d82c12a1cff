use crate::detection::domain::landmarks::LandmarkFrame;
use crate::gesture::domain::gesture::{GestureVerdict, ReactionAsset};
use crate::shared::frame::Frame;

/// Presentation layer of a live session (window, overlay, reaction surface).
///
/// Called from the live loop once per frame: `present_frame` first, then at
/// most one of `show_reaction` / `release_reaction`.
pub trait ReactionPresenter: Send {
    /// Renders the camera frame with its landmarks and this frame's verdict.
    fn present_frame(
        &mut self,
        frame: &Frame,
        landmarks: &LandmarkFrame,
        verdict: &GestureVerdict,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Keeps the reaction surface showing `asset`. `image` is `None` when the
    /// asset failed to load, in which case nothing should be displayed.
    fn show_reaction(
        &mut self,
        asset: ReactionAsset,
        image: Option<&Frame>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Closes the reaction surface. Called once per expiry and at session end.
    fn release_reaction(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
