use std::path::PathBuf;

use thiserror::Error;

use crate::gesture::domain::gesture::ReactionAsset;

/// Failures at the session boundary (landmark source, file and camera I/O).
///
/// Classification and the reaction state machine never fail; only the
/// collaborators around them do.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Landmark estimator missing, not startable, or speaking the wrong protocol.
    #[error("landmark source unavailable: {0}")]
    DependencyUnavailable(String),
    /// Image could not be decoded or camera could not be opened.
    #[error("could not read {source_name}: {reason}")]
    SourceUnreadable { source_name: String, reason: String },
    /// One camera frame failed to read; the live loop skips it.
    #[error("empty frame: {0}")]
    EmptyFrame(String),
    /// Reaction image failed to load; that reaction displays nothing.
    #[error("could not load reaction {asset} from {path}: {reason}")]
    AssetMissing {
        asset: ReactionAsset,
        path: PathBuf,
        reason: String,
    },
    /// The window or reaction surface rejected an update. Ends the live loop.
    #[error("presentation failed: {0}")]
    Presentation(String),
}

impl SessionError {
    pub fn unreadable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnreadable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}
