use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads frames from a still image or a live capture device.
///
/// Implementations handle decoding and device details; the pipeline sees
/// RGB [`Frame`]s and [`VideoMetadata`].
pub trait VideoReader: Send {
    /// Opens the source and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Frames in capture order. An `Err` item is a single failed read; the
    /// iterator ending means the stream is over.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases the device or decoded data. Safe to call more than once.
    fn close(&mut self);
}
