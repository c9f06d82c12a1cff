/// Describes an opened frame source (still image or camera stream).
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// 0 for still images.
    pub fps: f64,
    /// File path or capture device, for log and error messages.
    pub source: String,
}
