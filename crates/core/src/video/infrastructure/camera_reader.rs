use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

#[cfg(target_os = "macos")]
const PLATFORM_INPUT_FORMAT: &str = "avfoundation";
#[cfg(target_os = "windows")]
const PLATFORM_INPUT_FORMAT: &str = "dshow";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const PLATFORM_INPUT_FORMAT: &str = "v4l2";

#[cfg(target_os = "macos")]
const PLATFORM_DEFAULT_DEVICE: &str = "0";
#[cfg(target_os = "windows")]
const PLATFORM_DEFAULT_DEVICE: &str = "video=Integrated Camera";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const PLATFORM_DEFAULT_DEVICE: &str = "/dev/video0";

const CAMERA_FRAMERATE: &str = "30";

/// Device name of the default camera for the current platform.
pub fn default_camera_device() -> &'static str {
    PLATFORM_DEFAULT_DEVICE
}

/// Captures camera frames through an ffmpeg-next device input
/// (v4l2, avfoundation or dshow depending on platform).
///
/// The "path" passed to [`open`](VideoReader::open) is the device name as the
/// input format expects it, e.g. `/dev/video0` or `0`.
pub struct FfmpegCameraReader {
    input_format: String,
    input_ctx: Option<ffmpeg_next::format::context::Input>,
    decoder: Option<ffmpeg_next::decoder::Video>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    video_stream_index: usize,
}

// Safety: FfmpegCameraReader is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegCameraReader {}

impl FfmpegCameraReader {
    pub fn new(input_format: impl Into<String>) -> Self {
        Self {
            input_format: input_format.into(),
            input_ctx: None,
            decoder: None,
            scaler: None,
            video_stream_index: 0,
        }
    }

    pub fn input_format(&self) -> &str {
        &self.input_format
    }

    fn find_input_format(&self) -> Option<ffmpeg_next::format::Format> {
        ffmpeg_next::device::input::video().find(|format| {
            format
                .name()
                .split(',')
                .any(|name| name == self.input_format)
        })
    }
}

impl Default for FfmpegCameraReader {
    fn default() -> Self {
        Self::new(PLATFORM_INPUT_FORMAT)
    }
}

impl VideoReader for FfmpegCameraReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        ffmpeg_next::device::register_all();

        let format = self
            .find_input_format()
            .ok_or_else(|| format!("capture input {:?} not available", self.input_format))?;

        let mut options = ffmpeg_next::Dictionary::new();
        options.set("framerate", CAMERA_FRAMERATE);
        let ictx = ffmpeg_next::format::open_with(path, &format, options)?.input();

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            ffmpeg_next::format::Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            fps,
            source: format!("{}:{}", self.input_format, path.display()),
        };
        log::info!(
            "Camera opened: {} ({}x{} @ {:.1} fps)",
            metadata.source,
            metadata.width,
            metadata.height,
            metadata.fps
        );

        self.video_stream_index = video_stream_index;
        self.decoder = Some(decoder);
        self.scaler = Some(scaler);
        self.input_ctx = Some(ictx);

        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let (Some(ictx), Some(decoder), Some(scaler)) = (
            self.input_ctx.as_mut(),
            self.decoder.as_mut(),
            self.scaler.as_mut(),
        ) else {
            return Box::new(std::iter::once(Err(
                "FfmpegCameraReader: not opened".into()
            )));
        };

        Box::new(CameraFrameIter {
            ictx,
            decoder,
            scaler,
            video_stream_index: self.video_stream_index,
            frame_index: 0,
            done: false,
        })
    }

    fn close(&mut self) {
        self.scaler = None;
        self.decoder = None;
        self.input_ctx = None;
    }
}

/// Live capture never flushes: the stream ends only when the device stops
/// delivering packets.
struct CameraFrameIter<'a> {
    ictx: &'a mut ffmpeg_next::format::context::Input,
    decoder: &'a mut ffmpeg_next::decoder::Video,
    scaler: &'a mut ffmpeg_next::software::scaling::Context,
    video_stream_index: usize,
    frame_index: usize,
    done: bool,
}

impl CameraFrameIter<'_> {
    fn try_receive(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return None;
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        if let Err(e) = self.scaler.run(&decoded, &mut rgb_frame) {
            return Some(Err(Box::new(e)));
        }

        let (width, height) = (rgb_frame.width(), rgb_frame.height());
        if width == 0 || height == 0 {
            return Some(Err("camera delivered an empty frame".into()));
        }

        let pixels = extract_rgb_pixels(&rgb_frame, width, height);
        let frame = Frame::new(pixels, width, height, self.frame_index);
        self.frame_index += 1;
        Some(Ok(frame))
    }
}

impl Iterator for CameraFrameIter<'_> {
    type Item = Result<Frame, Box<dyn std::error::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(result) = self.try_receive() {
            return Some(result);
        }

        loop {
            let Some((stream, packet)) = self.ictx.packets().next() else {
                self.done = true;
                return None;
            };

            if stream.index() != self.video_stream_index {
                continue;
            }

            if let Err(e) = self.decoder.send_packet(&packet) {
                return Some(Err(Box::new(e)));
            }

            if let Some(result) = self.try_receive() {
                return Some(result);
            }
        }
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer,
/// dropping per-row stride padding.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
