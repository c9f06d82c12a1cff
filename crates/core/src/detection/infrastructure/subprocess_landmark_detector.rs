//! Landmark estimation delegated to an external program (e.g. a MediaPipe
//! hands + face mesh script).
//!
//! Protocol over the child's stdin/stdout:
//! 1. The program prints `READY` once its models are loaded.
//! 2. Per frame we send `width`, `height`, `channels` as little-endian `u32`
//!    followed by `width * height * channels` RGB bytes.
//! 3. The program answers with one JSON line (see `landmark_wire`):
//!    `{"hands": [{"landmarks": [{"x":..,"y":..,"z":..}, ..]}],
//!      "face": {"landmarks": [..]} | null, "error": null | "<message>"}`.
//!
//! No program ships with this crate. The default configuration runs
//! `python3 landmark_server.py` from the working directory; point
//! `landmark_program` and `landmark_args` at your own estimator otherwise.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::detection::domain::landmarks::LandmarkFrame;
use crate::detection::infrastructure::landmark_wire::DetectionResponse;
use crate::shared::constants::{LANDMARK_PROGRAM_HINT, LANDMARK_READY_SIGNAL};
use crate::shared::error::SessionError;
use crate::shared::frame::Frame;

/// Request/response framing, independent of where the bytes go.
pub struct LandmarkChannel<W: Write, R: BufRead> {
    writer: W,
    reader: R,
    line: String,
}

impl<W: Write, R: BufRead> LandmarkChannel<W, R> {
    pub fn new(writer: W, reader: R) -> Self {
        Self {
            writer,
            reader,
            line: String::new(),
        }
    }

    /// Blocks until the peer announces it is ready.
    pub fn handshake(&mut self) -> Result<(), SessionError> {
        let line = self
            .read_line()
            .map_err(|e| SessionError::DependencyUnavailable(e.to_string()))?;
        if line.trim() != LANDMARK_READY_SIGNAL {
            return Err(SessionError::DependencyUnavailable(format!(
                "expected {LANDMARK_READY_SIGNAL} from landmark program, got {:?}",
                line.trim()
            )));
        }
        Ok(())
    }

    pub fn request(&mut self, frame: &Frame) -> Result<LandmarkFrame, Box<dyn std::error::Error>> {
        self.writer.write_all(&frame.width().to_le_bytes())?;
        self.writer.write_all(&frame.height().to_le_bytes())?;
        self.writer
            .write_all(&u32::from(frame.channels()).to_le_bytes())?;
        self.writer.write_all(frame.data())?;
        self.writer.flush()?;

        let line = self.read_line()?;
        let response = DetectionResponse::parse(line)
            .map_err(|e| format!("bad landmark response {:?}: {e}", line.trim()))?;

        if let Some(error) = response.error() {
            log::warn!("Landmark program error on frame {}: {error}", frame.index());
            return Ok(LandmarkFrame::default());
        }
        Ok(response.into_landmark_frame())
    }

    fn read_line(&mut self) -> Result<&str, Box<dyn std::error::Error>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Err("landmark program closed its output".into());
        }
        Ok(&self.line)
    }
}

/// Runs the landmark program as a child process for the detector's lifetime.
///
/// The child is killed when the detector is dropped.
pub struct SubprocessLandmarkDetector {
    child: Child,
    channel: LandmarkChannel<ChildStdin, BufReader<ChildStdout>>,
}

impl SubprocessLandmarkDetector {
    pub fn spawn(program: &Path, args: &[String]) -> Result<Self, SessionError> {
        if let Some(script) = missing_script(args) {
            return Err(SessionError::DependencyUnavailable(format!(
                "landmark script {} not found. {LANDMARK_PROGRAM_HINT}",
                script.display()
            )));
        }
        log::info!("Starting landmark program: {}", program.display());

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                SessionError::DependencyUnavailable(format!(
                    "failed to start {}: {e}. {LANDMARK_PROGRAM_HINT}",
                    program.display()
                ))
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SessionError::DependencyUnavailable(
                "landmark program pipes unavailable".to_string(),
            ));
        };

        let mut channel = LandmarkChannel::new(stdin, BufReader::new(stdout));
        if let Err(e) = channel.handshake() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }

        log::info!("Landmark program ready");
        Ok(Self { child, channel })
    }
}

/// The script argument, when it names a file that does not exist.
///
/// The first non-flag argument with a file extension is taken as the script
/// the interpreter would run.
fn missing_script(args: &[String]) -> Option<&Path> {
    let script = args
        .iter()
        .map(Path::new)
        .find(|arg| !arg.to_string_lossy().starts_with('-') && arg.extension().is_some())?;
    (!script.exists()).then_some(script)
}

impl LandmarkDetector for SubprocessLandmarkDetector {
    fn detect(&mut self, frame: &Frame) -> Result<LandmarkFrame, Box<dyn std::error::Error>> {
        self.channel.request(frame)
    }
}

impl Drop for SubprocessLandmarkDetector {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
