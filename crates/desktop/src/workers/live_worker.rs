use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use gesture_reaction_core::detection::domain::landmarks::LandmarkFrame;
use gesture_reaction_core::detection::infrastructure::subprocess_landmark_detector::SubprocessLandmarkDetector;
use gesture_reaction_core::gesture::domain::gesture::{GestureLabel, GestureVerdict, ReactionAsset};
use gesture_reaction_core::pipeline::live_reaction_use_case::{LiveReactionUseCase, LiveSessionStats};
use gesture_reaction_core::reaction::domain::reaction_presenter::ReactionPresenter;
use gesture_reaction_core::reaction::infrastructure::reaction_library::ReactionLibrary;
use gesture_reaction_core::shared::config::SessionConfig;
use gesture_reaction_core::shared::frame::Frame;
use gesture_reaction_core::video::infrastructure::camera_reader::{
    default_camera_device, FfmpegCameraReader,
};

use crate::overlay;

/// RGBA pixels ready for an image handle.
#[derive(Debug, Clone)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    fn from_frame(frame: &Frame) -> Self {
        Self {
            width: frame.width(),
            height: frame.height(),
            pixels: frame.to_rgba(),
        }
    }
}

/// Messages sent from the worker thread to the UI.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    Frame {
        image: RgbaImage,
        gesture: GestureLabel,
        confidence: f64,
    },
    /// `image` is `None` when the asset failed to load.
    ShowReaction {
        asset: ReactionAsset,
        image: Option<RgbaImage>,
    },
    ReleaseReaction,
    AssetMissing(String),
    Finished(LiveSessionStats),
    Error(String),
}

/// Parameters for a live session.
pub struct LiveParams {
    pub config: SessionConfig,
    pub show_landmarks: bool,
}

/// Spawn the live session worker. Returns the channel receiver and the stop flag.
pub fn spawn(params: LiveParams) -> (Receiver<WorkerMessage>, Arc<AtomicBool>) {
    let (tx, rx) = crossbeam_channel::unbounded::<WorkerMessage>();
    let stop = Arc::new(AtomicBool::new(false));
    let stop_clone = stop.clone();

    thread::spawn(move || {
        let message = match run_session(&tx, &stop_clone, &params) {
            Ok(stats) => WorkerMessage::Finished(stats),
            Err(e) => WorkerMessage::Error(e.to_string()),
        };
        let _ = tx.send(message);
    });

    (rx, stop)
}

fn run_session(
    tx: &Sender<WorkerMessage>,
    stop: &Arc<AtomicBool>,
    params: &LiveParams,
) -> Result<LiveSessionStats, Box<dyn std::error::Error>> {
    let config = &params.config;

    let library = ReactionLibrary::load(&config.assets_dir);
    for missing in library.missing() {
        let _ = tx.send(WorkerMessage::AssetMissing(missing.to_string()));
    }

    let detector = SubprocessLandmarkDetector::spawn(&config.landmark_program, &config.landmark_args)?;
    let device = config
        .camera_device
        .clone()
        .unwrap_or_else(|| default_camera_device().to_string());
    log::info!("Opening camera {device}");

    let presenter = ChannelPresenter::new(tx.clone(), params.show_landmarks);
    let mut use_case = LiveReactionUseCase::new(
        Box::new(FfmpegCameraReader::default()),
        Box::new(detector),
        Box::new(presenter),
        library,
        config.gesture,
        config.mirror,
    );

    let stats = use_case.execute(Path::new(&device), &mut || !stop.load(Ordering::Relaxed))?;
    Ok(stats)
}

/// Forwards presentation calls to the UI thread.
///
/// A reaction image is sent once when it starts showing, not on every frame
/// it stays up.
struct ChannelPresenter {
    tx: Sender<WorkerMessage>,
    show_landmarks: bool,
    showing: Option<ReactionAsset>,
}

impl ChannelPresenter {
    fn new(tx: Sender<WorkerMessage>, show_landmarks: bool) -> Self {
        Self {
            tx,
            show_landmarks,
            showing: None,
        }
    }

    fn send(&self, message: WorkerMessage) -> Result<(), Box<dyn std::error::Error>> {
        self.tx.send(message).map_err(|_| "window closed")?;
        Ok(())
    }
}

impl ReactionPresenter for ChannelPresenter {
    fn present_frame(
        &mut self,
        frame: &Frame,
        landmarks: &LandmarkFrame,
        verdict: &GestureVerdict,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let image = if self.show_landmarks {
            let mut annotated = frame.clone();
            overlay::draw_landmarks(&mut annotated, landmarks);
            RgbaImage::from_frame(&annotated)
        } else {
            RgbaImage::from_frame(frame)
        };
        self.send(WorkerMessage::Frame {
            image,
            gesture: verdict.label(),
            confidence: verdict.confidence(),
        })
    }

    fn show_reaction(
        &mut self,
        asset: ReactionAsset,
        image: Option<&Frame>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.showing == Some(asset) {
            return Ok(());
        }
        self.showing = Some(asset);
        self.send(WorkerMessage::ShowReaction {
            asset,
            image: image.map(RgbaImage::from_frame),
        })
    }

    fn release_reaction(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.showing = None;
        self.send(WorkerMessage::ReleaseReaction)
    }
}
