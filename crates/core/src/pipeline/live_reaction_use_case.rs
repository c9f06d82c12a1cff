use std::path::Path;
use std::time::Instant;

use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::gesture::domain::frame_resolver::{FrameResolver, ResolutionMode};
use crate::gesture::domain::gesture_classifier::GestureClassifier;
use crate::reaction::domain::reaction_presenter::ReactionPresenter;
use crate::reaction::domain::reaction_state_machine::{DisplayCommand, ReactionStateMachine};
use crate::reaction::infrastructure::reaction_library::ReactionLibrary;
use crate::shared::config::GestureConfig;
use crate::shared::error::SessionError;
use crate::video::domain::video_reader::VideoReader;

/// Counters reported when a live session ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LiveSessionStats {
    pub frames: usize,
    pub skipped: usize,
    pub triggers: usize,
}

/// Continuous camera loop: read → mirror → landmarks → last matching hand →
/// reaction state machine → presenter.
///
/// Runs synchronously on the calling thread until `should_continue` returns
/// false or the stream ends. The reader is closed and any showing reaction
/// released on every exit path.
pub struct LiveReactionUseCase {
    reader: Box<dyn VideoReader>,
    detector: Box<dyn LandmarkDetector>,
    presenter: Box<dyn ReactionPresenter>,
    library: ReactionLibrary,
    resolver: FrameResolver,
    state_machine: ReactionStateMachine,
    mirror: bool,
    clock: Box<dyn FnMut() -> Instant + Send>,
}

impl LiveReactionUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        detector: Box<dyn LandmarkDetector>,
        presenter: Box<dyn ReactionPresenter>,
        library: ReactionLibrary,
        config: GestureConfig,
        mirror: bool,
    ) -> Self {
        let state_machine = ReactionStateMachine::new(config.reaction_duration());
        Self {
            reader,
            detector,
            presenter,
            library,
            resolver: FrameResolver::new(GestureClassifier::new(config), ResolutionMode::LastWrite),
            state_machine,
            mirror,
            clock: Box::new(Instant::now),
        }
    }

    /// Replaces the wall clock used to timestamp ticks.
    pub fn with_clock(mut self, clock: impl FnMut() -> Instant + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn execute(
        &mut self,
        source: &Path,
        should_continue: &mut dyn FnMut() -> bool,
    ) -> Result<LiveSessionStats, SessionError> {
        let metadata = self
            .reader
            .open(source)
            .map_err(|e| SessionError::unreadable(source.display().to_string(), e))?;
        log::info!(
            "Live session started on {} ({}x{})",
            metadata.source,
            metadata.width,
            metadata.height
        );

        let result = self.run_loop(should_continue);

        self.reader.close();
        if self.state_machine.reset() {
            if let Err(e) = self.presenter.release_reaction() {
                log::warn!("Failed to release reaction at session end: {e}");
            }
        }

        match &result {
            Ok(stats) => log::info!(
                "Live session ended: {} frames, {} skipped, {} triggers",
                stats.frames,
                stats.skipped,
                stats.triggers
            ),
            Err(e) => log::error!("Live session aborted: {e}"),
        }
        result
    }

    fn run_loop(
        &mut self,
        should_continue: &mut dyn FnMut() -> bool,
    ) -> Result<LiveSessionStats, SessionError> {
        let Self {
            reader,
            detector,
            presenter,
            library,
            resolver,
            state_machine,
            mirror,
            clock,
        } = self;

        let mut stats = LiveSessionStats::default();
        let mut frames = reader.frames();

        loop {
            if !should_continue() {
                log::info!("Stop requested");
                break;
            }
            let Some(item) = frames.next() else {
                log::info!("Camera stream ended");
                break;
            };

            let mut frame = match item {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("{}", SessionError::EmptyFrame(e.to_string()));
                    stats.skipped += 1;
                    continue;
                }
            };
            if *mirror {
                frame.mirror_horizontal();
            }

            let landmarks = detector
                .detect(&frame)
                .map_err(|e| SessionError::DependencyUnavailable(e.to_string()))?;
            let verdict = resolver.resolve(&landmarks);
            log::debug!(
                "Frame {}: {} hand(s), gesture={}",
                frame.index(),
                landmarks.hands.len(),
                verdict.label().as_str()
            );

            let trigger = verdict.reaction();
            if trigger.is_some() {
                stats.triggers += 1;
            }
            let command = state_machine.tick(trigger, clock());

            presenter
                .present_frame(&frame, &landmarks, &verdict)
                .map_err(|e| SessionError::Presentation(e.to_string()))?;
            let displayed = match command {
                DisplayCommand::Show(asset) => presenter.show_reaction(asset, library.get(asset)),
                DisplayCommand::Release => presenter.release_reaction(),
                DisplayCommand::Nothing => Ok(()),
            };
            displayed.map_err(|e| SessionError::Presentation(e.to_string()))?;

            stats.frames += 1;
        }

        Ok(stats)
    }
}
