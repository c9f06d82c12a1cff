use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use iced::keyboard::key::Named;
use iced::keyboard::{self, Key};
use iced::widget::image::Handle;
use iced::widget::{button, checkbox, column, container, pick_list, row, text, Space};
use iced::{event, Element, Event, Length, Subscription, Task, Theme};

use gesture_reaction_core::gesture::domain::gesture::{GestureLabel, ReactionAsset};

use crate::settings::{Appearance, Settings};
use crate::theme;
use crate::workers::live_worker::{self, LiveParams, RgbaImage, WorkerMessage};

const POLL_INTERVAL: Duration = Duration::from_millis(15);

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    Poll,
    EscapePressed,
    Restart,
    MirrorChanged(bool),
    ShowLandmarksChanged(bool),
    AppearanceChanged(Appearance),
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Running,
    Stopping,
    Ended(String),
    Failed(String),
}

struct Reaction {
    asset: ReactionAsset,
    image: Option<Handle>,
}

struct Session {
    rx: Receiver<WorkerMessage>,
    stop: Arc<AtomicBool>,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    settings: Settings,
    state: SessionState,
    session: Option<Session>,
    exit_when_stopped: bool,
    camera: Option<Handle>,
    gesture: GestureLabel,
    confidence: f64,
    reaction: Option<Reaction>,
    warnings: Vec<String>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let mut app = Self {
            settings: Settings::load(),
            state: SessionState::Running,
            session: None,
            exit_when_stopped: false,
            camera: None,
            gesture: GestureLabel::None,
            confidence: 0.0,
            reaction: None,
            warnings: Vec::new(),
        };
        app.start_session();
        (app, Task::none())
    }

    fn start_session(&mut self) {
        let (rx, stop) = live_worker::spawn(LiveParams {
            config: self.settings.session.clone(),
            show_landmarks: self.settings.show_landmarks,
        });
        self.session = Some(Session { rx, stop });
        self.state = SessionState::Running;
        self.camera = None;
        self.gesture = GestureLabel::None;
        self.confidence = 0.0;
        self.reaction = None;
        self.warnings.clear();
    }

    fn request_stop(&mut self) {
        if let Some(session) = &self.session {
            session.stop.store(true, Ordering::Relaxed);
            self.state = SessionState::Stopping;
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Poll => return self.drain_worker(),
            Message::EscapePressed => {
                if self.session.is_some() {
                    self.exit_when_stopped = true;
                    self.request_stop();
                } else {
                    return iced::exit();
                }
            }
            Message::Restart => {
                if self.session.is_none() {
                    self.start_session();
                }
            }
            Message::MirrorChanged(mirror) => {
                self.settings.session.mirror = mirror;
                self.settings.save();
            }
            Message::ShowLandmarksChanged(show) => {
                self.settings.show_landmarks = show;
                self.settings.save();
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }
        }
        Task::none()
    }

    fn drain_worker(&mut self) -> Task<Message> {
        let Some(session) = &self.session else {
            return Task::none();
        };

        let mut ended = None;
        for message in session.rx.try_iter() {
            match message {
                WorkerMessage::Frame {
                    image,
                    gesture,
                    confidence,
                } => {
                    self.camera = Some(to_handle(image));
                    self.gesture = gesture;
                    self.confidence = confidence;
                }
                WorkerMessage::ShowReaction { asset, image } => {
                    self.reaction = Some(Reaction {
                        asset,
                        image: image.map(to_handle),
                    });
                }
                WorkerMessage::ReleaseReaction => self.reaction = None,
                WorkerMessage::AssetMissing(warning) => self.warnings.push(warning),
                WorkerMessage::Finished(stats) => {
                    ended = Some(SessionState::Ended(format!(
                        "Session ended after {} frames ({} skipped)",
                        stats.frames, stats.skipped
                    )));
                }
                WorkerMessage::Error(e) => ended = Some(SessionState::Failed(e)),
            }
        }

        let Some(state) = ended else {
            return Task::none();
        };
        self.session = None;
        self.reaction = None;
        if self.exit_when_stopped {
            return iced::exit();
        }
        self.state = state;
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let theme = self.theme();

        let status = match &self.state {
            SessionState::Running => text("Press Esc to quit").size(13),
            SessionState::Stopping => text("Stopping\u{2026}").size(13),
            SessionState::Ended(summary) => text(summary.clone()).size(13),
            SessionState::Failed(e) => text(format!("Error: {e}"))
                .size(13)
                .color(theme.palette().danger),
        };

        let gesture_line = text(format!(
            "Gesture: {} ({:.2})",
            self.gesture, self.confidence
        ))
        .size(20)
        .color(theme::gesture_color(&theme, self.gesture));

        let camera: Element<'_, Message> = match &self.camera {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::FillPortion(3))
                .into(),
            None => container(text("Waiting for camera\u{2026}"))
                .width(Length::FillPortion(3))
                .center_x(Length::FillPortion(3))
                .into(),
        };

        let reaction: Element<'_, Message> = match &self.reaction {
            Some(Reaction {
                image: Some(handle),
                ..
            }) => iced::widget::image(handle.clone())
                .width(Length::FillPortion(2))
                .into(),
            Some(Reaction { asset, image: None }) => {
                container(text(format!("{asset} unavailable")).size(13))
                    .width(Length::FillPortion(2))
                    .into()
            }
            None => Space::new().width(Length::FillPortion(2)).into(),
        };

        let restart = button(text("Restart").size(13)).padding([4, 12]);
        let restart = if self.session.is_none() {
            restart.on_press(Message::Restart)
        } else {
            restart
        };

        let controls = row![
            checkbox(self.settings.session.mirror)
                .label("Mirror")
                .on_toggle(Message::MirrorChanged),
            checkbox(self.settings.show_landmarks)
                .label("Landmarks")
                .on_toggle(Message::ShowLandmarksChanged),
            pick_list(
                Appearance::ALL,
                Some(self.settings.appearance),
                Message::AppearanceChanged
            )
            .text_size(13),
            Space::new().width(Length::Fill),
            restart,
        ]
        .spacing(16)
        .align_y(iced::Alignment::Center);

        let warnings = column(
            self.warnings
                .iter()
                .map(|w| text(w.clone()).size(11).into())
                .collect::<Vec<Element<'_, Message>>>(),
        );

        column![
            gesture_line,
            row![camera, reaction].spacing(12).height(Length::Fill),
            warnings,
            controls,
            status,
        ]
        .spacing(8)
        .padding(16)
        .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let keys = event::listen_with(on_event);
        if self.session.is_some() {
            Subscription::batch([keys, iced::time::every(POLL_INTERVAL).map(|_| Message::Poll)])
        } else {
            keys
        }
    }
}

fn on_event(event: Event, _status: event::Status, _window: iced::window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: Key::Named(Named::Escape),
            ..
        }) => Some(Message::EscapePressed),
        _ => None,
    }
}

fn to_handle(image: RgbaImage) -> Handle {
    Handle::from_rgba(image.width, image.height, image.pixels)
}
