use std::time::{Duration, Instant};

use crate::gesture::domain::gesture::ReactionAsset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionState {
    Idle,
    Showing {
        asset: ReactionAsset,
        triggered_at: Instant,
    },
}

/// What the presentation layer should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCommand {
    /// Nothing showing, nothing to do.
    Nothing,
    /// Keep (or start) displaying this reaction.
    Show(ReactionAsset),
    /// The display window just expired: close the reaction surface.
    Release,
}

/// Timed reaction display, advanced once per frame.
///
/// A trigger always restarts the window, even for the asset already showing.
/// Expiry yields [`DisplayCommand::Release`] on exactly one tick.
#[derive(Debug)]
pub struct ReactionStateMachine {
    duration: Duration,
    state: ReactionState,
}

impl ReactionStateMachine {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            state: ReactionState::Idle,
        }
    }

    pub fn state(&self) -> ReactionState {
        self.state
    }

    pub fn tick(&mut self, trigger: Option<ReactionAsset>, now: Instant) -> DisplayCommand {
        if let Some(asset) = trigger {
            self.state = ReactionState::Showing {
                asset,
                triggered_at: now,
            };
            return DisplayCommand::Show(asset);
        }

        match self.state {
            ReactionState::Idle => DisplayCommand::Nothing,
            ReactionState::Showing {
                asset,
                triggered_at,
            } => {
                // saturating: a clock that steps backwards counts as no time elapsed
                if now.saturating_duration_since(triggered_at) < self.duration {
                    DisplayCommand::Show(asset)
                } else {
                    self.state = ReactionState::Idle;
                    DisplayCommand::Release
                }
            }
        }
    }

    /// Drops any showing reaction. Returns whether there was one to release.
    pub fn reset(&mut self) -> bool {
        let was_showing = matches!(self.state, ReactionState::Showing { .. });
        self.state = ReactionState::Idle;
        was_showing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(2);

    fn at(t0: Instant, secs: f64) -> Instant {
        t0 + Duration::from_secs_f64(secs)
    }

    #[test]
    fn test_starts_idle() {
        let machine = ReactionStateMachine::new(WINDOW);
        assert_eq!(machine.state(), ReactionState::Idle);
    }

    #[test]
    fn test_idle_without_trigger_does_nothing() {
        let t0 = Instant::now();
        let mut machine = ReactionStateMachine::new(WINDOW);
        for i in 0..5 {
            assert_eq!(machine.tick(None, at(t0, i as f64)), DisplayCommand::Nothing);
        }
        assert_eq!(machine.state(), ReactionState::Idle);
    }

    #[test]
    fn test_trigger_shows_asset() {
        let t0 = Instant::now();
        let mut machine = ReactionStateMachine::new(WINDOW);
        let cmd = machine.tick(Some(ReactionAsset::Thumb), t0);
        assert_eq!(cmd, DisplayCommand::Show(ReactionAsset::Thumb));
        assert_eq!(
            machine.state(),
            ReactionState::Showing {
                asset: ReactionAsset::Thumb,
                triggered_at: t0
            }
        );
    }

    #[test]
    fn test_showing_until_window_then_release_exactly_once() {
        let t0 = Instant::now();
        let mut machine = ReactionStateMachine::new(WINDOW);
        machine.tick(Some(ReactionAsset::Thumb), t0);

        for secs in [0.0, 0.5, 1.0, 1.5, 1.999] {
            assert_eq!(
                machine.tick(None, at(t0, secs)),
                DisplayCommand::Show(ReactionAsset::Thumb),
                "at t={secs}"
            );
        }

        let commands: Vec<_> = [2.0, 2.1, 3.0, 10.0]
            .iter()
            .map(|&secs| machine.tick(None, at(t0, secs)))
            .collect();
        assert_eq!(
            commands,
            vec![
                DisplayCommand::Release,
                DisplayCommand::Nothing,
                DisplayCommand::Nothing,
                DisplayCommand::Nothing,
            ]
        );
        assert_eq!(machine.state(), ReactionState::Idle);
    }

    #[test]
    fn test_retrigger_same_asset_restarts_window() {
        let t0 = Instant::now();
        let mut machine = ReactionStateMachine::new(WINDOW);
        machine.tick(Some(ReactionAsset::Thumb), t0);
        machine.tick(Some(ReactionAsset::Thumb), at(t0, 1.0));

        // Expiry moves from t=2.0 to t=3.0
        assert_eq!(
            machine.tick(None, at(t0, 2.0)),
            DisplayCommand::Show(ReactionAsset::Thumb)
        );
        assert_eq!(
            machine.tick(None, at(t0, 2.999)),
            DisplayCommand::Show(ReactionAsset::Thumb)
        );
        assert_eq!(machine.tick(None, at(t0, 3.0)), DisplayCommand::Release);
    }

    #[test]
    fn test_new_asset_overwrites_showing_one() {
        let t0 = Instant::now();
        let mut machine = ReactionStateMachine::new(WINDOW);
        machine.tick(Some(ReactionAsset::Thumb), t0);
        let cmd = machine.tick(Some(ReactionAsset::Head), at(t0, 0.5));
        assert_eq!(cmd, DisplayCommand::Show(ReactionAsset::Head));
        assert_eq!(
            machine.tick(None, at(t0, 2.2)),
            DisplayCommand::Show(ReactionAsset::Head)
        );
        assert_eq!(machine.tick(None, at(t0, 2.5)), DisplayCommand::Release);
    }

    #[test]
    fn test_trigger_after_release_shows_again() {
        let t0 = Instant::now();
        let mut machine = ReactionStateMachine::new(WINDOW);
        machine.tick(Some(ReactionAsset::Point), t0);
        assert_eq!(machine.tick(None, at(t0, 2.0)), DisplayCommand::Release);
        assert_eq!(
            machine.tick(Some(ReactionAsset::Point), at(t0, 5.0)),
            DisplayCommand::Show(ReactionAsset::Point)
        );
        assert_eq!(machine.tick(None, at(t0, 7.0)), DisplayCommand::Release);
    }

    #[test]
    fn test_clock_going_backwards_keeps_showing() {
        let t0 = Instant::now();
        let mut machine = ReactionStateMachine::new(WINDOW);
        machine.tick(Some(ReactionAsset::Thumb), at(t0, 5.0));
        assert_eq!(
            machine.tick(None, at(t0, 1.0)),
            DisplayCommand::Show(ReactionAsset::Thumb)
        );
    }

    #[test]
    fn test_reset() {
        let t0 = Instant::now();
        let mut machine = ReactionStateMachine::new(WINDOW);
        assert!(!machine.reset());
        machine.tick(Some(ReactionAsset::Head), t0);
        assert!(machine.reset());
        assert_eq!(machine.state(), ReactionState::Idle);
    }
}
