/*
Cat Royale - Game End Watcher
*/
use bevy::prelude::*;
use std::time::Duration;

use crate::deployment::PieceDeployment;
use crate::session::GameSession;
use super::settings::GameEndSettings;

/// Presentation Side of the Game End Sequence
/// Watcher Decides *When*, Presenter Decides *How it Looks*
pub trait EndPresenter {
    /// Transparent Full-Screen Input Sink, Directly Under the Overlay
    fn show_blocker(&mut self) -> Entity;

    /// Topmost Modal (Icon + Message), Background Starts Transparent
    fn show_overlay(&mut self) -> Entity;

    /// Hold Background Clear for `after`, Then Dim Over `over`
    fn fade_overlay_background(&mut self, overlay: Entity, after: Duration, over: Duration);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatcherState {
    #[default]
    Armed,
    Triggered,
}

/// One Watcher per Game Session, Never Re-Armed
#[derive(Resource, Debug)]
pub struct GameEndWatcher {
    state: WatcherState,
    poll: Option<Timer>,
    blocker: Option<Entity>,
    overlay: Option<Entity>,
    fade_hold: Duration,
    fade_duration: Duration,
}

impl GameEndWatcher {
    /// Poll Timer Starts Running Immediately
    pub fn new(settings: &GameEndSettings) -> Self {
        Self {
            state: WatcherState::Armed,
            poll: Some(Timer::new(settings.check_interval(), TimerMode::Repeating)),
            blocker: None,
            overlay: None,
            fade_hold: settings.fade_hold(),
            fade_duration: settings.fade_duration(),
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.state == WatcherState::Triggered
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    pub fn blocker(&self) -> Option<Entity> {
        self.blocker
    }

    pub fn overlay(&self) -> Option<Entity> {
        self.overlay
    }

    /// Advance Poll Timer Only, True When a Check Fell Due This Frame
    /// Always False Once Polling Has Stopped
    pub fn poll_due(&mut self, delta: Duration) -> bool {
        let Some(poll) = self.poll.as_mut() else { return false; };
        poll.tick(delta).just_finished()
    }

    /// Advance Poll Timer, Check Once if a Poll Fell Due
    /// Returns True Only on the Tick That Triggered the Game End
    pub fn tick(
        &mut self,
        delta: Duration,
        deployment: Option<&mut PieceDeployment>,
        session: &mut GameSession,
        presenter: &mut impl EndPresenter,
    ) -> bool {
        if !self.poll_due(delta) {
            return false;
        }

        self.check(deployment, session, presenter)
    }

    /// Single Poll: No Context / No Shared King State Means "Not Ready Yet"
    pub fn check(
        &mut self,
        deployment: Option<&mut PieceDeployment>,
        session: &mut GameSession,
        presenter: &mut impl EndPresenter,
    ) -> bool {
        if self.is_triggered() {
            return false;
        }
        let Some(deployment) = deployment else { return false; };
        let Some(shared) = deployment.king_tower_shared.as_ref() else { return false; };

        if !shared.has_king_down() {
            return false;
        }

        self.trigger_game_end(Some(deployment), session, presenter)
    }

    /// Latch -> Freeze -> Overlay -> Stop Polling (Order is Fixed)
    pub fn trigger_game_end(
        &mut self,
        deployment: Option<&mut PieceDeployment>,
        session: &mut GameSession,
        presenter: &mut impl EndPresenter,
    ) -> bool {
        if self.is_triggered() {
            return false;
        }
        self.state = WatcherState::Triggered;

        self.stop_interactions(deployment, session, presenter);
        self.show_overlay(presenter);

        if self.poll.take().is_some() {
            debug!("Game end: poll timer cancelled");
        }

        info!("Game end triggered (input frozen, overlay shown)");
        true
    }

    fn stop_interactions(
        &mut self,
        deployment: Option<&mut PieceDeployment>,
        session: &mut GameSession,
        presenter: &mut impl EndPresenter,
    ) {
        if let Some(scan) = deployment.and_then(|pd| pd.attack_scan_timer.take()) {
            debug!("Game end: attack scan cancelled after {} scans", scan.scans());
        }

        session.game_over = true;

        if self.blocker.is_none() {
            self.blocker = Some(presenter.show_blocker());
        }
    }

    fn show_overlay(&mut self, presenter: &mut impl EndPresenter) {
        if self.overlay.is_some() {
            return;
        }

        let overlay = presenter.show_overlay();
        presenter.fade_overlay_background(overlay, self.fade_hold, self.fade_duration);
        self.overlay = Some(overlay);
    }
}

impl Default for GameEndWatcher {
    fn default() -> Self {
        Self::new(&GameEndSettings::default())
    }
}
