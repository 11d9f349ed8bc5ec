/*
Cat Royale - Game End Watcher
*/
// Watches Shared King Tower HP, First King Down Freezes Input + Shows
// the "Game Ends" Modal. One-Shot per Session: Nothing Here Re-Arms
use bevy::prelude::*;

mod overlay;
mod settings;
mod watcher;

pub use overlay::{
    load_game_end_assets,
    AnnouncerFrame,
    GameEndAssets,
    GameEndBlocker,
    GameEndDialog,
    GameEndOverlay,
    OverlayFade,
    UiEndPresenter,
};
pub use settings::GameEndSettings;
pub use watcher::{EndPresenter, GameEndWatcher, WatcherState};

use crate::deployment::{tick_attack_scan, PieceDeployment};
use crate::session::GameSession;

/// Written Once, on the Frame the Watcher Triggers
#[derive(Clone, Copy, Debug, Message)]
pub struct GameEnded;

pub struct GameEndPlugin;

impl Plugin for GameEndPlugin {
    fn build(&self, app: &mut App) {
        // Prefer Settings the App Already Provides (Tests, Embedders)
        let settings = app
            .world()
            .get_resource::<GameEndSettings>()
            .cloned()
            .unwrap_or_else(GameEndSettings::load);

        app.insert_resource(GameEndWatcher::new(&settings))
            .insert_resource(settings)
            .init_resource::<GameSession>()
            .init_resource::<GameEndAssets>()
            .add_message::<GameEnded>()
            .add_systems(Startup, load_game_end_assets)
            .add_systems(
                Update,
                (
                    poll_game_end.after(tick_attack_scan),
                    overlay::tick_overlay_fade,
                ),
            );
    }
}

pub fn poll_game_end(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<GameEndSettings>,
    assets: Res<GameEndAssets>,
    mut watcher: ResMut<GameEndWatcher>,
    mut session: ResMut<GameSession>,
    mut deployment: Option<ResMut<PieceDeployment>>,
    mut ended: MessageWriter<GameEnded>,
) {
    if watcher.is_triggered() || !watcher.poll_due(time.delta()) {
        return;
    }

    let mut presenter = UiEndPresenter::new(&mut commands, &settings, &assets);

    if watcher.check(deployment.as_deref_mut(), &mut session, &mut presenter) {
        ended.write(GameEnded);
    }
}
