/*
Cat Royale - Game End Watcher
*/
use bevy::prelude::*;
use rand::RngExt;

use royalelib::deployment::{
    Allegiance,
    AttackScan,
    DeploymentPlugin,
    PieceDeployment,
    KING_TOWER_MAX_HP,
};
use royalelib::game_end::{GameEndPlugin, GameEnded};
use royalelib::session::game_running;

/// Manual Strike Damage (Space)
const STRIKE_DAMAGE: f32 = 300.0;

#[derive(Component)]
struct KingHpText(Allegiance);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Cat Royale".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((DeploymentPlugin, GameEndPlugin))
        .add_systems(Startup, setup_board)
        .add_systems(
            Update,
            (
                scan_damage.run_if(game_running),
                manual_strike.run_if(game_running),
                sync_king_hp_text,
                log_game_ended,
            ),
        )
        .run();
}

fn setup_board(mut commands: Commands) {
    commands.spawn(Camera2d);

    let mut deployment = PieceDeployment::default();
    deployment.register_king_tower(Allegiance::A, KING_TOWER_MAX_HP);
    deployment.register_king_tower(Allegiance::B, KING_TOWER_MAX_HP);
    deployment.start_attack_scan();
    commands.insert_resource(deployment);

    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::Center,
            padding: UiRect::all(Val::Px(24.0)),
            ..default()
        })
        .with_children(|root| {
            // Opponent on Top, Local Player at the Bottom
            for side in [Allegiance::B, Allegiance::A] {
                root.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 28.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    KingHpText(side),
                ));
            }
        });

    info!("Board ready: king towers registered, attack scan running");
}

// Each Scan Lands a Random Hit on a Random King (Stand-in for Tower Fire)
fn scan_damage(mut scans: MessageReader<AttackScan>, mut deployment: ResMut<PieceDeployment>) {
    let mut rng = rand::rng();

    for _ in scans.read() {
        let side = if rng.random_range(0..2) == 0 { Allegiance::A } else { Allegiance::B };
        let dmg = rng.random_range(0..60) as f32;
        deployment.apply_king_damage(side, dmg);
    }
}

fn manual_strike(keys: Res<ButtonInput<KeyCode>>, mut deployment: ResMut<PieceDeployment>) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }

    if let Some(hp) = deployment.apply_king_damage(Allegiance::B, STRIKE_DAMAGE) {
        info!("Strike on king tower 'b' -> hp {hp}");
    }
}

fn sync_king_hp_text(
    deployment: Option<Res<PieceDeployment>>,
    mut q: Query<(&KingHpText, &mut Text)>,
) {
    let Some(deployment) = deployment else { return; };
    if !deployment.is_changed() {
        return;
    }
    let Some(shared) = deployment.king_tower_shared.as_ref() else { return; };

    for (tag, mut text) in q.iter_mut() {
        let Some(entry) = shared.side(tag.0) else { continue; };
        let hp = entry.hp.map(|hp| format!("{hp:.0}")).unwrap_or_else(|| "?".to_string());
        text.0 = format!("King '{}': {hp}/{:.0}", tag.0.label(), entry.max_hp);
    }
}

fn log_game_ended(mut ended: MessageReader<GameEnded>) {
    for _ in ended.read() {
        info!("Game ended, board frozen");
    }
}
