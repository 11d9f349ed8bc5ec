/*
Cat Royale - Game End Watcher
*/
use bevy::color::Alpha;
use bevy::math::cubic_splines::CubicSegment;
use bevy::picking::Pickable;
use bevy::prelude::*;
use std::time::Duration;

use super::settings::GameEndSettings;
use super::watcher::EndPresenter;

// Blocker Sits Directly Under the Overlay, Both Above Everything Else
pub(crate) const OVERLAY_Z: i32 = i32::MAX;
pub(crate) const BLOCKER_Z: i32 = i32::MAX - 1;

pub(crate) const ICON_SIZE: f32 = 80.0;
const DIALOG_BG: Color = Color::srgba(1.0, 1.0, 1.0, 0.9);
const BUBBLE_BG: Color = Color::srgb(0.96, 0.96, 0.96);
const BUBBLE_TEXT: Color = Color::srgb(0.067, 0.067, 0.067);

// Standard "ease" Timing Curve
const EASE_P1: Vec2 = Vec2::new(0.25, 0.1);
const EASE_P2: Vec2 = Vec2::new(0.25, 1.0);

/// Transparent Full-Screen Input Sink
#[derive(Component)]
pub struct GameEndBlocker;

/// Root of the "Game Ends" Modal
#[derive(Component)]
pub struct GameEndOverlay;

#[derive(Component)]
pub struct GameEndDialog;

/// Fixed-Size White Backing Around the Announcer Icon
#[derive(Component)]
pub struct AnnouncerFrame;

/// Overlay Art, Loaded Once at Startup So the Modal Never Pops In
#[derive(Resource, Debug, Clone, Default)]
pub struct GameEndAssets {
    pub icon: Handle<Image>,
    pub bubble_font: Handle<Font>,
}

pub fn load_game_end_assets(
    mut commands: Commands,
    settings: Res<GameEndSettings>,
    asset_server: Option<Res<AssetServer>>,
) {
    // Headless Apps Keep Whatever Handles Were Provided (Default or Injected)
    let Some(asset_server) = asset_server else { return; };

    commands.insert_resource(GameEndAssets {
        icon: asset_server.load(settings.announcer_icon.clone()),
        bubble_font: asset_server.load(settings.bubble_font.clone()),
    });
}

/// Deferred Background Dim on the Overlay Root
#[derive(Component, Debug, Clone)]
pub struct OverlayFade {
    pub elapsed: Duration,
    pub hold: Duration,
    pub duration: Duration,
    pub target_alpha: f32,
}

impl OverlayFade {
    pub fn new(hold: Duration, duration: Duration, target_alpha: f32) -> Self {
        Self {
            elapsed: Duration::ZERO,
            hold,
            duration,
            target_alpha,
        }
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.hold + self.duration
    }

    /// Background Alpha at Current Elapsed Time
    pub fn alpha(&self) -> f32 {
        if self.elapsed <= self.hold {
            return 0.0;
        }
        if self.duration.is_zero() || self.is_done() {
            return self.target_alpha;
        }

        let t = (self.elapsed - self.hold).as_secs_f32() / self.duration.as_secs_f32();
        CubicSegment::new_bezier_easing(EASE_P1, EASE_P2).ease(t) * self.target_alpha
    }
}

/// Spawns Blocker / Overlay as Bevy UI Nodes
pub struct UiEndPresenter<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    settings: &'a GameEndSettings,
    assets: &'a GameEndAssets,
}

impl<'a, 'w, 's> UiEndPresenter<'a, 'w, 's> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        settings: &'a GameEndSettings,
        assets: &'a GameEndAssets,
    ) -> Self {
        Self { commands, settings, assets }
    }
}

fn full_screen() -> Node {
    Node {
        position_type: PositionType::Absolute,
        left: Val::Px(0.0),
        right: Val::Px(0.0),
        top: Val::Px(0.0),
        bottom: Val::Px(0.0),
        ..default()
    }
}

impl EndPresenter for UiEndPresenter<'_, '_, '_> {
    fn show_blocker(&mut self) -> Entity {
        let blocker = self
            .commands
            .spawn((
                Name::new("game_end_blocker"),
                GameEndBlocker,
                full_screen(),
                BackgroundColor(Color::NONE),
                GlobalZIndex(BLOCKER_Z),
                // Hoverable + Blocking: Swallows Every Pointer Hit Below It
                Pickable::default(),
            ))
            .id();

        debug!("Game end: input blocker spawned ({blocker})");
        blocker
    }

    fn show_overlay(&mut self) -> Entity {
        let icon = self.assets.icon.clone();
        let message = self.settings.message.clone();
        let font = TextFont {
            font: self.assets.bubble_font.clone(),
            font_size: 18.0,
            weight: FontWeight::BLACK,
            ..default()
        };

        let overlay = self
            .commands
            .spawn((
                Name::new("game_end_overlay"),
                GameEndOverlay,
                Node {
                    display: Display::Flex,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..full_screen()
                },
                BackgroundColor(Color::BLACK.with_alpha(0.0)),
                GlobalZIndex(OVERLAY_Z),
                // Root Lets Pointer Through, Blocker Already Covers Input
                Pickable::IGNORE,
            ))
            .with_children(|root| {
                root.spawn((
                    GameEndDialog,
                    Node {
                        display: Display::Flex,
                        align_items: AlignItems::Center,
                        column_gap: Val::Px(16.0),
                        padding: UiRect::axes(Val::Px(18.0), Val::Px(12.0)),
                        border_radius: BorderRadius::all(Val::Px(10.0)),
                        ..default()
                    },
                    BackgroundColor(DIALOG_BG),
                    BoxShadow::new(
                        Color::BLACK.with_alpha(0.35),
                        Val::Px(0.0),
                        Val::Px(8.0),
                        Val::Px(0.0),
                        Val::Px(24.0),
                    ),
                    Pickable::default(),
                ))
                .with_children(|dialog| {
                    // Icon Keeps its Aspect Ratio Inside the Square Frame
                    dialog
                        .spawn((
                            AnnouncerFrame,
                            Node {
                                width: Val::Px(ICON_SIZE),
                                height: Val::Px(ICON_SIZE),
                                align_items: AlignItems::Center,
                                justify_content: JustifyContent::Center,
                                overflow: Overflow::clip(),
                                border_radius: BorderRadius::all(Val::Px(8.0)),
                                ..default()
                            },
                            BackgroundColor(Color::WHITE),
                        ))
                        .with_child((
                            ImageNode::new(icon),
                            Node {
                                max_width: Val::Percent(100.0),
                                max_height: Val::Percent(100.0),
                                ..default()
                            },
                        ));

                    dialog
                        .spawn((
                            Node {
                                padding: UiRect::axes(Val::Px(14.0), Val::Px(10.0)),
                                border: UiRect::all(Val::Px(2.0)),
                                border_radius: BorderRadius::all(Val::Px(8.0)),
                                ..default()
                            },
                            BackgroundColor(BUBBLE_BG),
                            BorderColor::all(Color::BLACK),
                            BoxShadow::new(
                                Color::BLACK,
                                Val::Px(2.0),
                                Val::Px(2.0),
                                Val::Px(0.0),
                                Val::Px(0.0),
                            ),
                        ))
                        .with_child((
                            Text::new(message),
                            font,
                            TextColor(BUBBLE_TEXT),
                        ));
                });
            })
            .id();

        debug!("Game end: overlay spawned ({overlay})");
        overlay
    }

    fn fade_overlay_background(&mut self, overlay: Entity, after: Duration, over: Duration) {
        self.commands
            .entity(overlay)
            .insert(OverlayFade::new(after, over, self.settings.overlay_tint_alpha));
    }
}

pub fn tick_overlay_fade(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut OverlayFade, &mut BackgroundColor), With<GameEndOverlay>>,
) {
    for (e, mut fade, mut bg) in q.iter_mut() {
        fade.elapsed += time.delta();

        let alpha = fade.alpha();
        if bg.0.alpha() != alpha {
            bg.0 = Color::BLACK.with_alpha(alpha);
        }

        if fade.is_done() {
            commands.entity(e).remove::<OverlayFade>();
            debug!("Game end: overlay fade finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade_at(ms: u64) -> f32 {
        let mut fade = OverlayFade::new(Duration::from_millis(1000), Duration::from_millis(600), 0.65);
        fade.elapsed = Duration::from_millis(ms);
        fade.alpha()
    }

    #[test]
    fn test_fade_holds_clear_for_first_second() {
        for ms in [0, 250, 500, 999, 1000] {
            assert_eq!(fade_at(ms), 0.0, "at {ms} ms");
        }
    }

    #[test]
    fn test_fade_rises_monotonically_to_target() {
        let samples: Vec<f32> = (1000..=1600).step_by(50).map(fade_at).collect();

        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
        assert!(fade_at(1300) > 0.0 && fade_at(1300) < 0.65);
        assert!((fade_at(1600) - 0.65).abs() < 1e-4);
        assert!((fade_at(1599) - 0.65).abs() < 1e-2);
        assert!((fade_at(5000) - 0.65).abs() < 1e-4);
    }

    #[test]
    fn test_fade_done_after_hold_plus_duration() {
        let mut fade = OverlayFade::new(Duration::from_millis(1000), Duration::from_millis(600), 0.65);
        fade.elapsed = Duration::from_millis(1599);
        assert!(!fade.is_done());
        fade.elapsed = Duration::from_millis(1600);
        assert!(fade.is_done());
    }

    #[test]
    fn test_zero_length_fade_snaps() {
        let mut fade = OverlayFade::new(Duration::from_millis(100), Duration::ZERO, 0.5);
        fade.elapsed = Duration::from_millis(101);
        assert_eq!(fade.alpha(), 0.5);
    }

    #[test]
    fn test_fade_follows_standard_ease_curve() {
        // ease(0.5) ~= 0.8024, ease(0.25) ~= 0.4085 for cubic-bezier(.25,.1,.25,1)
        assert!((fade_at(1300) - 0.65 * 0.8024).abs() < 5e-3);
        assert!((fade_at(1150) - 0.65 * 0.4085).abs() < 5e-3);

        // Fast Start: Well Ahead of a Linear Ramp at the Quarter Mark
        assert!(fade_at(1150) > 0.65 * 0.25);
    }
}
