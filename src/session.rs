/*
Cat Royale - Game End Watcher
*/
use bevy::prelude::*;

/// Per-Session Flags Shared With Every Collaborator
/// A New Game Means a Fresh App, so Nothing Here is Ever Reset
#[derive(Resource, Debug, Clone, Default)]
pub struct GameSession {
    pub game_over: bool,
}

/// Run Condition for Gameplay Systems That Must Stop at Game End
pub fn game_running(session: Option<Res<GameSession>>) -> bool {
    session.is_none_or(|s| !s.game_over)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gameplay_runs_until_game_over() {
        let mut world = World::new();
        assert!(world.run_system_cached(game_running).unwrap());

        world.insert_resource(GameSession::default());
        assert!(world.run_system_cached(game_running).unwrap());

        world.resource_mut::<GameSession>().game_over = true;
        assert!(!world.run_system_cached(game_running).unwrap());
    }
}
