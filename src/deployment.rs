/*
Cat Royale - Game End Watcher
*/
use bevy::prelude::*;
use std::time::Duration;

/// King Tower Max HP (Both Sides Share One King Tower Pool)
pub const KING_TOWER_MAX_HP: f32 = 1800.0;

/// Attack Scan Cadence (Towers Re-Pick Targets Every Scan)
pub const ATTACK_SCAN_INTERVAL: Duration = Duration::from_millis(250);

pub struct DeploymentPlugin;

impl Plugin for DeploymentPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<AttackScan>()
            .add_systems(Update, tick_attack_scan);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Allegiance {
    A,
    B,
}

impl Allegiance {
    pub fn label(self) -> &'static str {
        match self {
            Allegiance::A => "a",
            Allegiance::B => "b",
        }
    }
}

/// Live King Tower Health for One Side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KingTowerEntry {
    /// None While the Tower Has Not Reported a Value Yet
    pub hp: Option<f32>,
    pub max_hp: f32,
}

impl KingTowerEntry {
    pub fn new(max_hp: f32) -> Self {
        Self { hp: Some(max_hp), max_hp }
    }

    /// Only a Real Number at or Below Zero Counts as Down (NaN Never Does)
    #[inline]
    pub fn is_down(&self) -> bool {
        self.hp.is_some_and(|hp| hp <= 0.0)
    }
}

/// Shared King Tower State, One Slot per Side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KingTowerShared {
    pub a: Option<KingTowerEntry>,
    pub b: Option<KingTowerEntry>,
}

impl KingTowerShared {
    pub fn side(&self, allegiance: Allegiance) -> Option<&KingTowerEntry> {
        match allegiance {
            Allegiance::A => self.a.as_ref(),
            Allegiance::B => self.b.as_ref(),
        }
    }

    pub fn side_mut(&mut self, allegiance: Allegiance) -> Option<&mut KingTowerEntry> {
        match allegiance {
            Allegiance::A => self.a.as_mut(),
            Allegiance::B => self.b.as_mut(),
        }
    }

    /// Either King Down Ends the Match (No Attribution)
    pub fn has_king_down(&self) -> bool {
        self.a.as_ref().is_some_and(KingTowerEntry::is_down)
            || self.b.as_ref().is_some_and(KingTowerEntry::is_down)
    }
}

/// Recurring Attack Scan Handle
/// Dropping / Taking it out of PieceDeployment Cancels the Scan
#[derive(Debug, Clone)]
pub struct AttackScanTimer {
    timer: Timer,
    scans: u64,
}

impl AttackScanTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            timer: Timer::new(interval, TimerMode::Repeating),
            scans: 0,
        }
    }

    /// Returns How Many Scans Fell Due This Tick
    pub fn tick(&mut self, delta: Duration) -> u32 {
        let due = self.timer.tick(delta).times_finished_this_tick();
        self.scans += u64::from(due);
        due
    }

    pub fn scans(&self) -> u64 {
        self.scans
    }
}

impl Default for AttackScanTimer {
    fn default() -> Self {
        Self::new(ATTACK_SCAN_INTERVAL)
    }
}

/// Fired Once per Completed Attack Scan Period
#[derive(Clone, Copy, Debug, Message)]
pub struct AttackScan;

/// Deployment / Combat Context
/// Absent as a Resource Until the Board is Ready
#[derive(Resource, Debug, Clone, Default)]
pub struct PieceDeployment {
    pub attack_scan_timer: Option<AttackScanTimer>,
    pub king_tower_shared: Option<KingTowerShared>,
}

impl PieceDeployment {
    /// Create Shared King Entry for a Side (First Registration Wins)
    pub fn register_king_tower(&mut self, allegiance: Allegiance, max_hp: f32) {
        let shared = self.king_tower_shared.get_or_insert_with(KingTowerShared::default);
        let slot = match allegiance {
            Allegiance::A => &mut shared.a,
            Allegiance::B => &mut shared.b,
        };
        if slot.is_none() {
            *slot = Some(KingTowerEntry::new(max_hp));
        }
    }

    /// Clamp into 0..=max, Returns New HP (None if Side Not Registered)
    pub fn update_king_health(&mut self, allegiance: Allegiance, new_hp: f32) -> Option<f32> {
        let entry = self.king_tower_shared.as_mut()?.side_mut(allegiance)?;

        let hp = new_hp.clamp(0.0, entry.max_hp);
        entry.hp = Some(hp);

        if hp <= 0.0 {
            info!("King tower '{}' destroyed", allegiance.label());
        }
        Some(hp)
    }

    pub fn apply_king_damage(&mut self, allegiance: Allegiance, amount: f32) -> Option<f32> {
        let entry = self.king_tower_shared.as_ref()?.side(allegiance)?;
        let current = entry.hp.unwrap_or(entry.max_hp);
        self.update_king_health(allegiance, current - amount)
    }

    /// Start Recurring Attack Scan (No-op if One is Already Running)
    pub fn start_attack_scan(&mut self) {
        if self.attack_scan_timer.is_none() {
            self.attack_scan_timer = Some(AttackScanTimer::default());
        }
    }
}

pub fn tick_attack_scan(
    time: Res<Time>,
    deployment: Option<ResMut<PieceDeployment>>,
    mut scans: MessageWriter<AttackScan>,
) {
    let Some(mut deployment) = deployment else { return; };
    let Some(timer) = deployment.attack_scan_timer.as_mut() else { return; };

    for _ in 0..timer.tick(time.delta()) {
        scans.write(AttackScan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> PieceDeployment {
        let mut pd = PieceDeployment::default();
        pd.register_king_tower(Allegiance::A, KING_TOWER_MAX_HP);
        pd.register_king_tower(Allegiance::B, KING_TOWER_MAX_HP);
        pd
    }

    #[test]
    fn test_register_keeps_first_entry() {
        let mut pd = board();
        pd.update_king_health(Allegiance::A, 900.0);
        pd.register_king_tower(Allegiance::A, 50.0);

        let a = pd.king_tower_shared.as_ref().and_then(|s| s.a);
        assert_eq!(a, Some(KingTowerEntry { hp: Some(900.0), max_hp: KING_TOWER_MAX_HP }));
    }

    #[test]
    fn test_health_is_clamped() {
        let mut pd = board();
        assert_eq!(pd.update_king_health(Allegiance::B, -40.0), Some(0.0));
        assert_eq!(pd.update_king_health(Allegiance::A, 99_999.0), Some(KING_TOWER_MAX_HP));
    }

    #[test]
    fn test_damage_without_shared_state_is_noop() {
        let mut pd = PieceDeployment::default();
        assert_eq!(pd.apply_king_damage(Allegiance::A, 10.0), None);
        assert!(pd.king_tower_shared.is_none());
    }

    #[test]
    fn test_damage_accumulates() {
        let mut pd = board();
        pd.apply_king_damage(Allegiance::A, 1000.0);
        assert_eq!(pd.apply_king_damage(Allegiance::A, 1000.0), Some(0.0));
        assert!(pd.king_tower_shared.as_ref().is_some_and(KingTowerShared::has_king_down));
    }

    #[test]
    fn test_king_down_rules() {
        let entry = |hp| Some(KingTowerEntry { hp, max_hp: KING_TOWER_MAX_HP });

        let cases = [
            (entry(Some(30.0)), entry(Some(45.0)), false),
            (entry(Some(0.0)), entry(Some(45.0)), true),
            (entry(Some(45.0)), entry(Some(-1.0)), true),
            (entry(Some(-5.0)), entry(Some(-1.0)), true),
            (entry(None), entry(Some(5.0)), false),
            (entry(Some(f32::NAN)), None, false),
            (None, None, false),
        ];

        for (a, b, expected) in cases {
            let shared = KingTowerShared { a, b };
            assert_eq!(shared.has_king_down(), expected, "a={a:?} b={b:?}");
        }
    }

    #[test]
    fn test_start_attack_scan_keeps_running_timer() {
        let mut pd = board();
        pd.start_attack_scan();
        if let Some(timer) = pd.attack_scan_timer.as_mut() {
            timer.tick(Duration::from_millis(600));
        }
        pd.start_attack_scan();

        assert_eq!(pd.attack_scan_timer.as_ref().map(AttackScanTimer::scans), Some(2));
    }
}
