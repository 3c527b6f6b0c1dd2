use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Wall,
    Empty,
    Dot,
    PowerItem,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Dot,
    PowerItem,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Aggressive,
    Ambush,
    Patrol,
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostMood {
    Normal,
    Frightened,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostColor {
    Red,
    Pink,
    Cyan,
    Orange,
}

/// Which half of the play field the scatter ability searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterMode {
    /// Full 360-degree annulus around the player.
    Radial,
    /// One cardinal half-plane, picked at random on activation.
    Cardinal,
}

impl ScatterMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "radial" => Some(Self::Radial),
            "cardinal" => Some(Self::Cardinal),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub tile: Vec2,
    pub dir: Direction,
    #[serde(rename = "powerMode")]
    pub power_mode: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub tile: Vec2,
    pub dir: Direction,
    pub personality: Personality,
    pub mood: GhostMood,
    pub color: GhostColor,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    DotEaten {
        x: i32,
        y: i32,
    },
    PowerItemEaten {
        x: i32,
        y: i32,
    },
    GhostsFrightened {
        #[serde(rename = "durationTicks")]
        duration_ticks: u32,
    },
    GhostCaptured {
        #[serde(rename = "ghostId")]
        ghost_id: usize,
    },
    PlayerHit,
    LevelCleared,
    GhostsScattered {
        relocated: usize,
    },
    BonusItemSpawned {
        x: i32,
        y: i32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "remainingDots")]
    pub remaining_dots: usize,
    #[serde(rename = "scatterCooldown")]
    pub scatter_cooldown: u32,
    #[serde(rename = "bonusCooldown")]
    pub bonus_cooldown: u32,
    #[serde(rename = "powerTicks")]
    pub power_ticks: u32,
    pub paused: bool,
    pub cleared: bool,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub events: Vec<RuntimeEvent>,
}

#[cfg(test)]
mod tests {
    use super::{RuntimeEvent, ScatterMode};

    #[test]
    fn parses_scatter_modes() {
        assert_eq!(ScatterMode::parse("radial"), Some(ScatterMode::Radial));
        assert_eq!(ScatterMode::parse("cardinal"), Some(ScatterMode::Cardinal));
        assert_eq!(ScatterMode::parse("diagonal"), None);
    }

    #[test]
    fn events_serialize_with_snake_case_tags() {
        let json = serde_json::to_string(&RuntimeEvent::GhostsFrightened { duration_ticks: 300 })
            .unwrap();
        assert_eq!(json, r#"{"type":"ghosts_frightened","durationTicks":300}"#);
        let json = serde_json::to_string(&RuntimeEvent::PlayerHit).unwrap();
        assert_eq!(json, r#"{"type":"player_hit"}"#);
    }
}
