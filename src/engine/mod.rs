mod ability_system;
mod utils;

use crate::constants::{
    DEFAULT_GHOST_SPEED, DEFAULT_PLAYER_SPEED, FRIGHTENED_DURATION_TICKS,
    POWER_MODE_DURATION_TICKS,
};
use crate::ghost::Ghost;
use crate::levels::LevelSpec;
use crate::maze::Maze;
use crate::player::Player;
use crate::rng::Rng;
use crate::types::{
    Direction, GhostColor, GhostMood, ItemKind, Personality, RuntimeEvent, Snapshot,
};
use utils::rects_intersect;

const PERSONALITY_ROTATION: [Personality; 4] = [
    Personality::Aggressive,
    Personality::Ambush,
    Personality::Patrol,
    Personality::Random,
];
const COLOR_ROTATION: [GhostColor; 4] = [
    GhostColor::Red,
    GhostColor::Pink,
    GhostColor::Cyan,
    GhostColor::Orange,
];

#[derive(Clone, Copy, Debug)]
pub struct EngineOptions {
    pub seed: u32,
    /// When set, the bonus ability refuses to fire while power mode is active.
    pub bonus_blocked_during_power: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            seed: 1,
            bonus_blocked_during_power: false,
        }
    }
}

/// Headless game core. Call `step` once per tick and `build_snapshot` to read
/// state out; events accumulate between snapshots and are drained with them.
/// All randomness flows through the seeded Rng, so two engines constructed
/// with the same options and fed the same inputs stay bit-identical.
pub struct GameEngine {
    maze: Maze,
    pristine_maze: Maze,
    player: Player,
    ghosts: Vec<Ghost>,
    rng: Rng,
    tick_counter: u64,
    scatter_cooldown: u32,
    bonus_cooldown: u32,
    power_timer: u32,
    paused: bool,
    cleared: bool,
    events: Vec<RuntimeEvent>,
    options: EngineOptions,
}

impl GameEngine {
    pub fn new(maze: Maze, options: EngineOptions) -> Self {
        Self::with_speeds(maze, DEFAULT_PLAYER_SPEED, DEFAULT_GHOST_SPEED, options)
    }

    pub fn from_level(level: &LevelSpec, options: EngineOptions) -> Self {
        Self::with_speeds(level.maze(), level.player_speed, level.ghost_speed, options)
    }

    pub fn with_speeds(
        maze: Maze,
        player_speed: f32,
        ghost_speed: f32,
        options: EngineOptions,
    ) -> Self {
        let player = Player::new(maze.player_spawn(), player_speed);
        let ghosts = maze
            .ghost_spawns()
            .iter()
            .enumerate()
            .map(|(i, &spawn)| {
                Ghost::new(
                    i,
                    spawn,
                    PERSONALITY_ROTATION[i % PERSONALITY_ROTATION.len()],
                    COLOR_ROTATION[i % COLOR_ROTATION.len()],
                    ghost_speed,
                )
            })
            .collect();
        Self {
            pristine_maze: maze.clone(),
            maze,
            player,
            ghosts,
            rng: Rng::new(options.seed),
            tick_counter: 0,
            scatter_cooldown: 0,
            bonus_cooldown: 0,
            power_timer: 0,
            paused: false,
            cleared: false,
            events: Vec::new(),
            options,
        }
    }

    /// Advances the simulation one tick. A paused or cleared engine is inert.
    pub fn step(&mut self) {
        if self.paused || self.cleared {
            return;
        }
        self.tick_counter += 1;

        if self.scatter_cooldown > 0 {
            self.scatter_cooldown -= 1;
        }
        if self.bonus_cooldown > 0 {
            self.bonus_cooldown -= 1;
        }
        if self.power_timer > 0 {
            self.power_timer -= 1;
            if self.power_timer == 0 {
                self.player.set_power_mode(false);
            }
        }

        self.player.tick(&self.maze);
        let eaten_at = self.player.center_tile();
        match self.player.eat(&mut self.maze) {
            Some(ItemKind::Dot) => {
                self.events.push(RuntimeEvent::DotEaten {
                    x: eaten_at.x,
                    y: eaten_at.y,
                });
            }
            Some(ItemKind::PowerItem) => {
                self.events.push(RuntimeEvent::PowerItemEaten {
                    x: eaten_at.x,
                    y: eaten_at.y,
                });
                self.player.set_power_mode(true);
                self.power_timer = POWER_MODE_DURATION_TICKS;
                for ghost in &mut self.ghosts {
                    ghost.set_frightened(FRIGHTENED_DURATION_TICKS);
                }
                self.events.push(RuntimeEvent::GhostsFrightened {
                    duration_ticks: FRIGHTENED_DURATION_TICKS,
                });
            }
            None => {}
        }

        let player_tile = self.player.tile();
        let (px, py) = self.player.pos();
        let mut player_hit = false;
        for ghost in &mut self.ghosts {
            ghost.tick(&self.maze, player_tile, &mut self.rng);
            let (gx, gy) = ghost.pixel();
            if !rects_intersect(px, py, gx, gy) {
                continue;
            }
            if ghost.mood() == GhostMood::Frightened {
                let respawn = self.maze.ghost_spawns()[0];
                ghost.capture_to(respawn);
                self.events.push(RuntimeEvent::GhostCaptured {
                    ghost_id: ghost.id(),
                });
            } else {
                player_hit = true;
                break;
            }
        }
        if player_hit {
            self.events.push(RuntimeEvent::PlayerHit);
            self.reset_positions();
        }

        if self.maze.remaining_dots() == 0 {
            self.cleared = true;
            self.events.push(RuntimeEvent::LevelCleared);
        }
    }

    pub fn set_player_direction(&mut self, direction: Direction) {
        self.player.set_direction(direction);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn tick_counter(&self) -> u64 {
        self.tick_counter
    }

    pub fn remaining_dots(&self) -> usize {
        self.maze.remaining_dots()
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Everything back to spawn, power mode off. The maze (eaten dots) is
    /// untouched; this is the life-lost reset, not a level restart.
    pub fn reset_positions(&mut self) {
        self.player.reset(self.maze.player_spawn());
        for ghost in &mut self.ghosts {
            ghost.reset_to_spawn();
        }
        self.power_timer = 0;
    }

    /// Full restart of the current level: pristine maze, spawns, timers.
    /// The Rng keeps its state so a restart does not replay the same rolls.
    pub fn reset_level(&mut self) {
        self.maze = self.pristine_maze.clone();
        self.reset_positions();
        self.tick_counter = 0;
        self.scatter_cooldown = 0;
        self.bonus_cooldown = 0;
        self.cleared = false;
        self.paused = false;
        self.events.clear();
    }

    /// Serializable view of the whole engine. With `include_events` the
    /// accumulated event queue is drained into the snapshot; without it the
    /// queue keeps accumulating for a later reader.
    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let events = if include_events {
            std::mem::take(&mut self.events)
        } else {
            Vec::new()
        };
        Snapshot {
            tick: self.tick_counter,
            remaining_dots: self.maze.remaining_dots(),
            scatter_cooldown: self.scatter_cooldown,
            bonus_cooldown: self.bonus_cooldown,
            power_ticks: self.power_timer,
            paused: self.paused,
            cleared: self.cleared,
            player: self.player.view(),
            ghosts: self.ghosts.iter().map(|g| g.view()).collect(),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TILE_SIZE;
    use crate::types::{ScatterMode, Vec2};

    fn engine_from(rows: &[&str], seed: u32) -> GameEngine {
        GameEngine::new(
            Maze::parse(rows),
            EngineOptions {
                seed,
                ..EngineOptions::default()
            },
        )
    }

    #[test]
    fn same_seed_same_inputs_stay_identical() {
        let rows = [
            "##########",
            "#P......o#",
            "#.##.###.#",
            "#....G...#",
            "#.##.###.#",
            "#o......G#",
            "##########",
        ];
        let mut a = engine_from(&rows, 777);
        let mut b = engine_from(&rows, 777);
        let script = [
            (10, Direction::Right),
            (80, Direction::Down),
            (160, Direction::Left),
            (300, Direction::Up),
        ];
        for tick in 0..500u32 {
            for &(at, dir) in &script {
                if tick == at {
                    a.set_player_direction(dir);
                    b.set_player_direction(dir);
                }
            }
            if tick == 50 {
                a.activate_scatter(ScatterMode::Radial);
                b.activate_scatter(ScatterMode::Radial);
            }
            if tick == 120 {
                a.activate_bonus();
                b.activate_bonus();
            }
            a.step();
            b.step();
        }
        let sa = serde_json::to_string(&a.build_snapshot(true)).unwrap();
        let sb = serde_json::to_string(&b.build_snapshot(true)).unwrap();
        assert_eq!(sa, sb);
    }

    #[test]
    fn power_item_frightens_every_ghost() {
        let rows = ["#######", "#Po..G#", "#######"];
        let mut engine = engine_from(&rows, 3);
        engine.set_player_direction(Direction::Right);
        // Speed 2: the power item's tile center is sampled within a few ticks.
        let mut frightened_event = None;
        for _ in 0..15 {
            engine.step();
            let snapshot = engine.build_snapshot(true);
            for event in snapshot.events {
                if let RuntimeEvent::GhostsFrightened { duration_ticks } = event {
                    frightened_event = Some(duration_ticks);
                }
            }
            if frightened_event.is_some() {
                break;
            }
        }
        assert_eq!(frightened_event, Some(FRIGHTENED_DURATION_TICKS));
        let snapshot = engine.build_snapshot(false);
        assert!(snapshot.player.power_mode);
        assert!(snapshot.power_ticks > 0);
        for ghost in &snapshot.ghosts {
            assert_eq!(ghost.mood, GhostMood::Frightened);
        }
    }

    #[test]
    fn power_mode_expires_on_schedule() {
        // The ghost is walled into its own pocket and never interferes. The
        // dot below the spawn stays uneaten, so the level cannot clear and
        // freeze the timer mid-run.
        let rows = ["#####", "#Po.#", "#.###", "#####", "#G#"];
        let mut engine = engine_from(&rows, 4);
        engine.set_player_direction(Direction::Right);
        for _ in 0..6 {
            engine.step();
        }
        assert!(engine.build_snapshot(true).player.power_mode);
        for _ in 0..POWER_MODE_DURATION_TICKS {
            engine.step();
        }
        let snapshot = engine.build_snapshot(true);
        assert!(!engine.is_cleared());
        assert!(!snapshot.player.power_mode);
        assert_eq!(snapshot.power_ticks, 0);
    }

    #[test]
    fn level_clear_fires_exactly_once() {
        let rows = ["####", "#P.#", "####", "#G#"];
        let mut engine = engine_from(&rows, 9);
        engine.set_player_direction(Direction::Right);
        let mut cleared_events = 0;
        for _ in 0..100 {
            engine.step();
            for event in engine.build_snapshot(true).events {
                if matches!(event, RuntimeEvent::LevelCleared) {
                    cleared_events += 1;
                }
            }
        }
        assert_eq!(cleared_events, 1);
        assert!(engine.is_cleared());
        // A cleared engine is inert.
        let tick = engine.tick_counter();
        engine.step();
        assert_eq!(engine.tick_counter(), tick);
    }

    #[test]
    fn touching_a_normal_ghost_resets_positions() {
        let rows = ["######", "#PG..#", "######"];
        let mut engine = engine_from(&rows, 6);
        engine.set_player_direction(Direction::Right);
        let mut hit = false;
        for _ in 0..30 {
            engine.step();
            if engine
                .build_snapshot(true)
                .events
                .iter()
                .any(|e| matches!(e, RuntimeEvent::PlayerHit))
            {
                hit = true;
                break;
            }
        }
        assert!(hit);
        let snapshot = engine.build_snapshot(false);
        assert_eq!(snapshot.player.tile, Vec2 { x: 1, y: 1 });
        assert_eq!(snapshot.player.x, TILE_SIZE as f32);
        assert_eq!(snapshot.ghosts[0].tile, Vec2 { x: 2, y: 1 });
    }

    #[test]
    fn frightened_ghost_is_captured_not_lethal() {
        let rows = ["######", "#PoG.#", "######"];
        let mut engine = engine_from(&rows, 6);
        engine.set_player_direction(Direction::Right);
        let mut captured = None;
        let mut hit = false;
        for _ in 0..60 {
            engine.step();
            for event in engine.build_snapshot(true).events {
                match event {
                    RuntimeEvent::GhostCaptured { ghost_id } => captured = Some(ghost_id),
                    RuntimeEvent::PlayerHit => hit = true,
                    _ => {}
                }
            }
            if captured.is_some() {
                break;
            }
        }
        assert_eq!(captured, Some(0));
        assert!(!hit);
        let snapshot = engine.build_snapshot(false);
        // Respawned at the first ghost spawn, calm and at rest.
        assert_eq!(snapshot.ghosts[0].tile, Vec2 { x: 3, y: 1 });
        assert_eq!(snapshot.ghosts[0].mood, GhostMood::Normal);
    }

    #[test]
    fn paused_engine_does_not_advance() {
        let rows = ["#####", "#P..#", "#####", "#G#"];
        let mut engine = engine_from(&rows, 2);
        engine.pause();
        assert!(engine.is_paused());
        engine.set_player_direction(Direction::Right);
        for _ in 0..10 {
            engine.step();
        }
        let snapshot = engine.build_snapshot(true);
        assert!(snapshot.paused);
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.player.x, TILE_SIZE as f32);
        engine.resume();
        engine.step();
        assert_eq!(engine.tick_counter(), 1);
    }

    #[test]
    fn reset_level_restores_the_pristine_maze() {
        let rows = ["#####", "#P..#", "#####", "#G#"];
        let mut engine = engine_from(&rows, 2);
        let total = engine.remaining_dots();
        engine.set_player_direction(Direction::Right);
        for _ in 0..15 {
            engine.step();
        }
        assert!(engine.remaining_dots() < total);
        engine.reset_level();
        assert_eq!(engine.remaining_dots(), total);
        assert_eq!(engine.tick_counter(), 0);
        assert!(!engine.is_cleared());
        assert!(engine.build_snapshot(true).events.is_empty());
    }

    #[test]
    fn snapshot_without_events_keeps_the_queue() {
        let rows = ["#####", "#P..#", "#####", "#G#"];
        let mut engine = engine_from(&rows, 2);
        engine.set_player_direction(Direction::Right);
        for _ in 0..15 {
            engine.step();
        }
        assert!(engine.build_snapshot(false).events.is_empty());
        let drained = engine.build_snapshot(true);
        assert!(!drained.events.is_empty());
        assert!(engine.build_snapshot(true).events.is_empty());
    }

    #[test]
    fn ghost_roster_rotates_personalities_and_colors() {
        let rows = [
            "#########",
            "#P......#",
            "#.G.G.G.#",
            "#...G...#",
            "#########",
        ];
        let engine_snapshot = engine_from(&rows, 1).build_snapshot(false);
        let personalities: Vec<_> = engine_snapshot
            .ghosts
            .iter()
            .map(|g| g.personality)
            .collect();
        assert_eq!(
            personalities,
            vec![
                Personality::Aggressive,
                Personality::Ambush,
                Personality::Patrol,
                Personality::Random,
            ]
        );
        assert_eq!(engine_snapshot.ghosts[0].color, GhostColor::Red);
        assert_eq!(engine_snapshot.ghosts[3].color, GhostColor::Orange);
    }
}
