use crate::constants::{DECISION_INTERVAL_TICKS, PATROL_WAYPOINTS};
use crate::maze::Maze;
use crate::mover::Mover;
use crate::rng::Rng;
use crate::types::{Direction, GhostColor, GhostMood, GhostView, Personality, Vec2};

/// Distance under which an ambusher gives up leading and chases directly.
const AMBUSH_CHASE_DIST: i32 = 8;
/// Tiles the ambusher leads ahead of the player, per axis.
const AMBUSH_LEAD: i32 = 3;
/// Distance under which a patroller abandons its waypoint and chases.
const PATROL_CHASE_DIST: i32 = 10;
/// Probability that a random-personality ghost chases instead of wandering.
const RANDOM_CHASE_PROBABILITY: f32 = 0.4;

/// A pursuit ghost. Movement commits tile-to-tile through the shared Mover;
/// every `DECISION_INTERVAL_TICKS` ticks spent idle, the ghost re-evaluates
/// its legal neighbor tiles against its personality's target heuristic and
/// commits to one. Reversals are allowed; the ghost has no memory of where it
/// came from.
#[derive(Clone, Debug)]
pub struct Ghost {
    id: usize,
    spawn: Vec2,
    mover: Mover,
    direction: Direction,
    personality: Personality,
    color: GhostColor,
    mood: GhostMood,
    fright_timer: u32,
    decision_timer: u32,
    speed: f32,
}

impl Ghost {
    pub fn new(id: usize, spawn: Vec2, personality: Personality, color: GhostColor, speed: f32) -> Self {
        Self {
            id,
            spawn,
            mover: Mover::at(spawn),
            direction: Direction::Up,
            personality,
            color,
            mood: GhostMood::Normal,
            fright_timer: 0,
            decision_timer: 0,
            speed,
        }
    }

    pub fn tick(&mut self, maze: &Maze, player_tile: Vec2, rng: &mut Rng) {
        if self.mood == GhostMood::Frightened {
            self.fright_timer = self.fright_timer.saturating_sub(1);
            if self.fright_timer == 0 {
                self.mood = GhostMood::Normal;
            }
        }

        self.decision_timer += 1;
        if self.mover.is_idle() && self.decision_timer >= DECISION_INTERVAL_TICKS {
            self.decide(maze, player_tile, rng);
            self.decision_timer = 0;
        }

        if !self.mover.is_idle() {
            self.mover.advance(self.speed);
        }
    }

    /// One decision cycle. With no legal neighbors the ghost simply stays
    /// idle until the next cycle.
    fn decide(&mut self, maze: &Maze, player_tile: Vec2, rng: &mut Rng) {
        let moves = self.legal_moves(maze);
        if moves.is_empty() {
            return;
        }

        let chosen = if self.mood == GhostMood::Frightened {
            choose_flee(&moves, player_tile)
        } else {
            match self.personality {
                Personality::Aggressive => choose_toward(&moves, player_tile),
                Personality::Ambush => self.choose_ambush(&moves, player_tile),
                Personality::Patrol => self.choose_patrol(&moves, player_tile),
                Personality::Random => Some(self.choose_random(&moves, player_tile, rng)),
            }
        };

        if let Some((target, direction)) = chosen {
            self.mover.begin(target);
            self.direction = direction;
        }
    }

    /// Orthogonal neighbors of the current tile, fixed enumeration order.
    /// The order matters: all choosers use strict comparisons, so the first
    /// enumerated candidate wins ties.
    fn legal_moves(&self, maze: &Maze) -> Vec<(Vec2, Direction)> {
        let here = self.mover.tile();
        [
            (0, -1, Direction::Up),
            (0, 1, Direction::Down),
            (-1, 0, Direction::Left),
            (1, 0, Direction::Right),
        ]
        .into_iter()
        .filter_map(|(dx, dy, direction)| {
            let tile = Vec2 {
                x: here.x + dx,
                y: here.y + dy,
            };
            maze.traversable(tile.x, tile.y).then_some((tile, direction))
        })
        .collect()
    }

    fn choose_ambush(
        &self,
        moves: &[(Vec2, Direction)],
        player_tile: Vec2,
    ) -> Option<(Vec2, Direction)> {
        let here = self.mover.tile();
        if manhattan(here, player_tile) < AMBUSH_CHASE_DIST {
            return choose_toward(moves, player_tile);
        }
        // Lead the player: extrapolate away from the ghost on each axis
        // independently.
        let lead = Vec2 {
            x: if player_tile.x > here.x {
                player_tile.x + AMBUSH_LEAD
            } else {
                player_tile.x - AMBUSH_LEAD
            },
            y: if player_tile.y > here.y {
                player_tile.y + AMBUSH_LEAD
            } else {
                player_tile.y - AMBUSH_LEAD
            },
        };
        choose_toward(moves, lead)
    }

    fn choose_patrol(
        &self,
        moves: &[(Vec2, Direction)],
        player_tile: Vec2,
    ) -> Option<(Vec2, Direction)> {
        let here = self.mover.tile();
        if manhattan(here, player_tile) < PATROL_CHASE_DIST {
            return choose_toward(moves, player_tile);
        }
        let waypoint = PATROL_WAYPOINTS
            .iter()
            .map(|&(x, y)| Vec2 { x, y })
            .min_by_key(|wp| manhattan(*wp, here))
            .expect("waypoint table is non-empty");
        choose_toward(moves, waypoint)
    }

    fn choose_random(
        &self,
        moves: &[(Vec2, Direction)],
        player_tile: Vec2,
        rng: &mut Rng,
    ) -> (Vec2, Direction) {
        if rng.bool(RANDOM_CHASE_PROBABILITY) {
            if let Some(chase) = choose_toward(moves, player_tile) {
                return chase;
            }
        }
        moves[rng.pick_index(moves.len())]
    }

    pub fn set_frightened(&mut self, duration_ticks: u32) {
        self.mood = GhostMood::Frightened;
        self.fright_timer = duration_ticks;
    }

    /// Capture while frightened: instant respawn at the given tile, back to
    /// normal. The Mover is cleared so no stale transition survives the jump.
    pub fn capture_to(&mut self, tile: Vec2) {
        self.mover.teleport(tile);
        self.mood = GhostMood::Normal;
        self.fright_timer = 0;
    }

    /// Scatter-ability teleport. Mood is untouched.
    pub fn relocate(&mut self, tile: Vec2) {
        self.mover.teleport(tile);
    }

    /// Round reset (life lost): back to the recorded spawn, normal mood.
    pub fn reset_to_spawn(&mut self) {
        self.mover.teleport(self.spawn);
        self.mood = GhostMood::Normal;
        self.fright_timer = 0;
        self.decision_timer = 0;
        self.direction = Direction::Up;
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn tile(&self) -> Vec2 {
        self.mover.tile()
    }

    pub fn pixel(&self) -> (f32, f32) {
        self.mover.pixel()
    }

    pub fn is_idle(&self) -> bool {
        self.mover.is_idle()
    }

    pub fn mood(&self) -> GhostMood {
        self.mood
    }

    pub fn view(&self) -> GhostView {
        let (x, y) = self.mover.pixel();
        GhostView {
            id: self.id,
            x,
            y,
            tile: self.mover.tile(),
            dir: self.direction,
            personality: self.personality,
            mood: self.mood,
            color: self.color,
        }
    }
}

fn manhattan(a: Vec2, b: Vec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Legal move minimizing Manhattan distance to `target`; strict `<` keeps the
/// first enumerated candidate on ties.
fn choose_toward(moves: &[(Vec2, Direction)], target: Vec2) -> Option<(Vec2, Direction)> {
    let mut best: Option<(Vec2, Direction)> = None;
    let mut best_distance = i32::MAX;
    for &(tile, direction) in moves {
        let distance = manhattan(tile, target);
        if distance < best_distance {
            best_distance = distance;
            best = Some((tile, direction));
        }
    }
    best
}

/// Flee move maximizing Manhattan distance to the player. The running best
/// starts at zero, so a sole candidate sitting on the player's own tile is
/// not taken.
fn choose_flee(moves: &[(Vec2, Direction)], player_tile: Vec2) -> Option<(Vec2, Direction)> {
    let mut best: Option<(Vec2, Direction)> = None;
    let mut best_distance = 0;
    for &(tile, direction) in moves {
        let distance = manhattan(tile, player_tile);
        if distance > best_distance {
            best_distance = distance;
            best = Some((tile, direction));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DECISION_INTERVAL_TICKS, FRIGHTENED_DURATION_TICKS};
    use crate::maze::Maze;

    fn open_maze(width: usize, height: usize) -> Maze {
        let mut rows = Vec::with_capacity(height);
        for y in 0..height {
            let row: String = (0..width)
                .map(|x| {
                    if y == 0 || y == height - 1 || x == 0 || x == width - 1 {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect();
            rows.push(row);
        }
        Maze::parse(&rows)
    }

    fn ghost_at(x: i32, y: i32, personality: Personality) -> Ghost {
        Ghost::new(0, Vec2 { x, y }, personality, GhostColor::Red, 1.0)
    }

    fn run_decision_cycle(ghost: &mut Ghost, maze: &Maze, player_tile: Vec2, rng: &mut Rng) {
        // One decision plus enough ticks to finish the committed transition.
        for _ in 0..(DECISION_INTERVAL_TICKS + 25) {
            ghost.tick(maze, player_tile, rng);
        }
    }

    #[test]
    fn aggressive_move_minimizes_distance_to_player() {
        let moves = vec![
            (Vec2 { x: 3, y: 2 }, Direction::Up),
            (Vec2 { x: 3, y: 4 }, Direction::Down),
            (Vec2 { x: 2, y: 3 }, Direction::Left),
            (Vec2 { x: 4, y: 3 }, Direction::Right),
        ];
        let player = Vec2 { x: 7, y: 3 };
        let (tile, _) = choose_toward(&moves, player).unwrap();
        let chosen = manhattan(tile, player);
        for &(other, _) in &moves {
            assert!(chosen <= manhattan(other, player));
        }
        assert_eq!(tile, Vec2 { x: 4, y: 3 });
    }

    #[test]
    fn tie_breaks_to_first_enumerated_candidate() {
        // Up and Down are equidistant from the player; Up is enumerated first.
        let moves = vec![
            (Vec2 { x: 3, y: 2 }, Direction::Up),
            (Vec2 { x: 3, y: 4 }, Direction::Down),
        ];
        let player = Vec2 { x: 6, y: 3 };
        let (_, direction) = choose_toward(&moves, player).unwrap();
        assert_eq!(direction, Direction::Up);
    }

    #[test]
    fn flee_maximizes_distance() {
        let moves = vec![
            (Vec2 { x: 3, y: 2 }, Direction::Up),
            (Vec2 { x: 3, y: 4 }, Direction::Down),
        ];
        let player = Vec2 { x: 3, y: 0 };
        let (tile, _) = choose_flee(&moves, player).unwrap();
        assert_eq!(tile, Vec2 { x: 3, y: 4 });
    }

    #[test]
    fn flee_refuses_the_player_tile_when_it_is_the_only_option() {
        let moves = vec![(Vec2 { x: 3, y: 2 }, Direction::Up)];
        assert!(choose_flee(&moves, Vec2 { x: 3, y: 2 }).is_none());
    }

    #[test]
    fn aggressive_ghost_closes_in_within_one_cycle() {
        let maze = open_maze(7, 7);
        let mut ghost = ghost_at(1, 1, Personality::Aggressive);
        let player = Vec2 { x: 3, y: 1 };
        let mut rng = Rng::new(42);
        let before = manhattan(ghost.tile(), player);
        run_decision_cycle(&mut ghost, &maze, player, &mut rng);
        assert!(manhattan(ghost.tile(), player) < before);
    }

    #[test]
    fn walled_in_ghost_stays_idle() {
        let maze = Maze::parse(&["###", "#G#", "###"]);
        let spawn = maze.ghost_spawns()[0];
        let mut ghost = Ghost::new(0, spawn, Personality::Aggressive, GhostColor::Red, 1.0);
        let mut rng = Rng::new(1);
        run_decision_cycle(&mut ghost, &maze, Vec2 { x: 0, y: 0 }, &mut rng);
        assert!(ghost.is_idle());
        assert_eq!(ghost.tile(), spawn);
    }

    #[test]
    fn frightened_ghost_retreats_and_reverts() {
        let maze = open_maze(9, 9);
        let mut ghost = ghost_at(4, 4, Personality::Aggressive);
        let player = Vec2 { x: 4, y: 2 };
        let mut rng = Rng::new(5);
        ghost.set_frightened(FRIGHTENED_DURATION_TICKS);
        let before = manhattan(ghost.tile(), player);
        run_decision_cycle(&mut ghost, &maze, player, &mut rng);
        assert!(manhattan(ghost.tile(), player) > before);
        assert_eq!(ghost.mood(), GhostMood::Frightened);

        for _ in 0..FRIGHTENED_DURATION_TICKS {
            ghost.tick(&maze, player, &mut rng);
        }
        assert_eq!(ghost.mood(), GhostMood::Normal);
    }

    #[test]
    fn ambusher_leads_a_distant_player() {
        let maze = open_maze(16, 6);
        // Player 9 tiles to the right: beyond the chase threshold, so the
        // target is led to (14, -1). Up and Right tie at distance 14 and the
        // enumeration order settles it on Up.
        let mut ghost = ghost_at(2, 2, Personality::Ambush);
        let player = Vec2 { x: 11, y: 2 };
        let mut rng = Rng::new(9);
        run_decision_cycle(&mut ghost, &maze, player, &mut rng);
        assert_eq!(ghost.tile(), Vec2 { x: 2, y: 1 });
    }

    #[test]
    fn patroller_heads_for_its_nearest_waypoint() {
        let maze = open_maze(14, 14);
        // Player far away (distance >= 10); nearest waypoint is (10, 10).
        let mut ghost = ghost_at(1, 12, Personality::Patrol);
        let player = Vec2 { x: 12, y: 1 };
        let mut rng = Rng::new(3);
        let before = manhattan(ghost.tile(), Vec2 { x: 10, y: 10 });
        run_decision_cycle(&mut ghost, &maze, player, &mut rng);
        assert!(manhattan(ghost.tile(), Vec2 { x: 10, y: 10 }) < before);
    }

    #[test]
    fn random_ghost_always_picks_a_legal_tile() {
        let maze = open_maze(7, 7);
        let player = Vec2 { x: 5, y: 5 };
        for seed in 0..30 {
            let mut ghost = ghost_at(3, 3, Personality::Random);
            let mut rng = Rng::new(seed);
            run_decision_cycle(&mut ghost, &maze, player, &mut rng);
            let tile = ghost.tile();
            assert!(maze.traversable(tile.x, tile.y));
            // Exactly one transition completes within the cycle.
            assert_eq!(manhattan(tile, Vec2 { x: 3, y: 3 }), 1);
        }
    }

    #[test]
    fn capture_clears_mood_and_transition() {
        let maze = open_maze(7, 7);
        let mut ghost = ghost_at(3, 3, Personality::Aggressive);
        let mut rng = Rng::new(8);
        ghost.set_frightened(FRIGHTENED_DURATION_TICKS);
        // Get the ghost mid-transition before capturing.
        for _ in 0..(DECISION_INTERVAL_TICKS + 3) {
            ghost.tick(&maze, Vec2 { x: 1, y: 1 }, &mut rng);
        }
        ghost.capture_to(Vec2 { x: 5, y: 5 });
        assert!(ghost.is_idle());
        assert_eq!(ghost.tile(), Vec2 { x: 5, y: 5 });
        assert_eq!(ghost.mood(), GhostMood::Normal);
    }
}
