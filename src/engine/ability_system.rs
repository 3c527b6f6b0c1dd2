use super::GameEngine;
use crate::constants::{
    BONUS_COOLDOWN_TICKS, SCATTER_CARDINAL_MAX_DIST, SCATTER_CARDINAL_MIN_DIST,
    SCATTER_COOLDOWN_TICKS, SCATTER_RADIAL_MAX_DIST, SCATTER_RADIAL_MIN_DIST,
};
use crate::maze::Maze;
use crate::types::{ItemKind, RuntimeEvent, ScatterMode, Vec2};

/// The scatter search wants at least this many candidates before it stops
/// widening; the exhaustive scans stop once they have a handful more.
const SCATTER_MIN_CANDIDATES: usize = 4;
const RADIAL_SCAN_CAP: usize = 10;
const CARDINAL_SCAN_CAP: usize = 8;
const LAST_RESORT_CAP: usize = 8;
const RADIAL_RANDOM_PROBES: u32 = 100;
const CARDINAL_RANDOM_PROBES: u32 = 50;
const CARDINAL_PROBE_SPREAD: i32 = 3;

impl GameEngine {
    /// Scatter ability: teleports every ghost to a random safe tile away from
    /// the player. Silent no-op while on cooldown, paused, or cleared, and
    /// the cooldown is only consumed when at least one candidate tile exists.
    pub fn activate_scatter(&mut self, mode: ScatterMode) {
        if self.scatter_cooldown > 0 || self.paused || self.cleared {
            return;
        }
        let origin = self.player.tile();
        let mut positions = match mode {
            ScatterMode::Radial => self.radial_scatter_candidates(origin),
            ScatterMode::Cardinal => self.cardinal_scatter_candidates(origin),
        };
        if positions.is_empty() {
            positions = last_resort_candidates(&self.maze);
        }
        if positions.is_empty() {
            return;
        }

        let count = self.ghosts.len().min(positions.len());
        let picks = self.rng.sample_indices(positions.len(), count);
        for (ghost, &pick) in self.ghosts.iter_mut().zip(&picks) {
            ghost.relocate(positions[pick]);
        }
        self.scatter_cooldown = SCATTER_COOLDOWN_TICKS;
        self.events
            .push(RuntimeEvent::GhostsScattered { relocated: count });
    }

    /// Bonus ability: materializes a power item on a random non-wall tile in
    /// the 5x5 block around the player. The candidate filter only excludes
    /// walls, so an existing dot on the chosen tile gets replaced.
    pub fn activate_bonus(&mut self) {
        if self.bonus_cooldown > 0 || self.paused || self.cleared {
            return;
        }
        if self.options.bonus_blocked_during_power && self.power_timer > 0 {
            return;
        }
        let origin = self.player.tile();
        let mut candidates = Vec::new();
        for dy in -2..=2 {
            for dx in -2..=2 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let tile = Vec2 {
                    x: origin.x + dx,
                    y: origin.y + dy,
                };
                if self.maze.traversable(tile.x, tile.y) {
                    candidates.push(tile);
                }
            }
        }
        if candidates.is_empty() {
            return;
        }
        let pick = candidates[self.rng.pick_index(candidates.len())];
        self.maze.overwrite_item(pick.x, pick.y, ItemKind::PowerItem);
        self.bonus_cooldown = BONUS_COOLDOWN_TICKS;
        self.events.push(RuntimeEvent::BonusItemSpawned {
            x: pick.x,
            y: pick.y,
        });
    }

    /// Candidate ladder for the radial variant: a 30-degree sweep over the
    /// annulus around the player, then random probes into the same annulus,
    /// then (if still thin) an exhaustive interior scan at relaxed criteria.
    fn radial_scatter_candidates(&mut self, origin: Vec2) -> Vec<Vec2> {
        let mut positions = Vec::new();
        for distance in SCATTER_RADIAL_MIN_DIST..=SCATTER_RADIAL_MAX_DIST {
            for angle in (0..360).step_by(30) {
                let radians = (angle as f32).to_radians();
                let x = (origin.x as f32 + distance as f32 * radians.cos()) as i32;
                let y = (origin.y as f32 + distance as f32 * radians.sin()) as i32;
                if is_teleport_safe(&self.maze, x, y) {
                    positions.push(Vec2 { x, y });
                }
            }
        }

        for _ in 0..RADIAL_RANDOM_PROBES {
            let dx = self.rng.int(-SCATTER_RADIAL_MAX_DIST, SCATTER_RADIAL_MAX_DIST);
            let dy = self.rng.int(-SCATTER_RADIAL_MAX_DIST, SCATTER_RADIAL_MAX_DIST);
            let distance = ((dx * dx + dy * dy) as f32).sqrt();
            if distance < SCATTER_RADIAL_MIN_DIST as f32
                || distance > SCATTER_RADIAL_MAX_DIST as f32
            {
                continue;
            }
            let tile = Vec2 {
                x: origin.x + dx,
                y: origin.y + dy,
            };
            if is_teleport_safe(&self.maze, tile.x, tile.y) && !positions.contains(&tile) {
                positions.push(tile);
            }
        }

        if positions.len() < SCATTER_MIN_CANDIDATES {
            'scan: for y in 1..self.maze.height_tiles() - 1 {
                for x in 1..self.maze.row_len(y) - 1 {
                    if !self.maze.traversable(x, y) {
                        continue;
                    }
                    let manhattan = (x - origin.x).abs() + (y - origin.y).abs();
                    if manhattan < SCATTER_RADIAL_MIN_DIST {
                        continue;
                    }
                    let tile = Vec2 { x, y };
                    if !positions.contains(&tile) {
                        positions.push(tile);
                        if positions.len() >= RADIAL_SCAN_CAP {
                            break 'scan;
                        }
                    }
                }
            }
        }
        positions
    }

    /// Candidate ladder for the cardinal variant: pick one of the four
    /// headings at random, sweep a 5-tile-wide band along it, add random
    /// probes, then fall back to any interior tile strictly beyond the player
    /// in that heading.
    fn cardinal_scatter_candidates(&mut self, origin: Vec2) -> Vec<Vec2> {
        const HEADINGS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        let (dir_x, dir_y) = HEADINGS[self.rng.pick_index(HEADINGS.len())];

        let mut positions = Vec::new();
        for distance in SCATTER_CARDINAL_MIN_DIST..=SCATTER_CARDINAL_MAX_DIST {
            let base = Vec2 {
                x: origin.x + dir_x * distance,
                y: origin.y + dir_y * distance,
            };
            for spread in [0, 1, -1, 2, -2] {
                let tile = if dir_x != 0 {
                    Vec2 {
                        x: base.x,
                        y: base.y + spread,
                    }
                } else {
                    Vec2 {
                        x: base.x + spread,
                        y: base.y,
                    }
                };
                if is_teleport_safe(&self.maze, tile.x, tile.y) {
                    positions.push(tile);
                }
            }
        }

        for _ in 0..CARDINAL_RANDOM_PROBES {
            let spread = self.rng.int(-CARDINAL_PROBE_SPREAD, CARDINAL_PROBE_SPREAD);
            let distance = self
                .rng
                .int(SCATTER_CARDINAL_MIN_DIST, SCATTER_CARDINAL_MAX_DIST);
            let tile = if dir_x != 0 {
                Vec2 {
                    x: origin.x + dir_x * distance,
                    y: origin.y + spread,
                }
            } else {
                Vec2 {
                    x: origin.x + spread,
                    y: origin.y + dir_y * distance,
                }
            };
            if is_teleport_safe(&self.maze, tile.x, tile.y) && !positions.contains(&tile) {
                positions.push(tile);
            }
        }

        if positions.len() < SCATTER_MIN_CANDIDATES {
            'scan: for y in 1..self.maze.height_tiles() - 1 {
                for x in 1..self.maze.row_len(y) - 1 {
                    if !self.maze.traversable(x, y) {
                        continue;
                    }
                    let beyond = if dir_x > 0 {
                        x > origin.x + 2
                    } else if dir_x < 0 {
                        x < origin.x - 2
                    } else if dir_y > 0 {
                        y > origin.y + 2
                    } else {
                        y < origin.y - 2
                    };
                    if !beyond {
                        continue;
                    }
                    let tile = Vec2 { x, y };
                    if !positions.contains(&tile) {
                        positions.push(tile);
                        if positions.len() >= CARDINAL_SCAN_CAP {
                            break 'scan;
                        }
                    }
                }
            }
        }
        positions
    }
}

/// A tile is teleport-safe when it sits strictly inside the maze border, is
/// not a wall, and at most 6 of the 9 tiles in its 3x3 neighborhood are walls
/// (out-of-range counts as wall). The enclosure rule keeps ghosts out of
/// dead-end pockets they could never leave.
fn is_teleport_safe(maze: &Maze, x: i32, y: i32) -> bool {
    if y <= 0 || y >= maze.height_tiles() - 1 {
        return false;
    }
    if x <= 0 || x >= maze.row_len(y) - 1 {
        return false;
    }
    if !maze.traversable(x, y) {
        return false;
    }
    let mut walls = 0;
    for dx in -1..=1 {
        for dy in -1..=1 {
            if !maze.traversable(x + dx, y + dy) {
                walls += 1;
            }
        }
    }
    walls <= 6
}

/// Stride-3 sweep over the deep interior, used only when every distance-aware
/// search came up empty.
fn last_resort_candidates(maze: &Maze) -> Vec<Vec2> {
    let mut positions = Vec::new();
    let mut y = 2;
    while y < maze.height_tiles() - 2 {
        let mut x = 2;
        while x < maze.row_len(y) - 2 {
            if maze.traversable(x, y) {
                positions.push(Vec2 { x, y });
                if positions.len() >= LAST_RESORT_CAP {
                    return positions;
                }
            }
            x += 3;
        }
        y += 3;
    }
    positions
}
