use std::fs;
use std::path::Path;

use crate::constants::{DEFAULT_MAZE, TILE_SIZE};
use crate::types::{ItemKind, TileKind, Vec2};

/// Tile grid for one level. Rows may have differing lengths; every query
/// bounds-checks against its own row, and anything out of range reads as Wall.
#[derive(Clone, Debug)]
pub struct Maze {
    rows: Vec<Vec<TileKind>>,
    player_spawn: Vec2,
    ghost_spawns: Vec<Vec2>,
    total_collectibles: usize,
}

impl Maze {
    pub fn parse<S: AsRef<str>>(source: &[S]) -> Self {
        let mut rows: Vec<Vec<TileKind>> = Vec::with_capacity(source.len());
        let mut player_spawn = None;
        let mut ghost_spawns = Vec::new();
        let mut total_collectibles = 0;

        for (y, line) in source.iter().enumerate() {
            let mut row = Vec::with_capacity(line.as_ref().len());
            for (x, symbol) in line.as_ref().chars().enumerate() {
                let tile = match symbol {
                    '#' => TileKind::Wall,
                    '.' => TileKind::Dot,
                    'o' => TileKind::PowerItem,
                    'P' => {
                        if player_spawn.is_none() {
                            player_spawn = Some(Vec2 {
                                x: x as i32,
                                y: y as i32,
                            });
                        }
                        TileKind::Empty
                    }
                    'G' => {
                        ghost_spawns.push(Vec2 {
                            x: x as i32,
                            y: y as i32,
                        });
                        TileKind::Empty
                    }
                    _ => TileKind::Empty,
                };
                if matches!(tile, TileKind::Dot | TileKind::PowerItem) {
                    total_collectibles += 1;
                }
                row.push(tile);
            }
            rows.push(row);
        }

        let player_spawn =
            player_spawn.unwrap_or_else(|| fallback_player_spawn(&rows));
        if ghost_spawns.is_empty() {
            ghost_spawns = synthetic_ghost_spawns(&rows);
        }

        Self {
            rows,
            player_spawn,
            ghost_spawns,
            total_collectibles,
        }
    }

    /// Loads a maze from a text file, substituting the built-in maze when the
    /// file is missing or unreadable. Never fails.
    pub fn from_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => {
                let lines: Vec<&str> = text.lines().map(|line| line.trim_end()).collect();
                Self::parse(&lines)
            }
            Err(_) => Self::built_in(),
        }
    }

    pub fn built_in() -> Self {
        Self::parse(&DEFAULT_MAZE)
    }

    pub fn tile_at(&self, col: i32, row: i32) -> TileKind {
        if col < 0 || row < 0 {
            return TileKind::Wall;
        }
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(TileKind::Wall)
    }

    pub fn traversable(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row) != TileKind::Wall
    }

    /// Removes the collectible under (col, row) in place, returning what was
    /// eaten. Anything else (walls, empties, out of range) returns None.
    pub fn consume(&mut self, col: i32, row: i32) -> Option<ItemKind> {
        let eaten = match self.tile_at(col, row) {
            TileKind::Dot => ItemKind::Dot,
            TileKind::PowerItem => ItemKind::PowerItem,
            _ => return None,
        };
        self.rows[row as usize][col as usize] = TileKind::Empty;
        Some(eaten)
    }

    /// Places an item onto an Empty tile. Returns false (and leaves the grid
    /// untouched) when the target is out of range or not Empty.
    pub fn spawn_item(&mut self, col: i32, row: i32, kind: ItemKind) -> bool {
        if self.tile_at(col, row) != TileKind::Empty {
            return false;
        }
        self.rows[row as usize][col as usize] = item_tile(kind);
        true
    }

    /// Places an item onto any in-range non-Wall tile, replacing whatever was
    /// there. The bonus ability uses this path: its candidate filter only
    /// excludes walls, so an existing Dot can be overwritten.
    pub fn overwrite_item(&mut self, col: i32, row: i32, kind: ItemKind) -> bool {
        if !self.traversable(col, row) {
            return false;
        }
        self.rows[row as usize][col as usize] = item_tile(kind);
        true
    }

    /// Live scan. Power items do not count: only dots gate level clear.
    pub fn remaining_dots(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|tile| **tile == TileKind::Dot)
            .count()
    }

    /// Dot + power-item count as parsed, before any consumption.
    pub fn total_collectibles(&self) -> usize {
        self.total_collectibles
    }

    pub fn player_spawn(&self) -> Vec2 {
        self.player_spawn
    }

    pub fn ghost_spawns(&self) -> &[Vec2] {
        &self.ghost_spawns
    }

    pub fn height_tiles(&self) -> i32 {
        self.rows.len() as i32
    }

    pub fn row_len(&self, row: i32) -> i32 {
        if row < 0 {
            return 0;
        }
        self.rows
            .get(row as usize)
            .map(|r| r.len() as i32)
            .unwrap_or(0)
    }

    pub fn width_tiles(&self) -> i32 {
        self.rows.iter().map(|r| r.len() as i32).max().unwrap_or(0)
    }

    pub fn pixel_width(&self) -> f32 {
        (self.width_tiles() * TILE_SIZE) as f32
    }

    pub fn pixel_height(&self) -> f32 {
        (self.height_tiles() * TILE_SIZE) as f32
    }
}

fn item_tile(kind: ItemKind) -> TileKind {
    match kind {
        ItemKind::Dot => TileKind::Dot,
        ItemKind::PowerItem => TileKind::PowerItem,
    }
}

fn fallback_player_spawn(rows: &[Vec<TileKind>]) -> Vec2 {
    for (y, row) in rows.iter().enumerate() {
        for (x, tile) in row.iter().enumerate() {
            if matches!(tile, TileKind::Empty | TileKind::Dot) {
                return Vec2 {
                    x: x as i32,
                    y: y as i32,
                };
            }
        }
    }
    Vec2 { x: 1, y: 1 }
}

fn synthetic_ghost_spawns(rows: &[Vec<TileKind>]) -> Vec<Vec2> {
    let center_x = rows
        .first()
        .map(|row| row.len() as i32 / 2)
        .filter(|_| !rows.is_empty())
        .unwrap_or(10);
    let center_y = if rows.is_empty() {
        10
    } else {
        rows.len() as i32 / 2
    };
    (0..4)
        .map(|i| Vec2 {
            x: center_x + i,
            y: center_y,
        })
        .collect()
}
