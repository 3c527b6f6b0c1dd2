use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::{DEFAULT_GHOST_SPEED, DEFAULT_PLAYER_SPEED};
use crate::maze::Maze;

/// One playable level. The maze comes from inline rows, a text file, or the
/// built-in layout, in that order of preference.
#[derive(Clone, Debug, Deserialize)]
pub struct LevelSpec {
    pub name: String,
    #[serde(default, rename = "mazeRows")]
    pub maze_rows: Option<Vec<String>>,
    #[serde(default, rename = "mazePath")]
    pub maze_path: Option<PathBuf>,
    #[serde(default = "default_player_speed", rename = "playerSpeed")]
    pub player_speed: f32,
    #[serde(default = "default_ghost_speed", rename = "ghostSpeed")]
    pub ghost_speed: f32,
}

impl LevelSpec {
    pub fn maze(&self) -> Maze {
        if let Some(rows) = &self.maze_rows {
            return Maze::parse(rows);
        }
        if let Some(path) = &self.maze_path {
            return Maze::from_file(path);
        }
        Maze::built_in()
    }
}

fn default_player_speed() -> f32 {
    DEFAULT_PLAYER_SPEED
}

fn default_ghost_speed() -> f32 {
    DEFAULT_GHOST_SPEED
}

/// Reads a JSON level table, falling back to the built-in progression when the
/// file is missing or malformed.
pub fn load_levels(path: Option<&Path>) -> Vec<LevelSpec> {
    let Some(path) = path else {
        return default_levels();
    };
    let text = match fs::read_to_string(path) {
        Ok(value) => value,
        Err(error) => {
            eprintln!("[levels] failed to read {}: {error}", path.display());
            return default_levels();
        }
    };
    match serde_json::from_str::<Vec<LevelSpec>>(&text) {
        Ok(levels) if !levels.is_empty() => levels,
        Ok(_) => {
            eprintln!("[levels] empty level table at {}", path.display());
            default_levels()
        }
        Err(error) => {
            eprintln!("[levels] failed to parse {}: {error}", path.display());
            default_levels()
        }
    }
}

/// Built-in progression: same maze throughout, ghosts closing the speed gap
/// level by level.
pub fn default_levels() -> Vec<LevelSpec> {
    vec![
        LevelSpec {
            name: "level-1".to_string(),
            maze_rows: None,
            maze_path: None,
            player_speed: 2.0,
            ghost_speed: 1.0,
        },
        LevelSpec {
            name: "level-2".to_string(),
            maze_rows: None,
            maze_path: None,
            player_speed: 2.0,
            ghost_speed: 1.5,
        },
        LevelSpec {
            name: "level-3".to_string(),
            maze_rows: None,
            maze_path: None,
            player_speed: 2.0,
            ghost_speed: 2.0,
        },
    ]
}
