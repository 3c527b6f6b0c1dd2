use crate::constants::TILE_SIZE;
use crate::maze::Maze;
use crate::types::{Direction, ItemKind, PlayerView, Vec2};

/// The player moves continuously, a few pixels per tick, re-validating wall
/// collision every tick against all four corners of its tile-sized bounding
/// box. This is deliberately not the ghosts' tile-committed Mover: the player
/// is human-driven and corner-cutting at intersections keeps it responsive.
#[derive(Clone, Debug)]
pub struct Player {
    x: f32,
    y: f32,
    direction: Direction,
    next_direction: Direction,
    speed: f32,
    power_mode: bool,
}

impl Player {
    pub fn new(spawn: Vec2, speed: f32) -> Self {
        Self {
            x: (spawn.x * TILE_SIZE) as f32,
            y: (spawn.y * TILE_SIZE) as f32,
            direction: Direction::Stop,
            next_direction: Direction::Stop,
            speed,
            power_mode: false,
        }
    }

    /// Buffers a direction request; it takes effect on the first tick where a
    /// step that way would not collide.
    pub fn set_direction(&mut self, direction: Direction) {
        self.next_direction = direction;
    }

    pub fn tick(&mut self, maze: &Maze) {
        if self.next_direction != Direction::Stop {
            let (nx, ny) = self.step_from(self.x, self.y, self.next_direction);
            if !self.collides(nx, ny, maze) {
                self.direction = self.next_direction;
                self.next_direction = Direction::Stop;
            }
        }

        let (nx, ny) = self.step_from(self.x, self.y, self.direction);
        if self.collides(nx, ny, maze) {
            self.direction = Direction::Stop;
        } else {
            self.x = nx.clamp(0.0, maze.pixel_width() - TILE_SIZE as f32);
            self.y = ny.clamp(0.0, maze.pixel_height() - TILE_SIZE as f32);
        }
    }

    /// Consumes whatever collectible lies under the player's center point.
    pub fn eat(&mut self, maze: &mut Maze) -> Option<ItemKind> {
        let center = self.center_tile();
        maze.consume(center.x, center.y)
    }

    /// Tile under the player's center point, the one `eat` samples.
    pub fn center_tile(&self) -> Vec2 {
        Vec2 {
            x: (self.x as i32 + TILE_SIZE / 2) / TILE_SIZE,
            y: (self.y as i32 + TILE_SIZE / 2) / TILE_SIZE,
        }
    }

    fn step_from(&self, x: f32, y: f32, direction: Direction) -> (f32, f32) {
        match direction {
            Direction::Up => (x, y - self.speed),
            Direction::Down => (x, y + self.speed),
            Direction::Left => (x - self.speed, y),
            Direction::Right => (x + self.speed, y),
            Direction::Stop => (x, y),
        }
    }

    /// Four-corner bounding-box test. Negative coordinates and anything the
    /// maze reports non-traversable (walls, out of range) block.
    fn collides(&self, x: f32, y: f32, maze: &Maze) -> bool {
        if x < 0.0 || y < 0.0 {
            return true;
        }
        let left = x as i32 / TILE_SIZE;
        let right = (x as i32 + TILE_SIZE - 1) / TILE_SIZE;
        let top = y as i32 / TILE_SIZE;
        let bottom = (y as i32 + TILE_SIZE - 1) / TILE_SIZE;
        for (col, row) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
            if !maze.traversable(col, row) {
                return true;
            }
        }
        false
    }

    pub fn reset(&mut self, spawn: Vec2) {
        self.x = (spawn.x * TILE_SIZE) as f32;
        self.y = (spawn.y * TILE_SIZE) as f32;
        self.direction = Direction::Stop;
        self.next_direction = Direction::Stop;
        self.power_mode = false;
    }

    pub fn pos(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Discrete tile derived from the top-left corner; ghost targeting and
    /// the abilities both reason from this tile.
    pub fn tile(&self) -> Vec2 {
        Vec2 {
            x: self.x as i32 / TILE_SIZE,
            y: self.y as i32 / TILE_SIZE,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn power_mode(&self) -> bool {
        self.power_mode
    }

    pub fn set_power_mode(&mut self, on: bool) {
        self.power_mode = on;
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            x: self.x,
            y: self.y,
            tile: self.tile(),
            dir: self.direction,
            power_mode: self.power_mode,
        }
    }
}
