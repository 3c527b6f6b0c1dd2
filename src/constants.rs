/// Edge length of one maze tile in pixels. All entity rects are one tile square.
pub const TILE_SIZE: i32 = 20;

pub const DECISION_INTERVAL_TICKS: u32 = 20;
pub const FRIGHTENED_DURATION_TICKS: u32 = 300;
pub const POWER_MODE_DURATION_TICKS: u32 = 300;

pub const SCATTER_COOLDOWN_TICKS: u32 = 300;
pub const BONUS_COOLDOWN_TICKS: u32 = 180;

pub const SCORE_DOT: i64 = 10;
pub const SCORE_POWER_ITEM: i64 = 50;
pub const SCORE_GHOST: i64 = 200;
pub const SCORE_SCATTER: i64 = 100;
pub const SCORE_BONUS_SPAWN: i64 = 50;

/// Annulus searched by the radial scatter variant, in tiles from the player.
pub const SCATTER_RADIAL_MIN_DIST: i32 = 3;
pub const SCATTER_RADIAL_MAX_DIST: i32 = 8;
/// Distance band for the cardinal scatter variant.
pub const SCATTER_CARDINAL_MIN_DIST: i32 = 4;
pub const SCATTER_CARDINAL_MAX_DIST: i32 = 8;

/// Anchors for the PATROL personality, visited by nearest-first heuristic.
/// Anchors outside a small maze are fine; they only steer, they are never
/// required to be reachable.
pub const PATROL_WAYPOINTS: [(i32, i32); 4] = [(10, 10), (30, 10), (30, 25), (10, 25)];

pub const DEFAULT_PLAYER_SPEED: f32 = 2.0;
pub const DEFAULT_GHOST_SPEED: f32 = 1.0;

/// Built-in maze used whenever a level's maze source is missing or unreadable.
/// `#` wall, `.` dot, `o` power item, space empty, `P` player spawn, `G` ghost spawn.
pub const DEFAULT_MAZE: [&str; 23] = [
    "############################",
    "#o...........##...........o#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.#####.##.#####.######",
    "#......##..........##......#",
    "#.####.##.###..###.##.####.#",
    "#.####.#..#G....G#..#.####.#",
    "#......#..#G....G#..#......#",
    "#.####.#..########..#.####.#",
    "#.####.##..........##.####.#",
    "#......#####.##.#####......#",
    "######.#####.##.#####.######",
    "#..........................#",
    "#.####.#####.##.#####.####.#",
    "#...##................##...#",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#o.####......P.......####.o#",
    "############################",
];
