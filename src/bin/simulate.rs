use chrono::{SecondsFormat, Utc};
use clap::Parser;
use pacman_arcade::constants::{
    BONUS_COOLDOWN_TICKS, POWER_MODE_DURATION_TICKS, SCATTER_COOLDOWN_TICKS, SCORE_BONUS_SPAWN,
    SCORE_DOT, SCORE_GHOST, SCORE_POWER_ITEM, SCORE_SCATTER,
};
use pacman_arcade::engine::{EngineOptions, GameEngine};
use pacman_arcade::levels::{load_levels, LevelSpec};
use pacman_arcade::maze::Maze;
use pacman_arcade::score_store::HighScoreStore;
use pacman_arcade::types::{
    Direction, GhostMood, RuntimeEvent, ScatterMode, Snapshot, TileKind, Vec2,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const DEFAULT_TICK_LIMIT: u64 = 20_000;
const DEFAULT_LIVES: i32 = 3;
/// The autopilot runs from danger before it chases dots.
const FLEE_RADIUS: i32 = 3;
const SCATTER_PANIC_RADIUS: i32 = 4;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u64>,
    /// Run only the level with this name.
    #[arg(long)]
    level: Option<String>,
    /// JSON level table; the built-in progression is used when omitted.
    #[arg(long)]
    levels: Option<PathBuf>,
    #[arg(long)]
    ticks: Option<u64>,
    #[arg(long)]
    lives: Option<i32>,
    /// Scatter variant: "radial" or "cardinal".
    #[arg(long)]
    scatter: Option<String>,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    #[arg(long)]
    highscore: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Cleared,
    GameOver,
    TickLimit,
}

#[derive(Clone, Debug, Serialize)]
struct LevelResultLine {
    level: String,
    seed: u32,
    outcome: Outcome,
    ticks: u64,
    score: i64,
    #[serde(rename = "livesLeft")]
    lives_left: i32,
    #[serde(rename = "dotsEaten")]
    dots_eaten: i32,
    #[serde(rename = "powerItemsEaten")]
    power_items_eaten: i32,
    #[serde(rename = "ghostsCaptured")]
    ghosts_captured: i32,
    hits: i32,
    scatters: i32,
    #[serde(rename = "bonusSpawns")]
    bonus_spawns: i32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct LevelRunResult {
    result: LevelResultLine,
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "generatedAtIso")]
    generated_at_iso: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "levelCount")]
    level_count: usize,
    #[serde(rename = "totalScore")]
    total_score: i64,
    #[serde(rename = "bestScore")]
    best_score: i64,
    #[serde(rename = "newHighScore")]
    new_high_score: bool,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    levels: Vec<LevelResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let run_started_at_ms = now_ms();
    let base_seed = cli.seed.map(|s| s as u32).unwrap_or_else(rand::random);
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| format!("sim-{}-{}", base_seed, run_started_at_ms));
    let scatter_mode = cli
        .scatter
        .as_deref()
        .and_then(ScatterMode::parse)
        .unwrap_or(ScatterMode::Radial);
    let tick_limit = cli.ticks.unwrap_or(DEFAULT_TICK_LIMIT).max(1);
    let start_lives = cli.lives.unwrap_or(DEFAULT_LIVES).clamp(1, 99);

    let mut levels = load_levels(cli.levels.as_deref());
    if let Some(name) = cli.level.as_deref() {
        levels.retain(|level| level.name == name);
        if levels.is_empty() {
            emit_log(
                "error",
                "level_not_found",
                &match_id,
                None,
                Some(base_seed),
                None,
                json!({ "requested": name }),
            );
            std::process::exit(2);
        }
    }

    let mut has_anomaly = false;
    let mut level_results = Vec::new();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_score = 0i64;
    let mut total_anomalies = 0usize;

    for (index, level) in levels.iter().enumerate() {
        let seed = base_seed.wrapping_add(index as u32);
        emit_log(
            "info",
            "level_started",
            &match_id,
            Some(&level.name),
            Some(seed),
            None,
            json!({
                "playerSpeed": level.player_speed,
                "ghostSpeed": level.ghost_speed,
                "tickLimit": tick_limit,
                "scatterMode": scatter_mode,
            }),
        );

        let run = run_level(level, seed, tick_limit, start_lives, scatter_mode);

        for anomaly in &run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &match_id,
                Some(&level.name),
                Some(seed),
                Some(anomaly.tick),
                json!({ "message": anomaly.message }),
            );
        }
        if !run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += run.anomaly_records.len();
        total_score += run.result.score;
        *outcome_counts
            .entry(outcome_key(run.result.outcome))
            .or_insert(0) += 1;

        emit_log(
            "info",
            "level_finished",
            &match_id,
            Some(&level.name),
            Some(seed),
            Some(run.result.ticks),
            json!({
                "outcome": run.result.outcome,
                "score": run.result.score,
                "livesLeft": run.result.lives_left,
                "anomalyCount": run.anomaly_records.len(),
            }),
        );

        println!(
            "{}",
            serde_json::to_string(&run.result).expect("level result should serialize")
        );
        level_results.push(run.result);

        // A lost run ends the progression, same as losing the last life at
        // the cabinet.
        if level_results.last().map(|r| r.outcome) == Some(Outcome::GameOver) {
            break;
        }
    }

    let mut new_high_score = false;
    let mut best_score = total_score;
    if let Some(path) = cli.highscore.clone() {
        let mut store = HighScoreStore::new(path);
        new_high_score = store.record(total_score);
        best_score = store.best();
        if new_high_score {
            emit_log(
                "info",
                "high_score_updated",
                &match_id,
                None,
                Some(base_seed),
                None,
                json!({ "score": total_score }),
            );
        }
    }

    let summary = RunSummary {
        match_id: match_id.clone(),
        generated_at_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        started_at_ms: run_started_at_ms,
        finished_at_ms: now_ms(),
        level_count: level_results.len(),
        total_score,
        best_score,
        new_high_score,
        anomaly_count: total_anomalies,
        outcome_counts,
        levels: level_results,
    };

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &match_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &match_id,
        None,
        None,
        None,
        json!({
            "levelCount": summary.level_count,
            "totalScore": summary.total_score,
            "bestScore": summary.best_score,
            "anomalyCount": summary.anomaly_count,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_level(
    level: &LevelSpec,
    seed: u32,
    tick_limit: u64,
    start_lives: i32,
    scatter_mode: ScatterMode,
) -> LevelRunResult {
    let mut engine = GameEngine::from_level(
        level,
        EngineOptions {
            seed,
            ..EngineOptions::default()
        },
    );

    let mut score = 0i64;
    let mut lives = start_lives;
    let mut dots_eaten = 0;
    let mut power_items_eaten = 0;
    let mut ghosts_captured = 0;
    let mut hits = 0;
    let mut scatters = 0;
    let mut bonus_spawns = 0;
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut last_tick = 0u64;

    let outcome = loop {
        if engine.is_cleared() {
            break Outcome::Cleared;
        }
        if engine.tick_counter() >= tick_limit {
            break Outcome::TickLimit;
        }

        let observed = engine.build_snapshot(false);
        steer(&mut engine, &observed);
        trigger_abilities(&mut engine, &observed, scatter_mode);
        engine.step();

        let snapshot = engine.build_snapshot(true);
        last_tick = snapshot.tick;
        for message in collect_snapshot_anomalies(engine.maze(), &snapshot) {
            if !anomalies.contains(&message) {
                anomalies.push(message.clone());
            }
            anomaly_records.push(AnomalyRecord {
                tick: snapshot.tick,
                message,
            });
        }

        for event in &snapshot.events {
            match event {
                RuntimeEvent::DotEaten { .. } => {
                    dots_eaten += 1;
                    score += SCORE_DOT;
                }
                RuntimeEvent::PowerItemEaten { .. } => {
                    power_items_eaten += 1;
                    score += SCORE_POWER_ITEM;
                }
                RuntimeEvent::GhostCaptured { .. } => {
                    ghosts_captured += 1;
                    score += SCORE_GHOST;
                }
                RuntimeEvent::GhostsScattered { .. } => {
                    scatters += 1;
                    score += SCORE_SCATTER;
                }
                RuntimeEvent::BonusItemSpawned { .. } => {
                    bonus_spawns += 1;
                    score += SCORE_BONUS_SPAWN;
                }
                RuntimeEvent::PlayerHit => {
                    hits += 1;
                    lives -= 1;
                }
                RuntimeEvent::GhostsFrightened { .. } | RuntimeEvent::LevelCleared => {}
            }
        }

        if lives <= 0 {
            break Outcome::GameOver;
        }
    };

    LevelRunResult {
        result: LevelResultLine {
            level: level.name.clone(),
            seed,
            outcome,
            ticks: last_tick,
            score,
            lives_left: lives,
            dots_eaten,
            power_items_eaten,
            ghosts_captured,
            hits,
            scatters,
            bonus_spawns,
            anomalies,
        },
        anomaly_records,
    }
}

/// Greedy pilot: run from the nearest ghost when it is close, otherwise head
/// for the nearest remaining dot. Direction requests are buffered by the
/// engine, so issuing one every tick is harmless.
fn steer(engine: &mut GameEngine, snapshot: &Snapshot) {
    let here = snapshot.player.tile;
    let threat = nearest_normal_ghost(snapshot, here);

    let chosen = if let Some((ghost_tile, distance)) = threat {
        if distance <= FLEE_RADIUS {
            best_direction(engine.maze(), here, ghost_tile, false)
        } else {
            nearest_dot(engine.maze(), here)
                .and_then(|dot| best_direction(engine.maze(), here, dot, true))
        }
    } else {
        nearest_dot(engine.maze(), here)
            .and_then(|dot| best_direction(engine.maze(), here, dot, true))
    };

    if let Some(direction) = chosen {
        engine.set_player_direction(direction);
    }
}

fn trigger_abilities(engine: &mut GameEngine, snapshot: &Snapshot, scatter_mode: ScatterMode) {
    let here = snapshot.player.tile;
    if snapshot.scatter_cooldown == 0 {
        if let Some((_, distance)) = nearest_normal_ghost(snapshot, here) {
            if distance <= SCATTER_PANIC_RADIUS {
                engine.activate_scatter(scatter_mode);
            }
        }
    }
    if snapshot.bonus_cooldown == 0 && !snapshot.player.power_mode {
        engine.activate_bonus();
    }
}

fn nearest_normal_ghost(snapshot: &Snapshot, from: Vec2) -> Option<(Vec2, i32)> {
    snapshot
        .ghosts
        .iter()
        .filter(|ghost| ghost.mood == GhostMood::Normal)
        .map(|ghost| (ghost.tile, manhattan(ghost.tile, from)))
        .min_by_key(|(_, distance)| *distance)
}

fn nearest_dot(maze: &Maze, from: Vec2) -> Option<Vec2> {
    let mut best: Option<(Vec2, i32)> = None;
    for y in 0..maze.height_tiles() {
        for x in 0..maze.row_len(y) {
            if maze.tile_at(x, y) != TileKind::Dot {
                continue;
            }
            let tile = Vec2 { x, y };
            let distance = manhattan(tile, from);
            if best.map(|(_, d)| distance < d).unwrap_or(true) {
                best = Some((tile, distance));
            }
        }
    }
    best.map(|(tile, _)| tile)
}

/// Traversable neighbor that minimizes (or, fleeing, maximizes) the Manhattan
/// distance to `target`. First enumerated direction wins ties.
fn best_direction(maze: &Maze, from: Vec2, target: Vec2, toward: bool) -> Option<Direction> {
    let mut best: Option<(Direction, i32)> = None;
    for (dx, dy, direction) in [
        (0, -1, Direction::Up),
        (0, 1, Direction::Down),
        (-1, 0, Direction::Left),
        (1, 0, Direction::Right),
    ] {
        let tile = Vec2 {
            x: from.x + dx,
            y: from.y + dy,
        };
        if !maze.traversable(tile.x, tile.y) {
            continue;
        }
        let distance = manhattan(tile, target);
        let better = match best {
            None => true,
            Some((_, d)) => {
                if toward {
                    distance < d
                } else {
                    distance > d
                }
            }
        };
        if better {
            best = Some((direction, distance));
        }
    }
    best.map(|(direction, _)| direction)
}

fn manhattan(a: Vec2, b: Vec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

fn collect_snapshot_anomalies(maze: &Maze, snapshot: &Snapshot) -> Vec<String> {
    let mut anomalies = Vec::new();
    if snapshot.power_ticks > POWER_MODE_DURATION_TICKS {
        anomalies.push(format!("power timer out of range: {}", snapshot.power_ticks));
    }
    if snapshot.scatter_cooldown > SCATTER_COOLDOWN_TICKS {
        anomalies.push(format!(
            "scatter cooldown out of range: {}",
            snapshot.scatter_cooldown
        ));
    }
    if snapshot.bonus_cooldown > BONUS_COOLDOWN_TICKS {
        anomalies.push(format!(
            "bonus cooldown out of range: {}",
            snapshot.bonus_cooldown
        ));
    }
    if snapshot.ghosts.is_empty() {
        anomalies.push("no ghosts in play".to_string());
    }
    let (px, py) = (snapshot.player.x, snapshot.player.y);
    if px < 0.0 || py < 0.0 || px >= maze.pixel_width() || py >= maze.pixel_height() {
        anomalies.push(format!("player out of bounds: ({px}, {py})"));
    }
    anomalies
}

fn outcome_key(outcome: Outcome) -> String {
    match outcome {
        Outcome::Cleared => "cleared".to_string(),
        Outcome::GameOver => "game_over".to_string(),
        Outcome::TickLimit => "tick_limit".to_string(),
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let text = serde_json::to_string_pretty(summary)
        .map_err(|error| io::Error::new(io::ErrorKind::Other, error))?;
    std::fs::write(path, text)
}

fn emit_log(
    level: &str,
    event: &str,
    match_id: &str,
    scenario: Option<&str>,
    seed: Option<u32>,
    tick: Option<u64>,
    details: Value,
) {
    let line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        match_id: match_id.to_string(),
        scenario: scenario.map(|value| value.to_string()),
        seed,
        tick,
        details,
    };
    eprintln!(
        "{}",
        serde_json::to_string(&line).expect("structured log should serialize")
    );
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
