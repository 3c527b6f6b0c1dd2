use std::fs;
use std::path::{Path, PathBuf};

/// Best-score persistence: one integer in a plain text file. Reads tolerate a
/// missing or garbled file (score starts at zero) and write failures are
/// logged but never surfaced to the game.
pub struct HighScoreStore {
    file_path: PathBuf,
    best: i64,
}

impl HighScoreStore {
    pub fn new(file_path: PathBuf) -> Self {
        let best = load_best(&file_path);
        Self { file_path, best }
    }

    pub fn best(&self) -> i64 {
        self.best
    }

    /// Records a finished run. Returns true when it set a new best.
    pub fn record(&mut self, score: i64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    fn save(&self) {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(error) = fs::create_dir_all(parent) {
                    eprintln!(
                        "[high-score] failed to create parent dir {}: {error}",
                        parent.display()
                    );
                    return;
                }
            }
        }
        if let Err(error) = fs::write(&self.file_path, self.best.to_string()) {
            eprintln!(
                "[high-score] failed to write {}: {error}",
                self.file_path.display()
            );
        }
    }
}

fn load_best(path: &Path) -> i64 {
    let text = match fs::read_to_string(path) {
        Ok(value) => value,
        Err(error) => {
            if error.kind() != std::io::ErrorKind::NotFound {
                eprintln!("[high-score] failed to read {}: {error}", path.display());
            }
            return 0;
        }
    };
    match text.trim().parse::<i64>() {
        Ok(value) => value,
        Err(error) => {
            eprintln!("[high-score] failed to parse {}: {error}", path.display());
            0
        }
    }
}
