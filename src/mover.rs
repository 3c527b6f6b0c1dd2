use crate::constants::TILE_SIZE;
use crate::types::Vec2;

/// Tile-to-tile interpolation shared by everything that moves in discrete
/// steps. Two states: idle (at rest, pixel position exactly tile-aligned) and
/// transitioning (progress in pixels toward the target tile). A transition,
/// once begun, always completes; the final `advance` snaps exactly to the
/// target regardless of overshoot.
#[derive(Clone, Copy, Debug)]
pub struct Mover {
    tile: Vec2,
    target: Vec2,
    progress: f32,
    moving: bool,
}

impl Mover {
    pub fn at(tile: Vec2) -> Self {
        Self {
            tile,
            target: tile,
            progress: 0.0,
            moving: false,
        }
    }

    pub fn tile(&self) -> Vec2 {
        self.tile
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn is_idle(&self) -> bool {
        !self.moving
    }

    /// Starts a transition toward `target`. Only meaningful from idle; a call
    /// mid-transition is ignored so an in-flight step is never aborted.
    pub fn begin(&mut self, target: Vec2) {
        if self.moving {
            return;
        }
        self.target = target;
        self.progress = 0.0;
        self.moving = true;
    }

    /// Adds `speed` pixels of progress. Returns true when the transition
    /// completed on this call.
    pub fn advance(&mut self, speed: f32) -> bool {
        if !self.moving {
            return false;
        }
        self.progress += speed;
        if self.progress >= TILE_SIZE as f32 {
            self.tile = self.target;
            self.progress = 0.0;
            self.moving = false;
            return true;
        }
        false
    }

    /// Instant relocation, e.g. on capture or the scatter ability. Clears any
    /// in-flight transition.
    pub fn teleport(&mut self, tile: Vec2) {
        self.tile = tile;
        self.target = tile;
        self.progress = 0.0;
        self.moving = false;
    }

    /// Interpolated pixel position of the entity's top-left corner.
    pub fn pixel(&self) -> (f32, f32) {
        let start_x = (self.tile.x * TILE_SIZE) as f32;
        let start_y = (self.tile.y * TILE_SIZE) as f32;
        if !self.moving {
            return (start_x, start_y);
        }
        let ratio = self.progress / TILE_SIZE as f32;
        let end_x = (self.target.x * TILE_SIZE) as f32;
        let end_y = (self.target.y * TILE_SIZE) as f32;
        (
            start_x + (end_x - start_x) * ratio,
            start_y + (end_y - start_y) * ratio,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Mover;
    use crate::constants::TILE_SIZE;
    use crate::types::Vec2;

    #[test]
    fn idle_pixel_is_exactly_tile_aligned() {
        let mut mover = Mover::at(Vec2 { x: 3, y: 2 });
        mover.begin(Vec2 { x: 4, y: 2 });
        // 0.7 px per tick does not divide TILE_SIZE evenly.
        let mut guard = 0;
        while !mover.advance(0.7) {
            guard += 1;
            assert!(guard < 100);
        }
        assert!(mover.is_idle());
        assert_eq!(mover.tile(), Vec2 { x: 4, y: 2 });
        let (x, y) = mover.pixel();
        assert_eq!(x, (4 * TILE_SIZE) as f32);
        assert_eq!(y, (2 * TILE_SIZE) as f32);
    }

    #[test]
    fn pixel_stays_between_tile_origins() {
        let mut mover = Mover::at(Vec2 { x: 1, y: 1 });
        mover.begin(Vec2 { x: 1, y: 2 });
        let lo = (TILE_SIZE) as f32;
        let hi = (2 * TILE_SIZE) as f32;
        for _ in 0..40 {
            let (x, y) = mover.pixel();
            assert_eq!(x, lo);
            assert!((lo..=hi).contains(&y));
            if mover.advance(3.3) {
                break;
            }
        }
        assert!(mover.is_idle());
    }

    #[test]
    fn overshoot_snaps_to_target() {
        let mut mover = Mover::at(Vec2 { x: 0, y: 0 });
        mover.begin(Vec2 { x: 1, y: 0 });
        assert!(mover.advance(1_000.0));
        assert_eq!(mover.pixel(), ((TILE_SIZE) as f32, 0.0));
    }

    #[test]
    fn begin_mid_transition_is_ignored() {
        let mut mover = Mover::at(Vec2 { x: 0, y: 0 });
        mover.begin(Vec2 { x: 1, y: 0 });
        mover.advance(1.0);
        mover.begin(Vec2 { x: 0, y: 1 });
        assert_eq!(mover.target(), Vec2 { x: 1, y: 0 });
    }

    #[test]
    fn teleport_clears_transition() {
        let mut mover = Mover::at(Vec2 { x: 0, y: 0 });
        mover.begin(Vec2 { x: 1, y: 0 });
        mover.advance(5.0);
        mover.teleport(Vec2 { x: 7, y: 7 });
        assert!(mover.is_idle());
        assert_eq!(mover.tile(), Vec2 { x: 7, y: 7 });
        assert_eq!(
            mover.pixel(),
            ((7 * TILE_SIZE) as f32, (7 * TILE_SIZE) as f32)
        );
    }

    #[test]
    fn advance_while_idle_is_a_no_op() {
        let mut mover = Mover::at(Vec2 { x: 2, y: 2 });
        assert!(!mover.advance(4.0));
        assert_eq!(mover.tile(), Vec2 { x: 2, y: 2 });
    }
}
