use crate::constants::TILE_SIZE;

/// Axis-aligned overlap test between two tile-sized rects given by their
/// top-left pixel corners. Edge-touching rects do not overlap.
pub(super) fn rects_intersect(ax: f32, ay: f32, bx: f32, by: f32) -> bool {
    let size = TILE_SIZE as f32;
    ax < bx + size && bx < ax + size && ay < by + size && by < ay + size
}

#[cfg(test)]
mod tests {
    use super::rects_intersect;
    use crate::constants::TILE_SIZE;

    #[test]
    fn overlapping_rects_intersect() {
        assert!(rects_intersect(0.0, 0.0, 5.0, 5.0));
        assert!(rects_intersect(40.0, 40.0, 40.0, 40.0));
    }

    #[test]
    fn edge_touching_rects_do_not_intersect() {
        let size = TILE_SIZE as f32;
        assert!(!rects_intersect(0.0, 0.0, size, 0.0));
        assert!(!rects_intersect(0.0, 0.0, 0.0, size));
    }

    #[test]
    fn one_pixel_of_overlap_counts() {
        let size = TILE_SIZE as f32;
        assert!(rects_intersect(0.0, 0.0, size - 1.0, 0.0));
    }
}
