use glam::UVec2;

/// Workgroup edge length shared by every kernel; one workgroup covers one
/// 8x8 pixel tile, which is also the classification granularity.
pub const GROUP_SIZE: u32 = 8;

/// Compacted tile work-lists are sized in multiples of this, so capacity
/// stays a static upper bound even when the tile count fluctuates a little.
const TILE_LIST_ALIGN: u32 = 512;

pub(crate) fn div_ceil(value: UVec2, divisor: u32) -> UVec2 {
    UVec2::new(
        (value.x + divisor - 1) / divisor,
        (value.y + divisor - 1) / divisor,
    )
}

pub(crate) fn round_up(value: u32, multiple: u32) -> u32 {
    ((value + multiple - 1) / multiple) * multiple
}

/// A grid of 8x8 tiles covering some resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    tiles: UVec2,
}

impl TileGrid {
    pub fn new(resolution: UVec2) -> Self {
        Self {
            tiles: div_ceil(resolution, GROUP_SIZE),
        }
    }

    pub fn tiles(&self) -> UVec2 {
        self.tiles
    }

    pub fn tile_count(&self) -> u32 {
        self.tiles.x * self.tiles.y
    }

    /// Upper bound on the compacted work-list length for this grid.
    ///
    /// Every tile is classified exactly once, so the list can never exceed
    /// the tile count; rounding keeps the buffer size stable across small
    /// resolution changes.
    pub fn list_capacity(&self) -> u32 {
        round_up(self.tile_count(), TILE_LIST_ALIGN)
    }

    /// Workgroup count for a pass that runs one workgroup per tile.
    pub fn dispatch_per_tile(&self) -> UVec2 {
        self.tiles
    }

    /// Workgroup count for a pass that runs one *thread* per tile.
    pub fn dispatch_per_tile_thread(&self) -> UVec2 {
        div_ceil(self.tiles, GROUP_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(UVec2::new(1920, 1080), UVec2::new(240, 135))]
    #[case(UVec2::new(1, 1), UVec2::new(1, 1))]
    #[case(UVec2::new(8, 8), UVec2::new(1, 1))]
    #[case(UVec2::new(9, 17), UVec2::new(2, 3))]
    fn tile_grids_cover_the_resolution(
        #[case] resolution: UVec2,
        #[case] tiles: UVec2,
    ) {
        let grid = TileGrid::new(resolution);

        assert_eq!(tiles, grid.tiles());
        assert_eq!(tiles.x * tiles.y, grid.tile_count());
    }

    #[test]
    fn list_capacity_is_a_rounded_upper_bound() {
        let grid = TileGrid::new(UVec2::new(1920, 1080));

        assert!(grid.list_capacity() >= grid.tile_count());
        assert_eq!(0, grid.list_capacity() % 512);
        assert!(grid.list_capacity() - grid.tile_count() < 512);

        let tiny = TileGrid::new(UVec2::new(16, 16));

        assert_eq!(512, tiny.list_capacity());
    }

    #[test]
    fn round_up_is_exact_on_multiples() {
        assert_eq!(512, round_up(512, 512));
        assert_eq!(1024, round_up(513, 512));
        assert_eq!(0, round_up(0, 512));
    }
}
