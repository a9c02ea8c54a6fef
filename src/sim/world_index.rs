//! Static world index
//!
//! Surface blocks never move, so they live in one vector sorted by their
//! top-left corner `(x, y)`. A range query binary-searches the slice of
//! blocks whose `x` can reach the query rectangle and filters that slice
//! exactly, so the result always equals a brute-force scan.

use std::cmp::Ordering;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::HasWorldRect;
use super::rect::Rect;
use crate::GameError;

/// What a surface block was imported from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Real terrain
    #[default]
    Rock,
    /// Test/placeholder block painted into the map
    Mock,
}

/// An immovable rectangle of terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBlock {
    rect: Rect,
    pub kind: SurfaceKind,
}

impl SurfaceBlock {
    pub fn new(rect: Rect, kind: SurfaceKind) -> Self {
        Self { rect, kind }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl HasWorldRect for SurfaceBlock {
    fn world_rect(&self) -> Rect {
        self.rect
    }
}

/// Lexicographic `(x, y)` order of two corners
#[inline]
fn corner_cmp(a: Vec2, b: Vec2) -> Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

/// Sorted spatial index over static blocks
#[derive(Debug, Clone, Default)]
pub struct WorldIndex {
    blocks: Vec<SurfaceBlock>,
    /// Largest block width/height, widens the search window
    max_extent: Vec2,
    /// False only in release builds fed unsorted input; queries then scan everything
    ordered: bool,
}

impl WorldIndex {
    /// Build from blocks already sorted by `(x, y)`.
    ///
    /// Unsorted input is a bug in the caller. Debug builds reject it with
    /// `InvariantViolation`; release builds log it and fall back to linear scans.
    pub fn new(blocks: Vec<SurfaceBlock>) -> Result<Self, GameError> {
        let unsorted_at = blocks
            .windows(2)
            .position(|w| corner_cmp(w[0].rect.pos, w[1].rect.pos) == Ordering::Greater);

        let ordered = match unsorted_at {
            None => true,
            Some(i) if cfg!(debug_assertions) => {
                return Err(GameError::InvariantViolation {
                    invariant: "surface blocks sorted by (x, y)",
                    index: i + 1,
                });
            }
            Some(i) => {
                log::error!(
                    "surface blocks out of order at index {}, falling back to linear scans",
                    i + 1
                );
                false
            }
        };

        Ok(Self::with_order(blocks, ordered))
    }

    fn with_order(blocks: Vec<SurfaceBlock>, ordered: bool) -> Self {
        let max_extent = blocks
            .iter()
            .fold(Vec2::ZERO, |acc, b| acc.max(b.rect.size));

        log::debug!(
            "world index built: {} blocks, max extent {}, ordered {}",
            blocks.len(),
            max_extent,
            ordered
        );

        Self {
            blocks,
            max_extent,
            ordered,
        }
    }

    /// The index release builds fall back to on unsorted input
    #[cfg(test)]
    fn unordered(blocks: Vec<SurfaceBlock>) -> Self {
        Self::with_order(blocks, false)
    }

    /// Sort `blocks` by `(x, y)` and build the index
    pub fn from_unsorted(mut blocks: Vec<SurfaceBlock>) -> Result<Self, GameError> {
        blocks.sort_by(|a, b| corner_cmp(a.rect.pos, b.rect.pos));
        Self::new(blocks)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[SurfaceBlock] {
        &self.blocks
    }

    /// Binary search toward `point`.
    ///
    /// Returns the index of a probed block that contains `point` as soon as one
    /// is hit; otherwise the first index whose corner is not less than `point`.
    pub fn nearest_index(&self, point: Vec2) -> usize {
        let mut low = 0;
        let mut high = self.blocks.len();
        while low < high {
            let mid = low + (high - low) / 2;
            let block = &self.blocks[mid];
            if block.rect.contains_point(point) {
                return mid;
            }
            if corner_cmp(block.rect.pos, point) == Ordering::Less {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }

    /// Index range that can hold blocks intersecting `rect`
    fn candidate_range(&self, rect: &Rect) -> (usize, usize) {
        if !self.ordered {
            return (0, self.blocks.len());
        }
        // Any intersecting block has left edge in [rect.left - max_w, rect.right].
        // The infinite y keeps both searches pure lower bounds.
        let start = self.nearest_index(Vec2::new(
            rect.left() - self.max_extent.x,
            f32::NEG_INFINITY,
        ));
        let end = self.nearest_index(Vec2::new(rect.right(), f32::INFINITY));
        (start, end.max(start))
    }

    /// All blocks whose rectangle intersects `rect`
    pub fn query_range(&self, rect: &Rect) -> Vec<&SurfaceBlock> {
        if self.blocks.is_empty() {
            return Vec::new();
        }
        let (start, end) = self.candidate_range(rect);
        self.blocks[start..end]
            .iter()
            .filter(|b| b.rect.intersects(rect))
            .collect()
    }

    /// Blocks an actor occupying `actor_rect` is touching
    pub fn query_collisions(&self, actor_rect: &Rect) -> Vec<&SurfaceBlock> {
        // A range query on the actor's own box already filters by exact intersection.
        self.query_range(actor_rect)
    }

    /// The block containing `point`, if any
    pub fn block_at(&self, point: Vec2) -> Option<&SurfaceBlock> {
        let probe = Rect {
            pos: point,
            size: Vec2::ZERO,
        };
        self.query_range(&probe)
            .into_iter()
            .find(|b| b.rect.contains_point(point))
    }
}

/// The fixed set of collidable categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collidable {
    /// Static terrain blocks
    Surface,
}

/// One world index per collidable category, owned by the game state
#[derive(Debug, Clone, Default)]
pub struct CollisionRegistry {
    surfaces: WorldIndex,
}

impl CollisionRegistry {
    pub fn new(surfaces: WorldIndex) -> Self {
        Self { surfaces }
    }

    pub fn index(&self, category: Collidable) -> &WorldIndex {
        match category {
            Collidable::Surface => &self.surfaces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn block(x: f32, y: f32) -> SurfaceBlock {
        SurfaceBlock::new(Rect::new(x, y, 16.0, 16.0), SurfaceKind::Rock)
    }

    fn brute_force<'a>(blocks: &'a [SurfaceBlock], rect: &Rect) -> Vec<&'a SurfaceBlock> {
        blocks.iter().filter(|b| b.rect().intersects(rect)).collect()
    }

    #[test]
    fn test_empty_index() {
        let index = WorldIndex::new(Vec::new()).unwrap();
        assert!(index.query_range(&Rect::new(0.0, 0.0, 100.0, 100.0)).is_empty());
        assert!(index.block_at(Vec2::ZERO).is_none());
        assert_eq!(index.nearest_index(Vec2::ZERO), 0);
    }

    #[test]
    fn test_single_block() {
        let index = WorldIndex::new(vec![block(0.0, 0.0)]).unwrap();
        assert_eq!(index.query_range(&Rect::new(8.0, 8.0, 1.0, 1.0)).len(), 1);
        assert!(index.query_range(&Rect::new(40.0, 40.0, 5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_unsorted_rejected_in_debug() {
        let result = WorldIndex::new(vec![block(32.0, 0.0), block(0.0, 0.0)]);
        if cfg!(debug_assertions) {
            assert!(matches!(
                result,
                Err(GameError::InvariantViolation { index: 1, .. })
            ));
        } else {
            let index = result.unwrap();
            assert_eq!(index.query_range(&Rect::new(0.0, 0.0, 50.0, 5.0)).len(), 2);
        }
    }

    #[test]
    fn test_unordered_fallback_scans_everything() {
        // Deliberately out of (x, y) order
        let blocks = vec![
            block(64.0, 0.0),
            block(0.0, 32.0),
            block(128.0, 16.0),
            block(0.0, 0.0),
            block(16.0, 0.0),
        ];
        let index = WorldIndex::unordered(blocks.clone());
        for query in [
            Rect::new(0.0, 0.0, 20.0, 5.0),
            Rect::new(60.0, 10.0, 80.0, 10.0),
            Rect::new(-50.0, -50.0, 300.0, 300.0),
            Rect::new(500.0, 0.0, 1.0, 1.0),
        ] {
            let fast: Vec<Rect> = index.query_range(&query).iter().map(|b| *b.rect()).collect();
            let slow: Vec<Rect> = brute_force(&blocks, &query).iter().map(|b| *b.rect()).collect();
            assert_eq!(fast, slow, "{:?}", query);
        }
        assert_eq!(index.block_at(Vec2::new(130.0, 20.0)).unwrap().rect().left(), 128.0);
    }

    #[test]
    fn test_surface_block_world_rect() {
        let b = block(32.0, 48.0);
        assert_eq!(b.world_rect(), Rect::new(32.0, 48.0, 16.0, 16.0));
        assert_eq!(b.world_rect(), *b.rect());
    }

    #[test]
    fn test_from_unsorted_sorts() {
        let index =
            WorldIndex::from_unsorted(vec![block(32.0, 0.0), block(0.0, 16.0), block(0.0, 0.0)])
                .unwrap();
        let corners: Vec<Vec2> = index.blocks().iter().map(|b| b.rect().pos).collect();
        assert_eq!(
            corners,
            vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 16.0), Vec2::new(32.0, 0.0)]
        );
    }

    #[test]
    fn test_nearest_index_hits_containing_block() {
        let blocks: Vec<_> = (0..10).map(|i| block(i as f32 * 16.0, 0.0)).collect();
        let index = WorldIndex::new(blocks).unwrap();
        let i = index.nearest_index(Vec2::new(5.0 * 16.0 + 3.0, 4.0));
        assert_eq!(i, 5);
        let b = index.block_at(Vec2::new(5.0 * 16.0 + 3.0, 4.0)).unwrap();
        assert_eq!(b.rect().left(), 80.0);
        assert!(index.block_at(Vec2::new(3.0, 20.0)).is_none());
    }

    #[test]
    fn test_query_column_of_blocks() {
        // A wall: same x, many y. The lexicographic order keeps it contiguous.
        let mut blocks: Vec<_> = (0..20).map(|j| block(64.0, j as f32 * 16.0)).collect();
        blocks.insert(0, block(0.0, 0.0));
        blocks.push(block(128.0, 0.0));
        let index = WorldIndex::new(blocks).unwrap();

        let hits = index.query_range(&Rect::new(70.0, 100.0, 4.0, 20.0));
        // y 96..112 and 112..128 overlap 100..120
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|b| b.rect().left() == 64.0));
    }

    #[test]
    fn test_query_collisions_touching_ground() {
        let blocks: Vec<_> = (0..4).map(|i| block(i as f32 * 16.0, 100.0)).collect();
        let index = WorldIndex::new(blocks).unwrap();
        // Actor standing exactly on top of block 1 (x 16..32)
        let actor = Rect::new(18.0, 84.0, 12.0, 16.0);
        let hits = index.query_collisions(&actor);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].rect().left(), 16.0);
    }

    #[test]
    fn test_registry_lookup() {
        let registry =
            CollisionRegistry::new(WorldIndex::new(vec![block(0.0, 0.0)]).unwrap());
        assert_eq!(registry.index(Collidable::Surface).len(), 1);
    }

    fn arb_blocks() -> impl Strategy<Value = Vec<SurfaceBlock>> {
        prop::collection::vec((-40i32..40, -40i32..40, 1u8..4, 1u8..4), 0..120).prop_map(
            |cells| {
                let mut blocks = cells
                    .into_iter()
                    .map(|(x, y, w, h)| {
                        SurfaceBlock::new(
                            Rect::new(
                                x as f32 * 8.0,
                                y as f32 * 8.0,
                                w as f32 * 8.0,
                                h as f32 * 8.0,
                            ),
                            SurfaceKind::Rock,
                        )
                    })
                    .collect::<Vec<_>>();
                blocks.sort_by(|a, b| corner_cmp(a.rect().pos, b.rect().pos));
                blocks
            },
        )
    }

    proptest! {
        #[test]
        fn prop_unordered_query_matches_brute_force(
            mut blocks in arb_blocks(),
            qx in -400.0f32..400.0,
            qy in -400.0f32..400.0,
            qw in 0.0f32..300.0,
            qh in 0.0f32..300.0,
        ) {
            blocks.reverse();
            let query = Rect::new(qx, qy, qw, qh);
            let index = WorldIndex::unordered(blocks.clone());
            let fast: Vec<Rect> = index.query_range(&query).iter().map(|b| *b.rect()).collect();
            let slow: Vec<Rect> = brute_force(&blocks, &query).iter().map(|b| *b.rect()).collect();
            prop_assert_eq!(fast, slow);
        }

        #[test]
        fn prop_query_range_matches_brute_force(
            blocks in arb_blocks(),
            qx in -400.0f32..400.0,
            qy in -400.0f32..400.0,
            qw in 0.0f32..300.0,
            qh in 0.0f32..300.0,
        ) {
            let query = Rect::new(qx, qy, qw, qh);
            let index = WorldIndex::new(blocks.clone()).unwrap();

            let mut fast: Vec<Rect> = index.query_range(&query).iter().map(|b| *b.rect()).collect();
            let mut slow: Vec<Rect> = brute_force(&blocks, &query).iter().map(|b| *b.rect()).collect();
            let key = |a: &Rect, b: &Rect| corner_cmp(a.pos, b.pos)
                .then(a.size.x.total_cmp(&b.size.x))
                .then(a.size.y.total_cmp(&b.size.y));
            fast.sort_by(key);
            slow.sort_by(key);
            prop_assert_eq!(fast, slow);
        }
    }
}
