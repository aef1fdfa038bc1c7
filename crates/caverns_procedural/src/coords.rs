//! # Coordinate Mapping
//!
//! Pure conversions between world cell coordinates and chunk coordinates.
//!
//! World cells are addressed by `(x, y)` integers on an unbounded plane.
//! Chunk `(cx, cy)` covers the half-open block
//! `[cx * size_x, (cx + 1) * size_x) x [cy * size_y, (cy + 1) * size_y)`,
//! so the mapping is true floor division, including for negative cells.

use std::fmt;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not cells).
    pub x: i32,
    /// Y coordinate (in chunks, not cells).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts world cell coordinates to the chunk that contains them.
    ///
    /// Chunk sizes must be positive; `World` guarantees this at construction.
    #[inline]
    #[must_use]
    pub const fn from_cell(cell_x: i32, cell_y: i32, size_x: i32, size_y: i32) -> Self {
        Self {
            x: cell_x.div_euclid(size_x),
            y: cell_y.div_euclid(size_y),
        }
    }

    /// Returns the world coordinates of the chunk's lower corner.
    #[inline]
    #[must_use]
    pub const fn origin(self, size_x: i32, size_y: i32) -> (i64, i64) {
        (self.x as i64 * size_x as i64, self.y as i64 * size_y as i64)
    }

    /// Returns the collision-free map key for this coordinate.
    #[inline]
    #[must_use]
    pub const fn key(self) -> ChunkKey {
        ChunkKey::new(self.x, self.y)
    }

    /// Iterates the 3x3 block of chunks centred on this one, row by row.
    ///
    /// Includes `self`. Neighbours past the edge of the `i32` plane are
    /// skipped, so edge chunks yield fewer than nine coordinates.
    pub fn neighborhood(self) -> impl Iterator<Item = ChunkCoord> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).filter_map(move |dy| {
                Some(ChunkCoord::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
            })
        })
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Converts a world cell coordinate to the chunk that contains it.
#[inline]
#[must_use]
pub const fn cell_to_chunk(cell_x: i32, cell_y: i32, size_x: i32, size_y: i32) -> ChunkCoord {
    ChunkCoord::from_cell(cell_x, cell_y, size_x, size_y)
}

/// Identity key for a chunk coordinate.
///
/// Packs both 32-bit coordinates into one 64-bit word: X in the high half,
/// Y in the low half. Every coordinate pair has exactly one key and the
/// packing is reversible, so distinct chunks never share a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey(u64);

impl ChunkKey {
    /// Encodes a chunk coordinate pair.
    #[inline]
    #[must_use]
    pub const fn new(chunk_x: i32, chunk_y: i32) -> Self {
        Self(((chunk_x as u32 as u64) << 32) | chunk_y as u32 as u64)
    }

    /// Returns the raw packed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

}

impl From<ChunkCoord> for ChunkKey {
    fn from(coord: ChunkCoord) -> Self {
        coord.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_cell_to_chunk_floor_division() {
        let at = |v| cell_to_chunk(v, v, 8, 8);
        assert_eq!(at(-1), ChunkCoord::new(-1, -1));
        assert_eq!(at(0), ChunkCoord::new(0, 0));
        assert_eq!(at(7), ChunkCoord::new(0, 0));
        assert_eq!(at(8), ChunkCoord::new(1, 1));
        assert_eq!(at(-8), ChunkCoord::new(-1, -1));
        assert_eq!(at(-9), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn test_cell_to_chunk_partitions_line() {
        // Blocks are contiguous, exactly `size` long, and start on multiples of `size`.
        for size in [1, 3, 8, 30] {
            let mut run = 0;
            let mut current = ChunkCoord::from_cell(-200, 0, size, 1).x;
            for x in -200..200 {
                let chunk = ChunkCoord::from_cell(x, 0, size, 1).x;
                if chunk == current {
                    run += 1;
                } else {
                    assert_eq!(chunk, current + 1, "blocks must be contiguous");
                    assert_eq!(x.rem_euclid(size), 0, "block must start on a multiple");
                    current = chunk;
                    run = 1;
                }
                assert!(run <= size);
            }
        }
    }

    #[test]
    fn test_cell_to_chunk_rectangular_sizes() {
        assert_eq!(ChunkCoord::from_cell(5, 5, 4, 6), ChunkCoord::new(1, 0));
        assert_eq!(ChunkCoord::from_cell(-5, -7, 4, 6), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn test_origin_round_trips_through_from_cell() {
        let coord = ChunkCoord::new(-3, 7);
        let (ox, oy) = coord.origin(8, 5);
        assert_eq!((ox, oy), (-24, 35));
        assert_eq!(ChunkCoord::from_cell(ox as i32, oy as i32, 8, 5), coord);
        assert_eq!(ChunkCoord::from_cell(ox as i32 + 7, oy as i32 + 4, 8, 5), coord);
    }

    #[test]
    fn test_key_injective_for_random_pairs() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut coords = HashSet::new();
        while coords.len() < 1000 {
            coords.insert(ChunkCoord::new(rng.gen(), rng.gen()));
        }

        let keys: HashSet<ChunkKey> = coords.iter().map(|c| c.key()).collect();
        assert_eq!(keys.len(), coords.len());
    }

    #[test]
    fn test_key_separates_swapped_and_signed_pairs() {
        let samples = [
            (1, 2),
            (2, 1),
            (-1, 2),
            (1, -2),
            (0, -1),
            (-1, 0),
            (i32::MIN, i32::MAX),
        ];
        let keys: HashSet<ChunkKey> = samples.iter().map(|&(x, y)| ChunkKey::new(x, y)).collect();
        assert_eq!(keys.len(), samples.len());
    }

    #[test]
    fn test_key_packs_halves() {
        assert_eq!(ChunkKey::new(0, 0).value(), 0);
        assert_eq!(ChunkKey::new(1, 0).value(), 1 << 32);
        assert_eq!(ChunkKey::new(0, -1).value(), u64::from(u32::MAX));
        assert_eq!(ChunkKey::new(-1, 0).value(), u64::from(u32::MAX) << 32);
    }

    #[test]
    fn test_neighborhood_is_three_by_three() {
        let around: HashSet<ChunkCoord> = ChunkCoord::new(2, -4).neighborhood().collect();
        assert_eq!(around.len(), 9);
        assert!(around.contains(&ChunkCoord::new(2, -4)));
        assert!(around.contains(&ChunkCoord::new(1, -5)));
        assert!(around.contains(&ChunkCoord::new(3, -3)));
    }

    #[test]
    fn test_neighborhood_stops_at_plane_edge() {
        let corner: HashSet<ChunkCoord> =
            ChunkCoord::new(i32::MAX, i32::MIN).neighborhood().collect();
        assert_eq!(corner.len(), 4);
        assert!(corner.contains(&ChunkCoord::new(i32::MAX - 1, i32::MIN + 1)));

        let side: Vec<ChunkCoord> = ChunkCoord::new(i32::MIN, 0).neighborhood().collect();
        assert_eq!(side.len(), 6);
        assert!(side.iter().all(|c| c.x <= i32::MIN + 1));
    }
}
