//! # Chunk System
//!
//! The world is organized into fixed-size chunks, the unit of lazy
//! materialization and evolution.
//!
//! ## Lifecycle
//!
//! ```text
//!   created ──► Edge ──activate──► Inside ──evolve × generations──► finalize
//!   (noise)                                                        (final grid)
//! ```
//!
//! A chunk keeps three grids:
//!
//! - `noise`: seeded once at construction, never modified
//! - `current`: the working grid, rewritten once per committed generation
//! - `final`: snapshot of `current` taken at finalization, immutable afterwards
//!
//! Evolution is double buffered: [`Chunk::evolve_step`] returns the next
//! grid without touching `current`, and [`Chunk::commit`] installs it once
//! every chunk in the batch has computed its own.

use rand::Rng;
use tracing::trace;

use crate::config::WorldConfig;
use crate::coords::ChunkCoord;
use crate::error::{WorldError, WorldResult};
use crate::grid::{Cell, Grid, OPEN, ROCK};
use crate::seed::WorldSeed;

/// Lifecycle state of a chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChunkState {
    /// Not yet selected for evolution; holds seeded noise only.
    #[default]
    Edge,
    /// Selected for evolution; will be evolved and finalized.
    Inside,
}

/// Parameters copied into every chunk at creation.
///
/// Later changes to the world's configuration never reach existing chunks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkParams {
    size_x: i32,
    size_y: i32,
    generations: u32,
    threshold: u32,
    rock_percentage: f64,
    seed: WorldSeed,
}

impl ChunkParams {
    /// Extracts chunk parameters from a world configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] if the configuration is invalid.
    pub fn from_config(config: &WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        let threshold = u32::try_from(config.threshold)
            .map_err(|_| WorldError::InvalidConfig("threshold out of range".to_string()))?;
        Ok(Self {
            size_x: config.chunk_size_x,
            size_y: config.chunk_size_y,
            generations: config.generations,
            threshold,
            rock_percentage: config.rock_percentage,
            seed: config.seed(),
        })
    }

    /// Chunk width in cells.
    #[inline]
    #[must_use]
    pub const fn size_x(&self) -> i32 {
        self.size_x
    }

    /// Chunk height in cells.
    #[inline]
    #[must_use]
    pub const fn size_y(&self) -> i32 {
        self.size_y
    }

    /// Evolution rounds.
    #[inline]
    #[must_use]
    pub const fn generations(&self) -> u32 {
        self.generations
    }

    /// Neighbourhood divisor.
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Rock probability.
    #[inline]
    #[must_use]
    pub const fn rock_percentage(&self) -> f64 {
        self.rock_percentage
    }

    /// World seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Chunk dimensions as grid extents.
    #[inline]
    fn extents(&self) -> (usize, usize) {
        // Sizes are validated positive.
        (self.size_x.unsigned_abs() as usize, self.size_y.unsigned_abs() as usize)
    }
}

/// Generates the seeded noise grid for a chunk.
///
/// Draws one value per cell from the chunk's own generator, X outer and Y
/// inner: `0` with probability `rock_percentage`, else `1`.
#[must_use]
pub fn generate_noise(coord: ChunkCoord, params: &ChunkParams) -> Grid {
    let (width, height) = params.extents();
    let mut rng = params.seed.chunk_rng(coord);
    Grid::from_fn(width, height, |_, _| {
        if rng.gen::<f64>() < params.rock_percentage {
            ROCK
        } else {
            OPEN
        }
    })
}

/// One chunk of cells.
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    params: ChunkParams,
    current: Grid,
    noise: Grid,
    final_grid: Option<Grid>,
    state: ChunkState,
}

impl Chunk {
    /// Creates an Edge chunk whose current grid is its seeded noise.
    #[must_use]
    pub fn new(coord: ChunkCoord, params: ChunkParams) -> Self {
        let noise = generate_noise(coord, &params);
        trace!(chunk = %coord, "created chunk");
        Self {
            coord,
            params,
            current: noise.clone(),
            noise,
            final_grid: None,
            state: ChunkState::Edge,
        }
    }

    /// Chunk position in the world.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Parameters captured at creation.
    #[inline]
    #[must_use]
    pub const fn params(&self) -> &ChunkParams {
        &self.params
    }

    /// Evolution rounds this chunk receives.
    #[inline]
    #[must_use]
    pub const fn generations(&self) -> u32 {
        self.params.generations
    }

    /// Lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ChunkState {
        self.state
    }

    /// True once the final grid has been captured.
    #[inline]
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.final_grid.is_some()
    }

    /// The noise captured at construction.
    #[inline]
    #[must_use]
    pub const fn noise(&self) -> &Grid {
        &self.noise
    }

    /// The working grid.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> &Grid {
        &self.current
    }

    /// The final snapshot, if finalized.
    #[inline]
    #[must_use]
    pub const fn final_grid(&self) -> Option<&Grid> {
        self.final_grid.as_ref()
    }

    /// Regenerates this chunk's seeded noise.
    ///
    /// Always identical to [`Chunk::noise`].
    #[must_use]
    pub fn generate_noise_grid(&self) -> Grid {
        generate_noise(self.coord, &self.params)
    }

    /// Converts a world cell inside this chunk to local indices.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::IndexOutOfBounds`] if the cell lies outside
    /// this chunk's footprint.
    pub fn local_index(&self, world_x: i32, world_y: i32) -> WorldResult<(usize, usize)> {
        let (origin_x, origin_y) = self.coord.origin(self.params.size_x, self.params.size_y);
        let local_x = i64::from(world_x) - origin_x;
        let local_y = i64::from(world_y) - origin_y;
        let (width, height) = self.params.extents();

        match (usize::try_from(local_x), usize::try_from(local_y)) {
            (Ok(i), Ok(j)) if i < width && j < height => Ok((i, j)),
            _ => Err(WorldError::IndexOutOfBounds {
                x: local_x,
                y: local_y,
                width,
                height,
            }),
        }
    }

    /// Reads the current grid at local `(i, j)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::IndexOutOfBounds`] outside the chunk.
    #[inline]
    pub fn read_current(&self, i: usize, j: usize) -> WorldResult<Cell> {
        self.current.get(i, j)
    }

    /// Reads the final grid at local `(i, j)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotFinalized`] before finalization and
    /// [`WorldError::IndexOutOfBounds`] outside the chunk.
    #[inline]
    pub fn read_final(&self, i: usize, j: usize) -> WorldResult<Cell> {
        self.final_grid
            .as_ref()
            .ok_or(WorldError::NotFinalized {
                x: self.coord.x,
                y: self.coord.y,
            })?
            .get(i, j)
    }

    /// Reads the current grid at a world coordinate inside this chunk.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::IndexOutOfBounds`] outside the chunk.
    pub fn current_at(&self, world_x: i32, world_y: i32) -> WorldResult<Cell> {
        let (i, j) = self.local_index(world_x, world_y)?;
        self.read_current(i, j)
    }

    /// Reads the final grid at a world coordinate inside this chunk.
    ///
    /// # Errors
    ///
    /// See [`Chunk::read_final`] and [`Chunk::local_index`].
    pub fn final_at(&self, world_x: i32, world_y: i32) -> WorldResult<Cell> {
        let (i, j) = self.local_index(world_x, world_y)?;
        self.read_final(i, j)
    }

    /// Computes the next generation without modifying this chunk.
    ///
    /// Each cell becomes `sum / threshold` (integer division), where `sum`
    /// adds `lookup` over the 3x3 world neighbourhood including the cell
    /// itself. Neighbours outside the addressable plane read as open.
    ///
    /// # Errors
    ///
    /// Propagates any error from `lookup`.
    pub fn evolve_step<F>(&self, lookup: F) -> WorldResult<Grid>
    where
        F: Fn(i32, i32) -> WorldResult<Cell>,
    {
        let (origin_x, origin_y) = self.coord.origin(self.params.size_x, self.params.size_y);
        let (width, height) = self.params.extents();
        let threshold = u64::from(self.params.threshold);

        Grid::try_from_fn(width, height, |i, j| {
            let world_x = origin_x + i as i64;
            let world_y = origin_y + j as i64;

            let mut sum = 0u64;
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let cell = match (i32::try_from(world_x + dx), i32::try_from(world_y + dy)) {
                        (Ok(x), Ok(y)) => lookup(x, y)?,
                        _ => OPEN,
                    };
                    sum += u64::from(cell);
                }
            }

            Ok(Cell::try_from(sum / threshold).unwrap_or(Cell::MAX))
        })
    }

    /// Installs a grid computed by [`Chunk::evolve_step`].
    pub fn commit(&mut self, next: Grid) {
        debug_assert_eq!(
            (next.width(), next.height()),
            (self.current.width(), self.current.height()),
            "committed grid must match chunk dimensions"
        );
        self.current = next;
    }

    /// Resets the working grid to the seeded noise.
    pub fn reseed(&mut self) {
        self.current = self.noise.clone();
    }

    /// Promotes an Edge chunk to Inside.
    ///
    /// Returns `true` if the state changed.
    pub fn activate(&mut self) -> bool {
        if self.state == ChunkState::Edge {
            self.state = ChunkState::Inside;
            true
        } else {
            false
        }
    }

    /// Snapshots the current grid as the final grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AlreadyFinalized`] on a second call; the
    /// existing snapshot is left untouched.
    pub fn finalize(&mut self) -> WorldResult<()> {
        if self.is_final() {
            return Err(WorldError::AlreadyFinalized {
                x: self.coord.x,
                y: self.coord.y,
            });
        }
        self.final_grid = Some(self.current.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(config: &WorldConfig) -> ChunkParams {
        ChunkParams::from_config(config).unwrap()
    }

    fn small() -> ChunkParams {
        params(&WorldConfig::default().with_chunk_size(4, 4).with_seed(1))
    }

    #[test]
    fn test_noise_determinism() {
        let p = params(&WorldConfig::default().with_chunk_size(8, 8).with_seed(42));
        let coord = ChunkCoord::new(5, -10);

        let a = Chunk::new(coord, p);
        let b = Chunk::new(coord, p);
        assert_eq!(a.noise(), b.noise());
        assert_eq!(a.generate_noise_grid(), a.generate_noise_grid());
        assert_eq!(&a.generate_noise_grid(), a.noise());
    }

    #[test]
    fn test_noise_differs_between_chunks() {
        let p = params(&WorldConfig::default().with_chunk_size(16, 16));
        let a = generate_noise(ChunkCoord::new(0, 0), &p);
        let b = generate_noise(ChunkCoord::new(0, 1), &p);
        assert_ne!(a, b);
    }

    #[test]
    fn test_noise_respects_rock_percentage_extremes() {
        let open = params(&WorldConfig::default().with_rock_percentage(0.0));
        let rock = params(&WorldConfig::default().with_rock_percentage(1.0));
        let coord = ChunkCoord::new(3, 3);

        let grid = generate_noise(coord, &open);
        assert_eq!(grid.count(OPEN), grid.as_slice().len());

        let grid = generate_noise(coord, &rock);
        assert_eq!(grid.count(ROCK), grid.as_slice().len());
    }

    #[test]
    fn test_noise_only_holds_binary_values() {
        let p = params(&WorldConfig::default().with_chunk_size(16, 16));
        let grid = generate_noise(ChunkCoord::new(-2, 7), &p);
        assert!(grid.as_slice().iter().all(|&c| c == ROCK || c == OPEN));
        assert!(grid.count(ROCK) > 0 && grid.count(OPEN) > 0);
    }

    #[test]
    fn test_new_chunk_starts_as_edge_noise() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0), small());
        assert_eq!(chunk.state(), ChunkState::Edge);
        assert!(!chunk.is_final());
        assert_eq!(chunk.current(), chunk.noise());
        assert!(chunk.final_grid().is_none());
    }

    #[test]
    fn test_local_index() {
        let chunk = Chunk::new(ChunkCoord::new(-1, 2), small());
        assert_eq!(chunk.local_index(-4, 8), Ok((0, 0)));
        assert_eq!(chunk.local_index(-1, 11), Ok((3, 3)));
        assert!(matches!(
            chunk.local_index(0, 8),
            Err(WorldError::IndexOutOfBounds { x: 4, y: 0, .. })
        ));
        assert!(chunk.local_index(-5, 8).is_err());
        assert!(chunk.local_index(-4, 12).is_err());
    }

    #[test]
    fn test_evolve_step_sums_neighbourhood() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0), small());
        // Every neighbour open: 9 / 5 = 1.
        let next = chunk.evolve_step(|_, _| Ok(OPEN)).unwrap();
        assert_eq!(next.count(1), 16);

        // Every neighbour rock: 0.
        let next = chunk.evolve_step(|_, _| Ok(ROCK)).unwrap();
        assert_eq!(next.count(0), 16);
    }

    #[test]
    fn test_evolve_step_reads_world_coordinates() {
        let chunk = Chunk::new(ChunkCoord::new(1, 0), small());
        // Open only at world x == 4 (the chunk's left column).
        let next = chunk.evolve_step(|x, _| Ok(Cell::from(x == 4) * 5)).unwrap();
        for j in 0..4 {
            // Columns i=0 and i=1 see three cells of x == 4, each worth 5: 15 / 5 = 3.
            assert_eq!(next.get(0, j), Ok(3));
            assert_eq!(next.get(1, j), Ok(3));
            assert_eq!(next.get(2, j), Ok(0));
        }
    }

    #[test]
    fn test_evolve_step_preserves_literal_division() {
        let p = params(&WorldConfig::default().with_chunk_size(2, 2).with_threshold(2));
        let chunk = Chunk::new(ChunkCoord::new(0, 0), p);
        let next = chunk.evolve_step(|_, _| Ok(OPEN)).unwrap();
        assert!(next.as_slice().iter().all(|&c| c == 4));
    }

    #[test]
    fn test_evolve_step_does_not_mutate() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), small());
        let before = chunk.current().clone();
        let next = chunk.evolve_step(|_, _| Ok(ROCK)).unwrap();
        assert_eq!(chunk.current(), &before);

        chunk.commit(next.clone());
        assert_eq!(chunk.current(), &next);

        chunk.reseed();
        assert_eq!(chunk.current(), chunk.noise());
    }

    #[test]
    fn test_evolve_step_propagates_lookup_errors() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0), small());
        let result = chunk.evolve_step(|_, _| {
            Err(WorldError::NotFinalized { x: 9, y: 9 })
        });
        assert_eq!(result, Err(WorldError::NotFinalized { x: 9, y: 9 }));
    }

    #[test]
    fn test_activate_is_one_way() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), small());
        assert!(chunk.activate());
        assert_eq!(chunk.state(), ChunkState::Inside);
        assert!(!chunk.activate());
        assert_eq!(chunk.state(), ChunkState::Inside);
    }

    #[test]
    fn test_final_reads_require_finalization() {
        let mut chunk = Chunk::new(ChunkCoord::new(2, 2), small());
        assert_eq!(chunk.read_final(0, 0), Err(WorldError::NotFinalized { x: 2, y: 2 }));

        chunk.finalize().unwrap();
        assert!(chunk.is_final());
        assert_eq!(chunk.final_grid(), Some(chunk.current()));
        assert_eq!(chunk.read_final(0, 0), chunk.read_current(0, 0));
        assert_eq!(chunk.final_at(8, 8), chunk.read_current(0, 0));
    }

    #[test]
    fn test_double_finalize_is_state_error() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), small());
        chunk.finalize().unwrap();
        let snapshot = chunk.final_grid().cloned();

        chunk.commit(Grid::filled(4, 4, 7));
        assert_eq!(chunk.finalize(), Err(WorldError::AlreadyFinalized { x: 0, y: 0 }));
        assert_eq!(chunk.final_grid().cloned(), snapshot);
    }
}
