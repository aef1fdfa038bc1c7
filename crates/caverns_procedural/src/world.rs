//! # World
//!
//! Owns every chunk ever materialized and drives the chunk lifecycle.
//!
//! ## Render pipeline
//!
//! ```text
//!   viewport ──► chunk range ──► materialize / activate ──► evolution batch
//!                                                               │
//!   output grid ◄── read final grids ◄── finalize Inside ◄── N synchronized rounds
//! ```
//!
//! Activating a chunk also materializes its eight neighbours, because the
//! 3x3 evolution rule reads across chunk borders. Cells with no chunk at all
//! read as open.
//!
//! Each round computes the next grid of every batch member from the
//! previous round's committed values, then commits them all together. With
//! the `parallel` feature the compute half runs on rayon; the commit half
//! is the barrier between rounds.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::chunk::{Chunk, ChunkParams, ChunkState};
use crate::config::WorldConfig;
use crate::coords::{ChunkCoord, ChunkKey};
use crate::error::{WorldError, WorldResult};
use crate::grid::{Cell, Grid, OPEN};
use crate::viewport::Viewport;

/// An unbounded, lazily materialized cellular-automaton world.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    params: ChunkParams,
    chunks: HashMap<ChunkKey, Chunk>,
}

impl World {
    /// Creates an empty world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] for non-positive chunk sizes or
    /// threshold, or a rock percentage outside `[0, 1]`.
    pub fn new(config: WorldConfig) -> WorldResult<Self> {
        let params = ChunkParams::from_config(&config)?;
        info!(
            chunk_size_x = config.chunk_size_x,
            chunk_size_y = config.chunk_size_y,
            generations = config.generations,
            threshold = config.threshold,
            seed = config.world_seed,
            "world created"
        );
        Ok(Self {
            config,
            params,
            chunks: HashMap::new(),
        })
    }

    /// The configuration this world was built from.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Updates the rendering-only cell size. Never touches chunks.
    pub fn set_cell_size(&mut self, cell_size: u32) {
        self.config.cell_size = cell_size;
    }

    /// Updates the navigation-only movement factor. Never touches chunks.
    pub fn set_movement_factor(&mut self, movement_factor: i32) {
        self.config.movement_factor = movement_factor;
    }

    /// Number of materialized chunks.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Looks up a chunk by coordinate.
    #[inline]
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord.key())
    }

    /// Iterates every materialized chunk, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Lowest and highest materialized chunk coordinates, per axis.
    #[must_use]
    pub fn chunk_extent(&self) -> Option<(ChunkCoord, ChunkCoord)> {
        let mut coords = self.chunks.values().map(Chunk::coord);
        let first = coords.next()?;
        Some(coords.fold((first, first), |(lo, hi), c| {
            (
                ChunkCoord::new(lo.x.min(c.x), lo.y.min(c.y)),
                ChunkCoord::new(hi.x.max(c.x), hi.y.max(c.y)),
            )
        }))
    }

    /// The chunk containing world cell `(x, y)`.
    #[inline]
    #[must_use]
    pub const fn cell_to_chunk(&self, x: i32, y: i32) -> ChunkCoord {
        ChunkCoord::from_cell(x, y, self.params.size_x(), self.params.size_y())
    }

    /// The current value of world cell `(x, y)`.
    ///
    /// Cells of chunks that do not exist read as open. Existing chunks
    /// answer with their current grid whatever their state.
    ///
    /// # Errors
    ///
    /// Only on an internal addressing fault.
    pub fn cell(&self, x: i32, y: i32) -> WorldResult<Cell> {
        match self.chunk(self.cell_to_chunk(x, y)) {
            Some(chunk) => chunk.current_at(x, y),
            None => Ok(OPEN),
        }
    }

    /// The finalized value of world cell `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotFinalized`] if the owning chunk is missing or
    /// not yet final.
    pub fn final_cell(&self, x: i32, y: i32) -> WorldResult<Cell> {
        let coord = self.cell_to_chunk(x, y);
        self.chunk(coord)
            .ok_or(WorldError::NotFinalized {
                x: coord.x,
                y: coord.y,
            })?
            .final_at(x, y)
    }

    /// Renders a viewport, growing and evolving the world as needed.
    ///
    /// The result has `viewport.columns() x viewport.rows()` cells; `(i, j)`
    /// holds the final value of world cell `(x_min + i, y_min + j)`.
    /// Rendering already-final regions changes nothing.
    ///
    /// # Errors
    ///
    /// Only on an internal-contract violation.
    pub fn render(&mut self, viewport: &Viewport) -> WorldResult<Grid> {
        let lower = self.cell_to_chunk(viewport.x_min(), viewport.y_min());
        let upper = self.cell_to_chunk(viewport.x_max(), viewport.y_max());

        let batch = self.activate_range(lower, upper);
        self.run_evolution(&batch)?;
        self.finalize_inside()?;
        self.assemble(viewport)
    }

    /// Renders the configured square viewport anchored at `(x, y)`.
    ///
    /// # Errors
    ///
    /// See [`World::render`]; also fails if the window leaves the plane.
    pub fn render_at(&mut self, x: i32, y: i32) -> WorldResult<Grid> {
        let viewport = Viewport::anchored(x, y, self.config.viewport_size)?;
        self.render(&viewport)
    }

    /// Returns the chunk at `coord`, creating an Edge chunk if absent.
    fn materialize(&mut self, coord: ChunkCoord) -> &mut Chunk {
        let params = self.params;
        self.chunks
            .entry(coord.key())
            .or_insert_with(|| Chunk::new(coord, params))
    }

    /// Activates every Edge chunk in the range and returns the evolution
    /// batch: each newly activated chunk with its 3x3 neighbourhood, once.
    fn activate_range(&mut self, lower: ChunkCoord, upper: ChunkCoord) -> Vec<ChunkKey> {
        let mut batch = Vec::new();
        let mut seen = HashSet::new();

        for x in lower.x..=upper.x {
            for y in lower.y..=upper.y {
                let coord = ChunkCoord::new(x, y);
                if !self.materialize(coord).activate() {
                    continue;
                }
                for neighbour in coord.neighborhood() {
                    self.materialize(neighbour);
                    if seen.insert(neighbour.key()) {
                        batch.push(neighbour.key());
                    }
                }
            }
        }

        batch
    }

    /// Runs the synchronized multi-generation pass over a batch.
    fn run_evolution(&mut self, batch: &[ChunkKey]) -> WorldResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut rounds = 0;
        for key in batch {
            if let Some(chunk) = self.chunks.get_mut(key) {
                chunk.reseed();
                rounds = rounds.max(chunk.generations());
            }
        }
        debug!(batch = batch.len(), rounds, "evolving batch");

        for round in 0..rounds {
            let next = self.next_generation(batch, round)?;
            for (key, grid) in next {
                if let Some(chunk) = self.chunks.get_mut(&key) {
                    chunk.commit(grid);
                }
            }
        }
        Ok(())
    }

    /// Computes round `round` for every batch member still evolving.
    ///
    /// Reads only committed state, so members are independent.
    fn next_generation(
        &self,
        batch: &[ChunkKey],
        round: u32,
    ) -> WorldResult<Vec<(ChunkKey, Grid)>> {
        let evolve = |key: &ChunkKey| -> Option<WorldResult<(ChunkKey, Grid)>> {
            let chunk = self.chunks.get(key)?;
            (round < chunk.generations()).then(|| {
                chunk
                    .evolve_step(|x, y| self.cell(x, y))
                    .map(|grid| (*key, grid))
            })
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            batch.par_iter().filter_map(evolve).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            batch.iter().filter_map(evolve).collect()
        }
    }

    /// Finalizes every Inside chunk that is not final yet.
    fn finalize_inside(&mut self) -> WorldResult<()> {
        let mut finalized = 0usize;
        for chunk in self.chunks.values_mut() {
            if chunk.state() == ChunkState::Inside && !chunk.is_final() {
                chunk.finalize()?;
                finalized += 1;
            }
        }
        if finalized > 0 {
            debug!(finalized, total = self.chunks.len(), "finalized chunks");
        }
        Ok(())
    }

    /// Copies final cells of the viewport into a fresh grid.
    fn assemble(&self, viewport: &Viewport) -> WorldResult<Grid> {
        let x_min = i64::from(viewport.x_min());
        let y_min = i64::from(viewport.y_min());

        Grid::try_from_fn(viewport.columns(), viewport.rows(), |i, j| {
            let x = x_min + i as i64;
            let y = y_min + j as i64;
            match (i32::try_from(x), i32::try_from(y)) {
                (Ok(x), Ok(y)) => self.final_cell(x, y),
                _ => Err(WorldError::IndexOutOfBounds {
                    x,
                    y,
                    width: viewport.columns(),
                    height: viewport.rows(),
                }),
            }
        })
    }
}
