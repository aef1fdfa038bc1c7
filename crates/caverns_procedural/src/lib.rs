//! # CAVERNS Procedural Generation
//!
//! Deterministic, lazily grown cave worlds built from a chunked cellular
//! automaton.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and parameters always produce the same world
//! 2. **Chunked**: The world is generated in fixed-size chunks
//! 3. **Lazy**: Chunks exist only once a viewport (or a neighbour) needs them
//! 4. **Monotonic**: Chunks only move forward, Edge to Inside to final
//!
//! ## Core Components
//!
//! - `ChunkCoord` / `ChunkKey`: cell-to-chunk mapping and identity keys
//! - `WorldSeed`: per-chunk generator seeding
//! - `Chunk`: seeded noise, double-buffered evolution, final snapshot
//! - `World`: materialization, synchronized evolution, viewport rendering
//! - `Viewport`: inclusive cell windows
//!
//! ## Example
//!
//! ```rust
//! use caverns_procedural::{Viewport, World, WorldConfig};
//!
//! let config = WorldConfig::default()
//!     .with_chunk_size(4, 4)
//!     .with_generations(0)
//!     .with_rock_percentage(0.0)
//!     .with_seed(1);
//! let mut world = World::new(config)?;
//!
//! let grid = world.render(&Viewport::new(0, 0, 3, 3)?)?;
//! assert_eq!(grid.count(1), 16);
//! assert_eq!(world.chunk_count(), 9);
//! # Ok::<(), caverns_procedural::WorldError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod config;
pub mod coords;
pub mod error;
pub mod grid;
pub mod seed;
pub mod viewport;
pub mod world;

pub use chunk::{generate_noise, Chunk, ChunkParams, ChunkState};
pub use config::WorldConfig;
pub use coords::{cell_to_chunk, ChunkCoord, ChunkKey};
pub use error::{WorldError, WorldResult};
pub use grid::{Cell, Grid, OPEN, ROCK};
pub use seed::WorldSeed;
pub use viewport::Viewport;
pub use world::World;
