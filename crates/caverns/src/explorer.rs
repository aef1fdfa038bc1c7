//! # Explorer Session
//!
//! A camera location over a live world, plus the property-edit policy:
//!
//! - `CellSize` and `MovementFactor` only affect drawing and navigation, so
//!   they update the live world in place
//! - every other edit discards the world and rebuilds it from scratch, with
//!   the camera back at the origin
//!
//! Edits are validated before anything changes; a rejected edit leaves the
//! session exactly as it was.

use caverns_procedural::{Grid, Viewport, World, WorldConfig, WorldResult};
use tracing::{debug, info};

/// Navigation direction. Up is toward negative Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward negative X.
    Left,
    /// Toward positive X.
    Right,
    /// Toward negative Y.
    Up,
    /// Toward positive Y.
    Down,
}

impl Direction {
    /// Unit offset of this direction.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }
}

/// A single property change coming from an editor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyEdit {
    /// Pixels per cell.
    CellSize(u32),
    /// Cells per navigation step.
    MovementFactor(i32),
    /// Side of the square viewport.
    ViewportSize(i32),
    /// Side of the square chunks.
    ChunkSize(i32),
    /// Rock probability in `[0, 1]`.
    RockPercentage(f64),
    /// Evolution rounds per chunk.
    Generations(u32),
    /// Neighbourhood divisor.
    Threshold(i32),
    /// World seed.
    WorldSeed(u64),
}

impl PropertyEdit {
    /// True if applying this edit rebuilds the world.
    #[must_use]
    pub const fn resets_world(&self) -> bool {
        !matches!(self, Self::CellSize(_) | Self::MovementFactor(_))
    }

    /// Writes the edit into a configuration.
    pub fn apply_to(&self, config: &mut WorldConfig) {
        match *self {
            Self::CellSize(v) => config.cell_size = v,
            Self::MovementFactor(v) => config.movement_factor = v,
            Self::ViewportSize(v) => config.viewport_size = v,
            Self::ChunkSize(v) => {
                config.chunk_size_x = v;
                config.chunk_size_y = v;
            }
            Self::RockPercentage(v) => config.rock_percentage = v,
            Self::Generations(v) => config.generations = v,
            Self::Threshold(v) => config.threshold = v,
            Self::WorldSeed(v) => config.world_seed = v,
        }
    }
}

/// An exploration session: one world and a camera over it.
#[derive(Debug)]
pub struct Explorer {
    world: World,
    location: (i32, i32),
}

impl Explorer {
    /// Starts a session at the origin of a fresh world.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::InvalidConfig` for an invalid configuration.
    pub fn new(config: WorldConfig) -> WorldResult<Self> {
        Ok(Self {
            world: World::new(config)?,
            location: (0, 0),
        })
    }

    /// The live world.
    #[inline]
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The live configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        self.world.config()
    }

    /// Lower corner of the viewport, in world cells.
    #[inline]
    #[must_use]
    pub const fn location(&self) -> (i32, i32) {
        self.location
    }

    /// Moves the camera to an absolute location.
    pub fn set_location(&mut self, x: i32, y: i32) {
        self.location = (x, y);
    }

    /// Moves the camera one step of `movement_factor` cells.
    pub fn step(&mut self, direction: Direction) {
        let (dx, dy) = direction.offset();
        let stride = self.config().movement_factor;
        self.location = (
            self.location.0.saturating_add(dx.saturating_mul(stride)),
            self.location.1.saturating_add(dy.saturating_mul(stride)),
        );
    }

    /// The viewport at the current location.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::InvalidViewport` if the window leaves the plane.
    pub fn viewport(&self) -> WorldResult<Viewport> {
        Viewport::anchored(self.location.0, self.location.1, self.config().viewport_size)
    }

    /// Renders the viewport at the current location.
    ///
    /// # Errors
    ///
    /// See [`Explorer::viewport`] and [`World::render`].
    pub fn render(&mut self) -> WorldResult<Grid> {
        let viewport = self.viewport()?;
        self.world.render(&viewport)
    }

    /// Discards the world, rebuilds it from the current configuration and
    /// returns the camera to the origin.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::InvalidConfig` for an invalid configuration.
    pub fn reset(&mut self) -> WorldResult<()> {
        self.rebuild(self.config().clone())
    }

    /// Applies a property edit.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::InvalidConfig` if the edited configuration is
    /// invalid; the session is left unchanged.
    pub fn apply(&mut self, edit: PropertyEdit) -> WorldResult<()> {
        let mut next = self.config().clone();
        edit.apply_to(&mut next);
        next.validate()?;

        if edit.resets_world() {
            return self.rebuild(next);
        }

        debug!(?edit, "live property edit");
        self.world.set_cell_size(next.cell_size);
        self.world.set_movement_factor(next.movement_factor);
        Ok(())
    }

    fn rebuild(&mut self, config: WorldConfig) -> WorldResult<()> {
        let world = World::new(config)?;
        info!(discarded_chunks = self.world.chunk_count(), "world reset");
        self.world = world;
        self.location = (0, 0);
        Ok(())
    }
}
