//! # CAVERNS
//!
//! The exploration crate: a camera over a procedural cave world, driven by
//! navigation input and live property edits.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  renderer / input / property editor  (external)              │
//! └──────────────┬───────────────────────────────┬───────────────┘
//!                │ step / apply / reset          │ render
//!                ▼                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Explorer        location, reset policy                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  caverns_procedural::World   chunks, evolution, final grids  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `explorer`: Session state and property-edit policy

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod explorer;

// Re-export the world crate
pub use caverns_procedural as procedural;

pub use explorer::{Direction, Explorer, PropertyEdit};
