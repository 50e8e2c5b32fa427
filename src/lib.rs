//! Deterministic nucleus layouts and decay partitions for nuclear-physics
//! animations.
//!
//! The crate computes geometry only: where each nucleon of a nucleus diagram
//! sits, how a nucleus splits into daughters, and which particle becomes
//! which so a renderer can animate the transition. Drawing is left to the
//! caller, usually a Python scene script using the `python` feature.

pub mod config;
pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::core::{Decay, Nucleus, NucleusParams, ParticleKind, PositionedNucleon};
pub use crate::error::{Error, Result};
