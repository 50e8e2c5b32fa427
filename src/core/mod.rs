#![allow(missing_docs)]

//! Core layout and decay types for nucleus diagrams.
//!
//! Everything here is a pure computation: nuclei are built once and every
//! later operation returns new values.

pub mod decay;
pub mod forces;
pub mod layout;
pub mod nucleus;
pub mod particle;

pub use decay::{BetaDecay, BetaMode, Decay, Emission, GammaDecay, NucleonPair};
pub use forces::{is_bound, EmForceCurve, ForceCurve, StrongForceCurve, MAX_SAMPLES};
pub use layout::{generate_ring_pattern, ring_radius, ring_sizes, scatter_pattern, Ring};
pub use nucleus::{Nucleus, NucleusParams};
pub use particle::{ParticleKind, PositionedNucleon};
