use std::fmt;

/// Fixed spatial dimension of a nucleus diagram (2D).
pub const DIM: usize = 2;

/// Inclusive upper bound of the random z-order drawn for shuffled nucleons.
pub const MAX_Z_INDEX: i32 = 10;

/// Kind of a particle appearing in a nucleus diagram.
///
/// Kinds are plain values: a beta decay produces a new
/// [`PositionedNucleon`] with a different kind rather than mutating one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Proton,
    Neutron,
    Electron,
    Positron,
    Neutrino,
}

impl ParticleKind {
    /// Electric charge in units of e.
    #[inline]
    pub fn charge(self) -> i8 {
        match self {
            ParticleKind::Proton | ParticleKind::Positron => 1,
            ParticleKind::Neutron | ParticleKind::Neutrino => 0,
            ParticleKind::Electron => -1,
        }
    }

    /// Only protons and neutrons take part in ring layouts and decay quotas.
    #[inline]
    pub fn is_nucleon(self) -> bool {
        matches!(self, ParticleKind::Proton | ParticleKind::Neutron)
    }

    /// Drawn radius relative to the nucleon size multiplier.
    #[inline]
    pub fn drawn_size(self) -> f64 {
        if self.is_nucleon() {
            1.0
        } else {
            0.5
        }
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParticleKind::Proton => "proton",
            ParticleKind::Neutron => "neutron",
            ParticleKind::Electron => "electron",
            ParticleKind::Positron => "positron",
            ParticleKind::Neutrino => "neutrino",
        };
        f.write_str(name)
    }
}

/// A typed particle placed in a nucleus.
///
/// Fields:
/// - `id`: stable identifier, assigned when the particle is first created and
///   carried through every re-layout and decay
/// - `kind`: particle kind
/// - `position`: (x, y) in the nucleus frame
/// - `z_index`: draw order hint for the renderer, carried through unchanged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedNucleon {
    /// Stable particle identifier.
    pub id: u32,
    /// Particle kind.
    pub kind: ParticleKind,
    /// Position (x, y).
    pub position: [f64; DIM],
    /// Render overlap order.
    pub z_index: i32,
}

impl PositionedNucleon {
    pub fn new(id: u32, kind: ParticleKind, position: [f64; DIM], z_index: i32) -> Self {
        Self {
            id,
            kind,
            position,
            z_index,
        }
    }

    /// The same particle converted to another kind.
    #[inline]
    pub fn with_kind(self, kind: ParticleKind) -> Self {
        Self { kind, ..self }
    }

    /// The same particle at another position.
    #[inline]
    pub fn with_position(self, position: [f64; DIM]) -> Self {
        Self { position, ..self }
    }

    /// Squared Euclidean distance from this particle to `point`.
    #[inline]
    pub fn distance_sq(&self, point: [f64; DIM]) -> f64 {
        distance_sq(self.position, point)
    }
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn distance_sq(a: [f64; DIM], b: [f64; DIM]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
