use std::collections::HashSet;
use std::iter;

use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Deserialize;

use crate::core::layout::{generate_ring_pattern, scatter_pattern};
use crate::core::particle::{ParticleKind, PositionedNucleon, DIM, MAX_Z_INDEX};
use crate::error::{Error, Result};

/// Parameters a nucleus was generated with; daughters of a decay reuse them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NucleusParams {
    /// Target arc distance between neighbouring nucleons on a ring.
    pub nucleon_separation: f64,
    /// How many more nucleons each ring holds than the one inside it.
    pub particle_num_difference: u32,
    /// Drawn size of a nucleon, passed through to the renderer.
    pub nucleon_size_multiplier: f64,
}

impl Default for NucleusParams {
    fn default() -> Self {
        Self {
            nucleon_separation: 1.0,
            particle_num_difference: 4,
            nucleon_size_multiplier: 0.6,
        }
    }
}

impl NucleusParams {
    pub fn new(
        nucleon_separation: f64,
        particle_num_difference: u32,
        nucleon_size_multiplier: f64,
    ) -> Result<Self> {
        let params = Self {
            nucleon_separation,
            particle_num_difference,
            nucleon_size_multiplier,
        };
        params.validate()?;
        Ok(params)
    }

    /// Errors:
    /// - `Error::InvalidParam` if the separation or size multiplier is not finite and > 0,
    ///   or the ring growth is 0.
    pub fn validate(&self) -> Result<()> {
        if !self.nucleon_separation.is_finite() || self.nucleon_separation <= 0.0 {
            return Err(Error::InvalidParam(
                "nucleon_separation must be finite and > 0".into(),
            ));
        }
        if self.particle_num_difference == 0 {
            return Err(Error::InvalidParam(
                "particle_num_difference must be > 0".into(),
            ));
        }
        if !self.nucleon_size_multiplier.is_finite() || self.nucleon_size_multiplier <= 0.0 {
            return Err(Error::InvalidParam(
                "nucleon_size_multiplier must be finite and > 0".into(),
            ));
        }
        Ok(())
    }

    #[inline]
    fn ring_growth(&self) -> usize {
        self.particle_num_difference as usize
    }
}

#[derive(Debug, Clone)]
struct Layout {
    layers: Vec<Vec<PositionedNucleon>>,
    params: NucleusParams,
    center: [f64; DIM],
}

/// A nucleus diagram: nucleons grouped into rings in emission order.
///
/// A `Nucleus` starts empty and must be initialized exactly once, either from
/// proton/neutron counts or from an existing list of nucleons. Every accessor
/// returns `Error::Uninitialized` until then. After initialization the value
/// is read-only; translation and decay produce new nuclei.
#[derive(Debug, Clone, Default)]
pub struct Nucleus {
    state: Option<Layout>,
}

impl Nucleus {
    /// An empty, uninitialized nucleus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a nucleus from counts in one step. See [`Nucleus::init_from_counts`].
    pub fn from_counts(
        protons: usize,
        neutrons: usize,
        params: NucleusParams,
        shuffle: bool,
        seed: u64,
    ) -> Result<Self> {
        let mut nucleus = Self::new();
        nucleus.init_from_counts(protons, neutrons, params, shuffle, seed)?;
        Ok(nucleus)
    }

    /// Build a nucleus from existing nucleons in one step. See [`Nucleus::init_from_nucleons`].
    pub fn from_nucleons(
        nucleons: &[PositionedNucleon],
        params: NucleusParams,
        shuffle: bool,
        seed: u64,
    ) -> Result<Self> {
        let mut nucleus = Self::new();
        nucleus.init_from_nucleons(nucleons, params, shuffle, seed)?;
        Ok(nucleus)
    }

    /// Initialize with `protons` protons and `neutrons` neutrons in a ring pattern.
    ///
    /// The kinds are permuted with a generator seeded from `seed`; the same seed
    /// always yields the same nucleus. With `shuffle`, each nucleon also gets a
    /// random z-order in `[0, 10]`, otherwise all z-orders are 0. Ids are
    /// assigned `0..n` in emission order.
    ///
    /// Errors:
    /// - `Error::AlreadyInitialized` if called on an initialized nucleus.
    /// - `Error::InvalidParam` if `params` are invalid.
    pub fn init_from_counts(
        &mut self,
        protons: usize,
        neutrons: usize,
        params: NucleusParams,
        shuffle: bool,
        seed: u64,
    ) -> Result<()> {
        self.ensure_uninitialized()?;
        params.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let kinds = shuffled_kinds(protons, neutrons, &mut rng);

        let n = kinds.len();
        let pattern = generate_ring_pattern(n, params.nucleon_separation, params.ring_growth())?;
        let z_orders = random_z_orders(n, shuffle, &mut rng);

        let mut id = 0u32;
        let mut flat = kinds.into_iter().zip(z_orders);
        let layers: Vec<Vec<PositionedNucleon>> = pattern
            .into_iter()
            .map(|ring| {
                ring.into_iter()
                    .zip(flat.by_ref())
                    .map(|(position, (kind, z))| {
                        let nucleon = PositionedNucleon::new(id, kind, position, z);
                        id += 1;
                        nucleon
                    })
                    .collect()
            })
            .collect();

        debug!("initialized nucleus with {protons} protons and {neutrons} neutrons (seed {seed})");
        self.state = Some(Layout {
            layers,
            params,
            center: [0.0; DIM],
        });
        Ok(())
    }

    /// Initialize from existing nucleons, laying them out on a fresh ring pattern.
    ///
    /// Only kinds, ids and (without `shuffle`) z-orders are taken from the
    /// input; coordinates are regenerated. With `shuffle` the coordinate pattern
    /// is permuted and fresh z-orders are drawn, but nucleons still appear in
    /// input order so that the i-th input maps to the i-th output.
    ///
    /// Errors:
    /// - `Error::AlreadyInitialized` if called on an initialized nucleus.
    /// - `Error::InvalidParam` if `params` are invalid or two nucleons share an id.
    pub fn init_from_nucleons(
        &mut self,
        nucleons: &[PositionedNucleon],
        params: NucleusParams,
        shuffle: bool,
        seed: u64,
    ) -> Result<()> {
        self.ensure_uninitialized()?;
        let mut rng = StdRng::seed_from_u64(seed);
        self.state = Some(layout_from_nucleons(nucleons, params, shuffle, &mut rng)?);
        Ok(())
    }

    /// Initialize with a scattered, single-layer layout inside a disc of `radius`.
    ///
    /// Kinds are permuted as in [`Nucleus::init_from_counts`]; positions come from
    /// [`scatter_pattern`] with `num_tries` candidates per nucleon. All z-orders are 0.
    ///
    /// Errors:
    /// - `Error::AlreadyInitialized` if called on an initialized nucleus.
    /// - `Error::InvalidParam` if `params`, `radius` or `num_tries` are invalid.
    pub fn init_scattered(
        &mut self,
        protons: usize,
        neutrons: usize,
        radius: f64,
        num_tries: usize,
        params: NucleusParams,
        seed: u64,
    ) -> Result<()> {
        self.ensure_uninitialized()?;
        params.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let kinds = shuffled_kinds(protons, neutrons, &mut rng);

        let positions = scatter_pattern(
            kinds.len(),
            radius,
            params.nucleon_separation,
            num_tries,
            &mut rng,
        )?;
        let layer: Vec<PositionedNucleon> = kinds
            .into_iter()
            .zip(positions)
            .zip(0u32..)
            .map(|((kind, position), id)| PositionedNucleon::new(id, kind, position, 0))
            .collect();

        let layers = if layer.is_empty() { Vec::new() } else { vec![layer] };
        self.state = Some(Layout {
            layers,
            params,
            center: [0.0; DIM],
        });
        Ok(())
    }

    /// Whether the single initialization call has happened.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Generation parameters.
    pub fn params(&self) -> Result<NucleusParams> {
        Ok(self.layout()?.params)
    }

    /// Nucleons grouped by ring, in emission order (centre ring last).
    pub fn layers(&self) -> Result<&[Vec<PositionedNucleon>]> {
        Ok(&self.layout()?.layers)
    }

    /// Iterate nucleons in flat emission order.
    pub fn iter(&self) -> Result<impl Iterator<Item = &PositionedNucleon>> {
        Ok(self.layout()?.layers.iter().flatten())
    }

    /// Nucleons flattened in emission order.
    pub fn nucleons(&self) -> Result<Vec<PositionedNucleon>> {
        Ok(self.iter()?.copied().collect())
    }

    /// Number of nucleons.
    pub fn len(&self) -> Result<usize> {
        Ok(self.layout()?.layers.iter().map(Vec::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of nucleons of `kind`.
    pub fn count(&self, kind: ParticleKind) -> Result<usize> {
        Ok(self.iter()?.filter(|n| n.kind == kind).count())
    }

    pub fn proton_count(&self) -> Result<usize> {
        self.count(ParticleKind::Proton)
    }

    pub fn neutron_count(&self) -> Result<usize> {
        self.count(ParticleKind::Neutron)
    }

    /// Position of the ring centre.
    pub fn center(&self) -> Result<[f64; DIM]> {
        Ok(self.layout()?.center)
    }

    /// Look up a nucleon by its stable id.
    pub fn get(&self, id: u32) -> Result<Option<&PositionedNucleon>> {
        Ok(self.iter()?.find(|n| n.id == id))
    }

    /// The nucleon closest to `point`, optionally restricted to one kind.
    ///
    /// Ties go to the nucleon earliest in emission order.
    ///
    /// Errors:
    /// - `Error::Uninitialized` before initialization.
    /// - `Error::EmptyQuery` if no nucleon matches `filter`.
    pub fn find_closest(
        &self,
        point: [f64; DIM],
        filter: Option<ParticleKind>,
    ) -> Result<&PositionedNucleon> {
        self.iter()?
            .filter(|n| filter.map_or(true, |k| n.kind == k))
            .min_by(|a, b| a.distance_sq(point).total_cmp(&b.distance_sq(point)))
            .ok_or_else(|| match filter {
                Some(kind) => Error::EmptyQuery(format!("no {kind} in nucleus")),
                None => Error::EmptyQuery("nucleus is empty".into()),
            })
    }

    /// A copy of this nucleus shifted by `offset`.
    pub fn translated(&self, offset: [f64; DIM]) -> Result<Nucleus> {
        let layout = self.layout()?;
        let shift = |p: [f64; DIM]| [p[0] + offset[0], p[1] + offset[1]];
        let layers: Vec<Vec<PositionedNucleon>> = layout
            .layers
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|n| n.with_position(shift(n.position)))
                    .collect()
            })
            .collect();
        Ok(Nucleus {
            state: Some(Layout {
                layers,
                params: layout.params,
                center: shift(layout.center),
            }),
        })
    }

    /// A copy of this nucleus with its centre moved to `target`.
    pub fn moved_to(&self, target: [f64; DIM]) -> Result<Nucleus> {
        let c = self.center()?;
        self.translated([target[0] - c[0], target[1] - c[1]])
    }

    /// A copy with `replacement` substituted for the nucleon sharing its id.
    pub(crate) fn with_replaced(&self, replacement: PositionedNucleon) -> Result<Nucleus> {
        let layout = self.layout()?;
        let layers: Vec<Vec<PositionedNucleon>> = layout
            .layers
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|n| if n.id == replacement.id { replacement } else { *n })
                    .collect()
            })
            .collect();
        Ok(Nucleus {
            state: Some(Layout {
                layers,
                params: layout.params,
                center: layout.center,
            }),
        })
    }

    /// Build an initialized nucleus from nucleons with a caller-owned generator.
    pub(crate) fn laid_out<R: Rng + ?Sized>(
        nucleons: &[PositionedNucleon],
        params: NucleusParams,
        shuffle: bool,
        rng: &mut R,
    ) -> Result<Nucleus> {
        Ok(Nucleus {
            state: Some(layout_from_nucleons(nucleons, params, shuffle, rng)?),
        })
    }

    fn layout(&self) -> Result<&Layout> {
        self.state.as_ref().ok_or(Error::Uninitialized)
    }

    fn ensure_uninitialized(&self) -> Result<()> {
        if self.state.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        Ok(())
    }
}

fn shuffled_kinds<R: Rng + ?Sized>(
    protons: usize,
    neutrons: usize,
    rng: &mut R,
) -> Vec<ParticleKind> {
    let mut kinds: Vec<ParticleKind> = iter::repeat(ParticleKind::Proton)
        .take(protons)
        .chain(iter::repeat(ParticleKind::Neutron).take(neutrons))
        .collect();
    kinds.shuffle(rng);
    kinds
}

fn random_z_orders<R: Rng + ?Sized>(n: usize, shuffle: bool, rng: &mut R) -> Vec<i32> {
    if shuffle {
        (0..n).map(|_| rng.random_range(0..=MAX_Z_INDEX)).collect()
    } else {
        vec![0; n]
    }
}

fn layout_from_nucleons<R: Rng + ?Sized>(
    nucleons: &[PositionedNucleon],
    params: NucleusParams,
    shuffle: bool,
    rng: &mut R,
) -> Result<Layout> {
    params.validate()?;
    let mut seen = HashSet::with_capacity(nucleons.len());
    if let Some(dup) = nucleons.iter().find(|n| !seen.insert(n.id)) {
        return Err(Error::InvalidParam(format!(
            "nucleon id {} appears more than once",
            dup.id
        )));
    }
    let n = nucleons.len();
    let pattern = generate_ring_pattern(n, params.nucleon_separation, params.ring_growth())?;
    let ring_lens: Vec<usize> = pattern.iter().map(Vec::len).collect();
    let mut coords: Vec<[f64; DIM]> = pattern.into_iter().flatten().collect();

    let z_orders = if shuffle {
        coords.shuffle(rng);
        random_z_orders(n, true, rng)
    } else {
        nucleons.iter().map(|n| n.z_index).collect()
    };

    let mut placed = nucleons
        .iter()
        .zip(coords)
        .zip(z_orders)
        .map(|((n, position), z)| PositionedNucleon::new(n.id, n.kind, position, z));
    let layers: Vec<Vec<PositionedNucleon>> = ring_lens
        .into_iter()
        .map(|len| placed.by_ref().take(len).collect())
        .collect();

    debug!("laid out {n} existing nucleons (shuffle: {shuffle})");
    Ok(Layout {
        layers,
        params,
        center: [0.0; DIM],
    })
}
