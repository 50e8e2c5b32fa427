//! Decay of a nucleus into new nuclei.
//!
//! Every operation here reads an initialized [`Nucleus`] and returns fresh
//! values together with `(original, new)` pairs the renderer uses to animate
//! each particle to its new place. Pairs always share the stable id.

use log::{debug, warn};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::core::nucleus::Nucleus;
use crate::core::particle::{ParticleKind, PositionedNucleon, DIM};
use crate::error::{Error, Result};

/// A particle before and after a decay step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NucleonPair {
    pub original: PositionedNucleon,
    pub new: PositionedNucleon,
}

/// Result of splitting a nucleus in two.
#[derive(Debug, Clone)]
pub struct Decay {
    /// Nucleus built from the particles that satisfied the quota.
    pub daughter1: Nucleus,
    /// Nucleus built from everything else.
    pub daughter2: Nucleus,
    /// Correspondence between parent nucleons and `daughter1`.
    pub pairs1: Vec<NucleonPair>,
    /// Correspondence between parent nucleons and `daughter2`.
    pub pairs2: Vec<NucleonPair>,
    shortfall: (usize, usize),
}

impl Decay {
    /// Protons and neutrons the quota asked for but the parent could not supply.
    pub fn quota_shortfall(&self) -> (usize, usize) {
        self.shortfall
    }

    /// Whether `daughter1` received exactly the requested counts.
    pub fn quota_met(&self) -> bool {
        self.shortfall == (0, 0)
    }

    /// All pairs, `daughter1` first.
    pub fn pairs(&self) -> impl Iterator<Item = &NucleonPair> {
        self.pairs1.iter().chain(self.pairs2.iter())
    }
}

/// Direction of a beta decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetaMode {
    /// n → p + e⁻ + ν̄
    Minus,
    /// p → n + e⁺ + ν
    Plus,
}

impl BetaMode {
    /// Nucleon kind that converts.
    pub fn source_kind(self) -> ParticleKind {
        match self {
            BetaMode::Minus => ParticleKind::Neutron,
            BetaMode::Plus => ParticleKind::Proton,
        }
    }

    /// Nucleon kind it converts into.
    pub fn product_kind(self) -> ParticleKind {
        match self {
            BetaMode::Minus => ParticleKind::Proton,
            BetaMode::Plus => ParticleKind::Neutron,
        }
    }

    /// Charged lepton emitted.
    pub fn beta_kind(self) -> ParticleKind {
        match self {
            BetaMode::Minus => ParticleKind::Electron,
            BetaMode::Plus => ParticleKind::Positron,
        }
    }
}

/// A free particle leaving the nucleus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    pub kind: ParticleKind,
    /// Where the particle starts, in the parent's frame.
    pub position: [f64; DIM],
    /// Set for the electron antineutrino.
    pub anti: bool,
}

/// Result of converting one nucleon.
#[derive(Debug, Clone)]
pub struct BetaDecay {
    pub nucleus: Nucleus,
    pub converted: NucleonPair,
    pub beta: Emission,
    pub neutrino: Emission,
}

/// Result of rearranging a nucleus in place.
#[derive(Debug, Clone)]
pub struct GammaDecay {
    pub nucleus: Nucleus,
    pub pairs: Vec<NucleonPair>,
    /// Position of the parent nucleon nearest the reference point, where the photon starts.
    pub emission_point: [f64; DIM],
}

impl Nucleus {
    /// Split into two daughters by proximity to `reference`.
    ///
    /// Nucleons are visited nearest-first (stable on ties) and go to the first
    /// daughter while its proton or neutron quota has room; everything else
    /// goes to the second daughter. Each daughter keeps its members in the
    /// parent's emission order and is laid out afresh with the parent's
    /// parameters, `shuffle1`/`shuffle2` applying per daughter. One generator
    /// seeded from `seed` serves both layouts.
    ///
    /// A quota larger than the parent can supply is not an error: the
    /// shortfall is logged and reported by [`Decay::quota_shortfall`].
    ///
    /// Errors:
    /// - `Error::Uninitialized` before initialization.
    pub fn decay(
        &self,
        target_protons: usize,
        target_neutrons: usize,
        reference: [f64; DIM],
        shuffle1: bool,
        shuffle2: bool,
        seed: u64,
    ) -> Result<Decay> {
        let params = self.params()?;
        let flat = self.nucleons()?;

        let mut order: Vec<usize> = (0..flat.len()).collect();
        order.sort_by(|&a, &b| {
            flat[a]
                .distance_sq(reference)
                .total_cmp(&flat[b].distance_sq(reference))
        });

        let (mut protons_left, mut neutrons_left) = (target_protons, target_neutrons);
        let mut idx1 = Vec::with_capacity(target_protons + target_neutrons);
        let mut idx2 = Vec::with_capacity(flat.len());
        for i in order {
            match flat[i].kind {
                ParticleKind::Proton if protons_left > 0 => {
                    protons_left -= 1;
                    idx1.push(i);
                }
                ParticleKind::Neutron if neutrons_left > 0 => {
                    neutrons_left -= 1;
                    idx1.push(i);
                }
                _ => idx2.push(i),
            }
        }
        idx1.sort_unstable();
        idx2.sort_unstable();

        if protons_left > 0 || neutrons_left > 0 {
            warn!(
                "decay quota not met: {protons_left} protons and {neutrons_left} neutrons missing"
            );
        }

        let members1: Vec<PositionedNucleon> = idx1.iter().map(|&i| flat[i]).collect();
        let members2: Vec<PositionedNucleon> = idx2.iter().map(|&i| flat[i]).collect();

        let mut rng = StdRng::seed_from_u64(seed);
        let daughter1 = Nucleus::laid_out(&members1, params, shuffle1, &mut rng)?;
        let daughter2 = Nucleus::laid_out(&members2, params, shuffle2, &mut rng)?;

        let pairs1 = pair_up(&members1, &daughter1)?;
        let pairs2 = pair_up(&members2, &daughter2)?;

        debug!(
            "decayed {} nucleons into {} + {}",
            flat.len(),
            members1.len(),
            members2.len()
        );
        Ok(Decay {
            daughter1,
            daughter2,
            pairs1,
            pairs2,
            shortfall: (protons_left, neutrons_left),
        })
    }

    /// Convert the nucleon of the decaying kind closest to `reference`.
    ///
    /// The nucleus keeps its layout; only the converted nucleon changes kind.
    /// The beta particle and the neutrino both start at that nucleon.
    ///
    /// Errors:
    /// - `Error::Uninitialized` before initialization.
    /// - `Error::EmptyQuery` if there is no nucleon of the decaying kind.
    pub fn beta_decay(&self, mode: BetaMode, reference: [f64; DIM]) -> Result<BetaDecay> {
        let original = *self.find_closest(reference, Some(mode.source_kind()))?;
        let new = original.with_kind(mode.product_kind());
        let nucleus = self.with_replaced(new)?;

        debug!("beta decay {mode:?} converted nucleon {}", original.id);
        Ok(BetaDecay {
            nucleus,
            converted: NucleonPair { original, new },
            beta: Emission {
                kind: mode.beta_kind(),
                position: original.position,
                anti: false,
            },
            neutrino: Emission {
                kind: ParticleKind::Neutrino,
                position: original.position,
                anti: mode == BetaMode::Minus,
            },
        })
    }

    /// Reshuffle the nucleons onto a fresh pattern around the same centre.
    ///
    /// The photon is emitted from the parent nucleon closest to `reference`.
    ///
    /// Errors:
    /// - `Error::Uninitialized` before initialization.
    /// - `Error::EmptyQuery` if the nucleus has no nucleons.
    pub fn gamma_decay(&self, reference: [f64; DIM], seed: u64) -> Result<GammaDecay> {
        let center = self.center()?;
        let emission_point = self.find_closest(reference, None)?.position;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut shuffled = self.nucleons()?;
        shuffled.shuffle(&mut rng);
        let nucleus =
            Nucleus::laid_out(&shuffled, self.params()?, false, &mut rng)?.moved_to(center)?;
        let pairs = pair_up(&shuffled, &nucleus)?;

        Ok(GammaDecay {
            nucleus,
            pairs,
            emission_point,
        })
    }
}

fn pair_up(originals: &[PositionedNucleon], daughter: &Nucleus) -> Result<Vec<NucleonPair>> {
    let news = daughter.nucleons()?;
    if news.len() != originals.len() {
        return Err(Error::InvalidParam(format!(
            "layout produced {} nucleons for {} inputs",
            news.len(),
            originals.len()
        )));
    }
    Ok(originals
        .iter()
        .zip(news)
        .map(|(&original, new)| NucleonPair { original, new })
        .collect())
}
