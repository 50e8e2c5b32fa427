use std::collections::HashSet;

use nucsim::core::{BetaMode, Nucleus, NucleusParams, ParticleKind};
use nucsim::error::{Error, Result};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Mass conservation, quota satisfaction and complete correspondence over a
/// grid of compositions, quotas and reference points.
#[test]
fn decay_conserves_and_pairs_every_nucleon() -> Result<()> {
    init_logging();
    let params = NucleusParams::default();
    let references = [[0.0, 0.0], [-1.0, 0.0], [2.0, -1.0], [0.3, 5.0]];
    for (protons, neutrons) in [(4, 3), (12, 12), (5, 6), (1, 0), (0, 7)] {
        let parent = Nucleus::from_counts(protons, neutrons, params, true, 9)?;
        for tp in 0..=protons.min(3) {
            for tn in 0..=neutrons.min(3) {
                for (k, &reference) in references.iter().enumerate() {
                    let d = parent.decay(tp, tn, reference, k % 2 == 0, k % 3 == 0, k as u64)?;

                    assert_eq!(
                        d.daughter1.len()? + d.daughter2.len()?,
                        parent.len()?,
                        "mass not conserved"
                    );
                    assert_eq!(d.daughter1.proton_count()?, tp);
                    assert_eq!(d.daughter1.neutron_count()?, tn);
                    assert!(d.quota_met());

                    let ids: Vec<u32> = d.pairs().map(|p| p.original.id).collect();
                    let unique: HashSet<u32> = ids.iter().copied().collect();
                    assert_eq!(ids.len(), parent.len()?);
                    assert_eq!(unique.len(), ids.len(), "nucleon paired twice");
                    for n in parent.iter()? {
                        assert!(unique.contains(&n.id));
                    }
                    assert_eq!(d.pairs1.len(), d.daughter1.len()?);
                    assert_eq!(d.pairs2.len(), d.daughter2.len()?);
                }
            }
        }
    }
    Ok(())
}

/// 4 protons + 3 neutrons emitting one proton towards (-1, 0).
#[test]
fn proton_emission_scenario() -> Result<()> {
    init_logging();
    let params = NucleusParams::new(1.0, 5, 0.6)?;
    let nucleus = Nucleus::from_counts(4, 3, params, false, 1)?;
    let d = nucleus.decay(1, 0, [-1.0, 0.0], false, false, 1)?;
    assert_eq!(d.daughter1.len()?, 1);
    assert_eq!(d.daughter1.proton_count()?, 1);
    assert_eq!(d.daughter2.len()?, 6);
    assert_eq!(d.pairs1.len() + d.pairs2.len(), 7);
    // The daughters inherit the parent's parameters
    assert_eq!(d.daughter2.params()?, params);
    Ok(())
}

/// Alpha decay from a shifted 24-nucleon nucleus takes the nucleons nearest the reference.
#[test]
fn alpha_decay_takes_nearest_nucleons() -> Result<()> {
    let nucleus =
        Nucleus::from_counts(12, 12, NucleusParams::default(), false, 6)?.translated([0.0, -1.0])?;
    let reference = [2.0, -1.0];
    let d = nucleus.decay(2, 2, reference, false, false, 1)?;
    assert_eq!(d.daughter1.len()?, 4);
    assert_eq!(d.daughter2.len()?, 20);

    // Any nucleon of a kind nearer than the farthest taken one of that kind must be taken too
    for kind in [ParticleKind::Proton, ParticleKind::Neutron] {
        let taken_max = d
            .pairs1
            .iter()
            .filter(|p| p.original.kind == kind)
            .map(|p| p.original.distance_sq(reference))
            .fold(0.0, f64::max);
        for p in d.pairs2.iter().filter(|p| p.original.kind == kind) {
            assert!(p.original.distance_sq(reference) >= taken_max);
        }
    }
    Ok(())
}

/// Decay is a pure function of its inputs.
#[test]
fn decay_is_reproducible() -> Result<()> {
    let nucleus = Nucleus::from_counts(6, 8, NucleusParams::default(), true, 2)?;
    let a = nucleus.decay(2, 2, [1.0, 1.0], true, true, 5)?;
    let b = nucleus.decay(2, 2, [1.0, 1.0], true, true, 5)?;
    assert_eq!(a.pairs1, b.pairs1);
    assert_eq!(a.pairs2, b.pairs2);
    assert_eq!(a.daughter1.nucleons()?, b.daughter1.nucleons()?);
    Ok(())
}

/// Quota beyond what the nucleus holds spills silently into the second daughter.
#[test]
fn oversized_quota_degrades_silently() -> Result<()> {
    init_logging();
    let nucleus = Nucleus::from_counts(2, 2, NucleusParams::default(), false, 1)?;
    let d = nucleus.decay(3, 10, [0.0, 0.0], false, false, 1)?;
    assert_eq!(d.daughter1.len()?, 4);
    assert!(d.daughter2.is_empty()?);
    assert!(d.daughter2.layers()?.is_empty());
    assert_eq!(d.quota_shortfall(), (1, 8));
    Ok(())
}

/// Queries before initialization and on empty selections fail fast.
#[test]
fn precondition_errors() -> Result<()> {
    let empty = Nucleus::new();
    assert!(matches!(
        empty.decay(1, 1, [0.0, 0.0], false, false, 0),
        Err(Error::Uninitialized)
    ));
    assert!(matches!(
        empty.beta_decay(BetaMode::Minus, [0.0, 0.0]),
        Err(Error::Uninitialized)
    ));

    let protons_only = Nucleus::from_counts(3, 0, NucleusParams::default(), false, 0)?;
    assert!(matches!(
        protons_only.find_closest([0.0, 0.0], Some(ParticleKind::Neutron)),
        Err(Error::EmptyQuery(_))
    ));
    Ok(())
}

/// Repeated nearest-particle queries on an unchanged nucleus agree.
#[test]
fn find_closest_is_idempotent() -> Result<()> {
    let nucleus = Nucleus::from_counts(7, 7, NucleusParams::default(), true, 4)?;
    for point in [[-2.0, 0.0], [0.0, 0.0], [0.4, -0.9]] {
        for filter in [None, Some(ParticleKind::Proton), Some(ParticleKind::Neutron)] {
            let a = *nucleus.find_closest(point, filter)?;
            let b = *nucleus.find_closest(point, filter)?;
            assert_eq!(a, b);
        }
    }
    Ok(())
}

/// β⁻ then β⁺ walk through the series' beta scenes and leave mass unchanged.
#[test]
fn beta_decays_preserve_mass_number() -> Result<()> {
    let nucleus = Nucleus::from_counts(10, 10, NucleusParams::default(), false, 1)?;
    let minus = nucleus.beta_decay(BetaMode::Minus, [-2.0, 0.0])?;
    assert_eq!(minus.nucleus.len()?, 20);
    assert_eq!(minus.nucleus.proton_count()?, 11);
    assert_eq!(minus.beta.kind, ParticleKind::Electron);
    assert_eq!(minus.beta.position, minus.converted.original.position);

    let plus = minus.nucleus.beta_decay(BetaMode::Plus, [-2.0, 0.0])?;
    assert_eq!(plus.nucleus.proton_count()?, 10);
    assert_eq!(plus.beta.kind, ParticleKind::Positron);
    assert!(!plus.neutrino.anti);
    Ok(())
}

/// Gamma rearrangement keeps every nucleon and only moves them around.
#[test]
fn gamma_decay_rearranges_everything() -> Result<()> {
    let nucleus = Nucleus::from_counts(10, 10, NucleusParams::default(), false, 1)?;
    let g = nucleus.gamma_decay([2.0, 0.0], 3)?;
    assert_eq!(
        g.emission_point,
        nucleus.find_closest([2.0, 0.0], None)?.position
    );
    assert_eq!(g.pairs.len(), 20);
    let ids: HashSet<u32> = g.pairs.iter().map(|p| p.new.id).collect();
    assert_eq!(ids.len(), 20);
    assert_eq!(g.nucleus.neutron_count()?, 10);
    Ok(())
}
