//! Nucleon placement patterns.
//!
//! The ring pattern packs `n` nucleons into concentric rings whose sizes grow
//! arithmetically (`1, 1+d, 1+2d, …`), each ring with a radius chosen so the
//! arc between neighbours equals the nucleon separation. Rings are emitted
//! outermost first so that the centre ends up drawn on top.

use std::f64::consts::TAU;

use log::trace;
use rand::Rng;

use crate::core::particle::{distance_sq, DIM};
use crate::error::{Error, Result};

/// One ring of coordinates, in angular order starting on the positive x-axis.
pub type Ring = Vec<[f64; DIM]>;

/// Ring sizes in generation order (innermost first).
///
/// Each ring is `growth` larger than the previous one; the last ring takes
/// whatever remains, so the sizes always sum to `n`.
pub fn ring_sizes(n: usize, growth: usize) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut remaining = n;
    let mut ring_size = 1usize;
    while remaining > 0 {
        if remaining <= ring_size {
            sizes.push(remaining);
            break;
        }
        remaining -= ring_size;
        sizes.push(ring_size);
        ring_size = ring_size.saturating_add(growth);
    }
    sizes
}

/// Radius of a ring holding `k` nucleons spaced `separation` apart along the arc.
#[inline]
pub fn ring_radius(k: usize, separation: f64) -> f64 {
    if k <= 1 {
        0.0
    } else {
        separation * k as f64 / TAU
    }
}

/// Generate the ring pattern for `n` nucleons.
///
/// Rings come back outermost-generation first and the singleton centre ring
/// last. Callers zip the flattened result positionally against particle
/// lists, so the emission order is part of the contract.
///
/// Errors:
/// - `Error::InvalidParam` if `separation` is not finite and > 0, or `growth` is 0.
pub fn generate_ring_pattern(n: usize, separation: f64, growth: usize) -> Result<Vec<Ring>> {
    if !separation.is_finite() || separation <= 0.0 {
        return Err(Error::InvalidParam(
            "nucleon_separation must be finite and > 0".into(),
        ));
    }
    if growth == 0 {
        return Err(Error::InvalidParam(
            "particle_num_difference must be > 0".into(),
        ));
    }

    let mut sizes = ring_sizes(n, growth);
    sizes.reverse();
    trace!("ring pattern for {n} nucleons: sizes {sizes:?}");

    Ok(sizes
        .into_iter()
        .map(|k| {
            let radius = ring_radius(k, separation);
            (0..k)
                .map(|i| {
                    let theta = TAU * i as f64 / k as f64;
                    [radius * theta.cos(), radius * theta.sin()]
                })
                .collect()
        })
        .collect())
}

/// Scattered placement inside a disc of `radius`.
///
/// For every particle `num_tries` candidates are drawn uniformly in distance
/// and angle; the candidate whose squared distances to the already placed
/// points are closest to `separation²` wins (first candidate on ties).
///
/// Errors:
/// - `Error::InvalidParam` on a negative/non-finite radius or separation, or `num_tries == 0`.
pub fn scatter_pattern<R: Rng + ?Sized>(
    n: usize,
    radius: f64,
    separation: f64,
    num_tries: usize,
    rng: &mut R,
) -> Result<Vec<[f64; DIM]>> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(Error::InvalidParam("radius must be finite and >= 0".into()));
    }
    if !separation.is_finite() || separation <= 0.0 {
        return Err(Error::InvalidParam(
            "nucleon_separation must be finite and > 0".into(),
        ));
    }
    if num_tries == 0 {
        return Err(Error::InvalidParam("num_tries must be > 0".into()));
    }

    let sep_sq = separation * separation;
    let mut placed: Vec<[f64; DIM]> = Vec::with_capacity(n);
    for _ in 0..n {
        let mut best: Option<([f64; DIM], f64)> = None;
        for _ in 0..num_tries {
            let distance = rng.random_range(0.0..=radius);
            let rotation = rng.random_range(0.0..TAU);
            let candidate = [rotation.cos() * distance, rotation.sin() * distance];
            // Larger is better
            let score: f64 = placed
                .iter()
                .map(|&p| {
                    let diff = sep_sq - distance_sq(p, candidate);
                    -(diff * diff)
                })
                .sum();
            match best {
                Some((_, s)) if s >= score => {}
                _ => best = Some((candidate, score)),
            }
        }
        if let Some((pos, _)) = best {
            placed.push(pos);
        }
    }
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn ring_sizes_follow_progression() {
        assert_eq!(ring_sizes(0, 4), Vec::<usize>::new());
        assert_eq!(ring_sizes(1, 4), vec![1]);
        assert_eq!(ring_sizes(6, 4), vec![1, 5]);
        assert_eq!(ring_sizes(7, 4), vec![1, 5, 1]);
        assert_eq!(ring_sizes(24, 4), vec![1, 5, 9, 9]);
        assert_eq!(ring_sizes(10, 1), vec![1, 2, 3, 4]);
    }

    #[test]
    fn huge_growth_does_not_overflow() -> Result<()> {
        assert_eq!(ring_sizes(5, usize::MAX), vec![1, 4]);
        let rings = generate_ring_pattern(5, 1.0, usize::MAX)?;
        let sizes: Vec<usize> = rings.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 1]);
        Ok(())
    }

    #[test]
    fn singleton_ring_is_centred() -> Result<()> {
        let rings = generate_ring_pattern(1, 1.0, 4)?;
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0], vec![[0.0, 0.0]]);
        Ok(())
    }

    #[test]
    fn seven_nucleons_emit_one_five_one() -> Result<()> {
        let rings = generate_ring_pattern(7, 1.0, 4)?;
        let sizes: Vec<usize> = rings.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1, 5, 1]);
        assert_eq!(rings[0][0], [0.0, 0.0]);
        assert_eq!(rings[2][0], [0.0, 0.0]);

        let expected = 5.0 / TAU;
        assert!((expected - 0.7958).abs() < 1e-4);
        for p in &rings[1] {
            let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!((r - expected).abs() < 1e-12);
        }
        // First point sits on the positive x-axis
        assert!((rings[1][0][0] - expected).abs() < 1e-12);
        assert!(rings[1][0][1].abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn adjacent_ring_points_are_separated_by_arc() -> Result<()> {
        let sep = 0.6;
        let rings = generate_ring_pattern(15, sep, 4)?;
        for ring in rings.iter().filter(|r| r.len() > 1) {
            let k = ring.len() as f64;
            let r = ring_radius(ring.len(), sep);
            let chord = distance_sq(ring[0], ring[1]).sqrt();
            assert!((chord - 2.0 * r * (std::f64::consts::PI / k).sin()).abs() < 1e-12);
            assert!((r * TAU / k - sep).abs() < 1e-12);
        }
        Ok(())
    }

    #[test]
    fn empty_pattern_is_not_an_error() -> Result<()> {
        assert!(generate_ring_pattern(0, 1.0, 4)?.is_empty());
        Ok(())
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(generate_ring_pattern(3, 0.0, 4).is_err());
        assert!(generate_ring_pattern(3, f64::NAN, 4).is_err());
        let err = generate_ring_pattern(3, 1.0, 0).unwrap_err();
        assert!(err.to_string().contains("particle_num_difference"));
    }

    #[test]
    fn scatter_pattern_stays_inside_disc() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(1);
        let pts = scatter_pattern(12, 1.5, 0.6, 3, &mut rng)?;
        assert_eq!(pts.len(), 12);
        for p in &pts {
            assert!(distance_sq(*p, [0.0, 0.0]) <= 1.5 * 1.5 + 1e-12);
        }
        Ok(())
    }

    #[test]
    fn scatter_pattern_is_reproducible() -> Result<()> {
        let a = scatter_pattern(8, 1.0, 0.5, 4, &mut StdRng::seed_from_u64(9))?;
        let b = scatter_pattern(8, 1.0, 0.5, 4, &mut StdRng::seed_from_u64(9))?;
        assert_eq!(a, b);
        assert!(scatter_pattern(8, 1.0, 0.5, 0, &mut StdRng::seed_from_u64(9)).is_err());
        Ok(())
    }
}
