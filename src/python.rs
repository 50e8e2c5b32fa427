use std::collections::HashMap;

use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{
    generate_ring_pattern, BetaMode, EmForceCurve, ForceCurve, NucleonPair, Nucleus,
    NucleusParams, ParticleKind, StrongForceCurve,
};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_kind(name: &str) -> PyResult<ParticleKind> {
    match name.to_ascii_lowercase().as_str() {
        "proton" => Ok(ParticleKind::Proton),
        "neutron" => Ok(ParticleKind::Neutron),
        "electron" => Ok(ParticleKind::Electron),
        "positron" => Ok(ParticleKind::Positron),
        "neutrino" => Ok(ParticleKind::Neutrino),
        other => Err(py_err(format!("unknown particle kind {other:?}"))),
    }
}

fn points_to_array(points: &[[f64; 2]]) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((points.len(), 2));
    for (i, p) in points.iter().enumerate() {
        arr[[i, 0]] = p[0];
        arr[[i, 1]] = p[1];
    }
    arr
}

/// Map pairs to (index in parent, index in daughter) using the stable ids.
fn index_pairs(
    parent: &Nucleus,
    daughter: &Nucleus,
    pairs: &[NucleonPair],
) -> PyResult<Vec<(usize, usize)>> {
    let index_by_id = |n: &Nucleus| -> PyResult<HashMap<u32, usize>> {
        Ok(n.iter()
            .map_err(py_err)?
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect())
    };
    let parent_idx = index_by_id(parent)?;
    let daughter_idx = index_by_id(daughter)?;
    pairs
        .iter()
        .map(|p| {
            match (parent_idx.get(&p.original.id), daughter_idx.get(&p.new.id)) {
                (Some(&a), Some(&b)) => Ok((a, b)),
                _ => Err(py_err(format!("nucleon {} lost in decay", p.original.id))),
            }
        })
        .collect()
}

/// Python-facing nucleus.
///
/// Nucleons are exposed in flat emission order; every per-nucleon accessor
/// (`positions`, `kinds`, `ids`, `z_indices`) uses the same indexing, and the
/// pair lists returned by decays refer to those indices.
#[pyclass(name = "Nucleus")]
pub struct PyNucleus {
    inner: Nucleus,
}

#[pymethods]
impl PyNucleus {
    /// Build a ring-layout nucleus from proton and neutron counts.
    #[staticmethod]
    #[pyo3(signature = (protons, neutrons, nucleon_separation=1.0, particle_num_difference=4, nucleon_size_multiplier=0.6, shuffle=false, seed=1))]
    fn from_counts(
        protons: usize,
        neutrons: usize,
        nucleon_separation: f64,
        particle_num_difference: u32,
        nucleon_size_multiplier: f64,
        shuffle: bool,
        seed: u64,
    ) -> PyResult<Self> {
        let params = NucleusParams::new(
            nucleon_separation,
            particle_num_difference,
            nucleon_size_multiplier,
        )
        .map_err(py_err)?;
        let inner =
            Nucleus::from_counts(protons, neutrons, params, shuffle, seed).map_err(py_err)?;
        Ok(Self { inner })
    }

    /// Re-layout the nucleons of `other` in the given order of flat indices.
    ///
    /// Each index may appear at most once.
    #[staticmethod]
    #[pyo3(signature = (other, order=None, shuffle=false, seed=1))]
    fn from_nucleons(
        other: PyRef<'_, PyNucleus>,
        order: Option<Vec<usize>>,
        shuffle: bool,
        seed: u64,
    ) -> PyResult<Self> {
        let flat = other.inner.nucleons().map_err(py_err)?;
        let selected = match order {
            Some(idx) => idx
                .into_iter()
                .map(|i| {
                    flat.get(i)
                        .copied()
                        .ok_or_else(|| py_err(format!("nucleon index {i} out of range")))
                })
                .collect::<PyResult<Vec<_>>>()?,
            None => flat,
        };
        let params = other.inner.params().map_err(py_err)?;
        let inner = Nucleus::from_nucleons(&selected, params, shuffle, seed).map_err(py_err)?;
        Ok(Self { inner })
    }

    fn __len__(&self) -> PyResult<usize> {
        self.inner.len().map_err(py_err)
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let points: Vec<[f64; 2]> = self
            .inner
            .iter()
            .map_err(py_err)?
            .map(|n| n.position)
            .collect();
        Ok(points_to_array(&points).into_pyarray(py).unbind())
    }

    /// Particle kind names, e.g. "proton".
    fn kinds(&self) -> PyResult<Vec<String>> {
        Ok(self
            .inner
            .iter()
            .map_err(py_err)?
            .map(|n| n.kind.to_string())
            .collect())
    }

    fn ids(&self) -> PyResult<Vec<u32>> {
        Ok(self.inner.iter().map_err(py_err)?.map(|n| n.id).collect())
    }

    fn z_indices(&self) -> PyResult<Vec<i32>> {
        Ok(self
            .inner
            .iter()
            .map_err(py_err)?
            .map(|n| n.z_index)
            .collect())
    }

    /// Number of nucleons in each ring, outermost first.
    fn layer_sizes(&self) -> PyResult<Vec<usize>> {
        Ok(self
            .inner
            .layers()
            .map_err(py_err)?
            .iter()
            .map(Vec::len)
            .collect())
    }

    fn center(&self) -> PyResult<(f64, f64)> {
        let c = self.inner.center().map_err(py_err)?;
        Ok((c[0], c[1]))
    }

    fn nucleon_size_multiplier(&self) -> PyResult<f64> {
        Ok(self.inner.params().map_err(py_err)?.nucleon_size_multiplier)
    }

    fn shift(&self, dx: f64, dy: f64) -> PyResult<PyNucleus> {
        let inner = self.inner.translated([dx, dy]).map_err(py_err)?;
        Ok(Self { inner })
    }

    fn move_to(&self, x: f64, y: f64) -> PyResult<PyNucleus> {
        let inner = self.inner.moved_to([x, y]).map_err(py_err)?;
        Ok(Self { inner })
    }

    /// Index of the nucleon closest to `point`, optionally of one kind.
    #[pyo3(signature = (point, kind=None))]
    fn find_closest(&self, point: (f64, f64), kind: Option<&str>) -> PyResult<usize> {
        let filter = kind.map(parse_kind).transpose()?;
        let found = self
            .inner
            .find_closest([point.0, point.1], filter)
            .map_err(py_err)?;
        self.inner
            .iter()
            .map_err(py_err)?
            .position(|n| n.id == found.id)
            .ok_or_else(|| py_err("nucleon vanished"))
    }

    /// Split the nucleus (releases the GIL during computation).
    ///
    /// Returns (daughter1, daughter2, pairs1, pairs2) where each pair is
    /// (index in this nucleus, index in the daughter).
    #[pyo3(signature = (protons, neutrons, reference, shuffle1=false, shuffle2=false, seed=1))]
    #[allow(clippy::too_many_arguments, clippy::type_complexity)]
    fn decay(
        &self,
        py: Python<'_>,
        protons: usize,
        neutrons: usize,
        reference: (f64, f64),
        shuffle1: bool,
        shuffle2: bool,
        seed: u64,
    ) -> PyResult<(PyNucleus, PyNucleus, Vec<(usize, usize)>, Vec<(usize, usize)>)> {
        let d = py
            .detach(|| {
                self.inner.decay(
                    protons,
                    neutrons,
                    [reference.0, reference.1],
                    shuffle1,
                    shuffle2,
                    seed,
                )
            })
            .map_err(py_err)?;
        let pairs1 = index_pairs(&self.inner, &d.daughter1, &d.pairs1)?;
        let pairs2 = index_pairs(&self.inner, &d.daughter2, &d.pairs2)?;
        Ok((
            Self { inner: d.daughter1 },
            Self { inner: d.daughter2 },
            pairs1,
            pairs2,
        ))
    }

    /// Convert the nearest neutron ("minus") or proton ("plus").
    ///
    /// Returns (new nucleus, index of the converted nucleon, emitted lepton kind,
    /// whether the neutrino is an antineutrino).
    fn beta_decay(
        &self,
        mode: &str,
        reference: (f64, f64),
    ) -> PyResult<(PyNucleus, usize, String, bool)> {
        let mode = match mode.to_ascii_lowercase().as_str() {
            "minus" | "-" => BetaMode::Minus,
            "plus" | "+" => BetaMode::Plus,
            other => return Err(py_err(format!("unknown beta mode {other:?}"))),
        };
        let b = self
            .inner
            .beta_decay(mode, [reference.0, reference.1])
            .map_err(py_err)?;
        let index = b
            .nucleus
            .iter()
            .map_err(py_err)?
            .position(|n| n.id == b.converted.new.id)
            .ok_or_else(|| py_err("converted nucleon vanished"))?;
        Ok((
            Self { inner: b.nucleus },
            index,
            b.beta.kind.to_string(),
            b.neutrino.anti,
        ))
    }

    /// Rearrange the nucleus, emitting the photon from the nucleon nearest
    /// `reference`. Returns (new nucleus, pairs, photon start point).
    #[pyo3(signature = (reference, seed=1))]
    #[allow(clippy::type_complexity)]
    fn gamma_decay(
        &self,
        reference: (f64, f64),
        seed: u64,
    ) -> PyResult<(PyNucleus, Vec<(usize, usize)>, (f64, f64))> {
        let g = self
            .inner
            .gamma_decay([reference.0, reference.1], seed)
            .map_err(py_err)?;
        let pairs = index_pairs(&self.inner, &g.nucleus, &g.pairs)?;
        let p = g.emission_point;
        Ok((Self { inner: g.nucleus }, pairs, (p[0], p[1])))
    }
}

/// Ring coordinates for `n` nucleons, outermost ring first.
#[pyfunction]
#[pyo3(signature = (n, separation=1.0, growth=4))]
fn ring_pattern(n: usize, separation: f64, growth: usize) -> PyResult<Vec<Vec<(f64, f64)>>> {
    let rings = generate_ring_pattern(n, separation, growth).map_err(py_err)?;
    Ok(rings
        .into_iter()
        .map(|ring| ring.into_iter().map(|p| (p[0], p[1])).collect())
        .collect())
}

/// (M, 2) array of [distance, force] samples of the strong-force curve.
#[pyfunction]
#[pyo3(signature = (start, end, step, a=2.0, b=-0.95, c=-5.0))]
fn strong_force_curve<'py>(
    py: Python<'py>,
    start: f64,
    end: f64,
    step: f64,
    a: f64,
    b: f64,
    c: f64,
) -> PyResult<Py<PyArray2<f64>>> {
    let points = StrongForceCurve { a, b, c }
        .sample(start, end, step)
        .map_err(py_err)?;
    Ok(points_to_array(&points).into_pyarray(py).unbind())
}

/// (M, 2) array of [distance, force] samples of the electromagnetic curve.
#[pyfunction]
#[pyo3(signature = (start, end, step, a=0.7, b=0.2))]
fn em_force_curve<'py>(
    py: Python<'py>,
    start: f64,
    end: f64,
    step: f64,
    a: f64,
    b: f64,
) -> PyResult<Py<PyArray2<f64>>> {
    let points = EmForceCurve { a, b }
        .sample(start, end, step)
        .map_err(py_err)?;
    Ok(points_to_array(&points).into_pyarray(py).unbind())
}

/// The nucsim Python module entry point.
#[pymodule]
fn nucsim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNucleus>()?;
    m.add_function(wrap_pyfunction!(ring_pattern, m)?)?;
    m.add_function(wrap_pyfunction!(strong_force_curve, m)?)?;
    m.add_function(wrap_pyfunction!(em_force_curve, m)?)?;
    Ok(())
}
