//! # Phase-space records
//!
//! Galactocentric cylindrical states at the successive stages of the sampling pipeline,
//! and the rectangular [`SampleBatch`] that is returned to callers and persisted on disk.
//!
//! ```text
//! PlanarState (R, vR, vT)            <- distribution-function draw
//!     │ energy split, z = 0
//!     ▼
//! OrbitState (R, vR, vT, z, vz)      <- integrated forward in time
//!     │ uniform azimuth
//!     ▼
//! PhaseSpace (R, vR, vT, z, vz, φ)   <- natural units
//!     │ to_cartesian(ro, vo)
//!     ▼
//! SampleBatch row (x, y, z, vx, vy, vz) in kpc and km/s
//! ```
//!
//! Every cylindrical state is expressed in natural units (see [`crate::constants`]).
use nalgebra::DMatrix;

use crate::constants::{KmPerSec, Kpc};
use crate::galmock_errors::GalmockError;

/// Number of columns of a persisted sample batch.
pub const SAMPLE_COLUMNS: usize = 6;

/// One distribution-function draw in the galactic plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarState {
    pub r: f64,
    pub v_r: f64,
    pub v_t: f64,
}

/// Axisymmetric 5-D state integrated by the orbit integrators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub r: f64,
    pub v_r: f64,
    pub v_t: f64,
    pub z: f64,
    pub v_z: f64,
}

impl OrbitState {
    /// Angular momentum about the symmetry axis, `L = R vT`.
    pub fn angular_momentum(&self) -> f64 {
        self.r * self.v_t
    }

    pub fn is_finite(&self) -> bool {
        [self.r, self.v_r, self.v_t, self.z, self.v_z]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn with_phi(self, phi: f64) -> PhaseSpace {
        PhaseSpace {
            r: self.r,
            v_r: self.v_r,
            v_t: self.v_t,
            z: self.z,
            v_z: self.v_z,
            phi,
        }
    }
}

/// Full 6-D cylindrical phase-space record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpace {
    pub r: f64,
    pub v_r: f64,
    pub v_t: f64,
    pub z: f64,
    pub v_z: f64,
    pub phi: f64,
}

impl PhaseSpace {
    /// Convert to rectangular galactocentric coordinates in physical units.
    ///
    /// Arguments
    /// ---------
    /// * `ro`: natural length unit in kpc
    /// * `vo`: natural velocity unit in km/s
    ///
    /// Return
    /// ------
    /// * `[x, y, z, vx, vy, vz]` in `[kpc, kpc, kpc, km/s, km/s, km/s]`
    pub fn to_cartesian(&self, ro: Kpc, vo: KmPerSec) -> [f64; SAMPLE_COLUMNS] {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        [
            self.r * cos_phi * ro,
            self.r * sin_phi * ro,
            self.z * ro,
            (self.v_r * cos_phi - self.v_t * sin_phi) * vo,
            (self.v_r * sin_phi + self.v_t * cos_phi) * vo,
            self.v_z * vo,
        ]
    }
}

/// An immutable N×6 batch of rectangular samples `(x, y, z, vx, vy, vz)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBatch {
    data: DMatrix<f64>,
}

impl SampleBatch {
    /// Build a batch from rows of rectangular coordinates.
    pub fn from_rows(rows: &[[f64; SAMPLE_COLUMNS]]) -> Self {
        let data = DMatrix::from_fn(rows.len(), SAMPLE_COLUMNS, |i, j| rows[i][j]);
        SampleBatch { data }
    }

    /// Build a batch from a flat row-major buffer, as stored in the cache files.
    ///
    /// Return
    /// ------
    /// * `Err(GalmockError::DimensionMismatch)` if the buffer length is not `n_rows × 6`.
    pub fn from_row_major(n_rows: usize, values: &[f64]) -> Result<Self, GalmockError> {
        let expected = n_rows * SAMPLE_COLUMNS;
        if values.len() != expected {
            return Err(GalmockError::DimensionMismatch {
                expected,
                found: values.len(),
            });
        }
        Ok(SampleBatch {
            data: DMatrix::from_row_slice(n_rows, SAMPLE_COLUMNS, values),
        })
    }

    /// Build a batch from cylindrical records, converting them to physical rectangular units.
    pub fn from_phase_space(samples: &[PhaseSpace], ro: Kpc, vo: KmPerSec) -> Self {
        let rows: Vec<[f64; SAMPLE_COLUMNS]> =
            samples.iter().map(|s| s.to_cartesian(ro, vo)).collect();
        Self::from_rows(&rows)
    }

    /// Flat row-major copy of the batch.
    pub fn to_row_major(&self) -> Vec<f64> {
        self.data.transpose().as_slice().to_vec()
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.data
    }

    pub fn row(&self, i: usize) -> [f64; SAMPLE_COLUMNS] {
        std::array::from_fn(|j| self.data[(i, j)])
    }
}
