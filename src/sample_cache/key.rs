use serde::{Deserialize, Serialize};

use crate::azimuth::validate_phi_range;
use crate::constants::{PhiRange, RadialRange};
use crate::galmock_errors::GalmockError;
use crate::sample_generator::validate_radial_range;

/// Identity of a persisted sample batch.
///
/// The batch file name is derived from the key by [`SampleKey::file_name`] and nowhere else:
///
/// ```text
/// {n}samples_{phi_lo}-{phi_hi}deg.npy
/// {n}samples_{phi_lo}-{phi_hi}deg_{r_lo}-{r_hi}kpc.npy
/// ```
///
/// Bounds are written as decimal literals; integral values keep a trailing `.0`
/// (`0.0`, `8.0`), other values use the shortest representation that round-trips
/// (`6.283185307179586`). The `deg` token is historical: azimuths are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleKey {
    pub n: usize,
    pub phi_range: PhiRange,
    pub r_range: Option<RadialRange>,
}

impl SampleKey {
    /// Build a validated key.
    ///
    /// Return
    /// ------
    /// * `Err(GalmockError::InvalidParameter)` if `n == 0`.
    /// * `Err(GalmockError::InvalidRange)` for an empty or non-finite range.
    pub fn new(
        n: usize,
        phi_range: PhiRange,
        r_range: Option<RadialRange>,
    ) -> Result<Self, GalmockError> {
        if n == 0 {
            return Err(GalmockError::InvalidParameter(
                "sample count must be >= 1".into(),
            ));
        }
        validate_phi_range(phi_range)?;
        if let Some(range) = r_range {
            validate_radial_range(range)?;
        }
        Ok(SampleKey {
            n,
            phi_range,
            r_range,
        })
    }

    /// File name of the batch identified by this key.
    pub fn file_name(&self) -> String {
        let (phi_lo, phi_hi) = self.phi_range;
        let mut name = format!(
            "{}samples_{}-{}deg",
            self.n,
            decimal_literal(phi_lo),
            decimal_literal(phi_hi)
        );
        if let Some((r_lo, r_hi)) = self.r_range {
            name.push_str(&format!(
                "_{}-{}kpc",
                decimal_literal(r_lo),
                decimal_literal(r_hi)
            ));
        }
        name.push_str(".npy");
        name
    }
}

fn decimal_literal(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}
