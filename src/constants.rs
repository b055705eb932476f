//! # Constants and type definitions for galmock
//!
//! This module centralizes the **unit system**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! Every dynamical quantity handled internally (distribution-function draws, potentials,
//! orbit integration) is expressed in **natural units**:
//!
//! - lengths in units of `ro` (default 8 kpc, the solar galactocentric radius),
//! - velocities in units of `vo` (default 220 km/s, the local circular velocity),
//! - times in units of `ro / vo`.
//!
//! Physical units only appear at the edges: radius ranges supplied by callers (kpc),
//! integration times (Gyr), and the persisted sample batches (kpc, km/s).

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Default natural length unit in kiloparsecs
pub const RO_KPC: f64 = 8.0;

/// Default natural velocity unit in km/s
pub const VO_KMS: f64 = 220.0;

/// One km/s expressed in pc/Myr
pub const KMS_IN_PC_PER_MYR: f64 = 1.022_712_165_053_707_7;

/// Number of seconds in a day, threshold above which completion dates are displayed
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Step used by the symmetric finite differences
pub const FINITE_DIFF_STEP: f64 = 1e-6;

/// Relative pivot tolerance used by the row reduction of [`crate::linear_algebra`]
pub const PIVOT_EPS: f64 = 1e-10;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Distance in kiloparsecs
pub type Kpc = f64;
/// Velocity in km/s
pub type KmPerSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Duration in gigayears
pub type Gyr = f64;

/// Closed interval `[lo, hi]` of galactocentric radii, in kiloparsecs
pub type RadialRange = (Kpc, Kpc);

/// Half-open interval `[lo, hi)` of azimuths, in radians
pub type PhiRange = (Radian, Radian);

/// Natural time unit expressed in Gyr for a given `(ro, vo)` unit system.
///
/// Arguments
/// ---------
/// * `ro`: natural length unit in kpc
/// * `vo`: natural velocity unit in km/s
///
/// Return
/// ------
/// * The duration, in Gyr, of one natural time unit (`ro / vo`).
pub fn time_in_gyr(ro: Kpc, vo: KmPerSec) -> Gyr {
    ro / vo / KMS_IN_PC_PER_MYR
}
