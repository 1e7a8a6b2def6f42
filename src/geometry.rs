//! Pure arithmetic for carton geometry.
//!
//! This module provides the elementary derivation steps the planner
//! composes: clearance expansion, wall expansion and flap lengths.

use crate::types::Dim3;

/// Expands item dimensions by the fit clearance.
///
/// The clearance is applied once per axis, yielding the internal carton
/// dimensions.
///
/// # Parameters
/// * `item_dims` - Dimensions of the item to be boxed
/// * `clearance` - Extra space for the item to fit inside the carton
///
/// # Returns
/// The internal carton dimensions
///
/// # Example
/// ```
/// let internal = internal_dims(Dim3::new(100.0, 50.0, 30.0), 5.0);
/// // internal == Dim3::new(105.0, 55.0, 35.0)
/// ```
pub fn internal_dims(item_dims: Dim3, clearance: f64) -> Dim3 {
    item_dims.expand_uniform(clearance)
}

/// Expands internal dimensions by the wall material.
///
/// Material sits on both sides of every axis, so each dimension grows by
/// twice the thickness, yielding the external carton dimensions.
///
/// # Parameters
/// * `internal` - Internal carton dimensions
/// * `thickness` - Wall material thickness
///
/// # Returns
/// The external carton dimensions
pub fn external_dims(internal: Dim3, thickness: f64) -> Dim3 {
    internal.expand_walls(thickness)
}

/// Calculates a flap length from an external dimension.
///
/// The flap is a fixed fraction of the dimension it folds from.
///
/// # Parameters
/// * `ratio` - Flap length as a fraction of the external dimension
/// * `external` - The external dimension the flap is derived from
///
/// # Returns
/// The flap length, non-negative for non-negative inputs
pub fn flap_length(ratio: f64, external: f64) -> f64 {
    ratio * external
}

/// Extends a panel dimension by a flap on both ends.
///
/// # Parameters
/// * `dimension` - The bare panel dimension
/// * `flap` - Length of a single flap
pub fn with_flaps(dimension: f64, flap: f64) -> f64 {
    dimension + 2.0 * flap
}
