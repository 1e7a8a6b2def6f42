//! Common value types for carton dimensioning.
//!
//! This module defines the reusable length-triple type and the shared
//! numerical tolerance used across the crate.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Global numerical tolerance for floating-point comparisons.
///
/// Used for dimension comparisons and test assertions.
pub const EPSILON_GENERAL: f64 = 1e-6;

/// A triple of lengths along the three box axes.
///
/// Used for item dimensions as well as derived internal and external
/// carton dimensions. All components share one length unit (millimeters
/// by convention).
///
/// # Examples
/// ```
/// use carton_sizer::types::Dim3;
///
/// let item = Dim3::new(100.0, 50.0, 30.0);
/// let with_clearance = item.expand_uniform(5.0);
/// assert_eq!(with_clearance, Dim3::new(105.0, 55.0, 35.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dim3 {
    pub height: f64,
    pub width: f64,
    pub length: f64,
}

impl Dim3 {
    /// Creates a new dimension triple.
    ///
    /// # Parameters
    /// * `height` - Extent along the vertical axis
    /// * `width` - Extent along the horizontal axis
    /// * `length` - Extent along the depth axis
    #[inline]
    pub const fn new(height: f64, width: f64, length: f64) -> Self {
        Self {
            height,
            width,
            length,
        }
    }

    /// Creates a zero triple.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Converts to tuple format for API compatibility.
    #[inline]
    pub const fn as_tuple(&self) -> (f64, f64, f64) {
        (self.height, self.width, self.length)
    }

    /// Creates from tuple format.
    #[inline]
    pub const fn from_tuple(tuple: (f64, f64, f64)) -> Self {
        Self::new(tuple.0, tuple.1, tuple.2)
    }

    /// Adds the same amount to every component.
    ///
    /// Used for fit clearance, which is applied once per axis.
    #[inline]
    pub fn expand_uniform(&self, amount: f64) -> Self {
        Self::new(
            self.height + amount,
            self.width + amount,
            self.length + amount,
        )
    }

    /// Adds twice the given amount to every component.
    ///
    /// Used for wall material, which sits on both sides of each axis.
    #[inline]
    pub fn expand_walls(&self, thickness: f64) -> Self {
        self.expand_uniform(2.0 * thickness)
    }

    /// Calculates the volume (product of all components).
    #[inline]
    pub fn volume(&self) -> f64 {
        self.height * self.width * self.length
    }

    /// Checks if all components are positive and finite.
    #[inline]
    pub fn is_valid_dimension(&self) -> bool {
        self.height > 0.0
            && self.width > 0.0
            && self.length > 0.0
            && self.height.is_finite()
            && self.width.is_finite()
            && self.length.is_finite()
    }

    /// Checks if the triple fits within another triple (component-wise <=).
    ///
    /// # Parameters
    /// * `container` - The outer triple (e.g., internal carton dimensions)
    /// * `tolerance` - Numerical tolerance for the comparison
    #[inline]
    pub fn fits_within(&self, container: &Self, tolerance: f64) -> bool {
        self.height <= container.height + tolerance
            && self.width <= container.width + tolerance
            && self.length <= container.length + tolerance
    }
}

impl Add for Dim3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.height + rhs.height,
            self.width + rhs.width,
            self.length + rhs.length,
        )
    }
}

impl Mul<f64> for Dim3 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(
            self.height * scalar,
            self.width * scalar,
            self.length * scalar,
        )
    }
}

impl From<(f64, f64, f64)> for Dim3 {
    #[inline]
    fn from(tuple: (f64, f64, f64)) -> Self {
        Self::from_tuple(tuple)
    }
}

impl From<Dim3> for (f64, f64, f64) {
    #[inline]
    fn from(dims: Dim3) -> Self {
        dims.as_tuple()
    }
}

/// Trait for objects with carton-relevant dimensions.
///
/// Provides a common interface for everything with a spatial extent.
pub trait Dimensional {
    /// Returns the dimensions of the object.
    fn dimensions(&self) -> Dim3;

    /// Calculates the volume.
    fn volume(&self) -> f64 {
        self.dimensions().volume()
    }

    /// Checks if this object fits in a carton with the given internal dimensions.
    fn fits_in(&self, internal_dims: &Dim3, tolerance: f64) -> bool {
        self.dimensions().fits_within(internal_dims, tolerance)
    }
}
