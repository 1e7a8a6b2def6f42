//! Data models for carton dimensioning.
//!
//! This module defines the fundamental data structures of the service:
//! - `Item`: A rectangular item to be boxed, with dimensions
//! - `BoxPlan`: The complete set of derived carton dimensions
//! - `BasePanel`, `SidePanel`, `FrontPanel`: The cut panels of the carton
//!
//! All structures are plain values; a plan is computed once and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToSchema;

use crate::types::{Dim3, Dimensional};

/// Validation error for item or rule data.
#[derive(Debug, Clone)]
pub enum ValidationError {
    InvalidDimension(String),
    InvalidRule(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidDimension(msg) => write!(f, "Invalid dimension: {}", msg),
            ValidationError::InvalidRule(msg) => write!(f, "Invalid rule: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Helper function to validate a single strictly positive dimension.
fn validate_dimension(value: f64, name: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidDimension(format!(
            "{} must be positive, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Helper function to validate a non-negative rule value (clearance, thickness).
pub(crate) fn validate_non_negative(value: f64, name: &str) -> Result<(), ValidationError> {
    if value < 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidRule(format!(
            "{} must be non-negative, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Helper function to validate the flap ratio.
///
/// A ratio of 1 or more produces a flap longer than the dimension it is
/// cut from, which cannot be folded.
pub(crate) fn validate_flap_ratio(value: f64) -> Result<(), ValidationError> {
    if !(0.0..1.0).contains(&value) || value.is_nan() {
        return Err(ValidationError::InvalidRule(format!(
            "Flap ratio must be in [0, 1), got: {}",
            value
        )));
    }
    Ok(())
}

/// Validates all three dimensions of an item together.
fn validate_item_dims(dims: (f64, f64, f64)) -> Result<(), ValidationError> {
    validate_dimension(dims.0, "Height")?;
    validate_dimension(dims.1, "Width")?;
    validate_dimension(dims.2, "Length")?;
    Ok(())
}

/// Represents a rectangular item to be boxed.
///
/// # Fields
/// * `id` - Unique identification number of the item
/// * `dims` - Dimensions (height, width, length) in units
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: usize,
    #[schema(value_type = [f64; 3], example = json!([100.0, 50.0, 30.0]))]
    pub dims: (f64, f64, f64),
}

impl Item {
    /// Creates a new item with validation.
    ///
    /// # Parameters
    /// * `id` - Unique ID
    /// * `dims` - Dimensions (height, width, length)
    ///
    /// # Returns
    /// `Ok(Item)` for valid values, otherwise `Err(ValidationError)`
    ///
    /// # Examples
    /// ```
    /// use carton_sizer::model::Item;
    ///
    /// let item_ok = Item::new(1, (100.0, 50.0, 30.0));
    /// assert!(item_ok.is_ok());
    ///
    /// let item_invalid = Item::new(1, (-100.0, 50.0, 30.0));
    /// assert!(item_invalid.is_err());
    /// ```
    pub fn new(id: usize, dims: (f64, f64, f64)) -> Result<Self, ValidationError> {
        validate_item_dims(dims)?;
        Ok(Self { id, dims })
    }

    /// Converts the dimensions to a Dim3.
    #[inline]
    pub fn dims_as_dim3(&self) -> Dim3 {
        Dim3::from_tuple(self.dims)
    }
}

impl Dimensional for Item {
    fn dimensions(&self) -> Dim3 {
        self.dims_as_dim3()
    }
}

/// The base panel of the carton.
///
/// Its footprint is the external height by the external width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BasePanel {
    pub height: f64,
    pub width: f64,
}

/// A side panel of the carton, including the end flaps.
///
/// # Fields
/// * `height` - External carton height
/// * `length` - External carton length plus a flap on both ends
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SidePanel {
    pub height: f64,
    pub length: f64,
}

/// A front or back panel of the carton, including the top and bottom flaps.
///
/// # Fields
/// * `height` - External carton height plus a flap at top and bottom
/// * `width` - External carton width
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FrontPanel {
    pub height: f64,
    pub width: f64,
}

/// The complete set of derived carton dimensions for one item.
///
/// A plan is a pure function of the item dimensions and the carton rules;
/// every field is derived, none is ever written after construction.
///
/// # Fields
/// * `internal` - Internal carton dimensions (item plus clearance)
/// * `external` - External carton dimensions (internal plus walls)
/// * `flap_height` - Flap length derived from the external height
/// * `flap_width` - Flap length derived from the external width
/// * `base_panel` - Base panel footprint
/// * `side_panel` - Side panel including end flaps
/// * `front_panel` - Front/back panel including top and bottom flaps
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BoxPlan {
    pub internal: Dim3,
    pub external: Dim3,
    pub flap_height: f64,
    pub flap_width: f64,
    pub base_panel: BasePanel,
    pub side_panel: SidePanel,
    pub front_panel: FrontPanel,
}

/// A planned item: the input item together with its computed plan.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PlannedItem {
    pub item: Item,
    pub plan: BoxPlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_accepts_valid_dimensions() {
        let item = Item::new(1, (100.0, 50.0, 30.0)).unwrap();
        assert_eq!(item.id, 1);
        assert_eq!(item.dims_as_dim3(), Dim3::new(100.0, 50.0, 30.0));
    }

    #[test]
    fn item_rejects_non_positive_dimensions() {
        assert!(Item::new(1, (0.0, 50.0, 30.0)).is_err());
        assert!(Item::new(1, (100.0, -50.0, 30.0)).is_err());
        assert!(Item::new(1, (100.0, 50.0, f64::NAN)).is_err());
        assert!(Item::new(1, (100.0, 50.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn item_volume_via_dimensional_trait() {
        let item = Item::new(1, (10.0, 20.0, 30.0)).unwrap();
        assert_eq!(Dimensional::volume(&item), 6000.0);
    }

    #[test]
    fn validate_non_negative_allows_zero() {
        assert!(validate_non_negative(0.0, "Tolerance").is_ok());
        assert!(validate_non_negative(5.0, "Tolerance").is_ok());
        assert!(validate_non_negative(-0.1, "Tolerance").is_err());
        assert!(validate_non_negative(f64::NAN, "Tolerance").is_err());
    }

    #[test]
    fn validate_flap_ratio_bounds() {
        assert!(validate_flap_ratio(0.0).is_ok());
        assert!(validate_flap_ratio(0.2).is_ok());
        assert!(validate_flap_ratio(0.999).is_ok());
        assert!(validate_flap_ratio(1.0).is_err());
        assert!(validate_flap_ratio(-0.1).is_err());
        assert!(validate_flap_ratio(f64::NAN).is_err());
    }

    #[test]
    fn validation_error_messages_name_the_field() {
        let err = Item::new(1, (-1.0, 2.0, 3.0)).unwrap_err();
        assert!(err.to_string().contains("Height"));

        let err = validate_flap_ratio(1.5).unwrap_err();
        assert!(err.to_string().contains("Flap ratio"));
    }
}
