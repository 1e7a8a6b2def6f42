//! Carton planning logic.
//!
//! This module derives the full set of carton dimensions for an item:
//! internal dimensions from the fit clearance, external dimensions from the
//! wall thickness, flap lengths from the flap ratio, and the three cut
//! panels (base, side, front/back). The derivation is a fixed chain of
//! arithmetic steps with no branches and no state; each stage consumes the
//! previous stage's output.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geometry::{external_dims, flap_length, internal_dims, with_flaps};
use crate::model::{
    BasePanel, BoxPlan, FrontPanel, Item, PlannedItem, SidePanel, ValidationError,
    validate_flap_ratio, validate_non_negative,
};
use crate::types::Dim3;

/// Rule constants for carton construction.
///
/// Contains the three process parameters that turn item dimensions into a
/// carton plan.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartonRules {
    /// Extra space for the item to fit inside the carton, applied per axis
    pub fit_tolerance: f64,
    /// Thickness of the wall material, applied on both sides of each axis
    pub material_thickness: f64,
    /// Flap length as a fraction of the external height/width (0.0 to 1.0 exclusive)
    pub flap_ratio: f64,
}

impl CartonRules {
    pub const DEFAULT_FIT_TOLERANCE: f64 = 5.0;
    pub const DEFAULT_MATERIAL_THICKNESS: f64 = 3.0;
    pub const DEFAULT_FLAP_RATIO: f64 = 0.2;

    /// Creates a builder for custom rules.
    pub fn builder() -> CartonRulesBuilder {
        CartonRulesBuilder::default()
    }

    /// Validates the rule values.
    ///
    /// The planner itself never checks its inputs; callers that want to
    /// reject physically meaningless rules use this before planning.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_negative(self.fit_tolerance, "Fit tolerance")?;
        validate_non_negative(self.material_thickness, "Material thickness")?;
        validate_flap_ratio(self.flap_ratio)?;
        Ok(())
    }
}

impl Default for CartonRules {
    fn default() -> Self {
        Self {
            fit_tolerance: Self::DEFAULT_FIT_TOLERANCE,
            material_thickness: Self::DEFAULT_MATERIAL_THICKNESS,
            flap_ratio: Self::DEFAULT_FLAP_RATIO,
        }
    }
}

/// Builder pattern for CartonRules.
#[derive(Clone, Debug, Default)]
pub struct CartonRulesBuilder {
    rules: CartonRules,
}

impl CartonRulesBuilder {
    /// Sets the fit tolerance.
    pub fn fit_tolerance(mut self, tolerance: f64) -> Self {
        self.rules.fit_tolerance = tolerance;
        self
    }

    /// Sets the material thickness.
    pub fn material_thickness(mut self, thickness: f64) -> Self {
        self.rules.material_thickness = thickness;
        self
    }

    /// Sets the flap ratio.
    pub fn flap_ratio(mut self, ratio: f64) -> Self {
        self.rules.flap_ratio = ratio;
        self
    }

    /// Creates the final rules.
    pub fn build(self) -> CartonRules {
        self.rules
    }
}

/// Derives the carton plan for one set of item dimensions.
///
/// The derivation is total and deterministic for any finite numeric input:
/// no branch, no loop, no early exit. It performs no validation and will
/// propagate physically meaningless results (e.g., negative panel sizes)
/// for invalid input; use [`plan_box_checked`] to reject such input.
///
/// # Parameters
/// * `item_dims` - Dimensions of the item to be boxed
/// * `rules` - Rule constants for the carton construction
///
/// # Returns
/// The complete `BoxPlan` for the item
///
/// # Examples
/// ```
/// use carton_sizer::planner::{CartonRules, plan_box};
/// use carton_sizer::types::Dim3;
///
/// let plan = plan_box(Dim3::new(100.0, 50.0, 30.0), CartonRules::default());
/// assert_eq!(plan.external, Dim3::new(111.0, 61.0, 41.0));
/// ```
pub fn plan_box(item_dims: Dim3, rules: CartonRules) -> BoxPlan {
    let internal = internal_dims(item_dims, rules.fit_tolerance);
    let external = external_dims(internal, rules.material_thickness);

    // Top/bottom flaps fold from height, end flaps from width.
    let flap_height = flap_length(rules.flap_ratio, external.height);
    let flap_width = flap_length(rules.flap_ratio, external.width);

    let base_panel = BasePanel {
        height: external.height,
        width: external.width,
    };
    let side_panel = SidePanel {
        height: external.height,
        length: with_flaps(external.length, flap_width),
    };
    let front_panel = FrontPanel {
        height: with_flaps(external.height, flap_height),
        width: external.width,
    };

    BoxPlan {
        internal,
        external,
        flap_height,
        flap_width,
        base_panel,
        side_panel,
        front_panel,
    }
}

/// Derives the carton plan after validating the inputs.
///
/// Rejects non-positive or non-finite item dimensions, negative tolerance
/// or thickness, and a flap ratio outside `[0, 1)`. The arithmetic itself
/// is the same as in [`plan_box`].
///
/// # Parameters
/// * `item_dims` - Dimensions of the item to be boxed
/// * `rules` - Rule constants for the carton construction
///
/// # Returns
/// `Ok(BoxPlan)` for valid input, otherwise `Err(ValidationError)`
pub fn plan_box_checked(item_dims: Dim3, rules: CartonRules) -> Result<BoxPlan, ValidationError> {
    if !item_dims.is_valid_dimension() {
        return Err(ValidationError::InvalidDimension(format!(
            "Item dimensions must be positive and finite, got: {:?}",
            item_dims.as_tuple()
        )));
    }
    rules.validate()?;
    Ok(plan_box(item_dims, rules))
}

/// Plans one carton per item.
///
/// Items are planned independently; the order of the input is preserved and
/// ids are carried through untouched.
///
/// # Parameters
/// * `items` - The items to plan cartons for
/// * `rules` - Rule constants applied to every item
pub fn plan_items(items: Vec<Item>, rules: CartonRules) -> Vec<PlannedItem> {
    items
        .into_iter()
        .map(|item| {
            let plan = plan_box(item.dims_as_dim3(), rules);
            PlannedItem { item, plan }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EPSILON_GENERAL;

    fn sample_rules() -> CartonRules {
        CartonRules {
            fit_tolerance: 5.0,
            material_thickness: 3.0,
            flap_ratio: 0.2,
        }
    }

    fn sample_item_dims() -> Dim3 {
        Dim3::new(100.0, 50.0, 30.0)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON_GENERAL,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn sample_item_produces_reference_plan() {
        let plan = plan_box(sample_item_dims(), sample_rules());

        assert_eq!(plan.internal, Dim3::new(105.0, 55.0, 35.0));
        assert_eq!(plan.external, Dim3::new(111.0, 61.0, 41.0));

        assert_close(plan.flap_height, 22.2);
        assert_close(plan.flap_width, 12.2);

        assert_eq!(plan.base_panel.height, 111.0);
        assert_eq!(plan.base_panel.width, 61.0);

        assert_eq!(plan.side_panel.height, 111.0);
        assert_close(plan.side_panel.length, 65.4);

        assert_close(plan.front_panel.height, 155.4);
        assert_eq!(plan.front_panel.width, 61.0);
    }

    #[test]
    fn external_equals_item_plus_tolerance_plus_double_thickness() {
        let rules = sample_rules();
        let dims = sample_item_dims();
        let plan = plan_box(dims, rules);

        let expected = dims.height + rules.fit_tolerance + 2.0 * rules.material_thickness;
        assert_close(plan.external.height, expected);
        let expected = dims.width + rules.fit_tolerance + 2.0 * rules.material_thickness;
        assert_close(plan.external.width, expected);
        let expected = dims.length + rules.fit_tolerance + 2.0 * rules.material_thickness;
        assert_close(plan.external.length, expected);
    }

    #[test]
    fn external_encloses_internal_encloses_item() {
        let plan = plan_box(sample_item_dims(), sample_rules());

        assert!(sample_item_dims().fits_within(&plan.internal, EPSILON_GENERAL));
        assert!(plan.internal.fits_within(&plan.external, EPSILON_GENERAL));
        assert!(plan.internal.height > sample_item_dims().height);
        assert!(plan.external.height > plan.internal.height);
    }

    #[test]
    fn zero_tolerance_and_thickness_collapse_to_item_dimensions() {
        let rules = CartonRules::builder()
            .fit_tolerance(0.0)
            .material_thickness(0.0)
            .flap_ratio(0.2)
            .build();
        let plan = plan_box(sample_item_dims(), rules);

        assert_eq!(plan.internal, sample_item_dims());
        assert_eq!(plan.external, sample_item_dims());
    }

    #[test]
    fn side_panel_length_matches_algebraic_identity() {
        let rules = sample_rules();
        let plan = plan_box(sample_item_dims(), rules);

        let expected = plan.external.length + 2.0 * rules.flap_ratio * plan.external.width;
        assert_close(plan.side_panel.length, expected);
    }

    #[test]
    fn front_panel_height_matches_algebraic_identity() {
        let rules = sample_rules();
        let plan = plan_box(sample_item_dims(), rules);

        let expected = plan.external.height * (1.0 + 2.0 * rules.flap_ratio);
        assert_close(plan.front_panel.height, expected);
    }

    #[test]
    fn larger_flap_ratio_grows_flapped_dimensions_only() {
        let narrow = plan_box(sample_item_dims(), CartonRules::builder().flap_ratio(0.2).build());
        let wide = plan_box(sample_item_dims(), CartonRules::builder().flap_ratio(0.3).build());

        assert!(wide.flap_height > narrow.flap_height);
        assert!(wide.flap_width > narrow.flap_width);
        assert!(wide.side_panel.length > narrow.side_panel.length);
        assert!(wide.front_panel.height > narrow.front_panel.height);

        assert_eq!(wide.base_panel, narrow.base_panel);
        assert_eq!(wide.side_panel.height, narrow.side_panel.height);
        assert_eq!(wide.front_panel.width, narrow.front_panel.width);
    }

    #[test]
    fn zero_flap_ratio_leaves_panels_bare() {
        let plan = plan_box(sample_item_dims(), CartonRules::builder().flap_ratio(0.0).build());

        assert_eq!(plan.flap_height, 0.0);
        assert_eq!(plan.flap_width, 0.0);
        assert_eq!(plan.side_panel.length, plan.external.length);
        assert_eq!(plan.front_panel.height, plan.external.height);
    }

    #[test]
    fn planning_twice_yields_identical_plans() {
        let first = plan_box(sample_item_dims(), sample_rules());
        let second = plan_box(sample_item_dims(), sample_rules());
        assert_eq!(first, second);
    }

    #[test]
    fn unchecked_planner_propagates_meaningless_input() {
        // The bare derivation never fails; nonsense in, nonsense out.
        let plan = plan_box(
            Dim3::new(-10.0, 5.0, 5.0),
            CartonRules::builder().fit_tolerance(-1.0).build(),
        );
        assert!(plan.internal.height < 0.0);
    }

    #[test]
    fn checked_planner_rejects_invalid_item_dimensions() {
        let result = plan_box_checked(Dim3::new(-10.0, 5.0, 5.0), sample_rules());
        assert!(matches!(result, Err(ValidationError::InvalidDimension(_))));

        let result = plan_box_checked(Dim3::new(f64::NAN, 5.0, 5.0), sample_rules());
        assert!(matches!(result, Err(ValidationError::InvalidDimension(_))));
    }

    #[test]
    fn checked_planner_rejects_invalid_rules() {
        let rules = CartonRules::builder().fit_tolerance(-1.0).build();
        assert!(matches!(
            plan_box_checked(sample_item_dims(), rules),
            Err(ValidationError::InvalidRule(_))
        ));

        let rules = CartonRules::builder().material_thickness(-1.0).build();
        assert!(matches!(
            plan_box_checked(sample_item_dims(), rules),
            Err(ValidationError::InvalidRule(_))
        ));

        let rules = CartonRules::builder().flap_ratio(1.0).build();
        assert!(matches!(
            plan_box_checked(sample_item_dims(), rules),
            Err(ValidationError::InvalidRule(_))
        ));
    }

    #[test]
    fn checked_planner_accepts_boundary_rules() {
        let rules = CartonRules::builder()
            .fit_tolerance(0.0)
            .material_thickness(0.0)
            .flap_ratio(0.0)
            .build();
        let plan = plan_box_checked(sample_item_dims(), rules).unwrap();
        assert_eq!(plan.external, sample_item_dims());
    }

    #[test]
    fn plan_items_preserves_order_and_ids() {
        let items = vec![
            Item::new(7, (100.0, 50.0, 30.0)).unwrap(),
            Item::new(3, (10.0, 10.0, 10.0)).unwrap(),
        ];

        let planned = plan_items(items, sample_rules());
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].item.id, 7);
        assert_eq!(planned[1].item.id, 3);
        assert_eq!(planned[0].plan.external, Dim3::new(111.0, 61.0, 41.0));
        assert_eq!(planned[1].plan.external, Dim3::new(21.0, 21.0, 21.0));
    }

    #[test]
    fn default_rules_match_named_constants() {
        let rules = CartonRules::default();
        assert_eq!(rules.fit_tolerance, CartonRules::DEFAULT_FIT_TOLERANCE);
        assert_eq!(
            rules.material_thickness,
            CartonRules::DEFAULT_MATERIAL_THICKNESS
        );
        assert_eq!(rules.flap_ratio, CartonRules::DEFAULT_FLAP_RATIO);
    }

    #[test]
    fn builder_overrides_single_fields() {
        let rules = CartonRules::builder().material_thickness(1.5).build();
        assert_eq!(rules.material_thickness, 1.5);
        assert_eq!(rules.fit_tolerance, CartonRules::DEFAULT_FIT_TOLERANCE);
        assert_eq!(rules.flap_ratio, CartonRules::DEFAULT_FLAP_RATIO);
    }
}
