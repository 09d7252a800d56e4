//! Pressure advance schedule of the tower
//!
//! Layer 1 is printed at `layer_height` with pressure advance disabled.
//! Swept layer `i` (0-based) sits at `(i + 2) * layer_height` and uses
//! `pa_min + i / layers * (pa_max - pa_min)`. Two finishing layers at
//! `pa_max` close the tower. Measuring the height of the best-looking band
//! and passing it to [`advance_for_height`] gives the value to configure.

use crate::parameters::TowerParameters;
use patune_core::{Error, Result};
use serde::Serialize;

/// Number of finishing layers printed at `pa_max`
pub const FINISHING_LAYERS: u32 = 2;

/// Role of a printed layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Adhesion layer, no pressure advance and no fan
    First,
    /// Layer of the sweep
    Sweep,
    /// Reference layer at `pa_max`
    Finishing,
}

/// One printed layer of the tower
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerPlan {
    /// 1-based position in print order
    pub number: u32,
    /// Role of the layer
    pub kind: LayerKind,
    /// Nozzle height while printing the layer (mm)
    pub z: f64,
    /// Pressure advance in effect
    pub advance: f64,
}

/// Pressure advance for swept layer `index` (0-based)
pub fn advance_for_layer(params: &TowerParameters, index: u32) -> f64 {
    let fraction = f64::from(index) / f64::from(params.layers);
    fraction * (params.pa_max - params.pa_min) + params.pa_min
}

/// Height of the finished tower (mm)
pub fn tower_height(params: &TowerParameters) -> f64 {
    params.layer_height * f64::from(printed_layers(params))
}

/// Layers printed in total: the first layer, the sweep and the finishing layers
pub fn printed_layers(params: &TowerParameters) -> u32 {
    params.layers.saturating_add(1 + FINISHING_LAYERS)
}

/// Every printed layer in print order
pub fn schedule(params: &TowerParameters) -> Vec<LayerPlan> {
    (1..=printed_layers(params))
        .map(|number| {
            let z = params.layer_height * f64::from(number);
            let (kind, advance) = if number == 1 {
                (LayerKind::First, 0.0)
            } else if number - 2 < params.layers {
                (LayerKind::Sweep, advance_for_layer(params, number - 2))
            } else {
                (LayerKind::Finishing, params.pa_max)
            };
            LayerPlan {
                number,
                kind,
                z,
                advance,
            }
        })
        .collect()
}

/// Pressure advance printed at a measured height
///
/// The height is snapped to the nearest layer. Heights inside the first
/// layer or above the tower are rejected.
pub fn advance_for_height(params: &TowerParameters, height: f64) -> Result<f64> {
    params.validate()?;

    let min = params.layer_height * 2.0;
    let max = tower_height(params);
    let out_of_range = || Error::HeightOutOfRange { height, min, max };

    if !height.is_finite() {
        return Err(out_of_range());
    }

    let number = (height / params.layer_height).round();
    if number < 2.0 || number > f64::from(printed_layers(params)) {
        return Err(out_of_range());
    }

    // number is within 2..=layers + 3 here
    let index = number as u32 - 2;
    if index >= params.layers {
        Ok(params.pa_max)
    } else {
        Ok(advance_for_layer(params, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_interpolation() {
        let params = TowerParameters::default();
        assert_eq!(advance_for_layer(&params, 0), 0.0);
        assert!((advance_for_layer(&params, 30) - 0.5).abs() < 1e-12);
        assert!((advance_for_layer(&params, 59) - 0.98333).abs() < 1e-5);
    }

    #[test]
    fn test_advance_with_offset_range() {
        let params = TowerParameters {
            layers: 10,
            pa_min: 0.02,
            pa_max: 0.12,
            ..Default::default()
        };
        assert_eq!(advance_for_layer(&params, 0), 0.02);
        assert!((advance_for_layer(&params, 5) - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_tower_height() {
        let params = TowerParameters::default();
        assert!((tower_height(&params) - 18.9).abs() < 1e-9);
    }

    #[test]
    fn test_schedule_shape() {
        let params = TowerParameters {
            layers: 4,
            ..Default::default()
        };
        let plan = schedule(&params);
        assert_eq!(plan.len(), 7);
        assert_eq!(plan[0].kind, LayerKind::First);
        assert_eq!(plan[0].advance, 0.0);
        assert_eq!(plan[1].kind, LayerKind::Sweep);
        assert_eq!(plan[1].advance, 0.0);
        assert_eq!(plan[4].kind, LayerKind::Sweep);
        assert!((plan[4].advance - 0.75).abs() < 1e-12);
        assert_eq!(plan[5].kind, LayerKind::Finishing);
        assert_eq!(plan[6].advance, 1.0);
        assert!((plan[6].z - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_lookup_by_height() {
        let params = TowerParameters::default();
        // Swept layer 10 is printed at 12 * 0.3 = 3.6 mm
        let advance = advance_for_height(&params, 3.6).unwrap();
        assert!((advance - 10.0 / 60.0).abs() < 1e-12);

        // Caliper readings snap to the nearest layer
        let advance = advance_for_height(&params, 3.65).unwrap();
        assert!((advance - 10.0 / 60.0).abs() < 1e-12);

        // Finishing layers
        assert_eq!(advance_for_height(&params, 18.6).unwrap(), 1.0);
        assert_eq!(advance_for_height(&params, 18.9).unwrap(), 1.0);
    }

    #[test]
    fn test_lookup_out_of_range() {
        let params = TowerParameters::default();
        let err = advance_for_height(&params, 0.3).unwrap_err();
        assert!(matches!(err, Error::HeightOutOfRange { .. }));
        assert!(advance_for_height(&params, 25.0).is_err());
        assert!(advance_for_height(&params, f64::NAN).is_err());
    }

    #[test]
    fn test_huge_layer_count() {
        let params = TowerParameters {
            layers: u32::MAX,
            ..Default::default()
        };
        assert_eq!(printed_layers(&params), u32::MAX);
        assert!(tower_height(&params).is_finite());

        let err = advance_for_height(&params, 3.6).unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}
