use patune_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters for the pressure advance tuning tower
///
/// Units are mm, mm/s and °C. Defaults describe a 50 mm square with 60
/// swept layers on a 220 x 220 mm bed, sweeping pressure advance 0.0..1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerParameters {
    /// Bed size along X (mm)
    pub bed_x_length: f64,
    /// Bed size along Y (mm)
    pub bed_y_length: f64,
    /// Nozzle diameter, also used as the extrusion width (mm)
    pub nozzle_diameter: f64,
    /// Layer height (mm)
    pub layer_height: f64,
    /// Filament diameter (mm)
    pub filament_diameter: f64,
    /// Nozzle temperature (°C)
    pub nozzle_temp: f64,
    /// Bed temperature (°C)
    pub bed_temp: f64,
    /// Speed for the move to the start corner (mm/s)
    pub travel_speed: f64,
    /// Speed for the slow edges of each layer (mm/s)
    pub slow_print_speed: f64,
    /// Speed for the fast edges of each layer (mm/s)
    pub fast_print_speed: f64,
    /// Speed for every edge of the first layer (mm/s)
    pub first_layer_speed: f64,
    /// Part cooling fan PWM duty, 0..255
    pub cooling_fan_speed: f64,
    /// Side of the printed square (mm). Must fit inside the bed.
    pub rectangle_side_length: f64,
    /// Number of swept layers, excluding the first layer and the two finishing layers
    pub layers: u32,
    /// Pressure advance of the first swept layer
    #[serde(alias = "PA_min")]
    pub pa_min: f64,
    /// Pressure advance of the finishing layers
    #[serde(alias = "PA_max")]
    pub pa_max: f64,
}

impl Default for TowerParameters {
    fn default() -> Self {
        Self {
            bed_x_length: 220.0,
            bed_y_length: 220.0,
            nozzle_diameter: 0.4,
            layer_height: 0.3,
            filament_diameter: 1.75,
            nozzle_temp: 190.0,
            bed_temp: 60.0,
            travel_speed: 150.0,
            slow_print_speed: 15.0,
            fast_print_speed: 120.0,
            first_layer_speed: 20.0,
            cooling_fan_speed: 51.0,
            rectangle_side_length: 50.0,
            layers: 60,
            pa_min: 0.0,
            pa_max: 1.0,
        }
    }
}

/// Highest PWM duty accepted by `M106`
pub const MAX_FAN_DUTY: f64 = 255.0;

/// Upper bound on swept layers
pub const MAX_LAYERS: u32 = 100_000;

impl TowerParameters {
    /// Validate all parameters
    ///
    /// Runs before any G-code is emitted so that generation either
    /// produces the complete program or nothing at all.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("bed_x_length", self.bed_x_length),
            ("bed_y_length", self.bed_y_length),
            ("nozzle_diameter", self.nozzle_diameter),
            ("layer_height", self.layer_height),
            ("filament_diameter", self.filament_diameter),
            ("travel_speed", self.travel_speed),
            ("slow_print_speed", self.slow_print_speed),
            ("fast_print_speed", self.fast_print_speed),
            ("first_layer_speed", self.first_layer_speed),
            ("rectangle_side_length", self.rectangle_side_length),
        ];
        for (name, value) in positive {
            require_finite(name, value)?;
            if value <= 0.0 {
                return Err(Error::invalid_parameter(
                    name,
                    format!("must be greater than 0 (got {})", value),
                ));
            }
        }

        let non_negative = [
            ("nozzle_temp", self.nozzle_temp),
            ("bed_temp", self.bed_temp),
            ("cooling_fan_speed", self.cooling_fan_speed),
        ];
        for (name, value) in non_negative {
            require_finite(name, value)?;
            if value < 0.0 {
                return Err(Error::invalid_parameter(
                    name,
                    format!("must not be negative (got {})", value),
                ));
            }
        }

        if self.cooling_fan_speed > MAX_FAN_DUTY {
            return Err(Error::invalid_parameter(
                "cooling_fan_speed",
                format!(
                    "PWM duty must be at most {} (got {})",
                    MAX_FAN_DUTY, self.cooling_fan_speed
                ),
            ));
        }

        require_finite("pa_min", self.pa_min)?;
        require_finite("pa_max", self.pa_max)?;

        if self.layers == 0 {
            return Err(Error::invalid_parameter("layers", "must be at least 1"));
        }
        if self.layers > MAX_LAYERS {
            return Err(Error::invalid_parameter(
                "layers",
                format!("must be at most {} (got {})", MAX_LAYERS, self.layers),
            ));
        }

        Ok(())
    }

    /// Whether the square fits strictly inside the bed on both axes
    pub fn fits_on_bed(&self) -> bool {
        self.rectangle_side_length < self.bed_x_length
            && self.rectangle_side_length < self.bed_y_length
    }

    /// Lower-left corner of the square, centred on the bed
    pub fn square_origin(&self) -> (f64, f64) {
        (
            self.bed_x_length / 2.0 - self.rectangle_side_length / 2.0,
            self.bed_y_length / 2.0 - self.rectangle_side_length / 2.0,
        )
    }
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            name,
            format!("must be a finite number (got {})", value),
        ))
    }
}
