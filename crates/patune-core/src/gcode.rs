//! G-code instruction vocabulary
//!
//! Every emitted line is one [`Instruction`]. Rendering is fixed-precision:
//! positions and temperatures use 3 decimals, extrusion and pressure advance
//! 4 decimals, feed rates are whole numbers. Firmware accepting the output
//! relies on this exact formatting, so it is not configurable.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Firmware dialect used for machine-specific commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Klipper (`SET_PRESSURE_ADVANCE`, `SET_VELOCITY_LIMIT`)
    #[default]
    Klipper,
    /// Marlin with linear advance (`M900 K`)
    Marlin,
}

impl Flavor {
    /// Static lines sent after the heaters are up: homing, a priming wipe
    /// along the bed edge, motion limits and pressure advance reset.
    pub fn start_sequence(&self) -> &'static [&'static str] {
        match self {
            Flavor::Klipper => &[
                "M220 S100 ;Reset Feedrate",
                "M221 S100 ;Reset Flowrate",
                "G28 ;Home",
                "G92 E0 ;Reset Extruder",
                "G1 Z2.0 F3000 ;Move Z Axis up",
                "G1 X10.1 Y20 Z0.28 F5000.0 ;Start priming wipe",
                "G1 X10.1 Y200.0 Z0.28 F1500.0 E15",
                "G1 X10.4 Y200.0 Z0.28 F5000.0",
                "G1 X10.4 Y20 Z0.28 F1500.0 E30 ;Finish priming wipe",
                "G92 E0 ;Reset Extruder",
                "G1 Z2.0 F3000 ;Move Z Axis up",
                "SET_VELOCITY_LIMIT SQUARE_CORNER_VELOCITY=1 ACCEL=500",
                "SET_PRESSURE_ADVANCE ADVANCE_LOOKAHEAD_TIME=0",
            ],
            Flavor::Marlin => &[
                "M220 S100 ;Reset Feedrate",
                "M221 S100 ;Reset Flowrate",
                "G28 ;Home",
                "G92 E0 ;Reset Extruder",
                "G1 Z2.0 F3000 ;Move Z Axis up",
                "G1 X10.1 Y20 Z0.28 F5000.0 ;Start priming wipe",
                "G1 X10.1 Y200.0 Z0.28 F1500.0 E15",
                "G1 X10.4 Y200.0 Z0.28 F5000.0",
                "G1 X10.4 Y20 Z0.28 F1500.0 E30 ;Finish priming wipe",
                "G92 E0 ;Reset Extruder",
                "G1 Z2.0 F3000 ;Move Z Axis up",
                "M204 P500 ;Set print acceleration",
                "M205 J0.0008 ;Junction deviation for 1 mm/s corners at 500 mm/s^2",
                "M900 K0 ;Reset linear advance",
            ],
        }
    }

    /// Switch to absolute extrusion and zero the device's E axis
    pub fn absolute_extrusion_sequence(&self) -> &'static [&'static str] {
        &["M82", "G92 E0"]
    }

    /// Static lines that lift the nozzle and turn everything off
    pub fn end_sequence(&self) -> &'static [&'static str] {
        &[
            "G91", "G1 Z10 F450", "G90", "M106 S0", "M104 S0", "M140 S0", "M84",
        ]
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Klipper => write!(f, "klipper"),
            Self::Marlin => write!(f, "marlin"),
        }
    }
}

impl FromStr for Flavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "klipper" => Ok(Self::Klipper),
            "marlin" => Ok(Self::Marlin),
            _ => Err(format!("Unknown firmware flavor: {}", s)),
        }
    }
}

/// A single line of generated G-code
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `; text`
    Comment(String),
    /// A fixed line emitted verbatim
    Raw(Cow<'static, str>),
    /// `M140` (set) or `M190` (set and wait)
    SetBedTemperature {
        /// Target temperature (°C)
        celsius: f64,
        /// Block until the target is reached
        wait: bool,
    },
    /// `M104` (set) or `M109` (set and wait)
    SetNozzleTemperature {
        /// Target temperature (°C)
        celsius: f64,
        /// Block until the target is reached
        wait: bool,
    },
    /// `M106 S<duty>`, duty is a PWM value 0..255
    SetFanSpeed(f64),
    /// Flavor-specific pressure advance command
    SetPressureAdvance {
        /// Target firmware dialect
        flavor: Flavor,
        /// Pressure advance value (s)
        advance: f64,
    },
    /// Positioning move in X, Y and Z with a small absolute extrusion target
    Travel {
        /// Target X (mm)
        x: f64,
        /// Target Y (mm)
        y: f64,
        /// Target Z (mm)
        z: f64,
        /// Absolute extruder position (mm)
        extrusion: f64,
        /// Feed rate (mm/min)
        feed_rate: f64,
    },
    /// Extruding move in the XY plane
    Extrude {
        /// Target X (mm)
        x: f64,
        /// Target Y (mm)
        y: f64,
        /// Absolute extruder position (mm)
        extrusion: f64,
        /// Feed rate (mm/min)
        feed_rate: f64,
    },
    /// Z-only move at the firmware's current feed rate
    MoveZ {
        /// Target Z (mm)
        z: f64,
    },
}

impl Instruction {
    /// Verbatim line from a static sequence
    pub fn raw(line: &'static str) -> Self {
        Instruction::Raw(Cow::Borrowed(line))
    }

    /// Absolute extruder position targeted by this instruction, if any
    pub fn extrusion(&self) -> Option<f64> {
        match self {
            Instruction::Travel { extrusion, .. } | Instruction::Extrude { extrusion, .. } => {
                Some(*extrusion)
            }
            _ => None,
        }
    }

    /// Whether this line moves the toolhead
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            Instruction::Travel { .. } | Instruction::Extrude { .. } | Instruction::MoveZ { .. }
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Comment(text) => write!(f, "; {}", text),
            Instruction::Raw(line) => f.write_str(line),
            Instruction::SetBedTemperature { celsius, wait } => {
                let code = if *wait { "M190" } else { "M140" };
                write!(f, "{} S{:.3}", code, celsius)
            }
            Instruction::SetNozzleTemperature { celsius, wait } => {
                let code = if *wait { "M109" } else { "M104" };
                write!(f, "{} S{:.3}", code, celsius)
            }
            Instruction::SetFanSpeed(duty) => write!(f, "M106 S{:.3}", duty),
            Instruction::SetPressureAdvance { flavor, advance } => match flavor {
                Flavor::Klipper => write!(f, "SET_PRESSURE_ADVANCE ADVANCE={:.4}", advance),
                Flavor::Marlin => write!(f, "M900 K{:.4}", advance),
            },
            Instruction::Travel {
                x,
                y,
                z,
                extrusion,
                feed_rate,
            } => write!(
                f,
                "G1 X{:.3} Y{:.3} Z{:.3} E{:.1} F{:.0}",
                x, y, z, extrusion, feed_rate
            ),
            Instruction::Extrude {
                x,
                y,
                extrusion,
                feed_rate,
            } => write!(
                f,
                "G1 X{:.3} Y{:.3} E{:.4} F{:.0}",
                x, y, extrusion, feed_rate
            ),
            Instruction::MoveZ { z } => write!(f, "G1 Z{:.3}", z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heater_formatting() {
        let set = Instruction::SetBedTemperature {
            celsius: 60.0,
            wait: false,
        };
        let wait = Instruction::SetNozzleTemperature {
            celsius: 190.0,
            wait: true,
        };
        assert_eq!(set.to_string(), "M140 S60.000");
        assert_eq!(wait.to_string(), "M109 S190.000");
    }

    #[test]
    fn test_motion_formatting() {
        let travel = Instruction::Travel {
            x: 85.0,
            y: 85.0,
            z: 0.3,
            extrusion: 1.0,
            feed_rate: 9000.0,
        };
        assert_eq!(travel.to_string(), "G1 X85.000 Y85.000 Z0.300 E1.0 F9000");

        let extrude = Instruction::Extrude {
            x: 135.0,
            y: 85.0,
            extrusion: 2.494_51,
            feed_rate: 1200.0,
        };
        assert_eq!(extrude.to_string(), "G1 X135.000 Y85.000 E2.4945 F1200");

        assert_eq!(Instruction::MoveZ { z: 0.6 }.to_string(), "G1 Z0.600");
    }

    #[test]
    fn test_pressure_advance_per_flavor() {
        let klipper = Instruction::SetPressureAdvance {
            flavor: Flavor::Klipper,
            advance: 0.05,
        };
        let marlin = Instruction::SetPressureAdvance {
            flavor: Flavor::Marlin,
            advance: 0.05,
        };
        assert_eq!(klipper.to_string(), "SET_PRESSURE_ADVANCE ADVANCE=0.0500");
        assert_eq!(marlin.to_string(), "M900 K0.0500");
    }

    #[test]
    fn test_fan_and_comment() {
        assert_eq!(Instruction::SetFanSpeed(51.0).to_string(), "M106 S51.000");
        assert_eq!(
            Instruction::Comment("Layers: 60".to_string()).to_string(),
            "; Layers: 60"
        );
        assert_eq!(Instruction::raw("M84").to_string(), "M84");
    }

    #[test]
    fn test_extrusion_accessor() {
        assert_eq!(Instruction::MoveZ { z: 1.0 }.extrusion(), None);
        assert!(Instruction::MoveZ { z: 1.0 }.is_motion());
        assert!(!Instruction::SetFanSpeed(0.0).is_motion());
        let extrude = Instruction::Extrude {
            x: 0.0,
            y: 0.0,
            extrusion: 3.5,
            feed_rate: 60.0,
        };
        assert_eq!(extrude.extrusion(), Some(3.5));
    }

    #[test]
    fn test_flavor_parsing() {
        assert_eq!("Klipper".parse::<Flavor>(), Ok(Flavor::Klipper));
        assert_eq!("marlin".parse::<Flavor>(), Ok(Flavor::Marlin));
        assert!("reprap".parse::<Flavor>().is_err());
        assert_eq!(Flavor::default().to_string(), "klipper");
    }

    #[test]
    fn test_flavor_sequences() {
        for flavor in [Flavor::Klipper, Flavor::Marlin] {
            assert!(flavor.start_sequence().contains(&"G28 ;Home"));
            assert_eq!(flavor.end_sequence().last(), Some(&"M84"));
            assert_eq!(flavor.absolute_extrusion_sequence(), &["M82", "G92 E0"]);
        }
        assert!(Flavor::Klipper
            .start_sequence()
            .contains(&"SET_PRESSURE_ADVANCE ADVANCE_LOOKAHEAD_TIME=0"));
        assert!(Flavor::Marlin.start_sequence().contains(&"M900 K0 ;Reset linear advance"));
    }

    #[test]
    fn test_marlin_limits_corner_speed() {
        // Klipper's square corner velocity has a Marlin junction deviation counterpart
        assert!(Flavor::Klipper
            .start_sequence()
            .iter()
            .any(|line| line.contains("SQUARE_CORNER_VELOCITY=1")));
        assert!(Flavor::Marlin
            .start_sequence()
            .iter()
            .any(|line| line.starts_with("M205 J")));
        assert_eq!(
            Flavor::Marlin.start_sequence().len(),
            Flavor::Klipper.start_sequence().len() + 1
        );
    }
}
