use crate::cursor::Cursor;
use crate::extrusion::extrusion_length_for_path_length;
use crate::parameters::TowerParameters;
use crate::schedule::{advance_for_layer, printed_layers, tower_height, FINISHING_LAYERS};
use crate::sink::{render, InstructionSink};
use patune_core::{feed_rate_from_speed, Flavor, Instruction, Result};
use tracing::{debug, info, warn};

/// Filament pushed (absolute E) on the travel to the start corner
pub const PRIME_EXTRUSION: f64 = 1.0;

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerSummary {
    /// Lines handed to the sink
    pub instructions: usize,
    /// Layers printed, including the first and finishing layers
    pub layers_printed: u32,
    /// Filament fed by the tower moves (mm)
    pub total_extrusion: f64,
    /// Nozzle height after the last layer change (mm)
    pub final_z: f64,
}

/// Generator for the pressure advance tuning tower
///
/// Owns the cursor for the duration of one program. [`TowerGenerator::run`]
/// consumes the generator, so each instance produces exactly one program.
pub struct TowerGenerator {
    params: TowerParameters,
    flavor: Flavor,
    header_comments: bool,
    cursor: Cursor,
    emitted: usize,
}

impl TowerGenerator {
    /// Create a generator, validating the parameters up front
    pub fn new(params: TowerParameters) -> Result<Self> {
        params.validate()?;
        if !params.fits_on_bed() {
            warn!(
                side = params.rectangle_side_length,
                bed_x = params.bed_x_length,
                bed_y = params.bed_y_length,
                "Square does not fit inside the bed"
            );
        }

        let cursor = Cursor::at_start(&params);
        let tower = Self {
            params,
            flavor: Flavor::default(),
            header_comments: false,
            cursor,
            emitted: 0,
        };
        if tower.first_edge_retracts() {
            warn!(
                side = tower.params.rectangle_side_length,
                prime = PRIME_EXTRUSION,
                "First edge ends below the prime extrusion, the extruder will retract"
            );
        }
        Ok(tower)
    }

    /// Whether the first extruding move targets less filament than the
    /// prime travel already pushed
    pub fn first_edge_retracts(&self) -> bool {
        self.extrusion_length_for_path_length(self.params.rectangle_side_length)
            < PRIME_EXTRUSION
    }

    /// Select the firmware dialect
    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Prepend `;` comment lines describing the tower
    pub fn with_header_comments(mut self, enabled: bool) -> Self {
        self.header_comments = enabled;
        self
    }

    pub fn params(&self) -> &TowerParameters {
        &self.params
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Filament length for a bead of `path_length` mm with this tower's geometry
    pub fn extrusion_length_for_path_length(&self, path_length: f64) -> f64 {
        extrusion_length_for_path_length(
            path_length,
            self.params.nozzle_diameter,
            self.params.layer_height,
            self.params.filament_diameter,
        )
    }

    /// Heat the bed then the nozzle, then run the flavor's start sequence
    /// and switch to absolute extrusion. Leaves the cursor untouched.
    pub fn emit_startup(&mut self, sink: &mut dyn InstructionSink) -> Result<()> {
        let bed = self.params.bed_temp;
        let nozzle = self.params.nozzle_temp;

        self.emit(sink, Instruction::SetBedTemperature { celsius: bed, wait: false })?;
        self.emit(sink, Instruction::SetBedTemperature { celsius: bed, wait: true })?;
        self.emit(sink, Instruction::SetNozzleTemperature { celsius: nozzle, wait: false })?;
        self.emit(sink, Instruction::SetNozzleTemperature { celsius: nozzle, wait: true })?;

        let flavor = self.flavor;
        for line in flavor
            .start_sequence()
            .iter()
            .chain(flavor.absolute_extrusion_sequence())
        {
            self.emit(sink, Instruction::raw(*line))?;
        }
        Ok(())
    }

    /// Extruding move by (`dx`, `dy`) at `speed` mm/s
    pub fn move_by(&mut self, dx: f64, dy: f64, speed: f64) -> Instruction {
        let length = (dx * dx + dy * dy).sqrt();
        let extrusion = self.extrusion_length_for_path_length(length);
        self.cursor.advance(dx, dy, extrusion);

        Instruction::Extrude {
            x: self.cursor.x,
            y: self.cursor.y,
            extrusion: self.cursor.extruded_length,
            feed_rate: feed_rate_from_speed(speed),
        }
    }

    /// Step up one layer
    pub fn raise_layer(&mut self) -> Instruction {
        self.cursor.lift(self.params.layer_height);
        Instruction::MoveZ { z: self.cursor.z }
    }

    /// Trace one lap of the square and step up a layer.
    ///
    /// The right edge is split into a fast and a slow half so every layer
    /// shows accelerations, decelerations and a speed change mid-edge.
    pub fn draw_square(
        &mut self,
        fast_speed: f64,
        slow_speed: f64,
        sink: &mut dyn InstructionSink,
    ) -> Result<()> {
        let side = self.params.rectangle_side_length;
        let edges = [
            (side, 0.0, fast_speed),
            (0.0, side / 2.0, fast_speed),
            (0.0, side / 2.0, slow_speed),
            (-side, 0.0, fast_speed),
            (0.0, -side, slow_speed),
        ];
        for (dx, dy, speed) in edges {
            let instruction = self.move_by(dx, dy, speed);
            self.emit(sink, instruction)?;
        }

        let instruction = self.raise_layer();
        self.emit(sink, instruction)
    }

    /// Generate the complete program into `sink`
    pub fn run(mut self, sink: &mut dyn InstructionSink) -> Result<TowerSummary> {
        let p = self.params.clone();
        info!(
            flavor = %self.flavor,
            layers = p.layers,
            pa_min = p.pa_min,
            pa_max = p.pa_max,
            side = p.rectangle_side_length,
            "Generating pressure advance tower"
        );

        if self.header_comments {
            self.emit_header(sink)?;
        }

        self.emit_startup(sink)?;

        // Travel to the start corner, pushing a little filament to prime
        let prime = Instruction::Travel {
            x: self.cursor.x,
            y: self.cursor.y,
            z: self.cursor.z,
            extrusion: PRIME_EXTRUSION,
            feed_rate: feed_rate_from_speed(p.travel_speed),
        };
        self.emit(sink, prime)?;

        // First layer: no pressure advance, no fan
        self.emit_advance(sink, 0.0)?;
        self.draw_square(p.first_layer_speed, p.first_layer_speed, sink)?;

        self.emit(sink, Instruction::SetFanSpeed(p.cooling_fan_speed))?;

        for index in 0..p.layers {
            let advance = advance_for_layer(&p, index);
            debug!(layer = index, z = self.cursor.z, advance, "Swept layer");
            self.emit_advance(sink, advance)?;
            self.draw_square(p.fast_print_speed, p.slow_print_speed, sink)?;
        }

        self.emit_advance(sink, p.pa_max)?;
        for _ in 0..FINISHING_LAYERS {
            self.draw_square(p.fast_print_speed, p.slow_print_speed, sink)?;
        }

        for line in self.flavor.end_sequence() {
            self.emit(sink, Instruction::raw(*line))?;
        }

        let summary = TowerSummary {
            instructions: self.emitted,
            layers_printed: printed_layers(&p),
            total_extrusion: self.cursor.extruded_length,
            final_z: self.cursor.z,
        };
        info!(
            instructions = summary.instructions,
            extrusion_mm = summary.total_extrusion,
            "Tower generated"
        );
        Ok(summary)
    }

    /// Generate the complete program as G-code text
    pub fn generate(self) -> Result<String> {
        let mut instructions: Vec<Instruction> = Vec::new();
        self.run(&mut instructions)?;
        Ok(render(&instructions))
    }

    fn emit_header(&mut self, sink: &mut dyn InstructionSink) -> Result<()> {
        let p = &self.params;
        let lines = [
            "Pressure Advance Tuning Tower".to_string(),
            format!("Flavor: {}", self.flavor),
            format!(
                "Pressure advance: {:.4} to {:.4} over {} layers",
                p.pa_min, p.pa_max, p.layers
            ),
            format!(
                "Square: {:.1} mm, layer height: {:.3} mm, tower height: {:.3} mm",
                p.rectangle_side_length,
                p.layer_height,
                tower_height(p)
            ),
            format!(
                "Speeds: fast {:.0} mm/s, slow {:.0} mm/s, first layer {:.0} mm/s",
                p.fast_print_speed, p.slow_print_speed, p.first_layer_speed
            ),
        ];
        for line in lines {
            self.emit(sink, Instruction::Comment(line))?;
        }
        Ok(())
    }

    fn emit_advance(&mut self, sink: &mut dyn InstructionSink, advance: f64) -> Result<()> {
        let instruction = Instruction::SetPressureAdvance {
            flavor: self.flavor,
            advance,
        };
        self.emit(sink, instruction)
    }

    fn emit(&mut self, sink: &mut dyn InstructionSink, instruction: Instruction) -> Result<()> {
        sink.emit(instruction)?;
        self.emitted += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> TowerGenerator {
        TowerGenerator::new(TowerParameters::default()).unwrap()
    }

    #[test]
    fn test_move_updates_cursor() {
        let mut tower = generator();
        let instruction = tower.move_by(50.0, 0.0, 120.0);

        assert_eq!(tower.cursor().x, 135.0);
        assert_eq!(tower.cursor().y, 85.0);
        assert!((tower.cursor().extruded_length - 2.4945).abs() < 1e-3);
        assert_eq!(instruction.to_string(), "G1 X135.000 Y85.000 E2.4945 F7200");
    }

    #[test]
    fn test_diagonal_move_uses_path_length() {
        let mut tower = generator();
        tower.move_by(30.0, 40.0, 10.0);
        let expected = tower.extrusion_length_for_path_length(50.0);
        assert!((tower.cursor().extruded_length - expected).abs() < 1e-12);
    }

    #[test]
    fn test_raise_layer_only_changes_z() {
        let mut tower = generator();
        let before = *tower.cursor();
        let instruction = tower.raise_layer();
        assert_eq!(instruction.to_string(), "G1 Z0.600");
        assert_eq!(tower.cursor().x, before.x);
        assert_eq!(tower.cursor().y, before.y);
        assert_eq!(tower.cursor().extruded_length, before.extruded_length);
    }

    #[test]
    fn test_draw_square_emits_six_lines() {
        let mut tower = generator();
        let mut sink: Vec<Instruction> = Vec::new();
        let before = *tower.cursor();
        tower.draw_square(120.0, 15.0, &mut sink).unwrap();

        assert_eq!(sink.len(), 6);
        assert!((tower.cursor().x - before.x).abs() < 1e-9);
        assert!((tower.cursor().y - before.y).abs() < 1e-9);
        assert!((tower.cursor().z - 0.6).abs() < 1e-12);
        // Perimeter is four sides
        let expected = tower.extrusion_length_for_path_length(200.0);
        assert!((tower.cursor().extruded_length - expected).abs() < 1e-9);

        let lines: Vec<String> = sink.iter().map(|i| i.to_string()).collect();
        assert_eq!(lines[0], "G1 X135.000 Y85.000 E2.4945 F7200");
        assert!(lines[1].starts_with("G1 X135.000 Y110.000 "));
        assert!(lines[1].ends_with(" F7200"));
        assert!(lines[2].starts_with("G1 X135.000 Y135.000 "));
        assert!(lines[2].ends_with(" F900"));
        assert!(lines[3].starts_with("G1 X85.000 Y135.000 "));
        assert!(lines[4].starts_with("G1 X85.000 Y85.000 "));
        assert!(lines[4].ends_with(" F900"));
        assert_eq!(lines[5], "G1 Z0.600");
    }

    #[test]
    fn test_startup_leaves_cursor_alone() {
        let mut tower = generator();
        let before = *tower.cursor();
        let mut sink: Vec<Instruction> = Vec::new();
        tower.emit_startup(&mut sink).unwrap();
        assert_eq!(*tower.cursor(), before);
        assert_eq!(sink.len(), 19);
        assert_eq!(sink[0].to_string(), "M140 S60.000");
        assert_eq!(sink[1].to_string(), "M190 S60.000");
        assert_eq!(sink[2].to_string(), "M104 S190.000");
        assert_eq!(sink[3].to_string(), "M109 S190.000");
        assert_eq!(sink[18].to_string(), "G92 E0");
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        let params = TowerParameters {
            nozzle_diameter: f64::NAN,
            ..Default::default()
        };
        assert!(TowerGenerator::new(params).is_err());
    }
}
