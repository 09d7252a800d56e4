use crate::parameters::TowerParameters;

/// Toolhead state tracked while generating
///
/// `extruded_length` is the host-side running total of filament fed since
/// the start of the tower. Device-side `G92 E0` resets in the static start
/// sequence happen before the first tracked move and never touch it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    /// Current X (mm)
    pub x: f64,
    /// Current Y (mm)
    pub y: f64,
    /// Current Z (mm)
    pub z: f64,
    /// Cumulative filament fed (mm)
    pub extruded_length: f64,
}

impl Cursor {
    /// Cursor at the square's start corner, one layer above the bed
    pub fn at_start(params: &TowerParameters) -> Self {
        let (x, y) = params.square_origin();
        Self {
            x,
            y,
            z: params.layer_height,
            extruded_length: 0.0,
        }
    }

    /// Move in the XY plane while feeding `extrusion` mm of filament
    pub fn advance(&mut self, dx: f64, dy: f64, extrusion: f64) {
        self.x += dx;
        self.y += dy;
        self.extruded_length += extrusion;
    }

    /// Step up by one layer
    pub fn lift(&mut self, layer_height: f64) {
        self.z += layer_height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position() {
        let params = TowerParameters {
            bed_x_length: 300.0,
            bed_y_length: 200.0,
            rectangle_side_length: 40.0,
            layer_height: 0.2,
            ..Default::default()
        };
        let cursor = Cursor::at_start(&params);
        assert_eq!(cursor.x, 130.0);
        assert_eq!(cursor.y, 80.0);
        assert_eq!(cursor.z, 0.2);
        assert_eq!(cursor.extruded_length, 0.0);
    }

    #[test]
    fn test_advance_and_lift() {
        let mut cursor = Cursor::default();
        cursor.advance(10.0, -5.0, 0.5);
        cursor.advance(-10.0, 0.0, 0.25);
        cursor.lift(0.3);
        assert_eq!(cursor.x, 0.0);
        assert_eq!(cursor.y, -5.0);
        assert_eq!(cursor.z, 0.3);
        assert_eq!(cursor.extruded_length, 0.75);
    }
}
