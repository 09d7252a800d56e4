//! Filament feed calculations
//!
//! The deposited bead is modelled as a rectangle `nozzle_diameter` wide and
//! `layer_height` tall. The filament length to push equals the bead volume
//! divided by the filament cross-section.

use patune_core::filament_cross_section;

/// Filament length (mm) needed to lay down a bead `path_length` mm long
pub fn extrusion_length_for_path_length(
    path_length: f64,
    nozzle_diameter: f64,
    layer_height: f64,
    filament_diameter: f64,
) -> f64 {
    extrusion_length_for_volume(path_length * nozzle_diameter * layer_height, filament_diameter)
}

/// Filament length (mm) holding `volume` mm³ of material
pub fn extrusion_length_for_volume(volume: f64, filament_diameter: f64) -> f64 {
    volume / filament_cross_section(filament_diameter)
}
