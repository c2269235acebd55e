// pt-core/src/units.rs

use uom::si::f64::{MassDensity as UomMassDensity, Time as UomTime};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type Time = UomTime;

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

pub mod constants {
    /// Density of air at 300 K and 1 atm (kg/m³).
    pub const AIR_DENSITY: f64 = 1.1766;
    /// Kinematic viscosity used by the default air parameter set (m²/s).
    pub const AIR_KINEMATIC_VISCOSITY: f64 = 1.81e-5;
}
