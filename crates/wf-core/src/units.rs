// wf-core/src/units.rs

use uom::si::f64::{Energy as UomEnergy, Power as UomPower, Time as UomTime};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Power = UomPower;
pub type Time = UomTime;

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn hours(v: f64) -> Time {
    use uom::si::time::hour;
    Time::new::<hour>(v)
}

/// Energy expressed in gigawatt-hours.
#[inline]
pub fn to_gwh(e: Energy) -> f64 {
    use uom::si::energy::gigawatt_hour;
    e.get::<gigawatt_hour>()
}

/// Energy produced by a constant kW level over one (non-leap) year, in GWh.
#[inline]
pub fn annual_gwh_from_kw(power_kw: f64) -> f64 {
    to_gwh(kw(power_kw) * constants::year())
}

pub mod constants {
    use super::*;

    pub const HOURS_PER_YEAR: f64 = 8760.0;

    #[inline]
    pub fn year() -> Time {
        hours(HOURS_PER_YEAR)
    }
}
