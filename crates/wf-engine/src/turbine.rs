//! Turbine power and thrust curves.

use crate::error::{EngineError, EngineResult};

/// Power/thrust characteristics of one turbine type.
///
/// The pipeline never inspects a model beyond this interface.
pub trait TurbineModel: Send + Sync {
    fn name(&self) -> &str;

    fn rotor_diameter_m(&self) -> f64;

    fn hub_height_m(&self) -> f64;

    fn rated_power_kw(&self) -> f64;

    /// Electrical power at hub-height wind speed `ws` (m/s), in kW.
    fn power_kw(&self, ws: f64) -> f64;

    /// Thrust coefficient at hub-height wind speed `ws` (m/s).
    fn ct(&self, ws: f64) -> f64;
}

/// Turbine described by tabulated power and thrust curves.
///
/// Values are linearly interpolated between table points and are zero
/// outside the tabulated operating range.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularTurbine {
    name: String,
    rotor_diameter_m: f64,
    hub_height_m: f64,
    speeds: Vec<f64>,
    power_kw: Vec<f64>,
    ct: Vec<f64>,
}

impl TabularTurbine {
    pub fn new(
        name: impl Into<String>,
        rotor_diameter_m: f64,
        hub_height_m: f64,
        speeds: Vec<f64>,
        power_kw: Vec<f64>,
        ct: Vec<f64>,
    ) -> EngineResult<Self> {
        if speeds.len() < 2 {
            return Err(EngineError::InvalidTurbine {
                what: "curve needs at least two points",
            });
        }
        if power_kw.len() != speeds.len() || ct.len() != speeds.len() {
            return Err(EngineError::InvalidTurbine {
                what: "curve tables must have equal length",
            });
        }
        if speeds.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(EngineError::InvalidTurbine {
                what: "curve speeds must be strictly increasing",
            });
        }
        if power_kw.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(EngineError::InvalidTurbine {
                what: "power values must be finite and non-negative",
            });
        }
        if ct.iter().any(|c| !(0.0..1.0).contains(c)) {
            return Err(EngineError::InvalidTurbine {
                what: "thrust coefficients must lie in [0, 1)",
            });
        }
        if !(rotor_diameter_m > 0.0) || !(hub_height_m > 0.0) {
            return Err(EngineError::InvalidTurbine {
                what: "rotor diameter and hub height must be positive",
            });
        }
        Ok(Self {
            name: name.into(),
            rotor_diameter_m,
            hub_height_m,
            speeds,
            power_kw,
            ct,
        })
    }

    /// 2 MW, 80 m rotor reference machine (Horns Rev 1 type).
    pub fn v80() -> Self {
        let speeds: Vec<f64> = (3..=25).map(f64::from).collect();
        let power_kw = vec![
            0.0, 66.6, 154.0, 282.0, 460.0, 696.0, 996.0, 1341.0, 1661.0, 1866.0, 1958.0, 1988.0,
            1997.0, 1999.0, 2000.0, 2000.0, 2000.0, 2000.0, 2000.0, 2000.0, 2000.0, 2000.0, 2000.0,
        ];
        let ct = vec![
            0.0, 0.818, 0.806, 0.804, 0.805, 0.806, 0.807, 0.793, 0.739, 0.709, 0.409, 0.314,
            0.249, 0.202, 0.167, 0.140, 0.119, 0.102, 0.088, 0.077, 0.067, 0.060, 0.053,
        ];
        Self {
            name: "V80".to_string(),
            rotor_diameter_m: 80.0,
            hub_height_m: 70.0,
            speeds,
            power_kw,
            ct,
        }
    }

    fn interpolate(&self, table: &[f64], ws: f64) -> f64 {
        let first = self.speeds[0];
        let last = self.speeds[self.speeds.len() - 1];
        if !ws.is_finite() || ws < first || ws > last {
            return 0.0;
        }
        let i = self.speeds.partition_point(|&s| s <= ws);
        if i >= self.speeds.len() {
            return table[table.len() - 1];
        }
        let (s0, s1) = (self.speeds[i - 1], self.speeds[i]);
        let t = (ws - s0) / (s1 - s0);
        table[i - 1] + t * (table[i] - table[i - 1])
    }
}

impl TurbineModel for TabularTurbine {
    fn name(&self) -> &str {
        &self.name
    }

    fn rotor_diameter_m(&self) -> f64 {
        self.rotor_diameter_m
    }

    fn hub_height_m(&self) -> f64 {
        self.hub_height_m
    }

    fn rated_power_kw(&self) -> f64 {
        self.power_kw.iter().copied().fold(0.0, f64::max)
    }

    fn power_kw(&self, ws: f64) -> f64 {
        self.interpolate(&self.power_kw, ws)
    }

    fn ct(&self, ws: f64) -> f64 {
        self.interpolate(&self.ct, ws)
    }
}
