//! Farm-level performance metrics.
//!
//! Derived from the net AEP estimate, the wake-free (gross) AEP of the same
//! turbines and the normalized per-turbine power.

use serde::{Deserialize, Serialize};
use wf_core::annual_gwh_from_kw;
use wf_results::{AepEstimate, NormalizedResult};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FarmMetrics {
    /// AEP without wake interaction (GWh)
    pub gross_aep_gwh: f64,
    /// AEP with wakes (GWh), if the integration produced one
    pub net_aep_gwh: Option<f64>,
    /// `100 * (1 - net / gross)`
    pub wake_loss_pct: Option<f64>,
    /// Net AEP over the installed capacity running all year
    pub capacity_factor: Option<f64>,
    /// Installed capacity (MW)
    pub installed_capacity_mw: f64,
    /// Each turbine's mean power relative to the best turbine
    pub turbine_efficiency: Vec<f64>,
    /// Per-turbine net AEP (GWh) when a full-grid breakdown was available
    pub turbine_aep_gwh: Option<Vec<f64>>,
}

impl FarmMetrics {
    /// Returns true if the metrics are backed by a net AEP figure
    pub fn has_net(&self) -> bool {
        self.net_aep_gwh.is_some()
    }
}

/// Turbine power relative to the best turbine; all zero when nothing produces.
pub fn turbine_efficiency(per_turbine_power: &[f64]) -> Vec<f64> {
    let best = per_turbine_power
        .iter()
        .copied()
        .fold(0.0_f64, f64::max);
    if best <= 0.0 {
        return vec![0.0; per_turbine_power.len()];
    }
    per_turbine_power.iter().map(|p| p / best).collect()
}

/// Combine the analysis outputs into farm metrics.
pub fn compute_farm_metrics(
    net: &AepEstimate,
    gross_aep_gwh: f64,
    result: &NormalizedResult,
    rated_power_kw: f64,
    turbine_aep_gwh: Option<Vec<f64>>,
) -> FarmMetrics {
    let count = result.turbine_count();
    let installed_kw = rated_power_kw * count as f64;
    let net_aep_gwh = net.aep_gwh.filter(|_| net.status.is_usable());

    let wake_loss_pct = net_aep_gwh
        .filter(|_| gross_aep_gwh > 0.0)
        .map(|n| 100.0 * (1.0 - n / gross_aep_gwh));

    let full_year_gwh = annual_gwh_from_kw(installed_kw);
    let capacity_factor = net_aep_gwh
        .filter(|_| full_year_gwh > 0.0)
        .map(|n| n / full_year_gwh);

    FarmMetrics {
        gross_aep_gwh,
        net_aep_gwh,
        wake_loss_pct,
        capacity_factor,
        installed_capacity_mw: installed_kw / 1000.0,
        turbine_efficiency: turbine_efficiency(&result.per_turbine_power),
        turbine_aep_gwh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_results::{AepSource, ResultStatus};

    fn result(power: Vec<f64>) -> NormalizedResult {
        let total_power = power.iter().sum();
        NormalizedResult {
            per_turbine_power: power,
            total_power,
            aep_gwh: None,
            status: ResultStatus::Ok,
        }
    }

    fn estimate(aep: Option<f64>, status: ResultStatus) -> AepEstimate {
        AepEstimate {
            aep_gwh: aep,
            status,
            source: AepSource::CellWeighted,
        }
    }

    #[test]
    fn wake_loss_and_capacity_factor() {
        // 2 x 2 MW, full year = 35.04 GWh
        let m = compute_farm_metrics(
            &estimate(Some(14.016), ResultStatus::Ok),
            17.52,
            &result(vec![1000.0, 800.0]),
            2000.0,
            None,
        );
        assert!((m.wake_loss_pct.unwrap() - 20.0).abs() < 1e-9);
        assert!((m.capacity_factor.unwrap() - 0.4).abs() < 1e-9);
        assert_eq!(m.installed_capacity_mw, 4.0);
        assert_eq!(m.turbine_efficiency, vec![1.0, 0.8]);
        assert!(m.has_net());
    }

    #[test]
    fn unavailable_net_leaves_derived_metrics_empty() {
        let m = compute_farm_metrics(
            &estimate(None, ResultStatus::Unavailable),
            17.52,
            &result(vec![0.0, 0.0]),
            2000.0,
            None,
        );
        assert_eq!(m.net_aep_gwh, None);
        assert_eq!(m.wake_loss_pct, None);
        assert_eq!(m.capacity_factor, None);
        assert_eq!(m.turbine_efficiency, vec![0.0, 0.0]);
    }

    #[test]
    fn partial_net_still_counts() {
        let m = compute_farm_metrics(
            &estimate(Some(10.0), ResultStatus::PartialData),
            0.0,
            &result(vec![500.0]),
            2000.0,
            None,
        );
        assert_eq!(m.net_aep_gwh, Some(10.0));
        // No gross reference, no wake loss
        assert_eq!(m.wake_loss_pct, None);
    }
}
