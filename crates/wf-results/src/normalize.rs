//! Reduction of rank-ambiguous engine output to one power value per turbine.

use std::fmt;

use ndarray::{Array, Array1, ArrayD, Axis, Dimension};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wf_engine::{RawPowerTensor, VaryingAxis, is_usable_power};

/// Quality of a computed result.
///
/// Variants are ordered from most to least trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResultStatus {
    Ok,
    /// Usable, but some inputs were missing or substituted.
    PartialData,
    /// No usable value; numbers are placeholders.
    Unavailable,
}

impl ResultStatus {
    /// The less trustworthy of two statuses.
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }

    pub fn is_usable(self) -> bool {
        self != Self::Unavailable
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::PartialData => "partial data",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical per-turbine result of one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// Mean power per turbine (kW), always `turbine_count` long.
    pub per_turbine_power: Vec<f64>,
    /// Sum of `per_turbine_power` (kW).
    pub total_power: f64,
    /// Filled in from the energy integration; `None` when unavailable.
    pub aep_gwh: Option<f64>,
    pub status: ResultStatus,
}

impl NormalizedResult {
    /// All-zero placeholder of the requested length.
    pub fn unavailable(turbine_count: usize) -> Self {
        Self {
            per_turbine_power: vec![0.0; turbine_count],
            total_power: 0.0,
            aep_gwh: None,
            status: ResultStatus::Unavailable,
        }
    }

    pub fn with_aep(mut self, aep_gwh: Option<f64>) -> Self {
        self.aep_gwh = aep_gwh;
        self
    }

    pub fn turbine_count(&self) -> usize {
        self.per_turbine_power.len()
    }
}

/// Clamp absent and negative cells to zero, reporting whether any were found.
fn sanitize<D: Dimension>(values: &Array<f64, D>) -> (Array<f64, D>, bool) {
    let mut substituted = false;
    let clean = values.mapv(|p| {
        if is_usable_power(p) {
            p
        } else {
            substituted = true;
            0.0
        }
    });
    (clean, substituted)
}

/// Mean power per turbine, averaging every axis after the turbine axis.
fn per_turbine_mean(tensor: &RawPowerTensor) -> Option<(Array1<f64>, bool)> {
    match tensor {
        RawPowerTensor::Turbine(v) => Some(sanitize(v)),
        RawPowerTensor::TurbineBy { values, .. } => {
            let (clean, substituted) = sanitize(values);
            clean.mean_axis(Axis(1)).map(|m| (m, substituted))
        }
        RawPowerTensor::TurbineDirectionSpeed(values) => {
            let (clean, substituted) = sanitize(values);
            clean
                .mean_axis(Axis(2))
                .and_then(|m| m.mean_axis(Axis(1)))
                .map(|m| (m, substituted))
        }
    }
}

/// Normalize engine output to exactly `turbine_count` per-turbine values.
///
/// Never fails:
/// - a missing or empty tensor gives `Unavailable` zeros
/// - a turbine axis of the wrong length gives `Unavailable` zeros (no
///   padding or truncation)
/// - absent or negative cells count as zero output and give `PartialData`
pub fn normalize(tensor: Option<&RawPowerTensor>, turbine_count: usize) -> NormalizedResult {
    let Some(tensor) = tensor.filter(|t| !t.is_empty()) else {
        warn!(turbine_count, "no power tensor to normalize");
        return NormalizedResult::unavailable(turbine_count);
    };

    let Some((per_turbine, substituted)) = per_turbine_mean(tensor) else {
        warn!(shape = ?tensor.shape(), "power tensor has an empty condition axis");
        return NormalizedResult::unavailable(turbine_count);
    };

    if per_turbine.len() != turbine_count {
        warn!(
            expected = turbine_count,
            got = per_turbine.len(),
            "power tensor turbine axis does not match layout"
        );
        return NormalizedResult::unavailable(turbine_count);
    }

    let status = if substituted {
        warn!("absent or negative power cells treated as zero output");
        ResultStatus::PartialData
    } else {
        ResultStatus::Ok
    };

    let per_turbine_power = per_turbine.to_vec();
    let total_power = per_turbine_power.iter().sum();
    debug!(rank = tensor.rank(), total_power, %status, "normalized power tensor");

    NormalizedResult {
        per_turbine_power,
        total_power,
        aep_gwh: None,
        status,
    }
}

/// Normalize an untyped n-dimensional array; unsupported ranks are `Unavailable`.
pub fn normalize_dyn(values: ArrayD<f64>, turbine_count: usize) -> NormalizedResult {
    match RawPowerTensor::from_dyn(values, VaryingAxis::Unspecified) {
        Ok(tensor) => normalize(Some(&tensor), turbine_count),
        Err(err) => {
            warn!(%err, "engine output rejected");
            NormalizedResult::unavailable(turbine_count)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use ndarray::IxDyn;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn matching_turbine_axis_always_normalizes(
            n in 1_usize..8,
            extra in prop::collection::vec(1_usize..5, 0..3),
            fill in 0.0_f64..3000.0,
        ) {
            let mut shape = vec![n];
            shape.extend(extra);
            let r = normalize_dyn(ArrayD::from_elem(IxDyn(&shape), fill), n);
            prop_assert_eq!(r.status, ResultStatus::Ok);
            prop_assert_eq!(r.per_turbine_power.len(), n);
            prop_assert!((r.total_power - fill * n as f64).abs() < 1e-6 * (1.0 + fill * n as f64));
        }

        #[test]
        fn malformed_input_never_panics(
            shape in prop::collection::vec(0_usize..5, 0..5),
            n in 0_usize..6,
        ) {
            let len = shape.iter().product::<usize>();
            let values = ArrayD::from_shape_vec(IxDyn(&shape), vec![1.0; len]).unwrap();
            let r = normalize_dyn(values, n);
            prop_assert_eq!(r.per_turbine_power.len(), n);
            if shape.first() != Some(&n) || len == 0 {
                prop_assert_eq!(r.status, ResultStatus::Unavailable);
            }
        }
    }
}
