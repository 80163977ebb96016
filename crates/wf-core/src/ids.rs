use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier for a turbine in a layout.
///
/// - `u32` keeps per-turbine tables small
/// - `NonZero` enables `Option<TurbineId>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurbineId(NonZeroU32);

impl TurbineId {
    /// Create an id from a 0-based layout index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based layout index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// 1-based label used on plots and tables (`T1`, `T2`, ...).
    pub fn label(self) -> String {
        format!("T{}", self.0.get())
    }
}

impl fmt::Debug for TurbineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TurbineId({})", self.index())
    }
}

impl fmt::Display for TurbineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0.get())
    }
}

/// Ids for a layout of `count` turbines, in layout order.
pub fn turbine_ids(count: usize) -> impl Iterator<Item = TurbineId> {
    (0..count as u32).map(TurbineId::from_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = TurbineId::from_index(i);
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn labels_are_one_based() {
        let labels: Vec<String> = turbine_ids(3).map(|id| id.to_string()).collect();
        assert_eq!(labels, ["T1", "T2", "T3"]);
        assert_eq!(TurbineId::from_index(0).label(), "T1");
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<TurbineId>(),
            core::mem::size_of::<Option<TurbineId>>()
        );
    }
}
