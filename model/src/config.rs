use crate::base_types::{Cost, Seconds};

/// Tunables of the batch solve. Defaults follow the deployment values:
/// ten-minute pickup window, ten-minute detour slack, top-30 pruning,
/// penalty of 1000 per unserved request, 30s ILP limit at 0.1% gap.
pub struct Config {
    /// Seconds from request time to the latest acceptable pickup.
    pub omega: Seconds,
    /// Detour slack over the direct drop-off time, in seconds.
    pub max_delay: Seconds,
    pub rv: RvConfig,
    pub rtv: RtvConfig,
    pub ilp: IlpConfig,
}

pub struct RvConfig {
    /// Degree cap per node of the compatibility graph; `None` disables
    /// pruning entirely.
    pub prune_top_k: Option<usize>,
}

pub struct RtvConfig {
    /// Optional wall-clock budget for the trip enumeration of a single
    /// vehicle, in seconds. Only fully verified trips are kept when it runs
    /// out.
    pub vehicle_time_budget: Option<Seconds>,
}

pub struct IlpConfig {
    /// Objective penalty per unserved request. Must exceed the largest
    /// plausible single-trip cost.
    pub cost_penalty: Cost,
    /// Wall-clock limit for the ILP solve, in seconds.
    pub time_limit: Seconds,
    /// Relative optimality gap at which the ILP may stop.
    pub gap: f64,
}

impl Config {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        omega: Seconds,
        max_delay: Seconds,
        prune_top_k: Option<usize>,
        vehicle_time_budget: Option<Seconds>,
        cost_penalty: Cost,
        time_limit: Seconds,
        gap: f64,
    ) -> Config {
        Config {
            omega,
            max_delay,
            rv: RvConfig { prune_top_k },
            rtv: RtvConfig {
                vehicle_time_budget,
            },
            ilp: IlpConfig {
                cost_penalty,
                time_limit,
                gap,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new(600.0, 600.0, Some(30), None, 1000.0, 30.0, 0.001)
    }
}
