use std::collections::{BTreeMap, BTreeSet};

use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Expression, Solution, SolverModel, Variable,
    WithInitialSolution, WithMipGap,
};
use log::{debug, warn};

use model::base_types::{RequestId, Seconds, VehicleId};
use model::config::Config;
use model::requests::Requests;
use solution::Trip;

use crate::rtv_graph::{RtvGraph, TvEdge};
use crate::SolveError;

pub type VarId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintSense {
    LessEq,
    Eq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MipStatus {
    /// Proven optimal within the configured gap.
    Optimal,
    /// Best feasible solution when the time limit struck first. The caller
    /// keeps such a solution, it is merely not proven optimal. [`HighsBackend`]
    /// never produces this status (see its `solve`); it exists for backends
    /// that expose timeout incumbents.
    Incumbent,
}

pub struct MipSolution {
    pub status: MipStatus,
    pub values: Vec<f64>,
}

/// Minimal model-building surface for a binary program, so the matching
/// never depends on one particular MIP solver.
pub trait MipBackend {
    fn add_binary_var(&mut self) -> VarId;
    fn add_linear_constraint(&mut self, terms: Vec<(VarId, f64)>, sense: ConstraintSense, rhs: f64);
    fn set_objective(&mut self, terms: Vec<(VarId, f64)>);
    fn set_warm_start(&mut self, values: Vec<(VarId, f64)>);
    fn solve(&mut self, time_limit: Seconds, gap: f64) -> Result<MipSolution, SolveError>;
}

/// `good_lp` model on the bundled HiGHS solver. The declaration is buffered
/// and turned into the actual problem when `solve` runs, since `good_lp`
/// wants variables, objective and constraints in that order.
#[derive(Default)]
pub struct HighsBackend {
    var_count: usize,
    objective: Vec<(VarId, f64)>,
    constraints: Vec<(Vec<(VarId, f64)>, ConstraintSense, f64)>,
    warm_start: Vec<(VarId, f64)>,
}

impl MipBackend for HighsBackend {
    fn add_binary_var(&mut self) -> VarId {
        self.var_count += 1;
        self.var_count - 1
    }

    fn add_linear_constraint(
        &mut self,
        terms: Vec<(VarId, f64)>,
        sense: ConstraintSense,
        rhs: f64,
    ) {
        self.constraints.push((terms, sense, rhs));
    }

    fn set_objective(&mut self, terms: Vec<(VarId, f64)>) {
        self.objective = terms;
    }

    fn set_warm_start(&mut self, values: Vec<(VarId, f64)>) {
        self.warm_start = values;
    }

    /// Builds and solves the buffered model.
    ///
    /// `good_lp` reports a time-limit stop without a proven optimum as a
    /// resolution error and does not hand out the incumbent, so this backend
    /// only ever returns [`MipStatus::Optimal`] or `Err`; the caller's
    /// greedy fallback covers the error case. A backend with incumbent
    /// access should return [`MipStatus::Incumbent`] instead of erring.
    fn solve(&mut self, time_limit: Seconds, gap: f64) -> Result<MipSolution, SolveError> {
        let mut vars = variables!();
        let references: Vec<Variable> = (0..self.var_count)
            .map(|_| vars.add(variable().binary()))
            .collect();

        let objective: Expression = self
            .objective
            .iter()
            .map(|&(var, coefficient)| references[var] * coefficient)
            .sum();

        let mut problem = vars
            .minimise(objective)
            .using(highs)
            .set_time_limit(time_limit);
        problem = problem
            .with_mip_gap(gap as f32)
            .map_err(|e| SolveError::Resolution(format!("invalid MIP gap: {:?}", e)))?;
        if !self.warm_start.is_empty() {
            problem = problem.with_initial_solution(
                self.warm_start
                    .iter()
                    .map(|&(var, value)| (references[var], value)),
            );
        }
        for (terms, sense, rhs) in &self.constraints {
            let lhs: Expression = terms
                .iter()
                .map(|&(var, coefficient)| references[var] * coefficient)
                .sum();
            let rhs = *rhs;
            problem = match sense {
                ConstraintSense::LessEq => problem.with(constraint!(lhs <= rhs)),
                ConstraintSense::Eq => problem.with(constraint!(lhs == rhs)),
            };
        }

        let solved = problem
            .solve()
            .map_err(|e| SolveError::Resolution(e.to_string()))?;
        let values = references.iter().map(|&v| solved.value(v)).collect();
        Ok(MipSolution {
            status: MipStatus::Optimal,
            values,
        })
    }
}

/// The exact matching: one binary per trip-vehicle edge, one binary per
/// request marking it unserved. Each vehicle serves at most one trip; each
/// request is covered exactly once or penalized. Warm-started with the
/// complete 0/1 vector of the greedy seed.
pub fn assignment_ilp<B: MipBackend>(
    backend: &mut B,
    rtv: &RtvGraph,
    requests: &Requests,
    seed: &BTreeMap<VehicleId, Trip>,
    config: &Config,
) -> Result<BTreeMap<VehicleId, Trip>, SolveError> {
    let mut epsilon: Vec<(&VehicleId, &TvEdge, VarId)> = Vec::new();
    for vehicle in rtv.vehicles() {
        for edge in rtv.edges_of(vehicle) {
            epsilon.push((vehicle, edge, backend.add_binary_var()));
        }
    }
    let chi: Vec<(&RequestId, VarId)> = requests
        .iter()
        .map(|request| (request, backend.add_binary_var()))
        .collect();
    debug!(
        "ILP model: {} assignment variables, {} requests",
        epsilon.len(),
        chi.len()
    );

    let mut objective: Vec<(VarId, f64)> = epsilon
        .iter()
        .map(|&(_, edge, var)| (var, edge.cost))
        .collect();
    objective.extend(chi.iter().map(|&(_, var)| (var, config.ilp.cost_penalty)));
    backend.set_objective(objective);

    // each vehicle serves at most one trip
    for vehicle in rtv.vehicles() {
        let terms: Vec<(VarId, f64)> = epsilon
            .iter()
            .filter(|&&(v, _, _)| v == vehicle)
            .map(|&(_, _, var)| (var, 1.0))
            .collect();
        backend.add_linear_constraint(terms, ConstraintSense::LessEq, 1.0);
    }

    // each request is served by exactly one chosen edge or marked unserved
    for &(request, chi_var) in &chi {
        let mut terms: Vec<(VarId, f64)> = epsilon
            .iter()
            .filter(|&&(_, edge, _)| edge.trip.contains(request))
            .map(|&(_, _, var)| (var, 1.0))
            .collect();
        terms.push((chi_var, 1.0));
        backend.add_linear_constraint(terms, ConstraintSense::Eq, 1.0);
    }

    // complete warm start from the greedy seed
    let mut seeded: BTreeSet<&RequestId> = BTreeSet::new();
    for trip in seed.values() {
        seeded.extend(trip.requests());
    }
    let mut warm: Vec<(VarId, f64)> = Vec::with_capacity(epsilon.len() + chi.len());
    for &(vehicle, edge, var) in &epsilon {
        let chosen = seed.get(vehicle) == Some(&edge.trip);
        warm.push((var, if chosen { 1.0 } else { 0.0 }));
    }
    for &(request, var) in &chi {
        warm.push((var, if seeded.contains(request) { 0.0 } else { 1.0 }));
    }
    backend.set_warm_start(warm);

    let solved = backend.solve(config.ilp.time_limit, config.ilp.gap)?;
    if solved.status == MipStatus::Incumbent {
        warn!("ILP hit its time limit; keeping the best incumbent");
    }

    let mut chosen: BTreeMap<VehicleId, Trip> = BTreeMap::new();
    for &(vehicle, edge, var) in &epsilon {
        if solved.values[var] > 0.5 {
            chosen.insert(vehicle.clone(), edge.trip.clone());
        }
    }
    Ok(chosen)
}
