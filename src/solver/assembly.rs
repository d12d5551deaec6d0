//! Assembly of the conic problem
//!
//! ```txt
//! min  ½ x^T P x + q^T x
//! s.t. A x + s = b,
//!      s ∈ {0}^{n_eq} × R_+^{n_ineq}
//! ```
//!
//! from the (linearized) rows of a model.
//! The constraint matrix is laid out as
//!
//! ```txt
//! # of
//! rows            x1  ...  xn
//!           ┏                  ┓   ┏     ┓
//!  n_eq     ┃  equality rows   ┃ = ┃ -c  ┃
//!          ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!           ┃  `≤` rows        ┃ ≤ ┃ -c  ┃
//!           ┃  negated `≥` rows┃ ≤ ┃  c  ┃
//!  n_ineq   ┃ -e_j (lower)     ┃ ≤ ┃ -l_j┃
//!           ┃  e_j (upper)     ┃ ≤ ┃  u_j┃
//!           ┗                  ┛   ┗     ┛
//! ```
//!
//! where `c` is the constant part of each row.
//! Infinite bounds produce no row.
use clarabel::{
    algebra::*,
    solver::*,
};

use crate::error::{FitError, Result};
use crate::model::{self, Model, Var, LinExpr, Sense};
use super::SolverOptions;

/// A conic problem ready to be handed to `clarabel`.
pub(super) struct ConicProblem {
    hessian: CscMatrix<f64>,
    linear: Vec<f64>,
    matrix: CscMatrix<f64>,
    rhs: Vec<f64>,
    cones: Vec<SupportedConeT<f64>>,
}

/// What a successful conic solve returns.
pub(super) struct ConicOutcome {
    pub(super) x: Vec<f64>,
    pub(super) status: String,
    pub(super) iterations: usize,
}

/// Build the conic problem for `rows`.
/// If `proximal = Some((center, mu))`, the term `μ/2 ‖x - center‖²`
/// restricted to the non-dependent variables is added to the objective.
pub(super) fn assemble(
    model: &Model,
    rows: &[(LinExpr, Sense)],
    proximal: Option<(&[f64], f64)>,
) -> ConicProblem
{
    let n_vars = model.n_vars();

    let equalities = rows.iter()
        .filter(|(_, sense)| *sense == Sense::Equal)
        .map(|(expr, _)| expr.clone());
    let inequalities = rows.iter()
        .filter_map(|(expr, sense)| match sense {
            Sense::LessEqual => Some(expr.clone()),
            Sense::GreaterEqual => Some(expr.clone().scaled(-1f64)),
            Sense::Equal => None,
        });
    let bounds = model.vars()
        .iter()
        .enumerate()
        .flat_map(|(j, info)| {
            let var = Var::from_index(j);
            let lower = info.lower.is_finite()
                .then(|| LinExpr::constant(info.lower).term(var, -1f64));
            let upper = info.upper.is_finite()
                .then(|| LinExpr::constant(-info.upper).term(var, 1f64));
            lower.into_iter().chain(upper)
        });

    let n_eq = rows.iter()
        .filter(|(_, sense)| *sense == Sense::Equal)
        .count();
    let stacked = equalities.chain(inequalities)
        .chain(bounds)
        .map(|expr| expr.compressed())
        .collect::<Vec<_>>();
    let n_ineq = stacked.len() - n_eq;

    let (matrix, rhs) = build_constraint_matrix(&stacked[..], n_vars);
    let cones = build_sns(n_eq, n_ineq);
    let (hessian, linear) = build_objective(model, proximal);

    ConicProblem { hessian, linear, matrix, rhs, cones }
}

fn build_constraint_matrix(rows: &[LinExpr], n_vars: usize)
    -> (CscMatrix<f64>, Vec<f64>)
{
    // Rows are visited in increasing order,
    // so each column is sorted by row index.
    let mut columns = vec![Vec::new(); n_vars];
    let mut rhs = Vec::with_capacity(rows.len());
    for (i, expr) in rows.iter().enumerate() {
        for &(var, coef) in expr.terms() {
            columns[var.index()].push((i, coef));
        }
        rhs.push(-expr.offset());
    }

    let mut col_ptr = vec![0];
    let mut row_idx = Vec::new();
    let mut nonzero = Vec::new();
    for column in columns {
        for (i, a) in column {
            row_idx.push(i);
            nonzero.push(a);
        }
        col_ptr.push(row_idx.len());
    }

    let matrix = CscMatrix::new(rows.len(), n_vars, col_ptr, row_idx, nonzero);
    (matrix, rhs)
}

fn build_sns(n_eq: usize, n_ineq: usize) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::with_capacity(2);
    if n_eq > 0 {
        cones.push(ZeroConeT(n_eq));
    }
    if n_ineq > 0 {
        cones.push(NonnegativeConeT(n_ineq));
    }
    cones
}

fn build_objective(model: &Model, proximal: Option<(&[f64], f64)>)
    -> (CscMatrix<f64>, Vec<f64>)
{
    let n_vars = model.n_vars();
    let mut linear = vec![0f64; n_vars];
    for &(var, c) in model.objective().terms() {
        linear[var.index()] += c;
    }

    let Some((center, mu)) = proximal else {
        return (CscMatrix::zeros((n_vars, n_vars)), linear);
    };

    let mut col_ptr = vec![0];
    let mut row_idx = Vec::new();
    let mut nonzero = Vec::new();
    for (j, info) in model.vars().iter().enumerate() {
        if !info.is_dependent() {
            row_idx.push(j);
            nonzero.push(mu);
            linear[j] -= mu * center[j];
        }
        col_ptr.push(row_idx.len());
    }
    let hessian = CscMatrix::new(n_vars, n_vars, col_ptr, row_idx, nonzero);
    (hessian, linear)
}

/// How a conic solve is configured and judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SolveMode {
    /// The whole problem of a linear model.
    /// Uses `tolerance` and `max_iter` of the options.
    Linear,
    /// A subproblem of the nonlinear solver.
    /// Uses `qp_max_iter` and clarabel's own tolerances.
    /// `InsufficientProgress` counts as a success;
    /// the nonlinear solver checks the returned point itself.
    Subproblem,
}

/// Settings handed to `clarabel` for `mode`.
fn build_settings(options: &SolverOptions, mode: SolveMode)
    -> Result<DefaultSettings<f64>>
{
    let mut builder = DefaultSettingsBuilder::default();
    builder.equilibrate_enable(true).verbose(false);

    match mode {
        SolveMode::Linear => {
            let max_iter = u32::try_from(options.max_iter)
                .unwrap_or(u32::MAX);
            builder.max_iter(max_iter)
                .tol_gap_abs(options.tolerance)
                .tol_gap_rel(options.tolerance)
                .tol_feas(options.tolerance);
        },
        SolveMode::Subproblem => {
            builder.max_iter(options.qp_max_iter);
        },
    }

    builder.build()
        .map_err(|e| FitError::InvalidConfig(e.to_string()))
}

/// Solve `problem` with `clarabel`.
///
/// `Solved` and `AlmostSolved` are successes.
pub(super) fn solve(
    model: &Model,
    rows: &[(LinExpr, Sense)],
    problem: ConicProblem,
    options: &SolverOptions,
    mode: SolveMode,
) -> Result<ConicOutcome>
{
    let settings = build_settings(options, mode)?;

    let ConicProblem { hessian, linear, matrix, rhs, cones } = problem;
    let mut solver = DefaultSolver::new(
        &hessian, &linear, &matrix, &rhs, &cones, settings
    );
    solver.solve();

    let iterations = solver.solution.iterations as usize;
    let x = solver.solution.x.clone();
    let status = &solver.solution.status;

    match status {
        SolverStatus::Solved | SolverStatus::AlmostSolved => {},
        SolverStatus::InsufficientProgress
            if mode == SolveMode::Subproblem => {},
        SolverStatus::PrimalInfeasible
            | SolverStatus::AlmostPrimalInfeasible =>
        {
            return Err(FitError::Infeasible {
                status: status.to_string(),
                max_violation: row_violation(model, rows, &x[..]),
            });
        },
        _ => {
            return Err(FitError::SolverNonconvergence {
                iterations,
                residual: row_violation(model, rows, &x[..]),
                status: status.to_string(),
            });
        },
    }

    Ok(ConicOutcome { x, status: status.to_string(), iterations })
}

/// Largest violation of `rows` and of the variable bounds at `x`.
pub(super) fn row_violation(
    model: &Model,
    rows: &[(LinExpr, Sense)],
    x: &[f64],
) -> f64
{
    if x.iter().any(|xj| !xj.is_finite()) {
        return f64::INFINITY;
    }
    let rows = rows.iter()
        .map(|(expr, sense)| model::violation(expr.eval(x), *sense))
        .fold(0f64, f64::max);
    let bounds = model.vars()
        .iter()
        .zip(x)
        .map(|(info, &xj)| (info.lower - xj).max(xj - info.upper).max(0f64))
        .fold(0f64, f64::max);
    rows.max(bounds)
}
