//! A small modeling layer for problems of the form
//!
//! ```text
//!     min  c^T x
//!     s.t. a_i^T x + s_i(x) (≤, ≥, =) 0,  i = 1, ..., m
//!          l ≤ x ≤ u
//! ```
//!
//! where every `s_i` is either absent or a scaled power mean
//! ([`ScoreTerm`]).
//! A model is *linear* iff every score term is affine.
//!
//! Two helpers build the reformulations used by the fitters:
//! [`Model::add_epigraph`] introduces `t ≥ max(0, e_1, ..., e_k)`
//! and [`Model::add_defined`] introduces `v = e`.
//! Variables created by these helpers are *dependent*:
//! the nonlinear solver recomputes them from the other variables.
mod expr;
mod score;

use rayon::prelude::*;

use crate::error::Result;
use crate::solver::{self, Solution, SolverOptions};

pub use expr::{Var, LinExpr, Expr, Sense};
pub use score::{
    Exponent,
    ScoreTerm,
    PowerMean,
    power_mean,
    power_mean_with_gradient,
};

/// Bounds, starting value, and name of a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarInfo {
    /// Name of the variable.
    pub name: String,
    /// Lower bound. May be `-∞`.
    pub lower: f64,
    /// Upper bound. May be `+∞`.
    pub upper: f64,
    /// Starting value.
    pub start: f64,
    dependent: bool,
}

impl VarInfo {
    /// Returns `true` if the variable was created
    /// by [`Model::add_epigraph`] or [`Model::add_defined`].
    pub fn is_dependent(&self) -> bool {
        self.dependent
    }
}

/// A named constraint `body (sense) 0`.
/// `observation` links the constraint to a row of the data.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Name of the constraint.
    pub name: String,
    /// Index of the observation this constraint stems from.
    pub observation: Option<usize>,
    /// Left-hand side.
    pub body: Expr,
    /// Direction.
    pub sense: Sense,
}

#[derive(Debug, Clone)]
enum Dependent {
    Defined {
        var: Var,
        expr: Expr,
    },
    Epigraph {
        var: Var,
        lower_bounds: Vec<Expr>,
    },
}

/// An optimization model.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    vars: Vec<VarInfo>,
    constrs: Vec<Constraint>,
    dependents: Vec<Dependent>,
    objective: LinExpr,
}

impl Model {
    /// Construct an empty model with a zero objective.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constrs: Vec::new(),
            dependents: Vec::new(),
            objective: LinExpr::new(),
        }
    }

    /// Add a variable `lower ≤ x ≤ upper` starting at `start`.
    pub fn add_var<S: Into<String>>(
        &mut self,
        name: S,
        lower: f64,
        upper: f64,
        start: f64,
    ) -> Var
    {
        self.push_var(name.into(), lower, upper, start, false)
    }

    fn push_var(
        &mut self,
        name: String,
        lower: f64,
        upper: f64,
        start: f64,
        dependent: bool,
    ) -> Var
    {
        let var = Var(self.vars.len());
        self.vars.push(VarInfo { name, lower, upper, start, dependent });
        var
    }

    /// Add an affine constraint `body (sense) 0`.
    pub fn add_constr<S: Into<String>>(
        &mut self,
        name: S,
        body: LinExpr,
        sense: Sense,
    )
    {
        self.push_constr(name.into(), None, body.into(), sense);
    }

    fn push_constr(
        &mut self,
        name: String,
        observation: Option<usize>,
        body: Expr,
        sense: Sense,
    )
    {
        self.constrs.push(Constraint { name, observation, body, sense });
    }

    /// Add a variable `t ≥ 0` together with the constraints
    /// `t - e_k ≥ 0` for every `e_k` in `lower_bounds`.
    /// At an optimum of a minimization with nonnegative cost on `t`,
    /// `t = max(0, e_1, ..., e_k)`.
    pub fn add_epigraph<S: Into<String>>(
        &mut self,
        name: S,
        lower_bounds: Vec<Expr>,
        observation: Option<usize>,
    ) -> Var
    {
        let name = name.into();
        let var = self.push_var(name.clone(), 0f64, f64::INFINITY, 0f64, true);

        for (k, lb) in lower_bounds.iter().enumerate() {
            let body = lb.clone()
                .scaled(-1f64)
                .plus(LinExpr::from_var(var));
            self.push_constr(
                format!("{name}[{k}]"), observation, body, Sense::GreaterEqual
            );
        }

        self.dependents.push(Dependent::Epigraph { var, lower_bounds });
        var
    }

    /// Add a free variable `v` together with the constraint `v - e = 0`.
    pub fn add_defined<S: Into<String>>(
        &mut self,
        name: S,
        expr: Expr,
        observation: Option<usize>,
    ) -> Var
    {
        let name = name.into();
        let var = self.push_var(
            name.clone(), f64::NEG_INFINITY, f64::INFINITY, 0f64, true
        );

        let body = expr.clone()
            .scaled(-1f64)
            .plus(LinExpr::from_var(var));
        self.push_constr(name, observation, body, Sense::Equal);

        self.dependents.push(Dependent::Defined { var, expr });
        var
    }

    /// Set the objective `min c^T x`.
    /// The constant part of `objective` is kept.
    pub fn set_objective(&mut self, objective: LinExpr) {
        self.objective = objective;
    }

    /// Returns the name of the model.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of variables.
    pub fn n_vars(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints
    /// (variable bounds excluded).
    pub fn n_constrs(&self) -> usize {
        self.constrs.len()
    }

    /// Returns the variables.
    pub fn vars(&self) -> &[VarInfo] {
        &self.vars[..]
    }

    /// Returns the variable information of `var`.
    pub fn var(&self, var: Var) -> &VarInfo {
        &self.vars[var.0]
    }

    /// Returns the constraints in creation order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constrs[..]
    }

    /// Returns the objective.
    pub fn objective(&self) -> &LinExpr {
        &self.objective
    }

    /// Returns `true` if every constraint is affine.
    pub fn is_linear(&self) -> bool {
        self.constrs.iter().all(|c| c.body.is_affine())
    }

    /// Returns the starting values of all variables.
    pub fn start(&self) -> Vec<f64> {
        self.vars.iter().map(|v| v.start).collect()
    }

    /// Overwrite the dependent variables of `x` with the values
    /// implied by the other variables, in creation order.
    pub fn refresh_dependents(&self, x: &mut [f64]) -> Result<()> {
        for dependent in &self.dependents {
            match dependent {
                Dependent::Defined { var, expr } => {
                    x[var.0] = expr.eval(x)?;
                },
                Dependent::Epigraph { var, lower_bounds } => {
                    let mut t = 0f64;
                    for lb in lower_bounds {
                        t = t.max(lb.eval(x)?);
                    }
                    x[var.0] = t;
                },
            }
        }
        Ok(())
    }

    /// Objective value at the starting point
    /// with the dependent variables refreshed.
    pub fn start_objective(&self) -> Result<f64> {
        let mut x = self.start();
        self.refresh_dependents(&mut x[..])?;
        Ok(self.objective.eval(&x[..]))
    }

    /// First-order expansion of every constraint around `x`,
    /// in creation order.
    pub fn linearize(&self, x: &[f64]) -> Result<Vec<(LinExpr, Sense)>> {
        self.constrs.par_iter()
            .map(|c| {
                c.body.linearize(x).map(|expr| (expr, c.sense))
            })
            .collect()
    }

    /// Largest violation of a constraint or a bound at `x`.
    /// A constraint that cannot be evaluated counts as `+∞`.
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        let constrs = self.constrs.iter()
            .map(|c| match c.body.eval(x) {
                Ok(v) => violation(v, c.sense),
                Err(_) => f64::INFINITY,
            })
            .fold(0f64, f64::max);

        let bounds = self.vars.iter()
            .zip(x)
            .map(|(info, &xj)| {
                (info.lower - xj).max(xj - info.upper).max(0f64)
            })
            .fold(0f64, f64::max);

        constrs.max(bounds)
    }

    /// Solve the model with the backend chosen by `options`.
    pub fn solve(&self, options: &SolverOptions) -> Result<Solution> {
        solver::solve(self, options)
    }
}

/// Violation of `value (sense) 0`.
pub(crate) fn violation(value: f64, sense: Sense) -> f64 {
    match sense {
        Sense::LessEqual => value.max(0f64),
        Sense::GreaterEqual => (-value).max(0f64),
        Sense::Equal => value.abs(),
    }
}
