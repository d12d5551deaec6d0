//! Default values and numerical thresholds shared across the crate.

/// Default upper bound on the power-mean exponent `ρ`.
pub const DEFAULT_EXPONENT_UPPER_BOUND: f64 = 1f64;
/// Default starting value of the power-mean exponent `ρ`.
pub const DEFAULT_START_EXPONENT:       f64 = 0.5f64;
/// Default starting value of the cutoff `p`.
pub const DEFAULT_START_CUTOFF:         f64 = 0.5f64;

/// Default stopping tolerance, relative to `1 + |objective|`.
pub const DEFAULT_TOLERANCE:            f64 = 1e-7;
/// Default iteration cap of the nonlinear solver.
pub const DEFAULT_MAX_ITER:           usize = 500;
/// Default iteration cap of each conic subproblem.
pub const DEFAULT_QP_MAX_ITER:          u32 = 200;
/// Initial proximal weight `μ`.
pub const DEFAULT_PROXIMAL_WEIGHT:      f64 = 1f64;

/// Tolerance for `Σ_t w[t] = 1` on user supplied weights.
pub const SIMPLEX_TOLERANCE:            f64 = 1e-6;

/// Below this magnitude the power mean is replaced by
/// its limit, the weighted geometric mean.
pub const GEOMETRIC_MEAN_THRESHOLD:     f64 = 1e-8;

/// Fraction of the predicted decrease a step must achieve.
pub const ACCEPTANCE_RATIO:             f64 = 0.1f64;
/// Factor applied to `μ` after an accepted step.
pub const PROXIMAL_SHRINK:              f64 = 0.5f64;
/// Factor applied to `μ` after a rejected step.
pub const PROXIMAL_EXPAND:              f64 = 4f64;
/// Floor of the proximal weight.
pub const MIN_PROXIMAL_WEIGHT:          f64 = 1e-4;
/// Above this proximal weight the solver gives up.
pub const MAX_PROXIMAL_WEIGHT:          f64 = 1e12;

/// Column width of the verbose iteration table.
pub const PRINT_WIDTH:                usize = 12;
