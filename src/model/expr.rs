use crate::error::Result;
use super::score::ScoreTerm;

/// A handle to a decision variable of a [`Model`](super::Model).
/// Handles are only meaningful for the model that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(pub(super) usize);

impl Var {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the column index of this variable.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The direction of a constraint `body (sense) 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `body ≤ 0`
    LessEqual,
    /// `body ≥ 0`
    GreaterEqual,
    /// `body = 0`
    Equal,
}

/// An affine expression `Σ_j c_j x_j + c_0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    terms: Vec<(Var, f64)>,
    offset: f64,
}

impl LinExpr {
    /// The zero expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// The constant expression `c`.
    pub fn constant(c: f64) -> Self {
        Self { terms: Vec::new(), offset: c }
    }

    /// The expression `1 · var`.
    pub fn from_var(var: Var) -> Self {
        Self { terms: vec![(var, 1f64)], offset: 0f64 }
    }

    /// The expression `Σ_{v ∈ vars} v`.
    pub fn sum<I>(vars: I) -> Self
        where I: IntoIterator<Item = Var>,
    {
        let terms = vars.into_iter().map(|v| (v, 1f64)).collect();
        Self { terms, offset: 0f64 }
    }

    /// Append `coef · var` and return `self`.
    pub fn term(mut self, var: Var, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    /// Append `coef · var`.
    pub fn add_term(&mut self, var: Var, coef: f64) {
        self.terms.push((var, coef));
    }

    /// Add `c` to the constant part.
    pub fn add_constant(&mut self, c: f64) {
        self.offset += c;
    }

    /// Add `other` to `self`.
    pub fn add_expr(&mut self, other: &LinExpr) {
        self.terms.extend_from_slice(&other.terms[..]);
        self.offset += other.offset;
    }

    /// Multiply every coefficient by `c`.
    pub fn scaled(mut self, c: f64) -> Self {
        self.terms.iter_mut().for_each(|(_, a)| { *a *= c; });
        self.offset *= c;
        self
    }

    /// Returns the linear terms.
    pub fn terms(&self) -> &[(Var, f64)] {
        &self.terms[..]
    }

    /// Returns the constant part.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Evaluate the expression at `x`.
    pub fn eval(&self, x: &[f64]) -> f64 {
        self.terms.iter()
            .map(|(v, a)| a * x[v.0])
            .sum::<f64>()
            + self.offset
    }

    /// Sort the terms by variable and merge duplicates.
    pub(crate) fn compressed(mut self) -> Self {
        self.terms.sort_by_key(|(v, _)| *v);
        let mut merged: Vec<(Var, f64)> = Vec::with_capacity(self.terms.len());
        for (v, a) in self.terms {
            match merged.last_mut() {
                Some((u, b)) if *u == v => { *b += a; },
                _ => { merged.push((v, a)); },
            }
        }
        merged.retain(|(_, a)| *a != 0f64);
        self.terms = merged;
        self
    }
}

/// An affine expression plus at most one composite score term.
/// This is the body of every constraint in a [`Model`](super::Model).
#[derive(Debug, Clone, Default)]
pub struct Expr {
    pub(crate) linear: LinExpr,
    pub(crate) score: Option<ScoreTerm>,
}

impl Expr {
    /// The expression consisting of a single score term.
    pub fn score(term: ScoreTerm) -> Self {
        Self { linear: LinExpr::new(), score: Some(term) }
    }

    /// Add an affine part and return `self`.
    pub fn plus(mut self, linear: LinExpr) -> Self {
        self.linear.add_expr(&linear);
        self
    }

    /// Multiply the expression by `c`.
    pub fn scaled(self, c: f64) -> Self {
        Self {
            linear: self.linear.scaled(c),
            score: self.score.map(|s| s.scaled(c)),
        }
    }

    /// Returns the affine part.
    pub fn linear(&self) -> &LinExpr {
        &self.linear
    }

    /// Returns the score term, if any.
    pub fn score_term(&self) -> Option<&ScoreTerm> {
        self.score.as_ref()
    }

    /// Returns `true` if the expression is affine in the variables.
    pub fn is_affine(&self) -> bool {
        self.score.as_ref().map_or(true, |s| s.is_affine())
    }

    /// Evaluate the expression at `x`.
    pub fn eval(&self, x: &[f64]) -> Result<f64> {
        let score = match &self.score {
            Some(term) => term.eval(x)?,
            None => 0f64,
        };
        Ok(self.linear.eval(x) + score)
    }

    /// First-order expansion of the expression around `x`.
    /// Exact when the expression is affine.
    pub fn linearize(&self, x: &[f64]) -> Result<LinExpr> {
        let mut expr = self.linear.clone();
        if let Some(term) = &self.score {
            let (value, grad) = term.linearize(x)?;
            let mut offset = value;
            for (v, g) in grad {
                expr.add_term(v, g);
                offset -= g * x[v.0];
            }
            expr.add_constant(offset);
        }
        Ok(expr.compressed())
    }
}

impl From<LinExpr> for Expr {
    fn from(linear: LinExpr) -> Self {
        Self { linear, score: None }
    }
}
