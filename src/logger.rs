//! Progress table of the nonlinear solver.
//! Rows go to stdout if `verbose` is set and to `log::debug!` always.
use colored::Colorize;

use crate::constants::PRINT_WIDTH;

const WIDTH: usize = PRINT_WIDTH;
const FULL_WIDTH: usize = 5 * (WIDTH + 2);

pub(crate) struct IterationLogger<'a> {
    name: &'a str,
    verbose: bool,
}

impl<'a> IterationLogger<'a> {
    pub(crate) fn new(name: &'a str, verbose: bool) -> Self {
        Self { name, verbose }
    }

    pub(crate) fn print_header(&self, n_vars: usize, n_constrs: usize) {
        log::info!(
            "[{}] SQP started with {n_vars} variables and {n_constrs} constraints",
            self.name,
        );
        if !self.verbose { return; }

        println!(
            "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
            "", self.name.bold(), "",
        );
        println!(
            "{:>WIDTH$}  {:>WIDTH$}  {:>WIDTH$}  {:>WIDTH$}  {:>WIDTH$}",
            "ITER".bold().red(),
            "OBJ.".bold().blue(),
            "PRED.".bold().green(),
            "PROX.".bold().yellow(),
            "STEP".bold().cyan(),
        );
    }

    pub(crate) fn print_row(
        &self,
        iter: usize,
        objective: f64,
        predicted: f64,
        mu: f64,
        accepted: bool,
    )
    {
        let step = if accepted { "accept" } else { "reject" };
        log::debug!(
            "[{}] iter {iter}: obj = {objective:.6e}, \
            pred = {predicted:.3e}, mu = {mu:.1e}, {step}",
            self.name,
        );
        if !self.verbose { return; }

        let step = if accepted { step.green() } else { step.red() };
        println!(
            "{:>WIDTH$}  {:>WIDTH$.6e}  {:>WIDTH$.3e}  {:>WIDTH$.1e}  {:>WIDTH$}",
            iter, objective, predicted, mu, step,
        );
    }

    pub(crate) fn print_footer(
        &self,
        status: &str,
        iterations: usize,
        objective: f64,
    )
    {
        log::info!(
            "[{}] SQP finished after {iterations} iterations. \
            objective = {objective:.6e} ({status})",
            self.name,
        );
        if !self.verbose { return; }

        println!(
            "{:->FULL_WIDTH$}\n{:<WIDTH$}  {}\n{:<WIDTH$}  {}\n{:<WIDTH$}  {:.6e}\n{:=>FULL_WIDTH$}",
            "",
            "Status".bold(), status.bold().green(),
            "Iterations".bold(), iterations,
            "Objective".bold(), objective,
            "",
        );
    }
}
