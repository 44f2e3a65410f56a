//! Limited-memory BFGS minimizer with a strong Wolfe line search.

use std::collections::VecDeque;

use log::debug;

/// Armijo sufficient-decrease constant.
const WOLFE_C1: f64 = 1e-4;
/// Strong Wolfe curvature constant.
const WOLFE_C2: f64 = 0.9;
/// Trials before the line search gives up.
const MAX_LINE_SEARCH_STEPS: usize = 50;
/// Curvature pairs with `s·y` at or below this are discarded.
const CURVATURE_EPSILON: f64 = 1e-12;

/// Outcome of a minimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Final parameter vector.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub value: f64,
    /// Largest absolute gradient component at `x`.
    pub gradient_norm: f64,
    /// Accepted iterations.
    pub iterations: usize,
    /// Whether the gradient dropped below the tolerance.
    pub converged: bool,
}

/// L-BFGS quasi-Newton optimizer.
///
/// The inverse Hessian is approximated from the last `history_size`
/// position/gradient difference pairs using the two-loop recursion.
/// All reductions run sequentially, so identical inputs give bit-identical
/// results.
#[derive(Debug, Clone)]
pub struct Lbfgs {
    max_iter: usize,
    tol: f64,
    history_size: usize,
}

impl Lbfgs {
    pub fn new(max_iter: usize, tol: f64, history_size: usize) -> Self {
        Self {
            max_iter,
            tol,
            history_size: history_size.max(1),
        }
    }

    /// Minimize `objective`, which returns the value and gradient at a point.
    pub fn minimize<F>(&self, objective: F, x0: Vec<f64>) -> Minimum
    where
        F: Fn(&[f64]) -> (f64, Vec<f64>),
    {
        let mut history: VecDeque<(Vec<f64>, Vec<f64>)> =
            VecDeque::with_capacity(self.history_size);

        let mut x = x0;
        let (mut value, mut gradient) = objective(&x);
        let mut gradient_norm = max_abs(&gradient);
        let mut iterations = 0;

        while gradient_norm > self.tol && iterations < self.max_iter {
            let mut direction = two_loop(&history, &gradient);
            let mut slope = dot(&direction, &gradient);
            if slope >= 0.0 || slope.is_nan() {
                // Not a descent direction: restart from steepest descent.
                history.clear();
                direction = gradient.iter().map(|g| -g).collect();
                slope = -dot(&gradient, &gradient);
            }

            let Some((next_x, next_value, next_gradient)) =
                wolfe_search(&objective, &x, value, &direction, slope)
            else {
                debug!(
                    "line search made no progress at iteration {iterations} (loss {value:.6})"
                );
                break;
            };

            let s: Vec<f64> = next_x.iter().zip(&x).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = next_gradient
                .iter()
                .zip(&gradient)
                .map(|(a, b)| a - b)
                .collect();
            if dot(&s, &y) > CURVATURE_EPSILON {
                if history.len() == self.history_size {
                    history.pop_front();
                }
                history.push_back((s, y));
            } else {
                // Stale pairs would keep reproducing the same direction.
                history.clear();
            }

            x = next_x;
            value = next_value;
            gradient = next_gradient;
            gradient_norm = max_abs(&gradient);
            iterations += 1;

            debug!("iteration {iterations}: loss {value:.6}, gradient {gradient_norm:.3e}");
        }

        Minimum {
            x,
            value,
            gradient_norm,
            iterations,
            converged: gradient_norm <= self.tol,
        }
    }
}

/// Search direction `-H·g` from the stored curvature pairs.
fn two_loop(history: &VecDeque<(Vec<f64>, Vec<f64>)>, gradient: &[f64]) -> Vec<f64> {
    let mut q = gradient.to_vec();
    let mut alphas = Vec::with_capacity(history.len());

    for (s, y) in history.iter().rev() {
        let rho = 1.0 / dot(y, s);
        let alpha = rho * dot(s, &q);
        axpy(-alpha, y, &mut q);
        alphas.push((rho, alpha));
    }

    if let Some((s, y)) = history.back() {
        let gamma = dot(s, y) / dot(y, y);
        q.iter_mut().for_each(|v| *v *= gamma);
    }

    for ((s, y), (rho, alpha)) in history.iter().zip(alphas.into_iter().rev()) {
        let beta = rho * dot(y, &q);
        axpy(alpha - beta, s, &mut q);
    }

    q.iter_mut().for_each(|v| *v = -*v);
    q
}

/// Bracket and bisect a step satisfying the strong Wolfe conditions.
///
/// When the trial budget runs out, the last step that satisfied sufficient
/// decrease is returned instead. `None` means no trial decreased the
/// objective enough.
fn wolfe_search<F>(
    objective: &F,
    x: &[f64],
    value: f64,
    direction: &[f64],
    slope: f64,
) -> Option<(Vec<f64>, f64, Vec<f64>)>
where
    F: Fn(&[f64]) -> (f64, Vec<f64>),
{
    let mut step = 1.0;
    let mut low = 0.0;
    let mut high = f64::INFINITY;
    let mut fallback = None;

    for _ in 0..MAX_LINE_SEARCH_STEPS {
        let candidate: Vec<f64> = x
            .iter()
            .zip(direction)
            .map(|(xi, di)| xi + step * di)
            .collect();
        let (candidate_value, candidate_gradient) = objective(&candidate);

        if !candidate_value.is_finite() || candidate_value > value + WOLFE_C1 * step * slope {
            high = step;
            step = (low + high) / 2.0;
            continue;
        }

        let candidate_slope = dot(&candidate_gradient, direction);
        if candidate_slope.abs() <= WOLFE_C2 * slope.abs() {
            return Some((candidate, candidate_value, candidate_gradient));
        }

        if candidate_slope > 0.0 {
            high = step;
        } else {
            low = step;
        }
        fallback = Some((candidate, candidate_value, candidate_gradient));
        step = if high.is_finite() {
            (low + high) / 2.0
        } else {
            step * 2.0
        };
    }
    fallback
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}
