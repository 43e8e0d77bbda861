//! Derivative-free minimization for model parameter search.

/// Outcome of a simplex search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best point found.
    pub point: Vec<f64>,
    /// Objective value at the best point.
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the simplex collapsed within tolerance.
    pub converged: bool,
}

/// Stopping criteria for [`minimize_bounded`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_iter: usize,
    pub tolerance: f64,
    /// Relative step used to seed the initial simplex.
    pub initial_step: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_iter: 500,
            tolerance: 1e-8,
            initial_step: 0.1,
        }
    }
}

// Standard Nelder-Mead coefficients.
const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimize `objective` over a box with the Nelder-Mead simplex method.
///
/// Every candidate point is clamped into `bounds` before evaluation, so the
/// objective never sees parameters outside the box. `bounds` must have the
/// same length as `start`.
pub fn minimize_bounded<F>(
    objective: F,
    start: &[f64],
    bounds: &[(f64, f64)],
    opts: SearchOptions,
) -> SearchResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = start.len();
    if n == 0 || bounds.len() != n {
        return SearchResult {
            point: start.to_vec(),
            value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let clamp = |point: &[f64]| -> Vec<f64> {
        point
            .iter()
            .zip(bounds.iter())
            .map(|(&x, &(lo, hi))| x.clamp(lo, hi))
            .collect()
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(clamp(start));
    for i in 0..n {
        let mut vertex = start.to_vec();
        let step = if vertex[i].abs() > 1e-10 {
            opts.initial_step * vertex[i].abs()
        } else {
            opts.initial_step
        };
        vertex[i] += step;
        simplex.push(clamp(&vertex));
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < opts.max_iter {
        iterations += 1;

        // Keep the simplex ordered best to worst.
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| {
            values[a]
                .partial_cmp(&values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = order[0];
        let second_worst = order[n - 1];
        let worst = order[n];

        if (values[worst] - values[best]).abs() < opts.tolerance {
            converged = true;
            break;
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; n];
        for (i, vertex) in simplex.iter().enumerate() {
            if i == worst {
                continue;
            }
            for (c, &x) in centroid.iter_mut().zip(vertex.iter()) {
                *c += x;
            }
        }
        for c in &mut centroid {
            *c /= n as f64;
        }

        let towards = |from: &[f64], coeff: f64| -> Vec<f64> {
            clamp(
                &centroid
                    .iter()
                    .zip(from.iter())
                    .map(|(c, x)| c + coeff * (c - x))
                    .collect::<Vec<_>>(),
            )
        };

        let reflected = towards(&simplex[worst], REFLECT);
        let reflected_value = objective(&reflected);

        if reflected_value < values[best] {
            let expanded = towards(&simplex[worst], REFLECT * EXPAND);
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        // Contract towards the centroid, from whichever of the worst and
        // reflected points is better.
        let (anchor, anchor_value) = if reflected_value < values[worst] {
            (&reflected, reflected_value)
        } else {
            (&simplex[worst], values[worst])
        };
        let contracted = towards(anchor, -CONTRACT);
        let contracted_value = objective(&contracted);
        if contracted_value < anchor_value {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        // Shrink everything towards the best vertex.
        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i == best {
                continue;
            }
            for (x, &b) in simplex[i].iter_mut().zip(anchor.iter()) {
                *x = b + SHRINK * (*x - b);
            }
            simplex[i] = clamp(&simplex[i]);
            values[i] = objective(&simplex[i]);
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);

    SearchResult {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}
