//! Math utilities.

/// Floating-point precision to use for integration and root finding.
#[allow(non_camel_case_types)]
pub type fin = f64;

/// Estimates the integral of the given function over the given interval using
/// the composite Simpson's rule with the given number of subintervals.
///
/// An odd number of subintervals is rounded up to the next even number.
pub fn integrate_simpson<E>(evaluate_integrand: E, start: fin, end: fin, n_intervals: usize) -> fin
where
    E: Fn(fin) -> fin,
{
    assert!(n_intervals > 0, "Number of subintervals must be larger than zero");
    let n_intervals = n_intervals + n_intervals % 2;

    let step = (end - start) / (n_intervals as fin);

    let mut sum = evaluate_integrand(start) + evaluate_integrand(end);
    for idx in 1..n_intervals {
        let weight = if idx % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * evaluate_integrand(start + (idx as fin) * step);
    }
    sum * step / 3.0
}

/// Estimates the integral of the given function over the given interval using a
/// five-point Gauss-Legendre quadrature.
pub fn integrate_five_point_gauss_legendre<E>(evaluate_integrand: E, start: fin, end: fin) -> fin
where
    E: Fn(fin) -> fin,
{
    const COORD_1: fin = -0.906_179_845_938_664; // -(1/3)*sqrt(5 + 2*sqrt(10/7))
    const COORD_2: fin = -0.538_469_310_105_683; // -(1/3)*sqrt(5 - 2*sqrt(10/7))
    const COORD_3: fin = 0.0;
    const COORD_4: fin = -COORD_2;
    const COORD_5: fin = -COORD_1;

    const WEIGHT_1: fin = 0.236_926_885_056_189_08; // (322 - 13*sqrt(70))/900
    const WEIGHT_2: fin = 0.478_628_670_499_366_47; // (322 + 13*sqrt(70))/900
    const WEIGHT_3: fin = 128.0 / 225.0;
    const WEIGHT_4: fin = WEIGHT_2;
    const WEIGHT_5: fin = WEIGHT_1;

    assert!(
        end >= start,
        "Interval end {:?} is smaller than interval start {:?}",
        end,
        start
    );
    let interval_scale = 0.5 * (end - start);
    let interval_offset = 0.5 * (end + start);

    interval_scale
        * (WEIGHT_1 * evaluate_integrand(interval_offset + interval_scale * COORD_1)
            + WEIGHT_2 * evaluate_integrand(interval_offset + interval_scale * COORD_2)
            + WEIGHT_3 * evaluate_integrand(interval_offset + interval_scale * COORD_3)
            + WEIGHT_4 * evaluate_integrand(interval_offset + interval_scale * COORD_4)
            + WEIGHT_5 * evaluate_integrand(interval_offset + interval_scale * COORD_5))
}

/// Returns `n_values` logarithmically spaced values from `start` to `end` (inclusive).
pub fn log_space(start: fin, end: fin, n_values: usize) -> Vec<fin> {
    assert!(
        start > 0.0 && end > 0.0,
        "Logarithmic axis bounds must be positive"
    );
    match n_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let ln_start = fin::ln(start);
            let ln_step = (fin::ln(end) - ln_start) / ((n_values - 1) as fin);
            (0..n_values)
                .map(|idx| fin::exp(ln_start + (idx as fin) * ln_step))
                .collect()
        }
    }
}

/// Outcome of a bracketing root search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootEstimate {
    /// Best estimate of the root.
    pub root: fin,
    /// Number of bisections performed.
    pub iterations: u32,
    /// Whether the residual reached the requested tolerance.
    pub converged: bool,
}

/// Searches for a root of `f` inside `[lower, upper]` by bisection.
///
/// The search stops when the absolute residual at the bracket midpoint is
/// within `tolerance`, or after `max_iterations` bisections, in which case the
/// midpoint of the final bracket is returned with `converged` set to false.
/// If the end point residuals have the same sign, the end point with the
/// smallest residual is returned without iterating.
pub fn find_root_bisection<F>(
    f: F,
    lower: fin,
    upper: fin,
    max_iterations: u32,
    tolerance: fin,
) -> RootEstimate
where
    F: Fn(fin) -> fin,
{
    assert!(
        upper > lower,
        "Bracket upper bound {} must be larger than lower bound {}",
        upper,
        lower
    );

    let mut lower = lower;
    let mut upper = upper;
    let mut lower_residual = f(lower);
    let upper_residual = f(upper);

    if (lower_residual < 0.0) == (upper_residual < 0.0) {
        let root = if fin::abs(lower_residual) <= fin::abs(upper_residual) {
            lower
        } else {
            upper
        };
        return RootEstimate {
            root,
            iterations: 0,
            converged: fin::abs(f(root)) <= tolerance,
        };
    }

    let mut iterations = 0;
    while iterations < max_iterations {
        let midpoint = 0.5 * (lower + upper);
        let residual = f(midpoint);
        iterations += 1;

        if fin::abs(residual) <= tolerance {
            return RootEstimate {
                root: midpoint,
                iterations,
                converged: true,
            };
        }

        if (residual < 0.0) == (lower_residual < 0.0) {
            lower = midpoint;
            lower_residual = residual;
        } else {
            upper = midpoint;
        }
    }

    RootEstimate {
        root: 0.5 * (lower + upper),
        iterations,
        converged: false,
    }
}
