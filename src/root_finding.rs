use crate::constants::{
    BRACKET_GROWTH, BRACKET_INITIAL_FACTOR, BRACKET_MAX_EXPANSIONS, ROOT_FINDING_MAX_ITER,
    ROOT_F_TOLERANCE, ROOT_X_TOLERANCE,
};
use crate::error::{ClosureError, ClosureResult};

/// Tuning knobs shared by the scalar root finders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub max_iterations: usize,
    pub max_expansions: usize,
    /// Absolute tolerance on the root location
    pub x_tolerance: f64,
    /// Residual magnitude accepted as converged
    pub f_tolerance: f64,
    /// Geometric growth factor for bracket widening (> 1)
    pub growth: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: ROOT_FINDING_MAX_ITER,
            max_expansions: BRACKET_MAX_EXPANSIONS,
            x_tolerance: ROOT_X_TOLERANCE,
            f_tolerance: ROOT_F_TOLERANCE,
            growth: BRACKET_GROWTH,
        }
    }
}

/// Result of a root search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult {
    pub root: f64,
    /// Residual evaluated at `root`
    pub residual: f64,
    pub iterations: usize,
    pub bracket_width: f64,
}

/// A univariate root finder started from an initial guess.
///
/// The physics only hands over a residual function and a starting point, so any
/// method implementing this trait can be swapped in without touching the
/// temperature equations.
pub trait RootFinder {
    /// Short method name used in diagnostics
    fn name(&self) -> &'static str;

    fn find_root(&self, f: &dyn Fn(f64) -> f64, guess: f64) -> ClosureResult<RootResult>;
}

/// Brent's method on a bracket grown around the initial guess
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Brent {
    pub options: SolverOptions,
}

/// Bisection on a bracket grown around the initial guess
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bisection {
    pub options: SolverOptions,
}

impl RootFinder for Brent {
    fn name(&self) -> &'static str {
        "brent"
    }

    fn find_root(&self, f: &dyn Fn(f64) -> f64, guess: f64) -> ClosureResult<RootResult> {
        let (lower, upper) = bracket_from_guess(f, guess, &self.options)?;
        brent_root_find(f, lower, upper, &self.options)
    }
}

impl RootFinder for Bisection {
    fn name(&self) -> &'static str {
        "bisection"
    }

    fn find_root(&self, f: &dyn Fn(f64) -> f64, guess: f64) -> ClosureResult<RootResult> {
        let (lower, upper) = bracket_from_guess(f, guess, &self.options)?;
        bisect(f, lower, upper, &self.options)
    }
}

fn same_sign(a: f64, b: f64) -> bool {
    (a > 0.0 && b > 0.0) || (a < 0.0 && b < 0.0)
}

/// Grow a bracket `[lower, upper]` with a sign change around a positive guess.
///
/// Both ends move geometrically so trial points stay strictly positive. The end
/// with the smaller residual magnitude is pushed outward first. A NaN residual
/// stops expansion on that side, which keeps its last usable point (or the
/// guess). Infinite residuals count as sign information; an infinite end is
/// pulled back toward the other end before the bracket is returned.
pub fn bracket_from_guess<F>(f: F, guess: f64, options: &SolverOptions) -> ClosureResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    const METHOD: &str = "bracket";

    if !(guess.is_finite() && guess > 0.0) {
        return Err(ClosureError::divergence(
            METHOD,
            format!("initial guess must be positive and finite, got {guess}"),
        ));
    }
    if !(options.growth.is_finite() && options.growth > 1.0) {
        return Err(ClosureError::divergence(
            METHOD,
            format!("growth factor must exceed 1, got {}", options.growth),
        ));
    }

    let f_guess = f(guess);
    let mut lower = guess / BRACKET_INITIAL_FACTOR;
    let mut upper = guess * BRACKET_INITIAL_FACTOR;
    let mut f_lower = f(lower);
    let mut f_upper = f(upper);

    // An open side may still be pushed outward; a closed side hit NaN
    let mut lower_open = true;
    let mut upper_open = true;
    if f_lower.is_nan() {
        lower_open = false;
        lower = guess;
        f_lower = f_guess;
    }
    if f_upper.is_nan() {
        upper_open = false;
        upper = guess;
        f_upper = f_guess;
    }

    for _ in 0..=options.max_expansions {
        if !f_lower.is_nan() && !f_upper.is_nan() && !same_sign(f_lower, f_upper) {
            return tighten_infinite_ends(&f, (lower, f_lower), (upper, f_upper), options);
        }

        if lower_open && (!upper_open || f_lower.abs() < f_upper.abs()) {
            let next = lower / options.growth;
            let f_next = f(next);
            if f_next.is_nan() {
                lower_open = false;
                continue;
            }
            if !same_sign(f_next, f_lower) {
                return tighten_infinite_ends(&f, (next, f_next), (lower, f_lower), options);
            }
            lower = next;
            f_lower = f_next;
        } else if upper_open {
            let next = upper * options.growth;
            let f_next = f(next);
            if f_next.is_nan() {
                upper_open = false;
                continue;
            }
            if !same_sign(f_upper, f_next) {
                return tighten_infinite_ends(&f, (upper, f_upper), (next, f_next), options);
            }
            upper = next;
            f_upper = f_next;
        } else {
            return Err(ClosureError::divergence(
                METHOD,
                format!(
                    "residual undefined beyond x = {lower} ({f_lower}) and x = {upper} ({f_upper})"
                ),
            ));
        }
    }

    Err(ClosureError::divergence(
        METHOD,
        format!(
            "no sign change found in [{lower}, {upper}] after {} expansions",
            options.max_expansions
        ),
    ))
}

/// Shrink a sign-changing bracket geometrically until both residuals are finite.
fn tighten_infinite_ends<F>(
    f: &F,
    (mut lower, mut f_lower): (f64, f64),
    (mut upper, mut f_upper): (f64, f64),
    options: &SolverOptions,
) -> ClosureResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    for _ in 0..=options.max_iterations {
        if f_lower.is_finite() && f_upper.is_finite() {
            return Ok((lower, upper));
        }

        let mid = lower * (upper / lower).sqrt();
        let f_mid = f(mid);
        if f_mid.is_nan() {
            return Err(ClosureError::divergence(
                "bracket",
                format!("residual undefined at x = {mid} inside [{lower}, {upper}]"),
            ));
        }

        if same_sign(f_mid, f_lower) {
            lower = mid;
            f_lower = f_mid;
        } else {
            upper = mid;
            f_upper = f_mid;
        }
    }

    Err(ClosureError::divergence(
        "bracket",
        format!("residual stays infinite in [{lower}, {upper}]"),
    ))
}

/// Brent's method for root finding on a bracket
pub fn brent_root_find<F>(
    f: F,
    lower: f64,
    upper: f64,
    options: &SolverOptions,
) -> ClosureResult<RootResult>
where
    F: Fn(f64) -> f64,
{
    const METHOD: &str = "brent";

    let mut a = lower;
    let mut b = upper;
    let mut fa = f(a);
    let mut fb = f(b);

    if !fa.is_finite() || !fb.is_finite() {
        return Err(ClosureError::divergence(
            METHOD,
            format!("residual undefined at bracket: f({a}) = {fa}, f({b}) = {fb}"),
        ));
    }
    if fa == 0.0 {
        return Ok(RootResult {
            root: a,
            residual: fa,
            iterations: 0,
            bracket_width: 0.0,
        });
    }
    if fb == 0.0 {
        return Ok(RootResult {
            root: b,
            residual: fb,
            iterations: 0,
            bracket_width: 0.0,
        });
    }
    if same_sign(fa, fb) {
        return Err(ClosureError::divergence(
            METHOD,
            format!("root not bracketed: f({a}) = {fa}, f({b}) = {fb}"),
        ));
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=options.max_iterations {
        if same_sign(fb, fc) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }

        // Keep b as the best estimate
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tolerance_scaled = 2.0 * f64::EPSILON * b.abs() + 0.5 * options.x_tolerance;
        let m = 0.5 * (c - b);

        if m.abs() <= tolerance_scaled || fb.abs() < options.f_tolerance {
            return Ok(RootResult {
                root: b,
                residual: fb,
                iterations: iteration,
                bracket_width: (c - b).abs(),
            });
        }

        if e.abs() >= tolerance_scaled && fa.abs() > fb.abs() {
            let s = fb / fa;
            let mut p;
            let mut q;

            if a == c {
                // Secant step
                p = 2.0 * m * s;
                q = 1.0 - s;
            } else {
                // Inverse quadratic interpolation
                let qa = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * m * qa * (qa - r) - (b - a) * (r - 1.0));
                q = (qa - 1.0) * (r - 1.0) * (s - 1.0);
            }

            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }

            let min_interp = 3.0 * m * q - (tolerance_scaled * q).abs();
            let min_previous = (e * q).abs();
            if 2.0 * p < min_interp.min(min_previous) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = d;
            }
        } else {
            d = m;
            e = d;
        }

        a = b;
        fa = fb;

        if d.abs() > tolerance_scaled {
            b += d;
        } else {
            b += tolerance_scaled.copysign(m);
        }

        fb = f(b);
        if !fb.is_finite() {
            return Err(ClosureError::divergence(
                METHOD,
                format!("residual undefined at x = {b} ({fb})"),
            ));
        }
    }

    Err(ClosureError::divergence(
        METHOD,
        format!(
            "did not converge after {} iterations (last x = {b}, f = {fb})",
            options.max_iterations
        ),
    ))
}

/// Bisection method for root finding on a bracket
///
/// Slow (linear convergence) but only needs the sign of the residual.
pub fn bisect<F>(f: F, lower: f64, upper: f64, options: &SolverOptions) -> ClosureResult<RootResult>
where
    F: Fn(f64) -> f64,
{
    const METHOD: &str = "bisection";

    if lower >= upper {
        return Err(ClosureError::divergence(
            METHOD,
            format!("invalid interval [{lower}, {upper}]"),
        ));
    }

    let mut left = lower;
    let mut right = upper;
    let mut f_left = f(left);
    let f_right = f(right);

    if !f_left.is_finite() || !f_right.is_finite() {
        return Err(ClosureError::divergence(
            METHOD,
            format!("residual undefined at bracket: f({left}) = {f_left}, f({right}) = {f_right}"),
        ));
    }
    if same_sign(f_left, f_right) {
        return Err(ClosureError::divergence(
            METHOD,
            format!("root not bracketed: f({left}) = {f_left}, f({right}) = {f_right}"),
        ));
    }

    // Bisection needs far more steps than Brent to reach the same width
    let max_iterations = options.max_iterations.max(200);

    for iteration in 1..=max_iterations {
        let mid = 0.5 * (left + right);
        let f_mid = f(mid);
        if !f_mid.is_finite() {
            return Err(ClosureError::divergence(
                METHOD,
                format!("residual undefined at x = {mid} ({f_mid})"),
            ));
        }

        let width = right - left;
        if f_mid == 0.0
            || 0.5 * width <= options.x_tolerance + 2.0 * f64::EPSILON * mid.abs()
            || f_mid.abs() < options.f_tolerance
        {
            return Ok(RootResult {
                root: mid,
                residual: f_mid,
                iterations: iteration,
                bracket_width: width,
            });
        }

        if same_sign(f_mid, f_left) {
            left = mid;
            f_left = f_mid;
        } else {
            right = mid;
        }
    }

    Err(ClosureError::divergence(
        METHOD,
        format!("did not converge after {max_iterations} iterations"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_brent_root_find_quadratic() {
        // x^2 - 4 = 0, root at x = 2
        let f = |x: f64| x * x - 4.0;
        let result = brent_root_find(f, 1.0, 3.0, &SolverOptions::default()).unwrap();

        assert_abs_diff_eq!(result.root, 2.0, epsilon = 1e-10);
        assert!(result.iterations > 0);
        assert!(result.residual.abs() < 1e-9);
    }

    #[test]
    fn test_brent_root_find_linear() {
        let f = |x: f64| 2.0 * x - 6.0;
        let result = brent_root_find(f, 0.0, 5.0, &SolverOptions::default()).unwrap();
        assert_abs_diff_eq!(result.root, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_brent_root_at_endpoint() {
        let f = |x: f64| x - 1.0;
        let result = brent_root_find(f, 1.0, 4.0, &SolverOptions::default()).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_brent_root_find_no_bracket() {
        let f = |x: f64| x * x + 1.0;
        let err = brent_root_find(f, 1.0, 3.0, &SolverOptions::default()).unwrap_err();
        match err {
            ClosureError::SolverDivergence { method, reason } => {
                assert_eq!(method, "brent");
                assert!(reason.contains("not bracketed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_brent_iteration_budget() {
        let options = SolverOptions {
            max_iterations: 2,
            f_tolerance: 0.0,
            ..SolverOptions::default()
        };
        let f = |x: f64| x.powi(3) - 2.0;
        assert!(matches!(
            brent_root_find(f, 0.0, 10.0, &options),
            Err(ClosureError::SolverDivergence { .. })
        ));
    }

    #[test]
    fn test_bisect_matches_brent() {
        let f = |x: f64| x.ln() - 1.0;
        let options = SolverOptions::default();
        let brent = brent_root_find(f, 1.0, 5.0, &options).unwrap();
        let bisection = bisect(f, 1.0, 5.0, &options).unwrap();

        assert_abs_diff_eq!(brent.root, std::f64::consts::E, epsilon = 1e-9);
        assert_abs_diff_eq!(bisection.root, std::f64::consts::E, epsilon = 1e-9);
        assert!(bisection.iterations > brent.iterations);
    }

    #[test]
    fn test_bisect_invalid_interval() {
        let f = |x: f64| x;
        assert!(bisect(f, 2.0, 1.0, &SolverOptions::default()).is_err());
    }

    #[test]
    fn test_bracket_grows_upward() {
        // Decreasing residual with its root far above the guess
        let f = |x: f64| 5000.0 - x;
        let (lower, upper) = bracket_from_guess(f, 300.0, &SolverOptions::default()).unwrap();
        assert!(lower > 0.0);
        assert!(lower <= 5000.0 && upper >= 5000.0);
    }

    #[test]
    fn test_bracket_grows_downward() {
        let f = |x: f64| x - 2.5;
        let (lower, upper) = bracket_from_guess(f, 1200.0, &SolverOptions::default()).unwrap();
        assert!(lower > 0.0);
        assert!(lower <= 2.5 && upper >= 2.5);
    }

    #[test]
    fn test_bracket_skips_undefined_side() {
        // Undefined above 1250, root at 50
        let f = |x: f64| if x > 1250.0 { f64::NAN } else { x - 50.0 };
        let (lower, upper) = bracket_from_guess(f, 1200.0, &SolverOptions::default()).unwrap();
        assert!(upper <= 1250.0);
        assert!(lower <= 50.0 && upper >= 50.0);
    }

    #[test]
    fn test_bracket_from_undefined_guess() {
        // Guess and upper trial undefined, root at 50 below them
        let f = |x: f64| if x > 1150.0 { f64::NAN } else { x - 50.0 };
        let (lower, upper) = bracket_from_guess(f, 1200.0, &SolverOptions::default()).unwrap();
        assert!(upper <= 1150.0);
        assert!(lower <= 50.0 && upper >= 50.0);
    }

    #[test]
    fn test_bracket_pulls_back_infinite_end() {
        // Overflows to +inf below 1000, root at 1050
        let f = |x: f64| if x < 1000.0 { f64::INFINITY } else { 1050.0 - x };
        let (lower, upper) = bracket_from_guess(f, 1200.0, &SolverOptions::default()).unwrap();
        assert!(f(lower).is_finite() && f(upper).is_finite());
        assert!(lower <= 1050.0 && upper >= 1050.0);

        let result = Brent::default().find_root(&f, 1200.0).unwrap();
        assert_abs_diff_eq!(result.root, 1050.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bracket_undefined_everywhere() {
        let f = |x: f64| (-x).ln();
        assert!(matches!(
            bracket_from_guess(f, 1200.0, &SolverOptions::default()),
            Err(ClosureError::SolverDivergence { .. })
        ));
    }

    #[test]
    fn test_bracket_no_sign_change() {
        let f = |x: f64| 1.0 + x * 0.0;
        let err = bracket_from_guess(f, 1.0, &SolverOptions::default()).unwrap_err();
        assert!(err.to_string().contains("no sign change"));
    }

    #[test]
    fn test_bracket_rejects_bad_guess() {
        let f = |x: f64| x - 1.0;
        assert!(bracket_from_guess(f, 0.0, &SolverOptions::default()).is_err());
        assert!(bracket_from_guess(f, f64::NAN, &SolverOptions::default()).is_err());
    }

    #[test]
    fn test_root_finders_agree() {
        let f = |x: f64| 700.0 / x - (x / 10.0).ln();
        let brent = Brent::default().find_root(&f, 1200.0).unwrap();
        let bisection = Bisection::default().find_root(&f, 1200.0).unwrap();
        assert_abs_diff_eq!(brent.root, bisection.root, epsilon = 1e-6);
        assert_eq!(Brent::default().name(), "brent");
        assert_eq!(Bisection::default().name(), "bisection");
    }
}
