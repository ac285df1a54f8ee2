/// Failure of the bracketed root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootNotFound {
    /// f(x1) and f(x2) have the same sign.
    NotBracketed,
    /// The interval did not shrink below the tolerance in `maxiter` steps. Holds the
    /// best estimate of the root.
    MaxIterations(f64),
}

/// Using Brent's method, find the root of a function known to lie between `x1 ` and
/// `x2`. The root will be refined until its accuracy is `tol`. Every step that does not
/// accept the inverse quadratic interpolation falls back to bisection, so the interval
/// is guaranteed to shrink.
///
/// The code is based on:
/// Numerical Recipes in C: The Art of Scientific Computing. W. H. Press,
/// S. A. Teukolsky, W. T. Vetterling, B. P. Flannery. Cambridge University Press 1992
pub fn zbrent<F: Fn(f64) -> f64>(
    func: F,
    x1: f64,
    x2: f64,
    tol: f64,
    maxiter: usize,
) -> Result<f64, RootNotFound> {
    let eps: f64 = f64::EPSILON;
    let mut a: f64 = x1;
    let mut b: f64 = x2;
    let mut c: f64 = x2;
    let mut d: f64 = 0.0;
    let mut e: f64 = 0.0;

    let mut fa: f64 = func(a);
    let mut fb: f64 = func(b);
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if (fa > 0.0 && fb > 0.0) || (fa < 0.0 && fb < 0.0) {
        return Err(RootNotFound::NotBracketed);
    }
    let mut fc: f64 = fb;

    for _ in 0..maxiter {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            // rename a, b, c and adjust the bounding interval d
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        // convergence check
        let tol1: f64 = 2.0 * eps * b.abs() + 0.5 * tol;
        let xm: f64 = 0.5 * (c - b);

        if xm.abs() <= tol1 || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // attempt inverse quadratic interpolation
            let s: f64 = fb / fa;
            let mut p: f64;
            let mut q: f64;
            if a == c {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                q = fa / fc;
                let r: f64 = fb / fc;
                p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                q = (q - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                // check whether in bounds
                q = -q;
            }
            p = p.abs();
            let min1: f64 = 3.0 * xm * q - (tol1 * q).abs();
            let min2: f64 = (e * q).abs();
            if (2.0 * p) < min1.min(min2) {
                // accept interpolation
                e = d;
                d = p / q;
            } else {
                // interpolation failed, use bisection.
                d = xm;
                e = d;
            }
        } else {
            // bounds decreasing to slowly, use bisection.
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else if xm > 0.0 {
            b += tol1;
        } else {
            b -= tol1;
        }
        fb = func(b);
    }
    Err(RootNotFound::MaxIterations(b))
}
