//! Real root isolation with Sturm sequences.

use crate::primitive::rat;
use crate::symbolic::poly::Poly;
use rug::Rational;
use std::cmp::Ordering;

/// Bisection stops once an isolating interval is narrower than this.
const TARGET_WIDTH: f64 = 1e-12;

/// The maximum number of bisections spent on one interval, both while isolating and refining.
const MAX_BISECTIONS: usize = 256;

/// The Sturm sequence of a square-free polynomial: `p`, `p'`, and the negated remainders of the
/// Euclidean algorithm.
#[derive(Debug, Clone)]
pub struct SturmSequence {
    polys: Vec<Poly>,
}

impl SturmSequence {
    /// Builds the Sturm sequence of `p`.
    pub fn new(p: &Poly) -> Self {
        let mut polys = vec![p.clone(), p.derivative()];
        loop {
            let len = polys.len();
            let (prev, last) = (&polys[len - 2], &polys[len - 1]);
            if last.is_zero() {
                polys.pop();
                break;
            }

            match prev.div_rem(last) {
                Some((_, remainder)) if !remainder.is_zero() => polys.push(-&remainder),
                _ => break,
            }
        }
        Self { polys }
    }

    /// Counts the sign changes of the sequence at `x`, ignoring zeros.
    pub fn sign_changes(&self, x: &Rational) -> usize {
        let signs = self.polys.iter()
            .map(|p| p.sign_at(x))
            .filter(|sign| *sign != Ordering::Equal)
            .collect::<Vec<_>>();
        signs.windows(2).filter(|pair| pair[0] != pair[1]).count()
    }

    /// Counts the distinct real roots in the half-open interval `(lo, hi]`.
    pub fn count_roots(&self, lo: &Rational, hi: &Rational) -> usize {
        self.sign_changes(lo).saturating_sub(self.sign_changes(hi))
    }
}

/// Returns a bound `B` such that every real root of `p` lies in `(-B, B)`.
///
/// This is Cauchy's bound, `1 + max |a_i / a_n|`.
pub fn root_bound(p: &Poly) -> Rational {
    let Some(lc) = p.leading_coeff() else { return rat(1) };
    let degree = p.coeffs().len() - 1;
    let max_ratio = p.coeffs()[..degree]
        .iter()
        .map(|c| (c.clone() / lc).abs())
        .fold(rat(0), |max, ratio| if ratio > max { ratio } else { max });
    max_ratio + rat(1)
}

/// Finds every real root of a square-free polynomial, approximated by bisection to within
/// `1e-12`.
pub fn isolate_real_roots(p: &Poly) -> Vec<f64> {
    if p.is_constant() {
        return Vec::new();
    }

    let sequence = SturmSequence::new(p);
    let bound = root_bound(p);
    let width = Rational::from_f64(TARGET_WIDTH).unwrap_or_else(|| rat((1, 1_000_000_000)));

    let mut roots = Vec::new();
    let mut intervals = vec![(-bound.clone(), bound)];
    while let Some((lo, hi)) = intervals.pop() {
        match sequence.count_roots(&lo, &hi) {
            0 => {},
            1 => roots.push(refine(&sequence, lo, hi, &width)),
            _ => {
                let mid = midpoint(&lo, &hi);
                intervals.push((mid.clone(), hi));
                intervals.push((lo, mid));
            },
        }
    }

    roots.sort_by(f64::total_cmp);
    roots
}

/// Narrows an interval `(lo, hi]` containing exactly one root until it is narrower than `width`,
/// and returns its midpoint.
fn refine(sequence: &SturmSequence, mut lo: Rational, mut hi: Rational, width: &Rational) -> f64 {
    for _ in 0..MAX_BISECTIONS {
        if hi.clone() - &lo < *width {
            break;
        }

        let mid = midpoint(&lo, &hi);
        if sequence.count_roots(&lo, &mid) == 1 {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    midpoint(&lo, &hi).to_f64()
}

fn midpoint(lo: &Rational, hi: &Rational) -> Rational {
    (lo.clone() + hi) / rat(2)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use super::*;

    fn poly(coeffs: &[i64]) -> Poly {
        Poly::from_coeffs(coeffs.iter().map(|&c| rat(c)).collect())
    }

    #[test]
    fn counts_roots() {
        // (x - 1)(x - 2)(x - 3)
        let sequence = SturmSequence::new(&poly(&[-6, 11, -6, 1]));
        assert_eq!(sequence.count_roots(&rat(-10), &rat(10)), 3);
        assert_eq!(sequence.count_roots(&rat(0), &rat((5, 2))), 2);
        assert_eq!(sequence.count_roots(&rat(1), &rat(2)), 1);
    }

    #[test]
    fn cubic_with_irrational_roots() {
        // x^3 - 2x - 1 = (x + 1)(x^2 - x - 1)
        let roots = isolate_real_roots(&poly(&[-1, -2, 0, 1]));
        let golden = (1.0 + 5f64.sqrt()) / 2.0;

        assert_eq!(roots.len(), 3);
        assert_float_absolute_eq!(roots[0], -1.0, 1e-9);
        assert_float_absolute_eq!(roots[1], 1.0 - golden, 1e-9);
        assert_float_absolute_eq!(roots[2], golden, 1e-9);
    }

    #[test]
    fn no_real_roots() {
        assert!(isolate_real_roots(&poly(&[1, 0, 0, 0, 1])).is_empty());
    }
}
