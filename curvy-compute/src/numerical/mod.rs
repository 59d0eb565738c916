//! Numeric evaluation of symbolic expressions using `f64`.
//!
//! Evaluation never fails because of the value of the variable. Points where the expression is
//! undefined produce NaN or an infinity, following IEEE 754, and callers treat non-finite values
//! as gaps. Real powers of negative bases are NaN unless the exponent is an integer.
//!
//! Evaluation only fails when the expression contains a name with no numeric value, which can
//! only happen for expressions that were not produced by
//! [`Expr::from_ast`](crate::symbolic::Expr::from_ast).

use crate::consts::constant_value;
use crate::primitive::is_integer;
use crate::symbolic::{error::NoValue, expr::{Expr, Primary}};
use curvy_error::Error;

/// Evaluates the expression with the variable `var` set to `x`.
pub fn eval(expr: &Expr, var: &str, x: f64) -> Result<f64, Error> {
    eval_inner(expr, Some((var, x)))
}

/// Evaluates an expression that does not depend on any variable.
pub fn eval_const(expr: &Expr) -> Result<f64, Error> {
    eval_inner(expr, None)
}

/// Evaluates a built-in function at a point. Returns [`None`] for unknown functions.
pub fn eval_function(name: &str, arg: f64) -> Option<f64> {
    let value = match name {
        "sin" => arg.sin(),
        "cos" => arg.cos(),
        "tan" => arg.tan(),
        "asin" => arg.asin(),
        "acos" => arg.acos(),
        "atan" => arg.atan(),
        "exp" => arg.exp(),
        "log" | "ln" => arg.ln(),
        "sqrt" => arg.sqrt(),
        "abs" => arg.abs(),
        _ => return None,
    };
    Some(value)
}

fn eval_inner(expr: &Expr, binding: Option<(&str, f64)>) -> Result<f64, Error> {
    match expr {
        Expr::Primary(Primary::Number(n)) => Ok(n.to_f64()),
        Expr::Primary(Primary::Symbol(sym)) => match binding {
            Some((var, x)) if var == sym => Ok(x),
            _ => constant_value(sym).ok_or_else(|| no_value(sym)),
        },
        Expr::Primary(Primary::Call(name, args)) => {
            let [arg] = args.as_slice() else {
                return Err(no_value(name));
            };
            let arg = eval_inner(arg, binding)?;
            eval_function(name, arg).ok_or_else(|| no_value(name))
        },
        Expr::Add(terms) => {
            let mut sum = 0.0;
            for term in terms {
                sum += eval_inner(term, binding)?;
            }
            Ok(sum)
        },
        Expr::Mul(factors) => {
            let mut product = 1.0;
            for factor in factors {
                product *= eval_inner(factor, binding)?;
            }
            Ok(product)
        },
        Expr::Exp(base, exp) => {
            let lhs = eval_inner(base, binding)?;
            match exp.as_number() {
                Some(n) if is_integer(n) => match n.numer().to_i32() {
                    Some(n) => Ok(lhs.powi(n)),
                    None => Ok(lhs.powf(n.to_f64())),
                },
                _ => Ok(lhs.powf(eval_inner(exp, binding)?)),
            }
        },
    }
}

fn no_value(name: &str) -> Error {
    Error::new(Vec::new(), NoValue { name: name.to_owned() })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::primitive::rat;
    use super::*;

    #[test]
    fn evaluate_polynomial() {
        let x = Expr::symbol("x");
        let expr = x.clone().pow(Expr::integer(2)) + Expr::Mul(vec![Expr::integer(-3), x]);
        assert_float_absolute_eq!(eval(&expr, "x", 2.0).unwrap(), -2.0);
    }

    #[test]
    fn undefined_points_are_not_errors() {
        let expr = Expr::symbol("x").recip();
        assert!(eval(&expr, "x", 0.0).unwrap().is_infinite());

        let expr = Expr::symbol("x").sqrt();
        assert!(eval(&expr, "x", -1.0).unwrap().is_nan());

        let expr = Expr::call("log", vec![Expr::symbol("x")]);
        assert!(eval(&expr, "x", -1.0).unwrap().is_nan());
    }

    #[test]
    fn negative_base_integer_power() {
        let expr = Expr::symbol("x").pow(Expr::integer(3));
        assert_float_absolute_eq!(eval(&expr, "x", -2.0).unwrap(), -8.0);

        let expr = Expr::symbol("x").pow(Expr::number(rat((1, 3))));
        assert!(eval(&expr, "x", -8.0).unwrap().is_nan());
    }

    #[test]
    fn constants() {
        let expr = Expr::symbol("pi") + Expr::symbol("e");
        assert_float_absolute_eq!(eval_const(&expr).unwrap(), std::f64::consts::PI + std::f64::consts::E);
        assert!(eval_const(&Expr::symbol("x")).is_err());
    }
}
