//! Symbolic derivatives of the supported functions.

use crate::consts::E;
use crate::primitive::rat;
use crate::symbolic::{error::Underivable, Expr};

use super::{derivative, MultBuilder};

/// `1 - u^2`
fn one_minus_square(u: &Expr) -> Expr {
    Expr::integer(1) + -(u.clone().pow(Expr::integer(2)))
}

/// Computes the derivative of a supported function and applies the chain rule.
pub(super) fn function_derivative(func: &str, args: &[Expr], with: &str) -> Result<Expr, Underivable> {
    let [u] = args else {
        return Err(Underivable { expr: Expr::call(func, args.to_vec()).to_string() });
    };

    let mut mult_group = MultBuilder::default();
    match func {
        "sqrt" => return derivative(&u.clone().sqrt(), with),
        "exp" => return derivative(&Expr::symbol(E).pow(u.clone()), with),
        "sin" => {
            mult_group.mult(Expr::call("cos", vec![u.clone()]));
        },
        "cos" => {
            mult_group.mult(Expr::integer(-1));
            mult_group.mult(Expr::call("sin", vec![u.clone()]));
        },
        "tan" => {
            mult_group.mult(Expr::call("cos", vec![u.clone()]).pow(Expr::integer(-2)));
        },
        "asin" => {
            mult_group.mult(one_minus_square(u).pow(Expr::number(rat((-1, 2)))));
        },
        "acos" => {
            mult_group.mult(Expr::integer(-1));
            mult_group.mult(one_minus_square(u).pow(Expr::number(rat((-1, 2)))));
        },
        "atan" => {
            mult_group.mult((Expr::integer(1) + u.clone().pow(Expr::integer(2))).recip());
        },
        "log" | "ln" => {
            mult_group.mult(u.clone().recip());
        },
        "abs" => {
            // d/du |u| = u / |u|, undefined at u = 0
            mult_group.mult(u.clone());
            mult_group.mult(Expr::call("abs", vec![u.clone()]).recip());
        },
        _ => return Err(Underivable { expr: Expr::call(func, args.to_vec()).to_string() }),
    };

    mult_group.mult(derivative(u, with)?);
    Ok(mult_group.into())
}
