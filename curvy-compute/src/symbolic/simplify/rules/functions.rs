//! Simplification rules for function calls at special values.

use crate::consts::E;
use crate::symbolic::{
    expr::Expr,
    simplify::{rules::do_call, step::Step},
    step_collector::StepCollector,
};

/// Evaluates functions whose value at a number is a simple rational.
///
/// `log(1) = 0`
/// `log(e) = 1`
/// `sin(0) = 0`
/// `cos(0) = 1`
/// `abs(-3) = 3`
pub fn evaluate_function(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, |name, args| {
        let arg = args.first()?;
        if name == "log" && arg.as_symbol() == Some(E) {
            return Some(Expr::integer(1));
        }

        let n = arg.as_number()?;
        match name {
            "log" if *n == 1 => Some(Expr::integer(0)),
            "sin" | "tan" | "asin" | "atan" if n.cmp0().is_eq() => Some(Expr::integer(0)),
            "cos" if n.cmp0().is_eq() => Some(Expr::integer(1)),
            "acos" if *n == 1 => Some(Expr::integer(0)),
            "abs" => Some(Expr::number(n.clone().abs())),
            _ => None,
        }
    })?;

    // keep the step collection logic outside of the closure
    step_collector.push(Step::EvaluateFunction);
    Some(opt)
}

/// `log(e^u) = u`
/// `log(e) = 1` is handled by [`evaluate_function`].
pub fn log_of_exp(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, |name, args| {
        if name != "log" {
            return None;
        }
        match args.first()? {
            Expr::Exp(base, exp) if base.as_symbol() == Some(E) => Some((**exp).clone()),
            _ => None,
        }
    })?;

    step_collector.push(Step::LogOfExp);
    Some(opt)
}

/// Applies all function rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    evaluate_function(expr, step_collector)
        .or_else(|| log_of_exp(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use crate::primitive::rat;
    use super::*;

    #[test]
    fn special_values() {
        let zero = Expr::integer(0);
        assert_eq!(evaluate_function(&Expr::call("cos", vec![zero.clone()]), &mut ()), Some(Expr::integer(1)));
        assert_eq!(evaluate_function(&Expr::call("sin", vec![zero]), &mut ()), Some(Expr::integer(0)));
        assert_eq!(
            evaluate_function(&Expr::call("abs", vec![Expr::number(rat((-3, 4)))]), &mut ()),
            Some(Expr::number(rat((3, 4)))),
        );
        assert_eq!(evaluate_function(&Expr::call("sin", vec![Expr::integer(1)]), &mut ()), None);
    }
}
