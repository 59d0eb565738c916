use crate::{
    consts::{CONSTANTS, E, FUNCTIONS},
    primitive::{int_from_str, is_zero, rat, rational_from_decimal},
    symbolic::error::{InvalidNumber, UnknownFunction, UnknownSymbol, WrongArgumentCount},
};
use curvy_error::Error;
use curvy_parser::parser::{
    ast::{call::Call, expr::Expr as AstExpr, literal::Literal},
    token::op::{BinOpKind, UnaryOpKind},
};
use levenshtein::levenshtein;
use rug::Rational;
use super::Expr;

impl Expr {
    /// Converts a parsed expression into an [`Expr`] in the given variable.
    ///
    /// Every problem in the expression is reported, not just the first: unknown symbols, unknown
    /// functions, and calls with the wrong number of arguments. The only names allowed are
    /// `variable` and the constants `pi` and `e`.
    ///
    /// Some functions are rewritten into powers so that later stages have fewer cases to handle:
    /// `sqrt(u)` becomes `u^(1/2)`, `exp(u)` becomes `e^u`, and `ln` becomes `log`.
    pub fn from_ast(expr: &AstExpr, variable: &str) -> Result<Self, Vec<Error>> {
        let mut errors = Vec::new();
        let expr = Converter { variable, errors: &mut errors }.convert(expr);
        if errors.is_empty() {
            Ok(expr)
        } else {
            Err(errors)
        }
    }
}

/// Walks an AST, accumulating errors instead of stopping at the first one.
struct Converter<'a> {
    variable: &'a str,
    errors: &'a mut Vec<Error>,
}

impl Converter<'_> {
    fn convert(&mut self, expr: &AstExpr) -> Expr {
        match expr {
            AstExpr::Literal(Literal::Integer(int)) => match int_from_str(&int.value) {
                Some(n) => Expr::number(Rational::from(n)),
                None => self.invalid_number(&int.value, int.span.clone()),
            },
            AstExpr::Literal(Literal::Float(float)) => match rational_from_decimal(&float.value) {
                Some(n) => Expr::number(n),
                None => self.invalid_number(&float.value, float.span.clone()),
            },
            AstExpr::Literal(Literal::Symbol(sym)) => {
                if sym.name == self.variable || CONSTANTS.contains(&sym.name.as_str()) {
                    Expr::symbol(&sym.name)
                } else {
                    let suggestion = std::iter::once(self.variable)
                        .chain(CONSTANTS)
                        .find(|candidate| levenshtein(candidate, &sym.name) < 2)
                        .map(str::to_owned);
                    self.errors.push(Error::new(vec![sym.span.clone()], UnknownSymbol {
                        name: sym.name.clone(),
                        suggestion,
                        variable: self.variable.to_owned(),
                    }));
                    Expr::integer(0)
                }
            },
            AstExpr::Paren(paren) => self.convert(paren.innermost()),
            AstExpr::Call(call) => self.convert_call(call),
            AstExpr::Unary(unary) => {
                let operand = self.convert(&unary.operand);
                match unary.op.kind {
                    UnaryOpKind::Neg => -operand,
                    UnaryOpKind::Pos => operand,
                }
            },
            AstExpr::Binary(bin) => {
                let lhs = self.convert(&bin.lhs);
                let rhs = self.convert(&bin.rhs);
                match bin.op.kind {
                    BinOpKind::Exp => lhs.pow(rhs),
                    BinOpKind::Mul => lhs * rhs,
                    BinOpKind::Div => match rhs.as_number() {
                        // dividing by a non-zero number is multiplying by its reciprocal
                        Some(n) if !is_zero(n) => lhs * Expr::number(rat(1) / n),
                        _ => lhs * rhs.recip(),
                    },
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                }
            },
        }
    }

    fn convert_call(&mut self, call: &Call) -> Expr {
        let name = call.name.name.as_str();
        let args = call.args.iter().map(|arg| self.convert(arg)).collect::<Vec<_>>();

        let Some(&expected) = FUNCTIONS.get(name) else {
            let mut suggestions = FUNCTIONS.keys()
                .filter(|candidate| levenshtein(candidate, name) < 2)
                .map(|candidate| candidate.to_string())
                .collect::<Vec<_>>();
            suggestions.sort();
            self.errors.push(Error::new(call.outer_span().to_vec(), UnknownFunction {
                name: name.to_owned(),
                suggestions,
            }));
            return Expr::integer(0);
        };

        if args.len() != expected {
            self.errors.push(Error::new(call.outer_span().to_vec(), WrongArgumentCount {
                name: name.to_owned(),
                expected,
                given: args.len(),
            }));
            return Expr::integer(0);
        }

        let mut args = args;
        match name {
            "sqrt" => args.remove(0).sqrt(),
            "exp" => Expr::symbol(E).pow(args.remove(0)),
            "ln" => Expr::call("log", args),
            _ => Expr::call(name, args),
        }
    }

    fn invalid_number(&mut self, literal: &str, span: std::ops::Range<usize>) -> Expr {
        self.errors.push(Error::new(vec![span], InvalidNumber { literal: literal.to_owned() }));
        Expr::integer(0)
    }
}

#[cfg(test)]
mod tests {
    use curvy_parser::parser::Parser;
    use pretty_assertions::assert_eq;
    use super::*;

    fn convert(input: &str) -> Result<Expr, Vec<Error>> {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Expr::from_ast(&ast, "x")
    }

    #[test]
    fn lowers_sqrt_and_exp() {
        let expr = convert("sqrt(x) + exp(x) + ln(x)").unwrap();

        assert_eq!(expr, Expr::Add(vec![
            Expr::symbol("x").sqrt(),
            Expr::symbol("e").pow(Expr::symbol("x")),
            Expr::call("log", vec![Expr::symbol("x")]),
        ]));
    }

    #[test]
    fn division_by_number_is_exact() {
        let expr = convert("x / 4").unwrap();
        assert_eq!(expr, Expr::Mul(vec![Expr::symbol("x"), Expr::number(rat((1, 4)))]));
    }

    #[test]
    fn unknown_symbol_with_suggestion() {
        let errors = convert("y + 1").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].spans, vec![0..1]);

        let kind = errors[0].downcast_ref::<UnknownSymbol>().unwrap();
        assert_eq!(kind.name, "y");
        assert_eq!(kind.suggestion.as_deref(), Some("x"));
    }

    #[test]
    fn every_problem_is_reported() {
        let errors = convert("foo + sinn(x) + cos(x, x)").unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].is::<UnknownSymbol>());

        let unknown = errors[1].downcast_ref::<UnknownFunction>().unwrap();
        assert_eq!(unknown.suggestions, vec!["sin".to_string()]);

        let count = errors[2].downcast_ref::<WrongArgumentCount>().unwrap();
        assert_eq!((count.expected, count.given), (1, 2));
    }

    #[test]
    fn other_variable_names() {
        let ast = Parser::new("t^2 - pi").try_parse_full::<AstExpr>().unwrap();
        assert!(Expr::from_ast(&ast, "t").is_ok());
        assert!(Expr::from_ast(&ast, "x").is_err());
    }
}
