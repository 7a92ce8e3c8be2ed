//! Compiled postfix programs and their evaluator.

use std::fmt;

use crate::error::{Result, VizError};

use super::token::Token;

/// Deepest value stack a program may need.
pub const MAX_STACK_DEPTH: usize = 64;

/// A verified postfix (RPN) program.
///
/// Construction checks that evaluation can never underflow the value stack
/// and always leaves exactly one value, so [`Program::eval`] is infallible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    tokens: Vec<Token>,
}

impl Program {
    /// Build a program from tokens already in postfix order.
    pub fn new(tokens: Vec<Token>) -> Result<Self> {
        let mut depth = 0usize;

        for token in &tokens {
            match token {
                Token::Number(_) | Token::Variable => {
                    depth += 1;
                    if depth > MAX_STACK_DEPTH {
                        return Err(VizError::Syntax {
                            message: "Equation is nested too deeply".to_string(),
                            help: Some(format!(
                                "At most {} pending operands are supported",
                                MAX_STACK_DEPTH
                            )),
                        });
                    }
                }
                Token::Operator(op) if op.is_unary() => {
                    if depth < 1 {
                        return Err(missing_operand(&op.to_string()));
                    }
                }
                Token::Operator(op) => {
                    if depth < 2 {
                        return Err(missing_operand(&op.to_string()));
                    }
                    depth -= 1;
                }
                Token::LeftParen | Token::RightParen => {
                    return Err(VizError::internal(format!(
                        "unexpected token '{}' in compiled program",
                        token
                    )));
                }
            }
        }

        match depth {
            1 => Ok(Self { tokens }),
            0 => Err(VizError::syntax("Empty or invalid equation")),
            n => Err(VizError::Syntax {
                message: format!("Equation leaves {} values instead of one", n),
                help: Some("Operands must be joined by operators, e.g. x ^ 13".to_string()),
            }),
        }
    }

    /// The postfix token sequence.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Evaluate the program with `x` bound to the feedback value.
    pub fn eval(&self, x: u32) -> u32 {
        let mut stack = [0u32; MAX_STACK_DEPTH];
        let mut len = 0usize;

        for token in &self.tokens {
            match *token {
                Token::Number(n) => {
                    stack[len] = n;
                    len += 1;
                }
                Token::Variable => {
                    stack[len] = x;
                    len += 1;
                }
                Token::Operator(op) if op.is_unary() => {
                    stack[len - 1] = op.apply(stack[len - 1], 0);
                }
                Token::Operator(op) => {
                    let b = stack[len - 1];
                    let a = stack[len - 2];
                    len -= 1;
                    stack[len - 1] = op.apply(a, b);
                }
                // Rejected by `Program::new`.
                Token::LeftParen | Token::RightParen => {}
            }
        }

        debug_assert_eq!(len, 1);
        stack[0]
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

fn missing_operand(op: &str) -> VizError {
    VizError::Syntax {
        message: format!("Operator '{}' is missing an operand", op),
        help: Some("Every binary operator needs a value on both sides".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::token::Op;

    fn program(tokens: Vec<Token>) -> Program {
        Program::new(tokens).unwrap()
    }

    #[test]
    fn test_eval_counter() {
        let p = program(vec![Token::Variable, Token::Number(1), Token::Operator(Op::Add)]);
        assert_eq!(p.eval(0), 1);
        assert_eq!(p.eval(u32::MAX), 0);
    }

    #[test]
    fn test_operand_order() {
        // x 3 - is x - 3, not 3 - x
        let p = program(vec![Token::Variable, Token::Number(3), Token::Operator(Op::Sub)]);
        assert_eq!(p.eval(10), 7);

        let p = program(vec![Token::Variable, Token::Number(4), Token::Operator(Op::Shl)]);
        assert_eq!(p.eval(1), 16);
    }

    #[test]
    fn test_unary_complement() {
        let p = program(vec![Token::Variable, Token::Operator(Op::Not)]);
        assert_eq!(p.eval(0), 0xFFFF_FFFF);
    }

    #[test]
    fn test_truncating_multiply() {
        let p = program(vec![
            Token::Variable,
            Token::Number(1664525),
            Token::Operator(Op::Mul),
            Token::Number(1013904223),
            Token::Operator(Op::Add),
        ]);
        assert_eq!(p.eval(0), 1013904223);
        assert_eq!(
            p.eval(1013904223),
            1013904223u32.wrapping_mul(1664525).wrapping_add(1013904223)
        );
    }

    #[test]
    fn test_rejects_dangling_operator() {
        let err = Program::new(vec![Token::Variable, Token::Operator(Op::Add)]).unwrap_err();
        assert!(matches!(err, VizError::Syntax { .. }));
    }

    #[test]
    fn test_rejects_extra_operand() {
        let err = Program::new(vec![Token::Variable, Token::Variable]).unwrap_err();
        assert!(err.to_string().contains("2 values"));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(Program::new(vec![]).is_err());
    }

    #[test]
    fn test_parenthesis_is_internal_error() {
        let err = Program::new(vec![Token::LeftParen, Token::Variable]).unwrap_err();
        assert!(matches!(err, VizError::Internal { .. }));
    }

    #[test]
    fn test_rejects_excessive_depth() {
        let tokens = vec![Token::Variable; MAX_STACK_DEPTH + 1];
        assert!(Program::new(tokens).is_err());
    }

    #[test]
    fn test_display() {
        let p = program(vec![
            Token::Variable,
            Token::Variable,
            Token::Number(13),
            Token::Operator(Op::Shl),
            Token::Operator(Op::Xor),
        ]);
        assert_eq!(p.to_string(), "x x 13 << ^");
    }
}
