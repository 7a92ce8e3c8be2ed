//! Infix to postfix conversion (shunting-yard).

use crate::error::{Result, VizError};
use crate::types::Token;

/// Convert infix tokens to postfix order.
///
/// Binary operators are left-associative: an incoming operator first pops
/// every stacked operator of greater or equal precedence. The unary `~` is
/// pushed without popping since it has no left operand.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for &token in tokens {
        match token {
            Token::Number(_) | Token::Variable => output.push(token),

            Token::Operator(op) if op.is_unary() => stack.push(token),

            Token::Operator(op) => {
                while let Some(&Token::Operator(top)) = stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(Token::Operator(top));
                    stack.pop();
                }
                stack.push(token);
            }

            Token::LeftParen => stack.push(token),

            Token::RightParen => loop {
                match stack.pop() {
                    Some(Token::LeftParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(mismatched()),
                }
            },
        }
    }

    while let Some(token) = stack.pop() {
        if token == Token::LeftParen {
            return Err(mismatched());
        }
        output.push(token);
    }

    Ok(output)
}

fn mismatched() -> VizError {
    VizError::Syntax {
        message: "Mismatched parentheses".to_string(),
        help: Some("Check that every '(' has a matching ')'".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenize;

    fn rpn(equation: &str) -> String {
        let tokens = tokenize(equation).unwrap();
        to_postfix(&tokens)
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_precedence_mul_over_add() {
        insta::assert_snapshot!(rpn("x + 2 * 3"), @"x 2 3 * +");
    }

    #[test]
    fn test_shift_binds_looser_than_add() {
        insta::assert_snapshot!(rpn("x << 1 + 2"), @"x 1 2 + <<");
    }

    #[test]
    fn test_and_xor_or_ladder() {
        insta::assert_snapshot!(rpn("x | x ^ x & 1"), @"x x x 1 & ^ |");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(rpn("x - 1 - 2"), "x 1 - 2 -");
        assert_eq!(rpn("x << 1 >> 2"), "x 1 << 2 >>");
        assert_eq!(rpn("x ROL 3 ROR 1"), "x 3 ROL 1 ROR");
    }

    #[test]
    fn test_parentheses_override() {
        assert_eq!(rpn("x ^ (x << 13)"), "x x 13 << ^");
        assert_eq!(rpn("(x + 1) * 3"), "x 1 + 3 *");
    }

    #[test]
    fn test_unary_complement() {
        assert_eq!(rpn("~x & 0xFF"), "x ~ 255 &");
        assert_eq!(rpn("x + ~x"), "x x ~ +");
        assert_eq!(rpn("~~x"), "x ~ ~");
    }

    #[test]
    fn test_mismatched_closing() {
        let tokens = tokenize("x + 1)").unwrap();
        let err = to_postfix(&tokens).unwrap_err();
        assert_eq!(err.to_string(), "Syntax error: Mismatched parentheses");
    }

    #[test]
    fn test_mismatched_opening() {
        let tokens = tokenize("(x + 1").unwrap();
        assert!(to_postfix(&tokens).is_err());
    }
}
