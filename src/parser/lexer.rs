//! Equation tokenizer.
//!
//! Whitespace is ignored. Validation runs in two stages before scanning:
//! hex letters must belong to a `0x` literal, and every remaining character
//! must come from the allowed set.

use crate::error::{Result, VizError};
use crate::types::{Op, Token};

const ALLOWED_HELP: &str =
    "Only these are allowed: 0-9, x, +, -, *, ^, &, |, ~, <<, >>, (, ), ROL, ROR";

/// Split an equation into tokens.
pub fn tokenize(equation: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = equation.chars().filter(|c| !c.is_whitespace()).collect();

    check_orphan_hex(&chars)?;
    check_charset(&chars)?;

    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if let Some(op) = rotate_keyword(&chars, pos) {
            tokens.push(Token::Operator(op));
            pos += 3;
            continue;
        }

        if let Some(end) = hex_literal_end(&chars, pos) {
            let digits: String = chars[pos + 2..end].iter().collect();
            tokens.push(Token::Number(parse_literal(&digits, 16, &chars[pos..end])?));
            pos = end;
            continue;
        }

        let c = chars[pos];

        if c.is_ascii_digit() {
            let end = pos + chars[pos..].iter().take_while(|c| c.is_ascii_digit()).count();
            let digits: String = chars[pos..end].iter().collect();
            tokens.push(Token::Number(parse_literal(&digits, 10, &chars[pos..end])?));
            pos = end;
            continue;
        }

        let next = chars.get(pos + 1).copied();
        match (c, next) {
            ('<', Some('<')) => {
                tokens.push(Token::Operator(Op::Shl));
                pos += 2;
                continue;
            }
            ('>', Some('>')) => {
                tokens.push(Token::Operator(Op::Shr));
                pos += 2;
                continue;
            }
            _ => {}
        }

        match c {
            '(' => tokens.push(Token::LeftParen),
            ')' => tokens.push(Token::RightParen),
            'x' => tokens.push(Token::Variable),
            // Argument separators carry no meaning
            ',' => {}
            _ => {
                if let Some(op) = Op::from_symbol(&c.to_string()) {
                    tokens.push(Token::Operator(op));
                }
                // Anything else (a lone '<', leftover letters) is skipped
            }
        }
        pos += 1;
    }

    if tokens.is_empty() {
        return Err(VizError::Syntax {
            message: "Empty or invalid equation".to_string(),
            help: Some("Try an equation such as: x ^ (x << 13)".to_string()),
        });
    }

    Ok(tokens)
}

/// Reject hex letters that are not part of a `0x` literal.
fn check_orphan_hex(chars: &[char]) -> Result<()> {
    let mut remaining = Vec::with_capacity(chars.len());
    let mut pos = 0;
    while pos < chars.len() {
        if let Some(end) = hex_literal_end(chars, pos) {
            pos = end;
        } else {
            remaining.push(chars[pos]);
            pos += 1;
        }
    }

    let mut invalid: Vec<String> = Vec::new();
    let mut run = String::new();
    for c in remaining.into_iter().chain(std::iter::once(' ')) {
        if c.is_ascii_hexdigit() && c.is_ascii_alphabetic() {
            run.push(c);
            continue;
        }
        if !run.is_empty() {
            if !is_exempt_letter_run(&run) && !invalid.contains(&run) {
                invalid.push(run.clone());
            }
            run.clear();
        }
    }

    if invalid.is_empty() {
        return Ok(());
    }

    Err(VizError::Lexical {
        message: format!("Invalid hex notation: {}", invalid.join(", ")),
        help: Some("Hex numbers must use 0x prefix (e.g., 0xFF not FF)".to_string()),
    })
}

/// Letter runs tolerated outside hex literals.
///
/// The single letters `r`, `o` and `l` are accepted for compatibility with
/// equations written against earlier releases.
fn is_exempt_letter_run(run: &str) -> bool {
    let lower = run.to_lowercase();
    matches!(lower.as_str(), "x" | "rol" | "ror" | "r" | "o" | "l")
}

/// Reject characters outside the allowed set.
fn check_charset(chars: &[char]) -> Result<()> {
    let mut invalid: Vec<char> = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        if rotate_keyword(chars, pos).is_some() {
            pos += 3;
            continue;
        }
        let c = chars[pos];
        if !is_allowed(c) && !invalid.contains(&c) {
            invalid.push(c);
        }
        pos += 1;
    }

    if invalid.is_empty() {
        return Ok(());
    }

    let listed: Vec<String> = invalid.iter().map(|c| c.to_string()).collect();
    Err(VizError::Lexical {
        message: format!("Invalid characters in equation: {}", listed.join(", ")),
        help: Some(ALLOWED_HELP.to_string()),
    })
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_hexdigit()
        || matches!(c, 'x' | '+' | '-' | '*' | '^' | '&' | '|' | '~' | '(' | ')' | '<' | '>' | ',')
}

/// `ROL`/`ROR` in any letter case starting at `pos`.
fn rotate_keyword(chars: &[char], pos: usize) -> Option<Op> {
    let word: String = chars.get(pos..pos + 3)?.iter().collect::<String>().to_uppercase();
    match word.as_str() {
        "ROL" => Some(Op::Rol),
        "ROR" => Some(Op::Ror),
        _ => None,
    }
}

/// End index of a `0x` hex literal starting at `pos`, if there is one.
fn hex_literal_end(chars: &[char], pos: usize) -> Option<usize> {
    if chars.get(pos) != Some(&'0') || chars.get(pos + 1) != Some(&'x') {
        return None;
    }
    let digits = chars[pos + 2..].iter().take_while(|c| c.is_ascii_hexdigit()).count();
    (digits > 0).then_some(pos + 2 + digits)
}

fn parse_literal(digits: &str, radix: u32, source: &[char]) -> Result<u32> {
    u32::from_str_radix(digits, radix).map_err(|_| VizError::Lexical {
        message: format!(
            "Number out of range: {}",
            source.iter().collect::<String>()
        ),
        help: Some("Literals must fit in 32 bits (at most 4294967295 or 0xFFFFFFFF)".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_xorshift_step() {
        let tokens = tokenize("x ^ (x << 13)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Variable,
                Token::Operator(Op::Xor),
                Token::LeftParen,
                Token::Variable,
                Token::Operator(Op::Shl),
                Token::Number(13),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_hex_literal() {
        let tokens = tokenize("x & 0xFF").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Variable, Token::Operator(Op::And), Token::Number(255)]
        );
    }

    #[test]
    fn test_tokenize_rotate_case_insensitive() {
        let tokens = tokenize("x rol 3 ROR 1").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Variable,
                Token::Operator(Op::Rol),
                Token::Number(3),
                Token::Operator(Op::Ror),
                Token::Number(1),
            ]
        );
    }

    #[test]
    fn test_tokenize_all_operators() {
        let tokens = tokenize("~x+x-x*x&x|x^x<<x>>x").unwrap();
        let ops: Vec<Op> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Operator(op) => Some(*op),
                _ => None,
            })
            .collect();
        assert_eq!(
            ops,
            vec![Op::Not, Op::Add, Op::Sub, Op::Mul, Op::And, Op::Or, Op::Xor, Op::Shl, Op::Shr]
        );
    }

    #[test]
    fn test_commas_are_discarded() {
        assert_eq!(tokenize("x,1").unwrap(), vec![Token::Variable, Token::Number(1)]);
    }

    #[test]
    fn test_whitespace_inside_numbers_is_stripped() {
        assert_eq!(tokenize("1 2").unwrap(), vec![Token::Number(12)]);
    }

    #[test]
    fn test_orphan_hex_rejected() {
        let err = tokenize("x ^ FF").unwrap_err();
        match err {
            VizError::Lexical { message, help } => {
                assert_eq!(message, "Invalid hex notation: FF");
                assert!(help.unwrap().contains("0x prefix"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_orphan_hex_lists_distinct_runs() {
        let err = tokenize("a + bad + a").unwrap_err();
        assert_eq!(err.to_string(), "Lexical error: Invalid hex notation: a, bad");
    }

    #[test]
    fn test_invalid_characters_named() {
        let err = tokenize("x $ 3 # $").unwrap_err();
        assert_eq!(err.to_string(), "Lexical error: Invalid characters in equation: $, #");
    }

    #[test]
    fn test_uppercase_variable_rejected() {
        assert!(tokenize("X + 1").is_err());
    }

    #[test]
    fn test_uppercase_hex_prefix_rejected() {
        let err = tokenize("x ^ 0XFF").unwrap_err();
        assert_eq!(err.to_string(), "Lexical error: Invalid hex notation: FF");
    }

    #[test]
    fn test_empty_equation() {
        assert!(matches!(tokenize("   "), Err(VizError::Syntax { .. })));
        assert!(matches!(tokenize(",,"), Err(VizError::Syntax { .. })));
    }

    #[test]
    fn test_literal_overflow() {
        assert!(tokenize("x + 4294967295").is_ok());
        assert!(matches!(tokenize("x + 4294967296"), Err(VizError::Lexical { .. })));
        assert!(matches!(tokenize("x ^ 0x100000000"), Err(VizError::Lexical { .. })));
    }
}
