//! Equation tokens and operators.

use std::fmt;

/// An operator in the equation language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    /// Unary bitwise complement `~`.
    Not,
    And,
    Or,
    Xor,
    Shl,
    /// Logical (unsigned) right shift.
    Shr,
    Rol,
    Ror,
}

impl Op {
    /// All operators, in display order.
    pub const ALL: [Op; 11] = [
        Op::Add,
        Op::Sub,
        Op::Mul,
        Op::Not,
        Op::And,
        Op::Or,
        Op::Xor,
        Op::Shl,
        Op::Shr,
        Op::Rol,
        Op::Ror,
    ];

    /// Look up an operator by its source symbol (`ROL`/`ROR` in upper case).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Source symbol of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Not => "~",
            Op::And => "&",
            Op::Or => "|",
            Op::Xor => "^",
            Op::Shl => "<<",
            Op::Shr => ">>",
            Op::Rol => "ROL",
            Op::Ror => "ROR",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Op::Not => 6,
            Op::Mul => 5,
            Op::Add | Op::Sub => 4,
            Op::Shl | Op::Shr | Op::Rol | Op::Ror => 3,
            Op::And => 2,
            Op::Xor => 1,
            Op::Or => 0,
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Op::Not)
    }

    /// Apply a binary operator with 32-bit wraparound semantics.
    ///
    /// Shift and rotate amounts are taken modulo 32. `Not` ignores `b`.
    pub fn apply(self, a: u32, b: u32) -> u32 {
        match self {
            Op::Add => a.wrapping_add(b),
            Op::Sub => a.wrapping_sub(b),
            Op::Mul => a.wrapping_mul(b),
            Op::Not => !a,
            Op::And => a & b,
            Op::Or => a | b,
            Op::Xor => a ^ b,
            Op::Shl => a << (b & 31),
            Op::Shr => a >> (b & 31),
            Op::Rol => a.rotate_left(b & 31),
            Op::Ror => a.rotate_right(b & 31),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single lexical token of an equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Integer literal (decimal or `0x` hex).
    Number(u32),
    /// The feedback variable `x`.
    Variable,
    Operator(Op),
    LeftParen,
    RightParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Variable => write!(f, "x"),
            Token::Operator(op) => write!(f, "{}", op),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}
