//! Equation compiler.
//!
//! Turns an equation string into a verified postfix [`Program`] in three
//! stages: policy screening, tokenizing, and shunting-yard conversion.
//!
//! # Usage
//!
//! ```
//! use bitviz::parser::compile;
//!
//! let program = compile("x ^ (x << 13)").unwrap();
//! assert_eq!(program.to_string(), "x x 13 << ^");
//! assert_eq!(program.eval(1), 8193);
//! ```

mod lexer;
mod shunting;

pub use lexer::tokenize;
pub use shunting::to_postfix;

use tracing::trace;

use crate::error::{Result, VizError};
use crate::types::Program;

/// Compile an equation into an executable program.
pub fn compile(equation: &str) -> Result<Program> {
    check_policy(equation)?;

    let tokens = tokenize(equation)?;
    let postfix = to_postfix(&tokens)?;
    let program = Program::new(postfix)?;

    trace!(equation, program = %program, "compiled equation");
    Ok(program)
}

/// Reject division, modulo and floating point outright.
fn check_policy(equation: &str) -> Result<()> {
    if equation.contains(&['/', '%'][..]) {
        return Err(VizError::Policy {
            message: "Division (/) and Modulo (%) are forbidden.".to_string(),
        });
    }
    if equation.contains('.') {
        return Err(VizError::Policy {
            message: "Floating points are forbidden.".to_string(),
        });
    }
    Ok(())
}
