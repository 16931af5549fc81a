/// Statement and expression evaluation.
///
/// Holds the `Evaluator`, which pulls tokens on demand and reduces each
/// statement with an operand stack and an operator stack.
pub mod core;

/// Binary operator evaluation.
///
/// Implements the reduction rule: operator resolution, precedence ranks,
/// numeric promotion, and integer and float arithmetic.
pub mod binary;
