/// The evaluator module computes the value of each statement.
///
/// The evaluator consumes tokens one at a time and reduces them with an
/// operand stack and an operator stack, without building a syntax tree.
///
/// # Responsibilities
/// - Resolves operator precedence and parenthesis nesting.
/// - Promotes mixed integer and float operands.
/// - Reports syntax errors, unsupported constructs, and arithmetic failures.
pub mod evaluator;
/// The lexer module tokenizes source text for the evaluator.
///
/// The lexer reads the text under a cursor and produces one classified token
/// per call: literals, operators, parentheses, statement terminators, names,
/// and strings.
///
/// # Responsibilities
/// - Skips whitespace and classifies the next token.
/// - Keeps a leading `-` on numeric literals.
/// - Reports lexical errors for invalid input.
pub mod lexer;
/// The value module defines the numbers a statement evaluates to.
pub mod value;
