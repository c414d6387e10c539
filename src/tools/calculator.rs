// ABOUTME: CalculatorTool - safe arithmetic evaluation over a closed grammar.
// ABOUTME: Only literals, + - * / % **, unary sign, and parentheses evaluate.

use async_trait::async_trait;

use crate::tool::Tool;

/// Why an expression failed to evaluate.
#[derive(Debug, thiserror::Error)]
enum CalcError {
    #[error("unsupported expression at '{0}'")]
    Unsupported(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number literal '{0}'")]
    BadNumber(String),

    #[error("expression is nested too deeply")]
    TooDeep,

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("result is not a finite number")]
    NotFinite,
}

/// Recursive-descent evaluator.
///
/// The grammar is intentionally closed: anything outside it (names,
/// calls, comparisons, stray characters) is rejected rather than
/// coerced, so the model can never execute arbitrary code through this
/// tool.
struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

/// Cap on recursive parser depth. Nesting past this is rejected so a
/// hostile expression cannot overflow the stack.
const MAX_DEPTH: usize = 200;

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    /// A short snippet of the remaining input, for error messages.
    fn remainder(&self) -> String {
        self.chars[self.pos..].iter().take(12).collect()
    }

    // expr := term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<f64, CalcError> {
        self.enter()?;
        let value = self.parse_expr_inner();
        self.depth -= 1;
        value
    }

    fn parse_expr_inner(&mut self) -> Result<f64, CalcError> {
        let mut value = self.parse_term()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('+') => {
                    self.bump();
                    value += self.parse_term()?;
                }
                Some('-') => {
                    self.bump();
                    value -= self.parse_term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    // term := unary (('*' | '/' | '%') unary)*
    fn parse_term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.parse_unary()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('*') => {
                    self.bump();
                    value *= self.parse_unary()?;
                }
                Some('/') => {
                    self.bump();
                    let divisor = self.parse_unary()?;
                    if divisor == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= divisor;
                }
                Some('%') => {
                    self.bump();
                    let divisor = self.parse_unary()?;
                    if divisor == 0.0 {
                        return Err(CalcError::ModuloByZero);
                    }
                    // Floored modulo (sign follows the divisor), not
                    // Rust's remainder: -7 % 3 is 2.
                    value = ((value % divisor) + divisor) % divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    // unary := ('+' | '-') unary | power
    //
    // Unary minus binds looser than '**': -2**2 is -(2**2).
    fn parse_unary(&mut self) -> Result<f64, CalcError> {
        self.enter()?;
        let value = self.parse_unary_inner();
        self.depth -= 1;
        value
    }

    fn parse_unary_inner(&mut self) -> Result<f64, CalcError> {
        self.skip_whitespace();
        match self.peek() {
            Some('+') => {
                self.bump();
                self.parse_unary()
            }
            Some('-') => {
                self.bump();
                Ok(-self.parse_unary()?)
            }
            _ => self.parse_power(),
        }
    }

    // power := primary ('**' unary)?   (right-associative)
    fn parse_power(&mut self) -> Result<f64, CalcError> {
        let base = self.parse_primary()?;
        self.skip_whitespace();
        if self.peek() == Some('*') && self.peek_at(1) == Some('*') {
            self.bump();
            self.bump();
            let exponent = self.parse_unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    // primary := number | '(' expr ')'
    fn parse_primary(&mut self) -> Result<f64, CalcError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(CalcError::UnexpectedEnd),
            Some('(') => {
                self.bump();
                let value = self.parse_expr()?;
                self.skip_whitespace();
                if self.bump() != Some(')') {
                    return Err(CalcError::Unsupported(self.remainder()));
                }
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(_) => Err(CalcError::Unsupported(self.remainder())),
        }
    }

    fn parse_number(&mut self) -> Result<f64, CalcError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }

        // Optional exponent, e.g. 2e3 or 1.5E-2.
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let after_sign = match self.peek_at(1) {
                Some('+') | Some('-') => 2,
                _ => 1,
            };
            if self.peek_at(after_sign).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += after_sign;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }

        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse::<f64>()
            .map_err(|_| CalcError::BadNumber(literal))
    }
}

fn evaluate(expr: &str) -> Result<f64, CalcError> {
    let mut parser = Parser::new(expr);
    let value = parser.parse_expr()?;
    parser.skip_whitespace();
    if parser.peek().is_some() {
        return Err(CalcError::Unsupported(parser.remainder()));
    }
    if !value.is_finite() {
        return Err(CalcError::NotFinite);
    }
    Ok(value)
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Evaluate an arithmetic expression, returning a decimal string on
/// success and a descriptive error string on failure. Never fails
/// across this boundary.
pub fn calculate(expr: &str) -> String {
    match evaluate(expr) {
        Ok(value) => format_number(value),
        Err(e) => format!("Error evaluating expression: {}", e),
    }
}

/// Tool for safe arithmetic calculations.
#[derive(Default)]
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Performs safe arithmetic calculations."
    }

    async fn invoke(&self, input: &str) -> Result<String, anyhow::Error> {
        Ok(calculate(input))
    }
}
