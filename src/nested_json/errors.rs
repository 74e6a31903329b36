//! # Nested JSON Errors
//!
//! Syntax, type and value errors raised while parsing or interpreting a
//! nested JSON path. Every error remembers the path it came from so it can
//! point at the offending part of it.

use super::tokens::{Token, HIGHLIGHTER};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Type,
    Value,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Syntax => "Syntax",
            ErrorKind::Type => "Type",
            ErrorKind::Value => "Value",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestedJsonError {
    input: String,
    token: Option<Token>,
    message: String,
    kind: ErrorKind,
}

impl NestedJsonError {
    pub fn new(
        input: impl Into<String>,
        token: Option<Token>,
        message: impl Into<String>,
        kind: ErrorKind,
    ) -> Self {
        Self {
            input: input.into(),
            token,
            message: message.into(),
            kind,
        }
    }

    pub fn syntax(input: &str, token: Option<Token>, message: impl Into<String>) -> Self {
        Self::new(input, token, message, ErrorKind::Syntax)
    }

    pub fn type_error(input: &str, token: Option<Token>, message: impl Into<String>) -> Self {
        Self::new(input, token, message, ErrorKind::Type)
    }

    pub fn value(input: &str, token: Option<Token>, message: impl Into<String>) -> Self {
        Self::new(input, token, message, ErrorKind::Value)
    }

    /// The path source the error refers to
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Message, followed by the source and a caret line under the token
    fn render(&self) -> String {
        let mut lines = vec![format!("{} Error: {}", self.kind, self.message)];
        if let Some(token) = &self.token {
            lines.push(self.input.clone());
            lines.push(self.highlight(token));
        }
        lines.join("\n")
    }

    // Offsets are bytes but the terminal shows characters, so count chars.
    // The end-of-input marker may sit past the end of the source.
    fn highlight(&self, token: &Token) -> String {
        let width_of = |from: usize, to: usize| {
            let clamped_from = from.min(self.input.len());
            let clamped_to = to.min(self.input.len());
            self.input
                .get(clamped_from..clamped_to)
                .map(|s| s.chars().count())
                .unwrap_or(clamped_to.saturating_sub(clamped_from))
                + to.saturating_sub(clamped_to.max(from))
        };

        let padding = width_of(0, token.start);
        let width = width_of(token.start, token.end).max(1);
        format!(
            "{}{}",
            " ".repeat(padding),
            HIGHLIGHTER.to_string().repeat(width)
        )
    }
}

impl fmt::Display for NestedJsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::error::Error for NestedJsonError {}
