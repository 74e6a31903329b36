//! # Tokens and Path Segments
//!
//! Building blocks shared by the tokenizer, the path parser and the
//! interpreter.

use serde_json::Value;
use std::fmt;

pub const EMPTY_STRING: &str = "";
pub const HIGHLIGHTER: char = '^';
pub const OPEN_BRACKET: char = '[';
pub const CLOSE_BRACKET: char = ']';
pub const BACKSLASH: char = '\\';

/// Characters that lose their meaning when preceded by a backslash
pub const SPECIAL_CHARS: [char; 3] = [OPEN_BRACKET, CLOSE_BRACKET, BACKSLASH];

/// Kind of a lexical token in a nested JSON path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    Number,
    LeftBracket,
    RightBracket,
    /// Location-only marker used when reporting errors over a range of tokens
    Pseudo,
}

impl TokenKind {
    /// Human readable name used in "Expecting ..." messages
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Text => "a text",
            TokenKind::Number => "a number",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::Pseudo => "a pseudo",
        }
    }

    /// Map an operator character to its token kind
    pub fn from_operator(ch: char) -> Option<Self> {
        match ch {
            OPEN_BRACKET => Some(TokenKind::LeftBracket),
            CLOSE_BRACKET => Some(TokenKind::RightBracket),
            _ => None,
        }
    }

    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::Text | TokenKind::Number)
    }
}

/// A positioned token. `start` and `end` are byte offsets into the source,
/// `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            start,
            end,
        }
    }

    /// A token that only marks the `start..end` range of the source
    pub fn pseudo(start: usize, end: usize) -> Self {
        Self::new(TokenKind::Pseudo, EMPTY_STRING, start, end)
    }

    /// Integer value of a `Number` token
    pub fn as_number(&self) -> Option<i64> {
        match self.kind {
            TokenKind::Number => self.value.parse().ok(),
            _ => None,
        }
    }
}

/// One hop of an accessor chain
#[derive(Debug, Clone, PartialEq)]
pub enum PathAction {
    Key(String),
    Index(i64),
    Append,
    /// Terminal assignment, only ever appended by the interpreter
    Set(Value),
}

impl PathAction {
    pub fn name(&self) -> &'static str {
        match self {
            PathAction::Key(_) => "key",
            PathAction::Index(_) => "index",
            PathAction::Append => "append",
            PathAction::Set(_) => "set",
        }
    }
}

impl fmt::Display for PathAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed path segment together with the tokens it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub action: PathAction,
    pub tokens: Vec<Token>,
    pub is_root: bool,
}

impl Path {
    pub fn new(action: PathAction, tokens: Vec<Token>) -> Self {
        Self {
            action,
            tokens,
            is_root: false,
        }
    }

    pub fn root(action: PathAction, tokens: Vec<Token>) -> Self {
        Self {
            action,
            tokens,
            is_root: true,
        }
    }

    pub fn set(value: Value) -> Self {
        Self::new(PathAction::Set(value), Vec::new())
    }

    /// Render this segment back into path syntax
    pub fn reconstruct(&self) -> String {
        match &self.action {
            PathAction::Key(key) if self.is_root => key.clone(),
            PathAction::Key(key) => format!("{OPEN_BRACKET}{key}{CLOSE_BRACKET}"),
            PathAction::Index(index) => format!("{OPEN_BRACKET}{index}{CLOSE_BRACKET}"),
            PathAction::Append => format!("{OPEN_BRACKET}{CLOSE_BRACKET}"),
            PathAction::Set(_) => String::new(),
        }
    }
}

/// Join the reconstructed form of every segment
pub fn reconstruct_all<'a>(paths: impl IntoIterator<Item = &'a Path>) -> String {
    paths.into_iter().map(Path::reconstruct).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kind_should_describe_itself_for_messages() {
        assert_eq!(TokenKind::Text.name(), "a text");
        assert_eq!(TokenKind::Number.name(), "a number");
        assert_eq!(TokenKind::LeftBracket.name(), "'['");
        assert_eq!(TokenKind::RightBracket.name(), "']'");
    }

    #[test]
    fn token_should_expose_number_value_only_for_numbers() {
        assert_eq!(Token::new(TokenKind::Number, "42", 0, 2).as_number(), Some(42));
        assert_eq!(Token::new(TokenKind::Text, "42", 0, 2).as_number(), None);
    }

    #[test]
    fn path_should_reconstruct_root_key_without_brackets() {
        let root = Path::root(PathAction::Key("user".to_string()), Vec::new());
        let nested = Path::new(PathAction::Key("name".to_string()), Vec::new());
        assert_eq!(root.reconstruct(), "user");
        assert_eq!(nested.reconstruct(), "[name]");
    }

    #[test]
    fn path_should_reconstruct_index_and_append() {
        assert_eq!(Path::new(PathAction::Index(3), Vec::new()).reconstruct(), "[3]");
        assert_eq!(Path::root(PathAction::Index(0), Vec::new()).reconstruct(), "[0]");
        assert_eq!(Path::new(PathAction::Append, Vec::new()).reconstruct(), "[]");
        assert_eq!(Path::set(Value::Null).reconstruct(), "");
    }
}
