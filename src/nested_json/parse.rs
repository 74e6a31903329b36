//! # Path Tokenizer and Parser
//!
//! Turns a request item key such as `user[pets][0][name]` into a sequence
//! of positioned tokens and then into [`Path`] segments.

use super::errors::NestedJsonError;
use super::tokens::{
    Path, PathAction, Token, TokenKind, BACKSLASH, EMPTY_STRING, SPECIAL_CHARS,
};

/// Split a path into tokens.
///
/// A backslash in front of `[`, `]` or `\` turns that character into plain
/// text. Any other backslash is kept as is.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut buffer = TextBuffer::default();
    let mut chars = source.char_indices();

    while let Some((offset, ch)) = chars.next() {
        if let Some(kind) = TokenKind::from_operator(ch) {
            buffer.flush(offset, &mut tokens);
            tokens.push(Token::new(kind, ch, offset, offset + ch.len_utf8()));
            continue;
        }

        if ch == BACKSLASH {
            if let Some((_, next)) = chars.next() {
                if SPECIAL_CHARS.contains(&next) {
                    buffer.push_escaped(offset, next);
                } else {
                    buffer.push(offset, ch);
                    buffer.push(offset, next);
                }
                continue;
            }
        }

        buffer.push(offset, ch);
    }

    buffer.flush(source.len(), &mut tokens);
    tracing::trace!("Tokenized {:?} into {} tokens", source, tokens.len());
    tokens
}

/// Pending text between operators
#[derive(Debug, Default)]
struct TextBuffer {
    text: String,
    start: Option<usize>,
    escapes: usize,
}

impl TextBuffer {
    fn push(&mut self, offset: usize, ch: char) {
        self.start.get_or_insert(offset);
        self.text.push(ch);
    }

    fn push_escaped(&mut self, offset: usize, ch: char) {
        self.escapes += 1;
        self.push(offset, ch);
    }

    fn flush(&mut self, end: usize, tokens: &mut Vec<Token>) {
        let Some(start) = self.start.take() else {
            return;
        };
        let text = std::mem::take(&mut self.text);
        let escapes = std::mem::take(&mut self.escapes);
        let (kind, value) = classify(text, escapes);
        tokens.push(Token::new(kind, value, start, end));
    }
}

fn classify(text: String, escapes: usize) -> (TokenKind, String) {
    if escapes == 0 {
        if let Ok(number) = text.parse::<i64>() {
            return (TokenKind::Number, number.to_string());
        }
        // `\5` keeps `5` as a key instead of an index
        if let Some(digits) = text.strip_prefix(BACKSLASH) {
            if digits.parse::<i64>().is_ok() {
                return (TokenKind::Text, digits.to_string());
            }
        }
    }
    (TokenKind::Text, text)
}

/// Parse a nested JSON path into its segments.
///
/// An empty path yields a single root key with an empty name.
pub fn parse_path(source: &str) -> Result<Vec<Path>, NestedJsonError> {
    let mut parser = PathParser::new(source);
    let paths = parser.parse()?;
    tracing::debug!("Parsed path {:?} into {} segments", source, paths.len());
    Ok(paths)
}

struct PathParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    cursor: usize,
}

impl<'a> PathParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            cursor: 0,
        }
    }

    fn parse(&mut self) -> Result<Vec<Path>, NestedJsonError> {
        let mut paths = vec![self.parse_root()?];
        while self.can_advance() {
            paths.push(self.parse_hop()?);
        }
        Ok(paths)
    }

    fn can_advance(&self) -> bool {
        self.cursor < self.tokens.len()
    }

    /// Consume the next token, which must be one of `kinds`
    fn expect(&mut self, kinds: &[TokenKind]) -> Result<Token, NestedJsonError> {
        let token = match self.tokens.get(self.cursor) {
            Some(token) if kinds.contains(&token.kind) => {
                self.cursor += 1;
                return Ok(token.clone());
            }
            Some(token) => Some(token.clone()),
            None => self
                .tokens
                .last()
                .map(|last| Token::new(last.kind, last.value.clone(), last.end, last.end + 1)),
        };

        Err(NestedJsonError::syntax(
            self.source,
            token,
            format!("Expecting {}", describe_kinds(kinds)),
        ))
    }

    fn parse_root(&mut self) -> Result<Path, NestedJsonError> {
        if !self.can_advance() {
            return Ok(Path::root(
                PathAction::Key(EMPTY_STRING.to_string()),
                Vec::new(),
            ));
        }

        let token = self.expect(&[TokenKind::Text, TokenKind::Number, TokenKind::LeftBracket])?;
        if token.kind.is_literal() {
            let key = token.value.clone();
            return Ok(Path::root(PathAction::Key(key), vec![token]));
        }

        let mut tokens = vec![token];
        let token = self.expect(&[TokenKind::Number, TokenKind::RightBracket])?;
        let action = match token.as_number() {
            Some(index) => {
                tokens.push(token);
                tokens.push(self.expect(&[TokenKind::RightBracket])?);
                PathAction::Index(index)
            }
            None => {
                tokens.push(token);
                PathAction::Append
            }
        };
        Ok(Path::root(action, tokens))
    }

    fn parse_hop(&mut self) -> Result<Path, NestedJsonError> {
        let mut tokens = vec![self.expect(&[TokenKind::LeftBracket])?];
        let token = self.expect(&[
            TokenKind::Text,
            TokenKind::Number,
            TokenKind::RightBracket,
        ])?;

        let action = match token.kind {
            TokenKind::RightBracket => PathAction::Append,
            TokenKind::Number => match token.as_number() {
                Some(index) => PathAction::Index(index),
                None => PathAction::Key(token.value.clone()),
            },
            _ => PathAction::Key(token.value.clone()),
        };
        tokens.push(token);

        if !matches!(action, PathAction::Append) {
            tokens.push(self.expect(&[TokenKind::RightBracket])?);
        }
        Ok(Path::new(action, tokens))
    }
}

/// `a text`, `a text or ']'`, `a text, a number or ']'`
fn describe_kinds(kinds: &[TokenKind]) -> String {
    match kinds {
        [] => String::new(),
        [only] => only.name().to_string(),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(|kind| kind.name()).collect();
            format!("{} or {}", init.join(", "), last.name())
        }
    }
}
