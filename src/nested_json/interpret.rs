//! # Nested JSON Interpreter
//!
//! Folds `(path, value)` pairs into one JSON document, creating objects and
//! arrays on the way down and rejecting accesses that do not fit what has
//! already been built.

use super::errors::NestedJsonError;
use super::parse::parse_path;
use super::tokens::{Path, PathAction, Token, EMPTY_STRING};
use serde_json::{Map, Value};

/// Most `null` slots a single index may pad an array with
pub const MAX_INDEX_PADDING: usize = 100_000;

/// Build a document from ordered `(path, value)` pairs.
///
/// The result is always a map. A document whose root turned out to be an
/// array is returned as `{"": [...]}`, see [`unwrap_top_level_array`].
pub fn interpret_nested_json<I, K>(pairs: I) -> Result<Map<String, Value>, NestedJsonError>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut context = Value::Null;
    for (key, value) in pairs {
        interpret(&mut context, key.as_ref(), value)?;
    }
    Ok(wrap_with_map(context))
}

/// Apply a single `(path, value)` pair to `context`
fn interpret(context: &mut Value, key: &str, value: Value) -> Result<(), NestedJsonError> {
    let mut paths = parse_path(key)?;
    paths.push(Path::set(value));

    let mut consumed = String::new();
    let mut cursor = context;
    let mut remaining = paths.into_iter().peekable();

    while let Some(path) = remaining.next() {
        let Some(next) = remaining.peek_mut() else {
            break;
        };

        if cursor.is_null() {
            *cursor = container_for(&path.action);
        }

        let actual = json_type_name(cursor);
        cursor = match (&path.action, cursor) {
            (PathAction::Key(name), Value::Object(map)) => match take_set_value(next) {
                Some(value) => {
                    map.insert(name.clone(), value);
                    return Ok(());
                }
                None => vivify(map.entry(name.clone()).or_insert(Value::Null), &next.action),
            },
            (PathAction::Index(index), Value::Array(items)) => {
                let index = checked_index(key, &path, *index, items.len())?;
                if items.len() <= index {
                    items.resize(index + 1, Value::Null);
                }
                match take_set_value(next) {
                    Some(value) => {
                        items[index] = value;
                        return Ok(());
                    }
                    None => vivify(&mut items[index], &next.action),
                }
            }
            (PathAction::Append, Value::Array(items)) => match take_set_value(next) {
                Some(value) => {
                    items.push(value);
                    return Ok(());
                }
                None => {
                    let last = items.len();
                    items.push(container_for(&next.action));
                    &mut items[last]
                }
            },
            (action, _) => {
                return Err(type_error(key, &path, &consumed, action, actual));
            }
        };

        consumed.push_str(&path.reconstruct());
    }

    Ok(())
}

/// Validate an index against the array it is about to address
fn checked_index(key: &str, path: &Path, index: i64, len: usize) -> Result<usize, NestedJsonError> {
    let token = path.tokens.get(1).cloned();
    if index < 0 {
        return Err(NestedJsonError::value(
            key,
            token,
            "Negative indexes are not supported.",
        ));
    }
    match usize::try_from(index) {
        Ok(index) if index <= len.saturating_add(MAX_INDEX_PADDING) => Ok(index),
        _ => Err(NestedJsonError::value(
            key,
            token,
            format!(
                "Index {index} is out of range, an array of length {len} can only be \
                 padded up to index {}.",
                len.saturating_add(MAX_INDEX_PADDING)
            ),
        )),
    }
}

/// Empty container a segment of this kind can step into
fn container_for(action: &PathAction) -> Value {
    match action {
        PathAction::Key(_) => Value::Object(Map::new()),
        PathAction::Index(_) | PathAction::Append => Value::Array(Vec::new()),
        PathAction::Set(_) => Value::Null,
    }
}

/// Replace a missing slot with the container the next segment needs
fn vivify<'v>(slot: &'v mut Value, next: &PathAction) -> &'v mut Value {
    if slot.is_null() {
        *slot = container_for(next);
    }
    slot
}

fn take_set_value(path: &mut Path) -> Option<Value> {
    match &mut path.action {
        PathAction::Set(value) => Some(std::mem::take(value)),
        _ => None,
    }
}

fn type_error(
    key: &str,
    path: &Path,
    consumed: &str,
    action: &PathAction,
    actual: &str,
) -> NestedJsonError {
    let required = match action {
        PathAction::Key(_) => "object",
        _ => "array",
    };
    let token = match (path.tokens.first(), path.tokens.last()) {
        (Some(first), Some(last)) => Some(Token::pseudo(first.start, last.end)),
        _ => None,
    };
    let message = format!(
        "Cannot perform '{action}' based access on '{consumed}' which has a type of \
         '{actual}' but this operation requires a type of '{required}'."
    );
    NestedJsonError::type_error(key, token, message)
}

/// JSON type name of a value, as shown in type errors
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrap_with_map(context: Value) -> Map<String, Value> {
    match context {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert(EMPTY_STRING.to_string(), other);
            map
        }
    }
}

/// Undo the `{"": [...]}` wrapping of a top-level array
pub fn unwrap_top_level_array(mut data: Map<String, Value>) -> Value {
    if data.len() == 1 && data.get(EMPTY_STRING).is_some_and(Value::is_array) {
        if let Some(items) = data.remove(EMPTY_STRING) {
            return items;
        }
    }
    Value::Object(data)
}
