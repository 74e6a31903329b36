//! # Nested JSON
//!
//! The bracket path language used by data request items:
//!
//! ```text
//! user[name]=bob  user[pets][]=cat  user[pets][]=dog  user[age]:=30
//! ```
//!
//! becomes
//!
//! ```text
//! {"user": {"name": "bob", "pets": ["cat", "dog"], "age": 30}}
//! ```
//!
//! Processing runs leaf-first: [`tokenize`] a key, [`parse_path`] the tokens
//! into segments, then [`interpret_nested_json`] folds every
//! `(key, value)` pair into one document.

pub mod errors;
pub mod interpret;
pub mod parse;
pub mod tokens;

pub use errors::{ErrorKind, NestedJsonError};
pub use interpret::{interpret_nested_json, json_type_name, unwrap_top_level_array};
pub use parse::{parse_path, tokenize};
pub use tokens::{Path, PathAction, Token, TokenKind};
