//! Shared helpers for the integration tests

#![allow(dead_code)]

use httprasa::{KeyValueArg, RequestItems, RequestType};
use serde_json::Value;

/// Parse command line style items into request items
pub fn request_items(args: &[&str], request_type: Option<RequestType>) -> RequestItems {
    try_request_items(args, request_type).unwrap()
}

pub fn try_request_items(
    args: &[&str],
    request_type: Option<RequestType>,
) -> Result<RequestItems, httprasa::request_items::RequestItemError> {
    let args = args
        .iter()
        .map(|arg| KeyValueArg::parse(arg))
        .collect::<Result<Vec<_>, _>>()?;
    RequestItems::from_args(&args, request_type)
}

/// Build `(path, value)` pairs where every value is a JSON string
pub fn text_pairs<'a>(pairs: &[(&'a str, &str)]) -> Vec<(&'a str, Value)> {
    pairs
        .iter()
        .map(|(path, value)| (*path, Value::String(value.to_string())))
        .collect()
}
