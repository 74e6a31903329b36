//! # Request Items
//!
//! Turns parsed `key<sep>value` command line items into the headers, query
//! parameters, body data and file uploads of a request. In JSON mode every
//! data item goes through the nested JSON interpreter, so
//! `user[name]=bob user[age]:=30` builds `{"user": {"name": "bob", "age": 30}}`.

pub mod dicts;
pub mod key_value_arg;

pub use dicts::{HttpHeaders, OrderedMultiMap};
pub use key_value_arg::{KeyValueArg, Separator};

use crate::nested_json::{interpret_nested_json, NestedJsonError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker between a file path and its MIME type in `field@path;type=mime`
pub const FILE_UPLOAD_TYPE_SEPARATOR: &str = ";type=";

#[derive(Debug, Error)]
pub enum RequestItemError {
    #[error("{0:?} is not a valid value")]
    InvalidItem(String),

    #[error(transparent)]
    NestedJson(#[from] NestedJsonError),

    #[error("{orig:?}: {source}")]
    File {
        orig: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{orig:?}: cannot embed the content of {path:?}, not a UTF-8 or ASCII-encoded text file")]
    NotUtf8 { orig: String, path: String },

    #[error("{orig:?}: {source}")]
    InvalidJson {
        orig: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid item {0:?} (to specify an empty header use `Header;`)")]
    EmptyHeader(String),

    #[error("Cannot use complex JSON value types with --form/--multipart.")]
    ComplexFormValue,

    #[error("Invalid file fields (perhaps you meant --form?): {0}")]
    FilesInJsonMode(String),
}

/// How data items are encoded in the request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestType {
    #[default]
    Json,
    Form,
    Multipart,
}

/// A file given with `field@path`.
///
/// Without an explicit `;type=` the MIME type is guessed from the file
/// extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub mime_type: Option<String>,
}

/// Body data collected from request items
#[derive(Debug, Clone, PartialEq)]
pub enum RequestData {
    Json(Map<String, Value>),
    Form(OrderedMultiMap<String>),
}

impl RequestData {
    pub fn is_empty(&self) -> bool {
        match self {
            RequestData::Json(map) => map.is_empty(),
            RequestData::Form(fields) => fields.is_empty(),
        }
    }
}

/// Everything the request items of one invocation contribute to a request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestItems {
    pub headers: HttpHeaders,
    pub data: RequestData,
    pub files: OrderedMultiMap<FileUpload>,
    pub params: OrderedMultiMap<String>,
    pub request_type: RequestType,
}

/// Decoded value of a single item
enum ItemValue {
    Header(Option<String>),
    Text(String),
    Json(Value),
    File(FileUpload),
}

impl RequestItems {
    /// Classify and decode `items`.
    ///
    /// Without an explicit `request_type`, file uploads switch the request
    /// to multipart and everything else defaults to JSON.
    pub fn from_args(
        items: &[KeyValueArg],
        request_type: Option<RequestType>,
    ) -> Result<Self, RequestItemError> {
        let has_files = items.iter().any(|item| item.sep == Separator::FileUpload);
        let request_type = match request_type {
            Some(RequestType::Json) if has_files => {
                let files: Vec<&str> = items
                    .iter()
                    .filter(|item| item.sep == Separator::FileUpload)
                    .map(|item| item.key.as_str())
                    .collect();
                return Err(RequestItemError::FilesInJsonMode(files.join(", ")));
            }
            Some(request_type) => request_type,
            None if has_files => RequestType::Multipart,
            None => RequestType::Json,
        };
        let is_json = request_type == RequestType::Json;

        let mut this = Self {
            headers: HttpHeaders::new(),
            data: if is_json {
                RequestData::Json(Map::new())
            } else {
                RequestData::Form(OrderedMultiMap::new())
            },
            files: OrderedMultiMap::new(),
            params: OrderedMultiMap::new(),
            request_type,
        };

        let (json_items, other_items): (Vec<&KeyValueArg>, Vec<&KeyValueArg>) = items
            .iter()
            .partition(|item| is_json && item.sep.is_nested_json());

        if !json_items.is_empty() {
            let mut pairs = Vec::with_capacity(json_items.len());
            for item in &json_items {
                pairs.push((item.key.as_str(), this.json_value(item)?));
            }
            let nested = interpret_nested_json(pairs)?;
            if let RequestData::Json(data) = &mut this.data {
                data.extend(nested);
            }
        }

        for item in other_items {
            match this.process_item(item)? {
                ItemValue::Header(value) => this.headers.add(&item.key, value),
                ItemValue::File(upload) => this.files.add(item.key.clone(), upload),
                ItemValue::Text(value) if item.sep.is_data() => {
                    this.add_form_field(&item.key, value)
                }
                ItemValue::Text(value) => this.params.add(item.key.clone(), value),
                ItemValue::Json(value) => {
                    let value = convert_json_value_to_form(value)?;
                    this.add_form_field(&item.key, value);
                }
            }
        }

        tracing::debug!(
            "Built request items: {} headers, {} params, {} files",
            this.headers.iter().count(),
            this.params.len(),
            this.files.len()
        );
        Ok(this)
    }

    /// Whether the items put anything into the request body
    pub fn has_data(&self) -> bool {
        !self.data.is_empty() || !self.files.is_empty()
    }

    fn add_form_field(&mut self, key: &str, value: String) {
        if let RequestData::Form(fields) = &mut self.data {
            fields.add(key, value);
        }
    }

    fn json_value(&self, item: &KeyValueArg) -> Result<Value, RequestItemError> {
        Ok(match self.process_item(item)? {
            ItemValue::Json(value) => value,
            ItemValue::Text(text) => Value::String(text),
            ItemValue::Header(_) | ItemValue::File(_) => Value::Null,
        })
    }

    fn process_item(&self, item: &KeyValueArg) -> Result<ItemValue, RequestItemError> {
        let value = match item.sep {
            // `Header:` without a value unsets the header
            Separator::Header => {
                ItemValue::Header(Some(item.value.clone()).filter(|v| !v.is_empty()))
            }
            Separator::HeaderEmpty => {
                if !item.value.is_empty() {
                    return Err(RequestItemError::EmptyHeader(item.orig.clone()));
                }
                ItemValue::Header(Some(String::new()))
            }
            Separator::HeaderEmbed => {
                ItemValue::Header(Some(chomp(load_text_file(item)?)))
            }
            Separator::QueryParam | Separator::DataString => ItemValue::Text(item.value.clone()),
            Separator::QueryEmbedFile => ItemValue::Text(chomp(load_text_file(item)?)),
            Separator::DataEmbedFileContents => ItemValue::Text(load_text_file(item)?),
            Separator::DataRawJson => ItemValue::Json(load_json(item, &item.value)?),
            Separator::DataEmbedRawJsonFile => {
                let contents = load_text_file(item)?;
                ItemValue::Json(load_json(item, &contents)?)
            }
            Separator::FileUpload => ItemValue::File(load_upload(item)?),
        };
        Ok(value)
    }
}

fn convert_json_value_to_form(value: Value) -> Result<String, RequestItemError> {
    match value {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(RequestItemError::ComplexFormValue),
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn read_file(item: &KeyValueArg, path: &Path) -> Result<Vec<u8>, RequestItemError> {
    std::fs::read(path).map_err(|source| RequestItemError::File {
        orig: item.orig.clone(),
        source,
    })
}

fn load_text_file(item: &KeyValueArg) -> Result<String, RequestItemError> {
    let path = expand_path(&item.value);
    let bytes = read_file(item, &path)?;
    String::from_utf8(bytes).map_err(|_| RequestItemError::NotUtf8 {
        orig: item.orig.clone(),
        path: item.value.clone(),
    })
}

fn load_json(item: &KeyValueArg, contents: &str) -> Result<Value, RequestItemError> {
    serde_json::from_str(contents).map_err(|source| RequestItemError::InvalidJson {
        orig: item.orig.clone(),
        source,
    })
}

fn load_upload(item: &KeyValueArg) -> Result<FileUpload, RequestItemError> {
    let (filename, mime_type) = match item.value.split_once(FILE_UPLOAD_TYPE_SEPARATOR) {
        Some((filename, mime_type)) => (filename, Some(mime_type.to_string())),
        None => (item.value.as_str(), None),
    };
    let path = expand_path(filename);
    let content = read_file(item, &path)?;
    let mime_type = mime_type.or_else(|| {
        mime_guess::from_path(&path)
            .first_raw()
            .map(str::to_string)
    });
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    Ok(FileUpload {
        filename,
        path,
        content,
        mime_type,
    })
}

fn chomp(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
