//! # httprasa - Command Line HTTP Client
//!
//! Builds HTTP requests from `key=value` style request items. Data item keys
//! use a small path language (`user[name]`, `tags[]`, `[0][id]`) that
//! assembles nested JSON bodies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   strings   ┌───────────────┐   pairs   ┌──────────────┐
//! │  cmd_args   │────────────►│ request_items │──────────►│ nested_json  │
//! │             │             │               │◄──────────│              │
//! │ - METHOD    │             │ - Separators  │   object  │ - Tokenizer  │
//! │ - URL       │             │ - Headers     │           │ - Parser     │
//! │ - Flags     │             │ - Files       │           │ - Interpreter│
//! └─────────────┘             └───────────────┘           └──────────────┘
//!        ▲                            │
//!        │ default_options            │ RequestItems
//!        │                            ▼
//! ┌─────────────┐             ┌───────────────┐
//! │   config    │             │     http      │──► exit_status
//! └─────────────┘             └───────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod exit_status;
pub mod http;
pub mod nested_json;
pub mod request_items;

pub use exit_status::ExitStatus;
pub use nested_json::{interpret_nested_json, NestedJsonError};
pub use request_items::{KeyValueArg, RequestItems, RequestType};
