//! # HTTP Integration Module
//!
//! Builds a reqwest request from the request items, prints requests and
//! responses, and executes requests.

use crate::nested_json::unwrap_top_level_array;
use crate::request_items::{RequestData, RequestItems, RequestType};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Request, Response, Url};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("httprasa/", env!("CARGO_PKG_VERSION"));
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const JSON_ACCEPT: &str = "application/json, */*;q=0.5";
pub const ANY_ACCEPT: &str = "*/*";

/// Everything needed to build one request
#[derive(Debug)]
pub struct RequestSpec<'a> {
    pub method: Option<&'a str>,
    pub url: &'a str,
    pub items: RequestItems,
    pub auth: Option<&'a str>,
}

/// Create an HTTP client with an optional timeout
pub fn create_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to create HTTP client")
}

/// `POST` when the items carry data, `GET` otherwise
pub fn infer_method(explicit: Option<&str>, items: &RequestItems) -> String {
    match explicit {
        Some(method) => method.to_uppercase(),
        None if items.has_data() => "POST".to_string(),
        None => "GET".to_string(),
    }
}

/// Build the request without sending it
pub fn build_request(client: &Client, spec: RequestSpec<'_>) -> Result<Request> {
    let RequestSpec {
        method,
        url,
        items,
        auth,
    } = spec;

    let method_name = infer_method(method, &items);
    let method = Method::from_bytes(method_name.as_bytes())
        .with_context(|| format!("Invalid HTTP method: {method_name}"))?;
    let mut url = Url::parse(url).with_context(|| format!("Invalid URL: {url}"))?;
    if !items.params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(items.params.iter().map(|(k, v)| (k, v.as_str())));
    }

    let RequestItems {
        mut headers,
        data,
        files,
        request_type,
        ..
    } = items;

    let is_json = request_type == RequestType::Json;
    if is_json {
        headers.set_default(ACCEPT.as_str(), JSON_ACCEPT);
    } else {
        headers.set_default(ACCEPT.as_str(), ANY_ACCEPT);
    }
    headers.set_default(USER_AGENT.as_str(), DEFAULT_USER_AGENT);

    let mut builder = client.request(method, url);

    builder = match data {
        RequestData::Json(map) if !map.is_empty() => {
            headers.set_default(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE);
            let body = unwrap_top_level_array(map);
            builder.body(serde_json::to_vec(&body).context("Failed to serialize JSON body")?)
        }
        RequestData::Json(_) => builder,
        RequestData::Form(fields) if request_type == RequestType::Multipart || !files.is_empty() => {
            let mut form = Form::new();
            for (name, value) in fields {
                form = form.text(name, value);
            }
            for (name, upload) in files {
                let mut part = Part::bytes(upload.content).file_name(upload.filename);
                if let Some(mime_type) = &upload.mime_type {
                    part = part
                        .mime_str(mime_type)
                        .with_context(|| format!("Invalid MIME type: {mime_type}"))?;
                }
                form = form.part(name, part);
            }
            builder.multipart(form)
        }
        RequestData::Form(fields) if !fields.is_empty() => {
            let pairs: Vec<(String, String)> = fields.into_iter().collect();
            builder.form(&pairs)
        }
        RequestData::Form(_) => builder,
    };

    if let Some(auth) = auth {
        let (user, password) = match auth.split_once(':') {
            Some((user, password)) => (user, Some(password)),
            None => (auth, None),
        };
        builder = builder.basic_auth(user, password);
    }

    let mut request = builder.build().context("Failed to build request")?;

    // Item headers replace whatever the body encoding set
    let mut custom = HeaderMap::new();
    for (name, value) in headers.iter() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid header name: {name}"))?;
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("Invalid value for header {name}"))?;
        custom.append(name, value);
    }
    for name in custom.keys() {
        request.headers_mut().remove(name);
    }
    for (name, value) in custom.iter() {
        request.headers_mut().append(name, value.clone());
    }
    // The client sends `*/*` whenever Accept is missing, so show it here too
    if !request.headers().contains_key(ACCEPT) {
        request
            .headers_mut()
            .insert(ACCEPT, HeaderValue::from_static(ANY_ACCEPT));
    }

    tracing::debug!("Built request: {} {}", request.method(), request.url());
    Ok(request)
}

/// Render a request the way it goes over the wire
pub fn format_request(request: &Request) -> String {
    let url = request.url();
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut text = format!("{} {} HTTP/1.1\n", request.method(), target);
    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => text.push_str(&format!("Host: {host}:{port}\n")),
            None => text.push_str(&format!("Host: {host}\n")),
        }
    }
    for (name, value) in request.headers() {
        text.push_str(&format!(
            "{}: {}\n",
            name,
            String::from_utf8_lossy(value.as_bytes())
        ));
    }

    if let Some(body) = request.body() {
        text.push('\n');
        match body.as_bytes() {
            Some(bytes) => text.push_str(&format_body(bytes)),
            None => text.push_str("+-----------------------------------------+\n| NOTE: binary data not shown in terminal |\n+-----------------------------------------+"),
        }
        text.push('\n');
    }
    text
}

/// Pretty print JSON bodies, pass everything else through
pub fn format_body(bytes: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(json) => serde_json::to_string_pretty(&json)
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned()),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Execute a request and render its response
pub async fn execute_request(client: &Client, request: Request) -> Result<(u16, String)> {
    let start_time = std::time::Instant::now();
    tracing::info!("Sending {} {}", request.method(), request.url());

    let response = client
        .execute(request)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP request failed: {e}"))?;

    let duration_ms = start_time.elapsed().as_millis() as u64;
    let status = response.status().as_u16();
    tracing::info!("Received {} in {} ms", status, duration_ms);

    let text = format_response(response).await?;
    Ok((status, text))
}

async fn format_response(response: Response) -> Result<String> {
    let status = response.status();
    let mut text = format!(
        "{:?} {} {}\n",
        response.version(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );
    for (name, value) in response.headers() {
        text.push_str(&format!(
            "{}: {}\n",
            name,
            String::from_utf8_lossy(value.as_bytes())
        ));
    }

    let body = response
        .bytes()
        .await
        .context("Failed to read response body")?;
    if !body.is_empty() {
        text.push('\n');
        text.push_str(&format_body(&body));
        text.push('\n');
    }
    Ok(text)
}
