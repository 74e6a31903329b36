use std::ffi::OsString;
use std::time::Duration;

pub use clap::Parser;

use crate::request_items::RequestType;

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    override_usage = "httprasa [OPTIONS] [METHOD] URL [REQUEST_ITEM]..."
)]
struct ClapArgs {
    /// Serialize data items as a JSON object (default)
    #[clap(short = 'j', long, conflicts_with = "form", help = "send data items as JSON")]
    json: bool,

    /// Serialize data items as form fields
    #[clap(short = 'f', long, help = "send data items as form fields")]
    form: bool,

    /// Print the request instead of sending it
    #[clap(long, help = "build and print the request without sending it")]
    offline: bool,

    /// Verbose mode
    /// Optional. Print the request as well as the response.
    #[clap(
        short = 'v',
        long,
        help = "Print the request as well as the response",
        default_value = "false"
    )]
    verbose: bool,

    #[clap(long, help = "exit with an error status on 3xx, 4xx and 5xx responses")]
    check_status: bool,

    #[clap(long, value_name = "SECONDS", help = "connection timeout in seconds")]
    timeout: Option<f64>,

    #[clap(short = 'a', long, value_name = "USER[:PASS]", help = "basic auth credentials")]
    auth: Option<String>,

    /// METHOD, URL and request items
    #[clap(required = true, num_args = 1.., value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    method: Option<String>,
    url: String,
    request_items: Vec<String>,
    request_type: Option<RequestType>,
    offline: bool,
    verbose: bool,
    check_status: bool,
    timeout: Option<Duration>,
    auth: Option<String>,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::try_parse_from(itr).map(Self::from_clap)
    }

    fn from_clap(args: ClapArgs) -> Self {
        let request_type = if args.form {
            Some(RequestType::Form)
        } else if args.json {
            Some(RequestType::Json)
        } else {
            None
        };
        let (method, url, request_items) = split_positionals(args.args);

        Self {
            method,
            url: normalize_url(&url),
            request_items,
            request_type,
            offline: args.offline,
            verbose: args.verbose,
            check_status: args.check_status,
            timeout: args
                .timeout
                .filter(|secs| *secs > 0.0)
                .map(Duration::from_secs_f64),
            auth: args.auth,
        }
    }

    /// Explicit method, if one was given
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn request_items(&self) -> &[String] {
        &self.request_items
    }

    pub fn request_type(&self) -> Option<RequestType> {
        self.request_type
    }

    pub fn offline(&self) -> bool {
        self.offline
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn check_status(&self) -> bool {
        self.check_status
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn auth(&self) -> Option<&str> {
        self.auth.as_deref()
    }
}

/// Split `[METHOD] URL [ITEM...]`.
///
/// The first argument is a method when it is made of uppercase ASCII letters
/// only and something follows it, so `localhost a=1` stays a URL.
fn split_positionals(mut args: Vec<String>) -> (Option<String>, String, Vec<String>) {
    let has_method = args.len() > 1 && is_method(&args[0]);
    let method = if has_method {
        Some(args.remove(0))
    } else {
        None
    };
    let url = if args.is_empty() {
        String::new()
    } else {
        args.remove(0)
    };
    (method, url, args)
}

fn is_method(arg: &str) -> bool {
    !arg.is_empty() && arg.chars().all(|c| c.is_ascii_uppercase())
}

/// Fill in the scheme and the `:port/path` localhost shorthand
pub fn normalize_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix(':') {
        if !rest.starts_with(':') {
            let port_len = rest.chars().take_while(char::is_ascii_digit).count();
            let (port, path) = rest.split_at(port_len);
            let port = if port.is_empty() {
                String::new()
            } else {
                format!(":{port}")
            };
            return format!("http://localhost{port}{path}");
        }
    }

    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_args_url_only() {
        let args = CommandLineArgs::parse_from(["program", "example.org"]);
        assert_eq!(args.method(), None);
        assert_eq!(args.url(), "http://example.org");
        assert!(args.request_items().is_empty());
        assert!(!args.verbose());
        assert!(!args.offline());
    }

    #[test]
    fn test_parse_args_method_url_and_items() {
        let args = CommandLineArgs::parse_from([
            "program",
            "PUT",
            "https://example.org/users/1",
            "name=bob",
            "X-Token:abc",
        ]);
        assert_eq!(args.method(), Some("PUT"));
        assert_eq!(args.url(), "https://example.org/users/1");
        assert_eq!(args.request_items(), ["name=bob", "X-Token:abc"]);
    }

    #[test]
    fn test_parse_args_url_followed_by_items() {
        let args = CommandLineArgs::parse_from(["program", "example.org", "a=1"]);
        assert_eq!(args.method(), None);
        assert_eq!(args.url(), "http://example.org");
        assert_eq!(args.request_items(), ["a=1"]);
    }

    #[test]
    fn test_parse_args_lowercase_host_with_items() {
        let args = CommandLineArgs::parse_from(["program", "localhost", "a=1"]);
        assert_eq!(args.method(), None);
        assert_eq!(args.url(), "http://localhost");
        assert_eq!(args.request_items(), ["a=1"]);

        let args = CommandLineArgs::parse_from(["program", "get", "x.org"]);
        assert_eq!(args.method(), None);
        assert_eq!(args.url(), "http://get");
    }

    #[test]
    fn test_parse_args_flags() {
        let args = CommandLineArgs::parse_from([
            "program",
            "--form",
            "--offline",
            "-v",
            "--check-status",
            "--timeout",
            "2.5",
            "-a",
            "user:pass",
            "example.org",
        ]);
        assert_eq!(args.request_type(), Some(RequestType::Form));
        assert!(args.offline());
        assert!(args.verbose());
        assert!(args.check_status());
        assert_eq!(args.timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(args.auth(), Some("user:pass"));
    }

    #[test]
    fn test_default_values() {
        let args = CommandLineArgs::parse_from(["program", "localhost"]);
        assert_eq!(args.request_type(), None);
        assert!(!args.check_status());
        assert_eq!(args.timeout(), None);
        assert_eq!(args.auth(), None);
    }

    #[test]
    fn test_json_and_form_conflict() {
        assert!(CommandLineArgs::try_parse_from(["program", "-j", "-f", "x.org"]).is_err());
    }

    #[test]
    fn test_url_is_required() {
        assert!(CommandLineArgs::try_parse_from(["program"]).is_err());
    }

    #[test]
    fn normalize_url_should_expand_localhost_shorthand() {
        assert_eq!(normalize_url(":3000/users"), "http://localhost:3000/users");
        assert_eq!(normalize_url(":/users"), "http://localhost/users");
        assert_eq!(normalize_url(":"), "http://localhost");
    }

    #[test]
    fn normalize_url_should_default_scheme() {
        assert_eq!(normalize_url("example.org/a"), "http://example.org/a");
        assert_eq!(normalize_url("https://example.org"), "https://example.org");
    }
}
