//! # httprasa Main Entry Point

use std::process::ExitCode;

use anyhow::Result;
use httprasa::{
    cmd_args::CommandLineArgs,
    config::{get_config_dir, Config, ConfigError},
    http::{build_request, create_client, execute_request, format_request, RequestSpec},
    request_items::RequestItemError,
    ExitStatus, KeyValueArg, RequestItems,
};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing_subscriber();

    let status = tokio::select! {
        result = run(std::env::args().collect()) => match result {
            Ok(status) => status,
            Err(e) => {
                report_error(&e);
                ExitStatus::Error
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::debug!("Interrupted");
            eprintln!();
            ExitStatus::ErrorCtrlC
        }
    };

    status.into()
}

async fn run(args: Vec<String>) -> Result<ExitStatus> {
    let config_dir = get_config_dir();
    let config = Config::load(&config_dir)?;
    tracing::debug!("Config loaded from '{}': {:?}", config_dir.display(), config);

    let cmd_args = CommandLineArgs::parse_from(with_default_options(args, &config));

    let item_args = cmd_args
        .request_items()
        .iter()
        .map(|item| KeyValueArg::parse(item))
        .collect::<Result<Vec<_>, _>>()?;
    let items = RequestItems::from_args(&item_args, cmd_args.request_type())?;
    tracing::debug!("Request items: {:?}", items);

    let client = create_client(cmd_args.timeout())?;
    let request = build_request(
        &client,
        RequestSpec {
            method: cmd_args.method(),
            url: cmd_args.url(),
            items,
            auth: cmd_args.auth(),
        },
    )?;

    if cmd_args.offline() || cmd_args.verbose() {
        println!("{}", format_request(&request));
    }
    if cmd_args.offline() {
        return Ok(ExitStatus::Success);
    }

    let (status_code, response) = execute_request(&client, request).await?;
    println!("{response}");

    if cmd_args.check_status() {
        let status = ExitStatus::from_http_status(status_code);
        if status != ExitStatus::Success {
            eprintln!("httprasa: warning: HTTP {status_code}");
        }
        return Ok(status);
    }
    Ok(ExitStatus::Success)
}

/// Insert the configured default options right after the program name
fn with_default_options(mut args: Vec<String>, config: &Config) -> Vec<String> {
    if !args.is_empty() && !config.default_options.is_empty() {
        let rest = args.split_off(1);
        args.extend(config.default_options.iter().cloned());
        args.extend(rest);
    }
    args
}

fn report_error(error: &anyhow::Error) {
    // These already carry their cause in the message
    if error.downcast_ref::<RequestItemError>().is_some()
        || error.downcast_ref::<ConfigError>().is_some()
    {
        eprintln!("httprasa: error: {error}");
    } else {
        eprintln!("httprasa: error: {error:#}");
    }
}

fn init_tracing_subscriber() {
    let filter = EnvFilter::from_env(format!(
        "{}_LOG_LEVEL",
        env!("CARGO_PKG_NAME").to_uppercase()
    ));
    let filter = [
        "reqwest=warn",
        "hyper=warn",
        "hyper_util=warn",
        "tokio=warn",
        "rustls=warn",
        "h2=warn",
    ]
    .iter()
    .filter_map(|directive| directive.parse().ok())
    .fold(filter, |filter, directive| filter.add_directive(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn with_default_options_should_insert_after_program_name() {
        let config = Config {
            default_options: strings(&["--form", "-v"]),
        };
        let args = with_default_options(strings(&["httprasa", "example.org", "a=1"]), &config);
        assert_eq!(args, ["httprasa", "--form", "-v", "example.org", "a=1"]);
    }

    #[test]
    fn with_default_options_should_keep_args_without_config() {
        let args = with_default_options(strings(&["httprasa", "example.org"]), &Config::default());
        assert_eq!(args, ["httprasa", "example.org"]);
    }

    #[tokio::test]
    async fn run_should_build_offline_request() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("HTTPRASA_CONFIG_DIR", dir.path());

        let status = run(strings(&[
            "httprasa",
            "--offline",
            "example.org",
            "user[name]=bob",
        ]))
        .await
        .unwrap();
        assert_eq!(status, ExitStatus::Success);
    }

    #[tokio::test]
    async fn run_should_fail_on_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("HTTPRASA_CONFIG_DIR", dir.path());

        let error = run(strings(&["httprasa", "--offline", "example.org", "a[x=1"]))
            .await
            .unwrap_err();
        assert!(error.downcast_ref::<RequestItemError>().is_some());
        assert!(error.to_string().starts_with("Syntax Error:"));
    }
}
