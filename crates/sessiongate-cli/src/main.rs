//! sessiongate - terminal host for the session client.
//!
//! Plays the part of the browser page: stores the token, follows redirects
//! by printing them, and shows the last notice after each command.

mod host;

use std::io;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use reqwest::Method;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sessiongate_core::config::Config;
use sessiongate_core::session::{open_store, toast_notifier};
use sessiongate_core::utils::truncate_string;
use sessiongate_core::{RequestOptions, SessionClient, SessionStore, ToastNotifier};

use host::TerminalNavigator;

/// Longest response body printed by `fetch`
const MAX_BODY_PREVIEW: usize = 2000;

/// Log file name in the storage directory
const LOG_FILE: &str = "sessiongate.log";

const USAGE: &str = "\
Usage: sessiongate <command>

Commands:
  token set                     Prompt for a token and store it
  token status                  Show whether a token is stored
  open <path> [--logout-control]
                                Load a page: run the auth check; with
                                --logout-control the page has a logout
                                button, which is then clicked
  fetch <path> [options]        Call the API with the stored token
      -X <method>               HTTP method (default GET)
      -d <body>                 Request body
      -H 'Name: value'          Extra header (repeatable)
  logout                        Forget the token and go to the login page";

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes the file log on drop.
fn init_tracing(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match config.storage_dir() {
        Ok(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn load_config() -> Config {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config ({}), using defaults", e);
            Config::default()
        }
    };
    config.apply_env();
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = load_config();
    let _log_guard = init_tracing(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let store = open_store(&config)?;
    let notifier = toast_notifier(&config);
    let navigator = Arc::new(TerminalNavigator::new(config.base_url.clone()));
    let client = SessionClient::new(
        config,
        store.clone(),
        navigator,
        Arc::new(notifier.clone()),
    );

    info!(command = %command, "sessiongate starting");
    let result = match command.as_str() {
        "token" => token_command(store.as_ref(), &args[1..]),
        "open" => open_command(&client, &args[1..]),
        "fetch" => fetch_command(&client, &args[1..]).await,
        "logout" => {
            client.logout();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("Unknown command '{}'\n\n{}", other, USAGE),
    };

    print_notice(&notifier);
    result
}

fn token_command(store: &dyn SessionStore, args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("set") => {
            let token = rpassword::prompt_password("Token: ")?;
            let token = token.trim();
            if token.is_empty() {
                bail!("Token must not be empty");
            }
            store.set_token(token).context("Failed to store token")?;
            println!("Token stored.");
            Ok(())
        }
        Some("status") => {
            match store.token() {
                Some(_) => println!("Logged in (token stored)."),
                None => println!("Logged out (no token)."),
            }
            Ok(())
        }
        _ => bail!("Usage: sessiongate token <set|status>"),
    }
}

fn open_command(client: &SessionClient, args: &[String]) -> Result<()> {
    let (path, logout_control) = parse_open_args(args)?;
    let logout_id = client.config().logout_element_id.clone();
    let bindings = client.init(&path, |id| logout_control && id == logout_id);
    if !bindings.decision.is_redirect() {
        println!("Stayed on {}", path);
    }
    if let Some(logout) = bindings.logout {
        println!("Clicking #{}", logout_id);
        logout.run();
    }
    Ok(())
}

fn parse_open_args(args: &[String]) -> Result<(String, bool)> {
    let mut path = None;
    let mut logout_control = false;
    for arg in args {
        match arg.as_str() {
            "--logout-control" => logout_control = true,
            other if path.is_none() => path = Some(other.to_string()),
            other => bail!("Unexpected argument '{}'", other),
        }
    }
    let path = path.context("Usage: sessiongate open <path> [--logout-control]")?;
    Ok((path, logout_control))
}

async fn fetch_command(client: &SessionClient, args: &[String]) -> Result<()> {
    let (path, options) = parse_fetch_args(args)?;
    let api = client.http_api()?;

    let Some(response) = api.fetch(&path, options).await else {
        // Already handled: notice shown, maybe logged out
        return Ok(());
    };

    let status = response.status();
    let body = response.text().await.context("Failed to read response body")?;
    println!("{}", status);
    if !body.is_empty() {
        println!("{}", truncate_string(&body, MAX_BODY_PREVIEW));
    }
    Ok(())
}

fn parse_fetch_args(args: &[String]) -> Result<(String, RequestOptions)> {
    let mut path = None;
    let mut options = RequestOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-X" => {
                let method = iter.next().context("-X needs a method")?;
                options.method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                    .with_context(|| format!("Invalid method '{}'", method))?;
            }
            "-d" => {
                let body = iter.next().context("-d needs a body")?;
                options = options.body(body.as_bytes());
            }
            "-H" => {
                let header = iter.next().context("-H needs 'Name: value'")?;
                let (name, value) = header
                    .split_once(':')
                    .with_context(|| format!("Header '{}' must look like 'Name: value'", header))?;
                options = options.try_header(name, value)?;
            }
            other if path.is_none() => path = Some(other.to_string()),
            other => bail!("Unexpected argument '{}'", other),
        }
    }

    let path = path.context("Usage: sessiongate fetch <path> [-X METHOD] [-d BODY] [-H 'Name: value']")?;
    Ok((path, options))
}

fn print_notice(notifier: &ToastNotifier) {
    if let Some(notice) = notifier.current() {
        eprintln!("[{}] {}", notice.severity.as_str(), notice.message);
    }
}

#[cfg(test)]
mod tests {
    use sessiongate_core::auth::MemorySessionStore;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_fetch_defaults() {
        let (path, options) = parse_fetch_args(&args(&["api/products"])).unwrap();
        assert_eq!(path, "api/products");
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
    }

    #[test]
    fn test_parse_fetch_options() {
        let (path, options) = parse_fetch_args(&args(&[
            "-X", "post", "/api/customers", "-d", r#"{"name":"Ravi"}"#, "-H", "X-Branch: chennai",
        ]))
        .unwrap();
        assert_eq!(path, "/api/customers");
        assert_eq!(options.method, Method::POST);
        assert_eq!(options.body.as_deref(), Some(br#"{"name":"Ravi"}"#.as_slice()));
        assert_eq!(options.headers.get("x-branch").unwrap(), "chennai");
    }

    #[test]
    fn test_parse_fetch_errors() {
        assert!(parse_fetch_args(&args(&[])).is_err());
        assert!(parse_fetch_args(&args(&["/a", "/b"])).is_err());
        assert!(parse_fetch_args(&args(&["/a", "-H", "no-colon"])).is_err());
        assert!(parse_fetch_args(&args(&["/a", "-X"])).is_err());
    }

    fn session_client(store: Arc<MemorySessionStore>) -> SessionClient {
        let config = Config::default();
        let navigator = Arc::new(TerminalNavigator::new(config.base_url.clone()));
        SessionClient::new(config, store, navigator, Arc::new(ToastNotifier::default()))
    }

    #[test]
    fn test_parse_open_args() {
        assert_eq!(parse_open_args(&args(&["/sales"])).unwrap(), ("/sales".to_string(), false));
        assert_eq!(
            parse_open_args(&args(&["--logout-control", "/sales"])).unwrap(),
            ("/sales".to_string(), true)
        );
        assert!(parse_open_args(&args(&[])).is_err());
        assert!(parse_open_args(&args(&["/a", "/b"])).is_err());
    }

    #[test]
    fn test_open_with_logout_control_logs_out() {
        let store = Arc::new(MemorySessionStore::with_token("tok"));
        let client = session_client(store.clone());

        open_command(&client, &args(&["/inventory", "--logout-control"])).unwrap();

        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_open_without_logout_control_keeps_token() {
        let store = Arc::new(MemorySessionStore::with_token("tok"));
        let client = session_client(store.clone());

        open_command(&client, &args(&["/inventory"])).unwrap();

        assert_eq!(store.token().as_deref(), Some("tok"));
    }
}
