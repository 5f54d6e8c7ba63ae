use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chowk::api::{ApiError, Credentials};
use chowk::config::{BASE_URL_VAR, ConfigError, PortalConfig, TOKEN_PATH_VAR};
use chowk::nav::History;
use chowk::routes::{self, Page};
use chowk::services::{login, logout, session};
use chowk::state::AppState;
use chowk::store::StoreError;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Login(#[from] login::LoginError),
    #[error("session store error: {0}")]
    Store(#[from] StoreError),
    #[error("terminal io failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chowk", about = "Career Chowk portal session client")]
struct Cli {
    #[arg(long, env = "CHOWK_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "CHOWK_TOKEN_PATH")]
    token_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange credentials for a session token.
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted.
        #[arg(long, env = "CHOWK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the stored token's claims and check it against the server.
    Status,
    /// Open a portal location, running the route guard for protected pages.
    Open { path: String },
    /// List every route.
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Login { email, password } => {
            let (state, history) = connect(&cli)?;
            let password = match password {
                Some(password) => password.clone(),
                None => prompt_password()?,
            };
            login::submit(&state, &Credentials::new(email.as_str(), password)).await?;
            println!("logged in; now at {}", current(&history));
        }
        Command::Logout => {
            let (state, history) = connect(&cli)?;
            logout::logout(&state)?;
            println!("logged out; now at {}", current(&history));
        }
        Command::Status => {
            let (state, _) = connect(&cli)?;
            status(&state).await;
        }
        Command::Open { path } => {
            let (state, _) = connect(&cli)?;
            let rendered = routes::open(&state, path).await;
            print_page(rendered.page, &rendered.location);
        }
        Command::Routes => print_routes(),
    }
    Ok(())
}

/// Session state over the configured token file and portal API.
fn connect(cli: &Cli) -> Result<(AppState, Arc<History>), CliError> {
    let config = load_config(cli)?;
    tracing::debug!(base_url = %config.base_url, token_path = %config.token_path.display(), "config loaded");
    let history = Arc::new(History::new());
    let state = AppState::from_config(&config, history.clone())?;
    Ok((state, history))
}

/// Environment config with `--base-url` / `--token-path` taking precedence.
fn load_config(cli: &Cli) -> Result<PortalConfig, ConfigError> {
    PortalConfig::from_lookup(|key| match key {
        BASE_URL_VAR if cli.base_url.is_some() => cli.base_url.clone(),
        TOKEN_PATH_VAR if cli.token_path.is_some() => cli.token_path.clone(),
        _ => std::env::var(key).ok(),
    })
}

fn prompt_password() -> Result<String, io::Error> {
    eprint!("password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn current(history: &History) -> String {
    history.current().unwrap_or_else(|| "/".to_owned())
}

async fn status(state: &AppState) {
    match session::peek_claims(state) {
        Some(claims) => {
            let now = state.clock.now_secs();
            let subject = claims.get_str("id").unwrap_or("unknown");
            println!("token: present (id {subject}, expires in {}s)", claims.remaining_secs(now));
        }
        None => println!("token: none"),
    }
    let verdict = session::validate(state).await;
    println!("verdict: {verdict}");
}

fn print_page(page: Page, location: &str) {
    println!("{page} ({location})");
    if page == Page::Dashboard {
        for tool in Page::dashboard_menu() {
            let path = tool.path().unwrap_or_default();
            let description = tool.description().unwrap_or_default();
            println!("  {:<18} {path:<17} {description}", tool.title());
        }
    }
}

fn print_routes() {
    for page in Page::ALL {
        let access = if page.is_protected() { "protected" } else { "public" };
        println!("{:<17} {access:<10} {}", page.path().unwrap_or_default(), page.title());
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
