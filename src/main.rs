use clap::{Args, Parser, Subcommand};
use gatepass::config::{ClientConfig, DEFAULT_PAGE_URL};
use gatepass::page::TerminalPage;
use gatepass::transport::{ApiTransport, HttpTransport};
use gatepass::{ClientError, ConfigError, FormFields, FormSubmitter, SessionGate, SubmitOutcome};
use serde::Serialize;

const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("{form} failed: {message}")]
    SubmissionFailed { form: &'static str, message: String },
}

#[derive(Parser, Debug)]
#[command(name = "gatepass", about = "Session-aware client for the quest backend")]
struct Cli {
    /// URL of the page this client is acting as.
    #[arg(long, env = "GATEPASS_PAGE_URL", default_value = DEFAULT_PAGE_URL)]
    page_url: String,

    /// API base URL override, as injected by the hosting environment.
    #[arg(long, env = "API_BASE_URL")]
    api_base_url: Option<String>,

    /// Session cookie (`name=value`) from an earlier login.
    #[arg(long, env = "GATEPASS_COOKIE", hide_env_values = true)]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved API base URL and where it came from.
    Resolve,
    /// Check that the backend health endpoint answers.
    Ping,
    /// Submit the login form.
    Login(FormArgs),
    /// Submit the signup form.
    Signup(FormArgs),
    /// Print the backend's view of the current session.
    Status,
    /// Run the session gate against the current page.
    Gate {
        /// Page identifier or relative URL to gate instead of the current page.
        #[arg(long)]
        page: Option<String>,
    },
    /// End the session and return to the entry page.
    Logout,
}

#[derive(Args, Debug)]
struct FormArgs {
    #[arg(long, env = "GATEPASS_USERNAME")]
    username: String,

    #[arg(long, env = "GATEPASS_PASSWORD", hide_env_values = true)]
    password: String,

    /// Extra form field as `name=value`; repeatable.
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = ClientConfig::from_lookup(|key| match key {
        "GATEPASS_PAGE_URL" => Some(cli.page_url.clone()),
        "API_BASE_URL" => cli.api_base_url.clone(),
        other => std::env::var(other).ok(),
    })?;

    let mut transport = HttpTransport::new(config.timeouts)?;
    if let Some(cookie) = &cli.cookie {
        transport = transport.with_session_cookie(&config.request_url("/")?, cookie);
    }

    match cli.command {
        Command::Resolve => print_json(&config.resolution),
        Command::Ping => run_ping(&config, &transport).await,
        Command::Login(args) => run_form(&config, &transport, FormSubmitter::login(&config, &transport), args).await,
        Command::Signup(args) => run_form(&config, &transport, FormSubmitter::signup(&config, &transport), args).await,
        Command::Status => {
            let status = SessionGate::new(&config, &transport).check_status().await;
            print_json(&status)
        }
        Command::Gate { page } => {
            let config = match page {
                Some(target) => config.with_page(&target)?,
                None => config,
            };
            let page = TerminalPage::new(config.current_page_id());
            let outcome = SessionGate::new(&config, &transport).guard(&page).await;
            print_json(&outcome)
        }
        Command::Logout => {
            let page = TerminalPage::new(config.current_page_id());
            SessionGate::new(&config, &transport).logout(&page).await;
            Ok(())
        }
    }
}

async fn run_ping(config: &ClientConfig, transport: &HttpTransport) -> Result<(), CliError> {
    let url = config.request_url(HEALTH_PATH)?;
    let response = transport.get_json(&url).await?;
    if !response.is_success() {
        return Err(CliError::ServerError { status: response.status, message: response.body.to_string() });
    }
    println!("ok");
    Ok(())
}

async fn run_form(
    config: &ClientConfig,
    transport: &HttpTransport,
    submitter: FormSubmitter<'_>,
    args: FormArgs,
) -> Result<(), CliError> {
    let mut fields = FormFields::new().with("username", args.username).with("password", args.password);
    for (name, value) in args.fields {
        fields.push(name, value);
    }

    let page = TerminalPage::new(config.current_page_id());
    let outcome = submitter.submit(&fields, &page).await;
    print_json(&outcome)?;

    match outcome {
        SubmitOutcome::Navigated(_) | SubmitOutcome::Succeeded => {
            if let Some(cookie) = transport.session_cookies(&config.request_url("/")?) {
                eprintln!("export GATEPASS_COOKIE='{cookie}'");
            }
            Ok(())
        }
        SubmitOutcome::Rejected(message) | SubmitOutcome::Failed(message) => {
            Err(CliError::SubmissionFailed { form: submitter.kind().label(), message })
        }
        SubmitOutcome::Ignored => Ok(()),
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))?;
    if name.is_empty() {
        return Err(format!("field name is empty in {raw:?}"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
