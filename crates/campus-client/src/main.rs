//! Campus Admin command-line client
//!
//! Drives the session core against a live backend: log in, inspect the
//! session, compose the role menu, load the dashboard, try a navigation, and
//! list entities.

use anyhow::{bail, Context};
use campus_client::api::{
    AdminClient, EntityClient, GroupClient, PaymentClient, ProfessorClient, Resource,
    StudentClient, SubjectClient,
};
use campus_client::auth::{
    AuthClient, LoginController, LoginForm, SessionController, SubmitOutcome,
};
use campus_client::config::ClientConfig;
use campus_client::http::ApiClient;
use campus_client::routing::{FeatureArea, HistoryNavigator, Navigation, Router};
use campus_client::session::{CredentialStore, FileStorage};
use campus_client::views::dashboard::{students_by_group, subject_rows, ChartSeries};
use campus_client::views::{
    progress_width, DashboardData, DashboardLoader, DashboardView, MenuView,
};
use clap::{Parser, Subcommand, ValueEnum};
use common::config::ObservabilityConfig;
use common::error::CampusError;
use common::secret::SecretString;
use serde_json::json;
use std::io::BufRead;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Campus Admin client - session, navigation and entity access")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate and store the session token
    Login {
        username: String,

        /// Password; read from the first line of stdin when omitted
        #[arg(long)]
        password: Option<String>,

        /// Ask the backend for a long-lived token
        #[arg(long)]
        remember: bool,
    },

    /// Clear the stored session token
    Logout,

    /// Show the current session
    Whoami,

    /// Print the navigation menu for the current role
    Menu,

    /// Load the dashboard for the current role
    Dashboard,

    /// Resolve a location through admission and report what would render
    Navigate { path: String },

    /// List entities of one kind
    List {
        entity: EntityKind,

        /// Zero-based page; all entities when omitted
        #[arg(long)]
        page: Option<u32>,

        #[arg(long, default_value = "20")]
        size: u32,

        /// Sort expression, e.g. `id,asc`
        #[arg(long)]
        sort: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EntityKind {
    Students,
    Professors,
    Groups,
    Subjects,
    Payments,
    Admins,
}

impl EntityKind {
    fn area(self) -> FeatureArea {
        match self {
            EntityKind::Students => FeatureArea::Students,
            EntityKind::Professors => FeatureArea::Professors,
            EntityKind::Groups => FeatureArea::Groups,
            EntityKind::Subjects => FeatureArea::Subjects,
            EntityKind::Payments => FeatureArea::Payments,
            EntityKind::Admins => FeatureArea::Admins,
        }
    }
}

/// Everything a command needs, built once from configuration.
struct App {
    config: ClientConfig,
    store: CredentialStore,
    api: ApiClient,
    navigator: HistoryNavigator,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ClientConfig::from_env().map_err(CampusError::from)?;
    init_tracing(&config.observability);

    debug!(
        target: "campus.api",
        api_base_url = %config.api_base_url,
        token_dir = %config.token_dir.display(),
        enforce_route_roles = config.enforce_route_roles,
        "Configuration loaded"
    );

    let store = CredentialStore::new(Arc::new(FileStorage::new(config.token_dir.clone())));
    let api = ApiClient::new(&config, store.clone()).map_err(CampusError::from)?;
    let app = App {
        config,
        store,
        api,
        navigator: HistoryNavigator::new(),
    };

    match cli.command {
        Commands::Login {
            username,
            password,
            remember,
        } => login(&app, username, password, remember).await,
        Commands::Logout => logout(&app),
        Commands::Whoami => whoami(&app),
        Commands::Menu => menu(&app),
        Commands::Dashboard => dashboard(&app).await,
        Commands::Navigate { path } => navigate(&app, &path),
        Commands::List {
            entity,
            page,
            size,
            sort,
        } => list(&app, entity, page, size, sort.as_deref()).await,
    }
}

fn init_tracing(observability: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&observability.log_filter));

    let (plain, json) = if observability.json_logs {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

async fn login(
    app: &App,
    username: String,
    password: Option<String>,
    remember: bool,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password_line().context("Failed to read password from stdin")?,
    };

    let auth = AuthClient::new(app.api.clone(), app.store.clone());
    let mut controller = LoginController::new(auth, Arc::new(app.navigator.clone()));
    let form = LoginForm::new(username, SecretString::from(password), remember);

    match controller.submit(&form).await {
        SubmitOutcome::Incomplete => bail!("Username and password are required"),
        SubmitOutcome::LoggedIn(session) => {
            info!(target: "campus.auth.client", "Session stored");
            println!(
                "Logged in as {} ({})",
                session.subject().unwrap_or("unknown"),
                session.claims.auth.as_deref().unwrap_or("no role")
            );
            Ok(())
        }
        SubmitOutcome::Failed(err) => {
            let state = controller.state();
            for (input, message) in &state.errors {
                eprintln!("{input}: {message}");
            }
            for banner in &state.messages {
                eprintln!("{}", banner.detail);
            }
            Err(CampusError::from(err).into())
        }
    }
}

fn read_password_line() -> std::io::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn logout(app: &App) -> anyhow::Result<()> {
    SessionController::new(app.store.clone(), Arc::new(app.navigator.clone()))
        .logout()
        .map_err(CampusError::from)?;
    println!("Logged out");
    Ok(())
}

fn whoami(app: &App) -> anyhow::Result<()> {
    let Some(session) = app.store.session() else {
        bail!(CampusError::Unauthorized("no session".to_string()));
    };

    let expires_at = session.claims.expires_at().map(|t| t.to_rfc3339());
    let report = json!({
        "subject": session.subject(),
        "role": session.claims.auth,
        "valid": session.valid,
        "expiresAt": expires_at,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn menu(app: &App) -> anyhow::Result<()> {
    let view = MenuView::build(&app.store);
    println!("{}", serde_json::to_string_pretty(view.menu())?);
    Ok(())
}

async fn dashboard(app: &App) -> anyhow::Result<()> {
    let router = router(app);
    if let Navigation::Redirected { to } = router.navigate("/", |view| view) {
        bail!(CampusError::Unauthorized(format!("redirected to {to}")));
    }

    let mut view = DashboardView::open(&app.store, DashboardLoader::new(app.api.clone()));
    view.settled().await;
    let state = view.state();

    if let Some(error) = state.error {
        bail!(CampusError::Rejected(error));
    }

    let report = match state.data {
        Some(DashboardData::Admin(stats)) => {
            let groups: Vec<_> = stats
                .students_per_group
                .iter()
                .map(|(name, count)| {
                    json!({
                        "group": name,
                        "students": count,
                        "width": progress_width(*count, &stats.students_per_group),
                    })
                })
                .collect();
            json!({
                "variant": "admin",
                "stats": stats,
                "revenueChart": ChartSeries::monthly_revenue(&stats.revenue_by_month),
                "statusChart": ChartSeries::from_counts(&stats.payments_per_status),
                "groups": groups,
            })
        }
        Some(DashboardData::Professor(stats)) => json!({
            "variant": "professor",
            "stats": stats,
            "subjects": subject_rows(&stats.subject_distribution),
            "groups": students_by_group(&stats),
        }),
        None => json!({ "variant": "unavailable" }),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn navigate(app: &App, path: &str) -> anyhow::Result<()> {
    match router(app).navigate(path, |view| view) {
        Navigation::Mounted { path, view } => println!("{path}: {view:?}"),
        Navigation::Redirected { to } => println!("redirected to {to}"),
    }
    Ok(())
}

async fn list(
    app: &App,
    entity: EntityKind,
    page: Option<u32>,
    size: u32,
    sort: Option<&str>,
) -> anyhow::Result<()> {
    let target = format!("/{}/list", entity.area().segment());
    if let Navigation::Redirected { to } = router(app).navigate(&target, |view| view) {
        bail!(CampusError::Unauthorized(format!("redirected to {to}")));
    }

    let api = app.api.clone();
    let rendered = match entity {
        EntityKind::Students => render(StudentClient::new(api), page, size, sort).await?,
        EntityKind::Professors => render(ProfessorClient::new(api), page, size, sort).await?,
        EntityKind::Groups => render(GroupClient::new(api), page, size, sort).await?,
        EntityKind::Subjects => render(SubjectClient::new(api), page, size, sort).await?,
        EntityKind::Payments => render(PaymentClient::new(api), page, size, sort).await?,
        EntityKind::Admins => render(AdminClient::new(api), page, size, sort).await?,
    };
    println!("{rendered}");
    Ok(())
}

async fn render<T: Resource>(
    client: EntityClient<T>,
    page: Option<u32>,
    size: u32,
    sort: Option<&str>,
) -> anyhow::Result<String> {
    let entities = match page {
        Some(page) => client.find_all_paginated(page, size, sort).await,
        None => client.find_all().await,
    }
    .map_err(CampusError::from)?;
    Ok(serde_json::to_string_pretty(&entities)?)
}

fn router(app: &App) -> Router {
    Router::new(
        app.store.clone(),
        Arc::new(app.navigator.clone()),
        app.config.enforce_route_roles,
    )
}
