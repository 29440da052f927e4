use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use city_client::{
    AssetApi, Dimension, FileSessionStore, Gateway, ListQuery, NetworkHttpClient, Session,
};
use city_console::maintenance::submit_status_change;
use city_console::panel::collect_all_pages;
use city_console::procurement::prepare_material_request;
use city_console::{
    ConsoleConfig, Dashboard, Outcome, PanelQuery, PanelState, Route, StatusView, logger,
};
use shared::models::{AssetKind, Issue, MaterialRequestLine, ScheduleStatus};

#[derive(Parser, Debug)]
#[command(name = "city-console")]
#[command(about = "Operator console for the municipal asset management backend")]
struct Args {
    /// Backend base URL (overrides CITY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides CITY_SESSION_FILE)
    #[arg(long, global = true)]
    session_file: Option<std::path::PathBuf>,

    /// Log filter (overrides LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "CITY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Status totals and the breakdown chart for one asset kind
    Dashboard {
        #[arg(short, long, default_value = "pole")]
        kind: AssetKind,
        #[arg(short, long, default_value = "faulty")]
        view: StatusView,
        #[arg(short, long, default_value = "subcity")]
        dimension: Dimension,
    },
    /// Preview of the records behind one sub-city row
    Drilldown {
        #[arg(short, long, default_value = "pole")]
        kind: AssetKind,
        #[arg(short, long)]
        subcity: String,
        #[arg(short, long, default_value = "faulty")]
        view: StatusView,
    },
    /// Create schedules for assets under maintenance that have none (admin)
    Reconcile,
    /// One page of the issue list
    Issues {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        severity: Option<String>,
        #[arg(long)]
        sort_by: Option<String>,
    },
    /// Change the status of a maintenance schedule
    ScheduleStatus {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        status: ScheduleStatus,
        #[arg(long)]
        remark: Option<String>,
    },
    /// Check a material request against stock, as ITEM=QTY pairs
    MaterialCheck {
        #[arg(required = true)]
        items: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    let mut config = ConsoleConfig::from_env();
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(path) = args.session_file {
        config.session_file = path;
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(level);
    }

    logger::init_logger(config.log_level.as_deref(), config.log_dir.as_deref());
    info!(api = %config.api_url, "city-console starting");

    let session = Session::new(FileSessionStore::new(&config.session_file));
    let gateway = Gateway::connect(&config.client_config(), session.clone())
        .context("failed to build HTTP client")?;

    if !matches!(args.command, Command::Login { .. }) && !session.is_authenticated() {
        session.remember_redirect(Route::Dashboard.to_path())?;
        bail!("not logged in; run `city-console login` first");
    }

    match args.command {
        Command::Login { username, password } => {
            let response = gateway.login(&username, &password).await?;
            let next = session
                .take_redirect()?
                .unwrap_or_else(|| Route::Dashboard.to_path());
            println!("Logged in as {} ({}), continue at {next}", response.user.username, response.user.role);
        }
        Command::Logout => {
            gateway.logout()?;
            println!("Logged out");
        }
        Command::Whoami => print_json(&gateway.current_user().await?)?,
        Command::Dashboard { kind, view, dimension } => {
            let mut dashboard = Dashboard::new(gateway, kind);
            let snapshot = dashboard.load().await?;
            let chart = dashboard.chart(view, dimension).await?;
            let under_maintenance = dashboard.maintenance_chart(dimension).await?;
            print_json(&serde_json::json!({
                "kind": kind,
                "counts": snapshot.counts,
                "view": view.label(),
                "chart": chart,
                "underMaintenance": under_maintenance,
            }))?;
        }
        Command::Drilldown { kind, subcity, view } => {
            let mut dashboard = Dashboard::new(gateway, kind);
            print_json(&dashboard.drilldown(&subcity, view).await?)?;
        }
        Command::Reconcile => {
            let user = gateway.current_user().await?;
            let mut dashboard =
                Dashboard::new(gateway, AssetKind::Pole).with_reconcile_config(config.reconcile_config());
            let outcome = dashboard.reconcile(&user).await;
            print_json(&outcome)?;
            if let Outcome::Aborted { error } = outcome {
                bail!("reconciliation aborted: {error}");
            }
        }
        Command::Issues {
            page,
            page_size,
            status,
            severity,
            sort_by,
        } => {
            let mut panel: PanelState<Issue> = PanelState::new(PanelQuery::issues());
            panel.query.set_page_size(page_size);
            for (field, value) in [("status", status), ("severity", severity)] {
                if let Some(value) = value {
                    panel.query.set_filter(field, value);
                }
            }
            if let Some(field) = sort_by {
                panel.query.toggle_sort(&field);
            }
            // Total is unknown until the first response
            panel.query.go_to(page, u64::MAX);

            let ticket = panel.begin_load();
            let result = gateway.list_issues(&panel.query.to_list_query()).await;
            panel.finish_load(ticket, result);
            if panel.needs_reload() {
                let ticket = panel.begin_load();
                let result = gateway.list_issues(&panel.query.to_list_query()).await;
                panel.finish_load(ticket, result);
            }
            if let Some(error) = panel.error() {
                bail!("{error}");
            }
            let total = panel.data().map(|d| d.total).unwrap_or(0);
            print_json(&serde_json::json!({
                "page": panel.query.page(),
                "lastPage": panel.query.last_page(total),
                "total": total,
                "items": panel.data().map(|d| d.items.as_slice()).unwrap_or_default(),
            }))?;
        }
        Command::ScheduleStatus { id, status, remark } => {
            let user = gateway.current_user().await?;
            let schedule = find_schedule(&gateway, id).await?;
            let updated = submit_status_change(&gateway, &user, &schedule, status, remark.as_deref())
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?;
            print_json(&updated)?;
        }
        Command::MaterialCheck { items } => {
            let user = gateway.current_user().await?;
            let lines = items
                .iter()
                .map(String::as_str)
                .map(parse_line)
                .collect::<Result<Vec<_>>>()?;
            let allocation = prepare_material_request(&gateway, &user, &lines).await?;
            print_json(&serde_json::json!({
                "allocation": allocation,
                "estimatedPurchaseCost": allocation.estimated_purchase_cost().to_string(),
            }))?;
        }
    }

    Ok(())
}

async fn find_schedule(
    gateway: &Gateway<NetworkHttpClient>,
    id: i64,
) -> Result<shared::models::MaintenanceSchedule> {
    let schedules = collect_all_pages(100, |page, limit| {
        let query = ListQuery::all().paginate(page, limit);
        async move { gateway.list_schedules(&query).await }
    })
    .await?;
    schedules
        .into_iter()
        .find(|s| s.id == id)
        .with_context(|| format!("maintenance schedule {id} not found"))
}

fn parse_line(item: &str) -> Result<MaterialRequestLine> {
    let (code, quantity) = item
        .split_once('=')
        .with_context(|| format!("expected ITEM=QTY, got {item:?}"))?;
    Ok(MaterialRequestLine {
        item_code: code.trim().to_string(),
        quantity: quantity
            .trim()
            .parse()
            .with_context(|| format!("invalid quantity in {item:?}"))?,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
