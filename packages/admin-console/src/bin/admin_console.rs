//! Admin console CLI
//!
//! Thin terminal front-end over the console engine. Sign-in is handled
//! elsewhere; pass the resulting token in `ADMIN_API_TOKEN`.
//!
//! ```bash
//! admin-console search "report: spam host"
//! admin-console list bookings --page 2 --filter status=confirmed
//! admin-console act bookings 507f1f77bcf86cd799439011 refund
//! ```

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

use admin_console::models::{ExperienceStatus, UserRole};
use admin_console::{
    AccessDecision, AdminAction, AdminSession, BookingAction, ConsoleConfig, ConsoleController,
    ConsoleError, DispatchOutcome, ExperienceAction, Filters, HttpAdminApi, LoadStatus,
    ReportAction, ResourceKind, ResourceState, TerminalPrompt, UserAction,
};

#[derive(Parser)]
#[command(name = "admin-console", about = "Marketplace admin operations console")]
struct Cli {
    /// Operator email recorded on the session
    #[arg(long, default_value = "operator@localhost")]
    operator: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh every section and print a status summary
    Refresh,
    /// Route a free-text search into the matching section
    Search { query: String },
    /// List one section
    List {
        kind: KindArg,
        #[arg(long)]
        page: Option<u32>,
        /// Filter as name=value, repeatable
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
    /// Run an action against one entity
    Act {
        kind: KindArg,
        id: String,
        action: ActionArg,
        #[arg(long)]
        role: Option<RoleArg>,
        #[arg(long)]
        status: Option<StatusArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Users,
    Experiences,
    Bookings,
    Reports,
    AuditLogs,
    PaymentsHealth,
    SystemHealth,
}

impl From<KindArg> for ResourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Users => ResourceKind::User,
            KindArg::Experiences => ResourceKind::Experience,
            KindArg::Bookings => ResourceKind::Booking,
            KindArg::Reports => ResourceKind::Report,
            KindArg::AuditLogs => ResourceKind::AuditLog,
            KindArg::PaymentsHealth => ResourceKind::PaymentsHealth,
            KindArg::SystemHealth => ResourceKind::SystemHealth,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Role,
    Block,
    Unblock,
    Ban,
    Unban,
    Sessions,
    Status,
    Deactivate,
    Reactivate,
    Cancel,
    Refund,
    AssignToMe,
    MarkInvestigating,
    MarkHandled,
    MarkIgnored,
    PauseExperience,
    SuspendUser,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Guest,
    Host,
    Admin,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Active,
    Disabled,
    Cancelled,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

fn build_action(
    kind: ResourceKind,
    action: ActionArg,
    role: Option<RoleArg>,
    status: Option<StatusArg>,
) -> Result<AdminAction> {
    let built = match (kind, action) {
        (ResourceKind::User, ActionArg::Role) => {
            let role = match role.context("--role is required for a role change")? {
                RoleArg::Guest => UserRole::Guest,
                RoleArg::Host => UserRole::Host,
                RoleArg::Admin => UserRole::Admin,
            };
            AdminAction::User(UserAction::ChangeRole(role))
        }
        (ResourceKind::User, ActionArg::Block) => AdminAction::User(UserAction::Block),
        (ResourceKind::User, ActionArg::Unblock) => AdminAction::User(UserAction::Unblock),
        (ResourceKind::User, ActionArg::Ban) => AdminAction::User(UserAction::Ban),
        (ResourceKind::User, ActionArg::Unban) => AdminAction::User(UserAction::Unban),
        (ResourceKind::User, ActionArg::Sessions) => {
            AdminAction::User(UserAction::InvalidateSessions)
        }
        (ResourceKind::Experience, ActionArg::Status) => {
            let status = match status.context("--status is required for a status change")? {
                StatusArg::Active => ExperienceStatus::Active,
                StatusArg::Disabled => ExperienceStatus::Disabled,
                StatusArg::Cancelled => ExperienceStatus::Cancelled,
            };
            AdminAction::Experience(ExperienceAction::SetStatus(status))
        }
        (ResourceKind::Experience, ActionArg::Deactivate) => {
            AdminAction::Experience(ExperienceAction::Deactivate)
        }
        (ResourceKind::Experience, ActionArg::Reactivate) => {
            AdminAction::Experience(ExperienceAction::Reactivate)
        }
        (ResourceKind::Booking, ActionArg::Cancel) => AdminAction::Booking(BookingAction::Cancel),
        (ResourceKind::Booking, ActionArg::Refund) => AdminAction::Booking(BookingAction::Refund),
        (ResourceKind::Report, ActionArg::AssignToMe) => {
            AdminAction::Report(ReportAction::AssignToMe)
        }
        (ResourceKind::Report, ActionArg::MarkInvestigating) => {
            AdminAction::Report(ReportAction::MarkInvestigating)
        }
        (ResourceKind::Report, ActionArg::MarkHandled) => {
            AdminAction::Report(ReportAction::MarkHandled)
        }
        (ResourceKind::Report, ActionArg::MarkIgnored) => {
            AdminAction::Report(ReportAction::MarkIgnored)
        }
        (ResourceKind::Report, ActionArg::PauseExperience) => {
            AdminAction::Report(ReportAction::PauseExperience)
        }
        (ResourceKind::Report, ActionArg::SuspendUser) => {
            AdminAction::Report(ReportAction::SuspendUser)
        }
        (kind, _) => bail!("that action is not available for {}", kind),
    };
    Ok(built)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("admin_console=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ConsoleConfig::from_env()?;
    let api = Arc::new(HttpAdminApi::from_config(&config));

    // The token is only issued to admins, so holding one is the admin session
    let session = config.api_token.as_ref().map(|_| AdminSession {
        user_id: cli.operator.clone(),
        email: cli.operator.clone(),
        role: UserRole::Admin,
    });

    let console = match ConsoleController::open(session, api, Arc::new(TerminalPrompt::new()), &config) {
        AccessDecision::Granted(console) => console,
        AccessDecision::RedirectToSignIn => {
            bail!("Not signed in: set ADMIN_API_TOKEN")
        }
        AccessDecision::RedirectToLanding => bail!(ConsoleError::AccessDenied),
    };

    match cli.command {
        Command::Refresh => {
            console.refresh_all().await;
            for view in console.stores().all_views() {
                let status = match view.status() {
                    LoadStatus::Loaded => style("ok").green(),
                    LoadStatus::Errored => style("error").red(),
                    LoadStatus::Loading => style("loading").yellow(),
                    LoadStatus::Idle => style("idle").dim(),
                };
                println!("{:<18} {}", view.label(), status);
            }
        }
        Command::Search { query } => {
            let route = console.search(&query).await.map_err(|e| anyhow!(e))?;
            println!(
                "{} {} ({})",
                style("→").cyan(),
                route.kind,
                style(&route.filter).dim()
            );
            print_section(&console, route.kind);
        }
        Command::List {
            kind,
            page,
            filters,
        } => {
            let kind = ResourceKind::from(kind);
            let view = console.stores().view(kind);
            if filters.is_empty() {
                view.activate().await;
            } else {
                view.set_filters(filters.into_iter().collect::<Filters>()).await;
            }
            if let Some(page) = page {
                set_page(&console, kind, page).await?;
            }
            print_section(&console, kind);
        }
        Command::Act {
            kind,
            id,
            action,
            role,
            status,
        } => {
            let action = build_action(kind.into(), action, role, status)?;
            match console.dispatch(&id, action).await {
                DispatchOutcome::Completed => {
                    let info = console.banners().current().action_info.unwrap_or_default();
                    println!("{}", style(info).green());
                }
                DispatchOutcome::Busy => println!("{}", style("Action already in progress").yellow()),
                DispatchOutcome::Rejected(e) => bail!(e),
                DispatchOutcome::Failed(message) => bail!(message),
            }
        }
    }

    console.sign_out();
    Ok(())
}

async fn set_page(console: &ConsoleController, kind: ResourceKind, page: u32) -> Result<()> {
    let stores = console.stores();
    let result = match kind {
        ResourceKind::User => stores.users.set_page(page).await,
        ResourceKind::Experience => stores.experiences.set_page(page).await,
        ResourceKind::Booking => stores.bookings.set_page(page).await,
        ResourceKind::Report => stores.reports.set_page(page).await,
        ResourceKind::AuditLog => stores.audit_logs.set_page(page).await,
        ResourceKind::PaymentsHealth | ResourceKind::SystemHealth => Ok(()),
    };
    result.map_err(|e| anyhow!(e))
}

fn print_section(console: &ConsoleController, kind: ResourceKind) {
    let stores = console.stores();
    match kind {
        ResourceKind::User => print_rows(&stores.users.state(), |u| {
            format!("{}  {}  {}", u.id, u.email, u.role.as_str())
        }),
        ResourceKind::Experience => print_rows(&stores.experiences.state(), |e| {
            format!("{}  {}  {}", e.id, e.title, e.status.as_str())
        }),
        ResourceKind::Booking => print_rows(&stores.bookings.state(), |b| {
            format!("{}  {:?}  {}", b.id, b.status, b.guest_id.as_deref().unwrap_or("-"))
        }),
        ResourceKind::Report => print_rows(&stores.reports.state(), |r| {
            format!("{}  {:?}  {} {}  {}", r.id, r.status, r.target_type, r.target_id, r.reason)
        }),
        ResourceKind::AuditLog => print_rows(&stores.audit_logs.state(), |a| {
            format!(
                "{}  {}  {} {}  {}",
                a.created_at.format("%Y-%m-%d %H:%M"),
                a.action_type,
                a.target_type,
                a.target_id,
                a.actor_email.as_deref().unwrap_or(&a.actor_id)
            )
        }),
        ResourceKind::PaymentsHealth => print_rows(&stores.payments_health.state(), |p| {
            format!(
                "{}  failed(24h)={}  pending refunds={}",
                p.status, p.failed_last_24h, p.pending_refunds
            )
        }),
        ResourceKind::SystemHealth => print_rows(&stores.system_health.state(), |s| {
            format!("{}  uptime={}s  checks={}", s.status, s.uptime_seconds, s.checks.len())
        }),
    }
}

fn print_rows<T>(state: &ResourceState<T>, row: impl Fn(&T) -> String) {
    if let Some(error) = &state.error {
        println!("{}", style(error).red());
    }
    for item in &state.items {
        println!("  {}", row(item));
    }
    println!(
        "{}",
        style(format!(
            "page {}/{} · {} total",
            state.page,
            state.pages.max(1),
            state.total
        ))
        .dim()
    );
}
