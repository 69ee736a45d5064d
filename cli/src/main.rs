//! Biblioteca Universitaria administration console
//!
//! Mounts one console page per invocation against the web application.
//!
//! ```sh
//! # Dashboard counters (default config ~/.config/biblioteca-admin/config.toml)
//! biblioteca-admin stats
//!
//! # Approve a pre-registration without prompting
//! biblioteca-admin --yes moderate approve 42
//!
//! # Filter the users table and suspend two accounts
//! biblioteca-admin users --estado activo --suspend 3 --suspend 7
//! ```

mod terminal;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use biblioteca_admin::application::forms::{load_draft, FormKind, StaffForm, SubmitOutcome};
use biblioteca_admin::application::operations::{service_class, usage_class, ExportTable};
use biblioteca_admin::application::{
    ChartPeriod, Dashboard, MessageBridge, Moderation, ModerationAction, ModerationOutcome,
    StaffFormSubmitter, SuperuserOperations, ThemeToggle, UsersChart, UsersManagement,
};
use biblioteca_admin::config::{resolve_config_path, AppConfig, LoggingConfig, CONFIG_ENV};
use biblioteca_admin::domain::FilterState;
use biblioteca_admin::infrastructure::{
    ApiClient, Downloads, FileStore, SharedLocalStore, SimulatedUserGateway,
};
use biblioteca_admin::support::init_tracing;
use biblioteca_admin::{AppError, AppResult, NotificationCenter};

use terminal::{print_event, TerminalDialogs};

/// Administration console for the university library.
#[derive(Parser, Debug)]
#[command(
    name = "biblioteca-admin",
    version,
    about = "Administration console for the university library",
    long_about = "Runs the superuser and users-management pages of the library \
                  web application from the terminal.\n\n\
                  Default config: ~/.config/biblioteca-admin/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Answer every confirmation with yes.
    #[arg(short, long, global = true)]
    yes: bool,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dashboard statistics.
    Stats {
        /// Keep refreshing until Ctrl+C.
        #[arg(long)]
        watch: bool,
    },
    /// Request a full backup.
    Backup,
    /// Download tables as an Excel workbook.
    Export {
        /// users, books, loans, employees (default: users books loans)
        tablas: Vec<String>,
    },
    /// Recent security events.
    Logs,
    /// Server, database and service status.
    Health,
    /// Save a plain-text system report.
    Report,
    /// Users-growth chart configuration as JSON.
    Chart {
        #[arg(long, default_value = "month")]
        periodo: String,
    },
    /// Moderate a pre-registration or an account.
    Moderate {
        /// approve, reject, block, activate
        action: String,
        id: u64,
        /// Reason for reject/block (prompted when omitted).
        #[arg(long)]
        motivo: Option<String>,
    },
    /// Show or switch the colour scheme.
    Theme {
        #[arg(long)]
        toggle: bool,
    },
    /// Users-management table.
    Users(UsersArgs),
    /// Create an administrator or employee account.
    Create {
        /// admin or employee
        kind: String,
        /// Field values as name=value.
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
        /// Start from the locally saved draft.
        #[arg(long)]
        draft: bool,
    },
    /// Show server flash messages given as JSON.
    Messages { json: String },
}

#[derive(clap::Args, Debug)]
struct UsersArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "")]
    tipo: String,
    #[arg(long, default_value = "")]
    estado: String,
    /// today, week, month, year
    #[arg(long, default_value = "")]
    fecha: String,
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Show the details of one user.
    #[arg(long)]
    details: Option<u32>,
    #[arg(long)]
    activate: Vec<u32>,
    #[arg(long)]
    suspend: Vec<u32>,
    #[arg(long)]
    delete: Vec<u32>,
    #[arg(long)]
    reset_password: Option<u32>,
    /// Export the selected users (all loaded users when nothing is selected).
    #[arg(long)]
    export: bool,
}

/// Everything a page needs, built once per invocation
struct Console {
    config: AppConfig,
    client: ApiClient,
    notifications: NotificationCenter,
    dialogs: Arc<TerminalDialogs>,
    store: SharedLocalStore,
    downloads: Downloads,
}

impl Console {
    fn operations(&self) -> SuperuserOperations {
        SuperuserOperations::new(
            self.client.clone(),
            self.dialogs.clone(),
            self.notifications.clone(),
            self.downloads.clone(),
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = resolve_config_path(cli.config.clone());
    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            let mut logging = cfg.logging.clone();
            if let Some(level) = &cli.log_level {
                logging.level = level.clone();
            }
            init_tracing(&logging);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            init_tracing(&LoggingConfig {
                level: cli.log_level.clone().unwrap_or_else(|| "warn".to_string()),
                ..LoggingConfig::default()
            });
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Wire the console ───────────────────────────────────────
    let preset_reason = match &cli.command {
        Command::Moderate { motivo, .. } => motivo.clone(),
        _ => None,
    };
    let console = Console {
        client: ApiClient::new(&config.server)?,
        notifications: NotificationCenter::new(config.notifications.clone()),
        dialogs: Arc::new(TerminalDialogs::new(cli.yes, preset_reason)),
        store: Arc::new(FileStore::open(config.storage.local_store_path())),
        downloads: Downloads::new(config.storage.downloads_dir()),
        config,
    };

    // Banners are printed while the page runs
    let mut events = console.notifications.bus().subscribe();
    let run = run(&console, cli.command);
    tokio::pin!(run);
    let result = loop {
        tokio::select! {
            result = &mut run => break result,
            Some(message) = events.recv() => print_event(&message),
        }
    };
    while let Some(message) = events.try_recv() {
        print_event(&message);
    }

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_cancelled() => {
            println!("Operación cancelada");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            Err(e.into())
        }
    }
}

async fn run(console: &Console, command: Command) -> AppResult<()> {
    match command {
        Command::Stats { watch } => stats(console, watch).await,
        Command::Backup => {
            if let Some(info) = console.operations().backup().await? {
                println!("{} ({})", info.filename, info.size);
            }
            Ok(())
        }
        Command::Export { tablas } => {
            let tables = if tablas.is_empty() {
                ExportTable::DEFAULT_SELECTION.to_vec()
            } else {
                tablas
                    .iter()
                    .map(|t| t.parse::<ExportTable>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(validation)?
            };
            let path = console
                .operations()
                .export_excel(&tables, Local::now().date_naive())
                .await?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Logs => {
            let logs = console.operations().security_logs().await?;
            println!("Mostrando últimos {} eventos", logs.len());
            if logs.is_empty() {
                println!("No hay logs disponibles");
            }
            for log in logs {
                println!(
                    "{:<20} {:<9} {:<15} {:<16} {}",
                    log.timestamp, log.nivel, log.usuario, log.ip, log.evento
                );
            }
            Ok(())
        }
        Command::Health => health(console).await,
        Command::Report => {
            let path = console
                .operations()
                .download_report(Utc::now(), Local::now().date_naive())
                .await?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Chart { periodo } => {
            let period: ChartPeriod = periodo.parse().map_err(validation)?;
            let mut chart = UsersChart::new(console.client.clone(), console.notifications.clone());
            chart.update_period(period).await;
            let config = chart.chart().to_config();
            println!(
                "{}",
                serde_json::to_string_pretty(&config)
                    .map_err(|e| AppError::Infra(e.into()))?
            );
            Ok(())
        }
        Command::Moderate { action, id, .. } => {
            let action: ModerationAction = action.parse().map_err(validation)?;
            let moderation = Moderation::new(
                console.client.clone(),
                console.dialogs.clone(),
                console.notifications.clone(),
                console.config.moderation.clone(),
            );
            match moderation.run(action, id).await? {
                ModerationOutcome::ReloadAfter(delay) => {
                    tokio::time::sleep(delay).await;
                    println!("Recargando listado...");
                }
                ModerationOutcome::Aborted => println!("Operación cancelada"),
                ModerationOutcome::Failed(_) => {}
            }
            Ok(())
        }
        Command::Theme { toggle } => {
            let mut theme = ThemeToggle::mount(console.store.clone());
            let view = if toggle { theme.toggle()? } else { theme.view() };
            println!("data-bs-theme={} icon=\"{}\"", view.attribute, view.icon);
            Ok(())
        }
        Command::Users(args) => users(console, args).await,
        Command::Create {
            kind,
            fields,
            draft,
        } => create(console, &kind, &fields, draft).await,
        Command::Messages { json } => {
            let bridge = MessageBridge::new(console.notifications.clone());
            let shown = bridge.deliver_deferred(&json).await;
            info!(shown, "Messages delivered");
            Ok(())
        }
    }
}

fn validation(message: String) -> AppError {
    biblioteca_admin::domain::DomainError::Validation(message).into()
}

async fn stats(console: &Console, watch: bool) -> AppResult<()> {
    let dashboard = Arc::new(Dashboard::new(
        console.client.clone(),
        console.notifications.clone(),
        console.config.dashboard.clone(),
    ));
    let Some(counters) = dashboard.mount().await else {
        return Ok(());
    };
    for (key, animation) in counters {
        println!("{:<20} {}", key, animation.label_at(animation.duration));
    }
    if let Some(pending) = dashboard.stats().and_then(|s| s.preregistros_pendientes) {
        println!("{:<20} {}", "preregistros_pendientes", pending);
    }
    if let Some(label) = dashboard.last_update_label() {
        println!("{}", label);
    }

    if watch {
        let polling = dashboard.spawn_polling();
        let _ = tokio::signal::ctrl_c().await;
        dashboard.unmount();
        let _ = polling.await;
    }
    Ok(())
}

async fn health(console: &Console) -> AppResult<()> {
    let status = console.operations().system_status().await?;
    if let Some(server) = status.servidor {
        for (name, percent) in server.bars() {
            println!("{:<10} {:>5.1}%  {}", name, percent, usage_class(percent));
        }
    }
    if let Some(db) = status.base_datos {
        println!(
            "Base de datos: {} | conexiones {} | tamaño {} | último backup {}",
            db.estado, db.conexiones, db.tamano, db.ultimo_backup
        );
    }
    for (service, state) in &status.servicios {
        println!("{:<20} {:<12} {}", service, state, service_class(state));
    }
    for (key, value) in &status.informacion {
        println!("{}: {}", key, value);
    }
    Ok(())
}

async fn users(console: &Console, args: UsersArgs) -> AppResult<()> {
    let users_config = console.config.users.clone();
    let gateway = Arc::new(SimulatedUserGateway::new(
        Duration::from_millis(users_config.simulated_latency_ms),
        users_config.sample_size,
    ));
    let page = UsersManagement::new(
        gateway,
        console.dialogs.clone(),
        console.notifications.clone(),
        users_config,
    );
    page.mount().await?;

    let filter = FilterState::from_inputs(&args.search, &args.tipo, &args.estado, &args.fecha)?;
    page.set_filters(filter);

    if let Some(id) = args.details {
        let details = page.view_details(id)?;
        println!("{} {} ({})", details.id, details.full_name, details.username);
        println!("  Email: {}  CI: {}  Teléfono: {}", details.email, details.ci, details.phone);
        println!("  Tipo: {}  Estado: {}", details.type_label, details.status_label);
        println!("  Registro: {}  Último acceso: {}", details.registered, details.last_access);
        return Ok(());
    }
    if let Some(id) = args.reset_password {
        page.reset_password(id).await?;
    }

    let bulk = [
        (args.activate.as_slice(), BulkAction::Activate),
        (args.suspend.as_slice(), BulkAction::Suspend),
        (args.delete.as_slice(), BulkAction::Delete),
    ];
    for (ids, action) in bulk {
        if ids.is_empty() {
            continue;
        }
        page.clear_selection();
        for id in ids {
            page.toggle_user(*id, true);
        }
        match action {
            BulkAction::Activate => page.bulk_activate().await?,
            BulkAction::Suspend => page.bulk_suspend().await?,
            BulkAction::Delete => page.bulk_delete().await?,
        }
    }

    if args.export {
        let path = if page.selected_count() > 0 {
            page.bulk_export(&console.downloads)?
        } else {
            page.export_all(&console.downloads)?
        };
        println!("{}", path.display());
    }

    let now = Utc::now();
    let result = page.go_to_page(args.page);
    for user in &result.items {
        println!(
            "{:<5} {:<12} {:<24} {:<14} {:<11} {}",
            user.display_id(),
            user.username,
            user.full_name(),
            user.user_type.as_str(),
            user.status.as_str(),
            user.last_access_label(now)
        );
    }
    println!("{}", page.pagination_label());
    Ok(())
}

enum BulkAction {
    Activate,
    Suspend,
    Delete,
}

async fn create(console: &Console, kind: &str, fields: &[String], draft: bool) -> AppResult<()> {
    let kind = match kind {
        "admin" | "administrador" => FormKind::Administrator,
        "employee" | "empleado" => FormKind::Employee,
        other => return Err(validation(format!("unknown form: {}", other))),
    };

    let mut form = if draft {
        load_draft(&console.store, kind)
            .unwrap_or_else(|| StaffForm::new(kind, Local::now().date_naive()))
    } else {
        StaffForm::new(kind, Local::now().date_naive())
    };
    for pair in fields {
        let Some((name, value)) = pair.split_once('=') else {
            return Err(validation(format!("expected FIELD=VALUE, got {}", pair)));
        };
        if !form.set(name.trim(), value) {
            return Err(validation(format!("unknown field: {}", name)));
        }
    }

    let submitter = StaffFormSubmitter::new(
        console.client.clone(),
        console.dialogs.clone(),
        console.notifications.clone(),
        console.store.clone(),
    );
    match submitter.submit(&form).await? {
        SubmitOutcome::Invalid(report) => {
            for (field, message) in &report.errors {
                println!("  {}: {}", field, message);
            }
        }
        SubmitOutcome::FieldErrors(_) | SubmitOutcome::Rejected(_) | SubmitOutcome::Created => {}
        SubmitOutcome::DraftSaved => println!("Borrador guardado"),
        SubmitOutcome::Failed(e) => return Err(e.into()),
    }
    Ok(())
}
