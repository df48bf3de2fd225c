//! Inventory dashboard - CLI entry point
//!
//! Drives the dashboard engine against the on-disk preferences of one user:
//! render a preview, toggle widgets, move or resize them, and manage the
//! configuration file.

use clap::{Parser, Subcommand};
use inventory_dashboard::config::{default, xdg, Config, ConfigError, ConfigLoader, LogLevel};
use inventory_dashboard::layout::GridRect;
use inventory_dashboard::preferences::FileBackend;
use inventory_dashboard::render::{buffer_to_string, grid_height, RendererRegistry};
use inventory_dashboard::{logging, DashboardController, PreferencesStore, WidgetCatalog, WidgetId};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use std::process::ExitCode;

/// Pixels per terminal cell when previewing a container width.
const PX_PER_CELL: u32 = 8;

/// Inventory dashboard layout tool
#[derive(Parser)]
#[command(name = "invdash")]
#[command(version, about = "Inventory dashboard widget layout and preferences")]
struct Cli {
    /// User whose preferences to use (defaults to [dashboard] user)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Container width in pixels (defaults to [dashboard] width)
    #[arg(long, global = true)]
    width: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the invdash CLI
#[derive(Subcommand)]
enum Commands {
    /// Render the dashboard at the container width
    Show,

    /// List catalog widgets with visibility and position
    Widgets,

    /// Show a hidden widget or hide a visible one
    Toggle {
        /// Widget id
        id: String,
    },

    /// Drag a widget to a new grid position
    #[command(allow_negative_numbers = true)]
    Move {
        /// Widget id
        id: String,
        /// Target column
        x: i32,
        /// Target row
        y: i32,
    },

    /// Resize a widget
    #[command(allow_negative_numbers = true)]
    Resize {
        /// Widget id
        id: String,
        /// Width in columns
        w: i32,
        /// Height in rows
        h: i32,
    },

    /// Restore the default dashboard
    Reset,

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Config { action } = cli.command {
        logging::init(LogLevel::Warn);
        if let Err(e) = run_config_command(action) {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    let config = match ConfigLoader::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.logging.log_level);

    let user = cli.user.unwrap_or_else(|| config.dashboard.user.clone());
    let width = cli.width.unwrap_or(config.dashboard.width);
    let mut dashboard = open_dashboard(&config, &user, width);

    let code = match cli.command {
        Commands::Show => run_show_command(&dashboard, &user),
        Commands::Widgets => run_widgets_command(&dashboard),
        Commands::Toggle { id } => run_toggle_command(&mut dashboard, &WidgetId::from(id)),
        Commands::Move { id, x, y } => {
            let id = WidgetId::from(id);
            run_interaction(&mut dashboard, &id, "move", |d| {
                d.begin_drag(&id) && d.drag_to(x, y).is_some()
            })
        }
        Commands::Resize { id, w, h } => {
            let id = WidgetId::from(id);
            run_interaction(&mut dashboard, &id, "resize", |d| {
                d.begin_resize(&id) && d.resize_to(w, h).is_some()
            })
        }
        Commands::Reset => {
            dashboard.reset_to_defaults();
            println!("Restored default dashboard for {user}");
            ExitCode::SUCCESS
        }
        Commands::Config { .. } => ExitCode::SUCCESS,
    };

    if dashboard.store().is_session_only() {
        eprintln!(
            "Warning: could not save preferences to {}",
            dashboard.store().backend().dir().display()
        );
    }
    code
}

fn open_dashboard(config: &Config, user: &str, width: u32) -> DashboardController<FileBackend> {
    let backend = FileBackend::new(config.storage.resolved_data_dir());
    let store = PreferencesStore::new(backend, user, WidgetCatalog::builtin());
    DashboardController::mount(store, width)
}

fn run_config_command(action: ConfigAction) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init { force } => {
            let path = default::create_default_config(force)?;
            println!("Created configuration at {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", xdg::config_path().display());
        }
        ConfigAction::Validate => {
            let config = ConfigLoader::load_default()?;
            println!("Configuration is valid");
            println!("{config:#?}");
        }
    }
    Ok(())
}

/// Terminal columns used to preview a container `width_px` wide.
fn terminal_columns(width_px: u32) -> u16 {
    let columns = (width_px / PX_PER_CELL).clamp(20, 400);
    u16::try_from(columns).unwrap_or(400)
}

fn run_show_command(dashboard: &DashboardController<FileBackend>, user: &str) -> ExitCode {
    let cells = dashboard.cells();
    let breakpoint = dashboard.breakpoint();
    println!(
        "Dashboard for {} at {}px ({}, {} columns)",
        user,
        dashboard.width(),
        breakpoint,
        breakpoint.columns()
    );
    if cells.is_empty() {
        println!("No widgets visible. Use `invdash toggle <id>` to show one.");
        return ExitCode::SUCCESS;
    }

    let area = Rect::new(0, 0, terminal_columns(dashboard.width()), grid_height(&cells));
    let mut buf = Buffer::empty(area);
    dashboard.render(area, &mut buf, &RendererRegistry::new());
    print!("{}", buffer_to_string(&buf));
    ExitCode::SUCCESS
}

fn run_widgets_command(dashboard: &DashboardController<FileBackend>) -> ExitCode {
    let prefs = dashboard.preferences();
    let layout = prefs.layouts.get(dashboard.breakpoint());
    for spec in dashboard.catalog().specs() {
        let state = if prefs.is_visible(&spec.id) {
            "visible"
        } else {
            "hidden"
        };
        let position = layout
            .get(&spec.id)
            .map(|item| describe(item.rect()))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<24} {:<8} {:<20} {}", spec.id, state, position, spec.label);
    }
    ExitCode::SUCCESS
}

fn run_toggle_command(dashboard: &mut DashboardController<FileBackend>, id: &WidgetId) -> ExitCode {
    match dashboard.toggle_widget(id) {
        Some(true) => {
            println!("{id} is now visible");
            ExitCode::SUCCESS
        }
        Some(false) => {
            println!("{id} is now hidden");
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("Error: unknown widget '{id}'");
            ExitCode::FAILURE
        }
    }
}

/// Runs a one-shot begin/preview/commit and reports the widget's new rect.
fn run_interaction<F>(
    dashboard: &mut DashboardController<FileBackend>,
    id: &WidgetId,
    action: &str,
    gesture: F,
) -> ExitCode
where
    F: FnOnce(&mut DashboardController<FileBackend>) -> bool,
{
    if !gesture(dashboard) {
        dashboard.cancel_interaction();
        eprintln!(
            "Error: cannot {action} '{id}': not a visible widget on the {} layout",
            dashboard.breakpoint()
        );
        return ExitCode::FAILURE;
    }
    dashboard.commit_interaction();
    match dashboard.visible_layout().get(id) {
        Some(item) => println!("{id} is now at {}", describe(item.rect())),
        None => println!("{id} updated"),
    }
    ExitCode::SUCCESS
}

fn describe(rect: GridRect) -> String {
    format!("x={} y={} w={} h={}", rect.x, rect.y, rect.w, rect.h)
}
