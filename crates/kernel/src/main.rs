//! Waymark CLI
//!
//! Loads menu definitions and renders them as a given user would see them.
//!
//! Usage:
//!   waymark --file menus.yaml --permission CLAIMS render --path /import/claim/new
//!   waymark --file menus.yaml --anonymous check --path /admin

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use waymark_kernel::menu::{Format, MenuFile};
use waymark_kernel::{
    Authorizer, CachingAuthorizer, Config, MenuBinding, MenuItem, MenuPermissionService,
    MenuRegistry, RouteGate, RouteProtections, StaticAuthorizer,
};

/// Command line arguments. Flags override the environment.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Menu definition file (JSON or YAML).
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Route protection file (JSON or YAML); defaults to the menu file's routes.
    #[arg(long, global = true)]
    routes: Option<PathBuf>,

    /// Permission held by the simulated user. Repeatable.
    #[arg(long = "permission", global = true)]
    permissions: Vec<String>,

    /// Simulate a signed-out user.
    #[arg(long, global = true)]
    anonymous: bool,

    /// Simulate a signed-in user even when WAYMARK_ANONYMOUS is set.
    #[arg(long, global = true, conflicts_with = "anonymous")]
    signed_in: bool,

    /// Disable authorization entirely (nothing is filtered or gated).
    #[arg(long, global = true)]
    no_auth: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a menu filtered for the user and marked for a path.
    Render {
        /// Menu name (default from WAYMARK_DEFAULT_MENU).
        #[arg(long)]
        menu: Option<String>,

        /// Current path.
        #[arg(long, default_value = "/")]
        path: String,

        /// Print JSON instead of an indented tree.
        #[arg(long)]
        json: bool,
    },
    /// Print whether the user may navigate to a path.
    Check {
        #[arg(long)]
        path: String,
    },
    /// List the defined menus.
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Args::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let menu_path = args.file.as_ref().unwrap_or(&config.menu_file);
    let file = MenuFile::load(menu_path)?;

    let routes = match args.routes.as_ref().or(config.routes_file.as_ref()) {
        Some(path) => load_routes(path)?,
        None => file.routes.clone(),
    };

    let registry = MenuRegistry::global();
    let shown = menu_path.display();
    file.register(registry)
        .with_context(|| format!("invalid menu definitions in {shown}"))?;
    info!(
        menus = registry.len(),
        protected_routes = routes.len(),
        "Menus loaded"
    );

    let authorizer = build_authorizer(&args, &config);
    let routes = Arc::new(routes);

    match args.command {
        Command::Render { menu, path, json } => {
            let name = menu.unwrap_or(config.default_menu);
            let menu = registry
                .menu(&name)
                .with_context(|| format!("menu '{name}' is not defined"))?;

            let service = MenuPermissionService::new(routes, authorizer);
            let binding = MenuBinding::new(menu, service);
            binding.route_changed(&path).await;
            let view = binding.current();

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{} ({})", view.text(), binding.menu().template());
                print_tree(&view, 1);
            }
        }
        Command::Check { path } => {
            let gate = RouteGate::new(routes, authorizer);
            let access = gate.check(&path).await;
            println!(
                "{path}: {}",
                serde_json::to_string(&access)?.trim_matches('"')
            );
        }
        Command::List => {
            for name in registry.names() {
                if let Some(menu) = registry.menu(&name) {
                    let items = menu.read(MenuItem::count) - 1;
                    println!("{name:<20} {items:<6} {}", menu.template());
                }
            }
        }
    }

    Ok(())
}

fn build_authorizer(args: &Args, config: &Config) -> Option<Arc<dyn Authorizer>> {
    if args.no_auth {
        return None;
    }

    let anonymous = !args.signed_in && (args.anonymous || config.anonymous);
    let user = if anonymous {
        StaticAuthorizer::anonymous()
    } else if args.permissions.is_empty() {
        StaticAuthorizer::authenticated(config.permissions.clone())
    } else {
        StaticAuthorizer::authenticated(args.permissions.clone())
    };

    Some(Arc::new(CachingAuthorizer::new(user)))
}

fn load_routes(path: &Path) -> Result<RouteProtections> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read routes file {}", path.display()))?;

    let routes = match Format::from_path(path)? {
        Format::Json => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse routes file {}", path.display()))?,
        Format::Yaml => serde_yml::from_str(&contents)
            .with_context(|| format!("failed to parse routes file {}", path.display()))?,
    };

    Ok(routes)
}

fn print_tree(item: &MenuItem, depth: usize) {
    for child in item.items() {
        let marker = if child.is_active() { '*' } else { ' ' };
        println!(
            "{marker} {:indent$}{} {}",
            "",
            child.text(),
            child.link().unwrap_or(""),
            indent = (depth - 1) * 2
        );
        print_tree(child, depth + 1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
