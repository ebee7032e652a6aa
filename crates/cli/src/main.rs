use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use host::ConsoleHost;
use serde::Serialize;
use settings::Settings;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ua_client::grafana::GrafanaApi;
use ua_client::memory::{MemoryFixture, MemoryRegistry};
use ua_client::{DashboardSearch, DataSourceRegistry, Lookup};
use ua_model::{BrowsePath, CapabilityKind, MappingRequest, Node, NodeClass, QualifiedName};
use ua_panel::{BrowseRoot, BrowserPanel, LocationUpdate, PanelState, TreeEntry};

mod host;
mod settings;

#[derive(Parser)]
#[command(name = "ua-browser")]
#[command(about = "Browse an OPC UA address space and resolve operator dashboards", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file with [panel] and [grafana] tables (default: ./ua-browser.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve resources from a JSON snapshot instead of Grafana
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Output JSON (implies --quiet)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Also resolve interfaces and equipment classes on select
    #[arg(long, global = true)]
    config_mode: bool,

    /// Browse root: objects|types
    #[arg(long, global = true)]
    root: Option<BrowseRoot>,

    /// Data source name (overrides UA_BROWSER_DATA_SOURCE)
    #[arg(long, global = true)]
    data_source: Option<String>,

    /// Grafana base URL (overrides UA_BROWSER_GRAFANA_URL)
    #[arg(long, global = true)]
    grafana_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the address-space tree, expanding lazily
    Browse(BrowseArgs),

    /// Select a node and print its type, dashboard and capabilities
    Select(SelectArgs),

    /// List the dashboard catalogue
    Dashboards,

    /// List the server namespace table
    Namespaces,

    /// Persist a node to dashboard mapping
    Map(MapArgs),
}

#[derive(Args)]
struct BrowseArgs {
    /// Start below this node instead of the configured root
    #[arg(long)]
    node: Option<String>,

    /// Levels to expand below the top level
    #[arg(long, default_value_t = 1)]
    depth: usize,
}

#[derive(Args)]
struct SelectArgs {
    /// Node id, e.g. ns=2;s=Pump1
    node_id: String,

    /// Display name reported to the host (defaults to the node id)
    #[arg(long)]
    display_name: Option<String>,
}

#[derive(Args)]
struct MapArgs {
    /// Node the dashboard is mapped to
    #[arg(long)]
    node: String,

    /// Dashboard name; without it nothing is persisted
    #[arg(long)]
    dashboard: Option<String>,

    /// Type node of the mapped node
    #[arg(long, default_value = "")]
    type_node: String,

    /// Map to the type instead of the instance
    #[arg(long)]
    use_type: bool,

    /// Interface node ids the mapping applies to (repeatable)
    #[arg(long = "interface")]
    interfaces: Vec<String>,

    /// Dashboard currently mapped, replaced by this one
    #[arg(long)]
    existing_dashboard: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let settings = load_settings(&cli)?;
    let host = Arc::new(ConsoleHost::default());
    let panel = open_panel(settings, cli.fixture.as_deref(), Arc::clone(&host)).await?;

    match cli.command {
        Commands::Browse(args) => run_browse(&panel, args, cli.json).await?,
        Commands::Select(args) => run_select(&panel, &host, args, cli.json).await?,
        Commands::Dashboards => run_dashboards(&panel, cli.json).await?,
        Commands::Namespaces => run_namespaces(&panel, cli.json).await?,
        Commands::Map(args) => run_map(&panel, args, cli.json).await?,
    }
    Ok(())
}

/// File, then environment, then flags.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_env(|key| std::env::var(key).ok());
    if let Some(root) = cli.root {
        settings.panel.root = root;
    }
    if cli.config_mode {
        settings.panel.config_mode = true;
    }
    if let Some(name) = &cli.data_source {
        settings.panel.data_source = name.clone();
    }
    if let Some(url) = &cli.grafana_url {
        settings.grafana.base_url = url.clone();
    }
    settings.validate()?;
    Ok(settings)
}

async fn open_panel(settings: Settings, fixture: Option<&Path>, host: Arc<ConsoleHost>) -> Result<BrowserPanel> {
    let (registry, search) = match fixture {
        Some(path) => fixture_backend(path, &settings.panel.data_source)?,
        None => grafana_backend(&settings)?,
    };
    let data_source = settings.panel.data_source.clone();
    let panel = BrowserPanel::new(settings.panel, registry, search, host)?;
    panel
        .cache()
        .connect()
        .await
        .with_context(|| format!("Cannot resolve data source '{data_source}'"))?;
    Ok(panel)
}

type Backend = (Arc<dyn DataSourceRegistry>, Arc<dyn DashboardSearch>);

fn fixture_backend(path: &Path, data_source: &str) -> Result<Backend> {
    let fixture = MemoryFixture::load(path)
        .with_context(|| format!("Cannot load fixture {}", path.display()))?;
    let (source, search) = fixture.into_parts();
    log::debug!("Serving '{data_source}' from {}", path.display());
    let registry: Arc<dyn DataSourceRegistry> =
        Arc::new(MemoryRegistry::new().with_source(data_source, Arc::new(source)));
    let search: Arc<dyn DashboardSearch> = Arc::new(search);
    Ok((registry, search))
}

fn grafana_backend(settings: &Settings) -> Result<Backend> {
    let api = Arc::new(GrafanaApi::new(settings.grafana.clone())?);
    log::debug!("Using Grafana at {}", settings.grafana.base_url);
    let registry: Arc<dyn DataSourceRegistry> = api.clone();
    let search: Arc<dyn DashboardSearch> = api;
    Ok((registry, search))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TreeRow {
    level: usize,
    #[serde(flatten)]
    node: Node,
    path: String,
}

async fn run_browse(panel: &BrowserPanel, args: BrowseArgs, json: bool) -> Result<()> {
    let browser = panel.browser();
    let top = match &args.node {
        Some(node_id) => browser
            .browse_children(node_id)
            .await?
            .map(|nodes| nodes.into_iter().map(TreeEntry::top_level).collect()),
        None => browser.top_level().await?,
    };
    let Lookup::Found(top) = top else {
        return print_rows(&[], json);
    };

    let mut rows = Vec::new();
    let mut stack: Vec<(TreeEntry, usize)> = top.into_iter().rev().map(|entry| (entry, 0)).collect();
    while let Some((entry, level)) = stack.pop() {
        if level < args.depth {
            match browser.expand(&entry).await? {
                Lookup::Found(children) => {
                    stack.extend(children.into_iter().rev().map(|child| (child, level + 1)));
                }
                Lookup::Empty => {}
                Lookup::NotConnected => bail!("Data source disconnected while browsing"),
            }
        }
        rows.push(TreeRow {
            level,
            path: entry.path.to_string(),
            node: entry.node,
        });
    }
    print_rows(&rows, json)
}

fn print_rows(rows: &[TreeRow], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        eprintln!("No nodes");
    }
    for row in rows {
        println!(
            "{}{} ({}) [{}]",
            "  ".repeat(row.level),
            row.node.display_name,
            row.node.node_id,
            row.node.node_class
        );
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectOutput {
    state: PanelState,
    location: Option<LocationUpdate>,
    errors: Vec<String>,
}

async fn run_select(panel: &BrowserPanel, host: &ConsoleHost, args: SelectArgs, json: bool) -> Result<()> {
    let display_name = args.display_name.unwrap_or_else(|| args.node_id.clone());
    let browse_name = QualifiedName::new(display_name.clone(), "");
    let path = BrowsePath::new().child(browse_name.clone());
    let node = Node::new(args.node_id, browse_name, display_name, NodeClass::Object);

    let report = panel.on_node_selected(node, path).await;
    let errors: Vec<String> = report.errors().map(|err| err.to_string()).collect();
    for err in &errors {
        log::warn!("{err}");
    }
    let state = panel.state();

    if json {
        let output = SelectOutput {
            state,
            location: host.last_location(),
            errors,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(node) = &state.selected_node {
        println!("Node:       {} ({})", node.display_name, node.node_id);
    }
    match &state.selected_node_type {
        Some(ty) => println!("Type:       {} ({})", ty.display_name, ty.node_id),
        None => println!("Type:       -"),
    }
    match &state.mapped_dashboard {
        Some(dashboard) if dashboard.dash_keys.is_empty() => {
            println!("Dashboard:  {} -> {}", dashboard.title, dashboard.url)
        }
        Some(dashboard) => println!(
            "Dashboard:  {} -> {} [{}]",
            dashboard.title,
            dashboard.url,
            dashboard.dash_keys.join(", ")
        ),
        None => println!("Dashboard:  -"),
    }
    if let Some(capabilities) = &state.capabilities {
        for kind in CapabilityKind::ALL {
            let label = match kind {
                CapabilityKind::Interface => "Interfaces",
                CapabilityKind::EquipmentClass => "Equipment classes",
            };
            match capabilities.get(kind) {
                Some(nodes) => {
                    let names: Vec<&str> = nodes.iter().map(|n| n.display_name.as_str()).collect();
                    println!("{label}: {}", names.join(", "));
                }
                None => println!("{label}: unsupported by server"),
            }
        }
    }
    if !errors.is_empty() {
        bail!("{} lookup(s) failed", errors.len());
    }
    Ok(())
}

async fn run_dashboards(panel: &BrowserPanel, json: bool) -> Result<()> {
    let dashboards = panel.resolver().all_dashboards().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&dashboards)?);
        return Ok(());
    }
    for dashboard in &dashboards {
        println!("{}\t{}", dashboard.title, dashboard.url);
    }
    Ok(())
}

async fn run_namespaces(panel: &BrowserPanel, json: bool) -> Result<()> {
    let namespaces = panel.client().namespaces().await?.unwrap_or_default();
    if json {
        println!("{}", serde_json::to_string_pretty(&namespaces)?);
        return Ok(());
    }
    for (index, uri) in namespaces.iter().enumerate() {
        println!("ns={index}\t{uri}");
    }
    Ok(())
}

async fn run_map(panel: &BrowserPanel, args: MapArgs, json: bool) -> Result<()> {
    let request = MappingRequest {
        node_id: args.node,
        type_node_id: args.type_node,
        use_type: args.use_type,
        interfaces: args.interfaces,
        dashboard: args.dashboard,
        existing_dashboard: args.existing_dashboard,
    };
    let success = panel
        .client()
        .add_dashboard_mapping(&request)
        .await
        .with_context(|| format!("Mapping for '{}' failed", request.node_id))?
        .unwrap_or_default();

    if json {
        println!("{}", serde_json::json!({ "success": success }));
    } else if success {
        println!("Mapped {}", request.node_id);
    } else {
        println!("Nothing mapped for {}", request.node_id);
    }
    Ok(())
}
