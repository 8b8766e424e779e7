use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "seedsim", version)]
struct Cli {
    /// Log debug output (per-layer progress, graph sizes) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve and print the render order without rendering.
    Order(OrderArgs),
    /// Render every layer and print the registry contents in insertion order.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct OrderArgs {
    /// Input manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print a JSON array instead of one name per line.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print a JSON report (order, stats, registry keys) instead of plain text.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Order(args) => cmd_order(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_manifest(path: &Path) -> anyhow::Result<seedsim::Manifest> {
    let manifest = seedsim::Manifest::from_path(path)
        .with_context(|| format!("load manifest '{}'", path.display()))?;
    manifest
        .validate()
        .with_context(|| format!("validate manifest '{}'", path.display()))?;
    Ok(manifest)
}

fn cmd_order(args: OrderArgs) -> anyhow::Result<()> {
    let manifest = read_manifest(&args.in_path)?;

    let mut renderer = seedsim::Renderer::new();
    for layer in manifest.into_layers() {
        renderer.add_layer(layer)?;
    }
    let order = renderer.plan().context("resolve render order")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&order)?);
    } else {
        for name in order.iter() {
            println!("{name}");
        }
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let manifest = read_manifest(&args.in_path)?;

    let mut registry = seedsim::Registry::new();
    let report = seedsim::Renderer::run(manifest.into_layers(), &mut registry)
        .context("render layers")?;

    if args.json {
        let out = serde_json::json!({
            "order": report.order,
            "stats": report.stats,
            "registry": registry.keys().collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("order: {}", report.order);
        for key in registry.keys() {
            println!("{key}");
        }
        eprintln!(
            "rendered {} layer(s), {} artifact(s)",
            report.stats.layers_rendered,
            registry.len()
        );
    }
    Ok(())
}
