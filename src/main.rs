mod app;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use symgraph_explorer::config::LayoutConfig;
use symgraph_explorer::source::GraphSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph document (`{ "nodes": [...], "edges": [...] }`), or `-` for stdin.
    #[arg(long, default_value = "graph.json")]
    graph: String,

    /// Project root used to show source excerpts of the selected symbol.
    #[arg(long)]
    source_root: Option<PathBuf>,

    /// RON file overriding layout tuning.
    #[arg(long)]
    layout_config: Option<PathBuf>,

    /// Log state transitions at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    if verbose {
        builder.filter_module("symgraph_explorer", LevelFilter::Debug);
    }
    builder.parse_default_env();
    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let layout = match &args.layout_config {
        Some(path) => LayoutConfig::load(path)
            .with_context(|| format!("cannot use layout config {}", path.display()))?,
        None => LayoutConfig::default(),
    };

    let launch = app::LaunchOptions {
        source: GraphSource::from_arg(&args.graph),
        source_root: args.source_root,
        layout,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "symgraph-explorer",
        options,
        Box::new(move |cc| Ok(Box::new(app::ExplorerApp::new(cc, launch)))),
    )
    .map_err(|error| anyhow::anyhow!("{error}"))
    .context("the explorer window failed")
}
