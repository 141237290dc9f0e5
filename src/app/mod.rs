use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use anyhow::Context as _;
use eframe::egui::{self, Context};
use log::{debug, error, info};

use symgraph_explorer::config::LayoutConfig;
use symgraph_explorer::graph::GraphOverview;
use symgraph_explorer::layout::DragHandle;
use symgraph_explorer::source::{GraphSource, load_graph};
use symgraph_explorer::sync::{SyncEvent, ViewSyncCoordinator};
use symgraph_explorer::{EngineOptions, GraphData, GraphEngine};

mod graph;
mod render_utils;
mod ui;

use ui::{CodePanel, DetailPanel, SearchPanel, TreePanel};

pub struct LaunchOptions {
    pub source: GraphSource,
    pub source_root: Option<PathBuf>,
    pub layout: LayoutConfig,
}

pub struct ExplorerApp {
    launch: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<Result<GraphData, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<GraphData, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    engine: GraphEngine,
    sync: ViewSyncCoordinator,
    intents: Sender<SyncEvent>,
    /// The store never changes after load, so neither do its counts.
    overview: GraphOverview,
    search: SearchPanel,
    tree: TreePanel,
    detail: DetailPanel,
    code: CodePanel,
    layout_draft: LayoutConfig,
    drag: Option<DragHandle>,
    draw_order: Option<(u64, Vec<usize>)>,
}

impl ViewModel {
    fn new(data: GraphData, launch: &LaunchOptions) -> anyhow::Result<Self> {
        let sync = ViewSyncCoordinator::new();
        let engine = GraphEngine::init(
            data,
            EngineOptions {
                on_select: Some(sync.selection_callback()),
                on_tick: None,
                layout: launch.layout,
            },
        )
        .context("the graph data cannot be displayed")?;

        let tree = TreePanel::new(engine.store());
        info!("{}", engine.status_line());

        Ok(Self {
            intents: sync.sender(),
            overview: engine.store().overview(),
            layout_draft: *engine.layout_config(),
            sync,
            search: SearchPanel::default(),
            tree,
            detail: DetailPanel::default(),
            code: CodePanel::new(launch.source_root.clone()),
            engine,
            drag: None,
            draw_order: None,
        })
    }

    /// Applies queued intents and fans the resulting selection out to the
    /// panels. Returns how many events were handled.
    fn pump(&mut self) -> usize {
        self.sync.pump(
            &mut self.engine,
            &mut [&mut self.tree, &mut self.detail, &mut self.code],
        )
    }

    fn post(&self, event: SyncEvent) {
        send_intent(&self.intents, event);
    }
}

/// Queues an intent for the coordinator's next pump.
fn send_intent(intents: &Sender<SyncEvent>, event: SyncEvent) {
    if let Err(error) = intents.send(event) {
        error!("view sync channel closed, dropping {:?}", error.0);
    }
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, launch: LaunchOptions) -> Self {
        let state = Self::start_load(launch.source.clone());
        Self {
            launch,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: GraphSource) -> Receiver<Result<GraphData, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_graph(&source).map_err(|error| format!("{:#}", anyhow::Error::new(error)));
            if tx.send(result).is_err() {
                debug!("graph load finished after the viewer stopped waiting");
            }
        });

        rx
    }

    fn start_load(source: GraphSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready_state(&self, result: Result<GraphData, String>) -> AppState {
        let model = result.and_then(|data| {
            ViewModel::new(data, &self.launch).map_err(|error| format!("{error:#}"))
        });
        match model {
            Ok(model) => AppState::Ready(Box::new(model)),
            Err(error) => {
                error!("{error}");
                AppState::Error(error)
            }
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut loaded = None;
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => loaded = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Loading symbol graph from {}...", self.launch.source));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the symbol graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.launch.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.launch.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.launch.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => loaded = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = loaded {
            transition = Some(self.ready_state(result));
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
            ctx.request_repaint();
        }
    }
}
