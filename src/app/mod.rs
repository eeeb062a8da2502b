use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use eframe::egui::{self, Context, Pos2, Rect};

use classviz::config::{LAYOUT_DIAMETER, ViewerConfig};
use classviz::dataset::{Blacklist, Content, filter_by_entities, filter_content};
use classviz::graph::{GraphRepository, Triple, UpdateOutcome};
use classviz::layout::Layout;
use classviz::state::{Action, DetailState, ViewState};
use classviz::tree::TreeRepository;
use classviz::util::Debouncer;

mod graph;
mod render_utils;
mod ui;

/// Where the dataset and its optional blacklists live on disk.
#[derive(Clone, Debug)]
pub struct DatasetSource {
    pub dataset: PathBuf,
    pub blacklist_classes: Option<PathBuf>,
    pub blacklist_prefixes: Option<PathBuf>,
}

pub struct ClassVizApp {
    source: DatasetSource,
    config: ViewerConfig,
    state: AppState,
}

enum AppState {
    Loading { rx: Receiver<Result<Content, String>> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    content: Content,
    config: ViewerConfig,
    view: ViewState,
    graph: GraphRepository,
    tree: TreeRepository,
    /// Detail snapshot the graph was last updated with (tree flag ignored).
    applied_detail: Option<DetailState>,
    now: f64,
    query: String,
    filter_draft: u64,
    search_debounce: Debouncer<String>,
    hover_debounce: Debouncer<Pos2>,
    settle_debounce: Debouncer<()>,
    hovered_line: Option<usize>,
    canvas_rect: Rect,
    context_target: Option<ContextTarget>,
}

/// What the canvas context menu was opened on.
#[derive(Clone, Debug)]
enum ContextTarget {
    Class(String),
    Relation(Triple),
}

impl ClassVizApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: DatasetSource, config: ViewerConfig) -> Self {
        let state = Self::start_load(source.clone());
        Self { source, config, state }
    }

    fn spawn_load(source: DatasetSource) -> Receiver<Result<Content, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_content(&source).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: DatasetSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }
}

fn load_content(source: &DatasetSource) -> anyhow::Result<Content> {
    let mut content = Content::load(&source.dataset)
        .with_context(|| format!("loading dataset {}", source.dataset.display()))?;
    let blacklist = Blacklist::from_files(
        source.blacklist_classes.as_deref(),
        source.blacklist_prefixes.as_deref(),
    )
    .context("loading blacklist")?;

    if !blacklist.is_empty() {
        let prefixes = content.prefixes.clone();
        let removed = filter_content(&mut content, |uri| blacklist.has(uri, &prefixes));
        tracing::debug!(removed, "applied blacklist");
    }
    if content.is_empty() {
        anyhow::bail!("dataset {} has no classes", source.dataset.display());
    }
    Ok(content)
}

impl eframe::App for ClassVizApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(content) => AppState::Ready(Box::new(ViewModel::new(content, self.config.clone()))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading class hierarchy...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint_after(Duration::from_millis(100));
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(content: Content, config: ViewerConfig) -> Self {
        let mut view = ViewState::default();
        view.reduce(
            &Action::FilterClasses(config.lower_limit_of_entities),
            &content.classes,
        );

        let layout = build_layout(&content, view.filter.lower_limit_of_class_entities);
        let tree = TreeRepository::new(&layout, content.classes.clone(), &config);
        let graph = GraphRepository::new(layout, content.classes.clone(), &config);

        Self {
            filter_draft: view.filter.lower_limit_of_class_entities,
            search_debounce: Debouncer::new(config.search_debounce_secs),
            hover_debounce: Debouncer::new(config.hover_debounce_secs),
            settle_debounce: Debouncer::new(config.hover_debounce_secs),
            content,
            config,
            view,
            graph,
            tree,
            applied_detail: None,
            now: 0.0,
            query: String::new(),
            hovered_line: None,
            canvas_rect: Rect::NOTHING,
            context_target: None,
        }
    }

    /// Reduces `action` and brings both repositories in line with the new
    /// state. Follow-up actions raised by the repositories run afterwards.
    fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            let refilter = matches!(action, Action::FilterClasses(_));
            self.view.reduce(&action, &self.content.classes);
            if refilter {
                self.rebuild_layout();
            }
            if let Some(next) = self.sync() {
                queue.push_back(next);
            }
        }
    }

    fn sync(&mut self) -> Option<Action> {
        let mut follow_up = None;
        let animate = self.applied_detail.is_some();
        let detail = DetailState {
            show_tree: false,
            ..self.view.detail.clone()
        };

        if self.applied_detail.as_ref() != Some(&detail) {
            match self.graph.update(&detail, animate, self.now) {
                UpdateOutcome::Dispatch(action) => follow_up = Some(action),
                UpdateOutcome::Busy => tracing::warn!("graph update skipped while busy"),
                UpdateOutcome::Shown => {}
            }
            self.applied_detail = Some(detail);
        }

        if self.view.detail.show_tree {
            let focusing = self
                .view
                .detail
                .focusing_uri
                .as_ref()
                .and(self.graph.target_key());
            if !self.tree.show(focusing, self.now) {
                follow_up = follow_up.or(Some(Action::HideTree));
            }
        }

        follow_up
    }

    fn rebuild_layout(&mut self) {
        let layout = build_layout(&self.content, self.view.filter.lower_limit_of_class_entities);
        self.tree.replace_layout(&layout, self.content.classes.clone());
        self.graph.replace_layout(layout, self.content.classes.clone());
        if let (Some(width), Some(height), Some(diameter)) = (
            self.view.ui.width,
            self.view.ui.height,
            self.view.ui.circle_diameter,
        ) {
            self.graph.on_resize(width, height, diameter);
        }
        self.applied_detail = None;
    }

    /// Fires debounced input and advances running transitions.
    fn advance(&mut self, ctx: &Context) {
        self.now = ctx.input(|input| input.time);

        if let Some(query) = self.search_debounce.poll(self.now) {
            self.dispatch(Action::UpdateQuery(query));
        }
        if self.settle_debounce.poll(self.now).is_some() {
            self.graph.settle();
        }
        if let Some(pointer) = self.hover_debounce.poll(self.now) {
            self.evaluate_hover(pointer);
        }

        let graph_moving = self.graph.tick(self.now);
        let tree_moving = self.tree.tick(self.now);
        if graph_moving || tree_moving {
            ctx.request_repaint();
        }

        let pending = [
            self.search_debounce.remaining(self.now),
            self.settle_debounce.remaining(self.now),
            self.hover_debounce.remaining(self.now),
        ];
        if let Some(wait) = pending.into_iter().flatten().reduce(f64::min) {
            ctx.request_repaint_after(Duration::from_secs_f64(wait));
        }
    }
}

fn build_layout(content: &Content, lower_limit: u64) -> Layout {
    let filtered = filter_by_entities(content, lower_limit);
    Layout::build(&filtered.inheritance_structure, &filtered.classes, LAYOUT_DIAMETER)
}
