mod app;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use classviz::config::{DEFAULT_LOCALE, ViewerConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Dataset JSON (inheritance structure, classes, properties, prefixes).
    dataset: PathBuf,

    /// Preferred label language.
    #[arg(long, default_value = DEFAULT_LOCALE)]
    locale: String,

    /// Hide leaf classes with fewer instances than this.
    #[arg(long, default_value_t = 1)]
    lower_limit: u64,

    /// Newline-separated class URIs to drop before layout.
    #[arg(long)]
    blacklist_classes: Option<PathBuf>,

    /// Newline-separated namespace prefixes to drop before layout.
    #[arg(long)]
    blacklist_prefixes: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .init();

    let args = Args::parse();
    let config = ViewerConfig::default()
        .with_locale(args.locale.clone())
        .with_lower_limit(args.lower_limit);
    let source = app::DatasetSource {
        dataset: args.dataset,
        blacklist_classes: args.blacklist_classes,
        blacklist_prefixes: args.blacklist_prefixes,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "classviz",
        options,
        Box::new(move |cc| Ok(Box::new(app::ClassVizApp::new(cc, source, config)))),
    )
}
