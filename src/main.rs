//! Tabmark - Command Line Entry Point
//!
//! Opens a Markdown file the way an editor tab would and prints what that
//! tab shows.
//!
//! ```text
//! tabmark <file> [md|split|preview] [--stats]
//! ```

use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use tabmark::config::load_config;
use tabmark::surface::TextSurface;
use tabmark::{Error, Result, TabSet, ViewMode};

/// Application name constant.
const APP_NAME: &str = "tabmark";

struct Args {
    path: PathBuf,
    mode: ViewMode,
    stats: bool,
}

fn parse_args() -> Result<Args> {
    let mut path = None;
    let mut mode = ViewMode::PreviewOnly;
    let mut stats = false;

    for arg in std::env::args().skip(1) {
        if arg == "--stats" {
            stats = true;
        } else if let Some(parsed) = ViewMode::from_tag(&arg) {
            mode = parsed;
        } else if path.is_none() {
            path = Some(PathBuf::from(arg));
        } else {
            return Err(Error::Application(format!("unexpected argument '{}'", arg)));
        }
    }

    let path = path.ok_or_else(|| {
        Error::Application(format!("usage: {} <file> [md|split|preview] [--stats]", APP_NAME))
    })?;
    Ok(Args { path, mode, stats })
}

fn run() -> Result<()> {
    let args = parse_args()?;
    let mut tabs = TabSet::new(load_config());

    let index = tabs.open_file(&args.path)?;
    let tab = tabs
        .tab_mut(index)
        .ok_or_else(|| Error::Application("tab vanished after opening".to_string()))?;
    tab.set_mode(args.mode);
    info!("Opened '{}' in {} mode", tab.title(), args.mode.tag());

    if args.stats {
        println!("{}", tab.stats().format_compact());
        println!("line endings: {}", tab.line_ending().label());
        return Ok(());
    }

    let view = tab.view();
    let output = match args.mode {
        ViewMode::RawEditor => view.raw_surface().text(),
        ViewMode::SplitView => view.split_preview().html().to_string(),
        ViewMode::PreviewOnly => view.full_preview().html().to_string(),
    };
    println!("{}", output);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
