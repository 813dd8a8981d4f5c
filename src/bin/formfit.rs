//! Diagnostic driver: runs the fit pass over a form described in JSON and
//! prints the resulting geometry.
//!
//! Useful for reproducing discovery decisions outside a toolkit. Merge
//! traces go to stderr via `RUST_LOG=formfit=trace`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use formfit::common::config::Settings;
use formfit::common::log;
use formfit::geometry::{Orientation, Rect};
use formfit::widget::{WidgetHost, WidgetId};
use formfit::{Engine, FitReport};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(about = "Run the fit-to-content pass over a JSON form description")]
struct Cli {
    /// Form description file (see `Form` for the schema).
    form: PathBuf,

    /// Engine settings in TOML. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log the discovered cell tree of every pass.
    #[arg(long)]
    dump_cells: bool,

    /// Run the horizontal pass only.
    #[arg(long)]
    horizontal_only: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
struct FormRect {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl From<FormRect> for Rect {
    fn from(r: FormRect) -> Rect { Rect::new(r.x, r.y, r.w, r.h) }
}

impl From<Rect> for FormRect {
    fn from(r: Rect) -> FormRect {
        FormRect {
            x: r.left(),
            y: r.top(),
            w: r.size.width,
            h: r.size.height,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct FormWidget {
    id: u32,
    frame: FormRect,
    /// Parent widget id; top-level when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_height: Option<i32>,
    #[serde(default = "yes")]
    elastic: bool,
    #[serde(default)]
    container: bool,
}

fn yes() -> bool { true }

#[derive(Serialize, Deserialize, Debug)]
struct Form {
    window: FormRect,
    widgets: Vec<FormWidget>,
}

/// In-memory host over a parsed form. The window itself is widget 0.
struct FormHost {
    window: Rect,
    entries: Vec<FormWidget>,
}

const WINDOW_ID: WidgetId = WidgetId(0);

impl FormHost {
    fn new(form: Form) -> anyhow::Result<FormHost> {
        anyhow::ensure!(
            form.widgets.iter().all(|w| w.id != 0),
            "widget id 0 is reserved for the window"
        );
        Ok(FormHost {
            window: form.window.into(),
            entries: form.widgets,
        })
    }

    fn entry(&self, id: WidgetId) -> &FormWidget {
        self.entries
            .iter()
            .find(|w| w.id == id.0)
            .expect("unknown widget id")
    }

    fn entry_mut(&mut self, id: WidgetId) -> &mut FormWidget {
        self.entries
            .iter_mut()
            .find(|w| w.id == id.0)
            .expect("unknown widget id")
    }
}

impl WidgetHost for FormHost {
    fn children(&self, container: WidgetId) -> Vec<WidgetId> {
        let parent = (container != WINDOW_ID).then_some(container.0);
        self.entries
            .iter()
            .filter(|w| w.parent == parent)
            .map(|w| WidgetId::new(w.id))
            .collect()
    }

    fn frame(&self, id: WidgetId) -> Rect {
        if id == WINDOW_ID {
            self.window
        } else {
            self.entry(id).frame.into()
        }
    }

    fn set_frame(&mut self, id: WidgetId, frame: Rect) {
        if id == WINDOW_ID {
            self.window = frame;
        } else {
            self.entry_mut(id).frame = frame.into();
        }
    }

    fn window_frame(&self) -> Rect { self.window }

    fn min_content_size(&self, id: WidgetId, axis: Orientation) -> i32 {
        let stored = match axis {
            Orientation::Horizontal => self.entry(id).min_width,
            Orientation::Vertical => self.entry(id).min_height,
        };
        stored.unwrap_or_else(|| self.frame(id).size.along(axis))
    }

    fn is_elastic(&self, id: WidgetId) -> bool { self.entry(id).elastic }

    fn is_container(&self, id: WidgetId) -> bool { self.entry(id).container }
}

fn main() -> anyhow::Result<()> {
    log::init();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.debug.dump_cells |= cli.dump_cells;
    settings.debug.horizontal_only |= cli.horizontal_only;

    let text = std::fs::read_to_string(&cli.form)
        .with_context(|| format!("failed to read {}", cli.form.display()))?;
    let form: Form = serde_json::from_str(&text).context("failed to parse form")?;
    let mut host = FormHost::new(form)?;

    let FitReport { dw, dh } = Engine::new(settings).run_tree(&mut host, WINDOW_ID);
    eprintln!("window grew by {dw}x{dh}");

    let result = Form {
        window: host.window.into(),
        widgets: host.entries,
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
