use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use tabs_container::line::{build_tab_line, render_line};
use tabs_container::tab::render_tabs;
use tabs_container::{
    Catalog, ContainerConfig, JsonFileStore, PanelProps, TabRecord, TabsContainer,
};

const DEFAULT_WIDTH: usize = 80;
const LOG_ENV: &str = "TABS_CONTAINER_LOG";

type Panel = Box<dyn Fn(&PanelProps<'_, String>) -> String>;

fn print_help() {
    eprintln!("tabs-container - render a permission-filtered tab strip");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  tabs-container show <file> [--width N]   Print the tab strip and active panel");
    eprintln!("  tabs-container list <file>               List visible tabs, marking the active");
    eprintln!("  tabs-container select <file> <index>     Make the tab at <index> active");
    eprintln!("  tabs-container --help                    Show this help");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --store <path>   State file (default: ~/.config/tabs-container/state.json)");
    eprintln!();
    eprintln!("Panel templates may use {{name}}, {{view_type}}, {{permissions}} and {{data}}.");
    eprintln!("Set {}=debug to log to stderr.", LOG_ENV);
}

// ============================================================================
// Logging
// ============================================================================

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() {
    let level = env::var(LOG_ENV)
        .ok()
        .and_then(|v| v.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Off);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

// ============================================================================
// Container file
// ============================================================================

#[derive(Debug, Deserialize)]
struct ContainerFile {
    #[serde(flatten)]
    config: ContainerConfig,
    #[serde(default)]
    data: Value,
    tabs: Vec<TabSpec>,
}

#[derive(Debug, Deserialize)]
struct TabSpec {
    id: String,
    label: String,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    content: String,
}

fn fill_template(template: &str, props: &PanelProps<'_, String>) -> String {
    template
        .replace("{name}", props.name)
        .replace("{view_type}", props.view_type)
        .replace("{permissions}", &props.permissions.join(" "))
        .replace("{data}", &props.extra_data.to_string())
}

fn build_catalog(specs: Vec<TabSpec>) -> Catalog<String, Panel> {
    specs
        .into_iter()
        .map(|spec| {
            let template = spec.content;
            let panel: Panel = Box::new(move |props: &PanelProps<'_, String>| {
                fill_template(&template, props)
            });
            TabRecord::new(spec.id, spec.label, panel).with_permissions(spec.permissions)
        })
        .collect()
}

fn read_container_file(path: &Path) -> ContainerFile {
    let data = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("tabs-container: failed to read {}: {}", path.display(), e);
        process::exit(1);
    });
    serde_json::from_str(&data).unwrap_or_else(|e| {
        eprintln!("tabs-container: failed to parse {}: {}", path.display(), e);
        process::exit(1);
    })
}

fn default_store_path() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| {
        eprintln!("tabs-container: $HOME not set, use --store");
        process::exit(1);
    });
    PathBuf::from(home)
        .join(".config")
        .join("tabs-container")
        .join("state.json")
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, PartialEq)]
enum Command {
    Show { width: usize },
    List,
    Select { index: usize },
}

#[derive(Debug, PartialEq)]
struct Invocation {
    command: Command,
    file: PathBuf,
    store: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut positional: Vec<&str> = Vec::new();
    let mut width = DEFAULT_WIDTH;
    let mut store = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--width" => {
                let value = iter.next().ok_or("--width needs a value")?;
                width = value
                    .parse()
                    .map_err(|_| format!("invalid width '{}'", value))?;
            }
            "--store" => {
                let value = iter.next().ok_or("--store needs a path")?;
                store = Some(PathBuf::from(value));
            }
            other => positional.push(other),
        }
    }

    let (name, rest) = positional.split_first().ok_or("missing command")?;
    let file = rest
        .first()
        .map(PathBuf::from)
        .ok_or_else(|| format!("'{}' needs a container file", name))?;

    let command = match *name {
        "show" => Command::Show { width },
        "list" => Command::List,
        "select" => {
            let raw = rest.get(1).ok_or("'select' needs an index")?;
            let index = raw
                .parse()
                .map_err(|_| format!("invalid index '{}'", raw))?;
            Command::Select { index }
        }
        other => return Err(format!("unknown command '{}'", other)),
    };

    Ok(Invocation {
        command,
        file,
        store,
    })
}

// ============================================================================
// Commands
// ============================================================================

fn run(invocation: Invocation) {
    let file = read_container_file(&invocation.file);
    let granted = file.config.permissions.clone();
    let store_path = invocation.store.unwrap_or_else(default_store_path);

    let mut container = TabsContainer::new(
        build_catalog(file.tabs),
        file.config,
        JsonFileStore::new(store_path),
    );
    container.refresh(&granted);

    match invocation.command {
        Command::Show { width } => {
            let labels = container.tab_labels(&granted);
            if labels.is_empty() {
                eprintln!("tabs-container: no visible tabs");
                return;
            }
            let active = container.selected_index();
            let line = build_tab_line(render_tabs(&labels, active), active, width);
            println!("{}", render_line(&line, width));

            let panels = container.tab_panels(&granted, &file.data);
            if let Some(panel) = panels.get(active) {
                println!();
                println!("{}", panel);
            }
        }
        Command::List => {
            let active = container.selected_index();
            for (position, record) in container.visible(&granted).iter().enumerate() {
                let marker = if position == active { "*" } else { " " };
                println!("{} {:2} {:15} {}", marker, position, record.id, record.label);
            }
        }
        Command::Select { index } => {
            let count = container.visible(&granted).len();
            if index >= count {
                eprintln!(
                    "tabs-container: index {} out of range ({} visible tabs)",
                    index, count
                );
                process::exit(1);
            }
            container.select(index);
            if let Some(id) = container.selected_id() {
                println!("active tab: {}", id);
            }
        }
    }
}

fn main() {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    match parse_args(&args) {
        Ok(invocation) => run(invocation),
        Err(e) => {
            eprintln!("tabs-container: {}", e);
            eprintln!();
            print_help();
            process::exit(1);
        }
    }
}
