use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use notecanvas::board::Board;
use notecanvas::config::{CanvasConfig, ConfigError};
use notecanvas::doc::{Item, ItemId};
use notecanvas::engine::{Engine, EngineCore};
use notecanvas::events::CanvasEvent;
use notecanvas::geometry::Rect;
use notecanvas::render::DisplayList;

mod script;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("script line {line}: {source}")]
    Script { line: usize, source: serde_json::Error },
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Parser, Debug)]
#[command(name = "notecanvas", about = "Drive the note canvas engine without a window")]
struct Cli {
    #[arg(
        long,
        env = "NOTECANVAS_CONFIG",
        help = "Engine config JSON; defaults plus NOTECANVAS_* overrides when omitted"
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an input script and print every outbound event as a JSON line.
    Replay(ReplayArgs),
    /// Print where each item lands under the board's layout mode.
    Layout(SceneArgs),
    /// Print the display list for a single frame.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    #[arg(long, help = "JSON array of items")]
    items: PathBuf,

    #[arg(long, help = "Board JSON; a Freeform board when omitted")]
    board: Option<PathBuf>,

    #[arg(long, conflicts_with = "board", help = "Id of the default Freeform board")]
    board_id: Option<Uuid>,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    #[arg(long, help = "Wall clock for due-date sections, unix seconds")]
    clock: Option<i64>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    scene: SceneArgs,

    #[arg(long, default_value = "-", help = "Script file path, or - for stdin")]
    script: String,

    #[arg(long, default_value_t = false, help = "Act as the host and confirm delete requests")]
    confirm_deletes: bool,

    #[arg(long, default_value_t = false, help = "Print the final display list after the events")]
    render: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    #[arg(long, default_value_t = false, help = "Zoom to fit before drawing")]
    fit: bool,
}

/// Where one item landed.
#[derive(Debug, Serialize)]
struct Placement<'a> {
    id: ItemId,
    title: &'a str,
    bucket: Option<&'a str>,
    bounds: Option<Rect>,
}

fn main() -> Result<(), CliError> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Replay(args) => run_replay(config, &args),
        Command::Layout(args) => run_layout(config, &args),
        Command::Render(args) => run_render(config, &args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn load_config(path: Option<&Path>) -> Result<CanvasConfig, CliError> {
    let config = match path {
        Some(path) => CanvasConfig::from_json_str(&read_file(path)?)?,
        None => CanvasConfig::from_env()?,
    };
    tracing::debug!(?config, "config loaded");
    Ok(config)
}

/// Build an engine over the scene and return the events from loading it
/// (auto-placement reports included).
fn build_engine(config: CanvasConfig, scene: &SceneArgs) -> Result<(Engine<DisplayList>, Vec<CanvasEvent>), CliError> {
    let items: Vec<Item> = read_json(&scene.items)?;
    let board = match &scene.board {
        Some(path) => read_json(path)?,
        None => Board::freeform(scene.board_id.unwrap_or_default()),
    };
    tracing::info!(items = items.len(), board_id = %board.id, mode = ?board.layout_mode, "scene loaded");

    let mut engine = Engine::new(EngineCore::new(config, board), DisplayList::new());
    let mut events = engine.set_viewport(scene.width, scene.height);
    if let Some(now) = scene.clock {
        events.extend(engine.set_clock(now));
    }
    events.extend(engine.set_items(items));
    Ok((engine, events))
}

fn run_replay(config: CanvasConfig, args: &ReplayArgs) -> Result<(), CliError> {
    let (mut engine, initial) = build_engine(config, &args.scene)?;
    print_events(&initial)?;

    let reader: Box<dyn BufRead> = if args.script == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&args.script).map_err(|source| CliError::Io { path: args.script.clone(), source })?;
        Box::new(BufReader::new(file))
    };

    let mut steps = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| CliError::Io { path: args.script.clone(), source })?;
        let Some(step) = script::parse_line(&line).map_err(|source| CliError::Script { line: index + 1, source })?
        else {
            continue;
        };
        steps += 1;
        let events = script::apply(&mut engine, step);
        print_events(&events)?;

        if args.confirm_deletes {
            let ids = script::requested_deletes(&events);
            if !ids.is_empty() {
                tracing::debug!(count = ids.len(), "confirming delete");
                print_events(&engine.remove_items(&ids))?;
            }
        }
    }
    tracing::info!(steps, "replay finished");

    if args.render {
        render_frame(&mut engine)?;
    }
    Ok(())
}

fn run_layout(config: CanvasConfig, args: &SceneArgs) -> Result<(), CliError> {
    let (engine, _) = build_engine(config, args)?;
    let core = &engine.core;
    let placements: Vec<Placement<'_>> = core
        .items()
        .into_iter()
        .map(|item| Placement {
            id: item.id,
            title: &item.title,
            bucket: core.arrangement().bucket_of(&item.id).map(|b| b.name.as_str()),
            bounds: core.item_bounds(&item.id),
        })
        .collect();
    print_json(&placements)
}

fn run_render(config: CanvasConfig, args: &RenderArgs) -> Result<(), CliError> {
    let (mut engine, _) = build_engine(config, &args.scene)?;
    if args.fit {
        engine.zoom_to_fit();
    }
    render_frame(&mut engine)
}

fn render_frame(engine: &mut Engine<DisplayList>) -> Result<(), CliError> {
    engine.surface_mut().commands.clear();
    let Ok(()) = engine.render();
    tracing::debug!(cards = engine.surface().card_count(), "frame rendered");
    print_json(engine.surface())
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io { path: path.display().to_string(), source })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    Ok(serde_json::from_str(&read_file(path)?)?)
}

fn print_events(events: &[CanvasEvent]) -> Result<(), CliError> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
