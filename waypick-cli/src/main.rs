mod config;
mod conversation;
mod output;
mod parse;
mod prompt;
mod store;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use waypick_core::{pick_index, Item};

use crate::config::WaypickConfig;
use crate::conversation::{Conversation, Outcome};
use crate::store::{SessionStore, UserRecord};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "waypick", version, about = "Decide between options by sorting, scoring and a weighted draw")]
struct Cli {
    /// Show debug logs on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start or resume an interactive decision
    Decide(DecideArgs),
    /// Draw one option right away, weighted by score
    Pick(PickArgs),
    /// List saved decisions
    History(HistoryArgs),
    /// Create a default config file at ~/.config/waypick/config.toml
    Init,
}

#[derive(clap::Args)]
struct StoreArgs {
    /// Name your decisions are saved under (default: $USER)
    #[arg(long)]
    user: Option<String>,

    /// Directory for saved decisions (default: ~/.local/share/waypick)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Path to config file (default: ~/.config/waypick/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct DecideArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Random seed for reproducible prompts and draws
    #[arg(long)]
    seed: Option<u64>,

    /// Start a new decision even if an unfinished one is saved
    #[arg(long)]
    fresh: bool,
}

#[derive(Parser)]
struct PickArgs {
    /// File with one option per line (or a JSON array); append `:SCORE` to weight it
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline option, optionally `TEXT:SCORE` (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Random seed for a reproducible draw
    #[arg(long)]
    seed: Option<u64>,

    /// Path to config file (default: ~/.config/waypick/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct HistoryArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Output JSON instead of a list
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            debug!(seed, "using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

fn load_config(path: Option<&PathBuf>) -> WaypickConfig {
    let config_path = path.cloned().unwrap_or_else(config::config_path);
    config::load_config(&config_path)
}

/// Resolve user name and store location: CLI arg > config file > default.
fn open_store(args: &StoreArgs, cfg: &WaypickConfig) -> (SessionStore, String) {
    let dir = args
        .state_dir
        .clone()
        .or_else(|| cfg.state_dir.as_deref().map(config::expand_home))
        .unwrap_or_else(config::default_state_dir);
    let user = args
        .user
        .clone()
        .or_else(|| cfg.user.clone())
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "me".to_string());
    (SessionStore::new(dir), user)
}

/// Load items for `pick` from all sources: --items file, --item inline args, or stdin.
fn load_pick_items(args: &PickArgs) -> Vec<Item> {
    let mut raw = Vec::new();

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
        raw = parse::parse_items_from_str(&content);
    }

    raw.extend(args.inline_items.iter().cloned());

    if raw.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail("No options provided. Use --items <file>, --item <text>, or pipe options via stdin.");
        }
        let content = stdin
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}")))
            .join("\n");
        raw = parse::parse_items_from_str(&content);
    }

    if raw.is_empty() {
        bail("Need at least 1 option to pick from, got 0");
    }
    raw.iter().map(|r| parse::parse_scored_item(r)).collect()
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Decide(args) => run_decide(args),
        Commands::Pick(args) => run_pick(args),
        Commands::History(args) => run_history(args),
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set where decisions are saved, your user name, etc.");
        }
    }
}

fn run_decide(args: DecideArgs) {
    let cfg = load_config(args.store.config.as_ref());
    let (store, user) = open_store(&args.store, &cfg);
    let mut rng = make_rng(args.seed.or(cfg.seed));

    let mut record = store
        .load(&user)
        .unwrap_or_else(|e| bail(format!("Failed to load saved decisions: {e}")));
    info!(user = %record.user, sessions = record.sessions.len(), dir = %store.dir().display(), "starting conversation");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = Conversation::new(stdin.lock(), stdout.lock(), &mut rng, |r: &UserRecord| store.save(r))
        .run(&mut record, args.fresh)
        .unwrap_or_else(|e| bail(e));

    if let Outcome::Decided(way) = outcome {
        debug!(%way, "decision made");
    }
}

fn run_pick(args: PickArgs) {
    let cfg = load_config(args.config.as_ref());
    let items = load_pick_items(&args);
    let mut rng = make_rng(args.seed.or(cfg.seed));

    let winner = pick_index(&items, &mut rng).unwrap_or_else(|e| bail(e));

    if args.json {
        println!("{}", output::render_pick_json(&items, winner));
    } else {
        println!("{}", output::render_pick_table(&items, winner));
    }
}

fn run_history(args: HistoryArgs) {
    let cfg = load_config(args.store.config.as_ref());
    let (store, user) = open_store(&args.store, &cfg);
    let record = store
        .load(&user)
        .unwrap_or_else(|e| bail(format!("Failed to load saved decisions: {e}")));

    if args.json {
        println!("{}", output::render_history_json(&record));
    } else {
        println!("{}", output::render_history_table(&record));
    }
}
