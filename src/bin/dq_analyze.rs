//! dq-analyze: build, annotate and save the full DungeonQuest game tree.
//!
//! Writes `<out>/game_analysis.json` for the tree viewer and, with
//! `--log-draws`, one `<out>/round_<n>/draw_probabilities.json` per round.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rustc_hash::FxHashSet;
use serde::Serialize;

use dungeonquest_analyzer::{
    AnalyzerConfig, BuildObserver, DrawCombination, DrawOutcome, GameTree, GameTreeBuilder,
    TileBag,
};

const ANALYSIS_FILE: &str = "game_analysis.json";

#[derive(Debug, Parser)]
#[command(name = "dq-analyze", version, about = "Exhaustive DungeonQuest game-tree analyzer")]
struct Args {
    /// Configuration JSON (camelCase fields; missing fields take the defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "logs")]
    out: PathBuf,

    /// Keep the existing contents of the output directory
    #[arg(long)]
    keep_logs: bool,

    /// Write each round's draw distributions to round_<n>/draw_probabilities.json
    #[arg(long)]
    log_draws: bool,

    /// Print build progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

/// Draw distribution of one distinct bag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BagDistribution {
    tile_bag: TileBag,
    draws: Vec<DrawOutcome>,
}

/// Distinct draw distributions, grouped by round.
#[derive(Debug, Default)]
struct DrawLog {
    seen: FxHashSet<(u32, TileBag)>,
    rounds: BTreeMap<u32, Vec<BagDistribution>>,
}

struct CliObserver {
    verbose: bool,
    draws: Option<Rc<RefCell<DrawLog>>>,
}

impl BuildObserver for CliObserver {
    fn on_round_start(&mut self, round: u32, bag: &TileBag) {
        if self.verbose {
            eprintln!("\nProcessing round {} (bag {})...", round, bag);
        }
    }

    fn on_defense_win(&mut self, round: u32, bag: &TileBag, needed: u32) {
        if self.verbose {
            eprintln!(
                "  Round {}: {} tiles left, {} needed - defense wins",
                round,
                bag.total(),
                needed
            );
        }
    }

    fn on_draw_distribution(&mut self, round: u32, bag: &TileBag, draws: &[DrawOutcome]) {
        let Some(log) = &self.draws else {
            return;
        };
        let mut log = log.borrow_mut();
        if log.seen.insert((round, *bag)) {
            log.rounds.entry(round).or_default().push(BagDistribution {
                tile_bag: *bag,
                draws: draws.to_vec(),
            });
        }
    }

    fn on_draw(
        &mut self,
        round: u32,
        index: usize,
        total: usize,
        combination: &DrawCombination,
        probability: f64,
        arrangements: usize,
    ) {
        if self.verbose {
            eprintln!(
                "  Round {} - Combination {}/{}: {{{}}} (probability: {})",
                round,
                index + 1,
                total,
                combination.describe(),
                probability
            );
            eprintln!("    Found {} unique arrangements", arrangements);
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    let Some(path) = path else {
        return Ok(AnalyzerConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid config {}", path.display()))
}

/// Remove the files an earlier run wrote to `out`: the analysis JSON and the
/// `round_<n>` directories. Anything else in `out` is left alone.
fn clear_previous_output(out: &Path) -> Result<bool> {
    let entries = match fs::read_dir(out) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", out.display())),
    };

    let mut cleared = false;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read {}", out.display()))?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if file_type.is_file() && name == ANALYSIS_FILE {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            cleared = true;
        } else if file_type.is_dir() && is_round_dir(&name) {
            fs::remove_dir_all(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            cleared = true;
        }
    }
    Ok(cleared)
}

fn is_round_dir(name: &str) -> bool {
    name.strip_prefix("round_")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

fn write_draw_logs(out: &Path, log: &DrawLog) -> Result<()> {
    for (round, distributions) in &log.rounds {
        let dir = out.join(format!("round_{}", round));
        fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
        let file = dir.join("draw_probabilities.json");
        fs::write(&file, serde_json::to_string_pretty(distributions)?)
            .with_context(|| format!("failed to write {}", file.display()))?;
        println!("Round {} draw probabilities logged to {}", round, file.display());
    }
    Ok(())
}

fn print_summary(tree: &GameTree) {
    let stats = tree.stats();
    println!("\nNodes: {}", stats.node_count());
    println!(
        "  defense {} / draw {} / placement {} / offense turn {} / action {}",
        stats.defense_nodes,
        stats.draw_nodes,
        stats.placement_nodes,
        stats.offense_turn_nodes,
        stats.action_nodes
    );
    println!(
        "Leaves: {} offense wins, {} defense wins, {} unresolved at the round limit",
        stats.offense_wins, stats.defense_wins, stats.horizon_leaves
    );
    println!(
        "Deepest round: {}, max branching: {}",
        stats.max_round, stats.max_branching
    );

    if let Some(outcome) = tree.outcome() {
        println!(
            "Offense can win: {} ({} resolved outcomes)",
            outcome.can_offense_win, outcome.num_outcomes
        );
    }

    if let Some(path) = tree.first_offense_win_path() {
        println!("\nFirst winning line ({}):", path);
        for crumb in tree.breadcrumbs(&path).unwrap_or_default() {
            println!("  {}", crumb);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if !args.keep_logs && clear_previous_output(&args.out)? {
        println!("Cleared previous logs");
    }

    println!("DungeonQuest Analyzer");
    println!(
        "Paths: {}, Starting Depth: {}, Max Rounds: {}",
        config.num_paths, config.starting_depth, config.max_rounds
    );

    let draw_log = args.log_draws.then(|| Rc::new(RefCell::new(DrawLog::default())));
    let observer = CliObserver {
        verbose: args.verbose,
        draws: draw_log.clone(),
    };

    let start = Instant::now();
    let mut tree = GameTreeBuilder::new(config)?
        .with_observer(Box::new(observer))
        .build()?;
    let (_, annotate_stats) = tree.annotate();
    if args.verbose {
        eprintln!(
            "\nBuilt and annotated in {:.2?} ({} nodes annotated)",
            start.elapsed(),
            annotate_stats.computed
        );
    }

    fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    if let Some(log) = &draw_log {
        write_draw_logs(&args.out, &log.borrow())?;
    }

    let file = args.out.join(ANALYSIS_FILE);
    tree.save_json(&file)?;
    println!("\nGame analysis saved to {}", file.display());

    print_summary(&tree);
    Ok(())
}
