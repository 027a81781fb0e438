use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use content_grade::history::assess_series;
use content_grade::logging::init_tracing;
use content_grade::{
    assess, default_analyzer, AdvisoryComposer, AnalysisHint, Analyzer, Axis, CriteriaCatalog,
    EngineConfig, InMemoryHistory,
};

#[derive(Parser)]
#[command(
    name = "content-grade",
    about = "Score generated articles and assess score histories",
    version
)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true, env = "CONTENT_GRADE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score documents (reads stdin if no files are given)
    Analyze {
        files: Vec<PathBuf>,
        /// Focus keyphrase for the density and introduction checks
        #[arg(long, short)]
        keyphrase: Option<String>,
        /// Criteria catalog (JSON, YAML or TOML); overrides the config file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Confidence, trend and advice for a score history
    Assess {
        /// Comma-separated scores, oldest first
        #[arg(long, value_delimiter = ',', conflicts_with = "history")]
        scores: Vec<f64>,
        /// JSON object mapping entity ids to score arrays
        #[arg(long, requires = "entity")]
        history: Option<PathBuf>,
        #[arg(long)]
        entity: Option<String>,
    },
    /// Validate a criteria catalog
    CheckCatalog { path: PathBuf },
}

#[derive(Serialize)]
struct CatalogSummary<'a> {
    version: &'a str,
    human: usize,
    quality: usize,
    commercial: usize,
    filler_patterns: usize,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    process::exit(1);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(format!("could not encode output: {e}")),
    }
}

fn main() {
    init_tracing("warn");
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path).unwrap_or_else(|e| fail(e)),
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Analyze {
            files,
            keyphrase,
            catalog,
        } => {
            let loaded;
            let analyzer: &Analyzer = match (catalog, &config.catalog) {
                (Some(path), _) => {
                    loaded = CriteriaCatalog::load(&path)
                        .and_then(Analyzer::new)
                        .unwrap_or_else(|e| fail(e));
                    &loaded
                }
                (None, Some(_)) => {
                    loaded = config.analyzer().unwrap_or_else(|e| fail(e));
                    &loaded
                }
                (None, None) => default_analyzer(),
            };
            let hint = AnalysisHint { keyphrase };

            if files.is_empty() {
                let mut input = String::new();
                if let Err(e) = std::io::stdin().read_to_string(&mut input) {
                    fail(format!("reading stdin: {e}"));
                }
                print_json(&analyzer.analyze(&input, &hint));
            } else {
                for path in &files {
                    let text = std::fs::read_to_string(path)
                        .unwrap_or_else(|e| fail(format!("reading {}: {e}", path.display())));
                    print_json(&analyzer.analyze(&text, &hint));
                }
            }
        }
        Command::Assess {
            scores,
            history,
            entity,
        } => {
            let threshold = config
                .catalog()
                .map(|c| c.scoring.thresholds.high_quality)
                .unwrap_or_else(|e| fail(e));
            let composer = AdvisoryComposer::new(threshold);
            let entity = entity.unwrap_or_else(|| "-".to_string());
            let report = match history {
                Some(path) => {
                    let contents = std::fs::read_to_string(&path)
                        .unwrap_or_else(|e| fail(format!("reading {}: {e}", path.display())));
                    let history: InMemoryHistory = serde_json::from_str(&contents)
                        .unwrap_or_else(|e| fail(format!("parsing {}: {e}", path.display())));
                    assess(&history, &entity, &config.confidence, &composer)
                }
                None => assess_series(&entity, &scores, &config.confidence, &composer),
            };
            print_json(&report);
        }
        Command::CheckCatalog { path } => {
            let catalog = CriteriaCatalog::load(&path).unwrap_or_else(|e| fail(e));
            print_json(&CatalogSummary {
                version: &catalog.version,
                human: catalog.criteria(Axis::Human).len(),
                quality: catalog.criteria(Axis::Quality).len(),
                commercial: catalog.criteria(Axis::Commercial).len(),
                filler_patterns: catalog.filler.patterns.len(),
            });
        }
    }
}
