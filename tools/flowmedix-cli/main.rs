use clap::{Parser, Subcommand, ValueEnum};
use flowmedix::prelude::*;
use std::fs;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing::info;

/// Content kind as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindCli {
    Flowchart,
    Decision,
}

impl From<KindCli> for ContentKind {
    fn from(kind: KindCli) -> Self {
        match kind {
            KindCli::Flowchart => ContentKind::Flowchart,
            KindCli::Decision => ContentKind::DecisionFlow,
        }
    }
}

/// Flowchart normalization and decision-flow simulation tools
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional YAML config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a flowchart JSON file and print the canonical form
    Normalize {
        path: String,
        /// Place unpositioned nodes on the fallback grid
        #[arg(long)]
        layout: bool,
    },
    /// Report problems in a flowchart or decision flow file
    Check {
        path: String,
        #[arg(short, long, value_enum, default_value = "flowchart")]
        kind: KindCli,
    },
    /// Walk through a decision flow file interactively
    Simulate { path: String },
    /// Publish a content file into the snapshot store
    Publish {
        path: String,
        /// Module key to publish under
        #[arg(long)]
        key: String,
        #[arg(short, long, value_enum)]
        kind: KindCli,
        /// Snapshot file, overrides `store_path` from the config
        #[arg(long)]
        store: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => Config::default(),
    };

    match cli.command {
        Command::Normalize { path, layout } => run_normalize(&config, &path, layout),
        Command::Check { path, kind } => run_check(&config, &path, kind),
        Command::Simulate { path } => run_simulate(&path),
        Command::Publish {
            path,
            key,
            kind,
            store,
        } => run_publish(&config, &path, &key, kind, store),
    }
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read file '{}': {}", path, e)))
}

fn run_normalize(config: &Config, path: &str, layout: bool) {
    let text = read_file(path);
    let normalizer = Normalizer::from_config(config);

    let start = Instant::now();
    let normalized = normalizer.decode_str(&text);
    let duration = start.elapsed();

    let content = if layout {
        config.layout.apply(&normalized.content)
    } else {
        normalized.content
    };

    match normalized.shape {
        Some(shape) => info!(shape = %shape, ?duration, "Recognized flowchart shape"),
        None => info!(?duration, "No flowchart shape recognized, output is empty"),
    }

    let output = serde_json::to_string_pretty(&content)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)));
    println!("{}", output);
}

fn run_check(config: &Config, path: &str, kind: KindCli) {
    let text = read_file(path);
    let diagnostics = match kind {
        KindCli::Flowchart => {
            let content = Normalizer::from_config(config).normalize_str(&text);
            if content.is_empty() {
                println!("No flowchart content found.");
            }
            check_flowchart(&content)
        }
        KindCli::Decision => {
            let flow = DecisionFlowData::from_json(&text).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to parse decision flow: {}", e))
            });
            check_decision_flow(&flow)
        }
    };

    if diagnostics.is_empty() {
        println!("No problems found.");
        return;
    }
    println!("{} problem(s) found:", diagnostics.len());
    for diagnostic in &diagnostics {
        println!("  - {}", diagnostic);
    }
}

fn run_publish(config: &Config, path: &str, key: &str, kind: KindCli, store: Option<String>) {
    let store_path = store
        .map(std::path::PathBuf::from)
        .or_else(|| config.store_path.clone())
        .unwrap_or_else(|| exit_with_error("A store path is required (--store or store_path)."));

    let mut store = MemoryStore::from_snapshot(&store_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to open store: {}", e)));
    let mut draft = Draft::new(key, kind.into(), read_file(path));
    if let DraftStatus::InvalidJson(message) = draft.status() {
        exit_with_error(&format!("Invalid JSON in '{}': {}", path, message));
    }

    let normalizer = Normalizer::from_config(config);
    draft
        .publish(&mut store, &normalizer)
        .unwrap_or_else(|e| exit_with_error(&format!("Publishing failed: {}", e)));
    store
        .save_snapshot(&store_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to save store: {}", e)));

    println!("Published '{}' to {}", key, store_path.display());
}

/// Runs a decision flow in the terminal, one prompt per student action.
fn run_simulate(path: &str) {
    let flow = DecisionFlowData::from_json(&read_file(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse decision flow: {}", e)));
    let mut simulator = DecisionSimulator::new(flow);

    if !simulator.state().is_ready() {
        println!("This flow has no steps.");
        return;
    }

    loop {
        if simulator.state().is_finished() {
            println!("\nFlow complete!");
            print!("{}", MapFormatter::format_map(simulator.flow(), simulator.state()));
            return;
        }

        match simulator.state().view() {
            View::Map => {
                println!();
                print!("{}", MapFormatter::format_map(simulator.flow(), simulator.state()));
                let current = simulator.state().current_step().map(|id| id.to_string());
                let Some(choice) = prompt_for_input("Open step (q to quit)", current.as_deref())
                else {
                    return;
                };
                if choice == "q" {
                    return;
                }
                let before = simulator.state().clone();
                simulator.dispatch(SimulatorEvent::SelectStep(parse_step_id(&choice)));
                if simulator.state() == &before {
                    println!("Step '{}' is locked.", choice);
                }
            }
            View::Decision => {
                println!();
                print!(
                    "{}",
                    MapFormatter::format_decision(simulator.flow(), simulator.state())
                );
                match simulator.state().pending().cloned() {
                    Some(Feedback::Success { .. }) => {
                        if prompt_for_input("Press enter for the next step", None).is_none() {
                            return;
                        }
                        simulator.dispatch(SimulatorEvent::AcknowledgeSuccess);
                    }
                    Some(Feedback::Error { .. }) => {
                        // Choosing again replaces the alert; `c` moves past it.
                        let Some(choice) =
                            prompt_for_input("Choose another option (c to continue, b for map)", None)
                        else {
                            return;
                        };
                        let event = match choice.as_str() {
                            "c" => SimulatorEvent::DismissError,
                            "b" => SimulatorEvent::BackToMap,
                            _ => SimulatorEvent::ChooseOption(choice),
                        };
                        simulator.dispatch(event);
                    }
                    None => {
                        let Some(choice) = prompt_for_input("Choose an option (b for map)", None)
                        else {
                            return;
                        };
                        if choice == "b" {
                            simulator.dispatch(SimulatorEvent::BackToMap);
                        } else {
                            simulator.dispatch(SimulatorEvent::ChooseOption(choice));
                        }
                    }
                }
            }
        }
    }
}

/// Numbers typed at the prompt address numeric step ids; anything else is a text id.
fn parse_step_id(input: &str) -> StepId {
    input
        .parse::<i64>()
        .map(StepId::Number)
        .unwrap_or_else(|_| StepId::Text(input.to_string()))
}

/// A helper function to prompt the user and read a line of input.
///
/// Returns `None` once stdin is closed.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> Option<String> {
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to flush stdout: {}", e));
    }
    let answer = read_answer(&mut io::stdin().lock(), default)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read line: {}", e)));
    if answer.is_none() {
        println!();
    }
    answer
}

/// Reads one answer line. An empty line picks the default; end of input yields `None`.
fn read_answer<R: BufRead>(reader: &mut R, default: Option<&str>) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim();

    Ok(Some(if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed.to_string()
    }))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
