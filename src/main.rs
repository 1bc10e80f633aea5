use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use flowc::{ComponentMode, Direction, FlowchartDocument, LayoutOptions, SizeOptions};
use tracing::Level;

#[derive(Parser)]
#[command(name = "flowc", about = "Parse, format, lay out and sort flowchart diagrams")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parsed document as JSON
    Parse(Input),
    /// Read a JSON document and print flowchart text
    Generate(Input),
    /// Print flowchart text in canonical form
    Format(Input),
    /// Print node coordinates as JSON
    Layout(LayoutArgs),
    /// Print node ids in dependency order, one per line
    Sort(Input),
}

#[derive(Args)]
struct Input {
    /// Input file (reads from stdin if not provided)
    file: Option<PathBuf>,
}

#[derive(Args)]
struct LayoutArgs {
    #[command(flatten)]
    input: Input,

    /// Layout direction (TD, TB, LR, BT, RL); defaults to the document's own
    #[arg(long, short = 'd')]
    direction: Option<Direction>,

    /// Gap between nodes of the same rank
    #[arg(long, default_value_t = flowc::graph_layout::DEFAULT_NODE_SPACING)]
    node_spacing: f64,

    /// Gap between ranks, also used between components
    #[arg(long, default_value_t = flowc::graph_layout::DEFAULT_RANK_SPACING)]
    rank_spacing: f64,

    /// Group components by undirected connectivity
    #[arg(long)]
    undirected: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> flowc::Result<String> {
    match command {
        Command::Parse(input) => {
            let text = read_input(input.file.as_deref())?;
            flowc::parse(&text).to_json()
        }
        Command::Generate(input) => {
            let json = read_input(input.file.as_deref())?;
            let document = FlowchartDocument::from_json(&json)?;
            Ok(flowc::generate_document(&document))
        }
        Command::Format(input) => {
            let text = read_input(input.file.as_deref())?;
            Ok(flowc::format(&text))
        }
        Command::Layout(args) => {
            let text = read_input(args.input.file.as_deref())?;
            let document = flowc::parse(&text);
            let options = LayoutOptions {
                direction: args.direction.unwrap_or(document.direction),
                node_spacing: args.node_spacing,
                rank_spacing: args.rank_spacing,
                components: if args.undirected {
                    ComponentMode::Undirected
                } else {
                    ComponentMode::Forward
                },
            };
            let layout = flowc::layout_document(&document, &options, &SizeOptions::default());
            Ok(serde_json::to_string_pretty(&layout)?)
        }
        Command::Sort(input) => {
            let text = read_input(input.file.as_deref())?;
            let document = flowc::parse(&text);
            let order: Vec<&str> = flowc::topological_sort(&document.nodes, &document.edges)
                .into_iter()
                .map(|node| node.id.as_str())
                .collect();
            Ok(order.join("\n"))
        }
    }
}

fn read_input(path: Option<&Path>) -> flowc::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| flowc::Error::Io {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(flowc::Error::Stdin)?;
            Ok(buf)
        }
    }
}
