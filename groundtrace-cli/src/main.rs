//! GroundTrace CLI - wire harness grounding lists from the command line.

use clap::{Args, Parser, Subcommand, ValueEnum};
use groundtrace::parser::ALL_RULES;
use groundtrace::{
    GroundTraceCore, GroundTraceError, GroundingInputs, GroundingOptions, GroundingResult,
    TopologyType,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "groundtrace")]
#[command(about = "Wire harness grounding list and topology tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the grounding list workbook
    List {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output workbook path
        #[arg(short, long, value_name = "FILE", default_value = "grounding_list.xlsx")]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// JSON file with grounding options
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Exit with error code if any wire list row was skipped
        #[arg(long)]
        fail_on_skipped: bool,
    },

    /// Print the topology of each ground terminal
    Topology {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// JSON file with grounding options
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List the header keywords recognised for each column
    Columns,
}

#[derive(Args)]
struct InputArgs {
    /// Wire list workbook
    #[arg(long, value_name = "FILE")]
    wirelist: PathBuf,

    /// Connector list workbook
    #[arg(long, value_name = "FILE")]
    connlist: PathBuf,

    /// Inline splice list workbook
    #[arg(long, value_name = "FILE")]
    inline: PathBuf,
}

impl InputArgs {
    fn to_inputs(&self) -> GroundingInputs {
        GroundingInputs::new(&self.wirelist, &self.connlist, &self.inline)
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::List {
            inputs,
            output,
            format,
            config,
            fail_on_skipped,
        } => handle_list(&inputs, &output, format, config.as_deref(), fail_on_skipped),
        Commands::Topology {
            inputs,
            format,
            config,
        } => handle_topology(&inputs, format, config.as_deref()),
        Commands::Columns => {
            handle_columns(cli.verbose);
            0
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_options(config: Option<&Path>) -> Result<GroundingOptions, GroundTraceError> {
    match config {
        Some(path) => GroundingOptions::from_json_file(path),
        None => Ok(GroundingOptions::default()),
    }
}

fn run(inputs: &InputArgs, config: Option<&Path>) -> Result<(GroundingResult, GroundingOptions), GroundTraceError> {
    let options = load_options(config)?;
    let result = GroundTraceCore::process(&inputs.to_inputs(), &options)?;
    Ok((result, options))
}

fn handle_list(
    inputs: &InputArgs,
    output: &Path,
    format: OutputFormat,
    config: Option<&Path>,
    fail_on_skipped: bool,
) -> i32 {
    let outcome = run(inputs, config).and_then(|(result, options)| {
        GroundTraceCore::write_report(&result, output, &options)?;
        Ok(result)
    });

    match outcome {
        Ok(result) => {
            match format {
                OutputFormat::Human => output_human(&result, Some(output)),
                OutputFormat::Json => output_json(&result, Some(output)),
            }
            if fail_on_skipped && result.has_skipped_rows() {
                eprintln!(
                    "Error: {} wire list row(s) skipped",
                    result.skipped.len()
                );
                return 1;
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_topology(inputs: &InputArgs, format: OutputFormat, config: Option<&Path>) -> i32 {
    match run(inputs, config) {
        Ok((result, _)) => {
            match format {
                OutputFormat::Human => output_topology_human(&result),
                OutputFormat::Json => print_json(&serde_json::json!({
                    "topology": result.topology,
                })),
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn topology_label(topology: TopologyType) -> &'static str {
    match topology {
        TopologyType::SingleCircuit => "SINGLE",
        TopologyType::MultiCircuitBus => "BUS",
        TopologyType::Unknown => "UNKNOWN",
    }
}

fn output_topology_human(result: &GroundingResult) {
    if result.topology.is_empty() {
        println!("No ground terminals found");
        return;
    }

    for summary in &result.topology {
        print!(
            "  {:<12} {:<8} {} connector(s)",
            summary.ground,
            topology_label(summary.topology),
            summary.connector_count
        );
        if !summary.shared_with.is_empty() {
            print!("  shared with {}", summary.shared_with.join(", "));
        }
        println!();
    }
}

fn output_human(result: &GroundingResult, output: Option<&Path>) {
    println!("\nGround terminals");
    println!("{}", "─".repeat(60));
    output_topology_human(result);

    if !result.skipped.is_empty() {
        println!("\n  SKIPPED ROWS:");
        for skipped in &result.skipped {
            println!("    - row {}: {}", skipped.row, skipped.reason);
        }
    }
    if !result.ambiguities.is_empty() {
        println!("\n  AMBIGUOUS LOOKUPS:");
        for ambiguity in &result.ambiguities {
            println!(
                "    - {}: using '{}' ({} candidates)",
                ambiguity.key,
                ambiguity.chosen,
                ambiguity.candidates.len()
            );
        }
    }

    let stats = &result.stats;
    println!("\n  Summary:");
    println!("    Wire rows:          {}", stats.wire_rows);
    println!("    Skipped rows:       {}", stats.skipped_rows);
    println!("    Ground terminals:   {}", stats.ground_terminals);
    println!("    Grounding records:  {}", stats.records);
    println!("    Connectors:         {}", stats.connected_connectors);
    println!("    Weld points:        {}", stats.weld_points);
    println!("    Inline splices:     {}", stats.inline_splices);
    if let Some(path) = output {
        println!("\n  Written to {}", path.display());
    }
}

fn output_json(result: &GroundingResult, output: Option<&Path>) {
    print_json(&serde_json::json!({
        "output": output.map(|p| p.display().to_string()),
        "result": result,
    }));
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn handle_columns(verbose: bool) {
    println!("Recognised column headers:\n");

    for rule in ALL_RULES {
        println!("  {} / {}", rule.table, rule.field);
        if verbose {
            println!("    {}", rule.describe());
        }
        println!();
    }
}
