//! Simple grounding example: process three harness workbooks and print the topology.

use groundtrace::prelude::*;
use std::path::Path;

fn main() -> Result<(), GroundTraceError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("Usage: cargo run --example simple_grounding <wirelist> <connlist> <inline> [output.xlsx]");
        std::process::exit(1);
    }

    let inputs = GroundingInputs::new(&args[0], &args[1], &args[2]);
    let options = GroundingOptions::default();
    let result = GroundTraceCore::process(&inputs, &options)?;

    println!("Ground terminals: {}", result.stats.ground_terminals);
    println!("Grounding records: {}", result.stats.records);
    println!();

    for summary in &result.topology {
        println!("{} [{}]", summary.ground, summary.topology);
        for record in result.records.iter().filter(|r| r.ground_terminal == summary.ground) {
            println!(
                "  {}:{}  {}  ({} / {})",
                record.connector, record.pin, record.description, record.wire_gauge, record.option
            );
        }
    }

    for skipped in &result.skipped {
        println!("Skipped wire list row {}: {}", skipped.row, skipped.reason);
    }

    let output = args.get(3).map(String::as_str).unwrap_or("grounding_list.xlsx");
    GroundTraceCore::write_report(&result, Path::new(output), &options)?;
    println!("\nWritten to {}", output);
    Ok(())
}
