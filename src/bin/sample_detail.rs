//! Detailed dump of one or more samples from a local dataset file:
//! projection result, bar trace rows, bubble trace size and metadata lines

use biodash::panel;
use biodash::trace::{bar_trace, bubble_trace, TOP_N};
use biodash::{project, Dataset, SampleKey};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: sample_detail <samples.json> <sample-id> [sample-id...]");
        std::process::exit(1);
    }

    let text = match std::fs::read_to_string(&args[1]) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args[1], e);
            std::process::exit(1);
        }
    };
    let dataset = match Dataset::from_json(&text) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to parse {}: {}", args[1], e);
            std::process::exit(1);
        }
    };

    println!(
        "Dataset: {} names, {} samples, {} metadata records",
        dataset.names.len(),
        dataset.samples.len(),
        dataset.metadata.len()
    );

    for id in &args[2..] {
        println!("\n{}", "=".repeat(60));
        println!("SAMPLE: {}  (join key: {})", id, SampleKey::from_selection(id));
        println!("{}", "=".repeat(60));
        show_sample(&dataset, id);
    }
}

fn show_sample(dataset: &Dataset, id: &str) {
    let projection = project(dataset, id);

    match projection.sample {
        Some(sample) => {
            println!("OTUs: {}", sample.len());
            let ragged = sample.otu_ids.len() != sample.sample_values.len()
                || sample.otu_ids.len() != sample.otu_labels.len();
            if ragged {
                println!(
                    "WARNING: parallel arrays differ (ids={} values={} labels={})",
                    sample.otu_ids.len(),
                    sample.sample_values.len(),
                    sample.otu_labels.len()
                );
            }

            let bar = bar_trace(sample);
            println!("\nBar trace ({} of max {}, plot order bottom -> top):", bar.len(), TOP_N);
            println!("{:<12} {:>10}  {}", "Category", "Value", "Label");
            println!("{}", "-".repeat(60));
            for i in 0..bar.len() {
                println!("{:<12} {:>10}  {}", bar.y[i], bar.x[i], bar.text[i]);
            }

            let bubble = bubble_trace(sample);
            let max = bubble.y.iter().cloned().fold(0.0f64, f64::max);
            println!("\nBubble trace: {} points, largest value {}", bubble.len(), max);
        }
        None => println!("No sample record: charts would be drawn empty"),
    }

    println!("\nMetadata panel:");
    for line in panel::lines(projection.metadata) {
        println!("  {}", line.text);
    }
}
