//! Dump the function definitions generated from a spec
//!
//! Usage: cargo run --example dump_functions -- <url-or-file>

use function_gen::{convert_spec_to_functions, GeneratorConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let source = std::env::args()
        .nth(1)
        .expect("usage: dump_functions <url-or-file>");

    let set = convert_spec_to_functions(&source, GeneratorConfig::default())
        .await
        .expect("failed to convert spec");

    println!("=== {} v{} ===", set.title, set.version);
    println!("{} functions", set.functions.len());

    for f in &set.functions {
        println!("- {}: {}", f.name, f.description);
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&set.functions).expect("failed to serialize")
    );
}
