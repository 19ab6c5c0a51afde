//! Deploy template synthesis tool.
//!
//! Reads a deploy parameters JSON file, assembles the full resource graph,
//! and writes the rendered template for the provisioning engine. The
//! fingerprint printed at the end identifies the graph; two runs over
//! identical parameters print the same one.
//!
//! ```sh
//! cargo run --example synth_template -p craft_stack -- \
//!     --params deploy_params.json --output template.json
//! ```

use craft_stack::params::DeployParams;
use craft_stack::synth::synthesize;
use craft_stack::template::template_fingerprint;

fn main() {
    let params_path = std::env::args()
        .skip_while(|a| a != "--params")
        .nth(1)
        .unwrap_or_else(|| "deploy_params.json".to_string());

    let output_path = std::env::args()
        .skip_while(|a| a != "--output")
        .nth(1)
        .unwrap_or_else(|| "template.json".to_string());

    println!("Deploy Template Synthesis");
    println!("=========================");
    println!("Parameters: {}", params_path);
    println!("Output:     {}", output_path);
    println!();

    let raw = match std::fs::read_to_string(&params_path) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("ERROR reading '{}': {}", params_path, e);
            std::process::exit(1);
        }
    };
    let params: DeployParams = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("ERROR: invalid deploy parameters: {}", e);
            std::process::exit(1);
        }
    };

    let template = match synthesize(&params) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("ERROR: {}", e.message());
            std::process::exit(1);
        }
    };

    println!("Results:");
    println!("  Resources:  {}", template.resources.len());
    println!("  Parameters: {}", template.parameters.len());
    println!("  Outputs:    {}", template.outputs.len());
    println!("  Fingerprint: {}", template_fingerprint(&template));

    match std::fs::write(&output_path, template.to_json_pretty()) {
        Ok(()) => println!("  Written to: {}", output_path),
        Err(e) => {
            eprintln!("  ERROR writing file: {}", e);
            std::process::exit(1);
        }
    }
}
