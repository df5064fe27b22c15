use resgen::{BundleLoader, XmlLoader};
use std::fs::File;
use std::io::Write;

/// Run the debug command: load a resource bundle and output it as JSON,
/// together with the parameter signature inferred for each resource.
pub fn run_debug_command(input: String, output: Option<String>) -> Result<(), String> {
    let bundle =
        XmlLoader::load_file(&input).map_err(|e| format!("Error reading {}: {}", input, e))?;

    let signatures: Vec<serde_json::Value> = bundle
        .resources
        .iter()
        .map(|resource| {
            serde_json::json!({
                "name": resource.name,
                "parameters": resource.signature().ok(),
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&serde_json::json!({
        "bundle": bundle,
        "signatures": signatures,
    }))
    .map_err(|e| format!("Error serializing to JSON: {}", e))?;

    match output {
        Some(output_path) => {
            File::create(&output_path)
                .and_then(|mut f| f.write_all(json.as_bytes()))
                .map_err(|e| format!("Error writing to {}: {}", output_path, e))?;
            println!("✅ Debug output written to: {}", output_path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
