//! services/api/src/bin/openapi.rs
//!
//! This binary generates the OpenAPI specification for the selections REST API
//! and saves it to `openapi.json` (or the path given as the first argument).

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

/// Generates the OpenAPI specification and writes it to a file.
fn generate_spec(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec_json = api_doc.to_pretty_json()?;
    std::fs::write(path, spec_json)?;
    println!("OpenAPI specification for {} paths generated at {}", path_count(&api_doc), path);
    Ok(())
}

fn path_count(api_doc: &utoipa::openapi::OpenApi) -> usize {
    api_doc.paths.paths.len()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument overrides the output file.
    let path = std::env::args().nth(1).unwrap_or_else(|| "openapi.json".to_string());
    generate_spec(ApiDoc::openapi(), &path)?;
    Ok(())
}
