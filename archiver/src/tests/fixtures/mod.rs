use std::fs;
use std::path::Path;

/// Load a JSON response body fixture by name
pub fn load_json_fixture(fixture_name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src/tests/fixtures")
        .join(format!("{}.json", fixture_name));
    fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to load test fixture: {}", fixture_name))
}
