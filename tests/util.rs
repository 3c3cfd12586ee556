use pki_fixtures::fixture::{self, FixtureConfig, FixtureSet};
use tempfile::TempDir;

/// Runs the full procedure with the default literals into a fresh temporary directory.
pub fn generate_fixture_set() -> (TempDir, FixtureConfig, FixtureSet) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = FixtureConfig::builder()
        .output_dir(dir.path().to_path_buf())
        .build();
    let set = fixture::generate(&config).expect("Failed to generate fixture set");
    (dir, config, set)
}

#[allow(dead_code)]
pub const FIXTURE_FILES: [&str; 5] = [
    "ca01.crt",
    "ca01.key",
    "client01.p12",
    "svr01.crt",
    "svr01.key",
];
