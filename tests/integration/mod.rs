// Registry snapshot and matcher config fixtures shared by the integration suites
// WHY: Every suite needs GRID-shaped JSON on disk; each one uses a different subset of these helpers

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for temporary registry snapshots and config files
#[allow(dead_code)]
pub struct RegistryFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

#[allow(dead_code)]
impl RegistryFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Write a registry snapshot with the given institute objects
    pub fn write_registry(&self, file_name: &str, institutes: Vec<Value>) -> PathBuf {
        let content = json!({ "institutes": institutes }).to_string();
        self.write_file(file_name, &content)
    }

    pub fn write_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    pub fn path<P: AsRef<Path>>(&self, relative_path: P) -> PathBuf {
        self.root_path.join(relative_path)
    }
}

/// One registry institute in GRID snapshot shape
pub fn institute(id: &str, name: &str, country: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "aliases": [],
        "labels": [],
        "relationships": [],
        "addresses": [{ "country": country, "country_code": "", "city": "" }]
    })
}

#[allow(dead_code)]
pub fn with_aliases(mut record: Value, aliases: &[&str]) -> Value {
    record["aliases"] = json!(aliases);
    record
}

#[allow(dead_code)]
pub fn with_parent(mut record: Value, parent_id: &str) -> Value {
    record["relationships"] = json!([{ "type": "Parent", "id": parent_id, "label": "" }]);
    record
}

/// Small registry covering the scenarios the integration tests exercise
#[allow(dead_code)]
pub fn sample_institutes() -> Vec<Value> {
    vec![
        with_aliases(
            institute("grid.38142.3c", "Harvard University", "United States"),
            &["Harvard"],
        ),
        institute("grid.471403.5", "Harvard Medical School", "United States"),
        with_aliases(
            institute("grid.116068.8", "Massachusetts Institute of Technology", "United States"),
            &["MIT"],
        ),
        institute("grid.4991.5", "University of Oxford", "United Kingdom"),
        institute("grid.26999.3d", "University of Tokyo", "Japan"),
        with_parent(
            institute("grid.410486.c", "Department of Physics (Oxford)", "United Kingdom"),
            "grid.4991.5",
        ),
    ]
}
