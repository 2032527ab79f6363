use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Template directory populated with the given `(relative path, content)` files.
pub fn template_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_files(dir.path(), files);
    dir
}

pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// Writes `content` as `vars.json` inside `dir` and returns its path.
pub fn vars_file(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("vars.json");
    fs::write(&path, content).unwrap();
    path
}

/// Runs the compiled binary with the given arguments.
pub fn run_bin(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_slimbridge"))
        .args(args)
        .env_remove("SLIMBRIDGE_LOG")
        .output()
        .unwrap()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}
