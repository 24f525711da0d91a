//! Shared fixtures for integration tests.
//!
//! Each test gets an isolated environment: a demo cargo project, a private
//! expansion cache and settings file, and a stub `cargo` binary on PATH that
//! records every invocation (working directory and arguments) to a log file.
//! No network and no real toolchain are involved.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stub `cargo` that echoes a fixed expansion and logs its invocation.
const STUB_CARGO: &str = r#"#!/bin/sh
printf '%s|%s\n' "$PWD" "$*" >> "__LOG__"
if [ "$1" = "expand" ]; then
  shift
  echo "// expanded with args: $*"
  echo "fn expanded() {}"
  echo "warning: stub warning" 1>&2
  exit 0
fi
echo "unsupported stub invocation" 1>&2
exit 101
"#;

pub struct TestEnv {
    /// Owns every path below; dropped last
    _temp: TempDir,
    pub project: PathBuf,
    pub cache_dir: PathBuf,
    pub config_path: PathBuf,
    pub invocation_log: PathBuf,
    bin_dir: PathBuf,
}

impl TestEnv {
    /// Build a fresh environment with the default stub and default settings.
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        let project = root.join("demo");
        fs::create_dir_all(project.join("src").join("inner")).unwrap();
        fs::write(
            project.join("Cargo.toml"),
            "[package]\nname = \"demo\"\nversion = \"0.1.0\"\nedition = \"2021\"\n",
        )
        .unwrap();
        fs::write(project.join("src").join("main.rs"), "fn main() {}\n").unwrap();
        fs::write(project.join("src").join("inner").join("mod.rs"), "pub mod thing;\n").unwrap();
        fs::write(project.join("src").join("inner").join("thing.rs"), "pub fn thing() {}\n")
            .unwrap();

        let cache_dir = root.join("cache");
        fs::create_dir_all(&cache_dir).unwrap();

        let config_path = root.join("config.toml");
        fs::write(&config_path, "").unwrap();

        let bin_dir = root.join("bin");
        fs::create_dir_all(&bin_dir).unwrap();
        let invocation_log = root.join("invocations.log");

        let env = Self {
            _temp: temp,
            project,
            cache_dir,
            config_path,
            invocation_log,
            bin_dir,
        };
        env.stub_cargo(STUB_CARGO);
        env
    }

    /// Install a stub `cargo` script; `__LOG__` is replaced with the
    /// invocation log path.
    pub fn stub_cargo(&self, script: &str) {
        let path = self.bin_dir.join("cargo");
        let body = script.replace("__LOG__", &self.invocation_log.display().to_string());
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Overwrite the settings file.
    pub fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    /// A `rustexpand` command wired to this environment.
    pub fn command(&self) -> Command {
        let path = format!(
            "{}:{}",
            self.bin_dir.display(),
            std::env::var("PATH").unwrap_or_default()
        );
        let mut cmd = Command::cargo_bin("rustexpand").unwrap();
        cmd.env("RUSTEXPAND_CACHE_DIR", &self.cache_dir)
            .env("RUSTEXPAND_CONFIG", &self.config_path)
            .env("RUSTEXPAND_NO_PROGRESS", "1")
            .env("PATH", path)
            .current_dir(&self.project);
        cmd
    }

    /// Path to a file inside the demo project.
    pub fn project_file(&self, rel: &str) -> PathBuf {
        self.project.join(rel)
    }

    /// Recorded stub invocations as `(working_dir, args)` pairs.
    pub fn invocations(&self) -> Vec<(String, String)> {
        if !self.invocation_log.exists() {
            return Vec::new();
        }
        fs::read_to_string(&self.invocation_log)
            .unwrap()
            .lines()
            .map(|line| {
                let (dir, args) = line.split_once('|').unwrap();
                (dir.to_string(), args.to_string())
            })
            .collect()
    }

    /// The single rendered file in the cache, if exactly one exists.
    pub fn rendered_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.cache_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "rs"))
            .collect();
        files.sort();
        files
    }

    /// Canonicalized project path, for comparing against the stub's `$PWD`.
    pub fn canonical_project(&self) -> PathBuf {
        self.project.canonicalize().unwrap()
    }
}

/// Canonicalize a recorded working directory for comparison.
pub fn canonical(dir: &str) -> PathBuf {
    Path::new(dir).canonicalize().unwrap()
}
