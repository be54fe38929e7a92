#![allow(dead_code)]
use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    dir: TempDir,
    pub cfg: PathBuf,
    pub manifest: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = dir.path().join("config");
        std::fs::create_dir_all(&cfg).expect("cfg dir");
        let manifest = dir.path().join("page1.json");
        std::fs::write(&manifest, include_str!("fixtures/page1.json")).expect("manifest");
        Self { dir, cfg, manifest }
    }

    pub fn bin(&self) -> Command {
        let mut cmd = Command::cargo_bin("marquee").unwrap();
        cmd.env("XDG_CONFIG_HOME", &self.cfg);
        cmd.env_remove("MARQUEE_LOG");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    pub fn write_settings(&self, toml: &str) {
        let dir = self.cfg.join("marquee");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("settings.toml"), toml).unwrap();
    }

    pub fn missing_path(&self) -> PathBuf {
        self.dir.path().join("does-not-exist.json")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
