use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(dead_code)]
pub mod stub;

/// Nothing listens here; a run that reaches the network fails fast.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub module: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let module = make_fixture_module(tmp.path());
        Self {
            _tmp: tmp,
            home,
            module,
        }
    }

    /// Bare binary with a scrubbed environment.
    pub fn raw_cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("trackpush");
        cmd.env_clear().env("HOME", &self.home);
        cmd
    }

    /// Binary with a registry token, the fixture module and unreachable remotes.
    pub fn cmd(&self) -> Command {
        let mut cmd = self.raw_cmd();
        cmd.env("INPUT_REGISTRY_TOKEN", "registry-token")
            .env("INPUT_REGISTRY_URL", UNREACHABLE)
            .env("GITHUB_API_URL", UNREACHABLE)
            .env("INPUT_TIMEOUT_SECS", "5")
            .env("INPUT_INPUT", &self.module);
        cmd
    }

    /// A fully specified branch push of `track` from `ref_name`.
    pub fn push_cmd(&self, track: &str, default_branch: &str, ref_name: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.env("GITHUB_EVENT_NAME", "push")
            .env("GITHUB_REF_TYPE", "branch")
            .env("GITHUB_REF_NAME", ref_name)
            .env("INPUT_TRACK", track)
            .env("INPUT_DEFAULT_BRANCH", default_branch)
            .env("INPUT_GITHUB_TOKEN", "github-token")
            .env("GITHUB_REPOSITORY", "acme/weather")
            .env("GITHUB_SHA", SHA);
        cmd
    }
}

fn make_fixture_module(root: &Path) -> PathBuf {
    let module = root.join("proto");
    let pkg = module.join("acme/weather/v1");
    fs::create_dir_all(&pkg).expect("create module dirs");
    fs::write(
        module.join("buf.yaml"),
        "version: v1\nname: buf.build/acme/weather\n",
    )
    .expect("write buf.yaml");
    fs::write(
        pkg.join("weather.proto"),
        "syntax = \"proto3\";\npackage acme.weather.v1;\n",
    )
    .expect("write proto");
    module
}
