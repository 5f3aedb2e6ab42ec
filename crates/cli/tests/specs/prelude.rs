// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixtures for running the binary against a scratch project

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

pub const HOSTNAME: &str = "test-host";

/// A temporary project directory
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    /// A project with `hipercow init` already run
    pub fn init() -> Self {
        let project = Self::empty();
        project.hipercow().args(&["init", "."]).passes();
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn hipercow(&self) -> Cli {
        let mut cli = cli();
        cli.cmd
            .current_dir(self.dir.path())
            .env("HIPERCOW_CREDENTIALS", self.dir.path().join("credentials.json"));
        cli
    }

    /// Create a task and return its id
    pub fn create_task(&self, cmd: &[&str]) -> String {
        let mut args = vec!["task", "create"];
        args.extend_from_slice(cmd);
        self.hipercow().args(&args).passes().stdout().trim().to_string()
    }
}

/// The binary with a predictable environment
pub fn cli() -> Cli {
    let mut cmd = Command::cargo_bin("hipercow").unwrap();
    cmd.env("HIPERCOW_HOSTNAME", HOSTNAME)
        .env("NO_COLOR", "1")
        .env_remove("COLOR")
        .env_remove("HIPERCOW_LOG")
        .env_remove("HIPERCOW_NO_DRIVERS")
        .env_remove("DIDE_USERNAME")
        .env_remove("DIDE_PASSWORD");
    Cli { cmd }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    fn run(mut self) -> Output {
        let output = self.cmd.output().unwrap();
        Output {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn passes(self) -> Output {
        let output = self.run();
        assert_eq!(output.code, Some(0), "expected success\nstdout:\n{}\nstderr:\n{}", output.stdout, output.stderr);
        output
    }

    pub fn fails(self) -> Output {
        let output = self.run();
        assert_ne!(output.code, Some(0), "expected failure\nstdout:\n{}", output.stdout);
        output
    }

    pub fn exits_with(self, code: i32) -> Output {
        let output = self.run();
        assert_eq!(output.code, Some(code), "stdout:\n{}\nstderr:\n{}", output.stdout, output.stderr);
        output
    }
}

pub struct Output {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl Output {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_has(&self, expected: &str) -> &Self {
        assert!(self.stdout.contains(expected), "stdout missing {expected:?}:\n{}", self.stdout);
        self
    }

    pub fn stdout_lacks(&self, unexpected: &str) -> &Self {
        assert!(!self.stdout.contains(unexpected), "stdout has {unexpected:?}:\n{}", self.stdout);
        self
    }

    pub fn stdout_eq(&self, expected: &str) -> &Self {
        assert_eq!(self.stdout, expected);
        self
    }

    pub fn stderr_has(&self, expected: &str) -> &Self {
        assert!(self.stderr.contains(expected), "stderr missing {expected:?}:\n{}", self.stderr);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}
