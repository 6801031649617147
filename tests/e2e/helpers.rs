use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const APACHE_HEADER: &str = "/*\n\
 * Licensed to the Apache Software Foundation (ASF) under one\n\
 * or more contributor license agreements.  See the NOTICE file\n\
 * distributed with this work for additional information\n\
 * regarding copyright ownership.  The ASF licenses this file\n\
 * to you under the Apache License, Version 2.0 (the\n\
 * \"License\"); you may not use this file except in compliance\n\
 * with the License.  You may obtain a copy of the License at\n\
 *\n\
 *   http://www.apache.org/licenses/LICENSE-2.0\n\
 */\n";

pub struct TestProject {
    pub dir: TempDir,
    pub binary_path: String,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary_path = env!("CARGO_BIN_EXE_rat-audit").to_string();

        Self { dir, binary_path }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    pub fn report(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join("build/reports/rat").join(name))
            .unwrap_or_else(|e| panic!("missing report {}: {}", name, e))
    }

    pub fn run_auditor(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run rat-audit")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
