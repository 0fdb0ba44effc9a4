//! Shared testing harness for `quill` integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const APP_MODULE: &str = "import { BrowserModule } from '@angular/platform-browser';
import { NgModule } from '@angular/core';

import { AppComponent } from './app.component';

@NgModule({
  declarations: [
    AppComponent
  ],
  imports: [
    BrowserModule
  ],
  providers: [],
  bootstrap: [AppComponent]
})
export class AppModule { }
";

/// A freshly scaffolded project named `foo` in a temporary directory.
#[allow(dead_code)]
pub struct TestContext {
    _root: TempDir,
    project: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let project = root.path().join("foo");
        let app = project.join("src").join("app");
        fs::create_dir_all(&app).expect("Failed to create app directory");
        fs::write(project.join("quill.toml"), "[project]\nname = \"foo\"\n")
            .expect("Failed to write quill.toml");
        fs::write(app.join("app.module.ts"), APP_MODULE).expect("Failed to write app module");
        fs::write(app.join("app.component.ts"), "export class AppComponent { }\n")
            .expect("Failed to write app component");

        Self {
            _root: root,
            project,
        }
    }

    /// Directory holding `quill.toml`.
    pub fn project(&self) -> &Path {
        &self.project
    }

    /// Path below `src/app`.
    pub fn app(&self, rest: &str) -> PathBuf {
        let app = self.project.join("src").join("app");
        if rest.is_empty() { app } else { app.join(rest) }
    }

    /// Build a bare `quill` command.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("quill").expect("Failed to locate quill binary");
        cmd.current_dir(&self.project).env_remove("QUILL_LOG");
        cmd
    }

    /// `quill generate directive <args>` run from the project directory.
    pub fn directive(&self, args: &[&str]) -> Command {
        self.directive_in(&self.project, args)
    }

    /// `quill generate directive <args>` run as if started in `dir`.
    pub fn directive_in(&self, dir: impl AsRef<Path>, args: &[&str]) -> Command {
        let mut cmd = self.cli();
        cmd.args(["generate", "directive"])
            .args(args)
            .arg("-C")
            .arg(dir.as_ref());
        cmd
    }

    /// Create a feature module like `foo/foo.module.ts` with an empty declaration list.
    pub fn add_module(&self, rel_dir: &str) -> PathBuf {
        let dir = self.app(rel_dir);
        fs::create_dir_all(&dir).expect("Failed to create module directory");
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .expect("module directory has a name")
            .to_string();
        let path = dir.join(format!("{}.module.ts", name));
        let class = format!("{}{}Module", name[..1].to_uppercase(), &name[1..]);
        fs::write(
            &path,
            format!(
                "import {{ NgModule }} from '@angular/core';
import {{ CommonModule }} from '@angular/common';

@NgModule({{
  imports: [
    CommonModule
  ],
  declarations: []
}})
export class {} {{ }}
",
                class
            ),
        )
        .expect("Failed to write module");
        path
    }

    pub fn read(&self, path: impl AsRef<Path>) -> String {
        fs::read_to_string(path).expect("Failed to read file")
    }
}
