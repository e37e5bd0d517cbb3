#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Create a `lore` command isolated from the user's configuration.
#[allow(dead_code)]
pub fn lore_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lore"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("LORE_CONFIG");
    cmd.env_remove("LORE_OUTPUT_FORMAT");
    cmd.env_remove("LORE_CONTENT_ROOT");
    cmd.env("NO_COLOR", "1");
    cmd
}

#[allow(dead_code)]
pub const SIGNALS_DOC: &str = "---
title: Signals
skillLevel: intermediate
tags: [signals, state]
layout: topic.njk
---
# Signals

A signal holds a value and notifies readers when it changes.

## Creating a signal

```typescript
const count = signal(0);
count.set(1);
```

## Deriving state

### Computed values

```js
// Title: Doubling a counter
const double = computed(() => count() * 2);
```
";

#[allow(dead_code)]
pub const SAMPLES_JSON: &str = r#"[
  {
    "id": "counter",
    "title": "Signal counter",
    "code": "const count = signal(0);\ncount.update(v => v + 1);",
    "language": "typescript",
    "categories": ["reactivity"],
    "tags": ["state"],
    "difficulty": 1,
    "popularity": 0.9,
    "conceptPath": "signals/basics"
  },
  {
    "id": "doubler",
    "title": "Computed doubler",
    "code": "const double = computed(() => count() * 2);",
    "language": "typescript",
    "categories": ["reactivity"],
    "tags": ["derived"],
    "difficulty": 2,
    "popularity": 0.5,
    "conceptPath": "signals/computed"
  },
  {
    "id": "typeahead",
    "title": "Typeahead search",
    "code": "term$.pipe(debounceTime(300), switchMap(t => api.search(t))).subscribe();",
    "language": "typescript",
    "categories": ["rxjs"],
    "tags": ["operators"],
    "difficulty": 4,
    "popularity": 0.7,
    "conceptPath": "rxjs/operators"
  },
  {
    "id": "broken",
    "title": "Empty",
    "code": "",
    "language": "typescript"
  }
]"#;

#[allow(dead_code)]
pub const GLOSSARY_JSON: &str = r#"{
  "entries": [
    { "term": "signal", "definition": "A reactive value container", "keywords": ["signals"], "category": "reactivity" },
    { "term": "computed", "definition": "A derived signal", "category": "reactivity" }
  ]
}"#;

/// Temp directory holding the standard fixtures.
pub struct Fixtures {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl Fixtures {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create fixture dir");
        std::fs::create_dir_all(dir.path().join("topics/reactivity")).unwrap();
        std::fs::write(dir.path().join("topics/reactivity/signals.md"), SIGNALS_DOC).unwrap();
        std::fs::write(dir.path().join("samples.json"), SAMPLES_JSON).unwrap();
        std::fs::write(dir.path().join("glossary.json"), GLOSSARY_JSON).unwrap();
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn document(&self) -> PathBuf {
        self.path("topics/reactivity/signals.md")
    }
}

/// Run `lore` with `args` and parse stdout as JSON.
#[allow(dead_code)]
pub fn run_json(args: &[&str]) -> serde_json::Value {
    let output = lore_cmd()
        .args(args)
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("stdout is JSON")
}
