//! End-to-end scenarios: scripted editor → pipeline → pointer file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use active_note::config::{Settings, SettingsStore};
use active_note::host::EventSource;
use active_note::host::script::ScriptHost;
use active_note::pipeline::{Pipeline, PipelineStats};

struct Vault {
    dir: tempfile::TempDir,
}

impl Vault {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".obsidian")).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn pointer_path(&self) -> PathBuf {
        self.root().join(".obsidian/active-note.json")
    }

    fn pointer(&self) -> Option<String> {
        std::fs::read_to_string(self.pointer_path()).ok()
    }

    /// Play a whole script through a fresh pipeline.
    async fn play(&self, script: &'static str) -> PipelineStats {
        let settings = Arc::new(SettingsStore::new(Settings::default(), ".obsidian"));
        let mut host = ScriptHost::new(script.as_bytes());
        let mut sub = host.subscribe().unwrap();
        let mut pipeline = Pipeline::new(host.editor(), settings, self.root());
        pipeline.run(&mut sub).await
    }
}

#[tokio::test]
async fn scenario_a_open_without_selection() {
    let vault = Vault::new();
    let stats = vault
        .play(r#"{"document":"notes/today.md","event":"focus-change"}"#)
        .await;

    assert_eq!(stats.writes, 1);
    assert_eq!(vault.pointer().unwrap(), r#"{"path":"notes/today.md"}"#);
}

#[tokio::test]
async fn scenario_b_selection_spans_lines() {
    let vault = Vault::new();
    vault
        .play(
            r#"{"document":"notes/today.md","selection":{"text":"hello\nworld","anchor":{"line":2,"ch":0},"head":{"line":4,"ch":5}},"event":"focus-change"}"#,
        )
        .await;

    assert_eq!(
        vault.pointer().unwrap(),
        r#"{"path":"notes/today.md","selection":{"text":"hello\nworld","startLine":3,"endLine":5}}"#
    );
}

#[tokio::test]
async fn scenario_c_upward_drag_is_normalized() {
    let vault = Vault::new();
    vault
        .play(
            r#"{"document":"a.md","selection":{"text":"up","anchor":{"line":6,"ch":2},"head":{"line":3,"ch":0}},"event":"focus-change"}"#,
        )
        .await;

    let value: serde_json::Value = serde_json::from_str(&vault.pointer().unwrap()).unwrap();
    assert_eq!(value["selection"]["startLine"], 4);
    assert_eq!(value["selection"]["endLine"], 7);
}

#[tokio::test(start_paused = true)]
async fn scenario_d_keystroke_burst_writes_once() {
    let vault = Vault::new();
    let settings = Arc::new(SettingsStore::new(Settings::default(), ".obsidian"));

    let (reader, mut writer) = tokio::io::duplex(4096);
    let mut host = ScriptHost::new(reader);
    let mut sub = host.subscribe().unwrap();
    let mut pipeline = Pipeline::new(host.editor(), settings, vault.root());
    let pointer = vault.pointer_path();

    let driver = async move {
        use tokio::io::AsyncWriteExt;

        for text in ["h", "he", "hel"] {
            let line = format!(
                r#"{{"document":"a.md","selection":{{"text":"{text}","anchor":{{"line":0,"ch":0}},"head":{{"line":0,"ch":3}}}},"event":"key-up"}}"#
            );
            writer.write_all(line.as_bytes()).await.unwrap();
            writer.write_all(b"\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        // t=300, last keystroke at t=200: nothing written yet.
        assert!(!pointer.exists());
        tokio::time::sleep(Duration::from_millis(199)).await;
        assert!(!pointer.exists());
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(pointer.exists());
        // Closing the writer ends the script.
    };

    let (stats, ()) = tokio::join!(pipeline.run(&mut sub), driver);
    assert_eq!(stats.writes, 1);
    assert_eq!(
        vault.pointer().unwrap(),
        r#"{"path":"a.md","selection":{"text":"hel","startLine":1,"endLine":1}}"#
    );
}

#[tokio::test(start_paused = true)]
async fn focus_change_replaces_pending_debounced_write() {
    let vault = Vault::new();
    let settings = Arc::new(SettingsStore::new(Settings::default(), ".obsidian"));

    let (reader, mut writer) = tokio::io::duplex(4096);
    let mut host = ScriptHost::new(reader);
    let mut sub = host.subscribe().unwrap();
    let mut pipeline = Pipeline::new(host.editor(), settings, vault.root());
    let pointer = vault.pointer_path();

    let driver = async move {
        use tokio::io::AsyncWriteExt;

        writer
            .write_all(b"{\"document\":\"a.md\",\"event\":\"mouse-up\"}\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        writer
            .write_all(b"{\"document\":\"b.md\",\"event\":\"focus-change\"}\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(
            std::fs::read_to_string(&pointer).unwrap(),
            r#"{"path":"b.md"}"#
        );
        // Well past the first deadline.
        tokio::time::sleep(Duration::from_millis(1000)).await;
    };

    let (stats, ()) = tokio::join!(pipeline.run(&mut sub), driver);
    assert_eq!(stats.writes, 1);
    assert_eq!(vault.pointer().unwrap(), r#"{"path":"b.md"}"#);
}

#[tokio::test]
async fn focus_change_captures_its_own_line() {
    let vault = Vault::new();
    let stats = vault
        .play("{\"document\":\"a.md\",\"event\":\"focus-change\"}\n{\"document\":\"b.md\"}\n")
        .await;

    assert_eq!(stats.writes, 1);
    assert_eq!(vault.pointer().unwrap(), r#"{"path":"a.md"}"#);
}

#[tokio::test]
async fn no_focused_document_writes_nothing() {
    let vault = Vault::new();
    std::fs::write(vault.pointer_path(), r#"{"path":"old.md"}"#).unwrap();

    let stats = vault
        .play("{\"document\":null,\"event\":\"focus-change\"}\n{\"event\":\"focus-change\"}\n")
        .await;

    assert_eq!(
        stats,
        PipelineStats {
            writes: 0,
            skipped: 2,
            failures: 0
        }
    );
    assert_eq!(vault.pointer().unwrap(), r#"{"path":"old.md"}"#);
}

#[tokio::test]
async fn scenario_e_missing_directory_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Arc::new(SettingsStore::new(Settings::default(), ".obsidian"));
    let script = "{\"document\":\"a.md\",\"event\":\"focus-change\"}\n{\"document\":\"b.md\",\"event\":\"focus-change\"}\n";

    let mut host = ScriptHost::new(script.as_bytes());
    let mut sub = host.subscribe().unwrap();
    let mut pipeline = Pipeline::new(host.editor(), settings, dir.path());
    let stats = pipeline.run(&mut sub).await;

    // Both events still attempted a write.
    assert_eq!(stats.failures, 2);
    assert_eq!(stats.writes, 0);
    assert!(!dir.path().join(".obsidian").exists());
}

#[tokio::test(start_paused = true)]
async fn custom_pointer_path_from_settings_file() {
    let vault = Vault::new();
    let settings_path = vault.root().join("data.json");
    std::fs::write(
        &settings_path,
        r#"{"pointerFilePath":"context.json","debounceMs":20}"#,
    )
    .unwrap();
    let settings = Arc::new(SettingsStore::open(&settings_path, ".obsidian").unwrap());

    let (reader, mut writer) = tokio::io::duplex(4096);
    let mut host = ScriptHost::new(reader);
    let mut sub = host.subscribe().unwrap();
    let mut pipeline = Pipeline::new(host.editor(), settings, vault.root());
    let custom = vault.root().join("context.json");

    let driver = async move {
        use tokio::io::AsyncWriteExt;

        writer
            .write_all(b"{\"document\":\"x.md\",\"event\":\"key-up\"}\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(
            std::fs::read_to_string(&custom).unwrap(),
            r#"{"path":"x.md"}"#
        );
    };

    let (stats, ()) = tokio::join!(pipeline.run(&mut sub), driver);
    assert_eq!(stats.writes, 1);
    assert!(!vault.pointer_path().exists());
}
