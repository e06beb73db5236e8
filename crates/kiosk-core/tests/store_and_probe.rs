//! Integration tests for the configuration store and the reachability probe.
//!
//! # Purpose
//!
//! These tests exercise `ConfigStore` and `ReachabilityProbe` through their
//! public API the same way the dashboard uses them:
//!
//! - First-run creation, legacy upgrade, and backfill of incomplete files.
//! - Save/load round trips through a *fresh* store instance, so nothing can
//!   be served from per-instance state.
//! - Change detection across a save.
//! - The OR semantics and the latency bound of the concurrent probe.

use std::fs;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use kiosk_core::{
    ConfigStore, KioskDocument, PollOutcome, ProbeOutcome, ProbeTargets, Prober,
    ReachabilityProbe,
};

fn fresh_store(dir: &tempfile::TempDir) -> ConfigStore {
    ConfigStore::new(dir.path().join("config.json"))
}

// ── ConfigStore ───────────────────────────────────────────────────────────────

#[test]
fn test_first_run_persists_exactly_the_default_shape() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let store = fresh_store(&dir);

    // Act
    let doc = store.load().unwrap();

    // Assert: returned value and file content agree.
    assert_eq!(doc, KioskDocument::default());
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    let keys: Vec<&str> = raw
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 4);
    for key in ["urls", "layout", "generator_url", "dashboard_enabled"] {
        assert!(keys.contains(&key), "missing key {key}");
    }
}

#[test]
fn test_legacy_list_file_is_upgraded() {
    let dir = tempfile::tempdir().unwrap();
    let store = fresh_store(&dir);
    fs::write(store.path(), r#"["a", "b"]"#).unwrap();

    let doc = store.load().unwrap();

    assert_eq!(
        doc,
        KioskDocument {
            urls: vec!["a".into(), "b".into()],
            layout: "auto".into(),
            generator_url: String::new(),
            dashboard_enabled: true,
        }
    );
}

#[test]
fn test_partial_document_is_backfilled_without_touching_urls() {
    let dir = tempfile::tempdir().unwrap();
    let store = fresh_store(&dir);
    fs::write(store.path(), r#"{"urls": ["x"]}"#).unwrap();

    let doc = store.load().unwrap();

    assert_eq!(doc.urls, vec!["x"]);
    assert_eq!(doc.layout, "auto");
    assert_eq!(doc.generator_url, "");
    assert!(doc.dashboard_enabled);
}

#[test]
fn test_save_then_load_via_fresh_store_round_trips() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let doc = KioskDocument {
        urls: vec!["https://grafana.local/d/1".into(), "https://news.local".into()],
        layout: "2x1".into(),
        generator_url: "http://gen.local/next".into(),
        dashboard_enabled: false,
    };

    // Act
    fresh_store(&dir).save(&doc).unwrap();
    let loaded = fresh_store(&dir).load().unwrap();

    // Assert
    assert_eq!(loaded, doc);
}

#[test]
fn test_saving_a_legacy_document_writes_the_full_shape() {
    let dir = tempfile::tempdir().unwrap();
    let store = fresh_store(&dir);
    fs::write(store.path(), r#"["a"]"#).unwrap();

    let doc = store.load().unwrap();
    store.save(&doc).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert!(raw.is_object());
    assert_eq!(raw["urls"], serde_json::json!(["a"]));
    assert_eq!(raw["dashboard_enabled"], serde_json::json!(true));
}

#[test]
fn test_change_detection_across_save() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let store = fresh_store(&dir);
    store.load().unwrap();

    // Act / Assert: first poll observes the file, second sees nothing new.
    assert!(matches!(store.poll_if_changed(), PollOutcome::Changed(_)));
    assert_eq!(store.poll_if_changed(), PollOutcome::Unchanged);

    // A save in between makes the next poll return the saved document.
    let mut doc = KioskDocument::default();
    doc.add_url("https://a.local");
    doc.set_layout("1x1");
    store.save(&doc).unwrap();

    assert_eq!(store.poll_if_changed(), PollOutcome::Changed(doc));
    assert_eq!(store.poll_if_changed(), PollOutcome::Unchanged);
}

#[test]
fn test_change_detection_is_per_store_instance() {
    let dir = tempfile::tempdir().unwrap();
    let first = fresh_store(&dir);
    first.load().unwrap();
    first.poll_if_changed();

    // A new instance starts from the unset sentinel.
    let second = fresh_store(&dir);
    assert!(matches!(second.poll_if_changed(), PollOutcome::Changed(_)));
    assert_eq!(first.poll_if_changed(), PollOutcome::Unchanged);
}

// ── ReachabilityProbe ─────────────────────────────────────────────────────────

/// Answers from a fixed table, optionally after a delay.
struct ScriptedProber {
    gateway: IpAddr,
    gateway_answer: ProbeOutcome,
    other_answer: ProbeOutcome,
    delay: Duration,
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, target: IpAddr, _timeout: Duration) -> ProbeOutcome {
        tokio::time::sleep(self.delay).await;
        if target == self.gateway {
            self.gateway_answer
        } else {
            self.other_answer
        }
    }
}

fn scripted(gateway: ProbeOutcome, internet: ProbeOutcome, delay: Duration) -> ReachabilityProbe {
    let targets = ProbeTargets::default();
    ReachabilityProbe::new(
        Arc::new(ScriptedProber {
            gateway: targets.gateway,
            gateway_answer: gateway,
            other_answer: internet,
            delay,
        }),
        targets,
        Duration::from_millis(300),
    )
}

#[tokio::test]
async fn test_or_semantics_over_all_combinations() {
    use ProbeOutcome::{Reachable as R, Unreachable as U};

    let cases = [(R, U, true), (U, R, true), (R, R, true), (U, U, false)];
    for (gateway, internet, expected) in cases {
        let probe = scripted(gateway, internet, Duration::ZERO);
        assert_eq!(
            probe.is_online().await,
            expected,
            "gateway={gateway:?} internet={internet:?}"
        );
    }
}

#[tokio::test]
async fn test_both_timeouts_cost_about_one_timeout() {
    // Arrange: both probes take the full 300 ms and fail.
    let delay = Duration::from_millis(300);
    let probe = scripted(ProbeOutcome::Unreachable, ProbeOutcome::Unreachable, delay);

    // Act
    let started = Instant::now();
    let online = probe.is_online().await;
    let elapsed = started.elapsed();

    // Assert: well under the 600 ms a sequential check would need.
    assert!(!online);
    assert!(elapsed >= delay);
    assert!(elapsed < Duration::from_millis(550), "took {elapsed:?}");
}
