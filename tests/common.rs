//! Shared test helpers for the stagefile integration tests.
#![allow(dead_code)]

use log::Level;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use stagefile::logging::{AuditSink, FactsEmitter};

/// A simple in-memory emitter to capture facts during tests.
#[derive(Clone, Default, Debug)]
pub struct TestEmitter {
    pub events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .unwrap()
            .push((subsystem.into(), event.into(), decision.into(), fields));
    }
}

impl TestEmitter {
    /// (event, decision) pairs in emission order.
    pub fn stages(&self) -> Vec<(String, String)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, ev, dec, _)| (ev.clone(), dec.clone()))
            .collect()
    }

    pub fn last(&self) -> Option<(String, String, String, Value)> {
        self.events.lock().unwrap().last().cloned()
    }
}

/// Audit sink that keeps every line.
#[derive(Clone, Default)]
pub struct TestAudit {
    pub lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl AuditSink for TestAudit {
    fn log(&self, level: Level, msg: &str) {
        self.lines.lock().unwrap().push((level, msg.to_string()));
    }
}

pub fn with_temp_root() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

/// Create `root/name` with `content` and return its path.
pub fn base_with(root: &Path, name: &str, content: &[u8]) -> PathBuf {
    let p = root.join(name);
    std::fs::write(&p, content).expect("write base");
    p
}

pub fn s(p: &Path) -> String {
    p.display().to_string()
}
