// Fact helpers for atomic-file stages.
//
// Every fact carries a minimal envelope: `schema_version`, `ts`, `stage`, `path`, `decision`.
// Failures add `errno`, `error_code` and `error_message` from the shared error table.
use serde_json::{json, Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::constants::FACTS_SUBSYSTEM;
use crate::logging::FactsEmitter;
use crate::types::errors::Error;

pub(crate) const SCHEMA_VERSION: i64 = 1;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

#[must_use]
pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Stage for typed fact emission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Read,
    StartWrite,
    FinishWrite,
    FailWrite,
    Delete,
}

impl Stage {
    #[must_use]
    pub fn as_event(&self) -> &'static str {
        match self {
            Stage::Read => "read",
            Stage::StartWrite => "start_write",
            Stage::FinishWrite => "finish_write",
            Stage::FailWrite => "fail_write",
            Stage::Delete => "delete",
        }
    }
}

/// Decision severity for fact events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Success,
    Failure,
}

impl Decision {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
        }
    }
}

pub struct EventBuilder<'a> {
    facts: &'a dyn FactsEmitter,
    stage: Stage,
    fields: Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    pub fn new(facts: &'a dyn FactsEmitter, stage: Stage) -> Self {
        let mut fields = Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self {
            facts,
            stage,
            fields,
        }
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.fields.insert("path".into(), json!(path.into()));
        self
    }

    #[must_use]
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    #[must_use]
    pub fn error(mut self, e: &Error) -> Self {
        self.fields.insert("errno".into(), json!(e.errno));
        self.fields.insert("error_code".into(), json!(e.code));
        self.fields.insert("error_message".into(), json!(e.message));
        self
    }

    pub fn emit(mut self, decision: Decision) {
        self.fields
            .entry("schema_version")
            .or_insert(json!(SCHEMA_VERSION));
        self.fields.entry("ts").or_insert_with(|| json!(now_iso()));
        self.fields.entry("path").or_insert(json!(""));
        self.fields
            .entry("decision")
            .or_insert(json!(decision.as_str()));
        self.facts.emit(
            FACTS_SUBSYSTEM,
            self.stage.as_event(),
            decision.as_str(),
            Value::Object(self.fields),
        );
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success);
    }

    pub fn emit_failure(self) {
        self.emit(Decision::Failure);
    }
}
