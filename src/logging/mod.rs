pub mod audit;
pub mod facts;

pub use audit::{now_iso, Decision, EventBuilder, Stage, TS_ZERO};
pub use facts::{AuditSink, FactsEmitter, JsonlSink};
