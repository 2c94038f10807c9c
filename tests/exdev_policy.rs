//! Cross-filesystem commits: fail by default, copy fallback when the policy allows it.

mod common;

use std::env;
use std::path::Path;

use common::{base_with, s, with_temp_root, TestAudit, TestEmitter};
use serial_test::serial;
use stagefile::policy::{ExdevPolicy, Policy};
use stagefile::AtomicFile;

/// Sets an environment variable for the guard's lifetime, restoring the prior value on drop.
struct ScopedEnv {
    key: &'static str,
    prev: Option<String>,
}

impl ScopedEnv {
    fn set(key: &'static str, value: &str) -> Self {
        let prev = env::var(key).ok();
        env::set_var(key, value);
        Self { key, prev }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => env::set_var(self.key, v),
            None => env::remove_var(self.key),
        }
    }
}

fn fallback_policy() -> Policy {
    let mut p = Policy::default();
    p.commit.exdev = ExdevPolicy::CopyFallback;
    p
}

#[test]
#[serial]
fn exdev_fails_by_default_and_keeps_both_files() {
    let td = with_temp_root();
    let base = base_with(td.path(), "f.txt", b"committed");
    let mut f = AtomicFile::new(s(&base)).unwrap().with_forced_exdev(Some(true));
    let temp = f.start_write().unwrap();
    std::fs::write(&temp, b"staged").unwrap();

    let err = f.finish_write().unwrap_err();
    assert!(err.is(libc::EXDEV));
    assert_eq!(err.code, 13_900_016);
    assert_eq!(std::fs::read(&base).unwrap(), b"committed");
    assert_eq!(std::fs::read(&temp).unwrap(), b"staged");
    assert!(f.is_write_pending());

    f.fail_write().unwrap();
    assert!(!Path::new(&temp).exists());
}

#[test]
#[serial]
fn exdev_with_fallback_commits_degraded() {
    let td = with_temp_root();
    let base = base_with(td.path(), "f.txt", b"committed");
    let em = TestEmitter::default();
    let audit = TestAudit::default();
    let mut f = AtomicFile::with_emitters(s(&base), em.clone(), audit.clone())
        .with_policy(fallback_policy())
        .with_forced_exdev(Some(true));
    let temp = f.start_write().unwrap();
    std::fs::write(&temp, b"copied").unwrap();

    f.finish_write().unwrap();
    assert_eq!(std::fs::read(&base).unwrap(), b"copied");
    assert!(!Path::new(&temp).exists());
    assert!(!f.is_write_pending());

    let (_, event, decision, fields) = em.last().unwrap();
    assert_eq!(event, "finish_write");
    assert_eq!(decision, "success");
    assert_eq!(fields["details"]["degraded"], true);

    let lines = audit.lines.lock().unwrap();
    assert!(lines.iter().any(|(lvl, msg)| *lvl == log::Level::Warn && msg.contains("degraded")));
}

#[test]
#[serial]
fn plain_commit_is_not_degraded() {
    let td = with_temp_root();
    let base = base_with(td.path(), "f.txt", b"old");
    let em = TestEmitter::default();
    let mut f = AtomicFile::with_emitters(s(&base), em.clone(), TestAudit::default())
        .with_policy(fallback_policy())
        .with_forced_exdev(Some(false));
    let temp = f.start_write().unwrap();
    std::fs::write(&temp, b"new").unwrap();
    f.finish_write().unwrap();
    let (_, _, _, fields) = em.last().unwrap();
    assert_eq!(fields["details"]["degraded"], false);
}

#[test]
#[serial]
fn env_override_requires_opt_in() {
    let td = with_temp_root();
    let base = base_with(td.path(), "f.txt", b"old");

    // Without the opt-in the force flag is ignored.
    {
        let _force = ScopedEnv::set("STAGEFILE_FORCE_EXDEV", "1");
        let mut f = AtomicFile::new(s(&base)).unwrap();
        let temp = f.start_write().unwrap();
        std::fs::write(&temp, b"v1").unwrap();
        f.finish_write().unwrap();
        assert_eq!(std::fs::read(&base).unwrap(), b"v1");
    }

    {
        let _allow = ScopedEnv::set("STAGEFILE_TEST_ALLOW_ENV_OVERRIDES", "1");
        let _force = ScopedEnv::set("STAGEFILE_FORCE_EXDEV", "1");
        let mut f = AtomicFile::new(s(&base)).unwrap();
        let temp = f.start_write().unwrap();
        std::fs::write(&temp, b"v2").unwrap();
        assert!(f.finish_write().unwrap_err().is(libc::EXDEV));
        assert_eq!(std::fs::read(&base).unwrap(), b"v1");
        f.fail_write().unwrap();
    }
}

#[test]
fn policy_from_json_selects_fallback() {
    let p = Policy::from_json_str(r#"{"commit": {"exdev": "copy_fallback"}}"#).unwrap();
    assert_eq!(p.commit.exdev, ExdevPolicy::CopyFallback);
    assert!(p.durability.sync_on_commit);
    assert!(Policy::from_json_str("{not json").unwrap_err().is(libc::EINVAL));
}
