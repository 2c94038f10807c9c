//! Commit path: stage bytes in the temp file, rename over the base file.

mod common;

use std::io::Write;

use common::{base_with, s, with_temp_root};
use stagefile::types::WriteState;
use stagefile::AtomicFile;

#[test]
fn commit_replaces_content_and_removes_temp() {
    let td = with_temp_root();
    let contents: [&[u8]; 3] = [b"hello world", b"x", &[0u8, 1, 2, 255, 254]];
    for (i, c) in contents.iter().enumerate() {
        let base = base_with(td.path(), &format!("f{i}.txt"), b"initial content");
        let mut f = AtomicFile::new(s(&base)).unwrap();

        let temp = f.start_write().unwrap();
        std::fs::write(&temp, c).unwrap();
        f.finish_write().unwrap();

        assert_eq!(std::fs::read(&base).unwrap(), *c);
        assert_eq!(f.read_fully().unwrap().as_bytes(), *c);
        assert!(!std::path::Path::new(&temp).exists(), "temp must be gone after commit");
    }
}

#[test]
fn commit_creates_missing_base() {
    let td = with_temp_root();
    let base = td.path().join("new.txt");
    let mut f = AtomicFile::new(s(&base)).unwrap();
    let temp = f.start_write().unwrap();
    std::fs::write(&temp, b"fresh").unwrap();
    f.finish_write().unwrap();
    assert_eq!(std::fs::read(&base).unwrap(), b"fresh");
}

#[test]
fn template_restored_after_commit() {
    let td = with_temp_root();
    let base = base_with(td.path(), "f.txt", b"content");
    let mut f = AtomicFile::new(s(&base)).unwrap();
    let temp = f.start_write().unwrap();
    assert_eq!(f.entity().new_file_name(), temp);
    f.finish_write().unwrap();
    assert_eq!(f.entity().new_file_name(), format!("{}_XXXXXX", s(&base)));
    assert_eq!(f.entity().state(), &WriteState::Committed);
}

#[test]
fn temp_name_has_base_prefix_and_differs() {
    let td = with_temp_root();
    let base = base_with(td.path(), "f.txt", b"content");
    let mut f = AtomicFile::new(s(&base)).unwrap();
    for _ in 0..5 {
        let temp = f.start_write().unwrap();
        assert!(temp.starts_with(&s(&base)));
        assert_ne!(temp, s(&base));
        assert_eq!(temp.len(), s(&base).len() + "_XXXXXX".len());
        let md = std::fs::metadata(&temp).unwrap();
        assert!(md.is_file());
        assert_eq!(md.len(), 0, "temp starts empty");
        f.fail_write().unwrap();
    }
}

#[test]
fn write_stream_commit() {
    let td = with_temp_root();
    let base = base_with(td.path(), "f.txt", b"old");
    let mut f = AtomicFile::new(s(&base)).unwrap();
    let mut stream = f.start_write_stream().unwrap();
    assert!(f.is_write_pending());
    assert_eq!(stream.path(), std::path::Path::new(f.entity().new_file_name()));
    stream.write_all(b"streamed ").unwrap();
    stream.write_all(b"bytes").unwrap();
    assert_eq!(std::fs::read(&base).unwrap(), b"old", "nothing visible before commit");
    stream.close().unwrap();
    f.finish_write().unwrap();
    assert_eq!(std::fs::read(&base).unwrap(), b"streamed bytes");
}

#[test]
fn dot_component_in_base_path_commits() {
    let td = with_temp_root();
    std::fs::create_dir_all(td.path().join("sub")).unwrap();
    // Absolute path with a `.` component resolves to the same directory.
    let base = td.path().join("sub/./f.txt");
    let mut f = AtomicFile::new(s(&base)).unwrap();
    let temp = f.start_write().unwrap();
    std::fs::write(&temp, b"dot").unwrap();
    f.finish_write().unwrap();
    assert_eq!(std::fs::read(td.path().join("sub/f.txt")).unwrap(), b"dot");
}

#[test]
fn commit_failure_keeps_cycle_pending() {
    let td = with_temp_root();
    let base = td.path().join("f.txt");
    let mut f = AtomicFile::new(s(&base)).unwrap();
    let temp = f.start_write().unwrap();
    std::fs::write(&temp, b"staged").unwrap();

    // A non-empty directory at the base path makes the rename fail.
    std::fs::create_dir(&base).unwrap();
    std::fs::write(base.join("occupant"), b"x").unwrap();

    let err = f.finish_write().unwrap_err();
    assert!(!err.is(libc::ENOENT));
    assert!(f.is_write_pending());
    assert_eq!(f.entity().state().temp_path(), Some(temp.as_str()));
    assert_eq!(f.entity().new_file_name(), temp);
    assert_eq!(std::fs::read(&temp).unwrap(), b"staged");

    // Rollback still works afterwards.
    f.fail_write().unwrap();
    assert!(!std::path::Path::new(&temp).exists());
}

#[test]
fn finish_without_start_is_enoent() {
    let td = with_temp_root();
    let base = base_with(td.path(), "f.txt", b"keep");
    let mut f = AtomicFile::new(s(&base)).unwrap();
    let err = f.finish_write().unwrap_err();
    assert!(err.is(libc::ENOENT));
    assert_eq!(std::fs::read(&base).unwrap(), b"keep");
}

#[test]
fn commit_without_fsync_policy() {
    let td = with_temp_root();
    let base = base_with(td.path(), "f.txt", b"old");
    let mut policy = stagefile::policy::Policy::default();
    policy.durability.sync_on_commit = false;
    let mut f = AtomicFile::new(s(&base)).unwrap().with_policy(policy);
    let temp = f.start_write().unwrap();
    std::fs::write(&temp, b"new").unwrap();
    f.finish_write().unwrap();
    assert_eq!(std::fs::read(&base).unwrap(), b"new");
}
