//! Snapshot capture: truncation cap and checksum retention through the
//! public facade.

use groundwork::journal::{read_log, FsJournal, Journal};
use groundwork::logging::JsonlSink;
use groundwork::types::ApplyMode;
use groundwork::SetupEngine;

use crate::common::{file_ensure, with_temp_root};

#[test]
fn oversized_content_is_truncated_with_full_checksum() {
    let td = with_temp_root();
    let root = td.path();
    let big = "x".repeat(4096);
    std::fs::write(root.join("big.txt"), &big).unwrap();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root).with_snapshot_cap(1024);

    let ops = vec![file_ensure("file-1", "big.txt", "small now")];
    let plan = engine.plan(&ops, &engine.analyze(&ops));
    let result = engine.apply(&plan, ApplyMode::Commit);

    let entries = read_log(&result.log_path.unwrap()).unwrap();
    let before = &entries[0].before;
    assert_eq!(before.content.as_deref(), Some("<truncated 4096 bytes>"));
    // Checksum still covers the full pre-mutation payload.
    let mut expected = sha2::Sha256::new();
    use sha2::Digest as _;
    expected.update(big.as_bytes());
    assert_eq!(
        before.checksum.as_deref(),
        Some(hex::encode(expected.finalize()).as_str())
    );
}

#[test]
fn memory_journal_skips_snapshots_fs_journal_captures_them() {
    use groundwork::journal::MemoryJournal;

    let td = with_temp_root();
    let root = td.path();
    std::fs::write(root.join("f.txt"), "data").unwrap();
    let engine = SetupEngine::new(JsonlSink, JsonlSink, root);
    let ops = vec![file_ensure("file-1", "f.txt", "other")];
    let plan = engine.plan(&ops, &engine.analyze(&ops));

    let mut mem = MemoryJournal::new();
    engine.apply_with_journal(&plan, &mut mem, ApplyMode::Commit);
    assert_eq!(mem.entries()[0].before.content, None);

    // Restore and run again with a snapshotting journal.
    std::fs::write(root.join("f.txt"), "data").unwrap();
    let mut fsj = FsJournal::new(root);
    engine.apply_with_journal(&plan, &mut fsj, ApplyMode::Commit);
    assert_eq!(fsj.entries()[0].before.content.as_deref(), Some("data"));
}
