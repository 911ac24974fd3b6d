//! Integration tests for the `vestige-archive` persistence layer.
//!
//! These tests exercise real files under a temporary directory; no
//! external services are required. Run with:
//!
//! ```bash
//! cargo test -p vestige-archive
//! ```

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::items_after_statements,
    clippy::missing_panics_doc,
    clippy::too_many_lines
)]

use tempfile::TempDir;
use vestige_archive::{ArchiveError, RegionArchive, wire};
use vestige_types::{
    EntitySnapshot, ItemDescriptor, LifeRecord, Orientation, Position, RegionId, TimelineEntry,
    Vitality,
};

// =============================================================================
// Helpers
// =============================================================================

fn snapshot_with_boots(boots: Option<ItemDescriptor>) -> EntitySnapshot {
    EntitySnapshot::new(
        Position::new(100.5, 64.0, -320.25),
        Orientation::new(135.0, 130.0),
        Some(ItemDescriptor::new("iron_sword", 5)),
        vec![Some(ItemDescriptor::new("iron_helmet", 0)), None, None, boots],
        Vitality::new(18, 17.5),
    )
}

fn wire_snapshot_bytes(snapshot: &EntitySnapshot) -> Vec<u8> {
    let mut bytes = Vec::new();
    wire::write_snapshot(&mut bytes, snapshot).expect("snapshot encoding failed");
    bytes
}

// =============================================================================
// Equipment-change scenario
// =============================================================================

/// One record, two snapshots, one equipment slot changed between them:
/// after save and load the snapshot contents must be byte-for-byte
/// identical once decompressed back to the wire layout.
#[test]
fn equipment_change_survives_the_archive_byte_for_byte() {
    let first = snapshot_with_boots(None);
    let second = snapshot_with_boots(Some(ItemDescriptor::new("iron_boots", 12)));
    let record = LifeRecord::new(
        "Armored".to_owned(),
        second.position,
        RegionId::new(0),
        vec![TimelineEntry::Snapshot(first.clone()), TimelineEntry::Snapshot(second.clone())],
    );

    let dir = TempDir::new().expect("failed to create temp dir");
    let archive = RegionArchive::new(dir.path());
    archive.save(RegionId::new(0), &[&record]).expect("save failed");

    let loaded = archive.load(RegionId::new(0)).expect("load failed");
    let loaded_record = loaded.first().expect("no record came back");
    let loaded_states = loaded_record.resolve().expect("loaded timeline did not resolve");

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded_states.len(), 2);
    let originals = [&first, &second];
    for (original, restored) in originals.iter().zip(loaded_states.iter()) {
        assert_eq!(wire_snapshot_bytes(original), wire_snapshot_bytes(restored));
    }
}

// =============================================================================
// Multi-region round trips
// =============================================================================

#[test]
fn several_regions_round_trip_independently() {
    let make_record = |region: i32, name: &str, x: f64| {
        let state = EntitySnapshot::new(
            Position::new(x, 64.0, 0.0),
            Orientation::new(0.0, 0.0),
            None,
            vec![None, None, None, None],
            Vitality::new(20, 20.0),
        );
        LifeRecord::new(
            name.to_owned(),
            state.position,
            RegionId::new(region),
            vec![TimelineEntry::Snapshot(state)],
        )
    };

    let overworld = vec![make_record(0, "Alpha", 1.0), make_record(0, "Beta", 2.0)];
    let nether = vec![make_record(-1, "Gamma", 3.0)];

    let dir = TempDir::new().expect("failed to create temp dir");
    let archive = RegionArchive::new(dir.path());
    let overworld_refs: Vec<&LifeRecord> = overworld.iter().collect();
    let nether_refs: Vec<&LifeRecord> = nether.iter().collect();
    archive.save(RegionId::new(0), &overworld_refs).expect("overworld save failed");
    archive.save(RegionId::new(-1), &nether_refs).expect("nether save failed");

    assert_eq!(archive.load(RegionId::new(0)).expect("overworld load failed"), overworld);
    assert_eq!(archive.load(RegionId::new(-1)).expect("nether load failed"), nether);
    // A region nothing was ever saved for stays empty.
    assert!(archive.load(RegionId::new(7)).expect("fresh region load failed").is_empty());
}

#[test]
fn wire_stream_encoding_is_deterministic_across_a_round_trip() {
    let first = snapshot_with_boots(None);
    let second = snapshot_with_boots(Some(ItemDescriptor::new("golden_boots", 0)));
    let record = LifeRecord::new(
        "Deterministic".to_owned(),
        second.position,
        RegionId::new(4),
        vec![TimelineEntry::Snapshot(first), TimelineEntry::Snapshot(second)],
    );

    let dir = TempDir::new().expect("failed to create temp dir");
    let archive = RegionArchive::new(dir.path());
    archive.save(RegionId::new(4), &[&record]).expect("save failed");
    let loaded = archive.load(RegionId::new(4)).expect("load failed");

    let mut original_stream = Vec::new();
    wire::write_stream(&mut original_stream, &[&record]).expect("original encoding failed");
    let loaded_refs: Vec<&LifeRecord> = loaded.iter().collect();
    let mut loaded_stream = Vec::new();
    wire::write_stream(&mut loaded_stream, &loaded_refs).expect("loaded encoding failed");

    assert_eq!(original_stream, loaded_stream);
}

// =============================================================================
// Wire limit boundaries
// =============================================================================

/// A record sitting exactly at the wire limits -- a label of
/// `MAX_STRING_BYTES` bytes and a snapshot with `MAX_EQUIPMENT`
/// equipment slots -- must survive the archive byte for byte.
#[test]
fn records_at_the_wire_limits_round_trip() {
    let mut state = snapshot_with_boots(None);
    state.equipment = vec![None; wire::MAX_EQUIPMENT];
    let record = LifeRecord::new(
        "v".repeat(wire::MAX_STRING_BYTES),
        state.position,
        RegionId::new(0),
        vec![TimelineEntry::Snapshot(state)],
    );

    let dir = TempDir::new().expect("failed to create temp dir");
    let archive = RegionArchive::new(dir.path());
    archive.save(RegionId::new(0), &[&record]).expect("save at the limits failed");
    let loaded = archive.load(RegionId::new(0)).expect("load at the limits failed");
    assert_eq!(loaded, vec![record.clone()]);

    let mut original_stream = Vec::new();
    wire::write_stream(&mut original_stream, &[&record]).expect("original encoding failed");
    let loaded_refs: Vec<&LifeRecord> = loaded.iter().collect();
    let mut loaded_stream = Vec::new();
    wire::write_stream(&mut loaded_stream, &loaded_refs).expect("loaded encoding failed");
    assert_eq!(original_stream, loaded_stream);
}

/// One byte or one slot past the limits must be refused by `save` with
/// a typed error naming the field, and a rejected save must leave
/// whatever the archive already held loadable.
#[test]
fn input_past_the_wire_limits_fails_at_save_not_load() {
    let state = snapshot_with_boots(None);
    let survivor = LifeRecord::new(
        "Survivor".to_owned(),
        state.position,
        RegionId::new(0),
        vec![TimelineEntry::Snapshot(state)],
    );

    let dir = TempDir::new().expect("failed to create temp dir");
    let archive = RegionArchive::new(dir.path());
    archive.save(RegionId::new(0), &[&survivor]).expect("initial save failed");

    let mut long_label = "x".repeat(wire::MAX_STRING_BYTES);
    long_label.push('x');
    let named_too_long = LifeRecord::new(
        long_label,
        Position::new(0.0, 64.0, 0.0),
        RegionId::new(0),
        vec![TimelineEntry::Snapshot(snapshot_with_boots(None))],
    );
    let err = archive
        .save(RegionId::new(0), &[&named_too_long])
        .expect_err("a label past the limit was persisted");
    assert!(
        matches!(err, ArchiveError::LimitExceeded { field: "string length", .. }),
        "got {err:?}"
    );

    let mut overloaded_state = snapshot_with_boots(None);
    overloaded_state.equipment = vec![None; wire::MAX_EQUIPMENT];
    overloaded_state.equipment.push(None);
    let overloaded = LifeRecord::new(
        "Overloaded".to_owned(),
        overloaded_state.position,
        RegionId::new(0),
        vec![TimelineEntry::Snapshot(overloaded_state)],
    );
    let err = archive
        .save(RegionId::new(0), &[&overloaded])
        .expect_err("an equipment vector past the limit was persisted");
    assert!(
        matches!(err, ArchiveError::LimitExceeded { field: "equipment count", .. }),
        "got {err:?}"
    );

    // Neither rejected save touched the file.
    let reloaded = archive.load(RegionId::new(0)).expect("prior archive no longer loads");
    assert_eq!(reloaded, vec![survivor]);
}
