//! The fixed binary wire layout for persisted records.
//!
//! All multi-byte values are big-endian; integers are signed 32-bit,
//! floats IEEE-754, strings length-prefixed UTF-8. The layout is:
//!
//! ```text
//! stream       := recordCount:i32, record[recordCount]
//! record       := displayLabel:string, x:f64, y:f64, z:f64,
//!                 partitionKey:i32, snapshotCount:i32, snapshot[snapshotCount]
//! snapshot     := posX:f64, posY:f64, posZ:f64, yaw:f32, headYaw:f32,
//!                 heldItem:optionalItem, equipmentCount:i32,
//!                 equipment[equipmentCount]:optionalItem, food:i32, health:f32
//! optionalItem := present:u8(0|1), (itemId:string, meta:i32)?
//! string       := byteLen:i32, utf8Bytes[byteLen]
//! ```
//!
//! The wire format has no overlay form: encoding resolves a record's
//! timeline to full snapshots first, so a decoded record always has an
//! all-snapshot timeline. The `MAX_*` limits below bind both
//! directions: declared counts and lengths are validated against them
//! before anything is allocated on decode, and the encoder refuses
//! input past them rather than produce a stream the decoder would
//! reject.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use vestige_types::{
    EntitySnapshot, ItemDescriptor, LifeRecord, Orientation, Position, RegionId, TimelineEntry,
    Vitality,
};

use crate::error::ArchiveError;

/// Maximum number of records a single stream may declare.
pub const MAX_RECORDS: usize = 1 << 20;

/// Maximum number of snapshots a single record may declare.
pub const MAX_SNAPSHOTS: usize = 1 << 24;

/// Maximum number of equipment slots a single snapshot may declare.
pub const MAX_EQUIPMENT: usize = 64;

/// Maximum byte length of a single string.
pub const MAX_STRING_BYTES: usize = 1 << 16;

/// Cap on upfront allocation for declared counts. A count is validated
/// against its limit, but the data behind it may still run short, so
/// preallocation stays small enough that a lying count cannot balloon
/// memory before the read fails.
const PREALLOC_CAP: usize = 1024;

fn read_count<R: Read>(
    reader: &mut R,
    field: &'static str,
    limit: usize,
) -> Result<usize, ArchiveError> {
    let raw = reader.read_i32::<BigEndian>()?;
    let value = usize::try_from(raw).map_err(|_negative| ArchiveError::Corrupt {
        detail: format!("{field} {raw} is negative"),
    })?;
    if value > limit {
        return Err(ArchiveError::Corrupt {
            detail: format!("{field} {value} exceeds limit {limit}"),
        });
    }
    Ok(value)
}

fn write_count<W: Write>(
    writer: &mut W,
    field: &'static str,
    value: usize,
    limit: usize,
) -> Result<(), ArchiveError> {
    if value > limit {
        return Err(ArchiveError::LimitExceeded { field, value, limit });
    }
    let raw = i32::try_from(value)
        .map_err(|_conversion| ArchiveError::LimitExceeded { field, value, limit })?;
    writer.write_i32::<BigEndian>(raw)?;
    Ok(())
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, ArchiveError> {
    let len = read_count(reader, "string length", MAX_STRING_BYTES)?;
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes)
        .map_err(|err| ArchiveError::Corrupt { detail: format!("string is not UTF-8: {err}") })
}

fn write_string<W: Write>(writer: &mut W, value: &str) -> Result<(), ArchiveError> {
    write_count(writer, "string length", value.len(), MAX_STRING_BYTES)?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

fn read_item<R: Read>(reader: &mut R) -> Result<Option<ItemDescriptor>, ArchiveError> {
    let present = match reader.read_u8()? {
        0 => false,
        1 => true,
        other => {
            return Err(ArchiveError::Corrupt {
                detail: format!("item present flag is {other}, expected 0 or 1"),
            });
        }
    };
    if !present {
        return Ok(None);
    }
    let id = read_string(reader)?;
    let meta = reader.read_i32::<BigEndian>()?;
    Ok(Some(ItemDescriptor::new(id, meta)))
}

fn write_item<W: Write>(
    writer: &mut W,
    item: Option<&ItemDescriptor>,
) -> Result<(), ArchiveError> {
    match item {
        Some(item) => {
            writer.write_u8(1)?;
            write_string(writer, &item.id)?;
            writer.write_i32::<BigEndian>(item.meta)?;
        }
        None => writer.write_u8(0)?,
    }
    Ok(())
}

/// Decode one snapshot in the wire layout.
pub fn read_snapshot<R: Read>(reader: &mut R) -> Result<EntitySnapshot, ArchiveError> {
    let x = reader.read_f64::<BigEndian>()?;
    let y = reader.read_f64::<BigEndian>()?;
    let z = reader.read_f64::<BigEndian>()?;
    let yaw = reader.read_f32::<BigEndian>()?;
    let head_yaw = reader.read_f32::<BigEndian>()?;
    let held_item = read_item(reader)?;
    let slot_count = read_count(reader, "equipment count", MAX_EQUIPMENT)?;
    let mut equipment = Vec::with_capacity(slot_count);
    for _ in 0..slot_count {
        equipment.push(read_item(reader)?);
    }
    let food = reader.read_i32::<BigEndian>()?;
    let health = reader.read_f32::<BigEndian>()?;
    Ok(EntitySnapshot::new(
        Position::new(x, y, z),
        Orientation::new(yaw, head_yaw),
        held_item,
        equipment,
        Vitality::new(food, health),
    ))
}

/// Encode one snapshot in the wire layout.
pub fn write_snapshot<W: Write>(
    writer: &mut W,
    snapshot: &EntitySnapshot,
) -> Result<(), ArchiveError> {
    writer.write_f64::<BigEndian>(snapshot.position.x)?;
    writer.write_f64::<BigEndian>(snapshot.position.y)?;
    writer.write_f64::<BigEndian>(snapshot.position.z)?;
    writer.write_f32::<BigEndian>(snapshot.orientation.yaw)?;
    writer.write_f32::<BigEndian>(snapshot.orientation.head_yaw)?;
    write_item(writer, snapshot.held_item.as_ref())?;
    write_count(writer, "equipment count", snapshot.equipment.len(), MAX_EQUIPMENT)?;
    for slot in &snapshot.equipment {
        write_item(writer, slot.as_ref())?;
    }
    writer.write_i32::<BigEndian>(snapshot.vitality.food)?;
    writer.write_f32::<BigEndian>(snapshot.vitality.health)?;
    Ok(())
}

/// Decode one record. The returned timeline holds full snapshots only.
pub fn read_record<R: Read>(reader: &mut R) -> Result<LifeRecord, ArchiveError> {
    let name = read_string(reader)?;
    let x = reader.read_f64::<BigEndian>()?;
    let y = reader.read_f64::<BigEndian>()?;
    let z = reader.read_f64::<BigEndian>()?;
    let region = RegionId::new(reader.read_i32::<BigEndian>()?);
    let count = read_count(reader, "snapshot count", MAX_SNAPSHOTS)?;
    let mut timeline = Vec::with_capacity(count.min(PREALLOC_CAP));
    for _ in 0..count {
        timeline.push(TimelineEntry::Snapshot(read_snapshot(reader)?));
    }
    Ok(LifeRecord::new(name, Position::new(x, y, z), region, timeline))
}

/// Encode one record, resolving any overlay entries to full snapshots
/// first.
pub fn write_record<W: Write>(writer: &mut W, record: &LifeRecord) -> Result<(), ArchiveError> {
    let states = record.resolve()?;
    write_string(writer, record.name())?;
    writer.write_f64::<BigEndian>(record.origin().x)?;
    writer.write_f64::<BigEndian>(record.origin().y)?;
    writer.write_f64::<BigEndian>(record.origin().z)?;
    writer.write_i32::<BigEndian>(record.region().into_inner())?;
    write_count(writer, "snapshot count", states.len(), MAX_SNAPSHOTS)?;
    for state in &states {
        write_snapshot(writer, state)?;
    }
    Ok(())
}

/// Decode a whole stream: a record count followed by that many records.
pub fn read_stream<R: Read>(reader: &mut R) -> Result<Vec<LifeRecord>, ArchiveError> {
    let count = read_count(reader, "record count", MAX_RECORDS)?;
    let mut records = Vec::with_capacity(count.min(PREALLOC_CAP));
    for _ in 0..count {
        records.push(read_record(reader)?);
    }
    Ok(records)
}

/// Encode a whole stream: the record count followed by the records in
/// the given order.
pub fn write_stream<W: Write>(
    writer: &mut W,
    records: &[&LifeRecord],
) -> Result<(), ArchiveError> {
    write_count(writer, "record count", records.len(), MAX_RECORDS)?;
    for record in records {
        write_record(writer, record)?;
    }
    Ok(())
}
