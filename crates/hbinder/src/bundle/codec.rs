// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container wire codec.
//!
//! # Wire format (little-endian)
//!
//! ```text
//! +------------------+
//! | i32 length       |  0 = empty, -1 = null (nullable slots only)
//! +------------------+
//! | i32 magic "BNDL" |  \
//! | i32 entry count  |   | `length` bytes
//! | entries...       |  /
//! +------------------+
//! entry := string key, i32 type tag, payload
//! ```
//!
//! Decoding copies the `length` bytes (and the handles inside them) into a
//! private parcel and returns a parcelled container; entries are parsed on
//! first access. Re-encoding a still-parcelled container copies its region
//! through unchanged.

use super::base::{BaseBundle, ContainerKind, EntryMap, Pending};
use super::value::{Value, ValueTag};
use super::{Bundle, PersistableBundle};
use crate::config::{DecodeOptions, BUNDLE_MAGIC, DEFAULT_MAX_NESTING_DEPTH};
use crate::error::{ParcelError, ParcelResult, Result};
use crate::parcel::Parcel;
use std::sync::Arc;

/// Smallest non-empty region: magic + entry count.
const MIN_REGION_LEN: usize = 8;

/// Smallest encoded entry: key length + type tag.
const MIN_ENTRY_LEN: usize = 8;

/// Length written for a null container reference.
const NULL_LENGTH: i32 = -1;

// =======================================================================
// Public entry points
// =======================================================================

/// Encode a container at the current position of `out`.
///
/// - empty sentinel or empty map: `length = 0` only
/// - parcelled: `length` then the region verbatim (objects included)
/// - materialized: length placeholder, magic, count, entries, back-patched
///   length
///
/// File descriptors inside a container whose fd policy forbids them fail
/// with [`ParcelError::FdsNotAllowed`]; the parcel's own policy is restored
/// either way.
pub fn write_to_parcel(container: &BaseBundle, out: &mut Parcel) -> Result<()> {
    container.write_at_depth(out, 0)?;
    Ok(())
}

/// Decode a [`Bundle`] header at the current position of `input`.
///
/// The returned container is parcelled (or the empty sentinel). Header
/// errors are returned unless `options` requests defusing, in which case
/// they are logged and an empty bundle comes back.
pub fn read_from_parcel(input: &mut Parcel, options: DecodeOptions) -> Result<Bundle> {
    let offset = input.data_position();
    let base = read_container(input, options, 0, ContainerKind::Bundle)?.ok_or(
        ParcelError::BadLength {
            offset,
            length: NULL_LENGTH,
        },
    )?;
    Ok(Bundle::from_base(base))
}

/// Decode a [`PersistableBundle`] header. Same rules as
/// [`read_from_parcel`]; disallowed value types surface when the entries are
/// parsed.
pub fn read_persistable_from_parcel(
    input: &mut Parcel,
    options: DecodeOptions,
) -> Result<PersistableBundle> {
    let offset = input.data_position();
    let base = read_container(input, options, 0, ContainerKind::Persistable)?.ok_or(
        ParcelError::BadLength {
            offset,
            length: NULL_LENGTH,
        },
    )?;
    Ok(PersistableBundle::from_base(base))
}

/// Decode a nullable bundle reference (`length = -1` is `None`).
pub fn read_nullable_from_parcel(
    input: &mut Parcel,
    options: DecodeOptions,
) -> Result<Option<Bundle>> {
    Ok(read_container(input, options, 0, ContainerKind::Bundle)?.map(Bundle::from_base))
}

/// Encode a nullable bundle reference.
pub fn write_nullable_to_parcel(bundle: Option<&Bundle>, out: &mut Parcel) -> Result<()> {
    match bundle {
        Some(bundle) => write_to_parcel(bundle, out),
        None => {
            out.write_i32(NULL_LENGTH);
            Ok(())
        }
    }
}

// =======================================================================
// Header
// =======================================================================

enum Header {
    Null,
    Empty,
    Region(Parcel),
}

fn read_header(input: &mut Parcel, options: DecodeOptions, depth: usize) -> ParcelResult<Header> {
    let offset = input.data_position();
    let length = input.read_i32()?;
    match length {
        0 => return Ok(Header::Empty),
        NULL_LENGTH => return Ok(Header::Null),
        n if n < MIN_REGION_LEN as i32 => {
            return Err(ParcelError::BadLength { offset, length: n });
        }
        _ => {}
    }

    let len = length as usize;
    let start = input.data_position();
    if len > input.data_avail() {
        return Err(ParcelError::RegionOutOfBounds {
            offset: start,
            len,
            size: input.data_size(),
        });
    }

    let magic = input.read_i32()?;
    if magic != BUNDLE_MAGIC {
        input.set_data_position(start + len)?;
        return Err(ParcelError::BadMagic {
            expected: BUNDLE_MAGIC,
            found: magic,
        });
    }
    if depth > options.depth_limit() {
        input.set_data_position(start + len)?;
        return Err(ParcelError::NestingTooDeep {
            limit: options.depth_limit(),
        });
    }

    let mut region = Parcel::with_capacity(len);
    region.append_from(input, start, len)?;
    input.set_data_position(start + len)?;
    Ok(Header::Region(region))
}

/// Read a container header. `Ok(None)` for a null reference.
pub(crate) fn read_container(
    input: &mut Parcel,
    options: DecodeOptions,
    depth: usize,
    kind: ContainerKind,
) -> ParcelResult<Option<BaseBundle>> {
    match read_header(input, options, depth) {
        Ok(Header::Null) => Ok(None),
        Ok(Header::Empty) => Ok(Some(BaseBundle::empty_parcel(kind, options))),
        Ok(Header::Region(region)) => Ok(Some(BaseBundle::parcelled(
            kind,
            Pending {
                region,
                options,
                depth,
            },
        ))),
        Err(e) if options.is_defusing() => {
            log::warn!("[bundle] bad {} header, defusing: {}", kind.name(), e);
            Ok(Some(BaseBundle::new(kind)))
        }
        Err(e) => Err(e),
    }
}

// =======================================================================
// Entries
// =======================================================================

/// Parse a captured region into `out`. Entries read before a failure stay
/// in `out`.
pub(crate) fn read_entries(
    region: &mut Parcel,
    options: DecodeOptions,
    depth: usize,
    kind: ContainerKind,
    out: &mut EntryMap,
) -> ParcelResult<()> {
    region.rewind();
    let _magic = region.read_i32()?;
    let count_offset = region.data_position();
    let count = region
        .read_array_len(MIN_ENTRY_LEN)?
        .ok_or(ParcelError::BadLength {
            offset: count_offset,
            length: NULL_LENGTH,
        })?;

    out.reserve(count);
    for _ in 0..count {
        let key_offset = region.data_position();
        let key = region.read_string()?.ok_or(ParcelError::BadLength {
            offset: key_offset,
            length: NULL_LENGTH,
        })?;
        let value = read_value(region, options, depth)?;
        if kind == ContainerKind::Persistable && !value.is_persistable() {
            return Err(ParcelError::DisallowedType {
                key,
                type_name: value.type_name(),
            });
        }
        out.insert(key, value);
    }

    match region.data_avail() {
        0 => Ok(()),
        remaining => Err(ParcelError::TrailingBytes { remaining }),
    }
}

fn read_array<T>(
    p: &mut Parcel,
    element_size: usize,
    mut read: impl FnMut(&mut Parcel) -> ParcelResult<T>,
) -> ParcelResult<Option<Vec<T>>> {
    let Some(count) = p.read_array_len(element_size)? else {
        return Ok(None);
    };
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(read(p)?);
    }
    Ok(Some(items))
}

fn nested_bundle(
    p: &mut Parcel,
    options: DecodeOptions,
    depth: usize,
) -> ParcelResult<Option<Arc<Bundle>>> {
    Ok(read_container(p, options, depth + 1, ContainerKind::Bundle)?
        .map(|base| Arc::new(Bundle::from_base(base))))
}

/// Read one tagged value.
fn read_value(p: &mut Parcel, options: DecodeOptions, depth: usize) -> ParcelResult<Value> {
    let offset = p.data_position();
    let raw = p.read_i32()?;
    let tag = ValueTag::from_i32(raw).ok_or(ParcelError::UnknownTypeTag { tag: raw, offset })?;

    let value = match tag {
        ValueTag::Null => Value::Null,
        ValueTag::String => p.read_string()?.map_or(Value::Null, Value::String),
        ValueTag::Int => Value::Int(p.read_i32()?),
        ValueTag::Bundle => nested_bundle(p, options, depth)?.map_or(Value::Null, Value::Bundle),
        ValueTag::PersistableBundle => {
            read_container(p, options, depth + 1, ContainerKind::Persistable)?.map_or(
                Value::Null,
                |base| Value::PersistableBundle(Arc::new(PersistableBundle::from_base(base))),
            )
        }
        ValueTag::Short => Value::Short(p.read_i32()? as i16),
        ValueTag::Long => Value::Long(p.read_i64()?),
        ValueTag::Float => Value::Float(p.read_f32()?),
        ValueTag::Double => Value::Double(p.read_f64()?),
        ValueTag::Bool => Value::Bool(p.read_bool()?),
        ValueTag::Byte => Value::Byte(p.read_i32()? as i8),
        ValueTag::Char => Value::Char(p.read_i32()? as u16),
        ValueTag::List => {
            if depth + 1 > options.depth_limit() {
                return Err(ParcelError::NestingTooDeep {
                    limit: options.depth_limit(),
                });
            }
            read_array(p, 4, |p| read_value(p, options, depth + 1))?
                .map_or(Value::Null, Value::List)
        }
        ValueTag::ByteArray => p.read_byte_array()?.map_or(Value::Null, Value::ByteArray),
        ValueTag::StringArray => p.read_string_array()?.map_or(Value::Null, Value::StringArray),
        ValueTag::Binder => p.read_binder()?.map_or(Value::Null, Value::Binder),
        ValueTag::FileDescriptor => p
            .read_file_descriptor()?
            .map_or(Value::Null, Value::FileDescriptor),
        ValueTag::BundleArray => read_array(p, 4, |p| nested_bundle(p, options, depth))?
            .map_or(Value::Null, Value::BundleArray),
        ValueTag::BoolArray => read_array(p, 4, Parcel::read_bool)?.map_or(Value::Null, Value::BoolArray),
        ValueTag::ShortArray => read_array(p, 4, |p| Ok(p.read_i32()? as i16))?
            .map_or(Value::Null, Value::ShortArray),
        ValueTag::CharArray => read_array(p, 4, |p| Ok(p.read_i32()? as u16))?
            .map_or(Value::Null, Value::CharArray),
        ValueTag::IntArray => read_array(p, 4, Parcel::read_i32)?.map_or(Value::Null, Value::IntArray),
        ValueTag::LongArray => read_array(p, 8, Parcel::read_i64)?.map_or(Value::Null, Value::LongArray),
        ValueTag::FloatArray => read_array(p, 4, Parcel::read_f32)?.map_or(Value::Null, Value::FloatArray),
        ValueTag::DoubleArray => {
            read_array(p, 8, Parcel::read_f64)?.map_or(Value::Null, Value::DoubleArray)
        }
    };
    Ok(value)
}

// =======================================================================
// Encoding
// =======================================================================

/// Pass-through encode of an undecoded region.
pub(crate) fn write_region(out: &mut Parcel, region: &Parcel) -> ParcelResult<()> {
    let length_pos = out.data_position();
    let size_before = out.data_size();
    let len = region.data_size();
    out.write_i32(len as i32);
    if len > 0 {
        if let Err(e) = out.append_from(region, 0, len) {
            rollback(out, length_pos, size_before);
            return Err(e);
        }
    }
    Ok(())
}

/// Drop a partially written container so `out` ends where it started.
fn rollback(out: &mut Parcel, length_pos: usize, size_before: usize) {
    out.set_data_size(size_before.max(length_pos));
    // length_pos <= data size after the resize
    let _ = out.set_data_position(length_pos);
}

/// Encode a materialized map.
pub(crate) fn write_map(out: &mut Parcel, map: &EntryMap, depth: usize) -> ParcelResult<()> {
    if depth > DEFAULT_MAX_NESTING_DEPTH {
        return Err(ParcelError::NestingTooDeep {
            limit: DEFAULT_MAX_NESTING_DEPTH,
        });
    }
    if map.is_empty() {
        out.write_i32(0);
        return Ok(());
    }

    let length_pos = out.data_position();
    let size_before = out.data_size();
    out.write_i32(NULL_LENGTH); // placeholder
    let start = out.data_position();
    out.write_i32(BUNDLE_MAGIC);
    out.write_i32(map.len() as i32);
    for (key, value) in map {
        out.write_str(key);
        if let Err(e) = write_value(out, value, depth) {
            rollback(out, length_pos, size_before);
            return Err(e);
        }
    }
    let end = out.data_position();

    out.set_data_position(length_pos)?;
    out.write_i32((end - start) as i32);
    out.set_data_position(end)?;
    Ok(())
}

fn write_array<T>(out: &mut Parcel, items: &[T], mut write: impl FnMut(&mut Parcel, &T)) {
    out.write_i32(items.len() as i32);
    for item in items {
        write(out, item);
    }
}

fn write_value(out: &mut Parcel, value: &Value, depth: usize) -> ParcelResult<()> {
    out.write_i32(value.tag().as_i32());
    match value {
        Value::Null => {}
        Value::Bool(v) => out.write_bool(*v),
        Value::Byte(v) => out.write_i32(i32::from(*v)),
        Value::Short(v) => out.write_i32(i32::from(*v)),
        Value::Char(v) => out.write_i32(i32::from(*v)),
        Value::Int(v) => out.write_i32(*v),
        Value::Long(v) => out.write_i64(*v),
        Value::Float(v) => out.write_f32(*v),
        Value::Double(v) => out.write_f64(*v),
        Value::String(v) => out.write_str(v),
        Value::Bundle(b) => b.write_at_depth(out, depth + 1)?,
        Value::PersistableBundle(b) => b.write_at_depth(out, depth + 1)?,
        Value::FileDescriptor(fd) => out.write_file_descriptor(Some(fd))?,
        Value::Binder(b) => out.write_binder(Some(b)),
        Value::BoolArray(v) => write_array(out, v, |p, x| p.write_bool(*x)),
        Value::ByteArray(v) => out.write_byte_array(Some(v.as_slice())),
        Value::ShortArray(v) => write_array(out, v, |p, x| p.write_i32(i32::from(*x))),
        Value::CharArray(v) => write_array(out, v, |p, x| p.write_i32(i32::from(*x))),
        Value::IntArray(v) => write_array(out, v, |p, x| p.write_i32(*x)),
        Value::LongArray(v) => write_array(out, v, |p, x| p.write_i64(*x)),
        Value::FloatArray(v) => write_array(out, v, |p, x| p.write_f32(*x)),
        Value::DoubleArray(v) => write_array(out, v, |p, x| p.write_f64(*x)),
        Value::StringArray(v) => out.write_string_array(Some(v.as_slice())),
        Value::BundleArray(items) => {
            out.write_i32(items.len() as i32);
            for item in items {
                match item {
                    Some(b) => b.write_at_depth(out, depth + 1)?,
                    None => out.write_i32(NULL_LENGTH),
                }
            }
        }
        Value::List(items) => {
            if depth + 1 > DEFAULT_MAX_NESTING_DEPTH {
                return Err(ParcelError::NestingTooDeep {
                    limit: DEFAULT_MAX_NESTING_DEPTH,
                });
            }
            out.write_i32(items.len() as i32);
            for item in items {
                write_value(out, item, depth + 1)?;
            }
        }
    }
    Ok(())
}
