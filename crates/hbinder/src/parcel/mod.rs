// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parcel: growable transaction buffer with a read/write position.
//!
//! # Layout
//!
//! Every scalar occupies a 4-byte aligned slot, little-endian:
//!
//! ```text
//! i32 / u32 / f32 / bool      4 bytes
//! i64 / f64                   8 bytes
//! string                      i32 byte length (-1 = null), UTF-8, pad to 4
//! byte array                  i32 length (-1 = null), bytes, pad to 4
//! object slot                 i32 kind (0 null, 1 fd, 2 binder), i32 reserved
//! ```
//!
//! Handles (file descriptors, binders) cannot travel as bytes. Each object
//! slot is mirrored by an entry in the parcel's object table keyed by the
//! slot offset; region copies carry the table entries along.

mod exception;
mod object;

pub use exception::{Exception, ExceptionCode};
pub use object::{FileDescriptor, ParcelObject};

use crate::binder::IBinder;
use crate::error::{ParcelError, ParcelResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

const OBJECT_NULL: i32 = 0;
const OBJECT_FD: i32 = 1;
const OBJECT_BINDER: i32 = 2;

/// Bytes taken by an object slot in the data stream.
pub const OBJECT_SLOT_SIZE: usize = 8;

/// Strict-mode policy word written ahead of an interface descriptor.
const STRICT_MODE_POLICY: i32 = 0;

#[inline]
pub(crate) fn pad4(len: usize) -> usize {
    (len + 3) & !3
}

/// Generate little-endian write methods (buffer grows as needed).
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) {
            self.write_raw(&value.to_le_bytes());
        }
    };
}

/// Generate bounds-checked little-endian read methods.
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> ParcelResult<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_raw($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Transaction buffer.
#[derive(Clone)]
pub struct Parcel {
    data: Vec<u8>,
    position: usize,
    objects: BTreeMap<usize, ParcelObject>,
    allow_fds: bool,
}

impl Parcel {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            position: 0,
            objects: BTreeMap::new(),
            allow_fds: true,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Build a parcel from flat bytes (no handles).
    pub fn unmarshall(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
            ..Self::new()
        }
    }

    /// Flatten to bytes. Fails when the parcel carries handles.
    pub fn marshall(&self) -> ParcelResult<Vec<u8>> {
        if !self.objects.is_empty() {
            return Err(ParcelError::ObjectsNotMarshallable);
        }
        Ok(self.data.clone())
    }

    // ===================================================================
    // Position and size
    // ===================================================================

    #[inline]
    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn data_position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn data_avail(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    #[inline]
    pub fn data_capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Raw view of the data bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Move the cursor. Positions past the end are rejected.
    pub fn set_data_position(&mut self, position: usize) -> ParcelResult<()> {
        if position > self.data.len() {
            return Err(ParcelError::RegionOutOfBounds {
                offset: position,
                len: 0,
                size: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Move the cursor back to the start.
    #[inline]
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Truncate or zero-extend the data, dropping objects past the new end.
    pub fn set_data_size(&mut self, size: usize) {
        self.data.resize(size, 0);
        self.objects.retain(|offset, _| offset + OBJECT_SLOT_SIZE <= size);
        self.position = self.position.min(size);
    }

    /// Drop all data and objects.
    pub fn clear(&mut self) {
        self.data.clear();
        self.objects.clear();
        self.position = 0;
    }

    // ===================================================================
    // File descriptor policy
    // ===================================================================

    /// Narrow the fd policy (a parcel that forbids fds stays forbidding).
    /// Returns the previous value for [`Parcel::restore_allow_fds`].
    pub fn push_allow_fds(&mut self, allow: bool) -> bool {
        let previous = self.allow_fds;
        self.allow_fds = previous && allow;
        previous
    }

    pub fn restore_allow_fds(&mut self, previous: bool) {
        self.allow_fds = previous;
    }

    pub fn allow_fds(&self) -> bool {
        self.allow_fds
    }

    /// True when any file descriptor object is present.
    pub fn has_file_descriptors(&self) -> bool {
        self.objects.values().any(ParcelObject::is_file_descriptor)
    }

    /// True when a file descriptor slot starts inside `offset..offset + len`.
    pub fn has_file_descriptors_in(&self, offset: usize, len: usize) -> ParcelResult<bool> {
        let end = self.region_end(offset, len)?;
        Ok(self
            .objects
            .range(offset..end)
            .any(|(_, obj)| obj.is_file_descriptor()))
    }

    /// Number of handles in the object table.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // ===================================================================
    // Raw access
    // ===================================================================

    fn write_raw(&mut self, bytes: &[u8]) {
        let start = self.position;
        let end = start + bytes.len();
        if start < self.data.len() && !self.objects.is_empty() {
            // Overwritten slots no longer describe a handle.
            let first = start.saturating_sub(OBJECT_SLOT_SIZE - 1);
            let stale: Vec<usize> = self.objects.range(first..end).map(|(k, _)| *k).collect();
            for key in stale {
                self.objects.remove(&key);
            }
        }
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(bytes);
        self.position = end;
    }

    fn read_raw(&mut self, len: usize) -> ParcelResult<&[u8]> {
        let start = self.position;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| ParcelError::eof(start))?;
        self.position = end;
        Ok(&self.data[start..end])
    }

    fn region_end(&self, offset: usize, len: usize) -> ParcelResult<usize> {
        offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ParcelError::RegionOutOfBounds {
                offset,
                len,
                size: self.data.len(),
            })
    }

    fn write_padded(&mut self, bytes: &[u8]) {
        self.write_raw(bytes);
        let padding = pad4(bytes.len()) - bytes.len();
        if padding > 0 {
            self.write_raw(&[0u8; 3][..padding]);
        }
    }

    fn read_padded(&mut self, len: usize) -> ParcelResult<&[u8]> {
        let start = self.position;
        let padded = pad4(len);
        if padded > self.data_avail() {
            return Err(ParcelError::eof(start));
        }
        self.position += padded;
        Ok(&self.data[start..start + len])
    }

    /// Copy `len` bytes starting at `offset` of `other` to the current
    /// position, together with the handles recorded inside that range.
    pub fn append_from(&mut self, other: &Parcel, offset: usize, len: usize) -> ParcelResult<()> {
        let end = other.region_end(offset, len)?;
        if !self.allow_fds && other.has_file_descriptors_in(offset, len)? {
            return Err(ParcelError::FdsNotAllowed);
        }
        let base = self.position;
        self.write_raw(&other.data[offset..end]);
        for (slot, obj) in other.objects.range(offset..end) {
            if slot + OBJECT_SLOT_SIZE <= end {
                self.objects.insert(base + (slot - offset), obj.clone());
            }
        }
        Ok(())
    }

    // ===================================================================
    // Scalars
    // ===================================================================

    impl_write_le!(write_i32, i32);
    impl_write_le!(write_u32, u32);
    impl_write_le!(write_i64, i64);
    impl_write_le!(write_f32, f32);
    impl_write_le!(write_f64, f64);

    impl_read_le!(read_i32, i32, 4);
    impl_read_le!(read_u32, u32, 4);
    impl_read_le!(read_i64, i64, 8);
    impl_read_le!(read_f32, f32, 4);
    impl_read_le!(read_f64, f64, 8);

    pub fn write_bool(&mut self, value: bool) {
        self.write_i32(i32::from(value));
    }

    pub fn read_bool(&mut self) -> ParcelResult<bool> {
        Ok(self.read_i32()? != 0)
    }

    // ===================================================================
    // Length-prefixed blocks
    // ===================================================================

    /// Write a nullable UTF-8 string.
    pub fn write_string(&mut self, value: Option<&str>) {
        match value {
            None => self.write_i32(-1),
            Some(s) => {
                self.write_i32(s.len() as i32);
                self.write_padded(s.as_bytes());
            }
        }
    }

    /// Write a non-null string.
    pub fn write_str(&mut self, value: &str) {
        self.write_string(Some(value));
    }

    pub fn read_string(&mut self) -> ParcelResult<Option<String>> {
        let offset = self.position;
        let Some(len) = self.read_length()? else {
            return Ok(None);
        };
        let bytes = self.read_padded(len)?;
        std::str::from_utf8(bytes)
            .map(|s| Some(s.to_owned()))
            .map_err(|_| ParcelError::InvalidUtf8 { offset })
    }

    /// Read a string that must not be null.
    pub fn read_str(&mut self) -> ParcelResult<String> {
        let offset = self.position;
        self.read_string()?
            .ok_or(ParcelError::BadLength { offset, length: -1 })
    }

    pub fn write_byte_array(&mut self, value: Option<&[u8]>) {
        match value {
            None => self.write_i32(-1),
            Some(bytes) => {
                self.write_i32(bytes.len() as i32);
                self.write_padded(bytes);
            }
        }
    }

    pub fn read_byte_array(&mut self) -> ParcelResult<Option<Vec<u8>>> {
        let Some(len) = self.read_length()? else {
            return Ok(None);
        };
        Ok(Some(self.read_padded(len)?.to_vec()))
    }

    /// Read a length prefix: `-1` means null, other negatives are rejected.
    fn read_length(&mut self) -> ParcelResult<Option<usize>> {
        let offset = self.position;
        match self.read_i32()? {
            -1 => Ok(None),
            n if n < 0 => Err(ParcelError::BadLength { offset, length: n }),
            n => Ok(Some(n as usize)),
        }
    }

    /// Read an element count for an array of `element_size`-byte slots.
    ///
    /// Counts that could not fit in the remaining data are rejected before
    /// anything is allocated.
    pub fn read_array_len(&mut self, element_size: usize) -> ParcelResult<Option<usize>> {
        let offset = self.position;
        let Some(count) = self.read_length()? else {
            return Ok(None);
        };
        if count.saturating_mul(element_size.max(1)) > self.data_avail() {
            return Err(ParcelError::BadLength {
                offset,
                length: count as i32,
            });
        }
        Ok(Some(count))
    }

    pub fn write_string_array(&mut self, values: Option<&[Option<String>]>) {
        match values {
            None => self.write_i32(-1),
            Some(values) => {
                self.write_i32(values.len() as i32);
                for value in values {
                    self.write_string(value.as_deref());
                }
            }
        }
    }

    pub fn read_string_array(&mut self) -> ParcelResult<Option<Vec<Option<String>>>> {
        let Some(count) = self.read_array_len(4)? else {
            return Ok(None);
        };
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.read_string()?);
        }
        Ok(Some(out))
    }

    // ===================================================================
    // Handles
    // ===================================================================

    fn write_object_slot(&mut self, kind: i32, object: Option<ParcelObject>) {
        let offset = self.position;
        self.write_i32(kind);
        self.write_i32(0);
        if let Some(object) = object {
            self.objects.insert(offset, object);
        }
    }

    fn read_object_slot(&mut self) -> ParcelResult<(i32, usize)> {
        let offset = self.position;
        let kind = self.read_i32()?;
        let _reserved = self.read_i32()?;
        Ok((kind, offset))
    }

    /// Write a nullable file descriptor handle.
    pub fn write_file_descriptor(&mut self, fd: Option<&Arc<FileDescriptor>>) -> ParcelResult<()> {
        match fd {
            None => self.write_object_slot(OBJECT_NULL, None),
            Some(fd) => {
                if !self.allow_fds {
                    return Err(ParcelError::FdsNotAllowed);
                }
                self.write_object_slot(OBJECT_FD, Some(ParcelObject::FileDescriptor(Arc::clone(fd))));
            }
        }
        Ok(())
    }

    pub fn read_file_descriptor(&mut self) -> ParcelResult<Option<Arc<FileDescriptor>>> {
        let (kind, offset) = self.read_object_slot()?;
        match (kind, self.objects.get(&offset)) {
            (OBJECT_NULL, _) => Ok(None),
            (OBJECT_FD, Some(ParcelObject::FileDescriptor(fd))) => Ok(Some(Arc::clone(fd))),
            _ => Err(ParcelError::MissingObject { offset }),
        }
    }

    /// Write a nullable binder reference.
    pub fn write_binder(&mut self, binder: Option<&Arc<dyn IBinder>>) {
        match binder {
            None => self.write_object_slot(OBJECT_NULL, None),
            Some(binder) => {
                self.write_object_slot(OBJECT_BINDER, Some(ParcelObject::Binder(Arc::clone(binder))))
            }
        }
    }

    pub fn read_binder(&mut self) -> ParcelResult<Option<Arc<dyn IBinder>>> {
        let (kind, offset) = self.read_object_slot()?;
        match (kind, self.objects.get(&offset)) {
            (OBJECT_NULL, _) => Ok(None),
            (OBJECT_BINDER, Some(ParcelObject::Binder(binder))) => Ok(Some(Arc::clone(binder))),
            _ => Err(ParcelError::MissingObject { offset }),
        }
    }

    // ===================================================================
    // Interface token and exception envelope
    // ===================================================================

    /// Header identifying the interface a request is addressed to.
    pub fn write_interface_token(&mut self, descriptor: &str) {
        self.write_i32(STRICT_MODE_POLICY);
        self.write_str(descriptor);
    }

    /// Check the interface header written by [`Parcel::write_interface_token`].
    pub fn enforce_interface(&mut self, descriptor: &str) -> Result<(), Exception> {
        let _policy = self.read_i32()?;
        let actual = self.read_string()?;
        if actual.as_deref() == Some(descriptor) {
            Ok(())
        } else {
            Err(Exception::security(format!(
                "Binder invocation to an incorrect interface: expected {}, got {}",
                descriptor,
                actual.as_deref().unwrap_or("<null>")
            )))
        }
    }

    /// Reply marker for a call that completed normally.
    pub fn write_no_exception(&mut self) {
        self.write_i32(ExceptionCode::None.as_i32());
    }

    /// Serialize an exception into a reply.
    pub fn write_exception(&mut self, exception: &Exception) {
        self.write_i32(exception.code().as_i32());
        self.write_str(exception.message());
        if exception.code() == ExceptionCode::ServiceSpecific {
            self.write_i32(exception.service_specific_code());
        }
    }

    /// Read the reply marker: `Ok(())` for a normal reply, the remote
    /// exception otherwise. A truncated marker is a format error.
    pub fn read_exception(&mut self) -> crate::Result<()> {
        let raw = self.read_i32()?;
        if raw == 0 {
            return Ok(());
        }
        let code = ExceptionCode::from_i32(raw);
        let message = self.read_string()?.unwrap_or_default();
        let exception = if code == ExceptionCode::ServiceSpecific {
            Exception::service_specific(self.read_i32()?, message)
        } else {
            Exception::new(code, message)
        };
        Err(exception.into())
    }
}

impl Default for Parcel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Parcel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parcel")
            .field("data_size", &self.data.len())
            .field("position", &self.position)
            .field("objects", &self.objects.len())
            .field("allow_fds", &self.allow_fds)
            .finish()
    }
}

impl PartialEq for Parcel {
    /// Byte-level equality plus handle identity at the same offsets.
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
            && self.objects.len() == other.objects.len()
            && self
                .objects
                .iter()
                .zip(other.objects.iter())
                .all(|((ka, a), (kb, b))| ka == kb && a.same_object(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_I64: i64 = 0x1122_3344_5566_7788;

    fn temp_fd() -> Arc<FileDescriptor> {
        let file = tempfile::tempfile().expect("tempfile");
        Arc::new(FileDescriptor::from(file))
    }

    #[test]
    fn test_scalar_roundtrip_little_endian() {
        let mut parcel = Parcel::new();
        parcel.write_i32(-42);
        parcel.write_i64(TEST_I64);
        parcel.write_f32(1.5);
        parcel.write_f64(6.25);
        parcel.write_bool(true);
        assert_eq!(parcel.data_size(), 4 + 8 + 4 + 8 + 4);
        assert_eq!(&parcel.data()[0..4], &(-42i32).to_le_bytes());

        parcel.rewind();
        assert_eq!(parcel.read_i32().expect("i32"), -42);
        assert_eq!(parcel.read_i64().expect("i64"), TEST_I64);
        assert_eq!(parcel.read_f32().expect("f32"), 1.5);
        assert_eq!(parcel.read_f64().expect("f64"), 6.25);
        assert!(parcel.read_bool().expect("bool"));
        assert_eq!(parcel.data_avail(), 0);
    }

    #[test]
    fn test_read_overflow_reports_offset() {
        let mut parcel = Parcel::unmarshall(&[1, 0, 0, 0, 9]);
        parcel.read_i32().expect("first i32");
        match parcel.read_i32().unwrap_err() {
            ParcelError::ReadFailed { offset, reason } => {
                assert_eq!(offset, 4);
                assert_eq!(reason, "unexpected end of buffer");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_string_padding_and_null() {
        let mut parcel = Parcel::new();
        parcel.write_str("abcde");
        parcel.write_string(None);
        // 4 (len) + 8 (5 bytes padded) + 4 (null marker)
        assert_eq!(parcel.data_size(), 16);

        parcel.rewind();
        assert_eq!(parcel.read_string().expect("string").as_deref(), Some("abcde"));
        assert_eq!(parcel.read_string().expect("null"), None);
    }

    #[test]
    fn test_string_invalid_utf8() {
        let mut parcel = Parcel::new();
        parcel.write_byte_array(Some(&[0xFF, 0xFE]));
        parcel.rewind();
        assert_eq!(
            parcel.read_string().unwrap_err(),
            ParcelError::InvalidUtf8 { offset: 0 }
        );
    }

    #[test]
    fn test_negative_length_rejected() {
        let mut parcel = Parcel::new();
        parcel.write_i32(-7);
        parcel.rewind();
        assert_eq!(
            parcel.read_byte_array().unwrap_err(),
            ParcelError::BadLength { offset: 0, length: -7 }
        );
    }

    #[test]
    fn test_array_len_exceeding_data_rejected() {
        let mut parcel = Parcel::new();
        parcel.write_i32(1_000_000);
        parcel.write_i32(0);
        parcel.rewind();
        assert!(matches!(
            parcel.read_array_len(4),
            Err(ParcelError::BadLength { .. })
        ));
    }

    #[test]
    fn test_overwrite_in_place() {
        let mut parcel = Parcel::new();
        parcel.write_i32(0);
        parcel.write_i32(7);
        parcel.set_data_position(0).expect("reposition");
        parcel.write_i32(99);
        assert_eq!(parcel.data_size(), 8);
        parcel.rewind();
        assert_eq!(parcel.read_i32().expect("patched"), 99);
        assert_eq!(parcel.read_i32().expect("kept"), 7);
        assert!(parcel.set_data_position(9).is_err());
    }

    #[test]
    fn test_file_descriptor_objects_and_append_rebase() {
        let fd = temp_fd();
        let mut src = Parcel::new();
        src.write_i32(1);
        src.write_file_descriptor(Some(&fd)).expect("write fd");
        assert!(src.has_file_descriptors());
        assert!(!src.has_file_descriptors_in(0, 4).expect("range"));
        assert!(src.has_file_descriptors_in(4, 8).expect("range"));

        let mut dst = Parcel::new();
        dst.write_i32(0xAB);
        dst.append_from(&src, 4, OBJECT_SLOT_SIZE).expect("append");
        assert_eq!(dst.object_count(), 1);

        dst.set_data_position(4).expect("reposition");
        let read = dst.read_file_descriptor().expect("read fd").expect("non-null");
        assert!(Arc::ptr_eq(&read, &fd));
    }

    #[test]
    fn test_append_out_of_bounds() {
        let src = Parcel::unmarshall(&[0; 8]);
        let mut dst = Parcel::new();
        assert!(matches!(
            dst.append_from(&src, 4, 8),
            Err(ParcelError::RegionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_fds_not_allowed() {
        let fd = temp_fd();
        let mut parcel = Parcel::new();
        let previous = parcel.push_allow_fds(false);
        assert!(previous);
        assert_eq!(
            parcel.write_file_descriptor(Some(&fd)).unwrap_err(),
            ParcelError::FdsNotAllowed
        );
        // null handles are still fine
        parcel.write_file_descriptor(None).expect("null fd");
        parcel.restore_allow_fds(previous);
        parcel.write_file_descriptor(Some(&fd)).expect("fd allowed again");
    }

    #[test]
    fn test_missing_object_detected() {
        let mut parcel = Parcel::new();
        parcel.write_i32(OBJECT_FD);
        parcel.write_i32(0);
        parcel.rewind();
        assert_eq!(
            parcel.read_file_descriptor().unwrap_err(),
            ParcelError::MissingObject { offset: 0 }
        );
    }

    #[test]
    fn test_marshall_refuses_handles() {
        let mut parcel = Parcel::new();
        parcel.write_i32(5);
        assert_eq!(parcel.marshall().expect("flat"), 5i32.to_le_bytes().to_vec());
        parcel.write_file_descriptor(Some(&temp_fd())).expect("fd");
        assert_eq!(parcel.marshall().unwrap_err(), ParcelError::ObjectsNotMarshallable);
    }

    #[test]
    fn test_overwriting_slot_drops_object() {
        let mut parcel = Parcel::new();
        parcel.write_file_descriptor(Some(&temp_fd())).expect("fd");
        parcel.rewind();
        parcel.write_i64(0);
        assert_eq!(parcel.object_count(), 0);
    }

    #[test]
    fn test_interface_token() {
        let mut parcel = Parcel::new();
        parcel.write_interface_token("demo.IService");
        parcel.rewind();
        parcel.enforce_interface("demo.IService").expect("matching token");

        parcel.rewind();
        let err = parcel.enforce_interface("demo.IOther").unwrap_err();
        assert_eq!(err.code(), ExceptionCode::Security);
    }

    #[test]
    fn test_exception_envelope() {
        let mut reply = Parcel::new();
        reply.write_exception(&Exception::service_specific(42, "quota"));
        reply.rewind();
        match reply.read_exception().unwrap_err() {
            crate::Error::Remote(e) => {
                assert_eq!(e.code(), ExceptionCode::ServiceSpecific);
                assert_eq!(e.service_specific_code(), 42);
                assert_eq!(e.message(), "quota");
            }
            other => panic!("unexpected error {:?}", other),
        }

        let mut ok = Parcel::new();
        ok.write_no_exception();
        ok.rewind();
        ok.read_exception().expect("no exception");
    }

    #[test]
    fn test_set_data_size_truncates_objects() {
        let mut parcel = Parcel::new();
        parcel.write_i32(1);
        parcel.write_file_descriptor(Some(&temp_fd())).expect("fd");
        parcel.set_data_size(4);
        assert_eq!(parcel.data_size(), 4);
        assert_eq!(parcel.object_count(), 0);
        assert_eq!(parcel.data_position(), 4);
    }
}
