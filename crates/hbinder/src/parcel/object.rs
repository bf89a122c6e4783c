// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Blob handles carried in a parcel's object table.

use crate::binder::IBinder;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};
use std::sync::Arc;

/// Owned OS file descriptor. Closed on drop.
///
/// Parcels and bundles share descriptors through `Arc<FileDescriptor>`;
/// the descriptor closes when the last reference goes away.
pub struct FileDescriptor {
    fd: OwnedFd,
}

impl FileDescriptor {
    pub fn new(fd: OwnedFd) -> Self {
        Self { fd }
    }

    #[inline]
    pub fn raw(&self) -> RawFd {
        self.fd.as_raw_fd()
    }

    /// Duplicate into an independent descriptor (close-on-exec).
    pub fn dup(&self) -> io::Result<FileDescriptor> {
        // SAFETY:
        // - self.fd is a valid open descriptor for the lifetime of &self
        // - F_DUPFD_CLOEXEC returns a fresh descriptor or -1 (checked below)
        let raw = unsafe { libc::fcntl(self.fd.as_raw_fd(), libc::F_DUPFD_CLOEXEC, 0) };
        if raw < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: raw is a freshly duplicated descriptor owned by nobody else.
        Ok(Self::new(unsafe { OwnedFd::from_raw_fd(raw) }))
    }

    /// Duplicate as a `File` for std I/O.
    pub fn to_file(&self) -> io::Result<File> {
        Ok(File::from(self.dup()?.fd))
    }

    /// Write the whole buffer through a duplicate of this descriptor.
    pub fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        let mut file = self.to_file()?;
        file.write_all(bytes)?;
        file.flush()
    }
}

impl From<OwnedFd> for FileDescriptor {
    fn from(fd: OwnedFd) -> Self {
        Self::new(fd)
    }
}

impl From<File> for FileDescriptor {
    fn from(file: File) -> Self {
        Self::new(OwnedFd::from(file))
    }
}

impl AsFd for FileDescriptor {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for FileDescriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.raw()
    }
}

impl fmt::Debug for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileDescriptor({})", self.raw())
    }
}

/// Handle recorded at an object slot.
#[derive(Clone)]
pub enum ParcelObject {
    FileDescriptor(Arc<FileDescriptor>),
    Binder(Arc<dyn IBinder>),
}

impl ParcelObject {
    #[inline]
    pub fn is_file_descriptor(&self) -> bool {
        matches!(self, ParcelObject::FileDescriptor(_))
    }

    /// Identity comparison (same shared handle).
    pub fn same_object(&self, other: &ParcelObject) -> bool {
        match (self, other) {
            (ParcelObject::FileDescriptor(a), ParcelObject::FileDescriptor(b)) => Arc::ptr_eq(a, b),
            (ParcelObject::Binder(a), ParcelObject::Binder(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ParcelObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParcelObject::FileDescriptor(fd) => fd.fmt(f),
            ParcelObject::Binder(b) => write!(f, "{:?}", b),
        }
    }
}
