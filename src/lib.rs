#![cfg_attr(not(test), no_std)]

//! Uniform file, directory, environment and memory-mapping primitives.
//!
//! Every function here forwards to the one backend selected for the build
//! target ([`BACKEND`]): raw Linux syscalls, the platform C library, or Win32.
//! Failures arrive as [`SysError`] regardless of the backend.

extern crate alloc;

use alloc::{
  string::String,
  vec::Vec,
};

pub use osprim_sys::{
  BACKEND,
  Handle,
  RawHandle,
  SysError,
  SysResult,
  flags::{
    MapFlags,
    OpenFlags,
    PipeFlags,
    Protection,
    Whence,
  },
  mode,
  names::DEV_NULL,
  prim::{
    page_align,
    page_size,
  },
  stat::{
    StatRecord,
    Timespec,
  },
};
use osprim_sys::{
  NATIVE,
  System,
};

pub mod prelude {
  pub use osprim_marshal::{
    CStringBuffer,
    MarshalError,
    RawBuffer,
  };
  pub use osprim_sys::prelude::*;
}

pub fn open(path: &str, flags: OpenFlags, mode: u32) -> SysResult<Handle> {
  NATIVE.open(path, flags, mode)
}

pub fn close(handle: Handle) -> SysResult<()> {
  NATIVE.close(handle)
}

pub fn read(handle: Handle, buf: &mut [u8]) -> SysResult<usize> {
  NATIVE.read(handle, buf)
}

pub fn write(handle: Handle, buf: &[u8]) -> SysResult<usize> {
  NATIVE.write(handle, buf)
}

/// Repositions `handle`. Reports [`SysError::Unsupported`] on the libc
/// backend.
pub fn seek(handle: Handle, offset: i64, whence: Whence) -> SysResult<u64> {
  NATIVE.seek(handle, offset, whence)
}

pub fn stat(path: &str) -> SysResult<StatRecord> {
  NATIVE.stat(path)
}

pub fn lstat(path: &str) -> SysResult<StatRecord> {
  NATIVE.lstat(path)
}

pub fn unlink(path: &str) -> SysResult<()> {
  NATIVE.unlink(path)
}

pub fn mkdir(path: &str, mode: u32) -> SysResult<()> {
  NATIVE.mkdir(path, mode)
}

pub fn rmdir(path: &str) -> SysResult<()> {
  NATIVE.rmdir(path)
}

/// # Safety
///
/// See [`System::mmap`].
pub unsafe fn mmap(
  handle: Option<Handle>,
  offset: u64,
  length: usize,
  prot: Protection,
  flags: MapFlags,
) -> SysResult<&'static mut [u8]> {
  unsafe { NATIVE.mmap(handle, offset, length, prot, flags) }
}

/// # Safety
///
/// See [`System::mprotect`].
pub unsafe fn mprotect(region: &[u8], prot: Protection) -> SysResult<()> {
  unsafe { NATIVE.mprotect(region, prot) }
}

/// # Safety
///
/// See [`System::munmap`].
pub unsafe fn munmap(region: &[u8]) -> SysResult<()> {
  unsafe { NATIVE.munmap(region) }
}

pub fn getenv(key: &str) -> Option<String> {
  NATIVE.getenv(key)
}

pub fn environ() -> Vec<String> {
  NATIVE.environ()
}

pub fn pipe() -> SysResult<(Handle, Handle)> {
  NATIVE.pipe()
}

pub fn pipe2(flags: PipeFlags) -> SysResult<(Handle, Handle)> {
  NATIVE.pipe2(flags)
}

pub fn kill(pid: i32, signal: i32) -> SysResult<()> {
  NATIVE.kill(pid, signal)
}

pub fn temp_dir() -> String {
  NATIVE.temp_dir()
}

pub fn dev_null() -> &'static str {
  DEV_NULL
}
