use alloc::{
  string::String,
  vec::Vec,
};

use crate::{
  errno::{
    SysError,
    SysResult,
  },
  flags::{
    MapFlags,
    OpenFlags,
    PipeFlags,
    Protection,
    Whence,
  },
  handle::Handle,
  stat::StatRecord,
};

/// The primitive operation set every backend provides.
///
/// Every method defaults to [`SysError::Unsupported`], so a backend only
/// overrides what its platform can do and the rest reports the gap instead of
/// emulating it.
///
/// # Safety
///
/// Implementors must ensure that:
/// - every native failure is translated into a [`SysError`] before returning
/// - `mmap` returns a region that is valid for exactly the requested length
///   until it is passed to `munmap`
/// - `mprotect` and `munmap` only act on the region they are given
pub unsafe trait System
where
  Self: Send + Sync,
{
  fn open(&self, path: &str, flags: OpenFlags, mode: u32) -> SysResult<Handle> {
    _ = (path, flags, mode);
    unsupported("open")
  }

  fn close(&self, handle: Handle) -> SysResult<()> {
    _ = handle;
    unsupported("close")
  }

  /// Reads up to `buf.len()` bytes. `Ok(0)` is end of stream.
  fn read(&self, handle: Handle, buf: &mut [u8]) -> SysResult<usize> {
    _ = (handle, buf);
    unsupported("read")
  }

  /// Writes up to `buf.len()` bytes and reports how many were taken. Short
  /// writes are not retried.
  fn write(&self, handle: Handle, buf: &[u8]) -> SysResult<usize> {
    _ = (handle, buf);
    unsupported("write")
  }

  fn seek(&self, handle: Handle, offset: i64, whence: Whence) -> SysResult<u64> {
    _ = (handle, offset, whence);
    unsupported("seek")
  }

  /// Metadata for `path`, following a terminal symbolic link.
  fn stat(&self, path: &str) -> SysResult<StatRecord> {
    _ = path;
    unsupported("stat")
  }

  /// Metadata for `path` itself, never following a terminal symbolic link.
  fn lstat(&self, path: &str) -> SysResult<StatRecord> {
    _ = path;
    unsupported("lstat")
  }

  fn mkdir(&self, path: &str, mode: u32) -> SysResult<()> {
    _ = (path, mode);
    unsupported("mkdir")
  }

  fn rmdir(&self, path: &str) -> SysResult<()> {
    _ = path;
    unsupported("rmdir")
  }

  fn unlink(&self, path: &str) -> SysResult<()> {
    _ = path;
    unsupported("unlink")
  }

  /// Maps `length` bytes of `handle` starting at `offset`. `None` maps
  /// anonymous memory and requires [`MapFlags::ANONYMOUS`].
  ///
  /// # Safety
  ///
  /// The region aliases the file or shared memory; the caller must not keep
  /// the slice past `munmap` and must uphold aliasing rules for shared
  /// mappings.
  unsafe fn mmap(
    &self,
    handle: Option<Handle>,
    offset: u64,
    length: usize,
    prot: Protection,
    flags: MapFlags,
  ) -> SysResult<&'static mut [u8]> {
    _ = (handle, offset, length, prot, flags);
    unsupported("mmap")
  }

  /// # Safety
  ///
  /// `region` must come from `mmap` on this system and still be mapped.
  /// Removing access from a region that is referenced elsewhere faults on the
  /// next access.
  unsafe fn mprotect(&self, region: &[u8], prot: Protection) -> SysResult<()> {
    _ = (region, prot);
    unsupported("mprotect")
  }

  /// # Safety
  ///
  /// `region` must come from `mmap` on this system and must not be accessed
  /// after this call.
  unsafe fn munmap(&self, region: &[u8]) -> SysResult<()> {
    _ = region;
    unsupported("munmap")
  }

  /// `None` when `key` is not set, `Some("")` when it is set but empty.
  fn getenv(&self, key: &str) -> Option<String> {
    _ = key;
    None
  }

  /// Snapshot of the process environment as `KEY=VALUE` entries.
  fn environ(&self) -> Vec<String> {
    Vec::new()
  }

  /// Connected `(read, write)` handle pair.
  fn pipe(&self) -> SysResult<(Handle, Handle)> {
    unsupported("pipe")
  }

  fn pipe2(&self, flags: PipeFlags) -> SysResult<(Handle, Handle)> {
    _ = flags;
    unsupported("pipe2")
  }

  fn kill(&self, pid: i32, signal: i32) -> SysResult<()> {
    _ = (pid, signal);
    unsupported("kill")
  }

  fn temp_dir(&self) -> String {
    String::new()
  }
}

pub(crate) fn unsupported<T>(op: &'static str) -> SysResult<T> {
  log::debug!("{op} is not available on the {BACKEND} backend");
  Err(SysError::Unsupported)
}

pub struct UnsupportedSystem {}
unsafe impl System for UnsupportedSystem {}

#[cfg(all(
  unix,
  any(
    target_os = "linux",
    target_os = "android",
    target_vendor = "apple",
    target_os = "freebsd"
  )
))]
mod posix;

cfg_if::cfg_if! {
  if #[cfg(all(
    target_os = "linux",
    any(target_arch = "x86_64", target_arch = "aarch64"),
    not(feature = "libc-backend")
  ))] {
    mod raw;

    pub use raw::RawSystem;
    pub type NativeSystem = RawSystem;
    pub static NATIVE: NativeSystem = RawSystem {};
    pub const BACKEND: &str = "raw-syscall";
  } else if #[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_vendor = "apple",
    target_os = "freebsd"
  ))] {
    mod clib;

    pub use clib::LibcSystem;
    pub type NativeSystem = LibcSystem;
    pub static NATIVE: NativeSystem = LibcSystem {};
    pub const BACKEND: &str = "libc";
  } else if #[cfg(windows)] {
    mod win32;

    pub use win32::Win32System;
    pub type NativeSystem = Win32System;
    pub static NATIVE: NativeSystem = Win32System {};
    pub const BACKEND: &str = "win32";
  } else {
    pub type NativeSystem = UnsupportedSystem;
    pub static NATIVE: NativeSystem = UnsupportedSystem {};
    pub const BACKEND: &str = "unsupported";
  }
}
