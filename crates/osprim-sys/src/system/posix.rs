//! Pieces shared by the raw-syscall and libc backends.

use alloc::{
  string::String,
  vec::Vec,
};
use core::ffi::{
  c_char,
  c_int,
};

use osprim_marshal::{
  from_cstring,
  to_cstring,
};

use crate::{
  errno::{
    SysError,
    SysResult,
    from_errno,
  },
  flags::{
    MapFlags,
    OpenFlags,
    Protection,
  },
  handle::Handle,
  mode::{
    PERM_MASK,
    S_IFBLK,
    S_IFCHR,
    S_IFDIR,
    S_IFIFO,
    S_IFLNK,
    S_IFREG,
    S_IFSOCK,
  },
  prim::is_page_aligned,
  stat::{
    StatRecord,
    Timespec,
  },
};

#[cfg(target_os = "linux")]
fn last_errno() -> c_int {
  unsafe { *libc::__errno_location() }
}

#[cfg(target_os = "android")]
fn last_errno() -> c_int {
  unsafe { *libc::__errno() }
}

#[cfg(any(target_vendor = "apple", target_os = "freebsd"))]
fn last_errno() -> c_int {
  unsafe { *libc::__error() }
}

/// Translates the current errno for a failed `op`.
pub(super) fn fail<T>(op: &'static str) -> SysResult<T> {
  let code = last_errno();
  let err = from_errno(code);
  log::trace!("{op} failed: errno {code} -> {err:?}");
  Err(err)
}

pub(super) fn open_flags(flags: OpenFlags) -> c_int {
  let mut native = match (flags.contains(OpenFlags::READ), flags.is_writable()) {
    (true, true) => libc::O_RDWR,
    (false, true) => libc::O_WRONLY,
    _ => libc::O_RDONLY,
  };

  if flags.contains(OpenFlags::CREATE) {
    native |= libc::O_CREAT;
  }
  if flags.contains(OpenFlags::TRUNCATE) {
    native |= libc::O_TRUNC;
  }
  if flags.contains(OpenFlags::APPEND) {
    native |= libc::O_APPEND;
  }
  if flags.contains(OpenFlags::EXCLUSIVE) {
    native |= libc::O_EXCL;
  }
  native
}

pub(super) fn prot_flags(prot: Protection) -> c_int {
  let mut native = libc::PROT_NONE;
  if prot.contains(Protection::READ) {
    native |= libc::PROT_READ;
  }
  if prot.contains(Protection::WRITE) {
    native |= libc::PROT_WRITE;
  }
  if prot.contains(Protection::EXEC) {
    native |= libc::PROT_EXEC;
  }
  native
}

pub(super) fn map_flags(flags: MapFlags) -> c_int {
  let mut native = 0;
  if flags.contains(MapFlags::SHARED) {
    native |= libc::MAP_SHARED;
  }
  if flags.contains(MapFlags::PRIVATE) {
    native |= libc::MAP_PRIVATE;
  }
  if flags.contains(MapFlags::ANONYMOUS) {
    native |= libc::MAP_ANON;
  }
  native
}

/// Converts a mapping offset to the native type, rejecting values the target
/// cannot represent or that are not page aligned.
pub(super) fn map_offset(offset: u64) -> SysResult<libc::off_t> {
  let aligned = usize::try_from(offset).is_ok_and(is_page_aligned);
  if !aligned {
    return Err(SysError::InvalidArgument);
  }
  libc::off_t::try_from(offset).map_err(|_| SysError::InvalidArgument)
}

/// Checks the mapping request and returns the descriptor and offset to pass
/// down.
pub(super) fn map_target(
  handle: Option<Handle>,
  offset: u64,
  length: usize,
  flags: MapFlags,
) -> SysResult<(c_int, libc::off_t)> {
  if length == 0 || flags.contains(MapFlags::SHARED) == flags.contains(MapFlags::PRIVATE) {
    return Err(SysError::InvalidArgument);
  }
  let offset = map_offset(offset)?;

  match (handle, flags.contains(MapFlags::ANONYMOUS)) {
    (Some(handle), false) => Ok((handle.as_raw(), offset)),
    (None, true) => Ok((-1, offset)),
    _ => Err(SysError::InvalidArgument),
  }
}

fn normalize_mode(native: u32) -> u32 {
  let ty = match native & libc::S_IFMT as u32 {
    t if t == libc::S_IFREG as u32 => S_IFREG,
    t if t == libc::S_IFDIR as u32 => S_IFDIR,
    t if t == libc::S_IFLNK as u32 => S_IFLNK,
    t if t == libc::S_IFCHR as u32 => S_IFCHR,
    t if t == libc::S_IFBLK as u32 => S_IFBLK,
    t if t == libc::S_IFIFO as u32 => S_IFIFO,
    t if t == libc::S_IFSOCK as u32 => S_IFSOCK,
    _ => 0,
  };
  ty | (native & PERM_MASK)
}

pub(super) fn stat_from_native(st: &libc::stat) -> StatRecord {
  let record = StatRecord {
    dev: st.st_dev as u64,
    mode: normalize_mode(st.st_mode as u32),
    nlink: st.st_nlink as u64,
    ino: st.st_ino as u64,
    uid: st.st_uid,
    gid: st.st_gid,
    rdev: st.st_rdev as u64,
    size: st.st_size as i64,
    blocks: st.st_blocks as i64,
    blksize: st.st_blksize as i64,
    atime: Timespec::new(st.st_atime as i64, st.st_atime_nsec as i64),
    mtime: Timespec::new(st.st_mtime as i64, st.st_mtime_nsec as i64),
    ctime: Timespec::new(st.st_ctime as i64, st.st_ctime_nsec as i64),
    ..StatRecord::default()
  };

  #[cfg(any(target_vendor = "apple", target_os = "freebsd"))]
  let record = StatRecord {
    btime: Timespec::new(st.st_birthtime as i64, st.st_birthtime_nsec as i64),
    flags: st.st_flags,
    generation: st.st_gen,
    ..record
  };

  record
}

pub(super) fn getenv(key: &str) -> Option<String> {
  let key = to_cstring(key).ok()?;
  let raw = unsafe { libc::getenv(key.as_ptr()) };
  if raw.is_null() {
    return None;
  }
  Some(unsafe { from_cstring(raw) })
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
fn environ_table() -> *const *const c_char {
  unsafe extern "C" {
    static mut environ: *const *const c_char;
  }

  unsafe { environ }
}

#[cfg(target_vendor = "apple")]
fn environ_table() -> *const *const c_char {
  unsafe { *libc::_NSGetEnviron() as *const *const c_char }
}

pub(super) fn environ() -> Vec<String> {
  let mut cursor = environ_table();
  let mut envs = Vec::new();
  if cursor.is_null() {
    return envs;
  }

  loop {
    let entry = unsafe { *cursor };
    if entry.is_null() {
      break;
    }
    envs.push(unsafe { from_cstring(entry) });
    cursor = unsafe { cursor.add(1) };
  }
  envs
}

pub(super) fn temp_dir() -> String {
  match getenv("TMPDIR") {
    Some(dir) if !dir.is_empty() => dir,
    _ => String::from("/tmp"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prim::page_size;

  #[test]
  fn test_map_offset_aligned() {
    let ps = page_size() as u64;
    assert_eq!(map_offset(0), Ok(0));
    assert_eq!(map_offset(ps), Ok(ps as libc::off_t));
    assert_eq!(map_offset(ps * 3), Ok((ps * 3) as libc::off_t));
  }

  #[test]
  fn test_map_offset_unaligned() {
    assert_eq!(map_offset(1), Err(SysError::InvalidArgument));
    assert_eq!(map_offset(page_size() as u64 + 1), Err(SysError::InvalidArgument));
  }

  #[test]
  fn test_map_offset_out_of_range() {
    // Page aligned, but past what off_t holds.
    assert_eq!(map_offset(u64::MAX & !0xFFFF), Err(SysError::InvalidArgument));
    if usize::BITS < 64 {
      assert_eq!(map_offset(1 << 32), Err(SysError::InvalidArgument));
    }
  }

  #[test]
  fn test_map_target_keeps_high_offset() {
    let ps = page_size() as u64;
    let handle = Handle::from_raw(3);
    let (fd, off) = map_target(Some(handle), ps * 2, 16, MapFlags::PRIVATE).unwrap();
    assert_eq!(fd, 3);
    assert_eq!(off, (ps * 2) as libc::off_t);
    assert_eq!(
      map_target(None, 0, 16, MapFlags::PRIVATE | MapFlags::ANONYMOUS),
      Ok((-1, 0))
    );
  }
}
