//! Backend over the platform C library.
//!
//! `seek`, `kill` and `pipe2` are not provided here and report
//! `Unsupported` through the trait defaults.

use alloc::{
  string::String,
  vec::Vec,
};
use core::ffi::c_int;

use osprim_marshal::{
  borrow_slice,
  borrow_slice_mut,
  to_cstring,
};

use super::{
  System,
  posix,
};
use crate::{
  errno::SysResult,
  flags::{
    MapFlags,
    OpenFlags,
    Protection,
  },
  handle::Handle,
  stat::StatRecord,
};

pub struct LibcSystem {}

impl LibcSystem {
  fn check(op: &'static str, ret: c_int) -> SysResult<c_int> {
    if ret < 0 {
      return posix::fail(op);
    }
    Ok(ret)
  }

  fn check_len(op: &'static str, ret: libc::ssize_t) -> SysResult<usize> {
    if ret < 0 {
      return posix::fail(op);
    }
    Ok(ret as usize)
  }
}

unsafe impl System for LibcSystem {
  fn open(&self, path: &str, flags: OpenFlags, mode: u32) -> SysResult<Handle> {
    let path = to_cstring(path)?;
    let fd = unsafe {
      libc::open(
        path.as_ptr(),
        posix::open_flags(flags),
        mode as libc::c_uint,
      )
    };
    Self::check("open", fd).map(Handle::from_raw)
  }

  fn close(&self, handle: Handle) -> SysResult<()> {
    let ret = unsafe { libc::close(handle.as_raw()) };
    Self::check("close", ret).map(drop)
  }

  fn read(&self, handle: Handle, buf: &mut [u8]) -> SysResult<usize> {
    let raw = borrow_slice_mut(buf);
    let n = unsafe { libc::read(handle.as_raw(), raw.mut_ptr().cast(), raw.len()) };
    Self::check_len("read", n)
  }

  fn write(&self, handle: Handle, buf: &[u8]) -> SysResult<usize> {
    let raw = borrow_slice(buf);
    let n = unsafe { libc::write(handle.as_raw(), raw.ptr().cast(), raw.len()) };
    Self::check_len("write", n)
  }

  fn stat(&self, path: &str) -> SysResult<StatRecord> {
    let path = to_cstring(path)?;
    let mut st: libc::stat = unsafe { core::mem::zeroed() };
    let ret = unsafe { libc::stat(path.as_ptr(), &mut st) };
    Self::check("stat", ret)?;
    Ok(posix::stat_from_native(&st))
  }

  fn lstat(&self, path: &str) -> SysResult<StatRecord> {
    let path = to_cstring(path)?;
    let mut st: libc::stat = unsafe { core::mem::zeroed() };
    let ret = unsafe { libc::lstat(path.as_ptr(), &mut st) };
    Self::check("lstat", ret)?;
    Ok(posix::stat_from_native(&st))
  }

  fn mkdir(&self, path: &str, mode: u32) -> SysResult<()> {
    let path = to_cstring(path)?;
    let ret = unsafe { libc::mkdir(path.as_ptr(), mode as libc::mode_t) };
    Self::check("mkdir", ret).map(drop)
  }

  fn rmdir(&self, path: &str) -> SysResult<()> {
    let path = to_cstring(path)?;
    let ret = unsafe { libc::rmdir(path.as_ptr()) };
    Self::check("rmdir", ret).map(drop)
  }

  fn unlink(&self, path: &str) -> SysResult<()> {
    let path = to_cstring(path)?;
    let ret = unsafe { libc::unlink(path.as_ptr()) };
    Self::check("unlink", ret).map(drop)
  }

  unsafe fn mmap(
    &self,
    handle: Option<Handle>,
    offset: u64,
    length: usize,
    prot: Protection,
    flags: MapFlags,
  ) -> SysResult<&'static mut [u8]> {
    let (fd, offset) = posix::map_target(handle, offset, length, flags)?;
    let ptr = unsafe {
      libc::mmap(
        core::ptr::null_mut(),
        length,
        posix::prot_flags(prot),
        posix::map_flags(flags),
        fd,
        offset,
      )
    };

    match ptr {
      libc::MAP_FAILED => posix::fail("mmap"),
      _ => Ok(unsafe { core::slice::from_raw_parts_mut(ptr as *mut u8, length) }),
    }
  }

  unsafe fn mprotect(&self, region: &[u8], prot: Protection) -> SysResult<()> {
    let raw = borrow_slice(region);
    let ret = unsafe { libc::mprotect(raw.mut_ptr().cast(), raw.len(), posix::prot_flags(prot)) };
    Self::check("mprotect", ret).map(drop)
  }

  unsafe fn munmap(&self, region: &[u8]) -> SysResult<()> {
    let raw = borrow_slice(region);
    let ret = unsafe { libc::munmap(raw.mut_ptr().cast(), raw.len()) };
    Self::check("munmap", ret).map(drop)
  }

  fn getenv(&self, key: &str) -> Option<String> {
    posix::getenv(key)
  }

  fn environ(&self) -> Vec<String> {
    posix::environ()
  }

  fn pipe(&self) -> SysResult<(Handle, Handle)> {
    let mut fds: [c_int; 2] = [-1; 2];
    let ret = unsafe { libc::pipe(fds.as_mut_ptr()) };
    Self::check("pipe", ret)?;
    Ok((Handle::from_raw(fds[0]), Handle::from_raw(fds[1])))
  }

  fn temp_dir(&self) -> String {
    posix::temp_dir()
  }
}
