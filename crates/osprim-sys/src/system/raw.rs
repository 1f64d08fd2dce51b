//! Backend that enters the Linux kernel directly through `syscall(2)`.
//!
//! Only x86_64 and aarch64 are wired up: on those targets the kernel's
//! `struct stat` used by `newfstatat` has the same layout as `libc::stat`.
//! The operation set matches the libc backend exactly: `seek`, `kill` and
//! `pipe2` report `Unsupported` through the trait defaults.

use alloc::{
  string::String,
  vec::Vec,
};
use core::ffi::{
  c_int,
  c_long,
};

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

pub struct RawSystem {}

impl RawSystem {
  fn check(op: &'static str, ret: c_long) -> SysResult<c_long> {
    if ret == -1 {
      return posix::fail(op);
    }
    Ok(ret)
  }

  fn fstatat(op: &'static str, path: &str, flags: c_int) -> SysResult<StatRecord> {
    let path = to_cstring(path)?;
    let mut st: libc::stat = unsafe { core::mem::zeroed() };
    let ret = unsafe {
      libc::syscall(
        libc::SYS_newfstatat,
        libc::AT_FDCWD,
        path.as_ptr(),
        &mut st as *mut libc::stat,
        flags,
      )
    };
    Self::check(op, ret)?;
    Ok(posix::stat_from_native(&st))
  }

  fn unlinkat(op: &'static str, path: &str, flags: c_int) -> SysResult<()> {
    let path = to_cstring(path)?;
    let ret = unsafe { libc::syscall(libc::SYS_unlinkat, libc::AT_FDCWD, path.as_ptr(), flags) };
    Self::check(op, ret).map(drop)
  }
}

unsafe impl System for RawSystem {
  fn open(&self, path: &str, flags: OpenFlags, mode: u32) -> SysResult<Handle> {
    let path = to_cstring(path)?;
    let ret = unsafe {
      libc::syscall(
        libc::SYS_openat,
        libc::AT_FDCWD,
        path.as_ptr(),
        posix::open_flags(flags),
        mode as libc::c_uint,
      )
    };
    Self::check("open", ret).map(|fd| Handle::from_raw(fd as c_int))
  }

  fn close(&self, handle: Handle) -> SysResult<()> {
    let ret = unsafe { libc::syscall(libc::SYS_close, handle.as_raw()) };
    Self::check("close", ret).map(drop)
  }

  fn read(&self, handle: Handle, buf: &mut [u8]) -> SysResult<usize> {
    let raw = borrow_slice_mut(buf);
    let ret = unsafe { libc::syscall(libc::SYS_read, handle.as_raw(), raw.mut_ptr(), raw.len()) };
    Self::check("read", ret).map(|n| n as usize)
  }

  fn write(&self, handle: Handle, buf: &[u8]) -> SysResult<usize> {
    let raw = borrow_slice(buf);
    let ret = unsafe { libc::syscall(libc::SYS_write, handle.as_raw(), raw.ptr(), raw.len()) };
    Self::check("write", ret).map(|n| n as usize)
  }

  fn stat(&self, path: &str) -> SysResult<StatRecord> {
    Self::fstatat("stat", path, 0)
  }

  fn lstat(&self, path: &str) -> SysResult<StatRecord> {
    Self::fstatat("lstat", path, libc::AT_SYMLINK_NOFOLLOW)
  }

  fn mkdir(&self, path: &str, mode: u32) -> SysResult<()> {
    let path = to_cstring(path)?;
    let ret = unsafe {
      libc::syscall(
        libc::SYS_mkdirat,
        libc::AT_FDCWD,
        path.as_ptr(),
        mode as libc::c_uint,
      )
    };
    Self::check("mkdir", ret).map(drop)
  }

  fn rmdir(&self, path: &str) -> SysResult<()> {
    Self::unlinkat("rmdir", path, libc::AT_REMOVEDIR)
  }

  fn unlink(&self, path: &str) -> SysResult<()> {
    Self::unlinkat("unlink", path, 0)
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
    let ret = unsafe {
      libc::syscall(
        libc::SYS_mmap,
        core::ptr::null_mut::<libc::c_void>(),
        length,
        posix::prot_flags(prot),
        posix::map_flags(flags),
        fd,
        offset,
      )
    };
    let addr = Self::check("mmap", ret)?;
    Ok(unsafe { core::slice::from_raw_parts_mut(addr as usize as *mut u8, length) })
  }

  unsafe fn mprotect(&self, region: &[u8], prot: Protection) -> SysResult<()> {
    let raw = borrow_slice(region);
    let ret = unsafe {
      libc::syscall(
        libc::SYS_mprotect,
        raw.ptr(),
        raw.len(),
        posix::prot_flags(prot),
      )
    };
    Self::check("mprotect", ret).map(drop)
  }

  unsafe fn munmap(&self, region: &[u8]) -> SysResult<()> {
    let raw = borrow_slice(region);
    let ret = unsafe { libc::syscall(libc::SYS_munmap, raw.ptr(), raw.len()) };
    Self::check("munmap", ret).map(drop)
  }

  fn getenv(&self, key: &str) -> Option<String> {
    posix::getenv(key)
  }

  fn environ(&self) -> Vec<String> {
    posix::environ()
  }

  fn pipe(&self) -> SysResult<(Handle, Handle)> {
    // aarch64 has no plain pipe syscall.
    let mut fds: [c_int; 2] = [-1; 2];
    let ret = unsafe { libc::syscall(libc::SYS_pipe2, fds.as_mut_ptr(), 0) };
    Self::check("pipe", ret)?;
    Ok((Handle::from_raw(fds[0]), Handle::from_raw(fds[1])))
  }

  fn temp_dir(&self) -> String {
    posix::temp_dir()
  }
}
