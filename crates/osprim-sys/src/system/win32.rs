//! Backend over native Win32 calls.
//!
//! Paths and environment strings cross the boundary as UTF-16. `kill` and
//! `pipe2` have no Win32 counterpart and stay `Unsupported`.

use alloc::{
  string::String,
  vec,
  vec::Vec,
};
use core::ffi::c_void;

use osprim_marshal::{
  borrow_slice,
  borrow_slice_mut,
  from_wide,
  to_wide,
  wide_len,
};
use spin::Once;
use windows_sys::Win32::{
  Foundation::{
    CloseHandle,
    ERROR_BROKEN_PIPE,
    ERROR_HANDLE_EOF,
    ERROR_SUCCESS,
    FILETIME,
    GENERIC_READ,
    GENERIC_WRITE,
    GetLastError,
    HANDLE,
    INVALID_HANDLE_VALUE,
    MAX_PATH,
    SetLastError,
  },
  Storage::FileSystem::{
    BY_HANDLE_FILE_INFORMATION,
    CREATE_ALWAYS,
    CREATE_NEW,
    CreateDirectoryW,
    CreateFileW,
    DeleteFileW,
    FILE_APPEND_DATA,
    FILE_ATTRIBUTE_DIRECTORY,
    FILE_ATTRIBUTE_NORMAL,
    FILE_ATTRIBUTE_READONLY,
    FILE_ATTRIBUTE_REPARSE_POINT,
    FILE_BEGIN,
    FILE_CURRENT,
    FILE_END,
    FILE_FLAG_BACKUP_SEMANTICS,
    FILE_FLAG_OPEN_REPARSE_POINT,
    FILE_READ_ATTRIBUTES,
    FILE_SHARE_DELETE,
    FILE_SHARE_READ,
    FILE_SHARE_WRITE,
    GetFileInformationByHandle,
    GetTempPathW,
    OPEN_ALWAYS,
    OPEN_EXISTING,
    ReadFile,
    RemoveDirectoryW,
    SetFilePointerEx,
    TRUNCATE_EXISTING,
    WriteFile,
  },
  System::{
    Environment::{
      FreeEnvironmentStringsW,
      GetEnvironmentStringsW,
      GetEnvironmentVariableW,
    },
    Memory::{
      CreateFileMappingW,
      FILE_MAP_COPY,
      FILE_MAP_EXECUTE,
      FILE_MAP_READ,
      FILE_MAP_WRITE,
      MEMORY_MAPPED_VIEW_ADDRESS,
      MapViewOfFile,
      PAGE_EXECUTE,
      PAGE_EXECUTE_READ,
      PAGE_EXECUTE_READWRITE,
      PAGE_EXECUTE_WRITECOPY,
      PAGE_NOACCESS,
      PAGE_PROTECTION_FLAGS,
      PAGE_READONLY,
      PAGE_READWRITE,
      PAGE_WRITECOPY,
      UnmapViewOfFile,
      VirtualProtect,
    },
    Pipes::CreatePipe,
    SystemInformation::{
      GetSystemInfo,
      SYSTEM_INFO,
    },
  },
};

use super::System;
use crate::{
  errno::{
    SysError,
    SysResult,
    from_win32,
  },
  flags::{
    MapFlags,
    OpenFlags,
    Protection,
    Whence,
  },
  handle::Handle,
  mode::{
    S_IFCHR,
    S_IFDIR,
    S_IFLNK,
    S_IFREG,
    S_IWUSR,
  },
  names::{
    is_nul_alias,
    trim_temp_dir,
  },
  prim::{
    is_page_aligned,
    page_size,
  },
  stat::{
    StatRecord,
    Timespec,
  },
};

const NUL_DEVICE: &str = "\\\\.\\NUL";

/// 100ns ticks between 1601-01-01 and 1970-01-01.
const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;
const TICKS_PER_SEC: i64 = 10_000_000;

const SHARE_ALL: u32 = FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE;

pub struct Win32System {}

fn fail<T>(op: &'static str) -> SysResult<T> {
  let code = unsafe { GetLastError() };
  let err = from_win32(code);
  log::trace!("{op} failed: win32 error {code} -> {err:?}");
  Err(err)
}

fn check(op: &'static str, ok: i32) -> SysResult<()> {
  if ok == 0 {
    return fail(op);
  }
  Ok(())
}

fn native(handle: Handle) -> HANDLE {
  handle.as_raw() as HANDLE
}

fn wrap(handle: HANDLE) -> Handle {
  Handle::from_raw(handle as isize)
}

fn wide_path(path: &str) -> SysResult<Vec<u16>> {
  if is_nul_alias(path) {
    return Ok(to_wide(NUL_DEVICE)?);
  }
  Ok(to_wide(path)?)
}

fn timespec(ft: FILETIME) -> Timespec {
  let ticks = ((ft.dwHighDateTime as u64) << 32 | ft.dwLowDateTime as u64) as i64 - UNIX_EPOCH_TICKS;
  Timespec::new(
    ticks.div_euclid(TICKS_PER_SEC),
    ticks.rem_euclid(TICKS_PER_SEC) * 100,
  )
}

fn nul_stat() -> StatRecord {
  StatRecord {
    mode: S_IFCHR | 0o666,
    nlink: 1,
    ..StatRecord::default()
  }
}

fn stat_from_info(info: &BY_HANDLE_FILE_INFORMATION, lstat: bool) -> StatRecord {
  let attrs = info.dwFileAttributes;
  let readonly = attrs & FILE_ATTRIBUTE_READONLY != 0;

  let mode = if lstat && attrs & FILE_ATTRIBUTE_REPARSE_POINT != 0 {
    S_IFLNK | 0o777
  } else if attrs & FILE_ATTRIBUTE_DIRECTORY != 0 {
    S_IFDIR | if readonly { 0o555 } else { 0o777 }
  } else {
    S_IFREG | if readonly { 0o444 } else { 0o666 }
  };

  StatRecord {
    dev: info.dwVolumeSerialNumber as u64,
    mode,
    nlink: info.nNumberOfLinks as u64,
    ino: (info.nFileIndexHigh as u64) << 32 | info.nFileIndexLow as u64,
    size: ((info.nFileSizeHigh as u64) << 32 | info.nFileSizeLow as u64) as i64,
    atime: timespec(info.ftLastAccessTime),
    mtime: timespec(info.ftLastWriteTime),
    ctime: timespec(info.ftLastWriteTime),
    btime: timespec(info.ftCreationTime),
    flags: attrs,
    ..StatRecord::default()
  }
}

fn page_protection(prot: Protection, private: bool) -> PAGE_PROTECTION_FLAGS {
  let read = prot.contains(Protection::READ);
  let write = prot.contains(Protection::WRITE);
  let exec = prot.contains(Protection::EXEC);

  match (exec, write, read, private) {
    (false, false, false, _) => PAGE_NOACCESS,
    (false, false, true, _) => PAGE_READONLY,
    (false, true, _, false) => PAGE_READWRITE,
    (false, true, _, true) => PAGE_WRITECOPY,
    (true, false, false, _) => PAGE_EXECUTE,
    (true, false, true, _) => PAGE_EXECUTE_READ,
    (true, true, _, false) => PAGE_EXECUTE_READWRITE,
    (true, true, _, true) => PAGE_EXECUTE_WRITECOPY,
  }
}

fn view_access(prot: Protection, private: bool) -> u32 {
  let mut access = if !prot.contains(Protection::WRITE) {
    FILE_MAP_READ
  } else if private {
    FILE_MAP_COPY
  } else {
    FILE_MAP_WRITE
  };
  if prot.contains(Protection::EXEC) {
    access |= FILE_MAP_EXECUTE;
  }
  access
}

fn allocation_granularity() -> usize {
  static GRANULARITY: Once<usize> = Once::new();
  *GRANULARITY.call_once(|| {
    let mut info: SYSTEM_INFO = unsafe { core::mem::zeroed() };
    unsafe { GetSystemInfo(&mut info) };
    match info.dwAllocationGranularity as usize {
      0 => page_size(),
      g => g,
    }
  })
}

impl Win32System {
  fn stat_handle(path: &str, lstat: bool) -> SysResult<StatRecord> {
    if is_nul_alias(path) {
      return Ok(nul_stat());
    }

    let path = to_wide(path)?;
    let mut flags = FILE_FLAG_BACKUP_SEMANTICS;
    if lstat {
      flags |= FILE_FLAG_OPEN_REPARSE_POINT;
    }

    let handle = unsafe {
      CreateFileW(
        path.as_ptr(),
        FILE_READ_ATTRIBUTES,
        SHARE_ALL,
        core::ptr::null(),
        OPEN_EXISTING,
        flags,
        core::ptr::null_mut(),
      )
    };
    if handle == INVALID_HANDLE_VALUE {
      return fail(if lstat { "lstat" } else { "stat" });
    }

    let mut info: BY_HANDLE_FILE_INFORMATION = unsafe { core::mem::zeroed() };
    let ok = unsafe { GetFileInformationByHandle(handle, &mut info) };
    let result = check("stat", ok).map(|_| stat_from_info(&info, lstat));
    unsafe { CloseHandle(handle) };
    result
  }
}

unsafe impl System for Win32System {
  fn open(&self, path: &str, flags: OpenFlags, mode: u32) -> SysResult<Handle> {
    let path = wide_path(path)?;

    let mut access = 0;
    if flags.contains(OpenFlags::READ) || !flags.is_writable() {
      access |= GENERIC_READ;
    }
    if flags.contains(OpenFlags::APPEND) {
      access |= FILE_APPEND_DATA;
    } else if flags.contains(OpenFlags::WRITE) {
      access |= GENERIC_WRITE;
    }

    let create = flags.contains(OpenFlags::CREATE);
    let truncate = flags.contains(OpenFlags::TRUNCATE);
    let disposition = match (create, flags.contains(OpenFlags::EXCLUSIVE), truncate) {
      (true, true, _) => CREATE_NEW,
      (true, false, true) => CREATE_ALWAYS,
      (true, false, false) => OPEN_ALWAYS,
      (false, _, true) => TRUNCATE_EXISTING,
      (false, _, false) => OPEN_EXISTING,
    };

    let mut attrs = FILE_ATTRIBUTE_NORMAL | FILE_FLAG_BACKUP_SEMANTICS;
    if create && mode & S_IWUSR == 0 {
      attrs = FILE_ATTRIBUTE_READONLY | FILE_FLAG_BACKUP_SEMANTICS;
    }

    let handle = unsafe {
      CreateFileW(
        path.as_ptr(),
        access,
        SHARE_ALL,
        core::ptr::null(),
        disposition,
        attrs,
        core::ptr::null_mut(),
      )
    };
    if handle == INVALID_HANDLE_VALUE {
      return fail("open");
    }
    Ok(wrap(handle))
  }

  fn close(&self, handle: Handle) -> SysResult<()> {
    check("close", unsafe { CloseHandle(native(handle)) })
  }

  fn read(&self, handle: Handle, buf: &mut [u8]) -> SysResult<usize> {
    let raw = borrow_slice_mut(buf);
    let len = raw.len().min(u32::MAX as usize) as u32;
    let mut done = 0u32;
    let ok = unsafe {
      ReadFile(
        native(handle),
        raw.mut_ptr(),
        len,
        &mut done,
        core::ptr::null_mut(),
      )
    };
    if ok == 0 {
      // A closed writer or end of file reads as end of stream.
      return match unsafe { GetLastError() } {
        ERROR_BROKEN_PIPE | ERROR_HANDLE_EOF => Ok(0),
        _ => fail("read"),
      };
    }
    Ok(done as usize)
  }

  fn write(&self, handle: Handle, buf: &[u8]) -> SysResult<usize> {
    let raw = borrow_slice(buf);
    let len = raw.len().min(u32::MAX as usize) as u32;
    let mut done = 0u32;
    let ok = unsafe {
      WriteFile(
        native(handle),
        raw.ptr(),
        len,
        &mut done,
        core::ptr::null_mut(),
      )
    };
    check("write", ok)?;
    Ok(done as usize)
  }

  fn seek(&self, handle: Handle, offset: i64, whence: Whence) -> SysResult<u64> {
    let method = match whence {
      Whence::Start => FILE_BEGIN,
      Whence::Current => FILE_CURRENT,
      Whence::End => FILE_END,
    };
    let mut pos = 0i64;
    check("seek", unsafe {
      SetFilePointerEx(native(handle), offset, &mut pos, method)
    })?;
    Ok(pos as u64)
  }

  fn stat(&self, path: &str) -> SysResult<StatRecord> {
    Self::stat_handle(path, false)
  }

  fn lstat(&self, path: &str) -> SysResult<StatRecord> {
    Self::stat_handle(path, true)
  }

  fn mkdir(&self, path: &str, mode: u32) -> SysResult<()> {
    _ = mode;
    let path = to_wide(path)?;
    check("mkdir", unsafe {
      CreateDirectoryW(path.as_ptr(), core::ptr::null())
    })
  }

  fn rmdir(&self, path: &str) -> SysResult<()> {
    let path = to_wide(path)?;
    check("rmdir", unsafe { RemoveDirectoryW(path.as_ptr()) })
  }

  fn unlink(&self, path: &str) -> SysResult<()> {
    let path = to_wide(path)?;
    check("unlink", unsafe { DeleteFileW(path.as_ptr()) })
  }

  unsafe fn mmap(
    &self,
    handle: Option<Handle>,
    offset: u64,
    length: usize,
    prot: Protection,
    flags: MapFlags,
  ) -> SysResult<&'static mut [u8]> {
    if length == 0 || flags.contains(MapFlags::SHARED) == flags.contains(MapFlags::PRIVATE) {
      return Err(SysError::InvalidArgument);
    }
    if offset % page_size() as u64 != 0 {
      return Err(SysError::InvalidArgument);
    }
    let file = match (handle, flags.contains(MapFlags::ANONYMOUS)) {
      (Some(handle), false) => native(handle),
      (None, true) => INVALID_HANDLE_VALUE,
      _ => return Err(SysError::InvalidArgument),
    };

    // Pagefile-backed sections are already private to the process.
    let private = flags.contains(MapFlags::PRIVATE) && handle.is_some();
    let max = offset
      .checked_add(length as u64)
      .ok_or(SysError::InvalidArgument)?;
    // Views start on an allocation-granularity boundary; the caller's region
    // begins `lead` bytes into the view.
    let base = offset & !(allocation_granularity() as u64 - 1);
    let lead = (offset - base) as usize;
    let span = lead.checked_add(length).ok_or(SysError::InvalidArgument)?;
    let mapping = unsafe {
      CreateFileMappingW(
        file,
        core::ptr::null(),
        page_protection(prot | Protection::READ, private),
        (max >> 32) as u32,
        max as u32,
        core::ptr::null(),
      )
    };
    if mapping.is_null() {
      return fail("mmap");
    }

    let view = unsafe {
      MapViewOfFile(
        mapping,
        view_access(prot, private),
        (base >> 32) as u32,
        base as u32,
        span,
      )
    };
    // The view keeps the section alive on its own.
    unsafe { CloseHandle(mapping) };

    if view.Value.is_null() {
      return fail("mmap");
    }
    let start = unsafe { (view.Value as *mut u8).add(lead) };
    Ok(unsafe { core::slice::from_raw_parts_mut(start, length) })
  }

  unsafe fn mprotect(&self, region: &[u8], prot: Protection) -> SysResult<()> {
    let raw = borrow_slice(region);
    if !is_page_aligned(raw.ptr() as usize) {
      return Err(SysError::InvalidArgument);
    }
    let mut old: PAGE_PROTECTION_FLAGS = 0;
    check("mprotect", unsafe {
      VirtualProtect(
        raw.ptr() as *const c_void,
        raw.len(),
        page_protection(prot, false),
        &mut old,
      )
    })
  }

  unsafe fn munmap(&self, region: &[u8]) -> SysResult<()> {
    let granularity = allocation_granularity();
    let view = MEMORY_MAPPED_VIEW_ADDRESS {
      Value: (region.as_ptr() as usize & !(granularity - 1)) as *mut c_void,
    };
    check("munmap", unsafe { UnmapViewOfFile(view) })
  }

  fn getenv(&self, key: &str) -> Option<String> {
    let key = to_wide(key).ok()?;
    let mut buf: Vec<u16> = vec![0; 128];
    loop {
      unsafe { SetLastError(ERROR_SUCCESS) };
      let n = unsafe { GetEnvironmentVariableW(key.as_ptr(), buf.as_mut_ptr(), buf.len() as u32) }
        as usize;
      if n == 0 {
        // Zero with no error set is a variable holding the empty string.
        return match unsafe { GetLastError() } {
          ERROR_SUCCESS => Some(String::new()),
          code => {
            log::trace!("getenv failed: win32 error {code}");
            None
          }
        };
      }
      if n > buf.len() {
        buf.resize(n, 0);
        continue;
      }
      return Some(from_wide(&buf[..n]));
    }
  }

  fn environ(&self) -> Vec<String> {
    let block = unsafe { GetEnvironmentStringsW() };
    let mut envs = Vec::new();
    if block.is_null() {
      return envs;
    }

    let mut cursor = block as *const u16;
    loop {
      let len = unsafe { wide_len(cursor) };
      if len == 0 {
        break;
      }
      envs.push(from_wide(unsafe { core::slice::from_raw_parts(cursor, len) }));
      cursor = unsafe { cursor.add(len + 1) };
    }

    unsafe { FreeEnvironmentStringsW(block) };
    envs
  }

  fn pipe(&self) -> SysResult<(Handle, Handle)> {
    let mut read: HANDLE = core::ptr::null_mut();
    let mut write: HANDLE = core::ptr::null_mut();
    check("pipe", unsafe {
      CreatePipe(&mut read, &mut write, core::ptr::null(), 0)
    })?;
    Ok((wrap(read), wrap(write)))
  }

  fn temp_dir(&self) -> String {
    let mut buf: Vec<u16> = vec![0; MAX_PATH as usize + 1];
    loop {
      let n = unsafe { GetTempPathW(buf.len() as u32, buf.as_mut_ptr()) } as usize;
      if n > buf.len() {
        buf.resize(n, 0);
        continue;
      }
      return from_wide(trim_temp_dir(&buf[..n]));
    }
  }
}
