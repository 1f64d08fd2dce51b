#![cfg_attr(not(test), no_std)]

//! Conversions between Rust strings/slices and the buffers native calls take.
//!
//! This is the only place in the workspace that walks raw string pointers.
//! Backends hand paths in through [`to_cstring`] or [`to_wide`] and read native
//! strings back through [`from_cstring`] or [`from_wide_ptr`].

extern crate alloc;

use alloc::{
  string::String,
  vec::Vec,
};
use core::{
  ffi::c_char,
  ptr::NonNull,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
  #[error("string contains an interior NUL byte")]
  InteriorNul,
}

pub type MarshalResult<T> = Result<T, MarshalError>;

/// A NUL-terminated copy of a Rust string.
///
/// The buffer must outlive the native call it is passed to. Native code may
/// hold the pointer only for the duration of that call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CStringBuffer {
  data: Vec<u8>,
}

impl CStringBuffer {
  pub fn as_ptr(&self) -> *const c_char {
    self.data.as_ptr().cast()
  }

  /// Bytes including the trailing zero.
  pub fn as_bytes_with_nul(&self) -> &[u8] {
    &self.data
  }

  /// Length without the trailing zero.
  pub fn len(&self) -> usize {
    self.data.len() - 1
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

pub fn to_cstring(s: &str) -> MarshalResult<CStringBuffer> {
  if s.as_bytes().contains(&0) {
    return Err(MarshalError::InteriorNul);
  }

  let mut data = Vec::with_capacity(s.len() + 1);
  data.extend_from_slice(s.as_bytes());
  data.push(0);
  Ok(CStringBuffer { data })
}

/// Copies a NUL-terminated native string into an owned `String`.
///
/// Invalid UTF-8 is replaced with U+FFFD.
///
/// # Safety
///
/// `ptr` must be non-null and point to a readable region terminated by a zero
/// byte. The scan has no upper bound.
pub unsafe fn from_cstring(ptr: *const c_char) -> String {
  let bytes = unsafe { cstr_bytes(ptr) };
  String::from_utf8_lossy(bytes).into_owned()
}

/// Borrows the bytes of a NUL-terminated native string, excluding the zero.
///
/// # Safety
///
/// Same contract as [`from_cstring`]; the returned slice must not outlive the
/// native storage.
pub unsafe fn cstr_bytes<'a>(ptr: *const c_char) -> &'a [u8] {
  let start = ptr.cast::<u8>();
  let mut len = 0usize;
  while unsafe { *start.add(len) } != 0 {
    len += 1;
  }
  unsafe { core::slice::from_raw_parts(start, len) }
}

/// Address/length/capacity view of a caller-owned byte region.
///
/// A `RawBuffer` never owns its memory. It is valid only while the slice it
/// was taken from is borrowed.
#[derive(Debug, Clone, Copy)]
pub struct RawBuffer {
  ptr: NonNull<u8>,
  len: usize,
  cap: usize,
}

impl RawBuffer {
  pub fn ptr(&self) -> *const u8 {
    self.ptr.as_ptr()
  }

  pub fn mut_ptr(&self) -> *mut u8 {
    self.ptr.as_ptr()
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn cap(&self) -> usize {
    self.cap
  }
}

impl From<&[u8]> for RawBuffer {
  fn from(slice: &[u8]) -> Self {
    Self {
      ptr: NonNull::from(slice).cast(),
      len: slice.len(),
      cap: slice.len(),
    }
  }
}

impl From<&mut [u8]> for RawBuffer {
  fn from(slice: &mut [u8]) -> Self {
    let len = slice.len();
    Self {
      ptr: NonNull::from(slice).cast(),
      len,
      cap: len,
    }
  }
}

impl From<&Vec<u8>> for RawBuffer {
  fn from(vec: &Vec<u8>) -> Self {
    Self {
      ptr: NonNull::from(vec.as_slice()).cast(),
      len: vec.len(),
      cap: vec.capacity(),
    }
  }
}

pub fn borrow_slice(bytes: &[u8]) -> RawBuffer {
  RawBuffer::from(bytes)
}

pub fn borrow_slice_mut(bytes: &mut [u8]) -> RawBuffer {
  RawBuffer::from(bytes)
}

/// Encodes `s` as NUL-terminated UTF-16 for the wide Win32 entry points.
pub fn to_wide(s: &str) -> MarshalResult<Vec<u16>> {
  if s.as_bytes().contains(&0) {
    return Err(MarshalError::InteriorNul);
  }

  let mut wide: Vec<u16> = s.encode_utf16().collect();
  wide.push(0);
  Ok(wide)
}

/// Decodes UTF-16 up to the first zero unit, or the whole slice if there is
/// none. Unpaired surrogates are replaced with U+FFFD.
pub fn from_wide(units: &[u16]) -> String {
  let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
  char::decode_utf16(units[..end].iter().copied())
    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
    .collect()
}

/// Length in units of a NUL-terminated UTF-16 string.
///
/// # Safety
///
/// `ptr` must point to a readable region terminated by a zero unit.
pub unsafe fn wide_len(ptr: *const u16) -> usize {
  let mut len = 0usize;
  while unsafe { *ptr.add(len) } != 0 {
    len += 1;
  }
  len
}

/// # Safety
///
/// `ptr` must point to a readable region terminated by a zero unit.
pub unsafe fn from_wide_ptr(ptr: *const u16) -> String {
  let len = unsafe { wide_len(ptr) };
  from_wide(unsafe { core::slice::from_raw_parts(ptr, len) })
}

#[cfg(test)]
mod tests;
