use super::*;

#[test]
fn test_to_cstring_appends_nul() {
  let c = to_cstring("/tmp/file").unwrap();
  assert_eq!(c.as_bytes_with_nul(), b"/tmp/file\0");
  assert_eq!(c.len(), 9);
  assert!(!c.is_empty());
}

#[test]
fn test_to_cstring_single_allocation() {
  let c = to_cstring("abc").unwrap();
  assert_eq!(c.data.capacity(), 4);
}

#[test]
fn test_to_cstring_empty() {
  let c = to_cstring("").unwrap();
  assert_eq!(c.as_bytes_with_nul(), b"\0");
  assert!(c.is_empty());
}

#[test]
fn test_to_cstring_interior_nul() {
  assert_eq!(to_cstring("a\0b"), Err(MarshalError::InteriorNul));
}

#[test]
fn test_from_cstring() {
  let raw = b"HOME=/root\0trailing";
  let s = unsafe { from_cstring(raw.as_ptr().cast()) };
  assert_eq!(s, "HOME=/root");
}

#[test]
fn test_from_cstring_lossy() {
  let raw = [b'a', 0xff, b'b', 0];
  let s = unsafe { from_cstring(raw.as_ptr().cast()) };
  assert_eq!(s, "a\u{fffd}b");
}

#[test]
fn test_cstring_through_pointer() {
  let c = to_cstring("key").unwrap();
  let back = unsafe { from_cstring(c.as_ptr()) };
  assert_eq!(back, "key");
}

#[test]
fn test_borrow_slice() {
  let data = [1u8, 2, 3, 4];
  let raw = borrow_slice(&data);
  assert_eq!(raw.ptr(), data.as_ptr());
  assert_eq!(raw.len(), 4);
  assert_eq!(raw.cap(), 4);
}

#[test]
fn test_borrow_slice_mut_writes_through() {
  let mut data = [0u8; 8];
  let raw = borrow_slice_mut(&mut data);
  unsafe { *raw.mut_ptr().add(3) = 7 };
  assert_eq!(data[3], 7);
}

#[test]
fn test_borrow_empty_slice() {
  let raw = borrow_slice(&[]);
  assert!(raw.is_empty());
  assert!(!raw.ptr().is_null());
}

#[test]
fn test_raw_buffer_from_vec_keeps_capacity() {
  let mut v = Vec::with_capacity(32);
  v.extend_from_slice(b"abc");
  let raw = RawBuffer::from(&v);
  assert_eq!(raw.len(), 3);
  assert!(raw.cap() >= 32);
}

#[test]
fn test_wide_round_trip() {
  let wide = to_wide("C:\\Temp\\ä").unwrap();
  assert_eq!(*wide.last().unwrap(), 0);
  assert_eq!(from_wide(&wide), "C:\\Temp\\ä");
  assert_eq!(unsafe { wide_len(wide.as_ptr()) }, wide.len() - 1);
  assert_eq!(unsafe { from_wide_ptr(wide.as_ptr()) }, "C:\\Temp\\ä");
}

#[test]
fn test_wide_interior_nul() {
  assert_eq!(to_wide("NU\0L"), Err(MarshalError::InteriorNul));
}

#[test]
fn test_from_wide_without_terminator() {
  let units: Vec<u16> = "abc".encode_utf16().collect();
  assert_eq!(from_wide(&units), "abc");
}

#[test]
fn test_from_wide_unpaired_surrogate() {
  assert_eq!(from_wide(&[0x61, 0xd800, 0x62]), "a\u{fffd}b");
}
