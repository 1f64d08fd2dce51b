use spin::Once;

const COMMON_PAGE_SIZE: usize = 4096;

#[cfg(unix)]
fn page_size_helper() -> usize {
  let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
  if size <= 0 {
    return COMMON_PAGE_SIZE;
  }
  size as usize
}

#[cfg(windows)]
fn page_size_helper() -> usize {
  use windows_sys::Win32::System::SystemInformation::{
    GetSystemInfo,
    SYSTEM_INFO,
  };

  let mut info: SYSTEM_INFO = unsafe { core::mem::zeroed() };
  unsafe { GetSystemInfo(&mut info) };
  match info.dwPageSize as usize {
    0 => COMMON_PAGE_SIZE,
    size => size,
  }
}

#[cfg(not(any(unix, windows)))]
fn page_size_helper() -> usize {
  COMMON_PAGE_SIZE
}

pub fn page_size() -> usize {
  static PAGE_SIZE: Once<usize> = Once::new();
  *PAGE_SIZE.call_once(page_size_helper)
}

/// Rounds `value` up to the next page boundary, `None` on overflow.
pub fn page_align(value: usize) -> Option<usize> {
  let mask = page_size() - 1;
  value.checked_add(mask).map(|sum| sum & !mask)
}

pub fn is_page_aligned(value: usize) -> bool {
  value & (page_size() - 1) == 0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_page_size() {
    let size = page_size();
    assert!(size > 0);
    assert!(size.is_power_of_two());
    assert_eq!(page_size(), size);
  }

  #[test]
  fn test_page_align() {
    let ps = page_size();
    assert_eq!(page_align(0), Some(0));
    assert_eq!(page_align(1), Some(ps));
    assert_eq!(page_align(ps), Some(ps));
    assert_eq!(page_align(ps + 1), Some(ps * 2));
    assert_eq!(page_align(usize::MAX), None);
  }

  #[test]
  fn test_is_page_aligned() {
    let ps = page_size();
    assert!(is_page_aligned(0));
    assert!(!is_page_aligned(1));
    assert!(is_page_aligned(ps));
    assert!(!is_page_aligned(ps - 1));
    assert!(is_page_aligned(ps * 2));
  }
}
