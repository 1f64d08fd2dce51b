use getset::CopyGetters;

use crate::mode::{
  PERM_MASK,
  S_IFDIR,
  S_IFLNK,
  S_IFMT,
  S_IFREG,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timespec {
  pub sec: i64,
  pub nsec: i64,
}

impl Timespec {
  pub const fn new(sec: i64, nsec: i64) -> Self {
    Self { sec, nsec }
  }
}

/// File metadata with the same field set on every backend.
///
/// `mode` always uses the constants in [`crate::mode`]. Fields the platform
/// has no notion of are zero: Linux has no `btime` or `flags`, Windows has no
/// `uid`, `gid` or `blocks`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct StatRecord {
  pub(crate) dev: u64,
  pub(crate) mode: u32,
  pub(crate) nlink: u64,
  pub(crate) ino: u64,
  pub(crate) uid: u32,
  pub(crate) gid: u32,
  pub(crate) rdev: u64,
  pub(crate) size: i64,
  pub(crate) blocks: i64,
  pub(crate) blksize: i64,
  pub(crate) atime: Timespec,
  pub(crate) mtime: Timespec,
  pub(crate) ctime: Timespec,
  pub(crate) btime: Timespec,
  pub(crate) flags: u32,
  pub(crate) generation: u32,
}

impl StatRecord {
  pub fn file_type(&self) -> u32 {
    self.mode & S_IFMT
  }

  pub fn permissions(&self) -> u32 {
    self.mode & PERM_MASK
  }

  pub fn is_dir(&self) -> bool {
    self.file_type() == S_IFDIR
  }

  pub fn is_file(&self) -> bool {
    self.file_type() == S_IFREG
  }

  pub fn is_symlink(&self) -> bool {
    self.file_type() == S_IFLNK
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mode::S_IFCHR;

  #[test]
  fn test_type_queries() {
    let st = StatRecord {
      mode: S_IFDIR | 0o755,
      ..Default::default()
    };
    assert!(st.is_dir());
    assert!(!st.is_file());
    assert_eq!(st.permissions(), 0o755);

    let st = StatRecord {
      mode: S_IFCHR | 0o666,
      ..Default::default()
    };
    assert_eq!(st.file_type(), S_IFCHR);
    assert!(!st.is_symlink());
  }

  #[test]
  fn test_getters() {
    let st = StatRecord {
      size: 42,
      mtime: Timespec::new(10, 5),
      ..Default::default()
    };
    assert_eq!(st.size(), 42);
    assert_eq!(st.mtime(), Timespec { sec: 10, nsec: 5 });
    assert_eq!(st.btime(), Timespec::default());
  }
}
