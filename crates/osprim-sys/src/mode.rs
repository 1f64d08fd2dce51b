//! File type and permission bits.
//!
//! The values match the Darwin and wasi-libc headers and are the same on every
//! backend. Backends translate native type bits onto these constants, so a
//! mode stored by one build reads the same in another.

pub const S_IFMT: u32 = 0xf000;
pub const S_IFSOCK: u32 = 0xc000;
pub const S_IFLNK: u32 = 0xa000;
pub const S_IFREG: u32 = 0x8000;
pub const S_IFBLK: u32 = 0x6000;
pub const S_IFDIR: u32 = 0x4000;
pub const S_IFCHR: u32 = 0x2000;
pub const S_IFIFO: u32 = 0x1000;
pub const S_IFWHT: u32 = 0xe000;

pub const S_ISUID: u32 = 0x800;
pub const S_ISGID: u32 = 0x400;
pub const S_ISVTX: u32 = 0x200;
pub const S_ISTXT: u32 = 0x200;

pub const S_IRWXU: u32 = 0x1c0;
pub const S_IRUSR: u32 = 0x100;
pub const S_IWUSR: u32 = 0x80;
pub const S_IXUSR: u32 = 0x40;
pub const S_IRWXG: u32 = 0x38;
pub const S_IRGRP: u32 = 0x20;
pub const S_IWGRP: u32 = 0x10;
pub const S_IXGRP: u32 = 0x8;
pub const S_IRWXO: u32 = 0x7;
pub const S_IROTH: u32 = 0x4;
pub const S_IWOTH: u32 = 0x2;
pub const S_IXOTH: u32 = 0x1;

pub const S_IREAD: u32 = S_IRUSR;
pub const S_IWRITE: u32 = S_IWUSR;
pub const S_IEXEC: u32 = S_IXUSR;

/// Permission and set-id bits.
pub const PERM_MASK: u32 = 0o7777;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_documented_values() {
    assert_eq!(S_IFDIR, 0x4000);
    assert_eq!(S_IFREG, 0x8000);
    assert_eq!(S_IRUSR, 0x100);
    assert_eq!(S_IRWXU, S_IRUSR | S_IWUSR | S_IXUSR);
    assert_eq!(S_IRWXG, S_IRGRP | S_IWGRP | S_IXGRP);
    assert_eq!(S_IRWXO, S_IROTH | S_IWOTH | S_IXOTH);
  }

  #[test]
  fn test_types_fit_mask() {
    for ty in [
      S_IFSOCK, S_IFLNK, S_IFREG, S_IFBLK, S_IFDIR, S_IFCHR, S_IFIFO, S_IFWHT,
    ] {
      assert_eq!(ty & S_IFMT, ty);
      assert_eq!(ty & PERM_MASK, 0);
    }
  }

  #[test]
  #[cfg(any(target_os = "linux", target_os = "android", target_vendor = "apple"))]
  fn test_native_headers_agree() {
    assert_eq!(S_IFDIR, libc::S_IFDIR as u32);
    assert_eq!(S_IFREG, libc::S_IFREG as u32);
    assert_eq!(S_IFLNK, libc::S_IFLNK as u32);
    assert_eq!(S_IRUSR, libc::S_IRUSR as u32);
  }
}
