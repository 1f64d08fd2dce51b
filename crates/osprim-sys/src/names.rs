//! Platform naming conventions layered over the primitive set.

/// Name of the null device on the build target.
#[cfg(windows)]
pub const DEV_NULL: &str = "NUL";

#[cfg(not(windows))]
pub const DEV_NULL: &str = "/dev/null";

/// Whether `name` is the Win32 null-device alias: `NUL` in any letter case,
/// exactly three characters.
pub fn is_nul_alias(name: &str) -> bool {
  name.len() == 3 && name.eq_ignore_ascii_case("nul")
}

const BACKSLASH: u16 = b'\\' as u16;
const COLON: u16 = b':' as u16;

/// Drops one trailing `\` from a Win32 temp path unless the path is a bare
/// drive root like `C:\`.
pub fn trim_temp_dir(path: &[u16]) -> &[u16] {
  match path {
    [_, COLON, BACKSLASH] => path,
    [rest @ .., BACKSLASH] => rest,
    _ => path,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
  }

  #[test]
  fn test_nul_alias() {
    assert!(is_nul_alias("nul"));
    assert!(is_nul_alias("NUL"));
    assert!(is_nul_alias("NuL"));
    assert!(!is_nul_alias("nul.txt"));
    assert!(!is_nul_alias("nu"));
    assert!(!is_nul_alias("null"));
    assert!(!is_nul_alias("\\\\.\\NUL"));
    assert!(!is_nul_alias(""));
  }

  #[test]
  fn test_trim_temp_dir_strips_one_separator() {
    assert_eq!(
      trim_temp_dir(&wide("C:\\Users\\me\\AppData\\Local\\Temp\\")),
      wide("C:\\Users\\me\\AppData\\Local\\Temp").as_slice()
    );
    assert_eq!(trim_temp_dir(&wide("D:\\tmp\\\\")), wide("D:\\tmp\\").as_slice());
  }

  #[test]
  fn test_trim_temp_dir_keeps_drive_root() {
    assert_eq!(trim_temp_dir(&wide("C:\\")), wide("C:\\").as_slice());
  }

  #[test]
  fn test_trim_temp_dir_untouched() {
    assert_eq!(trim_temp_dir(&wide("C:\\tmp")), wide("C:\\tmp").as_slice());
    assert_eq!(trim_temp_dir(&[]), &[] as &[u16]);
  }
}
