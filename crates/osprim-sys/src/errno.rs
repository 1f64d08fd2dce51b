use osprim_marshal::MarshalError;

/// Uniform failure kinds shared by every backend.
///
/// Native error codes are translated into one of these before leaving a
/// backend; callers never see errno or Win32 codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum SysError {
  #[error("no such file or directory")]
  NotFound,
  #[error("permission denied")]
  PermissionDenied,
  #[error("entry already exists")]
  AlreadyExists,
  #[error("invalid argument")]
  InvalidArgument,
  #[error("operation would block")]
  WouldBlock,
  #[error("interrupted")]
  Interrupted,
  #[error("no space left")]
  NoSpace,
  #[error("operation not supported")]
  Unsupported,
  #[error("unknown system error")]
  Unknown,
}

pub type SysResult<T> = Result<T, SysError>;

impl From<MarshalError> for SysError {
  fn from(err: MarshalError) -> Self {
    match err {
      MarshalError::InteriorNul => SysError::InvalidArgument,
    }
  }
}

#[cfg(unix)]
pub fn from_errno(code: i32) -> SysError {
  match code {
    libc::ENOENT | libc::ENOTDIR => SysError::NotFound,
    libc::EACCES | libc::EPERM | libc::EROFS => SysError::PermissionDenied,
    libc::EEXIST | libc::ENOTEMPTY => SysError::AlreadyExists,
    libc::EINVAL | libc::EBADF | libc::ENAMETOOLONG | libc::EISDIR | libc::ESPIPE => {
      SysError::InvalidArgument
    }
    libc::EINTR => SysError::Interrupted,
    libc::ENOSPC | libc::ENOMEM | libc::EDQUOT | libc::EMFILE | libc::ENFILE => SysError::NoSpace,
    libc::ENOSYS | libc::EOPNOTSUPP | libc::ENODEV | libc::ENXIO => SysError::Unsupported,
    // EWOULDBLOCK aliases EAGAIN on the targets built here.
    code if code == libc::EAGAIN || code == libc::EWOULDBLOCK => SysError::WouldBlock,
    _ => SysError::Unknown,
  }
}

#[cfg(windows)]
pub fn from_win32(code: u32) -> SysError {
  use windows_sys::Win32::Foundation::*;

  match code {
    ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND | ERROR_INVALID_DRIVE | ERROR_BAD_NETPATH
    | ERROR_ENVVAR_NOT_FOUND => SysError::NotFound,
    ERROR_ACCESS_DENIED | ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION | ERROR_WRITE_PROTECT => {
      SysError::PermissionDenied
    }
    ERROR_ALREADY_EXISTS | ERROR_FILE_EXISTS | ERROR_DIR_NOT_EMPTY => SysError::AlreadyExists,
    ERROR_INVALID_PARAMETER | ERROR_INVALID_HANDLE | ERROR_INVALID_NAME | ERROR_BAD_PATHNAME
    | ERROR_FILENAME_EXCED_RANGE | ERROR_NEGATIVE_SEEK | ERROR_DIRECTORY => {
      SysError::InvalidArgument
    }
    ERROR_NO_DATA | ERROR_IO_PENDING | ERROR_PIPE_BUSY => SysError::WouldBlock,
    ERROR_OPERATION_ABORTED => SysError::Interrupted,
    ERROR_DISK_FULL | ERROR_HANDLE_DISK_FULL | ERROR_NOT_ENOUGH_MEMORY | ERROR_OUTOFMEMORY
    | ERROR_TOO_MANY_OPEN_FILES => SysError::NoSpace,
    ERROR_NOT_SUPPORTED | ERROR_CALL_NOT_IMPLEMENTED | ERROR_INVALID_FUNCTION => {
      SysError::Unsupported
    }
    _ => SysError::Unknown,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_marshal_error_is_invalid_argument() {
    assert_eq!(
      SysError::from(MarshalError::InteriorNul),
      SysError::InvalidArgument
    );
  }

  #[test]
  fn test_display() {
    assert_eq!(SysError::NotFound.to_string(), "no such file or directory");
    assert_eq!(SysError::Unsupported.to_string(), "operation not supported");
  }

  #[test]
  #[cfg(unix)]
  fn test_errno_mapping() {
    assert_eq!(from_errno(libc::ENOENT), SysError::NotFound);
    assert_eq!(from_errno(libc::EACCES), SysError::PermissionDenied);
    assert_eq!(from_errno(libc::EPERM), SysError::PermissionDenied);
    assert_eq!(from_errno(libc::EEXIST), SysError::AlreadyExists);
    assert_eq!(from_errno(libc::ENOTEMPTY), SysError::AlreadyExists);
    assert_eq!(from_errno(libc::EINVAL), SysError::InvalidArgument);
    assert_eq!(from_errno(libc::EBADF), SysError::InvalidArgument);
    assert_eq!(from_errno(libc::EAGAIN), SysError::WouldBlock);
    assert_eq!(from_errno(libc::EWOULDBLOCK), SysError::WouldBlock);
    assert_eq!(from_errno(libc::EINTR), SysError::Interrupted);
    assert_eq!(from_errno(libc::ENOSPC), SysError::NoSpace);
    assert_eq!(from_errno(libc::ENOSYS), SysError::Unsupported);
  }

  #[test]
  #[cfg(unix)]
  fn test_errno_unknown() {
    assert_eq!(from_errno(0), SysError::Unknown);
    assert_eq!(from_errno(-1), SysError::Unknown);
    assert_eq!(from_errno(i32::MAX), SysError::Unknown);
  }

  #[test]
  #[cfg(windows)]
  fn test_win32_mapping() {
    use windows_sys::Win32::Foundation::*;

    assert_eq!(from_win32(ERROR_FILE_NOT_FOUND), SysError::NotFound);
    assert_eq!(from_win32(ERROR_PATH_NOT_FOUND), SysError::NotFound);
    assert_eq!(from_win32(ERROR_ACCESS_DENIED), SysError::PermissionDenied);
    assert_eq!(from_win32(ERROR_ALREADY_EXISTS), SysError::AlreadyExists);
    assert_eq!(from_win32(ERROR_DIR_NOT_EMPTY), SysError::AlreadyExists);
    assert_eq!(from_win32(ERROR_INVALID_HANDLE), SysError::InvalidArgument);
    assert_eq!(from_win32(ERROR_NO_DATA), SysError::WouldBlock);
    assert_eq!(from_win32(ERROR_DISK_FULL), SysError::NoSpace);
    assert_eq!(from_win32(ERROR_NOT_SUPPORTED), SysError::Unsupported);
  }

  #[test]
  #[cfg(windows)]
  fn test_win32_unknown() {
    assert_eq!(from_win32(0xdead_beef), SysError::Unknown);
  }
}
