#[cfg(unix)]
pub type RawHandle = libc::c_int;

/// Win32 `HANDLE` values stored as an integer so `Handle` stays `Send`.
#[cfg(windows)]
pub type RawHandle = isize;

#[cfg(not(any(unix, windows)))]
pub type RawHandle = i32;

/// Opaque reference to an open file or pipe end.
///
/// A handle is plain data: copying it does not duplicate the native resource
/// and dropping it does not close anything. Call `close` exactly once; the
/// value must not be used afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(RawHandle);

impl Handle {
  pub const fn from_raw(raw: RawHandle) -> Self {
    Self(raw)
  }

  pub const fn as_raw(self) -> RawHandle {
    self.0
  }
}
