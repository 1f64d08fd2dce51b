use bitflags::bitflags;

bitflags! {
  /// Open mode. No access bit means read-only.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct OpenFlags: u32 {
    const READ = 1 << 0;
    const WRITE = 1 << 1;
    const CREATE = 1 << 2;
    const TRUNCATE = 1 << 3;
    const APPEND = 1 << 4;
    const EXCLUSIVE = 1 << 5;
  }
}

impl OpenFlags {
  pub const READ_WRITE: Self = Self::READ.union(Self::WRITE);

  pub fn is_writable(self) -> bool {
    self.intersects(Self::WRITE | Self::APPEND)
  }
}

bitflags! {
  /// Page protection. Empty means no access.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct Protection: u32 {
    const READ = 1 << 0;
    const WRITE = 1 << 1;
    const EXEC = 1 << 2;
  }
}

bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct MapFlags: u32 {
    const SHARED = 1 << 0;
    const PRIVATE = 1 << 1;
    const ANONYMOUS = 1 << 2;
  }
}

bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct PipeFlags: u32 {
    const CLOEXEC = 1 << 0;
    const NONBLOCK = 1 << 1;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Whence {
  Start,
  Current,
  End,
}
