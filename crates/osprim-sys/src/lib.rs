#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod errno;
pub mod flags;
pub mod handle;
pub mod mode;
pub mod names;
pub mod prim;
pub mod stat;
pub mod system;

pub use errno::{
  SysError,
  SysResult,
};
pub use handle::{
  Handle,
  RawHandle,
};
pub use system::{
  BACKEND,
  NATIVE,
  NativeSystem,
  System,
};

pub mod prelude {
  pub use super::{
    BACKEND,
    NATIVE,
    errno::{
      SysError,
      SysResult,
    },
    flags::{
      MapFlags,
      OpenFlags,
      PipeFlags,
      Protection,
      Whence,
    },
    handle::Handle,
    mode::*,
    names::DEV_NULL,
    prim::{
      page_align,
      page_size,
    },
    stat::{
      StatRecord,
      Timespec,
    },
    system::System,
  };
}
