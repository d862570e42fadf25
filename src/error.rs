use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or listing a program.
///
/// Decoding itself never fails; these only come from the driver side.
#[derive(Debug, Error)]
pub enum Error {
    #[error("couldn't open file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("program of {len} bytes at base {base:#06x} exceeds the 16-bit address space")]
    ProgramTooLarge { len: usize, base: u16 },

    #[error("base address {0:#06x} is odd, instructions start on even offsets")]
    UnalignedBase(u16),

    #[error("listing worker stopped before sending its chunk")]
    WorkerDisconnected,
}
