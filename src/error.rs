//! Fatal error kinds raised by the executor and loader.
//!
//! The original simulator prints a diagnostic and calls `exit()` from
//! wherever the error is detected. Here every fallible operation returns a
//! `VmError` instead; only the CLI binary turns one into a process exit.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("unknown opcode")]
    Unknown,
    #[error("illegal instruction (ILLOP)")]
    Illegal,
    #[error("immediate addressing mode not permitted for this opcode")]
    Immediate,
    #[error("illegal branch/call condition")]
    Condition,
    #[error("data segment access out of bounds")]
    SegData,
    #[error("stack pointer out of bounds")]
    SegStack,
    #[error("program counter out of bounds")]
    SegText,
}

/// A fatal VM error, tagged with the address at which it was detected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at {addr:#010x}")]
pub struct VmError {
    pub kind: ErrorKind,
    pub addr: u32,
}

impl VmError {
    pub fn new(kind: ErrorKind, addr: u32) -> Self {
        Self { kind, addr }
    }
}

impl ErrorKind {
    /// A distinct non-zero process exit code per kind, for the CLI binary.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Unknown => 1,
            ErrorKind::Illegal => 2,
            ErrorKind::Immediate => 3,
            ErrorKind::Condition => 4,
            ErrorKind::SegData => 5,
            ErrorKind::SegStack => 6,
            ErrorKind::SegText => 7,
        }
    }
}

/// Everything `run` can fail with: a fatal VM error, or an I/O failure
/// reading the program file / writing the dump. Kept distinct from
/// `VmError` since only the latter carries an `ErrorKind`/address pair;
/// only the CLI binary inspects this to pick a process exit code.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Vm(#[from] VmError),
}

impl RunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Io(_) => 1,
            RunError::Vm(err) => err.kind.exit_code(),
        }
    }
}
