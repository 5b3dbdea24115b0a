use crate::registers::Register;
use embedded_hal::i2c::ErrorKind;
use log::warn;
use thiserror::Error;

/// Errors that can occur when driving an MCP23017.
///
/// Bus failures are reported with the register being accessed so a caller
/// can tell which step of a multi-register operation went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An I2C transaction against the device failed (e.g. the device did not acknowledge).
    #[error("I2C error while accessing register {register}: {kind}")]
    Bus {
        /// The register that was being read or written.
        register: Register,
        /// Transport error classification.
        kind: ErrorKind,
    },
    /// Pin number is outside 0-15.
    #[error("Pin {pin} out of range (0-15)")]
    PinOutOfRange {
        /// The invalid pin number that was specified.
        pin: u8,
    },
    /// Device address is outside 0x20-0x27.
    #[error("Device address 0x{address:02X} out of range (0x20-0x27)")]
    AddressOutOfRange {
        /// The invalid address that was specified.
        address: u8,
    },
    /// A multi-register update was only partially applied. Nothing is rolled back.
    #[error(
        "Register update incomplete: {} register(s) written, {} failed (first failure at {})",
        .written.len(),
        .failed.len(),
        first_failure(.failed)
    )]
    Incomplete {
        /// Registers that were updated successfully, in bus order.
        written: Vec<Register>,
        /// Registers that could not be read or written, with the transport error.
        failed: Vec<(Register, ErrorKind)>,
    },
}

/// Result type alias for MCP23017 operations.
pub type Result<T> = std::result::Result<T, Error>;

fn first_failure(failed: &[(Register, ErrorKind)]) -> String {
    failed
        .first()
        .map(|(reg, kind)| format!("{reg}: {kind}"))
        .unwrap_or_else(|| "unknown".to_string())
}

impl Error {
    /// Transport error kind, if this error came from the bus.
    pub fn bus_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Bus { kind, .. } => Some(*kind),
            Error::Incomplete { failed, .. } => failed.first().map(|(_, kind)| *kind),
            _ => None,
        }
    }
}

/// Collects the outcome of each register access in an operation that touches
/// several registers. Every write is attempted even after a failure.
#[derive(Debug, Default)]
pub(crate) struct WriteLog {
    written: Vec<Register>,
    failed: Vec<(Register, ErrorKind)>,
}

impl WriteLog {
    /// Records the result of updating `register`.
    pub(crate) fn record(&mut self, register: Register, result: Result<()>) {
        match result {
            Ok(()) => self.written.push(register),
            Err(Error::Bus { register, kind }) => self.failed.push((register, kind)),
            Err(Error::Incomplete { written, failed }) => {
                self.written.extend(written);
                self.failed.extend(failed);
            }
            Err(other) => {
                warn!("Unexpected error updating {}: {}", register, other);
                self.failed.push((register, ErrorKind::Other));
            }
        }
    }

    pub(crate) fn finish(self) -> Result<()> {
        if self.failed.is_empty() {
            Ok(())
        } else if self.written.is_empty() && self.failed.len() == 1 {
            let (register, kind) = self.failed[0];
            Err(Error::Bus { register, kind })
        } else {
            Err(Error::Incomplete {
                written: self.written,
                failed: self.failed,
            })
        }
    }
}
