//! I2C master on an XR2280x USB HID bridge.
//!
//! The report codec is always available; the [`Xr2280xBridge`] transport
//! that talks to a real device needs the `hid` feature.

use crate::consts::bridge::{
    in_flags, out_flags, IN_REPORT_HEADER_SIZE, OUT_REPORT_WRITE_BUF_SIZE, REPORT_MAX_DATA_SIZE,
};
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource, Operation};
use log::{trace, warn};
use thiserror::Error;

/// Errors raised by the HID bridge while running an I2C transfer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Error from the underlying HID API layer.
    #[error("HID API error: {0}")]
    Hid(String),
    /// No device acknowledged the address.
    #[error("No device found at I2C address 0x{address:02X}: Device did not acknowledge (NACK)")]
    Nack {
        /// The 7-bit address that was not acknowledged.
        address: u8,
    },
    /// Another master won arbitration.
    #[error("I2C bus conflict at address 0x{address:02X}: Arbitration lost")]
    ArbitrationLost {
        /// The 7-bit address being accessed.
        address: u8,
    },
    /// The bridge or the target did not answer in time.
    #[error("I2C timeout at address 0x{address:02X}")]
    Timeout {
        /// The 7-bit address being accessed.
        address: u8,
    },
    /// The bridge firmware rejected the request.
    #[error("I2C request error at address 0x{address:02X}: invalid parameters sent to bridge firmware")]
    RequestError {
        /// The 7-bit address being accessed.
        address: u8,
    },
    /// Malformed or short IN report.
    #[error("Invalid HID report received or unexpected size ({0} bytes)")]
    InvalidReport(usize),
    /// Transfer does not fit in one report.
    #[error("Requested operation size is too large (max {max}, got {actual})")]
    OperationTooLarge {
        /// Maximum bytes per direction per report.
        max: usize,
        /// Requested size.
        actual: usize,
    },
    /// The bridge returned more data than the caller's buffer holds.
    #[error("Provided buffer is too small (expected at least {expected}, got {actual})")]
    BufferTooSmall {
        /// Bytes returned by the bridge.
        expected: usize,
        /// Size of the caller's buffer.
        actual: usize,
    },
    /// The bridge returned fewer bytes than were requested.
    #[error("Short I2C read at address 0x{address:02X} (expected {expected} bytes, got {actual})")]
    ShortRead {
        /// The 7-bit address being read.
        address: u8,
        /// Bytes requested.
        expected: usize,
        /// Bytes returned by the bridge.
        actual: usize,
    },
    /// Not a 7-bit address.
    #[error("Invalid 7-bit I2C address: 0x{0:02X}")]
    InvalidAddress(u8),
    /// Bus speed outside 1-400 kHz.
    #[error("I2C speed {0} kHz out of range (1-400)")]
    SpeedOutOfRange(u32),
}

impl embedded_hal::i2c::Error for BridgeError {
    fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Nack { .. } => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            BridgeError::ArbitrationLost { .. } => ErrorKind::ArbitrationLoss,
            _ => ErrorKind::Other,
        }
    }
}

/// Builds an I2C_SLAVE_OUT report: flags, write length, read length,
/// slave address in wire format (7-bit address in bits 7:1), then up to
/// 32 bytes of write data.
pub fn encode_request(
    address: u8,
    flags: u8,
    write: &[u8],
    read_len: usize,
) -> Result<[u8; OUT_REPORT_WRITE_BUF_SIZE], BridgeError> {
    if address > 0x7F {
        return Err(BridgeError::InvalidAddress(address));
    }
    if write.len() > REPORT_MAX_DATA_SIZE || read_len > REPORT_MAX_DATA_SIZE {
        return Err(BridgeError::OperationTooLarge {
            max: REPORT_MAX_DATA_SIZE,
            actual: write.len().max(read_len),
        });
    }
    let mut out_buf = [0u8; OUT_REPORT_WRITE_BUF_SIZE];
    out_buf[0] = flags;
    out_buf[1] = write.len() as u8;
    out_buf[2] = read_len as u8;
    out_buf[3] = address << 1;
    out_buf[4..4 + write.len()].copy_from_slice(write);
    trace!(
        "I2C OUT report (addr=0x{:02X}, flags=0x{:02X}): {:02X?}",
        address,
        flags,
        &out_buf[..4 + write.len()]
    );
    Ok(out_buf)
}

/// Checks an I2C_SLAVE_IN report and copies returned data into `read`.
pub fn decode_response(
    address: u8,
    report: &[u8],
    read: Option<&mut [u8]>,
) -> Result<(), BridgeError> {
    if report.len() < IN_REPORT_HEADER_SIZE {
        warn!("Received short I2C IN report ({} bytes)", report.len());
        return Err(BridgeError::InvalidReport(report.len()));
    }
    let status = report[0];
    if status & in_flags::REQUEST_ERROR != 0 {
        return Err(BridgeError::RequestError { address });
    }
    if status & in_flags::NAK_RECEIVED != 0 {
        return Err(BridgeError::Nack { address });
    }
    if status & in_flags::ARBITRATION_LOST != 0 {
        return Err(BridgeError::ArbitrationLost { address });
    }
    if status & in_flags::TIMEOUT != 0 {
        return Err(BridgeError::Timeout { address });
    }
    if let Some(buffer) = read {
        let returned = report[2] as usize;
        if returned > buffer.len() {
            warn!(
                "Bridge reported reading {} bytes, but buffer only has space for {}",
                returned,
                buffer.len()
            );
            return Err(BridgeError::BufferTooSmall {
                expected: returned,
                actual: buffer.len(),
            });
        }
        if returned < buffer.len() {
            warn!(
                "I2C read length mismatch: expected {}, got {}",
                buffer.len(),
                returned
            );
            return Err(BridgeError::ShortRead {
                address,
                expected: buffer.len(),
                actual: returned,
            });
        }
        if report.len() < IN_REPORT_HEADER_SIZE + returned {
            warn!(
                "IN report too short ({}) to contain {} data bytes",
                report.len(),
                returned
            );
            return Err(BridgeError::InvalidReport(report.len()));
        }
        buffer[..returned]
            .copy_from_slice(&report[IN_REPORT_HEADER_SIZE..IN_REPORT_HEADER_SIZE + returned]);
    }
    Ok(())
}

/// What one OUT report carries.
#[cfg_attr(not(feature = "hid"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReportKind {
    Write,
    /// A write directly followed by a read, sent as one report.
    WriteRead,
    Read,
}

#[cfg_attr(not(feature = "hid"), allow(dead_code))]
impl ReportKind {
    /// Number of `Operation`s the report consumes.
    pub(crate) fn operations(self) -> usize {
        match self {
            ReportKind::WriteRead => 2,
            ReportKind::Write | ReportKind::Read => 1,
        }
    }
}

/// Splits a transaction into reports with their START/STOP flags. Every
/// report starts with START; only the last ends with STOP.
#[cfg_attr(not(feature = "hid"), allow(dead_code))]
pub(crate) fn plan_reports(operations: &[Operation<'_>]) -> Vec<(ReportKind, u8)> {
    let mut plan = Vec::new();
    let mut index = 0;
    while index < operations.len() {
        let kind = match (&operations[index], operations.get(index + 1)) {
            (Operation::Write(_), Some(Operation::Read(_))) => ReportKind::WriteRead,
            (Operation::Write(_), _) => ReportKind::Write,
            (Operation::Read(_), _) => ReportKind::Read,
        };
        index += kind.operations();
        let flags = if index == operations.len() {
            out_flags::START_BIT | out_flags::STOP_BIT
        } else {
            out_flags::START_BIT
        };
        plan.push((kind, flags));
    }
    plan
}

#[cfg(feature = "hid")]
pub use self::hid::Xr2280xBridge;

#[cfg(feature = "hid")]
mod hid {
    use super::{decode_response, encode_request, plan_reports, BridgeError, ReportKind};
    use crate::consts::{self, bridge::IN_REPORT_READ_BUF_SIZE};
    use embedded_hal::i2c::{ErrorType, I2c, Operation};
    use hidapi::{HidApi, HidDevice};
    use log::debug;
    use std::ffi::CStr;

    fn hid_error(err: hidapi::HidError) -> BridgeError {
        BridgeError::Hid(err.to_string())
    }

    /// An XR2280x I2C HID interface used as an `embedded-hal` I2C bus.
    ///
    /// **Note:** This handle is not thread-safe. Pass `&mut bridge` to share it
    /// between several drivers on the same thread.
    #[derive(Debug)]
    pub struct Xr2280xBridge {
        device: HidDevice,
        timeout_ms: i32,
    }

    impl Xr2280xBridge {
        /// Opens the first XR2280x I2C interface with the default VID/PID.
        /// **Warning:** Ambiguous if multiple devices exist.
        pub fn open_first(hid_api: &HidApi) -> Result<Self, BridgeError> {
            Self::open_by_vid_pid(hid_api, consts::EXAR_VID, consts::XR2280X_I2C_PID)
        }

        /// Opens a bridge by its Vendor ID and Product ID.
        pub fn open_by_vid_pid(hid_api: &HidApi, vid: u16, pid: u16) -> Result<Self, BridgeError> {
            let device = hid_api.open(vid, pid).map_err(hid_error)?;
            debug!("Opened XR2280x I2C bridge: VID={:04X}, PID={:04X}", vid, pid);
            Ok(Self::from_device(device))
        }

        /// Opens a bridge by its platform-specific path.
        pub fn open_by_path(hid_api: &HidApi, path: &CStr) -> Result<Self, BridgeError> {
            let device = hid_api.open_path(path).map_err(hid_error)?;
            debug!("Opened XR2280x I2C bridge at {:?}", path);
            Ok(Self::from_device(device))
        }

        /// Wraps an already opened HID device.
        pub fn from_device(device: HidDevice) -> Self {
            Xr2280xBridge {
                device,
                timeout_ms: consts::bridge::DEFAULT_TIMEOUT_MS,
            }
        }

        /// Sets how long to wait for each IN report.
        pub fn set_timeout_ms(&mut self, timeout_ms: i32) {
            self.timeout_ms = timeout_ms;
        }

        /// Sets the I2C bus speed (approximated). Max supported is 400 kHz.
        pub fn set_speed_khz(&mut self, speed_khz: u32) -> Result<(), BridgeError> {
            if speed_khz == 0 || speed_khz > 400 {
                return Err(BridgeError::SpeedOutOfRange(speed_khz));
            }
            let target_total_cycles = 60_000 / speed_khz;
            let low_cycles = target_total_cycles / 2;
            let high_cycles = target_total_cycles - low_cycles;
            let (min_low, min_high) = if speed_khz <= 100 {
                (252, 240)
            } else {
                (78, 36)
            };
            let final_low = low_cycles.max(min_low);
            let final_high = high_cycles.max(min_high);
            debug!(
                "Setting I2C speed ~{}kHz: SCL_LOW=0x{:04X}, SCL_HIGH=0x{:04X}",
                speed_khz, final_low, final_high
            );
            self.write_bridge_register(consts::bridge::REG_SCL_LOW, final_low as u16)?;
            self.write_bridge_register(consts::bridge::REG_SCL_HIGH, final_high as u16)
        }

        fn write_bridge_register(&self, reg_addr: u16, value: u16) -> Result<(), BridgeError> {
            let [addr_lo, addr_hi] = reg_addr.to_le_bytes();
            let [value_lo, value_hi] = value.to_le_bytes();
            let buf = [
                consts::bridge::REPORT_ID_WRITE_HID_REGISTER,
                addr_lo,
                addr_hi,
                value_lo,
                value_hi,
            ];
            self.device.send_feature_report(&buf).map_err(hid_error)
        }

        fn transfer(
            &mut self,
            address: u8,
            write: &[u8],
            read: Option<&mut [u8]>,
            flags: u8,
        ) -> Result<(), BridgeError> {
            let read_len = read.as_ref().map_or(0, |b| b.len());
            let out_buf = encode_request(address, flags, write, read_len)?;
            let written = self.device.write(&out_buf).map_err(hid_error)?;
            if written != out_buf.len() {
                return Err(BridgeError::Hid(format!(
                    "Incomplete HID write ({} of {} bytes)",
                    written,
                    out_buf.len()
                )));
            }
            let mut in_buf = [0u8; IN_REPORT_READ_BUF_SIZE];
            let bytes_read = self
                .device
                .read_timeout(&mut in_buf, self.timeout_ms)
                .map_err(hid_error)?;
            if bytes_read == 0 {
                return Err(BridgeError::Timeout { address });
            }
            decode_response(address, &in_buf[..bytes_read], read)
        }
    }

    impl ErrorType for Xr2280xBridge {
        type Error = BridgeError;
    }

    impl I2c for Xr2280xBridge {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            let mut index = 0;
            for (kind, flags) in plan_reports(operations) {
                match kind {
                    ReportKind::WriteRead => {
                        let (head, tail) = operations.split_at_mut(index + 1);
                        if let (Operation::Write(data), Some(Operation::Read(buffer))) =
                            (&mut head[index], tail.first_mut())
                        {
                            self.transfer(address, *data, Some(&mut **buffer), flags)?;
                        }
                    }
                    ReportKind::Write => {
                        if let Operation::Write(data) = &operations[index] {
                            self.transfer(address, *data, None, flags)?;
                        }
                    }
                    ReportKind::Read => {
                        if let Operation::Read(buffer) = &mut operations[index] {
                            self.transfer(address, &[], Some(&mut **buffer), flags)?;
                        }
                    }
                }
                index += kind.operations();
            }
            Ok(())
        }
    }
}
