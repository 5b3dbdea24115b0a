//! Internal constants: IOCON bit layout, address range and XR2280x bridge values.

// --- MCP23017 ---

/// Lowest bus address (A2..A0 strapped low).
pub const MCP23017_BASE_ADDRESS: u8 = 0x20;
/// Highest bus address (A2..A0 strapped high).
pub const MCP23017_MAX_ADDRESS: u8 = 0x27;

/// IOCON bit positions (BANK = 0 layout).
pub mod iocon {
    /// Register banking. Always left at 0 by this driver.
    #[allow(dead_code)]
    pub const BANK: u8 = 7;
    /// INTA/INTB internally connected.
    pub const MIRROR: u8 = 6;
    /// Sequential operation disabled; the pointer toggles within an A/B pair.
    pub const SEQOP: u8 = 5;
    /// SDA slew rate control disabled.
    #[allow(dead_code)]
    pub const DISSLW: u8 = 4;
    /// Open-drain INT outputs (overrides INTPOL).
    pub const ODR: u8 = 2;
    /// INT outputs active-high.
    pub const INTPOL: u8 = 1;
}

// --- XR2280x USB HID bridge ---

// Default Vendor/Product IDs
/// Exar Corporation vendor ID for XR2280x devices.
pub const EXAR_VID: u16 = 0x04E2;
/// Product ID for the XR2280x I2C HID interface (common for XR22800/1/2/4).
pub const XR2280X_I2C_PID: u16 = 0x1100;

pub mod bridge {
    // Feature report used to poke bridge registers (bus speed).
    #[allow(dead_code)]
    pub const REPORT_ID_WRITE_HID_REGISTER: u8 = 0x3C;

    pub const REPORT_MAX_DATA_SIZE: usize = 32;
    // Flags(1) + WrSize(1) + RdSize(1) + SlaveAddr(1) + Data(32)
    pub const OUT_REPORT_WRITE_BUF_SIZE: usize = 36;
    // ReportID(1) + Flags(1) + WrSize(1) + RdSize(1) + Reserved(1) + Data(32)
    #[allow(dead_code)]
    pub const IN_REPORT_READ_BUF_SIZE: usize = 36;
    pub const IN_REPORT_HEADER_SIZE: usize = 4;

    #[allow(dead_code)]
    pub const REG_SCL_LOW: u16 = 0x0341;
    #[allow(dead_code)]
    pub const REG_SCL_HIGH: u16 = 0x0342;

    #[allow(dead_code)]
    pub const DEFAULT_TIMEOUT_MS: i32 = 500;

    // I2C_SLAVE_OUT flags (byte 0 of the OUT report)
    pub mod out_flags {
        pub const START_BIT: u8 = 1 << 0;
        pub const STOP_BIT: u8 = 1 << 1;
    }

    // I2C_SLAVE_IN status flags (byte 0 of the IN report)
    pub mod in_flags {
        pub const REQUEST_ERROR: u8 = 1 << 0;
        pub const NAK_RECEIVED: u8 = 1 << 1;
        pub const ARBITRATION_LOST: u8 = 1 << 2;
        pub const TIMEOUT: u8 = 1 << 3;
    }
}
