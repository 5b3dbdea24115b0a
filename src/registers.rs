//! MCP23017 register map for IOCON.BANK = 0.
//!
//! In this layout every A/B register pair sits on adjacent addresses, port A
//! first. [`PairedRegister`] names a pair, [`Register`] names one concrete
//! byte. IOCON has no port and therefore only exists as a [`Register`], so
//! offsetting it by a port cannot be written.

use std::fmt;

/// One of the two 8-bit ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    /// GPA0..GPA7, the low byte of 16-bit values.
    A,
    /// GPB0..GPB7, the high byte of 16-bit values.
    B,
}

impl Port {
    /// Both ports, A first.
    pub const ALL: [Port; 2] = [Port::A, Port::B];

    /// Address offset from the port A register of a pair (0 or 1).
    #[inline]
    pub fn offset(self) -> u8 {
        match self {
            Port::A => 0,
            Port::B => 1,
        }
    }
}

/// A single addressable register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    IODIRA = 0x00,
    IODIRB = 0x01,
    IPOLA = 0x02,
    IPOLB = 0x03,
    GPINTENA = 0x04,
    GPINTENB = 0x05,
    DEFVALA = 0x06,
    DEFVALB = 0x07,
    INTCONA = 0x08,
    INTCONB = 0x09,
    /// Configuration. Also visible at 0x0B, which is not named here.
    IOCON = 0x0A,
    GPPUA = 0x0C,
    GPPUB = 0x0D,
    INTFA = 0x0E,
    INTFB = 0x0F,
    INTCAPA = 0x10,
    INTCAPB = 0x11,
    GPIOA = 0x12,
    GPIOB = 0x13,
    OLATA = 0x14,
    OLATB = 0x15,
}

impl Register {
    /// Byte address of the register on the chip.
    #[inline]
    pub fn address(self) -> u8 {
        self as u8
    }

    /// Looks up the register at `address`. Returns `None` for 0x0B (IOCON
    /// mirror) and anything past 0x15.
    pub fn from_address(address: u8) -> Option<Register> {
        use Register::*;
        let reg = match address {
            0x00 => IODIRA,
            0x01 => IODIRB,
            0x02 => IPOLA,
            0x03 => IPOLB,
            0x04 => GPINTENA,
            0x05 => GPINTENB,
            0x06 => DEFVALA,
            0x07 => DEFVALB,
            0x08 => INTCONA,
            0x09 => INTCONB,
            0x0A => IOCON,
            0x0C => GPPUA,
            0x0D => GPPUB,
            0x0E => INTFA,
            0x0F => INTFB,
            0x10 => INTCAPA,
            0x11 => INTCAPB,
            0x12 => GPIOA,
            0x13 => GPIOB,
            0x14 => OLATA,
            0x15 => OLATB,
            _ => return None,
        };
        Some(reg)
    }

    /// The port this register belongs to, `None` for IOCON.
    pub fn port(self) -> Option<Port> {
        match self {
            Register::IOCON => None,
            r if r.address() % 2 == 0 => Some(Port::A),
            _ => Some(Port::B),
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (0x{:02X})", self, self.address())
    }
}

/// A register family that exists once per port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairedRegister {
    /// I/O direction, 1 = input.
    Iodir,
    /// Input polarity inversion.
    Ipol,
    /// Interrupt-on-change enable.
    Gpinten,
    /// Compare value for interrupt-on-change.
    Defval,
    /// Interrupt control, 1 = compare against DEFVAL.
    Intcon,
    /// Pull-up enable.
    Gppu,
    /// Interrupt flags (read only).
    Intf,
    /// Port value captured at interrupt time (read only, read clears).
    Intcap,
    /// Port value.
    Gpio,
    /// Output latch.
    Olat,
}

impl PairedRegister {
    /// Every paired family in address order.
    pub const ALL: [PairedRegister; 10] = [
        PairedRegister::Iodir,
        PairedRegister::Ipol,
        PairedRegister::Gpinten,
        PairedRegister::Defval,
        PairedRegister::Intcon,
        PairedRegister::Gppu,
        PairedRegister::Intf,
        PairedRegister::Intcap,
        PairedRegister::Gpio,
        PairedRegister::Olat,
    ];

    /// The concrete register of this family for `port`. Port B is always
    /// the port A address plus one.
    pub fn offset(self, port: Port) -> Register {
        use Register::*;
        let (a, b) = match self {
            PairedRegister::Iodir => (IODIRA, IODIRB),
            PairedRegister::Ipol => (IPOLA, IPOLB),
            PairedRegister::Gpinten => (GPINTENA, GPINTENB),
            PairedRegister::Defval => (DEFVALA, DEFVALB),
            PairedRegister::Intcon => (INTCONA, INTCONB),
            PairedRegister::Gppu => (GPPUA, GPPUB),
            PairedRegister::Intf => (INTFA, INTFB),
            PairedRegister::Intcap => (INTCAPA, INTCAPB),
            PairedRegister::Gpio => (GPIOA, GPIOB),
            PairedRegister::Olat => (OLATA, OLATB),
        };
        match port {
            Port::A => a,
            Port::B => b,
        }
    }

    /// Shorthand for `offset(Port::A)`, the address two-byte transfers start at.
    #[inline]
    pub fn base(self) -> Register {
        self.offset(Port::A)
    }
}
