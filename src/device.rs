//! The MCP23017 handle, its configuration and raw register access.

use crate::bits;
use crate::consts;
use crate::error::{Error, Result, WriteLog};
use crate::interrupt::InterruptMirror;
use crate::registers::{PairedRegister, Register};
use embedded_hal::i2c::I2c;
use log::{debug, trace, warn};
use std::fmt;

/// 7-bit bus address of an MCP23017 (0x20-0x27).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    /// Validates a raw 7-bit address.
    pub fn new(address: u8) -> Result<Self> {
        if (consts::MCP23017_BASE_ADDRESS..=consts::MCP23017_MAX_ADDRESS).contains(&address) {
            Ok(DeviceAddress(address))
        } else {
            Err(Error::AddressOutOfRange { address })
        }
    }

    /// Builds the address from the levels strapped on the A2, A1 and A0 pins.
    pub fn from_pins(a2: bool, a1: bool, a0: bool) -> Self {
        let strap = (u8::from(a2) << 2) | (u8::from(a1) << 1) | u8::from(a0);
        DeviceAddress(consts::MCP23017_BASE_ADDRESS | strap)
    }

    /// The raw 7-bit address.
    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for DeviceAddress {
    /// 0x20, all address pins low.
    fn default() -> Self {
        DeviceAddress(consts::MCP23017_BASE_ADDRESS)
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Settings applied by [`Mcp23017::initialize`].
///
/// The default leaves every pull-up disabled. Use [`Config::legacy`] to get
/// all 16 pull-ups enabled, which is what older Arduino drivers did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How the INTA/INTB outputs relate to the two ports.
    pub interrupt_mirror: InterruptMirror,
    /// Drive INT as open-drain. Overrides `interrupt_active_high`.
    pub open_drain_interrupt: bool,
    /// INT asserts high instead of low.
    pub interrupt_active_high: bool,
    /// GPPUA mask written at initialization.
    pub pull_up_a: u8,
    /// GPPUB mask written at initialization.
    pub pull_up_b: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            interrupt_mirror: InterruptMirror::Separated,
            open_drain_interrupt: false,
            interrupt_active_high: false,
            pull_up_a: 0x00,
            pull_up_b: 0x00,
        }
    }
}

impl Config {
    /// All pull-ups enabled, otherwise default.
    pub fn legacy() -> Self {
        Config::default().with_pull_ups(0xFF, 0xFF)
    }

    /// Sets the per-port pull-up masks.
    pub fn with_pull_ups(mut self, port_a: u8, port_b: u8) -> Self {
        self.pull_up_a = port_a;
        self.pull_up_b = port_b;
        self
    }

    /// Sets the interrupt mirroring mode.
    pub fn with_interrupt_mirror(mut self, mirror: InterruptMirror) -> Self {
        self.interrupt_mirror = mirror;
        self
    }

    /// Selects open-drain INT outputs.
    pub fn with_open_drain_interrupt(mut self, open_drain: bool) -> Self {
        self.open_drain_interrupt = open_drain;
        self
    }

    /// Selects active-high INT outputs.
    pub fn with_interrupt_active_high(mut self, active_high: bool) -> Self {
        self.interrupt_active_high = active_high;
        self
    }

    /// IOCON value for this configuration. BANK is always 0 and SEQOP always
    /// 1, so two-byte transfers stay within an A/B register pair.
    pub fn iocon(&self) -> u8 {
        let mut iocon = bits::set_bit(0, consts::iocon::SEQOP);
        iocon = bits::write_bit(
            iocon,
            consts::iocon::MIRROR,
            self.interrupt_mirror == InterruptMirror::Or,
        );
        iocon = bits::write_bit(iocon, consts::iocon::ODR, self.open_drain_interrupt);
        bits::write_bit(iocon, consts::iocon::INTPOL, self.interrupt_active_high)
    }
}

/// A handle to one MCP23017 on an I2C bus.
///
/// The handle does not cache register contents: every read goes to the chip.
/// Operations that read, modify and write a register use two separate bus
/// transactions, so another bus user touching the same register in between
/// can lose an update. Callers sharing a bus must serialize access.
///
/// To share one bus between several expanders pass `&mut bus` (the
/// `embedded-hal` traits are implemented for mutable references) or a
/// bus-sharing wrapper.
#[derive(Debug)]
pub struct Mcp23017<I2C> {
    pub(crate) bus: I2C,
    pub(crate) address: DeviceAddress,
    config: Config,
}

impl<I2C: I2c> Mcp23017<I2C> {
    // --- Constructors and Info ---
    /// Creates a handle with the default [`Config`]. Nothing is sent until
    /// [`initialize`](Self::initialize) or another operation is called.
    pub fn new(bus: I2C, address: DeviceAddress) -> Self {
        Self::with_config(bus, address, Config::default())
    }

    /// Creates a handle with an explicit configuration.
    pub fn with_config(bus: I2C, address: DeviceAddress, config: Config) -> Self {
        debug!("MCP23017 at {}: {:?}", address, config);
        Mcp23017 {
            bus,
            address,
            config,
        }
    }

    /// The bus address this handle talks to.
    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    /// The configuration used by [`initialize`](Self::initialize). It is
    /// what the handle will write, not a copy of the chip registers.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consumes the handle and gives the bus back.
    pub fn release(self) -> I2C {
        self.bus
    }

    /// Writes IOCON and the pull-up registers from the configuration.
    ///
    /// Both writes are attempted even if the first fails.
    pub fn initialize(&mut self) -> Result<()> {
        let iocon = self.config.iocon();
        let pull_ups = u16::from_le_bytes([self.config.pull_up_a, self.config.pull_up_b]);
        debug!(
            "Initializing MCP23017 at {}: IOCON=0b{:08b}, GPPU=0x{:04X}",
            self.address, iocon, pull_ups
        );
        let mut log = WriteLog::default();
        log.record(Register::IOCON, self.write_register(Register::IOCON, iocon));
        log.record(
            PairedRegister::Gppu.base(),
            self.write_pair(PairedRegister::Gppu, pull_ups),
        );
        log.finish()
    }

    // --- Register Access ---
    fn bus_error<E: embedded_hal::i2c::Error>(&self, register: Register, err: E) -> Error {
        warn!(
            "I2C error at {} accessing {}: {:?}",
            self.address, register, err
        );
        Error::Bus {
            register,
            kind: err.kind(),
        }
    }

    /// Writes one register.
    ///
    /// Raw access for settings the typed operations do not cover, such as
    /// IOCON.DISSLW, a per-pin GPINTEN mask or OLAT. IOCON.BANK must stay 0:
    /// every other operation assumes the BANK = 0 address map.
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<()> {
        trace!("Write {} = 0x{:02X}", register, value);
        match self
            .bus
            .write(self.address.value(), &[register.address(), value])
        {
            Ok(()) => Ok(()),
            Err(e) => Err(self.bus_error(register, e)),
        }
    }

    /// Writes both registers of a pair in one transaction, low byte to port A.
    pub fn write_pair(&mut self, family: PairedRegister, value: u16) -> Result<()> {
        let register = family.base();
        let [a, b] = value.to_le_bytes();
        trace!("Write {} pair = 0x{:04X}", register, value);
        match self
            .bus
            .write(self.address.value(), &[register.address(), a, b])
        {
            Ok(()) => Ok(()),
            Err(e) => Err(self.bus_error(register, e)),
        }
    }

    /// Reads one register.
    pub fn read_register(&mut self, register: Register) -> Result<u8> {
        let mut buf = [0u8; 1];
        if let Err(e) = self
            .bus
            .write_read(self.address.value(), &[register.address()], &mut buf)
        {
            return Err(self.bus_error(register, e));
        }
        trace!("Read {} = 0x{:02X}", register, buf[0]);
        Ok(buf[0])
    }

    /// Reads both registers of a pair in one transaction, port A in the low byte.
    pub fn read_pair(&mut self, family: PairedRegister) -> Result<u16> {
        let register = family.base();
        let mut buf = [0u8; 2];
        if let Err(e) = self
            .bus
            .write_read(self.address.value(), &[register.address()], &mut buf)
        {
            return Err(self.bus_error(register, e));
        }
        let value = u16::from_le_bytes(buf);
        trace!("Read {} pair = 0x{:04X}", register, value);
        Ok(value)
    }

    /// Read-modify-write of a single bit. The other seven bits are written
    /// back exactly as read.
    pub(crate) fn update_bit(&mut self, register: Register, bit: u8, state: bool) -> Result<()> {
        let current = self.read_register(register)?;
        let new = bits::write_bit(current, bit, state);
        trace!(
            "Update {} bit {} -> {}: 0x{:02X} -> 0x{:02X}",
            register,
            bit,
            state,
            current,
            new
        );
        self.write_register(register, new)
    }
}
