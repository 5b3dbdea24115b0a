//! Pin types and the direction, pull-up, polarity and digital I/O operations.

use crate::bits;
use crate::device::Mcp23017;
use crate::error::{Error, Result, WriteLog};
use crate::registers::{PairedRegister, Port};
use embedded_hal::i2c::I2c;
use log::debug;

/// Pin direction, using the chip's IODIR encoding (1 = input).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    fn iodir_bit(self) -> bool {
        self == Direction::Input
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl Level {
    #[inline]
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

/// Complete pin setup applied by [`Mcp23017::configure_pin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Output,
    Input,
    /// Input with the internal 100k pull-up enabled.
    InputPullUp,
}

impl PinMode {
    pub fn direction(self) -> Direction {
        match self {
            PinMode::Output => Direction::Output,
            PinMode::Input | PinMode::InputPullUp => Direction::Input,
        }
    }

    fn pull_up(self) -> bool {
        self == PinMode::InputPullUp
    }
}

/// A pin number in 0-15. Pins 0-7 are GPA0-GPA7, pins 8-15 are GPB0-GPB7.
/// Use `Pin::new(num)` to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pin(u8);

impl Pin {
    /// Creates a new Pin, returning an error if the number is out of range (0-15).
    pub fn new(pin_num: u8) -> Result<Self> {
        if pin_num <= 15 {
            Ok(Pin(pin_num))
        } else {
            Err(Error::PinOutOfRange { pin: pin_num })
        }
    }

    /// Creates the pin for bit `bit` (0-7) of `port`.
    pub fn from_port(port: Port, bit: u8) -> Result<Self> {
        if bit <= 7 {
            Ok(Pin(port.offset() * 8 + bit))
        } else {
            Err(Error::PinOutOfRange {
                pin: (port.offset() * 8).saturating_add(bit),
            })
        }
    }

    /// All 16 pins in order.
    pub fn all() -> impl Iterator<Item = Pin> {
        (0..16).map(Pin)
    }

    /// Returns the underlying pin number (0-15).
    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }

    /// The port the pin belongs to.
    #[inline]
    pub fn port(&self) -> Port {
        if self.0 < 8 {
            Port::A
        } else {
            Port::B
        }
    }

    /// Returns the bit index (0-7) within the port's registers.
    #[inline]
    pub fn bit_index(&self) -> u8 {
        self.0 % 8
    }

    /// Returns the bit mask (1 << bit_index) for register operations.
    #[inline]
    pub fn mask(&self) -> u8 {
        1u8 << self.bit_index()
    }
}

impl<I2C: I2c> Mcp23017<I2C> {
    // --- Direction, pull-up and polarity ---

    /// Overwrites IODIR, GPPU and IPOL of `port`.
    ///
    /// `direction` uses the chip encoding (bit set = input). All three writes
    /// are attempted; on failure the error lists which ones landed.
    pub fn configure_port(
        &mut self,
        port: Port,
        direction: u8,
        pull_up: u8,
        polarity: u8,
    ) -> Result<()> {
        debug!(
            "Configuring port {:?}: IODIR=0x{:02X}, GPPU=0x{:02X}, IPOL=0x{:02X}",
            port, direction, pull_up, polarity
        );
        let mut log = WriteLog::default();
        for (family, value) in [
            (PairedRegister::Iodir, direction),
            (PairedRegister::Gppu, pull_up),
            (PairedRegister::Ipol, polarity),
        ] {
            let register = family.offset(port);
            log.record(register, self.write_register(register, value));
        }
        log.finish()
    }

    /// Sets direction, pull-up and input inversion of one pin.
    ///
    /// Each of IODIR, GPPU and IPOL is read, the pin's bit changed and the
    /// register written back before moving to the next one. A register that
    /// cannot be read is not written.
    pub fn configure_pin(&mut self, pin: Pin, mode: PinMode, inverted: bool) -> Result<()> {
        debug!(
            "Configuring pin {}: {:?}, inverted={}",
            pin.number(),
            mode,
            inverted
        );
        let port = pin.port();
        let bit = pin.bit_index();
        let mut log = WriteLog::default();
        for (family, state) in [
            (PairedRegister::Iodir, mode.direction().iodir_bit()),
            (PairedRegister::Gppu, mode.pull_up()),
            (PairedRegister::Ipol, inverted),
        ] {
            let register = family.offset(port);
            log.record(register, self.update_bit(register, bit, state));
        }
        log.finish()
    }

    /// Overwrites IODIR of `port` (bit set = input).
    pub fn set_port_direction(&mut self, port: Port, direction: u8) -> Result<()> {
        debug!("Setting IODIR port {:?}: 0x{:02X}", port, direction);
        self.write_register(PairedRegister::Iodir.offset(port), direction)
    }

    /// Sets the direction of a single pin, leaving the other pins alone.
    pub fn set_pin_direction(&mut self, pin: Pin, direction: Direction) -> Result<()> {
        debug!("Setting IODIR pin {}: {:?}", pin.number(), direction);
        self.update_bit(
            PairedRegister::Iodir.offset(pin.port()),
            pin.bit_index(),
            direction.iodir_bit(),
        )
    }

    /// Reads the configured direction of a single pin.
    pub fn pin_direction(&mut self, pin: Pin) -> Result<Direction> {
        let iodir = self.read_register(PairedRegister::Iodir.offset(pin.port()))?;
        Ok(if bits::get_bit(iodir, pin.bit_index()) {
            Direction::Input
        } else {
            Direction::Output
        })
    }

    /// Enables or disables the internal pull-up of a single pin.
    pub fn set_pull_up(&mut self, pin: Pin, enable: bool) -> Result<()> {
        debug!("Setting GPPU pin {}: {}", pin.number(), enable);
        self.update_bit(
            PairedRegister::Gppu.offset(pin.port()),
            pin.bit_index(),
            enable,
        )
    }

    /// Enables or disables input polarity inversion of a single pin.
    pub fn set_inverted(&mut self, pin: Pin, inverted: bool) -> Result<()> {
        debug!("Setting IPOL pin {}: {}", pin.number(), inverted);
        self.update_bit(
            PairedRegister::Ipol.offset(pin.port()),
            pin.bit_index(),
            inverted,
        )
    }

    // --- Digital I/O ---

    /// Drives one pin. Reads GPIO of the pin's port, changes the bit and
    /// writes the whole port back.
    pub fn write_pin(&mut self, pin: Pin, level: Level) -> Result<()> {
        self.update_bit(
            PairedRegister::Gpio.offset(pin.port()),
            pin.bit_index(),
            level.is_high(),
        )
    }

    /// Reads the level of one pin (after IPOL inversion).
    pub fn read_pin(&mut self, pin: Pin) -> Result<Level> {
        let gpio = self.read_register(PairedRegister::Gpio.offset(pin.port()))?;
        Ok(Level::from(gpio & pin.mask() == pin.mask()))
    }

    /// Writes all eight pins of a port.
    pub fn write_port(&mut self, port: Port, value: u8) -> Result<()> {
        self.write_register(PairedRegister::Gpio.offset(port), value)
    }

    /// Reads all eight pins of a port.
    pub fn read_port(&mut self, port: Port) -> Result<u8> {
        self.read_register(PairedRegister::Gpio.offset(port))
    }

    /// Writes all 16 pins in one transaction. Low byte is port A.
    pub fn write_gpio(&mut self, value: u16) -> Result<()> {
        self.write_pair(PairedRegister::Gpio, value)
    }

    /// Reads all 16 pins in one transaction. Low byte is port A.
    pub fn read_gpio(&mut self) -> Result<u16> {
        self.read_pair(PairedRegister::Gpio)
    }

    /// Reads the output latch of a port, i.e. the last values written rather
    /// than the pin levels.
    pub fn read_output_latch(&mut self, port: Port) -> Result<u8> {
        self.read_register(PairedRegister::Olat.offset(port))
    }
}
