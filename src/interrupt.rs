//! Interrupt-on-change configuration and flag/capture readout.
//!
//! The driver only configures the chip. Wiring INTA/INTB to the host and
//! deciding when to call [`Mcp23017::interrupt_flags`] or
//! [`Mcp23017::clear_interrupts`] is up to the caller.

use crate::bits;
use crate::consts;
use crate::device::Mcp23017;
use crate::error::{Result, WriteLog};
use crate::gpio::Pin;
use crate::registers::{PairedRegister, Port, Register};
use embedded_hal::i2c::I2c;
use log::{debug, trace};

/// How INTA and INTB relate to the two ports (IOCON.MIRROR).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptMirror {
    /// INTA reports port A, INTB reports port B.
    Separated,
    /// Both INT pins are asserted for an interrupt on either port.
    Or,
}

/// Which pin changes raise an interrupt once enabled on a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// Any change against the previous pin value.
    Change,
    /// Pin reads 0, compared against DEFVAL = 0xFF.
    Falling,
    /// Pin reads 1, compared against DEFVAL = 0x00.
    Rising,
}

/// Interrupt configuration of one port as decoded from the chip registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptState {
    Disabled,
    Enabled(TriggerMode),
    /// GPINTEN, INTCON and DEFVAL hold a combination this driver never writes.
    Mixed {
        gpinten: u8,
        intcon: u8,
        defval: u8,
    },
}

/// INTF or INTCAP contents for both ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterruptSnapshot {
    pub port_a: u8,
    pub port_b: u8,
}

impl InterruptSnapshot {
    fn from_pair(value: u16) -> Self {
        let [port_a, port_b] = value.to_le_bytes();
        InterruptSnapshot { port_a, port_b }
    }

    /// Both ports as one value, port A in the low byte.
    pub fn as_u16(&self) -> u16 {
        u16::from_le_bytes([self.port_a, self.port_b])
    }

    pub fn port(&self, port: Port) -> u8 {
        match port {
            Port::A => self.port_a,
            Port::B => self.port_b,
        }
    }

    /// Whether `pin`'s bit is set.
    pub fn is_set(&self, pin: Pin) -> bool {
        bits::get_bit(self.port(pin.port()), pin.bit_index())
    }

    /// The pins whose bit is set, in ascending order.
    pub fn pins(&self) -> impl Iterator<Item = Pin> + '_ {
        Pin::all().filter(move |pin| self.is_set(*pin))
    }
}

impl From<InterruptSnapshot> for (u8, u8) {
    fn from(snapshot: InterruptSnapshot) -> Self {
        (snapshot.port_a, snapshot.port_b)
    }
}

impl<I2C: I2c> Mcp23017<I2C> {
    // --- GPIO Interrupt Handling ---

    /// Sets IOCON.MIRROR on the chip, preserving the other IOCON bits.
    ///
    /// The handle's [`Config`](crate::Config) is not changed; a later
    /// [`initialize`](Mcp23017::initialize) writes the configured mode again.
    pub fn set_interrupt_mirror(&mut self, mirror: InterruptMirror) -> Result<()> {
        debug!("Setting interrupt mirror: {:?}", mirror);
        self.update_bit(
            Register::IOCON,
            consts::iocon::MIRROR,
            mirror == InterruptMirror::Or,
        )
    }

    /// Enables interrupt-on-change for all eight pins of `port`.
    ///
    /// The comparison registers are written before GPINTEN so the port never
    /// runs with a stale comparison rule. Registers of the other port are
    /// not touched.
    pub fn enable_interrupt(&mut self, port: Port, trigger: TriggerMode) -> Result<()> {
        debug!("Enabling interrupt on port {:?}: {:?}", port, trigger);
        let intcon = PairedRegister::Intcon.offset(port);
        let defval = PairedRegister::Defval.offset(port);
        let gpinten = PairedRegister::Gpinten.offset(port);
        let writes = match trigger {
            TriggerMode::Change => vec![(intcon, 0x00), (gpinten, 0xFF)],
            TriggerMode::Falling => vec![(defval, 0xFF), (intcon, 0xFF), (gpinten, 0xFF)],
            TriggerMode::Rising => vec![(defval, 0x00), (intcon, 0xFF), (gpinten, 0xFF)],
        };
        let mut log = WriteLog::default();
        for (register, value) in writes {
            log.record(register, self.write_register(register, value));
        }
        log.finish()
    }

    /// Disables interrupt-on-change for all pins of `port`.
    pub fn disable_interrupt(&mut self, port: Port) -> Result<()> {
        debug!("Disabling interrupt on port {:?}", port);
        self.write_register(PairedRegister::Gpinten.offset(port), 0x00)
    }

    /// Reads INTFA/INTFB: which pins caused the pending interrupt. Does not clear it.
    pub fn interrupt_flags(&mut self) -> Result<InterruptSnapshot> {
        let flags = InterruptSnapshot::from_pair(self.read_pair(PairedRegister::Intf)?);
        trace!("Interrupt flags: {:?}", flags);
        Ok(flags)
    }

    /// Reads INTCAPA/INTCAPB: the port values captured when the interrupt
    /// fired. The chip clears the interrupt condition on this read.
    pub fn clear_interrupts(&mut self) -> Result<InterruptSnapshot> {
        let captured = InterruptSnapshot::from_pair(self.read_pair(PairedRegister::Intcap)?);
        trace!("Interrupt capture: {:?}", captured);
        Ok(captured)
    }

    /// Reads back the interrupt configuration of `port`.
    pub fn interrupt_state(&mut self, port: Port) -> Result<InterruptState> {
        let gpinten = self.read_register(PairedRegister::Gpinten.offset(port))?;
        if gpinten == 0x00 {
            return Ok(InterruptState::Disabled);
        }
        let intcon = self.read_register(PairedRegister::Intcon.offset(port))?;
        let defval = self.read_register(PairedRegister::Defval.offset(port))?;
        Ok(match (gpinten, intcon, defval) {
            (0xFF, 0x00, _) => InterruptState::Enabled(TriggerMode::Change),
            (0xFF, 0xFF, 0xFF) => InterruptState::Enabled(TriggerMode::Falling),
            (0xFF, 0xFF, 0x00) => InterruptState::Enabled(TriggerMode::Rising),
            _ => InterruptState::Mixed {
                gpinten,
                intcon,
                defval,
            },
        })
    }
}
