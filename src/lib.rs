//! # mcp23017-hid
//!
//! A Rust crate for driving the Microchip MCP23017 16-bit I/O expander over
//! I²C, with an optional USB host transport through a MaxLinear/Exar XR2280x
//! HID bridge.
//!
//! The driver is generic over [`embedded_hal::i2c::I2c`], so it runs on any
//! bus implementing `embedded-hal` 1.0: a microcontroller peripheral, a
//! Linux `i2cdev`, or the bundled [`bridge`] transport.
//!
//! ## Features
//!
//! *   Typed register map (`Register`, `PairedRegister::offset`). IOCON cannot be offset by a port.
//! *   Initialization (`initialize`) with a `Config`: interrupt mirroring, open-drain or
//!     active-high INT pins, per-port pull-up masks.
//! *   Pin configuration:
//!     *   Whole port (`configure_port`, `set_port_direction`).
//!     *   Single pin (`configure_pin`, `set_pin_direction`, `set_pull_up`, `set_inverted`),
//!         read-modify-write so the other 7 pins are untouched.
//! *   Digital I/O: `write_pin`, `read_pin`, `write_port`, `read_port`,
//!     `write_gpio`/`read_gpio` (all 16 pins in one transaction), `read_output_latch`.
//! *   Interrupt-on-change per port (`enable_interrupt`, `disable_interrupt`,
//!     `set_interrupt_mirror`, `interrupt_state`), flag and capture readout
//!     (`interrupt_flags`, `clear_interrupts`).
//! *   Raw register access (`write_register`, `write_pair`, `read_register`, `read_pair`)
//!     for settings the typed operations do not cover.
//! *   `hid` feature: `Xr2280xBridge`, an `embedded-hal` I²C bus on an XR2280x USB HID interface.
//!
//! ## Conventions
//!
//! *   Pins 0-7 are GPA0-GPA7, pins 8-15 are GPB0-GPB7.
//! *   16-bit values carry port A in the low byte and port B in the high byte.
//! *   Direction masks use the chip encoding: bit set = input, bit clear = output.
//! *   IOCON.BANK stays 0 and IOCON.SEQOP is set, so two-byte transfers cover an A/B register pair.
//!
//! ## Error Handling
//!
//! Every operation returns [`Result`]. A bus failure is reported as
//! [`Error::Bus`] with the register that was being accessed. Operations that
//! write several registers attempt every write and report
//! [`Error::Incomplete`] if only some landed; nothing is rolled back, so
//! callers needing certainty should read the registers back.
//!
//! Operations that change a single bit read the register and write it back
//! in two bus transactions. This is not atomic: another bus master or another
//! handle writing the same register in between loses its update.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use embedded_hal::i2c::I2c;
//! use mcp23017_hid::{
//!     Config, DeviceAddress, Level, Mcp23017, Pin, PinMode, Port, Result, TriggerMode,
//! };
//!
//! fn run<I2C: I2c>(bus: I2C) -> Result<()> {
//!     // A2 and A1 low, A0 high: address 0x21
//!     let address = DeviceAddress::from_pins(false, false, true);
//!     let config = Config::default().with_pull_ups(0xFF, 0x00);
//!     let mut expander = Mcp23017::with_config(bus, address, config);
//!     expander.initialize()?;
//!
//!     // Port A: buttons to ground, inputs with pull-ups, falling-edge interrupt
//!     expander.configure_port(Port::A, 0xFF, 0xFF, 0x00)?;
//!     expander.enable_interrupt(Port::A, TriggerMode::Falling)?;
//!
//!     // GPB0 drives an LED
//!     let led = Pin::new(8)?;
//!     expander.configure_pin(led, PinMode::Output, false)?;
//!     expander.write_pin(led, Level::High)?;
//!
//!     // After the INTA line fires:
//!     let flags = expander.interrupt_flags()?;
//!     let captured = expander.clear_interrupts()?;
//!     for pin in flags.pins() {
//!         println!("pin {} -> {}", pin.number(), captured.is_set(pin));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## License
//!
//! This project is licensed under the WTFPL.

mod bits;
pub mod bridge;
mod consts;
mod device;
mod error;
pub mod gpio;
pub mod interrupt;
pub mod registers;

pub use device::{Config, DeviceAddress, Mcp23017};
pub use error::{Error, Result};
pub use gpio::{Direction, Level, Pin, PinMode};
pub use interrupt::{InterruptMirror, InterruptSnapshot, InterruptState, TriggerMode};
pub use registers::{PairedRegister, Port, Register};
// Re-export only essential public constants
pub use consts::{EXAR_VID, XR2280X_I2C_PID};

#[cfg(feature = "hid")]
pub use bridge::Xr2280xBridge;
