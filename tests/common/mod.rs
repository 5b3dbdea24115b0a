//! In-memory MCP23017 register file used as an I2C bus in tests.
//!
//! Models IOCON.BANK = 0 with SEQOP set: the address pointer toggles between
//! the A and B register of a pair on every byte.

#![allow(dead_code)]

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

pub const IODIRA: u8 = 0x00;
pub const GPINTENA: u8 = 0x04;
pub const INTFA: u8 = 0x0E;
pub const INTCAPA: u8 = 0x10;
pub const GPIOA: u8 = 0x12;
pub const OLATA: u8 = 0x14;

/// Bus access as seen by the chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Write { register: u8, data: Vec<u8> },
    Read { register: u8, len: usize },
}

#[derive(Debug)]
pub struct RegisterFile {
    pub address: u8,
    pub regs: [u8; 0x16],
    /// Levels driven onto input pins from outside, per port.
    pub external: [u8; 2],
    pub log: Vec<Access>,
    /// Writes to this register are not acknowledged.
    pub fail_writes_to: Option<u8>,
    pointer: u8,
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

impl RegisterFile {
    /// Power-on state: all pins inputs, everything else zero.
    pub fn new(address: u8) -> Self {
        let mut regs = [0u8; 0x16];
        regs[IODIRA as usize] = 0xFF;
        regs[IODIRA as usize + 1] = 0xFF;
        RegisterFile {
            address,
            regs,
            external: [0; 2],
            log: Vec::new(),
            fail_writes_to: None,
            pointer: 0,
        }
    }

    /// Latches an interrupt: sets INTF and INTCAP of `port` (0 = A, 1 = B).
    pub fn raise_interrupt(&mut self, port: usize, flags: u8, capture: u8) {
        self.regs[INTFA as usize + port] = flags;
        self.regs[INTCAPA as usize + port] = capture;
    }

    pub fn writes(&self) -> Vec<&Access> {
        self.log
            .iter()
            .filter(|a| matches!(a, Access::Write { .. }))
            .collect()
    }

    fn slot(register: u8) -> usize {
        // 0x0B mirrors IOCON
        if register == 0x0B {
            0x0A
        } else {
            register as usize
        }
    }

    fn advance(&mut self) {
        self.pointer ^= 1;
    }

    fn store(&mut self, register: u8, value: u8) {
        let port = usize::from(register & 1);
        match register {
            // GPIO writes go to the output latch
            0x12 | 0x13 => self.regs[OLATA as usize + port] = value,
            // INTF and INTCAP are read only
            0x0E..=0x11 => {}
            r if (r as usize) < self.regs.len() => self.regs[Self::slot(r)] = value,
            _ => {}
        }
    }

    fn load(&mut self, register: u8) -> u8 {
        let port = usize::from(register & 1);
        match register {
            0x12 | 0x13 => {
                let iodir = self.regs[IODIRA as usize + port];
                let ipol = self.regs[0x02 + port];
                let olat = self.regs[OLATA as usize + port];
                (olat & !iodir) | ((self.external[port] ^ ipol) & iodir)
            }
            0x10 | 0x11 => {
                // reading INTCAP clears the interrupt of that port
                self.regs[INTFA as usize + port] = 0;
                self.regs[register as usize]
            }
            r if (r as usize) < self.regs.len() => self.regs[Self::slot(r)],
            _ => 0,
        }
    }
}

impl ErrorType for RegisterFile {
    type Error = ErrorKind;
}

impl I2c for RegisterFile {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&register, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = register;
                    if data.is_empty() {
                        continue;
                    }
                    if self.fail_writes_to == Some(register) {
                        return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                    }
                    self.log.push(Access::Write {
                        register,
                        data: data.to_vec(),
                    });
                    for &byte in data {
                        self.store(self.pointer, byte);
                        self.advance();
                    }
                }
                Operation::Read(buffer) => {
                    self.log.push(Access::Read {
                        register: self.pointer,
                        len: buffer.len(),
                    });
                    for byte in buffer.iter_mut() {
                        *byte = self.load(self.pointer);
                        self.advance();
                    }
                }
            }
        }
        Ok(())
    }
}
