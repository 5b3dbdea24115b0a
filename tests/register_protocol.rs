//! Exact bus traffic for each operation, checked against the embedded-hal mock.

use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use mcp23017_hid::{
    Config, DeviceAddress, Error, InterruptMirror, InterruptState, Level, Mcp23017, Pin, PinMode,
    PairedRegister, Port, Register, TriggerMode,
};

const ADDR: u8 = 0x20;

fn expander(expectations: &[I2cTransaction]) -> Mcp23017<I2cMock> {
    let _ = env_logger::builder().is_test(true).try_init();
    Mcp23017::new(I2cMock::new(expectations), DeviceAddress::default())
}

fn done(expander: Mcp23017<I2cMock>) {
    let mut bus = expander.release();
    bus.done();
}

#[test]
fn initialize_defaults_to_byte_mode_without_pull_ups() {
    let mut dev = expander(&[
        I2cTransaction::write(ADDR, vec![0x0A, 0b0010_0000]),
        I2cTransaction::write(ADDR, vec![0x0C, 0x00, 0x00]),
    ]);
    dev.initialize().unwrap();
    done(dev);
}

#[test]
fn initialize_with_legacy_pull_ups_and_options() {
    let expectations = [
        I2cTransaction::write(0x23, vec![0x0A, 0b0110_0100]),
        I2cTransaction::write(0x23, vec![0x0C, 0xFF, 0xFF]),
    ];
    let config = Config::legacy()
        .with_interrupt_mirror(InterruptMirror::Or)
        .with_open_drain_interrupt(true);
    let address = DeviceAddress::new(0x23).unwrap();
    let mut dev = Mcp23017::with_config(I2cMock::new(&expectations), address, config);
    dev.initialize().unwrap();
    assert_eq!(dev.address(), address);
    done(dev);
}

#[test]
fn initialize_attempts_every_write() {
    let mut dev = expander(&[
        I2cTransaction::write(ADDR, vec![0x0A, 0b0010_0000]).with_error(ErrorKind::Other),
        I2cTransaction::write(ADDR, vec![0x0C, 0x00, 0x00]),
    ]);
    let err = dev.initialize().unwrap_err();
    assert_eq!(
        err,
        Error::Incomplete {
            written: vec![Register::GPPUA],
            failed: vec![(Register::IOCON, ErrorKind::Other)],
        }
    );
    done(dev);
}

#[test]
fn configure_port_overwrites_three_registers() {
    let mut dev = expander(&[
        I2cTransaction::write(ADDR, vec![0x01, 0xF0]),
        I2cTransaction::write(ADDR, vec![0x0D, 0x30]),
        I2cTransaction::write(ADDR, vec![0x03, 0x01]),
    ]);
    dev.configure_port(Port::B, 0xF0, 0x30, 0x01).unwrap();
    done(dev);
}

#[test]
fn configure_pin_reads_before_each_write() {
    // pin 10 = GPB2
    let mut dev = expander(&[
        I2cTransaction::write_read(ADDR, vec![0x01], vec![0x00]),
        I2cTransaction::write(ADDR, vec![0x01, 0x04]),
        I2cTransaction::write_read(ADDR, vec![0x0D], vec![0xF0]),
        I2cTransaction::write(ADDR, vec![0x0D, 0xF4]),
        I2cTransaction::write_read(ADDR, vec![0x03], vec![0xFF]),
        I2cTransaction::write(ADDR, vec![0x03, 0xFF]),
    ]);
    dev.configure_pin(Pin::new(10).unwrap(), PinMode::InputPullUp, true)
        .unwrap();
    done(dev);
}

#[test]
fn configure_pin_as_output_clears_direction_bit() {
    // pin 0 = GPA0
    let mut dev = expander(&[
        I2cTransaction::write_read(ADDR, vec![0x00], vec![0xFF]),
        I2cTransaction::write(ADDR, vec![0x00, 0xFE]),
        I2cTransaction::write_read(ADDR, vec![0x0C], vec![0xFF]),
        I2cTransaction::write(ADDR, vec![0x0C, 0xFE]),
        I2cTransaction::write_read(ADDR, vec![0x02], vec![0x00]),
        I2cTransaction::write(ADDR, vec![0x02, 0x00]),
    ]);
    dev.configure_pin(Pin::new(0).unwrap(), PinMode::Output, false)
        .unwrap();
    done(dev);
}

#[test]
fn configure_pin_skips_write_after_failed_read() {
    let mut dev = expander(&[
        I2cTransaction::write_read(ADDR, vec![0x00], vec![0xFF]),
        I2cTransaction::write(ADDR, vec![0x00, 0x7F]),
        I2cTransaction::write_read(ADDR, vec![0x0C], vec![0x00]).with_error(ErrorKind::Bus),
        I2cTransaction::write_read(ADDR, vec![0x02], vec![0x00]),
        I2cTransaction::write(ADDR, vec![0x02, 0x00]),
    ]);
    let err = dev
        .configure_pin(Pin::new(7).unwrap(), PinMode::Output, false)
        .unwrap_err();
    assert_eq!(
        err,
        Error::Incomplete {
            written: vec![Register::IODIRA, Register::IPOLA],
            failed: vec![(Register::GPPUA, ErrorKind::Bus)],
        }
    );
    done(dev);
}

#[test]
fn single_pin_setters() {
    let mut dev = expander(&[
        // set_pin_direction(GPB7, Output)
        I2cTransaction::write_read(ADDR, vec![0x01], vec![0xFF]),
        I2cTransaction::write(ADDR, vec![0x01, 0x7F]),
        // pin_direction(GPB7)
        I2cTransaction::write_read(ADDR, vec![0x01], vec![0x7F]),
        // set_pull_up(GPA1, true)
        I2cTransaction::write_read(ADDR, vec![0x0C], vec![0x00]),
        I2cTransaction::write(ADDR, vec![0x0C, 0x02]),
        // set_inverted(GPA1, false)
        I2cTransaction::write_read(ADDR, vec![0x02], vec![0x03]),
        I2cTransaction::write(ADDR, vec![0x02, 0x01]),
        // set_port_direction(A, 0x0F)
        I2cTransaction::write(ADDR, vec![0x00, 0x0F]),
    ]);
    let gpb7 = Pin::new(15).unwrap();
    let gpa1 = Pin::new(1).unwrap();
    dev.set_pin_direction(gpb7, mcp23017_hid::Direction::Output)
        .unwrap();
    assert_eq!(
        dev.pin_direction(gpb7).unwrap(),
        mcp23017_hid::Direction::Output
    );
    dev.set_pull_up(gpa1, true).unwrap();
    dev.set_inverted(gpa1, false).unwrap();
    dev.set_port_direction(Port::A, 0x0F).unwrap();
    done(dev);
}

#[test]
fn digital_io() {
    let mut dev = expander(&[
        // write_pin(GPA3, High)
        I2cTransaction::write_read(ADDR, vec![0x12], vec![0x01]),
        I2cTransaction::write(ADDR, vec![0x12, 0x09]),
        // read_pin(GPB7)
        I2cTransaction::write_read(ADDR, vec![0x13], vec![0x80]),
        // read_pin(GPB6)
        I2cTransaction::write_read(ADDR, vec![0x13], vec![0x80]),
        // write_port / read_port
        I2cTransaction::write(ADDR, vec![0x13, 0x5A]),
        I2cTransaction::write_read(ADDR, vec![0x12], vec![0xA5]),
        // read_output_latch(B)
        I2cTransaction::write_read(ADDR, vec![0x15], vec![0x5A]),
    ]);
    dev.write_pin(Pin::new(3).unwrap(), Level::High).unwrap();
    assert_eq!(dev.read_pin(Pin::new(15).unwrap()).unwrap(), Level::High);
    assert_eq!(dev.read_pin(Pin::new(14).unwrap()).unwrap(), Level::Low);
    dev.write_port(Port::B, 0x5A).unwrap();
    assert_eq!(dev.read_port(Port::A).unwrap(), 0xA5);
    assert_eq!(dev.read_output_latch(Port::B).unwrap(), 0x5A);
    done(dev);
}

#[test]
fn both_ports_use_one_two_byte_transaction() {
    let mut dev = expander(&[
        I2cTransaction::write(ADDR, vec![0x12, 0xEF, 0xBE]),
        I2cTransaction::write_read(ADDR, vec![0x12], vec![0xEF, 0xBE]),
    ]);
    dev.write_gpio(0xBEEF).unwrap();
    assert_eq!(dev.read_gpio().unwrap(), 0xBEEF);
    done(dev);
}

#[test]
fn enable_interrupt_rising_on_port_a() {
    let mut dev = expander(&[
        I2cTransaction::write(ADDR, vec![0x06, 0x00]),
        I2cTransaction::write(ADDR, vec![0x08, 0xFF]),
        I2cTransaction::write(ADDR, vec![0x04, 0xFF]),
    ]);
    dev.enable_interrupt(Port::A, TriggerMode::Rising).unwrap();
    done(dev);
}

#[test]
fn enable_interrupt_falling_on_port_b() {
    let mut dev = expander(&[
        I2cTransaction::write(ADDR, vec![0x07, 0xFF]),
        I2cTransaction::write(ADDR, vec![0x09, 0xFF]),
        I2cTransaction::write(ADDR, vec![0x05, 0xFF]),
    ]);
    dev.enable_interrupt(Port::B, TriggerMode::Falling).unwrap();
    done(dev);
}

#[test]
fn enable_interrupt_change_leaves_defval_alone() {
    let mut dev = expander(&[
        I2cTransaction::write(ADDR, vec![0x08, 0x00]),
        I2cTransaction::write(ADDR, vec![0x04, 0xFF]),
        I2cTransaction::write(ADDR, vec![0x05, 0x00]),
    ]);
    dev.enable_interrupt(Port::A, TriggerMode::Change).unwrap();
    dev.disable_interrupt(Port::B).unwrap();
    done(dev);
}

#[test]
fn interrupt_mirror_preserves_other_iocon_bits() {
    let mut dev = expander(&[
        I2cTransaction::write_read(ADDR, vec![0x0A], vec![0b0010_0010]),
        I2cTransaction::write(ADDR, vec![0x0A, 0b0110_0010]),
        I2cTransaction::write_read(ADDR, vec![0x0A], vec![0b0110_0110]),
        I2cTransaction::write(ADDR, vec![0x0A, 0b0010_0110]),
    ]);
    dev.set_interrupt_mirror(InterruptMirror::Or).unwrap();
    dev.set_interrupt_mirror(InterruptMirror::Separated).unwrap();
    done(dev);
}

#[test]
fn interrupt_mirror_leaves_config_alone() {
    let mut dev = expander(&[
        I2cTransaction::write_read(ADDR, vec![0x0A], vec![0b0010_0000]),
        I2cTransaction::write(ADDR, vec![0x0A, 0b0110_0000]),
        // initialize writes the configured mode, not the one set since
        I2cTransaction::write(ADDR, vec![0x0A, 0b0010_0000]),
        I2cTransaction::write(ADDR, vec![0x0C, 0x00, 0x00]),
    ]);
    dev.set_interrupt_mirror(InterruptMirror::Or).unwrap();
    assert_eq!(dev.config().interrupt_mirror, InterruptMirror::Separated);
    dev.initialize().unwrap();
    done(dev);
}

#[test]
fn interrupt_flags_and_capture_are_single_reads() {
    let mut dev = expander(&[
        I2cTransaction::write_read(ADDR, vec![0x0E], vec![0x01, 0x80]),
        I2cTransaction::write_read(ADDR, vec![0x10], vec![0xFE, 0x7F]),
    ]);
    let flags = dev.interrupt_flags().unwrap();
    assert_eq!((flags.port_a, flags.port_b), (0x01, 0x80));
    let captured = dev.clear_interrupts().unwrap();
    assert_eq!(<(u8, u8)>::from(captured), (0xFE, 0x7F));
    done(dev);
}

#[test]
fn interrupt_state_decoding() {
    let mut dev = expander(&[
        I2cTransaction::write_read(ADDR, vec![0x04], vec![0x00]),
        I2cTransaction::write_read(ADDR, vec![0x05], vec![0xFF]),
        I2cTransaction::write_read(ADDR, vec![0x09], vec![0xFF]),
        I2cTransaction::write_read(ADDR, vec![0x07], vec![0x00]),
        I2cTransaction::write_read(ADDR, vec![0x04], vec![0x0F]),
        I2cTransaction::write_read(ADDR, vec![0x08], vec![0x00]),
        I2cTransaction::write_read(ADDR, vec![0x06], vec![0x00]),
    ]);
    assert_eq!(
        dev.interrupt_state(Port::A).unwrap(),
        InterruptState::Disabled
    );
    assert_eq!(
        dev.interrupt_state(Port::B).unwrap(),
        InterruptState::Enabled(TriggerMode::Rising)
    );
    assert_eq!(
        dev.interrupt_state(Port::A).unwrap(),
        InterruptState::Mixed {
            gpinten: 0x0F,
            intcon: 0x00,
            defval: 0x00
        }
    );
    done(dev);
}

#[test]
fn bus_error_names_the_register() {
    let mut dev = expander(&[I2cTransaction::write_read(ADDR, vec![0x13], vec![0x00])
        .with_error(ErrorKind::ArbitrationLoss)]);
    let err = dev.read_port(Port::B).unwrap_err();
    assert_eq!(
        err,
        Error::Bus {
            register: Register::GPIOB,
            kind: ErrorKind::ArbitrationLoss
        }
    );
    assert_eq!(err.bus_kind(), Some(ErrorKind::ArbitrationLoss));
    done(dev);
}

#[test]
fn raw_register_access() {
    let mut dev = expander(&[
        // IOCON with DISSLW
        I2cTransaction::write(ADDR, vec![0x0A, 0b0011_0000]),
        // per-pin interrupt enable mask
        I2cTransaction::write(ADDR, vec![0x04, 0x81, 0x00]),
        I2cTransaction::write(ADDR, vec![0x15, 0x5A]),
        I2cTransaction::write_read(ADDR, vec![0x15], vec![0x5A]),
        I2cTransaction::write_read(ADDR, vec![0x06], vec![0x34, 0x12]),
    ]);
    dev.write_register(Register::IOCON, 0b0011_0000).unwrap();
    dev.write_pair(PairedRegister::Gpinten, 0x0081).unwrap();
    dev.write_register(Register::OLATB, 0x5A).unwrap();
    assert_eq!(dev.read_register(Register::OLATB).unwrap(), 0x5A);
    assert_eq!(dev.read_pair(PairedRegister::Defval).unwrap(), 0x1234);
    done(dev);
}

#[test]
fn raw_write_error_names_the_register() {
    let mut dev = expander(&[I2cTransaction::write(ADDR, vec![0x0C, 0xFF, 0x0F])
        .with_error(ErrorKind::Other)]);
    assert_eq!(
        dev.write_pair(PairedRegister::Gppu, 0x0FFF),
        Err(Error::Bus {
            register: Register::GPPUA,
            kind: ErrorKind::Other
        })
    );
    done(dev);
}
