use hidapi::HidApi;
use mcp23017_hid::{DeviceAddress, Level, Mcp23017, Pin, PinMode, Result, Xr2280xBridge};
use std::{thread, time::Duration};

// GPB0
const BLINK_PIN_NUM: u8 = 8;

fn main() -> Result<()> {
    env_logger::init();
    let hid_api = HidApi::new().expect("Failed to create HID API");
    println!("Opening first XR2280x I2C bridge...");
    let mut bridge = match Xr2280xBridge::open_first(&hid_api) {
        Ok(bridge) => bridge,
        Err(e) => {
            eprintln!("Error opening bridge: {}", e);
            eprintln!("Ensure device is connected and permissions are set (e.g., udev rules on Linux).");
            return Ok(());
        }
    };
    if let Err(e) = bridge.set_speed_khz(100) {
        eprintln!("Could not set bus speed: {}", e);
    }

    let mut expander = Mcp23017::new(&mut bridge, DeviceAddress::default());
    expander.initialize()?;

    let blink_pin = Pin::new(BLINK_PIN_NUM)?;
    println!("Configuring pin {} for blinking...", blink_pin.number());
    expander.configure_pin(blink_pin, PinMode::Output, false)?;

    println!("Blinking pin {} (Press Ctrl+C to stop)", blink_pin.number());
    loop {
        expander.write_pin(blink_pin, Level::High)?;
        thread::sleep(Duration::from_millis(250));
        expander.write_pin(blink_pin, Level::Low)?;
        thread::sleep(Duration::from_millis(250));
    }
}
