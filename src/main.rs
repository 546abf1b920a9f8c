use clap::Parser;
use hidapi::HidApi;
use log::debug;
use std::process::ExitCode;
use std::time::Duration;
use usbio::{
    find_devices, PortController, PortPin, PortRequest, Result, UsbIo, UsbIoDiscoveryInfo,
};

use cli::Cli;

mod cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.debug)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("usbio: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let hid_api = HidApi::new()?;
    if cli.list {
        return list_devices(&hid_api, cli);
    }

    let request = PortRequest {
        value: cli.value,
        pin: PortPin::from_selector(cli.pin)?,
        invert: cli.invert,
    };
    debug!("Request: {:?}, output format: {}", request, cli.format);
    let device = UsbIo::open_nth(&hid_api, cli.vid, cli.pid, cli.nth)?;
    let controller = PortController::new(
        device.port_with_settle_delay(cli.protocol, Duration::from_millis(cli.settle_ms)),
    );
    let state = controller.execute(&request)?;
    println!("{}", request.render(state, &cli.format));
    Ok(())
}

fn list_devices(hid_api: &HidApi, cli: &Cli) -> Result<()> {
    let devices = find_devices(hid_api, cli.vid, cli.pid)?;
    for line in device_listing(&devices, cli.vid, cli.pid) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per discovered device, prefixed with the index `-n` takes.
fn device_listing(devices: &[UsbIoDiscoveryInfo], vid: u16, pid: u16) -> Vec<String> {
    if devices.is_empty() {
        return vec![format!(
            "No devices found (VID=0x{:04X}, PID=0x{:04X}).",
            vid, pid
        )];
    }
    devices
        .iter()
        .enumerate()
        .map(|(i, info)| {
            format!(
                "{}: VID=0x{:04X}, PID=0x{:04X}, Interface={}, Path={:?}, Serial='{}', Product='{}'",
                i,
                info.vid,
                info.pid,
                info.interface_number,
                info.path,
                info.serial_number.as_deref().unwrap_or("N/A"),
                info.product_string.as_deref().unwrap_or("N/A"),
            )
        })
        .collect()
}
