//! Device discovery and opening for USB-IO boards.

use crate::consts::SETTLE_DELAY;
use crate::error::{Error, Result};
use crate::transport::{PortTransport, Protocol};
use hidapi::{HidApi, HidDevice};
use log::{debug, trace};
use std::ffi::CString;
use std::time::Duration;

/// Information about a discovered USB-IO HID device.
/// Can be used with [`UsbIo::open`] to connect to a specific device.
#[derive(Debug, Clone)]
pub struct UsbIoDiscoveryInfo {
    pub vid: u16,
    pub pid: u16,
    /// The unique, platform-specific path to the HID device. Use this for reliable opening.
    pub path: CString,
    pub serial_number: Option<String>,
    pub product_string: Option<String>,
    pub interface_number: i32,
}

/// Find devices matching a VID/PID pair, in enumeration order.
///
/// The position of a device in the returned list is its ordinal index
/// (the `-n` option of the command-line tool).
pub fn find_devices(hid_api: &HidApi, vid: u16, pid: u16) -> Result<Vec<UsbIoDiscoveryInfo>> {
    let devices: Vec<_> = hid_api
        .device_list()
        .filter(|info| info.vendor_id() == vid && info.product_id() == pid)
        .map(|info| {
            debug!(
                "Found matching device: VID={:04X}, PID={:04X}, Path={:?}, Interface={}",
                info.vendor_id(),
                info.product_id(),
                info.path(),
                info.interface_number()
            );
            UsbIoDiscoveryInfo {
                vid: info.vendor_id(),
                pid: info.product_id(),
                path: info.path().to_owned(),
                serial_number: info.serial_number().map(String::from),
                product_string: info.product_string().map(String::from),
                interface_number: info.interface_number(),
            }
        })
        .collect();
    Ok(devices)
}

/// Picks the `index`-th match out of a discovery list.
pub fn select_device(
    devices: &[UsbIoDiscoveryInfo],
    vid: u16,
    pid: u16,
    index: usize,
) -> Result<&UsbIoDiscoveryInfo> {
    if devices.is_empty() {
        return Err(Error::DeviceNotFound { vid, pid });
    }
    devices.get(index).ok_or_else(|| Error::DeviceNotFoundByIndex {
        index,
        message: format!("Index out of range (found {} devices)", devices.len()),
    })
}

/// Holds basic information about an opened device.
#[derive(Debug, Clone)]
pub struct UsbIoInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial_number: Option<String>,
    pub product_string: Option<String>,
    pub manufacturer_string: Option<String>,
}

/// A handle to an opened USB-IO HID device.
///
/// The device is closed when the handle is dropped.
/// **Note:** This handle is not thread-safe (`!Send`, `!Sync`).
#[derive(Debug)]
pub struct UsbIo {
    device: HidDevice,
    info: UsbIoInfo,
}

impl UsbIo {
    /// Opens a device using its discovery info.
    pub fn open(hid_api: &HidApi, info: &UsbIoDiscoveryInfo) -> Result<Self> {
        let device = hid_api.open_path(&info.path)?;
        debug!(
            "Opened USB-IO device: VID={:04X}, PID={:04X}, Path={:?}",
            info.vid, info.pid, info.path
        );

        let manufacturer_string = device.get_manufacturer_string()?.map(|s| s.to_string());
        let product_string = device.get_product_string()?.map(|s| s.to_string());
        let serial_number = device.get_serial_number_string()?.map(|s| s.to_string());
        let info = UsbIoInfo {
            vendor_id: info.vid,
            product_id: info.pid,
            serial_number,
            product_string,
            manufacturer_string,
        };
        trace!("Device Info: {:?}", info);

        Ok(Self { device, info })
    }

    /// Opens the `index`-th device matching `vid`/`pid`.
    pub fn open_nth(hid_api: &HidApi, vid: u16, pid: u16, index: usize) -> Result<Self> {
        let devices = find_devices(hid_api, vid, pid)?;
        let info = select_device(&devices, vid, pid, index)?;
        Self::open(hid_api, info)
    }

    /// Gets basic information about the opened device.
    pub fn get_device_info(&self) -> &UsbIoInfo {
        &self.info
    }

    /// Borrows the device as a port transport speaking `protocol`,
    /// with the standard settle delay.
    pub fn port(&self, protocol: Protocol) -> Box<dyn PortTransport + '_> {
        self.port_with_settle_delay(protocol, SETTLE_DELAY)
    }

    pub fn port_with_settle_delay(
        &self,
        protocol: Protocol,
        settle: Duration,
    ) -> Box<dyn PortTransport + '_> {
        debug!("Using {} reports, settle delay {:?}", protocol, settle);
        protocol.transport(&self.device, settle)
    }
}

impl Drop for UsbIo {
    fn drop(&mut self) {
        debug!(
            "Closing USB-IO device: VID={:04X}, PID={:04X}",
            self.info.vendor_id, self.info.product_id
        );
    }
}
