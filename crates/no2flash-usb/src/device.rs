//! nusb device implementation
//!
//! This module provides [`UsbTransport`], which owns an open `nusb::Device`
//! and performs the bootloader's vendor control transfers on it.

use std::time::Duration;

use no2flash_core::bootloader::{Bootloader, ControlTransport};
use no2flash_core::error::{Error as CoreError, Result as CoreResult};
use nusb::transfer::{ControlIn, ControlOut, ControlType, Recipient};
use nusb::MaybeFuture;

use crate::config::{Board, UsbConfig};
use crate::error::{Result, UsbError};

/// Configuration value used when the device does not describe any
const DEFAULT_CONFIGURATION: u8 = 1;

/// Information about an attached bootloader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbDeviceInfo {
    /// Bus identifier
    pub bus: String,
    /// Device address on the bus
    pub address: u8,
    /// USB vendor ID
    pub vendor_id: u16,
    /// USB product ID
    pub product_id: u16,
    /// Matching board preset
    pub board: Board,
    /// Serial number string, if the device reports one
    pub serial: Option<String>,
}

/// USB connection to a no2bootloader
///
/// Holds the device exclusively until dropped.
pub struct UsbTransport {
    device: nusb::Device,
    timeout: Duration,
}

impl UsbTransport {
    /// Open the device selected by `config` and activate its configuration
    pub fn open(config: &UsbConfig) -> Result<Self> {
        let devices: Vec<_> = nusb::list_devices()
            .wait()
            .map_err(|e| UsbError::OpenFailed(e.to_string()))?
            .filter(|d| d.vendor_id() == config.vendor_id && d.product_id() == config.product_id)
            .collect();

        let device_info = devices
            .get(config.device_index)
            .ok_or(UsbError::DeviceNotFound {
                vid: config.vendor_id,
                pid: config.product_id,
            })?;

        log::info!(
            "Opening no2bootloader {:04x}:{:04x} at bus {} address {}",
            device_info.vendor_id(),
            device_info.product_id(),
            device_info.bus_id(),
            device_info.device_address()
        );

        let device = device_info
            .open()
            .wait()
            .map_err(|e| UsbError::OpenFailed(e.to_string()))?;

        let configuration = device
            .configurations()
            .next()
            .map(|c| c.configuration_value())
            .unwrap_or(DEFAULT_CONFIGURATION);

        log::debug!("Activating configuration {}", configuration);
        device
            .set_configuration(configuration)
            .wait()
            .map_err(|e| UsbError::ConfigurationFailed {
                config: configuration,
                message: e.to_string(),
            })?;

        Ok(Self {
            device,
            timeout: config.timeout,
        })
    }
}

impl ControlTransport for UsbTransport {
    fn control_in(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> CoreResult<Vec<u8>> {
        self.device
            .control_in(
                ControlIn {
                    control_type: ControlType::Vendor,
                    recipient: Recipient::Interface,
                    request,
                    value,
                    index,
                    length,
                },
                self.timeout,
            )
            .wait()
            .map_err(|e| CoreError::Transport(format!("control IN request {}: {}", request, e)))
    }

    fn control_out(&mut self, request: u8, value: u16, index: u16, data: &[u8]) -> CoreResult<()> {
        self.device
            .control_out(
                ControlOut {
                    control_type: ControlType::Vendor,
                    recipient: Recipient::Interface,
                    request,
                    value,
                    index,
                    data,
                },
                self.timeout,
            )
            .wait()
            .map_err(|e| CoreError::Transport(format!("control OUT request {}: {}", request, e)))
    }
}

/// Open the bootloader and validate its protocol version
///
/// Fails with [`UsbError::DeviceNotFound`] if nothing matches and with
/// [`no2flash_core::Error::UnsupportedVersion`] (wrapped in
/// [`UsbError::Core`]) if the device speaks another protocol version.
pub fn connect(config: &UsbConfig) -> Result<Bootloader<UsbTransport>> {
    let transport = UsbTransport::open(config)?;
    Ok(Bootloader::new(transport)?)
}

/// List all attached devices that match a known board
pub fn list_devices() -> Result<Vec<UsbDeviceInfo>> {
    let devices = nusb::list_devices()
        .wait()
        .map_err(|e| UsbError::OpenFailed(e.to_string()))?
        .filter_map(|d| {
            let board = Board::from_ids(d.vendor_id(), d.product_id())?;
            Some(UsbDeviceInfo {
                bus: d.bus_id().to_string(),
                address: d.device_address(),
                vendor_id: d.vendor_id(),
                product_id: d.product_id(),
                board,
                serial: d.serial_number().map(str::to_string),
            })
        })
        .collect();

    Ok(devices)
}
