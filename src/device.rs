//! Device string parsing and backend dispatch
//!
//! A device string names a backend and optional parameters, e.g. `usb`,
//! `usb:board=icepick`, `usb:vid=0x1d50,pid=0x6146,index=1` or
//! `dummy:size=1M,busy=3`. Backends are included with cargo features.

use no2flash_core::bootloader::{Bootloader, ControlTransport};

/// Boxed bootloader as handed to the commands
pub type DynBootloader = Bootloader<Box<dyn ControlTransport>>;

/// Information about a backend
pub struct BackendInfo {
    /// Name used in device strings
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
}

/// Get information about all available backends (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_backends() -> Vec<BackendInfo> {
    let mut backends = Vec::new();

    #[cfg(feature = "usb")]
    backends.push(BackendInfo {
        name: "usb",
        description: "no2bootloader over USB (board=<name>,vid=<id>,pid=<id>,index=<n>,timeout=<ms>)",
    });

    #[cfg(feature = "dummy")]
    backends.push(BackendInfo {
        name: "dummy",
        description: "In-memory bootloader emulator for testing (size=<bytes>,busy=<polls>)",
    });

    backends
}

/// Generate a short list of backend names for CLI help
pub fn backend_names_short() -> String {
    let backends = available_backends();
    let names: Vec<&str> = backends.iter().map(|b| b.name).collect();
    names.join(", ")
}

/// Parsed device string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceParams {
    /// Backend name
    pub name: String,
    /// Parameters in the order given
    pub params: Vec<(String, String)>,
}

impl DeviceParams {
    /// Borrow the parameters as the `(&str, &str)` pairs the backends take
    pub fn options(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Parse a device string like "usb:board=icepick,index=1"
pub fn parse_device_params(s: &str) -> Result<DeviceParams, Box<dyn std::error::Error>> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut params = Vec::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            if let Some((key, value)) = opt.split_once('=') {
                params.push((key.to_string(), value.to_string()));
            } else {
                return Err(
                    format!("Invalid parameter format: '{}' (expected key=value)", opt).into(),
                );
            }
        }
    }

    Ok(DeviceParams {
        name: name.to_string(),
        params,
    })
}

/// Open the bootloader named by a device string
///
/// The returned handle has already passed the protocol version check.
pub fn open_bootloader(device: &str) -> Result<DynBootloader, Box<dyn std::error::Error>> {
    let parsed = parse_device_params(device)?;
    let options = parsed.options();

    match parsed.name.as_str() {
        #[cfg(feature = "usb")]
        "usb" => open_usb(&options),

        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&options),

        _ => Err(format!(
            "Unknown device backend: '{}' (available: {})",
            parsed.name,
            backend_names_short()
        )
        .into()),
    }
}

#[cfg(feature = "usb")]
fn open_usb(options: &[(&str, &str)]) -> Result<DynBootloader, Box<dyn std::error::Error>> {
    let config = no2flash_usb::parse_options(options)?;

    log::info!(
        "Looking for no2bootloader {:04x}:{:04x}...",
        config.vendor_id,
        config.product_id
    );

    let transport = no2flash_usb::UsbTransport::open(&config).map_err(|e| {
        format!(
            "Failed to open bootloader: {}\nMake sure the board is in bootloader mode and you have permissions.",
            e
        )
    })?;

    let transport: Box<dyn ControlTransport> = Box::new(transport);
    Ok(Bootloader::new(transport)?)
}

#[cfg(feature = "dummy")]
fn open_dummy(options: &[(&str, &str)]) -> Result<DynBootloader, Box<dyn std::error::Error>> {
    use no2flash_core::flash::SECTOR_SIZE;
    use no2flash_dummy::{DummyBootloader, DummyConfig};

    let mut config = DummyConfig::default();
    for (key, value) in options {
        match *key {
            "size" => {
                config.size = parse_size(value)
                    .filter(|&s| s > 0 && s % SECTOR_SIZE == 0)
                    .ok_or_else(|| {
                        format!(
                            "Invalid dummy size: '{}' (must be a non-zero multiple of {} bytes)",
                            value, SECTOR_SIZE
                        )
                    })?;
            }
            "busy" => {
                config.busy_polls = value
                    .parse()
                    .map_err(|_| format!("Invalid busy poll count: '{}'", value))?;
            }
            _ => return Err(format!("Unknown dummy parameter: '{}'", key).into()),
        }
    }

    log::info!("Using dummy bootloader with {} bytes of flash", config.size);

    let transport: Box<dyn ControlTransport> = Box::new(DummyBootloader::new(config));
    Ok(Bootloader::new(transport)?)
}

/// Parse a size with an optional K or M suffix
#[cfg_attr(not(feature = "dummy"), allow(dead_code))]
fn parse_size(s: &str) -> Option<usize> {
    let (digits, multiplier) = match s.as_bytes().last()? {
        b'K' | b'k' => (&s[..s.len() - 1], 1024),
        b'M' | b'm' => (&s[..s.len() - 1], 1024 * 1024),
        _ => (s, 1),
    };
    digits.parse::<usize>().ok()?.checked_mul(multiplier)
}
