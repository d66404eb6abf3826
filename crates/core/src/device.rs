//! Device model: supported mice and discovery.

use crate::error::{Error, Result};
use crate::report::ReportFormat;
use crate::{pids, ASUS_VID, KEYBOARD_INTERFACE};
use tracing::{debug, info};

/// Supported ROG mouse models.
///
/// `*Rf` models are wireless mice connected through their RF receiver,
/// `*Usb` models are the same mice connected with a USB cable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseModel {
    Buzzard,
    Gladius2,
    Gladius2Origin,
    Gladius2OriginPink,
    KerisWirelessRf,
    KerisWirelessUsb,
    Pugio,
    StrixCarry,
    StrixChakramRf,
    StrixChakramUsb,
    StrixEvolve,
    StrixImpact,
    StrixImpact2WirelessRf,
    StrixImpact2WirelessUsb,
    StrixSpathaRf,
    StrixSpathaUsb,
}

impl MouseModel {
    /// All supported models.
    pub const ALL: &'static [MouseModel] = &[
        MouseModel::Buzzard,
        MouseModel::Gladius2,
        MouseModel::Gladius2Origin,
        MouseModel::Gladius2OriginPink,
        MouseModel::KerisWirelessRf,
        MouseModel::KerisWirelessUsb,
        MouseModel::Pugio,
        MouseModel::StrixCarry,
        MouseModel::StrixChakramRf,
        MouseModel::StrixChakramUsb,
        MouseModel::StrixEvolve,
        MouseModel::StrixImpact,
        MouseModel::StrixImpact2WirelessRf,
        MouseModel::StrixImpact2WirelessUsb,
        MouseModel::StrixSpathaRf,
        MouseModel::StrixSpathaUsb,
    ];

    /// Look up model from USB product ID.
    pub fn from_pid(pid: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.pid() == pid)
    }

    /// USB Product ID.
    pub fn pid(&self) -> u16 {
        match self {
            Self::Buzzard => pids::BUZZARD,
            Self::Gladius2 => pids::GLADIUS2,
            Self::Gladius2Origin => pids::GLADIUS2_ORIGIN,
            Self::Gladius2OriginPink => pids::GLADIUS2_ORIGIN_PINK,
            Self::KerisWirelessRf => pids::KERIS_WIRELESS_RF,
            Self::KerisWirelessUsb => pids::KERIS_WIRELESS_USB,
            Self::Pugio => pids::PUGIO,
            Self::StrixCarry => pids::STRIX_CARRY,
            Self::StrixChakramRf => pids::STRIX_CHAKRAM_RF,
            Self::StrixChakramUsb => pids::STRIX_CHAKRAM_USB,
            Self::StrixEvolve => pids::STRIX_EVOLVE,
            Self::StrixImpact => pids::STRIX_IMPACT,
            Self::StrixImpact2WirelessRf => pids::STRIX_IMPACT2_WIRELESS_RF,
            Self::StrixImpact2WirelessUsb => pids::STRIX_IMPACT2_WIRELESS_USB,
            Self::StrixSpathaRf => pids::STRIX_SPATHA_RF,
            Self::StrixSpathaUsb => pids::STRIX_SPATHA_USB,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Buzzard => "ROG Buzzard",
            Self::Gladius2 => "ROG Gladius II",
            Self::Gladius2Origin => "ROG Gladius II Origin",
            Self::Gladius2OriginPink => "ROG Gladius II Origin PNK LTD",
            Self::KerisWirelessRf => "ROG Keris Wireless (RF)",
            Self::KerisWirelessUsb => "ROG Keris Wireless (USB)",
            Self::Pugio => "ROG Pugio",
            Self::StrixCarry => "ROG Strix Carry",
            Self::StrixChakramRf => "ROG Strix Chakram (RF)",
            Self::StrixChakramUsb => "ROG Strix Chakram (USB)",
            Self::StrixEvolve => "ROG Strix Evolve",
            Self::StrixImpact => "ROG Strix Impact",
            Self::StrixImpact2WirelessRf => "ROG Strix Impact II Wireless (RF)",
            Self::StrixImpact2WirelessUsb => "ROG Strix Impact II Wireless (USB)",
            Self::StrixSpathaRf => "ROG Strix Spatha (RF)",
            Self::StrixSpathaUsb => "ROG Strix Spatha (USB)",
        }
    }

    /// Layout of the special-button reports this model sends.
    pub fn report_format(&self) -> ReportFormat {
        match self {
            Self::KerisWirelessRf
            | Self::KerisWirelessUsb
            | Self::StrixChakramRf
            | Self::StrixChakramUsb => ReportFormat::Packed,
            _ => ReportFormat::Sparse,
        }
    }

    /// Whether this product ID belongs to an RF receiver.
    pub fn is_wireless_receiver(&self) -> bool {
        matches!(
            self,
            Self::KerisWirelessRf
                | Self::StrixChakramRf
                | Self::StrixImpact2WirelessRf
                | Self::StrixSpathaRf
        )
    }
}

impl std::fmt::Display for MouseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Information about one HID interface of a discovered ROG mouse.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub model: MouseModel,
    pub vid: u16,
    pub pid: u16,
    pub path: String,
    pub interface_number: i32,
    pub serial: Option<String>,
}

impl DeviceInfo {
    /// Whether this interface carries special-button reports.
    pub fn is_key_interface(&self) -> bool {
        self.interface_number == KEYBOARD_INTERFACE
    }
}

/// Which interfaces of a mouse [`discover`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceFilter {
    /// Every HID interface of a supported mouse.
    All,
    /// Only the given USB interface number.
    Only(i32),
}

impl InterfaceFilter {
    /// Whether an interface passes the filter.
    pub fn accepts(&self, interface_number: i32) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == interface_number,
        }
    }
}

/// Supported model for a USB vendor/product pair.
pub fn identify(vid: u16, pid: u16) -> Option<MouseModel> {
    if vid != ASUS_VID {
        return None;
    }
    MouseModel::from_pid(pid)
}

/// Discover all HID interfaces of connected ROG mice.
///
/// A mouse exposes several interfaces; each is listed separately.
pub fn discover_devices() -> Result<Vec<DeviceInfo>> {
    discover(InterfaceFilter::All)
}

/// Enumerate connected ROG mice, keeping interfaces accepted by `filter`.
pub fn discover(filter: InterfaceFilter) -> Result<Vec<DeviceInfo>> {
    let api = hidapi::HidApi::new().map_err(|e| Error::Hid(e.to_string()))?;

    let devices: Vec<DeviceInfo> = api
        .device_list()
        .filter_map(|info| {
            let model = identify(info.vendor_id(), info.product_id())?;
            let interface_number = info.interface_number();
            if !filter.accepts(interface_number) {
                debug!(model = model.name(), interface = interface_number, "skipping interface");
                return None;
            }
            Some(DeviceInfo {
                model,
                vid: info.vendor_id(),
                pid: info.product_id(),
                path: info.path().to_string_lossy().into_owned(),
                interface_number,
                serial: info.serial_number().map(str::to_owned),
            })
        })
        .inspect(|dev| {
            info!(
                model = dev.model.name(),
                pid = format_args!("0x{:04X}", dev.pid),
                interface = dev.interface_number,
                keys = dev.is_key_interface(),
                path = %dev.path,
                "ROG mouse interface"
            )
        })
        .collect();

    debug!(count = devices.len(), ?filter, "discovery done");
    Ok(devices)
}
