// PCI devices from /sys/bus/pci/devices, GPUs from /sys/class/drm

use hostcap_core::domain::{GpuCard, GpuInfo, PciDevice, PciInfo};
use hostcap_core::error::Result;

use super::SysfsReader;

const PCI_DEVICES: &str = "sys/bus/pci/devices";
const DRM_DIR: &str = "sys/class/drm";

pub(crate) fn collect(reader: &SysfsReader) -> Result<PciInfo> {
    let devices = reader
        .list(PCI_DEVICES)?
        .into_iter()
        .map(|address| device(reader, &address))
        .collect();
    Ok(PciInfo { devices })
}

/// Strip the `0x` prefix sysfs puts on ids
fn hex_attr(reader: &SysfsReader, relative: String) -> String {
    let value = reader.attr_or_unknown(relative);
    value.trim_start_matches("0x").to_string()
}

fn device(reader: &SysfsReader, address: &str) -> PciDevice {
    let dir = format!("{}/{}", PCI_DEVICES, address);

    // class is 0xCCSSPP: class, subclass, programming interface
    let class = hex_attr(reader, format!("{}/class", dir));
    let (class_id, subclass_id, programming_interface) = if class.len() == 6 && class.is_ascii() {
        (
            class[0..2].to_string(),
            class[2..4].to_string(),
            class[4..6].to_string(),
        )
    } else {
        (class.clone(), String::new(), String::new())
    };

    PciDevice {
        address: address.to_string(),
        vendor_id: hex_attr(reader, format!("{}/vendor", dir)),
        product_id: hex_attr(reader, format!("{}/device", dir)),
        class_id,
        subclass_id,
        programming_interface,
        driver: reader.link_name(format!("{}/driver", dir)),
    }
}

/// `card0`, `card1`... but not connectors such as `card0-HDMI-A-1`
fn card_index(entry: &str) -> Option<u32> {
    entry.strip_prefix("card").and_then(|n| n.parse().ok())
}

pub(crate) fn gpus(reader: &SysfsReader) -> Result<GpuInfo> {
    // No DRM class at all: a headless machine, not a failure
    if !reader.exists(DRM_DIR) {
        return Ok(GpuInfo::default());
    }

    let mut cards = Vec::new();
    for entry in reader.list(DRM_DIR)? {
        let Some(index) = card_index(&entry) else {
            continue;
        };
        let Some(address) = reader.link_name(format!("{}/{}/device", DRM_DIR, entry)) else {
            reader.warn(&format!("{} has no backing device", entry));
            continue;
        };
        let pci_device = reader
            .exists(format!("{}/{}", PCI_DEVICES, address))
            .then(|| device(reader, &address));

        cards.push(GpuCard {
            index,
            address,
            device: pci_device,
        });
    }
    cards.sort_by_key(|c| c.index);

    Ok(GpuInfo { cards })
}
