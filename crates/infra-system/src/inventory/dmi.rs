// DMI product and chassis attributes from /sys/class/dmi/id

use hostcap_core::domain::{ChassisInfo, ProductInfo};

use super::SysfsReader;

const DMI_DIR: &str = "sys/class/dmi/id";

fn attr(reader: &SysfsReader, name: &str) -> String {
    reader.attr_or_unknown(format!("{}/{}", DMI_DIR, name))
}

pub(crate) fn product(reader: &SysfsReader) -> ProductInfo {
    ProductInfo {
        family: attr(reader, "product_family"),
        name: attr(reader, "product_name"),
        vendor: attr(reader, "sys_vendor"),
        serial_number: attr(reader, "product_serial"),
        uuid: attr(reader, "product_uuid"),
        sku: attr(reader, "product_sku"),
        version: attr(reader, "product_version"),
    }
}

pub(crate) fn chassis(reader: &SysfsReader) -> ChassisInfo {
    ChassisInfo {
        asset_tag: attr(reader, "chassis_asset_tag"),
        serial_number: attr(reader, "chassis_serial"),
        chassis_type: attr(reader, "chassis_type"),
        vendor: attr(reader, "chassis_vendor"),
        version: attr(reader, "chassis_version"),
    }
}
