// Block devices from /sys/block

use hostcap_core::domain::{BlockInfo, Disk, DriveType, Partition, StorageController};
use hostcap_core::error::Result;

use super::SysfsReader;

const BLOCK_DIR: &str = "sys/block";
const SECTOR_SIZE: u64 = 512;

/// Pseudo devices that never back real storage
const IGNORED_PREFIXES: [&str; 3] = ["loop", "ram", "zram"];

pub(crate) fn collect(reader: &SysfsReader) -> Result<BlockInfo> {
    let mut disks = Vec::new();

    for name in reader.list(BLOCK_DIR)? {
        if IGNORED_PREFIXES.iter().any(|p| name.starts_with(p)) {
            continue;
        }
        disks.push(disk(reader, &name)?);
    }

    Ok(BlockInfo {
        total_physical_bytes: disks.iter().map(|d| d.size_bytes).sum(),
        disks,
    })
}

fn disk(reader: &SysfsReader, name: &str) -> Result<Disk> {
    let dir = format!("{}/{}", BLOCK_DIR, name);
    let rotational = reader.attr_is_one(format!("{}/queue/rotational", dir));

    let serial_number = reader
        .attr(format!("{}/device/serial", dir))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| reader.attr_or_unknown(format!("{}/serial", dir)));
    let wwn = reader
        .attr(format!("{}/wwid", dir))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| reader.attr_or_unknown(format!("{}/device/wwid", dir)));

    Ok(Disk {
        name: name.to_string(),
        size_bytes: sectors_to_bytes(reader.attr_u64(format!("{}/size", dir))),
        drive_type: drive_type(name, rotational),
        storage_controller: storage_controller(name),
        removable: reader.attr_is_one(format!("{}/removable", dir)),
        model: reader.attr_or_unknown(format!("{}/device/model", dir)),
        vendor: reader.attr_or_unknown(format!("{}/device/vendor", dir)),
        serial_number,
        wwn,
        partitions: partitions(reader, &dir)?,
    })
}

fn partitions(reader: &SysfsReader, dir: &str) -> Result<Vec<Partition>> {
    Ok(reader
        .list(dir)?
        .into_iter()
        .filter(|entry| reader.exists(format!("{}/{}/partition", dir, entry)))
        .map(|entry| Partition {
            size_bytes: sectors_to_bytes(reader.attr_u64(format!("{}/{}/size", dir, entry))),
            name: entry,
        })
        .collect())
}

fn sectors_to_bytes(sectors: Option<u64>) -> u64 {
    sectors.unwrap_or(0) * SECTOR_SIZE
}

fn drive_type(name: &str, rotational: bool) -> DriveType {
    if name.starts_with("sr") {
        DriveType::Odd
    } else if name.starts_with("fd") {
        DriveType::Fdd
    } else if rotational {
        DriveType::Hdd
    } else {
        DriveType::Ssd
    }
}

fn storage_controller(name: &str) -> StorageController {
    if name.starts_with("nvme") {
        StorageController::Nvme
    } else if name.starts_with("sd") || name.starts_with("sr") {
        StorageController::Scsi
    } else if name.starts_with("vd") {
        StorageController::Virtio
    } else if name.starts_with("hd") {
        StorageController::Ide
    } else if name.starts_with("mmcblk") {
        StorageController::Mmc
    } else {
        StorageController::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::write;
    use super::*;
    use hostcap_core::domain::{QueryOptions, UNKNOWN};

    fn reader(root: &std::path::Path) -> SysfsReader {
        SysfsReader::new(root.to_path_buf(), &QueryOptions::default().without_warnings())
    }

    #[test]
    fn test_collects_disks_and_partitions() {
        let root = tempfile::tempdir().unwrap();
        let r = root.path();
        write(r, "sys/block/sda/size", "1953525168\n");
        write(r, "sys/block/sda/queue/rotational", "1\n");
        write(r, "sys/block/sda/removable", "0\n");
        write(r, "sys/block/sda/device/model", "ST1000DM010-2EP1\n");
        write(r, "sys/block/sda/device/vendor", "ATA     \n");
        write(r, "sys/block/sda/wwid", "naa.5000c500a1b2c3d4\n");
        write(r, "sys/block/sda/sda1/partition", "1\n");
        write(r, "sys/block/sda/sda1/size", "1048576\n");
        write(r, "sys/block/nvme0n1/size", "1000215216\n");
        write(r, "sys/block/nvme0n1/queue/rotational", "0\n");
        write(r, "sys/block/nvme0n1/device/serial", "S4EWNX0N123456\n");
        write(r, "sys/block/loop0/size", "0\n");

        let info = collect(&reader(r)).unwrap();
        let names: Vec<&str> = info.disks.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["nvme0n1", "sda"]);

        let nvme = &info.disks[0];
        assert_eq!(nvme.drive_type, DriveType::Ssd);
        assert_eq!(nvme.storage_controller, StorageController::Nvme);
        assert_eq!(nvme.serial_number, "S4EWNX0N123456");
        assert_eq!(nvme.model, UNKNOWN);
        assert!(nvme.partitions.is_empty());

        let sda = &info.disks[1];
        assert_eq!(sda.size_bytes, 1953525168 * 512);
        assert_eq!(sda.drive_type, DriveType::Hdd);
        assert_eq!(sda.storage_controller, StorageController::Scsi);
        assert_eq!(sda.vendor, "ATA");
        assert_eq!(sda.wwn, "naa.5000c500a1b2c3d4");
        assert_eq!(
            sda.partitions,
            vec![Partition {
                name: "sda1".to_string(),
                size_bytes: 1048576 * 512
            }]
        );

        assert_eq!(info.total_physical_bytes, (1953525168 + 1000215216) * 512);
    }

    #[test]
    fn test_optical_drive_type() {
        assert_eq!(drive_type("sr0", true), DriveType::Odd);
        assert_eq!(storage_controller("sr0"), StorageController::Scsi);
        assert_eq!(storage_controller("mmcblk0"), StorageController::Mmc);
        assert_eq!(storage_controller("dm-0"), StorageController::Unknown);
    }

    #[test]
    fn test_missing_block_dir_is_query_failure() {
        let root = tempfile::tempdir().unwrap();
        assert!(collect(&reader(root.path())).unwrap_err().is_not_found());
    }
}
