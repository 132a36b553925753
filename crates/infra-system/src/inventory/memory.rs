// Memory totals from /proc/meminfo and the memory block devices

use hostcap_core::domain::MemoryInfo;
use hostcap_core::error::{HostError, Result};

use super::SysfsReader;

const MEMINFO: &str = "proc/meminfo";
const MEMORY_BLOCKS: &str = "sys/devices/system/memory";

pub(crate) fn collect(reader: &SysfsReader) -> Result<MemoryInfo> {
    let meminfo_path = reader.path(MEMINFO);
    let meminfo = std::fs::read_to_string(&meminfo_path)
        .map_err(|e| HostError::from_io(meminfo_path.display(), e))?;
    let total_usable_bytes = parse_mem_total(&meminfo)?;

    let total_physical_bytes = match online_block_bytes(reader) {
        Some(bytes) if bytes >= total_usable_bytes => bytes,
        _ => {
            reader.warn("memory block devices unavailable, reporting usable memory as physical");
            total_usable_bytes
        }
    };

    Ok(MemoryInfo {
        total_physical_bytes,
        total_usable_bytes,
    })
}

/// `MemTotal:  16318180 kB` -> bytes
fn parse_mem_total(meminfo: &str) -> Result<u64> {
    let line = meminfo
        .lines()
        .find(|l| l.starts_with("MemTotal:"))
        .ok_or_else(|| HostError::Parse("MemTotal missing from meminfo".to_string()))?;

    let mut fields = line.split_whitespace().skip(1);
    let value: u64 = fields
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| HostError::Parse(format!("malformed meminfo line {:?}", line)))?;

    match fields.next() {
        Some("kB") => value
            .checked_mul(1024)
            .ok_or_else(|| HostError::Parse(format!("MemTotal overflows: {:?}", line))),
        None => Ok(value),
        Some(unit) => Err(HostError::Parse(format!("unexpected meminfo unit {:?}", unit))),
    }
}

/// Block size times the number of online `memoryN` blocks
fn online_block_bytes(reader: &SysfsReader) -> Option<u64> {
    let block_size = reader
        .attr(format!("{}/block_size_bytes", MEMORY_BLOCKS))
        .and_then(|hex| u64::from_str_radix(hex.trim_start_matches("0x"), 16).ok())?;

    let online = reader
        .list(MEMORY_BLOCKS)
        .ok()?
        .into_iter()
        .filter(|name| name.starts_with("memory"))
        .filter(|name| reader.attr_is_one(format!("{}/{}/online", MEMORY_BLOCKS, name)))
        .count() as u64;

    if online == 0 {
        return None;
    }
    block_size.checked_mul(online)
}
