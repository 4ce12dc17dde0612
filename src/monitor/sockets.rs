//! Socket inode -> remote endpoint resolution from the kernel connection tables.
//!
//! Table rows look like
//!
//! ```text
//!   sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
//!    0: 0100007F:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 12345 ...
//! ```
//!
//! Addresses are `HEXIP:HEXPORT`, the IP stored as 32-bit words in host
//! (little-endian) order, so the bytes come out reversed relative to
//! dotted-decimal.

use crate::procfs::{ConnTable, ProcSource};
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::trace;

/// socket inode -> `proto://ip:port`
pub type SocketIndex = HashMap<u64, String>;

const REMOTE_FIELD: usize = 2;
const INODE_FIELD: usize = 9;

/// Decode every table the platform exposes. Missing or unreadable tables
/// contribute nothing.
pub fn load_socket_index<S: ProcSource + ?Sized>(source: &S) -> SocketIndex {
    let mut index = SocketIndex::new();
    for table in ConnTable::ALL {
        match source.connection_table(table) {
            Ok(Some(contents)) => index.extend(parse_table(table, &contents)),
            Ok(None) => trace!(table = table.name(), "connection table absent"),
            Err(e) => trace!(table = table.name(), error = %e, "connection table unreadable"),
        }
    }
    index
}

/// Rows of one table as `(inode, endpoint)`; malformed rows are skipped.
pub fn parse_table(table: ConnTable, contents: &str) -> Vec<(u64, String)> {
    contents
        .lines()
        .skip(1) // header
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() <= INODE_FIELD {
                return None;
            }
            let inode = fields[INODE_FIELD].parse::<u64>().ok()?;
            let endpoint = decode_endpoint(fields[REMOTE_FIELD])?;
            Some((inode, format!("{}://{}", table.name(), endpoint)))
        })
        .collect()
}

/// `0100007F:0050` -> `127.0.0.1:80`; IPv6 comes back bracketed.
pub fn decode_endpoint(field: &str) -> Option<String> {
    let (ip_hex, port_hex) = field.split_once(':')?;
    let port = u16::from_str_radix(port_hex, 16).ok()?;
    match ip_hex.len() {
        8 => Some(format!("{}:{}", decode_ipv4(ip_hex)?, port)),
        32 => Some(format!("[{}]:{}", decode_ipv6(ip_hex)?, port)),
        _ => None,
    }
}

pub fn decode_ipv4(hex: &str) -> Option<Ipv4Addr> {
    let word = u32::from_str_radix(hex, 16).ok()?;
    Some(Ipv4Addr::from(word.to_le_bytes()))
}

pub fn decode_ipv6(hex: &str) -> Option<Ipv6Addr> {
    if hex.len() != 32 || !hex.is_ascii() {
        return None;
    }
    let mut octets = [0u8; 16];
    for (i, chunk) in octets.chunks_exact_mut(4).enumerate() {
        let word = u32::from_str_radix(&hex[i * 8..i * 8 + 8], 16).ok()?;
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    Some(Ipv6Addr::from(octets))
}

/// Target label for a socket descriptor, falling back to the raw inode.
pub fn endpoint_label(index: &SocketIndex, inode: u64) -> String {
    index.get(&inode).cloned().unwrap_or_else(|| {
        format!("{}{}", crate::constants::UNRESOLVED_SOCKET_PREFIX, inode)
    })
}
