use regex::Regex;
use std::fmt;
use std::net::Ipv4Addr;

// All arithmetic runs on the numeric value of the big-endian byte
// representation (u32::from(Ipv4Addr)), so `<` on these values is
// address order and the bit operations line up with it.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("usage")]
    Usage,
    #[error("invalid prefix length {0}")]
    InvalidPrefixLength(u8),
    #[error("could not parse address \"{0}\"")]
    InvalidAddress(String),
    #[error("invalid mask definition \"{0}\"")]
    InvalidMaskDefinition(String),
    #[error("invalid split element \"{0}\"")]
    InvalidSplitElement(String),
    #[error("invalid range \"{0}\": start exceeds end")]
    InvalidRange(String),
    #[error("network too small, cannot split")]
    NetworkTooSmall,
}

fn mask_bits(prefix_len: u8) -> u32 {
    debug_assert!((1..=32).contains(&prefix_len));
    u32::MAX << (32 - prefix_len)
}

/// Netmask with exactly `prefix_len` leading one-bits.
pub fn mask_for(prefix_len: u8) -> Result<u32, Error> {
    if !(1..=32).contains(&prefix_len) {
        return Err(Error::InvalidPrefixLength(prefix_len));
    }
    Ok(mask_bits(prefix_len))
}

pub fn network_of(addr: u32, prefix_len: u8) -> u32 {
    addr & mask_bits(prefix_len)
}

pub fn broadcast_of(addr: u32, prefix_len: u8) -> u32 {
    // prefix 32 kept as an explicit case rather than relying on a
    // zero-width host part
    if prefix_len == 32 {
        addr
    } else {
        addr | !mask_bits(prefix_len)
    }
}

pub fn wildcard_of(prefix_len: u8) -> u32 {
    !mask_bits(prefix_len)
}

/// Usable host range (min, max, count). A /31 is a point-to-point pair,
/// a /32 a single host route.
pub fn host_range(addr: u32, prefix_len: u8) -> (u32, u32, u32) {
    let netw = network_of(addr, prefix_len);
    let bcast = broadcast_of(addr, prefix_len);
    match prefix_len {
        32 => (addr, addr, 1),
        31 => (netw, bcast, 2),
        _ => (netw + 1, bcast - 1, bcast - netw - 1),
    }
}

pub fn parse_address(s: &str) -> Result<Ipv4Addr, Error> {
    s.parse().map_err(|_| Error::InvalidAddress(s.to_owned()))
}

/// Parse either a decimal prefix length or a netmask given as a dotted
/// quad or 0x-prefixed hex value. Mask input is reduced to its popcount
/// and must round-trip through the canonical mask for that count, which
/// rejects masks with non-contiguous bits.
pub fn parse_prefix_or_mask(s: &str) -> Result<(u8, u32), Error> {
    let decimal = Regex::new(r"^\d+$").unwrap();
    if decimal.is_match(s) {
        if let Ok(prefix_len) = s.parse::<u8>() {
            if let Ok(mask) = mask_for(prefix_len) {
                return Ok((prefix_len, mask));
            }
        }
        return Err(Error::InvalidMaskDefinition(s.to_owned()));
    }

    let hex = Regex::new(r"^0x(?P<digits>[0-9a-fA-F]{1,8})$").unwrap();
    let mask = if let Some(caps) = hex.captures(s) {
        u32::from_str_radix(&caps["digits"], 16)
            .map_err(|_| Error::InvalidMaskDefinition(s.to_owned()))?
    } else {
        u32::from(parse_address(s).map_err(|_| Error::InvalidMaskDefinition(s.to_owned()))?)
    };

    let prefix_len = mask.count_ones() as u8;
    match mask_for(prefix_len) {
        Ok(canonical) if canonical == mask => Ok((prefix_len, mask)),
        _ => Err(Error::InvalidMaskDefinition(s.to_owned())),
    }
}

/// An IPv4 network or CIDR block. `addr` may carry host bits; derived
/// values mask them off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Net {
    addr: Ipv4Addr,
    prefix_len: u8,
}

impl Net {
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self, Error> {
        mask_for(prefix_len)?;
        Ok(Net { addr, prefix_len })
    }

    // For blocks assembled from already-validated arithmetic.
    pub(crate) fn from_block(addr: Ipv4Addr, prefix_len: u8) -> Self {
        debug_assert!((1..=32).contains(&prefix_len));
        Net { addr, prefix_len }
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn subnetmask(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.subnetmask_u32())
    }

    pub fn subnetmask_u32(&self) -> u32 {
        mask_bits(self.prefix_len)
    }

    pub fn wildcard(&self) -> Ipv4Addr {
        Ipv4Addr::from(wildcard_of(self.prefix_len))
    }

    pub fn network_address(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network_address_u32())
    }

    pub fn network_address_u32(&self) -> u32 {
        network_of(u32::from(self.addr), self.prefix_len)
    }

    pub fn broadcast_address(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.broadcast_address_u32())
    }

    pub fn broadcast_address_u32(&self) -> u32 {
        broadcast_of(u32::from(self.addr), self.prefix_len)
    }

    pub fn host(&self) -> (Ipv4Addr, Ipv4Addr) {
        let (min, max, _) = host_range(u32::from(self.addr), self.prefix_len);
        (Ipv4Addr::from(min), Ipv4Addr::from(max))
    }

    pub fn host_count(&self) -> u32 {
        let (_, _, count) = host_range(u32::from(self.addr), self.prefix_len);
        count
    }
}

impl fmt::Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

/// Greedy cover of the inclusive range [start, end]: each block is the
/// largest whose base is aligned at the cursor and whose broadcast stays
/// within `end`. /32 always qualifies, and the cursor grows strictly, so
/// the iteration is finite.
pub fn cover(start: Ipv4Addr, end: Ipv4Addr) -> Cover {
    Cover {
        next: u64::from(u32::from(start)),
        end: u32::from(end),
    }
}

#[derive(Debug, Clone)]
pub struct Cover {
    // u64 so advancing past 255.255.255.255 ends the iteration instead
    // of wrapping
    next: u64,
    end: u32,
}

impl Iterator for Cover {
    type Item = Net;

    fn next(&mut self) -> Option<Net> {
        if self.next > u64::from(self.end) {
            return None;
        }
        let base = self.next as u32;
        let mut prefix_len = 1;
        while network_of(base, prefix_len) != base
            || u64::from(broadcast_of(base, prefix_len)) > u64::from(self.end)
        {
            prefix_len += 1;
        }
        self.next = u64::from(broadcast_of(base, prefix_len)) + 1;
        Some(Net::from_block(Ipv4Addr::from(base), prefix_len))
    }
}
