//! Network value types: ports, addresses, subnets.

use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::ContainerError;

/// Transport protocol of a port.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub enum Proto {
    Unknown,
    Tcp,
    Udp,
    Icmp,
}

impl Proto {
    const fn mask(self) -> u64 {
        match self {
            Proto::Unknown => 0,
            Proto::Tcp => 0x1_0000,
            Proto::Udp => 0x2_0000,
            Proto::Icmp => 0x3_0000,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Proto::Unknown => "unknown",
            Proto::Tcp => "tcp",
            Proto::Udp => "udp",
            Proto::Icmp => "icmp",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PortVal {
    pub number: u16,
    pub proto: Proto,
}

impl PortVal {
    pub const fn new(number: u16, proto: Proto) -> Self {
        PortVal { number, proto }
    }

    /// Unsigned representation: protocol mask in the high bits, port number low.
    pub const fn internal(self) -> u64 {
        self.proto.mask() | self.number as u64
    }
}

impl fmt::Display for PortVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.proto.name())
    }
}

/// Address as 16 bytes, IPv4 mapped into `::ffff:0:0/96`.
pub fn addr_bytes(addr: IpAddr) -> [u8; 16] {
    match addr {
        IpAddr::V4(v4) => v4.to_ipv6_mapped().octets(),
        IpAddr::V6(v6) => v6.octets(),
    }
}

/// Total order over addresses by their mapped bytes.
pub fn addr_cmp(a: IpAddr, b: IpAddr) -> Ordering {
    addr_bytes(a).cmp(&addr_bytes(b))
}

/// An address prefix. The stored prefix always has its host bits cleared.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SubnetVal {
    prefix: IpAddr,
    width: u8,
}

impl SubnetVal {
    /// Build `addr/width`, validating the width against the address family.
    pub fn new(addr: IpAddr, width: i64) -> Result<Self, ContainerError> {
        let (family, max) = match addr {
            IpAddr::V4(_) => ("IPv4", 32),
            IpAddr::V6(_) => ("IPv6", 128),
        };
        let width = u8::try_from(width)
            .ok()
            .filter(|w| *w <= max)
            .ok_or(ContainerError::BadPrefix { family, width })?;
        Ok(SubnetVal {
            prefix: mask_addr(addr, width),
            width,
        })
    }

    pub fn prefix(&self) -> IpAddr {
        self.prefix
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// Whether `addr` lies inside this subnet. Families must match.
    pub fn contains(&self, addr: IpAddr) -> bool {
        if self.prefix.is_ipv4() != addr.is_ipv4() {
            return false;
        }
        mask_addr(addr, self.width) == self.prefix
    }
}

fn mask_addr(addr: IpAddr, width: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::from(v4);
            let mask = u32::MAX.checked_shl(32u32.saturating_sub(u32::from(width))).unwrap_or(0);
            IpAddr::V4(Ipv4Addr::from(bits & mask))
        }
        IpAddr::V6(v6) => {
            let bits = u128::from(v6);
            let mask = u128::MAX.checked_shl(128u32.saturating_sub(u32::from(width))).unwrap_or(0);
            IpAddr::V6(Ipv6Addr::from(bits & mask))
        }
    }
}

impl fmt::Display for SubnetVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.width)
    }
}
