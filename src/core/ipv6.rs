//! IPv6 address classification and selection for blocking

use serde::Serialize;
use std::net::Ipv6Addr;

use crate::status::StatusSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ipv6Scope {
    LinkLocal,
    Ula,
    Gua,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ipv6Candidate {
    pub address: Ipv6Addr,
    pub scope: Ipv6Scope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "address", rename_all = "snake_case")]
pub enum Ipv6Selection {
    Disabled,
    Use(Ipv6Addr),
}

impl Ipv6Selection {
    pub fn address(&self) -> Option<Ipv6Addr> {
        match self {
            Ipv6Selection::Use(addr) => Some(*addr),
            Ipv6Selection::Disabled => None,
        }
    }
}

/// Scope from the address bits alone.
///
/// Only `fe80::/10`, `fc00::/7` and the global unicast block `2000::/3` are
/// candidates; loopback, multicast, IPv4-mapped and the rest give `None`.
pub fn classify(address: &Ipv6Addr) -> Option<Ipv6Scope> {
    let first = address.segments()[0];
    if first & 0xffc0 == 0xfe80 {
        Some(Ipv6Scope::LinkLocal)
    } else if first & 0xfe00 == 0xfc00 {
        Some(Ipv6Scope::Ula)
    } else if first & 0xe000 == 0x2000 {
        Some(Ipv6Scope::Gua)
    } else {
        None
    }
}

/// Parse and classify raw address strings, skipping anything unusable
pub fn candidates_from<S: AsRef<str>>(addresses: &[S]) -> Vec<Ipv6Candidate> {
    addresses
        .iter()
        .filter_map(|raw| {
            let text = raw.as_ref().trim();
            let text = text.split('/').next().unwrap_or(text);
            let address: Ipv6Addr = text.parse().ok()?;
            let scope = classify(&address)?;
            Some(Ipv6Candidate { address, scope })
        })
        .collect()
}

/// Pick the address used for IPv6 blocking: ULA first, then GUA.
///
/// Discovery order never matters between scopes; within a scope the first
/// address wins.
pub fn select_ipv6_blocking(
    candidates: &[Ipv6Candidate],
    sink: &mut dyn StatusSink,
) -> Ipv6Selection {
    let first_of = |scope: Ipv6Scope| {
        candidates
            .iter()
            .find(|candidate| candidate.scope == scope)
            .map(|candidate| candidate.address)
    };

    if let Some(ula) = first_of(Ipv6Scope::Ula) {
        sink.info("Found IPv6 ULA address, using it for blocking IPv6 ads");
        Ipv6Selection::Use(ula)
    } else if let Some(gua) = first_of(Ipv6Scope::Gua) {
        sink.info("Found IPv6 GUA address, using it for blocking IPv6 ads");
        Ipv6Selection::Use(gua)
    } else {
        sink.info("Unable to find IPv6 ULA/GUA address, IPv6 adblocking will not be enabled");
        Ipv6Selection::Disabled
    }
}

/// Addresses from `ip -6 address` output, prefix length removed
pub fn extract_inet6_addresses(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            while let Some(word) = words.next() {
                if word == "inet6" {
                    let address = words.next()?;
                    return Some(address.split('/').next().unwrap_or(address).to_string());
                }
            }
            None
        })
        .collect()
}
