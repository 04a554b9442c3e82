//! `setupVars.conf`, the `KEY=VALUE` file later installer stages read.
//!
//! Known keys get typed fields; everything else is kept verbatim and in
//! order so a round trip through this module does not lose settings.

use std::fs;
use std::io::ErrorKind;
use std::net::Ipv6Addr;
use std::path::Path;

use crate::core::validation::is_valid_ipv4;
use crate::error::{InstallerError, Result};
use crate::utils::atomic_write;

const INTERFACE: &str = "PIHOLE_INTERFACE";
const IPV4_ADDRESS: &str = "IPV4_ADDRESS";
const IPV6_ADDRESS: &str = "IPV6_ADDRESS";
const DNS_1: &str = "PIHOLE_DNS_1";
const DNS_2: &str = "PIHOLE_DNS_2";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupVars {
    pub interface: Option<String>,
    /// Address with optional prefix length, e.g. `192.168.1.10/24`
    pub ipv4_address: Option<String>,
    pub ipv6_address: Option<String>,
    pub dns_1: Option<String>,
    pub dns_2: Option<String>,
    extras: Vec<(String, String)>,
}

impl SetupVars {
    pub fn parse(content: &str) -> Self {
        let mut vars = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::debug!(line, "Ignoring malformed setupVars line");
                continue;
            };
            vars.set(key.trim(), value.trim());
        }

        vars
    }

    /// Set a key, typed or not. Empty values clear typed fields.
    pub fn set(&mut self, key: &str, value: &str) {
        let value = (!value.is_empty()).then(|| value.to_string());
        let slot = match key {
            INTERFACE => &mut self.interface,
            IPV4_ADDRESS => &mut self.ipv4_address,
            IPV6_ADDRESS => &mut self.ipv6_address,
            DNS_1 => &mut self.dns_1,
            DNS_2 => &mut self.dns_2,
            _ => {
                let value = value.unwrap_or_default();
                match self.extras.iter_mut().find(|(k, _)| k == key) {
                    Some(entry) => entry.1 = value,
                    None => self.extras.push((key.to_string(), value)),
                }
                return;
            }
        };
        *slot = value;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            INTERFACE => self.interface.as_deref(),
            IPV4_ADDRESS => self.ipv4_address.as_deref(),
            IPV6_ADDRESS => self.ipv6_address.as_deref(),
            DNS_1 => self.dns_1.as_deref(),
            DNS_2 => self.dns_2.as_deref(),
            _ => self
                .extras
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
        }
    }

    /// Record the IPv6 blocking address, or clear it when blocking is off
    pub fn record_ipv6(&mut self, address: Option<Ipv6Addr>) {
        self.ipv6_address = address.map(|a| a.to_string());
    }

    pub fn render(&self) -> String {
        let typed = [
            (INTERFACE, &self.interface),
            (IPV4_ADDRESS, &self.ipv4_address),
            (IPV6_ADDRESS, &self.ipv6_address),
            (DNS_1, &self.dns_1),
            (DNS_2, &self.dns_2),
        ];

        let mut out = String::new();
        for (key, value) in typed {
            if let Some(value) = value {
                out.push_str(&format!("{key}={value}\n"));
            }
        }
        for (key, value) in &self.extras {
            out.push_str(&format!("{key}={value}\n"));
        }
        out
    }

    /// Check the IPv4 fields. The prefix length after `/` is optional.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(address) = &self.ipv4_address {
            let (ip, prefix) = match address.split_once('/') {
                Some((ip, prefix)) => (ip, Some(prefix)),
                None => (address.as_str(), None),
            };
            if !is_valid_ipv4(ip) {
                return Err(format!("{IPV4_ADDRESS} '{address}' is not a valid IPv4 address"));
            }
            if let Some(prefix) = prefix {
                if !prefix.parse::<u8>().is_ok_and(|p| p <= 32) {
                    return Err(format!("{IPV4_ADDRESS} '{address}' has an invalid prefix length"));
                }
            }
        }

        for (key, value) in [(DNS_1, &self.dns_1), (DNS_2, &self.dns_2)] {
            if let Some(server) = value {
                if !is_valid_ipv4(server) && server.parse::<Ipv6Addr>().is_err() {
                    return Err(format!("{key} '{server}' is not a valid IP address"));
                }
            }
        }

        Ok(())
    }

    /// Read the file; a missing file is an empty set of variables
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No setupVars file yet");
                Ok(Self::default())
            }
            Err(e) => Err(InstallerError::io_error(
                "read setup variables",
                Some(path.display().to_string()),
                e,
            )),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        atomic_write::write_with_mode(path, self.render().as_bytes(), atomic_write::SHARED_READ)
            .map_err(|e| {
                InstallerError::io_error(
                    "write setup variables",
                    Some(path.display().to_string()),
                    std::io::Error::other(format!("{e:#}")),
                )
            })?;
        tracing::info!(path = %path.display(), "Setup variables saved");
        Ok(())
    }
}
