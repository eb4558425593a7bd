// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Decoded packet summaries
//!
//! A [`PacketSummary`] is what a dissector reports for one captured frame:
//! the layer stack plus the address fields of the link, network and
//! transport headers. Summaries arrive as JSON lines and are read with
//! [`read_packets`].

use super::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Layer rank reported for application protocols we always prefer
pub const PREFERRED_SERVICE_LAYER: i64 = 999;

const PREFERRED_SERVICES: [&str; 3] = ["http", "https", "ftp"];

/// Layers that describe payload encoding rather than a service
const PAYLOAD_LAYERS: [&str; 3] = ["data-text-lines", "data", "mime_multipart"];

/// The wildcard SSID carried by broadcast probe requests
const WILDCARD_SSID: &str = "SSID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetAddrs {
    pub src: String,
    pub dst: String,
}

/// 802.11 addressing plus the frame type/subtype field (e.g. `0x0004`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WlanHeader {
    pub sa: Option<String>,
    pub da: Option<String>,
    pub ta: Option<String>,
    pub ra: Option<String>,
    pub fc_type_subtype: Option<String>,
}

/// Tagged parameter of an 802.11 management frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WlanManagement {
    pub tag_length: usize,
    /// Rendered tag, e.g. `SSID parameter set: "HomeNet"`
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpPair {
    pub src: String,
    pub dst: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortPair {
    pub src: u16,
    pub dst: u16,
}

/// One captured frame as reported by the dissector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketSummary {
    /// Layer names, outermost first (`["eth", "ip", "tcp", "http"]`)
    pub layers: Vec<String>,
    pub eth: Option<EthernetAddrs>,
    pub wlan: Option<WlanHeader>,
    pub wlan_mgt: Option<WlanManagement>,
    pub ip: Option<IpPair>,
    pub ports: Option<PortPair>,
    /// Capture timestamp, seconds since the epoch
    pub timestamp: f64,
    /// Captured length in bytes
    pub length: u64,
    /// Vendor names already resolved for MACs in this frame
    pub manufacturers: BTreeMap<String, String>,
}

/// 802.11 frame kinds that affect SSID relationships
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Beacon,
    Probe,
    ProbeResponse,
}

/// The four MAC roles a frame can carry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacSet {
    pub src: Option<String>,
    pub dst: Option<String>,
    pub transmitter: Option<String>,
    pub receiver: Option<String>,
}

impl MacSet {
    /// Present addresses in src, dst, transmitter, receiver order
    pub fn present(&self) -> impl Iterator<Item = &str> + '_ {
        [&self.src, &self.dst, &self.transmitter, &self.receiver]
            .into_iter()
            .filter_map(|mac| mac.as_deref())
    }
}

impl PacketSummary {
    fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l == name)
    }

    /// Transport protocol, or the first layer above the network/link layer
    pub fn protocol(&self) -> String {
        if let Some(transport) = self.layers.iter().find(|l| *l == "udp" || *l == "tcp") {
            return transport.clone();
        }
        let index = if self.has_layer("ip") || self.has_layer("ipv6") {
            2
        } else {
            1
        };
        self.layers
            .get(index)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn macs(&self) -> MacSet {
        let mut macs = MacSet::default();
        if let Some(eth) = &self.eth {
            macs.src = Some(eth.src.clone());
            macs.dst = Some(eth.dst.clone());
        }
        if let Some(wlan) = &self.wlan {
            macs.src = wlan.sa.clone();
            macs.dst = wlan.da.clone();
            macs.transmitter = wlan.ta.clone();
            macs.receiver = wlan.ra.clone();
            if macs.src == macs.transmitter {
                macs.transmitter = None;
            }
            if macs.dst == macs.receiver {
                macs.receiver = None;
            }
        }
        macs
    }

    pub fn ips(&self) -> (Option<&str>, Option<&str>) {
        match &self.ip {
            Some(ip) => (Some(ip.src.as_str()), Some(ip.dst.as_str())),
            None => (None, None),
        }
    }

    pub fn dst_port(&self) -> Option<u16> {
        self.ports.map(|p| p.dst)
    }

    pub fn manufacturer(&self, mac: &str) -> Option<&str> {
        self.manufacturers.get(mac).map(String::as_str)
    }

    /// Most specific service layer and its rank.
    ///
    /// Well-known application protocols always win with
    /// [`PREFERRED_SERVICE_LAYER`]. Otherwise the innermost layer that is not
    /// a payload encoding is chosen, ranked by its position in the stack.
    pub fn service(&self) -> (String, i64) {
        if let Some(name) = PREFERRED_SERVICES.iter().find(|s| self.has_layer(s)) {
            return (name.to_string(), PREFERRED_SERVICE_LAYER);
        }
        for (index, layer) in self.layers.iter().enumerate().skip(1).rev() {
            if !PAYLOAD_LAYERS.contains(&layer.as_str()) {
                return (layer.clone(), index as i64);
            }
        }
        ("unknown".to_string(), -(self.layers.len() as i64))
    }

    /// Advertised or probed SSID, and the frame kind
    pub fn ssid(&self) -> (Option<String>, FrameType) {
        let frame_type = match self
            .wlan
            .as_ref()
            .and_then(|w| w.fc_type_subtype.as_deref())
        {
            Some("0x0004") => FrameType::Probe,
            Some("0x0005") => FrameType::ProbeResponse,
            _ => FrameType::Beacon,
        };

        let ssid = self
            .wlan_mgt
            .as_ref()
            .filter(|mgt| mgt.tag_length > 0)
            .and_then(|mgt| quoted_tail(&mgt.tag, mgt.tag_length))
            .filter(|ssid| !ssid.is_empty() && ssid != WILDCARD_SSID);

        (ssid, frame_type)
    }
}

/// The `len` bytes preceding the closing quote of `tag`.
///
/// 802.11 tag lengths count octets, so the slice is taken on bytes.
fn quoted_tail(tag: &str, len: usize) -> Option<String> {
    let end = tag.len().checked_sub(1)?;
    let start = end.checked_sub(len)?;
    let bytes = tag.as_bytes().get(start..end)?;
    Some(String::from_utf8_lossy(bytes).into_owned())
}

/// Decode JSON-lines packet summaries, skipping blank lines.
pub fn read_packets<R: BufRead>(reader: R) -> impl Iterator<Item = Result<PacketSummary>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(
                serde_json::from_str(&text).map_err(|source| IngestError::Json {
                    line: index + 1,
                    source,
                }),
            ),
            Err(e) => Some(Err(IngestError::Io(e))),
        })
}
