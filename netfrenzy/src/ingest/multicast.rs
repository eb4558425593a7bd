// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Multicast and broadcast address classification

use std::net::IpAddr;

/// True for IPv4 224.0.0.0/4 and the limited broadcast address, and for IPv6 ff00::/8.
pub fn ip_multicast(addr: &str) -> bool {
    match addr.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_multicast() || v4.is_broadcast(),
        Ok(IpAddr::V6(v6)) => v6.is_multicast(),
        Err(_) => false,
    }
}

/// True when the group bit of the first octet is set.
///
/// Covers the broadcast address and every multicast group MAC. Accepts
/// `:` or `-` separated hex.
pub fn mac_multicast(mac: &str) -> bool {
    let first = mac.trim().split(|c| c == ':' || c == '-').next();
    match first.map(|octet| u8::from_str_radix(octet, 16)) {
        Some(Ok(octet)) => octet & 0x01 == 0x01,
        _ => false,
    }
}
