// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Packet → graph statement pipeline

use super::cache::{CacheKey, CacheKind, CacheStats, IngestCache};
use super::config::IngestConfig;
use super::error::{IngestError, Result};
use super::multicast::{ip_multicast, mac_multicast};
use super::packet::{FrameType, MacSet, PacketSummary};
use super::sink::GraphSink;
use super::statement::{
    ConnectionDetail, Endpoints, GraphStatement, NodeLabel, PropertyValue, RelType,
};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Counters accumulated over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub packets: u64,
    pub statements: u64,
    /// Wall time spent inside the sink
    pub sink_time: Duration,
}

/// Fields of one packet that every statement builder needs
struct Frame<'a> {
    protocol: String,
    detail: Option<ConnectionDetail>,
    frame_type: FrameType,
    packet: &'a PacketSummary,
}

/// Turns packet summaries into statements for a [`GraphSink`].
///
/// Nodes and relationships recently written are remembered per kind, so a
/// flow of many packets between the same hosts produces its node merges
/// once. Connection statements are always emitted since they carry
/// per-packet counters.
pub struct Ingestor<S: GraphSink> {
    config: IngestConfig,
    cache: IngestCache,
    sink: S,
    stats: IngestStats,
}

impl<S: GraphSink> Ingestor<S> {
    pub fn new(config: IngestConfig, sink: S) -> Result<Self> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.cache_capacity).ok_or_else(|| {
            IngestError::InvalidConfig("cache_capacity must be at least 1".to_string())
        })?;
        if config.reduce {
            log::info!("Reduced mode: connection timing, size and service are not tracked");
        }
        Ok(Self {
            config,
            cache: IngestCache::new(capacity),
            sink,
            stats: IngestStats::default(),
        })
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn cache_stats(&self) -> Vec<(CacheKind, CacheStats)> {
        self.cache.all_stats()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Process every packet, stopping at the first error
    pub fn ingest_all<I>(&mut self, packets: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<PacketSummary>>,
    {
        for packet in packets {
            self.process(&packet?)?;
        }
        Ok(())
    }

    pub fn process(&mut self, packet: &PacketSummary) -> Result<()> {
        let (ssid, frame_type) = packet.ssid();
        let detail = if self.config.reduce {
            None
        } else {
            let (service, service_layer) = packet.service();
            Some(ConnectionDetail {
                time: packet.timestamp,
                length: packet.length,
                service,
                service_layer,
            })
        };
        let frame = Frame {
            protocol: packet.protocol(),
            detail,
            frame_type,
            packet,
        };
        let macs = packet.macs();
        let (ip_src, ip_dst) = packet.ips();

        self.merge_ip(ip_src)?;
        self.merge_ip(ip_dst)?;
        self.merge_macs(&macs, packet)?;
        self.assign(ip_src, macs.src.as_deref())?;
        self.assign(ip_dst, macs.dst.as_deref())?;

        match (ip_src, ip_dst, macs.src.as_deref(), macs.dst.as_deref()) {
            (Some(src), Some(dst), _, _) => self.connect_ip(src, dst, &frame)?,
            (_, _, Some(src), Some(dst)) => self.connect_mac(src, dst, &frame)?,
            _ => {}
        }

        // 802.11 frames relayed through an access point: sender → transmitter
        // and receiver → destination.
        if let (Some(src), Some(dst), Some(tra), Some(rec)) = (
            macs.src.as_deref(),
            macs.dst.as_deref(),
            macs.transmitter.as_deref(),
            macs.receiver.as_deref(),
        ) {
            self.connect_mac(src, tra, &frame)?;
            self.connect_mac(rec, dst, &frame)?;
        }

        if let Some(ssid) = ssid {
            self.merge_ssid(&ssid, frame.frame_type, macs.src.as_deref())?;
        }

        self.stats.packets += 1;
        if self.stats.packets % 10_000 == 0 {
            log::debug!(
                "Processed {} packets, {} statements",
                self.stats.packets,
                self.stats.statements
            );
        }
        Ok(())
    }

    /// Flush the sink, log run statistics, and hand the sink back
    pub fn finish(mut self) -> Result<S> {
        self.sink.flush()?;
        log::info!(
            "Ingested {} packets into {} statements ({:?} in sink)",
            self.stats.packets,
            self.stats.statements,
            self.stats.sink_time
        );
        for (kind, stats) in self.cache.all_stats() {
            log::debug!(
                "cache[{}]: hits={} misses={} use={}/{}",
                kind,
                stats.hits,
                stats.misses,
                stats.used,
                stats.capacity
            );
        }
        Ok(self.sink)
    }

    fn emit(&mut self, statement: GraphStatement) -> Result<()> {
        log::trace!("{}", statement);
        let started = Instant::now();
        self.sink.execute(&statement)?;
        self.stats.sink_time += started.elapsed();
        self.stats.statements += 1;
        Ok(())
    }

    fn merge_ip(&mut self, ip: Option<&str>) -> Result<()> {
        let Some(ip) = ip else {
            return Ok(());
        };
        if self.cache.cached(CacheKind::Ip, CacheKey::one(ip)) {
            return Ok(());
        }
        let mut properties = BTreeMap::new();
        properties.insert("multicast".to_string(), PropertyValue::Bool(ip_multicast(ip)));
        self.emit(GraphStatement::MergeNode {
            label: NodeLabel::Ip,
            name: ip.to_string(),
            properties,
        })
    }

    fn merge_macs(&mut self, macs: &MacSet, packet: &PacketSummary) -> Result<()> {
        for mac in macs.present() {
            if self.cache.cached(CacheKind::Mac, CacheKey::one(mac)) {
                continue;
            }
            let mut properties = BTreeMap::new();
            if let Some(vendor) = packet.manufacturer(mac) {
                properties.insert(
                    "manufacturer".to_string(),
                    PropertyValue::Text(vendor.to_string()),
                );
            }
            properties.insert(
                "multicast".to_string(),
                PropertyValue::Bool(mac_multicast(mac)),
            );
            self.emit(GraphStatement::MergeNode {
                label: NodeLabel::Mac,
                name: mac.to_string(),
                properties,
            })?;
        }
        Ok(())
    }

    fn assign(&mut self, ip: Option<&str>, mac: Option<&str>) -> Result<()> {
        let (Some(ip), Some(mac)) = (ip, mac) else {
            return Ok(());
        };
        if self.config.is_ignored_mac(mac) {
            return Ok(());
        }
        if self.cache.cached(CacheKind::Assign, CacheKey::pair(ip, mac)) {
            return Ok(());
        }
        self.emit(GraphStatement::MergeRelationship {
            from: ip.to_string(),
            to: mac.to_string(),
            rel_type: RelType::Assigned,
        })
    }

    fn connect_ip(&mut self, src: &str, dst: &str, frame: &Frame<'_>) -> Result<()> {
        let endpoints = Endpoints::Ip {
            src: src.to_string(),
            dst: dst.to_string(),
            port: frame.packet.dst_port().map_or(-1, i64::from),
        };
        self.connect(endpoints, frame)
    }

    fn connect_mac(&mut self, src: &str, dst: &str, frame: &Frame<'_>) -> Result<()> {
        if frame.frame_type == FrameType::ProbeResponse {
            return self.emit(GraphStatement::ProbeResponse {
                from: src.to_string(),
                to: dst.to_string(),
            });
        }
        let endpoints = Endpoints::Mac {
            src: src.to_string(),
            dst: dst.to_string(),
        };
        self.connect(endpoints, frame)
    }

    fn connect(&mut self, endpoints: Endpoints, frame: &Frame<'_>) -> Result<()> {
        match &frame.detail {
            Some(detail) => {
                self.emit(GraphStatement::MergeConnection {
                    endpoints: endpoints.clone(),
                    protocol: frame.protocol.clone(),
                    detail: Some(detail.clone()),
                })?;
                self.emit(GraphStatement::UpgradeService {
                    endpoints,
                    protocol: frame.protocol.clone(),
                    service: detail.service.clone(),
                    service_layer: detail.service_layer,
                })
            }
            None => self.emit(GraphStatement::MergeConnection {
                endpoints,
                protocol: frame.protocol.clone(),
                detail: None,
            }),
        }
    }

    fn merge_ssid(&mut self, ssid: &str, frame_type: FrameType, mac_src: Option<&str>) -> Result<()> {
        if !self.cache.cached(CacheKind::Ssid, CacheKey::one(ssid)) {
            self.emit(GraphStatement::MergeNode {
                label: NodeLabel::Ssid,
                name: ssid.to_string(),
                properties: BTreeMap::new(),
            })?;
        }
        let Some(mac) = mac_src else {
            return Ok(());
        };
        let (kind, rel_type) = match frame_type {
            FrameType::Beacon => (CacheKind::Advertises, RelType::Advertises),
            FrameType::Probe => (CacheKind::Probes, RelType::Probes),
            FrameType::ProbeResponse => return Ok(()),
        };
        if self.cache.cached(kind, CacheKey::pair(mac, ssid)) {
            return Ok(());
        }
        self.emit(GraphStatement::MergeRelationship {
            from: mac.to_string(),
            to: ssid.to_string(),
            rel_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::packet::{EthernetAddrs, IpPair, PortPair, WlanHeader};
    use crate::ingest::sink::StatementLog;

    /// Accepts a fixed number of statements, then refuses the rest
    struct LimitedSink {
        remaining: usize,
    }

    impl GraphSink for LimitedSink {
        fn execute(&mut self, _statement: &GraphStatement) -> Result<()> {
            if self.remaining == 0 {
                return Err(IngestError::Sink("connection closed".to_string()));
            }
            self.remaining -= 1;
            Ok(())
        }
    }

    fn tcp_packet(src: &str, dst: &str) -> PacketSummary {
        PacketSummary {
            layers: vec!["eth".into(), "ip".into(), "tcp".into(), "http".into()],
            eth: Some(EthernetAddrs {
                src: "00:00:00:00:00:01".into(),
                dst: "00:00:00:00:00:02".into(),
            }),
            ip: Some(IpPair {
                src: src.into(),
                dst: dst.into(),
            }),
            ports: Some(PortPair {
                src: 51000,
                dst: 80,
            }),
            timestamp: 100.0,
            length: 74,
            ..Default::default()
        }
    }

    fn run(config: IngestConfig, packets: &[PacketSummary]) -> Vec<GraphStatement> {
        let mut ingestor = Ingestor::new(config, StatementLog::new()).unwrap();
        for packet in packets {
            ingestor.process(packet).unwrap();
        }
        ingestor.finish().unwrap().into_statements()
    }

    #[test]
    fn test_first_packet_statement_shape() {
        let statements = run(IngestConfig::default(), &[tcp_packet("10.0.0.1", "10.0.0.2")]);
        // 2 IP nodes, 2 MAC nodes, 2 assignments, merge + service upgrade
        assert_eq!(statements.len(), 8);
        assert!(matches!(
            &statements[0],
            GraphStatement::MergeNode { label: NodeLabel::Ip, name, .. } if name == "10.0.0.1"
        ));
        assert!(matches!(
            &statements[6],
            GraphStatement::MergeConnection { endpoints: Endpoints::Ip { port: 80, .. }, detail: Some(_), .. }
        ));
        assert!(matches!(
            &statements[7],
            GraphStatement::UpgradeService { service_layer: 999, .. }
        ));
    }

    #[test]
    fn test_repeated_flow_only_updates_connection() {
        let packet = tcp_packet("10.0.0.1", "10.0.0.2");
        let statements = run(IngestConfig::default(), &[packet.clone(), packet]);
        assert_eq!(statements.len(), 10);
        assert!(statements[8..].iter().all(|s| matches!(
            s,
            GraphStatement::MergeConnection { .. } | GraphStatement::UpgradeService { .. }
        )));
    }

    #[test]
    fn test_reduced_mode_single_connection_statement() {
        let statements = run(IngestConfig::reduced(), &[tcp_packet("10.0.0.1", "10.0.0.2")]);
        assert_eq!(statements.len(), 7);
        assert!(matches!(
            statements.last(),
            Some(GraphStatement::MergeConnection { detail: None, .. })
        ));
    }

    #[test]
    fn test_ignored_mac_not_assigned() {
        let config = IngestConfig {
            ignored_macs: vec!["00:00:00:00:00:02".into()],
            ..Default::default()
        };
        let statements = run(config, &[tcp_packet("10.0.0.1", "10.0.0.2")]);
        let assigned: Vec<_> = statements
            .iter()
            .filter(|s| matches!(s, GraphStatement::MergeRelationship { rel_type: RelType::Assigned, .. }))
            .collect();
        assert_eq!(assigned.len(), 1);
    }

    #[test]
    fn test_missing_port_uses_sentinel() {
        let mut packet = tcp_packet("10.0.0.1", "10.0.0.2");
        packet.ports = None;
        packet.layers = vec!["eth".into(), "ip".into(), "icmp".into()];
        let statements = run(IngestConfig::reduced(), &[packet]);
        assert!(statements.last().unwrap().to_cypher().contains(r#"name: "-1/icmp", port: -1"#));
    }

    #[test]
    fn test_stats_count_packets_and_statements() {
        let mut ingestor = Ingestor::new(IngestConfig::default(), StatementLog::new()).unwrap();
        ingestor.process(&tcp_packet("10.0.0.1", "10.0.0.2")).unwrap();
        ingestor.process(&tcp_packet("10.0.0.1", "10.0.0.2")).unwrap();
        let stats = ingestor.stats();
        assert_eq!(stats.packets, 2);
        assert_eq!(stats.statements, 10);
        assert_eq!(stats.statements as usize, ingestor.sink().len());

        let ip = ingestor
            .cache_stats()
            .into_iter()
            .find(|(kind, _)| *kind == CacheKind::Ip)
            .map(|(_, s)| s)
            .unwrap();
        assert_eq!(ip.misses, 2);
        assert_eq!(ip.hits, 2);
    }

    #[test]
    fn test_relayed_wlan_frame_connects_each_hop() {
        let packet = PacketSummary {
            layers: vec!["radiotap".into(), "wlan".into(), "llc".into()],
            wlan: Some(WlanHeader {
                sa: Some("aa".into()),
                da: Some("bb".into()),
                ta: Some("cc".into()),
                ra: Some("dd".into()),
                fc_type_subtype: Some("0x0028".into()),
            }),
            ..Default::default()
        };
        let statements = run(IngestConfig::default(), &[packet]);

        let hops: Vec<(&str, &str)> = statements
            .iter()
            .filter_map(|s| match s {
                GraphStatement::MergeConnection {
                    endpoints: Endpoints::Mac { src, dst },
                    ..
                } => Some((src.as_str(), dst.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(hops, vec![("aa", "bb"), ("aa", "cc"), ("dd", "bb")]);

        let mac_nodes = statements
            .iter()
            .filter(|s| matches!(s, GraphStatement::MergeNode { label: NodeLabel::Mac, .. }))
            .count();
        assert_eq!(mac_nodes, 4);
    }

    #[test]
    fn test_sink_error_stops_processing() {
        let sink = LimitedSink { remaining: 3 };
        let mut ingestor = Ingestor::new(IngestConfig::default(), sink).unwrap();
        let err = ingestor
            .process(&tcp_packet("10.0.0.1", "10.0.0.2"))
            .unwrap_err();

        assert!(matches!(err, IngestError::Sink(ref msg) if msg == "connection closed"));
        assert_eq!(ingestor.stats().statements, 3);
        assert_eq!(ingestor.stats().packets, 0);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = Ingestor::new(IngestConfig::with_cache_capacity(0), StatementLog::new());
        assert!(matches!(result, Err(IngestError::InvalidConfig(_))));
    }
}
