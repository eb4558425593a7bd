// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph statements and their Cypher rendering

use std::collections::BTreeMap;
use std::fmt;

/// Node labels of the traffic graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeLabel {
    Ip,
    Mac,
    Ssid,
}

impl NodeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::Ip => "IP",
            NodeLabel::Mac => "MAC",
            NodeLabel::Ssid => "SSID",
        }
    }
}

/// Relationship types created outside of connection tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelType {
    Assigned,
    Advertises,
    Probes,
}

impl RelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelType::Assigned => "ASSIGNED",
            RelType::Advertises => "ADVERTISES",
            RelType::Probes => "PROBES",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Float(x) => write!(f, "{}", x),
            PropertyValue::Text(s) => write!(f, "\"{}\"", escape(s)),
        }
    }
}

/// Per-packet measurements folded into a connection in full mode
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDetail {
    pub time: f64,
    pub length: u64,
    pub service: String,
    pub service_layer: i64,
}

/// Endpoints of a `CONNECTED` relationship
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoints {
    /// IP to IP, keyed by destination port; `-1` when the frame had none
    Ip { src: String, dst: String, port: i64 },
    Mac { src: String, dst: String },
}

/// A single write against the traffic graph
#[derive(Debug, Clone, PartialEq)]
pub enum GraphStatement {
    MergeNode {
        label: NodeLabel,
        name: String,
        properties: BTreeMap<String, PropertyValue>,
    },
    MergeRelationship {
        from: String,
        to: String,
        rel_type: RelType,
    },
    /// Create or update a connection. Without detail only the relationship is merged.
    MergeConnection {
        endpoints: Endpoints,
        protocol: String,
        detail: Option<ConnectionDetail>,
    },
    /// Raise a connection's service when a more specific layer is seen
    UpgradeService {
        endpoints: Endpoints,
        protocol: String,
        service: String,
        service_layer: i64,
    },
    ProbeResponse {
        from: String,
        to: String,
    },
}

impl GraphStatement {
    pub fn to_cypher(&self) -> String {
        match self {
            GraphStatement::MergeNode {
                label,
                name,
                properties,
            } => {
                let mut q = format!(
                    "MERGE (n:{} {{name: \"{}\"}})",
                    label.as_str(),
                    escape(name)
                );
                if !properties.is_empty() {
                    q.push_str(&format!(" SET n += {}", property_map(properties)));
                }
                q.push_str(" RETURN n");
                q
            }
            GraphStatement::MergeRelationship { from, to, rel_type } => format!(
                "MATCH (a {{name: \"{}\"}}) MATCH (b {{name: \"{}\"}}) MERGE (a)-[r:{}]->(b) RETURN r",
                escape(from),
                escape(to),
                rel_type.as_str()
            ),
            GraphStatement::MergeConnection {
                endpoints,
                protocol,
                detail,
            } => {
                let mut q = connection_merge(endpoints, protocol);
                if let Some(d) = detail {
                    q.push_str(&format!(
                        "\n    ON CREATE\n        SET r += {{first_seen: {t}, last_seen: {t}, data_size: {len}, service: \"{svc}\", service_layer: {layer}, count: 1}}\
                         \n    ON MATCH\
                         \n        SET r.first_seen = (CASE WHEN {t} > r.first_seen THEN r.first_seen ELSE {t} END),\
                         \n            r.last_seen = (CASE WHEN {t} < r.last_seen THEN r.last_seen ELSE {t} END),\
                         \n            r.data_size = r.data_size + {len},\
                         \n            r.count = r.count + 1",
                        t = d.time,
                        len = d.length,
                        svc = escape(&d.service),
                        layer = d.service_layer,
                    ));
                }
                q.push_str("\nRETURN r");
                q
            }
            GraphStatement::UpgradeService {
                endpoints,
                protocol,
                service,
                service_layer,
            } => {
                let mut q = connection_merge(endpoints, protocol);
                q.push_str(&format!(
                    "\n    SET r.service = (CASE WHEN {layer} > r.service_layer THEN \"{svc}\" ELSE r.service END)\
                     \n    SET r.service_layer = (CASE WHEN {layer} > r.service_layer THEN {layer} ELSE r.service_layer END)\
                     \nRETURN r.service",
                    layer = service_layer,
                    svc = escape(service),
                ));
                q
            }
            GraphStatement::ProbeResponse { from, to } => format!(
                "MATCH (n:MAC {{name: \"{}\"}})\nMATCH (m:MAC {{name: \"{}\"}})\nMERGE (n)-[r:PROBE_RESPONSE]->(m)\nRETURN r",
                escape(from),
                escape(to)
            ),
        }
    }
}

impl fmt::Display for GraphStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cypher())
    }
}

fn connection_merge(endpoints: &Endpoints, protocol: &str) -> String {
    let proto = escape(protocol);
    match endpoints {
        Endpoints::Ip { src, dst, port } => format!(
            "MATCH (n:IP {{name: \"{}\"}})\nMATCH (m:IP {{name: \"{}\"}})\nMERGE (n)-[r:CONNECTED {{name: \"{port}/{proto}\", port: {port}, protocol: \"{proto}\"}}]->(m)",
            escape(src),
            escape(dst),
            port = port,
            proto = proto,
        ),
        Endpoints::Mac { src, dst } => format!(
            "MATCH (n:MAC {{name: \"{}\"}})\nMATCH (m:MAC {{name: \"{}\"}})\nMERGE (n)-[r:CONNECTED {{name: \"{proto}\", protocol: \"{proto}\"}}]->(m)",
            escape(src),
            escape(dst),
            proto = proto,
        ),
    }
}

fn property_map(properties: &BTreeMap<String, PropertyValue>) -> String {
    let body: Vec<String> = properties
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect();
    format!("{{{}}}", body.join(", "))
}

/// Escape a value for use inside a double-quoted Cypher string
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
