use k8s_openapi::api::core::v1::{Node, NodeAddress, Taint};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::quantity;
use crate::types::CommonMeta;
use crate::utils::Conditions;

pub const RESOURCE_TYPE: &str = "node";

const KNOWN_CONDITIONS: &[&str] = &[
    "Ready",
    "MemoryPressure",
    "DiskPressure",
    "PIDPressure",
    "NetworkUnavailable",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub unschedulable: bool,
    pub taints: Vec<String>,
    #[serde(rename = "podCIDR")]
    pub pod_cidr: String,
    #[serde(rename = "providerID")]
    pub provider_id: String,
    pub kubelet_version: String,
    pub os_image: String,
    pub kernel_version: String,
    pub container_runtime_version: String,
    pub architecture: String,
    pub operating_system: String,
    #[serde(rename = "internalIP")]
    pub internal_ip: String,
    #[serde(rename = "externalIP")]
    pub external_ip: String,
    pub hostname: String,
    pub capacity: BTreeMap<String, String>,
    pub allocatable: BTreeMap<String, String>,
    pub ready: Option<bool>,
    pub memory_pressure: Option<bool>,
    pub disk_pressure: Option<bool>,
    pub pid_pressure: Option<bool>,
    pub network_unavailable: Option<bool>,
    pub conditions: BTreeMap<String, Option<bool>>,
}

/// `key=value:effect`, or `key:effect` for taints without a value.
pub fn taint_string(taint: &Taint) -> String {
    match taint.value.as_deref() {
        Some(value) if !value.is_empty() => format!("{}={}:{}", taint.key, value, taint.effect),
        _ => format!("{}:{}", taint.key, taint.effect),
    }
}

fn address(addresses: Option<&Vec<NodeAddress>>, kind: &str) -> String {
    addresses
        .into_iter()
        .flatten()
        .find(|a| a.type_ == kind)
        .map(|a| a.address.clone())
        .unwrap_or_default()
}

pub fn project(node: &Node) -> NodeData {
    let spec = node.spec.as_ref();
    let status = node.status.as_ref();
    let info = status.and_then(|s| s.node_info.clone()).unwrap_or_default();
    let addresses = status.and_then(|s| s.addresses.as_ref());
    let conditions = Conditions::partition(
        status.and_then(|s| s.conditions.as_deref()),
        KNOWN_CONDITIONS,
    );

    NodeData {
        metadata: CommonMeta::from_meta(&node.metadata),
        unschedulable: spec.and_then(|s| s.unschedulable).unwrap_or(false),
        taints: spec
            .and_then(|s| s.taints.as_ref())
            .map(|taints| taints.iter().map(taint_string).collect())
            .unwrap_or_default(),
        pod_cidr: spec.and_then(|s| s.pod_cidr.clone()).unwrap_or_default(),
        provider_id: spec.and_then(|s| s.provider_id.clone()).unwrap_or_default(),
        kubelet_version: info.kubelet_version,
        os_image: info.os_image,
        kernel_version: info.kernel_version,
        container_runtime_version: info.container_runtime_version,
        architecture: info.architecture,
        operating_system: info.operating_system,
        internal_ip: address(addresses, "InternalIP"),
        external_ip: address(addresses, "ExternalIP"),
        hostname: address(addresses, "Hostname"),
        capacity: quantity::canonical_map(status.and_then(|s| s.capacity.as_ref())),
        allocatable: quantity::canonical_map(status.and_then(|s| s.allocatable.as_ref())),
        ready: conditions.get("Ready"),
        memory_pressure: conditions.get("MemoryPressure"),
        disk_pressure: conditions.get("DiskPressure"),
        pid_pressure: conditions.get("PIDPressure"),
        network_unavailable: conditions.get("NetworkUnavailable"),
        conditions: conditions.other,
    }
}

pub fn collector(source: impl ObjectSource<Node> + 'static) -> Collector<Node> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
