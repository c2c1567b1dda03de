use k8s_openapi::api::core::v1::{Endpoints, Service};
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils;

pub const RESOURCE_TYPE: &str = "service";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePortData {
    pub name: String,
    pub protocol: String,
    pub port: i32,
    pub target_port: Option<String>,
    pub node_port: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(rename = "clusterIP")]
    pub cluster_ip: String,
    #[serde(rename = "externalIPs")]
    pub external_ips: Vec<String>,
    pub load_balancer_ingress: Vec<String>,
    pub external_name: String,
    pub session_affinity: String,
    pub selector: BTreeMap<String, String>,
    pub ports: Vec<ServicePortData>,
    pub endpoint_count: usize,
    pub external_traffic_policy: String,
    pub internal_traffic_policy: String,
}

/// Ready addresses across every subset of the Endpoints object named like the
/// service; zero when there is none.
pub fn count_endpoints_for_service(
    endpoints: &dyn ObjectSource<Endpoints>,
    namespace: &str,
    name: &str,
) -> usize {
    endpoints
        .get(namespace, name)
        .and_then(|ep| {
            ep.subsets.as_ref().map(|subsets| {
                subsets
                    .iter()
                    .map(|s| s.addresses.as_ref().map(Vec::len).unwrap_or(0))
                    .sum()
            })
        })
        .unwrap_or(0)
}

pub fn project(svc: &Service, endpoints: &dyn ObjectSource<Endpoints>) -> ServiceData {
    let spec = svc.spec.as_ref();
    let text = |value: Option<&String>| value.cloned().unwrap_or_default();

    ServiceData {
        metadata: CommonMeta::from_meta(&svc.metadata),
        type_: spec
            .and_then(|s| s.type_.clone())
            .unwrap_or_else(|| "ClusterIP".to_string()),
        cluster_ip: text(spec.and_then(|s| s.cluster_ip.as_ref())),
        external_ips: spec.and_then(|s| s.external_ips.clone()).unwrap_or_default(),
        load_balancer_ingress: svc
            .status
            .as_ref()
            .and_then(|s| s.load_balancer.as_ref())
            .and_then(|lb| lb.ingress.as_ref())
            .map(|ingress| {
                ingress
                    .iter()
                    .filter_map(|i| i.ip.clone().or_else(|| i.hostname.clone()))
                    .collect()
            })
            .unwrap_or_default(),
        external_name: text(spec.and_then(|s| s.external_name.as_ref())),
        session_affinity: spec
            .and_then(|s| s.session_affinity.clone())
            .unwrap_or_else(|| "None".to_string()),
        selector: spec.and_then(|s| s.selector.clone()).unwrap_or_default(),
        ports: spec
            .and_then(|s| s.ports.as_ref())
            .map(|ports| {
                ports
                    .iter()
                    .map(|p| ServicePortData {
                        name: p.name.clone().unwrap_or_default(),
                        protocol: p.protocol.clone().unwrap_or_else(|| "TCP".to_string()),
                        port: p.port,
                        target_port: utils::int_or_string(p.target_port.as_ref()),
                        node_port: p.node_port,
                    })
                    .collect()
            })
            .unwrap_or_default(),
        endpoint_count: count_endpoints_for_service(
            endpoints,
            &svc.namespace().unwrap_or_default(),
            &svc.name_any(),
        ),
        external_traffic_policy: text(spec.and_then(|s| s.external_traffic_policy.as_ref())),
        internal_traffic_policy: text(spec.and_then(|s| s.internal_traffic_policy.as_ref())),
    }
}

/// Services joined with the Endpoints cache by namespace and name.
///
/// The two caches update independently, so a pass may see a service before
/// or after its endpoints change.
pub fn collector<S, E>(services: S, endpoints: E) -> Collector<Service>
where
    S: ObjectSource<Service> + 'static,
    E: ObjectSource<Endpoints> + 'static,
{
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, services, move |svc: &Service| {
        project(svc, &endpoints)
    })
}
