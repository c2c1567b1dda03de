use k8s_openapi::api::networking::v1::{NetworkPolicy, NetworkPolicyPeer, NetworkPolicyPort};
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils;

pub const RESOURCE_TYPE: &str = "networkpolicy";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerData {
    pub pod_selector: Option<String>,
    pub namespace_selector: Option<String>,
    pub ip_block: Option<String>,
    pub except: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortData {
    pub protocol: String,
    pub port: Option<String>,
    pub end_port: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleData {
    pub peers: Vec<PeerData>,
    pub ports: Vec<PortData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicyData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub pod_selector: String,
    pub policy_types: Vec<String>,
    pub policy_types_defaulted: bool,
    pub ingress_rules: Vec<RuleData>,
    pub egress_rules: Vec<RuleData>,
    pub ingress_rule_count: usize,
    pub egress_rule_count: usize,
}

fn peer(p: &NetworkPolicyPeer) -> PeerData {
    PeerData {
        pod_selector: p.pod_selector.as_ref().map(utils::selector_string),
        namespace_selector: p.namespace_selector.as_ref().map(utils::selector_string),
        ip_block: p.ip_block.as_ref().map(|b| b.cidr.clone()),
        except: p
            .ip_block
            .as_ref()
            .and_then(|b| b.except.clone())
            .unwrap_or_default(),
    }
}

fn port(p: &NetworkPolicyPort) -> PortData {
    PortData {
        protocol: p.protocol.clone().unwrap_or_else(|| "TCP".to_string()),
        port: utils::int_or_string(p.port.as_ref()),
        end_port: p.end_port,
    }
}

fn rule(peers: Option<&Vec<NetworkPolicyPeer>>, ports: Option<&Vec<NetworkPolicyPort>>) -> RuleData {
    RuleData {
        peers: peers.into_iter().flatten().map(peer).collect(),
        ports: ports.into_iter().flatten().map(port).collect(),
    }
}

/// Policy types as declared, or the API's implied default when none are:
/// `Ingress` always, plus `Egress` when egress rules exist.
pub fn effective_policy_types(declared: Option<&[String]>, has_egress: bool) -> (Vec<String>, bool) {
    match declared {
        Some(types) if !types.is_empty() => (types.to_vec(), false),
        _ => {
            let mut types = vec!["Ingress".to_string()];
            if has_egress {
                types.push("Egress".to_string());
            }
            (types, true)
        }
    }
}

pub fn project(np: &NetworkPolicy) -> NetworkPolicyData {
    let spec = np.spec.as_ref();

    let ingress_rules: Vec<RuleData> = spec
        .and_then(|s| s.ingress.as_ref())
        .map(|rules| {
            rules
                .iter()
                .map(|r| rule(r.from.as_ref(), r.ports.as_ref()))
                .collect()
        })
        .unwrap_or_default();
    let egress_rules: Vec<RuleData> = spec
        .and_then(|s| s.egress.as_ref())
        .map(|rules| {
            rules
                .iter()
                .map(|r| rule(r.to.as_ref(), r.ports.as_ref()))
                .collect()
        })
        .unwrap_or_default();

    let (policy_types, policy_types_defaulted) = effective_policy_types(
        spec.and_then(|s| s.policy_types.as_deref()),
        !egress_rules.is_empty(),
    );

    NetworkPolicyData {
        metadata: CommonMeta::from_meta(&np.metadata),
        pod_selector: spec
            .map(|s| utils::selector_string(&s.pod_selector))
            .unwrap_or_default(),
        policy_types,
        policy_types_defaulted,
        ingress_rule_count: ingress_rules.len(),
        egress_rule_count: egress_rules.len(),
        ingress_rules,
        egress_rules,
    }
}

pub fn collector(source: impl ObjectSource<NetworkPolicy> + 'static) -> Collector<NetworkPolicy> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
