use k8s_openapi::api::rbac::v1::ClusterRole;
use serde::Serialize;

use super::role::{PolicyRuleData, policy_rules};
use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils;

pub const RESOURCE_TYPE: &str = "clusterrole";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub rules: Vec<PolicyRuleData>,
    pub rule_count: usize,
    pub aggregation_selectors: Vec<String>,
}

pub fn project(role: &ClusterRole) -> ClusterRoleData {
    let rules = policy_rules(role.rules.as_ref());
    ClusterRoleData {
        metadata: CommonMeta::from_meta(&role.metadata),
        rule_count: rules.len(),
        rules,
        aggregation_selectors: role
            .aggregation_rule
            .as_ref()
            .and_then(|a| a.cluster_role_selectors.as_ref())
            .map(|selectors| selectors.iter().map(utils::selector_string).collect())
            .unwrap_or_default(),
    }
}

pub fn collector(source: impl ObjectSource<ClusterRole> + 'static) -> Collector<ClusterRole> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
