use k8s_openapi::api::rbac::v1::{PolicyRule, Role};
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "role";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRuleData {
    pub api_groups: Vec<String>,
    pub resources: Vec<String>,
    pub verbs: Vec<String>,
    pub resource_names: Vec<String>,
    #[serde(rename = "nonResourceURLs")]
    pub non_resource_urls: Vec<String>,
}

impl From<&PolicyRule> for PolicyRuleData {
    fn from(rule: &PolicyRule) -> Self {
        Self {
            api_groups: rule.api_groups.clone().unwrap_or_default(),
            resources: rule.resources.clone().unwrap_or_default(),
            verbs: rule.verbs.clone(),
            resource_names: rule.resource_names.clone().unwrap_or_default(),
            non_resource_urls: rule.non_resource_urls.clone().unwrap_or_default(),
        }
    }
}

pub fn policy_rules(rules: Option<&Vec<PolicyRule>>) -> Vec<PolicyRuleData> {
    rules.into_iter().flatten().map(PolicyRuleData::from).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub rules: Vec<PolicyRuleData>,
    pub rule_count: usize,
}

pub fn project(role: &Role) -> RoleData {
    let rules = policy_rules(role.rules.as_ref());
    RoleData {
        metadata: CommonMeta::from_meta(&role.metadata),
        rule_count: rules.len(),
        rules,
    }
}

pub fn collector(source: impl ObjectSource<Role> + 'static) -> Collector<Role> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
