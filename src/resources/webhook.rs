//! Validating and mutating webhook configurations share one payload shape;
//! only mutating webhooks carry a reinvocation policy.

use k8s_openapi::api::admissionregistration::v1::{
    MatchCondition, MutatingWebhook, MutatingWebhookConfiguration, RuleWithOperations,
    ValidatingWebhook, ValidatingWebhookConfiguration, WebhookClientConfig,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils::{self, RuleData};

pub const VALIDATING_RESOURCE_TYPE: &str = "validatingwebhookconfiguration";
pub const MUTATING_RESOURCE_TYPE: &str = "mutatingwebhookconfiguration";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConditionData {
    pub name: String,
    pub expression: String,
}

impl From<&MatchCondition> for MatchConditionData {
    fn from(c: &MatchCondition) -> Self {
        Self {
            name: c.name.clone(),
            expression: c.expression.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookData {
    pub name: String,
    pub failure_policy: String,
    pub match_policy: String,
    pub side_effects: String,
    pub timeout_seconds: i32,
    pub admission_review_versions: Vec<String>,
    pub service_namespace: String,
    pub service_name: String,
    pub service_path: String,
    pub service_port: Option<i32>,
    pub url: String,
    pub namespace_selector: String,
    pub object_selector: String,
    pub rules: Vec<RuleData>,
    pub match_conditions: Vec<MatchConditionData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reinvocation_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfigurationData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub webhooks: Vec<WebhookData>,
    pub webhook_count: usize,
}

pub fn match_conditions(conditions: Option<&Vec<MatchCondition>>) -> Vec<MatchConditionData> {
    conditions
        .into_iter()
        .flatten()
        .map(MatchConditionData::from)
        .collect()
}

/// Fields common to both webhook flavours.
struct WebhookFields<'a> {
    name: &'a str,
    failure_policy: Option<&'a String>,
    match_policy: Option<&'a String>,
    side_effects: &'a str,
    timeout_seconds: Option<i32>,
    admission_review_versions: &'a [String],
    client_config: &'a WebhookClientConfig,
    namespace_selector: &'a Option<LabelSelector>,
    object_selector: &'a Option<LabelSelector>,
    rules: Option<&'a Vec<RuleWithOperations>>,
    match_conditions: Option<&'a Vec<MatchCondition>>,
}

impl WebhookFields<'_> {
    fn into_data(self, reinvocation_policy: Option<String>) -> WebhookData {
        let service = self.client_config.service.as_ref();
        WebhookData {
            name: self.name.to_string(),
            failure_policy: self
                .failure_policy
                .cloned()
                .unwrap_or_else(|| "Fail".to_string()),
            match_policy: self
                .match_policy
                .cloned()
                .unwrap_or_else(|| "Equivalent".to_string()),
            side_effects: self.side_effects.to_string(),
            timeout_seconds: self.timeout_seconds.unwrap_or(10),
            admission_review_versions: self.admission_review_versions.to_vec(),
            service_namespace: service.map(|s| s.namespace.clone()).unwrap_or_default(),
            service_name: service.map(|s| s.name.clone()).unwrap_or_default(),
            service_path: service.and_then(|s| s.path.clone()).unwrap_or_default(),
            service_port: service.map(|s| s.port.unwrap_or(443)),
            url: self.client_config.url.clone().unwrap_or_default(),
            namespace_selector: utils::selector_string(self.namespace_selector),
            object_selector: utils::selector_string(self.object_selector),
            rules: self
                .rules
                .into_iter()
                .flatten()
                .map(RuleData::from)
                .collect(),
            match_conditions: match_conditions(self.match_conditions),
            reinvocation_policy,
        }
    }
}

pub fn validating_webhook(w: &ValidatingWebhook) -> WebhookData {
    WebhookFields {
        name: &w.name,
        failure_policy: w.failure_policy.as_ref(),
        match_policy: w.match_policy.as_ref(),
        side_effects: &w.side_effects,
        timeout_seconds: w.timeout_seconds,
        admission_review_versions: &w.admission_review_versions,
        client_config: &w.client_config,
        namespace_selector: &w.namespace_selector,
        object_selector: &w.object_selector,
        rules: w.rules.as_ref(),
        match_conditions: w.match_conditions.as_ref(),
    }
    .into_data(None)
}

pub fn mutating_webhook(w: &MutatingWebhook) -> WebhookData {
    WebhookFields {
        name: &w.name,
        failure_policy: w.failure_policy.as_ref(),
        match_policy: w.match_policy.as_ref(),
        side_effects: &w.side_effects,
        timeout_seconds: w.timeout_seconds,
        admission_review_versions: &w.admission_review_versions,
        client_config: &w.client_config,
        namespace_selector: &w.namespace_selector,
        object_selector: &w.object_selector,
        rules: w.rules.as_ref(),
        match_conditions: w.match_conditions.as_ref(),
    }
    .into_data(Some(
        w.reinvocation_policy
            .clone()
            .unwrap_or_else(|| "Never".to_string()),
    ))
}

pub fn project_validating(cfg: &ValidatingWebhookConfiguration) -> WebhookConfigurationData {
    let webhooks: Vec<WebhookData> = cfg
        .webhooks
        .iter()
        .flatten()
        .map(validating_webhook)
        .collect();
    WebhookConfigurationData {
        metadata: CommonMeta::from_meta(&cfg.metadata),
        webhook_count: webhooks.len(),
        webhooks,
    }
}

pub fn project_mutating(cfg: &MutatingWebhookConfiguration) -> WebhookConfigurationData {
    let webhooks: Vec<WebhookData> = cfg
        .webhooks
        .iter()
        .flatten()
        .map(mutating_webhook)
        .collect();
    WebhookConfigurationData {
        metadata: CommonMeta::from_meta(&cfg.metadata),
        webhook_count: webhooks.len(),
        webhooks,
    }
}

pub fn validating_collector(
    source: impl ObjectSource<ValidatingWebhookConfiguration> + 'static,
) -> Collector<ValidatingWebhookConfiguration> {
    Collector::new(VALIDATING_RESOURCE_TYPE, Scope::Cluster, source, project_validating)
}

pub fn mutating_collector(
    source: impl ObjectSource<MutatingWebhookConfiguration> + 'static,
) -> Collector<MutatingWebhookConfiguration> {
    Collector::new(MUTATING_RESOURCE_TYPE, Scope::Cluster, source, project_mutating)
}
