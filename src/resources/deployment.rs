use k8s_openapi::api::apps::v1::Deployment;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils::{self, Conditions};

pub const RESOURCE_TYPE: &str = "deployment";

const KNOWN_CONDITIONS: &[&str] = &["Available", "Progressing", "ReplicaFailure"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub desired_replicas: i32,
    pub current_replicas: i32,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub unavailable_replicas: i32,
    pub updated_replicas: i32,
    pub observed_generation: i64,
    pub generation: i64,
    pub paused: bool,
    pub strategy_type: String,
    pub max_surge: Option<String>,
    pub max_unavailable: Option<String>,
    pub min_ready_seconds: i32,
    pub available: Option<bool>,
    pub progressing: Option<bool>,
    pub replica_failure: Option<bool>,
    pub conditions: BTreeMap<String, Option<bool>>,
}

pub fn project(deployment: &Deployment) -> DeploymentData {
    let spec = deployment.spec.as_ref();
    let status = deployment.status.as_ref();
    let strategy = spec.and_then(|s| s.strategy.as_ref());
    let rolling = strategy.and_then(|s| s.rolling_update.as_ref());
    let conditions = Conditions::partition(
        status.and_then(|s| s.conditions.as_deref()),
        KNOWN_CONDITIONS,
    );

    DeploymentData {
        metadata: CommonMeta::from_meta(&deployment.metadata),
        // The API defaults an unset replica count to 1.
        desired_replicas: spec.and_then(|s| s.replicas).unwrap_or(1),
        current_replicas: status.and_then(|s| s.replicas).unwrap_or(0),
        ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
        available_replicas: status.and_then(|s| s.available_replicas).unwrap_or(0),
        unavailable_replicas: status.and_then(|s| s.unavailable_replicas).unwrap_or(0),
        updated_replicas: status.and_then(|s| s.updated_replicas).unwrap_or(0),
        observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
        generation: deployment.metadata.generation.unwrap_or(0),
        paused: spec.and_then(|s| s.paused).unwrap_or(false),
        strategy_type: strategy
            .and_then(|s| s.type_.clone())
            .unwrap_or_else(|| "RollingUpdate".to_string()),
        max_surge: utils::int_or_string(rolling.and_then(|r| r.max_surge.as_ref())),
        max_unavailable: utils::int_or_string(rolling.and_then(|r| r.max_unavailable.as_ref())),
        min_ready_seconds: spec.and_then(|s| s.min_ready_seconds).unwrap_or(0),
        available: conditions.get("Available"),
        progressing: conditions.get("Progressing"),
        replica_failure: conditions.get("ReplicaFailure"),
        conditions: conditions.other,
    }
}

pub fn collector(source: impl ObjectSource<Deployment> + 'static) -> Collector<Deployment> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
