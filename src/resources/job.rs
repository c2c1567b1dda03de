use k8s_openapi::api::batch::v1::Job;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils::{self, Conditions};

pub const RESOURCE_TYPE: &str = "job";

const KNOWN_CONDITIONS: &[&str] = &["Complete", "Failed", "Suspended"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub parallelism: i32,
    pub completions: Option<i32>,
    pub backoff_limit: i32,
    pub active_deadline_seconds: Option<i64>,
    pub suspend: bool,
    pub completion_mode: String,
    pub active: i32,
    pub succeeded: i32,
    pub failed: i32,
    pub ready: i32,
    pub start_time: Option<i64>,
    pub completion_time: Option<i64>,
    pub complete: Option<bool>,
    pub failed_condition: Option<bool>,
    pub suspended: Option<bool>,
    pub conditions: BTreeMap<String, Option<bool>>,
}

pub fn project(job: &Job) -> JobData {
    let spec = job.spec.as_ref();
    let status = job.status.as_ref();
    let conditions = Conditions::partition(
        status.and_then(|s| s.conditions.as_deref()),
        KNOWN_CONDITIONS,
    );

    JobData {
        metadata: CommonMeta::from_meta(&job.metadata),
        parallelism: spec.and_then(|s| s.parallelism).unwrap_or(1),
        completions: spec.and_then(|s| s.completions),
        backoff_limit: spec.and_then(|s| s.backoff_limit).unwrap_or(6),
        active_deadline_seconds: spec.and_then(|s| s.active_deadline_seconds),
        suspend: spec.and_then(|s| s.suspend).unwrap_or(false),
        completion_mode: spec
            .and_then(|s| s.completion_mode.clone())
            .unwrap_or_else(|| "NonIndexed".to_string()),
        active: status.and_then(|s| s.active).unwrap_or(0),
        succeeded: status.and_then(|s| s.succeeded).unwrap_or(0),
        failed: status.and_then(|s| s.failed).unwrap_or(0),
        ready: status.and_then(|s| s.ready).unwrap_or(0),
        start_time: utils::unix_time(status.and_then(|s| s.start_time.as_ref())),
        completion_time: utils::unix_time(status.and_then(|s| s.completion_time.as_ref())),
        complete: conditions.get("Complete"),
        failed_condition: conditions.get("Failed"),
        suspended: conditions.get("Suspended"),
        conditions: conditions.other,
    }
}

pub fn collector(source: impl ObjectSource<Job> + 'static) -> Collector<Job> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
