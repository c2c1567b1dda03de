use k8s_openapi::api::batch::v1::CronJob;
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils;

pub const RESOURCE_TYPE: &str = "cronjob";

const DEFAULT_CONCURRENCY_POLICY: &str = "Allow";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJobData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub schedule: String,
    pub time_zone: String,
    pub suspend: bool,
    pub concurrency_policy: String,
    pub starting_deadline_seconds: Option<i64>,
    pub successful_jobs_history_limit: i32,
    pub failed_jobs_history_limit: i32,
    pub active_jobs: Vec<String>,
    pub last_schedule_time: Option<i64>,
    pub last_successful_time: Option<i64>,
}

pub fn project(cj: &CronJob) -> CronJobData {
    let spec = cj.spec.as_ref();
    let status = cj.status.as_ref();

    CronJobData {
        metadata: CommonMeta::from_meta(&cj.metadata),
        schedule: spec.map(|s| s.schedule.clone()).unwrap_or_default(),
        time_zone: spec.and_then(|s| s.time_zone.clone()).unwrap_or_default(),
        suspend: spec.and_then(|s| s.suspend).unwrap_or(false),
        concurrency_policy: spec
            .and_then(|s| s.concurrency_policy.clone())
            .unwrap_or_else(|| DEFAULT_CONCURRENCY_POLICY.to_string()),
        starting_deadline_seconds: spec.and_then(|s| s.starting_deadline_seconds),
        successful_jobs_history_limit: spec
            .and_then(|s| s.successful_jobs_history_limit)
            .unwrap_or(3),
        failed_jobs_history_limit: spec.and_then(|s| s.failed_jobs_history_limit).unwrap_or(1),
        active_jobs: status
            .and_then(|s| s.active.as_ref())
            .map(|refs| refs.iter().filter_map(|r| r.name.clone()).collect())
            .unwrap_or_default(),
        last_schedule_time: utils::unix_time(status.and_then(|s| s.last_schedule_time.as_ref())),
        last_successful_time: utils::unix_time(
            status.and_then(|s| s.last_successful_time.as_ref()),
        ),
    }
}

pub fn collector(source: impl ObjectSource<CronJob> + 'static) -> Collector<CronJob> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
