use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Container, ContainerState, ContainerStatus, Pod};
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::quantity;
use crate::types::{CommonMeta, LogEntry};
use crate::utils::{self, Conditions};

pub const RESOURCE_TYPE: &str = "pod";
pub const CONTAINER_RESOURCE_TYPE: &str = "container";
pub const INIT_CONTAINER_RESOURCE_TYPE: &str = "init_container";

const DEFAULT_QOS_CLASS: &str = "BestEffort";
const KNOWN_CONDITIONS: &[&str] = &["Ready", "Initialized", "ContainersReady", "PodScheduled"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub phase: String,
    pub qos_class: String,
    pub node_name: String,
    #[serde(rename = "podIP")]
    pub pod_ip: String,
    #[serde(rename = "hostIP")]
    pub host_ip: String,
    pub service_account: String,
    pub restart_policy: String,
    pub priority_class_name: String,
    pub status_reason: String,
    pub status_message: String,
    pub start_time: Option<i64>,
    pub deletion_timestamp: Option<i64>,
    pub restart_count: i32,
    pub container_count: usize,
    pub init_container_count: usize,
    pub resource_requests: BTreeMap<String, String>,
    pub resource_limits: BTreeMap<String, String>,
    pub ready: Option<bool>,
    pub initialized: Option<bool>,
    pub containers_ready: Option<bool>,
    pub pod_scheduled: Option<bool>,
    pub conditions: BTreeMap<String, Option<bool>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStateKind {
    Running,
    Waiting,
    Terminated,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerData {
    pub pod_name: String,
    pub image: String,
    #[serde(rename = "imageID")]
    pub image_id: String,
    #[serde(rename = "containerID")]
    pub container_id: String,
    pub ready: bool,
    pub started: bool,
    pub restart_count: i32,
    pub state: ContainerStateKind,
    pub state_running: bool,
    pub state_waiting: bool,
    pub state_terminated: bool,
    pub started_at: Option<i64>,
    pub waiting_reason: String,
    pub waiting_message: String,
    pub exit_code: Option<i32>,
    pub terminated_reason: String,
    pub terminated_message: String,
    pub terminated_started_at: Option<i64>,
    pub terminated_finished_at: Option<i64>,
    pub last_terminated_reason: String,
    pub last_terminated_exit_code: Option<i32>,
    pub last_terminated_finished_at: Option<i64>,
    pub resource_requests: BTreeMap<String, String>,
    pub resource_limits: BTreeMap<String, String>,
}

pub fn project(pod: &Pod) -> PodData {
    let spec = pod.spec.as_ref();
    let status = pod.status.as_ref();
    let containers = spec.map(|s| s.containers.as_slice()).unwrap_or_default();
    let conditions = Conditions::partition(status.and_then(|s| s.conditions.as_deref()), KNOWN_CONDITIONS);

    let text = |value: Option<&String>| value.cloned().unwrap_or_default();

    PodData {
        metadata: CommonMeta::from_meta(&pod.metadata),
        phase: text(status.and_then(|s| s.phase.as_ref())),
        qos_class: status
            .and_then(|s| s.qos_class.clone())
            .unwrap_or_else(|| DEFAULT_QOS_CLASS.to_string()),
        node_name: text(spec.and_then(|s| s.node_name.as_ref())),
        pod_ip: text(status.and_then(|s| s.pod_ip.as_ref())),
        host_ip: text(status.and_then(|s| s.host_ip.as_ref())),
        service_account: text(spec.and_then(|s| s.service_account_name.as_ref())),
        restart_policy: text(spec.and_then(|s| s.restart_policy.as_ref())),
        priority_class_name: text(spec.and_then(|s| s.priority_class_name.as_ref())),
        status_reason: text(status.and_then(|s| s.reason.as_ref())),
        status_message: text(status.and_then(|s| s.message.as_ref())),
        start_time: utils::unix_time(status.and_then(|s| s.start_time.as_ref())),
        deletion_timestamp: utils::unix_time(pod.metadata.deletion_timestamp.as_ref()),
        restart_count: status
            .and_then(|s| s.container_statuses.as_ref())
            .map(|statuses| statuses.iter().map(|cs| cs.restart_count).sum())
            .unwrap_or(0),
        container_count: containers.len(),
        init_container_count: spec
            .and_then(|s| s.init_containers.as_ref())
            .map(Vec::len)
            .unwrap_or(0),
        resource_requests: quantity::sum_maps(
            containers
                .iter()
                .map(|c| c.resources.as_ref().and_then(|r| r.requests.as_ref())),
        ),
        resource_limits: quantity::sum_maps(
            containers
                .iter()
                .map(|c| c.resources.as_ref().and_then(|r| r.limits.as_ref())),
        ),
        ready: conditions.get("Ready"),
        initialized: conditions.get("Initialized"),
        containers_ready: conditions.get("ContainersReady"),
        pod_scheduled: conditions.get("PodScheduled"),
        conditions: conditions.other,
    }
}

fn state_kind(state: Option<&ContainerState>) -> ContainerStateKind {
    match state {
        Some(s) if s.running.is_some() => ContainerStateKind::Running,
        Some(s) if s.waiting.is_some() => ContainerStateKind::Waiting,
        Some(s) if s.terminated.is_some() => ContainerStateKind::Terminated,
        _ => ContainerStateKind::Unknown,
    }
}

/// Project one container of `pod`, paired with its status when reported.
pub fn project_container(pod: &Pod, container: &Container, status: Option<&ContainerStatus>) -> ContainerData {
    let state = status.and_then(|s| s.state.as_ref());
    let kind = state_kind(state);
    let running = state.and_then(|s| s.running.as_ref());
    let waiting = state.and_then(|s| s.waiting.as_ref());
    let terminated = state.and_then(|s| s.terminated.as_ref());
    let last_terminated = status
        .and_then(|s| s.last_state.as_ref())
        .and_then(|s| s.terminated.as_ref());
    let resources = container.resources.as_ref();

    ContainerData {
        pod_name: pod.name_any(),
        image: container.image.clone().unwrap_or_default(),
        image_id: status.map(|s| s.image_id.clone()).unwrap_or_default(),
        container_id: status.and_then(|s| s.container_id.clone()).unwrap_or_default(),
        ready: status.is_some_and(|s| s.ready),
        started: status.and_then(|s| s.started).unwrap_or(false),
        restart_count: status.map(|s| s.restart_count).unwrap_or(0),
        state: kind,
        state_running: kind == ContainerStateKind::Running,
        state_waiting: kind == ContainerStateKind::Waiting,
        state_terminated: kind == ContainerStateKind::Terminated,
        started_at: utils::unix_time(running.and_then(|r| r.started_at.as_ref())),
        waiting_reason: waiting.and_then(|w| w.reason.clone()).unwrap_or_default(),
        waiting_message: waiting.and_then(|w| w.message.clone()).unwrap_or_default(),
        exit_code: terminated.map(|t| t.exit_code),
        terminated_reason: terminated.and_then(|t| t.reason.clone()).unwrap_or_default(),
        terminated_message: terminated.and_then(|t| t.message.clone()).unwrap_or_default(),
        terminated_started_at: utils::unix_time(terminated.and_then(|t| t.started_at.as_ref())),
        terminated_finished_at: utils::unix_time(terminated.and_then(|t| t.finished_at.as_ref())),
        last_terminated_reason: last_terminated.and_then(|t| t.reason.clone()).unwrap_or_default(),
        last_terminated_exit_code: last_terminated.map(|t| t.exit_code),
        last_terminated_finished_at: utils::unix_time(
            last_terminated.and_then(|t| t.finished_at.as_ref()),
        ),
        resource_requests: quantity::canonical_map(resources.and_then(|r| r.requests.as_ref())),
        resource_limits: quantity::canonical_map(resources.and_then(|r| r.limits.as_ref())),
    }
}

/// The pod record followed by one record per init and regular container.
pub fn entries(pod: &Pod, captured_at: DateTime<Utc>) -> Vec<LogEntry> {
    let namespace = pod.namespace().unwrap_or_default();
    let mut entries = vec![LogEntry::new(
        captured_at,
        RESOURCE_TYPE,
        pod.name_any(),
        namespace.clone(),
        project(pod),
    )];

    let Some(spec) = pod.spec.as_ref() else {
        return entries;
    };
    let status = pod.status.as_ref();

    let groups = [
        (
            INIT_CONTAINER_RESOURCE_TYPE,
            spec.init_containers.as_deref().unwrap_or_default(),
            status.and_then(|s| s.init_container_statuses.as_deref()),
        ),
        (
            CONTAINER_RESOURCE_TYPE,
            spec.containers.as_slice(),
            status.and_then(|s| s.container_statuses.as_deref()),
        ),
    ];

    for (resource_type, containers, statuses) in groups {
        for container in containers {
            let status = statuses
                .unwrap_or_default()
                .iter()
                .find(|s| s.name == container.name);
            entries.push(LogEntry::new(
                captured_at,
                resource_type,
                container.name.clone(),
                namespace.clone(),
                project_container(pod, container, status),
            ));
        }
    }
    entries
}

pub fn collector(source: impl ObjectSource<Pod> + 'static) -> Collector<Pod> {
    Collector::fan_out(RESOURCE_TYPE, Scope::Namespaced, source, entries)
}
