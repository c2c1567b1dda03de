use chrono::{DateTime, Utc};
use kube::{Resource, ResourceExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::kubernetes::ObjectSource;
use crate::resources::ResourceData;
use crate::types::LogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Namespaced,
    Cluster,
}

/// Produces the current records for one resource kind.
pub trait Handler: Send + Sync {
    /// Tag stamped on every record, e.g. `"configmap"`.
    fn resource_type(&self) -> &'static str;

    /// Snapshot the cache. An empty `namespaces` list means all namespaces.
    fn collect(&self, namespaces: &[String], captured_at: DateTime<Utc>) -> Vec<LogEntry>;
}

type Projection<K> = Box<dyn Fn(&K, DateTime<Utc>) -> Vec<LogEntry> + Send + Sync>;

/// Generic handler: reads a cache, filters by namespace, projects each object.
pub struct Collector<K: Resource> {
    resource_type: &'static str,
    scope: Scope,
    source: Arc<dyn ObjectSource<K>>,
    project: Projection<K>,
}

impl<K: Resource + 'static> Collector<K> {
    /// One record per cached object.
    pub fn new<S, D, F>(resource_type: &'static str, scope: Scope, source: S, project: F) -> Self
    where
        S: ObjectSource<K> + 'static,
        D: Into<ResourceData>,
        F: Fn(&K) -> D + Send + Sync + 'static,
    {
        let project = move |obj: &K, captured_at: DateTime<Utc>| {
            vec![LogEntry::new(
                captured_at,
                resource_type,
                obj.name_any(),
                entry_namespace(obj, scope),
                project(obj),
            )]
        };
        Self::fan_out(resource_type, scope, source, project)
    }

    /// Any number of records per cached object.
    pub fn fan_out<S, F>(resource_type: &'static str, scope: Scope, source: S, project: F) -> Self
    where
        S: ObjectSource<K> + 'static,
        F: Fn(&K, DateTime<Utc>) -> Vec<LogEntry> + Send + Sync + 'static,
    {
        Self {
            resource_type,
            scope,
            source: Arc::new(source),
            project: Box::new(project),
        }
    }
}

impl<K: Resource + 'static> Handler for Collector<K> {
    fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    fn collect(&self, namespaces: &[String], captured_at: DateTime<Utc>) -> Vec<LogEntry> {
        self.source
            .list()
            .iter()
            .filter(|obj| {
                self.scope == Scope::Cluster
                    || namespace_selected(obj.meta().namespace.as_deref().unwrap_or_default(), namespaces)
            })
            .flat_map(|obj| (self.project)(&**obj, captured_at))
            .collect()
    }
}

/// Namespace reported on a record; always empty for cluster-scoped kinds.
pub fn entry_namespace<K: Resource>(obj: &K, scope: Scope) -> String {
    match scope {
        Scope::Namespaced => obj.meta().namespace.clone().unwrap_or_default(),
        Scope::Cluster => String::new(),
    }
}

pub fn namespace_selected(namespace: &str, namespaces: &[String]) -> bool {
    namespaces.is_empty() || namespaces.iter().any(|ns| ns == namespace)
}

/// Run every handler once, all stamped with the same capture time.
///
/// Handlers run concurrently on the blocking pool; records come back in
/// handler order.
pub async fn collect_pass(handlers: &[Arc<dyn Handler>], namespaces: &[String]) -> Vec<LogEntry> {
    let captured_at = Utc::now();
    let started = Instant::now();
    let namespaces: Arc<[String]> = namespaces.into();

    let tasks: Vec<_> = handlers
        .iter()
        .map(|handler| {
            let handler = handler.clone();
            let namespaces = namespaces.clone();
            tokio::task::spawn_blocking(move || {
                let entries = handler.collect(&namespaces, captured_at);
                debug!("{}: {} entries", handler.resource_type(), entries.len());
                entries
            })
        })
        .collect();

    let mut entries = Vec::new();
    for result in futures::future::join_all(tasks).await {
        match result {
            Ok(mut batch) => entries.append(&mut batch),
            Err(e) => warn!("Collection task failed: {}", e),
        }
    }

    debug!(
        "Collection pass produced {} entries in {:?}",
        entries.len(),
        started.elapsed()
    );
    entries
}
