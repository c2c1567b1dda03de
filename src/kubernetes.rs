use futures::future::{self, BoxFuture};
use futures::{FutureExt, StreamExt};
use kube::core::GroupVersionKind;
use kube::discovery::Discovery;
use kube::runtime::reflector::{self, ObjectRef, Store};
use kube::runtime::watcher::{self, Event, watcher};
use kube::runtime::WatchStreamExt;
use kube::{Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Longest server-side watch timeout; the API server caps requests below 300s.
pub const MAX_RESYNC_SECS: u64 = 290;

/// A Kubernetes API type that can back a watch cache.
pub trait KubeObject:
    Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static
{
}

impl<K> KubeObject for K where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static
{
}

/// Read-only view of the current contents of a watch cache.
pub trait ObjectSource<K: Resource>: Send + Sync {
    fn list(&self) -> Vec<Arc<K>>;

    fn get(&self, namespace: &str, name: &str) -> Option<Arc<K>> {
        self.list().into_iter().find(|obj| {
            obj.meta().name.as_deref() == Some(name)
                && obj.meta().namespace.as_deref().unwrap_or_default() == namespace
        })
    }
}

impl<K> ObjectSource<K> for Store<K>
where
    K: Resource + Clone + Send + Sync + 'static,
    K::DynamicType: Eq + std::hash::Hash + Clone + Default,
{
    fn list(&self) -> Vec<Arc<K>> {
        self.state()
    }

    fn get(&self, namespace: &str, name: &str) -> Option<Arc<K>> {
        let oref = ObjectRef::<K>::new(name);
        let oref = if namespace.is_empty() {
            oref
        } else {
            oref.within(namespace)
        };
        Store::get(self, &oref)
    }
}

/// Typed view over a cache of untyped objects.
///
/// Entries of another kind, or ones that do not deserialize into `K`, are
/// skipped. Watch caches are typed, so only test fixtures build one.
#[cfg(test)]
pub struct DynamicSource<K> {
    store: Store<kube::api::DynamicObject>,
    _kind: std::marker::PhantomData<fn() -> K>,
}

#[cfg(test)]
impl<K> DynamicSource<K> {
    pub fn new(store: Store<kube::api::DynamicObject>) -> Self {
        Self {
            store,
            _kind: std::marker::PhantomData,
        }
    }
}

#[cfg(test)]
impl<K: KubeObject> DynamicSource<K> {
    fn narrow(obj: &kube::api::DynamicObject) -> Option<K> {
        let types = obj.types.as_ref()?;
        if types.api_version != K::api_version(&()) || types.kind != K::kind(&()) {
            return None;
        }
        obj.clone().try_parse::<K>().ok()
    }
}

#[cfg(test)]
impl<K: KubeObject> ObjectSource<K> for DynamicSource<K> {
    fn list(&self) -> Vec<Arc<K>> {
        self.store
            .state()
            .iter()
            .filter_map(|obj| Self::narrow(obj))
            .map(Arc::new)
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("unknown resource type {0:?}")]
    UnknownResource(String),
    #[error("{kind} ({api_version}) is not served by this cluster")]
    NotServed { kind: String, api_version: String },
}

/// Group/version/kind triples the API server reported during discovery.
#[derive(Default)]
pub struct ServedApis {
    discovery: Option<Discovery>,
}

impl ServedApis {
    pub async fn discover(client: &Client) -> Self {
        match Discovery::new(client.clone()).run().await {
            Ok(discovery) => {
                debug!("API discovery found {} groups", discovery.groups().count());
                Self {
                    discovery: Some(discovery),
                }
            }
            Err(e) => {
                warn!("API discovery failed, assuming every kind is served: {}", e);
                Self { discovery: None }
            }
        }
    }

    /// True when discovery did not run or reported `K`.
    pub fn serves<K: KubeObject>(&self) -> bool {
        let Some(discovery) = &self.discovery else {
            return true;
        };
        let gvk = GroupVersionKind::gvk(&K::group(&()), &K::version(&()), &K::kind(&()));
        discovery.resolve_gvk(&gvk).is_some()
    }
}

/// Creates and shares one cluster-wide watch cache per API type.
pub struct InformerFactory {
    client: Client,
    config: watcher::Config,
    served: ServedApis,
    stores: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    readiness: Vec<(String, BoxFuture<'static, bool>)>,
}

impl InformerFactory {
    pub fn new(client: Client, resync_period: Duration, served: ServedApis) -> Self {
        let timeout = resync_period.as_secs().clamp(1, MAX_RESYNC_SECS) as u32;
        Self {
            client,
            config: watcher::Config::default().timeout(timeout),
            served,
            stores: HashMap::new(),
            readiness: Vec::new(),
        }
    }

    /// The watch cache for `K`, started on first request.
    pub fn store<K: KubeObject>(&mut self) -> Result<Store<K>, SetupError> {
        if let Some(existing) = self
            .stores
            .get(&TypeId::of::<K>())
            .and_then(|s| s.downcast_ref::<Store<K>>())
        {
            return Ok(existing.clone());
        }

        let kind = K::kind(&()).to_string();
        if !self.served.serves::<K>() {
            return Err(SetupError::NotServed {
                kind,
                api_version: K::api_version(&()).to_string(),
            });
        }

        let api: Api<K> = Api::all(self.client.clone());
        let (reader, writer) = reflector::store::<K>();
        let stream = watcher(api, self.config.clone())
            .default_backoff()
            .reflect(writer);

        let task_kind = kind.clone();
        tokio::spawn(async move {
            debug!("Starting informer for {}", task_kind);
            stream
                .for_each(|res| {
                    match res {
                        Ok(Event::Init) => debug!("{} informer listing", task_kind),
                        Ok(Event::InitDone) => debug!("{} informer list complete", task_kind),
                        Ok(Event::InitApply(obj)) | Ok(Event::Apply(obj)) => {
                            trace!("{} {} applied", task_kind, obj.name_any())
                        }
                        Ok(Event::Delete(obj)) => trace!("{} {} deleted", task_kind, obj.name_any()),
                        Err(e) => warn!("{} watch error: {}", task_kind, e),
                    }
                    future::ready(())
                })
                .await;
            warn!("Informer for {} stopped", task_kind);
        });

        let ready = reader.clone();
        self.readiness
            .push((kind, async move { ready.wait_until_ready().await.is_ok() }.boxed()));
        self.stores
            .insert(TypeId::of::<K>(), Box::new(reader.clone()));
        Ok(reader)
    }

    /// Wait for every started cache to finish its initial list.
    ///
    /// Returns the kinds that did not sync within `timeout`.
    pub async fn wait_for_cache_sync(&mut self, timeout: Duration) -> Vec<String> {
        let pending = std::mem::take(&mut self.readiness);
        let total = pending.len();
        let results = future::join_all(pending.into_iter().map(|(kind, ready)| async move {
            let synced = matches!(tokio::time::timeout(timeout, ready).await, Ok(true));
            (kind, synced)
        }))
        .await;

        let unsynced: Vec<String> = results
            .into_iter()
            .filter(|(_, synced)| !synced)
            .map(|(kind, _)| kind)
            .collect();
        info!(
            "Informer caches synced: {}/{}",
            total - unsynced.len(),
            total
        );
        unsynced
    }
}
