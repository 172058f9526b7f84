use std::collections::BTreeMap;

use futures::StreamExt;
use kube::{
    api::{Api, ListParams},
    config::KubeConfigOptions,
    core::{ApiResource, DynamicObject, GroupVersionKind},
    runtime::watcher::{self, Event},
    Client, Config,
};
use tokio::sync::{mpsc, oneshot};

use crate::adapter::convert_pattern_manifest;
use crate::manifest::{
    PatternManifest, PATTERN_MANIFEST_GROUP, PATTERN_MANIFEST_KIND, PATTERN_MANIFEST_PLURAL,
    PATTERN_MANIFEST_VERSION,
};

/// What to watch: a group/version/kind in one namespace. `list` mirrors the
/// upstream watch contract; only list watches are supported.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchRequest {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub plural: String,
    pub namespace: String,
    pub list: bool,
}

impl WatchRequest {
    pub fn pattern_manifests(namespace: impl Into<String>) -> Self {
        Self {
            group: PATTERN_MANIFEST_GROUP.to_string(),
            version: PATTERN_MANIFEST_VERSION.to_string(),
            kind: PATTERN_MANIFEST_KIND.to_string(),
            plural: PATTERN_MANIFEST_PLURAL.to_string(),
            namespace: namespace.into(),
            list: true,
        }
    }

    fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind {
            group: self.group.clone(),
            version: self.version.clone(),
            kind: self.kind.clone(),
        }
    }
}

/// One emission from the watch: the raw (items, loaded, error) tuple the UI
/// derives its state from. `items` stays `None` until the first sync.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WatchSnapshot {
    pub items: Option<Vec<PatternManifest>>,
    pub loaded: bool,
    pub error: Option<String>,
}

impl WatchSnapshot {
    pub fn ready(items: Vec<PatternManifest>) -> Self {
        Self {
            items: Some(items),
            loaded: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            items: None,
            loaded: true,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum WatchError {
    ClientInit(String),
    Unsupported(String),
    List(String),
    Stream(String),
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchError::ClientInit(msg) => write!(f, "Cluster connection failed: {}", msg),
            WatchError::Unsupported(msg) => write!(f, "Unsupported watch request: {}", msg),
            WatchError::List(msg) => write!(f, "Listing resources failed: {}", msg),
            WatchError::Stream(msg) => write!(f, "Watch stream error: {}", msg),
        }
    }
}

impl std::error::Error for WatchError {}

/// Where the snapshots come from. `Cluster` runs a kube list+watch;
/// `Scripted` replays a fixed tuple sequence (demo mode and tests).
#[derive(Debug, Clone, PartialEq)]
enum WatchSource {
    Cluster { context: Option<String> },
    Scripted { updates: Vec<WatchSnapshot> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchManager {
    source: WatchSource,
}

impl WatchManager {
    pub fn cluster(context: Option<String>) -> Self {
        Self {
            source: WatchSource::Cluster { context },
        }
    }

    /// Offline source backed by the bundled sample catalog.
    pub fn demo() -> Self {
        Self::scripted(vec![WatchSnapshot::ready(crate::manifest::sample_catalog())])
    }

    pub fn scripted(updates: Vec<WatchSnapshot>) -> Self {
        Self {
            source: WatchSource::Scripted { updates },
        }
    }

    /// Start the watch task for `request`. The subscription owns the stop
    /// channel; dropping it tears the task down.
    pub fn subscribe(&self, request: WatchRequest) -> WatchSubscription {
        let (tx, rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = oneshot::channel();
        match &self.source {
            WatchSource::Cluster { context } => {
                let context = context.clone();
                tokio::spawn(run_cluster_watch(request, context, tx, stop_rx));
            }
            WatchSource::Scripted { updates } => {
                let updates = updates.clone();
                tokio::spawn(run_scripted(updates, tx, stop_rx));
            }
        }
        WatchSubscription {
            updates: rx,
            stop: Some(stop_tx),
        }
    }
}

pub struct WatchSubscription {
    updates: mpsc::Receiver<WatchSnapshot>,
    stop: Option<oneshot::Sender<()>>,
}

impl WatchSubscription {
    /// Next snapshot, or `None` once the source has shut down.
    pub async fn recv(&mut self) -> Option<WatchSnapshot> {
        self.updates.recv().await
    }

    pub fn unsubscribe(mut self) {
        self.signal_stop();
    }

    fn signal_stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

impl Drop for WatchSubscription {
    fn drop(&mut self) {
        self.signal_stop();
    }
}

async fn make_client(context: Option<String>) -> Result<Client, WatchError> {
    let config = match context {
        Some(context) => Config::from_kubeconfig(&KubeConfigOptions {
            context: Some(context),
            ..KubeConfigOptions::default()
        })
        .await
        .map_err(|e| WatchError::ClientInit(e.to_string()))?,
        None => Config::infer()
            .await
            .map_err(|e| WatchError::ClientInit(e.to_string()))?,
    };
    Client::try_from(config).map_err(|e| WatchError::ClientInit(e.to_string()))
}

async fn emit(
    tx: &mpsc::Sender<WatchSnapshot>,
    items: &BTreeMap<String, PatternManifest>,
    error: Option<String>,
) -> bool {
    let snapshot = WatchSnapshot {
        items: Some(items.values().cloned().collect()),
        loaded: true,
        error,
    };
    tx.send(snapshot).await.is_ok()
}

fn absorb(items: &mut BTreeMap<String, PatternManifest>, obj: &DynamicObject) {
    match convert_pattern_manifest(obj) {
        Ok(manifest) => {
            items.insert(manifest.metadata.name.clone(), manifest);
        }
        Err(e) => log::warn!("Skipping malformed PatternManifest: {}", e),
    }
}

async fn run_cluster_watch(
    request: WatchRequest,
    context: Option<String>,
    tx: mpsc::Sender<WatchSnapshot>,
    mut stop: oneshot::Receiver<()>,
) {
    if !request.list {
        let err = WatchError::Unsupported(format!(
            "single-object watch for {}/{} is not supported",
            request.kind, request.namespace
        ));
        log::error!("{}", err);
        let _ = tx.send(WatchSnapshot::failed(err.to_string())).await;
        return;
    }

    let client = match make_client(context).await {
        Ok(client) => client,
        Err(e) => {
            log::error!("{}", e);
            let _ = tx.send(WatchSnapshot::failed(e.to_string())).await;
            return;
        }
    };

    let ar = ApiResource::from_gvk_with_plural(&request.gvk(), &request.plural);
    let api: Api<DynamicObject> = Api::namespaced_with(client, &request.namespace, &ar);
    let mut items: BTreeMap<String, PatternManifest> = BTreeMap::new();

    // Initial list so the loaded flag flips even when the watch takes a
    // while to deliver its first sync.
    match api.list(&ListParams::default()).await {
        Ok(list) => {
            for obj in list.items.iter() {
                absorb(&mut items, obj);
            }
            log::info!(
                "Listed {} PatternManifests in namespace {}",
                items.len(),
                request.namespace
            );
            if !emit(&tx, &items, None).await {
                return;
            }
        }
        Err(e) => {
            let err = WatchError::List(e.to_string());
            log::error!("{}", err);
            if tx.send(WatchSnapshot::failed(err.to_string())).await.is_err() {
                return;
            }
        }
    }

    let stream = watcher::watcher(api, watcher::Config::default());
    futures::pin_mut!(stream);
    log::info!(
        "Watching {} in namespace {}",
        request.kind,
        request.namespace
    );
    loop {
        tokio::select! {
            _ = &mut stop => break,
            ev = stream.next() => match ev {
                Some(Ok(Event::Applied(obj))) => {
                    absorb(&mut items, &obj);
                    if !emit(&tx, &items, None).await {
                        break;
                    }
                }
                Some(Ok(Event::Deleted(obj))) => {
                    if let Some(name) = obj.metadata.name.as_deref() {
                        items.remove(name);
                    }
                    if !emit(&tx, &items, None).await {
                        break;
                    }
                }
                Some(Ok(Event::Restarted(list))) => {
                    items.clear();
                    for obj in list.iter() {
                        absorb(&mut items, obj);
                    }
                    if !emit(&tx, &items, None).await {
                        break;
                    }
                }
                Some(Err(e)) => {
                    // Transient stream errors keep the last good item set;
                    // the watcher recovers on its own.
                    let err = WatchError::Stream(e.to_string());
                    log::warn!("{}", err);
                    if !emit(&tx, &items, Some(err.to_string())).await {
                        break;
                    }
                }
                None => break,
            }
        }
    }
    log::info!("Watch for {} stopped", request.kind);
}

async fn run_scripted(
    updates: Vec<WatchSnapshot>,
    tx: mpsc::Sender<WatchSnapshot>,
    mut stop: oneshot::Receiver<()>,
) {
    for update in updates {
        tokio::select! {
            _ = &mut stop => return,
            sent = tx.send(update) => {
                if sent.is_err() {
                    return;
                }
            }
        }
    }
    // Keep the channel open until the subscriber goes away, like a real
    // watch that has simply gone quiet.
    let _ = stop.await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::sample_catalog;
    use std::time::Duration;

    #[tokio::test]
    async fn test_scripted_source_delivers_in_order() {
        let loading = WatchSnapshot::default();
        let ready = WatchSnapshot::ready(sample_catalog());
        let manager = WatchManager::scripted(vec![loading.clone(), ready.clone()]);

        let mut sub = manager.subscribe(WatchRequest::pattern_manifests("default"));
        assert_eq!(sub.recv().await, Some(loading));
        assert_eq!(sub.recv().await, Some(ready));

        // Script exhausted: the channel stays open but idle.
        let next = tokio::time::timeout(Duration::from_millis(50), sub.recv()).await;
        assert!(next.is_err());
        sub.unsubscribe();
    }

    #[tokio::test]
    async fn test_error_tuple_keeps_items() {
        let mut erred = WatchSnapshot::ready(sample_catalog());
        erred.error = Some("watch stream error".to_string());
        let manager = WatchManager::scripted(vec![erred.clone()]);

        let mut sub = manager.subscribe(WatchRequest::pattern_manifests("default"));
        let got = sub.recv().await.expect("snapshot should arrive");
        assert!(got.loaded);
        assert_eq!(got.error.as_deref(), Some("watch stream error"));
        assert_eq!(got.items.map(|i| i.len()), Some(3));
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_the_source() {
        let updates: Vec<WatchSnapshot> = std::iter::repeat(WatchSnapshot::ready(Vec::new()))
            .take(100)
            .collect();
        let manager = WatchManager::scripted(updates);

        let mut sub = manager.subscribe(WatchRequest::pattern_manifests("default"));
        assert!(sub.recv().await.is_some());
        sub.unsubscribe();
        // The task observes the stop signal and drains out; nothing to
        // assert beyond not hanging.
    }

    #[tokio::test]
    async fn test_single_object_request_is_rejected() {
        let manager = WatchManager::cluster(None);
        let mut request = WatchRequest::pattern_manifests("default");
        request.list = false;

        let mut sub = manager.subscribe(request);
        let got = sub.recv().await.expect("error snapshot should arrive");
        assert!(got.loaded);
        assert!(got.error.unwrap_or_default().contains("not supported"));
    }

    #[test]
    fn test_demo_manager_equality() {
        // WatchManager travels through component props, which compare by
        // PartialEq to skip re-renders.
        assert_eq!(WatchManager::demo(), WatchManager::demo());
        assert_ne!(WatchManager::demo(), WatchManager::cluster(None));
    }
}
