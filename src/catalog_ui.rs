use dioxus::prelude::*;

use crate::components::{PatternDetailModal, ValidatedBadge};
use crate::manifest::PatternManifest;
use crate::watch::{WatchManager, WatchRequest, WatchSnapshot};

/// UI state derived from the raw watch tuple. Exactly one variant holds at
/// any time.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Error(String),
    Empty,
    Ready(Vec<PatternManifest>),
}

impl LoadState {
    /// Pure derivation, re-run on every emission. The loaded flag is
    /// authoritative until it flips: the watch can report a transient error
    /// before its first sync, and that still presents as Loading.
    pub fn from_snapshot(snapshot: &WatchSnapshot) -> Self {
        if !snapshot.loaded {
            return LoadState::Loading;
        }
        if let Some(error) = snapshot.error.as_deref().filter(|e| !e.is_empty()) {
            return LoadState::Error(error.to_string());
        }
        match snapshot.items.as_deref() {
            None | Some([]) => LoadState::Empty,
            Some(items) => LoadState::Ready(items.to_vec()),
        }
    }
}

/// Which manifest the detail modal shows. Owned by CatalogPage; the last
/// selection is retained on close but never rendered while closed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
    pub is_open: bool,
    pub selected: Option<PatternManifest>,
}

impl SelectionState {
    pub fn select(&mut self, manifest: PatternManifest) {
        self.selected = Some(manifest);
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }
}

#[component]
pub fn CatalogPage(watcher: WatchManager, request: WatchRequest) -> Element {
    let namespace = request.namespace.clone();
    let mut snapshot = use_signal(WatchSnapshot::default);
    let mut selection = use_signal(SelectionState::default);

    // Subscribe once on mount. The receive loop lives in a scope-owned
    // task: unmounting drops it, and dropping the subscription fires the
    // stop channel that ends the watch.
    use_effect(move || {
        let watcher = watcher.clone();
        let request = request.clone();
        spawn(async move {
            let mut subscription = watcher.subscribe(request);
            while let Some(update) = subscription.recv().await {
                snapshot.set(update);
            }
        });
    });

    let state = LoadState::from_snapshot(&snapshot.read());

    rsx! {
        div {
            class: "space-y-6",

            match state {
                LoadState::Loading => rsx! {
                    div {
                        class: "flex items-center justify-center py-12",
                        div {
                            class: "animate-spin rounded-full h-8 w-8 border-b-2 border-blue-600 mr-3"
                        }
                        span {
                            class: "text-sm text-gray-600",
                            "Loading..."
                        }
                    }
                },
                LoadState::Error(error) => rsx! {
                    div {
                        class: "bg-red-50 border border-red-200 rounded-md p-4",
                        p {
                            class: "text-sm font-medium text-red-800",
                            "Failed to load the pattern catalog"
                        }
                        p {
                            class: "text-sm text-red-700",
                            "ERROR: {error}"
                        }
                    }
                },
                LoadState::Empty => rsx! {
                    div {
                        class: "text-center py-12",
                        h2 {
                            class: "text-lg font-semibold text-gray-900 mb-2",
                            "No PatternManifests found"
                        }
                        p {
                            class: "text-sm text-gray-600 max-w-xl mx-auto",
                            "No PatternManifests exist in the "
                            code { "{namespace}" }
                            " namespace. Import the default catalog.yaml or create a "
                            "PatternCatalogSource and point to your own catalog.yaml."
                        }
                    }
                },
                LoadState::Ready(manifests) => rsx! {
                    CatalogTiles {
                        manifests: manifests,
                        on_select: move |manifest| selection.write().select(manifest),
                    }
                },
            }

            // Composed regardless of load state so a background list update
            // cannot force the modal closed.
            PatternDetailModal {
                data: selection.read().selected.clone(),
                is_open: selection.read().is_open,
                on_close: move |_| selection.write().close(),
            }
        }
    }
}

/// One tile per manifest, in the order the watch delivered them.
#[component]
pub fn CatalogTiles(
    manifests: Vec<PatternManifest>,
    on_select: EventHandler<PatternManifest>,
) -> Element {
    rsx! {
        div {
            class: "grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-3",
            for manifest in manifests {
                PatternTile {
                    key: "{manifest.metadata.name}",
                    manifest: manifest.clone(),
                    on_select: on_select,
                }
            }
        }
    }
}

#[component]
fn PatternTile(manifest: PatternManifest, on_select: EventHandler<PatternManifest>) -> Element {
    let description = manifest.short_description().to_string();
    let title = manifest.metadata.name.clone();
    rsx! {
        button {
            onclick: {
                let manifest = manifest.clone();
                move |evt: Event<MouseData>| {
                    evt.prevent_default();
                    on_select.call(manifest.clone());
                }
            },
            class: "text-left bg-white border border-gray-300 rounded-lg shadow-sm p-4 hover:border-blue-400 hover:shadow transition-colors",
            div {
                class: "flex items-start justify-between mb-2",
                h3 {
                    class: "text-sm font-semibold text-gray-900",
                    "{title}"
                }
                ValidatedBadge {}
            }
            p {
                class: "text-xs text-gray-500 mb-2",
                "Validated Patterns Team"
            }
            p {
                class: "text-sm text-gray-600",
                "{description}"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::sample_catalog;

    #[test]
    fn test_not_loaded_is_loading_regardless_of_the_rest() {
        let snapshot = WatchSnapshot {
            items: Some(sample_catalog()),
            loaded: false,
            error: Some("transient watch error".to_string()),
        };
        assert_eq!(LoadState::from_snapshot(&snapshot), LoadState::Loading);
        assert_eq!(
            LoadState::from_snapshot(&WatchSnapshot::default()),
            LoadState::Loading
        );
    }

    #[test]
    fn test_error_wins_over_items_once_loaded() {
        let snapshot = WatchSnapshot {
            items: Some(sample_catalog()),
            loaded: true,
            error: Some("X".to_string()),
        };
        assert_eq!(
            LoadState::from_snapshot(&snapshot),
            LoadState::Error("X".to_string())
        );
    }

    #[test]
    fn test_blank_error_does_not_mask_items() {
        let snapshot = WatchSnapshot {
            items: Some(sample_catalog()),
            loaded: true,
            error: Some(String::new()),
        };
        assert!(matches!(
            LoadState::from_snapshot(&snapshot),
            LoadState::Ready(_)
        ));
    }

    #[test]
    fn test_loaded_without_items_is_empty() {
        let none = WatchSnapshot {
            items: None,
            loaded: true,
            error: None,
        };
        let empty = WatchSnapshot {
            items: Some(Vec::new()),
            loaded: true,
            error: None,
        };
        assert_eq!(LoadState::from_snapshot(&none), LoadState::Empty);
        assert_eq!(LoadState::from_snapshot(&empty), LoadState::Empty);
    }

    #[test]
    fn test_ready_preserves_input_order() {
        let items = sample_catalog();
        let snapshot = WatchSnapshot::ready(items.clone());
        match LoadState::from_snapshot(&snapshot) {
            LoadState::Ready(got) => assert_eq!(got, items),
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn test_selection_lifecycle() {
        let catalog = sample_catalog();
        let mut selection = SelectionState::default();
        assert!(!selection.is_open);
        assert!(selection.selected.is_none());

        selection.select(catalog[0].clone());
        assert!(selection.is_open);
        assert_eq!(
            selection.selected.as_ref().map(|m| m.metadata.name.as_str()),
            Some("multicloud-gitops")
        );

        selection.close();
        assert!(!selection.is_open);
        // The last selection is retained; the modal is simply not rendered
        // while closed.
        assert!(selection.selected.is_some());
    }

    #[test]
    fn test_rapid_selects_keep_the_latest() {
        let catalog = sample_catalog();
        let mut selection = SelectionState::default();
        selection.select(catalog[0].clone());
        selection.select(catalog[1].clone());
        assert!(selection.is_open);
        assert_eq!(
            selection.selected.as_ref().map(|m| m.metadata.name.as_str()),
            Some("industrial-edge")
        );
    }
}
