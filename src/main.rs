#![allow(non_snake_case)]

use dioxus::prelude::*;

mod adapter;
mod catalog_ui;
mod components;
mod config;
mod manifest;
mod watch;

use catalog_ui::CatalogPage;
use config::AppConfig;
use watch::{WatchManager, WatchRequest};

fn main() {
    dioxus_logger::init(tracing::Level::INFO).expect("failed to init logger");

    LaunchBuilder::desktop()
        .with_cfg(dioxus::desktop::Config::new().with_window(
            dioxus::desktop::WindowBuilder::new().with_title("Quilt - Pattern Catalog"),
        ))
        .launch(App);
}

fn App() -> Element {
    let config = use_hook(|| match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Falling back to default config: {}", e);
            AppConfig::default()
        }
    });

    let demo = config.demo || std::env::var_os("QUILT_DEMO").is_some();
    let watcher = if demo {
        log::info!("Running against the bundled sample catalog");
        WatchManager::demo()
    } else {
        WatchManager::cluster(config.context.clone())
    };
    let request = WatchRequest::pattern_manifests(config.namespace.clone());

    rsx! {
        div {
            class: "min-h-screen bg-gray-100",

            // Header
            header {
                class: "bg-white shadow-sm border-b",
                div {
                    class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8",
                    div {
                        class: "flex justify-between items-center py-6",
                        h1 {
                            class: "text-3xl font-bold text-gray-900",
                            "Pattern Catalog"
                        }
                        span {
                            class: "text-sm text-gray-500",
                            "namespace: "
                            code { "{config.namespace}" }
                        }
                    }
                }
            }

            main {
                class: "max-w-7xl mx-auto py-6 px-4 sm:px-6 lg:px-8",
                CatalogPage {
                    watcher: watcher,
                    request: request,
                }
            }
        }

        // Include Tailwind CSS
        style {
            "
            @import url('https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css');
            "
        }
    }
}
