use dioxus::prelude::*;
use url::Url;

use crate::manifest::PatternManifest;

/// Detail dialog for one selected manifest.
///
/// Renders nothing at all while no selection has been made yet, and nothing
/// while closed. A retained selection is only ever shown after the next
/// explicit select.
#[component]
pub fn PatternDetailModal(
    data: Option<PatternManifest>,
    is_open: bool,
    on_close: EventHandler<()>,
) -> Element {
    let Some(manifest) = data else {
        return rsx! {};
    };
    if !is_open {
        return rsx! {};
    }

    let title = manifest.display_name().to_string();
    let deploy_target = manifest.metadata.name.clone();
    let organization = manifest.spec.organization.clone();
    let pattern = manifest.spec.pattern.clone();
    let created = manifest
        .metadata
        .creation_timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string());

    rsx! {
        // Modal overlay
        div {
            class: "fixed inset-0 bg-gray-600 bg-opacity-50 overflow-y-auto h-full w-full z-50 flex items-center justify-center",
            tabindex: "0",
            onclick: move |_| on_close.call(()),
            onkeydown: move |event| {
                let key_str = format!("{:?}", event.key());
                if key_str.contains("Escape") {
                    on_close.call(());
                }
            },

            // Modal content
            div {
                class: "bg-white rounded-lg shadow-xl max-w-2xl w-full mx-4 max-h-full overflow-y-auto",
                onclick: |e| e.stop_propagation(),

                // Header
                div {
                    class: "flex items-center justify-between p-4 border-b border-gray-200",
                    h3 {
                        class: "text-lg font-medium text-gray-900",
                        "{title}"
                    }
                    button {
                        onclick: move |_| on_close.call(()),
                        class: "text-gray-400 hover:text-gray-600",
                        "✕"
                    }
                }

                // Content
                div {
                    class: "p-4 space-y-6",

                    section {
                        h4 {
                            class: "text-md font-semibold text-gray-900 mb-2",
                            "Organization"
                        }
                        FieldRow { label: "Name", value: organization.name }
                        FieldRow { label: "Description", value: organization.description }
                        UrlRow { label: "URL", value: organization.url }
                        FieldRow { label: "Maintainers", value: organization.maintainers }
                    }

                    section {
                        h4 {
                            class: "text-md font-semibold text-gray-900 mb-2",
                            "Pattern"
                        }
                        FieldRow { label: "Name", value: pattern.name.clone() }
                        FieldRow { label: "Description", value: pattern.long_description.clone() }
                        FieldRow { label: "Branch", value: pattern.branch.clone() }
                        FieldRow { label: "Type", value: pattern.badge.clone() }
                        UrlRow { label: "URL", value: pattern.url.clone() }
                        FieldRow { label: "Maintainers", value: pattern.maintainers.clone() }
                        FieldRow { label: "Created", value: created }

                        if !pattern.products.is_empty() {
                            p {
                                class: "text-sm text-gray-700 mt-2",
                                span { class: "font-medium", "Products:" }
                            }
                            ul {
                                class: "list-disc list-inside text-sm text-gray-600",
                                for product in pattern.products.iter() {
                                    li { "{product.name}" }
                                }
                            }
                        }
                    }
                }

                // Actions
                div {
                    class: "flex justify-end p-4 border-t border-gray-200",
                    button {
                        onclick: move |_| {
                            // Hook point for a future create/apply call; for
                            // now the action only logs.
                            log::info!("Deploy Pattern requested for {}", deploy_target);
                        },
                        class: "px-4 py-2 text-sm font-medium text-white bg-blue-600 hover:bg-blue-700 rounded-md transition-colors",
                        "Deploy Pattern"
                    }
                }
            }
        }
    }
}

/// One labeled field; absent or blank values render nothing at all.
#[component]
fn FieldRow(label: String, value: Option<String>) -> Element {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return rsx! {};
    };
    rsx! {
        p {
            class: "text-sm text-gray-700",
            span { class: "font-medium", "{label}: " }
            "{value}"
        }
    }
}

/// Like FieldRow, but renders the value as a link when it parses as a URL.
#[component]
fn UrlRow(label: String, value: Option<String>) -> Element {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return rsx! {};
    };
    rsx! {
        p {
            class: "text-sm text-gray-700",
            span { class: "font-medium", "{label}: " }
            if Url::parse(&value).is_ok() {
                a {
                    href: "{value}",
                    class: "text-blue-600 hover:underline",
                    "{value}"
                }
            } else {
                "{value}"
            }
        }
    }
}

#[component]
pub fn ValidatedBadge() -> Element {
    rsx! {
        span {
            class: "inline-flex items-center px-2 py-1 rounded-full text-xs font-medium bg-green-100 text-green-800",
            title: "Certified",
            svg {
                class: "h-3 w-3 mr-1 text-green-600",
                fill: "currentColor",
                view_box: "0 0 20 20",
                path {
                    fill_rule: "evenodd",
                    d: "M10 18a8 8 0 100-16 8 8 0 000 16zm3.707-9.293a1 1 0 00-1.414-1.414L9 10.586 7.707 9.293a1 1 0 00-1.414 1.414l2 2a1 1 0 001.414 0l4-4z",
                    clip_rule: "evenodd"
                }
            }
            "Validated"
        }
    }
}
