//! Floating scratch pad available on every page.
//!
//! The widget state lives in a [`store::GlobalNotepad`]; this component only
//! renders it and forwards events. While a drag is active a transparent
//! full-window layer catches pointer moves and the release, so the drag
//! follows the pointer anywhere on the page.

use std::time::Duration;

use dioxus::prelude::*;
use store::widget::{WIDGET_HEIGHT, WIDGET_WIDTH};
use store::{GlobalNotepad, Point, Viewport};

use crate::backend::{make_storage, PlatformStorage};
use crate::context::use_config;

/// Size used when the window size cannot be read.
const FALLBACK_VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};

fn viewport() -> Viewport {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let width = window.inner_width().ok().and_then(|v| v.as_f64());
            let height = window.inner_height().ok().and_then(|v| v.as_f64());
            if let (Some(width), Some(height)) = (width, height) {
                return Viewport::new(width, height);
            }
        }
    }
    #[cfg(all(not(target_arch = "wasm32"), feature = "desktop"))]
    {
        let window = dioxus::desktop::window();
        let size = window.inner_size();
        if size.width > 0 && size.height > 0 {
            return Viewport::from_physical(size.width, size.height, window.scale_factor());
        }
    }
    FALLBACK_VIEWPORT
}

async fn sleep(period: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(period).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(period).await;
}

fn pointer(evt: &MouseEvent) -> Point {
    let p = evt.client_coordinates();
    Point::new(p.x, p.y)
}

fn log_save(result: Result<(), store::StorageError>) {
    if let Err(e) = result {
        tracing::error!("Failed to save global note: {}", e);
    }
}

#[component]
pub fn GlobalNotepadWidget() -> Element {
    let config = use_config();
    let storage_key = config.widget.storage_key.clone();
    let mut widget = use_signal(move || {
        GlobalNotepad::<PlatformStorage>::load_with_key(make_storage(), &storage_key, viewport())
    });

    // Auto-save timer
    let interval = config.widget.autosave_interval();
    use_future(move || async move {
        let Some(period) = interval else {
            return;
        };
        loop {
            sleep(period).await;
            log_save(widget.read().autosave_tick());
        }
    });

    // Save on unmount
    use_drop(move || log_save(widget.read().save()));

    let state = widget.read();
    let open = state.is_open();
    let dragging = state.is_dragging();
    let position = state.position();
    let content = state.content().to_string();
    drop(state);

    if !open {
        return rsx! {
            button {
                class: "global-notepad-toggle",
                title: "Open notepad",
                onclick: move |_| {
                    let mut w = widget.write();
                    w.viewport_resized(viewport());
                    w.open();
                },
                "✎"
            }
            NotepadStyle {}
        };
    }

    rsx! {
        if dragging {
            div {
                class: "global-notepad-drag-layer",
                onmousemove: move |evt: MouseEvent| widget.write().pointer_move(pointer(&evt), viewport()),
                onmouseup: move |_| widget.write().pointer_up(),
            }
        }

        div {
            class: "global-notepad",
            style: "left: {position.x}px; top: {position.y}px; width: {WIDGET_WIDTH}px; height: {WIDGET_HEIGHT}px;",

            div {
                class: "global-notepad-handle",
                onmousedown: move |evt: MouseEvent| widget.write().pointer_down(pointer(&evt), true),
                h3 { "Notepad" }
                button {
                    class: "global-notepad-close",
                    title: "Close",
                    onmousedown: move |evt: MouseEvent| evt.stop_propagation(),
                    onclick: move |_| log_save(widget.write().close()),
                    "×"
                }
            }

            textarea {
                class: "global-notepad-text",
                placeholder: "Write anything here...",
                value: content,
                oninput: move |evt: FormEvent| widget.write().set_content(evt.value()),
                onblur: move |_| log_save(widget.read().blur()),
            }
        }
        NotepadStyle {}
    }
}

#[component]
fn NotepadStyle() -> Element {
    rsx! {
        style {
            r#"
            .global-notepad-toggle {{
                position: fixed;
                right: 1.5rem;
                bottom: 1.5rem;
                width: 3rem;
                height: 3rem;
                border: none;
                border-radius: 50%;
                background: #fbf3db;
                box-shadow: 0 2px 8px rgba(15, 15, 15, 0.15);
                font-size: 1.25rem;
                cursor: pointer;
                z-index: 1000;
            }}

            .global-notepad {{
                position: fixed;
                display: flex;
                flex-direction: column;
                background: #fbf3db;
                border-radius: 6px;
                box-shadow: 0 4px 16px rgba(15, 15, 15, 0.2);
                z-index: 1000;
            }}

            .global-notepad-drag-layer {{
                position: fixed;
                inset: 0;
                cursor: grabbing;
                z-index: 1001;
            }}

            .global-notepad-handle {{
                display: flex;
                align-items: center;
                justify-content: space-between;
                padding: 0.5rem 0.75rem;
                cursor: grab;
                user-select: none;
            }}

            .global-notepad-handle h3 {{
                margin: 0;
                font-size: 0.9375rem;
            }}

            .global-notepad-close {{
                border: none;
                background: none;
                font-size: 1.25rem;
                cursor: pointer;
            }}

            .global-notepad-text {{
                flex: 1;
                margin: 0 0.75rem 0.75rem;
                padding: 0.5rem;
                border: none;
                background: transparent;
                font: inherit;
                resize: none;
            }}
            "#
        }
    }
}
