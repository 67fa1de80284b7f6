//! Browser bootstrap for the presence globe.
//!
//! Nothing happens on module load beyond installing the panic hook; the page
//! calls `mount_presence` once its markup is in place.

use std::cell::RefCell;

use console_error_panic_hook::set_once;
use foundation::time::Millis;
use presence::camera::Viewport;
use presence::renderer::RendererKind;
use presence::texture::resolve_textures;
use presence::{GlobeManager, Mount, PresenceConfig};
use session::{SelectionStore, SessionStorageSelectionStore, UnavailableSelectionStore};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod console_log;
mod dom_panel;
mod ffi;
mod surfaces;

use dom_panel::DomPanel;
use surfaces::{DomBackends, JsImageProbe};

struct App {
    manager: GlobeManager,
    frame_id: Option<i32>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static FRAME: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.try_with(|app| app.borrow_mut().as_mut().map(f))
        .ok()
        .flatten()
}

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

/// Legend attribution for the renderer that came up; the page's static text
/// already describes the flat map.
fn legend_text(kind: RendererKind) -> Option<&'static str> {
    match kind {
        RendererKind::Globe => Some("3D globe © Three.js · Locations © Cravelle"),
        RendererKind::Map | RendererKind::Inert => None,
    }
}

fn update_legend(document: &web_sys::Document, kind: RendererKind) {
    let Some(text) = legend_text(kind) else {
        return;
    };
    if let Ok(Some(attr)) = document.query_selector(".map-legend .map-attr") {
        attr.set_text_content(Some(text));
    }
}

fn now_ms() -> Millis {
    let t = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    Millis(t)
}

fn viewport() -> Viewport {
    let Some(window) = web_sys::window() else {
        return Viewport::default();
    };
    let width = window.inner_width().ok().and_then(|v| v.as_f64());
    let height = window.inner_height().ok().and_then(|v| v.as_f64());
    match (width, height) {
        (Some(w), Some(h)) => Viewport::new(w, h),
        _ => Viewport::default(),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    console_log::init();
    Ok(())
}

/// Mounts the component. Returns `false` when the page has no `#map`
/// container or no renderer could be created.
#[wasm_bindgen]
pub fn mount_presence(config_json: &str) -> Result<bool, JsValue> {
    let config = PresenceConfig::from_json(config_json).map_err(|e| {
        let msg = e.to_string();
        console_error(&msg);
        JsValue::from_str(&msg)
    })?;

    if with_app(|_| ()).is_some() {
        return Ok(true);
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let Some(container) = document.get_element_by_id("map") else {
        return Ok(false);
    };

    let panel = match DomPanel::attach(&document) {
        Ok(panel) => panel,
        Err(err) => {
            console_error(&format!("presence panel init error: {err:?}"));
            None
        }
    };
    let overlay = panel.as_ref().and_then(DomPanel::overlay_width);

    let store: Box<dyn SelectionStore> = match SessionStorageSelectionStore::new(&config.storage_key) {
        Ok(store) => Box::new(store),
        Err(_) => Box::new(UnavailableSelectionStore),
    };

    let mut backends = DomBackends {
        container,
        initial_view: config.globe.initial_view,
    };
    let textures = config.textures.clone();
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;

    let Some(mut manager) = GlobeManager::mount(
        config,
        Mount {
            has_surface: true,
            backends: &mut backends,
            panel: panel.map(|p| Box::new(p) as Box<dyn presence::panel::PanelView>),
            store,
            viewport: viewport(),
            seed,
            now: now_ms(),
        },
    ) else {
        tracing::error!("no presence renderer could be created; component left empty");
        return Ok(false);
    };
    manager.set_panel_overlay(overlay);
    update_legend(&document, manager.renderer_kind());

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            manager,
            frame_id: None,
        });
    });

    spawn_local(async move {
        if let Some(resolved) = resolve_textures(&textures, &JsImageProbe).await {
            with_app(|app| app.manager.apply_textures(&resolved));
        }
    });

    start_frame_loop();
    Ok(true)
}

fn request_frame() -> Option<i32> {
    let window = web_sys::window()?;
    FRAME.with(|frame| {
        let frame = frame.borrow();
        let cb = frame.as_ref()?;
        window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .ok()
    })
}

fn start_frame_loop() {
    let cb = Closure::<dyn FnMut(f64)>::new(|ts: f64| {
        let running = with_app(|app| {
            app.manager.tick(Millis(ts));
        })
        .is_some();
        if running {
            let id = request_frame();
            with_app(|app| app.frame_id = id);
        }
    });
    FRAME.with(|frame| *frame.borrow_mut() = Some(cb));
    let id = request_frame();
    with_app(|app| app.frame_id = id);
}

#[wasm_bindgen]
pub fn presence_select(name: &str) {
    let now = now_ms();
    with_app(|app| app.manager.select_by_name(name, now));
}

/// `index < 0` clears the hover.
#[wasm_bindgen]
pub fn presence_hover(index: i32) {
    let hovered = usize::try_from(index).ok();
    with_app(|app| app.manager.set_hovered(hovered));
}

#[wasm_bindgen]
pub fn presence_card_animation_end() {
    with_app(|app| app.manager.on_card_animation_end());
}

#[wasm_bindgen]
pub fn presence_resize(width: f64, height: f64) {
    let overlay = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector(".map-side").ok().flatten())
        .and_then(|aside| dom_panel::floating_width(&aside));
    with_app(|app| {
        app.manager.set_viewport(width, height);
        app.manager.set_panel_overlay(overlay);
    });
}

/// Stops the frame loop and drops the component.
#[wasm_bindgen]
pub fn presence_unmount() {
    let app = APP.with(|app| app.borrow_mut().take());
    if let Some(App {
        frame_id: Some(id), ..
    }) = &app
    {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(*id);
        }
    }
    FRAME.with(|frame| frame.borrow_mut().take());
    drop(app);
}
