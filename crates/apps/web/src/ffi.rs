// Bindings to the page's JS adapters. The adapters wrap the actual globe
// and tile-map libraries; they hold no presence state of their own and call
// back into `presence_select` / `presence_hover` on user input.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    pub type PresenceGlobe;

    #[wasm_bindgen(catch, js_name = createPresenceGlobe)]
    pub fn create_presence_globe(el: &web_sys::Element) -> Result<PresenceGlobe, JsValue>;

    #[wasm_bindgen(method, js_name = setBackground)]
    pub fn set_background(this: &PresenceGlobe, css_color: &str);

    #[wasm_bindgen(method, js_name = setAtmosphere)]
    pub fn set_atmosphere(this: &PresenceGlobe, css_color: &str, altitude: f64);

    #[wasm_bindgen(method, js_name = setTextures)]
    pub fn set_textures(this: &PresenceGlobe, globe_url: &str, bump_url: &str);

    #[wasm_bindgen(method, js_name = setPoints)]
    pub fn set_points(this: &PresenceGlobe, points_json: &str);

    #[wasm_bindgen(method, js_name = setMarkers)]
    pub fn set_markers(this: &PresenceGlobe, markers_json: &str);

    #[wasm_bindgen(method, js_name = setHalos)]
    pub fn set_halos(this: &PresenceGlobe, rings_json: &str);

    #[wasm_bindgen(method, js_name = setRipples)]
    pub fn set_ripples(this: &PresenceGlobe, rings_json: &str);

    /// `{"lat":..,"lng":..,"altitude":..}`
    #[wasm_bindgen(method, js_name = pointOfView)]
    pub fn point_of_view(this: &PresenceGlobe) -> String;

    #[wasm_bindgen(method, js_name = flyTo)]
    pub fn fly_to(this: &PresenceGlobe, lat: f64, lng: f64, altitude: f64, duration_ms: u32);

    #[wasm_bindgen(method, js_name = autoRotate)]
    pub fn auto_rotate(this: &PresenceGlobe) -> bool;

    #[wasm_bindgen(method, js_name = setAutoRotate)]
    pub fn set_auto_rotate(this: &PresenceGlobe, on: bool);

    #[wasm_bindgen(method, js_name = setAutoRotateSpeed)]
    pub fn set_auto_rotate_speed(this: &PresenceGlobe, speed: f64);

    #[wasm_bindgen(method, js_name = setSize)]
    pub fn set_size(this: &PresenceGlobe, width: f64, height: f64);
}

#[wasm_bindgen]
extern "C" {
    pub type PresenceMap;

    #[wasm_bindgen(catch, js_name = createPresenceMap)]
    pub fn create_presence_map(el: &web_sys::Element) -> Result<PresenceMap, JsValue>;

    #[wasm_bindgen(method, js_name = setMarkers)]
    pub fn set_markers(this: &PresenceMap, points_json: &str);

    #[wasm_bindgen(method, js_name = fitMarkers)]
    pub fn fit_markers(this: &PresenceMap, max_zoom: u8);

    #[wasm_bindgen(method, js_name = flyTo)]
    pub fn fly_to(this: &PresenceMap, lat: f64, lng: f64, zoom: u8, duration_ms: u32);

    #[wasm_bindgen(method, js_name = panBy)]
    pub fn pan_by(this: &PresenceMap, dx_px: f64, duration_ms: u32);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = supportsWebGL)]
    pub fn supports_webgl() -> Result<bool, JsValue>;

    /// Resolves to `true` once the image loaded, `false` on error.
    #[wasm_bindgen(catch, js_name = probeImage)]
    pub fn probe_image(url: &str) -> Result<js_sys::Promise, JsValue>;
}
