use foundation::geo::GeoPoint;
use presence::camera::PointOfView;
use presence::points::PointOfInterest;
use presence::renderer::{GlobeSurface, MapSurface, RenderBackends, RenderError};
use presence::strobe::{MarkerVisual, Ring};
use presence::texture::ImageProbe;
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::ffi::{self, PresenceGlobe, PresenceMap};

fn js_error(err: JsValue) -> RenderError {
    RenderError::InitFailed(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Serialize)]
struct MarkerJs {
    altitude: f64,
    radius: f64,
    color: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RingJs {
    lat: f64,
    lng: f64,
    altitude: f64,
    color: String,
    max_radius: f64,
    propagation_speed: f64,
    repeat_period: f64,
}

fn rings_json(rings: &[Ring]) -> String {
    let rings: Vec<RingJs> = rings
        .iter()
        .map(|r| RingJs {
            lat: r.lat,
            lng: r.lng,
            altitude: r.altitude,
            color: r.color.to_css(),
            max_radius: r.max_radius,
            propagation_speed: r.propagation_speed,
            repeat_period: r.repeat_period_ms,
        })
        .collect();
    to_json(&rings)
}

pub struct JsGlobe {
    globe: PresenceGlobe,
    /// Returned when the adapter reports an unreadable point of view.
    last_pov: PointOfView,
}

impl GlobeSurface for JsGlobe {
    fn set_background(&mut self, css_color: &str) {
        self.globe.set_background(css_color);
    }

    fn set_atmosphere(&mut self, css_color: &str, altitude: f64) {
        self.globe.set_atmosphere(css_color, altitude);
    }

    fn set_textures(&mut self, globe_url: &str, bump_url: &str) {
        self.globe.set_textures(globe_url, bump_url);
    }

    fn set_points(&mut self, points: &[PointOfInterest]) {
        self.globe.set_points(&to_json(points));
    }

    fn set_marker_visuals(&mut self, visuals: &[MarkerVisual]) {
        let markers: Vec<MarkerJs> = visuals
            .iter()
            .map(|v| MarkerJs {
                altitude: v.altitude,
                radius: v.radius,
                color: v.color.to_css(),
            })
            .collect();
        self.globe.set_markers(&to_json(&markers));
    }

    fn set_halos(&mut self, rings: &[Ring]) {
        self.globe.set_halos(&rings_json(rings));
    }

    fn set_ripples(&mut self, rings: &[Ring]) {
        self.globe.set_ripples(&rings_json(rings));
    }

    fn point_of_view(&self) -> PointOfView {
        serde_json::from_str(&self.globe.point_of_view()).unwrap_or(self.last_pov)
    }

    fn fly_to(&mut self, pov: PointOfView, duration_ms: u32) {
        self.last_pov = pov;
        self.globe.fly_to(pov.lat, pov.lng, pov.altitude, duration_ms);
    }

    fn auto_rotate(&self) -> bool {
        self.globe.auto_rotate()
    }

    fn set_auto_rotate(&mut self, on: bool) {
        self.globe.set_auto_rotate(on);
    }

    fn set_auto_rotate_speed(&mut self, speed: f64) {
        self.globe.set_auto_rotate_speed(speed);
    }

    fn set_viewport(&mut self, width: f64, height: f64) {
        self.globe.set_size(width, height);
    }
}

pub struct JsMap {
    map: PresenceMap,
}

impl MapSurface for JsMap {
    fn set_markers(&mut self, points: &[PointOfInterest]) {
        self.map.set_markers(&to_json(points));
    }

    fn fit_markers(&mut self, max_zoom: u8) {
        self.map.fit_markers(max_zoom);
    }

    fn fly_to(&mut self, center: GeoPoint, zoom: u8, duration_ms: u32) {
        self.map.fly_to(center.lat, center.lng, zoom, duration_ms);
    }

    fn pan_by(&mut self, dx_px: f64, duration_ms: u32) {
        self.map.pan_by(dx_px, duration_ms);
    }
}

/// Constructs surfaces inside the `#map` element.
pub struct DomBackends {
    pub container: web_sys::Element,
    pub initial_view: PointOfView,
}

impl RenderBackends for DomBackends {
    fn supports_accelerated_3d(&mut self) -> bool {
        ffi::supports_webgl().unwrap_or(false)
    }

    fn create_globe(&mut self) -> Result<Box<dyn GlobeSurface>, RenderError> {
        let globe = ffi::create_presence_globe(&self.container).map_err(js_error)?;
        Ok(Box::new(JsGlobe {
            globe,
            last_pov: self.initial_view,
        }))
    }

    fn create_map(&mut self) -> Result<Box<dyn MapSurface>, RenderError> {
        let map = ffi::create_presence_map(&self.container).map_err(js_error)?;
        Ok(Box::new(JsMap { map }))
    }
}

/// Loads candidate images through the page's `probeImage`.
pub struct JsImageProbe;

impl ImageProbe for JsImageProbe {
    async fn probe(&self, url: &str) -> bool {
        let Ok(promise) = ffi::probe_image(url) else {
            return false;
        };
        match JsFuture::from(promise).await {
            Ok(loaded) => loaded.as_bool().unwrap_or(false),
            Err(_) => false,
        }
    }
}
