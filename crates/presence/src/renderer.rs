use foundation::geo::GeoPoint;
use tracing::{error, info, warn};

use crate::camera::PointOfView;
use crate::points::PointOfInterest;
use crate::strobe::{MarkerVisual, Ring};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The host cannot provide this kind of surface at all.
    Unsupported,
    InitFailed(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Unsupported => write!(f, "renderer unsupported on this host"),
            RenderError::InitFailed(msg) => write!(f, "renderer init failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// The 3D globe as seen by the controller.
pub trait GlobeSurface {
    fn set_background(&mut self, css_color: &str);
    fn set_atmosphere(&mut self, css_color: &str, altitude: f64);
    fn set_textures(&mut self, globe_url: &str, bump_url: &str);
    fn set_points(&mut self, points: &[PointOfInterest]);
    fn set_marker_visuals(&mut self, visuals: &[MarkerVisual]);
    fn set_halos(&mut self, rings: &[Ring]);
    /// Replaces the animated ripple rings; an empty slice clears them.
    fn set_ripples(&mut self, rings: &[Ring]);

    fn point_of_view(&self) -> PointOfView;
    fn fly_to(&mut self, pov: PointOfView, duration_ms: u32);

    fn auto_rotate(&self) -> bool;
    fn set_auto_rotate(&mut self, on: bool);
    fn set_auto_rotate_speed(&mut self, speed: f64);

    fn set_viewport(&mut self, width: f64, height: f64);
}

/// The 2D tile map fallback.
pub trait MapSurface {
    fn set_markers(&mut self, points: &[PointOfInterest]);
    fn fit_markers(&mut self, max_zoom: u8);
    fn fly_to(&mut self, center: GeoPoint, zoom: u8, duration_ms: u32);
    fn pan_by(&mut self, dx_px: f64, duration_ms: u32);
}

/// Host capabilities and surface constructors.
pub trait RenderBackends {
    fn supports_accelerated_3d(&mut self) -> bool;
    fn create_globe(&mut self) -> Result<Box<dyn GlobeSurface>, RenderError>;
    fn create_map(&mut self) -> Result<Box<dyn MapSurface>, RenderError>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RendererKind {
    Globe,
    Map,
    Inert,
}

impl RendererKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RendererKind::Globe => "globe",
            RendererKind::Map => "map",
            RendererKind::Inert => "inert",
        }
    }
}

pub enum Renderer {
    Globe(Box<dyn GlobeSurface>),
    Map(Box<dyn MapSurface>),
    /// Neither surface could be created; the component stays empty.
    Inert,
}

impl Renderer {
    pub fn kind(&self) -> RendererKind {
        match self {
            Renderer::Globe(_) => RendererKind::Globe,
            Renderer::Map(_) => RendererKind::Map,
            Renderer::Inert => RendererKind::Inert,
        }
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Renderer").field(&self.kind()).finish()
    }
}

/// Picks the globe when the host supports it, else the flat map, else
/// nothing. Each constructor is tried at most once.
pub fn select_renderer(backends: &mut dyn RenderBackends) -> Renderer {
    if backends.supports_accelerated_3d() {
        match backends.create_globe() {
            Ok(globe) => {
                info!(renderer = "globe", "presence renderer ready");
                return Renderer::Globe(globe);
            }
            Err(e) => warn!(error = %e, "globe init failed; falling back to map"),
        }
    } else {
        warn!("accelerated 3D unavailable; falling back to map");
    }

    match backends.create_map() {
        Ok(map) => {
            info!(renderer = "map", "presence renderer ready");
            Renderer::Map(map)
        }
        Err(e) => {
            error!(error = %e, "map init failed; presence stays empty");
            Renderer::Inert
        }
    }
}
