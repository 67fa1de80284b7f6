#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use foundation::geo::GeoPoint;
use foundation::time::Millis;
use presence::camera::{PointOfView, Viewport};
use presence::panel::{BoardingPass, PanelView, SelectorButton, Tooltip};
use presence::points::PointOfInterest;
use presence::renderer::{GlobeSurface, MapSurface, RenderBackends, RenderError};
use presence::strobe::{MarkerVisual, Ring};
use presence::{GlobeManager, Mount, PresenceConfig};
use session::SelectionStore;

#[derive(Debug, Default)]
pub struct GlobeLog {
    pub points: usize,
    pub halos: usize,
    pub textures: Option<(String, String)>,
    pub flights: Vec<(PointOfView, u32)>,
    pub auto_rotate: bool,
    pub visuals: Vec<Vec<MarkerVisual>>,
    pub ripples: Vec<usize>,
    pub viewport: Option<(f64, f64)>,
}

pub struct RecordingGlobe(pub Rc<RefCell<GlobeLog>>);

impl GlobeSurface for RecordingGlobe {
    fn set_background(&mut self, _css_color: &str) {}

    fn set_atmosphere(&mut self, _css_color: &str, _altitude: f64) {}

    fn set_textures(&mut self, globe_url: &str, bump_url: &str) {
        self.0.borrow_mut().textures = Some((globe_url.to_string(), bump_url.to_string()));
    }

    fn set_points(&mut self, points: &[PointOfInterest]) {
        self.0.borrow_mut().points = points.len();
    }

    fn set_marker_visuals(&mut self, visuals: &[MarkerVisual]) {
        self.0.borrow_mut().visuals.push(visuals.to_vec());
    }

    fn set_halos(&mut self, rings: &[Ring]) {
        self.0.borrow_mut().halos = rings.len();
    }

    fn set_ripples(&mut self, rings: &[Ring]) {
        self.0.borrow_mut().ripples.push(rings.len());
    }

    fn point_of_view(&self) -> PointOfView {
        self.0
            .borrow()
            .flights
            .last()
            .map(|(pov, _)| *pov)
            .unwrap_or(PointOfView::new(0.0, 0.0, 2.5))
    }

    fn fly_to(&mut self, pov: PointOfView, duration_ms: u32) {
        self.0.borrow_mut().flights.push((pov, duration_ms));
    }

    fn auto_rotate(&self) -> bool {
        self.0.borrow().auto_rotate
    }

    fn set_auto_rotate(&mut self, on: bool) {
        self.0.borrow_mut().auto_rotate = on;
    }

    fn set_auto_rotate_speed(&mut self, _speed: f64) {}

    fn set_viewport(&mut self, width: f64, height: f64) {
        self.0.borrow_mut().viewport = Some((width, height));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    Markers(usize),
    Fit(u8),
    FlyTo(GeoPoint, u8, u32),
    PanBy(f64, u32),
}

pub struct RecordingMap(pub Rc<RefCell<Vec<MapCall>>>);

impl MapSurface for RecordingMap {
    fn set_markers(&mut self, points: &[PointOfInterest]) {
        self.0.borrow_mut().push(MapCall::Markers(points.len()));
    }

    fn fit_markers(&mut self, max_zoom: u8) {
        self.0.borrow_mut().push(MapCall::Fit(max_zoom));
    }

    fn fly_to(&mut self, center: GeoPoint, zoom: u8, duration_ms: u32) {
        self.0.borrow_mut().push(MapCall::FlyTo(center, zoom, duration_ms));
    }

    fn pan_by(&mut self, dx_px: f64, duration_ms: u32) {
        self.0.borrow_mut().push(MapCall::PanBy(dx_px, duration_ms));
    }
}

/// Backends with switchable capabilities that count constructor calls.
#[derive(Default)]
pub struct FakeBackends {
    pub webgl: bool,
    pub globe_fails: bool,
    pub map_fails: bool,
    pub globe_calls: usize,
    pub map_calls: usize,
    pub globe: Rc<RefCell<GlobeLog>>,
    pub map: Rc<RefCell<Vec<MapCall>>>,
}

impl FakeBackends {
    pub fn webgl() -> Self {
        Self {
            webgl: true,
            ..Self::default()
        }
    }

    pub fn no_webgl() -> Self {
        Self::default()
    }
}

impl RenderBackends for FakeBackends {
    fn supports_accelerated_3d(&mut self) -> bool {
        self.webgl
    }

    fn create_globe(&mut self) -> Result<Box<dyn GlobeSurface>, RenderError> {
        self.globe_calls += 1;
        if self.globe_fails {
            return Err(RenderError::InitFailed("webgl context lost".to_string()));
        }
        Ok(Box::new(RecordingGlobe(self.globe.clone())))
    }

    fn create_map(&mut self) -> Result<Box<dyn MapSurface>, RenderError> {
        self.map_calls += 1;
        if self.map_fails {
            return Err(RenderError::Unsupported);
        }
        Ok(Box::new(RecordingMap(self.map.clone())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCall {
    Card(BoardingPass),
    Selector(Vec<SelectorButton>),
    Checked(usize),
    Exit,
    Enter,
    Tooltip(Option<Tooltip>),
}

#[derive(Clone, Default)]
pub struct RecordingPanel(pub Rc<RefCell<Vec<PanelCall>>>);

impl RecordingPanel {
    pub fn calls(&self) -> Vec<PanelCall> {
        self.0.borrow().clone()
    }

    pub fn cards(&self) -> Vec<&'static str> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PanelCall::Card(pass) => Some(pass.code),
                _ => None,
            })
            .collect()
    }
}

impl PanelView for RecordingPanel {
    fn render_card(&mut self, pass: &BoardingPass) {
        self.0.borrow_mut().push(PanelCall::Card(pass.clone()));
    }

    fn render_selector(&mut self, buttons: &[SelectorButton]) {
        self.0.borrow_mut().push(PanelCall::Selector(buttons.to_vec()));
    }

    fn set_checked(&mut self, index: usize) {
        self.0.borrow_mut().push(PanelCall::Checked(index));
    }

    fn play_card_exit(&mut self) {
        self.0.borrow_mut().push(PanelCall::Exit);
    }

    fn play_card_enter(&mut self) {
        self.0.borrow_mut().push(PanelCall::Enter);
    }

    fn show_tooltip(&mut self, tooltip: Option<&Tooltip>) {
        self.0.borrow_mut().push(PanelCall::Tooltip(tooltip.cloned()));
    }
}

pub const DESKTOP: Viewport = Viewport {
    width: 1440.0,
    height: 900.0,
};

pub const MOBILE: Viewport = Viewport {
    width: 390.0,
    height: 844.0,
};

pub fn mount(
    backends: &mut FakeBackends,
    panel: &RecordingPanel,
    store: impl SelectionStore + 'static,
    viewport: Viewport,
) -> Option<GlobeManager> {
    GlobeManager::mount(
        PresenceConfig::default(),
        Mount {
            has_surface: true,
            backends,
            panel: Some(Box::new(panel.clone())),
            store: Box::new(store),
            viewport,
            seed: 42,
            now: Millis(0.0),
        },
    )
}
