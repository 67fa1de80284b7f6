//! The presence controller.
//!
//! [`GlobeManager`] owns the chosen surface, the selection, the running
//! sequence and the side panel. It never reads a clock: every entry point
//! that depends on time takes `now`.

use foundation::time::Millis;
use runtime::event_bus::{Event, EventBus};
use session::SelectionStore;
use tracing::{debug, info, warn};

use crate::camera::{Viewport, base_coordinates};
use crate::config::PresenceConfig;
use crate::map2d::{self, MapAction, MapStep};
use crate::panel::{BoardingPass, CardTransition, PanelView, Tooltip, selector_buttons};
use crate::points::{POINTS, PointOfInterest, index_of};
use crate::profile::profile_for;
use crate::renderer::{
    GlobeSurface, MapSurface, RenderBackends, Renderer, RendererKind, select_renderer,
};
use crate::selection::{ColorPhase, SelectionState};
use crate::sequencer::{self, CameraAction, CameraStep, SequenceKind, SequenceState, Sequencer};
use crate::strobe::{RippleChange, StrobeEngine, glow_halos, ripple_ring};
use crate::texture::ResolvedTextures;

const EVENT_LOG_LEN: usize = 256;

/// What the host hands over when mounting.
pub struct Mount<'a> {
    /// False when the surface container is missing from the page.
    pub has_surface: bool,
    pub backends: &'a mut dyn RenderBackends,
    /// `None` when the side panel container is missing.
    pub panel: Option<Box<dyn PanelView>>,
    pub store: Box<dyn SelectionStore>,
    pub viewport: Viewport,
    /// Seeds the per-marker strobe offsets.
    pub seed: u64,
    pub now: Millis,
}

enum Stage {
    Globe {
        surface: Box<dyn GlobeSurface>,
        sequencer: Sequencer<CameraStep>,
        strobe: StrobeEngine,
    },
    Map {
        surface: Box<dyn MapSurface>,
        sequencer: Sequencer<MapStep>,
    },
}

pub struct GlobeManager {
    config: PresenceConfig,
    stage: Stage,
    panel: Option<Box<dyn PanelView>>,
    store: Box<dyn SelectionStore>,
    selection: SelectionState,
    hovered: Option<usize>,
    viewport: Viewport,
    panel_overlay_px: Option<f64>,
    card: CardTransition,
    events: EventBus,
}

impl GlobeManager {
    /// Builds the component. Returns `None` when there is nothing to draw
    /// into or no renderer could be created.
    pub fn mount(config: PresenceConfig, mount: Mount<'_>) -> Option<Self> {
        let Mount {
            has_surface,
            backends,
            panel,
            store,
            viewport,
            seed,
            now,
        } = mount;

        if !has_surface {
            debug!("presence surface container missing; not mounting");
            return None;
        }

        let stage = match select_renderer(backends) {
            Renderer::Globe(mut surface) => {
                let style = &config.globe;
                surface.set_background(&style.background);
                surface.set_atmosphere(&style.atmosphere_color, style.atmosphere_altitude);
                surface.set_points(&POINTS);
                surface.set_halos(&glow_halos(&POINTS));
                surface.set_auto_rotate(true);
                surface.set_auto_rotate_speed(style.auto_rotate_speed);
                surface.set_viewport(viewport.width, viewport.height);
                surface.fly_to(style.initial_view, style.initial_view_ms);
                Stage::Globe {
                    surface,
                    sequencer: Sequencer::new(),
                    strobe: StrobeEngine::new(POINTS.len(), config.strobe, seed),
                }
            }
            Renderer::Map(mut surface) => {
                surface.set_markers(&POINTS);
                surface.fit_markers(config.globe.map_fit_max_zoom);
                Stage::Map {
                    surface,
                    sequencer: Sequencer::new(),
                }
            }
            Renderer::Inert => return None,
        };

        let mut manager = Self {
            config,
            stage,
            panel,
            store,
            selection: SelectionState::default(),
            hovered: None,
            viewport,
            panel_overlay_px: None,
            card: CardTransition::Idle,
            events: EventBus::bounded(EVENT_LOG_LEN),
        };

        let active = manager.restore_selection();
        manager.selection.current = Some(active);
        if let Some(panel) = manager.panel.as_mut() {
            panel.render_card(&BoardingPass::for_point(&POINTS[active]));
            panel.render_selector(&selector_buttons(Some(active)));
        }
        let kind = manager.renderer_kind();
        manager.events.emit(
            now,
            "mount",
            format!("{} active={}", kind.as_str(), POINTS[active].name),
        );
        Some(manager)
    }

    fn restore_selection(&self) -> usize {
        match self.store.load() {
            Ok(Some(name)) => index_of(&name).unwrap_or_else(|| {
                debug!(name = %name, "stored selection unknown; using first point");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                debug!(error = %e, "could not read stored selection");
                0
            }
        }
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    pub fn renderer_kind(&self) -> RendererKind {
        match self.stage {
            Stage::Globe { .. } => RendererKind::Globe,
            Stage::Map { .. } => RendererKind::Map,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn color_phase(&self) -> ColorPhase {
        self.selection.color_phase
    }

    pub fn current_point(&self) -> Option<&'static PointOfInterest> {
        self.selection.current.and_then(|idx| POINTS.get(idx))
    }

    pub fn sequence_state(&self) -> SequenceState {
        match &self.stage {
            Stage::Globe { sequencer, .. } => sequencer.state(),
            Stage::Map { sequencer, .. } => sequencer.state(),
        }
    }

    /// Sequence steps still waiting on the timer queue.
    pub fn pending_steps(&self) -> usize {
        match &self.stage {
            Stage::Globe { sequencer, .. } => sequencer.pending(),
            Stage::Map { sequencer, .. } => sequencer.pending(),
        }
    }

    pub fn next_due(&self) -> Option<Millis> {
        match &self.stage {
            Stage::Globe { sequencer, .. } => sequencer.next_due(),
            Stage::Map { sequencer, .. } => sequencer.next_due(),
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn card_transition(&self) -> CardTransition {
        self.card
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter()
    }

    pub fn select_by_name(&mut self, name: &str, now: Millis) -> bool {
        match index_of(name) {
            Some(idx) => self.select(idx, now),
            None => {
                warn!(name = %name, "ignoring selection of unknown point");
                false
            }
        }
    }

    /// Handles a click on a selector button or marker.
    pub fn select(&mut self, index: usize, now: Millis) -> bool {
        let Some(point) = POINTS.get(index) else {
            warn!(index, "ignoring selection of unknown point");
            return false;
        };
        let previous = self.selection.current;

        if let Some(panel) = self.panel.as_mut() {
            panel.set_checked(index);
            if self.card.begin(index) {
                panel.play_card_exit();
            }
        }

        if let Err(e) = self.store.save(point.name) {
            debug!(error = %e, "could not persist selection");
        }

        let class = self.viewport.class(&self.config.viewport);
        let (scheduled, cancelled) = match &mut self.stage {
            Stage::Globe {
                surface, sequencer, ..
            } => {
                let kind = match previous {
                    Some(prev) if prev != index => SequenceKind::Switch,
                    _ => SequenceKind::Refocus,
                };
                // Rotation is already off while a sequence runs; keep the
                // value saved when it started.
                if !sequencer.is_running() {
                    self.selection.saved_auto_rotate = surface.auto_rotate();
                }
                surface.set_auto_rotate(false);

                let base = base_coordinates(point, class, &self.config.viewport);
                let steps = sequencer::plan(
                    kind,
                    surface.point_of_view(),
                    base,
                    profile_for(point.name),
                    &self.config.sequence,
                );
                let started = sequencer.start(now, steps);
                for step in &started.immediate {
                    apply_camera_step(&mut **surface, &mut self.selection, step);
                }
                (started.scheduled, started.cancelled)
            }
            Stage::Map { surface, sequencer } => {
                let overlay = map2d::overlay_width(class, self.panel_overlay_px);
                let center = map2d::map_center(point, overlay, &self.config.viewport);
                let started = sequencer.start(now, map2d::plan(center));
                for step in &started.immediate {
                    apply_map_step(&mut **surface, step, overlay, &self.config);
                }
                (started.scheduled, started.cancelled)
            }
        };

        self.selection.current = Some(index);
        debug!(
            point = point.name,
            scheduled,
            cancelled,
            "selection sequence started"
        );
        self.events.emit(
            now,
            "select",
            format!("{} scheduled={scheduled} cancelled={cancelled}", point.name),
        );
        true
    }

    /// Runs due sequence steps and refreshes the strobe. Returns how many
    /// steps ran.
    pub fn tick(&mut self, now: Millis) -> usize {
        let class = self.viewport.class(&self.config.viewport);
        let mut ran = 0;
        match &mut self.stage {
            Stage::Globe {
                surface,
                sequencer,
                strobe,
            } => {
                while let Some(step) = sequencer.pop_due(now) {
                    apply_camera_step(&mut **surface, &mut self.selection, &step);
                    self.events
                        .emit(now, "step", format!("{} +{}ms", step.state.as_str(), step.offset_ms));
                    ran += 1;
                }
                if strobe.due(now) {
                    let frame = strobe.frame(
                        now,
                        self.selection.current,
                        self.selection.color_phase,
                        self.hovered,
                    );
                    surface.set_marker_visuals(&frame.markers);
                    match frame.ripple {
                        RippleChange::Emit(idx) => {
                            if let Some(point) = POINTS.get(idx) {
                                surface.set_ripples(&[ripple_ring(point)]);
                            }
                        }
                        RippleChange::Clear => surface.set_ripples(&[]),
                        RippleChange::Unchanged => {}
                    }
                }
            }
            Stage::Map { surface, sequencer } => {
                let overlay = map2d::overlay_width(class, self.panel_overlay_px);
                while let Some(step) = sequencer.pop_due(now) {
                    apply_map_step(&mut **surface, &step, overlay, &self.config);
                    self.events
                        .emit(now, "step", format!("{} +{}ms", step.state.as_str(), step.offset_ms));
                    ran += 1;
                }
            }
        }
        ran
    }

    /// Records the hovered marker and returns the tooltip to show.
    pub fn set_hovered(&mut self, index: Option<usize>) -> Option<Tooltip> {
        self.hovered = index.filter(|idx| *idx < POINTS.len());
        let tooltip = self.hovered.map(|idx| Tooltip::for_point(&POINTS[idx]));
        if let Some(panel) = self.panel.as_mut() {
            panel.show_tooltip(tooltip.as_ref());
        }
        tooltip
    }

    /// Forwards the card's animation-end event.
    pub fn on_card_animation_end(&mut self) {
        let Some(idx) = self.card.on_animation_end() else {
            return;
        };
        if let Some(panel) = self.panel.as_mut() {
            panel.render_card(&BoardingPass::for_point(&POINTS[idx]));
            panel.play_card_enter();
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        if let Stage::Globe { surface, .. } = &mut self.stage {
            surface.set_viewport(self.viewport.width, self.viewport.height);
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Width of the side panel when it floats over the surface; `None` when
    /// it is laid out beside or below it.
    pub fn set_panel_overlay(&mut self, width_px: Option<f64>) {
        self.panel_overlay_px = width_px;
    }

    pub fn apply_textures(&mut self, textures: &ResolvedTextures) {
        if let Stage::Globe { surface, .. } = &mut self.stage {
            info!(globe = %textures.globe, bump = %textures.bump, "globe textures resolved");
            surface.set_textures(&textures.globe, &textures.bump);
        }
    }
}

impl std::fmt::Debug for GlobeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobeManager")
            .field("renderer", &self.renderer_kind())
            .field("selection", &self.selection)
            .field("sequence", &self.sequence_state())
            .finish_non_exhaustive()
    }
}

fn apply_camera_step(surface: &mut dyn GlobeSurface, selection: &mut SelectionState, step: &CameraStep) {
    match step.action {
        CameraAction::Fly { pov, duration_ms } => surface.fly_to(pov, duration_ms),
        CameraAction::Phase { phase } => selection.color_phase = phase,
        CameraAction::Finish => {
            surface.set_auto_rotate(selection.saved_auto_rotate);
            selection.color_phase = ColorPhase::Red;
        }
    }
}

fn apply_map_step(
    surface: &mut dyn MapSurface,
    step: &MapStep,
    overlay: Option<f64>,
    config: &PresenceConfig,
) {
    match step.action {
        MapAction::FlyTo {
            center,
            zoom,
            duration_ms,
        } => surface.fly_to(center, zoom, duration_ms),
        MapAction::ClearPanel { duration_ms } => {
            if let Some(width) = overlay {
                surface.pan_by(map2d::clear_panel_px(width, &config.viewport), duration_ms);
            }
        }
    }
}
