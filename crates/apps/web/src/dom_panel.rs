use presence::panel::{BoardingPass, PanelView, SelectorButton, Tooltip};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

const PASS_ID: &str = "bpCard";
const SELECTOR_ID: &str = "citySelector";
const TOOLTIP_ID: &str = "mapTooltip";
const TOOLTIP_CURSOR_GAP_PX: f64 = 12.0;

/// Side panel rendered into `#mapWrap`.
pub struct DomPanel {
    document: Document,
    aside: Option<Element>,
    pass: Element,
    selector: Element,
    tooltip: Option<Element>,
    // Kept alive for as long as the listeners are attached.
    on_click: Vec<Closure<dyn FnMut()>>,
    on_animation_end: Option<Closure<dyn FnMut()>>,
    on_mouse_move: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl DomPanel {
    /// Finds the card and selector, creating the aside if the page does not
    /// ship one. `None` when `#mapWrap` is missing.
    pub fn attach(document: &Document) -> Result<Option<Self>, JsValue> {
        let Some(wrap) = document.get_element_by_id("mapWrap") else {
            return Ok(None);
        };

        let (aside, pass, selector) = match document.get_element_by_id(PASS_ID) {
            Some(pass) => {
                let selector = match document.get_element_by_id(SELECTOR_ID) {
                    Some(sel) => sel,
                    None => {
                        let sel = document.create_element("div")?;
                        sel.set_id(SELECTOR_ID);
                        sel.set_class_name("city-selector");
                        wrap.append_child(&sel)?;
                        sel
                    }
                };
                let aside = pass.closest(".map-side")?;
                (aside, pass, selector)
            }
            None => {
                let aside = document.create_element("aside")?;
                aside.set_class_name("map-side");
                let pass = document.create_element("div")?;
                pass.set_id(PASS_ID);
                pass.set_class_name("bp-card");
                let selector = document.create_element("div")?;
                selector.set_id(SELECTOR_ID);
                selector.set_class_name("city-selector");
                aside.append_child(&pass)?;
                aside.append_child(&selector)?;
                wrap.append_child(&aside)?;
                (Some(aside), pass, selector)
            }
        };

        let on_animation_end = Closure::<dyn FnMut()>::new(crate::presence_card_animation_end);
        pass.add_event_listener_with_callback(
            "animationend",
            on_animation_end.as_ref().unchecked_ref(),
        )?;

        let tip_document = document.clone();
        let on_mouse_move = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            let Some(tip) = tip_document.get_element_by_id(TOOLTIP_ID) else {
                return;
            };
            let (left, top) = tooltip_position(e.client_x() as f64, e.client_y() as f64);
            if let Ok(tip) = tip.dyn_into::<HtmlElement>() {
                let style = tip.style();
                let _ = style.set_property("left", &format!("{left}px"));
                let _ = style.set_property("top", &format!("{top}px"));
            }
        });
        if let Some(window) = web_sys::window() {
            window.add_event_listener_with_callback(
                "mousemove",
                on_mouse_move.as_ref().unchecked_ref(),
            )?;
        }

        Ok(Some(Self {
            document: document.clone(),
            aside,
            pass,
            selector,
            tooltip: document.get_element_by_id(TOOLTIP_ID),
            on_click: Vec::new(),
            on_animation_end: Some(on_animation_end),
            on_mouse_move: Some(on_mouse_move),
        }))
    }

    /// Width of the panel when it floats over the surface.
    pub fn overlay_width(&self) -> Option<f64> {
        floating_width(self.aside.as_ref()?)
    }

    fn tooltip(&mut self) -> Option<&Element> {
        if self.tooltip.is_none() {
            let tip = self.document.create_element("div").ok()?;
            tip.set_id(TOOLTIP_ID);
            tip.set_class_name("map-tooltip");
            tip.set_attribute("style", "position: fixed; pointer-events: none; z-index: 1000")
                .ok()?;
            self.document.body()?.append_child(&tip).ok()?;
            self.tooltip = Some(tip);
        }
        self.tooltip.as_ref()
    }

    fn detach(&mut self) {
        if let Some(cb) = self.on_animation_end.take() {
            let _ = self
                .pass
                .remove_event_listener_with_callback("animationend", cb.as_ref().unchecked_ref());
        }
        if let (Some(cb), Some(window)) = (self.on_mouse_move.take(), web_sys::window()) {
            let _ = window
                .remove_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
        }
        self.selector.set_inner_html("");
        self.on_click.clear();
    }
}

impl Drop for DomPanel {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Width of `aside` when it is absolutely positioned over the surface.
pub fn floating_width(aside: &Element) -> Option<f64> {
    let style = web_sys::window()?.get_computed_style(aside).ok()??;
    let position = style.get_property_value("position").ok()?;
    (position == "absolute").then(|| aside.client_width() as f64)
}

/// Fixed-position offset of the tooltip for a cursor at `(x, y)`.
fn tooltip_position(client_x: f64, client_y: f64) -> (f64, f64) {
    (client_x + TOOLTIP_CURSOR_GAP_PX, client_y + TOOLTIP_CURSOR_GAP_PX)
}

fn card_html(pass: &BoardingPass) -> String {
    format!(
        r#"<div class="bp-head">
  <div class="bp-route"><span class="bp-iata">{code}</span><span class="bp-arrow">→</span><span class="bp-city">{city}</span></div>
  <div class="bp-tag">BOARDING · PRIORITY</div>
</div>
<div class="bp-perf"></div>
<div class="bp-desc">{desc}</div>
<div class="bp-meta">
  <div>Gate <strong>{gate}</strong></div>
  <div>Seat <strong>{seat}</strong></div>
  <div>Zone <strong>{zone}</strong></div>
</div>"#,
        code = pass.code,
        city = pass.city,
        desc = pass.description,
        gate = pass.gate,
        seat = pass.seat,
        zone = pass.zone,
    )
}

impl PanelView for DomPanel {
    fn render_card(&mut self, pass: &BoardingPass) {
        self.pass.set_inner_html(&card_html(pass));
    }

    fn render_selector(&mut self, buttons: &[SelectorButton]) {
        self.selector.set_inner_html("");
        self.on_click.clear();
        for button in buttons {
            let Ok(el) = self.document.create_element("button") else {
                continue;
            };
            el.set_class_name("city-btn");
            let _ = el.set_attribute("type", "button");
            let _ = el.set_attribute("role", "radio");
            let _ = el.set_attribute("aria-checked", if button.checked { "true" } else { "false" });
            el.set_text_content(Some(button.label));

            let name = button.name;
            let cb = Closure::<dyn FnMut()>::new(move || crate::presence_select(name));
            if el
                .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
                .is_ok()
            {
                self.on_click.push(cb);
            }
            let _ = self.selector.append_child(&el);
        }
    }

    fn set_checked(&mut self, index: usize) {
        let children = self.selector.children();
        for i in 0..children.length() {
            if let Some(el) = children.item(i) {
                let checked = i as usize == index;
                let _ = el.set_attribute("aria-checked", if checked { "true" } else { "false" });
            }
        }
    }

    fn play_card_exit(&mut self) {
        let classes = self.pass.class_list();
        let _ = classes.remove_1("bp-enter");
        let _ = classes.add_1("bp-exit");
    }

    fn play_card_enter(&mut self) {
        let classes = self.pass.class_list();
        let _ = classes.remove_1("bp-exit");
        // Force a reflow so the enter animation restarts.
        let _ = self.pass.client_width();
        let _ = classes.add_1("bp-enter");
    }

    fn show_tooltip(&mut self, tooltip: Option<&Tooltip>) {
        let Some(tip) = self.tooltip() else {
            return;
        };
        match tooltip {
            Some(t) => {
                tip.set_inner_html(&format!("<strong>{}</strong><br>{}", t.title, t.body));
                let _ = tip.class_list().add_1("is-visible");
            }
            None => {
                let _ = tip.class_list().remove_1("is-visible");
            }
        }
    }
}
