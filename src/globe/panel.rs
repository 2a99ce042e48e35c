//! The information panel that shows the highlighted point's title and text.

use std::cell::RefCell;

/// Show/hide capability of the location panel.
///
/// `hide` only acts on a visible panel, so calling it repeatedly changes nothing.
pub trait InfoPanel {
    fn show(&self, title: &str, text: &str);
    fn hide(&self);
    fn is_visible(&self) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    pub visible: bool,
    pub title: String,
    pub text: String,
}

/// In-memory panel for targets without a DOM. Transitions are logged.
#[derive(Debug, Default)]
pub struct HeadlessPanel {
    state: RefCell<PanelState>,
}

impl HeadlessPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state.borrow().clone()
    }

    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }
}

impl InfoPanel for HeadlessPanel {
    fn show(&self, title: &str, text: &str) {
        let mut state = self.state.borrow_mut();
        if !state.visible || state.title != title {
            log::info!("showing location panel for {}", title);
        }
        state.visible = true;
        state.title = title.to_string();
        state.text = text.to_string();
    }

    fn hide(&self) {
        let mut state = self.state.borrow_mut();
        if state.visible {
            log::info!("hiding location panel");
            state.visible = false;
        }
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }
}

/// The page's `#LocationData` element: a `hidden` class toggles it, a `span` holds the
/// title and a `p` the text.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct DomPanel {
    selector: String,
}

#[cfg(target_arch = "wasm32")]
impl DomPanel {
    pub const HIDDEN_CLASS: &'static str = "hidden";

    pub fn new() -> Self {
        Self::with_selector("#LocationData")
    }

    pub fn with_selector(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    fn query(&self, suffix: &str) -> Option<web_sys::Element> {
        let document = web_sys::window()?.document()?;
        document
            .query_selector(&format!("{}{}", self.selector, suffix))
            .ok()
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for DomPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl InfoPanel for DomPanel {
    fn show(&self, title: &str, text: &str) {
        let (Some(panel), Some(title_el), Some(text_el)) =
            (self.query(""), self.query(" span"), self.query(" p"))
        else {
            return;
        };
        if panel.class_list().remove_1(Self::HIDDEN_CLASS).is_err() {
            log::warn!("could not reveal {}", self.selector);
        }
        title_el.set_text_content(Some(title));
        text_el.set_text_content(Some(text));
    }

    fn hide(&self) {
        let Some(panel) = self.query("") else {
            return;
        };
        let classes = panel.class_list();
        if !classes.contains(Self::HIDDEN_CLASS) && classes.add_1(Self::HIDDEN_CLASS).is_err() {
            log::warn!("could not hide {}", self.selector);
        }
    }

    fn is_visible(&self) -> bool {
        self.query("")
            .map(|panel| !panel.class_list().contains(Self::HIDDEN_CLASS))
            .unwrap_or(false)
    }
}
