//! Shared test scaffolding: a scripted in-memory driver that records
//! every primitive command the simulator issues.

use async_trait::async_trait;
use mimic_web::driver::{BoundingBox, Driver, Viewport};
use mimic_web::error::Result;
use std::collections::HashMap;
use std::sync::Mutex;

/// One primitive command observed by the mock driver
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Move { x: f64, y: f64 },
    MouseDown,
    MouseUp,
    KeyDown(String),
    KeyUp(String),
    Scroll(f64),
}

/// Driver double backed by a scripted page layout
pub struct MockDriver {
    events: Mutex<Vec<Event>>,
    boxes: HashMap<String, BoundingBox>,
    texts: Vec<BoundingBox>,
    interactives: Vec<BoundingBox>,
    values: HashMap<String, String>,
    viewport: Option<Viewport>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            boxes: HashMap::new(),
            texts: Vec::new(),
            interactives: Vec::new(),
            values: HashMap::new(),
            viewport: Some(Viewport {
                width: 1280.0,
                height: 800.0,
            }),
        }
    }
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a page with no queryable viewport
    pub fn without_viewport(mut self) -> Self {
        self.viewport = None;
        self
    }

    /// Register an element rectangle for a selector
    pub fn with_element(mut self, selector: &str, rect: BoundingBox) -> Self {
        self.boxes.insert(selector.to_string(), rect);
        self
    }

    /// Register visible text regions
    pub fn with_text_regions(mut self, regions: Vec<BoundingBox>) -> Self {
        self.texts = regions;
        self
    }

    /// Register visible interactive regions
    pub fn with_interactive_regions(mut self, regions: Vec<BoundingBox>) -> Self {
        self.interactives = regions;
        self
    }

    /// Register a readable value for a selector
    pub fn with_value(mut self, selector: &str, value: &str) -> Self {
        self.values.insert(selector.to_string(), value.to_string());
        self
    }

    /// Snapshot of all recorded events, in order
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// The text a field would hold after replaying the key events
    pub fn typed_text(&self) -> String {
        let mut out = String::new();
        for event in self.events.lock().unwrap().iter() {
            if let Event::KeyDown(key) = event {
                if key == "Backspace" {
                    out.pop();
                } else if key.chars().count() == 1 {
                    out.push_str(key);
                }
            }
        }
        out
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn move_to(&self, x: f64, y: f64) -> Result<()> {
        self.record(Event::Move { x, y });
        Ok(())
    }

    async fn mouse_down(&self) -> Result<()> {
        self.record(Event::MouseDown);
        Ok(())
    }

    async fn mouse_up(&self) -> Result<()> {
        self.record(Event::MouseUp);
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        self.record(Event::KeyDown(key.to_string()));
        Ok(())
    }

    async fn release_key(&self, key: &str) -> Result<()> {
        self.record(Event::KeyUp(key.to_string()));
        Ok(())
    }

    async fn scroll_by(&self, delta_y: f64) -> Result<()> {
        self.record(Event::Scroll(delta_y));
        Ok(())
    }

    async fn bounding_box(&self, selector: &str) -> Result<Option<BoundingBox>> {
        Ok(self.boxes.get(selector).copied())
    }

    async fn text_regions(&self) -> Result<Vec<BoundingBox>> {
        Ok(self.texts.clone())
    }

    async fn interactive_regions(&self, limit: usize) -> Result<Vec<BoundingBox>> {
        Ok(self.interactives.iter().take(limit).copied().collect())
    }

    async fn read_value(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.values.get(selector).cloned())
    }

    async fn viewport(&self) -> Result<Option<Viewport>> {
        Ok(self.viewport)
    }
}

/// Shorthand rectangle constructor
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> BoundingBox {
    BoundingBox {
        x,
        y,
        width,
        height,
    }
}
