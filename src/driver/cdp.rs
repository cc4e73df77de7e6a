//! ChromiumOxide-backed driver
//!
//! Dispatches raw `Input.dispatchMouseEvent` / `Input.dispatchKeyEvent`
//! commands over CDP and answers geometry queries with in-page
//! JavaScript. Raw input dispatch is deliberate: synthetic DOM events
//! carry `isTrusted: false`, while CDP input events are
//! indistinguishable from hardware input.

use super::{BoundingBox, Driver, Point, Viewport};
use crate::error::{DriverError, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, MouseButton,
};
use chromiumoxide::Page;
use std::sync::Mutex;
use tracing::trace;

/// CDP modifier bitmask values
const MODIFIER_ALT: i64 = 1;
const MODIFIER_CTRL: i64 = 2;
const MODIFIER_META: i64 = 4;
const MODIFIER_SHIFT: i64 = 8;

/// [`Driver`] implementation over a chromiumoxide [`Page`]
pub struct CdpDriver {
    page: Page,
    // CDP mouse button events carry coordinates, so the driver tracks
    // where the pointer last moved to.
    pointer: Mutex<Point>,
    // Currently held modifier keys, applied to subsequent key events so
    // chords like Ctrl+A register as shortcuts rather than text.
    modifiers: Mutex<i64>,
}

impl CdpDriver {
    /// Wrap an attached page
    pub fn new(page: Page) -> Self {
        Self {
            page,
            pointer: Mutex::new(Point::new(0.0, 0.0)),
            modifiers: Mutex::new(0),
        }
    }

    /// The underlying chromiumoxide page
    pub fn page(&self) -> &Page {
        &self.page
    }

    fn pointer_position(&self) -> Point {
        *self.pointer.lock().expect("pointer lock poisoned")
    }

    fn held_modifiers(&self) -> i64 {
        *self.modifiers.lock().expect("modifier lock poisoned")
    }

    fn modifier_bit(key: &str) -> Option<i64> {
        match key {
            "Control" => Some(MODIFIER_CTRL),
            "Alt" => Some(MODIFIER_ALT),
            "Meta" => Some(MODIFIER_META),
            "Shift" => Some(MODIFIER_SHIFT),
            _ => None,
        }
    }

    /// Key/code/virtual-key-code triple for named (non-printing) keys
    fn named_key(key: &str) -> Option<(&'static str, &'static str, i64)> {
        match key {
            "Backspace" => Some(("Backspace", "Backspace", 8)),
            "Tab" => Some(("Tab", "Tab", 9)),
            "Enter" => Some(("Enter", "Enter", 13)),
            "Shift" => Some(("Shift", "ShiftLeft", 16)),
            "Control" => Some(("Control", "ControlLeft", 17)),
            "Alt" => Some(("Alt", "AltLeft", 18)),
            "Escape" => Some(("Escape", "Escape", 27)),
            "Delete" => Some(("Delete", "Delete", 46)),
            "Meta" => Some(("Meta", "MetaLeft", 91)),
            _ => None,
        }
    }

    async fn dispatch_mouse(&self, params: DispatchMouseEventParams) -> Result<()> {
        self.page
            .execute(params)
            .await
            .map_err(|e| DriverError::CommandFailed(e.to_string()))?;
        Ok(())
    }

    async fn dispatch_key(&self, params: DispatchKeyEventParams) -> Result<()> {
        self.page
            .execute(params)
            .await
            .map_err(|e| DriverError::CommandFailed(e.to_string()))?;
        Ok(())
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, script: &str) -> Result<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::CommandFailed(e.to_string()))?
            .into_value()
            .map_err(|e| DriverError::CommandFailed(e.to_string()).into())
    }
}

fn escape_selector(selector: &str) -> String {
    selector.replace('\\', "\\\\").replace('\'', "\\'")
}

fn build_err(e: String) -> DriverError {
    DriverError::CommandFailed(e)
}

#[async_trait]
impl Driver for CdpDriver {
    async fn move_to(&self, x: f64, y: f64) -> Result<()> {
        trace!(x, y, "pointer move");
        let event = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseMoved)
            .x(x)
            .y(y)
            .button(MouseButton::None)
            .build()
            .map_err(build_err)?;
        self.dispatch_mouse(event).await?;
        *self.pointer.lock().expect("pointer lock poisoned") = Point::new(x, y);
        Ok(())
    }

    async fn mouse_down(&self) -> Result<()> {
        let at = self.pointer_position();
        let event = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MousePressed)
            .x(at.x)
            .y(at.y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(build_err)?;
        self.dispatch_mouse(event).await
    }

    async fn mouse_up(&self) -> Result<()> {
        let at = self.pointer_position();
        let event = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseReleased)
            .x(at.x)
            .y(at.y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(build_err)?;
        self.dispatch_mouse(event).await
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        let modifiers = self.held_modifiers();
        let event = if let Some((name, code, vk)) = Self::named_key(key) {
            DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::RawKeyDown)
                .key(name)
                .code(code)
                .windows_virtual_key_code(vk)
                .native_virtual_key_code(vk)
                .modifiers(modifiers)
                .build()
                .map_err(build_err)?
        } else if modifiers != 0 {
            // Under a held modifier the key is a shortcut, not text input
            let upper = key.to_ascii_uppercase();
            DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::RawKeyDown)
                .key(key.to_string())
                .code(format!("Key{upper}"))
                .modifiers(modifiers)
                .build()
                .map_err(build_err)?
        } else {
            DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::KeyDown)
                .text(key.to_string())
                .build()
                .map_err(build_err)?
        };
        self.dispatch_key(event).await?;
        if let Some(bit) = Self::modifier_bit(key) {
            *self.modifiers.lock().expect("modifier lock poisoned") |= bit;
        }
        Ok(())
    }

    async fn release_key(&self, key: &str) -> Result<()> {
        if let Some(bit) = Self::modifier_bit(key) {
            *self.modifiers.lock().expect("modifier lock poisoned") &= !bit;
        }
        let modifiers = self.held_modifiers();
        let event = if let Some((name, code, vk)) = Self::named_key(key) {
            DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::KeyUp)
                .key(name)
                .code(code)
                .windows_virtual_key_code(vk)
                .native_virtual_key_code(vk)
                .modifiers(modifiers)
                .build()
                .map_err(build_err)?
        } else {
            DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::KeyUp)
                .modifiers(modifiers)
                .build()
                .map_err(build_err)?
        };
        self.dispatch_key(event).await
    }

    async fn scroll_by(&self, delta_y: f64) -> Result<()> {
        let at = self.pointer_position();
        let event = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(at.x)
            .y(at.y)
            .button(MouseButton::None)
            .delta_x(0.0)
            .delta_y(delta_y)
            .build()
            .map_err(build_err)?;
        self.dispatch_mouse(event).await
    }

    async fn bounding_box(&self, selector: &str) -> Result<Option<BoundingBox>> {
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector('{}');
                if (!el) return null;
                const r = el.getBoundingClientRect();
                return {{ x: r.x, y: r.y, width: r.width, height: r.height }};
            }})()
            "#,
            escape_selector(selector)
        );
        self.evaluate(&script).await
    }

    async fn text_regions(&self) -> Result<Vec<BoundingBox>> {
        let script = r#"
            (() => {
                const nodes = document.querySelectorAll(
                    'p, h1, h2, h3, h4, h5, h6, li, blockquote, article, td'
                );
                const regions = [];
                for (const el of nodes) {
                    if (el.offsetParent === null) continue;
                    const r = el.getBoundingClientRect();
                    if (r.width < 20 || r.height < 8) continue;
                    if (r.bottom < 0 || r.top > window.innerHeight) continue;
                    regions.push({ x: r.x, y: r.y, width: r.width, height: r.height });
                    if (regions.length >= 40) break;
                }
                return regions;
            })()
        "#;
        self.evaluate(script).await
    }

    async fn interactive_regions(&self, limit: usize) -> Result<Vec<BoundingBox>> {
        let script = format!(
            r#"
            (() => {{
                const nodes = document.querySelectorAll(
                    'a[href], button, input, select, textarea, [role="button"]'
                );
                const regions = [];
                for (const el of nodes) {{
                    if (el.offsetParent === null) continue;
                    const r = el.getBoundingClientRect();
                    if (r.width < 4 || r.height < 4) continue;
                    if (r.bottom < 0 || r.top > window.innerHeight) continue;
                    regions.push({{ x: r.x, y: r.y, width: r.width, height: r.height }});
                    if (regions.length >= {limit}) break;
                }}
                return regions;
            }})()
            "#
        );
        self.evaluate(&script).await
    }

    async fn read_value(&self, selector: &str) -> Result<Option<String>> {
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector('{}');
                if (!el) return null;
                return el.value !== undefined ? el.value : el.textContent;
            }})()
            "#,
            escape_selector(selector)
        );
        self.evaluate(&script).await
    }

    async fn viewport(&self) -> Result<Option<Viewport>> {
        let script = r#"
            (() => ({ width: window.innerWidth, height: window.innerHeight }))()
        "#;
        self.evaluate(script).await
    }
}
