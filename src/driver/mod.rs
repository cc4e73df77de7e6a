//! Input driver contract
//!
//! The simulation engine never talks to a browser directly; it issues
//! primitive pointer/key/wheel commands and geometry queries through the
//! [`Driver`] trait. The engine awaits each call's completion before
//! issuing the next, which is the only ordering guarantee it needs. The
//! driver owns per-session serialization of the underlying transport.

mod cdp;

pub use cdp::CdpDriver;

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// A point in page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate, px
    pub x: f64,
    /// Vertical coordinate, px
    pub y: f64,
}

impl Point {
    /// Construct a point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An element's on-screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    /// Left edge, px
    pub x: f64,
    /// Top edge, px
    pub y: f64,
    /// Width, px
    pub width: f64,
    /// Height, px
    pub height: f64,
}

impl BoundingBox {
    /// Center point of the rectangle
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the rectangle has any visible area
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Viewport {
    /// Inner width, px
    pub width: f64,
    /// Inner height, px
    pub height: f64,
}

impl Viewport {
    /// Whether a page point is inside the visible area
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

/// Asynchronous input driver for one browser session
///
/// Implementations must serialize commands per session; the simulator
/// issues them one at a time and treats any rejection as aborting the
/// in-progress gesture.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Move the virtual pointer to page coordinates
    async fn move_to(&self, x: f64, y: f64) -> Result<()>;

    /// Press the primary mouse button at the current pointer position
    async fn mouse_down(&self) -> Result<()>;

    /// Release the primary mouse button
    async fn mouse_up(&self) -> Result<()>;

    /// Press a key down and leave it held
    ///
    /// `key` is either a single character ("a", " ") or a named key
    /// ("Backspace", "Enter", "Control").
    async fn press_key(&self, key: &str) -> Result<()>;

    /// Release a previously pressed key
    async fn release_key(&self, key: &str) -> Result<()>;

    /// Emit one wheel tick scrolling vertically by `delta_y` px
    async fn scroll_by(&self, delta_y: f64) -> Result<()>;

    /// Resolve an element's on-screen rectangle, if it exists
    async fn bounding_box(&self, selector: &str) -> Result<Option<BoundingBox>>;

    /// Rectangles of visible text-bearing elements, top to bottom
    async fn text_regions(&self) -> Result<Vec<BoundingBox>>;

    /// Rectangles of visible interactive elements (links, buttons, inputs)
    async fn interactive_regions(&self, limit: usize) -> Result<Vec<BoundingBox>>;

    /// Current value (or text content) of an element, if it exists
    async fn read_value(&self, selector: &str) -> Result<Option<String>>;

    /// Viewport dimensions, if a page is attached
    async fn viewport(&self) -> Result<Option<Viewport>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn test_bounding_box_center() {
        let rect = BoundingBox {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 40.0,
        };
        assert_eq!(rect.center(), Point::new(60.0, 40.0));
        assert!(rect.is_visible());
    }

    #[test]
    fn test_viewport_contains() {
        let vp = Viewport {
            width: 1280.0,
            height: 800.0,
        };
        assert!(vp.contains(Point::new(0.0, 0.0)));
        assert!(vp.contains(Point::new(640.0, 400.0)));
        assert!(!vp.contains(Point::new(640.0, 900.0)));
        assert!(!vp.contains(Point::new(-5.0, 400.0)));
    }

    #[test]
    fn test_zero_sized_box_not_visible() {
        let rect = BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 10.0,
        };
        assert!(!rect.is_visible());
    }
}
