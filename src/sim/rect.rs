//! Axis-aligned rectangles shared by every runner entity
//!
//! Screen space: x grows right, y grows down, so `bottom()` is the larger y.

use glam::Vec2;
use serde::Serialize;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test; rectangles sharing only an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Horizontal overlap only (used by the platform landing band)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Move the bottom edge to `y`, keeping the height
    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }
}

/// Anything occupying a rectangle in the runner's world
pub trait Bounded {
    fn bounds(&self) -> &Rect;
    fn bounds_mut(&mut self) -> &mut Rect;

    fn overlaps<B: Bounded + ?Sized>(&self, other: &B) -> bool {
        self.bounds().overlaps(other.bounds())
    }
}

impl Bounded for Rect {
    fn bounds(&self) -> &Rect {
        self
    }

    fn bounds_mut(&mut self) -> &mut Rect {
        self
    }
}

/// Scroll every entity left by `dx`, then drop the ones fully past the left edge
pub fn scroll_and_cull<T: Bounded>(entities: &mut Vec<T>, dx: f32) {
    for entity in entities.iter_mut() {
        entity.bounds_mut().pos.x -= dx;
    }
    entities.retain(|e| e.bounds().right() >= 0.0);
}
