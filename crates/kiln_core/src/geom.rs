//! Screen geometry: points and inclusive areas
//!
//! Coordinates are absolute display pixels. An [`Area`] is inclusive on all
//! four edges, so an area with `x1 == x2` is one pixel wide.

/// A display coordinate in pixels
pub type Coord = i32;

/// A point on the display
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

/// An inclusive rectangle in absolute coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Area {
    pub x1: Coord,
    pub y1: Coord,
    pub x2: Coord,
    pub y2: Coord,
}

impl Area {
    pub const fn new(x1: Coord, y1: Coord, x2: Coord, y2: Coord) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create an area from its top-left corner and size
    pub const fn with_size(x: Coord, y: Coord, width: Coord, height: Coord) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width - 1,
            y2: y + height - 1,
        }
    }

    pub const fn width(&self) -> Coord {
        self.x2 - self.x1 + 1
    }

    pub const fn height(&self) -> Coord {
        self.y2 - self.y1 + 1
    }

    /// Number of pixels covered (0 for degenerate areas)
    pub fn size(&self) -> u32 {
        if self.width() <= 0 || self.height() <= 0 {
            return 0;
        }
        (self.width() as u32) * (self.height() as u32)
    }

    /// Keep `x1` and change `x2` so the area becomes `width` wide
    pub fn set_width(&mut self, width: Coord) {
        self.x2 = self.x1 + width - 1;
    }

    /// Keep `y1` and change `y2` so the area becomes `height` tall
    pub fn set_height(&mut self, height: Coord) {
        self.y2 = self.y1 + height - 1;
    }

    /// Move the area by a delta
    pub fn translate(&mut self, dx: Coord, dy: Coord) {
        self.x1 += dx;
        self.x2 += dx;
        self.y1 += dy;
        self.y2 += dy;
    }

    /// Return the area grown by `amount` on every side
    pub fn expanded(&self, amount: Coord) -> Area {
        Area::new(
            self.x1 - amount,
            self.y1 - amount,
            self.x2 + amount,
            self.y2 + amount,
        )
    }

    /// Common part of two areas, `None` if they do not overlap
    pub fn intersect(&self, other: &Area) -> Option<Area> {
        let res = Area::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        );
        if res.x1 > res.x2 || res.y1 > res.y2 {
            None
        } else {
            Some(res)
        }
    }

    /// Smallest area containing both areas
    pub fn join(&self, other: &Area) -> Area {
        Area::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Check if `other` lies completely inside this area
    pub fn includes(&self, other: &Area) -> bool {
        other.x1 >= self.x1 && other.y1 >= self.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    /// Check if a point lies on this area
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }
}
