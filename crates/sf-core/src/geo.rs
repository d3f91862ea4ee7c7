//! Spatial primitives (component C1): 2-D vectors, axis-aligned rectangles,
//! separating-axis overlap, and segment-vs-rectangle intersection.
//!
//! All units are millimetres stored as `f32`. Comparisons tolerate at most
//! `EPSILON` of float slop — no looser epsilon is used anywhere in this
//! crate.

/// Tolerance used by every near-zero / near-equal comparison in this module.
pub const EPSILON: f32 = 1e-4;

/// A 2-D vector / point in millimetres.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction, or `Vec2::ZERO` if `self` is (near)
    /// zero length.
    #[inline]
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len <= EPSILON {
            Vec2::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    /// Clamp the vector's length to at most `max_len`, preserving direction.
    #[inline]
    pub fn clamp_length(self, max_len: f32) -> Vec2 {
        let len = self.length();
        if len > max_len && len > EPSILON {
            self * (max_len / len)
        } else {
            self
        }
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    /// Manhattan (L1) distance — used by the Transport interaction cost query.
    #[inline]
    pub fn manhattan_distance(self, other: Vec2) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// A static line segment, used for floor borders.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }
}

/// An axis-aligned rectangle, positioned by its centre.
///
/// `dimension` is full width/height (not half-extent) — matches the
/// `Unit::dimension` field in the data model.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub center: Vec2,
    pub dimension: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, dimension: Vec2) -> Self {
        Self { center, dimension }
    }

    #[inline]
    pub fn half_extent(self) -> Vec2 {
        self.dimension * 0.5
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.center - self.half_extent()
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.center + self.half_extent()
    }

    /// Translate the rectangle by `delta`, keeping its dimension.
    #[inline]
    pub fn translated(self, delta: Vec2) -> Rect {
        Rect::new(self.center + delta, self.dimension)
    }

    /// `true` if `point` lies inside (or on the boundary of) this rectangle.
    ///
    /// Used both for world-space hit testing (`Registry::unit_at`) and,
    /// by an external UI collaborator, for screen-space picking — the
    /// predicate itself is space-agnostic, only the caller's coordinate
    /// system differs.
    #[inline]
    pub fn contains_point(self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x - EPSILON
            && point.x <= max.x + EPSILON
            && point.y >= min.y - EPSILON
            && point.y <= max.y + EPSILON
    }

    /// The four corners, in a fixed order: top-left, top-right, bottom-right,
    /// bottom-left (using `y` increasing downward as the grid/floor
    /// convention). Order is stable and is relied on by the navigable grid's
    /// per-corner weight contribution (§4.2).
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
            Vec2::new(min.x, max.y),
        ]
    }
}

/// Separating-axis overlap test for two axis-aligned rectangles.
///
/// Because both rectangles are axis-aligned, the only candidate separating
/// axes are the world X and Y axes, so this degenerates to an AABB overlap
/// check — but it is expressed as SAT (projecting onto each axis and
/// checking for a gap) to match §4.1's "SAT overlap" contract and to stay
/// correct if `Rect` ever gains an orientation.
pub fn sat_overlap(a: Rect, b: Rect) -> bool {
    let a_min = a.min();
    let a_max = a.max();
    let b_min = b.min();
    let b_max = b.max();

    // Projection onto the X axis.
    if a_max.x < b_min.x - EPSILON || b_max.x < a_min.x - EPSILON {
        return false;
    }
    // Projection onto the Y axis.
    if a_max.y < b_min.y - EPSILON || b_max.y < a_min.y - EPSILON {
        return false;
    }
    true
}

/// `true` if segment `seg` intersects rectangle `rect`.
///
/// Used for static border collision: treats the rectangle as a closed
/// region and the segment as an open line; touching the boundary counts as
/// intersection (within `EPSILON`).
pub fn segment_intersects_rect(seg: Segment, rect: Rect) -> bool {
    // Either endpoint inside the rect is an immediate hit.
    if rect.contains_point(seg.a) || rect.contains_point(seg.b) {
        return true;
    }

    // Otherwise test the segment against each of the rectangle's four edges.
    let corners = rect.corners();
    for i in 0..4 {
        let edge = Segment::new(corners[i], corners[(i + 1) % 4]);
        if segments_intersect(seg, edge) {
            return true;
        }
    }
    false
}

/// Classic segment-segment intersection via orientation tests.
fn segments_intersect(p: Segment, q: Segment) -> bool {
    let d1 = orientation(q.a, q.b, p.a);
    let d2 = orientation(q.a, q.b, p.b);
    let d3 = orientation(p.a, p.b, q.a);
    let d4 = orientation(p.a, p.b, q.b);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    // Collinear / touching cases.
    if d1.abs() <= EPSILON && on_segment(q.a, q.b, p.a) {
        return true;
    }
    if d2.abs() <= EPSILON && on_segment(q.a, q.b, p.b) {
        return true;
    }
    if d3.abs() <= EPSILON && on_segment(p.a, p.b, q.a) {
        return true;
    }
    if d4.abs() <= EPSILON && on_segment(p.a, p.b, q.b) {
        return true;
    }
    false
}

#[inline]
fn orientation(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

#[inline]
fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}
