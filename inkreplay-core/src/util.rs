//! Utility types, used throughout the crate.

/// An integer pixel rectangle. `x, y` is the top-left corner, extending `w, h` down-right.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}
impl Rect {
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        w: 0,
        h: 0,
    };
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
    /// Build the smallest rect covering the inclusive-exclusive span `min..max` on both axes.
    /// Inverted spans produce a zero-sized extent on that axis.
    #[must_use]
    pub fn from_min_max(min: [i32; 2], max: [i32; 2]) -> Self {
        Self {
            x: min[0],
            y: min[1],
            w: max[0].saturating_sub(min[0]).max(0),
            h: max[1].saturating_sub(min[1]).max(0),
        }
    }
    /// A rect touches no pixels only when *both* extents are empty.
    /// (zero width with nonzero height is *not* empty)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 && self.h <= 0
    }
    /// Smallest rect containing both. Empty rects are ignored.
    #[must_use = "returns a new rect without modifying `self`"]
    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        let min = [self.x.min(other.x), self.y.min(other.y)];
        let max = [
            (self.x + self.w).max(other.x + other.w),
            (self.y + self.h).max(other.y + other.h),
        ];
        Self::from_min_max(min, max)
    }
}
