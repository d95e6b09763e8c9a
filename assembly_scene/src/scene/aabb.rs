/// Axis-aligned bounding volumes.
///
/// `AABB::EMPTY` is the canonical empty bound (min = +inf, max = -inf on
/// every axis). Equality is exact, so `bound != AABB::EMPTY` is the
/// emptiness test callers rely on.

use glam::Vec3;

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// The canonical empty bound
    pub const EMPTY: AABB = AABB {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a bound from two corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The canonical empty bound
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Smallest bound enclosing all points, or `EMPTY` for no points
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        points.into_iter().fold(Self::EMPTY, |bound, &p| {
            if bound.is_empty() {
                AABB { min: p, max: p }
            } else {
                AABB { min: bound.min.min(p), max: bound.max.max(p) }
            }
        })
    }

    /// Whether this is the canonical empty bound
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Smallest bound enclosing both `self` and `other`.
    ///
    /// If either side is empty the other is returned unchanged.
    pub fn contain(&self, other: &AABB) -> AABB {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Test if this AABB fully contains another AABB.
    ///
    /// Every bound contains the empty bound; the empty bound contains nothing else.
    pub fn contains(&self, other: &AABB) -> bool {
        if other.is_empty() {
            return true;
        }
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Center point (`None` for the empty bound)
    pub fn center(&self) -> Option<Vec3> {
        (!self.is_empty()).then(|| (self.min + self.max) * 0.5)
    }

    /// Extent along each axis (zero for the empty bound)
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

impl Default for AABB {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
