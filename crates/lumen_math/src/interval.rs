use crate::EPSILON;

/// Closed scalar range `[min, max]`.
///
/// Intersection code uses [`Interval::POSITIVE`] to accept hit distances and
/// [`Interval::UNIT`] for barycentric coordinates and color channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// `[0, 1]`
    pub const UNIT: Interval = Interval::new(0.0, 1.0);

    /// Hit distances past the self-intersection tolerance.
    pub const POSITIVE: Interval = Interval::new(EPSILON, f32::INFINITY);

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// `min <= x <= max`
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// `min < x < max`
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barycentric_bounds_are_inclusive() {
        assert!(Interval::UNIT.contains(0.0));
        assert!(Interval::UNIT.contains(1.0));
        assert!(!Interval::UNIT.contains(-1e-3));
        assert!(!Interval::UNIT.contains(1.001));
        assert_eq!(Interval::UNIT.size(), 1.0);
    }

    #[test]
    fn test_hit_distance_window() {
        // Hits at the origin or inside the tolerance are self-intersections
        assert!(!Interval::POSITIVE.surrounds(0.0));
        assert!(!Interval::POSITIVE.surrounds(EPSILON * 0.5));
        assert!(!Interval::POSITIVE.surrounds(-3.0));
        assert!(Interval::POSITIVE.surrounds(1e-3));
        assert!(Interval::POSITIVE.surrounds(1e6));
        assert!(!Interval::POSITIVE.surrounds(f32::INFINITY));
    }

    #[test]
    fn test_channel_clamp() {
        assert_eq!(Interval::UNIT.clamp(-0.25), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.75), 0.75);
        assert_eq!(Interval::UNIT.clamp(4.0), 1.0);

        let window = Interval::new(-2.0, 3.0);
        assert_eq!(window.size(), 5.0);
        assert_eq!(window.clamp(-9.0), -2.0);
    }
}
