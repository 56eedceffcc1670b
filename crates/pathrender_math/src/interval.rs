/// A closed range `[min, max]` of ray parameters.
///
/// Intersection routines accept a hit only when its `t` lies inside the
/// interval, endpoints included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Everything in front of `min`, up to infinity.
    pub const fn from_min(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Same lower bound, new upper bound.
    ///
    /// Used by closest-hit scans to shrink the search range after each hit.
    #[inline]
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// The `[0, 1]` range color channels are clamped to before encoding.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_with_max_keeps_min() {
        let shrunk = Interval::from_min(0.001).with_max(4.0);
        assert_eq!(shrunk.min, 0.001);
        assert_eq!(shrunk.max, 4.0);
        assert!(!shrunk.contains(4.5));
    }

    #[test]
    fn test_interval_clamp() {
        let unit = Interval::UNIT;
        assert_eq!(unit.clamp(-5.0), 0.0);
        assert_eq!(unit.clamp(0.25), 0.25);
        assert_eq!(unit.clamp(15.0), 1.0);
    }

    #[test]
    fn test_interval_from_min_is_unbounded() {
        let interval = Interval::from_min(0.001);
        assert!(interval.contains(1e10));
        assert!(interval.contains(f32::INFINITY));
        assert!(!interval.contains(0.0));
    }

    #[test]
    fn test_interval_nan_is_never_contained() {
        assert!(!Interval::from_min(0.0).contains(f32::NAN));
    }
}
