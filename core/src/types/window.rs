use std::fmt;

/// Radiological display window (center and width, in Hounsfield units)
///
/// The bounds use the floored half-width, so a width of 75 spans
/// `center - 37 ..= center + 37`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowParams {
    pub center: f32,
    pub width: f32,
}

/// Brain window
pub const BRAIN_WINDOW: WindowParams = WindowParams {
    center: 40.0,
    width: 80.0,
};

/// Subdural window
pub const SUBDURAL_WINDOW: WindowParams = WindowParams {
    center: 80.0,
    width: 200.0,
};

/// Bone window
pub const BONE_WINDOW: WindowParams = WindowParams {
    center: 40.0,
    width: 380.0,
};

impl WindowParams {
    /// Creates a new window
    pub const fn new(center: f32, width: f32) -> Self {
        Self { center, width }
    }

    /// Floored half-width
    #[inline]
    pub fn half_width(&self) -> f32 {
        (self.width / 2.0).floor()
    }

    /// Lower clipping bound
    #[inline]
    pub fn lower_bound(&self) -> f32 {
        self.center - self.half_width()
    }

    /// Upper clipping bound
    #[inline]
    pub fn upper_bound(&self) -> f32 {
        self.center + self.half_width()
    }
}

impl fmt::Display for WindowParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{} W{}", self.center, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_use_floored_half_width() {
        let w = WindowParams::new(40.0, 75.0);
        assert_eq!(w.half_width(), 37.0);
        assert_eq!(w.lower_bound(), 3.0);
        assert_eq!(w.upper_bound(), 77.0);
    }

    #[test]
    fn test_standard_windows() {
        assert_eq!(BRAIN_WINDOW.lower_bound(), 0.0);
        assert_eq!(BRAIN_WINDOW.upper_bound(), 80.0);
        assert_eq!(SUBDURAL_WINDOW.lower_bound(), -20.0);
        assert_eq!(SUBDURAL_WINDOW.upper_bound(), 180.0);
        assert_eq!(BONE_WINDOW.lower_bound(), -150.0);
        assert_eq!(BONE_WINDOW.upper_bound(), 230.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(BRAIN_WINDOW.to_string(), "C40 W80");
    }
}
