use glam::Vec2;

/// Linear interpolation between two values of the same type.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec2::lerp(self, other, t)
    }
}

/// A timed value transition, stepped once per frame by its owner.
///
/// Starting a new transition in the same slot drops the one in flight, which
/// is the only form of cancellation the card protocol needs. Completion is
/// reported exactly once, by `advance` returning true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<T: Lerp> {
    from: T,
    to: T,
    delay: f32,
    duration: f32,
    elapsed: f32,
    reported: bool,
}

impl<T: Lerp> Transition<T> {
    pub fn new(from: T, to: T, duration: f32) -> Self {
        Self::with_delay(from, to, duration, 0.0)
    }

    pub fn with_delay(from: T, to: T, duration: f32, delay: f32) -> Self {
        Self {
            from,
            to,
            delay: delay.max(0.0),
            duration: duration.max(0.0),
            elapsed: 0.0,
            reported: false,
        }
    }

    /// Advances by `dt` seconds. True exactly once, on the first step that
    /// finds the transition finished; a zero-duration transition reports on
    /// its first step.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.reported {
            return false;
        }
        self.elapsed += dt;
        if self.finished() {
            self.reported = true;
            return true;
        }
        false
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    /// Current interpolated value. Holds `from` until the delay has passed.
    pub fn value(&self) -> T {
        let active = self.elapsed - self.delay;
        if active <= 0.0 {
            return self.from;
        }
        if self.duration <= 0.0 || active >= self.duration {
            return self.to;
        }
        self.from.lerp(self.to, active / self.duration)
    }

    pub fn target(&self) -> T {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn holds_start_value_through_the_delay() {
        let mut transition = Transition::with_delay(2.0_f32, 10.0, 1.0, 0.5);
        assert!(!transition.advance(0.4));
        assert_relative_eq!(transition.value(), 2.0);
        assert!(!transition.advance(0.6));
        assert_relative_eq!(transition.value(), 6.0);
    }

    #[test]
    fn completes_exactly_once() {
        let mut transition = Transition::new(0.0_f32, 1.0, 0.5);
        assert!(!transition.advance(0.25));
        assert!(transition.advance(0.5));
        assert!(!transition.advance(0.5));
        assert_relative_eq!(transition.value(), 1.0);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let mut transition = Transition::new(3.0_f32, 7.0, 0.0);
        assert!(transition.advance(0.001));
        assert_relative_eq!(transition.value(), 7.0);
    }

    #[test]
    fn interpolates_vectors() {
        let mut transition = Transition::new(Vec2::ZERO, Vec2::new(10.0, -4.0), 1.0);
        transition.advance(0.5);
        let value = transition.value();
        assert_relative_eq!(value.x, 5.0);
        assert_relative_eq!(value.y, -2.0);
    }
}
