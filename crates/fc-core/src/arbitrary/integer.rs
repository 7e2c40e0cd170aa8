//! Integers over a closed range.

use rand::{Rng, RngCore};

use super::{empty, Arbitrary, BoxedArbitrary, Draw, Pick};
use crate::size::SizeEstimate;

/// Uniform integers in `[min, max]`. Construct through [`super::integer`],
/// which handles inverted ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerArbitrary {
    min: i64,
    max: i64,
}

impl IntegerArbitrary {
    pub(crate) fn new(min: i64, max: i64) -> Self {
        debug_assert!(min <= max);
        Self { min, max }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// The value shrinking moves toward: zero, clamped into the range.
    fn target(&self) -> i64 {
        0i64.clamp(self.min, self.max)
    }
}

impl Arbitrary<i64> for IntegerArbitrary {
    fn pick(&mut self, rng: &mut dyn RngCore) -> Draw<i64> {
        Draw::Picked(Pick::new(rng.random_range(self.min..=self.max)))
    }

    fn size(&self) -> SizeEstimate {
        let width = i128::from(self.max) - i128::from(self.min) + 1;
        SizeEstimate::from_count(width as u128)
    }

    fn shrink(&self, initial: &Pick<i64>) -> BoxedArbitrary<i64> {
        let v = initial.value;
        let t = self.target();
        if !self.can_generate(initial) || v == t {
            return empty();
        }
        if v > t {
            Box::new(IntegerArbitrary::new(t, v - 1))
        } else {
            Box::new(IntegerArbitrary::new(v + 1, t))
        }
    }

    fn can_generate(&self, pick: &Pick<i64>) -> bool {
        (self.min..=self.max).contains(&pick.value)
    }

    fn corner_cases(&self) -> Vec<Pick<i64>> {
        let mut values = vec![self.target(), self.min, self.max];
        let mut seen = Vec::with_capacity(3);
        values.retain(|v| {
            if seen.contains(v) {
                false
            } else {
                seen.push(*v);
                true
            }
        });
        values.into_iter().map(Pick::new).collect()
    }

    fn clone_box(&self) -> BoxedArbitrary<i64> {
        Box::new(*self)
    }
}
