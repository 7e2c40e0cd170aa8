//! Constant, empty and boolean generators.

use std::marker::PhantomData;

use rand::{Rng, RngCore};

use super::{empty, Arbitrary, BoxedArbitrary, Draw, Pick};
use crate::size::SizeEstimate;

/// Always the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantArbitrary<T> {
    value: T,
}

impl<T> ConstantArbitrary<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone + PartialEq + 'static> Arbitrary<T> for ConstantArbitrary<T> {
    fn pick(&mut self, _rng: &mut dyn RngCore) -> Draw<T> {
        Draw::Picked(Pick::new(self.value.clone()))
    }

    fn size(&self) -> SizeEstimate {
        SizeEstimate::exact(1)
    }

    fn shrink(&self, _initial: &Pick<T>) -> BoxedArbitrary<T> {
        empty()
    }

    fn can_generate(&self, pick: &Pick<T>) -> bool {
        pick.value == self.value
    }

    fn corner_cases(&self) -> Vec<Pick<T>> {
        vec![Pick::new(self.value.clone())]
    }

    fn clone_box(&self) -> BoxedArbitrary<T> {
        Box::new(self.clone())
    }
}

/// Produces nothing; the result of shrinking past a minimum.
pub struct EmptyArbitrary<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> EmptyArbitrary<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for EmptyArbitrary<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EmptyArbitrary<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EmptyArbitrary")
    }
}

impl<T: 'static> Arbitrary<T> for EmptyArbitrary<T> {
    fn pick(&mut self, _rng: &mut dyn RngCore) -> Draw<T> {
        Draw::Empty
    }

    fn size(&self) -> SizeEstimate {
        SizeEstimate::EMPTY
    }

    fn shrink(&self, _initial: &Pick<T>) -> BoxedArbitrary<T> {
        empty()
    }

    fn can_generate(&self, _pick: &Pick<T>) -> bool {
        false
    }

    fn corner_cases(&self) -> Vec<Pick<T>> {
        Vec::new()
    }

    fn clone_box(&self) -> BoxedArbitrary<T> {
        empty()
    }
}

/// `true` or `false` with equal probability; `true` shrinks to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanArbitrary;

impl Arbitrary<bool> for BooleanArbitrary {
    fn pick(&mut self, rng: &mut dyn RngCore) -> Draw<bool> {
        Draw::Picked(Pick::new(rng.random_bool(0.5)))
    }

    fn size(&self) -> SizeEstimate {
        SizeEstimate::exact(2)
    }

    fn shrink(&self, initial: &Pick<bool>) -> BoxedArbitrary<bool> {
        if initial.value {
            Box::new(ConstantArbitrary::new(false))
        } else {
            empty()
        }
    }

    fn can_generate(&self, _pick: &Pick<bool>) -> bool {
        true
    }

    fn corner_cases(&self) -> Vec<Pick<bool>> {
        vec![Pick::new(false), Pick::new(true)]
    }

    fn clone_box(&self) -> BoxedArbitrary<bool> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::{boolean, constant};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn constant_has_one_value() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut gen = constant("x".to_string());
        assert_eq!(gen.size(), SizeEstimate::exact(1));
        assert_eq!(gen.pick(&mut rng).into_value().as_deref(), Some("x"));
        assert!(gen.can_generate(&Pick::new("x".to_string())));
        assert!(!gen.can_generate(&Pick::new("y".to_string())));
        assert!(gen.shrink(&Pick::new("x".to_string())).size().is_empty());
    }

    #[test]
    fn empty_never_picks() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut gen = empty::<u8>();
        assert!(gen.pick(&mut rng).is_empty());
        assert!(gen.corner_cases().is_empty());
        assert!(!gen.can_generate(&Pick::new(0)));
    }

    #[test]
    fn boolean_shrinks_true_to_false() {
        let gen = boolean();
        assert_eq!(gen.size(), SizeEstimate::exact(2));
        let shrunk = gen.shrink(&Pick::new(true));
        assert_eq!(shrunk.size(), SizeEstimate::exact(1));
        assert!(shrunk.can_generate(&Pick::new(false)));
        assert!(gen.shrink(&Pick::new(false)).size().is_empty());
    }
}
