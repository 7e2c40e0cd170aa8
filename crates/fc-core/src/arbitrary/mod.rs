//! Generators ("arbitraries") and their shared capability interface.
//!
//! Every generator implements [`Arbitrary`]: draw a value, report how many
//! distinct values it can produce, narrow itself around a failing value,
//! test membership, and list boundary values. Generators are closed over a
//! small set of kinds (leaves, filter, map, tuple, union, array, chain) and
//! composed as boxed trait objects.
//!
//! All generators are single-threaded: filters mutate their posterior on
//! every `pick`, and closures are shared through `Rc`.

mod array;
mod chained;
mod constant;
mod filtered;
mod integer;
mod mapped;
mod tuple;
mod union;

pub use array::ArrayArbitrary;
pub use chained::{ChainOrigin, ChainedArbitrary};
pub use constant::{BooleanArbitrary, ConstantArbitrary, EmptyArbitrary};
pub use filtered::FilteredArbitrary;
pub use integer::IntegerArbitrary;
pub use mapped::{CollisionCorrection, MappedArbitrary};
pub use tuple::TupleArbitrary;
pub use union::{UnionArbitrary, UnionOrigin};

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use rand::RngCore;

use crate::distinct::{DistinctSet, Identity};
use crate::error::{Error, Result};
use crate::settings::EstimatorSettings;
use crate::size::SizeEstimate;

/// A boxed generator.
pub type BoxedArbitrary<T> = Box<dyn Arbitrary<T>>;

/// Consecutive non-values tolerated by the sampling helpers.
const SAMPLE_MISS_BUDGET: usize = 64;

/// A drawn value and, when it came through a transformation, the pick it
/// was derived from (the pre-image for maps, the components for tuples and
/// arrays, the parent and child for chains).
#[derive(Clone)]
pub struct Pick<T> {
    pub value: T,
    pub original: Option<Rc<dyn Any>>,
}

impl<T> Pick<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            original: None,
        }
    }

    pub fn with_original<O: Any>(value: T, original: O) -> Self {
        Self {
            value,
            original: Some(Rc::new(original)),
        }
    }

    /// The provenance, if it is of type `O`.
    pub fn original<O: Any>(&self) -> Option<&O> {
        self.original.as_ref()?.downcast_ref::<O>()
    }
}

impl<T: fmt::Debug> fmt::Debug for Pick<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pick")
            .field("value", &self.value)
            .field("has_original", &self.original.is_some())
            .finish()
    }
}

/// Outcome of a single `pick`.
#[derive(Debug, Clone)]
pub enum Draw<T> {
    Picked(Pick<T>),
    /// A filter used up its rejection budget; trying again may succeed.
    Rejected,
    /// The generator cannot produce any value.
    Empty,
}

impl<T> Draw<T> {
    pub fn into_pick(self) -> Option<Pick<T>> {
        match self {
            Draw::Picked(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        self.into_pick().map(|p| p.value)
    }

    pub fn is_picked(&self) -> bool {
        matches!(self, Draw::Picked(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Draw::Rejected)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Draw::Empty)
    }
}

/// Capability interface shared by every generator.
pub trait Arbitrary<T: 'static> {
    /// Draw one value. For filters this is also an observation of the
    /// predicate's pass rate.
    fn pick(&mut self, rng: &mut dyn RngCore) -> Draw<T>;

    /// How many distinct values this generator can produce.
    fn size(&self) -> SizeEstimate;

    /// A new generator over a strictly smaller candidate space around
    /// `initial`. `self` is left untouched.
    fn shrink(&self, initial: &Pick<T>) -> BoxedArbitrary<T>;

    /// Whether `pick` is a value this generator could have produced.
    fn can_generate(&self, pick: &Pick<T>) -> bool;

    /// Finite, deterministic boundary values.
    fn corner_cases(&self) -> Vec<Pick<T>>;

    fn clone_box(&self) -> BoxedArbitrary<T>;

    /// Up to `n` picks; stops early if the generator is empty or keeps
    /// rejecting.
    fn sample(&mut self, n: usize, rng: &mut dyn RngCore) -> Vec<Pick<T>> {
        let mut out = Vec::with_capacity(n);
        let mut misses = 0;
        while out.len() < n {
            match self.pick(rng) {
                Draw::Picked(p) => {
                    misses = 0;
                    out.push(p);
                }
                Draw::Rejected if misses < SAMPLE_MISS_BUDGET => misses += 1,
                Draw::Rejected | Draw::Empty => break,
            }
        }
        out
    }

    /// Corner cases first, then random picks, `n` in total at most.
    fn sample_with_bias(&mut self, n: usize, rng: &mut dyn RngCore) -> Vec<Pick<T>> {
        let mut out: Vec<Pick<T>> = self.corner_cases().into_iter().take(n).collect();
        let rest = n - out.len();
        out.extend(self.sample(rest, rng));
        out
    }

    /// Up to `n` picks that are pairwise distinct under `identity`.
    ///
    /// Attempts are bounded, so small or heavily filtered domains return
    /// fewer values.
    fn sample_unique(
        &mut self,
        n: usize,
        identity: &Identity<T>,
        rng: &mut dyn RngCore,
    ) -> Vec<Pick<T>>
    where
        T: Clone,
    {
        let mut seen = DistinctSet::new(identity.clone());
        let mut out = Vec::with_capacity(n);
        let max_attempts = n.saturating_mul(10).saturating_add(100);
        let ceiling = match self.size() {
            SizeEstimate::Exact { value } => usize::try_from(value).unwrap_or(usize::MAX),
            SizeEstimate::Estimated { .. } => usize::MAX,
        };
        let mut attempts = 0;
        while out.len() < n && out.len() < ceiling && attempts < max_attempts {
            attempts += 1;
            match self.pick(rng) {
                Draw::Picked(p) => {
                    if seen.insert(p.value.clone()) {
                        out.push(p);
                    }
                }
                Draw::Rejected => {}
                Draw::Empty => break,
            }
        }
        out
    }
}

impl<T: 'static> Clone for BoxedArbitrary<T> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// splitmix64 step, used to derive independent seeds for nested sampling.
pub(crate) fn derive_seed(seed: u64, salt: u64) -> u64 {
    let mut z = seed.wrapping_add(salt.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Integers in `[min, max]`; empty when `min > max`.
pub fn integer(min: i64, max: i64) -> BoxedArbitrary<i64> {
    if min > max {
        return empty();
    }
    Box::new(IntegerArbitrary::new(min, max))
}

/// A single value.
pub fn constant<T: Clone + PartialEq + 'static>(value: T) -> BoxedArbitrary<T> {
    Box::new(ConstantArbitrary::new(value))
}

/// No values at all.
pub fn empty<T: 'static>() -> BoxedArbitrary<T> {
    Box::new(EmptyArbitrary::new())
}

pub fn boolean() -> BoxedArbitrary<bool> {
    Box::new(BooleanArbitrary)
}

/// Vectors of `min_len..=max_len` elements drawn from `element`.
pub fn array<T: Clone + 'static>(
    element: BoxedArbitrary<T>,
    min_len: usize,
    max_len: usize,
) -> Result<BoxedArbitrary<Vec<T>>> {
    if min_len > max_len {
        return Err(Error::InvalidRange {
            min: min_len,
            max: max_len,
        });
    }
    Ok(Box::new(ArrayArbitrary::new(element, min_len, max_len)))
}

/// Independent product of `children`, yielding one value per child.
pub fn tuple<T: Clone + 'static>(children: Vec<BoxedArbitrary<T>>) -> BoxedArbitrary<Vec<T>> {
    Box::new(TupleArbitrary::new(children))
}

/// Disjoint union of `children`; branches are picked in proportion to
/// their size.
pub fn union<T: Clone + 'static>(children: Vec<BoxedArbitrary<T>>) -> BoxedArbitrary<T> {
    Box::new(UnionArbitrary::new(children))
}

/// Combinators available on any boxed generator.
pub trait ArbitraryExt<T: Clone + 'static> {
    /// Keep only values satisfying `predicate`. The filter's size is
    /// estimated from the observed pass rate.
    fn filter(
        self,
        predicate: impl Fn(&T) -> bool + 'static,
        settings: &EstimatorSettings,
    ) -> BoxedArbitrary<T>;

    /// Transform values with no collision correction: the size is the
    /// base size, an overestimate when `f` is not injective.
    fn map<U: Clone + 'static>(self, f: impl Fn(&T) -> U + 'static) -> BoxedArbitrary<U>;

    /// Transform values with a bijection; sizes pass through.
    fn map_bijective<U: Clone + PartialEq + 'static>(
        self,
        f: impl Fn(&T) -> U + 'static,
        inverse: impl Fn(&U) -> T + 'static,
    ) -> BoxedArbitrary<U>;

    /// Transform values with a collision-corrected size.
    fn map_corrected<U: Clone + 'static>(
        self,
        f: impl Fn(&T) -> U + 'static,
        correction: CollisionCorrection<T, U>,
        settings: &EstimatorSettings,
    ) -> BoxedArbitrary<U>;

    /// A dependent generator: each value picks the generator of the next.
    fn chain<U: Clone + 'static>(
        self,
        f: impl Fn(&T) -> BoxedArbitrary<U> + 'static,
        settings: &EstimatorSettings,
    ) -> BoxedArbitrary<U>;
}

impl<T: Clone + 'static> ArbitraryExt<T> for BoxedArbitrary<T> {
    fn filter(
        self,
        predicate: impl Fn(&T) -> bool + 'static,
        settings: &EstimatorSettings,
    ) -> BoxedArbitrary<T> {
        Box::new(FilteredArbitrary::new(self, predicate, settings))
    }

    fn map<U: Clone + 'static>(self, f: impl Fn(&T) -> U + 'static) -> BoxedArbitrary<U> {
        Box::new(MappedArbitrary::naive(self, f))
    }

    fn map_bijective<U: Clone + PartialEq + 'static>(
        self,
        f: impl Fn(&T) -> U + 'static,
        inverse: impl Fn(&U) -> T + 'static,
    ) -> BoxedArbitrary<U> {
        Box::new(MappedArbitrary::bijective(self, f, inverse))
    }

    fn map_corrected<U: Clone + 'static>(
        self,
        f: impl Fn(&T) -> U + 'static,
        correction: CollisionCorrection<T, U>,
        settings: &EstimatorSettings,
    ) -> BoxedArbitrary<U> {
        Box::new(MappedArbitrary::new(self, f, correction, settings))
    }

    fn chain<U: Clone + 'static>(
        self,
        f: impl Fn(&T) -> BoxedArbitrary<U> + 'static,
        settings: &EstimatorSettings,
    ) -> BoxedArbitrary<U> {
        Box::new(ChainedArbitrary::new(self, f, settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pick_provenance_downcasts_by_type() {
        let pick = Pick::with_original(10i64, Pick::new(5i64));
        assert_eq!(pick.original::<Pick<i64>>().map(|p| p.value), Some(5));
        assert!(pick.original::<String>().is_none());
        assert!(Pick::new(1).original::<Pick<i64>>().is_none());
    }

    #[test]
    fn draw_accessors() {
        let d: Draw<i32> = Draw::Picked(Pick::new(3));
        assert!(d.is_picked());
        assert_eq!(d.into_value(), Some(3));
        assert!(Draw::<i32>::Rejected.into_pick().is_none());
        assert!(Draw::<i32>::Empty.is_empty());
    }

    #[test]
    fn sample_with_bias_leads_with_corner_cases() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut gen = integer(-5, 5);
        let values: Vec<i64> = gen
            .sample_with_bias(6, &mut rng)
            .into_iter()
            .map(|p| p.value)
            .collect();
        assert_eq!(values.len(), 6);
        assert_eq!(&values[..3], &[0, -5, 5]);
    }

    #[test]
    fn sample_unique_respects_exact_size() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut gen = integer(0, 4);
        let picks = gen.sample_unique(50, &Identity::natural(), &mut rng);
        assert_eq!(picks.len(), 5);
        let mut values: Vec<i64> = picks.into_iter().map(|p| p.value).collect();
        values.sort_unstable();
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn sample_of_empty_generator_is_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(empty::<i64>().sample(10, &mut rng).is_empty());
        assert!(integer(3, 1).sample(10, &mut rng).is_empty());
    }

    #[test]
    fn array_rejects_inverted_lengths() {
        let err = array(integer(0, 1), 3, 1).err();
        assert_eq!(err, Some(Error::InvalidRange { min: 3, max: 1 }));
    }

    #[test]
    fn derived_seeds_differ() {
        assert_ne!(derive_seed(1, 1), derive_seed(1, 2));
        assert_eq!(derive_seed(9, 4), derive_seed(9, 4));
    }
}
