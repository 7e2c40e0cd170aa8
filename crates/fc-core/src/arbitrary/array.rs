//! Variable-length arrays.

use rand::{Rng, RngCore};

use super::tuple::Pinned;
use super::{empty, Arbitrary, BoxedArbitrary, Draw, Pick, TupleArbitrary, UnionArbitrary};
use crate::size::{self, SizeEstimate};

/// Vectors of `min_len..=max_len` elements. Picks share the component
/// provenance layout of [`TupleArbitrary`].
pub struct ArrayArbitrary<T> {
    element: BoxedArbitrary<T>,
    min_len: usize,
    max_len: usize,
}

impl<T: Clone + 'static> ArrayArbitrary<T> {
    /// `min_len <= max_len` is checked by [`super::array`].
    pub(crate) fn new(element: BoxedArbitrary<T>, min_len: usize, max_len: usize) -> Self {
        debug_assert!(min_len <= max_len);
        Self {
            element,
            min_len,
            max_len,
        }
    }

    pub fn len_range(&self) -> (usize, usize) {
        (self.min_len, self.max_len)
    }
}

impl<T: Clone + 'static> Clone for ArrayArbitrary<T> {
    fn clone(&self) -> Self {
        Self::new(self.element.clone_box(), self.min_len, self.max_len)
    }
}

impl<T: Clone + 'static> Arbitrary<Vec<T>> for ArrayArbitrary<T> {
    fn pick(&mut self, rng: &mut dyn RngCore) -> Draw<Vec<T>> {
        let len = rng.random_range(self.min_len..=self.max_len);
        let mut parts = Vec::with_capacity(len);
        for _ in 0..len {
            match self.element.pick(rng) {
                Draw::Picked(p) => parts.push(p),
                Draw::Rejected => return Draw::Rejected,
                Draw::Empty if self.min_len == 0 => {
                    return Draw::Picked(TupleArbitrary::assemble(Vec::new()))
                }
                Draw::Empty => return Draw::Empty,
            }
        }
        Draw::Picked(TupleArbitrary::assemble(parts))
    }

    /// `Σ element^k` over the allowed lengths.
    fn size(&self) -> SizeEstimate {
        let element = self.element.size();
        if element.is_empty() {
            let zero_allowed = u64::from(self.min_len == 0);
            return SizeEstimate::exact(zero_allowed);
        }
        size::sum((self.min_len..=self.max_len).map(|k| size::power(element, k)))
    }

    /// Shorter arrays while above the minimum length, otherwise arrays of the
    /// same length with one element shrunk.
    fn shrink(&self, initial: &Pick<Vec<T>>) -> BoxedArbitrary<Vec<T>> {
        let parts = TupleArbitrary::components(initial);
        let len = parts.len();
        if len < self.min_len || len > self.max_len {
            return empty();
        }
        if len > self.min_len {
            return Box::new(Self::new(self.element.clone_box(), self.min_len, len - 1));
        }
        if len == 0 {
            return empty();
        }
        let variants: Vec<BoxedArbitrary<Vec<T>>> = (0..len)
            .map(|i| {
                let children = parts
                    .iter()
                    .enumerate()
                    .map(|(j, part)| {
                        if i == j {
                            self.element.shrink(part)
                        } else {
                            Box::new(Pinned::new(part.clone(), self.element.clone_box()))
                                as BoxedArbitrary<T>
                        }
                    })
                    .collect();
                Box::new(TupleArbitrary::new(children)) as BoxedArbitrary<Vec<T>>
            })
            .collect();
        Box::new(UnionArbitrary::new(variants))
    }

    fn can_generate(&self, pick: &Pick<Vec<T>>) -> bool {
        let parts = TupleArbitrary::components(pick);
        (self.min_len..=self.max_len).contains(&parts.len())
            && parts.iter().all(|p| self.element.can_generate(p))
    }

    /// Minimum-length arrays filled with each element corner case.
    fn corner_cases(&self) -> Vec<Pick<Vec<T>>> {
        if self.min_len == 0 {
            return vec![TupleArbitrary::assemble(Vec::new())];
        }
        self.element
            .corner_cases()
            .into_iter()
            .map(|c| TupleArbitrary::assemble(vec![c; self.min_len]))
            .collect()
    }

    fn clone_box(&self) -> BoxedArbitrary<Vec<T>> {
        Box::new(self.clone())
    }
}
