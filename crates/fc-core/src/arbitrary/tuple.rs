//! Independent products of generators.

use rand::RngCore;

use super::{empty, Arbitrary, BoxedArbitrary, Draw, Pick, UnionArbitrary};
use crate::size::{self, SizeEstimate};

/// One value per child; the size is the product of the children's sizes.
pub struct TupleArbitrary<T> {
    children: Vec<BoxedArbitrary<T>>,
}

impl<T: Clone + 'static> TupleArbitrary<T> {
    pub fn new(children: Vec<BoxedArbitrary<T>>) -> Self {
        Self { children }
    }

    pub fn arity(&self) -> usize {
        self.children.len()
    }

    /// Component picks, from provenance when present.
    pub(crate) fn components(pick: &Pick<Vec<T>>) -> Vec<Pick<T>> {
        match pick.original::<Vec<Pick<T>>>() {
            Some(parts) => parts.clone(),
            None => pick.value.iter().cloned().map(Pick::new).collect(),
        }
    }

    pub(crate) fn assemble(parts: Vec<Pick<T>>) -> Pick<Vec<T>> {
        let values = parts.iter().map(|p| p.value.clone()).collect();
        Pick::with_original(values, parts)
    }
}

impl<T: Clone + 'static> Clone for TupleArbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            children: self.children.iter().map(|c| c.clone_box()).collect(),
        }
    }
}

impl<T: Clone + 'static> Arbitrary<Vec<T>> for TupleArbitrary<T> {
    fn pick(&mut self, rng: &mut dyn RngCore) -> Draw<Vec<T>> {
        let mut parts = Vec::with_capacity(self.children.len());
        for child in &mut self.children {
            match child.pick(rng) {
                Draw::Picked(p) => parts.push(p),
                Draw::Rejected => return Draw::Rejected,
                Draw::Empty => return Draw::Empty,
            }
        }
        Draw::Picked(Self::assemble(parts))
    }

    fn size(&self) -> SizeEstimate {
        size::product(self.children.iter().map(|c| c.size()))
    }

    /// A union of variants, each shrinking one component and holding the
    /// others at their current values.
    fn shrink(&self, initial: &Pick<Vec<T>>) -> BoxedArbitrary<Vec<T>> {
        let parts = Self::components(initial);
        if parts.len() != self.children.len() {
            return empty();
        }
        let variants: Vec<BoxedArbitrary<Vec<T>>> = (0..parts.len())
            .map(|i| {
                let children = self
                    .children
                    .iter()
                    .zip(&parts)
                    .enumerate()
                    .map(|(j, (child, part))| {
                        if i == j {
                            child.shrink(part)
                        } else {
                            Box::new(Pinned::new(part.clone(), child.clone_box()))
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
        let parts = Self::components(pick);
        parts.len() == self.children.len()
            && self
                .children
                .iter()
                .zip(&parts)
                .all(|(child, part)| child.can_generate(part))
    }

    /// Corner cases of each child, combined position by position and padded
    /// with each child's first corner case.
    fn corner_cases(&self) -> Vec<Pick<Vec<T>>> {
        let per_child: Vec<Vec<Pick<T>>> =
            self.children.iter().map(|c| c.corner_cases()).collect();
        if per_child.iter().any(Vec::is_empty) {
            return Vec::new();
        }
        let rows = per_child.iter().map(Vec::len).max().unwrap_or(0);
        (0..rows)
            .map(|row| {
                let parts = per_child
                    .iter()
                    .map(|cases| cases.get(row).unwrap_or(&cases[0]).clone())
                    .collect();
                Self::assemble(parts)
            })
            .collect()
    }

    fn clone_box(&self) -> BoxedArbitrary<Vec<T>> {
        Box::new(self.clone())
    }
}

/// A component held at one value while a sibling shrinks. Membership is
/// delegated to the generator the value came from.
pub(crate) struct Pinned<T> {
    pick: Pick<T>,
    source: BoxedArbitrary<T>,
}

impl<T: Clone + 'static> Pinned<T> {
    pub(crate) fn new(pick: Pick<T>, source: BoxedArbitrary<T>) -> Self {
        Self { pick, source }
    }
}

impl<T: Clone + 'static> Arbitrary<T> for Pinned<T> {
    fn pick(&mut self, _rng: &mut dyn RngCore) -> Draw<T> {
        Draw::Picked(self.pick.clone())
    }

    fn size(&self) -> SizeEstimate {
        SizeEstimate::exact(1)
    }

    fn shrink(&self, _initial: &Pick<T>) -> BoxedArbitrary<T> {
        empty()
    }

    fn can_generate(&self, pick: &Pick<T>) -> bool {
        self.source.can_generate(pick)
    }

    fn corner_cases(&self) -> Vec<Pick<T>> {
        vec![self.pick.clone()]
    }

    fn clone_box(&self) -> BoxedArbitrary<T> {
        Box::new(Pinned::new(self.pick.clone(), self.source.clone_box()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::{boolean, empty, integer, tuple, ArbitraryExt};
    use crate::settings::EstimatorSettings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn size_is_product() {
        let t = tuple(vec![integer(1, 10), integer(1, 5)]);
        assert_eq!(t.size(), SizeEstimate::exact(50));
        let with_empty = tuple(vec![integer(1, 10), empty()]);
        assert_eq!(with_empty.size(), SizeEstimate::EMPTY);
    }

    #[test]
    fn filtered_component_makes_estimate() {
        let settings = EstimatorSettings::default().with_seed(3);
        let t = tuple(vec![integer(1, 100).filter(|v| v % 2 == 0, &settings), integer(1, 10)]);
        let s = t.size();
        assert!(!s.is_exact());
        assert!(s.value() > 300.0 && s.value() < 700.0, "estimate {s}");
        assert!(s.upper() <= 1000.0);
    }

    #[test]
    fn empty_component_empties_pick() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut t = tuple(vec![integer(1, 10), empty()]);
        assert!(t.pick(&mut rng).is_empty());
    }

    #[test]
    fn picks_carry_components() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut t = tuple(vec![integer(1, 3), integer(7, 9)]);
        let pick = t.pick(&mut rng).into_pick().unwrap();
        let parts = TupleArbitrary::components(&pick);
        assert_eq!(parts.len(), 2);
        assert_eq!(pick.value, vec![parts[0].value, parts[1].value]);
        assert!(t.can_generate(&pick));
        assert!(!t.can_generate(&Pick::new(vec![1])));
        assert!(!t.can_generate(&Pick::new(vec![4, 8])));
    }

    #[test]
    fn shrink_varies_one_component_at_a_time() {
        let t = tuple(vec![integer(0, 10), integer(0, 10)]);
        let shrunk = t.shrink(&Pick::new(vec![5, 3]));
        // [0..4] x {3} plus {5} x [0..2]
        assert_eq!(shrunk.size(), SizeEstimate::exact(8));
        assert!(shrunk.can_generate(&Pick::new(vec![4, 3])));
        assert!(shrunk.can_generate(&Pick::new(vec![5, 0])));
    }

    #[test]
    fn corner_cases_align_by_position() {
        let t = tuple(vec![integer(-1, 1), boolean().map(|b| i64::from(*b))]);
        let values: Vec<Vec<i64>> = t.corner_cases().into_iter().map(|p| p.value).collect();
        assert_eq!(values, vec![vec![0, 0], vec![-1, 1], vec![1, 0]]);
    }
}
