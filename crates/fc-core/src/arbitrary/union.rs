//! Disjoint unions of generators.

use rand::{Rng, RngCore};

use super::{empty, Arbitrary, BoxedArbitrary, Draw, Pick};
use crate::size::{self, SizeEstimate};

/// Which branch produced a union pick, and that branch's pick.
#[derive(Debug, Clone)]
pub struct UnionOrigin<T> {
    pub branch: usize,
    pub pick: Pick<T>,
}

/// Picks a branch in proportion to its size value, then picks from it.
pub struct UnionArbitrary<T> {
    children: Vec<BoxedArbitrary<T>>,
}

impl<T: Clone + 'static> UnionArbitrary<T> {
    pub fn new(children: Vec<BoxedArbitrary<T>>) -> Self {
        Self { children }
    }

    fn choose_branch(&self, rng: &mut dyn RngCore, skip: &[bool]) -> Option<usize> {
        let weights: Vec<f64> = self
            .children
            .iter()
            .zip(skip)
            .map(|(c, &skipped)| if skipped { 0.0 } else { c.size().value() })
            .collect();
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        let mut target = rng.random::<f64>() * total;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                return Some(i);
            }
            target -= w;
        }
        weights.iter().rposition(|w| *w > 0.0)
    }

    fn origin<'a>(&self, pick: &'a Pick<T>) -> Option<&'a UnionOrigin<T>> {
        pick.original::<UnionOrigin<T>>()
            .filter(|o| o.branch < self.children.len())
    }
}

impl<T: Clone + 'static> Clone for UnionArbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            children: self.children.iter().map(|c| c.clone_box()).collect(),
        }
    }
}

impl<T: Clone + 'static> Arbitrary<T> for UnionArbitrary<T> {
    fn pick(&mut self, rng: &mut dyn RngCore) -> Draw<T> {
        // a branch may turn out empty despite a positive estimate
        let mut skip = vec![false; self.children.len()];
        while let Some(branch) = self.choose_branch(rng, &skip) {
            match self.children[branch].pick(rng) {
                Draw::Picked(p) => {
                    let value = p.value.clone();
                    return Draw::Picked(Pick::with_original(
                        value,
                        UnionOrigin { branch, pick: p },
                    ));
                }
                Draw::Rejected => return Draw::Rejected,
                Draw::Empty => skip[branch] = true,
            }
        }
        Draw::Empty
    }

    fn size(&self) -> SizeEstimate {
        size::sum(self.children.iter().map(|c| c.size()))
    }

    fn shrink(&self, initial: &Pick<T>) -> BoxedArbitrary<T> {
        if let Some(origin) = self.origin(initial) {
            return self.children[origin.branch].shrink(&origin.pick);
        }
        self.children
            .iter()
            .find(|c| c.can_generate(initial))
            .map(|c| c.shrink(initial))
            .unwrap_or_else(empty)
    }

    fn can_generate(&self, pick: &Pick<T>) -> bool {
        if let Some(origin) = self.origin(pick) {
            return self.children[origin.branch].can_generate(&origin.pick);
        }
        self.children.iter().any(|c| c.can_generate(pick))
    }

    fn corner_cases(&self) -> Vec<Pick<T>> {
        self.children
            .iter()
            .enumerate()
            .flat_map(|(branch, c)| {
                c.corner_cases().into_iter().map(move |p| {
                    let value = p.value.clone();
                    Pick::with_original(value, UnionOrigin { branch, pick: p })
                })
            })
            .collect()
    }

    fn clone_box(&self) -> BoxedArbitrary<T> {
        Box::new(self.clone())
    }
}
