//! Dependent generators: each parent value selects the child generator.
//!
//! The chain's size is approximate. At construction a sample of parents is
//! drawn and the child sizes they select are folded with
//! [`size::chain_bounds`]. Picks are weighted by child size, so every
//! `(parent, child)` pair is about equally likely rather than every parent.

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;

use super::{derive_seed, empty, Arbitrary, BoxedArbitrary, Draw, Pick, UnionArbitrary};
use crate::settings::EstimatorSettings;
use crate::size::{self, SizeEstimate};

/// Parent draws per `pick` before giving up with `Rejected`.
const MAX_CHAIN_ATTEMPTS: usize = 100;
const CHAIN_SALT: u64 = 0xC4A1_4;

/// Both halves of a chained pick.
#[derive(Debug, Clone)]
pub struct ChainOrigin<A, B> {
    pub parent: Pick<A>,
    pub child: Pick<B>,
}

pub struct ChainedArbitrary<A, B> {
    parent: BoxedArbitrary<A>,
    f: Rc<dyn Fn(&A) -> BoxedArbitrary<B>>,
    bounds: SizeEstimate,
    max_child_size: f64,
    settings: EstimatorSettings,
}

impl<A: Clone + 'static, B: Clone + 'static> ChainedArbitrary<A, B> {
    pub fn new(
        parent: BoxedArbitrary<A>,
        f: impl Fn(&A) -> BoxedArbitrary<B> + 'static,
        settings: &EstimatorSettings,
    ) -> Self {
        Self::with_shared(parent, Rc::new(f), *settings)
    }

    fn with_shared(
        parent: BoxedArbitrary<A>,
        f: Rc<dyn Fn(&A) -> BoxedArbitrary<B>>,
        settings: EstimatorSettings,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(derive_seed(settings.resolve_seed(), CHAIN_SALT));
        let mut sampler = parent.clone_box();
        let child_sizes: Vec<SizeEstimate> = sampler
            .sample(settings.chain_parent_samples() as usize, &mut rng)
            .iter()
            .map(|p| f(&p.value).size())
            .collect();
        let bounds = size::chain_bounds(&child_sizes);
        let max_child_size = child_sizes
            .iter()
            .map(SizeEstimate::value)
            .fold(0.0, f64::max);
        debug!(
            parents = child_sizes.len(),
            value = bounds.value(),
            lower = bounds.lower(),
            upper = bounds.upper(),
            "chain size bounds"
        );
        Self {
            parent,
            f,
            bounds,
            max_child_size,
            settings,
        }
    }

    fn origin<'a>(pick: &'a Pick<B>) -> Option<&'a ChainOrigin<A, B>> {
        pick.original::<ChainOrigin<A, B>>()
    }
}

impl<A: Clone + 'static, B: Clone + 'static> Clone for ChainedArbitrary<A, B> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone_box(),
            f: Rc::clone(&self.f),
            bounds: self.bounds,
            max_child_size: self.max_child_size,
            settings: self.settings,
        }
    }
}

impl<A: Clone + 'static, B: Clone + 'static> Arbitrary<B> for ChainedArbitrary<A, B> {
    /// Accepts a parent with probability `size(child) / max size seen`.
    fn pick(&mut self, rng: &mut dyn RngCore) -> Draw<B> {
        for _ in 0..MAX_CHAIN_ATTEMPTS {
            let parent = match self.parent.pick(rng) {
                Draw::Picked(p) => p,
                Draw::Rejected => return Draw::Rejected,
                Draw::Empty => return Draw::Empty,
            };
            let mut child_gen = (self.f)(&parent.value);
            let weight = child_gen.size().value();
            if weight > self.max_child_size {
                self.max_child_size = weight;
            }
            if weight <= 0.0 || rng.random::<f64>() * self.max_child_size >= weight {
                continue;
            }
            match child_gen.pick(rng) {
                Draw::Picked(child) => {
                    let value = child.value.clone();
                    return Draw::Picked(Pick::with_original(
                        value,
                        ChainOrigin { parent, child },
                    ));
                }
                Draw::Rejected => return Draw::Rejected,
                Draw::Empty => continue,
            }
        }
        Draw::Rejected
    }

    fn size(&self) -> SizeEstimate {
        self.bounds
    }

    /// The union of re-chaining a shrunk parent and shrinking the child
    /// under the original parent.
    ///
    /// The branches overlap, so the union's summed size over-counts the
    /// distinct values. The size stays approximate and errs high.
    fn shrink(&self, initial: &Pick<B>) -> BoxedArbitrary<B> {
        let Some(origin) = Self::origin(initial) else {
            return empty();
        };
        let rechained = Self::with_shared(
            self.parent.shrink(&origin.parent),
            Rc::clone(&self.f),
            self.settings,
        );
        let child = (self.f)(&origin.parent.value).shrink(&origin.child);
        Box::new(UnionArbitrary::new(vec![Box::new(rechained), child]))
    }

    fn can_generate(&self, pick: &Pick<B>) -> bool {
        match Self::origin(pick) {
            Some(origin) => {
                self.parent.can_generate(&origin.parent)
                    && (self.f)(&origin.parent.value).can_generate(&origin.child)
            }
            None => false,
        }
    }

    fn corner_cases(&self) -> Vec<Pick<B>> {
        self.parent
            .corner_cases()
            .into_iter()
            .flat_map(|parent| {
                (self.f)(&parent.value)
                    .corner_cases()
                    .into_iter()
                    .map(move |child| {
                        let value = child.value.clone();
                        Pick::with_original(
                            value,
                            ChainOrigin {
                                parent: parent.clone(),
                                child,
                            },
                        )
                    })
            })
            .collect()
    }

    fn clone_box(&self) -> BoxedArbitrary<B> {
        Box::new(self.clone())
    }
}
