//! Mapped generators and collision-corrected sizes.
//!
//! A non-injective map produces fewer distinct values than its base. Passing
//! the base size through overestimates; the corrections here estimate the
//! image size from samples of the base taken once, at construction:
//!
//! - `InverseHint`: for each sampled `a`, count the preimages of `f(a)` the
//!   base can produce (`m`). Each sample contributes a soft observation of
//!   weight `1/m` to a Beta posterior over the image-to-domain ratio. The
//!   interval is widened to reach the mean observed weight, which the
//!   posterior cannot attain when every weight is 1.
//! - `DistinctSampling`: draw `k` values, count the distinct images `d`, and
//!   solve the occupancy equation `d = D * (1 - (1 - 1/D)^k)` for the image
//!   size `D`. The observed `d` is a hard lower bound.
//!
//! The ratio belongs to one base. Shrinking re-runs the correction against
//! the shrunk base with a derived seed.

use std::fmt;
use std::rc::Rc;

use fc_math::bernoulli::BetaParams;
use fc_math::{normal_quantile, BetaPosterior};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

use super::{derive_seed, empty, Arbitrary, BoxedArbitrary, Draw, Pick};
use crate::distinct::{count_distinct, Identity};
use crate::settings::EstimatorSettings;
use crate::size::{self, SizeEstimate};

const OCCUPANCY_BISECTION_STEPS: usize = 200;
/// Salt for the correction sampler's seed.
const CORRECTION_SALT: u64 = 0x4D41_50;
/// Salt for the seed of a shrunk map's correction.
const SHRINK_SALT: u64 = 0x5348_524B;

/// How a collapsing map corrects its size.
pub enum CollisionCorrection<A, B> {
    /// Pass the base size through.
    None,
    /// All preimages of a value; empty for values outside the image.
    InverseHint(Rc<dyn Fn(&B) -> Vec<A>>),
    /// Count distinct images under an identity.
    DistinctSampling(Identity<B>),
}

impl<A, B> CollisionCorrection<A, B> {
    pub fn inverse_hint(inverse: impl Fn(&B) -> Vec<A> + 'static) -> Self {
        CollisionCorrection::InverseHint(Rc::new(inverse))
    }
}

impl<A, B> Clone for CollisionCorrection<A, B> {
    fn clone(&self) -> Self {
        match self {
            CollisionCorrection::None => CollisionCorrection::None,
            CollisionCorrection::InverseHint(f) => CollisionCorrection::InverseHint(Rc::clone(f)),
            CollisionCorrection::DistinctSampling(id) => {
                CollisionCorrection::DistinctSampling(id.clone())
            }
        }
    }
}

impl<A, B> fmt::Debug for CollisionCorrection<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollisionCorrection::None => "None",
            CollisionCorrection::InverseHint(_) => "InverseHint",
            CollisionCorrection::DistinctSampling(_) => "DistinctSampling",
        })
    }
}

/// Image-to-domain ratio estimated at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ratio {
    rate: f64,
    interval: (f64, f64),
}

pub struct MappedArbitrary<A, B> {
    base: BoxedArbitrary<A>,
    f: Rc<dyn Fn(&A) -> B>,
    inverse: Option<Rc<dyn Fn(&B) -> Vec<A>>>,
    bijective: bool,
    correction: CollisionCorrection<A, B>,
    /// Seed fixed at construction.
    settings: EstimatorSettings,
    ratio: Option<Ratio>,
}

impl<A: Clone + 'static, B: Clone + 'static> MappedArbitrary<A, B> {
    /// No correction: the size is the base size.
    pub fn naive(base: BoxedArbitrary<A>, f: impl Fn(&A) -> B + 'static) -> Self {
        Self {
            base,
            f: Rc::new(f),
            inverse: None,
            bijective: false,
            correction: CollisionCorrection::None,
            settings: EstimatorSettings::default(),
            ratio: None,
        }
    }

    /// A possibly collapsing map with a sampled size correction.
    pub fn new(
        base: BoxedArbitrary<A>,
        f: impl Fn(&A) -> B + 'static,
        correction: CollisionCorrection<A, B>,
        settings: &EstimatorSettings,
    ) -> Self {
        Self::from_shared(base, Rc::new(f), correction, settings)
    }

    fn from_shared(
        base: BoxedArbitrary<A>,
        f: Rc<dyn Fn(&A) -> B>,
        correction: CollisionCorrection<A, B>,
        settings: &EstimatorSettings,
    ) -> Self {
        let seed = settings.resolve_seed();
        let settings = settings.with_seed(seed);
        let mut rng = StdRng::seed_from_u64(derive_seed(seed, CORRECTION_SALT));
        let k = settings.map_correction_samples() as usize;
        let level = settings.credible_level();

        let (inverse, ratio) = match &correction {
            CollisionCorrection::None => (None, None),
            CollisionCorrection::InverseHint(inverse) => {
                let ratio = inverse_hint_ratio(&base, &f, inverse.as_ref(), k, level, &mut rng);
                (Some(Rc::clone(inverse)), ratio)
            }
            CollisionCorrection::DistinctSampling(identity) => {
                let ratio = distinct_sampling_ratio(&base, &f, identity, k, level, &mut rng);
                (None, ratio)
            }
        };
        if let Some(r) = ratio {
            debug!(
                rate = r.rate,
                lower = r.interval.0,
                upper = r.interval.1,
                "map collision correction"
            );
        }
        Self {
            base,
            f,
            inverse,
            bijective: false,
            correction,
            settings,
            ratio,
        }
    }

    pub fn is_bijective(&self) -> bool {
        self.bijective
    }

    /// Preimages of `pick`: its provenance if present, otherwise the
    /// inverse, if any.
    fn preimages(&self, pick: &Pick<B>) -> Vec<Pick<A>> {
        if let Some(origin) = pick.original::<Pick<A>>() {
            return vec![origin.clone()];
        }
        match &self.inverse {
            Some(inverse) => inverse(&pick.value).into_iter().map(Pick::new).collect(),
            None => Vec::new(),
        }
    }

    fn mapped(&self, a: Pick<A>) -> Pick<B> {
        let value = (self.f)(&a.value);
        Pick::with_original(value, a)
    }
}

impl<A: Clone + 'static, B: Clone + PartialEq + 'static> MappedArbitrary<A, B> {
    /// A declared bijection; the inverse serves membership and shrinking.
    ///
    /// A value is only a member if it round-trips: `f(inverse(b)) == b`.
    pub fn bijective(
        base: BoxedArbitrary<A>,
        f: impl Fn(&A) -> B + 'static,
        inverse: impl Fn(&B) -> A + 'static,
    ) -> Self {
        let f: Rc<dyn Fn(&A) -> B> = Rc::new(f);
        let forward = Rc::clone(&f);
        let inverse = move |b: &B| {
            let a = inverse(b);
            if forward(&a) == *b {
                vec![a]
            } else {
                Vec::new()
            }
        };
        Self {
            base,
            f,
            inverse: Some(Rc::new(inverse)),
            bijective: true,
            correction: CollisionCorrection::None,
            settings: EstimatorSettings::default(),
            ratio: None,
        }
    }
}

fn inverse_hint_ratio<A: Clone + 'static, B>(
    base: &BoxedArbitrary<A>,
    f: &Rc<dyn Fn(&A) -> B>,
    inverse: &dyn Fn(&B) -> Vec<A>,
    k: usize,
    level: f64,
    rng: &mut StdRng,
) -> Option<Ratio> {
    let mut sampler = base.clone_box();
    let picks = sampler.sample(k, rng);
    if picks.is_empty() {
        return None;
    }
    let mut posterior = BetaPosterior::new(BetaParams::jeffreys());
    let mut total = 0.0;
    for a in &picks {
        let image = f(&a.value);
        let m = inverse(&image)
            .into_iter()
            .filter(|pre| base.can_generate(&Pick::new(pre.clone())))
            .count()
            .max(1);
        // 1/m lies in (0, 1]
        let weight = 1.0 / m as f64;
        total += weight;
        posterior.observe_weighted(weight).ok()?;
    }
    let observed = total / picks.len() as f64;
    let (lo, hi) = posterior.credible_interval(level).ok()?;
    Some(Ratio {
        rate: posterior.median(),
        interval: (lo.min(observed), hi.max(observed)),
    })
}

fn distinct_sampling_ratio<A: Clone + 'static, B: Clone + 'static>(
    base: &BoxedArbitrary<A>,
    f: &Rc<dyn Fn(&A) -> B>,
    identity: &Identity<B>,
    k: usize,
    level: f64,
    rng: &mut StdRng,
) -> Option<Ratio> {
    let domain = base.size().value();
    if domain <= 0.0 {
        return None;
    }
    let mut sampler = base.clone_box();
    let images: Vec<B> = sampler
        .sample(k, rng)
        .into_iter()
        .map(|a| f(&a.value))
        .collect();
    if images.is_empty() {
        return None;
    }
    let draws = images.len() as f64;
    let distinct = count_distinct(&images, identity) as f64;

    if distinct >= draws {
        // no collisions observed
        return Some(Ratio {
            rate: 1.0,
            interval: ((distinct / domain).min(1.0), 1.0),
        });
    }

    let point = solve_occupancy(distinct, draws, domain);
    let z = normal_quantile(1.0 - (1.0 - level) / 2.0);
    let sd = occupancy_variance(point, draws).sqrt();
    let upper = if distinct + z * sd >= draws {
        domain
    } else {
        solve_occupancy(distinct + z * sd, draws, domain)
    };
    Some(Ratio {
        rate: (point / domain).min(1.0),
        interval: ((distinct / domain).min(1.0), (upper / domain).min(1.0)),
    })
}

/// Expected distinct count among `k` uniform draws from `n` values.
fn expected_distinct(n: f64, k: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    n * (1.0 - (1.0 - 1.0 / n).powf(k))
}

/// Variance of the distinct count among `k` uniform draws from `n` values.
fn occupancy_variance(n: f64, k: f64) -> f64 {
    if n <= 1.0 {
        return 0.0;
    }
    let miss = (1.0 - 1.0 / n).powf(k);
    let miss2 = (1.0 - 2.0 / n).powf(k);
    (n * (n - 1.0) * miss2 + n * miss - n * n * miss * miss).max(0.0)
}

/// The `n` in `[d, cap]` whose expected distinct count is `d`.
fn solve_occupancy(d: f64, k: f64, cap: f64) -> f64 {
    let (mut lo, mut hi) = (d.max(1.0), cap.max(d));
    if expected_distinct(hi, k) <= d {
        return hi;
    }
    for _ in 0..OCCUPANCY_BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if expected_distinct(mid, k) < d {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-9 * hi.max(1.0) {
            break;
        }
    }
    0.5 * (lo + hi)
}

impl<A: Clone + 'static, B: Clone + 'static> Clone for MappedArbitrary<A, B> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone_box(),
            f: Rc::clone(&self.f),
            inverse: self.inverse.clone(),
            bijective: self.bijective,
            correction: self.correction.clone(),
            settings: self.settings,
            ratio: self.ratio,
        }
    }
}

impl<A: Clone + 'static, B: Clone + 'static> Arbitrary<B> for MappedArbitrary<A, B> {
    fn pick(&mut self, rng: &mut dyn RngCore) -> Draw<B> {
        match self.base.pick(rng) {
            Draw::Picked(a) => Draw::Picked(self.mapped(a)),
            Draw::Rejected => Draw::Rejected,
            Draw::Empty => Draw::Empty,
        }
    }

    fn size(&self) -> SizeEstimate {
        let base = self.base.size();
        match self.ratio {
            Some(r) => size::scale(base, r.rate, r.interval),
            None => base,
        }
    }

    /// Maps the shrunk base. A collision correction is estimated afresh,
    /// since the image-to-domain ratio changes with the base.
    fn shrink(&self, initial: &Pick<B>) -> BoxedArbitrary<B> {
        let Some(pre) = self.preimages(initial).into_iter().next() else {
            return empty();
        };
        let base = self.base.shrink(&pre);
        if let CollisionCorrection::None = self.correction {
            return Box::new(Self {
                base,
                f: Rc::clone(&self.f),
                inverse: self.inverse.clone(),
                bijective: self.bijective,
                correction: CollisionCorrection::None,
                settings: self.settings,
                ratio: None,
            });
        }
        let seed = derive_seed(self.settings.resolve_seed(), SHRINK_SALT);
        debug!(seed, "re-estimating map correction for shrunk base");
        Box::new(Self::from_shared(
            base,
            Rc::clone(&self.f),
            self.correction.clone(),
            &self.settings.with_seed(seed),
        ))
    }

    fn can_generate(&self, pick: &Pick<B>) -> bool {
        self.preimages(pick)
            .iter()
            .any(|a| self.base.can_generate(a))
    }

    fn corner_cases(&self) -> Vec<Pick<B>> {
        self.base
            .corner_cases()
            .into_iter()
            .map(|a| self.mapped(a))
            .collect()
    }

    fn clone_box(&self) -> BoxedArbitrary<B> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::{integer, ArbitraryExt};

    fn settings() -> EstimatorSettings {
        EstimatorSettings::default().with_seed(9)
    }

    #[test]
    fn naive_map_passes_size_through() {
        let m = integer(1, 100).map(|v| v % 10);
        assert_eq!(m.size(), SizeEstimate::exact(100));
    }

    #[test]
    fn bijective_map_round_trips_membership() {
        let m = integer(0, 9).map_bijective(|v| v * 2, |v| v / 2);
        assert_eq!(m.size(), SizeEstimate::exact(10));
        assert!(m.can_generate(&Pick::new(18)));
        assert!(!m.can_generate(&Pick::new(40)));
        // 19 / 2 = 9 is in range, but 9 maps to 18
        assert!(!m.can_generate(&Pick::new(19)));
        assert!(m.shrink(&Pick::new(19)).size().is_empty());
        let shrunk = m.shrink(&Pick::new(8));
        assert_eq!(shrunk.size(), SizeEstimate::exact(4));
    }

    #[test]
    fn provenance_drives_shrinking() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut m = integer(0, 100).map(|v| v.to_string());
        let pick = m.pick(&mut rng).into_pick().unwrap();
        let origin = pick.original::<Pick<i64>>().unwrap().value;
        assert_eq!(pick.value, origin.to_string());
        assert!(m.can_generate(&pick));
        // no provenance and no inverse: unknown
        assert!(!m.can_generate(&Pick::new("5".to_string())));
        assert!(m.shrink(&Pick::new("5".to_string())).size().is_empty());
    }

    #[test]
    fn inverse_hint_corrects_modulo() {
        let m = integer(1, 100).map_corrected(
            |v| v % 10,
            CollisionCorrection::inverse_hint(|r: &i64| (0..10).map(|q| q * 10 + r).collect()),
            &settings(),
        );
        let s = m.size();
        assert!((s.value() - 10.0).abs() < 2.0, "estimate {s}");
        assert!(s.contains(10.0));
    }

    #[test]
    fn distinct_sampling_corrects_division() {
        let m = integer(1, 100).map_corrected(
            |v| v / 20,
            CollisionCorrection::DistinctSampling(Identity::natural()),
            &settings(),
        );
        let s = m.size();
        assert!((s.value() - 6.0).abs() < 1.5, "estimate {s}");
        assert!(s.lower() >= 5.0);
    }

    #[test]
    fn distinct_sampling_without_collisions_keeps_base() {
        let m = integer(1, 1_000_000).map_corrected(
            |v| *v,
            CollisionCorrection::DistinctSampling(Identity::natural()),
            &settings().with_map_correction_samples(20),
        );
        assert!((m.size().value() - 1_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn shrinking_re_estimates_the_correction() {
        let m = integer(0, 99).map_corrected(
            |v| v % 10,
            CollisionCorrection::inverse_hint(|r: &i64| (0..10).map(|q| q * 10 + r).collect()),
            &settings(),
        );
        // 0..5 maps injectively
        let small = m.shrink(&Pick::with_original(5, Pick::new(5i64))).size();
        assert!(small.contains(5.0), "{small}");
        // 0..57 still holds every residue
        let large = m.shrink(&Pick::with_original(7, Pick::new(57i64))).size();
        assert!(large.contains(10.0), "{large}");
        assert!(large.upper() < 20.0, "{large}");
    }

    #[test]
    fn inverse_hint_interval_reaches_observed_weights() {
        let m = integer(0, 9).map_corrected(
            |v| *v,
            CollisionCorrection::inverse_hint(|v: &i64| vec![*v]),
            &settings(),
        );
        assert_eq!(m.size().upper(), 10.0);
        assert!(m.size().contains(10.0));
    }

    #[test]
    fn occupancy_solution_inverts_expectation() {
        let n = solve_occupancy(expected_distinct(50.0, 200.0), 200.0, 1000.0);
        assert!((n - 50.0).abs() < 1e-6);
        assert_eq!(solve_occupancy(10.0, 200.0, 10.0), 10.0);
    }
}
