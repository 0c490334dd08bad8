use crate::context::Context;
use crate::new_trait::New;
use log::trace;
use rand::{
    distr::uniform::{SampleRange, SampleUniform},
    prelude::Distribution,
    rngs::StdRng,
    Rng, SeedableRng,
};

/// The kernel's single source of randomness. Every stochastic pass draws
/// from this one generator, so a run is a pure function of the seed and the
/// command sequence.
struct RngPlugin {
    rng: StdRng,
}

impl New for RngPlugin {
    const new: &'static dyn Fn() -> Self = &|| RngPlugin {
        rng: StdRng::seed_from_u64(0),
    };
}

/// Gets a mutable reference to the generator.
// This is a private free function so that it's not leaked to the public API.
fn get_rng(context: &mut Context) -> &mut StdRng {
    &mut context.get_data_container_mut::<RngPlugin>().rng
}

pub trait ContextRandomExt {
    /// Re-seeds the generator. Two runs with the same seed and the same
    /// sequence of draws produce identical trajectories.
    fn init_random(&mut self, seed: u64);

    /// Gets a random sample by applying the specified sampler function to
    /// the generator.
    fn sample<T>(&mut self, sampler: impl FnOnce(&mut StdRng) -> T) -> T;

    /// Gets a random sample from the specified distribution.
    fn sample_distr<T>(&mut self, distribution: impl Distribution<T>) -> T;

    /// Gets a random sample within the range provided by `range`.
    fn sample_range<S, T>(&mut self, range: S) -> T
    where
        S: SampleRange<T>,
        T: SampleUniform;

    /// Gets a random boolean value which is true with probability `p`.
    /// `p` must lie in `[0, 1]`.
    fn sample_bool(&mut self, p: f64) -> bool;
}

impl ContextRandomExt for Context {
    fn init_random(&mut self, seed: u64) {
        trace!("initializing random module with seed {seed}");
        *get_rng(self) = StdRng::seed_from_u64(seed);
    }

    fn sample<T>(&mut self, sampler: impl FnOnce(&mut StdRng) -> T) -> T {
        sampler(get_rng(self))
    }

    fn sample_distr<T>(&mut self, distribution: impl Distribution<T>) -> T {
        distribution.sample(get_rng(self))
    }

    fn sample_range<S, T>(&mut self, range: S) -> T
    where
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.sample(|rng| rng.random_range(range))
    }

    fn sample_bool(&mut self, p: f64) -> bool {
        self.sample(|rng| rng.random_bool(p))
    }
}

#[cfg(test)]
mod tests {
    use crate::context::Context;
    use crate::random::ContextRandomExt;
    use rand::RngCore;
    use rand_distr::UnitCircle;

    #[test]
    fn get_rng_basic() {
        let mut context = Context::new();
        context.init_random(42);

        assert_ne!(
            context.sample(RngCore::next_u64),
            context.sample(RngCore::next_u64)
        );
    }

    #[test]
    fn reset_seed() {
        let mut context = Context::new();
        context.init_random(42);

        let run_0 = context.sample(RngCore::next_u64);
        let run_1 = context.sample(RngCore::next_u64);

        // Reset with same seed, ensure we get the same values
        context.init_random(42);
        assert_eq!(run_0, context.sample(RngCore::next_u64));
        assert_eq!(run_1, context.sample(RngCore::next_u64));

        // Reset with different seed, ensure we get different values
        context.init_random(88);
        assert_ne!(run_0, context.sample(RngCore::next_u64));
        assert_ne!(run_1, context.sample(RngCore::next_u64));
    }

    #[test]
    fn sample_range() {
        let mut context = Context::new();
        context.init_random(42);
        let result = context.sample_range(0..10);
        assert!((0..10).contains(&result));
    }

    #[test]
    fn sample_bool() {
        let mut context = Context::new();
        context.init_random(42);
        let _r: bool = context.sample_bool(0.5);
        assert!(!context.sample_bool(0.0));
        assert!(context.sample_bool(1.0));
    }

    #[test]
    fn sample_distribution() {
        let mut context = Context::new();
        context.init_random(42);
        let [x, y]: [f64; 2] = context.sample_distr(UnitCircle);
        assert!((x.hypot(y) - 1.0).abs() < 1e-12);
    }
}
