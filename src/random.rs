use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

/// RandMode controls random generator behaviour. May be predictable for testing or truly random for gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandMode {
    Predictable,
    RandomUniform,
}

/// Random source shared by tutorial tips, tournament draws and shop rotation
pub struct EngineRand {
    rng: Box<dyn RngCore>,
    rand_mode: RandMode,
}

impl EngineRand {
    pub fn new_uniform() -> EngineRand {
        EngineRand {
            rng: Box::new(rand::thread_rng()),
            rand_mode: RandMode::RandomUniform,
        }
    }

    pub fn new_predictable(seed: u64) -> EngineRand {
        EngineRand {
            rng: Box::new(StdRng::seed_from_u64(seed)),
            rand_mode: RandMode::Predictable,
        }
    }

    /// Seeded when a seed is configured, otherwise uniform
    pub fn from_seed(seed: Option<u64>) -> EngineRand {
        match seed {
            Some(s) => EngineRand::new_predictable(s),
            None => EngineRand::new_uniform(),
        }
    }

    pub fn mode(&self) -> RandMode {
        self.rand_mode
    }

    /// Uniform integer in [0, n); 0 when n is not positive
    pub fn below(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform integer in [a, b]; the bounds may come in either order
    pub fn between(&mut self, a: i32, b: i32) -> i32 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.rng.gen_range(lo..=hi)
    }
}
