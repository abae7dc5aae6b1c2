use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::IndexedRandom as _,
};
use rand_distr::{Bernoulli, Uniform};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    GenerateError, ParseSeedError,
    core::grid::{Cell, Grid},
    engine::example::Example,
};

/// Seed for deterministic example generation.
///
/// A 128-bit seed for the [`Pcg32`] generator driving [`create_examples`].
/// The same seed and configuration always produce the same examples.
///
/// Displayed, parsed and serialized as 32 lowercase hex digits, most
/// significant byte first. Parsing also accepts uppercase digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorSeed([u8; 16]);

impl GeneratorSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Widens a small integer seed, convenient for tests and reproductions.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    #[must_use]
    pub fn rng(&self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for GeneratorSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for GeneratorSeed {
    type Err = ParseSeedError;

    /// Parses exactly 32 hex digits, most significant byte first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::Length { len: s.len() });
        }
        if let Some((index, ch)) = s.char_indices().find(|(_, ch)| !ch.is_ascii_hexdigit()) {
            return Err(ParseSeedError::Digit { index, ch });
        }
        let Ok(value) = u128::from_str_radix(s, 16) else {
            unreachable!("32 hex digits fit in a u128");
        };
        Ok(Self(value.to_be_bytes()))
    }
}

impl Serialize for GeneratorSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GeneratorSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Draws a fresh seed, for runs that should differ but stay reproducible
/// once the seed is recorded.
impl Distribution<GeneratorSeed> for StandardUniform {
    fn sample<R>(&self, rng: &mut R) -> GeneratorSeed
    where
        R: Rng + ?Sized,
    {
        GeneratorSeed::from_bytes(rng.random())
    }
}

/// Parameters for [`create_examples`].
///
/// Each example draws its delta uniformly from `deltas` and its fill
/// probability uniformly from `[min_fill, max_fill]`.
///
/// # Example
///
/// ```
/// use revlife_engine::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_shape(8, 8)
///     .with_fill_range(0.2, 0.6);
/// assert_eq!(config.deltas(), &[1, 2, 3, 4, 5]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    rows: usize,
    cols: usize,
    burn_in: usize,
    deltas: Vec<usize>,
    min_fill: f64,
    max_fill: f64,
    max_attempts_per_example: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            burn_in: 5,
            deltas: vec![1, 2, 3, 4, 5],
            min_fill: 0.01,
            max_fill: 0.99,
            max_attempts_per_example: 10_000,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn with_shape(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    #[must_use]
    pub fn with_burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = burn_in;
        self
    }

    #[must_use]
    pub fn with_deltas(mut self, deltas: Vec<usize>) -> Self {
        self.deltas = deltas;
        self
    }

    #[must_use]
    pub fn with_fill_range(mut self, min_fill: f64, max_fill: f64) -> Self {
        self.min_fill = min_fill;
        self.max_fill = max_fill;
        self
    }

    #[must_use]
    pub fn with_max_attempts_per_example(mut self, max_attempts: usize) -> Self {
        self.max_attempts_per_example = max_attempts;
        self
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn burn_in(&self) -> usize {
        self.burn_in
    }

    #[must_use]
    pub fn deltas(&self) -> &[usize] {
        &self.deltas
    }

    #[must_use]
    pub fn fill_range(&self) -> (f64, f64) {
        (self.min_fill, self.max_fill)
    }

    #[must_use]
    pub fn max_attempts_per_example(&self) -> usize {
        self.max_attempts_per_example
    }

    pub fn validate(&self) -> Result<(), GenerateError> {
        Grid::cell_count(self.rows, self.cols)?;
        if self.deltas.is_empty() {
            return Err(GenerateError::EmptyDeltas);
        }
        if self.max_attempts_per_example == 0 {
            return Err(GenerateError::ZeroAttempts);
        }
        let (min, max) = (self.min_fill, self.max_fill);
        // written so that NaN fails
        if !(0.0 <= min && min <= max && max <= 1.0 && max > 0.0) {
            return Err(GenerateError::FillRange { min, max });
        }
        Ok(())
    }
}

/// Creates a board whose cells are independently alive with `fill_probability`.
pub fn create_random_grid<R>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    fill_probability: f64,
) -> Result<Grid, GenerateError>
where
    R: Rng + ?Sized,
{
    let len = Grid::cell_count(rows, cols)?;
    let alive = Bernoulli::new(fill_probability).map_err(|_| GenerateError::FillProbability {
        value: fill_probability,
    })?;
    let cells = (0..len)
        .map(|_| Cell::from_bool(alive.sample(rng)))
        .collect();
    Ok(Grid::from_cells(rows, cols, cells)?)
}

/// Creates a single example from a random board.
///
/// The random board is advanced `burn_in` steps to become the start board, so
/// the start looks like a typical evolved state rather than noise. The end
/// board may be all dead; [`create_examples`] filters those out.
pub fn create_example<R>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    delta: usize,
    fill_probability: f64,
    burn_in: usize,
) -> Result<Example, GenerateError>
where
    R: Rng + ?Sized,
{
    let mut start = create_random_grid(rng, rows, cols, fill_probability)?;
    start.advance_by(burn_in);
    Ok(Example::from_start(delta, start))
}

/// Creates `count` examples whose end boards all have at least one live cell.
///
/// Candidates with an all-dead end board are discarded and redrawn. Gives up
/// with [`GenerateError::TooManyRejections`] when a single example needs more
/// than `config.max_attempts_per_example()` candidates, which happens for
/// shapes where every board dies out (such as 1x1).
pub fn create_examples<R>(
    rng: &mut R,
    count: usize,
    config: &GeneratorConfig,
) -> Result<Vec<Example>, GenerateError>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    let fill = Uniform::new_inclusive(config.min_fill, config.max_fill).map_err(|_| {
        GenerateError::FillRange {
            min: config.min_fill,
            max: config.max_fill,
        }
    })?;

    let mut examples = Vec::with_capacity(count);
    let mut rejected = 0_usize;
    while examples.len() < count {
        let mut attempts = 0;
        let example = loop {
            if attempts == config.max_attempts_per_example {
                tracing::debug!(
                    attempts,
                    generated = examples.len(),
                    "giving up on example generation"
                );
                return Err(GenerateError::TooManyRejections { attempts });
            }
            attempts += 1;
            let delta = *config
                .deltas
                .choose(rng)
                .ok_or(GenerateError::EmptyDeltas)?;
            let fill_probability = fill.sample(rng);
            let example = create_example(
                rng,
                config.rows,
                config.cols,
                delta,
                fill_probability,
                config.burn_in,
            )?;
            if !example.end().is_all_dead() {
                tracing::trace!(delta, fill_probability, attempts, "accepted example");
                break example;
            }
            rejected += 1;
        };
        examples.push(example);
    }
    tracing::debug!(count, rejected, "generated examples");
    Ok(examples)
}
