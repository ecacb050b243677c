use std::fmt::{Display, Formatter};
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Error;

/* ---------- */

/// Runs a pool of producers and a pool of consumers around a bounded buffer.
///
/// Producers share out ITEMS items between them, consumers take them out of a buffer
/// holding at most CAPACITY items, one at a time and in arrival order.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Number of producer threads
    #[arg(value_name = "PRODUCERS")]
    pub producers: NonZeroUsize,

    /// Number of consumer threads
    #[arg(value_name = "CONSUMERS")]
    pub consumers: NonZeroUsize,

    /// Maximum number of items held by the buffer
    #[arg(value_name = "CAPACITY")]
    pub capacity: NonZeroUsize,

    /// Total number of items to produce
    #[arg(value_name = "ITEMS")]
    pub items: NonZeroUsize,

    /// Simulated setup time of a producer before each item, in microseconds
    #[arg(long = "setup-us", value_name = "MIN-MAX", default_value_t = Latency::SETUP)]
    pub setup: Latency,

    /// Simulated work time of a consumer on each item, in microseconds
    #[arg(long = "work-us", value_name = "MIN-MAX", default_value_t = Latency::WORK)]
    pub work: Latency,

    /// Seed of the random latencies, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Config {
    /// Returns a configuration with the default latencies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any of the values is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// # use conveyor::Config;
    /// let config = Config::new(3, 2, 1, 10).unwrap();
    /// assert_eq!(config.capacity.get(), 1);
    ///
    /// assert!(Config::new(3, 0, 1, 10).is_err());
    /// ```
    pub fn new(
        producers: usize,
        consumers: usize,
        capacity: usize,
        items: usize,
    ) -> Result<Self, Error> {
        Ok(Self {
            producers: non_zero("producers", producers)?,
            consumers: non_zero("consumers", consumers)?,
            capacity: non_zero("capacity", capacity)?,
            items: non_zero("items", items)?,
            setup: Latency::SETUP,
            work: Latency::WORK,
            seed: None,
        })
    }

    /// Sets the producers' setup latency.
    #[inline]
    pub fn with_setup(mut self, setup: Latency) -> Self {
        self.setup = setup;
        self
    }

    /// Sets the consumers' work latency.
    #[inline]
    pub fn with_work(mut self, work: Latency) -> Self {
        self.work = work;
        self
    }

    /// Seeds the workers' random number generators.
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the random number generator of the `nth` worker of a pool.
    ///
    /// Without a seed, the generator is seeded from the operating system.
    pub(crate) fn rng(&self, pool: u64, nth: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ pool.rotate_left(32) ^ nth as u64),
            None => StdRng::from_entropy(),
        }
    }
}

#[inline]
fn non_zero(name: &str, value: usize) -> Result<NonZeroUsize, Error> {
    NonZeroUsize::new(value)
        .ok_or_else(|| Error::InvalidConfig(format!("{name} must be greater than 0")))
}

/* ---------- */

/// An inclusive range of simulated latencies, in microseconds.
///
/// Parsed from `MIN-MAX` or from a single value.
///
/// # Examples
///
/// ```
/// # use conveyor::Latency;
/// let latency: Latency = "200-900".parse().unwrap();
/// assert_eq!(latency, Latency::new(200, 900).unwrap());
///
/// assert!("900-200".parse::<Latency>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    min_us: u64,
    max_us: u64,
}

impl Latency {
    /// Default setup latency of producers.
    pub const SETUP: Self = Self {
        min_us: 300,
        max_us: 700,
    };

    /// Default work latency of consumers.
    pub const WORK: Self = Self {
        min_us: 200,
        max_us: 900,
    };

    /// No latency at all.
    pub const ZERO: Self = Self {
        min_us: 0,
        max_us: 0,
    };

    /// Returns a new latency range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `min_us` is greater than `max_us`.
    pub fn new(min_us: u64, max_us: u64) -> Result<Self, Error> {
        if min_us > max_us {
            return Err(Error::InvalidConfig(format!(
                "latency lower bound {min_us} is greater than its upper bound {max_us}"
            )));
        }

        Ok(Self { min_us, max_us })
    }

    /// Draws a duration uniformly from the range.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_micros(rng.gen_range(self.min_us..=self.max_us))
    }
}

impl FromStr for Latency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |val: &str| {
            val.trim().parse::<u64>().map_err(|err| {
                Error::InvalidConfig(format!("invalid latency `{}`: {err}", val.trim()))
            })
        };

        match s.split_once('-') {
            Some((min, max)) => Self::new(parse(min)?, parse(max)?),
            None => {
                let val = parse(s)?;
                Self::new(val, val)
            }
        }
    }
}

impl Display for Latency {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min_us, self.max_us)
    }
}

/* ---------- */
