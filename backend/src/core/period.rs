//! Game time: quarters and months
//!
//! The game advances in months grouped into quarters of three. Every engine
//! operation takes the period it acts on as an explicit argument; there is no
//! ambient "current round" state inside the engine.

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of months in one quarter
pub const MONTHS_PER_QUARTER: u8 = 3;

/// A (quarter, month-within-quarter) key identifying one game month
///
/// Quarters are 1-based; months run 1..=3 within a quarter. Ordering is
/// chronological, so `Period` works as a sorted map key. Serializes as a
/// compact string (`"q1m2"`), which keeps period-keyed maps valid JSON.
///
/// # Example
/// ```
/// use market_sim_core_rs::Period;
///
/// let start = Period::start();
/// assert_eq!(start.quarter(), 1);
/// assert_eq!(start.month(), 1);
/// assert!(start.pred().is_none());
/// assert_eq!(start.succ(), Period::new(1, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    quarter: u8,
    month: u8,
}

impl Period {
    /// Create a period key
    ///
    /// # Panics
    /// Panics if `quarter` is 0 or `month` is outside 1..=3.
    pub fn new(quarter: u8, month: u8) -> Self {
        assert!(quarter >= 1, "quarter must be 1-based");
        assert!(
            (1..=MONTHS_PER_QUARTER).contains(&month),
            "month must be within 1..=3"
        );
        Self { quarter, month }
    }

    /// The game's very first month (Q1 M1), where seed capital is injected
    pub fn start() -> Self {
        Self::new(1, 1)
    }

    /// Quarter number (1-based)
    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Month within the quarter (1..=3)
    pub fn month(&self) -> u8 {
        self.month
    }

    /// The immediately preceding month, crossing quarter boundaries
    ///
    /// Returns `None` at the game start: Q1 M1 has no predecessor.
    ///
    /// # Example
    /// ```
    /// use market_sim_core_rs::Period;
    ///
    /// assert_eq!(Period::new(2, 1).pred(), Some(Period::new(1, 3)));
    /// assert_eq!(Period::new(1, 2).pred(), Some(Period::new(1, 1)));
    /// assert_eq!(Period::start().pred(), None);
    /// ```
    pub fn pred(&self) -> Option<Self> {
        if self.month > 1 {
            Some(Self::new(self.quarter, self.month - 1))
        } else if self.quarter > 1 {
            Some(Self::new(self.quarter - 1, MONTHS_PER_QUARTER))
        } else {
            None
        }
    }

    /// The immediately following month, rolling M3 into the next quarter
    ///
    /// # Example
    /// ```
    /// use market_sim_core_rs::Period;
    ///
    /// assert_eq!(Period::new(1, 3).succ(), Period::new(2, 1));
    /// ```
    pub fn succ(&self) -> Self {
        if self.month < MONTHS_PER_QUARTER {
            Self::new(self.quarter, self.month + 1)
        } else {
            Self::new(self.quarter + 1, 1)
        }
    }

    /// Whether this is the quarter's final month (when liquidation runs)
    pub fn is_quarter_close(&self) -> bool {
        self.month == MONTHS_PER_QUARTER
    }

    /// All three months of a quarter, in order
    pub fn months_of_quarter(quarter: u8) -> [Self; MONTHS_PER_QUARTER as usize] {
        [
            Self::new(quarter, 1),
            Self::new(quarter, 2),
            Self::new(quarter, 3),
        ]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} M{}", self.quarter, self.month)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix('q')
            .ok_or_else(|| format!("invalid period key: {s:?}"))?;
        let (q, m) = rest
            .split_once('m')
            .ok_or_else(|| format!("invalid period key: {s:?}"))?;
        let quarter: u8 = q.parse().map_err(|_| format!("invalid quarter in {s:?}"))?;
        let month: u8 = m.parse().map_err(|_| format!("invalid month in {s:?}"))?;
        if quarter < 1 || !(1..=MONTHS_PER_QUARTER).contains(&month) {
            return Err(format!("period out of range: {s:?}"));
        }
        Ok(Period { quarter, month })
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("q{}m{}", self.quarter, self.month))
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
