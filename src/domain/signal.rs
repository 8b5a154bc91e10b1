//! Checklist signal values and the per-symbol signal set.

use crate::domain::error::InsufficientHistory;
use std::fmt;

pub const UPTREND_KEYS: [&str; 13] = [
    "c>30d_avg",
    "c>10w_avg",
    "c>30w_avg",
    "4w>10w>30w",
    "above_last_glt",
    "macd_hist_rising",
    "stoch_fast>slow",
    "52w_high_l2",
    "ath_l2",
    "1y_doubled",
    "stoch<50",
    "<bb_lower_l2",
    "above_avg_volume",
];

pub const DOWNTREND_KEYS: [&str; 8] = [
    "c<30d_avg",
    "c<10w_avg",
    "c<30w_avg",
    "4w<10w<30w",
    "macd_hist_falling",
    "stoch_fast<slow",
    "stoch>50",
    ">bb_upper_l2",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Flag(bool),
    Undetermined(InsufficientHistory),
}

impl Signal {
    pub fn is_true(&self) -> bool {
        matches!(self, Signal::Flag(true))
    }

    pub fn flag(&self) -> Option<bool> {
        match self {
            Signal::Flag(b) => Some(*b),
            Signal::Undetermined(_) => None,
        }
    }
}

impl From<Result<bool, InsufficientHistory>> for Signal {
    fn from(result: Result<bool, InsufficientHistory>) -> Self {
        match result {
            Ok(b) => Signal::Flag(b),
            Err(e) => Signal::Undetermined(e),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Flag(b) => write!(f, "{}", b),
            Signal::Undetermined(e) => write!(
                f,
                "undetermined (need {} bars, have {})",
                e.required, e.available
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendGroup {
    Uptrend,
    Downtrend,
}

impl TrendGroup {
    pub fn name(&self) -> &'static str {
        match self {
            TrendGroup::Uptrend => "uptrend",
            TrendGroup::Downtrend => "downtrend",
        }
    }
}

/// Signals for one symbol and invocation, in checklist order.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSet {
    uptrend: Vec<(&'static str, Signal)>,
    downtrend: Vec<(&'static str, Signal)>,
}

impl SignalSet {
    pub fn new(uptrend: Vec<(&'static str, Signal)>, downtrend: Vec<(&'static str, Signal)>) -> Self {
        Self { uptrend, downtrend }
    }

    pub fn group(&self, group: TrendGroup) -> &[(&'static str, Signal)] {
        match group {
            TrendGroup::Uptrend => &self.uptrend,
            TrendGroup::Downtrend => &self.downtrend,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Signal> {
        self.uptrend
            .iter()
            .chain(&self.downtrend)
            .find(|(k, _)| *k == key)
            .map(|(_, s)| s)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.uptrend.iter().chain(&self.downtrend).map(|(k, _)| *k)
    }

    pub fn undetermined(&self) -> impl Iterator<Item = (&'static str, &InsufficientHistory)> + '_ {
        self.uptrend
            .iter()
            .chain(&self.downtrend)
            .filter_map(|(k, s)| match s {
                Signal::Undetermined(e) => Some((*k, e)),
                Signal::Flag(_) => None,
            })
    }

    pub fn count_true(&self, group: TrendGroup) -> usize {
        self.group(group).iter().filter(|(_, s)| s.is_true()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(required: usize) -> InsufficientHistory {
        InsufficientHistory {
            indicator: "SMA".into(),
            required,
            available: 10,
        }
    }

    #[test]
    fn signal_display() {
        assert_eq!(Signal::Flag(true).to_string(), "true");
        assert_eq!(Signal::Flag(false).to_string(), "false");
        assert_eq!(
            Signal::Undetermined(short(150)).to_string(),
            "undetermined (need 150 bars, have 10)"
        );
    }

    #[test]
    fn signal_from_result() {
        assert_eq!(Signal::from(Ok(true)), Signal::Flag(true));
        assert!(matches!(Signal::from(Err(short(30))), Signal::Undetermined(_)));
    }

    #[test]
    fn set_lookup_and_counts() {
        let set = SignalSet::new(
            vec![("c>30d_avg", Signal::Flag(true)), ("ath_l2", Signal::Flag(true))],
            vec![("c<30d_avg", Signal::Undetermined(short(30)))],
        );
        assert_eq!(set.get("ath_l2"), Some(&Signal::Flag(true)));
        assert!(set.get("missing").is_none());
        assert_eq!(set.count_true(TrendGroup::Uptrend), 2);
        assert_eq!(set.count_true(TrendGroup::Downtrend), 0);
        assert_eq!(set.undetermined().count(), 1);
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["c>30d_avg", "ath_l2", "c<30d_avg"]);
    }

    #[test]
    fn key_lists_have_no_overlap() {
        for key in UPTREND_KEYS {
            assert!(!DOWNTREND_KEYS.contains(&key), "{} in both groups", key);
        }
    }
}
