/// Barometric pressure trend from a short history of absolute-pressure samples
use std::collections::VecDeque;

/// Maximum number of samples kept in the history.
pub const HISTORY_CAPACITY: usize = 180;

/// Difference (inHg) between samples that counts as movement.
const THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Falling,
    Steady,
    Rising,
}

impl Trend {
    /// Numeric value reported to the controller.
    pub fn as_value(self) -> f64 {
        match self {
            Trend::Falling => -1.0,
            Trend::Steady => 0.0,
            Trend::Rising => 1.0,
        }
    }
}

/// How a pressure delta is classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrendRule {
    /// `reference - current > 0.01` falls, `< 0.01` rises. Only a delta of
    /// exactly 0.01 is steady, so unchanged pressure reads as rising.
    #[default]
    Literal,
    /// Falls or rises only when the delta leaves `[-0.01, 0.01]`.
    DeadBand,
}

impl TrendRule {
    fn classify(self, reference: f64, current: f64) -> Trend {
        let delta = reference - current;
        match self {
            TrendRule::Literal => {
                if delta > THRESHOLD {
                    Trend::Falling
                } else if delta < THRESHOLD {
                    Trend::Rising
                } else {
                    Trend::Steady
                }
            }
            TrendRule::DeadBand => {
                if delta > THRESHOLD {
                    Trend::Falling
                } else if -delta > THRESHOLD {
                    Trend::Rising
                } else {
                    Trend::Steady
                }
            }
        }
    }
}

/// Most-recent-first history of absolute pressure samples.
#[derive(Debug, Clone)]
pub struct TrendCalculator {
    history: VecDeque<f64>,
    rule: TrendRule,
}

impl TrendCalculator {
    pub fn new(rule: TrendRule) -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            rule,
        }
    }

    /// Record `current` and classify it against the previous sample
    ///
    /// The reference is the most recent stored sample, or 0 when the
    /// history is empty. At capacity the oldest sample is dropped first.
    pub fn update(&mut self, current: f64) -> Trend {
        let reference = self.history.front().copied().unwrap_or(0.0);

        if self.history.len() >= HISTORY_CAPACITY {
            self.history.pop_back();
        }
        self.history.push_front(current);

        self.rule.classify(reference, current)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[cfg(test)]
    pub fn latest(&self) -> Option<f64> {
        self.history.front().copied()
    }

    #[cfg(test)]
    pub fn oldest(&self) -> Option<f64> {
        self.history.back().copied()
    }
}
