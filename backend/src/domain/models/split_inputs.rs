//! Per-participant inputs for each split mode.
//!
//! Every mode owns its own independent set of values. Switching modes always
//! starts from [`SplitInputs::fresh`]; nothing is carried over.

use rust_decimal::Decimal;
use shared::SplitType;

#[derive(Debug, Clone, PartialEq)]
pub enum SplitInputs {
    /// Included flags, everyone included by default
    Equal(Vec<bool>),
    /// Typed amounts, `None` while the field is empty
    Amount(Vec<Option<Decimal>>),
    Percentage(Vec<Option<Decimal>>),
    Share(Vec<Option<Decimal>>),
}

impl SplitInputs {
    /// Default inputs for `mode` with `participant_count` participants
    pub fn fresh(mode: SplitType, participant_count: usize) -> Self {
        match mode {
            SplitType::Equal => SplitInputs::Equal(vec![true; participant_count]),
            SplitType::Amount => SplitInputs::Amount(vec![None; participant_count]),
            SplitType::Percentage => SplitInputs::Percentage(vec![None; participant_count]),
            SplitType::Share => SplitInputs::Share(vec![None; participant_count]),
        }
    }

    pub fn mode(&self) -> SplitType {
        match self {
            SplitInputs::Equal(_) => SplitType::Equal,
            SplitInputs::Amount(_) => SplitType::Amount,
            SplitInputs::Percentage(_) => SplitType::Percentage,
            SplitInputs::Share(_) => SplitType::Share,
        }
    }

    /// Numeric entries with empty fields read as zero. Empty for Equal mode.
    pub fn numeric_values(&self) -> Vec<Decimal> {
        match self {
            SplitInputs::Equal(_) => Vec::new(),
            SplitInputs::Amount(values)
            | SplitInputs::Percentage(values)
            | SplitInputs::Share(values) => values
                .iter()
                .map(|value| value.unwrap_or(Decimal::ZERO))
                .collect(),
        }
    }

    /// Raw entry for the numeric modes
    pub fn entry(&self, index: usize) -> Option<Decimal> {
        match self {
            SplitInputs::Equal(_) => None,
            SplitInputs::Amount(values)
            | SplitInputs::Percentage(values)
            | SplitInputs::Share(values) => values.get(index).copied().flatten(),
        }
    }

    /// Extend or shrink to match the participant list, keeping existing values
    pub(crate) fn resize(&mut self, participant_count: usize) {
        match self {
            SplitInputs::Equal(flags) => flags.resize(participant_count, true),
            SplitInputs::Amount(values)
            | SplitInputs::Percentage(values)
            | SplitInputs::Share(values) => values.resize(participant_count, None),
        }
    }
}
