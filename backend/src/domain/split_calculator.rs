//! Split calculation for the expense-creation flow.
//!
//! Pure functions that turn a total and the per-participant inputs of one
//! split mode into owed amounts. Nothing here fails: incomplete or
//! inconsistent inputs are reported through flags on the result so the caller
//! can render them and gate submission.
//!
//! ## Rules
//!
//! - **Equal**: included participants each owe `total / count_included`
//! - **Amount**: entries are owed as typed, valid once they add up to the total
//! - **Percentage**: `total * p / 100`, valid once percentages add up to 100
//! - **Share**: `total * s / total_shares`, all zero when no shares are assigned
//!
//! Amount totals are compared after rounding to cents so that decimal noise
//! never blocks a submission. Percentages must add up to exactly 100.
//!
//! Sums saturate instead of overflowing, and proportional amounts never exceed
//! the total, so no input can make these functions panic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Round a money value to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to cents and always carry two decimal places (`1` becomes `1.00`).
pub fn to_cents(value: Decimal) -> Decimal {
    let mut rounded = round_money(value);
    rounded.rescale(2);
    rounded
}

fn saturating_sum(values: &[Decimal]) -> Decimal {
    values
        .iter()
        .fold(Decimal::ZERO, |sum, value| sum.saturating_add(*value))
}

/// Sum of `values`, `None` if it does not fit in a `Decimal`
fn checked_sum<'a>(values: impl IntoIterator<Item = &'a Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(*value))
}

/// `total * part / whole`, for `0 <= part <= whole`.
///
/// Multiplies first for exact results; when the product does not fit, the
/// ratio (at most one) is taken first instead.
fn portion(total: Decimal, part: Decimal, whole: Decimal) -> Decimal {
    match total.checked_mul(part) {
        Some(product) => product / whole,
        None => (part / whole).saturating_mul(total),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EqualSplit {
    pub amounts: Vec<Decimal>,
    pub count_included: usize,
}

impl EqualSplit {
    /// Nobody is included, which is distinct from a legitimate zero split
    pub fn no_one_selected(&self) -> bool {
        self.count_included == 0
    }

    /// Amount owed by each included participant
    pub fn per_person(&self) -> Option<Decimal> {
        if self.no_one_selected() {
            return None;
        }
        self.amounts
            .iter()
            .copied()
            .find(|amount| !amount.is_zero())
            .or(Some(Decimal::ZERO))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmountSplit {
    pub amounts: Vec<Decimal>,
    pub total_entered: Decimal,
    pub remaining: Decimal,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PercentageSplit {
    pub amounts: Vec<Decimal>,
    pub total_percentage: Decimal,
    pub remaining_percentage: Decimal,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareSplit {
    pub amounts: Vec<Decimal>,
    pub total_shares: Decimal,
}

impl ShareSplit {
    pub fn has_shares(&self) -> bool {
        self.total_shares > Decimal::ZERO
    }
}

/// Outcome of applying an edit to a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryUpdate {
    Applied,
    /// The entry keeps its previous value
    Rejected,
}

impl EntryUpdate {
    pub fn is_applied(&self) -> bool {
        matches!(self, EntryUpdate::Applied)
    }
}

pub fn compute_equal_split(total: Decimal, included: &[bool]) -> EqualSplit {
    let count_included = included.iter().filter(|flag| **flag).count();

    if count_included == 0 {
        return EqualSplit {
            amounts: vec![Decimal::ZERO; included.len()],
            count_included,
        };
    }

    let per_person = total / Decimal::from(count_included as u64);
    let amounts = included
        .iter()
        .map(|flag| if *flag { per_person } else { Decimal::ZERO })
        .collect();

    EqualSplit {
        amounts,
        count_included,
    }
}

pub fn compute_amount_split(total: Decimal, entries: &[Decimal]) -> AmountSplit {
    let total_entered = saturating_sum(entries);
    let remaining = total.saturating_sub(total_entered);

    AmountSplit {
        amounts: entries.to_vec(),
        total_entered,
        remaining,
        is_valid: round_money(total_entered) == round_money(total),
    }
}

pub fn compute_percentage_split(total: Decimal, percentages: &[Decimal]) -> PercentageSplit {
    let total_percentage = saturating_sum(percentages);
    let amounts = percentages
        .iter()
        .map(|percentage| portion(total, *percentage, ONE_HUNDRED))
        .collect();

    PercentageSplit {
        amounts,
        total_percentage,
        remaining_percentage: ONE_HUNDRED.saturating_sub(total_percentage),
        is_valid: total_percentage == ONE_HUNDRED,
    }
}

pub fn compute_share_split(total: Decimal, shares: &[Decimal]) -> ShareSplit {
    let total_shares = saturating_sum(shares);

    let amounts = if total_shares > Decimal::ZERO {
        shares
            .iter()
            .map(|share| portion(total, *share, total_shares))
            .collect()
    } else {
        vec![Decimal::ZERO; shares.len()]
    };

    ShareSplit {
        amounts,
        total_shares,
    }
}

/// Decide whether `entries[index]` may become `new_value`.
///
/// Rejects negative values, and values that would push the sum of all
/// entries past `ceiling`. A `None` ceiling means unbounded (share weights),
/// but the sum must still fit in a `Decimal`.
pub fn guard_entry(
    entries: &[Decimal],
    index: usize,
    new_value: Decimal,
    ceiling: Option<Decimal>,
) -> EntryUpdate {
    if new_value < Decimal::ZERO {
        return EntryUpdate::Rejected;
    }

    if index >= entries.len() {
        return EntryUpdate::Rejected;
    }

    let others = entries
        .iter()
        .enumerate()
        .filter(|(position, _)| *position != index)
        .map(|(_, value)| value);
    let Some(total_entered) = checked_sum(others.chain([&new_value])) else {
        return EntryUpdate::Rejected;
    };

    match ceiling {
        Some(ceiling) if total_entered > ceiling => EntryUpdate::Rejected,
        _ => EntryUpdate::Applied,
    }
}

/// Turn exact owed amounts into whole cents that add up to `total`.
///
/// Every amount is truncated to cents and the cents still missing from the
/// total (rounded to cents) are handed out one at a time, largest remainder
/// first (earlier participants win ties). Amounts that already exceed the
/// total give cents back, smallest remainder first, never going below zero.
pub fn allocate_cents(total: Decimal, amounts: &[Decimal]) -> Vec<Decimal> {
    let mut allocated: Vec<Decimal> = amounts
        .iter()
        .map(|amount| amount.round_dp_with_strategy(2, RoundingStrategy::ToZero))
        .collect();
    if allocated.is_empty() {
        return allocated;
    }

    let remainders: Vec<Decimal> = amounts
        .iter()
        .zip(&allocated)
        .map(|(amount, cents)| amount.saturating_sub(*cents))
        .collect();
    let mut order: Vec<usize> = (0..amounts.len()).collect();
    order.sort_by(|a, b| remainders[*b].cmp(&remainders[*a]));

    let cent = Decimal::new(1, 2);
    let difference = to_cents(total).saturating_sub(saturating_sum(&allocated));
    let difference_cents = difference
        .checked_mul(ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .unwrap_or(0);

    if difference_cents > 0 {
        for index in order.iter().cycle().take(difference_cents as usize) {
            allocated[*index] = allocated[*index].saturating_add(cent);
        }
    } else {
        let mut excess = difference_cents.unsigned_abs();
        while excess > 0 {
            let mut taken = false;
            for index in order.iter().rev() {
                if excess == 0 {
                    break;
                }
                if allocated[*index] >= cent {
                    allocated[*index] -= cent;
                    excess -= 1;
                    taken = true;
                }
            }
            if !taken {
                break;
            }
        }
    }

    allocated.into_iter().map(to_cents).collect()
}
