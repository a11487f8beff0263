//! Expense-creation flow.
//!
//! Owns one [`ExpenseDraft`] and walks it through the steps a user goes
//! through when adding an expense:
//!
//! ```text
//! Idle -> EnteringBasicInfo -> ChoosingSplitMode -> EditingSplitInputs
//!      -> AwaitingConfirmation -> Submitted
//! ```
//!
//! Forward transitions are gated (positive total, valid split); backward
//! transitions are always allowed. A submission keeps the draft around in
//! `AwaitingConfirmation` until the backend answers, so a failed call can be
//! corrected and retried instead of losing everything the user typed.

use chrono::Utc;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use shared::{
    CreateExpenseRequest, CreateExpenseResponse, Guest, Participant, SplitDetail, SplitType,
};
use uuid::Uuid;

use super::amount_input::parse_amount_input;
use super::errors::FlowError;
use super::models::{SplitInputs, UserContext};
use super::split_calculator::{
    allocate_cents, compute_amount_split, compute_equal_split, compute_percentage_split,
    compute_share_split, guard_entry, to_cents, AmountSplit, EntryUpdate, EqualSplit,
    PercentageSplit, ShareSplit,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    EnteringBasicInfo,
    ChoosingSplitMode,
    EditingSplitInputs,
    /// Submission handed to the backend, draft kept until it answers
    AwaitingConfirmation,
    Submitted,
}

/// Everything the user has entered so far
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    /// Sent with the submission; stays the same across retries of one draft
    pub request_id: String,
    pub description: String,
    pub total: Option<Decimal>,
    /// RFC 3339, defaults to the submission time
    pub date: Option<String>,
    pub participants: Vec<Participant>,
    /// Inputs of the selected split mode
    pub inputs: Option<SplitInputs>,
}

impl ExpenseDraft {
    fn new(payer: Participant) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            description: String::new(),
            total: None,
            date: None,
            participants: vec![payer],
            inputs: None,
        }
    }

    pub fn split_mode(&self) -> Option<SplitType> {
        self.inputs.as_ref().map(SplitInputs::mode)
    }

    /// Total for display, unset reads as zero
    pub fn display_total(&self) -> Decimal {
        self.total.unwrap_or(Decimal::ZERO)
    }
}

/// Result of running the calculator over the current inputs
#[derive(Debug, Clone, PartialEq)]
pub enum SplitOutcome {
    Equal(EqualSplit),
    Amount(AmountSplit),
    Percentage(PercentageSplit),
    Share(ShareSplit),
}

impl SplitOutcome {
    pub fn compute(total: Decimal, inputs: &SplitInputs) -> Self {
        match inputs {
            SplitInputs::Equal(included) => {
                SplitOutcome::Equal(compute_equal_split(total, included))
            }
            SplitInputs::Amount(_) => {
                SplitOutcome::Amount(compute_amount_split(total, &inputs.numeric_values()))
            }
            SplitInputs::Percentage(_) => {
                SplitOutcome::Percentage(compute_percentage_split(total, &inputs.numeric_values()))
            }
            SplitInputs::Share(_) => {
                SplitOutcome::Share(compute_share_split(total, &inputs.numeric_values()))
            }
        }
    }

    pub fn amounts(&self) -> &[Decimal] {
        match self {
            SplitOutcome::Equal(split) => &split.amounts,
            SplitOutcome::Amount(split) => &split.amounts,
            SplitOutcome::Percentage(split) => &split.amounts,
            SplitOutcome::Share(split) => &split.amounts,
        }
    }

    /// Why this split cannot be submitted for a positive total, if anything
    pub fn submission_error(&self) -> Option<FlowError> {
        match self {
            SplitOutcome::Equal(split) if split.no_one_selected() => {
                Some(FlowError::NoParticipantsSelected)
            }
            SplitOutcome::Amount(split) if !split.is_valid => Some(FlowError::AmountsIncomplete {
                remaining: to_cents(split.remaining),
            }),
            SplitOutcome::Percentage(split) if !split.is_valid => {
                Some(FlowError::PercentagesIncomplete {
                    remaining: split.remaining_percentage.normalize(),
                })
            }
            SplitOutcome::Share(split) if !split.has_shares() => Some(FlowError::NoSharesAssigned),
            _ => None,
        }
    }
}

/// One expense-creation session for one user.
#[derive(Debug, Clone)]
pub struct ExpenseFlow {
    user: UserContext,
    currency_symbol: String,
    state: FlowState,
    draft: Option<ExpenseDraft>,
    submitted_expense_id: Option<String>,
}

impl ExpenseFlow {
    pub fn new(user: UserContext) -> Self {
        Self::with_currency_symbol(user, "$")
    }

    pub fn with_currency_symbol(user: UserContext, currency_symbol: impl Into<String>) -> Self {
        Self {
            user,
            currency_symbol: currency_symbol.into(),
            state: FlowState::Idle,
            draft: None,
            submitted_expense_id: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn draft(&self) -> Option<&ExpenseDraft> {
        self.draft.as_ref()
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Id the backend assigned to the last submitted expense
    pub fn submitted_expense_id(&self) -> Option<&str> {
        self.submitted_expense_id.as_deref()
    }

    /// Open a new draft with the current user as the only participant
    pub fn start(&mut self) -> Result<(), FlowError> {
        self.expect_state(&[FlowState::Idle, FlowState::Submitted], "start a new expense")?;

        info!("Starting expense for user {}", self.user.user_id);
        self.draft = Some(ExpenseDraft::new(self.user.as_participant()));
        self.submitted_expense_id = None;
        self.state = FlowState::EnteringBasicInfo;
        Ok(())
    }

    /// Drop the draft and go back to idle
    pub fn cancel(&mut self) -> Result<(), FlowError> {
        if matches!(self.state, FlowState::Idle | FlowState::AwaitingConfirmation) {
            return Err(self.invalid("cancel"));
        }

        info!("Expense draft discarded");
        self.draft = None;
        self.state = FlowState::Idle;
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), FlowError> {
        self.expect_state(&[FlowState::EnteringBasicInfo], "edit the description")?;
        self.draft_mut()?.description = description.to_string();
        Ok(())
    }

    pub fn set_total(&mut self, total: Option<Decimal>) -> Result<(), FlowError> {
        self.expect_state(&[FlowState::EnteringBasicInfo], "edit the total")?;
        self.draft_mut()?.total = total;
        Ok(())
    }

    /// Set the total from what the user typed; unparseable input unsets it
    pub fn set_total_input(&mut self, input: &str) -> Result<Option<Decimal>, FlowError> {
        let parsed = parse_amount_input(input, &self.currency_symbol, Some(2)).unwrap_or_else(|e| {
            debug!("Ignoring total input {:?}: {}", input, e);
            None
        });
        self.set_total(parsed)?;
        Ok(parsed)
    }

    pub fn set_date(&mut self, date: Option<String>) -> Result<(), FlowError> {
        self.expect_state(&[FlowState::EnteringBasicInfo], "edit the date")?;
        self.draft_mut()?.date = date;
        Ok(())
    }

    /// Add someone to the expense. Already present participants are ignored.
    ///
    /// Allowed until the split is submitted so guests can join while inputs
    /// are being edited; existing inputs are kept and the newcomer starts
    /// from the mode's default.
    pub fn add_participant(&mut self, participant: Participant) -> Result<bool, FlowError> {
        self.expect_state(
            &[
                FlowState::EnteringBasicInfo,
                FlowState::ChoosingSplitMode,
                FlowState::EditingSplitInputs,
            ],
            "add participants",
        )?;

        let draft = self.draft_mut()?;
        if draft.participants.iter().any(|p| p.id == participant.id) {
            return Ok(false);
        }

        debug!("Adding participant {} ({})", participant.name, participant.id);
        draft.participants.push(participant);
        let count = draft.participants.len();
        if let Some(inputs) = draft.inputs.as_mut() {
            inputs.resize(count);
        }
        Ok(true)
    }

    /// Add everyone who joined through a guest session
    pub fn add_guests(&mut self, guests: Vec<Guest>) -> Result<usize, FlowError> {
        let mut added = 0;
        for guest in guests {
            if self.add_participant(guest.into())? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove a participant other than the current user.
    ///
    /// Inputs of the selected mode start over, since they were laid out for
    /// the old participant list.
    pub fn remove_participant(&mut self, participant_id: &str) -> Result<bool, FlowError> {
        self.expect_state(
            &[
                FlowState::EnteringBasicInfo,
                FlowState::ChoosingSplitMode,
                FlowState::EditingSplitInputs,
            ],
            "remove participants",
        )?;

        if participant_id == self.user.user_id {
            return Ok(false);
        }

        let draft = self.draft_mut()?;
        let before = draft.participants.len();
        draft.participants.retain(|p| p.id != participant_id);
        if draft.participants.len() == before {
            return Ok(false);
        }

        let count = draft.participants.len();
        if let Some(mode) = draft.split_mode() {
            draft.inputs = Some(SplitInputs::fresh(mode, count));
        }
        Ok(true)
    }

    /// Leave basic info once there is a description and a positive total.
    ///
    /// The current user is always a participant, so a draft is never empty.
    pub fn continue_to_split_mode(&mut self) -> Result<(), FlowError> {
        self.expect_state(&[FlowState::EnteringBasicInfo], "choose a split mode")?;

        let draft = self.draft_ref()?;
        if !draft.total.is_some_and(|total| total > Decimal::ZERO) {
            warn!("Rejected basic info: total {:?}", draft.total);
            return Err(FlowError::InvalidTotal);
        }
        if draft.description.trim().is_empty() {
            return Err(FlowError::EmptyDescription);
        }

        self.state = FlowState::ChoosingSplitMode;
        Ok(())
    }

    /// Select a split mode, always starting from fresh inputs
    pub fn select_split_mode(&mut self, mode: SplitType) -> Result<(), FlowError> {
        self.expect_state(
            &[FlowState::ChoosingSplitMode, FlowState::EditingSplitInputs],
            "select a split mode",
        )?;

        let draft = self.draft_mut()?;
        draft.inputs = Some(SplitInputs::fresh(mode, draft.participants.len()));
        debug!("Split mode set to {}", mode);
        self.state = FlowState::EditingSplitInputs;
        Ok(())
    }

    /// Step back one screen
    pub fn back(&mut self) -> Result<(), FlowError> {
        self.state = match self.state {
            FlowState::EditingSplitInputs => FlowState::ChoosingSplitMode,
            FlowState::ChoosingSplitMode => FlowState::EnteringBasicInfo,
            _ => return Err(self.invalid("go back")),
        };
        Ok(())
    }

    /// Include or exclude a participant in an equal split
    pub fn set_included(&mut self, index: usize, included: bool) -> Result<(), FlowError> {
        self.expect_state(&[FlowState::EditingSplitInputs], "edit split inputs")?;

        let state = self.state;
        match self.draft_mut()?.inputs.as_mut() {
            Some(SplitInputs::Equal(flags)) => {
                let flag = flags.get_mut(index).ok_or(FlowError::UnknownParticipant(index))?;
                *flag = included;
                Ok(())
            }
            _ => Err(FlowError::InvalidTransition {
                state,
                action: "toggle inclusion outside equal split",
            }),
        }
    }

    /// Change one amount, percentage or share.
    ///
    /// Values that would push amounts past the total, or percentages past
    /// 100, are rejected and the entry keeps its previous value.
    pub fn set_entry(&mut self, index: usize, value: Decimal) -> Result<EntryUpdate, FlowError> {
        self.expect_state(&[FlowState::EditingSplitInputs], "edit split inputs")?;

        let state = self.state;
        let draft = self.draft_mut()?;
        let total = draft.display_total();
        let inputs = draft.inputs.as_mut().ok_or(FlowError::InvalidTransition {
            state,
            action: "edit split inputs",
        })?;

        let ceiling = match inputs {
            SplitInputs::Amount(_) => Some(total),
            SplitInputs::Percentage(_) => Some(Decimal::ONE_HUNDRED),
            SplitInputs::Share(_) => None,
            SplitInputs::Equal(_) => {
                return Err(FlowError::InvalidTransition {
                    state,
                    action: "enter values in an equal split",
                })
            }
        };

        let current = inputs.numeric_values();
        if index >= current.len() {
            return Err(FlowError::UnknownParticipant(index));
        }

        let update = guard_entry(&current, index, value, ceiling);
        if update.is_applied() {
            if let SplitInputs::Amount(values)
            | SplitInputs::Percentage(values)
            | SplitInputs::Share(values) = inputs
            {
                values[index] = Some(value);
            }
        } else {
            debug!("Rejected entry {} for participant {}", value, index);
        }
        Ok(update)
    }

    /// Empty one field
    pub fn clear_entry(&mut self, index: usize) -> Result<(), FlowError> {
        self.expect_state(&[FlowState::EditingSplitInputs], "edit split inputs")?;

        let state = self.state;
        match self.draft_mut()?.inputs.as_mut() {
            Some(SplitInputs::Amount(values))
            | Some(SplitInputs::Percentage(values))
            | Some(SplitInputs::Share(values)) => {
                let value = values.get_mut(index).ok_or(FlowError::UnknownParticipant(index))?;
                *value = None;
                Ok(())
            }
            _ => Err(FlowError::InvalidTransition {
                state,
                action: "clear an entry",
            }),
        }
    }

    /// Apply a keystroke's worth of text to one field.
    ///
    /// Empty text clears the field. Text that does not parse is rejected the
    /// same way an over-allocating value is.
    pub fn set_entry_input(&mut self, index: usize, input: &str) -> Result<EntryUpdate, FlowError> {
        let max_places = match self.draft_ref()?.split_mode() {
            Some(SplitType::Amount) => Some(2),
            _ => None,
        };

        match parse_amount_input(input, &self.currency_symbol, max_places) {
            Ok(Some(value)) => self.set_entry(index, value),
            Ok(None) => self.clear_entry(index).map(|_| EntryUpdate::Applied),
            Err(error) => {
                self.expect_state(&[FlowState::EditingSplitInputs], "edit split inputs")?;
                debug!("Rejected input {:?} for participant {}: {}", input, index, error);
                Ok(EntryUpdate::Rejected)
            }
        }
    }

    /// Run the calculator over the current inputs
    pub fn split(&self) -> Option<SplitOutcome> {
        let draft = self.draft.as_ref()?;
        let inputs = draft.inputs.as_ref()?;
        Some(SplitOutcome::compute(draft.display_total(), inputs))
    }

    /// Exact owed amount per participant for the current inputs
    pub fn allocation(&self) -> Vec<SplitDetail> {
        let (Some(draft), Some(outcome)) = (self.draft.as_ref(), self.split()) else {
            return Vec::new();
        };

        draft
            .participants
            .iter()
            .zip(outcome.amounts())
            .map(|(participant, amount)| SplitDetail {
                participant_id: participant.id.clone(),
                amount: *amount,
            })
            .collect()
    }

    /// Validate the split and hand back the payload to send.
    ///
    /// On success the flow waits in `AwaitingConfirmation` until
    /// [`confirm_submitted`](Self::confirm_submitted) or
    /// [`submission_failed`](Self::submission_failed) is called.
    pub fn request_submission(&mut self) -> Result<CreateExpenseRequest, FlowError> {
        self.expect_state(&[FlowState::EditingSplitInputs], "submit")?;

        let draft = self.draft_ref()?;
        let total = match draft.total {
            Some(total) if total > Decimal::ZERO => total,
            _ => return Err(FlowError::InvalidTotal),
        };
        let inputs = draft.inputs.as_ref().ok_or(FlowError::InvalidTransition {
            state: self.state,
            action: "submit without a split mode",
        })?;

        let outcome = SplitOutcome::compute(total, inputs);
        if let Some(error) = outcome.submission_error() {
            warn!("Submission blocked: {}", error);
            return Err(error);
        }

        let details = draft
            .participants
            .iter()
            .zip(allocate_cents(total, outcome.amounts()))
            .map(|(participant, amount)| SplitDetail {
                participant_id: participant.id.clone(),
                amount,
            })
            .collect();

        let request = CreateExpenseRequest {
            request_id: draft.request_id.clone(),
            description: draft.description.trim().to_string(),
            paid_by: self.user.user_id.clone(),
            date: Some(draft.date.clone().unwrap_or_else(|| Utc::now().to_rfc3339())),
            total: to_cents(total),
            split_type: inputs.mode(),
            details,
        };

        info!(
            "Submitting expense {} ({} split, {} participants)",
            request.request_id,
            request.split_type,
            request.details.len()
        );
        self.state = FlowState::AwaitingConfirmation;
        Ok(request)
    }

    /// The backend accepted the expense; the draft is done
    pub fn confirm_submitted(&mut self, response: CreateExpenseResponse) -> Result<(), FlowError> {
        self.expect_state(&[FlowState::AwaitingConfirmation], "confirm a submission")?;

        info!("Expense {} created", response.expense_id);
        self.submitted_expense_id = Some(response.expense_id);
        self.draft = None;
        self.state = FlowState::Submitted;
        Ok(())
    }

    /// The backend call failed; return to editing with the draft intact
    pub fn submission_failed(&mut self, reason: &str) -> Result<(), FlowError> {
        self.expect_state(&[FlowState::AwaitingConfirmation], "report a failed submission")?;

        warn!("Expense submission failed, draft kept for correction: {}", reason);
        self.state = FlowState::EditingSplitInputs;
        Ok(())
    }

    fn expect_state(&self, allowed: &[FlowState], action: &'static str) -> Result<(), FlowError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            state: self.state,
            action,
        }
    }

    fn draft_ref(&self) -> Result<&ExpenseDraft, FlowError> {
        self.draft.as_ref().ok_or(FlowError::InvalidTransition {
            state: self.state,
            action: "edit without a draft",
        })
    }

    fn draft_mut(&mut self) -> Result<&mut ExpenseDraft, FlowError> {
        let state = self.state;
        self.draft.as_mut().ok_or(FlowError::InvalidTransition {
            state,
            action: "edit without a draft",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn user() -> UserContext {
        UserContext::new("user::1", "Alex")
    }

    /// Flow in basic info with the user plus `others` and the given total
    fn flow_with(total: Decimal, others: &[&str]) -> ExpenseFlow {
        let mut flow = ExpenseFlow::new(user());
        flow.start().unwrap();
        flow.set_description("Dinner").unwrap();
        flow.set_total(Some(total)).unwrap();
        for (i, name) in others.iter().enumerate() {
            flow.add_participant(Participant::new(format!("friend::{}", i), *name))
                .unwrap();
        }
        flow
    }

    fn editing(total: Decimal, others: &[&str], mode: SplitType) -> ExpenseFlow {
        let mut flow = flow_with(total, others);
        flow.continue_to_split_mode().unwrap();
        flow.select_split_mode(mode).unwrap();
        flow
    }

    #[test]
    fn test_start_creates_draft_with_current_user() {
        let mut flow = ExpenseFlow::new(user());
        assert_eq!(flow.state(), FlowState::Idle);

        flow.start().unwrap();

        assert_eq!(flow.state(), FlowState::EnteringBasicInfo);
        let draft = flow.draft().unwrap();
        assert_eq!(draft.participants.len(), 1);
        assert_eq!(draft.participants[0].id, "user::1");
        assert!(draft.total.is_none());
    }

    #[test]
    fn test_total_must_be_positive_to_continue() {
        let mut flow = flow_with(Decimal::ZERO, &["Blair"]);
        assert_eq!(flow.continue_to_split_mode(), Err(FlowError::InvalidTotal));
        assert_eq!(flow.state(), FlowState::EnteringBasicInfo);

        flow.set_total(Some(dec!(-5))).unwrap();
        assert_eq!(flow.continue_to_split_mode(), Err(FlowError::InvalidTotal));

        flow.set_total(None).unwrap();
        assert_eq!(flow.continue_to_split_mode(), Err(FlowError::InvalidTotal));

        flow.set_total_input("$12.00").unwrap();
        assert!(flow.continue_to_split_mode().is_ok());
        assert_eq!(flow.state(), FlowState::ChoosingSplitMode);
    }

    #[test]
    fn test_unparseable_total_reads_as_unset() {
        let mut flow = flow_with(dec!(10), &[]);
        assert_eq!(flow.set_total_input("twelve").unwrap(), None);
        assert_eq!(flow.draft().unwrap().display_total(), Decimal::ZERO);
    }

    #[test]
    fn test_description_required() {
        let mut flow = flow_with(dec!(10), &[]);
        flow.set_description("   ").unwrap();
        assert_eq!(flow.continue_to_split_mode(), Err(FlowError::EmptyDescription));
    }

    #[test]
    fn test_amount_entry_guard_leaves_entry_unchanged() {
        let mut flow = editing(dec!(100), &["Blair", "Casey"], SplitType::Amount);
        flow.set_entry(0, dec!(50)).unwrap();
        flow.set_entry(1, dec!(30)).unwrap();
        flow.set_entry(2, dec!(10)).unwrap();

        let update = flow.set_entry(2, dec!(25)).unwrap();

        assert_eq!(update, EntryUpdate::Rejected);
        let draft = flow.draft().unwrap();
        assert_eq!(draft.inputs.as_ref().unwrap().entry(2), Some(dec!(10)));

        // rejecting again changes nothing
        assert_eq!(flow.set_entry(2, dec!(25)).unwrap(), EntryUpdate::Rejected);
        assert_eq!(flow.draft().unwrap().inputs.as_ref().unwrap().entry(2), Some(dec!(10)));

        assert_eq!(flow.set_entry(2, dec!(20)).unwrap(), EntryUpdate::Applied);
    }

    #[test]
    fn test_percentage_entry_guard_caps_at_one_hundred() {
        let mut flow = editing(dec!(50), &["Blair"], SplitType::Percentage);
        flow.set_entry(0, dec!(70)).unwrap();

        assert_eq!(flow.set_entry(1, dec!(31)).unwrap(), EntryUpdate::Rejected);
        assert_eq!(flow.set_entry(1, dec!(30)).unwrap(), EntryUpdate::Applied);
    }

    #[test]
    fn test_share_entries_unbounded() {
        let mut flow = editing(dec!(10), &["Blair"], SplitType::Share);
        assert_eq!(flow.set_entry(0, dec!(1000)).unwrap(), EntryUpdate::Applied);
        assert_eq!(flow.set_entry(1, dec!(-1)).unwrap(), EntryUpdate::Rejected);
    }

    #[test]
    fn test_entry_text_input() {
        let mut flow = editing(dec!(100), &["Blair"], SplitType::Amount);

        assert_eq!(flow.set_entry_input(0, "$40.00").unwrap(), EntryUpdate::Applied);
        assert_eq!(flow.set_entry_input(1, "4o").unwrap(), EntryUpdate::Rejected);
        assert_eq!(flow.set_entry_input(1, "60.001").unwrap(), EntryUpdate::Rejected);
        assert_eq!(flow.set_entry_input(1, "61").unwrap(), EntryUpdate::Rejected);
        assert_eq!(flow.set_entry_input(0, "").unwrap(), EntryUpdate::Applied);

        let inputs = flow.draft().unwrap().inputs.clone().unwrap();
        assert_eq!(inputs, SplitInputs::Amount(vec![None, None]));
    }

    #[test]
    fn test_equal_mode_rejects_numeric_entries() {
        let mut flow = editing(dec!(10), &["Blair"], SplitType::Equal);
        assert!(matches!(
            flow.set_entry(0, dec!(5)),
            Err(FlowError::InvalidTransition { .. })
        ));
        assert_eq!(flow.set_included(5, false), Err(FlowError::UnknownParticipant(5)));
    }

    #[test]
    fn test_switching_mode_resets_inputs() {
        let mut flow = editing(dec!(100), &["Blair"], SplitType::Equal);
        flow.set_included(1, false).unwrap();

        flow.select_split_mode(SplitType::Amount).unwrap();
        flow.set_entry(0, dec!(70)).unwrap();
        flow.select_split_mode(SplitType::Equal).unwrap();

        let inputs = flow.draft().unwrap().inputs.clone().unwrap();
        assert_eq!(inputs, SplitInputs::Equal(vec![true, true]));

        flow.select_split_mode(SplitType::Amount).unwrap();
        let inputs = flow.draft().unwrap().inputs.clone().unwrap();
        assert_eq!(inputs, SplitInputs::Amount(vec![None, None]));
    }

    #[test]
    fn test_back_is_always_allowed() {
        let mut flow = editing(dec!(100), &["Blair"], SplitType::Percentage);
        flow.set_entry(0, dec!(10)).unwrap();

        flow.back().unwrap();
        assert_eq!(flow.state(), FlowState::ChoosingSplitMode);
        flow.back().unwrap();
        assert_eq!(flow.state(), FlowState::EnteringBasicInfo);
        assert!(flow.back().is_err());
    }

    #[test]
    fn test_submission_gating_end_to_end() {
        let mut flow = editing(dec!(150.00), &["Blair"], SplitType::Percentage);
        flow.set_entry(0, dec!(60)).unwrap();
        flow.set_entry(1, dec!(40)).unwrap();

        let request = flow.request_submission().unwrap();
        assert_eq!(flow.state(), FlowState::AwaitingConfirmation);
        assert_eq!(request.split_type, SplitType::Percentage);
        assert_eq!(request.paid_by, "user::1");
        assert_eq!(request.details[0].amount, dec!(90.00));
        assert_eq!(request.details[1].amount, dec!(60.00));

        flow.confirm_submitted(CreateExpenseResponse {
            expense_id: "expense::1".to_string(),
        })
        .unwrap();
        assert_eq!(flow.state(), FlowState::Submitted);
        assert!(flow.draft().is_none());
        assert_eq!(flow.submitted_expense_id(), Some("expense::1"));
    }

    #[test]
    fn test_incomplete_percentages_block_submission() {
        let mut flow = editing(dec!(150.00), &["Blair"], SplitType::Percentage);
        flow.set_entry(0, dec!(60)).unwrap();
        flow.set_entry(1, dec!(30)).unwrap();

        let error = flow.request_submission().unwrap_err();

        assert_eq!(error, FlowError::PercentagesIncomplete { remaining: dec!(10) });
        assert_eq!(flow.state(), FlowState::EditingSplitInputs);
    }

    #[test]
    fn test_percentages_must_reach_exactly_one_hundred() {
        let mut flow = editing(dec!(1000.00), &["Blair", "Casey"], SplitType::Percentage);
        for index in 0..3 {
            assert_eq!(flow.set_entry_input(index, "33.333").unwrap(), EntryUpdate::Applied);
        }

        let error = flow.request_submission().unwrap_err();
        assert_eq!(error, FlowError::PercentagesIncomplete { remaining: dec!(0.001) });

        flow.set_entry_input(2, "33.334").unwrap();
        let request = flow.request_submission().unwrap();
        let amounts: Vec<Decimal> = request.details.iter().map(|d| d.amount).collect();

        assert_eq!(amounts, vec![dec!(333.33), dec!(333.33), dec!(333.34)]);
        assert_eq!(amounts.iter().sum::<Decimal>(), request.total);
    }

    #[test]
    fn test_share_entries_that_overflow_are_rejected() {
        let mut flow = editing(dec!(10), &["Blair"], SplitType::Share);
        let huge = "79228162514264337593543950335";

        assert_eq!(flow.set_entry_input(0, huge).unwrap(), EntryUpdate::Applied);
        assert_eq!(flow.set_entry_input(1, huge).unwrap(), EntryUpdate::Rejected);

        let outcome = flow.split().unwrap();
        assert_eq!(outcome.amounts(), &[dec!(10), Decimal::ZERO]);
    }

    #[test]
    fn test_huge_total_splits_without_overflow() {
        let total = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let mut flow = editing(total, &["Blair"], SplitType::Percentage);
        assert_eq!(flow.set_entry(0, dec!(100)).unwrap(), EntryUpdate::Applied);

        let outcome = flow.split().unwrap();

        assert_eq!(outcome.amounts(), &[total, Decimal::ZERO]);
        assert!(outcome.submission_error().is_none());
    }

    #[test]
    fn test_incomplete_amounts_name_the_shortfall() {
        let mut flow = editing(dec!(100.00), &["Blair", "Casey"], SplitType::Amount);
        flow.set_entry(0, dec!(40)).unwrap();
        flow.set_entry(1, dec!(35)).unwrap();
        flow.set_entry(2, dec!(24)).unwrap();

        let error = flow.request_submission().unwrap_err();
        assert_eq!(error.to_string(), "Amounts must add up to the total: 1.00 remaining");
    }

    #[test]
    fn test_nobody_selected_blocks_submission() {
        let mut flow = editing(dec!(30), &["Blair"], SplitType::Equal);
        flow.set_included(0, false).unwrap();
        flow.set_included(1, false).unwrap();

        match flow.split() {
            Some(SplitOutcome::Equal(split)) => assert!(split.no_one_selected()),
            other => panic!("unexpected split {:?}", other),
        }
        assert_eq!(flow.request_submission(), Err(FlowError::NoParticipantsSelected));
    }

    #[test]
    fn test_zero_shares_block_submission() {
        let mut flow = editing(dec!(30), &["Blair"], SplitType::Share);
        assert_eq!(flow.request_submission(), Err(FlowError::NoSharesAssigned));
    }

    #[test]
    fn test_equal_submission_allocates_cents() {
        let mut flow = editing(dec!(100.00), &["Blair", "Casey"], SplitType::Equal);

        let request = flow.request_submission().unwrap();
        let amounts: Vec<Decimal> = request.details.iter().map(|d| d.amount).collect();

        assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
        assert_eq!(request.total, dec!(100.00));
    }

    #[test]
    fn test_failed_submission_restores_draft() {
        let mut flow = editing(dec!(90.00), &["Blair", "Casey"], SplitType::Share);
        flow.set_entry(0, dec!(1)).unwrap();
        flow.set_entry(1, dec!(2)).unwrap();
        flow.set_entry(2, dec!(3)).unwrap();

        let first = flow.request_submission().unwrap();
        assert!(flow.cancel().is_err());
        flow.submission_failed("connection refused").unwrap();

        assert_eq!(flow.state(), FlowState::EditingSplitInputs);
        let inputs = flow.draft().unwrap().inputs.clone().unwrap();
        assert_eq!(inputs.numeric_values(), vec![dec!(1), dec!(2), dec!(3)]);

        let retry = flow.request_submission().unwrap();
        assert_eq!(retry.request_id, first.request_id);
        let amounts: Vec<Decimal> = retry.details.iter().map(|d| d.amount).collect();
        assert_eq!(amounts, vec![dec!(15.00), dec!(30.00), dec!(45.00)]);
    }

    #[test]
    fn test_guests_join_while_editing() {
        let mut flow = editing(dec!(20), &["Blair"], SplitType::Amount);
        flow.set_entry(0, dec!(5)).unwrap();

        let added = flow
            .add_guests(vec![
                Guest { id: "guest::1".to_string(), name: "Sam".to_string() },
                Guest { id: "guest::1".to_string(), name: "Sam".to_string() },
            ])
            .unwrap();

        assert_eq!(added, 1);
        let draft = flow.draft().unwrap();
        assert_eq!(draft.participants.len(), 3);
        assert!(draft.participants[2].is_guest);
        assert_eq!(
            draft.inputs,
            Some(SplitInputs::Amount(vec![Some(dec!(5)), None, None]))
        );
    }

    #[test]
    fn test_removing_participant_resets_mode_inputs() {
        let mut flow = editing(dec!(20), &["Blair", "Casey"], SplitType::Share);
        flow.set_entry(1, dec!(2)).unwrap();

        assert!(!flow.remove_participant("user::1").unwrap());
        assert!(flow.remove_participant("friend::0").unwrap());

        let draft = flow.draft().unwrap();
        assert_eq!(draft.participants.len(), 2);
        assert_eq!(draft.inputs, Some(SplitInputs::Share(vec![None, None])));
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut flow = editing(dec!(20), &["Blair"], SplitType::Equal);
        flow.cancel().unwrap();

        assert_eq!(flow.state(), FlowState::Idle);
        assert!(flow.draft().is_none());
        assert!(flow.cancel().is_err());
    }

    #[test]
    fn test_can_start_again_after_submission() {
        let mut flow = editing(dec!(20), &["Blair"], SplitType::Equal);
        flow.request_submission().unwrap();
        flow.confirm_submitted(CreateExpenseResponse { expense_id: "e1".to_string() })
            .unwrap();

        flow.start().unwrap();
        assert_eq!(flow.state(), FlowState::EnteringBasicInfo);
        assert!(flow.submitted_expense_id().is_none());
    }

    #[test]
    fn test_allocation_lists_every_participant() {
        let mut flow = editing(dec!(60), &["Blair", "Casey"], SplitType::Equal);
        flow.set_included(2, false).unwrap();

        let allocation = flow.allocation();
        assert_eq!(allocation.len(), 3);
        assert_eq!(allocation[0].amount, dec!(30));
        assert_eq!(allocation[2].amount, Decimal::ZERO);
    }
}
