use shared::Participant;

/// Who is creating the expense.
///
/// Handed to the flow explicitly instead of being looked up from global
/// state, so the payer of a submission is always known to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
    pub display_name: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }

    /// The current user as a participant of their own expense
    pub fn as_participant(&self) -> Participant {
        Participant::new(self.user_id.clone(), self.display_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_participant() {
        let user = UserContext::new("user::1", "Alex");
        let participant = user.as_participant();

        assert_eq!(participant.id, "user::1");
        assert_eq!(participant.name, "Alex");
        assert!(!participant.is_guest);
    }
}
