//! Capability checks shared by every service.
//!
//! Handlers never inspect roles directly: they build an [`AuthContext`] from the
//! request and ask [`authorize`] whether an [`Action`] is allowed, passing the
//! account that owns the target resource when there is one.

use crate::{role::Role, status::ExcessStatus};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The authenticated account performing a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    pub account_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn new(account_id: Uuid, role: Role) -> Self {
        Self { account_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn owns(&self, owner: Option<Uuid>) -> bool {
        owner == Some(self.account_id)
    }

    /// Resolves whose records a listing should read.
    ///
    /// Staff may look at another account; everybody else always gets their own.
    pub fn scoped_account(&self, requested: Option<Uuid>) -> Uuid {
        match requested {
            Some(id) if self.is_staff() => id,
            _ => self.account_id,
        }
    }
}

/// Everything a request can ask to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewBooking,
    ModifyBooking,
    CreateExcess,
    ViewExcess,
    EditExcess,
    ManageDocuments,
    ChangeExcessStatus(ExcessStatus),
    /// Listing or creating bank cards
    ManageBankCards,
    /// Editing or deleting a single card
    ModifyBankCard,
    /// Deposits and withdrawals
    MoveFunds,
    ManageUsers,
    EditAccount,
    /// Cross-account listings (all bookings, all excesses, recent activity)
    ViewAllRecords,
    SendNotification,
    ReadNotification,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Denied(pub &'static str);

/// Decides whether `ctx` may perform `action` on a resource owned by `owner`
pub fn authorize(ctx: &AuthContext, action: Action, owner: Option<Uuid>) -> Result<(), Denied> {
    let owns = ctx.owns(owner);

    let allowed = match action {
        Action::ViewBooking | Action::ViewExcess => owns || ctx.is_staff(),
        Action::ModifyBooking | Action::EditExcess => owns || ctx.is_admin(),
        Action::CreateExcess | Action::ManageDocuments | Action::ReadNotification => owns,
        Action::ChangeExcessStatus(status) if status.is_decision() => {
            return if ctx.is_admin() {
                Ok(())
            } else {
                Err(Denied("Only admins can approve or refuse excesses"))
            };
        }
        Action::ChangeExcessStatus(_) => owns || ctx.is_admin(),
        Action::ManageBankCards | Action::ViewAllRecords => ctx.is_staff(),
        Action::ModifyBankCard => ctx.is_staff() && (owns || ctx.is_admin()),
        Action::MoveFunds => ctx.is_staff() || owns,
        Action::ManageUsers | Action::SendNotification => ctx.is_admin(),
        Action::EditAccount => owns || ctx.is_admin(),
    };

    if allowed { Ok(()) } else { Err(Denied("Forbidden")) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AuthContext {
        AuthContext::new(Uuid::new_v4(), role)
    }

    #[test]
    fn test_only_admins_decide_excesses() {
        let admin = ctx(Role::Admin);
        let owner = ctx(Role::Customer);
        let employee = ctx(Role::Employee);

        for status in [ExcessStatus::Approved, ExcessStatus::Declined] {
            let action = Action::ChangeExcessStatus(status);
            assert!(authorize(&admin, action, Some(owner.account_id)).is_ok());
            assert!(authorize(&owner, action, Some(owner.account_id)).is_err());
            assert!(authorize(&employee, action, Some(owner.account_id)).is_err());
        }
    }

    #[test]
    fn test_need_update_allowed_for_owner_or_admin() {
        let action = Action::ChangeExcessStatus(ExcessStatus::NeedUpdate);
        let owner = ctx(Role::Customer);
        let stranger = ctx(Role::Customer);
        let employee = ctx(Role::Employee);

        assert!(authorize(&owner, action, Some(owner.account_id)).is_ok());
        assert!(authorize(&ctx(Role::Admin), action, Some(owner.account_id)).is_ok());
        assert!(authorize(&stranger, action, Some(owner.account_id)).is_err());
        assert!(authorize(&employee, action, Some(owner.account_id)).is_err());
    }

    #[test]
    fn test_move_funds_staff_or_owner() {
        let owner = ctx(Role::Customer);
        assert!(authorize(&owner, Action::MoveFunds, Some(owner.account_id)).is_ok());
        assert!(authorize(&ctx(Role::Employee), Action::MoveFunds, Some(owner.account_id)).is_ok());
        assert!(authorize(&ctx(Role::Manager), Action::MoveFunds, Some(owner.account_id)).is_err());
    }

    #[test]
    fn test_modify_bank_card_requires_staff_and_ownership_unless_admin() {
        let employee = ctx(Role::Employee);
        let other = Uuid::new_v4();

        assert!(authorize(&employee, Action::ModifyBankCard, Some(employee.account_id)).is_ok());
        assert!(authorize(&employee, Action::ModifyBankCard, Some(other)).is_err());
        assert!(authorize(&ctx(Role::Admin), Action::ModifyBankCard, Some(other)).is_ok());

        let customer = ctx(Role::Customer);
        assert!(authorize(&customer, Action::ModifyBankCard, Some(customer.account_id)).is_err());
    }

    #[test]
    fn test_missing_owner_never_counts_as_ownership() {
        let customer = ctx(Role::Customer);
        assert!(authorize(&customer, Action::ViewBooking, None).is_err());
        assert!(authorize(&ctx(Role::Employee), Action::ViewBooking, None).is_ok());
    }

    #[test]
    fn test_scoped_account() {
        let requested = Uuid::new_v4();
        let customer = ctx(Role::Customer);
        let employee = ctx(Role::Employee);

        assert_eq!(customer.scoped_account(Some(requested)), customer.account_id);
        assert_eq!(employee.scoped_account(Some(requested)), requested);
        assert_eq!(employee.scoped_account(None), employee.account_id);
    }
}
