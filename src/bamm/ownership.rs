//! Two-step ownership: the owner nominates, the nominee accepts
use odra::prelude::*;
use super::errors::BammError;
use super::events::{OwnerChanged, OwnerNominated};

#[odra::module(events = [OwnerNominated, OwnerChanged])]
pub struct Ownership {
    owner: Var<Address>,
    nominated: Var<Option<Address>>,
}

#[odra::module]
impl Ownership {
    pub fn init(&mut self, owner: Address) {
        self.owner.set(owner);
        self.nominated.set(None);
    }

    pub fn owner(&self) -> Address {
        self.owner.get_or_revert_with(BammError::NotInitialized)
    }

    pub fn nominated_owner(&self) -> Option<Address> {
        self.nominated.get_or_default()
    }

    /// Records `candidate` as pending owner; only the current owner may call
    pub fn nominate_new_owner(&mut self, candidate: Address) {
        self.assert_owner(self.env().caller());
        self.nominated.set(Some(candidate));
        self.env().emit_event(OwnerNominated {
            current_owner: self.owner(),
            nominee: candidate,
        });
    }

    /// Completes the transfer; only the nominee may call
    pub fn accept_ownership(&mut self) {
        let caller = self.env().caller();
        if self.nominated_owner() != Some(caller) {
            self.env().revert(BammError::NotNominated);
        }
        let previous_owner = self.owner();
        self.owner.set(caller);
        self.nominated.set(None);
        self.env().emit_event(OwnerChanged {
            previous_owner,
            new_owner: caller,
        });
    }

    pub fn assert_owner(&self, address: Address) {
        if self.owner() != address {
            self.env().revert(BammError::Unauthorized);
        }
    }
}
