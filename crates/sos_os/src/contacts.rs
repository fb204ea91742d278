#![forbid(unsafe_code)]

use serde::Serialize;
use sos_engines::achievement::AchievementTrigger;
use sos_engines::reward::CONTACT_SETUP_REWARD;
use sos_kernel_contracts::achievement::AchievementId;
use sos_kernel_contracts::contact::{format_phone_number, EmergencyContact};
use sos_kernel_contracts::reward::{RewardPair, RewardTotals};
use sos_storage::repo::{EmergencyContactRepo, RewardTotalsRepo};
use sos_storage::state::{SosStore, StorageError};
use tracing::info;

use crate::achievements::unlock_for;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactAdded {
    pub contact: EmergencyContact,
    pub contact_count: usize,
    pub reward: RewardPair,
    pub totals: RewardTotals,
    pub unlocked: Option<AchievementId>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContactRuntime;

impl ContactRuntime {
    /// Formats the phone, stores the contact and grants the setup reward.
    pub fn add_contact(
        &self,
        store: &mut SosStore,
        name: &str,
        raw_phone: &str,
    ) -> Result<ContactAdded, StorageError> {
        let contact = EmergencyContact::v1(name, format_phone_number(raw_phone.trim()))?;
        let contact_count = store.append_contact_row(contact.clone())?;
        let totals = store.credit_reward_row(CONTACT_SETUP_REWARD);
        let unlocked = unlock_for(store, AchievementTrigger::ContactAdded);
        store.save()?;
        info!(contact_count, "emergency contact added");
        Ok(ContactAdded {
            contact,
            contact_count,
            reward: CONTACT_SETUP_REWARD,
            totals,
            unlocked,
        })
    }

    /// Removes the most recently added contact. Rewards already granted are kept.
    pub fn remove_last_contact(
        &self,
        store: &mut SosStore,
    ) -> Result<Option<EmergencyContact>, StorageError> {
        let removed = store.remove_last_contact_row();
        if removed.is_some() {
            store.save()?;
            info!(remaining = store.contact_rows().len(), "emergency contact removed");
        }
        Ok(removed)
    }

    pub fn list_contacts<'a>(&self, store: &'a SosStore) -> &'a [EmergencyContact] {
        store.contact_rows()
    }
}
