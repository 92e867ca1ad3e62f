use crate::error::{Error, Result};
use crate::model::{NewSubscription, Subscription};

use super::Store;

/// Repository for the subscription collection
pub struct SubscriptionsRepo;

impl SubscriptionsRepo {
    #[tracing::instrument(name = "Fetch all subscriptions", skip(store))]
    pub fn fetch_all(store: &Store) -> Vec<Subscription> {
        store.read(|state| state.subscriptions.clone())
    }

    /// Insert a subscription for a member that exists right now. The reference
    /// is not checked again later.
    #[tracing::instrument(name = "Insert subscription", skip(store))]
    pub fn insert(store: &Store, new_subscription: NewSubscription) -> Result<Subscription> {
        store.write(|state| {
            if !state.has_member(&new_subscription.user_id) {
                return Err(Error::InvalidMemberReference(new_subscription.user_id));
            }
            let subscription = Subscription::new(state.take_subscription_id(), new_subscription);
            state.subscriptions.push(subscription.clone());
            Ok(subscription)
        })
    }
}
