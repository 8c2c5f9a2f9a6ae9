use crate::types::{GroupKey, Subscription};
use std::collections::HashMap;
use tracing::debug;

/// Partition subscriptions by (location id, category id) so extraction and
/// rendering run once per distinct pair, not once per subscriber. Every
/// subscription in a group shares the same listing URL and category name by
/// the store's uniqueness invariant; empty groups cannot occur.
pub fn group_subscriptions(subscriptions: &[Subscription]) -> HashMap<GroupKey, Vec<Subscription>> {
    let mut groups: HashMap<GroupKey, Vec<Subscription>> = HashMap::new();

    for subscription in subscriptions {
        let key = GroupKey {
            location_id: subscription.location_id,
            category_id: subscription.category_id,
        };
        groups.entry(key).or_default().push(subscription.clone());
    }

    debug!(
        "Grouped {} subscriptions into {} location/category groups",
        subscriptions.len(),
        groups.len()
    );

    groups
}
