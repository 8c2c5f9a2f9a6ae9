use crate::types::{DigestError, Result, Subscription};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Existence and activity of one stored subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionState {
    pub id: Uuid,
    pub is_active: bool,
}

/// Contract the pipeline depends on from the external subscription store.
/// Creation, reactivation, and the rest of the CRUD surface live entirely
/// outside this crate.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// All active subscriptions joined with user email and category/location
    /// details. Failure here aborts the whole run.
    async fn list_active_subscriptions(&self) -> Result<Vec<Subscription>>;

    async fn find_subscription(&self, id: Uuid) -> Result<Option<SubscriptionState>>;

    /// Flip the subscription's active flag to false. The caller handles
    /// idempotence; this is only invoked for currently active subscriptions.
    async fn deactivate_subscription(&self, id: Uuid) -> Result<()>;
}

/// Validated mapping from a loosely typed joined row (the shape the store's
/// query layer returns) into the internal schema. Checks presence and type
/// of every required nested field and fails fast instead of assuming shape.
///
/// Expected row shape:
/// `{ id, is_active, users: { id, email }, categories: { id, name },
///    locations: { id, name, event_url } }`
pub fn subscription_from_row(row: &Value) -> Result<Subscription> {
    let user = object(row, "subscription", "users")?;
    let category = object(row, "subscription", "categories")?;
    let location = object(row, "subscription", "locations")?;

    Ok(Subscription {
        id: id_field(row, "subscription", "id")?,
        user_email: text_field(user, "users", "email")?,
        location_id: id_field(location, "locations", "id")?,
        location_name: text_field(location, "locations", "name")?,
        location_event_url: text_field(location, "locations", "event_url")?,
        category_id: id_field(category, "categories", "id")?,
        category_name: text_field(category, "categories", "name")?,
        is_active: bool_field(row, "subscription", "is_active")?,
    })
}

fn object<'a>(value: &'a Value, context: &str, name: &str) -> Result<&'a Value> {
    let field = field(value, context, name)?;
    if !field.is_object() {
        return Err(DigestError::Store(format!(
            "field {}.{} is not an object",
            context, name
        )));
    }
    Ok(field)
}

fn field<'a>(value: &'a Value, context: &str, name: &str) -> Result<&'a Value> {
    value.get(name).ok_or_else(|| {
        DigestError::Store(format!("missing required field {}.{}", context, name))
    })
}

fn text_field(value: &Value, context: &str, name: &str) -> Result<String> {
    field(value, context, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DigestError::Store(format!("field {}.{} is not a string", context, name)))
}

fn bool_field(value: &Value, context: &str, name: &str) -> Result<bool> {
    field(value, context, name)?
        .as_bool()
        .ok_or_else(|| DigestError::Store(format!("field {}.{} is not a boolean", context, name)))
}

fn id_field(value: &Value, context: &str, name: &str) -> Result<Uuid> {
    let raw = text_field(value, context, name)?;
    Uuid::parse_str(&raw).map_err(|e| {
        DigestError::Store(format!("field {}.{} is not a valid id: {}", context, name, e))
    })
}

/// In-memory store implementation backing the binary's subscriptions-file
/// mode and the integration tests.
pub struct MemoryStore {
    subscriptions: RwLock<Vec<Subscription>>,
}

impl MemoryStore {
    pub fn new(subscriptions: Vec<Subscription>) -> Self {
        Self {
            subscriptions: RwLock::new(subscriptions),
        }
    }

    /// Build a store from loosely typed joined rows, validating each one.
    pub fn from_rows(rows: &[Value]) -> Result<Self> {
        let subscriptions = rows
            .iter()
            .map(subscription_from_row)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(subscriptions))
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn list_active_subscriptions(&self) -> Result<Vec<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions
            .iter()
            .filter(|sub| sub.is_active)
            .cloned()
            .collect())
    }

    async fn find_subscription(&self, id: Uuid) -> Result<Option<SubscriptionState>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions.iter().find(|sub| sub.id == id).map(|sub| {
            SubscriptionState {
                id: sub.id,
                is_active: sub.is_active,
            }
        }))
    }

    async fn deactivate_subscription(&self, id: Uuid) -> Result<()> {
        let mut subscriptions = self.subscriptions.write().await;
        match subscriptions.iter_mut().find(|sub| sub.id == id) {
            Some(subscription) => {
                subscription.is_active = false;
                Ok(())
            }
            None => Err(DigestError::Store(format!("subscription {} not found", id))),
        }
    }
}
