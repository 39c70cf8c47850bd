//! Cache of users who authored post revisions, keyed by user id.
//!
//! [`AuthorCache`] is an immutable, cheaply clonable map. Merging a batch
//! returns a new cache only when some record actually changed; otherwise the
//! very same cache comes back, so consumers can detect "nothing new" with
//! [`AuthorCache::same_as`] instead of a deep comparison.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;
use crate::types::UserId;

// ---------------------------------------------------------------------------
// UserRecord
// ---------------------------------------------------------------------------

/// A user as delivered by the revisions endpoint.
///
/// Only `ID` is interpreted; every other property is carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "ID")]
    pub id: UserId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl UserRecord {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Parse one raw user record. The record must be an object with an
/// integer `ID`.
pub fn parse_user_record(raw: &Value) -> Result<UserRecord, RecordError> {
    let obj = raw.as_object().ok_or(RecordError::NotAnObject)?;
    let id = obj
        .get("ID")
        .ok_or(RecordError::Missing("ID"))?
        .as_i64()
        .ok_or(RecordError::WrongType {
            field: "ID",
            expected: "an integer",
        })?;

    let attributes = obj
        .iter()
        .filter(|(key, _)| key.as_str() != "ID")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(UserRecord { id, attributes })
}

/// Parse a batch, one result per record in input order.
pub fn parse_user_records(raw: &[Value]) -> Vec<Result<UserRecord, RecordError>> {
    raw.iter().map(parse_user_record).collect()
}

// ---------------------------------------------------------------------------
// AuthorCache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorCache {
    items: Arc<HashMap<UserId, UserRecord>>,
}

impl AuthorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: UserId) -> Option<&UserRecord> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.items.values()
    }

    /// Whether both caches are the same instance, not merely equal.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// See [`merge`].
    pub fn merge(&self, incoming: impl IntoIterator<Item = UserRecord>) -> Self {
        merge(self, incoming)
    }
}

impl FromIterator<UserRecord> for AuthorCache {
    fn from_iter<I: IntoIterator<Item = UserRecord>>(iter: I) -> Self {
        merge(&Self::default(), iter)
    }
}

/// Merge `incoming` into `current`, last write wins per id.
///
/// The map is copied on the first record that differs from what is cached.
/// If no record differs (including an empty batch) `current` is returned
/// as the same instance.
pub fn merge(current: &AuthorCache, incoming: impl IntoIterator<Item = UserRecord>) -> AuthorCache {
    let mut updated: Option<HashMap<UserId, UserRecord>> = None;
    let mut received = 0usize;

    for user in incoming {
        received += 1;
        let cached = match &updated {
            Some(items) => items.get(&user.id),
            None => current.items.get(&user.id),
        };
        if cached == Some(&user) {
            continue;
        }
        updated
            .get_or_insert_with(|| current.items.as_ref().clone())
            .insert(user.id, user);
    }

    match updated {
        Some(items) => {
            tracing::debug!(received, cached = items.len(), "Merged revision authors");
            AuthorCache {
                items: Arc::new(items),
            }
        }
        None => current.clone(),
    }
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// Actions handled by the revision-authors state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorAction {
    /// A batch of users was received for some post's revisions.
    Receive { users: Vec<UserRecord> },
}

/// State slice owned by the caller and threaded through [`reduce`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorsState {
    pub items: AuthorCache,
}

impl AuthorsState {
    /// Whether both states share the same cached items instance.
    pub fn same_as(&self, other: &Self) -> bool {
        self.items.same_as(&other.items)
    }
}

pub fn reduce(state: &AuthorsState, action: AuthorAction) -> AuthorsState {
    match action {
        AuthorAction::Receive { users } => AuthorsState {
            items: state.items.merge(users),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn user(id: UserId, name: &str) -> UserRecord {
        UserRecord::new(id).with_attribute("name", name)
    }

    #[test]
    fn empty_batch_keeps_identity() {
        let cache = AuthorCache::from_iter([user(1, "a")]);
        let merged = cache.merge(Vec::new());
        assert!(merged.same_as(&cache));
    }

    #[test]
    fn merge_overwrites_and_adds() {
        let cache = AuthorCache::from_iter([user(1, "a")]);
        let merged = cache.merge([user(1, "b"), user(2, "c")]);

        assert!(!merged.same_as(&cache));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get(1), Some(&user(1, "b")));
        assert_eq!(merged.get(2), Some(&user(2, "c")));
        // The previous cache is untouched.
        assert_eq!(cache.get(1), Some(&user(1, "a")));
        assert!(cache.get(2).is_none());
    }

    #[test]
    fn last_write_wins_within_batch() {
        let merged = AuthorCache::new().merge([user(3, "first"), user(3, "second")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get(3), Some(&user(3, "second")));
    }

    #[test]
    fn unchanged_batch_keeps_identity() {
        let cache = AuthorCache::from_iter([user(1, "a"), user(2, "b")]);
        let merged = cache.merge([user(2, "b")]);
        assert!(merged.same_as(&cache));
    }

    #[test]
    fn merge_is_idempotent() {
        let batch = vec![user(1, "b"), user(2, "c")];
        let once = AuthorCache::from_iter([user(1, "a")]).merge(batch.clone());
        let twice = once.merge(batch);
        assert_eq!(once, twice);
        assert!(twice.same_as(&once));
    }

    #[test]
    fn reduce_receive_merges() {
        let state = AuthorsState::default();
        let next = reduce(
            &state,
            AuthorAction::Receive {
                users: vec![user(7, "g")],
            },
        );
        assert!(!next.same_as(&state));
        assert_eq!(next.items.get(7), Some(&user(7, "g")));

        let unchanged = reduce(&next, AuthorAction::Receive { users: vec![] });
        assert!(unchanged.same_as(&next));
    }

    #[test]
    fn parses_user_with_extra_attributes() {
        let parsed = parse_user_record(&json!({ "ID": 4, "name": "d", "avatar_URL": "x" })).unwrap();
        assert_eq!(parsed.id, 4);
        assert_eq!(parsed.attributes["name"], "d");
        assert!(!parsed.attributes.contains_key("ID"));
    }

    #[test]
    fn malformed_users_reported_per_record() {
        let results = parse_user_records(&[
            json!({ "ID": 1 }),
            json!({ "name": "no id" }),
            json!({ "ID": "2" }),
            json!("string"),
        ]);
        assert_matches!(results[0], Ok(UserRecord { id: 1, .. }));
        assert_matches!(results[1], Err(RecordError::Missing("ID")));
        assert_matches!(results[2], Err(RecordError::WrongType { field: "ID", .. }));
        assert_matches!(results[3], Err(RecordError::NotAnObject));
    }

    #[test]
    fn serializes_id_in_upper_case() {
        let json = serde_json::to_value(user(9, "i")).unwrap();
        assert_eq!(json, json!({ "ID": 9, "name": "i" }));
    }
}
