//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities.
//! Every entity id wraps a UUID and is told apart by a marker type.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type AccountId = Id<markers::Account>;
/// let id = AccountId::new();
/// assert_eq!(id, AccountId::from_uuid(id.into_uuid()));
/// ```
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4)
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Create from an existing UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    /// Convert to UUID
    pub fn into_uuid(self) -> Uuid {
        self.value
    }
}

// manual impls: derive would demand the same bounds on the marker
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> From<Id<T>> for Uuid {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Error returned when a path or body value is not a valid UUID
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ID inválido")]
pub struct ParseIdError;

impl<T> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self::from_uuid).map_err(|_| ParseIdError)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    pub struct Account;
    pub struct RefreshToken;
    pub struct Module;
    pub struct Content;
    pub struct Trail;
    pub struct TrailProgress;
    pub struct Assessment;
    pub struct Question;
    pub struct Alternative;
    pub struct Challenge;
    pub struct ChallengeStage;
    pub struct Reward;
    pub struct Redemption;
    pub struct Certificate;
    pub struct LedgerEntry;
}

/// Type aliases for common IDs
pub type AccountId = Id<markers::Account>;
pub type RefreshTokenId = Id<markers::RefreshToken>;
pub type ModuleId = Id<markers::Module>;
pub type ContentId = Id<markers::Content>;
pub type TrailId = Id<markers::Trail>;
pub type TrailProgressId = Id<markers::TrailProgress>;
pub type AssessmentId = Id<markers::Assessment>;
pub type QuestionId = Id<markers::Question>;
pub type AlternativeId = Id<markers::Alternative>;
pub type ChallengeId = Id<markers::Challenge>;
pub type ChallengeStageId = Id<markers::ChallengeStage>;
pub type RewardId = Id<markers::Reward>;
pub type RedemptionId = Id<markers::Redemption>;
pub type CertificateId = Id<markers::Certificate>;
pub type LedgerEntryId = Id<markers::LedgerEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_type_safety() {
        let account_id: AccountId = Id::new();
        let trail_id: TrailId = Id::new();

        // These are different types, cannot be mixed
        let _a: Uuid = account_id.into_uuid();
        let _t: Uuid = trail_id.into_uuid();
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id: RewardId = Id::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn test_id_is_copy_without_marker_bounds() {
        let id = ContentId::new();
        let copied = id;
        assert_eq!(id, copied);
    }

    #[test]
    fn test_parse() {
        let uuid = Uuid::new_v4();
        let parsed: ModuleId = uuid.to_string().parse().unwrap();
        assert_eq!(parsed.into_uuid(), uuid);

        let err = "42".parse::<ModuleId>().unwrap_err();
        assert_eq!(err.to_string(), "ID inválido");
    }

    #[test]
    fn test_serde_is_transparent() {
        let uuid = Uuid::new_v4();
        let id = CertificateId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));

        let back: CertificateId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
