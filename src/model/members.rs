use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

/// New member request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub whatsapp_opt_in: bool,
}

/// Partial member update, only the `Some` fields are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// `Some(None)` clears the stored email
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub email: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_opt_in: Option<bool>,
}

/// Stored member record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub whatsapp_opt_in: bool,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn new(id: String, new_member: NewMember) -> Self {
        Self {
            id,
            name: new_member.name,
            phone: new_member.phone,
            email: new_member.email,
            whatsapp_opt_in: new_member.whatsapp_opt_in,
            created_at: Utc::now(),
        }
    }

    /// Overwrite the fields present in `changes`, leaving the rest untouched
    pub fn apply(&mut self, changes: MemberChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(opt_in) = changes.whatsapp_opt_in {
            self.whatsapp_opt_in = opt_in;
        }
    }
}

/// Distinguishes an explicit `null` from an absent key: a present key always
/// yields `Some`, while `#[serde(default)]` covers the absent case
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
