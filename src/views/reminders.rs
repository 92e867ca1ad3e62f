use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate};

use url::Url;

use crate::domain::digits_only;
use crate::model::{Member, Subscription, Workout};

/// Days left at or below which a subscription counts as expiring soon
pub const EXPIRING_SOON_DAYS: i64 = 3;
/// Days left at or below which a renewal reminder may be sent
pub const REMINDER_WINDOW_DAYS: i64 = 7;

const WHATSAPP_BASE: &str = "https://wa.me/";
const UNKNOWN_MEMBER: &str = "Unknown";

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a calendar date, either `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Whole days from `today` until `end_date`, negative once it has passed.
/// `None` when the date cannot be parsed.
pub fn days_until_end(end_date: &str, today: NaiveDate) -> Option<i64> {
    parse_date(end_date).map(|end| (end - today).num_days())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Unknown,
    Expired,
    ExpiringSoon,
    Active,
}

impl SubscriptionStatus {
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            None => Self::Unknown,
            Some(d) if d < 0 => Self::Expired,
            Some(d) if d <= EXPIRING_SOON_DAYS => Self::ExpiringSoon,
            Some(_) => Self::Active,
        }
    }

    pub fn of(subscription: &Subscription, today: NaiveDate) -> Self {
        Self::from_days(days_until_end(&subscription.end_date, today))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Expired => "Expired",
            Self::ExpiringSoon => "Expiring soon",
            Self::Active => "Active",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Members indexed by id, for resolving names and phones in listings
#[derive(Debug, Default)]
pub struct MemberDirectory<'a> {
    by_id: HashMap<&'a str, &'a Member>,
}

impl<'a> MemberDirectory<'a> {
    pub fn new(members: &'a [Member]) -> Self {
        Self {
            by_id: members.iter().map(|m| (m.id.as_str(), m)).collect(),
        }
    }

    pub fn get(&self, user_id: &str) -> Option<&'a Member> {
        self.by_id.get(user_id).copied()
    }

    /// Display name, `Unknown` for ids with no member
    pub fn name(&self, user_id: &str) -> &'a str {
        self.get(user_id)
            .map(|m| m.name.as_str())
            .unwrap_or(UNKNOWN_MEMBER)
    }

    /// Phone as stored, empty for ids with no member
    pub fn phone(&self, user_id: &str) -> &'a str {
        self.get(user_id).map(|m| m.phone.as_str()).unwrap_or("")
    }

    /// Whether a renewal reminder can be sent for `subscription`
    pub fn can_remind(&self, subscription: &Subscription, today: NaiveDate) -> bool {
        let has_phone = !digits_only(self.phone(&subscription.user_id)).is_empty();
        let in_window = days_until_end(&subscription.end_date, today)
            .map_or(false, |days| days <= REMINDER_WINDOW_DAYS);
        has_phone && in_window
    }

    /// Prefilled WhatsApp renewal reminder, or `None` when no reminder can be sent
    pub fn renewal_link(&self, subscription: &Subscription, today: NaiveDate) -> Option<Url> {
        if !self.can_remind(subscription, today) {
            return None;
        }
        let message = format!(
            "Hi {}, your gym plan ({}) is ending on {}. Please renew to continue your workouts.",
            self.name(&subscription.user_id),
            subscription.plan_name,
            subscription.end_date,
        );
        whatsapp_link(self.phone(&subscription.user_id), &message)
    }

    /// Prefilled WhatsApp message carrying a workout plan, or `None` when the
    /// member has no usable phone
    pub fn workout_link(&self, workout: &Workout) -> Option<Url> {
        let message = format!(
            "Hi {}, here is your workout plan for {}:\n\n{}",
            self.name(&workout.user_id),
            workout.month,
            workout.content,
        );
        whatsapp_link(self.phone(&workout.user_id), &message)
    }
}

/// `https://wa.me/<digits>?text=<message>`; the message is form-encoded
fn whatsapp_link(phone: &str, message: &str) -> Option<Url> {
    let digits = digits_only(phone);
    if digits.is_empty() {
        return None;
    }
    let mut url = Url::parse(WHATSAPP_BASE).ok()?.join(&digits).ok()?;
    url.query_pairs_mut().append_pair("text", message);
    Some(url)
}
