use std::fmt;

use chrono::NaiveDate;

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::{EmailAddress, PersonName, PhoneNumber};
use crate::model::{Member, MemberChanges, NewMember, NewSubscription, NewWorkout};

use super::parse_date;

const MIN_PLAN_NAME_LEN: usize = 2;
const MIN_WORKOUT_CONTENT_LEN: usize = 10;
const MIN_PASSWORD_LEN: usize = 6;

/// One rejected form field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in a submitted form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    fn push(&mut self, field: &'static str, message: impl ToString) {
        self.0.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    /// First message reported for `field`
    pub fn field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}

fn char_len(value: &str) -> usize {
    value.trim().graphemes(true).count()
}

/// Member create/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub whatsapp_opt_in: bool,
}

impl MemberForm {
    /// Pre-fill the form for editing an existing member
    pub fn from_member(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            phone: member.phone.clone(),
            email: member.email.clone().unwrap_or_default(),
            whatsapp_opt_in: member.whatsapp_opt_in,
        }
    }

    /// Validate for creation
    pub fn validate(&self) -> Result<NewMember, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self
            .name
            .parse::<PersonName>()
            .map_err(|e| errors.push("name", e))
            .ok();
        let phone = self
            .phone
            .parse::<PhoneNumber>()
            .map_err(|e| errors.push("phone", e))
            .ok();
        let email = if self.email.trim().is_empty() {
            None
        } else {
            self.email
                .parse::<EmailAddress>()
                .map_err(|e| errors.push("email", e))
                .ok()
        };

        errors.finish(|| NewMember {
            name: name.map(String::from).unwrap_or_default(),
            phone: phone.map(String::from).unwrap_or_default(),
            email: email.map(String::from),
            whatsapp_opt_in: self.whatsapp_opt_in,
        })
    }

    /// Validate for editing: every field is sent, a blank email clears it
    pub fn changes(&self) -> Result<MemberChanges, FormErrors> {
        let new_member = self.validate()?;
        Ok(MemberChanges {
            name: Some(new_member.name),
            phone: Some(new_member.phone),
            email: Some(new_member.email),
            whatsapp_opt_in: Some(new_member.whatsapp_opt_in),
        })
    }
}

/// Subscription form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionForm {
    pub user_id: String,
    pub plan_name: String,
    pub start_date: String,
    pub end_date: String,
    pub auto_renew: bool,
}

impl SubscriptionForm {
    /// Empty form with the first listed member preselected
    pub fn for_members(members: &[Member]) -> Self {
        Self {
            user_id: members.first().map(|m| m.id.clone()).unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<NewSubscription, FormErrors> {
        let mut errors = FormErrors::default();

        if self.user_id.trim().is_empty() {
            errors.push("userId", "Member is required");
        }
        match char_len(&self.plan_name) {
            0 => errors.push("planName", "Plan is required"),
            n if n < MIN_PLAN_NAME_LEN => errors.push(
                "planName",
                format!("Plan must be at least {} characters", MIN_PLAN_NAME_LEN),
            ),
            _ => {}
        }
        let start = required_date(&mut errors, "startDate", "Start date", &self.start_date);
        let end = required_date(&mut errors, "endDate", "End date", &self.end_date);
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                errors.push("endDate", "End date must be on or after start date");
            }
        }

        errors.finish(|| NewSubscription {
            user_id: self.user_id.trim().to_string(),
            plan_name: self.plan_name.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
            auto_renew: self.auto_renew,
        })
    }
}

fn required_date(
    errors: &mut FormErrors,
    field: &'static str,
    label: &str,
    value: &str,
) -> Option<NaiveDate> {
    if value.trim().is_empty() {
        errors.push(field, format!("{} is required", label));
        return None;
    }
    let date = parse_date(value);
    if date.is_none() {
        errors.push(field, format!("{} is not a valid date", label));
    }
    date
}

/// Monthly workout form, for the member currently selected in the view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutForm {
    pub month: String,
    pub content: String,
}

impl WorkoutForm {
    /// Returns the member id the plan is for along with the plan itself
    pub fn validate(&self, selected_member: Option<&str>) -> Result<(String, NewWorkout), FormErrors> {
        let mut errors = FormErrors::default();

        let member = selected_member.filter(|id| !id.trim().is_empty());
        if member.is_none() {
            errors.push("userId", "Select a member first");
        }
        if self.month.trim().is_empty() {
            errors.push("month", "Month is required");
        }
        match char_len(&self.content) {
            0 => errors.push("content", "Workout plan is required"),
            n if n < MIN_WORKOUT_CONTENT_LEN => errors.push(
                "content",
                format!(
                    "Workout plan must be at least {} characters",
                    MIN_WORKOUT_CONTENT_LEN
                ),
            ),
            _ => {}
        }

        errors.finish(|| {
            (
                member.unwrap_or_default().to_string(),
                NewWorkout {
                    month: self.month.trim().to_string(),
                    content: self.content.clone(),
                    pdf_url: None,
                },
            )
        })
    }
}

/// Login form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(EmailAddress, String), FormErrors> {
        let mut errors = FormErrors::default();

        let email = self
            .email
            .parse::<EmailAddress>()
            .map_err(|e| errors.push("email", e))
            .ok();
        match self.password.chars().count() {
            0 => errors.push("password", "Password is required"),
            n if n < MIN_PASSWORD_LEN => errors.push(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            ),
            _ => {}
        }

        match email {
            Some(email) if errors.is_empty() => Ok((email, self.password.clone())),
            _ => Err(errors),
        }
    }
}
