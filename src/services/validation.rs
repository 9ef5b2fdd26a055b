//! Field rules for user records and the partial-update merge.
//!
//! Everything here is pure: the current date is passed in explicitly by
//! [`UserValidator::validate_on`], and [`UserValidator::validate`] reads the
//! local calendar date once per call.

use std::sync::LazyLock;

use jiff::civil::Date;
use jiff::{ToSpan, Zoned};
use regex::Regex;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User, UserDraft};

/// Dot-separated `[A-Za-z0-9_-]` groups, `@`, dot-separated
/// `[A-Za-z0-9-]` labels, then an alphabetic top-level label of 2+ letters.
const EMAIL_PATTERN: &str =
    r"^[_A-Za-z0-9-]+(\.[_A-Za-z0-9-]+)*@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*(\.[A-Za-z]{2,})$";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

pub const EMAIL_REQUIRED: &str = "'email' is a required field.";
pub const EMAIL_INVALID: &str = "Invalid email.";
pub const FIRSTNAME_REQUIRED: &str = "'firstname' is a required field.";
pub const LASTNAME_REQUIRED: &str = "'lastname' is a required field.";
pub const BIRTHDATE_REQUIRED: &str = "'birthdate' is a required field.";

pub fn is_email_valid(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// True when `birthdate` lies strictly before `today` minus `allowed_age` years.
///
/// Year subtraction clamps Feb 29 to Feb 28 in non-leap years. A bound that
/// falls outside the supported calendar range rejects the date.
pub fn is_birthdate_valid(birthdate: Date, allowed_age: u32, today: Date) -> bool {
    today
        .checked_sub(i64::from(allowed_age).years())
        .map(|latest| birthdate < latest)
        .unwrap_or(false)
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Checks user drafts against the required-field, email and age rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserValidator {
    allowed_age: u32,
}

impl UserValidator {
    pub fn new(allowed_age: u32) -> Self {
        Self { allowed_age }
    }

    pub fn allowed_age(&self) -> u32 {
        self.allowed_age
    }

    pub fn birthdate_message(&self) -> String {
        format!(
            "Invalid birthdate. Value must be earlier than current date and the user must be at least {} years old.",
            self.allowed_age
        )
    }

    /// Validates against today's local date.
    pub fn validate(&self, draft: &UserDraft) -> Vec<String> {
        self.validate_on(draft, Zoned::now().date())
    }

    /// Collects every violation in fixed order: email, firstname, lastname,
    /// birthdate. An empty list means the draft is valid.
    pub fn validate_on(&self, draft: &UserDraft, today: Date) -> Vec<String> {
        let mut messages = Vec::new();

        match draft.email.as_deref() {
            email if is_blank(email) => messages.push(EMAIL_REQUIRED.to_string()),
            Some(email) if !is_email_valid(email) => messages.push(EMAIL_INVALID.to_string()),
            _ => {}
        }

        if is_blank(draft.firstname.as_deref()) {
            messages.push(FIRSTNAME_REQUIRED.to_string());
        }

        if is_blank(draft.lastname.as_deref()) {
            messages.push(LASTNAME_REQUIRED.to_string());
        }

        match draft.birthdate {
            None => messages.push(BIRTHDATE_REQUIRED.to_string()),
            Some(birthdate) if !is_birthdate_valid(birthdate, self.allowed_age, today) => {
                messages.push(self.birthdate_message())
            }
            Some(_) => {}
        }

        messages
    }

    /// Validates and, on success, turns the draft into a writable record.
    pub fn check(&self, draft: UserDraft) -> AppResult<NewUser> {
        self.check_on(draft, Zoned::now().date())
    }

    pub fn check_on(&self, draft: UserDraft, today: Date) -> AppResult<NewUser> {
        let messages = self.validate_on(&draft, today);
        if !messages.is_empty() {
            return Err(AppError::InvalidArgument { messages });
        }

        let UserDraft {
            email: Some(email),
            firstname: Some(firstname),
            lastname: Some(lastname),
            birthdate: Some(birthdate),
            address,
            phone_number,
        } = draft
        else {
            return Err(AppError::Internal {
                source: anyhow::anyhow!("validated draft is missing a required field"),
            });
        };

        Ok(NewUser {
            email,
            firstname,
            lastname,
            birthdate,
            address,
            phone_number,
        })
    }
}

/// Overlays the present fields of `patch` onto `existing`.
///
/// Absent (`None`) patch fields keep the stored value. The id is never part
/// of a patch; the caller keeps using the existing record's id.
pub fn merge(existing: &User, patch: UserDraft) -> UserDraft {
    UserDraft {
        email: patch.email.or_else(|| Some(existing.email.clone())),
        firstname: patch.firstname.or_else(|| Some(existing.firstname.clone())),
        lastname: patch.lastname.or_else(|| Some(existing.lastname.clone())),
        birthdate: patch.birthdate.or(Some(existing.birthdate)),
        address: patch.address.or_else(|| existing.address.clone()),
        phone_number: patch.phone_number.or_else(|| existing.phone_number.clone()),
    }
}
