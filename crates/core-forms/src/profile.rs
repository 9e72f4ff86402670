//! Profile edit form: save-button state, submit validation and the local half
//! of the username/email availability checks.

use crate::patterns;
use crate::sanitize::{CharCount, char_count, char_len, contains_dangerous_chars, sanitize_input};
use crate::upload::{PictureFile, UploadError, check_picture};
use core_config::FormsConfig;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Fields of the profile edit form as typed by the user. Empty strings stand
/// for fields left blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub county: String,
    pub town: String,
    pub area_of_stay: String,
    pub bio: String,
}

/// Form fields, used to tell the caller which input to focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Email,
    FirstName,
    LastName,
    Phone,
    County,
    Town,
    AreaOfStay,
    Bio,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Phone => "phone",
            Self::County => "county",
            Self::Town => "town",
            Self::AreaOfStay => "area_of_stay",
            Self::Bio => "bio",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown profile field {0:?}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "username" => Self::Username,
            "email" => Self::Email,
            "first_name" => Self::FirstName,
            "last_name" => Self::LastName,
            "phone" => Self::Phone,
            "county" => Self::County,
            "town" => Self::Town,
            "area_of_stay" => Self::AreaOfStay,
            "bio" => Self::Bio,
            other => return Err(UnknownField(other.to_string())),
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProfileForm {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Phone => &self.phone,
            Field::County => &self.county,
            Field::Town => &self.town,
            Field::AreaOfStay => &self.area_of_stay,
            Field::Bio => &self.bio,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Username => &mut self.username,
            Field::Email => &mut self.email,
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Phone => &mut self.phone,
            Field::County => &mut self.county,
            Field::Town => &mut self.town,
            Field::AreaOfStay => &mut self.area_of_stay,
            Field::Bio => &mut self.bio,
        };
        *slot = value.into();
    }

    /// Text, phone and textarea inputs. Email is a separate input type and is
    /// not screened for markup.
    fn free_text(&self) -> [(Field, &str); 8] {
        [
            (Field::Username, self.username.as_str()),
            (Field::FirstName, self.first_name.as_str()),
            (Field::LastName, self.last_name.as_str()),
            (Field::Phone, self.phone.as_str()),
            (Field::County, self.county.as_str()),
            (Field::Town, self.town.as_str()),
            (Field::AreaOfStay, self.area_of_stay.as_str()),
            (Field::Bio, self.bio.as_str()),
        ]
    }

    /// First free-text field holding a dangerous character.
    pub fn dangerous_field(&self) -> Option<Field> {
        self.free_text()
            .into_iter()
            .find(|(_, value)| contains_dangerous_chars(value))
            .map(|(field, _)| field)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please remove special characters (<, >, ', \", &) before submitting")]
    DangerousChars { field: Field },
    #[error("Bio must be {max} characters or less")]
    BioTooLong { max: usize },
    #[error("Invalid phone number")]
    InvalidPhone,
    #[error("Invalid location name")]
    InvalidLocation { field: Field },
    #[error("Invalid area name")]
    InvalidArea,
    #[error("Invalid username format")]
    InvalidUsername,
}

impl FormError {
    /// Input that should receive focus.
    pub fn field(&self) -> Field {
        match self {
            Self::DangerousChars { field } | Self::InvalidLocation { field } => *field,
            Self::BioTooLong { .. } => Field::Bio,
            Self::InvalidPhone => Field::Phone,
            Self::InvalidArea => Field::AreaOfStay,
            Self::InvalidUsername => Field::Username,
        }
    }
}

/// Profile accepted for submission, free-text fields HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedProfile(pub ProfileForm);

impl SanitizedProfile {
    pub fn into_inner(self) -> ProfileForm {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveBlocked {
    DangerousChars,
    BioTooLong { max: usize },
}

impl fmt::Display for SaveBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DangerousChars => f.write_str(
                "Cannot save: form contains special characters that need to be removed",
            ),
            Self::BioTooLong { max } => {
                write!(f, "Bio exceeds maximum length of {max} characters")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveButtonState {
    Enabled,
    Disabled(SaveBlocked),
}

impl SaveButtonState {
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Outcome of the local username/email check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    /// Unchanged or empty: hide any error.
    Clear,
    /// Rejected locally with this message.
    Invalid(&'static str),
    /// Well formed; availability must be asked of the server.
    NeedsRemoteCheck(String),
}

pub fn check_username(current: &str, candidate: &str) -> FieldCheck {
    if candidate == current || candidate.is_empty() {
        return FieldCheck::Clear;
    }
    if !patterns::USERNAME.is_match(candidate) {
        return FieldCheck::Invalid("Invalid characters in username");
    }
    FieldCheck::NeedsRemoteCheck(candidate.to_string())
}

pub fn check_email(current: &str, candidate: &str) -> FieldCheck {
    if candidate == current || candidate.is_empty() {
        return FieldCheck::Clear;
    }
    if !patterns::EMAIL.is_match(candidate) {
        return FieldCheck::Invalid("Invalid email format");
    }
    FieldCheck::NeedsRemoteCheck(candidate.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormGuard {
    bio_max: usize,
    picture_max: u64,
}

impl Default for FormGuard {
    fn default() -> Self {
        Self::from_config(&FormsConfig::default())
    }
}

impl FormGuard {
    pub fn from_config(cfg: &FormsConfig) -> Self {
        Self {
            bio_max: cfg.bio_max,
            picture_max: cfg.picture_max_bytes,
        }
    }

    pub fn bio_max(&self) -> usize {
        self.bio_max
    }

    pub fn check_picture(&self, file: &PictureFile) -> Result<(), UploadError> {
        check_picture(file, self.picture_max)
    }

    pub fn bio_count(&self, bio: &str) -> CharCount {
        char_count(bio, self.bio_max)
    }

    pub fn save_button_state(&self, form: &ProfileForm) -> SaveButtonState {
        if form.dangerous_field().is_some() {
            SaveButtonState::Disabled(SaveBlocked::DangerousChars)
        } else if self.bio_count(&form.bio).is_over() {
            SaveButtonState::Disabled(SaveBlocked::BioTooLong { max: self.bio_max })
        } else {
            SaveButtonState::Enabled
        }
    }

    /// Submit-time validation. Checks run in a fixed order and the first
    /// failure is returned.
    pub fn validate(&self, form: &ProfileForm) -> Result<SanitizedProfile, FormError> {
        if let Some(field) = form.dangerous_field() {
            return Err(self.reject(FormError::DangerousChars { field }));
        }
        if char_len(&form.bio) > self.bio_max {
            return Err(self.reject(FormError::BioTooLong { max: self.bio_max }));
        }

        let clean = ProfileForm {
            username: sanitize_input(&form.username).into_owned(),
            email: form.email.clone(),
            first_name: sanitize_input(&form.first_name).into_owned(),
            last_name: sanitize_input(&form.last_name).into_owned(),
            phone: sanitize_input(&form.phone).into_owned(),
            county: sanitize_input(&form.county).into_owned(),
            town: sanitize_input(&form.town).into_owned(),
            area_of_stay: sanitize_input(&form.area_of_stay).into_owned(),
            bio: sanitize_input(&form.bio).into_owned(),
        };

        if !clean.phone.is_empty() && !patterns::is_phone(&clean.phone) {
            return Err(self.reject(FormError::InvalidPhone));
        }
        for (field, value) in [(Field::County, &clean.county), (Field::Town, &clean.town)] {
            if !value.is_empty() && !patterns::LOCATION.is_match(value) {
                return Err(self.reject(FormError::InvalidLocation { field }));
            }
        }
        if !clean.area_of_stay.is_empty() && !patterns::AREA.is_match(&clean.area_of_stay) {
            return Err(self.reject(FormError::InvalidArea));
        }
        if !clean.username.is_empty() && !patterns::USERNAME.is_match(&clean.username) {
            return Err(self.reject(FormError::InvalidUsername));
        }

        debug!(target: "forms", "profile_accepted");
        Ok(SanitizedProfile(clean))
    }

    fn reject(&self, err: FormError) -> FormError {
        debug!(target: "forms", field = %err.field(), error = %err, "profile_rejected");
        err
    }
}
