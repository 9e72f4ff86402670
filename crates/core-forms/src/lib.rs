//! Profile form guard: HTML escaping, dangerous-character screening, the bio
//! character counter, submit validation, picture pre-checks, the edit modals
//! and the matching server-side field cleaners.

pub mod clean;
pub mod modal;
mod patterns;
pub mod profile;
pub mod sanitize;
pub mod upload;

pub use modal::{ErrorSlot, ModalSnapshot, ModalState};
pub use profile::{
    Field, FieldCheck, FormError, FormGuard, ProfileForm, SanitizedProfile, SaveBlocked,
    SaveButtonState, UnknownField, check_email, check_username,
};
pub use sanitize::{CharCount, char_count, contains_dangerous_chars, sanitize_input};
pub use upload::{PICTURE_TYPES, PictureFile, UploadError, check_picture};
