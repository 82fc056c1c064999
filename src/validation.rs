// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side form validation.
//!
//! Rules run in a fixed order and stop at the first failure, so the user
//! always sees one message for the first problem in the form.

use regex::Regex;
use std::sync::OnceLock;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

pub const MSG_EMAIL_REQUIRED: &str = "Please enter your email.";
pub const MSG_PASSWORD_REQUIRED: &str = "Please enter your password.";
pub const MSG_NAME_REQUIRED: &str = "Please enter your name.";
pub const MSG_PHONE_REQUIRED: &str = "Please enter your phone number.";
pub const MSG_ADDRESS_REQUIRED: &str = "Please enter your address.";
pub const MSG_EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long.";
pub const MSG_PASSWORDS_DIFFER: &str = "Passwords do not match";

/// Sign-in form input.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Email, then password, must be non-blank.
    pub fn validate(&self) -> Result<(), &'static str> {
        if is_blank(&self.email) {
            return Err(MSG_EMAIL_REQUIRED);
        }
        if is_blank(&self.password) {
            return Err(MSG_PASSWORD_REQUIRED);
        }
        Ok(())
    }
}

/// Sign-up form input.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), &'static str> {
        if is_blank(&self.name) {
            return Err(MSG_NAME_REQUIRED);
        }
        if is_blank(&self.phone_number) {
            return Err(MSG_PHONE_REQUIRED);
        }
        if is_blank(&self.address) {
            return Err(MSG_ADDRESS_REQUIRED);
        }
        if is_blank(&self.email) {
            return Err(MSG_EMAIL_REQUIRED);
        }
        if !is_email(self.email.trim()) {
            return Err(MSG_EMAIL_INVALID);
        }
        if is_blank(&self.password) {
            return Err(MSG_PASSWORD_REQUIRED);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(MSG_PASSWORD_TOO_SHORT);
        }
        if self.password != self.confirm_password {
            return Err(MSG_PASSWORDS_DIFFER);
        }
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Loose email shape check: something@something.something, no whitespace.
pub fn is_email(value: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });
    regex.is_match(value)
}
