//! Input validation for API requests.
//!
//! For collecting multiple validation errors and returning them as an
//! ApiError, use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

use crate::db::RoomType;

lazy_static! {
    /// Room numbers: alphanumeric, 1-10 chars (e.g. "101", "2B")
    static ref ROOM_NUMBER_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{1,10}$").unwrap();

    /// Minimal email shape check; deliverability is not our problem
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn validate_room_number(number: &str) -> Result<(), String> {
    if number.is_empty() {
        return Err("Room number is required".to_string());
    }
    if !ROOM_NUMBER_REGEX.is_match(number) {
        return Err("Room number must be 1-10 alphanumeric characters".to_string());
    }
    Ok(())
}

pub fn validate_room_type(room_type: &str) -> Result<(), String> {
    if RoomType::parse(room_type).is_none() {
        return Err(
            "Room type must be one of: single, double, suite, family, matrimonial".to_string(),
        );
    }
    Ok(())
}

pub fn validate_price(price: f64, field: &str) -> Result<(), String> {
    if !price.is_finite() || price <= 0.0 {
        return Err(format!("{field} must be a positive number"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 100 || !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}

pub fn validate_name(name: &str, field: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    if name.len() > 100 {
        return Err(format!("{field} is too long (max 100 characters)"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    Ok(())
}
