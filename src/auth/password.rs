use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::{rngs::OsRng, Rng};
use regex::Regex;
use serde::Serialize;

pub const MIN_PASSWORD_LEN: usize = 6;
const STRONG_PASSWORD_LEN: usize = 8;
const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";
const SUGGESTION_LEN: usize = 12;
const SUGGESTION_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("hash password: {}", e))
}

/// `Ok(false)` for a wrong password; `Err` only when the stored hash
/// cannot be read.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("stored hash unreadable: {}", e))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("verify password: {}", e)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Weak,
    Fair,
    Good,
    Strong,
}

#[derive(Debug, Serialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub level: StrengthLevel,
    pub missing: Vec<&'static str>,
}

/// One point per satisfied rule: length, upper, lower, digit, special.
pub fn password_strength(password: &str) -> PasswordStrength {
    let rules: [(bool, &'static str); 5] = [
        (password.chars().count() >= STRONG_PASSWORD_LEN, "at least 8 characters"),
        (password.chars().any(char::is_uppercase), "an uppercase letter"),
        (password.chars().any(char::is_lowercase), "a lowercase letter"),
        (password.chars().any(|c| c.is_ascii_digit()), "a digit"),
        (password.chars().any(|c| SPECIAL_CHARS.contains(c)), "a special character (!@#$ etc.)"),
    ];

    let score = rules.iter().filter(|(ok, _)| *ok).count() as u8;
    let missing = rules
        .iter()
        .filter(|(ok, _)| !*ok)
        .map(|(_, hint)| *hint)
        .collect();
    let level = match score {
        0..=2 => StrengthLevel::Weak,
        3 => StrengthLevel::Fair,
        4 => StrengthLevel::Good,
        _ => StrengthLevel::Strong,
    };
    PasswordStrength { score, level, missing }
}

pub fn suggest_password() -> String {
    let mut rng = rand::thread_rng();
    (0..SUGGESTION_LEN)
        .map(|_| SUGGESTION_ALPHABET[rng.gen_range(0..SUGGESTION_ALPHABET.len())] as char)
        .collect()
}
