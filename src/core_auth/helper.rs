use super::core_auth::PasswdEntry;
use super::error::AuthError;
use super::CredentialValidator;
use crate::constants::USERNAME_REGEX;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bcrypt::{hash, verify, BcryptResult, DEFAULT_COST};
use log::{debug, info, warn};
use regex::Regex;
use std::collections::HashMap;

pub fn hash_password(password: &str) -> BcryptResult<String> {
    hash(password, DEFAULT_COST)
}

pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}

/// Validates credentials against `username:bcrypt-hash` entries.
#[derive(Debug)]
pub struct PasswdValidator {
    entries: HashMap<String, PasswdEntry>,
    username_re: Regex,
}

impl PasswdValidator {
    pub fn from_entries(entries: impl IntoIterator<Item = PasswdEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.get_username().to_string(), entry))
            .collect();
        Self {
            entries,
            username_re: Regex::new(USERNAME_REGEX).expect("static regex"),
        }
    }

    pub fn parse(content: &str) -> Self {
        Self::from_entries(content.lines().filter_map(PasswdEntry::from_line))
    }

    pub async fn load(path: &str) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read passwd file: {}", path))?;
        let validator = Self::parse(&content);
        info!("Loaded {} account(s) from {}", validator.entries.len(), path);
        Ok(validator)
    }
}

#[async_trait]
impl CredentialValidator for PasswdValidator {
    async fn check_user(&self, username: &str) -> Result<(), AuthError> {
        if !self.username_re.is_match(username) {
            return Err(AuthError::InvalidUsername(username.to_string()));
        }
        if !self.entries.contains_key(username) {
            debug!("Unknown user: {}", username);
            return Err(AuthError::UnknownUser(username.to_string()));
        }
        Ok(())
    }

    async fn check_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let entry = self
            .entries
            .get(username)
            .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;
        let hashed = entry.get_hashed_password().to_string();
        let password = password.to_string();
        // bcrypt is deliberately slow; keep it off the reactor.
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hashed))
            .await
            .unwrap_or(false);
        if matches {
            Ok(())
        } else {
            warn!("Invalid password for user {}", username);
            Err(AuthError::InvalidPassword(username.to_string()))
        }
    }
}
