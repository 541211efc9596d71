/// One `username:bcrypt-hash` line of the passwd file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswdEntry {
    username: String,
    hashed_password: String,
}

impl PasswdEntry {
    pub fn new(username: &str, hashed_password: &str) -> Self {
        Self {
            username: username.to_string(),
            hashed_password: hashed_password.to_string(),
        }
    }

    /// Parses a passwd line. Blank lines and `#` comments yield `None`.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        // bcrypt hashes never contain ':', so split on the first one only.
        let (username, hashed_password) = line.split_once(':')?;
        if username.is_empty() || hashed_password.is_empty() {
            return None;
        }
        Some(PasswdEntry::new(username, hashed_password))
    }

    pub fn get_hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }
}
