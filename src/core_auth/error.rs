use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Invalid password for user {0}")]
    InvalidPassword(String),

    #[error("No username given before password")]
    NoUsername,
}

impl AuthError {
    pub fn to_ftp_response(&self) -> String {
        match self {
            AuthError::InvalidUsername(name) | AuthError::UnknownUser(name) => {
                format!("530 Invalid username: {}\r\n", name)
            }
            AuthError::InvalidPassword(_) | AuthError::NoUsername => {
                "530 Invalid password\r\n".to_string()
            }
        }
    }
}
