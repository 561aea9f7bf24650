use std::{env, fmt};

use thiserror::Error;

use crate::API_KEY_VAR;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("The environment variable {var} is not set")]
pub struct MissingCredential {
    pub var: &'static str,
}

/// The secret token for the hosted APIs. Read once at startup, never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn from_env() -> Result<Self, MissingCredential> {
        Self::from_value(env::var(API_KEY_VAR).ok())
    }

    /// Blank values count as missing.
    pub fn from_value(value: Option<String>) -> Result<Self, MissingCredential> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(Self(v.trim().to_string())),
            _ => Err(MissingCredential { var: API_KEY_VAR }),
        }
    }

    pub(crate) fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_blank_values_are_rejected() {
        let expected = Err(MissingCredential { var: API_KEY_VAR });
        assert_eq!(Credential::from_value(None), expected);
        assert_eq!(Credential::from_value(Some("".into())), expected);
        assert_eq!(Credential::from_value(Some("  \n".into())), expected);
    }

    #[test]
    fn value_is_trimmed_and_never_printed() {
        let cred = Credential::from_value(Some(" sk-secret \n".into())).unwrap();
        assert_eq!(cred.secret(), "sk-secret");
        assert_eq!(format!("{cred:?}"), "Credential(***)");
    }
}
