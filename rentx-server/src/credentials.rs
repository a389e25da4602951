//! Come la password viene trasformata prima di essere salvata e confrontata.
//! Lo store confronta sempre per uguaglianza esatta: lo schema decide cosa c'è da confrontare.

use sha2::{Digest, Sha256};
use std::str::FromStr;
use std::sync::Arc;

pub trait CredentialScheme: Send + Sync {
    fn name(&self) -> &'static str;

    /// Forma salvata nella colonna `users.password`.
    fn encode(&self, password: &str) -> String;
}

/// Password salvata così com'è. Compatibile con i database creati senza hashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl CredentialScheme for PlainText {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn encode(&self, password: &str) -> String {
        password.to_string()
    }
}

/// Hash SHA-256 in esadecimale minuscolo.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hex;

impl CredentialScheme for Sha256Hex {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn encode(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Valore di PASSWORD_SCHEME.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemeKind {
    Plain,
    #[default]
    Sha256,
}

impl SchemeKind {
    pub fn build(self) -> Arc<dyn CredentialScheme> {
        match self {
            SchemeKind::Plain => Arc::new(PlainText),
            SchemeKind::Sha256 => Arc::new(Sha256Hex),
        }
    }
}

impl FromStr for SchemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(SchemeKind::Plain),
            "sha256" => Ok(SchemeKind::Sha256),
            other => Err(format!("unknown password scheme {:?} (expected \"plain\" or \"sha256\")", other)),
        }
    }
}
