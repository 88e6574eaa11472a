// Tue Mar 10 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("invalid type name `{0}`")]
    InvalidName(String),
    #[error("`{0}` cannot be registered as a named type")]
    Unregisterable(String),
}
