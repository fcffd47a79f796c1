mod resolver;
mod traits;

pub use resolver::{CredentialKind, CredentialResolver};
pub use traits::CredentialProvider;
