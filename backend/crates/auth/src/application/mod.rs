//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod change_password;
pub mod config;
pub mod context;
pub mod credential_verifier;
pub mod refresh;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod token_issuer;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use change_password::{ChangePasswordInput, ChangePasswordOutput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use context::AuthContext;
pub use credential_verifier::CredentialVerifier;
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token_issuer::{TokenIssuer, TokenKind, VerifiedToken};
