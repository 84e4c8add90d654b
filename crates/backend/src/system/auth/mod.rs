pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod verifier;

pub use gate::AccessGate;
pub use verifier::AuthError;
