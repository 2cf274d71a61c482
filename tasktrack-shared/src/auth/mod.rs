/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer-token extraction and the per-request auth context
///
/// # Security Properties
///
/// - **Password Hashing**: Argon2id, 64 MB memory, 3 iterations, random salt
/// - **JWT Tokens**: HS256 signing, issuer and expiry validated, 24h lifetime
/// - **Fail Closed**: any token failure terminates the request with 401;
///   there is no anonymous fallthrough on protected routes

pub mod jwt;
pub mod middleware;
pub mod password;
