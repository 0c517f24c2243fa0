//! Bearer-token authentication middleware.

pub mod extractor;
pub mod jwt;
pub mod layer;
pub mod password;
pub mod types;

pub use extractor::{Auth, MaybeAuth};
pub use jwt::{decode_token, encode_token};
pub use layer::{AuthLayer, AuthMiddleware};
pub use password::{hash_password, verify_password};
pub use types::{AuthUser, Claims, TokenType};
