pub mod password;
pub mod validation;

pub use password::{hash_password, verify_password, Password, PasswordHashString};
pub use validation::{not_blank, ValidatedJson};
