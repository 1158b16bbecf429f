//! Registry data model

pub mod apl;
pub mod entry;
pub mod request;
pub mod token_id;

pub use apl::Apl;
pub use entry::{Declaration, TokenEntry};
pub use request::{check_process_name, ListBounds, TokenInfoParams, TokenRequest};
pub use token_id::{
    TokenId, TokenIdEx, TokenType, DEFAULT_TOKEN_VERSION, INVALID_TOKEN_ID, TOKEN_UNIQUE_ID_MASK,
};
