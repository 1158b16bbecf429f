//! Native token registry
//!
//! Hands out one persistent security token per native process name. The
//! first request for a name draws a random unique id, records the process'
//! declaration and appends it to the token file. Later requests return the
//! same token and rewrite the record only if the declaration changed.
//!
//! ```text
//! TokenRegistry ──► TokenIdGenerator ──► RandomEffects
//!       │
//!       ├──► TokenList (in memory, lazily loaded)
//!       │
//!       └──► TokenFileCodec ──► TokenStoreEffects
//! ```

pub mod codec;
pub mod id_generator;
pub mod service;
pub mod token_list;

pub use codec::TokenFileCodec;
pub use id_generator::{generate_unique_token_id, TokenIdGenerator};
pub use service::TokenRegistry;
pub use token_list::TokenList;
