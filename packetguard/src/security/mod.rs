pub mod rate_limit;
pub mod sequence;
pub mod state;
pub mod token;

pub use rate_limit::RateLimiter;
pub use sequence::SequenceTracker;
pub use state::{classify_first_word, ConnectionEvent, ConnectionState, ConnectionStateMachine};
pub use token::TokenTracker;
