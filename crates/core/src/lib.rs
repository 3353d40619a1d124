#![forbid(unsafe_code)]

pub mod engine;
pub mod model;
pub mod random;
pub mod selector;
pub mod time;
pub mod transform;
pub mod validator;

pub use engine::{
    NewSession, SessionError, SessionStart, ShortSession, SubmittedAnswer, create_session,
    display_of, record_answer, result_of, submit_answer,
};
pub use random::{EntropyError, RandomSource, RngSource, SequenceSource};
pub use time::Clock;
