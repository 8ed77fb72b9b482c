#![forbid(unsafe_code)]

//! Domain core for the vocabulary drill: word records and their merge
//! policy, mastery transition functions, the proficiency-weighted draw, and
//! the aggregate statistics types.

pub mod model;
pub mod proficiency;
pub mod scheduler;
pub mod time;

pub use time::Clock;
