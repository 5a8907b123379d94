// Topic model access: loading a persisted model and querying which topic
// each document belongs to.

pub mod artifact;
pub mod assign;
pub mod traits;
