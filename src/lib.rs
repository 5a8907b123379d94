// Topic groups: post-hoc categorization of topic model output.
//
// This is the library root. Each module corresponds to one stage of the
// categorization pipeline.

pub mod config;
pub mod corpus;
pub mod groups;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod topics;
