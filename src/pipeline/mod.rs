// Pipeline orchestration: wires the stages together for a full run.

pub mod categorize;
