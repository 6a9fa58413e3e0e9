//! Season aggregation: fatigue between races and the points table

pub mod condition;
pub mod scoring;

pub use condition::{apply_finish_penalty, apply_recovery, finish_penalty, recovery_amount};
pub use scoring::{
    calculate_grand_final_results, incomplete_rounds, round_points, GrandFinalResult, RoundPoints,
    RoundResult,
};
