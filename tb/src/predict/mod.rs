//! Prediction client
//!
//! Typed wrappers around the LLM-backed operations. Each wrapper renders its
//! instruction template, forces a `submit_<operation>` tool whose schema is the
//! output shape, and validates the reply before returning it.

mod error;
mod ops;
mod predictor;

pub use error::PredictionError;
pub use ops::{
    CategorizeInput, CategorizeOutput, CategorizeTask, ClassifyInput, ClassifyOutput, ClassifyTaskType,
    DecomposeInput, DecomposeLargeTask, DecomposeOutput, EstimateInput, EstimateOutput, EstimateTaskDuration,
    GroupInput, GroupOutput, GroupSimilarTasks, GroupTaskInput, ParseInput, ParseMultipleTasks, ParseOutput,
    PersonalizeInput, PersonalizeOutput, PersonalizeTaskPredictions, Prediction,
};
pub use predictor::Predictor;
