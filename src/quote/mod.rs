//! Quote pipeline: intake normalization through financial evaluation.

pub mod finance;
pub mod normalize;
/// End-to-end engine tying the stages together.
pub mod pipeline;
pub mod pricing;
pub mod sizing;
/// Intake question templates and the confidence score.
pub mod template;
pub mod types;

pub use pipeline::{QuoteEngine, QuoteResult};
pub use template::{IndustryTemplate, template_for};
pub use types::{
    AnswerValue, BillOfMaterials, CalculationInput, FinancialResult, LoadProfile, PrimaryGoal,
    SizingRecommendation,
};
