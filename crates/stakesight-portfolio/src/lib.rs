pub mod analyzer;
pub mod error;
pub mod prediction;
pub mod recommendation;
pub mod risk;
pub mod scoring;

pub use analyzer::{AnalysisResult, analyze};
pub use error::AnalysisError;
pub use prediction::{
    Confidence, Prediction, RewardProjection, StakeSizeAdvice, TimingAdvice, TimingPattern,
};
pub use recommendation::{Priority, Recommendation, RecommendationCategory, recommendations};
pub use risk::{RiskComponent, RiskLevel, RiskReport, assess_risk};
pub use scoring::{
    CapitalEfficiency, CategoryScores, EfficiencyRating, ExpandedScore, compute_score,
};
