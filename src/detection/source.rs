use std::future::Future;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::ExpressionScores;

use super::Frame;

/// One face found by the inference engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FaceDetection {
    pub expression_scores: ExpressionScores,
}

impl FaceDetection {
    pub fn new(expression_scores: ExpressionScores) -> Self {
        Self { expression_scores }
    }
}

/// Facial-expression inference. Implementations wrap the model runtime; an
/// error or a panic from `detect` is reported as a technical error.
pub trait ExpressionSource: Send + Sync {
    fn detect(&self, frame: &Frame) -> impl Future<Output = Result<Vec<FaceDetection>>> + Send;
}

/// Supplies the current camera frame on demand.
pub trait FrameSource: Send + Sync {
    fn capture(&self) -> impl Future<Output = Result<Frame>> + Send;
}
