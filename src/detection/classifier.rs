use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::{Deserialize, Serialize};

use crate::models::{ErrorKind, ExpressionScores, Mood};

use super::{ExpressionSource, Frame, LightingGate};

/// A usable single-frame classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SampleReading {
    pub mood: Mood,
    pub raw_expression: String,
    pub confidence: f64,
    pub all_expressions: ExpressionScores,
}

/// Why a sample or a whole run produced no mood.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionFailure {
    pub error_kind: ErrorKind,
    pub message: String,
}

impl DetectionFailure {
    pub fn new(error_kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error_kind,
            message: message.into(),
        }
    }

    /// Failure for one sample, with the per-frame guidance text.
    pub fn for_sample(error_kind: ErrorKind) -> Self {
        let message = match error_kind {
            ErrorKind::Lighting => "It's too dark. Please find better lighting for accurate detection.",
            ErrorKind::NoFace => {
                "No face detected. Please make sure your face is visible in the camera."
            }
            ErrorKind::Confidence => {
                "Couldn't clearly detect your expression. Please try with better lighting or a clearer expression."
            }
            ErrorKind::Technical => "An error occurred during mood detection.",
        };
        Self::new(error_kind, message)
    }
}

impl fmt::Display for DetectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_kind, self.message)
    }
}

impl std::error::Error for DetectionFailure {}

pub type SampleResult = Result<SampleReading, DetectionFailure>;

/// Turns one frame into a mood reading.
#[derive(Debug, Clone, Copy)]
pub struct SampleClassifier {
    gate: LightingGate,
    min_confidence: f64,
}

impl SampleClassifier {
    pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.4;

    pub fn new(gate: LightingGate, min_confidence: f64) -> Self {
        Self {
            gate,
            min_confidence,
        }
    }

    pub async fn classify<E: ExpressionSource>(&self, source: &E, frame: &Frame) -> SampleResult {
        if !self.gate.passes(frame) {
            return Err(DetectionFailure::for_sample(ErrorKind::Lighting));
        }

        let detections = match AssertUnwindSafe(source.detect(frame)).catch_unwind().await {
            Ok(Ok(detections)) => detections,
            Ok(Err(err)) => {
                log::error!("expression inference failed: {err:?}");
                return Err(DetectionFailure::for_sample(ErrorKind::Technical));
            }
            Err(_) => {
                log::error!("expression inference panicked");
                return Err(DetectionFailure::for_sample(ErrorKind::Technical));
            }
        };

        let Some(face) = detections.into_iter().next() else {
            return Err(DetectionFailure::for_sample(ErrorKind::NoFace));
        };

        self.classify_scores(face.expression_scores)
    }

    /// Classification of one face's scores, after the lighting gate and face
    /// check have passed.
    pub fn classify_scores(&self, scores: ExpressionScores) -> SampleResult {
        let (expression, confidence) = match scores.strongest() {
            Some((label, score)) => (label.to_string(), score),
            None => return Err(DetectionFailure::for_sample(ErrorKind::Confidence)),
        };

        if confidence < self.min_confidence {
            return Err(DetectionFailure::for_sample(ErrorKind::Confidence));
        }

        log::debug!("detected expression {expression} with score {confidence:.3}");

        Ok(SampleReading {
            mood: Mood::from_expression(&expression),
            raw_expression: expression,
            confidence,
            all_expressions: scores,
        })
    }
}

impl Default for SampleClassifier {
    fn default() -> Self {
        Self::new(LightingGate::default(), Self::DEFAULT_MIN_CONFIDENCE)
    }
}
