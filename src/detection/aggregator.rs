use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::{Deserialize, Serialize};

use crate::models::{ErrorCounts, ErrorKind, ExpressionScores, Mood, MoodCounts};
use crate::{log_debug, log_info, log_warn};

use super::{
    DetectionConfig, DetectionFailure, ExpressionSource, FrameSource, LightingGate,
    SampleClassifier,
};

const ENABLE_LOGS: bool = true;

/// Combined decision over several samples.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReading {
    pub mood: Mood,
    /// Share of all samples that voted for `mood`.
    pub confidence: f64,
    /// Strongest averaged expression that maps to `mood`, or the mood label.
    pub raw_expression: String,
    /// Summed scores of successful samples divided by the total sample count.
    pub all_expressions: ExpressionScores,
    pub sample_count: u32,
    pub mood_counts: MoodCounts,
    pub error_counts: ErrorCounts,
}

pub type AggregateResult = Result<AggregateReading, DetectionFailure>;

impl DetectionFailure {
    /// Failure for a run where no sample succeeded.
    pub fn for_run(error_kind: ErrorKind) -> Self {
        let message = match error_kind {
            ErrorKind::Lighting => "The lighting is too dark. Please move to a brighter area.",
            ErrorKind::NoFace => {
                "No face detected. Please make sure your face is visible in the camera."
            }
            _ => "Couldn't detect facial expressions clearly. Please try again.",
        };
        Self::new(error_kind, message)
    }
}

/// Tallies for one run, fed one sample at a time.
#[derive(Debug, Clone, Default)]
pub struct SampleTally {
    samples: u32,
    moods: MoodCounts,
    errors: ErrorCounts,
    expression_sums: ExpressionScores,
}

impl SampleTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sample: &super::SampleResult) {
        self.samples += 1;
        match sample {
            Ok(reading) => {
                self.moods.record(reading.mood);
                self.expression_sums.accumulate(&reading.all_expressions);
            }
            Err(failure) => self.errors.record(failure.error_kind),
        }
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Final decision. Mood ties resolve happy, sad, neutral; error ties resolve
    /// lighting, noface, confidence, technical.
    pub fn finish(self) -> AggregateResult {
        let Some((mood, votes)) = self.moods.leader() else {
            let kind = self
                .errors
                .leader()
                .map(|(kind, _)| kind)
                .unwrap_or(ErrorKind::Technical);
            return Err(DetectionFailure::for_run(kind));
        };

        let divisor = f64::from(self.samples.max(1));
        let averaged = self.expression_sums.divided_by(divisor);
        let raw_expression = averaged
            .strongest_for(mood)
            .map(|(label, _)| label.to_string())
            .unwrap_or_else(|| mood.as_str().to_string());

        Ok(AggregateReading {
            mood,
            confidence: f64::from(votes) / divisor,
            raw_expression,
            all_expressions: averaged,
            sample_count: self.samples,
            mood_counts: self.moods,
            error_counts: self.errors,
        })
    }
}

/// Samples the camera several times and votes on a mood.
#[derive(Debug, Clone)]
pub struct MoodAggregator {
    classifier: SampleClassifier,
    config: DetectionConfig,
}

impl MoodAggregator {
    pub fn new(config: DetectionConfig) -> Self {
        let classifier = SampleClassifier::new(
            LightingGate::new(config.lighting_threshold),
            config.min_confidence,
        );
        Self { classifier, config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Runs every configured sample to completion. A failed sample, including a
    /// frame that could not be captured, only counts against the tally.
    pub async fn detect<F, E>(&self, frames: &F, expressions: &E) -> AggregateResult
    where
        F: FrameSource,
        E: ExpressionSource,
    {
        let mut sample_count = self.config.sample_count;
        if sample_count == 0 {
            log_warn!("sample count of 0 requested; taking a single sample");
            sample_count = 1;
        }

        let mut tally = SampleTally::new();
        for index in 0..sample_count {
            if index > 0 {
                tokio::time::sleep(self.config.sample_delay()).await;
            }

            let sample = match AssertUnwindSafe(frames.capture()).catch_unwind().await {
                Ok(Ok(frame)) => self.classifier.classify(expressions, &frame).await,
                Ok(Err(err)) => {
                    log_warn!("frame capture failed on sample {}: {err:?}", index + 1);
                    Err(DetectionFailure::for_sample(ErrorKind::Technical))
                }
                Err(_) => {
                    log_warn!("frame capture panicked on sample {}", index + 1);
                    Err(DetectionFailure::for_sample(ErrorKind::Technical))
                }
            };

            match &sample {
                Ok(reading) => log_debug!(
                    "sample {}/{}: {} ({:.2})",
                    index + 1,
                    sample_count,
                    reading.mood,
                    reading.confidence
                ),
                Err(failure) => log_debug!(
                    "sample {}/{} failed: {}",
                    index + 1,
                    sample_count,
                    failure.error_kind
                ),
            }

            tally.record(&sample);
        }

        let result = tally.finish();
        match &result {
            Ok(reading) => log_info!(
                "mood {} with confidence {:.2} over {} samples",
                reading.mood,
                reading.confidence,
                reading.sample_count
            ),
            Err(failure) => log_info!("detection failed: {}", failure.error_kind),
        }
        result
    }
}

impl Default for MoodAggregator {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::stub::{ScriptedExpressions, ScriptedFrames, ScriptedResponse};
    use crate::detection::Frame;

    fn fast_config(sample_count: u32) -> DetectionConfig {
        DetectionConfig {
            sample_count,
            sample_delay_ms: 0,
            ..DetectionConfig::default()
        }
    }

    fn face(pairs: &[(&str, f64)]) -> ScriptedResponse {
        ScriptedResponse::face(pairs.iter().map(|(k, v)| (*k, *v)).collect())
    }

    fn bright_frames() -> ScriptedFrames {
        ScriptedFrames::constant(Frame::uniform(8, 8, 180))
    }

    #[tokio::test]
    async fn test_partial_failures_dilute_confidence() {
        let expressions = ScriptedExpressions::new(vec![
            face(&[("happy", 0.9), ("neutral", 0.1)]),
            ScriptedResponse::NoFaces,
            face(&[("happy", 0.7), ("neutral", 0.3)]),
            ScriptedResponse::NoFaces,
            face(&[("surprised", 0.8), ("happy", 0.2)]),
        ]);

        let reading = MoodAggregator::new(fast_config(5))
            .detect(&bright_frames(), &expressions)
            .await
            .unwrap();

        assert_eq!(reading.mood, Mood::Happy);
        assert!((reading.confidence - 0.6).abs() < 1e-9);
        assert_eq!(reading.mood_counts.get(Mood::Happy), 3);
        assert_eq!(reading.error_counts.get(ErrorKind::NoFace), 2);
        // (0.9 + 0.7 + 0.2) / 5
        let happy = reading.all_expressions.get("happy").unwrap();
        assert!((happy - 0.36).abs() < 1e-9);
        assert_eq!(reading.raw_expression, "happy");
    }

    #[tokio::test]
    async fn test_all_dark_reports_lighting() {
        let frames = ScriptedFrames::constant(Frame::uniform(8, 8, 5));
        let expressions = ScriptedExpressions::new(Vec::new());

        let failure = MoodAggregator::new(fast_config(4))
            .detect(&frames, &expressions)
            .await
            .unwrap_err();

        assert_eq!(failure.error_kind, ErrorKind::Lighting);
        assert_eq!(
            failure.message,
            "The lighting is too dark. Please move to a brighter area."
        );
        assert_eq!(expressions.calls(), 0);
    }

    #[tokio::test]
    async fn test_mood_tie_prefers_happy_then_sad() {
        let expressions = ScriptedExpressions::new(vec![
            face(&[("neutral", 0.9)]),
            face(&[("sad", 0.9)]),
            face(&[("happy", 0.9)]),
            face(&[("neutral", 0.9)]),
            face(&[("sad", 0.9)]),
            face(&[("happy", 0.9)]),
        ]);

        let reading = MoodAggregator::new(fast_config(6))
            .detect(&bright_frames(), &expressions)
            .await
            .unwrap();
        assert_eq!(reading.mood, Mood::Happy);

        let expressions = ScriptedExpressions::new(vec![
            face(&[("neutral", 0.9)]),
            face(&[("angry", 0.9)]),
        ]);
        let reading = MoodAggregator::new(fast_config(2))
            .detect(&bright_frames(), &expressions)
            .await
            .unwrap();
        assert_eq!(reading.mood, Mood::Sad);
        assert!((reading.confidence - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_error_tie_uses_enumeration_order() {
        let expressions = ScriptedExpressions::new(vec![
            ScriptedResponse::Fail("boom".into()),
            face(&[("happy", 0.2), ("sad", 0.2)]),
        ]);

        let failure = MoodAggregator::new(fast_config(2))
            .detect(&bright_frames(), &expressions)
            .await
            .unwrap_err();

        assert_eq!(failure.error_kind, ErrorKind::Confidence);
        assert_eq!(
            failure.message,
            "Couldn't detect facial expressions clearly. Please try again."
        );
    }

    #[tokio::test]
    async fn test_lost_camera_counts_as_technical_and_run_continues() {
        let frames = ScriptedFrames::sequence(vec![
            Ok(Frame::uniform(8, 8, 180)),
            Err("device disconnected".into()),
            Ok(Frame::uniform(8, 8, 180)),
        ]);
        let expressions = ScriptedExpressions::new(vec![
            face(&[("sad", 0.8)]),
            face(&[("sad", 0.6)]),
        ]);

        let reading = MoodAggregator::new(fast_config(3))
            .detect(&frames, &expressions)
            .await
            .unwrap();

        assert_eq!(reading.mood, Mood::Sad);
        assert_eq!(reading.error_counts.get(ErrorKind::Technical), 1);
        assert!((reading.confidence - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(expressions.calls(), 2);
    }

    struct PanickingFrames;

    impl FrameSource for PanickingFrames {
        async fn capture(&self) -> anyhow::Result<Frame> {
            panic!("camera driver crashed");
        }
    }

    #[tokio::test]
    async fn test_panicking_camera_fails_as_technical() {
        let expressions = ScriptedExpressions::new(Vec::new());
        let failure = MoodAggregator::new(fast_config(3))
            .detect(&PanickingFrames, &expressions)
            .await
            .unwrap_err();

        assert_eq!(failure.error_kind, ErrorKind::Technical);
        assert_eq!(expressions.calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_samples_takes_one() {
        let expressions = ScriptedExpressions::new(vec![face(&[("neutral", 0.95)])]);
        let reading = MoodAggregator::new(fast_config(0))
            .detect(&bright_frames(), &expressions)
            .await
            .unwrap();

        assert_eq!(reading.sample_count, 1);
        assert_eq!(reading.mood, Mood::Neutral);
        assert_eq!(reading.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_raw_expression_belongs_to_winning_mood() {
        let expressions = ScriptedExpressions::new(vec![
            face(&[("happy", 0.45), ("neutral", 0.3)]),
            face(&[("happy", 0.45), ("neutral", 0.3)]),
            face(&[("sad", 0.99)]),
        ]);

        let reading = MoodAggregator::new(fast_config(3))
            .detect(&bright_frames(), &expressions)
            .await
            .unwrap();

        assert_eq!(reading.mood, Mood::Happy);
        assert_eq!(reading.raw_expression, "happy");
        assert!((reading.all_expressions.get("sad").unwrap() - 0.33).abs() < 1e-9);
    }

    #[test]
    fn test_random_tallies_keep_raw_expression_consistent() {
        use crate::models::EXPRESSION_VOCABULARY;
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let classifier = SampleClassifier::default();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..500 {
            let mut tally = SampleTally::new();
            for _ in 0..rng.gen_range(1..=7) {
                let scores: ExpressionScores = EXPRESSION_VOCABULARY
                    .iter()
                    .map(|label| (*label, rng.gen_range(0.0..1.0)))
                    .collect();
                tally.record(&classifier.classify_scores(scores));
            }

            if let Ok(reading) = tally.finish() {
                assert_eq!(Mood::from_expression(&reading.raw_expression), reading.mood);
                assert!(reading.confidence > 0.0 && reading.confidence <= 1.0);
            }
        }
    }

    #[test]
    fn test_tally_with_no_samples_is_technical() {
        let failure = SampleTally::new().finish().unwrap_err();
        assert_eq!(failure.error_kind, ErrorKind::Technical);
    }
}
