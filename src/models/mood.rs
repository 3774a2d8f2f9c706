use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Expression labels in the order used for every tie-break. Labels outside this
/// list rank after it, in lexical order.
pub const EXPRESSION_VOCABULARY: [&str; 7] = [
    "neutral",
    "happy",
    "sad",
    "angry",
    "fearful",
    "disgusted",
    "surprised",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
}

impl Mood {
    /// Precedence order for count ties.
    pub const ALL: [Mood; 3] = [Mood::Happy, Mood::Sad, Mood::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
        }
    }

    /// Total mapping from an expression label to a mood.
    pub fn from_expression(expression: &str) -> Mood {
        match expression {
            "happy" | "surprised" => Mood::Happy,
            "sad" | "angry" | "fearful" | "disgusted" => Mood::Sad,
            _ => Mood::Neutral,
        }
    }

    fn index(&self) -> usize {
        match self {
            Mood::Happy => 0,
            Mood::Sad => 1,
            Mood::Neutral => 2,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Lighting,
    #[serde(rename = "noface")]
    NoFace,
    Confidence,
    Technical,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::Lighting,
        ErrorKind::NoFace,
        ErrorKind::Confidence,
        ErrorKind::Technical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Lighting => "lighting",
            ErrorKind::NoFace => "noface",
            ErrorKind::Confidence => "confidence",
            ErrorKind::Technical => "technical",
        }
    }

    fn index(&self) -> usize {
        match self {
            ErrorKind::Lighting => 0,
            ErrorKind::NoFace => 1,
            ErrorKind::Confidence => 2,
            ErrorKind::Technical => 3,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-expression confidence scores from one face detection, or a sum/average
/// of several.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ExpressionScores(BTreeMap<String, f64>);

impl ExpressionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, expression: impl Into<String>, score: f64) {
        self.0.insert(expression.into(), score);
    }

    pub fn get(&self, expression: &str) -> Option<f64> {
        self.0.get(expression).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in tie-break order: vocabulary labels first, then the rest
    /// lexically.
    pub fn ranked(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        let known = EXPRESSION_VOCABULARY
            .iter()
            .filter_map(move |label| self.0.get_key_value(*label))
            .map(|(label, score)| (label.as_str(), *score));
        let others = self
            .0
            .iter()
            .filter(|(label, _)| !EXPRESSION_VOCABULARY.contains(&label.as_str()))
            .map(|(label, score)| (label.as_str(), *score));
        known.chain(others)
    }

    /// Highest-scoring expression; the earliest label in tie-break order keeps a
    /// tie and non-finite scores never win.
    pub fn strongest(&self) -> Option<(&str, f64)> {
        self.strongest_where(|_| true)
    }

    /// Highest-scoring expression among those that map to `mood`, with the
    /// same tie-break as [`ExpressionScores::strongest`].
    pub fn strongest_for(&self, mood: Mood) -> Option<(&str, f64)> {
        self.strongest_where(|label| Mood::from_expression(label) == mood)
    }

    fn strongest_where(&self, keep: impl Fn(&str) -> bool) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (label, score) in self.ranked() {
            if !score.is_finite() || !keep(label) {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((label, score)),
            }
        }
        best
    }

    /// Add every score of `other` into this accumulator.
    pub fn accumulate(&mut self, other: &ExpressionScores) {
        for (label, score) in &other.0 {
            *self.0.entry(label.clone()).or_insert(0.0) += *score;
        }
    }

    pub fn divided_by(&self, divisor: f64) -> ExpressionScores {
        ExpressionScores(
            self.0
                .iter()
                .map(|(label, score)| (label.clone(), score / divisor))
                .collect(),
        )
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ExpressionScores {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        ExpressionScores(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Success counts per mood.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoodCounts([u32; 3]);

impl MoodCounts {
    pub fn record(&mut self, mood: Mood) {
        self.0[mood.index()] += 1;
    }

    pub fn get(&self, mood: Mood) -> u32 {
        self.0[mood.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Mood with the highest non-zero count, ties going to the earlier mood in
    /// `Mood::ALL`.
    pub fn leader(&self) -> Option<(Mood, u32)> {
        let mut best: Option<(Mood, u32)> = None;
        for mood in Mood::ALL {
            let count = self.get(mood);
            if count > best.map(|(_, c)| c).unwrap_or(0) {
                best = Some((mood, count));
            }
        }
        best
    }
}

/// Failure counts per error kind.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCounts([u32; 4]);

impl ErrorCounts {
    pub fn record(&mut self, kind: ErrorKind) {
        self.0[kind.index()] += 1;
    }

    pub fn get(&self, kind: ErrorKind) -> u32 {
        self.0[kind.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn leader(&self) -> Option<(ErrorKind, u32)> {
        let mut best: Option<(ErrorKind, u32)> = None;
        for kind in ErrorKind::ALL {
            let count = self.get(kind);
            if count > best.map(|(_, c)| c).unwrap_or(0) {
                best = Some((kind, count));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_mapping_is_fixed() {
        assert_eq!(Mood::from_expression("angry"), Mood::Sad);
        assert_eq!(Mood::from_expression("surprised"), Mood::Happy);
        assert_eq!(Mood::from_expression("happy"), Mood::Happy);
        assert_eq!(Mood::from_expression("fearful"), Mood::Sad);
        assert_eq!(Mood::from_expression("disgusted"), Mood::Sad);
        assert_eq!(Mood::from_expression("neutral"), Mood::Neutral);
        assert_eq!(Mood::from_expression("contempt"), Mood::Neutral);
        assert_eq!(Mood::from_expression(""), Mood::Neutral);
    }

    #[test]
    fn test_strongest_prefers_vocabulary_order_on_ties() {
        let scores: ExpressionScores =
            [("surprised", 0.45), ("happy", 0.45), ("neutral", 0.1)].into_iter().collect();
        assert_eq!(scores.strongest(), Some(("happy", 0.45)));
    }

    #[test]
    fn test_strongest_ranks_unknown_labels_last() {
        let scores: ExpressionScores = [("contempt", 0.5), ("sad", 0.5)].into_iter().collect();
        assert_eq!(scores.strongest(), Some(("sad", 0.5)));
    }

    #[test]
    fn test_strongest_skips_nan() {
        let scores: ExpressionScores = [("happy", f64::NAN), ("sad", 0.2)].into_iter().collect();
        assert_eq!(scores.strongest(), Some(("sad", 0.2)));
        assert_eq!(ExpressionScores::new().strongest(), None);
    }

    #[test]
    fn test_strongest_for_only_considers_matching_labels() {
        let scores: ExpressionScores = [("sad", 0.33), ("happy", 0.3), ("surprised", 0.3)]
            .into_iter()
            .collect();
        assert_eq!(scores.strongest_for(Mood::Happy), Some(("happy", 0.3)));
        assert_eq!(scores.strongest_for(Mood::Sad), Some(("sad", 0.33)));
        assert_eq!(scores.strongest_for(Mood::Neutral), None);
    }

    #[test]
    fn test_mood_counts_leader_uses_precedence() {
        let mut counts = MoodCounts::default();
        assert_eq!(counts.leader(), None);
        counts.record(Mood::Neutral);
        counts.record(Mood::Sad);
        assert_eq!(counts.leader(), Some((Mood::Sad, 1)));
        counts.record(Mood::Neutral);
        assert_eq!(counts.leader(), Some((Mood::Neutral, 2)));
    }

    #[test]
    fn test_error_counts_leader_uses_enumeration_order() {
        let mut counts = ErrorCounts::default();
        counts.record(ErrorKind::Technical);
        counts.record(ErrorKind::NoFace);
        assert_eq!(counts.leader(), Some((ErrorKind::NoFace, 1)));
    }

    #[test]
    fn test_error_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ErrorKind::NoFace).unwrap();
        assert_eq!(json, "\"noface\"");
        let mood: Mood = serde_json::from_str("\"happy\"").unwrap();
        assert_eq!(mood, Mood::Happy);
    }
}
