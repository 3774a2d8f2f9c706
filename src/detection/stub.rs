//! Deterministic stand-ins for the camera and the inference engine.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use crate::models::ExpressionScores;

use super::{ExpressionSource, FaceDetection, Frame, FrameSource};

#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Faces(Vec<FaceDetection>),
    NoFaces,
    Fail(String),
}

impl ScriptedResponse {
    pub fn face(scores: ExpressionScores) -> Self {
        ScriptedResponse::Faces(vec![FaceDetection::new(scores)])
    }
}

/// Replays responses in order; errors once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedExpressions {
    script: Mutex<VecDeque<ScriptedResponse>>,
    calls: AtomicUsize,
}

impl ScriptedExpressions {
    pub fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `detect` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> Option<ScriptedResponse> {
        let mut script = match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        script.pop_front()
    }
}

impl ExpressionSource for ScriptedExpressions {
    async fn detect(&self, _frame: &Frame) -> Result<Vec<FaceDetection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.next_response() {
            Some(ScriptedResponse::Faces(faces)) => Ok(faces),
            Some(ScriptedResponse::NoFaces) => Ok(Vec::new()),
            Some(ScriptedResponse::Fail(reason)) => Err(anyhow!(reason)),
            None => Err(anyhow!("expression script exhausted")),
        }
    }
}

/// Yields queued frames in order, then repeats `fallback` if one is set.
#[derive(Debug)]
pub struct ScriptedFrames {
    queue: Mutex<VecDeque<Result<Frame, String>>>,
    fallback: Option<Frame>,
}

impl ScriptedFrames {
    /// Always returns `frame`.
    pub fn constant(frame: Frame) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Some(frame),
        }
    }

    /// Returns each entry once; an `Err` entry simulates the camera going away.
    pub fn sequence(frames: Vec<Result<Frame, String>>) -> Self {
        Self {
            queue: Mutex::new(frames.into()),
            fallback: None,
        }
    }
}

impl FrameSource for ScriptedFrames {
    async fn capture(&self) -> Result<Frame> {
        let next = {
            let mut queue = match self.queue.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            queue.pop_front()
        };

        match next {
            Some(Ok(frame)) => Ok(frame),
            Some(Err(reason)) => Err(anyhow!(reason)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| anyhow!("camera stream ended")),
        }
    }
}
