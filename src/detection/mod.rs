pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod frame;
pub mod source;
pub mod stub;

pub use aggregator::{AggregateReading, AggregateResult, MoodAggregator, SampleTally};
pub use classifier::{DetectionFailure, SampleClassifier, SampleReading, SampleResult};
pub use config::DetectionConfig;
pub use frame::{Frame, LightingGate};
pub use source::{ExpressionSource, FaceDetection, FrameSource};
