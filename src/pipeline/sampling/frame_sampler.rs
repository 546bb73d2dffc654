use super::classifier::{ActionClassifier, RuleBasedClassifier};
use super::detect_service::DetectServiceBuilder;
use super::observer::{ObserverSet, SamplingObserver};
use super::pose_source::PoseSource;
use crate::common::PoseFrame;
use crate::config::SamplingOptions;
use crate::error::{AppError, PoseSourceError};
use crate::pipeline::context::FrameContext;
use crate::pipeline::features::{FeatureExtractor, MotionTracker};
use crate::pipeline::types::{ActionClassification, FeatureSet, FrameRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower::util::BoxService;
use tower::{BoxError, Service, ServiceExt};
use uuid::Uuid;

/// How a sampling pass ended. Records gathered before a cancel or abort stay usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SamplingStatus {
    Completed,
    Cancelled,
    Aborted(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingReport {
    pub pass_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub frames_planned: usize,
    pub records: Vec<FrameRecord>,
    pub status: SamplingStatus,
}

impl SamplingReport {
    pub fn is_complete(&self) -> bool {
        self.status == SamplingStatus::Completed
    }
}

/// Walks a video timeline at a fixed rate and turns every timestamp into a [`FrameRecord`].
///
/// One sampler runs one pass: [`FrameSampler::run`] consumes it, so a new pass starts from a
/// clean motion tracker.
pub struct FrameSampler {
    source: Arc<dyn PoseSource>,
    service: BoxService<f64, Option<PoseFrame>, BoxError>,
    classifier: Option<Arc<dyn ActionClassifier>>,
    rules: Arc<RuleBasedClassifier>,
    extractor: FeatureExtractor,
    tracker: MotionTracker,
    options: SamplingOptions,
    observers: ObserverSet,
    cancel_token: CancellationToken,
}

impl FrameSampler {
    pub fn builder(source: Arc<dyn PoseSource>) -> FrameSamplerBuilder {
        FrameSamplerBuilder::new(source)
    }

    /// Checks collaborators before the first seek and returns the video duration.
    fn preflight(&self) -> Result<f64, AppError> {
        self.options.validate()?;
        if !self.source.is_ready() {
            return Err(AppError::MissingInput(
                "pose source is not ready".to_string(),
            ));
        }
        if let Some(classifier) = &self.classifier {
            if !classifier.is_ready() {
                return Err(AppError::MissingInput(format!(
                    "action classifier '{}' is not ready",
                    classifier.name()
                )));
            }
        }
        match self.source.duration() {
            Some(duration) if duration.is_finite() && duration >= 0.0 => Ok(duration),
            Some(duration) => Err(AppError::MissingInput(format!(
                "video duration is not usable: {duration}"
            ))),
            None => Err(AppError::MissingInput("no video is loaded".to_string())),
        }
    }

    pub async fn run(mut self) -> Result<SamplingReport, AppError> {
        let duration = self.preflight()?;
        let fps = self.options.fps;
        let frames_planned = (duration * fps).floor() as usize;
        let pass_id = Uuid::new_v4();
        let started_at = Utc::now();

        tracing::info!(
            "Sampling pass {} started: {} frames at {} fps over {}s",
            pass_id,
            frames_planned,
            fps,
            duration
        );

        let mut records = Vec::with_capacity(frames_planned);
        let mut status = SamplingStatus::Completed;

        for frame_number in 0..frames_planned {
            if self.cancel_token.is_cancelled() {
                tracing::info!(
                    "Sampling pass {} cancelled after {} frames",
                    pass_id,
                    records.len()
                );
                status = SamplingStatus::Cancelled;
                break;
            }

            let time = frame_number as f64 / fps;
            let context = FrameContext::new(frame_number, time);
            let pose = match self.detect(frame_number, time).await {
                Ok(pose) => pose,
                Err(error) => {
                    tracing::error!(
                        "Sampling pass {} aborted at frame {}: {}",
                        pass_id,
                        frame_number,
                        error
                    );
                    status = SamplingStatus::Aborted(error.to_string());
                    break;
                }
            };
            let context = context.into_detected(pose);

            let (features, classification, motion_intensity) = match context.pose() {
                Some(pose) => {
                    let mut features = self.extractor.extract(pose);
                    features.velocity = self.tracker.update(time, Some(pose));
                    let motion_intensity = features.motion_intensity();
                    let classification =
                        Self::classify(self.classifier.clone(), &self.rules, pose, &features)
                            .await;
                    (Some(features), classification, motion_intensity)
                }
                None => {
                    self.tracker.update(time, None);
                    (None, ActionClassification::no_person(), 0.0)
                }
            };

            let (record, metrics) = context.into_record(features, classification, motion_intensity);
            tracing::debug!(
                "Frame {} at {:.3}s: {} ({:.2}), motion {:.2}",
                record.frame_number(),
                record.time(),
                record.action(),
                record.action_confidence(),
                record.motion_intensity()
            );
            self.observers.notify_frame_sampled(&record, &metrics);
            records.push(record);
            self.observers
                .notify_progress(records.len() as f64 / frames_planned as f64);
        }

        tracing::info!(
            "Sampling pass {} finished with {} of {} frames ({:?})",
            pass_id,
            records.len(),
            frames_planned,
            status
        );

        Ok(SamplingReport {
            pass_id,
            started_at,
            frames_planned,
            records,
            status,
        })
    }

    /// Seeks and detects one timestamp.
    ///
    /// Only an unavailable source is an error; any other failure, timeouts included, costs
    /// this frame its pose.
    async fn detect(
        &mut self,
        frame_number: usize,
        time: f64,
    ) -> Result<Option<PoseFrame>, PoseSourceError> {
        let response = match self.service.ready().await {
            Ok(service) => service.call(time).await,
            Err(error) => Err(error),
        };

        match response {
            Ok(pose) => Ok(pose),
            Err(error) => {
                if let Some(source_error) = error.downcast_ref::<PoseSourceError>() {
                    if source_error.is_fatal() {
                        return Err(source_error.clone());
                    }
                }
                if error.is::<tower::timeout::error::Elapsed>() {
                    tracing::warn!(
                        "Seek to {:.3}s timed out, frame {} has no pose",
                        time,
                        frame_number
                    );
                } else {
                    tracing::warn!(
                        "Frame {} at {:.3}s has no pose: {}",
                        frame_number,
                        time,
                        error
                    );
                }
                Ok(None)
            }
        }
    }

    async fn classify(
        classifier: Option<Arc<dyn ActionClassifier>>,
        rules: &RuleBasedClassifier,
        pose: &PoseFrame,
        features: &FeatureSet,
    ) -> ActionClassification {
        let Some(classifier) = classifier else {
            return rules.evaluate(pose, features);
        };
        match classifier.classify(pose, features).await {
            Ok(classification) => classification,
            Err(error) => {
                tracing::warn!(
                    "Classifier '{}' failed, using built-in rules: {}",
                    classifier.name(),
                    error
                );
                rules.evaluate(pose, features)
            }
        }
    }
}

pub struct FrameSamplerBuilder {
    source: Arc<dyn PoseSource>,
    classifier: Option<Arc<dyn ActionClassifier>>,
    rules: Option<Arc<RuleBasedClassifier>>,
    options: SamplingOptions,
    observers: ObserverSet,
    cancel_token: Option<CancellationToken>,
}

impl FrameSamplerBuilder {
    pub fn new(source: Arc<dyn PoseSource>) -> Self {
        Self {
            source,
            classifier: None,
            rules: None,
            options: SamplingOptions::default(),
            observers: ObserverSet::new(),
            cancel_token: None,
        }
    }

    // External classifier; without one the built-in rules label every frame.
    pub fn classifier(mut self, classifier: Option<Arc<dyn ActionClassifier>>) -> Self {
        self.classifier = classifier;
        self
    }

    // Replaces the built-in rule chain.
    pub fn rules(mut self, rules: Arc<RuleBasedClassifier>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn options(mut self, options: SamplingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn observer(mut self, observer: Box<dyn SamplingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn cancel_token(mut self, cancel_token: CancellationToken) -> Self {
        self.cancel_token = Some(cancel_token);
        self
    }

    pub fn build(self) -> FrameSampler {
        let service = DetectServiceBuilder::new(self.source.clone())
            .seek_timeout(self.options.seek_timeout())
            .build();
        FrameSampler {
            source: self.source,
            service,
            classifier: self.classifier,
            rules: self.rules.unwrap_or_default(),
            extractor: FeatureExtractor::new(),
            tracker: MotionTracker::new(self.options.velocity_mode),
            options: self.options,
            observers: self.observers,
            cancel_token: self.cancel_token.unwrap_or_else(CancellationToken::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifierError;
    use crate::pipeline::features::VelocityMode;
    use crate::pipeline::sampling::testing::{moving_pose, ScriptedSource};
    use crate::pipeline::types::NO_PERSON_LABEL;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    fn options(fps: f64) -> SamplingOptions {
        SamplingOptions {
            fps,
            ..SamplingOptions::default()
        }
    }

    #[tokio::test]
    async fn samples_floor_of_duration_times_fps() {
        let source = Arc::new(ScriptedSource::new(2.05, |i| Some(moving_pose(i))));
        let progress = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&progress);

        let report = FrameSampler::builder(source.clone())
            .options(options(10.0))
            .observer(Box::new(move |fraction: f64| sink.lock().unwrap().push(fraction)))
            .build()
            .run()
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.frames_planned, 20);
        assert_eq!(report.records.len(), 20);
        for (i, record) in report.records.iter().enumerate() {
            assert_eq!(record.frame_number(), i);
            assert!((record.time() - i as f64 / 10.0).abs() < 1e-12);
        }
        let progress = progress.lock().unwrap();
        assert_eq!(progress.len(), 20);
        assert_eq!(progress.last().copied(), Some(1.0));
        assert!(progress.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(source.seeks().len(), 20);
    }

    #[tokio::test]
    async fn seeks_never_overlap() {
        let source = Arc::new(
            ScriptedSource::new(1.0, |i| Some(moving_pose(i))).with_delay(Duration::from_millis(1)),
        );
        FrameSampler::builder(source.clone())
            .options(options(10.0))
            .build()
            .run()
            .await
            .unwrap();
        assert_eq!(source.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn frames_without_person_are_not_errors() {
        let source = Arc::new(ScriptedSource::new(0.5, |i| {
            if i % 2 == 0 {
                None
            } else {
                Some(moving_pose(i))
            }
        }));
        let report = FrameSampler::builder(source)
            .options(options(10.0))
            .build()
            .run()
            .await
            .unwrap();

        assert!(report.is_complete());
        let empty = &report.records[0];
        assert_eq!(empty.action(), NO_PERSON_LABEL);
        assert_eq!(empty.motion_intensity(), 0.0);
        assert!(empty.features().is_none());
        assert!(report.records[1].features().is_some());
    }

    #[tokio::test]
    async fn missing_video_is_reported_before_sampling() {
        let source = Arc::new(ScriptedSource::new(1.0, |_| None).without_video());
        let result = FrameSampler::builder(source.clone()).build().run().await;
        assert!(matches!(result, Err(AppError::MissingInput(_))));
        assert!(source.seeks().is_empty());
    }

    #[tokio::test]
    async fn unready_model_is_reported_before_sampling() {
        let source = Arc::new(ScriptedSource::new(1.0, |_| None).not_ready());
        let result = FrameSampler::builder(source.clone()).build().run().await;
        assert!(matches!(result, Err(AppError::MissingInput(_))));
        assert!(source.seeks().is_empty());
    }

    #[tokio::test]
    async fn seek_failures_degrade_to_no_pose() {
        let source = Arc::new(
            ScriptedSource::new(0.5, |i| Some(moving_pose(i))).failing_at(
                2,
                PoseSourceError::SeekFailed {
                    timestamp: 0.2,
                    reason: "decoder hiccup".to_string(),
                },
            ),
        );
        let report = FrameSampler::builder(source)
            .options(options(10.0))
            .build()
            .run()
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.records.len(), 5);
        assert_eq!(report.records[2].action(), NO_PERSON_LABEL);
        assert!(report.records[3].has_person());
    }

    #[tokio::test]
    async fn unavailable_source_aborts_with_partial_records() {
        let source = Arc::new(
            ScriptedSource::new(1.0, |i| Some(moving_pose(i)))
                .failing_at(4, PoseSourceError::Unavailable("video element removed".to_string())),
        );
        let report = FrameSampler::builder(source)
            .options(options(10.0))
            .build()
            .run()
            .await
            .unwrap();

        assert!(matches!(report.status, SamplingStatus::Aborted(_)));
        assert_eq!(report.records.len(), 4);
        assert_eq!(report.frames_planned, 10);
    }

    #[tokio::test]
    async fn cancellation_stops_between_frames() {
        let source = Arc::new(ScriptedSource::new(1.0, |i| Some(moving_pose(i))));
        let token = CancellationToken::new();
        let trigger = token.clone();

        let report = FrameSampler::builder(source)
            .options(options(10.0))
            .cancel_token(token)
            .observer(Box::new(move |fraction: f64| {
                if fraction >= 0.3 {
                    trigger.cancel();
                }
            }))
            .build()
            .run()
            .await
            .unwrap();

        assert_eq!(report.status, SamplingStatus::Cancelled);
        assert_eq!(report.records.len(), 3);
    }

    #[tokio::test]
    async fn moving_person_produces_motion() {
        let source = Arc::new(ScriptedSource::new(1.0, |i| Some(moving_pose(i))));
        let report = FrameSampler::builder(source)
            .options(options(10.0))
            .build()
            .run()
            .await
            .unwrap();

        assert_eq!(report.records[0].motion_intensity(), 0.0);
        assert!(report.records[1..].iter().all(|r| r.motion_intensity() > 0.0));
    }

    #[tokio::test]
    async fn unpopulated_velocity_keeps_motion_at_zero() {
        let source = Arc::new(ScriptedSource::new(1.0, |i| Some(moving_pose(i))));
        let report = FrameSampler::builder(source)
            .options(SamplingOptions {
                fps: 10.0,
                velocity_mode: VelocityMode::Unpopulated,
                ..SamplingOptions::default()
            })
            .build()
            .run()
            .await
            .unwrap();

        assert!(report.records.iter().all(|r| r.motion_intensity() == 0.0));
    }

    #[tokio::test]
    async fn slow_seeks_time_out_into_no_pose() {
        let source = Arc::new(
            ScriptedSource::new(0.3, |i| Some(moving_pose(i)))
                .with_delay(Duration::from_millis(100)),
        );
        let report = FrameSampler::builder(source)
            .options(SamplingOptions {
                fps: 10.0,
                seek_timeout_ms: Some(5),
                ..SamplingOptions::default()
            })
            .build()
            .run()
            .await
            .unwrap();

        assert!(report.is_complete());
        assert!(report.records.iter().all(|r| r.action() == NO_PERSON_LABEL));
    }

    struct FixedClassifier {
        fail: bool,
        ready: bool,
    }

    #[async_trait]
    impl ActionClassifier for FixedClassifier {
        async fn classify(
            &self,
            _pose: &PoseFrame,
            _features: &FeatureSet,
        ) -> Result<ActionClassification, ClassifierError> {
            if self.fail {
                Err(ClassifierError::ClassificationFailed("model crashed".to_string()))
            } else {
                Ok(ActionClassification::new("Screwing", 0.95))
            }
        }

        fn name(&self) -> &'static str {
            "FixedClassifier"
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }

    #[tokio::test]
    async fn external_classifier_labels_frames() {
        let source = Arc::new(ScriptedSource::new(0.3, |i| Some(moving_pose(i))));
        let classifier: Arc<dyn ActionClassifier> = Arc::new(FixedClassifier {
            fail: false,
            ready: true,
        });
        let report = FrameSampler::builder(source)
            .options(options(10.0))
            .classifier(Some(classifier))
            .build()
            .run()
            .await
            .unwrap();

        assert!(report.records.iter().all(|r| r.action() == "Screwing"));
        assert_eq!(report.records[0].action_confidence(), 0.95);
    }

    #[tokio::test]
    async fn failing_classifier_falls_back_to_rules() {
        let source = Arc::new(ScriptedSource::new(0.3, |i| Some(moving_pose(i))));
        let classifier: Arc<dyn ActionClassifier> = Arc::new(FixedClassifier {
            fail: true,
            ready: true,
        });
        let report = FrameSampler::builder(source)
            .options(options(10.0))
            .classifier(Some(classifier))
            .build()
            .run()
            .await
            .unwrap();

        assert!(report.records.iter().all(|r| r.action() != "Screwing"));
        assert!(report.records.iter().all(|r| r.action() != NO_PERSON_LABEL));
    }

    #[tokio::test]
    async fn unready_classifier_is_reported_before_sampling() {
        let source = Arc::new(ScriptedSource::new(0.3, |i| Some(moving_pose(i))));
        let classifier: Arc<dyn ActionClassifier> = Arc::new(FixedClassifier {
            fail: false,
            ready: false,
        });
        let result = FrameSampler::builder(source.clone())
            .classifier(Some(classifier))
            .build()
            .run()
            .await;
        assert!(matches!(result, Err(AppError::MissingInput(_))));
        assert!(source.seeks().is_empty());
    }
}
