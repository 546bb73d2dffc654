use crate::config::{Configuration, SamplingOptions, SegmentationOptions};
use crate::error::AppError;
use crate::pipeline::comparison::CycleComparator;
use crate::pipeline::sampling::{
    ActionClassifier, FrameSampler, FrameSamplerBuilder, PoseSource, RuleBasedClassifier,
    SamplingObserver, SamplingReport,
};
use crate::pipeline::segmentation::CycleSegmenter;
use crate::pipeline::statistics;
use crate::pipeline::types::{Cycle, FrameRecord, GoldenCycle, SimilarityResult, StatisticsSummary};
use std::sync::Arc;

/// Entry point for cycle analysis.
///
/// Owns the golden cycle and the classifier reference. Replacing the golden cycle needs
/// `&mut self`, so it can never change underneath a running comparison.
pub struct CycleEngine {
    configuration: Configuration,
    golden_cycle: Option<GoldenCycle>,
    classifier: Option<Arc<dyn ActionClassifier>>,
    rules: Arc<RuleBasedClassifier>,
    comparator: CycleComparator,
}

impl CycleEngine {
    pub fn builder() -> CycleEngineBuilder {
        CycleEngineBuilder::new(Configuration::default())
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Replaces the golden cycle as a whole.
    pub fn set_golden_cycle(&mut self, cycle: Cycle) {
        tracing::info!(
            "Golden cycle set: cycle {} ({:.2}s, {} frames)",
            cycle.cycle_number,
            cycle.duration,
            cycle.frames.len()
        );
        self.golden_cycle = Some(GoldenCycle::new(cycle));
    }

    pub fn clear_golden_cycle(&mut self) {
        self.golden_cycle = None;
    }

    pub fn golden_cycle(&self) -> Option<&GoldenCycle> {
        self.golden_cycle.as_ref()
    }

    /// Sampler builder carrying this engine's classifier and rules.
    pub fn sampler(
        &self,
        source: Arc<dyn PoseSource>,
        options: SamplingOptions,
    ) -> FrameSamplerBuilder {
        FrameSampler::builder(source)
            .classifier(self.classifier.clone())
            .rules(Arc::clone(&self.rules))
            .options(options)
    }

    /// Samples the whole video behind `source`, reporting progress after each frame.
    pub async fn analyze_video<P>(
        &self,
        source: Arc<dyn PoseSource>,
        progress: P,
        options: SamplingOptions,
    ) -> Result<SamplingReport, AppError>
    where
        P: SamplingObserver + 'static,
    {
        self.sampler(source, options)
            .observer(Box::new(progress))
            .build()
            .run()
            .await
    }

    /// Segments already-sampled frames. Cheap enough to rerun with other options.
    pub fn detect_cycles(
        &self,
        frames: &[FrameRecord],
        options: SegmentationOptions,
    ) -> Result<Vec<Cycle>, AppError> {
        CycleSegmenter::new(options)
            .with_comparator(self.comparator.clone())
            .segment(frames, self.golden_cycle.as_deref())
    }

    pub fn compare_cycles(&self, a: Option<&Cycle>, b: Option<&Cycle>) -> SimilarityResult {
        self.comparator.compare(a, b)
    }

    /// Every cycle against the golden cycle; all zero results when none is set.
    pub fn compare_all(&self, cycles: &[Cycle]) -> Vec<SimilarityResult> {
        let golden = self.golden_cycle.as_deref();
        cycles
            .iter()
            .map(|cycle| self.comparator.compare(golden, Some(cycle)))
            .collect()
    }

    pub fn calculate_statistics(&self, cycles: &[Cycle]) -> StatisticsSummary {
        statistics::calculate_statistics(cycles)
    }
}

pub struct CycleEngineBuilder {
    configuration: Configuration,
    classifier: Option<Arc<dyn ActionClassifier>>,
    rules: Option<RuleBasedClassifier>,
    comparator: Option<CycleComparator>,
}

impl CycleEngineBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            classifier: None,
            rules: None,
            comparator: None,
        }
    }

    // Sets the configuration, this will override the default configuration.
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    // External action classifier, the built-in rules are used without one.
    pub fn classifier(mut self, classifier: Arc<dyn ActionClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    // Replaces the built-in rule chain.
    pub fn rules(mut self, rules: RuleBasedClassifier) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn comparator(mut self, comparator: CycleComparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn build(self) -> Result<CycleEngine, AppError> {
        self.configuration.validate()?;
        Ok(CycleEngine {
            configuration: self.configuration,
            golden_cycle: None,
            classifier: self.classifier,
            rules: Arc::new(self.rules.unwrap_or_default()),
            comparator: self.comparator.unwrap_or_default(),
        })
    }
}
