use crate::error::AppError;
use crate::pipeline::features::VelocityMode;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub sampling: SamplingOptions,
    pub segmentation: SegmentationOptions,
    pub log_level: String,
}

/// Options for one sampling pass over a video.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingOptions {
    pub fps: f64,
    /// Per-seek timeout. Unset means wait for every seek however long it takes.
    pub seek_timeout_ms: Option<u64>,
    pub velocity_mode: VelocityMode,
}

/// Options for `detect_cycles`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SegmentationOptions {
    pub threshold: f64,
    /// Seconds.
    pub min_cycle_duration: f64,
    pub use_golden_cycle: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            sampling: SamplingOptions::default(),
            segmentation: SegmentationOptions::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            fps: 10.0,
            seek_timeout_ms: None,
            velocity_mode: VelocityMode::Displacement,
        }
    }
}

impl Default for SegmentationOptions {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            min_cycle_duration: 2.0,
            use_golden_cycle: true,
        }
    }
}

impl SamplingOptions {
    pub fn seek_timeout(&self) -> Option<Duration> {
        self.seek_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(AppError::InvalidOptions(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if self.seek_timeout_ms == Some(0) {
            return Err(AppError::InvalidOptions(
                "seek timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl SegmentationOptions {
    pub fn new(threshold: f64, min_cycle_duration: f64) -> Self {
        Self {
            threshold,
            min_cycle_duration,
            ..Self::default()
        }
    }

    pub fn with_golden_cycle(mut self, use_golden_cycle: bool) -> Self {
        self.use_golden_cycle = use_golden_cycle;
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(AppError::InvalidOptions(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        if !self.min_cycle_duration.is_finite() || self.min_cycle_duration < 0.0 {
            return Err(AppError::InvalidOptions(format!(
                "minimum cycle duration must be a non-negative number, got {}",
                self.min_cycle_duration
            )));
        }
        Ok(())
    }
}

impl Configuration {
    /// Layers an optional TOML file under `CYCLE_ENGINE__*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let configuration: Configuration = builder
            .add_source(
                Environment::with_prefix("CYCLE_ENGINE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.sampling.validate()?;
        self.segmentation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let configuration = Configuration::default();
        assert!(configuration.validate().is_ok());
        assert_eq!(configuration.sampling.fps, 10.0);
        assert_eq!(configuration.segmentation.threshold, 20.0);
        assert!(configuration.sampling.seek_timeout().is_none());
    }

    #[test]
    fn rejects_non_positive_fps() {
        let options = SamplingOptions {
            fps: 0.0,
            ..SamplingOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(AppError::InvalidOptions(_))
        ));
    }

    #[test]
    fn rejects_negative_threshold() {
        let options = SegmentationOptions::new(-1.0, 1.0);
        assert!(matches!(
            options.validate(),
            Err(AppError::InvalidOptions(_))
        ));
    }

    #[test]
    fn loads_partial_file_over_defaults() {
        let path = std::env::temp_dir().join(format!("cycle-engine-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).expect("create config file");
        writeln!(file, "[segmentation]\nthreshold = 12.5\n\n[sampling]\nfps = 5.0")
            .expect("write config file");

        let configuration = Configuration::load(Some(&path)).expect("load config");
        std::fs::remove_file(&path).ok();

        assert_eq!(configuration.segmentation.threshold, 12.5);
        assert_eq!(configuration.segmentation.min_cycle_duration, 2.0);
        assert_eq!(configuration.sampling.fps, 5.0);
        assert_eq!(configuration.sampling.velocity_mode, VelocityMode::Displacement);
    }
}
