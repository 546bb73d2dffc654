use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use super::pose_source::PoseSource;
use crate::common::PoseFrame;
use futures::task::{Context, Poll};
use futures::Future;
use tower::timeout::TimeoutLayer;
use tower::util::BoxService;
use tower::{BoxError, Service, ServiceBuilder};

/// Seek followed by detect, as one service call per timestamp.
#[derive(Clone)]
pub struct DetectService {
    source: Arc<dyn PoseSource>,
}

impl DetectService {
    pub fn new(source: Arc<dyn PoseSource>) -> Self {
        Self { source }
    }
}

impl Service<f64> for DetectService {
    type Response = Option<PoseFrame>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, timestamp: f64) -> Self::Future {
        let source = self.source.clone();

        Box::pin(async move {
            source.seek(timestamp).await?;
            let pose = source.detect().await?;
            Ok::<_, BoxError>(pose)
        })
    }
}

pub struct DetectServiceBuilder {
    source: Arc<dyn PoseSource>,
    seek_timeout: Option<Duration>,
}

impl DetectServiceBuilder {
    pub fn new(source: Arc<dyn PoseSource>) -> Self {
        Self {
            source,
            seek_timeout: None,
        }
    }

    /// Bounds each seek+detect. An elapsed timeout surfaces as
    /// `tower::timeout::error::Elapsed`.
    pub fn seek_timeout(mut self, seek_timeout: Option<Duration>) -> Self {
        self.seek_timeout = seek_timeout;
        self
    }

    pub fn build(self) -> BoxService<f64, Option<PoseFrame>, BoxError> {
        let service = ServiceBuilder::new()
            .option_layer(self.seek_timeout.map(TimeoutLayer::new))
            .service(DetectService::new(self.source));
        BoxService::new(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Keypoint, KeypointName};
    use crate::error::PoseSourceError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct RecordingSource {
        sought: Mutex<Vec<f64>>,
        delay: Duration,
    }

    #[async_trait]
    impl PoseSource for RecordingSource {
        fn duration(&self) -> Option<f64> {
            Some(1.0)
        }

        async fn seek(&self, timestamp: f64) -> Result<(), PoseSourceError> {
            tokio::time::sleep(self.delay).await;
            self.sought.lock().unwrap().push(timestamp);
            Ok(())
        }

        async fn detect(&self) -> Result<Option<PoseFrame>, PoseSourceError> {
            Ok(Some(PoseFrame::new(vec![Keypoint::new(
                KeypointName::Nose,
                0.5,
                0.5,
                0.9,
            )])))
        }
    }

    #[tokio::test]
    async fn seeks_then_detects() {
        let source = Arc::new(RecordingSource {
            sought: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        });
        let mut service = DetectServiceBuilder::new(source.clone()).build();

        let pose = service.ready().await.unwrap().call(0.4).await.unwrap();
        assert_eq!(pose.map(|p| p.len()), Some(1));
        assert_eq!(*source.sought.lock().unwrap(), vec![0.4]);
    }

    #[tokio::test]
    async fn slow_seek_times_out_when_bounded() {
        let source = Arc::new(RecordingSource {
            sought: Mutex::new(Vec::new()),
            delay: Duration::from_millis(200),
        });
        let mut service = DetectServiceBuilder::new(source)
            .seek_timeout(Some(Duration::from_millis(10)))
            .build();

        let error = service.ready().await.unwrap().call(0.0).await.unwrap_err();
        assert!(error.is::<tower::timeout::error::Elapsed>());
    }
}
