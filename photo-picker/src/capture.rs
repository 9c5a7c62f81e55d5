//! Capture / import pipeline.
//!
//! Stages run strictly in order and stop at the first cancel or error:
//!
//! ```text
//! invoke ──► normalize ──► downscale (optional) ──► validate
//!   │                          │
//!   ├─ cancelled: stop         └─ error: report to resize observer, stop
//!   └─ error: stop
//! ```

use crate::error::PickerError;
use crate::metadata::normalize;
use crate::models::{
    AssetOrigin, AssetRecord, CaptureSource, PickerConfig, RejectionKind, ValidationOutcome,
};
use crate::traits::{
    CaptureOptions, CaptureResponse, CaptureService, DownscaleOptions, DownscaleService,
};

/// Observer for the downscale stage: `(error, asset)`, exactly one is set
pub type ResizeObserver<'a> = dyn FnMut(Option<&PickerError>, Option<&AssetRecord>) + 'a;

/// Dimension rules a captured asset must pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationRules {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub max_pixel_count: Option<u64>,
    pub max_height_to_width_ratio: Option<f64>,
    pub min_width: u32,
    pub min_height: u32,
}

impl ValidationRules {
    /// Explicit bounds win; otherwise the resize targets bound the result
    pub fn from_config(config: &PickerConfig) -> Self {
        Self {
            max_width: config.max_width.or(config.resize_target_width),
            max_height: config.max_height.or(config.resize_target_height),
            max_pixel_count: config.max_pixel_count,
            max_height_to_width_ratio: config.max_height_to_width_ratio,
            min_width: config.min_width,
            min_height: config.min_height,
        }
    }

    /// First failing rule, checked in a fixed order
    pub fn check(&self, width: u32, height: u32) -> Option<RejectionKind> {
        if self.max_height.is_some_and(|max| height > max) {
            return Some(RejectionKind::TooLarge);
        }
        if self.max_width.is_some_and(|max| width > max) {
            return Some(RejectionKind::TooLarge);
        }
        if self
            .max_pixel_count
            .is_some_and(|max| u64::from(width) * u64::from(height) > max)
        {
            return Some(RejectionKind::TooLarge);
        }
        if let Some(max_ratio) = self.max_height_to_width_ratio {
            let ratio = if width == 0 {
                f64::INFINITY
            } else {
                f64::from(height) / f64::from(width)
            };
            if ratio > max_ratio {
                return Some(RejectionKind::TooLong);
            }
        }
        if width < self.min_width || height < self.min_height {
            return Some(RejectionKind::TooSmall);
        }
        None
    }

    pub fn validate(&self, asset: AssetRecord) -> ValidationOutcome {
        match self.check(asset.width, asset.height) {
            Some(kind) => {
                log::debug!(
                    "Rejected {} ({}x{}): {:?}",
                    asset.uri,
                    asset.width,
                    asset.height,
                    kind
                );
                ValidationOutcome::Rejected(kind, asset)
            }
            None => ValidationOutcome::Accepted(asset),
        }
    }
}

/// Configured pipeline for one picker session
#[derive(Debug, Clone, PartialEq)]
pub struct CapturePipeline {
    capture_options: CaptureOptions,
    resize: Option<DownscaleOptions>,
    rules: ValidationRules,
}

impl CapturePipeline {
    pub fn from_config(config: &PickerConfig) -> Self {
        let resize = config.resize_enabled().then(|| DownscaleOptions {
            quality: config.resize_quality,
            max_width: config.resize_target_width,
            max_height: config.resize_target_height,
        });

        Self {
            capture_options: CaptureOptions {
                quality: config.capture_quality,
            },
            resize,
            rules: ValidationRules::from_config(config),
        }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn resize_options(&self) -> Option<&DownscaleOptions> {
        self.resize.as_ref()
    }

    /// Runs all stages. `Ok(None)` means the user cancelled.
    pub async fn run<C, D>(
        &self,
        capture: &C,
        downscaler: &D,
        source: CaptureSource,
        on_resized: &mut ResizeObserver<'_>,
    ) -> Result<Option<ValidationOutcome>, PickerError>
    where
        C: CaptureService,
        D: DownscaleService,
    {
        let Some(asset) = self.invoke(capture, source).await? else {
            return Ok(None);
        };

        let asset = match &self.resize {
            Some(options) => match self.downscale(downscaler, &asset, options).await {
                Ok(resized) => {
                    on_resized(None, Some(&resized));
                    resized
                }
                Err(e) => {
                    log::error!("Downscale of {} failed: {}", asset.uri, e);
                    on_resized(Some(&e), None);
                    return Err(e);
                }
            },
            None => asset,
        };

        Ok(Some(self.rules.validate(asset)))
    }

    /// Calls the capture service and normalizes a successful response
    async fn invoke<C: CaptureService>(
        &self,
        capture: &C,
        source: CaptureSource,
    ) -> Result<Option<AssetRecord>, PickerError> {
        log::debug!("Invoking capture service ({:?})", source);
        let response = capture
            .capture(source, &self.capture_options)
            .await
            .map_err(PickerError::Capture)?;

        match response {
            CaptureResponse::Cancelled => {
                log::debug!("User cancelled {:?} capture", source);
                Ok(None)
            }
            CaptureResponse::Captured(raw) => {
                let origin = match source {
                    CaptureSource::Camera => AssetOrigin::Camera,
                    CaptureSource::Library => AssetOrigin::Capture,
                };
                let asset = normalize(&raw, origin, capture.mime_strategy());
                log::debug!(
                    "Captured {} ({}x{}, {})",
                    asset.uri,
                    asset.width,
                    asset.height,
                    asset.mime_type
                );
                Ok(Some(asset))
            }
        }
    }

    async fn downscale<D: DownscaleService>(
        &self,
        downscaler: &D,
        asset: &AssetRecord,
        options: &DownscaleOptions,
    ) -> Result<AssetRecord, PickerError> {
        let raw = downscaler
            .downscale(&asset.uri, options)
            .await
            .map_err(PickerError::Downscale)?;
        Ok(normalize(&raw, asset.source, downscaler.mime_strategy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::testing::{raw_media, ScriptedCapture, ScriptedDownscale};
    use crate::traits::NoDownscale;

    fn asset(width: u32, height: u32) -> AssetRecord {
        AssetRecord {
            uri: "/tmp/a.jpg".to_string(),
            width,
            height,
            mime_type: "image/jpeg".to_string(),
            filename: "a.jpg".to_string(),
            source: AssetOrigin::Camera,
            is_stored: false,
        }
    }

    #[test]
    fn test_pixel_count_fires_before_too_small() {
        let rules = ValidationRules {
            min_width: 100,
            max_pixel_count: Some(1),
            ..ValidationRules::default()
        };
        assert_eq!(
            rules.validate(asset(50, 50)),
            ValidationOutcome::Rejected(RejectionKind::TooLarge, asset(50, 50))
        );
    }

    #[test]
    fn test_rule_order() {
        let rules = ValidationRules {
            max_width: Some(1000),
            max_height: Some(1000),
            max_pixel_count: Some(500_000),
            max_height_to_width_ratio: Some(3.0),
            min_width: 100,
            min_height: 100,
        };
        assert_eq!(rules.check(500, 1200), Some(RejectionKind::TooLarge));
        assert_eq!(rules.check(1200, 500), Some(RejectionKind::TooLarge));
        assert_eq!(rules.check(900, 900), Some(RejectionKind::TooLarge));
        assert_eq!(rules.check(200, 700), Some(RejectionKind::TooLong));
        assert_eq!(rules.check(99, 200), Some(RejectionKind::TooSmall));
        assert_eq!(rules.check(200, 99), Some(RejectionKind::TooSmall));
        assert_eq!(rules.check(400, 600), None);
    }

    #[test]
    fn test_zero_width_is_too_long_when_ratio_bounded() {
        let rules = ValidationRules {
            max_height_to_width_ratio: Some(2.0),
            ..ValidationRules::default()
        };
        assert_eq!(rules.check(0, 10), Some(RejectionKind::TooLong));
    }

    #[test]
    fn test_no_rules_accepts_everything() {
        assert!(ValidationRules::default().validate(asset(1, 1)).is_accepted());
    }

    #[test]
    fn test_resize_targets_bound_validation() {
        let config = PickerConfig {
            resize_target_width: Some(800),
            resize_target_height: Some(600),
            max_height: Some(2000),
            ..PickerConfig::default()
        };
        let rules = ValidationRules::from_config(&config);
        assert_eq!(rules.max_width, Some(800));
        assert_eq!(rules.max_height, Some(2000));
    }

    #[tokio::test]
    async fn test_cancel_stops_silently() {
        let pipeline = CapturePipeline::from_config(&PickerConfig::default());
        let capture = ScriptedCapture::new(vec![Ok(CaptureResponse::Cancelled)]);
        let mut observed = 0;
        let result = pipeline
            .run(&capture, &NoDownscale, CaptureSource::Camera, &mut |_, _| {
                observed += 1
            })
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(observed, 0);
    }

    #[tokio::test]
    async fn test_capture_error_is_reported() {
        let pipeline = CapturePipeline::from_config(&PickerConfig::default());
        let capture = ScriptedCapture::new(vec![Err(ServiceError::Other("no camera".into()))]);
        let result = pipeline
            .run(&capture, &NoDownscale, CaptureSource::Camera, &mut |_, _| {})
            .await;
        assert!(matches!(result, Err(PickerError::Capture(_))));
    }

    #[tokio::test]
    async fn test_library_import_without_resize() {
        let pipeline = CapturePipeline::from_config(&PickerConfig::default());
        let capture = ScriptedCapture::new(vec![Ok(CaptureResponse::Captured(raw_media(
            "file:///tmp/pick.PNG",
            1200,
            800,
        )))]);
        let downscaler = ScriptedDownscale::new(vec![]);

        let outcome = pipeline
            .run(&capture, &downscaler, CaptureSource::Library, &mut |_, _| {
                panic!("no resize configured")
            })
            .await
            .unwrap()
            .unwrap();

        let asset = outcome.asset();
        assert_eq!(asset.uri, "/tmp/pick.PNG");
        assert_eq!(asset.mime_type, "image/png");
        assert_eq!(asset.source, AssetOrigin::Capture);
        assert!(outcome.is_accepted());
        assert_eq!(downscaler.calls(), 0);
        assert_eq!(capture.last_options().unwrap().quality, 1.0);
    }

    #[tokio::test]
    async fn test_downscale_renormalizes_and_notifies() {
        let config = PickerConfig {
            resize_target_width: Some(1000),
            resize_target_height: Some(1000),
            resize_quality: 0.8,
            ..PickerConfig::default()
        };
        let pipeline = CapturePipeline::from_config(&config);
        let capture = ScriptedCapture::new(vec![Ok(CaptureResponse::Captured(raw_media(
            "file:///tmp/IMG_1.JPG",
            4000,
            3000,
        )))]);
        let downscaler = ScriptedDownscale::new(vec![Ok(raw_media("/tmp/resized.png", 1000, 750))]);

        let mut resized = Vec::new();
        let outcome = pipeline
            .run(&capture, &downscaler, CaptureSource::Camera, &mut |err, asset| {
                assert!(err.is_none());
                resized.push(asset.cloned());
            })
            .await
            .unwrap()
            .unwrap();

        assert!(outcome.is_accepted());
        let asset = outcome.asset();
        assert_eq!(asset.uri, "/tmp/resized.png");
        assert_eq!(asset.mime_type, "image/png");
        assert_eq!(asset.source, AssetOrigin::Camera);
        assert_eq!(resized, vec![Some(asset.clone())]);

        let (uri, options) = downscaler.last_call().unwrap();
        assert_eq!(uri, "/tmp/IMG_1.JPG");
        assert_eq!(options.max_width, Some(1000));
        assert_eq!(options.quality, 0.8);
    }

    #[tokio::test]
    async fn test_downscale_error_reports_null_asset() {
        let config = PickerConfig {
            resize_target_width: Some(1000),
            ..PickerConfig::default()
        };
        let pipeline = CapturePipeline::from_config(&config);
        let capture = ScriptedCapture::new(vec![Ok(CaptureResponse::Captured(raw_media(
            "/tmp/a.jpg",
            4000,
            3000,
        )))]);
        let downscaler =
            ScriptedDownscale::new(vec![Err(ServiceError::Other("decoder failed".into()))]);

        let mut reports = Vec::new();
        let result = pipeline
            .run(&capture, &downscaler, CaptureSource::Camera, &mut |err, asset| {
                reports.push((err.is_some(), asset.is_some()));
            })
            .await;

        assert!(matches!(result, Err(PickerError::Downscale(_))));
        assert_eq!(reports, vec![(true, false)]);
    }

    #[tokio::test]
    async fn test_oversized_capture_is_rejected_with_asset() {
        let config = PickerConfig {
            max_width: Some(1000),
            ..PickerConfig::default()
        };
        let pipeline = CapturePipeline::from_config(&config);
        let capture = ScriptedCapture::new(vec![Ok(CaptureResponse::Captured(raw_media(
            "/tmp/wide.jpg",
            4000,
            3000,
        )))]);

        let outcome = pipeline
            .run(&capture, &NoDownscale, CaptureSource::Camera, &mut |_, _| {})
            .await
            .unwrap()
            .unwrap();
        match outcome {
            ValidationOutcome::Rejected(kind, asset) => {
                assert_eq!(kind, RejectionKind::TooLarge);
                assert_eq!(asset.width, 4000);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}
