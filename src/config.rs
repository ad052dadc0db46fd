//! Configuration types for the conversion operations and for logging.
//!
//! All conversion behaviour is controlled through [`ConverterConfig`], built
//! via its [`ConverterConfigBuilder`]. Logging is configured separately by a
//! single [`LogConfig`] value that the binary hands to its subscriber once,
//! before the menu starts.

use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Millimetres → PDF points.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Configuration for the conversion operations.
///
/// Built via [`ConverterConfig::builder()`] or using
/// [`ConverterConfig::default()`].
///
/// # Example
/// ```rust
/// use anyfile_convert::ConverterConfig;
///
/// let config = ConverterConfig::builder()
///     .jpeg_quality(90)
///     .embed_images(false)
///     .build()
///     .unwrap();
/// assert_eq!(config.jpeg_quality, 90);
/// ```
#[derive(Clone)]
pub struct ConverterConfig {
    /// Page geometry and font used by DOCX → PDF. Default: A4, Courier 12 pt.
    pub layout: PageLayout,

    /// JPEG quality (1–100) for every JPEG this tool writes. Default: 75.
    pub jpeg_quality: u8,

    /// Embed decodable page images when converting PDF → DOCX. Default: true.
    pub embed_images: bool,

    /// Optional per-page progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            layout: PageLayout::default(),
            jpeg_quality: 75,
            embed_images: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("layout", &self.layout)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("embed_images", &self.embed_images)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConverterConfig {
    /// Create a new builder for `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConverterConfig`].
#[derive(Debug)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn layout(mut self, layout: PageLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn font_size_pt(mut self, size: f32) -> Self {
        self.config.layout.font_size_pt = size.clamp(4.0, 72.0);
        self
    }

    pub fn bottom_margin_mm(mut self, mm: f32) -> Self {
        self.config.layout.bottom_margin_mm = mm.max(0.0);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn embed_images(mut self, v: bool) -> Self {
        self.config.embed_images = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, ConvertError> {
        let c = &self.config;
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(ConvertError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        c.layout.validate()?;
        Ok(self.config)
    }
}

/// Page geometry for the text-layout PDF writer, in millimetres.
///
/// Defaults mirror a plain A4 sheet: 10 mm side and top margins, an automatic
/// page break 15 mm above the bottom edge, 10 mm lines and 12 pt text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub width_mm: f32,
    pub height_mm: f32,
    /// Left, right and top margin.
    pub margin_mm: f32,
    /// Distance from the bottom edge at which a new page is started.
    pub bottom_margin_mm: f32,
    pub line_height_mm: f32,
    pub font_size_pt: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 10.0,
            bottom_margin_mm: 15.0,
            line_height_mm: 10.0,
            font_size_pt: 12.0,
        }
    }
}

impl PageLayout {
    /// Width available for text between the side margins.
    pub fn text_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Lowest y (from the top) a line may end at before paging.
    pub fn break_at_mm(&self) -> f32 {
        self.height_mm - self.bottom_margin_mm
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if self.text_width_mm() <= 0.0 {
            return Err(ConvertError::InvalidConfig(format!(
                "margins ({} mm) leave no room on a {} mm wide page",
                self.margin_mm, self.width_mm
            )));
        }
        if self.margin_mm + self.line_height_mm > self.break_at_mm() {
            return Err(ConvertError::InvalidConfig(format!(
                "a {} mm line does not fit between the top margin and the {} mm bottom margin",
                self.line_height_mm, self.bottom_margin_mm
            )));
        }
        if self.line_height_mm <= 0.0 || self.font_size_pt <= 0.0 {
            return Err(ConvertError::InvalidConfig(
                "line height and font size must be positive".into(),
            ));
        }
        Ok(())
    }
}

// ── Logging ──────────────────────────────────────────────────────────────

/// Severity threshold for the process-wide log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

/// Process-wide logging settings, applied once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub level: LogLevel,
}

impl LogConfig {
    /// Derive the level from the usual `--verbose` / `--quiet` pair.
    /// Verbose wins when both are set.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        let level = if verbose {
            LogLevel::Debug
        } else if quiet {
            LogLevel::Error
        } else {
            LogLevel::Info
        };
        Self { level }
    }

    /// `EnvFilter` directive for this configuration.
    pub fn filter_directive(&self) -> &'static str {
        match self.level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}
