//! Batch engine: workspace bootstrap, configuration, and the file loop.

use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Frame, RgbaImage};
use log::{debug, warn};

use crate::animation::Animation;
use crate::compositor::{self, Position};
use crate::error::{Error, Result};
use crate::overlay;

/// File extensions the batch picks up, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp"];

/// Quality for flattened static JPEG outputs.
const JPEG_QUALITY: u8 = 75;

/// Immutable settings shared by every file and frame in one batch run.
#[derive(Debug, Clone)]
pub struct CompositionConfig {
    /// Overlay opacity in `0.0..=1.0`; scales the watermark's alpha channel.
    pub opacity: f32,
    /// Overlay width as a percentage of each frame's width, in `(0.0, 100.0]`.
    pub scale_percent: f32,
    /// Corner (or center) the overlay is anchored to.
    pub position: Position,
    /// Margin in pixels between the overlay and the frame edge.
    pub margin: u32,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            opacity: 0.5,
            scale_percent: 15.0,
            position: Position::BottomRight,
            margin: 10,
        }
    }
}

/// The three working directories of a batch run.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Source images dropped by the user.
    pub input_dir: PathBuf,
    /// Write destination for composited outputs.
    pub output_dir: PathBuf,
    /// Holds exactly one watermark image.
    pub watermark_dir: PathBuf,
}

impl Workspace {
    /// Set up the standard `input/`, `output/` and `watermark/` folders
    /// under `base`, creating any that are missing.
    ///
    /// # Errors
    ///
    /// Returns an error if a folder cannot be created.
    pub fn create(base: &Path) -> Result<Self> {
        let workspace = Self {
            input_dir: base.join("input"),
            output_dir: base.join("output"),
            watermark_dir: base.join("watermark"),
        };
        fs::create_dir_all(&workspace.input_dir)?;
        fs::create_dir_all(&workspace.output_dir)?;
        fs::create_dir_all(&workspace.watermark_dir)?;
        Ok(workspace)
    }
}

/// One recorded per-file failure.
#[derive(Debug, Clone)]
pub struct FileFailure {
    /// Name of the input file that failed.
    pub filename: String,
    /// Human-readable reason.
    pub message: String,
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Number of files written to the output folder.
    pub processed: u32,
    /// Per-file failures, in input enumeration order.
    pub failures: Vec<FileFailure>,
}

impl BatchResult {
    /// Status line for display once a run completes.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("Success! {} images processed.", self.processed)
    }
}

/// The batch engine holding the prepared overlay and the run configuration.
///
/// Create once per run; the opacity-adjusted overlay is derived at
/// construction and shared read-only across every file and frame.
pub struct BatchEngine {
    overlay: RgbaImage,
    config: CompositionConfig,
}

impl BatchEngine {
    /// Create an engine from an already-loaded watermark.
    ///
    /// Applies the configured opacity to the watermark's alpha channel once;
    /// the watermark itself is not mutated.
    #[must_use]
    pub fn new(watermark: &RgbaImage, config: CompositionConfig) -> Self {
        let overlay = overlay::prepare_overlay(watermark, config.opacity);
        Self { overlay, config }
    }

    /// Create an engine by locating and loading the watermark from the
    /// workspace's watermark folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WatermarkNotFound`] if the folder holds no supported
    /// image, or a load error if the file cannot be decoded.
    pub fn from_workspace(workspace: &Workspace, config: CompositionConfig) -> Result<Self> {
        let path = find_watermark(&workspace.watermark_dir)?;
        debug!("using watermark {}", path.display());
        let watermark = image::open(&path)?.to_rgba8();
        Ok(Self::new(&watermark, config))
    }

    /// Run the batch: composite the overlay onto every supported file in the
    /// input folder and write the results to the output folder.
    ///
    /// Files are processed sequentially and independently; a failure on one
    /// file is recorded and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoInputFiles`] if the input folder holds no
    /// supported images (the output folder is not touched), or
    /// [`Error::AllFilesFailed`] if files were present but none succeeded.
    pub fn run(&self, workspace: &Workspace) -> Result<BatchResult> {
        let inputs = list_supported_files(&workspace.input_dir)?;
        if inputs.is_empty() {
            return Err(Error::NoInputFiles {
                dir: workspace.input_dir.clone(),
            });
        }

        let mut result = BatchResult::default();
        for input in &inputs {
            let filename = input.file_name().map_or_else(
                || input.display().to_string(),
                |f| f.to_string_lossy().to_string(),
            );

            match self.process_file(input, &workspace.output_dir) {
                Ok(output) => {
                    debug!("{filename} -> {}", output.display());
                    result.processed += 1;
                }
                Err(e) => {
                    warn!("could not process {filename}: {e}");
                    result.failures.push(FileFailure {
                        filename,
                        message: e.to_string(),
                    });
                }
            }
        }

        if result.processed == 0 {
            return Err(Error::AllFilesFailed {
                total: inputs.len(),
            });
        }

        Ok(result)
    }

    /// Composite the overlay onto a single input file and write the output.
    ///
    /// Animated GIFs keep their per-frame delays and loop count and are
    /// written as `<stem>.gif`; everything else is flattened to an opaque
    /// `<stem>.jpg` regardless of its source format.
    ///
    /// Returns the path that was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded, composited or saved.
    pub fn process_file(&self, input: &Path, output_dir: &Path) -> Result<PathBuf> {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();

        if is_animated(input) {
            let output = output_dir.join(format!("{stem}.gif"));
            let animation = Animation::load(input)?;

            let frames = animation
                .frames
                .iter()
                .map(|frame| {
                    let buffer = self.composite_frame(frame.buffer());
                    Frame::from_parts(buffer, frame.left(), frame.top(), frame.delay())
                })
                .collect();

            Animation {
                frames,
                repeat: animation.repeat,
            }
            .save(&output)?;
            Ok(output)
        } else {
            let output = output_dir.join(format!("{stem}.jpg"));
            let frame = image::open(input)?.to_rgba8();
            let composited = self.composite_frame(&frame);
            save_jpeg(&composited, &output)?;
            Ok(output)
        }
    }

    fn composite_frame(&self, frame: &RgbaImage) -> RgbaImage {
        compositor::composite(
            frame,
            &self.overlay,
            self.config.scale_percent,
            self.config.position,
            self.config.margin,
        )
    }
}

/// Check if a file has a supported image extension (case-insensitive).
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// Locate the watermark image: the first supported file in the directory,
/// in listing order.
///
/// # Errors
///
/// Returns [`Error::WatermarkNotFound`] if the directory holds no supported
/// image file.
pub fn find_watermark(dir: &Path) -> Result<PathBuf> {
    fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .find(|p| is_supported_image(p))
        .ok_or_else(|| Error::WatermarkNotFound {
            dir: dir.to_path_buf(),
        })
}

/// Multi-frame dispatch is by extension: only `.gif` sources take the
/// animated path, and their outputs stay in the GIF container.
fn is_animated(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gif"))
        .unwrap_or(false)
}

fn list_supported_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| is_supported_image(p))
        .collect())
}

/// Flatten to opaque RGB and encode as JPEG.
fn save_jpeg(image: &RgbaImage, path: &Path) -> Result<()> {
    let flattened = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let file = fs::File::create(path)?;
    let mut encoder = JpegEncoder::new_with_quality(file, JPEG_QUALITY);
    encoder.encode_image(&DynamicImage::ImageRgb8(flattened))?;
    Ok(())
}
