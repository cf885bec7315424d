//! Batch-apply a watermark image onto a folder of images and animated GIFs.
//!
//! A run works over three folders under a base directory: `input/` holds the
//! source images, `watermark/` holds exactly one watermark image, and
//! composited copies land in `output/`. The watermark's alpha channel is
//! scaled by a configurable opacity once per run, then the overlay is
//! resized relative to each frame's width, anchored to a corner (or the
//! center) with a pixel margin, and alpha-blended onto every frame.
//!
//! Animated GIFs are rebuilt frame by frame, preserving per-frame delays
//! and the loop count; static images are flattened and written as JPEG.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use watermark_applicator::{BatchEngine, CompositionConfig, Workspace};
//!
//! let workspace = Workspace::create(Path::new(".")).expect("failed to set up folders");
//! let engine = BatchEngine::from_workspace(&workspace, CompositionConfig::default())
//!     .expect("failed to load watermark");
//! let result = engine.run(&workspace).expect("batch failed");
//! println!("{}", result.status_line());
//! ```
//!
//! # Compositing a single frame
//!
//! ```no_run
//! use watermark_applicator::{composite, prepare_overlay, Position};
//!
//! let frame = image::open("photo.jpg").unwrap().to_rgba8();
//! let watermark = image::open("logo.png").unwrap().to_rgba8();
//!
//! let overlay = prepare_overlay(&watermark, 0.5);
//! let stamped = composite(&frame, &overlay, 15.0, Position::BottomRight, 10);
//! ```

#![deny(missing_docs)]

pub mod animation;
pub mod compositor;
pub mod engine;
pub mod error;
pub mod overlay;

pub use compositor::{composite, scaled_dimensions, Position};
pub use engine::{
    find_watermark, is_supported_image, BatchEngine, BatchResult, CompositionConfig, FileFailure,
    Workspace, SUPPORTED_EXTENSIONS,
};
pub use error::{Error, Result};
pub use overlay::prepare_overlay;
