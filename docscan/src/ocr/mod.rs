//! OCR (Optical Character Recognition) Module
//!
//! Turns uploaded image bytes into text.
//!
//! # Architecture
//!
//! - [`decode_image`] validates and decodes the upload with the `image` crate;
//!   undecodable bytes are rejected before any external call is made
//! - [`OcrEngine`] is the seam the upload workflow depends on
//! - [`OcrProvider`] implements it with local Tesseract (via leptess) or an
//!   OpenAI-compatible vision API
//!
//! The decoded image is passed to the engine as-is: no denoising, deskewing
//! or binarization.
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr);
//! let image = decode_image(&bytes)?;
//! let text = ocr.recognize(&image).await?;
//! ```

mod api;
mod decode;
mod provider;

pub use decode::{decode_image, encode_png};
pub use provider::{OcrEngine, OcrProvider};
