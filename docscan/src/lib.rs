//! docscan: upload an image, keep the original in blob storage, OCR it and
//! record the text in a SQL database.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ocr;
pub mod services;
pub mod storage;
