//! Core library for the sku-dupe-finder command line application.
//!
//! The library exposes the analysis pipeline that powers the command-line
//! interface as well as the integration tests. The modules are structured to
//! keep responsibilities narrow and composable: value normalization lives in
//! [`normalize`], column detection heuristics in [`detect`], the workbook scan
//! and presence matrix in [`aggregate`], duplicate selection and report
//! shaping in [`report`], IO adapters under [`io`], and the end-to-end
//! orchestration in [`run`].

pub mod aggregate;
pub mod detect;
pub mod error;
pub mod io;
pub mod model;
pub mod normalize;
pub mod report;
pub mod run;

pub use error::{Result, ToolError};
