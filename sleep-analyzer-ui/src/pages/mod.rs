//! Pages
//!
//! Top-level views: the upload form and the results of an analysis.

pub mod results;
pub mod upload;

pub use results::ResultsPage;
pub use upload::UploadPage;
