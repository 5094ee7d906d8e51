//! Harvest Extract - pure extraction over already-rendered page markup.
//!
//! Three stateless components sit here; all of them are safe to call from
//! any number of threads without coordination.
//!
//! - [`normalize`] - canonical, tracker-free URL strings
//! - [`links`] - same-site link collection bounded by a caller limit
//! - [`emails`] - email discovery with `mailto:` precedence
//!
//! None of them fetch or render anything. The caller hands over the page
//! HTML; malformed markup or URLs degrade to empty or best-effort results
//! rather than errors.
//!
//! # Example
//!
//! ```rust
//! use harvest_extract::{collect_links, extract_emails, normalize_url};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let html = r#"
//!     <a href="mailto:editor@example.com?subject=hi">Editor</a>
//!     <a href="https://www.example.com/about?utm_source=feed">About</a>
//! "#;
//!
//! assert_eq!(extract_emails(html), vec!["editor@example.com"]);
//! assert_eq!(
//!     collect_links(html, ["example.com"], 10)?,
//!     vec!["https://example.com/about"]
//! );
//! assert_eq!(normalize_url("HTTP://WWW.Example.com/a/../b/"), "http://example.com/b");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod emails;
pub mod error;
pub mod links;
pub mod normalize;

// Re-export commonly used types
pub use emails::{extract_emails, is_valid_email};
pub use error::{ExtractError, Result};
pub use links::{collect_links, same_host, LinkCollector};
pub use normalize::normalize_url;
