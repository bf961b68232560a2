//! sift: faceted search documents, mappings and queries.
//!
//! sift turns content records into search-engine documents, infers the index mapping
//! those documents need, and compiles free text plus facet selections into engine
//! queries whose facet counts stay correct while facets are being selected. The engine
//! itself is out of scope: requests are rendered as JSON and responses are parsed back.

#![warn(missing_docs)]

pub mod cli;
