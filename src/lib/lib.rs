#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Composes and validates HTML email messages and hands them to an SMTP
//! transport for delivery.

pub mod domain;
pub mod infrastructure;
