//! Mail composition module.

mod address;
mod attachment;
mod message;
mod smtp_config;
mod transport;

pub mod errors;

pub use address::{format_address, format_address_list, Address};
pub use attachment::Attachment;
pub use errors::{SendError, ValidationError};
pub use message::Message;
pub use smtp_config::SmtpConfig;
pub use transport::{OutgoingMessage, Transport};
