//! Email Address

use std::fmt;

/// A named mailbox, e.g. `Jane <jane@example.com>`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Address {
    name: String,
    address: String,
}

impl Address {
    /// Create a new address
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// The display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mailbox address
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Renders as `name <address>`. Neither part is escaped.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.address)
    }
}

/// Formats a single address for use in a header.
pub fn format_address(address: &Address) -> String {
    address.to_string()
}

/// Formats every address in `addresses`, keeping their order.
pub fn format_address_list(addresses: &[Address]) -> Vec<String> {
    addresses.iter().map(format_address).collect()
}
