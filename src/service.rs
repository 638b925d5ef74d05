//! Lookup services the host can ask for.
//!
//! The operation kind carried by CHECK, LOOKUP and FETCH is one of the
//! host's service bits. Handlers receive the raw `i32`; [`TableService`]
//! is a convenience for matching on it.
//!
//! # Example
//!
//! ```
//! use table_api::TableService;
//!
//! assert_eq!(TableService::from_kind(0x01), Some(TableService::Alias));
//! assert_eq!(TableService::Credentials.name(), "credentials");
//! assert_eq!(TableService::from_kind(0x1000), None);
//! ```

/// One host lookup service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TableService {
    /// Local alias expansion.
    Alias = 0x01,
    /// Accepted domains.
    Domain = 0x02,
    /// Authentication credentials.
    Credentials = 0x04,
    /// Network addresses / masks.
    Netaddr = 0x08,
    /// System user information.
    Userinfo = 0x10,
    /// Source addresses for outgoing connections.
    Source = 0x20,
    /// Mail addresses.
    Mailaddr = 0x40,
    /// Address to hostname mapping.
    Addrname = 0x80,
}

impl TableService {
    /// Every known service, in bit order.
    pub const ALL: [TableService; 8] = [
        TableService::Alias,
        TableService::Domain,
        TableService::Credentials,
        TableService::Netaddr,
        TableService::Userinfo,
        TableService::Source,
        TableService::Mailaddr,
        TableService::Addrname,
    ];

    /// Decode an operation kind.
    pub fn from_kind(kind: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.kind() == kind)
    }

    /// The wire value.
    #[inline]
    pub fn kind(self) -> i32 {
        self as i32
    }

    /// Lowercase name, as used in host configuration.
    pub fn name(self) -> &'static str {
        match self {
            TableService::Alias => "alias",
            TableService::Domain => "domain",
            TableService::Credentials => "credentials",
            TableService::Netaddr => "netaddr",
            TableService::Userinfo => "userinfo",
            TableService::Source => "source",
            TableService::Mailaddr => "mailaddr",
            TableService::Addrname => "addrname",
        }
    }
}

/// Name for a raw kind, for logging.
pub(crate) fn kind_name(kind: i32) -> &'static str {
    TableService::from_kind(kind).map_or("unknown", TableService::name)
}
