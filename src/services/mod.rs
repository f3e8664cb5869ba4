// NetCommand - Services
// SPDX-License-Identifier: MIT

//! Service layer: each module wraps one family of external commands or
//! lookups behind a typed interface.

pub mod dns;
pub mod lease;
pub mod lookup;
pub mod monitor;
pub mod probe;
pub mod routing;

pub use dns::DnsControl;
pub use lease::LeaseControl;
pub use lookup::LookupClient;
pub use monitor::StatusMonitor;
pub use probe::Prober;
pub use routing::RouteControl;
