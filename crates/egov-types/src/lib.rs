//! Egov Types - Pure record and envelope definitions
//!
//! Shapes of the records cached from the egov open-data API and of the JSON
//! envelopes the proxy answers with. No runtime dependencies beyond serde.

pub mod envelope;
pub mod listing;
pub mod locale;
mod number;
pub mod passport;
mod timestamp;

pub use envelope::*;
pub use listing::*;
pub use locale::*;
pub use passport::*;
