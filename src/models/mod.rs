pub mod address;
pub mod filter;
pub mod response;

pub use address::{AddressRange, Country, IspCount};
pub use filter::QueryFilter;
pub use response::{AddressDetails, AddressSummary, CountryQuantity, CountrySummary};
