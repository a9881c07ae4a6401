// The clients defined here are reqwest clients for external services.

pub mod country_is;

pub use country_is::CountryIsClient;
