pub mod client;
pub mod response;

pub use client::{device_data_url, redacted, HttpSource, WeatherSource};
pub use response::parse_latest_reading;
