pub mod fixtures;

#[cfg(test)]
mod config_api_tests;
#[cfg(test)]
mod scanner_tests;
#[cfg(test)]
mod stats_tests;
