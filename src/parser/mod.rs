//! The JSON marshalling boundary.
//!
//! Converts between `serde_json::Value` trees and the typed model:
//! [`unmarshal`] parses and validates incoming JSON, [`marshal`] renders
//! resources and list responses with attribute filtering and pagination.

pub mod marshal;
pub mod unmarshal;

#[cfg(test)]
mod tests;
