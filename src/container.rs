//! Top-container identity: call numbers, barcodes, and locations.
//!
//! Containers are owning-independent — the same box may be linked from
//! several records — so their call numbers are derived against the call
//! number of whichever record is being indexed.

use crate::error::Result;
use crate::json;
use crate::record::ArchivalRecord;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CONTAINER_URI: Regex =
        Regex::new(r"^/repositories/(\d+)/top_containers/(\d+)$").unwrap();
}

impl ArchivalRecord<'_> {
    /// The container's call number under an owning record: the owning call
    /// number, a space, and the container's display string.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`](crate::IndexError::Resolution)
    /// when the container cannot be resolved or has no display string.
    pub fn container_call_number(&self, owning_call_number: &str) -> Result<String> {
        Ok(format!(
            "{owning_call_number} {}",
            self.require_str("display_string")?
        ))
    }

    /// The container's barcode.
    ///
    /// Falls back to a deterministic `AS:<repo>C<container>` identifier
    /// parsed from the container's own uri when no explicit barcode exists,
    /// and to the literal `UNKNOWN` when the uri has an unexpected shape.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`](crate::IndexError::Resolution)
    /// when the container cannot be resolved.
    pub fn barcode(&self) -> Result<String> {
        let raw = self.raw()?;
        if let Some(barcode) = json::str_field(raw, "barcode") {
            return Ok(barcode.to_string());
        }
        let uri = json::str_field(raw, "uri").unwrap_or("");
        Ok(match CONTAINER_URI.captures(uri) {
            Some(caps) => format!("AS:{}C{}", &caps[1], &caps[2]),
            None => "UNKNOWN".to_string(),
        })
    }

    /// The title of the location entry tagged `current` in the container's
    /// location history, resolved once per instance. Empty when no entry is
    /// tagged current.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`](crate::IndexError::Resolution)
    /// when the container or a current location reference cannot be
    /// resolved.
    pub fn current_location(&self) -> Result<&str> {
        if let Some(location) = self.current_location.get() {
            return Ok(location);
        }
        let mut found = String::new();
        if let Some(entries) = json::array_field(self.raw()?, "container_locations") {
            for entry in entries {
                if json::str_field(entry, "status") == Some("current") {
                    if let Some(location_ref) = json::str_field(entry, "ref") {
                        let location = self.resolver().resolve(location_ref)?;
                        found = json::expect_str(&location, "title", location_ref)?.to_string();
                    }
                }
            }
        }
        Ok(self.current_location.get_or_init(|| found))
    }

    /// The container's shelf location: its `room` value, else `STACKS`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`](crate::IndexError::Resolution)
    /// when the container cannot be resolved.
    pub fn shelf_location(&self) -> Result<String> {
        let raw = self.raw()?;
        Ok(match raw.get("room") {
            None | Some(serde_json::Value::Null) => "STACKS".to_string(),
            Some(serde_json::Value::String(room)) => room.clone(),
            Some(other) => other.to_string(),
        })
    }
}
