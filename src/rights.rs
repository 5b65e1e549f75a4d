//! Rights-statement lookup contract and wrapper constants.
//!
//! Rights statements live in an external relational store keyed by the
//! statement URI carried on a IIIF manifest's `license` member. The store
//! is injected as a [`RightsLookup`] collaborator; a missing statement is a
//! fatal [`IndexError::RightsNotFound`](crate::IndexError::RightsNotFound)
//! for the current document.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Base URL of the rights-wrapper service that fronts restricted content.
pub const RIGHTS_WRAPPER_URL: &str =
    "http://rightswrapper2.lib.virginia.edu:8090/rights-wrapper/";

/// Use-facet label for statements permitting commercial use.
pub const COMMERCIAL_USE: &str = "Commercial Use Permitted";
/// Use-facet label for statements permitting educational use.
pub const EDUCATIONAL_USE: &str = "Educational Use Permitted";
/// Use-facet label for statements permitting modifications.
pub const MODIFICATIONS: &str = "Modifications Permitted";

/// A rights statement as stored in the rights database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightsStatement {
    /// Human-readable statement text.
    pub statement: String,
    /// Whether commercial use is permitted.
    pub commercial_use_allowed: bool,
    /// Whether educational use is permitted.
    pub educational_use_allowed: bool,
    /// Whether modifications are permitted.
    pub modifications_allowed: bool,
}

impl RightsStatement {
    /// The use-facet labels this statement grants.
    #[must_use]
    pub fn use_facets(&self) -> Vec<&'static str> {
        let mut facets = Vec::new();
        if self.commercial_use_allowed {
            facets.push(COMMERCIAL_USE);
        }
        if self.educational_use_allowed {
            facets.push(EDUCATIONAL_USE);
        }
        if self.modifications_allowed {
            facets.push(MODIFICATIONS);
        }
        facets
    }
}

/// Collaborator that looks up rights statements by URI.
pub trait RightsLookup {
    /// Look up the statement recorded for a rights URI.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`IndexError::RightsNotFound`](crate::IndexError::RightsNotFound)
    /// when the URI is not in the store.
    fn lookup(&self, rights_uri: &str) -> Result<RightsStatement>;
}
