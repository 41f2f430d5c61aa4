// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The parts of a browser location the URL synchronizer reads and writes.
///
/// `search` is the raw query string and may or may not start with `?`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    pub search: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            search: search.into(),
        }
    }

    /// Query string without the leading `?`.
    pub fn query(&self) -> &str {
        self.search.strip_prefix('?').unwrap_or(&self.search)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.query() {
            "" => write!(f, "{}", self.pathname),
            query => write!(f, "{}?{}", self.pathname, query),
        }
    }
}

/// Navigation stack new URL state is written to, for example a router or `window.history`.
pub trait History {
    type Error: Error;

    /// Push a new entry on top of the stack and make it the current location.
    fn push(&mut self, location: Location) -> Result<(), Self::Error>;
}

impl<H: History + ?Sized> History for &mut H {
    type Error = H::Error;

    fn push(&mut self, location: Location) -> Result<(), Self::Error> {
        (**self).push(location)
    }
}
