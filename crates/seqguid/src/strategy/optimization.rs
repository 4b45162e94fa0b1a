use core::{fmt, str::FromStr};

use crate::{error::Error, generator::GeneratorConfiguration, layout::Layout};

/// The storage engine identifiers are optimized for.
///
/// Each strategy fixes a [`GeneratorConfiguration`] and a [`Layout`];
/// [`Optimization::None`] opts out of sequential ids entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Optimization {
    /// Random version 4 identifiers.
    #[default]
    None,
    /// [`Layout::SqlServer`], ordered the way SQL Server compares
    /// `uniqueidentifier` values.
    SqlServer,
    /// SQL Server layout with the process id in the node bytes, for several
    /// processes writing from one host.
    SqlServerWithProcessId,
    /// [`Layout::String`], for `CHAR(36)` columns.
    #[cfg_attr(feature = "serde", serde(rename = "mysql"))]
    MySql,
    /// [`Layout::String`], for string document ids.
    #[cfg_attr(feature = "serde", serde(rename = "ravendb"))]
    RavenDb,
    /// [`Layout::Binary`], for `RAW(16)` columns.
    Oracle,
    /// The string layout without naming an engine.
    AsString,
    /// The binary layout without naming an engine.
    AsBinary,
    /// [`Layout::AtEnd`]: node first, time and sequence as a suffix.
    AtEnd,
}

impl Optimization {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::None,
        Self::SqlServer,
        Self::SqlServerWithProcessId,
        Self::MySql,
        Self::RavenDb,
        Self::Oracle,
        Self::AsString,
        Self::AsBinary,
        Self::AtEnd,
    ];

    /// The generator configuration and layout this strategy uses, or `None`
    /// for random identifiers.
    pub const fn plan(self) -> Option<(GeneratorConfiguration, Layout)> {
        let layout = match self {
            Self::None => return None,
            Self::SqlServerWithProcessId => {
                return Some((GeneratorConfiguration::new(0, true), Layout::SqlServer));
            }
            Self::SqlServer => Layout::SqlServer,
            Self::MySql | Self::RavenDb | Self::AsString => Layout::String,
            Self::Oracle | Self::AsBinary => Layout::Binary,
            Self::AtEnd => Layout::AtEnd,
        };
        Some((GeneratorConfiguration::new(0, false), layout))
    }

    /// The kebab-case name accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SqlServer => "sql-server",
            Self::SqlServerWithProcessId => "sql-server-with-process-id",
            Self::MySql => "mysql",
            Self::RavenDb => "ravendb",
            Self::Oracle => "oracle",
            Self::AsString => "as-string",
            Self::AsBinary => "as-binary",
            Self::AtEnd => "at-end",
        }
    }
}

impl fmt::Display for Optimization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Optimization {
    type Err = Error;

    /// Parses a kebab-case name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownOptimization(s.to_owned()))
    }
}
