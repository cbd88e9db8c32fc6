//! Dependency rule registry.
//!
//! A rule tells the generator how to provision one dependency identifier.
//! Rules are plain data in a static table ([`table::RULES`]); the emission
//! logic in [`emit`] interprets each [`RuleKind`] against a [`CMakeFile`].
//! Keeping the table as data means it can be inspected and validated
//! without emitting anything.
//!
//! [`CMakeFile`]: crate::cmake::CMakeFile

pub mod emit;
pub mod table;

use thiserror::Error;
use url::Url;

pub use table::RULES;

/// A rule that cannot be interpreted.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid URL `{url}`")]
    InvalidUrl {
        url: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("URL `{0}` does not end with a file name")]
    NoFileName(&'static str),

    #[error("`{0}` is not a SHA256 hex digest")]
    InvalidChecksum(&'static str),
}

/// A file fetched at configure time and verified against a pinned checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Download {
    /// Expected SHA256, lowercase hex
    pub sha256: &'static str,

    /// Source URL
    pub url: &'static str,
}

impl Download {
    /// The last path segment of the URL.
    pub fn file_name(&self) -> Result<String, RuleError> {
        let parsed = Url::parse(self.url).map_err(|source| RuleError::InvalidUrl {
            url: self.url,
            source,
        })?;
        parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or(RuleError::NoFileName(self.url))
    }

    /// Check the checksum format and the URL.
    pub fn validate(&self) -> Result<(), RuleError> {
        let bytes =
            hex::decode(self.sha256).map_err(|_| RuleError::InvalidChecksum(self.sha256))?;
        if bytes.len() != 32 || self.sha256.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(RuleError::InvalidChecksum(self.sha256));
        }
        self.file_name().map(|_| ())
    }
}

/// A library detected by linking a known symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryCheck {
    /// Header that must be includable
    pub header: &'static str,

    /// Library name as passed to the linker
    pub library: &'static str,

    /// Function the library must export
    pub symbol: &'static str,
}

/// A dependency expected to be installed on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemLibrary {
    /// Homebrew prefix searched on macOS when present
    pub homebrew: Option<&'static str>,

    /// Headers and libraries that must be present
    pub checks: &'static [LibraryCheck],
}

/// A library inside a prebuilt archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrebuiltLibrary {
    /// File name below `<arch>/lib`
    pub name: &'static str,

    /// Function used to verify the library links
    pub symbol: &'static str,
}

/// A prebuilt Windows package.
///
/// The archive contains `<prefix>/x86` and `<prefix>/x64`, each with an
/// `include` and a `lib` directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrebuiltPackage {
    /// Short name, used for the architecture variable
    pub name: &'static str,

    /// The archive
    pub archive: Download,

    /// Path inside the archive holding the per-architecture directories
    pub prefix: &'static str,

    /// Header checked after extraction
    pub header: &'static str,

    /// Libraries to verify and link
    pub libs: &'static [PrebuiltLibrary],

    /// Extra preprocessor definitions (e.g. `-DCURL_STATICLIB`)
    pub definitions: &'static [&'static str],
}

/// How a dependency is provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// A header-only library made of one file
    SingleHeader(Download),

    /// A data file, such as a CA bundle
    SingleAsset(Download),

    /// A library already installed on the host
    SystemLibrary(SystemLibrary),

    /// A prebuilt package on Windows, a system library elsewhere
    Prebuilt {
        windows: PrebuiltPackage,
        otherwise: SystemLibrary,
    },

    /// A multi-file archive extracted as-is
    ArchiveBundle(Download),
}

impl RuleKind {
    /// Get the kind name for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::SingleHeader(_) => "single-header",
            RuleKind::SingleAsset(_) => "single-asset",
            RuleKind::SystemLibrary(_) => "system-library",
            RuleKind::Prebuilt { .. } => "prebuilt",
            RuleKind::ArchiveBundle(_) => "archive-bundle",
        }
    }

    /// Every download this rule may perform.
    pub fn downloads(&self) -> Vec<Download> {
        match self {
            RuleKind::SingleHeader(d) | RuleKind::SingleAsset(d) | RuleKind::ArchiveBundle(d) => {
                vec![*d]
            }
            RuleKind::SystemLibrary(_) => Vec::new(),
            RuleKind::Prebuilt { windows, .. } => vec![windows.archive],
        }
    }
}

/// A dependency identifier bound to its provisioning rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Dependency identifier, matched exactly
    pub id: &'static str,

    /// Provisioning rule
    pub kind: RuleKind,

    /// Identifier to use instead, when this one is deprecated
    pub deprecated_by: Option<&'static str>,
}

/// Look up the rule for `id`.
pub fn lookup(id: &str) -> Option<&'static Rule> {
    RULES
        .binary_search_by(|rule| rule.id.cmp(id))
        .ok()
        .map(|index| &RULES[index])
}

/// Known identifiers that look like `id`, for error messages.
pub fn suggest(id: &str) -> Vec<&'static str> {
    let wanted = id.to_lowercase();
    let wanted_tail = wanted.rsplit('/').next().unwrap_or(&wanted).to_string();
    RULES
        .iter()
        .map(|rule| rule.id)
        .filter(|known| {
            let known = known.to_lowercase();
            let known_tail = known.rsplit('/').next().unwrap_or(&known);
            known == wanted || (!wanted_tail.is_empty() && known_tail == wanted_tail)
        })
        .collect()
}
