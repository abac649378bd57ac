//! Build option identifiers, kinds and values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Identifier of a recognized build option.
///
/// Serialized with the option's on-the-wire name (`BUILD_SHARED_LIBS`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagId {
    BuildSharedLibs,
    BuildCodec,
    BuildMj2,
    BuildJpwl,
    BuildJp3d,
    BuildIndexerJpip,
    BuildDoc,
    BuildTesting,
    CmakeInstallPrefix,
    CmakeOsxArchitectures,
    CmakeBuildType,
    Jpeg2000ConformanceDataRoot,
    WithJpwl,
    WithJp3d,
}

impl FlagId {
    /// Every flag, in registry order.
    pub const ALL: [FlagId; 14] = [
        FlagId::BuildSharedLibs,
        FlagId::BuildCodec,
        FlagId::BuildMj2,
        FlagId::BuildJpwl,
        FlagId::BuildJp3d,
        FlagId::BuildIndexerJpip,
        FlagId::BuildDoc,
        FlagId::BuildTesting,
        FlagId::CmakeInstallPrefix,
        FlagId::CmakeOsxArchitectures,
        FlagId::CmakeBuildType,
        FlagId::Jpeg2000ConformanceDataRoot,
        FlagId::WithJpwl,
        FlagId::WithJp3d,
    ];

    /// The option name as written in `-D` or `FLAG=VALUE` form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagId::BuildSharedLibs => "BUILD_SHARED_LIBS",
            FlagId::BuildCodec => "BUILD_CODEC",
            FlagId::BuildMj2 => "BUILD_MJ2",
            FlagId::BuildJpwl => "BUILD_JPWL",
            FlagId::BuildJp3d => "BUILD_JP3D",
            FlagId::BuildIndexerJpip => "BUILD_INDEXER_JPIP",
            FlagId::BuildDoc => "BUILD_DOC",
            FlagId::BuildTesting => "BUILD_TESTING",
            FlagId::CmakeInstallPrefix => "CMAKE_INSTALL_PREFIX",
            FlagId::CmakeOsxArchitectures => "CMAKE_OSX_ARCHITECTURES",
            FlagId::CmakeBuildType => "CMAKE_BUILD_TYPE",
            FlagId::Jpeg2000ConformanceDataRoot => "JPEG2000_CONFORMANCE_DATA_ROOT",
            FlagId::WithJpwl => "WITH_JPWL",
            FlagId::WithJp3d => "WITH_JP3D",
        }
    }

    /// Look up a flag by its exact name.
    pub fn from_name(name: &str) -> Option<FlagId> {
        FlagId::ALL.into_iter().find(|id| id.as_str() == name)
    }
}

impl std::fmt::Display for FlagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The type constraint a flag's value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Boolean,
    Path,
    /// One of a fixed set of canonical spellings
    Enum(&'static [&'static str]),
    String,
}

impl FlagKind {
    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            FlagKind::Boolean => "boolean",
            FlagKind::Path => "path",
            FlagKind::Enum(_) => "enum",
            FlagKind::String => "string",
        }
    }

    /// The CMake cache type used in `-DNAME:TYPE=value`.
    pub fn cmake_type(&self) -> &'static str {
        match self {
            FlagKind::Boolean => "BOOL",
            FlagKind::Path => "PATH",
            FlagKind::Enum(_) | FlagKind::String => "STRING",
        }
    }

    /// Coerce a raw override into a typed value for this kind.
    ///
    /// Returns `None` when the value cannot satisfy the kind.
    pub fn coerce(&self, raw: &OverrideValue) -> Option<FlagValue> {
        match (self, raw) {
            (FlagKind::Boolean, OverrideValue::Bool(b)) => Some(FlagValue::Bool(*b)),
            (FlagKind::Boolean, OverrideValue::Text(s)) => parse_bool(s).map(FlagValue::Bool),
            (FlagKind::Path, OverrideValue::Text(s)) => Some(FlagValue::Path(PathBuf::from(s))),
            (FlagKind::Enum(choices), OverrideValue::Text(s)) => choices
                .iter()
                .find(|choice| choice.eq_ignore_ascii_case(s))
                .map(|choice| FlagValue::Enum(choice.to_string())),
            (FlagKind::String, OverrideValue::Text(s)) => Some(FlagValue::Str(s.clone())),
            _ => None,
        }
    }
}

/// Parse a CMake-style boolean.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_uppercase().as_str() {
        "ON" | "TRUE" | "YES" | "Y" | "1" => Some(true),
        "OFF" | "FALSE" | "NO" | "N" | "0" => Some(false),
        _ => None,
    }
}

/// A typed, resolved flag value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Path(PathBuf),
    Enum(String),
    Str(String),
}

impl FlagValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            FlagValue::Path(p) => Some(p),
            _ => None,
        }
    }

    /// String form for enum and string values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FlagValue::Enum(s) | FlagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value the way CMake expects it after `=`.
    pub fn render(&self) -> String {
        match self {
            FlagValue::Bool(true) => "ON".to_string(),
            FlagValue::Bool(false) => "OFF".to_string(),
            FlagValue::Path(p) => p.display().to_string(),
            FlagValue::Enum(s) | FlagValue::Str(s) => s.clone(),
        }
    }

    /// Convert back into the raw form accepted by the resolver.
    pub fn to_override(&self) -> OverrideValue {
        match self {
            FlagValue::Bool(b) => OverrideValue::Bool(*b),
            FlagValue::Path(p) => OverrideValue::Text(p.display().to_string()),
            FlagValue::Enum(s) | FlagValue::Str(s) => OverrideValue::Text(s.clone()),
        }
    }
}

impl std::fmt::Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// An untyped user-supplied value, as read from the command line or a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverrideValue {
    Bool(bool),
    Text(String),
}

impl OverrideValue {
    /// Short description of the value's shape for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            OverrideValue::Bool(b) => format!("boolean `{}`", b),
            OverrideValue::Text(s) => format!("`{}`", s),
        }
    }
}

impl From<bool> for OverrideValue {
    fn from(b: bool) -> Self {
        OverrideValue::Bool(b)
    }
}

impl From<&str> for OverrideValue {
    fn from(s: &str) -> Self {
        OverrideValue::Text(s.to_string())
    }
}

impl From<String> for OverrideValue {
    fn from(s: String) -> Self {
        OverrideValue::Text(s)
    }
}

impl From<&Path> for OverrideValue {
    fn from(p: &Path) -> Self {
        OverrideValue::Text(p.display().to_string())
    }
}

/// A registered build option.
#[derive(Debug, Clone)]
pub struct Flag {
    pub id: FlagId,
    pub kind: FlagKind,
    /// `None` means the flag is unset by default
    pub default: Option<FlagValue>,
    pub description: &'static str,
}

impl Flag {
    /// The flag's name.
    pub fn name(&self) -> &'static str {
        self.id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_names_roundtrip() {
        for id in FlagId::ALL {
            assert_eq!(FlagId::from_name(id.as_str()), Some(id));
        }
        assert_eq!(FlagId::from_name("build_codec"), None);
    }

    #[test]
    fn test_serde_name_matches_display() {
        let json = serde_json::to_string(&FlagId::Jpeg2000ConformanceDataRoot).unwrap();
        assert_eq!(json, "\"JPEG2000_CONFORMANCE_DATA_ROOT\"");
        let json = serde_json::to_string(&FlagId::BuildJp3d).unwrap();
        assert_eq!(json, "\"BUILD_JP3D\"");
    }

    #[test]
    fn test_coerce_boolean_spellings() {
        let kind = FlagKind::Boolean;
        assert_eq!(kind.coerce(&"on".into()), Some(FlagValue::Bool(true)));
        assert_eq!(kind.coerce(&"FALSE".into()), Some(FlagValue::Bool(false)));
        assert_eq!(kind.coerce(&true.into()), Some(FlagValue::Bool(true)));
        assert_eq!(kind.coerce(&"maybe".into()), None);
    }

    #[test]
    fn test_coerce_rejects_bool_for_path() {
        assert_eq!(FlagKind::Path.coerce(&true.into()), None);
        assert_eq!(
            FlagKind::Path.coerce(&"/opt/data".into()),
            Some(FlagValue::Path(PathBuf::from("/opt/data")))
        );
    }

    #[test]
    fn test_coerce_enum_normalizes_case() {
        let kind = FlagKind::Enum(&["Debug", "Release"]);
        assert_eq!(
            kind.coerce(&"release".into()),
            Some(FlagValue::Enum("Release".to_string()))
        );
        assert_eq!(kind.coerce(&"Fast".into()), None);
    }

    #[test]
    fn test_render_cmake_bool() {
        assert_eq!(FlagValue::Bool(true).render(), "ON");
        assert_eq!(FlagValue::Bool(false).render(), "OFF");
    }
}
