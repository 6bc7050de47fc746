//! Entry points: `command = module.path:callable` declarations.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// The importable target of an entry point.
///
/// Format: `"module.path:callable"`, where the callable may itself be a
/// dotted attribute path (`"pkg.cli:App.run"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointTarget {
    pub module: String,
    pub callable: String,
}

impl EntryPointTarget {
    /// Module path split into its components (`"a.b"` -> `["a", "b"]`).
    pub fn module_parts(&self) -> impl Iterator<Item = &str> {
        self.module.split('.')
    }
}

/// Whether `s` can name a single module or attribute component.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

pub(crate) fn is_dotted_path(s: &str) -> bool {
    s.split('.').all(is_identifier)
}

impl std::fmt::Display for EntryPointTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.module, self.callable)
    }
}

impl FromStr for EntryPointTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module, callable) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| anyhow!("target '{}' must have the form 'module:callable'", s.trim()))?;
        let (module, callable) = (module.trim(), callable.trim());

        if !is_dotted_path(module) {
            return Err(anyhow!("'{}' is not a valid module path", module));
        }
        if !is_dotted_path(callable) {
            return Err(anyhow!("'{}' is not a valid callable name", callable));
        }

        Ok(EntryPointTarget {
            module: module.to_string(),
            callable: callable.to_string(),
        })
    }
}

/// A named command bound to an importable target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub command: String,
    pub target: EntryPointTarget,
}

impl std::fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.command, self.target)
    }
}

impl FromStr for EntryPoint {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (command, target) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected 'command = module:callable'"))?;
        let command = command.trim();

        if command.is_empty() {
            return Err(anyhow!("command name cannot be empty"));
        }
        if command.chars().any(char::is_whitespace) {
            return Err(anyhow!("command name '{}' cannot contain whitespace", command));
        }

        let target = target.parse::<EntryPointTarget>()?;
        Ok(EntryPoint {
            command: command.to_string(),
            target,
        })
    }
}

impl Serialize for EntryPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntryPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_point() {
        let ep: EntryPoint = "start-app = main:app".parse().unwrap();
        assert_eq!(ep.command, "start-app");
        assert_eq!(ep.target.module, "main");
        assert_eq!(ep.target.callable, "app");
        assert_eq!(ep.to_string(), "start-app = main:app");
    }

    #[test]
    fn test_parse_entry_point_without_spaces() {
        let ep: EntryPoint = "serve=app.cli:Server.run".parse().unwrap();
        assert_eq!(ep.command, "serve");
        assert_eq!(ep.target.module, "app.cli");
        assert_eq!(ep.target.callable, "Server.run");
        assert_eq!(ep.target.module_parts().collect::<Vec<_>>(), vec!["app", "cli"]);
        assert_eq!(ep.to_string(), "serve = app.cli:Server.run");
    }

    #[test]
    fn test_parse_entry_point_invalid() {
        // No '='
        assert!("start-app main:app".parse::<EntryPoint>().is_err());
        // Empty command
        assert!(" = main:app".parse::<EntryPoint>().is_err());
        // Command with whitespace
        assert!("start app = main:app".parse::<EntryPoint>().is_err());
        // Missing callable
        assert!("start-app = main".parse::<EntryPoint>().is_err());
        assert!("start-app = main:".parse::<EntryPoint>().is_err());
        // Missing module
        assert!("start-app = :app".parse::<EntryPoint>().is_err());
        // Not identifiers
        assert!("start-app = main-mod:app".parse::<EntryPoint>().is_err());
        assert!("start-app = main..x:app".parse::<EntryPoint>().is_err());
        assert!("start-app = 1main:app".parse::<EntryPoint>().is_err());
        // Extra '=' ends up in the target
        assert!("a = b = main:app".parse::<EntryPoint>().is_err());
    }

    #[test]
    fn test_entry_point_serde_as_string() {
        let ep: EntryPoint = "start-app=main:app".parse().unwrap();
        let json = serde_json::to_string(&ep).unwrap();
        assert_eq!(json, r#""start-app = main:app""#);

        let back: EntryPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ep);
    }
}
