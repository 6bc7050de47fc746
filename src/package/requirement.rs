//! Dependency specifiers (`name[extras] constraint ; marker` and `name @ url`).

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A runtime dependency as declared in `install_requires`.
///
/// Format: `"name"`, `"name[extra1,extra2]"`, `"name>=1.4,<2"`,
/// `"name (>=1.4)"` or a direct reference `"name @ https://..."`, any of
/// them optionally followed by `"; <environment marker>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    /// Version constraint with all whitespace removed (e.g. `>=1.4,<2`)
    pub constraint: Option<String>,
    /// Direct reference (`name @ url`); never set together with `constraint`
    pub url: Option<String>,
    pub marker: Option<String>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

fn parse_marker(marker: &str) -> Result<String> {
    let marker = marker.trim();
    if marker.is_empty() {
        return Err(anyhow!("environment marker after ';' cannot be empty"));
    }
    Ok(marker.to_string())
}

impl FromStr for Requirement {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        let name_end = spec.find(|c: char| !is_name_char(c)).unwrap_or(spec.len());
        let name = &spec[..name_end];
        if name.is_empty() {
            return Err(anyhow!("package name cannot be empty"));
        }

        let mut rest = spec[name_end..].trim_start();
        let mut extras = Vec::new();
        if let Some(after_bracket) = rest.strip_prefix('[') {
            let close = after_bracket
                .find(']')
                .ok_or_else(|| anyhow!("unterminated extras list"))?;
            for extra in after_bracket[..close].split(',') {
                let extra = extra.trim();
                if extra.is_empty() || !extra.chars().all(is_name_char) {
                    return Err(anyhow!("invalid extra name '{}'", extra));
                }
                extras.push(extra.to_string());
            }
            rest = after_bracket[close + 1..].trim_start();
        }

        if let Some(reference) = rest.strip_prefix('@') {
            // A ';' only starts the marker when whitespace precedes it, URLs may contain ';'
            let marker_at = reference
                .match_indices(';')
                .map(|(i, _)| i)
                .find(|&i| reference[..i].ends_with(char::is_whitespace));
            let (url, marker) = match marker_at {
                Some(i) => (reference[..i].trim(), Some(parse_marker(&reference[i + 1..])?)),
                None => (reference.trim(), None),
            };
            if url.is_empty() || url.contains(char::is_whitespace) || !url.contains(':') {
                return Err(anyhow!("invalid direct reference URL '{}'", url));
            }
            return Ok(Requirement {
                name: name.to_string(),
                extras,
                constraint: None,
                url: Some(url.to_string()),
                marker,
            });
        }

        let (version, marker) = match rest.split_once(';') {
            Some((version, marker)) => (version.trim(), Some(parse_marker(marker)?)),
            None => (rest.trim(), None),
        };

        let version = match version.strip_prefix('(') {
            Some(inner) => inner
                .strip_suffix(')')
                .ok_or_else(|| anyhow!("unterminated version constraint '{}'", version))?,
            None => version,
        };

        let constraint: String = version.split_whitespace().collect();
        let constraint = if constraint.is_empty() {
            None
        } else {
            if !constraint.starts_with(['<', '>', '=', '!', '~']) {
                return Err(anyhow!("unexpected text '{}' after package name", version));
            }
            Some(constraint)
        };

        Ok(Requirement {
            name: name.to_string(),
            extras,
            constraint,
            url: None,
            marker,
        })
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        if let Some(ref url) = self.url {
            write!(f, " @ {}", url)?;
            if let Some(ref m) = self.marker {
                write!(f, " ; {}", m)?;
            }
            return Ok(());
        }
        if let Some(ref c) = self.constraint {
            write!(f, "{}", c)?;
        }
        if let Some(ref m) = self.marker {
            write!(f, "; {}", m)?;
        }
        Ok(())
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Requirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_name() {
        let req: Requirement = "sqlalchemy".parse().unwrap();
        assert_eq!(req.name, "sqlalchemy");
        assert!(req.extras.is_empty());
        assert_eq!(req.constraint, None);
        assert_eq!(req.url, None);
        assert_eq!(req.marker, None);
    }

    #[test]
    fn test_parse_with_extras() {
        let req: Requirement = "fastapi[all]".parse().unwrap();
        assert_eq!(req.name, "fastapi");
        assert_eq!(req.extras, vec!["all"]);
        assert_eq!(req.to_string(), "fastapi[all]");
    }

    #[test]
    fn test_parse_constraint_and_marker() {
        let req: Requirement = "uvicorn [standard, dev] >= 0.20 , < 1 ; python_version >= '3.8'"
            .parse()
            .unwrap();
        assert_eq!(req.name, "uvicorn");
        assert_eq!(req.extras, vec!["standard", "dev"]);
        assert_eq!(req.constraint.as_deref(), Some(">=0.20,<1"));
        assert_eq!(req.marker.as_deref(), Some("python_version >= '3.8'"));
        assert_eq!(
            req.to_string(),
            "uvicorn[standard,dev]>=0.20,<1; python_version >= '3.8'"
        );
    }

    #[test]
    fn test_parse_parenthesised_constraint() {
        let req: Requirement = "sqlalchemy (>=1.4, <3)".parse().unwrap();
        assert_eq!(req.name, "sqlalchemy");
        assert_eq!(req.constraint.as_deref(), Some(">=1.4,<3"));
        assert_eq!(req.to_string(), "sqlalchemy>=1.4,<3");

        assert!("sqlalchemy (>=1.4".parse::<Requirement>().is_err());
    }

    #[test]
    fn test_parse_direct_reference() {
        let req: Requirement = "mylib[db] @ https://example.com/mylib-1.0.whl;v=2 ; os_name == 'posix'"
            .parse()
            .unwrap();
        assert_eq!(req.name, "mylib");
        assert_eq!(req.extras, vec!["db"]);
        assert_eq!(req.constraint, None);
        assert_eq!(req.url.as_deref(), Some("https://example.com/mylib-1.0.whl;v=2"));
        assert_eq!(req.marker.as_deref(), Some("os_name == 'posix'"));
        assert_eq!(
            req.to_string(),
            "mylib[db] @ https://example.com/mylib-1.0.whl;v=2 ; os_name == 'posix'"
        );

        let again: Requirement = req.to_string().parse().unwrap();
        assert_eq!(again, req);

        let plain: Requirement = "pkg@file:///tmp/pkg.tar.gz".parse().unwrap();
        assert_eq!(plain.url.as_deref(), Some("file:///tmp/pkg.tar.gz"));
        assert_eq!(plain.marker, None);
    }

    #[test]
    fn test_parse_direct_reference_invalid() {
        assert!("pkg @".parse::<Requirement>().is_err());
        assert!("pkg @ not a url".parse::<Requirement>().is_err());
        assert!("pkg @ https://example.com/p.whl ;".parse::<Requirement>().is_err());
    }

    #[test]
    fn test_display_reparses_to_same_value() {
        let req: Requirement = "pydantic ~= 2.0".parse().unwrap();
        let again: Requirement = req.to_string().parse().unwrap();
        assert_eq!(req, again);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<Requirement>().is_err());
        assert!("   ".parse::<Requirement>().is_err());
        assert!(">=1.0".parse::<Requirement>().is_err());
        assert!("fastapi[all".parse::<Requirement>().is_err());
        assert!("fastapi[]".parse::<Requirement>().is_err());
        assert!("fastapi;".parse::<Requirement>().is_err());
        assert!("fastapi latest".parse::<Requirement>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let req: Requirement = "fastapi[all]".parse().unwrap();
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#""fastapi[all]""#);

        let back: Requirement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);

        assert!(serde_json::from_str::<Requirement>(r#""[x]""#).is_err());
    }
}
