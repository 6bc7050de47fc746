//! Free-text keywords, declared either as one string or as a list.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Keywords {
    /// `keywords = "fastapi sqlalchemy"`
    Text(String),
    /// `keywords = ["fastapi", "sqlalchemy"]`
    List(Vec<String>),
}

impl Keywords {
    /// Individual keywords. Free text is split on whitespace and commas.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Keywords::Text(text) => Box::new(
                text.split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|k| !k.is_empty()),
            ),
            Keywords::List(list) => Box::new(
                list.iter()
                    .map(|k| k.trim())
                    .filter(|k| !k.is_empty()),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_text_split() {
        let kw = Keywords::Text("fastapi  sqlalchemy,web".to_string());
        assert_eq!(kw.iter().collect::<Vec<_>>(), vec!["fastapi", "sqlalchemy", "web"]);
        assert!(!kw.is_empty());
    }

    #[test]
    fn test_keywords_list() {
        let kw = Keywords::List(vec!["fastapi".to_string(), " ".to_string()]);
        assert_eq!(kw.iter().collect::<Vec<_>>(), vec!["fastapi"]);
        assert!(Keywords::List(vec![]).is_empty());
        assert!(Keywords::Text(" , ".to_string()).is_empty());
    }

    #[test]
    fn test_keywords_deserialize_both_forms() {
        let text: Keywords = serde_json::from_str(r#""fastapi sqlalchemy""#).unwrap();
        assert_eq!(text, Keywords::Text("fastapi sqlalchemy".to_string()));

        let list: Keywords = serde_json::from_str(r#"["fastapi", "sqlalchemy"]"#).unwrap();
        assert_eq!(
            list,
            Keywords::List(vec!["fastapi".to_string(), "sqlalchemy".to_string()])
        );

        // Declared form is preserved on the way out
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""fastapi sqlalchemy""#);
    }
}
