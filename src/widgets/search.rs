use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    Yahoo,
}

impl SearchEngine {
    fn base_url(self) -> &'static str {
        match self {
            SearchEngine::Google => "https://www.google.com/search?q=",
            SearchEngine::Yahoo => "https://search.yahoo.com/search?p=",
        }
    }
}

impl FromStr for SearchEngine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(SearchEngine::Google),
            "yahoo" => Ok(SearchEngine::Yahoo),
            other => anyhow::bail!("unknown search engine `{other}`"),
        }
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchEngine::Google => write!(f, "google"),
            SearchEngine::Yahoo => write!(f, "yahoo"),
        }
    }
}

/// Build the results URL for `query`, or `None` when the query is blank.
pub fn search_url(engine: SearchEngine, query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Some(format!("{}{}", engine.base_url(), urlencoding::encode(query)))
}
