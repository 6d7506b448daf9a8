use serde::Serialize;

/// Which workers handle a message. Recomputed for every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "workers", rename_all = "snake_case")]
pub enum RoutingDecision {
    Fallback,
    Single(String),
    Parallel(Vec<String>),
}

impl RoutingDecision {
    /// Parse a classifier answer against the known worker names.
    ///
    /// The answer is upper-cased and split on commas; unknown tokens are
    /// dropped and repeated names keep their first position.
    pub fn parse(answer: &str, known: &[&str]) -> Self {
        let mut selected: Vec<String> = Vec::new();
        for token in answer.trim().to_uppercase().split(',') {
            let token = token.trim().trim_matches(|c: char| c == '"' || c == '\'' || c == '.');
            if token.is_empty() || selected.iter().any(|name| name == token) {
                continue;
            }
            if known.contains(&token) {
                selected.push(token.to_string());
            }
        }

        match selected.len() {
            0 => RoutingDecision::Fallback,
            1 => RoutingDecision::Single(selected.remove(0)),
            _ => RoutingDecision::Parallel(selected),
        }
    }

    pub fn workers(&self) -> Vec<&str> {
        match self {
            RoutingDecision::Fallback => Vec::new(),
            RoutingDecision::Single(name) => vec![name.as_str()],
            RoutingDecision::Parallel(names) => names.iter().map(String::as_str).collect(),
        }
    }
}
