use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A command understood by the server: an ordered sequence of command tokens
/// plus a tagged parameter map.  Pagination parameters are appended by the
/// transport layer, not here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerCommand {
    pub cmd: Vec<String>,
    pub params: Map<String, Value>,
}

impl ServerCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append command tokens.
    pub fn cmd(mut self, tokens: &[&str]) -> Self {
        self.cmd.extend(tokens.iter().map(|t| t.to_string()));
        self
    }

    /// Set a single parameter.
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Merge a parameter map, overwriting existing keys.
    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.params.extend(params);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_appends_tokens_and_params() {
        let command = ServerCommand::new()
            .cmd(&["playlists", "tracks"])
            .param("playlist_id", "7")
            .param("tags", "cu");
        assert_eq!(command.cmd, vec!["playlists", "tracks"]);
        assert_eq!(command.params.get("playlist_id"), Some(&Value::from("7")));
        assert_eq!(command.params.get("tags"), Some(&Value::from("cu")));
    }

    #[test]
    fn later_params_overwrite_earlier() {
        let command = ServerCommand::new().param("tags", "a").param("tags", "b");
        assert_eq!(command.params.get("tags"), Some(&Value::from("b")));
    }
}
