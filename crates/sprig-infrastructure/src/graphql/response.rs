use serde::Deserialize;

/// Standard GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<D> {
    pub data: Option<D>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
}

impl<D> GraphqlResponse<D> {
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
