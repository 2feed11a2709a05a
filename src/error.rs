use thiserror::Error;

pub type RangeGraphResult<T> = Result<T, RangeGraphError>;

#[derive(Error, Debug)]
pub enum RangeGraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The uploaded bytes are not a readable workbook. Fatal for the whole run.
    #[error("Failed to load workbook: {0}")]
    WorkbookLoad(String),

    /// One destination of a defined name could not be read.
    #[error("Cannot resolve {sheet}!{address}: {reason}")]
    DestinationResolution {
        sheet: String,
        address: String,
        reason: String,
    },

    #[error("Invalid cell address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The optional text-generation collaborator failed or timed out.
    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Unknown named reference: {0}")]
    UnknownReference(String),
}

impl RangeGraphError {
    /// Builds a destination error for `sheet!address`.
    pub fn destination(
        sheet: impl Into<String>,
        address: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DestinationResolution {
            sheet: sheet.into(),
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Visible stand-in for a table cell whose collaborator call failed.
    pub fn placeholder(&self) -> String {
        match self {
            Self::ExternalService(msg) => format!("(Error: {})", msg),
            other => format!("(Error: {})", other),
        }
    }
}
