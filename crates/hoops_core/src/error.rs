use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Missing column '{column}' in {file}")]
    MissingColumn { column: String, file: String },

    #[error("Parse error at row {row}, column '{column}': '{value}'")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Empty selection: {0}")]
    EmptySelection(String),

    #[error("No season found for {player} in {year}")]
    PlayerSeasonNotFound { player: String, year: i32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl CoreError {
    /// Whether the failure comes from the input files rather than the analysis.
    pub fn is_input_error(&self) -> bool {
        match self {
            CoreError::Io(_) => true,
            CoreError::Csv(_) => true,
            CoreError::FileNotFound { .. } => true,
            CoreError::MissingColumn { .. } => true,
            CoreError::Parse { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
