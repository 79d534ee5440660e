use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] tillroll_core::InvalidInput),

    #[error(transparent)]
    EmptyReport(#[from] tillroll_core::EmptyReport),

    #[error(transparent)]
    Import(#[from] tillroll_report::ImportError),

    #[error(transparent)]
    Warehouse(#[from] tillroll_warehouse::WarehouseError),

    #[error(transparent)]
    Export(#[from] tillroll_report::ExportError),

    #[error(transparent)]
    Render(#[from] tillroll_report::RenderError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Input(_) => 2,
            Self::EmptyReport(_) => 2,
            Self::Import(_) => 2,
            Self::Warehouse(_) => 3,
            Self::Export(_) => 4,
            Self::Render(_) => 4,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
