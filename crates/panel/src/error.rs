use thiserror::Error;

pub type Result<T> = std::result::Result<T, PanelError>;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Invalid panel options: {0}")]
    InvalidConfig(String),
}
