#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("subscription {id} has an invalid due date: {value:?}")]
    InvalidDate { id: String, value: String },
    #[error("viewport must be finite and positive, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, EngineError>;
