#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{found} data points are not enough to estimate the model, at least {required} required")]
    NotEnoughDataPoints { found: usize, required: usize },
    #[error("data points are ill-defined: they do not span the space the model needs")]
    IllDefinedDataPoints,
    #[error("model is not invertible")]
    NoninvertibleModel,
}

pub type Result<T> = std::result::Result<T, Error>;
