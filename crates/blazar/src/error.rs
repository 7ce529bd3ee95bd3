#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{message}")]
    Client { message: String, code: u16 },
    #[error("{0}")]
    NoUniqueMatch(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    UnsupportedVersion(String),
    #[error("{0}")]
    IncorrectLease(String),
    #[error("{0}")]
    DuplicatedLeaseParameters(String),
    #[error("{0}")]
    IncorrectNetwork(String),
    #[error("the passed arguments are insufficient for authentication: an endpoint and an auth token are required")]
    InsufficientAuthInformation,
    #[error("the resource property '{0}' does not exist")]
    ResourcePropertyNotFound(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("http transport issue encountered: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("json issue encountered: {0}")]
    Json(#[from] serde_json::Error),
    #[error("url issue encountered: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    pub fn client<M: Into<String>>(message: M) -> Error {
        Error::Client {
            message: message.into(),
            code: 500,
        }
    }

    pub fn incorrect_lease() -> Error {
        Error::IncorrectLease("The lease parameters are incorrect.".to_string())
    }

    /// HTTP-like status code carried by every error kind.
    pub fn code(&self) -> u16 {
        match self {
            Error::Client { code, .. } => *code,
            Error::NoUniqueMatch(_) => 409,
            Error::NotFound(_) => 404,
            Error::UnsupportedVersion(_) => 406,
            Error::IncorrectLease(_) => 409,
            Error::DuplicatedLeaseParameters(_) => 400,
            Error::IncorrectNetwork(_) => 409,
            Error::InsufficientAuthInformation => 400,
            Error::ResourcePropertyNotFound(_) => 404,
            Error::InvalidArgument(_) => 400,
            Error::Transport(error) => error.status().map(|x| x.as_u16()).unwrap_or(500),
            Error::Json(_) | Error::Url(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
