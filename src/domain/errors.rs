use teloxide::RequestError;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum HandlerError {
    #[display("malformed update: {_0}")]
    MalformedInput(MalformedInputError),
    #[display("couldn't render the greeting: {_0}")]
    Rendering(tinytemplate::error::Error),
    #[display("couldn't send the reply: {_0}")]
    Downstream(RequestError),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum MalformedInputError {
    #[display("the event has no body")]
    MissingBody,
    #[display("the body is not valid UTF-8: {_0}")]
    Encoding(std::str::Utf8Error),
    #[display("{_0}")]
    Json(serde_json::Error),
}

impl From<serde_json::Error> for HandlerError {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedInput(MalformedInputError::Json(value))
    }
}

impl From<std::str::Utf8Error> for HandlerError {
    fn from(value: std::str::Utf8Error) -> Self {
        Self::MalformedInput(MalformedInputError::Encoding(value))
    }
}

impl HandlerError {
    /// A short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::MalformedInput(_) => "malformed_input",
            HandlerError::Rendering(_) => "rendering",
            HandlerError::Downstream(_) => "downstream",
        }
    }
}
