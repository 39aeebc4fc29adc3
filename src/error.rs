use std::error::Error;
use std::fmt::{Debug, Display, Error as FmtError, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    BadStatus,
    Parse,
    Transport,
    UnsupportedMedia,
    OsIntegration,
    Config,
    Io,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        let s = match *self {
            ErrorKind::BadStatus => "Bad Status",
            ErrorKind::Parse => "Parse Error",
            ErrorKind::Transport => "Transport Error",
            ErrorKind::UnsupportedMedia => "Unsupported Media",
            ErrorKind::OsIntegration => "OS Integration Error",
            ErrorKind::Config => "Config Error",
            ErrorKind::Io => "IO Error",
        };
        write!(f, "{}", s)
    }
}

pub struct AppErr {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn Error + 'static>>,
}

impl AppErr {
    pub fn new(kind: ErrorKind, message: &str) -> AppErr {
        AppErr {
            kind,
            message: format!("[{}] {}", kind, message),
            source: None,
        }
    }

    pub fn with_source<E>(kind: ErrorKind, message: &str, error: E) -> AppErr
    where
        E: Error + 'static,
    {
        AppErr {
            kind,
            message: format!("[{}] {}: {}", kind, message, error),
            source: Some(Box::new(error)),
        }
    }

    fn from_err<E>(kind: ErrorKind, error: E) -> AppErr
    where
        E: Error + 'static,
    {
        AppErr {
            kind,
            message: format!("[{}] {}", kind, error),
            source: Some(Box::new(error)),
        }
    }

    pub fn bad_status(status: u16) -> AppErr {
        AppErr::new(ErrorKind::BadStatus, &format!("Status code: {}", status))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for AppErr {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        write!(f, "{}", self.message)
    }
}

impl Debug for AppErr {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        Display::fmt(self, f)
    }
}

impl Error for AppErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.source {
            Some(ref err) => Some(err.as_ref()),
            None => None,
        }
    }
}

macro_rules! impl_from_error {
    ($type:ty, $kind:expr) => {
        impl From<$type> for AppErr {
            fn from(err: $type) -> Self {
                AppErr::from_err($kind, err)
            }
        }
    };
}

// Error conversions
impl_from_error!(std::io::Error, ErrorKind::Io);
impl_from_error!(tempfile::PersistError, ErrorKind::Io);
impl_from_error!(reqwest::Error, ErrorKind::Transport);
impl_from_error!(serde_json::Error, ErrorKind::Parse);
