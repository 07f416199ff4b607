use std::error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    /// reading the input records failed
    Io(io::Error),
    /// a worker thread could not be started
    Spawn(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "failed to read input: {}", e),
            Error::Spawn(e) => write!(f, "failed to spawn worker: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(e) | Error::Spawn(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
