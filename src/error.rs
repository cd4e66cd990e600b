use core::fmt;
use std::io;
use std::process::{ExitCode, Termination};

use log::error;

#[derive(Debug)]
pub enum NoiseError {
    /// Rejected user input (thread count, buffer size, seed, design parameters).
    Config(String),
    /// The filter worker pool could not be started.
    ThreadPool(String),
    /// The sample sink or an input file failed.
    Io(io::Error),
    Message(String),
}

impl fmt::Display for NoiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            NoiseError::ThreadPool(msg) => {
                write!(f, "Failed to start filter threads: {}", msg)
            }
            NoiseError::Io(err) => write!(f, "I/O error: {}", err),
            NoiseError::Message(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for NoiseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NoiseError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl NoiseError {
    /// True when the sink's reader has gone away, e.g. `noisegen | head -c 1M`.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, NoiseError::Io(err) if err.kind() == io::ErrorKind::BrokenPipe)
    }
}

pub type NoiseResult<T> = Result<T, NoiseError>;

impl From<io::Error> for NoiseError {
    fn from(err: io::Error) -> Self {
        NoiseError::Io(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for NoiseError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        NoiseError::ThreadPool(err.to_string())
    }
}

// Convert boxed dynamic errors into NoiseError
impl From<Box<dyn std::error::Error>> for NoiseError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        match err.downcast::<NoiseError>() {
            Ok(noise) => *noise,
            Err(other) => NoiseError::Message(other.to_string()),
        }
    }
}

pub struct TermResult(pub NoiseResult<()>);

impl Termination for TermResult {
    fn report(self) -> ExitCode {
        match self.0 {
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                error!("{}", err);
                ExitCode::FAILURE
            }
        }
    }
}
