use thiserror::Error;

#[derive(Error,Debug)]
pub enum Error {
    #[error("IO error")]
    IoError(#[from] std::io::Error),

    #[error("'{0:}' is not a VCD document: no timescale found")]
    NotVcd(String),

    #[error("Named signal '{0:}' not found")]
    NotFound(String),

    #[error("Radix {0:} is not supported, expected one of 2, 10 or 16")]
    InvalidRadix(u32),

    #[error("The given text '{0:}' can not be interpreted as a value in radix {1:}.")]
    InvalidValue(String, u32),

    #[error("The given text '{0:}' can not be interpreted as time.")]
    InvalidTime(String),

    #[error("Unknown display format '{0:}'")]
    UnknownFormat(String),

    #[error("Index {0:} is out of range for {1:} elements")]
    IndexOutOfRange(usize, usize),

    #[error("Failed to set up logging")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;
