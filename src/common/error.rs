use std::fmt::{Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum StegError {
    // Analysis input
    EmptyImage,
    EmptyChannelSelection,
    EmptyBitSelection,

    // Per combination
    EmptyCombination,

    // Report output
    ReportWrite(std::io::ErrorKind),
}

impl Display for StegError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let msg = match *self {
            Self::EmptyImage => "Image has no pixels",
            Self::EmptyChannelSelection => "No color channel selected",
            Self::EmptyBitSelection => "No bit position selected",
            Self::EmptyCombination => "Combination has no channels",
            Self::ReportWrite(_) => "Failed to write report",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for StegError {}

impl From<std::io::Error> for StegError {
    fn from(err: std::io::Error) -> Self {
        Self::ReportWrite(err.kind())
    }
}

pub type StegResult<T> = Result<T, StegError>;
