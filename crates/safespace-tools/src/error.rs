//! Error Types for the emergency dialer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DialerError>;

#[derive(Error, Debug)]
pub enum DialerError {
    #[error("Emergency dialer not configured: {0}")]
    NotConfigured(String),
    
    #[error("Call rejected with status {status}: {message}")]
    Rejected {
        status: u16,
        message: String,
    },
    
    #[error("Unreadable call receipt: {0}")]
    InvalidReceipt(String),
    
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
