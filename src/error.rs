use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoduinoError {
    #[error("Communication error: {0}")]
    Communication(String),

    #[error("Unable to connect to IOduino at ports {0}")]
    Discovery(String),

    #[error("Unable to connect to IOduino at port {port}: {source}")]
    Connect {
        port: String,
        #[source]
        source: Box<IoduinoError>,
    },

    #[error("Argument out of range: {0}")]
    ArgumentOutOfRange(String),

    #[error("No acknowledgment from IOduino: {0}")]
    Acknowledgment(String),

    #[error("Invalid response from IOduino: {0}")]
    InvalidValue(String),

    #[error("Timed out waiting for IOduino: {0}")]
    Timeout(String),

    #[error("Session is not connected to an IOduino")]
    NotConnected,
}

pub type IoduinoResult<T> = std::result::Result<T, IoduinoError>;
