/// Error type for thermostat operations.
///
/// None of these are fatal: every failure path leaves the control state
/// untouched and is surfaced to the user as a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed user input (empty location query, bad "HH:MM" string,
    /// unknown schedule entry id).
    InvalidInput(String),
    /// The weather collaborator rejected the request.
    FetchFailed(String),
    /// The operation's precondition does not hold (simulation start while
    /// already at target, manual adjustment while readings are externally
    /// supplied, ...). Rejected synchronously, no state change.
    Precondition(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            EngineError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            EngineError::FetchFailed(msg) => write!(f, "Weather fetch failed: {}", msg),
            EngineError::Precondition(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
