use serde::{Deserialize, Serialize};

/// Launch parameters of a new session. Both are kept raw so that bad values
/// can fall back to defaults instead of failing extraction.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LaunchParams {
    pub rounds: Option<String>,
    pub area: Option<String>,
}
