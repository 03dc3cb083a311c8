use reqwest;
use serde::Deserialize;

#[derive(Debug)]
enum HealthcheckError {
    Transport(String),
    Unhealthy,
}

#[derive(Debug, Deserialize)]
struct StatusJSON {
    status: String,
}

impl std::fmt::Display for HealthcheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthcheckError::Transport(e) => write!(f, "Transport error: {}", e),
            HealthcheckError::Unhealthy => write!(f, "Status code != 200 or no healthcheck"),
        }
    }
}

impl From<reqwest::Error> for HealthcheckError {
    fn from(err: reqwest::Error) -> HealthcheckError {
        HealthcheckError::Transport(err.to_string())
    }
}

fn main() -> Result<(), HealthcheckError> {
    let res = reqwest::blocking::get("http://localhost:8000/healthcheck")?;
    if res.status() != 200 {
        return Err(HealthcheckError::Unhealthy);
    }
    let body: StatusJSON = res.json::<StatusJSON>()?;
    if body.status != "ok" {
        return Err(HealthcheckError::Unhealthy);
    }
    Ok(())
}
