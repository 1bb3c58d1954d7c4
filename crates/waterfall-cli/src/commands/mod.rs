pub mod scenarios;
pub mod validate;
pub mod waterfall;

use serde::de::DeserializeOwned;

use crate::input;

/// Load a command's input from `--input`, falling back to piped stdin.
pub fn load_input<T: DeserializeOwned>(
    path: Option<&str>,
    command: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::file::read_input(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err(format!("--input <file.json|file.yaml> or stdin required for {command}").into())
    }
}
