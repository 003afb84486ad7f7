//! Current date and time tool.

use async_trait::async_trait;
use chrono::Local;

use crate::error::ToolError;
use crate::tool::Tool;

/// Report the current local date and time with timezone offset.
#[derive(Debug, Default)]
pub struct CurrentDateTimeTool;

impl CurrentDateTimeTool {
    /// Stateless tool.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for CurrentDateTimeTool {
    fn name(&self) -> &str {
        "current_datetime"
    }

    fn description(&self) -> &str {
        "Get the current exact date and time, including the local timezone offset.\n\
         Input is ignored and may be empty. Output states the current date \
         and time as 'YYYY-MM-DD HH:MM:SS+ZZ:ZZ'."
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S%:z");
        Ok(format!("Current date and time is: {now}"))
    }
}
