use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TASK_TYPE_AUTHENTICATION: &str = "authentication";
pub const TASK_TYPE_IMAGE_INFERENCE: &str = "imageInference";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    #[default]
    Webp,
    Png,
    Jpg,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Webp => "WEBP",
            OutputFormat::Png => "PNG",
            OutputFormat::Jpg => "JPG",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WEBP" => Ok(OutputFormat::Webp),
            "PNG" => Ok(OutputFormat::Png),
            "JPG" | "JPEG" => Ok(OutputFormat::Jpg),
            other => Err(format!("unsupported output format: {}", other)),
        }
    }
}
