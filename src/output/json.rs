// Tue Jan 13 2026 - Alex

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct JsonWriter {
    pretty_print: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty_print: true }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn to_string<T: Serialize>(&self, value: &T) -> Result<String, OutputError> {
        let json = if self.pretty_print {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        Ok(json)
    }

    pub fn write_to<T: Serialize, W: Write>(&self, value: &T, mut writer: W) -> Result<(), OutputError> {
        let json = self.to_string(value)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_file<T: Serialize, P: AsRef<Path>>(&self, value: &T, path: P) -> Result<(), OutputError> {
        let file = File::create(path.as_ref())?;
        self.write_to(value, BufWriter::new(file))
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Page, UserDto, UserResponse};

    fn page() -> Page<UserDto> {
        Page::single(vec![UserDto::from(UserResponse::new(1).with_name("Ada"))])
    }

    #[test]
    fn test_compact_output() {
        let json = JsonWriter::new().with_pretty_print(false).to_string(&page()).unwrap();

        assert!(!json.contains('\n'));
        assert!(json.contains(r#""name":"Ada""#));
        assert!(json.contains(r#""posts":[]"#));
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buffer = Vec::new();
        JsonWriter::new().write_to(&page(), &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["results"][0]["id"], 1);
        assert_eq!(value["total"], 1);
    }
}
