use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while building, reading or writing a GPX document.
#[derive(Debug, Error)]
pub enum GpxError {
    #[error("Invalid URI '{value}': {reason}")]
    InvalidUri { value: String, reason: String },

    #[error("Invalid fix type '{0}' (expected none, 2d, 3d, dgps or pps)")]
    InvalidFixType(String),

    #[error("Value {value} for '{field}' is out of range {range}")]
    OutOfRange {
        field: &'static str,
        value: String,
        range: &'static str,
    },

    #[error("Missing required '{field}' on <{element}>")]
    MissingRequired {
        element: &'static str,
        field: &'static str,
    },

    #[error("Invalid email part '{0}'")]
    InvalidEmail(String),

    #[error("Invalid value '{value}' for <{element}>")]
    InvalidValue { element: &'static str, value: String },

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, GpxError>;

impl GpxError {
    pub(crate) fn out_of_range(field: &'static str, value: impl ToString, range: &'static str) -> Self {
        Self::OutOfRange {
            field,
            value: value.to_string(),
            range,
        }
    }
}

impl From<GpxError> for JsValue {
    fn from(e: GpxError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
