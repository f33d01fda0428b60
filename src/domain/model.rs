use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Submitted form values, keyed by widget name.
pub type SubmittedData = HashMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingSlip {
    pub id: u64,
    pub document_number: String,
    pub shipping_method_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_shipment_id: Option<String>,
}

impl PackagingSlip {
    pub fn new(id: u64, document_number: impl Into<String>, shipping_method_id: u64) -> Self {
        Self {
            id,
            document_number: document_number.into(),
            shipping_method_id,
            carrier_shipment_id: None,
        }
    }

    pub fn with_carrier_shipment_id(mut self, shipment_id: impl Into<String>) -> Self {
        self.carrier_shipment_id = Some(shipment_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: u64,
    pub r#type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LabelFormat {
    #[default]
    Zpl,
    Pdf,
}

impl LabelFormat {
    pub const ALL: [LabelFormat; 2] = [LabelFormat::Zpl, LabelFormat::Pdf];

    /// 未提供或無法辨識的值一律回到 ZPL
    pub fn resolve(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
            Some("PDF") => LabelFormat::Pdf,
            _ => LabelFormat::Zpl,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelFormat::Zpl => "ZPL",
            LabelFormat::Pdf => "PDF",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            LabelFormat::Zpl => "application/zpl",
            LabelFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryPreferences {
    pub recipient_email: String,
    pub label_format: LabelFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl LabelDocument {
    pub fn new(bytes: Vec<u8>, format: LabelFormat) -> Self {
        Self {
            bytes,
            content_type: format.content_type(),
        }
    }

    /// ZPL 是純文字標記，直接當作郵件內文
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub body: String,
    pub recipient: String,
    pub attachment: Option<EmailAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Email,
    Choice {
        choices: Vec<String>,
        expanded: bool,
        multiple: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub attr_class: String,
    pub row_class: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub fields: Vec<FormField>,
}

impl FormDefinition {
    /// Adds a field, replacing any existing field with the same name in place.
    pub fn add(&mut self, field: FormField) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}
