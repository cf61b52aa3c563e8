use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

pub const XML_CONTENT_TYPE: &str = "application/xml";

/// TwiML messaging response wrapping a single outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedReply {
    body: String,
}

impl FormattedReply {
    pub fn new(text: &str) -> Self {
        let body = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
            escape_xml(text)
        );
        Self { body }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn content_type(&self) -> &'static str {
        XML_CONTENT_TYPE
    }
}

impl IntoResponse for FormattedReply {
    fn into_response(self) -> Response {
        (StatusCode::OK, [(CONTENT_TYPE, XML_CONTENT_TYPE)], self.body).into_response()
    }
}

/// Characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Escapes markup and drops characters XML 1.0 cannot carry.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
