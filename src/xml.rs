//! XML response handling: a small element tree with path queries and
//! typed scalar decoding, plus the batch request body writer.
//!
//! Field extraction follows the service contract: a path that matches
//! zero or more than one node yields the empty string, never an error.
//! Typed decoders build on that — booleans compare literally against
//! `"true"`, numerics get a leading `"0"` so absent fields decode as
//! zero, and date-only values get a synthesized midnight time before
//! RFC 3339 parsing.

use std::io::Cursor;

use chrono::{DateTime, FixedOffset};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{ClientError, code};

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

/// Parsed XML response document.
#[derive(Debug)]
pub(crate) struct Document {
    roots: Vec<Element>,
}

impl Document {
    /// Parse response bytes into an element tree.
    ///
    /// Anything that is not a well-formed XML document with a root
    /// element is an error; the caller maps it to `CLI_RESPONSE`.
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self, String> {
        let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;

        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut roots: Vec<Element> = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let name = std::str::from_utf8(e.name().as_ref())
                        .unwrap_or("")
                        .to_string();
                    stack.push(Element {
                        name,
                        ..Element::default()
                    });
                }
                Ok(Event::Empty(ref e)) => {
                    let name = std::str::from_utf8(e.name().as_ref())
                        .unwrap_or("")
                        .to_string();
                    let el = Element {
                        name,
                        ..Element::default()
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(el),
                        None => roots.push(el),
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    if let Some(el) = stack.last_mut() {
                        el.text.push_str(&text);
                    }
                }
                Ok(Event::End(_)) => {
                    let el = stack.pop().ok_or_else(|| "unbalanced element".to_string())?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(el),
                        None => roots.push(el),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.to_string()),
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err("unclosed element".to_string());
        }
        if roots.is_empty() {
            return Err("document has no root element".to_string());
        }

        Ok(Self { roots })
    }

    /// Resolve a slash-separated path such as `/result/vies/uid`.
    ///
    /// A segment may carry a 1-based position, e.g.
    /// `/result/batch/numbers/vies[2]/uid`.
    fn select(&self, path: &str) -> Vec<&Element> {
        let mut nodes: Vec<&Element> = Vec::new();
        let mut first = true;

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let (name, index) = split_index(segment);

            let matched: Vec<&Element> = if first {
                self.roots.iter().filter(|e| e.name == name).collect()
            } else {
                nodes
                    .iter()
                    .flat_map(|e| e.children.iter())
                    .filter(|e| e.name == name)
                    .collect()
            };

            nodes = match index {
                Some(0) => Vec::new(),
                Some(i) => matched.get(i - 1).map(|e| vec![*e]).unwrap_or_default(),
                None => matched,
            };
            first = false;

            if nodes.is_empty() {
                return nodes;
            }
        }

        nodes
    }

    /// Text of the element at `path`; empty unless exactly one node matches.
    pub(crate) fn text(&self, path: &str) -> String {
        let nodes = self.select(path);
        if nodes.len() != 1 {
            return String::new();
        }
        nodes[0].text.trim().to_string()
    }

    /// Boolean field: literal comparison against `"true"`.
    pub(crate) fn bool(&self, path: &str) -> bool {
        self.text(path) == "true"
    }

    /// Integer field; an absent field decodes as zero.
    pub(crate) fn int(&self, path: &str) -> Result<i64, ClientError> {
        let raw = format!("0{}", self.text(path));
        raw.parse::<i64>()
            .map_err(|_| ClientError::local_with(code::CLI_EXCEPTION, format!("invalid integer '{raw}'")))
    }

    /// Float field; an absent field decodes as zero.
    pub(crate) fn float(&self, path: &str) -> Result<f64, ClientError> {
        let raw = format!("0{}", self.text(path));
        raw.parse::<f64>()
            .map_err(|_| ClientError::local_with(code::CLI_EXCEPTION, format!("invalid number '{raw}'")))
    }

    /// Full timestamp field; absent field is `None`.
    pub(crate) fn date_time(&self, path: &str) -> Result<Option<DateTime<FixedOffset>>, ClientError> {
        let s = self.text(path);
        if s.is_empty() {
            return Ok(None);
        }
        parse_rfc3339(&s).map(Some)
    }

    /// Date-only field; absent field is `None`.
    ///
    /// The service emits `xsd:date` values, either `YYYY-MM-DDZ` (11
    /// chars) or `YYYY-MM-DD+HH:MM` (16 chars). A midnight time is
    /// synthesized before parsing since RFC 3339 only accepts full
    /// timestamps.
    pub(crate) fn date(&self, path: &str) -> Result<Option<DateTime<FixedOffset>>, ClientError> {
        let s = self.text(path);
        if s.is_empty() {
            return Ok(None);
        }

        let synthesized = match s.len() {
            11 | 16 => match (s.get(..10), s.get(10..)) {
                (Some(day), Some(offset)) => format!("{day}T00:00:00{offset}"),
                _ => s.clone(),
            },
            _ => s.clone(),
        };

        parse_rfc3339(&synthesized).map(Some)
    }

    /// Embedded service error, if the response is an error document.
    pub(crate) fn service_error(&self) -> Option<ClientError> {
        let code_text = self.text("/result/error/code");
        if code_text.is_empty() {
            return None;
        }

        let description = self.text("/result/error/description");
        match code_text.parse::<i32>() {
            Ok(c) => Some(ClientError::remote(c, description)),
            Err(_) => Some(ClientError::local(code::CLI_RESPONSE)),
        }
    }
}

fn split_index(segment: &str) -> (&str, Option<usize>) {
    if let Some(open) = segment.find('[') {
        if let Some(stripped) = segment.strip_suffix(']') {
            if let Ok(i) = stripped[open + 1..].parse::<usize>() {
                return (&segment[..open], Some(i));
            }
        }
    }
    (segment, None)
}

fn parse_rfc3339(s: &str) -> Result<DateTime<FixedOffset>, ClientError> {
    DateTime::parse_from_rfc3339(s)
        .map_err(|_| ClientError::local_with(code::CLI_DATEFORMAT, format!("invalid date '{s}'")))
}

/// Serialize the batch submission body:
/// `<request><batch><numbers><number>…</number></numbers></batch></request>`.
pub(crate) fn batch_request_body(numbers: &[String]) -> Result<String, ClientError> {
    let xml_io =
        |e: std::io::Error| ClientError::local_with(code::CLI_EXCEPTION, format!("XML write error: {e}"));

    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_io)?;

    writer
        .write_event(Event::Start(BytesStart::new("request")))
        .map_err(xml_io)?;
    writer
        .write_event(Event::Start(BytesStart::new("batch")))
        .map_err(xml_io)?;
    writer
        .write_event(Event::Start(BytesStart::new("numbers")))
        .map_err(xml_io)?;

    for number in numbers {
        writer
            .write_event(Event::Start(BytesStart::new("number")))
            .map_err(xml_io)?;
        writer
            .write_event(Event::Text(BytesText::new(number)))
            .map_err(xml_io)?;
        writer
            .write_event(Event::End(BytesEnd::new("number")))
            .map_err(xml_io)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("numbers")))
        .map_err(xml_io)?;
    writer
        .write_event(Event::End(BytesEnd::new("batch")))
        .map_err(xml_io)?;
    writer
        .write_event(Event::End(BytesEnd::new("request")))
        .map_err(xml_io)?;

    let buf = writer.into_inner().into_inner();
    String::from_utf8(buf)
        .map_err(|e| ClientError::local_with(code::CLI_EXCEPTION, format!("XML UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(xml: &str) -> Document {
        Document::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn simple_field_extraction() {
        let d = doc("<result><vies><uid>abc-123</uid></vies></result>");
        assert_eq!(d.text("/result/vies/uid"), "abc-123");
    }

    #[test]
    fn missing_field_is_empty() {
        let d = doc("<result><vies><uid>abc</uid></vies></result>");
        assert_eq!(d.text("/result/vies/vatNumber"), "");
    }

    #[test]
    fn duplicate_field_is_empty() {
        let d = doc("<result><vies><uid>a</uid><uid>b</uid></vies></result>");
        assert_eq!(d.text("/result/vies/uid"), "");
    }

    #[test]
    fn positional_index_selects_nth() {
        let d = doc(
            "<result><batch><numbers>\
             <vies><uid>first</uid></vies>\
             <vies><uid>second</uid></vies>\
             </numbers></batch></result>",
        );
        assert_eq!(d.text("/result/batch/numbers/vies[1]/uid"), "first");
        assert_eq!(d.text("/result/batch/numbers/vies[2]/uid"), "second");
        assert_eq!(d.text("/result/batch/numbers/vies[3]/uid"), "");
        assert_eq!(d.text("/result/batch/numbers/vies[0]/uid"), "");
    }

    #[test]
    fn text_is_trimmed() {
        let d = doc("<result><vies><uid>  abc  </uid></vies></result>");
        assert_eq!(d.text("/result/vies/uid"), "abc");
    }

    #[test]
    fn bool_requires_literal_true() {
        let d = doc("<result><vies><valid>true</valid><x>TRUE</x><y>1</y></vies></result>");
        assert!(d.bool("/result/vies/valid"));
        assert!(!d.bool("/result/vies/x"));
        assert!(!d.bool("/result/vies/y"));
        assert!(!d.bool("/result/vies/missing"));
    }

    #[test]
    fn numeric_fields_default_to_zero() {
        let d = doc("<result><account><limit>5000</limit><price>12.5</price></account></result>");
        assert_eq!(d.int("/result/account/limit").unwrap(), 5000);
        assert_eq!(d.int("/result/account/missing").unwrap(), 0);
        assert_eq!(d.float("/result/account/price").unwrap(), 12.5);
        assert_eq!(d.float("/result/account/missing").unwrap(), 0.0);
    }

    #[test]
    fn garbage_numeric_is_an_error() {
        let d = doc("<result><account><limit>lots</limit></account></result>");
        assert!(d.int("/result/account/limit").is_err());
    }

    #[test]
    fn date_synthesis_11_char_utc() {
        let d = doc("<result><vies><date>2022-07-11Z</date></vies></result>");
        let dt = d.date("/result/vies/date").unwrap().unwrap();
        assert_eq!(dt.to_rfc3339(), "2022-07-11T00:00:00+00:00");
    }

    #[test]
    fn date_synthesis_16_char_offset() {
        let d = doc("<result><vies><date>2022-07-11+02:00</date></vies></result>");
        let dt = d.date("/result/vies/date").unwrap().unwrap();
        assert_eq!(dt.to_rfc3339(), "2022-07-11T00:00:00+02:00");
    }

    #[test]
    fn absent_date_is_none() {
        let d = doc("<result><vies/></result>");
        assert!(d.date("/result/vies/date").unwrap().is_none());
    }

    #[test]
    fn malformed_date_is_dateformat_error() {
        let d = doc("<result><vies><date>yesterday</date></vies></result>");
        let err = d.date("/result/vies/date").unwrap_err();
        assert_eq!(err.code(), code::CLI_DATEFORMAT);
    }

    #[test]
    fn full_timestamp_parses() {
        let d = doc("<result><account><validTo>2023-01-31T23:59:59+01:00</validTo></account></result>");
        let dt = d.date_time("/result/account/validTo").unwrap().unwrap();
        assert_eq!(dt.to_rfc3339(), "2023-01-31T23:59:59+01:00");
    }

    #[test]
    fn service_error_detected() {
        let d = doc(
            "<result><error><code>35</code>\
             <description>Access denied</description></error></result>",
        );
        let err = d.service_error().unwrap();
        assert_eq!(err.code(), 35);
        assert_eq!(err.message(), "Access denied");
    }

    #[test]
    fn success_document_has_no_service_error() {
        let d = doc("<result><vies><uid>abc</uid></vies></result>");
        assert!(d.service_error().is_none());
    }

    #[test]
    fn non_numeric_error_code_is_response_error() {
        let d = doc("<result><error><code>oops</code></error></result>");
        let err = d.service_error().unwrap();
        assert_eq!(err.code(), code::CLI_RESPONSE);
    }

    #[test]
    fn garbage_bytes_fail_to_parse() {
        assert!(Document::parse(b"this is not xml").is_err());
        assert!(Document::parse(b"").is_err());
        assert!(Document::parse(b"<result><open></result>").is_err());
        assert!(Document::parse(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn batch_body_lists_numbers_in_order() {
        let body =
            batch_request_body(&["PL7171642051".to_string(), "DE123456789".to_string()]).unwrap();
        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(body.contains(
            "<request><batch><numbers>\
             <number>PL7171642051</number>\
             <number>DE123456789</number>\
             </numbers></batch></request>"
        ));
    }
}
