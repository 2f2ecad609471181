//! SOAP request construction and response parsing for the TARIC goods service.

use crate::domain::errors::RemoteLookupError;
use crate::domain::models::{LanguageTag, TaricCode};

/// Namespace of the request elements.
pub const TARIC_NAMESPACE: &str = "http://example.org/taric";

/// Build the SOAP 1.1 `getGoodsDescription` envelope for a key.
pub fn goods_description_envelope(code: &TaricCode, language: &LanguageTag) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"
                  xmlns:tar="{TARIC_NAMESPACE}">
  <soapenv:Header/>
  <soapenv:Body>
    <tar:getGoodsDescription>
      <tar:code>{}</tar:code>
      <tar:language>{}</tar:language>
    </tar:getGoodsDescription>
  </soapenv:Body>
</soapenv:Envelope>
"#,
        escape_xml(code.as_str()),
        escape_xml(language.as_str())
    )
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Extracts the description from a successful response body.
///
/// `Ok(None)` means the service answered without a matching record.
pub trait ResponseParser: Send + Sync {
    fn parse(
        &self,
        code: &TaricCode,
        language: &LanguageTag,
        body: &str,
    ) -> Result<Option<String>, RemoteLookupError>;
}

/// Parser used until the service's response schema is pinned down.
///
/// Extracts nothing: every 200 answer yields an empty description, and the
/// body is still persisted as the raw payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnparsedResponse;

impl ResponseParser for UnparsedResponse {
    fn parse(
        &self,
        code: &TaricCode,
        language: &LanguageTag,
        body: &str,
    ) -> Result<Option<String>, RemoteLookupError> {
        tracing::debug!(
            code = %code,
            language = %language,
            body_len = body.len(),
            "response kept unparsed"
        );
        Ok(Some(String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_contains_key() {
        let code = TaricCode::parse("8517120000").unwrap();
        let language = LanguageTag::normalize(Some("en"), "DE");
        let envelope = goods_description_envelope(&code, &language);

        assert!(envelope.contains("<tar:code>8517120000</tar:code>"));
        assert!(envelope.contains("<tar:language>EN</tar:language>"));
        assert!(envelope.starts_with("<?xml"));
    }

    #[test]
    fn test_envelope_escapes_values() {
        let code = TaricCode::parse("85<17>&'\"").unwrap();
        let envelope = goods_description_envelope(&code, &LanguageTag::default());
        assert!(envelope.contains("<tar:code>85&lt;17&gt;&amp;&apos;&quot;</tar:code>"));
    }

    #[test]
    fn test_unparsed_response_yields_empty_description() {
        let code = TaricCode::parse("8517120000").unwrap();
        let parsed = UnparsedResponse
            .parse(&code, &LanguageTag::default(), "<anything/>")
            .unwrap();
        assert_eq!(parsed.as_deref(), Some(""));
    }
}
