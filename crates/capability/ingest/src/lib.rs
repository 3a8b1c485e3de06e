//! 事件解码：base64 载荷 → JSON → Measurement。

use base64::{Engine, engine::general_purpose::STANDARD};
use domain::{Measurement, PubsubMessage, SensorPayload};

/// 解码错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value {0:?}: {1}")]
    InvalidValue(String, String),
}

/// 解码完成的事件。
#[derive(Debug, Clone)]
pub struct DecodedEvent {
    /// 解码后的原始 JSON 文本（用于日志）。
    pub payload_text: String,
    pub measurement: Measurement,
    pub device_id: String,
}

/// 解码整条消息。
pub fn decode_event(message: &PubsubMessage) -> Result<DecodedEvent, IngestError> {
    let payload_text = decode_payload(message)?;
    let measurement = parse_msg_data(&payload_text)?;
    Ok(DecodedEvent {
        payload_text,
        measurement,
        device_id: message.attributes.device_id.clone(),
    })
}

/// base64 → UTF-8 文本。
pub fn decode_payload(message: &PubsubMessage) -> Result<String, IngestError> {
    let bytes = STANDARD.decode(message.data.trim())?;
    Ok(String::from_utf8(bytes)?)
}

/// 解析 `{feature, value}`：feature 转小写，value 去掉首尾各一个字符后按浮点解析。
pub fn parse_msg_data(data: &str) -> Result<Measurement, IngestError> {
    let payload: SensorPayload = serde_json::from_str(data)?;
    let value = parse_value(&payload.value)?;
    Ok(Measurement {
        feature: payload.feature.to_lowercase(),
        value,
    })
}

/// 去掉包裹字符后解析数值。
///
/// 跳过前导空白，取最长的十进制浮点前缀（`"21.5 C"` → 21.5），其后内容忽略；
/// 没有数字前缀或结果不是有限值时报错，不回退为 0。
pub fn parse_value(raw: &str) -> Result<f64, IngestError> {
    let invalid = |reason: &str| IngestError::InvalidValue(raw.to_string(), reason.to_string());
    let inner = strip_enclosing(raw).ok_or_else(|| invalid("too short to be enclosed"))?;
    let literal = float_prefix(inner.trim_start()).ok_or_else(|| invalid("no numeric prefix"))?;
    let value = literal
        .parse::<f64>()
        .map_err(|err| invalid(&err.to_string()))?;
    if !value.is_finite() {
        return Err(invalid("not a finite number"));
    }
    Ok(value)
}

/// 最长的十进制浮点字面量前缀：`[+-]digits[.digits][(e|E)[+-]digits]`。
fn float_prefix(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(end);
    end += int_digits;
    let mut mantissa_digits = int_digits;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
            mantissa_digits += frac_digits;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = bytes
            .get(end + 1 + sign..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count());
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }
    Some(&text[..end])
}

/// 去掉首尾各一个字符（按 char 计），不足两个字符时返回 None。
pub fn strip_enclosing(raw: &str) -> Option<&str> {
    let mut chars = raw.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    Some(&raw[first.len_utf8()..raw.len() - last.len_utf8()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(json: &str, device_id: &str) -> PubsubMessage {
        PubsubMessage::new(STANDARD.encode(json), device_id)
    }

    #[test]
    fn decodes_quoted_value_and_lowercases_feature() {
        let decoded = decode_event(&message(
            r#"{"feature":"Temperature","value":"\"21.5\""}"#,
            "sensi1",
        ))
        .expect("decode");
        assert_eq!(decoded.measurement.feature, "temperature");
        assert_eq!(decoded.measurement.value, 21.5);
        assert_eq!(decoded.device_id, "sensi1");
        assert_eq!(
            decoded.payload_text,
            r#"{"feature":"Temperature","value":"\"21.5\""}"#
        );
    }

    #[test]
    fn strips_one_character_each_side() {
        assert_eq!(strip_enclosing("\"12.34\""), Some("12.34"));
        assert_eq!(strip_enclosing("[7]"), Some("7"));
        assert_eq!(strip_enclosing("\"\"12\"\""), Some("\"12\""));
        assert_eq!(strip_enclosing("«3.5»"), Some("3.5"));
        assert_eq!(strip_enclosing("ab"), Some(""));
        assert_eq!(strip_enclosing("a"), None);
        assert_eq!(strip_enclosing(""), None);
        assert_eq!(parse_value("\"12.34\"").expect("value"), 12.34);
        assert_eq!(parse_value("'-3e2'").expect("value"), -300.0);
    }

    #[test]
    fn takes_leading_numeric_prefix() {
        assert_eq!(parse_value("'21.5 C'").expect("value"), 21.5);
        assert_eq!(parse_value("\" 21.5\"").expect("value"), 21.5);
        assert_eq!(parse_value("[1.5, 2.0, 3.0]").expect("value"), 1.5);
        assert_eq!(parse_value("\"21.5abc\"").expect("value"), 21.5);
        assert_eq!(parse_value("\"-.5\"").expect("value"), -0.5);
        assert_eq!(parse_value("\"7.\"").expect("value"), 7.0);
        assert_eq!(parse_value("\"1e3x\"").expect("value"), 1000.0);
        assert_eq!(parse_value("\"2e\"").expect("value"), 2.0);
        assert_eq!(parse_value("\"3E+2\"").expect("value"), 300.0);
    }

    #[test]
    fn non_numeric_value_fails() {
        for raw in [
            "\"abc\"", "\"\"", "x", "\"NaN\"", "\"inf\"", "\"Infinity\"", "\"-\"", "\".\"",
            "\"C 21.5\"", "\"1e999\"",
        ] {
            let err = parse_value(raw).expect_err(raw);
            assert!(matches!(err, IngestError::InvalidValue(_, _)), "{raw}");
        }
    }

    #[test]
    fn malformed_payloads_fail() {
        let bad_base64 = PubsubMessage::new("not base64!!", "sensi1");
        assert!(matches!(
            decode_event(&bad_base64),
            Err(IngestError::Base64(_))
        ));

        let bad_utf8 = PubsubMessage::new(STANDARD.encode([0xffu8, 0xfe, 0xfd]), "sensi1");
        assert!(matches!(decode_event(&bad_utf8), Err(IngestError::Utf8(_))));

        let bad_json = message("{feature:", "sensi1");
        assert!(matches!(decode_event(&bad_json), Err(IngestError::Json(_))));

        let numeric_value = message(r#"{"feature":"humidity","value":55.2}"#, "sensi1");
        assert!(matches!(
            decode_event(&numeric_value),
            Err(IngestError::Json(_))
        ));
    }

    #[test]
    fn extra_keys_are_ignored() {
        let measurement =
            parse_msg_data(r#"{"feature":"PRESSURE","value":"'1013.25'","unit":"hPa"}"#)
                .expect("parse");
        assert_eq!(
            measurement,
            Measurement {
                feature: "pressure".to_string(),
                value: 1013.25,
            }
        );
    }
}
