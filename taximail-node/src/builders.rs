//! Request builders, one per operation.
//!
//! Builders are pure: they read a typed input and the static config and
//! return the request to send. Message ids are generated by the caller and
//! passed in.

use taximail_core::{
    non_blank, CheckStatusInput, FormValue, NodeConfig, OutboundMessage, SendEmailInput,
    SendSmsInput, SendSmsOtpInput, ValidationError, VerifyOtpInput,
};

/// Prefix for locally generated email message ids.
pub const EMAIL_ID_PREFIX: &str = "email";

/// Prefix for locally generated SMS message ids.
pub const SMS_ID_PREFIX: &str = "sms";

fn field(name: &str, value: impl Into<FormValue>) -> (String, FormValue) {
    (name.to_string(), value.into())
}

/// `POST /transactional`.
///
/// A non-blank template key replaces `subject`/`content_html`. With neither
/// a key nor content the request is still sent and the API's error surfaces.
pub fn build_email(input: &SendEmailInput, config: &NodeConfig, message_id: &str) -> OutboundMessage {
    let mut fields = vec![
        field("transactional_group_name", config.defaults.group_name.as_str()),
        field("to_name", input.to_email.as_str()),
        field("to_email", input.to_email.as_str()),
        field("from_name", input.from_name.as_str()),
        field("from_email", input.from_email.as_str()),
        field("message_id", message_id),
    ];
    match non_blank(&input.template_key) {
        Some(key) => fields.push(field("template_key", key)),
        None => {
            fields.push(field("subject", input.subject.as_str()));
            fields.push(field("content_html", input.html_content.as_str()));
        }
    }
    OutboundMessage::post_form(config.endpoints.transactional(), fields)
}

/// `POST /sms`. Text longer than 160 characters is sent as-is.
pub fn build_sms(input: &SendSmsInput, config: &NodeConfig, message_id: &str) -> OutboundMessage {
    let defaults = &config.defaults;
    let mut fields = vec![
        field("from", defaults.sms_sender.as_str()),
        field("to", input.to_phone.as_str()),
        field("message_id", message_id),
        field("transactional_group_name", defaults.group_name.as_str()),
        field("report_webhook", defaults.report_webhook),
        field("generate_link", defaults.generate_link),
    ];
    match non_blank(&input.template_key) {
        Some(key) => fields.push(field("template_key", key)),
        None => fields.push(field("text", input.text.as_str())),
    }
    OutboundMessage::post_form(config.endpoints.sms(), fields)
}

/// `POST /otp`. The template key is mandatory here.
pub fn build_sms_otp(
    input: &SendSmsOtpInput,
    config: &NodeConfig,
) -> Result<OutboundMessage, ValidationError> {
    let key = non_blank(&input.template_key).ok_or(ValidationError::OtpTemplateRequired)?;
    let defaults = &config.defaults;
    let fields = vec![
        field("to", input.to_phone.as_str()),
        field("sms_template_key", key),
        field("report_webhook", defaults.report_webhook),
        field("generate_link", defaults.generate_link),
    ];
    Ok(OutboundMessage::post_form(config.endpoints.otp(), fields))
}

/// `GET /otp/verify/{message_id}?otp_code=...`, both values trimmed.
pub fn build_verify_otp(
    input: &VerifyOtpInput,
    config: &NodeConfig,
) -> Result<OutboundMessage, ValidationError> {
    let message_id = non_blank(&input.message_id).ok_or(ValidationError::MissingMessageId)?;
    let otp_code = non_blank(&input.otp_code).ok_or(ValidationError::MissingOtpCode)?;
    Ok(OutboundMessage::get(config.endpoints.otp_verify(message_id))
        .with_query(vec![("otp_code".to_string(), otp_code.to_string())]))
}

/// `GET /transactional/{message_id}`.
pub fn build_check_status(input: &CheckStatusInput, config: &NodeConfig) -> OutboundMessage {
    OutboundMessage::get(config.endpoints.transactional_status(&input.message_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taximail_core::HttpMethod;

    fn email(template_key: &str) -> SendEmailInput {
        SendEmailInput {
            to_email: "to@example.com".to_string(),
            from_email: "from@example.com".to_string(),
            from_name: "Sender".to_string(),
            template_key: template_key.to_string(),
            subject: "Hello".to_string(),
            html_content: "<p>Hi</p>".to_string(),
        }
    }

    #[test]
    fn test_email_with_template_key() {
        let msg = build_email(&email("  welcome "), &NodeConfig::default(), "email_1_a");
        assert_eq!(msg.method, HttpMethod::Post);
        assert_eq!(msg.path(), "/v2/transactional");
        assert_eq!(msg.form_text("template_key"), Some("welcome"));
        assert!(!msg.has_field("subject"));
        assert!(!msg.has_field("content_html"));
        assert_eq!(msg.form_text("transactional_group_name"), Some("Default"));
        assert_eq!(msg.form_text("to_name"), Some("to@example.com"));
        assert_eq!(msg.form_text("message_id"), Some("email_1_a"));
    }

    #[test]
    fn test_email_inline_content() {
        let msg = build_email(&email(""), &NodeConfig::default(), "email_1_a");
        assert_eq!(msg.form_text("subject"), Some("Hello"));
        assert_eq!(msg.form_text("content_html"), Some("<p>Hi</p>"));
        assert!(!msg.has_field("template_key"));
    }

    #[test]
    fn test_email_form_field_order() {
        let msg = build_email(&email("key"), &NodeConfig::default(), "id");
        let keys: Vec<&str> = msg.form().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "transactional_group_name",
                "to_name",
                "to_email",
                "from_name",
                "from_email",
                "message_id",
                "template_key"
            ]
        );
    }

    #[test]
    fn test_sms_constants() {
        let input = SendSmsInput {
            to_phone: "66812345678".to_string(),
            template_key: String::new(),
            text: "Your parcel shipped".to_string(),
        };
        let msg = build_sms(&input, &NodeConfig::default(), "sms_1_a");
        assert_eq!(msg.path(), "/v2/sms");
        assert_eq!(msg.form_text("from"), Some("TXSMS"));
        assert_eq!(msg.form_text("to"), Some("66812345678"));
        assert_eq!(msg.form_text("text"), Some("Your parcel shipped"));
        assert_eq!(msg.form_value("report_webhook"), Some(&FormValue::Flag(true)));
        assert_eq!(msg.form_value("generate_link"), Some(&FormValue::Flag(true)));
        assert!(!msg.has_field("template_key"));
    }

    #[test]
    fn test_sms_template_replaces_text() {
        let input = SendSmsInput {
            to_phone: "66812345678".to_string(),
            template_key: "promo".to_string(),
            text: "ignored".to_string(),
        };
        let msg = build_sms(&input, &NodeConfig::default(), "sms_1_a");
        assert_eq!(msg.form_text("template_key"), Some("promo"));
        assert!(!msg.has_field("text"));
    }

    #[test]
    fn test_sms_otp_requires_template() {
        let input = SendSmsOtpInput {
            to_phone: "66812345678".to_string(),
            template_key: " \t ".to_string(),
        };
        assert_eq!(
            build_sms_otp(&input, &NodeConfig::default()),
            Err(ValidationError::OtpTemplateRequired)
        );
    }

    #[test]
    fn test_sms_otp_body() {
        let input = SendSmsOtpInput {
            to_phone: "66812345678".to_string(),
            template_key: " otp-login ".to_string(),
        };
        let msg = build_sms_otp(&input, &NodeConfig::default()).unwrap();
        assert_eq!(msg.path(), "/v2/otp");
        assert_eq!(msg.form_text("sms_template_key"), Some("otp-login"));
        assert!(!msg.has_field("message_id"));
    }

    #[test]
    fn test_verify_otp_trims_inputs() {
        let input = VerifyOtpInput {
            message_id: " m-1 ".to_string(),
            otp_code: " 4321 ".to_string(),
        };
        let msg = build_verify_otp(&input, &NodeConfig::default()).unwrap();
        assert_eq!(msg.method, HttpMethod::Get);
        assert_eq!(msg.path(), "/v2/otp/verify/m-1");
        assert_eq!(msg.query(), &[("otp_code".to_string(), "4321".to_string())]);
    }

    #[test]
    fn test_verify_otp_blank_inputs() {
        let config = NodeConfig::default();
        let blank_id = VerifyOtpInput {
            message_id: "  ".to_string(),
            otp_code: "1234".to_string(),
        };
        assert_eq!(
            build_verify_otp(&blank_id, &config),
            Err(ValidationError::MissingMessageId)
        );
        let blank_code = VerifyOtpInput {
            message_id: "m-1".to_string(),
            otp_code: String::new(),
        };
        assert_eq!(
            build_verify_otp(&blank_code, &config),
            Err(ValidationError::MissingOtpCode)
        );
    }

    #[test]
    fn test_check_status_path() {
        let input = CheckStatusInput {
            message_id: "63bf89390fe2f00008a236c3".to_string(),
        };
        let msg = build_check_status(&input, &NodeConfig::default());
        assert_eq!(msg.method, HttpMethod::Get);
        assert_eq!(msg.path(), "/v2/transactional/63bf89390fe2f00008a236c3");
        assert!(msg.payload.is_none());
    }
}
