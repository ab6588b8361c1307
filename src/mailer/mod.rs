use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config,
    declare::{DeliveryReceipt, Report, RECIPIENT_EMAIL, SENDER_NAME},
    error::Error,
    logging,
};

/// Delivers the rendered report by email to the fixed recipient.
///
/// Credentials are validated before anything touches the network, the SMTP
/// connection is verified before the message is sent, and exactly one message
/// goes out per run.
///
/// # Arguments
///
/// * `cfg`: Relay host/port/security and the sender credentials.
/// * `report`: The rendered subject, HTML body and plain-text fallback.
///
/// # Returns
///
/// * `Result<DeliveryReceipt, Error>`: The relay reply and the recipient, or
///   [`Error::Config`] for missing/placeholder credentials and
///   [`Error::Delivery`] for any relay failure.
pub async fn deliver(cfg: &config::Smtp, report: &Report) -> Result<DeliveryReceipt, Error> {
    logging::info_console("Configuring email transport".to_string());

    validate_credentials(cfg)?;

    let message = build_message(cfg, report)?;
    let transport = build_transport(cfg)?;

    match transport.test_connection().await {
        Ok(true) => {
            logging::info_console(format!("SMTP connection to {} verified", cfg.host));
        }
        Ok(false) => {
            let msg = format!("SMTP connection to {} could not be verified", cfg.host);
            logging::error_file_async(msg.clone());
            return Err(Error::Delivery(msg));
        }
        Err(why) => {
            hint_on_auth_failure(&why);
            let msg = format!("Failed to verify SMTP connection to {}: {:?}", cfg.host, why);
            logging::error_file_async(msg.clone());
            return Err(Error::Delivery(msg));
        }
    }

    logging::info_console(format!("Sending email to {}", RECIPIENT_EMAIL));

    let response = transport.send(message).await.map_err(|why| {
        hint_on_auth_failure(&why);
        let msg = format!("Error sending email: {:?}", why);
        logging::error_file_async(msg.clone());
        Error::Delivery(msg)
    })?;

    let receipt = DeliveryReceipt {
        message_id: response.message().collect::<Vec<&str>>().join(" "),
        recipient: RECIPIENT_EMAIL.to_string(),
    };

    logging::info_console("Email sent successfully".to_string());
    logging::info_console(format!("Message ID: {}", receipt.message_id));
    logging::info_console(format!("Recipient: {}", receipt.recipient));
    logging::info_console(format!("Subject: {}", report.subject));

    Ok(receipt)
}

/// 帳密還停在預設值時直接擋下來，不做任何網路動作
fn validate_credentials(cfg: &config::Smtp) -> Result<(), Error> {
    if cfg.user.is_empty() || cfg.user == config::SMTP_USER_PLACEHOLDER {
        let msg = "SMTP user not configured. Please set SMTP_USER (or GMAIL_USER) environment variable.".to_string();
        logging::error_file_async(msg.clone());
        return Err(Error::Config(msg));
    }

    if cfg.password.is_empty() || cfg.password == config::SMTP_PASSWORD_PLACEHOLDER {
        let msg = "SMTP password not configured. Please set SMTP_PASS (or GMAIL_APP_PASSWORD) environment variable.".to_string();
        logging::error_file_async(msg.clone());
        return Err(Error::Config(msg));
    }

    Ok(())
}

fn build_message(cfg: &config::Smtp, report: &Report) -> Result<Message, Error> {
    let sender = cfg
        .user
        .parse::<Address>()
        .map_err(|why| Error::Config(format!("Invalid sender address '{}': {:?}", cfg.user, why)))?;

    let recipient = RECIPIENT_EMAIL
        .parse::<Mailbox>()
        .map_err(|why| Error::Delivery(format!("Invalid recipient address: {:?}", why)))?;

    Message::builder()
        .from(Mailbox::new(Some(SENDER_NAME.to_string()), sender))
        .to(recipient)
        .subject(report.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            report.text.clone(),
            report.html.clone(),
        ))
        .map_err(|why| Error::Delivery(format!("Failed to build email message: {:?}", why)))
}

fn build_transport(cfg: &config::Smtp) -> Result<AsyncSmtpTransport<Tokio1Executor>, Error> {
    let builder = if cfg.secure {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
    }
    .map_err(|why| Error::Delivery(format!("Failed to build SMTP transport: {:?}", why)))?;

    Ok(builder
        .port(cfg.port)
        .credentials(Credentials::new(cfg.user.clone(), cfg.password.clone()))
        .build())
}

/// 驗證被拒(5 3x)時多補一行提示，常見原因是要用應用程式密碼
fn hint_on_auth_failure(why: &lettre::transport::smtp::Error) {
    let auth_rejected = why
        .status()
        .map(|code| code.to_string().starts_with("53"))
        .unwrap_or(false);

    if auth_rejected {
        logging::error_console(
            "Tip: Make sure you are using the correct SMTP credentials or an app password."
                .to_string(),
        );
        logging::error_console(
            "Many providers (including Gmail and Zoho) require an application-specific password when 2FA is enabled."
                .to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::declare;

    use super::*;

    fn report() -> Report {
        Report {
            subject: "📊 Reporte Precios Combustibles - 6 ago 2024 (1 tipos disponibles)"
                .to_string(),
            html: "<html><body>$22.50</body></html>".to_string(),
            text: "Se han procesado 1 tipos de combustibles.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_deliver_rejects_placeholder_user() {
        let cfg = config::Smtp::default();

        let result = deliver(&cfg, &report()).await;

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_deliver_rejects_placeholder_password() {
        let cfg = config::Smtp {
            user: "reportes@example.com".to_string(),
            ..config::Smtp::default()
        };

        let result = deliver(&cfg, &report()).await;

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_deliver_rejects_empty_password() {
        let cfg = config::Smtp {
            user: "reportes@example.com".to_string(),
            password: "".to_string(),
            ..config::Smtp::default()
        };

        let result = deliver(&cfg, &report()).await;

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_recipient_address_parses() {
        assert!(declare::RECIPIENT_EMAIL.parse::<Mailbox>().is_ok());
    }

    #[tokio::test]
    #[ignore]
    async fn test_deliver() {
        dotenv::dotenv().ok();
        logging::debug_file_async("開始 deliver".to_string());

        let cfg = config::SETTINGS.smtp.clone();
        match deliver(&cfg, &report()).await {
            Ok(receipt) => {
                dbg!(&receipt);
            }
            Err(why) => {
                logging::error_file_async(format!("Failed to deliver because {:?}", why));
            }
        }

        logging::debug_file_async("結束 deliver".to_string());
    }
}
