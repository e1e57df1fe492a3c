use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str, ttl_minutes: i64) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let from: Mailbox = cfg.from.parse().context("parse SMTP_FROM")?;
        let builder = if cfg.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
                .context("smtp relay")?
        } else {
            // Plaintext, for local catchers like Mailpit.
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.host)
        };
        let builder = builder.port(cfg.port);
        let builder = match (&cfg.username, &cfg.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

pub(crate) fn otp_email_body(code: &str, ttl_minutes: i64) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 400px; margin: auto;
            padding: 20px; border: 1px solid #eee; border-radius: 10px;">
  <h2 style="color: #1d7cf2; text-align: center;">PortHub</h2>
  <p>Your verification code is:</p>
  <div style="background: #f1f7ff; padding: 20px; text-align: center;
              font-size: 32px; font-weight: bold; letter-spacing: 5px;
              border-radius: 8px;">{code}</div>
  <p style="font-size: 12px; color: #888; margin-top: 20px;">
    This code will expire in {ttl_minutes} minutes.
  </p>
</div>"#
    )
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_otp(&self, to: &str, code: &str, ttl_minutes: i64) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().context("parse recipient")?)
            .subject("PortHub Verification Code")
            .header(ContentType::TEXT_HTML)
            .body(otp_email_body(code, ttl_minutes))
            .context("build message")?;

        self.transport
            .send(message)
            .await
            .context("smtp send")?;
        Ok(())
    }
}
