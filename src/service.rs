use crate::{
    config::Config,
    dto::{
        self, ContactPayload, ContactRequest, ContactResponse, DemoPayload, DemoRequest,
        DemoResponse,
    },
    mailer::{Mailer, MailerError, OutgoingEmail},
    template,
};

use serde_json::Value;

use std::sync::Arc;

const NO_PHONE: &str = "No proporcionado";
const DEMO_DEFAULT_MESSAGE: &str = "Solicitud de demo del GTS";
const DEMO_FALLBACK_MESSAGE: &str = "Solicitud de demo del Geo Tracking System";
const DEMO_CONFIRMATION: &str =
    "Solicitud de demo procesada. Un agente se contactará contigo pronto.";

pub struct SubmissionService {
    mailer: Arc<dyn Mailer>,
    sender: String,
    template_dir: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(&'static str),

    #[error(transparent)]
    Delivery(#[from] MailerError),
}

impl SubmissionService {
    pub fn new(config: &Config, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            mailer,
            sender: config.sender.clone(),
            template_dir: config.template_dir.clone(),
        }
    }

    pub async fn send_contact(
        &self,
        request: ContactRequest,
    ) -> Result<ContactResponse, SubmissionError> {
        const MISSING: &str = "Campos requeridos: email, name, message";
        let email = required(request.email.as_ref(), MISSING)?;
        let name = required(request.name.as_ref(), MISSING)?;
        let message = required(request.message.as_ref(), MISSING)?;

        let subject = format!(
            "Nuevo contacto - {}",
            or_default(request.email_type.as_ref(), "General")
        );
        let phone = or_default(request.phone.as_ref(), NO_PHONE);

        let is_contact = request.email_type.as_ref().and_then(Value::as_str) == Some("contact");
        let rendered = if is_contact {
            template::load_email_template(
                &self.template_dir,
                "thank-you-email",
                &[
                    ("name", name.as_str()),
                    ("email", email.as_str()),
                    ("phone", phone.as_str()),
                    ("message", message.as_str()),
                ],
            )
            .await
        } else {
            None
        };

        let html = rendered.unwrap_or_else(|| {
            format!(
                r#"
        <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
          <h2>Nuevo mensaje de contacto</h2>
          <p><strong>Tipo de email:</strong> {email_type}</p>
          <p><strong>Nombre:</strong> {name}</p>
          <p><strong>Email:</strong> {email}</p>
          <p><strong>Teléfono:</strong> {phone}</p>
          <p><strong>WhatsApp:</strong> {whatsapp}</p>
          <hr>
          <h3>Mensaje:</h3>
          <p>{message}</p>
          {meta}
        </div>
      "#,
                email_type = or_default(request.email_type.as_ref(), "No especificado"),
                whatsapp = whatsapp_label(request.whatsapp_check.as_ref()),
                meta = meta_block(request.meta.as_ref()),
            )
        });

        let data = self.deliver(email, subject, html).await?;

        Ok(ContactResponse {
            success: true,
            data,
            payload: ContactPayload {
                email_type: request.email_type,
                name: request.name,
                phone: request.phone,
                email: request.email,
                whatsapp_check: request.whatsapp_check,
                meta: request.meta,
            },
        })
    }

    pub async fn request_demo(&self, request: DemoRequest) -> Result<DemoResponse, SubmissionError> {
        const MISSING: &str = "Campos requeridos: email, name, company";
        let email = required(request.email.as_ref(), MISSING)?;
        let name = required(request.name.as_ref(), MISSING)?;
        let company = required(request.company.as_ref(), MISSING)?;

        let phone = or_default(request.phone.as_ref(), NO_PHONE);
        let template_message = or_default(request.message.as_ref(), DEMO_DEFAULT_MESSAGE);

        let rendered = template::load_email_template(
            &self.template_dir,
            "demo-request-email",
            &[
                ("name", name.as_str()),
                ("email", email.as_str()),
                ("phone", phone.as_str()),
                ("company", company.as_str()),
                ("message", template_message.as_str()),
            ],
        )
        .await;

        let html = rendered.unwrap_or_else(|| {
            format!(
                r#"
        <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
          <h2>🚀 Solicitud de Demo GTS</h2>
          <p><strong>Nombre:</strong> {name}</p>
          <p><strong>Empresa:</strong> {company}</p>
          <p><strong>Email:</strong> {email}</p>
          <p><strong>Teléfono:</strong> {phone}</p>
          <p><strong>WhatsApp:</strong> {whatsapp}</p>
          <hr>
          <h3>Mensaje:</h3>
          <p>{message}</p>
          <hr>
          <p><strong>🎯 Próximo paso:</strong> Un agente se contactará contigo dentro de las próximas 24 horas para coordinar tu demo personalizada del GTS.</p>
          {meta}
        </div>
      "#,
                whatsapp = whatsapp_label(request.whatsapp_check.as_ref()),
                message = or_default(request.message.as_ref(), DEMO_FALLBACK_MESSAGE),
                meta = meta_block(request.meta.as_ref()),
            )
        });

        let subject = format!("Demo GTS Solicitada - {company}");
        let data = self.deliver(email, subject, html).await?;

        Ok(DemoResponse {
            success: true,
            data,
            payload: DemoPayload {
                name: request.name,
                phone: request.phone,
                email: request.email,
                company: request.company,
                whatsapp_check: request.whatsapp_check,
                meta: request.meta,
            },
            message: DEMO_CONFIRMATION.to_string(),
        })
    }

    async fn deliver(
        &self,
        to: String,
        subject: String,
        html: String,
    ) -> Result<Value, MailerError> {
        tracing::info!("Sending email to '{}' with subject '{}'", to, subject);

        let data = self
            .mailer
            .send(OutgoingEmail {
                from: self.sender.clone(),
                to,
                subject,
                html,
            })
            .await?;

        tracing::info!("Email accepted by provider");
        Ok(data)
    }
}

/// Falsy values (empty string, `0`, `false`, `null`) count as missing.
fn required(value: Option<&Value>, error: &'static str) -> Result<String, SubmissionError> {
    dto::text(value).ok_or(SubmissionError::Validation(error))
}

fn or_default(value: Option<&Value>, default: &str) -> String {
    dto::text(value).unwrap_or_else(|| default.to_string())
}

fn whatsapp_label(value: Option<&Value>) -> &'static str {
    if value.is_some_and(dto::is_truthy) { "Sí" } else { "No" }
}

/// Raw JSON dump of `meta`, inserted without escaping.
fn meta_block(meta: Option<&Value>) -> String {
    meta.filter(|m| dto::is_truthy(m))
        .map(|m| format!("<hr><p><strong>Metadata:</strong> {m}</p>"))
        .unwrap_or_default()
}
