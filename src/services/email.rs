use reqwest;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Serialize, Deserialize)]
pub struct SendGridEmail {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendGridPersonalization {
    pub to: Vec<SendGridEmail>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendGridContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendGridRequest {
    pub personalizations: Vec<SendGridPersonalization>,
    pub from: SendGridEmail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<SendGridEmail>,
    pub subject: String,
    pub content: Vec<SendGridContent>,
}

#[derive(Debug)]
pub enum EmailError {
    EnvironmentError(String),
    RequestError(String),
    ApiError(String),
}

impl std::fmt::Display for EmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailError::EnvironmentError(err) => write!(f, "Environment error: {}", err),
            EmailError::RequestError(err) => write!(f, "Request error: {}", err),
            EmailError::ApiError(err) => write!(f, "API error: {}", err),
        }
    }
}

impl std::error::Error for EmailError {}

/// One rendered transactional email: subject plus an HTML body and a
/// plain-text fallback, both sent in a single call.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

fn html_shell(title: &str, inner: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <meta charset="utf-8">
            <title>{title}</title>
            <style>
                body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
                .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
                .header {{ background-color: #f8f9fa; padding: 20px; border-radius: 5px; text-align: center; }}
                .highlight {{ font-size: 24px; font-weight: bold; color: #2e7d32; margin: 20px 0; }}
                .footer {{ margin-top: 30px; font-size: 14px; color: #666; }}
            </style>
        </head>
        <body>
            <div class="container">
                <div class="header">
                    <h1>{title}</h1>
                </div>
                {inner}
                <div class="footer">
                    <p>Best regards,<br>The Safari Quotes Team</p>
                </div>
            </div>
        </body>
        </html>
        "#
    )
}

pub fn welcome(name: &str) -> EmailMessage {
    EmailMessage {
        subject: "Welcome to Safari Quotes".to_string(),
        html_body: html_shell(
            "Welcome!",
            &format!(
                "<p>Hi {name},</p>\
                 <p>Your account is ready. You can now build and send safari quotes to your clients.</p>"
            ),
        ),
        text_body: format!(
            "Hi {},\n\nYour account is ready. You can now build and send safari quotes to your clients.\n\nBest regards,\nThe Safari Quotes Team",
            name
        ),
    }
}

pub fn email_confirmation(name: &str, confirmation_code: &str) -> EmailMessage {
    EmailMessage {
        subject: "Confirm Your Email Address".to_string(),
        html_body: html_shell(
            "Confirm Your Email Address",
            &format!(
                "<p>Hi {name},</p>\
                 <p>Your confirmation code is:</p>\
                 <div class=\"highlight\">{confirmation_code}</div>\
                 <p>If you didn't request this, please ignore this email.</p>"
            ),
        ),
        text_body: format!(
            "Hi {},\n\nYour confirmation code is: {}\n\nIf you didn't request this, please ignore this email.\n\nBest regards,\nThe Safari Quotes Team",
            name, confirmation_code
        ),
    }
}

pub fn password_reset(name: &str, reset_url: &str) -> EmailMessage {
    EmailMessage {
        subject: "Reset Your Password".to_string(),
        html_body: html_shell(
            "Reset Your Password",
            &format!(
                "<p>Hi {name},</p>\
                 <p>We received a request to reset your password. Use the link below:</p>\
                 <p><a href=\"{reset_url}\">{reset_url}</a></p>\
                 <p>If you didn't request this, please ignore this email.</p>"
            ),
        ),
        text_body: format!(
            "Hi {},\n\nWe received a request to reset your password. Use this link:\n{}\n\nIf you didn't request this, please ignore this email.\n\nBest regards,\nThe Safari Quotes Team",
            name, reset_url
        ),
    }
}

pub fn company_approval_request(company_name: &str, requested_by: &str) -> EmailMessage {
    EmailMessage {
        subject: format!("Approval Requested: {}", company_name),
        html_body: html_shell(
            "Company Approval Requested",
            &format!(
                "<p>{requested_by} has requested approval for the company <strong>{company_name}</strong>.</p>\
                 <p>Please review the request in the admin dashboard.</p>"
            ),
        ),
        text_body: format!(
            "{} has requested approval for the company {}.\n\nPlease review the request in the admin dashboard.\n\nBest regards,\nThe Safari Quotes Team",
            requested_by, company_name
        ),
    }
}

pub fn company_approved(company_name: &str) -> EmailMessage {
    EmailMessage {
        subject: format!("{} Has Been Approved", company_name),
        html_body: html_shell(
            "Company Approved",
            &format!(
                "<p>Good news! <strong>{company_name}</strong> has been approved.</p>\
                 <p>You can now create quotes and invoices for your clients.</p>"
            ),
        ),
        text_body: format!(
            "Good news! {} has been approved.\n\nYou can now create quotes and invoices for your clients.\n\nBest regards,\nThe Safari Quotes Team",
            company_name
        ),
    }
}

pub fn quote_generated(
    client_name: &str,
    offer_code: &str,
    offer_name: &str,
    total: f64,
    currency: &str,
) -> EmailMessage {
    EmailMessage {
        subject: format!("Your Safari Quote {} Is Ready", offer_code),
        html_body: html_shell(
            "Your Safari Quote Is Ready",
            &format!(
                "<p>Dear {client_name},</p>\
                 <p>Your quote <strong>{offer_code}</strong> ({offer_name}) is ready.</p>\
                 <div class=\"highlight\">{currency} {total:.2}</div>\
                 <p>Reply to this email if you have any questions or would like changes.</p>"
            ),
        ),
        text_body: format!(
            "Dear {},\n\nYour quote {} ({}) is ready.\n\nTotal: {} {:.2}\n\nReply to this email if you have any questions or would like changes.\n\nBest regards,\nThe Safari Quotes Team",
            client_name, offer_code, offer_name, currency, total
        ),
    }
}

pub fn invoice_generated(
    client_name: &str,
    invoice_number: &str,
    amount: f64,
    currency: &str,
) -> EmailMessage {
    EmailMessage {
        subject: format!("Invoice {} Is Ready", invoice_number),
        html_body: html_shell(
            "Your Invoice Is Ready",
            &format!(
                "<p>Dear {client_name},</p>\
                 <p>Your invoice <strong>{invoice_number}</strong> is ready.</p>\
                 <div class=\"highlight\">{currency} {amount:.2}</div>"
            ),
        ),
        text_body: format!(
            "Dear {},\n\nYour invoice {} is ready.\n\nAmount due: {} {:.2}\n\nBest regards,\nThe Safari Quotes Team",
            client_name, invoice_number, currency, amount
        ),
    }
}

pub struct EmailService {
    api_key: String,
    from_email: String,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new() -> Result<Self, EmailError> {
        let api_key = env::var("SENDGRID_API_KEY")
            .map_err(|_| EmailError::EnvironmentError("SENDGRID_API_KEY not set".to_string()))?;
        let from_email =
            env::var("FROM_EMAIL").unwrap_or_else(|_| "noreply@safariquotes.example".to_string());

        let client = reqwest::Client::new();

        Ok(Self {
            api_key,
            from_email,
            client,
        })
    }

    /// One SendGrid call carrying both the plain-text and HTML bodies.
    /// SendGrid requires text/plain to come before text/html.
    pub async fn send(
        &self,
        to_email: &str,
        message: &EmailMessage,
        reply_to: Option<&str>,
    ) -> Result<(), EmailError> {
        let url = "https://api.sendgrid.com/v3/mail/send";

        let request = SendGridRequest {
            personalizations: vec![SendGridPersonalization {
                to: vec![SendGridEmail {
                    email: to_email.to_string(),
                }],
            }],
            from: SendGridEmail {
                email: self.from_email.clone(),
            },
            reply_to: reply_to.map(|email| SendGridEmail {
                email: email.to_string(),
            }),
            subject: message.subject.clone(),
            content: vec![
                SendGridContent {
                    content_type: "text/plain".to_string(),
                    value: message.text_body.clone(),
                },
                SendGridContent {
                    content_type: "text/html".to_string(),
                    value: message.html_body.clone(),
                },
            ],
        };

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| EmailError::RequestError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(EmailError::ApiError(format!(
                "Status: {}, Body: {}",
                status, body
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_generated_template_carries_code_and_total() {
        let message = quote_generated("Jane Doe", "QT-A1B2C3", "Jane Doe - Safari", 750.0, "USD");
        assert!(message.subject.contains("QT-A1B2C3"));
        assert!(message.html_body.contains("QT-A1B2C3"));
        assert!(message.html_body.contains("USD 750.00"));
        assert!(message.text_body.contains("USD 750.00"));
        assert!(!message.text_body.contains('<'));
    }

    #[test]
    fn test_every_template_has_both_bodies() {
        let messages = [
            welcome("Jane"),
            email_confirmation("Jane", "ABC123"),
            password_reset("Jane", "https://example.com/reset"),
            company_approval_request("Kili Tours", "jane@example.com"),
            company_approved("Kili Tours"),
            quote_generated("Jane", "QT-XYZ999", "Jane - Safari", 100.0, "USD"),
            invoice_generated("Jane", "INV-0001", 100.0, "USD"),
        ];
        for message in &messages {
            assert!(!message.subject.is_empty());
            assert!(message.html_body.contains("<html>"));
            assert!(!message.text_body.is_empty());
        }
    }
}
