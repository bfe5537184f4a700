use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::mailer::EmailMessage;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(alias = "phoneNumber")]
    #[validate(length(min = 1, max = 64))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub description: String,
}

impl ContactRequest {
    pub fn into_email(self, from: &str, to: &str) -> EmailMessage {
        EmailMessage {
            from: from.to_string(),
            to: to.to_string(),
            subject: "New Contact Form Submission".to_string(),
            text: format!(
                "Name: {}\nEmail: {}\nPhone Number: {}\nDescription: {}\n",
                self.name, self.email, self.phone_number, self.description
            ),
        }
    }
}
