/// Everything the mail template needs to deliver one access code.
#[derive(Debug, Clone)]
pub struct CodeDelivery {
    pub to_email: String,
    pub from_email: String,
    pub access_code: String,
    /// Code lifetime in minutes, rendered into the mail body.
    pub expires_in_mins: i64,
    /// Deep link back into the app with email and code pre-filled.
    pub login_link: String,
}
