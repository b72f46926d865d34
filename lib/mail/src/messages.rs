//! Message builders for the account lifecycle emails.

/// A fully rendered message ready to hand to a [`Mailer`](crate::Mailer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
    pub html: Option<String>,
}

/// Account verification email embedding the magic link.
#[must_use]
pub fn verification(verification_link: &str) -> EmailMessage {
    let subject = "Verify your Jobsta account".to_string();
    let body = format!("Click here to verify your account: {verification_link}");
    let html = format!(
        "<html><body>\
         <h2>Verify Your Jobsta Account</h2>\
         <p>Click the link below to verify your account:</p>\
         <p><a href=\"{verification_link}\">Verify Account</a></p>\
         <p>Or copy and paste this link: {verification_link}</p>\
         </body></html>"
    );
    EmailMessage {
        subject,
        body,
        html: Some(html),
    }
}

/// Magic-link login email for users without a password.
#[must_use]
pub fn magic_link(login_link: &str) -> EmailMessage {
    let subject = "Your Jobsta login link".to_string();
    let body = format!("Click here to log in: {login_link}");
    let html = format!(
        "<html><body>\
         <h2>Log in to Jobsta</h2>\
         <p><a href=\"{login_link}\">Log In</a></p>\
         <p>Or copy and paste this link: {login_link}</p>\
         <p>The link expires in one hour.</p>\
         </body></html>"
    );
    EmailMessage {
        subject,
        body,
        html: Some(html),
    }
}

/// One-time disclosure of the generated temporary password.
///
/// The plaintext appears only here and in the delivered message; it is
/// never persisted or logged in full.
#[must_use]
pub fn temp_password(password: &str) -> EmailMessage {
    let subject = "Welcome to Jobsta - Your Temporary Password".to_string();
    let body = format!(
        "Your account has been verified. Your temporary password is: {password}\n\
         Please log in and change your password as soon as possible."
    );
    let html = format!(
        "<html><body>\
         <h2>Welcome to Jobsta</h2>\
         <p>Your account has been verified.</p>\
         <p><strong>Your temporary password is:</strong> <code>{password}</code></p>\
         <p>Please log in and change your password as soon as possible.</p>\
         </body></html>"
    );
    EmailMessage {
        subject,
        body,
        html: Some(html),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_embeds_the_link() {
        let msg = verification("https://jobsta.example/verify/abc123");
        assert!(msg.body.contains("/verify/abc123"));
        assert!(msg.html.expect("html").contains("/verify/abc123"));
        assert_eq!(msg.subject, "Verify your Jobsta account");
    }

    #[test]
    fn magic_link_embeds_the_link() {
        let msg = magic_link("https://jobsta.example/verify/tok");
        assert!(msg.body.contains("/verify/tok"));
        assert!(msg.html.expect("html").contains("expires in one hour"));
    }

    #[test]
    fn temp_password_discloses_exactly_once() {
        let msg = temp_password("a1b2c3d4e5f6");
        assert!(msg.body.contains("a1b2c3d4e5f6"));
        assert!(msg.body.contains("change your password"));
    }
}
