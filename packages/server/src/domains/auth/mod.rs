// Auth domain - OTP login over WhatsApp, JWT sessions

pub mod errors;
pub mod jwt;
pub mod otp;

pub use errors::AuthError;
pub use jwt::{Claims, JwtService};
pub use otp::OtpCode;
