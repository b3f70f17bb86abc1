//! Business logic services.

pub mod account;
pub mod email;
pub mod enrollment;
pub mod identity;
pub mod oauth;
pub mod verification;

pub use account::{LocalAccountService, SignupInput};
pub use email::{
    password_reset_email, signup_verification_email, MailTransport, Mailer, SmtpMailer,
};
pub use enrollment::{AddCourseInput, EnrollmentService, GradeSummary, RegisterStudentInput};
pub use identity::{AuthScheme, Identity, IdentityResolver, SchemeTokens};
pub use oauth::{
    generate_state, GoogleOAuth, KakaoOAuth, NaverOAuth, OAuthProvider, OAuthService,
    ProviderClient, ProviderProfile,
};
pub use verification::{VerificationFlow, VerificationService};
