//! Route guard for the signup flow. Pages ask "am I allowed here"; a denial
//! carries the earliest step whose prerequisite is missing, which is also the
//! redirect target.

use super::{SignupSession, UserType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignupStep {
    Verification,
    Authentication,
    Otp,
    Pin,
}

impl SignupStep {
    pub fn path(&self) -> &'static str {
        match self {
            SignupStep::Verification => "/signup/verification",
            SignupStep::Authentication => "/signup/authentication",
            SignupStep::Otp => "/signup/otp",
            SignupStep::Pin => "/signup/new-pin",
        }
    }
}

/// The furthest step the session is allowed to be on, given what it holds.
pub fn earliest_valid_step(session: &SignupSession) -> SignupStep {
    if session.iprs_data.is_none() || session.verification_data.is_none() {
        return SignupStep::Verification;
    }
    if session.user_type() == Some(UserType::Company) && session.entity_response.is_none() {
        return SignupStep::Verification;
    }
    if session.authentication_data.is_none() || session.user_creation_response.is_none() {
        return SignupStep::Authentication;
    }
    SignupStep::Otp
}

/// `Ok` when `step` may run against `session`, otherwise the step to
/// redirect to. OTP and PIN share the creation-response prerequisite and
/// both redirect when it is missing.
pub fn check(step: SignupStep, session: &SignupSession) -> Result<(), SignupStep> {
    let allowed = earliest_valid_step(session);
    // Pin is reachable whenever Otp is: both gate on the durable user id.
    let effective = if step == SignupStep::Pin { SignupStep::Otp } else { step };
    if effective <= allowed {
        Ok(())
    } else {
        Err(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{
        AuthenticationData, EntityResponse, IprsData, SessionPatch, UserCreationResponse,
        VerificationData,
    };

    fn session_through_verification(user_type: UserType) -> SignupSession {
        let mut session = SignupSession::default();
        session.merge(SessionPatch {
            iprs_data: Some(IprsData {
                id_number: "12345678".to_string(),
                full_name: "Jane Doe".to_string(),
                gender: None,
                date_of_birth: None,
                phone_number: None,
                email: None,
                nationality: None,
                county_of_birth: None,
            }),
            verification_data: Some(VerificationData {
                full_name: "Jane Doe".to_string(),
                user_type,
            }),
            ..Default::default()
        });
        session
    }

    #[test]
    fn empty_session_redirects_everything_to_verification() {
        let session = SignupSession::default();
        assert_eq!(earliest_valid_step(&session), SignupStep::Verification);
        assert_eq!(
            check(SignupStep::Authentication, &session),
            Err(SignupStep::Verification)
        );
        assert_eq!(check(SignupStep::Otp, &session), Err(SignupStep::Verification));
        assert_eq!(check(SignupStep::Pin, &session), Err(SignupStep::Verification));
    }

    #[test]
    fn verified_individual_may_authenticate_but_not_enter_otp() {
        let session = session_through_verification(UserType::Individual);
        assert_eq!(check(SignupStep::Authentication, &session), Ok(()));
        assert_eq!(
            check(SignupStep::Otp, &session),
            Err(SignupStep::Authentication)
        );
    }

    #[test]
    fn company_without_entity_record_stays_on_verification() {
        let session = session_through_verification(UserType::Company);
        assert_eq!(
            check(SignupStep::Authentication, &session),
            Err(SignupStep::Verification)
        );
    }

    #[test]
    fn creation_response_unlocks_otp_and_pin() {
        let mut session = session_through_verification(UserType::Company);
        session.merge(SessionPatch {
            entity_response: Some(EntityResponse {
                entity_id: "BRS-9001".to_string(),
                company_name: "Mumias Growers Ltd".to_string(),
                director_id: "22334455".to_string(),
                role: "Director".to_string(),
            }),
            authentication_data: Some(AuthenticationData {
                id_number: "12345678".to_string(),
                phone_number: "0712345678".to_string(),
                email: "jane@example.com".to_string(),
                user_type: UserType::Company,
            }),
            user_creation_response: Some(UserCreationResponse { id: 7 }),
            ..Default::default()
        });
        assert_eq!(check(SignupStep::Otp, &session), Ok(()));
        assert_eq!(check(SignupStep::Pin, &session), Ok(()));
    }

    #[test]
    fn step_paths_match_portal_routes() {
        assert_eq!(SignupStep::Verification.path(), "/signup/verification");
        assert_eq!(SignupStep::Pin.path(), "/signup/new-pin");
    }
}
