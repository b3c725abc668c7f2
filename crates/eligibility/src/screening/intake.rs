use super::domain::ApplicantAttributes;

/// Upper bound the intake form accepts for an applicant's age.
pub const MAX_APPLICANT_AGE: u8 = 120;

/// Validation errors raised by the intake guard.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("nationality must not be empty")]
    MissingNationality,
    #[error("age must be at most {max} (found {found})")]
    AgeOutOfRange { max: u8, found: u8 },
}

/// Validate a raw submission, returning the trimmed attribute set the adapter
/// consumes. Range checks live here; the adapter itself validates nothing.
pub fn screen_submission(
    mut attributes: ApplicantAttributes,
) -> Result<ApplicantAttributes, IntakeViolation> {
    let trimmed = attributes.nationality.trim().to_string();
    if trimmed.is_empty() {
        return Err(IntakeViolation::MissingNationality);
    }
    if attributes.age > MAX_APPLICANT_AGE {
        return Err(IntakeViolation::AgeOutOfRange {
            max: MAX_APPLICANT_AGE,
            found: attributes.age,
        });
    }

    attributes.nationality = trimmed;
    Ok(attributes)
}
