use crate::models::donation::DonationError;
use lettre::Address;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DonationRequest {
    pub email: String,
    pub amount: i32,
}

impl DonationRequest {
    pub fn validate(&self) -> Result<(), DonationError> {
        self.email
            .parse::<Address>()
            .map_err(|e| DonationError::InvalidEmail(e.to_string()))?;

        if !(1..=3).contains(&self.amount) {
            return Err(DonationError::InvalidAmount);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, amount: i32) -> DonationRequest {
        DonationRequest {
            email: email.to_string(),
            amount,
        }
    }

    #[test]
    fn accepts_amounts_between_one_and_three() {
        for amount in 1..=3 {
            assert!(request("donor@example.com", amount).validate().is_ok());
        }
    }

    #[test]
    fn rejects_amounts_outside_range() {
        for amount in [-1, 0, 4, 5, 100] {
            let err = request("donor@example.com", amount).validate().unwrap_err();
            assert!(matches!(err, DonationError::InvalidAmount));
            assert_eq!(err.to_string(), "amount must be between 1 and 3");
        }
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["", "not-an-email", "missing@domain@twice"] {
            assert!(matches!(
                request(email, 2).validate(),
                Err(DonationError::InvalidEmail(_))
            ));
        }
    }
}
