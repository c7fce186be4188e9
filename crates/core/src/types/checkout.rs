//! Checkout form state.
//!
//! These types hold what the customer types into the checkout wizard. They
//! are transient: nothing here is persisted beyond a checkout session.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::form::{FormError, require};
use crate::Email;

/// Shipping and contact details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl CustomerDetails {
    /// Every field is required; the email must look like an address.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found, in form order.
    pub fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        require("phone", &self.phone)?;
        require("email", &self.email)?;
        Email::parse(&self.email)?;
        require("address", &self.address)?;
        require("city", &self.city)?;
        require("state", &self.state)?;
        require("pincode", &self.pincode)?;
        Ok(())
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Upi,
    NetBanking,
    Wallet,
}

impl PaymentMethod {
    /// Every method, in the order the wizard offers them.
    pub const ALL: [Self; 4] = [Self::Card, Self::Upi, Self::NetBanking, Self::Wallet];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit/Debit Card",
            Self::Upi => "UPI Payment",
            Self::NetBanking => "Net Banking",
            Self::Wallet => "Digital Wallet",
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Upi => "upi",
            Self::NetBanking => "netbanking",
            Self::Wallet => "wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown payment method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl std::str::FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPaymentMethod(s.to_owned()))
    }
}

/// Method-specific payment fields. Only the fields of the selected method
/// are required.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub card_name: String,
    pub upi_id: String,
    pub bank_name: String,
    pub wallet: String,
}

impl PaymentDetails {
    /// Check the fields required by `method`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingField`] for the first empty required field.
    pub fn validate(&self, method: PaymentMethod) -> Result<(), FormError> {
        match method {
            PaymentMethod::Card => {
                require("card_number", &self.card_number)?;
                require("card_name", &self.card_name)?;
                require("expiry_date", &self.expiry_date)?;
                require("cvv", &self.cvv)
            }
            PaymentMethod::Upi => require("upi_id", &self.upi_id),
            PaymentMethod::NetBanking => require("bank_name", &self.bank_name),
            PaymentMethod::Wallet => require("wallet", &self.wallet),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::EmailError;

    fn filled() -> CustomerDetails {
        CustomerDetails {
            name: "Asha Rao".to_owned(),
            email: "asha@example.in".to_owned(),
            phone: "9876543210".to_owned(),
            address: "12 MG Road".to_owned(),
            city: "Pune".to_owned(),
            state: "maharashtra".to_owned(),
            pincode: "411001".to_owned(),
        }
    }

    #[test]
    fn test_customer_details_complete() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_customer_details_missing_fields() {
        let mut details = filled();
        details.city = "   ".to_owned();
        assert_eq!(details.validate(), Err(FormError::MissingField("city")));

        assert_eq!(
            CustomerDetails::default().validate(),
            Err(FormError::MissingField("name"))
        );
    }

    #[test]
    fn test_customer_details_bad_email() {
        let mut details = filled();
        details.email = "asha.example.in".to_owned();
        assert_eq!(
            details.validate(),
            Err(FormError::InvalidEmail(EmailError::MissingAtSymbol))
        );
    }

    #[test]
    fn test_payment_details_only_check_selected_method() {
        let upi = PaymentDetails {
            upi_id: "asha@okbank".to_owned(),
            ..PaymentDetails::default()
        };
        assert!(upi.validate(PaymentMethod::Upi).is_ok());
        assert_eq!(
            upi.validate(PaymentMethod::Card),
            Err(FormError::MissingField("card_number"))
        );
        assert_eq!(
            upi.validate(PaymentMethod::Wallet),
            Err(FormError::MissingField("wallet"))
        );
    }

    #[test]
    fn test_payment_method_names() {
        assert_eq!("netbanking".parse::<PaymentMethod>().unwrap(), PaymentMethod::NetBanking);
        assert_eq!("UPI".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert!("cash".parse::<PaymentMethod>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentMethod::NetBanking).unwrap(),
            "\"netbanking\""
        );
    }
}
