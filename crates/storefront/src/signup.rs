//! Sign-up form validation and the registration payload.
//!
//! Sign-up has its own rules, separate from checkout. Any `x@y.z` email is
//! accepted, but the phone must use one of the `010`, `011`, `012` or `015`
//! mobile prefixes. The password needs at least six characters and must be
//! typed twice, and the terms must be accepted.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use techstore_core::ShippingRegion;
use tracing::{debug, instrument};

use crate::checkout::ORDER_COUNTRY;
use crate::validation::{FieldErrors, required};

static SIGNUP_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("Invalid regex"));

/// `010`, `011`, `012` or `015` followed by eight digits.
static SIGNUP_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^01[0125][0-9]{8}$").expect("Invalid regex"));

/// Shortest password the form accepts, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Sign-up form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignupField {
    Name,
    Email,
    Phone,
    Governorate,
    City,
    PostalCode,
    StreetAddress,
    Password,
    ConfirmPassword,
    AgreeToTerms,
}

impl fmt::Display for SignupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Governorate => "governorate",
            Self::City => "city",
            Self::PostalCode => "postalCode",
            Self::StreetAddress => "streetAddress",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::AgreeToTerms => "agreeToTerms",
        };
        f.write_str(name)
    }
}

/// Why a sign-up field failed. Serialises to its translation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignupMessage {
    #[serde(rename = "auth.signup.validation.name_required")]
    NameRequired,
    #[serde(rename = "auth.signup.validation.email_required")]
    EmailRequired,
    #[serde(rename = "auth.signup.validation.email_invalid")]
    EmailInvalid,
    #[serde(rename = "auth.signup.validation.phone_required")]
    PhoneRequired,
    #[serde(rename = "auth.signup.validation.phone_invalid")]
    PhoneInvalid,
    #[serde(rename = "auth.signup.validation.governorate_required")]
    GovernorateRequired,
    #[serde(rename = "auth.signup.validation.city_required")]
    CityRequired,
    #[serde(rename = "auth.signup.validation.postal_code_required")]
    PostalCodeRequired,
    #[serde(rename = "auth.signup.validation.address_required")]
    AddressRequired,
    #[serde(rename = "auth.signup.validation.password_required")]
    PasswordRequired,
    #[serde(rename = "auth.signup.validation.password_length")]
    PasswordLength,
    #[serde(rename = "auth.signup.validation.password_mismatch")]
    PasswordMismatch,
    #[serde(rename = "auth.signup.validation.terms")]
    Terms,
}

impl SignupMessage {
    /// Translation key for the message.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::NameRequired => "auth.signup.validation.name_required",
            Self::EmailRequired => "auth.signup.validation.email_required",
            Self::EmailInvalid => "auth.signup.validation.email_invalid",
            Self::PhoneRequired => "auth.signup.validation.phone_required",
            Self::PhoneInvalid => "auth.signup.validation.phone_invalid",
            Self::GovernorateRequired => "auth.signup.validation.governorate_required",
            Self::CityRequired => "auth.signup.validation.city_required",
            Self::PostalCodeRequired => "auth.signup.validation.postal_code_required",
            Self::AddressRequired => "auth.signup.validation.address_required",
            Self::PasswordRequired => "auth.signup.validation.password_required",
            Self::PasswordLength => "auth.signup.validation.password_length",
            Self::PasswordMismatch => "auth.signup.validation.password_mismatch",
            Self::Terms => "auth.signup.validation.terms",
        }
    }
}

impl fmt::Display for SignupMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Every failing sign-up field with its message.
pub type SignupErrors = FieldErrors<SignupField, SignupMessage>;

/// Raw sign-up form input.
#[derive(Debug)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Governorate slug from the picker, e.g. `kafr-el-sheikh`.
    pub governorate: String,
    pub city: String,
    pub postal_code: String,
    pub street_address: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub agree_to_terms: bool,
}

/// Address attached to a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupAddress {
    pub street: String,
    pub city: String,
    /// The governorate.
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
}

impl SignupAddress {
    /// Shipping region for the address's governorate.
    #[must_use]
    pub fn shipping_region(&self) -> ShippingRegion {
        ShippingRegion::for_governorate(&self.state)
    }
}

/// The body posted to the register endpoint.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
    pub phone: String,
    pub addresses: Vec<SignupAddress>,
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl SignupForm {
    /// Validate every field, collecting all errors, and build the register
    /// request.
    ///
    /// # Errors
    ///
    /// Returns the failing fields if a required field is blank, the email
    /// or phone is malformed, the password is short or not repeated, or the
    /// terms are not accepted.
    #[instrument(skip_all)]
    pub fn validate(&self) -> Result<RegisterRequest, SignupErrors> {
        let mut errors = SignupErrors::default();

        let name = required(&mut errors, SignupField::Name, &self.name, SignupMessage::NameRequired);
        let governorate = required(
            &mut errors,
            SignupField::Governorate,
            &self.governorate,
            SignupMessage::GovernorateRequired,
        );
        let city = required(&mut errors, SignupField::City, &self.city, SignupMessage::CityRequired);
        let postal_code = required(
            &mut errors,
            SignupField::PostalCode,
            &self.postal_code,
            SignupMessage::PostalCodeRequired,
        );
        let street = required(
            &mut errors,
            SignupField::StreetAddress,
            &self.street_address,
            SignupMessage::AddressRequired,
        );

        let email = required(&mut errors, SignupField::Email, &self.email, SignupMessage::EmailRequired)
            .filter(|email| {
                let valid = SIGNUP_EMAIL_RE.is_match(email);
                if !valid {
                    errors.insert(SignupField::Email, SignupMessage::EmailInvalid);
                }
                valid
            });

        let phone = required(&mut errors, SignupField::Phone, &self.phone, SignupMessage::PhoneRequired)
            .filter(|phone| {
                let valid = SIGNUP_PHONE_RE.is_match(phone);
                if !valid {
                    errors.insert(SignupField::Phone, SignupMessage::PhoneInvalid);
                }
                valid
            });

        let password = self.password.expose_secret();
        if password.is_empty() {
            errors.insert(SignupField::Password, SignupMessage::PasswordRequired);
        } else if password.chars().count() < MIN_PASSWORD_CHARS {
            errors.insert(SignupField::Password, SignupMessage::PasswordLength);
        }
        if self.confirm_password.expose_secret() != password {
            errors.insert(SignupField::ConfirmPassword, SignupMessage::PasswordMismatch);
        }
        if !self.agree_to_terms {
            errors.insert(SignupField::AgreeToTerms, SignupMessage::Terms);
        }

        match (name, email, phone, governorate, city, postal_code, street) {
            (
                Some(name),
                Some(email),
                Some(phone),
                Some(state),
                Some(city),
                Some(zip_code),
                Some(street),
            ) if errors.is_empty() => Ok(RegisterRequest {
                name,
                email,
                password: SecretString::from(password),
                phone,
                addresses: vec![SignupAddress {
                    street,
                    city,
                    state,
                    zip_code,
                    country: ORDER_COUNTRY.to_owned(),
                    is_default: true,
                }],
            }),
            _ => {
                debug!(errors = errors.len(), "Sign-up form rejected");
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> SignupForm {
        SignupForm {
            name: "Nour Khaled".to_string(),
            email: "nour@example.eg".to_string(),
            phone: "01512345678".to_string(),
            governorate: "kafr-el-sheikh".to_string(),
            city: "Desouk".to_string(),
            postal_code: "33611".to_string(),
            street_address: " 4 El Geish St ".to_string(),
            password: SecretString::from("hunter22"),
            confirm_password: SecretString::from("hunter22"),
            agree_to_terms: true,
        }
    }

    #[test]
    fn test_valid_form_builds_register_request() {
        let request = valid_form().validate().unwrap();
        assert_eq!(request.name, "Nour Khaled");
        assert_eq!(request.password.expose_secret(), "hunter22");

        let address = &request.addresses[0];
        assert_eq!(address.street, "4 El Geish St");
        assert_eq!(address.shipping_region(), ShippingRegion::Delta);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["password"], "hunter22");
        assert_eq!(json["addresses"][0]["state"], "kafr-el-sheikh");
        assert_eq!(json["addresses"][0]["zipCode"], "33611");
        assert_eq!(json["addresses"][0]["country"], "Egypt");
        assert_eq!(json["addresses"][0]["isDefault"], true);
    }

    #[test]
    fn test_blank_form_reports_every_field() {
        let form = SignupForm {
            name: String::new(),
            email: " ".to_string(),
            phone: String::new(),
            governorate: String::new(),
            city: String::new(),
            postal_code: String::new(),
            street_address: String::new(),
            password: SecretString::from(""),
            confirm_password: SecretString::from(""),
            agree_to_terms: false,
        };
        let errors = form.validate().unwrap_err();

        // Empty passwords match, so there is no mismatch error.
        assert_eq!(errors.len(), 9);
        assert_eq!(errors.get(SignupField::Email), Some(SignupMessage::EmailRequired));
        assert_eq!(errors.get(SignupField::Password), Some(SignupMessage::PasswordRequired));
        assert_eq!(errors.get(SignupField::AgreeToTerms), Some(SignupMessage::Terms));
        assert_eq!(errors.get(SignupField::ConfirmPassword), None);
    }

    #[test]
    fn test_phone_prefixes() {
        for phone in ["01012345678", "01112345678", "01212345678", "01512345678"] {
            let form = SignupForm {
                phone: phone.to_string(),
                ..valid_form()
            };
            assert!(form.validate().is_ok(), "{phone}");
        }
        for phone in ["01312345678", "01,12345678", "0101234567", "+201012345678"] {
            let form = SignupForm {
                phone: phone.to_string(),
                ..valid_form()
            };
            let errors = form.validate().unwrap_err();
            assert_eq!(errors.get(SignupField::Phone), Some(SignupMessage::PhoneInvalid), "{phone}");
        }
    }

    #[test]
    fn test_loose_email_rule() {
        let accepted = SignupForm {
            email: "a@b.c".to_string(),
            ..valid_form()
        };
        assert!(accepted.validate().is_ok());

        let rejected = SignupForm {
            email: "nour@localhost".to_string(),
            ..valid_form()
        };
        assert_eq!(
            rejected.validate().unwrap_err().get(SignupField::Email),
            Some(SignupMessage::EmailInvalid)
        );
    }

    #[test]
    fn test_password_rules() {
        let short = SignupForm {
            password: SecretString::from("abc12"),
            confirm_password: SecretString::from("abc12"),
            ..valid_form()
        };
        let errors = short.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(SignupField::Password), Some(SignupMessage::PasswordLength));

        // Six characters, counted as characters rather than bytes
        let arabic = SignupForm {
            password: SecretString::from("كلمةسر"),
            confirm_password: SecretString::from("كلمةسر"),
            ..valid_form()
        };
        assert!(arabic.validate().is_ok());

        let mismatch = SignupForm {
            confirm_password: SecretString::from("hunter23"),
            ..valid_form()
        };
        let errors = mismatch.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "confirmPassword: auth.signup.validation.password_mismatch"
        );
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let form = SignupForm {
            agree_to_terms: false,
            ..valid_form()
        };
        let json = serde_json::to_value(form.validate().unwrap_err()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "agreeToTerms": "auth.signup.validation.terms" })
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", valid_form());
        assert!(!rendered.contains("hunter22"));
    }
}
