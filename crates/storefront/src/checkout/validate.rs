//! Step-level form validation.
//!
//! Errors are field-scoped so the UI can render them inline next to the
//! offending input. Validation never aborts the wizard; it only blocks
//! advancing past the current step.

use std::collections::BTreeMap;

use bazario_core::{Email, PaymentMethod, Phone};

use super::form::CheckoutForm;
use super::orchestrator::CheckoutStep;

/// Payment methods enabled in this deployment. Card, bank, and wallet are
/// collected in the form but not yet accepted at submission.
pub const ENABLED_METHODS: &[PaymentMethod] = &[PaymentMethod::Cash];

/// Field-scoped validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field. The first error per field wins.
    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_owned())
            .or_insert_with(|| message.to_owned());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The error for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Iterate errors in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate the step the wizard is currently on.
///
/// Takes the form mutably because the payment step coerces a disabled
/// method selection back to cash.
pub fn validate_step(step: CheckoutStep, form: &mut CheckoutForm) -> ValidationErrors {
    match step {
        CheckoutStep::CustomerInfo => validate_customer(form),
        CheckoutStep::Address => validate_address(form),
        CheckoutStep::Payment => validate_payment(form),
        CheckoutStep::Review => validate_full(form),
    }
}

/// Re-run every step's validation, as the review step does before
/// allowing submission.
pub fn validate_full(form: &mut CheckoutForm) -> ValidationErrors {
    let mut errors = validate_customer(form);
    for (field, message) in validate_address(form).iter() {
        errors.add(field, message);
    }
    for (field, message) in validate_payment(form).iter() {
        errors.add(field, message);
    }
    errors
}

fn validate_customer(form: &CheckoutForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if form.customer.name.trim().is_empty() {
        errors.add("name", "Name is required");
    }

    if let Err(e) = Email::parse(&form.customer.email) {
        errors.add("email", &e.to_string());
    }

    if let Err(e) = Phone::parse(&form.customer.phone) {
        errors.add("phone", &e.to_string());
    }

    errors
}

fn validate_address(form: &CheckoutForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let address = &form.address;

    for (field, value) in [
        ("street", &address.street),
        ("city", &address.city),
        ("state", &address.state),
        ("zip", &address.zip),
        ("country", &address.country),
    ] {
        if value.trim().is_empty() {
            errors.add(field, &format!("{field} is required"));
        }
    }

    errors
}

/// Exactly one method must be selected, and it must be enabled.
///
/// Selecting a disabled method coerces the form back to cash and reports
/// a one-time error; revalidation then passes on the coerced form.
fn validate_payment(form: &mut CheckoutForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if !ENABLED_METHODS.contains(&form.payment_method) {
        form.payment_method = PaymentMethod::Cash;
        errors.add(
            "payment_method",
            "Only cash on delivery is available right now",
        );
    }

    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        let mut form = CheckoutForm::default();
        form.customer.name = "Ayesha Khan".to_string();
        form.customer.email = "ayesha@example.com".to_string();
        form.customer.phone = "+923001234567".to_string();
        form.address.street = "14-B Mall Road".to_string();
        form.address.city = "Lahore".to_string();
        form.address.state = "Punjab".to_string();
        form.address.zip = "54000".to_string();
        form.address.country = "Pakistan".to_string();
        form
    }

    #[test]
    fn test_valid_form_passes_every_step() {
        let mut form = valid_form();
        for step in CheckoutStep::ALL {
            assert!(validate_step(step, &mut form).is_empty(), "step {step:?}");
        }
    }

    #[test]
    fn test_customer_info_field_errors() {
        let mut form = valid_form();
        form.customer.name = "  ".to_string();
        form.customer.email = "not-an-email".to_string();
        form.customer.phone = "123".to_string();

        let errors = validate_step(CheckoutStep::CustomerInfo, &mut form);
        assert_eq!(errors.len(), 3);
        assert!(errors.get("name").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("phone").is_some());
    }

    #[test]
    fn test_phone_grammar_accepted_shapes() {
        for phone in ["+923001234567", "03001234567", "+14155552671", "3001234567"] {
            let mut form = valid_form();
            form.customer.phone = phone.to_string();
            assert!(
                validate_step(CheckoutStep::CustomerInfo, &mut form).is_empty(),
                "{phone} should validate"
            );
        }
    }

    #[test]
    fn test_address_requires_every_field() {
        let mut form = valid_form();
        form.address.zip = String::new();
        form.address.country = String::new();

        let errors = validate_step(CheckoutStep::Address, &mut form);
        assert_eq!(errors.len(), 2);
        assert!(errors.get("zip").is_some());
        assert!(errors.get("country").is_some());
    }

    #[test]
    fn test_disabled_payment_method_coerced_to_cash_once() {
        let mut form = valid_form();
        form.payment_method = PaymentMethod::Card;

        let errors = validate_step(CheckoutStep::Payment, &mut form);
        assert!(errors.get("payment_method").is_some());
        assert_eq!(form.payment_method, PaymentMethod::Cash);

        // Coerced form validates cleanly on the next pass.
        let errors = validate_step(CheckoutStep::Payment, &mut form);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_full_validation_collects_across_steps() {
        let mut form = valid_form();
        form.customer.email = String::new();
        form.address.city = String::new();
        form.payment_method = PaymentMethod::Wallet;

        let errors = validate_full(&mut form);
        assert!(errors.get("email").is_some());
        assert!(errors.get("city").is_some());
        assert!(errors.get("payment_method").is_some());
    }

    #[test]
    fn test_display_joins_field_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Email is required");
        errors.add("name", "Name is required");
        let rendered = errors.to_string();
        assert!(rendered.contains("email: Email is required"));
        assert!(rendered.contains("name: Name is required"));
    }
}
