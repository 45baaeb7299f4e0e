//! Simulated payment gateway.
//!
//! Stands in for a real acquirer during development and demos: card and
//! bank details are validated for real (Luhn, ABA checksum), known test
//! numbers succeed or fail deterministically, and everything else succeeds
//! with a fixed probability to exercise decline handling upstream.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use bazario_core::{Money, TransactionId};

use super::{PaymentError, PaymentGateway, PaymentReceipt, PaymentRequest};

const CARD_SUCCESS_RATE: f64 = 0.8;
const BANK_SUCCESS_RATE: f64 = 0.9;

/// Test cards that fail deterministically, with their reason.
const CARD_DENY_LIST: &[(&str, PaymentError)] = &[
    ("4000000000000002", PaymentError::CardDeclined),
    ("4000000000000119", PaymentError::ProcessingError),
    ("4000000000000127", PaymentError::InvalidCardNumber),
];

/// Test cards that always succeed.
const CARD_ALLOW_LIST: &[&str] = &["4111111111111111", "4242424242424242", "5555555555554444"];

/// Wallet credentials that always fail.
const WALLET_DENY_NUMBER: &str = "03000000000";
const WALLET_DENY_PIN: &str = "0000";

/// Simulated gateway with seedable randomness.
pub struct PaymentSimulator {
    rng: Mutex<StdRng>,
}

impl PaymentSimulator {
    /// Gateway seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Gateway with a fixed seed, for deterministic tests.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn roll(&self, success_rate: f64) -> bool {
        match self.rng.lock() {
            Ok(mut rng) => rng.random::<f64>() < success_rate,
            Err(_) => false,
        }
    }

    fn receipt(prefix: &str, message: &str, amount: Money) -> PaymentReceipt {
        PaymentReceipt {
            transaction_id: TransactionId::new(format!("{prefix}_{}", Uuid::new_v4().simple())),
            message: message.to_string(),
            amount,
        }
    }

    fn process_card(&self, number: &str, amount: Money) -> Result<PaymentReceipt, PaymentError> {
        let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();

        if !(13..=19).contains(&digits.len())
            || !digits.chars().all(|c| c.is_ascii_digit())
            || !luhn_valid(&digits)
        {
            return Err(PaymentError::InvalidCardNumber);
        }

        if let Some((_, reason)) = CARD_DENY_LIST.iter().find(|(card, _)| *card == digits) {
            return Err(reason.clone());
        }

        if CARD_ALLOW_LIST.contains(&digits.as_str()) {
            return Ok(Self::receipt("card", "Payment approved", amount));
        }

        if self.roll(CARD_SUCCESS_RATE) {
            Ok(Self::receipt("card", "Payment approved", amount))
        } else {
            Err(PaymentError::CardDeclined)
        }
    }

    fn process_bank(
        &self,
        account_number: &str,
        routing_number: &str,
        amount: Money,
    ) -> Result<PaymentReceipt, PaymentError> {
        if !valid_account_number(account_number) {
            return Err(PaymentError::InvalidAccountNumber);
        }
        if !valid_routing_number(routing_number) {
            return Err(PaymentError::InvalidRoutingNumber);
        }

        if self.roll(BANK_SUCCESS_RATE) {
            Ok(Self::receipt("bank", "Transfer initiated", amount))
        } else {
            Err(PaymentError::TransferFailed)
        }
    }

    fn process_wallet(
        number: &str,
        pin: &str,
        amount: Money,
    ) -> Result<PaymentReceipt, PaymentError> {
        if number == WALLET_DENY_NUMBER || pin == WALLET_DENY_PIN {
            return Err(PaymentError::WalletRejected);
        }
        Ok(Self::receipt("wallet", "Wallet payment confirmed", amount))
    }
}

impl Default for PaymentSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentGateway for PaymentSimulator {
    fn process(
        &self,
        request: &PaymentRequest,
        amount: Money,
    ) -> Result<PaymentReceipt, PaymentError> {
        match request {
            PaymentRequest::Card { number, .. } => self.process_card(number, amount),
            PaymentRequest::Bank {
                account_number,
                routing_number,
            } => self.process_bank(account_number, routing_number, amount),
            PaymentRequest::Wallet { number, pin } => Self::process_wallet(number, pin, amount),
            PaymentRequest::Cash => Ok(Self::receipt(
                "cod",
                "Cash on delivery confirmed",
                amount,
            )),
        }
    }
}

/// Luhn checksum over a digit string.
fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(d) = c.to_digit(10) else {
            return false;
        };
        let d = if i % 2 == 1 {
            let doubled = d * 2;
            if doubled > 9 { doubled - 9 } else { doubled }
        } else {
            d
        };
        sum += d;
    }
    sum % 10 == 0
}

/// 8-17 digits, and not a degenerate all-0/all-1/all-9 filler.
fn valid_account_number(account: &str) -> bool {
    if !(8..=17).contains(&account.len()) || !account.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    !['0', '1', '9']
        .iter()
        .any(|filler| account.chars().all(|c| c == *filler))
}

/// Exactly 9 digits passing the ABA checksum (3-7-1 weights mod 10).
fn valid_routing_number(routing: &str) -> bool {
    if routing.len() != 9 || !routing.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = routing.chars().filter_map(|c| c.to_digit(10)).collect();
    let sum: u32 = digits
        .iter()
        .zip([3u32, 7, 1, 3, 7, 1, 3, 7, 1])
        .map(|(d, w)| d * w)
        .sum();

    sum % 10 == 0
}
