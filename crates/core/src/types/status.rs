//! Enumerations for notification kinds and payment methods.

use serde::{Deserialize, Serialize};

/// Category of a logged notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Cart mutations.
    Cart,
    /// Order placement.
    Order,
    #[default]
    General,
}

impl NotificationKind {
    /// Infer the kind from free text: mentions of "cart" win over "order".
    #[must_use]
    pub fn infer(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("cart") {
            Self::Cart
        } else if lower.contains("order") {
            Self::Order
        } else {
            Self::General
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cart => write!(f, "cart"),
            Self::Order => write!(f, "order"),
            Self::General => write!(f, "general"),
        }
    }
}

/// Simulated payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    Card,
    ApplePay,
    Paypal,
}

impl PaymentMethod {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit / Debit Card",
            Self::ApplePay => "Apple Pay",
            Self::Paypal => "PayPal",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::ApplePay => write!(f, "apple-pay"),
            Self::Paypal => write!(f, "paypal"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "apple-pay" | "apple" => Ok(Self::ApplePay),
            "paypal" => Ok(Self::Paypal),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_kind() {
        assert_eq!(
            NotificationKind::infer("Shirt added to cart."),
            NotificationKind::Cart
        );
        assert_eq!(
            NotificationKind::infer("Order placed successfully!"),
            NotificationKind::Order
        );
        assert_eq!(
            NotificationKind::infer("Welcome back"),
            NotificationKind::General
        );
    }

    #[test]
    fn test_payment_method_roundtrip() {
        for method in [
            PaymentMethod::Card,
            PaymentMethod::ApplePay,
            PaymentMethod::Paypal,
        ] {
            let parsed: PaymentMethod = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
        }
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_serde() {
        let json = serde_json::to_string(&PaymentMethod::ApplePay).unwrap();
        assert_eq!(json, "\"apple-pay\"");
    }
}
