//! Native and fiat balance rendering

use alloy_primitives::utils::format_units;
use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AccountsError;

/// Raw balances keyed by checksum address
pub type BalanceMap = HashMap<String, Wei>;

const WEI_DECIMALS: u8 = 18;
const NATIVE_DECIMALS_SHOWN: u32 = 5;
const FIAT_DECIMALS_SHOWN: u32 = 2;

/// Smallest native unit
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(try_from = "String", into = "String")]
pub struct Wei(pub U256);

impl Wei {
    pub fn zero() -> Self {
        Wei(U256::ZERO)
    }

    pub fn from_u128(value: u128) -> Self {
        Wei(U256::from(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Value in whole native units, `None` when it does not fit a decimal
    pub fn to_ether(&self) -> Option<Decimal> {
        let text = format_units(self.0, WEI_DECIMALS).ok()?;
        Decimal::from_str(&text).ok()
    }

    /// Whole native units, truncated
    pub fn whole_units(&self) -> U256 {
        self.0 / U256::from(10u64).pow(U256::from(WEI_DECIMALS))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }
}

impl FromStr for Wei {
    type Err = AccountsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some("") => Ok(U256::ZERO),
            Some(hex) => U256::from_str_radix(hex, 16),
            None if s.is_empty() => return Err(AccountsError::InvalidBalance(s.to_string())),
            None => U256::from_str_radix(s, 10),
        };
        parsed
            .map(Wei)
            .map_err(|_| AccountsError::InvalidBalance(s.to_string()))
    }
}

impl TryFrom<String> for Wei {
    type Error = AccountsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Wei> for String {
    fn from(w: Wei) -> Self {
        w.to_hex()
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Fiat conversion input
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FiatRate {
    /// Fiat value of one native unit
    #[serde(default)]
    pub conversion_rate: Option<Decimal>,
    pub currency: String,
}

impl FiatRate {
    pub fn new(conversion_rate: Decimal, currency: &str) -> Self {
        Self {
            conversion_rate: Some(conversion_rate),
            currency: currency.to_string(),
        }
    }

    /// Rate usable for conversion (present and strictly positive)
    pub fn usable_rate(&self) -> Option<Decimal> {
        self.conversion_rate.filter(|r| r.is_sign_positive() && !r.is_zero())
    }
}

impl Default for FiatRate {
    fn default() -> Self {
        Self {
            conversion_rate: None,
            currency: "usd".to_string(),
        }
    }
}

/// Native amount rounded to five places, `< 0.00001` for dust
pub fn render_from_wei(wei: &Wei) -> String {
    if wei.is_zero() {
        return "0".to_string();
    }
    match wei.to_ether() {
        Some(ether) => {
            if ether < Decimal::new(1, NATIVE_DECIMALS_SHOWN) {
                return "< 0.00001".to_string();
            }
            ether
                .round_dp_with_strategy(NATIVE_DECIMALS_SHOWN, RoundingStrategy::MidpointAwayFromZero)
                .normalize()
                .to_string()
        }
        // Too large for a decimal; whole units are all that matter at this size
        None => wei.whole_units().to_string(),
    }
}

/// Fiat amount with currency symbol; empty when no usable rate or on overflow
pub fn wei_to_fiat(wei: &Wei, rate: &FiatRate) -> String {
    let Some(conversion_rate) = rate.usable_rate() else {
        return String::new();
    };
    let Some(ether) = wei.to_ether() else {
        return String::new();
    };
    let Some(value) = ether.checked_mul(conversion_rate) else {
        return String::new();
    };
    let rounded = value.round_dp_with_strategy(FIAT_DECIMALS_SHOWN, RoundingStrategy::MidpointAwayFromZero);
    add_currency_symbol(&format!("{:.2}", rounded), &rate.currency)
}

fn add_currency_symbol(amount: &str, currency: &str) -> String {
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}", symbol, amount),
        None => format!("{} {}", amount, currency.to_uppercase()),
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    let symbol = match currency.to_lowercase().as_str() {
        "usd" | "cad" | "aud" | "nzd" | "hkd" | "sgd" | "mxn" => "$",
        "eur" => "€",
        "gbp" => "£",
        "jpy" | "cny" => "¥",
        "inr" => "₹",
        "krw" => "₩",
        "rub" => "₽",
        "try" => "₺",
        "brl" => "R$",
        "php" => "₱",
        "ngn" => "₦",
        "uah" => "₴",
        "btc" => "₿",
        "eth" => "Ξ",
        _ => return None,
    };
    Some(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(n: &str) -> Wei {
        let d = Decimal::from_str(n).unwrap() * Decimal::from(1_000_000_000_000_000_000u64);
        Wei(U256::from_str_radix(&d.trunc().to_string(), 10).unwrap())
    }

    #[test]
    fn test_parse_hex_and_decimal() {
        assert_eq!("0x0".parse::<Wei>().unwrap(), Wei::zero());
        assert_eq!("0x".parse::<Wei>().unwrap(), Wei::zero());
        assert_eq!("0x1bc16d674ec80000".parse::<Wei>().unwrap(), Wei::from_u128(2_000_000_000_000_000_000));
        assert_eq!("1000".parse::<Wei>().unwrap(), Wei::from_u128(1000));
        assert!("0xnope".parse::<Wei>().is_err());
        assert!("".parse::<Wei>().is_err());
        assert_eq!(Wei::from_u128(255).to_hex(), "0xff");
    }

    #[test]
    fn test_render_from_wei() {
        assert_eq!(render_from_wei(&Wei::zero()), "0");
        assert_eq!(render_from_wei(&eth("2")), "2");
        assert_eq!(render_from_wei(&eth("1.5")), "1.5");
        assert_eq!(render_from_wei(&eth("0.123456789")), "0.12346");
        assert_eq!(render_from_wei(&Wei::from_u128(1)), "< 0.00001");
        assert_eq!(render_from_wei(&Wei(U256::MAX)), Wei(U256::MAX).whole_units().to_string());
    }

    #[test]
    fn test_wei_to_fiat() {
        let usd = FiatRate::new(Decimal::from_str("1850.25").unwrap(), "usd");
        assert_eq!(wei_to_fiat(&eth("2"), &usd), "$3700.50");
        assert_eq!(wei_to_fiat(&Wei::zero(), &usd), "$0.00");

        let chf = FiatRate::new(Decimal::from(2), "chf");
        assert_eq!(wei_to_fiat(&eth("1.005"), &chf), "2.01 CHF");
    }

    #[test]
    fn test_wei_to_fiat_degrades_without_rate() {
        assert_eq!(wei_to_fiat(&eth("1"), &FiatRate::default()), "");
        assert_eq!(wei_to_fiat(&eth("1"), &FiatRate::new(Decimal::ZERO, "usd")), "");
        assert_eq!(wei_to_fiat(&eth("1"), &FiatRate::new(Decimal::from(-3), "usd")), "");
    }
}
