//! Wire-format helpers for monetary values.
//!
//! Prices travel as strings with exactly two fractional digits, never as
//! binary floating point, so the same decimal value round-trips without
//! drift. Inbound payloads may carry either a JSON string or a number.

/// Serde adapter for `Decimal` fields on the wire: `"12.30"` out, string or
/// number in.
pub mod decimal_2dp {
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.2}", value.round_dp(2)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Decimal::from_str(s.trim())
                .map_err(|_| de::Error::custom(format!("invalid decimal string {s:?}"))),
            Raw::Number(n) => Decimal::from_f64(n)
                .ok_or_else(|| de::Error::custom(format!("unrepresentable decimal {n}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};
    use std::str::FromStr;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Price {
        #[serde(with = "super::decimal_2dp")]
        value: Decimal,
    }

    #[test]
    fn serializes_with_two_fraction_digits() {
        let p = Price {
            value: Decimal::from(65),
        };
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"value":"65.00"}"#);

        let p = Price {
            value: Decimal::from_str("10.5").unwrap(),
        };
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"value":"10.50"}"#);
    }

    #[test]
    fn accepts_string_and_number_input() {
        let p: Price = serde_json::from_str(r#"{"value":"12.34"}"#).unwrap();
        assert_eq!(p.value, Decimal::from_str("12.34").unwrap());

        let p: Price = serde_json::from_str(r#"{"value":12.34}"#).unwrap();
        assert_eq!(p.value, Decimal::from_str("12.34").unwrap());

        let p: Price = serde_json::from_str(r#"{"value":12}"#).unwrap();
        assert_eq!(p.value, Decimal::from(12));
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Price>(r#"{"value":"abc"}"#).is_err());
        assert!(serde_json::from_str::<Price>(r#"{"value":true}"#).is_err());
    }
}
