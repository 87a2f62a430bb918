use serde::{Deserialize, Serialize};
use bigdecimal::{num_bigint::BigInt, BigDecimal, Signed};

const FRACTION_DIGITS: i64 = 6;

// Missing keys decode to empty values; lowercase keys are accepted too.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Asset {
    #[serde(rename = "DEALERID", alias = "dealerid")]
    pub dealer_id: String,
    #[serde(rename = "MSISDN", alias = "msisdn")]
    pub msisdn: String,
    #[serde(rename = "MPIN", alias = "mpin")]
    pub mpin: String,
    #[serde(rename = "BALANCE", alias = "balance")]
    pub balance: BigDecimal,
    #[serde(rename = "STATUS", alias = "status")]
    pub status: String,
    #[serde(rename = "TRANSAMOUNT", alias = "transamount")]
    pub trans_amount: BigDecimal,
    #[serde(rename = "TRANSTYPE", alias = "transtype")]
    pub trans_type: String,
    #[serde(rename = "REMARKS", alias = "remarks")]
    pub remarks: String,
}

impl Asset {
    /// Chaincode argument order for `CreateAsset`.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.dealer_id.clone(),
            self.msisdn.clone(),
            self.mpin.clone(),
            fixed_point(&self.balance),
            self.status.clone(),
            fixed_point(&self.trans_amount),
            self.trans_type.clone(),
            self.remarks.clone(),
        ]
    }
}

/// Six fractional digits, half away from zero: `100` -> `"100.000000"`.
pub fn fixed_point(value: &BigDecimal) -> String {
    let half = BigDecimal::new(BigInt::from(5), FRACTION_DIGITS + 1);
    let nudged = if value.is_negative() {
        value - &half
    } else {
        value + &half
    };
    nudged.with_scale(FRACTION_DIGITS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn fixed_point_keeps_six_digits() {
        assert_eq!(fixed_point(&BigDecimal::from(100)), "100.000000");
        assert_eq!(fixed_point(&decimal("0.125")), "0.125000");
        assert_eq!(fixed_point(&decimal("1234.5678")), "1234.567800");
        assert_eq!(fixed_point(&decimal("0.12345650")), "0.123457");
        assert_eq!(fixed_point(&decimal("-2.5")), "-2.500000");
    }

    #[test]
    fn decodes_upper_case_keys_with_numeric_strings() {
        let asset: Asset = serde_json::from_str(
            r#"{"DEALERID":"D1","MSISDN":"2547","MPIN":"1234","BALANCE":"10.5",
                "STATUS":"ACTIVE","TRANSAMOUNT":3,"TRANSTYPE":"DEPOSIT","REMARKS":"ok"}"#,
        )
        .unwrap();
        assert_eq!(asset.dealer_id, "D1");
        assert_eq!(asset.to_args()[3], "10.500000");
        assert_eq!(asset.to_args()[5], "3.000000");
    }

    #[test]
    fn json_numbers_keep_their_digits() {
        let asset: Asset =
            serde_json::from_str(r#"{"DEALERID":"D1","BALANCE":0.125,"TRANSAMOUNT":1234.5678}"#).unwrap();
        assert_eq!(asset.to_args()[3], "0.125000");
        assert_eq!(asset.to_args()[5], "1234.567800");
    }

    #[test]
    fn missing_fields_default_and_lowercase_keys_match() {
        let partial: Asset = serde_json::from_str(r#"{"DEALERID":"D1","BALANCE":10}"#).unwrap();
        assert_eq!(partial.msisdn, "");
        assert_eq!(
            partial.to_args(),
            vec!["D1", "", "", "10.000000", "", "0.000000", "", ""]
        );

        let lower: Asset =
            serde_json::from_str(r#"{"dealerid":"D2","msisdn":"2547","transamount":5}"#).unwrap();
        assert_eq!(lower.dealer_id, "D2");
        assert_eq!(lower.msisdn, "2547");
        assert_eq!(lower.to_args()[5], "5.000000");
    }
}
