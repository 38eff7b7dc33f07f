//! Result schemas for the structured document classes
//!
//! Field names mirror the JSON shapes requested by the prompts in
//! `prompt.rs`. Top-level sections are required; leaf values are text.
//! Every object keeps unrecognized fields in `extra`.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// A scalar field reported by the model
///
/// The prompts ask for strings everywhere, but models regularly answer with
/// bare numbers (`"bedrooms": 3`). The scalar is kept exactly as sent and
/// serializes back unchanged; [`Text::as_str`] gives its textual form, with
/// `null` reading as empty. Objects and arrays are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    raw: Value,
    text: String,
}

impl Text {
    /// Borrow the textual form
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The JSON scalar as the model sent it
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Whether the model supplied a usable value
    ///
    /// Empty strings and the prompt's "Not available" placeholder count as absent.
    pub fn is_available(&self) -> bool {
        let trimmed = self.text.trim();
        !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("not available")
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::from(s.to_string())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text {
            raw: Value::String(s.clone()),
            text: s,
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Text {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let text = match &raw {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) => {
                return Err(de::Error::invalid_type(de::Unexpected::Seq, &"a scalar"))
            }
            Value::Object(_) => {
                return Err(de::Error::invalid_type(de::Unexpected::Map, &"a scalar"))
            }
        };
        Ok(Text { raw, text })
    }
}

/// Fields the prompt did not ask for, kept so JSON output loses nothing
pub type Extra = Map<String, Value>;

/// Missing or `null` lists both read as empty
fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Severity label attached to issues and risk factors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Needs attention before proceeding
    High,
    /// Should be reviewed
    Medium,
    /// Informational
    Low,
    /// Label the model made up
    Unknown,
}

impl Severity {
    /// Classify a severity label (case-insensitive)
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Credit report
// ---------------------------------------------------------------------------

/// Structured credit report extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditReport {
    /// Identity and addresses of the consumer
    pub personal_info: PersonalInfo,
    /// Score and account totals
    pub credit_summary: CreditSummary,
    /// Tradelines
    #[serde(default, deserialize_with = "nullable_list")]
    pub credit_accounts: Vec<CreditAccount>,
    /// Aggregate payment behaviour
    pub payment_history: PaymentHistory,
    /// Hard and soft pulls
    #[serde(default, deserialize_with = "nullable_list")]
    pub credit_inquiries: Vec<CreditInquiry>,
    /// Bankruptcies, liens, judgments
    #[serde(default, deserialize_with = "nullable_list")]
    pub public_records: Vec<PublicRecord>,
    /// Accounts placed with collection agencies
    #[serde(default, deserialize_with = "nullable_list")]
    pub collections: Vec<Collection>,
    /// Problems the model found in the report
    #[serde(default, deserialize_with = "nullable_list")]
    pub validation_issues: Vec<ValidationIssue>,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// Consumer identity section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    /// Full name
    pub name: Text,
    /// SSN with all but the last four digits masked
    pub ssn: Text,
    /// Date of birth
    pub date_of_birth: Text,
    /// Current address
    pub current_address: Text,
    /// Previous addresses
    #[serde(deserialize_with = "nullable_list")]
    pub previous_addresses: Vec<Text>,
    /// Employer or employment status
    pub employment_info: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// Score and account totals
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreditSummary {
    pub credit_score: Text,
    pub score_date: Text,
    pub total_accounts: Text,
    pub open_accounts: Text,
    pub closed_accounts: Text,
    pub derogatory_marks: Text,
    pub total_inquiries: Text,
    pub oldest_account: Text,
    pub average_account_age: Text,
    pub total_credit_limit: Text,
    pub total_balance: Text,
    pub credit_utilization: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// One tradeline
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreditAccount {
    pub creditor_name: Text,
    pub account_type: Text,
    /// Last four digits only
    pub account_number: Text,
    pub status: Text,
    pub balance: Text,
    pub credit_limit: Text,
    pub monthly_payment: Text,
    pub opened_date: Text,
    pub last_reported: Text,
    pub payment_history: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// Aggregate payment behaviour
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentHistory {
    pub on_time_payments: Text,
    #[serde(rename = "latePayments30Days")]
    pub late_payments_30_days: Text,
    #[serde(rename = "latePayments60Days")]
    pub late_payments_60_days: Text,
    #[serde(rename = "latePayments90Days")]
    pub late_payments_90_days: Text,
    pub total_missed_payments: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// A credit pull
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditInquiry {
    pub creditor: Text,
    pub date: Text,
    /// "Hard" or "Soft"
    #[serde(rename = "type")]
    pub kind: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// Bankruptcy, lien, judgment, etc.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicRecord {
    #[serde(rename = "type")]
    pub kind: Text,
    pub date: Text,
    pub amount: Text,
    pub status: Text,
    pub court_info: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// Account in collections
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Collection {
    pub creditor: Text,
    pub collection_agency: Text,
    pub amount: Text,
    pub date: Text,
    pub status: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// Problem found while validating the report
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationIssue {
    pub section: Text,
    pub issue: Text,
    /// "High", "Medium" or "Low"
    pub severity: Text,
    pub recommendation: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

impl ValidationIssue {
    /// Parsed severity label
    pub fn severity_level(&self) -> Severity {
        Severity::parse(self.severity.as_str())
    }
}

// ---------------------------------------------------------------------------
// Appraisal report
// ---------------------------------------------------------------------------

/// Structured appraisal analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppraisalReport {
    /// Subject property facts
    pub property_details: PropertyDetails,
    /// Appraised value and dates
    pub valuation: Valuation,
    /// Comparable sales
    #[serde(default, deserialize_with = "nullable_list")]
    pub comparables: Vec<Comparable>,
    /// Physical condition
    pub condition_assessment: ConditionAssessment,
    /// Overall risk and contributing factors
    pub risk_assessment: RiskAssessment,
    /// Local market picture
    pub market_analysis: MarketAnalysis,
    /// Free-text recommendations
    #[serde(default, deserialize_with = "nullable_list")]
    pub recommendations: Vec<Text>,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// Subject property facts
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyDetails {
    pub address: Text,
    pub property_type: Text,
    pub square_footage: Text,
    pub lot_size: Text,
    pub year_built: Text,
    pub bedrooms: Text,
    pub bathrooms: Text,
    pub garage_spaces: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// Appraised value and dates
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Valuation {
    pub appraised_value: Text,
    pub appraisal_date: Text,
    pub effective_date: Text,
    pub purchase_price: Text,
    pub price_per_sq_ft: Text,
    pub market_trend: Text,
    pub days_on_market: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// A comparable sale
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comparable {
    pub address: Text,
    pub sale_price: Text,
    pub sale_date: Text,
    pub square_footage: Text,
    pub bedrooms: Text,
    pub bathrooms: Text,
    pub price_per_sq_ft: Text,
    pub proximity: Text,
    pub adjustments: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// Physical condition of the property
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionAssessment {
    pub overall_condition: Text,
    pub exterior_condition: Text,
    pub interior_condition: Text,
    pub roof_condition: Text,
    pub foundation_condition: Text,
    #[serde(deserialize_with = "nullable_list")]
    pub repairs_needed: Vec<Text>,
    pub estimated_repair_cost: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

/// Overall risk and contributing factors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskAssessment {
    /// "Low", "Medium" or "High"
    pub overall_risk: Text,
    /// Individual factors
    #[serde(deserialize_with = "nullable_list")]
    pub risk_factors: Vec<RiskFactor>,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

impl RiskAssessment {
    /// Parsed overall risk label
    pub fn overall_level(&self) -> Severity {
        Severity::parse(self.overall_risk.as_str())
    }
}

/// One contributing risk factor
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskFactor {
    pub factor: Text,
    pub severity: Text,
    pub description: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

impl RiskFactor {
    /// Parsed severity label
    pub fn severity_level(&self) -> Severity {
        Severity::parse(self.severity.as_str())
    }
}

/// Local market picture
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub market_conditions: Text,
    pub supply_demand: Text,
    pub median_sale_price: Text,
    pub average_days_on_market: Text,
    pub price_appreciation: Text,
    pub inventory: Text,
    /// Fields outside the requested shape
    #[serde(flatten)]
    pub extra: Extra,
}

// ---------------------------------------------------------------------------
// Title validation
// ---------------------------------------------------------------------------

/// Free-form title validation narrative, passed through verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TitleValidation(String);

impl TitleValidation {
    /// Wrap the model's narrative
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The narrative exactly as returned
    pub fn text(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_accepts_scalars() {
        let parsed: Vec<Text> = serde_json::from_str(r#"["3", 3, 2.5, true, null]"#).unwrap();
        let rendered: Vec<&str> = parsed.iter().map(Text::as_str).collect();
        assert_eq!(rendered, vec!["3", "3", "2.5", "true", ""]);
    }

    #[test]
    fn test_text_keeps_raw_scalar() {
        let parsed: Vec<Text> = serde_json::from_str(r#"[742, "742", false, null]"#).unwrap();
        assert_eq!(parsed[0].as_str(), parsed[1].as_str());
        assert_ne!(parsed[0], parsed[1]);
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            serde_json::json!([742, "742", false, null])
        );
        assert_eq!(parsed[2].raw(), &Value::Bool(false));
    }

    #[test]
    fn test_report_serializes_what_the_model_sent() {
        let sent = serde_json::json!({
            "personalInfo": {"name": "Jane Doe", "middleName": "Q"},
            "creditSummary": {"creditScore": 742, "scoreModel": "FICO 8"},
            "creditAccounts": [{"creditorName": "First Bank", "balance": 1200}],
            "paymentHistory": {"onTimePayments": "99%"},
            "creditInquiries": [],
            "publicRecords": [],
            "collections": [],
            "validationIssues": [],
            "reportProvider": "Experian"
        });
        let report: CreditReport = serde_json::from_value(sent.clone()).unwrap();
        assert_eq!(report.credit_summary.credit_score.as_str(), "742");
        assert_eq!(report.extra["reportProvider"], "Experian");

        let back = serde_json::to_value(&report).unwrap();
        assert_eq!(back["creditSummary"]["creditScore"], 742);
        assert_eq!(back["creditSummary"]["scoreModel"], "FICO 8");
        assert_eq!(back["personalInfo"]["middleName"], "Q");
        assert_eq!(back["creditAccounts"][0]["balance"], 1200);
        assert_eq!(back["reportProvider"], "Experian");
    }

    #[test]
    fn test_text_rejects_containers() {
        assert!(serde_json::from_str::<Text>(r#"{"a": 1}"#).is_err());
        assert!(serde_json::from_str::<Text>(r#"[1]"#).is_err());
    }

    #[test]
    fn test_text_availability() {
        assert!(Text::from("720").is_available());
        assert!(!Text::from("").is_available());
        assert!(!Text::from("Not available").is_available());
        assert!(!Text::from("  not AVAILABLE ").is_available());
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("High"), Severity::High);
        assert_eq!(Severity::parse("medium"), Severity::Medium);
        assert_eq!(Severity::parse(" LOW "), Severity::Low);
        assert_eq!(Severity::parse("Critical"), Severity::Unknown);
    }

    #[test]
    fn test_payment_history_field_names() {
        let json = r#"{
            "onTimePayments": "98%",
            "latePayments30Days": "2",
            "latePayments60Days": 1,
            "latePayments90Days": "0",
            "totalMissedPayments": "3"
        }"#;
        let history: PaymentHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.late_payments_30_days.as_str(), "2");
        assert_eq!(history.late_payments_60_days.as_str(), "1");

        let back = serde_json::to_value(&history).unwrap();
        assert_eq!(back["latePayments90Days"], "0");
        assert_eq!(back["onTimePayments"], "98%");
    }

    #[test]
    fn test_credit_report_requires_sections() {
        let result = serde_json::from_str::<CreditReport>(r#"{"a": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_credit_report_lists_default_empty() {
        let json = r#"{
            "personalInfo": {"name": "Jane Doe", "previousAddresses": null},
            "creditSummary": {"creditScore": 712},
            "paymentHistory": {},
            "collections": null
        }"#;
        let report: CreditReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.personal_info.name.as_str(), "Jane Doe");
        assert!(report.personal_info.previous_addresses.is_empty());
        assert_eq!(report.credit_summary.credit_score.as_str(), "712");
        assert!(report.credit_accounts.is_empty());
        assert!(report.collections.is_empty());
    }

    #[test]
    fn test_section_of_wrong_kind_fails() {
        let json = r#"{
            "personalInfo": [],
            "creditSummary": {},
            "paymentHistory": {}
        }"#;
        assert!(serde_json::from_str::<CreditReport>(json).is_err());
    }

    #[test]
    fn test_type_fields_renamed() {
        let inquiry: CreditInquiry =
            serde_json::from_str(r#"{"creditor": "Chase", "date": "01/02/2024", "type": "Hard"}"#)
                .unwrap();
        assert_eq!(inquiry.kind.as_str(), "Hard");
        assert_eq!(serde_json::to_value(&inquiry).unwrap()["type"], "Hard");
    }

    #[test]
    fn test_risk_levels() {
        let risk: RiskAssessment = serde_json::from_str(
            r#"{"overallRisk": "Medium", "riskFactors": [{"factor": "Flood zone", "severity": "High", "description": "Zone AE"}]}"#,
        )
        .unwrap();
        assert_eq!(risk.overall_level(), Severity::Medium);
        assert_eq!(risk.risk_factors[0].severity_level(), Severity::High);
    }

    #[test]
    fn test_title_validation_passthrough() {
        let title = TitleValidation::new("  **Risk**: LOW\n");
        assert_eq!(title.text(), "  **Risk**: LOW\n");
        assert_eq!(serde_json::to_value(&title).unwrap(), "  **Risk**: LOW\n");
    }
}
