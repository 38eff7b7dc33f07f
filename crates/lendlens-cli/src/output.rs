//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use lendlens_analyzer::schema::{Comparable, CreditAccount, ValidationIssue};
use lendlens_analyzer::{
    AppraisalReport, CreditReport, FlowSnapshot, FlowState, NormalizedResult, Severity, Text,
    TitleValidation,
};
use lendlens_domain::DocumentClass;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const NOT_AVAILABLE: &str = "N/A";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an analysis result.
    pub fn format_result(&self, result: &NormalizedResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_result_json(result),
            OutputFormat::Table => Ok(self.format_result_table(result)),
            OutputFormat::Quiet => Ok(self.format_result_quiet(result)),
        }
    }

    fn format_result_json(&self, result: &NormalizedResult) -> Result<String> {
        let json = match result {
            NormalizedResult::Credit(report) => serde_json::to_string_pretty(report)?,
            NormalizedResult::Appraisal(report) => serde_json::to_string_pretty(report)?,
            NormalizedResult::Title(title) => {
                serde_json::to_string_pretty(&serde_json::json!({ "validation": title }))?
            }
        };
        Ok(json)
    }

    /// Headline value only: score, appraised value, or the narrative.
    fn format_result_quiet(&self, result: &NormalizedResult) -> String {
        match result {
            NormalizedResult::Credit(report) => display(&report.credit_summary.credit_score),
            NormalizedResult::Appraisal(report) => display(&report.valuation.appraised_value),
            NormalizedResult::Title(title) => title.text().to_string(),
        }
    }

    fn format_result_table(&self, result: &NormalizedResult) -> String {
        match result {
            NormalizedResult::Credit(report) => self.credit_report(report),
            NormalizedResult::Appraisal(report) => self.appraisal_report(report),
            NormalizedResult::Title(title) => self.title_validation(title),
        }
    }

    fn credit_report(&self, report: &CreditReport) -> String {
        let info = &report.personal_info;
        let summary = &report.credit_summary;
        let history = &report.payment_history;
        let previous = Text::from(
            info.previous_addresses
                .iter()
                .map(Text::as_str)
                .collect::<Vec<_>>()
                .join("; "),
        );

        let mut sections = vec![
            self.section(
                "Personal Information",
                key_values(&[
                    ("Name", &info.name),
                    ("SSN", &info.ssn),
                    ("Date of Birth", &info.date_of_birth),
                    ("Current Address", &info.current_address),
                    ("Previous Addresses", &previous),
                    ("Employment", &info.employment_info),
                ]),
            ),
            self.section(
                "Credit Summary",
                key_values(&[
                    ("Credit Score", &summary.credit_score),
                    ("Score Date", &summary.score_date),
                    ("Total Accounts", &summary.total_accounts),
                    ("Open Accounts", &summary.open_accounts),
                    ("Closed Accounts", &summary.closed_accounts),
                    ("Derogatory Marks", &summary.derogatory_marks),
                    ("Total Inquiries", &summary.total_inquiries),
                    ("Oldest Account", &summary.oldest_account),
                    ("Average Account Age", &summary.average_account_age),
                    ("Total Credit Limit", &summary.total_credit_limit),
                    ("Total Balance", &summary.total_balance),
                    ("Credit Utilization", &summary.credit_utilization),
                ]),
            ),
        ];

        sections.push(self.list_section(
            "Credit Accounts",
            ["Creditor", "Type", "Account", "Status", "Balance", "Limit", "Payment", "Opened", "Reported", "History"],
            report.credit_accounts.iter().map(account_row).collect(),
            "No credit accounts found",
        ));

        sections.push(self.section(
            "Payment History",
            key_values(&[
                ("On-Time Payments", &history.on_time_payments),
                ("30 Days Late", &history.late_payments_30_days),
                ("60 Days Late", &history.late_payments_60_days),
                ("90 Days Late", &history.late_payments_90_days),
                ("Total Missed", &history.total_missed_payments),
            ]),
        ));

        sections.push(self.list_section(
            "Credit Inquiries",
            ["Creditor", "Date", "Type"],
            report
                .credit_inquiries
                .iter()
                .map(|q| [display(&q.creditor), display(&q.date), display(&q.kind)])
                .collect(),
            "No credit inquiries found",
        ));

        sections.push(self.list_section(
            "Public Records",
            ["Type", "Date", "Amount", "Status", "Court"],
            report
                .public_records
                .iter()
                .map(|r| {
                    [
                        display(&r.kind),
                        display(&r.date),
                        display(&r.amount),
                        display(&r.status),
                        display(&r.court_info),
                    ]
                })
                .collect(),
            "No public records found",
        ));

        sections.push(self.list_section(
            "Collections",
            ["Creditor", "Agency", "Amount", "Date", "Status"],
            report
                .collections
                .iter()
                .map(|c| {
                    [
                        display(&c.creditor),
                        display(&c.collection_agency),
                        display(&c.amount),
                        display(&c.date),
                        display(&c.status),
                    ]
                })
                .collect(),
            "No collections found",
        ));

        sections.push(self.list_section(
            "Validation Issues",
            ["Severity", "Section", "Issue", "Recommendation"],
            report
                .validation_issues
                .iter()
                .map(|issue| self.issue_row(issue))
                .collect(),
            "No validation issues found",
        ));

        sections.join("\n\n")
    }

    fn appraisal_report(&self, report: &AppraisalReport) -> String {
        let details = &report.property_details;
        let valuation = &report.valuation;
        let condition = &report.condition_assessment;
        let risk = &report.risk_assessment;
        let market = &report.market_analysis;

        let mut sections = vec![
            self.section(
                "Property Details",
                key_values(&[
                    ("Address", &details.address),
                    ("Property Type", &details.property_type),
                    ("Square Footage", &details.square_footage),
                    ("Lot Size", &details.lot_size),
                    ("Year Built", &details.year_built),
                    ("Bedrooms", &details.bedrooms),
                    ("Bathrooms", &details.bathrooms),
                    ("Garage Spaces", &details.garage_spaces),
                ]),
            ),
            self.section(
                "Valuation",
                key_values(&[
                    ("Appraised Value", &valuation.appraised_value),
                    ("Appraisal Date", &valuation.appraisal_date),
                    ("Effective Date", &valuation.effective_date),
                    ("Purchase Price", &valuation.purchase_price),
                    ("Price per Sq Ft", &valuation.price_per_sq_ft),
                    ("Market Trend", &valuation.market_trend),
                    ("Days on Market", &valuation.days_on_market),
                ]),
            ),
        ];

        sections.push(self.list_section(
            "Comparables",
            ["Address", "Sale Price", "Sale Date", "Sq Ft", "Beds", "Baths", "$/Sq Ft", "Proximity", "Adjustments"],
            report.comparables.iter().map(comparable_row).collect(),
            "No comparables found",
        ));

        sections.push(self.section(
            "Condition Assessment",
            key_values(&[
                ("Overall", &condition.overall_condition),
                ("Exterior", &condition.exterior_condition),
                ("Interior", &condition.interior_condition),
                ("Roof", &condition.roof_condition),
                ("Foundation", &condition.foundation_condition),
                ("Estimated Repair Cost", &condition.estimated_repair_cost),
            ]),
        ));
        sections.push(self.bullet_section(
            "Repairs Needed",
            &condition.repairs_needed,
            "No repairs needed",
        ));

        sections.push(format!(
            "{}\nOverall Risk: {}",
            self.heading("Risk Assessment"),
            self.severity(&risk.overall_risk, risk.overall_level())
        ));
        sections.push(self.list_section(
            "Risk Factors",
            ["Severity", "Factor", "Description"],
            risk.risk_factors
                .iter()
                .map(|f| {
                    [
                        self.severity(&f.severity, f.severity_level()),
                        display(&f.factor),
                        display(&f.description),
                    ]
                })
                .collect(),
            "No risk factors identified",
        ));

        sections.push(self.section(
            "Market Analysis",
            key_values(&[
                ("Market Conditions", &market.market_conditions),
                ("Supply / Demand", &market.supply_demand),
                ("Median Sale Price", &market.median_sale_price),
                ("Average Days on Market", &market.average_days_on_market),
                ("Price Appreciation", &market.price_appreciation),
                ("Inventory", &market.inventory),
            ]),
        ));

        sections.push(self.bullet_section(
            "Recommendations",
            &report.recommendations,
            "No recommendations",
        ));

        sections.join("\n\n")
    }

    fn title_validation(&self, title: &TitleValidation) -> String {
        format!("{}\n{}", self.heading("Title Validation"), title.text())
    }

    fn issue_row(&self, issue: &ValidationIssue) -> [String; 4] {
        [
            self.severity(&issue.severity, issue.severity_level()),
            display(&issue.section),
            display(&issue.issue),
            display(&issue.recommendation),
        ]
    }

    fn section(&self, title: &str, body: String) -> String {
        format!("{}\n{}", self.heading(title), body)
    }

    fn list_section<const N: usize>(
        &self,
        title: &str,
        headers: [&str; N],
        rows: Vec<[String; N]>,
        empty: &str,
    ) -> String {
        if rows.is_empty() {
            return self.section(title, self.colorize(empty, "yellow"));
        }
        self.section(title, table(headers, rows))
    }

    fn bullet_section(&self, title: &str, items: &[Text], empty: &str) -> String {
        if items.is_empty() {
            return self.section(title, self.colorize(empty, "yellow"));
        }
        let body = items
            .iter()
            .map(|item| format!("  • {}", item))
            .collect::<Vec<_>>()
            .join("\n");
        self.section(title, body)
    }

    fn heading(&self, title: &str) -> String {
        if self.color_enabled {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Colour a severity label: High red, Medium yellow, Low blue, else plain.
    fn severity(&self, label: &Text, level: Severity) -> String {
        let text = display(label);
        match level {
            Severity::High => self.colorize(&text, "red"),
            Severity::Medium => self.colorize(&text, "yellow"),
            Severity::Low => self.colorize(&text, "blue"),
            Severity::Unknown => text,
        }
    }

    /// One line describing a flow for `status`.
    pub fn flow_status<K>(&self, snapshot: &FlowSnapshot<K>, active: bool) -> String {
        let marker = if active { "* " } else { "  " };
        let name = format!("{:<19}", snapshot.class.feature_title());
        let name = if active {
            self.colorize(&name, "cyan")
        } else {
            name
        };
        let state = match snapshot.state {
            FlowState::Succeeded => self.colorize(snapshot.state.as_str(), "green"),
            FlowState::Failed => self.colorize(snapshot.state.as_str(), "red"),
            FlowState::InFlight => self.colorize(snapshot.state.as_str(), "magenta"),
            other => other.as_str().to_string(),
        };

        let mut line = match &snapshot.document {
            Some(doc) => format!(
                "{}{} {} ({}, {}, {} bytes)",
                marker, name, state, doc.file_name, doc.mime_type, doc.size
            ),
            None => format!("{}{} {}", marker, name, state),
        };
        if snapshot.busy && snapshot.state != FlowState::InFlight {
            line.push_str(&self.colorize(" [earlier request still running]", "magenta"));
        }
        line
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn display(value: &Text) -> String {
    if value.is_available() {
        value.to_string()
    } else {
        NOT_AVAILABLE.to_string()
    }
}

fn key_values(rows: &[(&str, &Text)]) -> String {
    let mut builder = Builder::default();
    for (key, value) in rows {
        builder.push_record([key.to_string(), display(value)]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn table<const N: usize>(headers: [&str; N], rows: Vec<[String; N]>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.map(str::to_string));
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn account_row(account: &CreditAccount) -> [String; 10] {
    [
        display(&account.creditor_name),
        display(&account.account_type),
        display(&account.account_number),
        display(&account.status),
        display(&account.balance),
        display(&account.credit_limit),
        display(&account.monthly_payment),
        display(&account.opened_date),
        display(&account.last_reported),
        display(&account.payment_history),
    ]
}

fn comparable_row(comp: &Comparable) -> [String; 9] {
    [
        display(&comp.address),
        display(&comp.sale_price),
        display(&comp.sale_date),
        display(&comp.square_footage),
        display(&comp.bedrooms),
        display(&comp.bathrooms),
        display(&comp.price_per_sq_ft),
        display(&comp.proximity),
        display(&comp.adjustments),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendlens_analyzer::DocumentInfo;

    fn credit_report() -> CreditReport {
        serde_json::from_str(
            r#"{
                "personalInfo": {"name": "Jane Doe", "ssn": "XXX-XX-1234"},
                "creditSummary": {"creditScore": "742"},
                "paymentHistory": {"onTimePayments": "99%"},
                "creditInquiries": [{"creditor": "Auto Lender", "date": "2024-02-10", "type": "Hard"}],
                "validationIssues": [
                    {"section": "Accounts", "issue": "Duplicate tradeline", "severity": "High", "recommendation": "Dispute"}
                ]
            }"#,
        )
        .unwrap()
    }

    fn appraisal_report() -> AppraisalReport {
        serde_json::from_str(
            r#"{
                "propertyDetails": {"address": "77 Lake Rd", "bedrooms": 3},
                "valuation": {"appraisedValue": "$415,000"},
                "conditionAssessment": {"overallCondition": "Good"},
                "riskAssessment": {"overallRisk": "Low"},
                "marketAnalysis": {"marketConditions": "Balanced"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_credit_table_sections_and_placeholders() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_result(&NormalizedResult::Credit(credit_report()))
            .unwrap();

        assert!(output.contains("Personal Information"));
        assert!(output.contains("Jane Doe"));
        assert!(output.contains("742"));
        assert!(output.contains("Auto Lender"));
        assert!(output.contains("Duplicate tradeline"));
        assert!(output.contains("No public records found"));
        assert!(output.contains("No collections found"));
        assert!(!output.contains("No credit inquiries found"));
        assert!(!output.contains("No validation issues found"));
    }

    #[test]
    fn test_appraisal_table_placeholders() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_result(&NormalizedResult::Appraisal(appraisal_report()))
            .unwrap();

        assert!(output.contains("77 Lake Rd"));
        assert!(output.contains("Overall Risk: Low"));
        assert!(output.contains("No comparables found"));
        assert!(output.contains("No risk factors identified"));
        assert!(output.contains("No repairs needed"));
        assert!(output.contains("No recommendations"));
    }

    #[test]
    fn test_title_rendered_verbatim() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let narrative = "**Chain of Title**: Complete.\n\n**Risk**: LOW";
        let output = formatter
            .format_result(&NormalizedResult::Title(TitleValidation::new(narrative)))
            .unwrap();
        assert!(output.ends_with(narrative));
    }

    #[test]
    fn test_json_format_keeps_field_names() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_result(&NormalizedResult::Credit(credit_report()))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["creditSummary"]["creditScore"], "742");
        assert_eq!(value["creditInquiries"][0]["type"], "Hard");
    }

    #[test]
    fn test_json_format_keeps_numbers() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_result(&NormalizedResult::Appraisal(appraisal_report()))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["propertyDetails"]["bedrooms"], 3);
        assert_eq!(value["propertyDetails"]["address"], "77 Lake Rd");
    }

    #[test]
    fn test_json_title() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_result(&NormalizedResult::Title(TitleValidation::new("clean")))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["validation"], "clean");
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let credit = formatter
            .format_result(&NormalizedResult::Credit(credit_report()))
            .unwrap();
        assert_eq!(credit, "742");

        let appraisal = formatter
            .format_result(&NormalizedResult::Appraisal(appraisal_report()))
            .unwrap();
        assert_eq!(appraisal, "$415,000");
    }

    #[test]
    fn test_missing_values_show_not_available() {
        assert_eq!(display(&Text::from("")), NOT_AVAILABLE);
        assert_eq!(display(&Text::from("Not available")), NOT_AVAILABLE);
        assert_eq!(display(&Text::from("3")), "3");
    }

    #[test]
    fn test_severity_colours() {
        colored::control::set_override(true);
        let formatter = Formatter::new(OutputFormat::Table, true);
        let high = formatter.severity(&Text::from("High"), Severity::High);
        let odd = formatter.severity(&Text::from("Critical"), Severity::Unknown);
        let expected = "High".red().to_string();
        colored::control::unset_override();

        assert_eq!(high, expected);
        assert!(high.contains("\u{1b}["));
        assert_eq!(odd, "Critical");
    }

    #[test]
    fn test_flow_status_line() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let snapshot: FlowSnapshot<()> = FlowSnapshot {
            class: DocumentClass::Credit,
            state: FlowState::FileSelected,
            document: Some(DocumentInfo {
                file_name: "report.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                size: 2048,
            }),
            outcome: None,
            busy: false,
        };
        let line = formatter.flow_status(&snapshot, true);
        assert!(line.starts_with("* Credit Validator"));
        assert!(line.contains("file selected"));
        assert!(line.contains("2048 bytes"));

        let snapshot: FlowSnapshot<()> = FlowSnapshot {
            class: DocumentClass::Title,
            state: FlowState::Idle,
            document: None,
            outcome: None,
            busy: false,
        };
        let line = formatter.flow_status(&snapshot, false);
        assert!(line.starts_with("  Title Validation"));
        assert!(line.ends_with("idle"));
    }

    #[test]
    fn test_flow_status_marks_orphaned_call() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut snapshot: FlowSnapshot<()> = FlowSnapshot {
            class: DocumentClass::Title,
            state: FlowState::Idle,
            document: None,
            outcome: None,
            busy: true,
        };
        let line = formatter.flow_status(&snapshot, true);
        assert!(line.ends_with("idle [earlier request still running]"));

        snapshot.state = FlowState::InFlight;
        let line = formatter.flow_status(&snapshot, true);
        assert!(line.ends_with("in flight"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
