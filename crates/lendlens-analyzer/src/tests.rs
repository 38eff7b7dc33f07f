//! Integration tests for the document flows

#[cfg(test)]
mod tests {
    use crate::prompt::{APPRAISAL_ANALYSIS_PROMPT, CREDIT_VALIDATOR_PROMPT};
    use crate::{
        Analyzer, AnalyzerError, AppraisalFlow, AppraisalReport, CreditFlow, CreditReport,
        DocumentFlow, FlowError, FlowState, Outcome, Severity, SubmitOutcome, TitleFlow,
    };
    use lendlens_domain::{DocumentClass, EncodedPayload, UploadedDocument};
    use lendlens_llm::MockProvider;
    use std::io::Write;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    const CREDIT_RESPONSE: &str = r#"```json
{
  "personalInfo": {
    "name": "Jane Q. Borrower",
    "ssn": "XXX-XX-1234",
    "dateOfBirth": "04/12/1985",
    "currentAddress": "12 Elm St, Springfield",
    "previousAddresses": ["9 Oak Ave, Shelbyville"],
    "employmentInfo": "Acme Corp"
  },
  "creditSummary": {
    "creditScore": 742,
    "scoreDate": "2024-05-01",
    "totalAccounts": "9",
    "openAccounts": "6",
    "closedAccounts": "3",
    "derogatoryMarks": "0",
    "totalInquiries": "2",
    "oldestAccount": "2006",
    "averageAccountAge": "8 years",
    "totalCreditLimit": "$42,000",
    "totalBalance": "$6,300",
    "creditUtilization": "15%"
  },
  "creditAccounts": [
    {
      "creditorName": "First Bank",
      "accountType": "Credit Card",
      "accountNumber": "****4421",
      "status": "Open",
      "balance": "$1,200",
      "creditLimit": "$10,000",
      "monthlyPayment": "$35",
      "openedDate": "2012-03",
      "lastReported": "2024-04",
      "paymentHistory": "Current"
    }
  ],
  "paymentHistory": {
    "onTimePayments": "99%",
    "latePayments30Days": "1",
    "latePayments60Days": "0",
    "latePayments90Days": "0",
    "totalMissedPayments": "1"
  },
  "creditInquiries": [
    {"creditor": "Auto Lender", "date": "2024-02-10", "type": "Hard"}
  ],
  "publicRecords": [],
  "collections": [],
  "validationIssues": [
    {
      "section": "Personal Info",
      "issue": "Previous address missing unit number",
      "severity": "Low",
      "recommendation": "Confirm with borrower"
    }
  ]
}
```"#;

    const APPRAISAL_RESPONSE: &str = r#"```
{
  "propertyDetails": {
    "address": "77 Lake Rd",
    "propertyType": "Single Family",
    "squareFootage": 1850,
    "lotSize": "0.25 acres",
    "yearBuilt": "1998",
    "bedrooms": 3,
    "bathrooms": 2.5,
    "garageSpaces": "2"
  },
  "valuation": {
    "appraisedValue": "$415,000",
    "appraisalDate": "2024-03-02",
    "effectiveDate": "2024-03-01",
    "purchasePrice": "$410,000",
    "pricePerSqFt": "$224",
    "marketTrend": "Stable",
    "daysOnMarket": "21"
  },
  "comparables": [
    {"address": "81 Lake Rd", "salePrice": "$402,000", "proximity": "0.1 mi"}
  ],
  "conditionAssessment": {
    "overallCondition": "Good",
    "repairsNeeded": ["Replace water heater"],
    "estimatedRepairCost": "$1,500"
  },
  "riskAssessment": {
    "overallRisk": "Medium",
    "riskFactors": [
      {"factor": "Flood zone", "severity": "High", "description": "Zone AE"}
    ]
  },
  "marketAnalysis": {
    "marketConditions": "Balanced",
    "supplyDemand": "In balance",
    "medianSalePrice": "$399,000",
    "averageDaysOnMarket": "25",
    "priceAppreciation": "3%",
    "inventory": "2.8 months"
  },
  "recommendations": ["Obtain flood insurance quote"]
}
```"#;

    const TITLE_RESPONSE: &str = "**Chain of Title**: Complete.\n\n**Risk Assessment**: LOW";

    fn pdf(name: &str) -> UploadedDocument {
        UploadedDocument::new(b"%PDF-1.4 lending document".to_vec(), "application/pdf", name)
    }

    #[tokio::test]
    async fn test_full_credit_flow() {
        let llm = MockProvider::new(CREDIT_RESPONSE);
        let flow = CreditFlow::new(Analyzer::new(llm.clone()));

        assert_ok!(flow.select(pdf("credit.pdf")));
        let outcome = match flow.submit().await {
            SubmitOutcome::Completed(outcome) => outcome,
            other => panic!("Expected completion, got {:?}", other),
        };

        let report: &CreditReport = outcome.result().expect("credit report");
        assert_eq!(report.personal_info.name.as_str(), "Jane Q. Borrower");
        assert_eq!(report.credit_summary.credit_score.as_str(), "742");
        assert_eq!(report.credit_accounts.len(), 1);
        assert_eq!(report.credit_inquiries[0].kind.as_str(), "Hard");
        assert!(report.public_records.is_empty());
        assert_eq!(report.validation_issues[0].severity_level(), Severity::Low);

        assert_eq!(flow.state(), FlowState::Succeeded);
        assert_eq!(llm.call_count(), 1);

        let sent = llm.last_request().unwrap();
        assert_eq!(sent.prompt(), CREDIT_VALIDATOR_PROMPT);
        assert_eq!(sent.payload(), &EncodedPayload::encode(&pdf("credit.pdf")));
        assert_eq!(sent.payload().mime_type(), "application/pdf");
    }

    #[tokio::test]
    async fn test_full_appraisal_flow() {
        let llm = MockProvider::new(APPRAISAL_RESPONSE);
        let flow = AppraisalFlow::new(Analyzer::new(llm.clone()));

        flow.select(pdf("appraisal.pdf")).unwrap();
        flow.submit().await;

        let outcome = flow.outcome().unwrap();
        let report: &AppraisalReport = outcome.result().unwrap();
        assert_eq!(report.property_details.bedrooms.as_str(), "3");
        assert_eq!(report.property_details.bathrooms.as_str(), "2.5");
        assert_eq!(report.comparables[0].sale_price.as_str(), "$402,000");
        assert!(!report.comparables[0].sale_date.is_available());
        assert_eq!(report.risk_assessment.overall_level(), Severity::Medium);
        assert_eq!(report.condition_assessment.repairs_needed.len(), 1);
        assert_eq!(report.recommendations[0].as_str(), "Obtain flood insurance quote");
        assert_eq!(llm.last_request().unwrap().prompt(), APPRAISAL_ANALYSIS_PROMPT);
    }

    #[tokio::test]
    async fn test_full_title_flow_passes_text_through() {
        let llm = MockProvider::new(TITLE_RESPONSE);
        let flow = TitleFlow::new(Analyzer::new(llm));

        let doc = UploadedDocument::new(b"<title/>".to_vec(), "text/xml", "title.xml");
        flow.select(doc).unwrap();

        match flow.submit().await {
            SubmitOutcome::Completed(Outcome::Succeeded(title)) => {
                assert_eq!(title.text(), TITLE_RESPONSE);
            }
            other => panic!("Expected title narrative, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let mut llm = MockProvider::default();
        llm.add_error(CREDIT_VALIDATOR_PROMPT);
        let flow = CreditFlow::new(Analyzer::new(llm));

        flow.select(pdf("credit.pdf")).unwrap();
        flow.submit().await;

        assert_eq!(flow.state(), FlowState::Failed);
        let outcome = flow.outcome().unwrap();
        assert!(outcome.result().is_none());
        let err = outcome.error().unwrap();
        assert!(err.is_transport());
        assert_eq!(
            err.to_string(),
            "Failed to validate credit report. Please try again."
        );
        assert!(flow.document().is_some());
    }

    #[tokio::test]
    async fn test_parse_failure() {
        let llm = MockProvider::new("I'm sorry, I can't read this document.");
        let flow = AppraisalFlow::new(Analyzer::new(llm));

        flow.select(pdf("scan.pdf")).unwrap();
        flow.submit().await;

        assert_eq!(flow.state(), FlowState::Failed);
        let outcome = flow.outcome().unwrap();
        let err = outcome.error().unwrap();
        assert!(err.is_parse());
        assert!(err.to_string().contains("valid appraisal"));
    }

    #[tokio::test]
    async fn test_title_transport_failure_message() {
        let mut llm = MockProvider::default();
        llm.add_error(crate::prompt::TITLE_VALIDATION_PROMPT);
        let flow = TitleFlow::new(Analyzer::new(llm));

        flow.select(pdf("title.pdf")).unwrap();
        flow.submit().await;

        let outcome = flow.outcome().unwrap();
        assert_eq!(
            outcome.error().unwrap().to_string(),
            "Sorry, an error occurred while validating the title document."
        );
    }

    #[tokio::test]
    async fn test_submit_without_document_makes_no_call() {
        let llm = MockProvider::new(CREDIT_RESPONSE);
        let flow = CreditFlow::new(Analyzer::new(llm.clone()));

        assert!(matches!(flow.submit().await, SubmitOutcome::NoDocument));
        assert_eq!(flow.state(), FlowState::Idle);
        assert!(flow.outcome().is_none());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_second_submit_rejected_while_in_flight() {
        let (llm, gate) = MockProvider::gated(TITLE_RESPONSE);
        let flow = Arc::new(TitleFlow::new(Analyzer::new(llm.clone())));
        flow.select(pdf("title.pdf")).unwrap();

        let first = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.submit().await }
        });

        while llm.call_count() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(flow.state(), FlowState::InFlight);

        assert!(matches!(flow.submit().await, SubmitOutcome::Rejected));
        assert!(matches!(
            flow.select(pdf("other.pdf")),
            Err(FlowError::Busy(_))
        ));
        assert_eq!(llm.call_count(), 1);

        gate.release(1);
        let result = first.await.unwrap();
        assert!(matches!(result, SubmitOutcome::Completed(Outcome::Succeeded(_))));
        assert_eq!(flow.state(), FlowState::Succeeded);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_resubmit_after_completion() {
        let llm = MockProvider::new(TITLE_RESPONSE);
        let flow = TitleFlow::new(Analyzer::new(llm.clone()));
        flow.select(pdf("title.pdf")).unwrap();

        flow.submit().await;
        flow.submit().await;

        assert_eq!(llm.call_count(), 2);
        assert_eq!(flow.state(), FlowState::Succeeded);
    }

    #[tokio::test]
    async fn test_clear_from_every_state() {
        let llm = MockProvider::new(TITLE_RESPONSE);
        let flow = TitleFlow::new(Analyzer::new(llm));

        flow.clear();
        assert_eq!(flow.state(), FlowState::Idle);

        flow.select(pdf("a.pdf")).unwrap();
        flow.clear();
        assert_eq!(flow.state(), FlowState::Idle);
        assert!(flow.document().is_none());

        flow.select(pdf("a.pdf")).unwrap();
        flow.submit().await;
        assert_eq!(flow.state(), FlowState::Succeeded);
        flow.clear();
        assert_eq!(flow.state(), FlowState::Idle);
        assert!(flow.outcome().is_none());

        let mut failing = MockProvider::default();
        failing.add_error(crate::prompt::TITLE_VALIDATION_PROMPT);
        let flow = TitleFlow::new(Analyzer::new(failing));
        flow.select(pdf("a.pdf")).unwrap();
        flow.submit().await;
        assert_eq!(flow.state(), FlowState::Failed);
        flow.clear();
        assert_eq!(flow.state(), FlowState::Idle);
        assert!(flow.outcome().is_none());
    }

    #[tokio::test]
    async fn test_clear_while_in_flight_drops_late_outcome() {
        let (llm, gate) = MockProvider::gated(TITLE_RESPONSE);
        let flow = Arc::new(TitleFlow::new(Analyzer::new(llm.clone())));
        flow.select(pdf("title.pdf")).unwrap();

        let orphan = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.submit().await }
        });
        while llm.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        flow.clear();
        assert_eq!(flow.state(), FlowState::Idle);

        gate.release(1);
        assert!(matches!(orphan.await.unwrap(), SubmitOutcome::Superseded));
        assert_eq!(flow.state(), FlowState::Idle);
        assert!(flow.outcome().is_none());
    }

    #[tokio::test]
    async fn test_clear_does_not_allow_second_call() {
        let (llm, gate) = MockProvider::gated(TITLE_RESPONSE);
        let flow = Arc::new(TitleFlow::new(Analyzer::new(llm.clone())));
        flow.select(pdf("a.pdf")).unwrap();

        let orphan = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.submit().await }
        });
        while llm.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        flow.clear();
        flow.select(pdf("b.pdf")).unwrap();
        assert_eq!(flow.state(), FlowState::FileSelected);
        assert!(flow.snapshot().busy);

        assert!(matches!(flow.submit().await, SubmitOutcome::Rejected));
        assert_eq!(llm.call_count(), 1);

        gate.release(1);
        assert!(matches!(orphan.await.unwrap(), SubmitOutcome::Superseded));
        assert!(!flow.snapshot().busy);
        assert_eq!(flow.state(), FlowState::FileSelected);
        assert_eq!(flow.document().unwrap().file_name, "b.pdf");

        gate.release(1);
        let result = flow.submit().await;
        assert!(matches!(result, SubmitOutcome::Completed(Outcome::Succeeded(_))));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_select_path_read_failure_leaves_state() {
        let llm = MockProvider::new(TITLE_RESPONSE);
        let flow = TitleFlow::new(Analyzer::new(llm.clone()));
        flow.select(pdf("kept.pdf")).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let result = flow.select_path(dir.path().join("gone.pdf"), None).await;
        let err = assert_err!(result);
        assert!(matches!(err, FlowError::Analyzer(AnalyzerError::Read { .. })));

        assert_eq!(flow.state(), FlowState::FileSelected);
        assert_eq!(flow.document().unwrap().file_name, "kept.pdf");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_select_path_loads_file() {
        let mut file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
        file.write_all(b"<appraisal/>").unwrap();

        let flow = AppraisalFlow::new(Analyzer::new(MockProvider::new(APPRAISAL_RESPONSE)));
        assert_ok!(flow.select_path(file.path(), None).await);

        let info = flow.document().unwrap();
        assert_eq!(info.mime_type, "application/xml");
        assert_eq!(info.size, 12);
    }

    #[tokio::test]
    async fn test_flows_are_independent() {
        let llm = MockProvider::new(TITLE_RESPONSE);
        let analyzer = Analyzer::new(llm.clone());
        let credit: CreditFlow<MockProvider> = DocumentFlow::new(analyzer.clone());
        let title: TitleFlow<MockProvider> = DocumentFlow::new(analyzer);

        credit.select(pdf("credit.pdf")).unwrap();
        title.select(pdf("title.pdf")).unwrap();
        title.submit().await;

        assert_eq!(title.state(), FlowState::Succeeded);
        assert_eq!(credit.state(), FlowState::FileSelected);
        assert_eq!(credit.class(), DocumentClass::Credit);

        credit.clear();
        assert_eq!(title.state(), FlowState::Succeeded);
        assert_eq!(llm.call_count(), 1);
    }
}
