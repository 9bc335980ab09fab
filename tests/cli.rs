use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FLAGS: &[&str] = &[
    "--month", "1",
    "--age", "18",
    "--occupation", "Self-Employed",
    "--annual-income", "0",
    "--monthly-inhand-salary", "0",
    "--credit-history-age", "0",
    "--total-emi-per-month", "0",
    "--num-bank-accounts", "0",
    "--num-credit-card", "0",
    "--interest-rate", "0",
    "--num-of-loan", "0",
    "--type-of-loan", "Car Loan",
    "--num-credit-inquiries", "0",
    "--credit-mix", "Good",
    "--outstanding-debt", "0",
    "--credit-utilization-ratio", "0",
    "--amount-invested-monthly", "0",
    "--payment-behaviour", "High Spend",
    "--monthly-balance", "0",
];

/// Model path whose sidecar declares `features`; the .onnx itself is absent
fn fixture(dir: &Path, features: &[&str]) -> PathBuf {
    let model = dir.join("CreditScore_Model.onnx");
    let metadata = serde_json::json!({ "feature_names": features });
    fs::write(dir.join("CreditScore_Model.onnx.json"), metadata.to_string()).unwrap();
    model
}

fn cmd(model: &Path) -> Command {
    let mut cmd = Command::cargo_bin("credit-score").unwrap();
    cmd.env("CREDIT_MODEL_PATH", model)
        .env_remove("CREDIT_MODEL_METADATA")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn encode_flags_against_sidecar_schema() {
    let tmp = TempDir::new().unwrap();
    let model = fixture(tmp.path(), &["Occupation", "Age", "Type_Of_Loan", "Changed_Credit_Limit"]);

    let out = cmd(&model)
        .arg("--json")
        .arg("encode")
        .args(FLAGS)
        .output()
        .unwrap();
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let data = &json["data"];
    assert_eq!(data["Occupation"], 1.0);
    assert_eq!(data["Age"], 18.0);
    assert_eq!(data["Type_Of_Loan"], 1.0);
    assert_eq!(data["Changed_Credit_Limit"], 0.0);
    assert!(data.get("Month").is_none());
}

#[test]
fn encode_input_file_with_unknown_category() {
    let tmp = TempDir::new().unwrap();
    let model = fixture(tmp.path(), &["Occupation", "Credit_Mix"]);
    let input = tmp.path().join("applicant.json");
    fs::write(
        &input,
        serde_json::json!({
            "month": 6, "age": 40, "occupation": "Astronaut",
            "annual_income": 52000.0, "monthly_inhand_salary": 4100.0,
            "credit_history_age": 12.5, "total_emi_per_month": 300.0,
            "num_bank_accounts": 3, "num_credit_card": 2, "interest_rate": 7.5,
            "num_of_loan": 1, "type_of_loan": "Home Loan", "num_credit_inquiries": 2,
            "credit_mix": "Standard", "outstanding_debt": 900.0,
            "credit_utilization_ratio": 28.0, "amount_invested_monthly": 150.0,
            "payment_behaviour": "Low Spend", "monthly_balance": 420.0
        })
        .to_string(),
    )
    .unwrap();

    cmd(&model)
        .args(["encode", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(contains("Occupation\t-1"))
        .stdout(contains("Credit_Mix\t1"));
}

#[test]
fn categorical_flags_are_closed_sets() {
    let tmp = TempDir::new().unwrap();
    let model = fixture(tmp.path(), &["Age"]);
    let mut args: Vec<&str> = FLAGS.to_vec();
    let pos = args.iter().position(|a| *a == "--credit-mix").unwrap();
    args[pos + 1] = "Excellent";

    cmd(&model).arg("encode").args(&args).assert().failure();
}

#[test]
fn month_out_of_range_rejected() {
    let tmp = TempDir::new().unwrap();
    let model = fixture(tmp.path(), &["Age"]);
    let mut args: Vec<&str> = FLAGS.to_vec();
    args[1] = "13";

    cmd(&model).arg("encode").args(&args).assert().failure();
}

#[test]
fn predict_without_model_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let model = fixture(tmp.path(), &["Age"]);

    cmd(&model)
        .arg("predict")
        .args(FLAGS)
        .assert()
        .failure()
        .stderr(contains("model artifact unusable"));
}

#[test]
fn schema_rejects_duplicate_features() {
    let tmp = TempDir::new().unwrap();
    let model = fixture(tmp.path(), &["Age", "Age"]);
    fs::write(&model, b"placeholder").unwrap();

    cmd(&model)
        .arg("schema")
        .assert()
        .failure()
        .stderr(contains("more than once"));
}

#[test]
fn input_file_conflicts_with_field_flags() {
    let tmp = TempDir::new().unwrap();
    let model = fixture(tmp.path(), &["Age"]);
    let input = tmp.path().join("applicant.json");
    fs::write(&input, "{}").unwrap();

    cmd(&model)
        .args(["encode", "--age", "30", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));
}

#[test]
fn predict_with_string_label_model() {
    let tmp = TempDir::new().unwrap();
    let model = fixture(tmp.path(), &["Occupation", "Type_Of_Loan", "Credit_Mix"]);
    let graph = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/label_string.onnx");
    fs::copy(graph, &model).unwrap();

    // Self-Employed (1), Car Loan (1), Good (0): first maximum wins
    cmd(&model)
        .arg("predict")
        .args(FLAGS)
        .assert()
        .success()
        .stdout(contains("Model expects these features: Occupation, Type_Of_Loan, Credit_Mix"))
        .stdout(contains("Predicted Credit Score: Good"));
}
