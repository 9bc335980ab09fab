//! Credit Score Predictor - Main Entry Point
//!
//! Command-line front end: collect the nineteen applicant attributes,
//! encode them against the model schema and print the predicted label.

use std::path::PathBuf;

use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use credit_score_core::constants;
use credit_score_core::logic::features::encoding::{
    CREDIT_MIX, OCCUPATION, PAYMENT_BEHAVIOUR, TYPE_OF_LOAN,
};
use credit_score_core::logic::features::{encode, EncodedRecord, LayoutInfo, RawInput};
use credit_score_core::logic::model::artifact::{load_metadata, metadata_path_for};
use credit_score_core::logic::model::inference::ModelInfo;
use credit_score_core::logic::model::{
    predict_request, Classifier, ExpectedFeatures, OnnxClassifier, PredictionOutcome,
};

#[derive(Parser, Debug)]
#[command(name = "credit-score", version, about = "Credit Score Prediction CLI")]
struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(long, global = true, help = "Model file (overrides CREDIT_MODEL_PATH)")]
    model: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the features the model expects
    Schema,
    /// Encode one applicant without running the model
    Encode(InputArgs),
    /// Encode one applicant and predict the credit score
    Predict(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    #[arg(long, help = "JSON file with all nineteen fields")]
    input: Option<PathBuf>,

    #[arg(long, required_unless_present = "input", conflicts_with = "input", value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input", value_parser = clap::value_parser!(u32).range(18..=100))]
    age: Option<u32>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input", value_parser = PossibleValuesParser::new(OCCUPATION.labels()))]
    occupation: Option<String>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    annual_income: Option<f64>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    monthly_inhand_salary: Option<f64>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input", help = "In years")]
    credit_history_age: Option<f64>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    total_emi_per_month: Option<f64>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    num_bank_accounts: Option<u32>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    num_credit_card: Option<u32>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    interest_rate: Option<f64>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    num_of_loan: Option<u32>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input", value_parser = PossibleValuesParser::new(TYPE_OF_LOAN.labels()))]
    type_of_loan: Option<String>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    num_credit_inquiries: Option<u32>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input", value_parser = PossibleValuesParser::new(CREDIT_MIX.labels()))]
    credit_mix: Option<String>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    outstanding_debt: Option<f64>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    credit_utilization_ratio: Option<f64>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    amount_invested_monthly: Option<f64>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input", value_parser = PossibleValuesParser::new(PAYMENT_BEHAVIOUR.labels()))]
    payment_behaviour: Option<String>,
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    monthly_balance: Option<f64>,
}

impl InputArgs {
    /// Collect and validate one request
    fn collect(self) -> anyhow::Result<RawInput> {
        let raw = match &self.input {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                RawInput::from_json(&content)
                    .with_context(|| format!("invalid input file {}", path.display()))?
            }
            None => self.into_raw()?,
        };

        raw.validate()?;
        Ok(raw)
    }

    fn into_raw(self) -> anyhow::Result<RawInput> {
        fn req<T>(value: Option<T>, flag: &str) -> anyhow::Result<T> {
            value.with_context(|| format!("--{} is required", flag))
        }

        Ok(RawInput {
            month: req(self.month, "month")?,
            age: req(self.age, "age")?,
            occupation: req(self.occupation, "occupation")?,
            annual_income: req(self.annual_income, "annual-income")?,
            monthly_inhand_salary: req(self.monthly_inhand_salary, "monthly-inhand-salary")?,
            credit_history_age: req(self.credit_history_age, "credit-history-age")?,
            total_emi_per_month: req(self.total_emi_per_month, "total-emi-per-month")?,
            num_bank_accounts: req(self.num_bank_accounts, "num-bank-accounts")?,
            num_credit_card: req(self.num_credit_card, "num-credit-card")?,
            interest_rate: req(self.interest_rate, "interest-rate")?,
            num_of_loan: req(self.num_of_loan, "num-of-loan")?,
            type_of_loan: req(self.type_of_loan, "type-of-loan")?,
            num_credit_inquiries: req(self.num_credit_inquiries, "num-credit-inquiries")?,
            credit_mix: req(self.credit_mix, "credit-mix")?,
            outstanding_debt: req(self.outstanding_debt, "outstanding-debt")?,
            credit_utilization_ratio: req(self.credit_utilization_ratio, "credit-utilization-ratio")?,
            amount_invested_monthly: req(self.amount_invested_monthly, "amount-invested-monthly")?,
            payment_behaviour: req(self.payment_behaviour, "payment-behaviour")?,
            monthly_balance: req(self.monthly_balance, "monthly-balance")?,
        })
    }
}

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct SchemaOut<'a> {
    model: &'a ModelInfo,
    expected_features: &'a ExpectedFeatures,
    layout_hash: u32,
    canonical_layout: LayoutInfo,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(constants::DEFAULT_LOG_FILTER),
    )
    .init();

    let cli = Cli::parse();
    let options = constants::load_options(cli.model.clone());

    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    match cli.command {
        Commands::Schema => {
            let model = OnnxClassifier::load(&options).context("model artifact unusable")?;
            let features = model.expected_features();
            let out = SchemaOut {
                model: model.info(),
                expected_features: features,
                layout_hash: features.layout_hash(),
                canonical_layout: LayoutInfo::current(),
            };

            if cli.json {
                print_json(true, &out)?;
            } else {
                println!("Model expects these features:");
                for name in features.iter() {
                    println!("  {}", name);
                }
                println!("layout hash: {:08x}", out.layout_hash);
                println!("model: {} ({})", out.model.model_path, out.model.model_type);
            }
        }
        Commands::Encode(args) => {
            let raw = args.collect()?;
            let metadata_path = options
                .metadata_path
                .clone()
                .unwrap_or_else(|| metadata_path_for(&options.model_path));
            let features = load_metadata(&metadata_path)?.expected_features()?;
            let record = encode(&raw, features.as_slice());

            if cli.json {
                print_json(true, &record)?;
            } else {
                print_record(&record);
            }
        }
        Commands::Predict(args) => {
            let raw = args.collect()?;
            let model = OnnxClassifier::load_shared(&options).context("model artifact unusable")?;
            let report = predict_request(&*model, &raw);

            if cli.json {
                print_json(report.outcome.is_success(), &report)?;
            } else {
                println!(
                    "Model expects these features: {}",
                    report.expected_features.as_slice().join(", ")
                );
                print_record(&report.record);
                match &report.outcome {
                    PredictionOutcome::Predicted { label, .. } => {
                        println!("Predicted Credit Score: {}", label)
                    }
                    PredictionOutcome::Failed { message } => {
                        println!("An error occurred: {}", message)
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(ok: bool, data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&JsonOut { ok, data })?);
    Ok(())
}

fn print_record(record: &EncodedRecord) {
    println!("Final input data for model:");
    for (name, value) in record.iter() {
        println!("  {}\t{}", name, value);
    }
}
