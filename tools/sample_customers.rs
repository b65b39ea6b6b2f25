//! Sample Customer Generator
//!
//! Generates random customer records and scores them with the configured
//! classifier, or prints them as JSON for the API when no model loads.

use churn_prediction::config::{AppConfig, DEFAULT_CONFIG_PATH};
use churn_prediction::models::{ChurnPredictor, ModelLoader};
use churn_prediction::types::customer::{ContractType, CustomerRecord, YesNo};
use rand::Rng;
use std::collections::HashMap;
use tracing::{info, warn};

/// Customer generator for testing
struct CustomerGenerator {
    rng: rand::rngs::ThreadRng,
}

impl CustomerGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Long-tenure customer on a fixed-term contract
    fn generate_loyal(&mut self) -> CustomerRecord {
        let tenure_months = self.rng.gen_range(24..73);
        let monthly_charges = self.money(20.0..80.0);

        CustomerRecord {
            senior_citizen: self.yes_no(0.1),
            partner: self.yes_no(0.7),
            dependents: self.yes_no(0.5),
            tenure_months,
            online_security: self.yes_no(0.6),
            tech_support: self.yes_no(0.6),
            contract: self.random_choice(&[ContractType::OneYear, ContractType::TwoYear]),
            paperless_billing: self.yes_no(0.4),
            monthly_charges,
            total_charges: self.total(tenure_months, monthly_charges),
        }
    }

    /// New month-to-month customer with high charges and few add-ons
    fn generate_at_risk(&mut self) -> CustomerRecord {
        let tenure_months = self.rng.gen_range(0..12);
        let monthly_charges = self.money(70.0..120.0);

        CustomerRecord {
            senior_citizen: self.yes_no(0.3),
            partner: self.yes_no(0.2),
            dependents: self.yes_no(0.1),
            tenure_months,
            online_security: self.yes_no(0.1),
            tech_support: self.yes_no(0.1),
            contract: ContractType::MonthToMonth,
            paperless_billing: self.yes_no(0.8),
            monthly_charges,
            total_charges: self.total(tenure_months, monthly_charges),
        }
    }

    fn yes_no(&mut self, p_yes: f64) -> YesNo {
        if self.rng.gen_bool(p_yes) {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }

    fn money(&mut self, range: std::ops::Range<f64>) -> f64 {
        (self.rng.gen_range(range) * 100.0).round() / 100.0
    }

    /// Roughly tenure × monthly, with some drift in past prices
    fn total(&mut self, tenure_months: u32, monthly_charges: f64) -> f64 {
        let drift = self.rng.gen_range(0.9..1.1);
        ((tenure_months as f64 * monthly_charges * drift) * 100.0).round() / 100.0
    }

    fn random_choice<T: Copy>(&mut self, choices: &[T]) -> T {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_customers=info".parse()?),
        )
        .init();

    info!("Starting Sample Customer Generator");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).map(|s| s.as_str()).unwrap_or(DEFAULT_CONFIG_PATH);
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(20);
    let at_risk_rate: f64 = args
        .get(3)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.3)
        .clamp(0.0, 1.0);

    info!(
        config = %config_path,
        count = count,
        at_risk_rate = at_risk_rate,
        "Configuration loaded"
    );

    let predictor = match AppConfig::load_from_path(config_path)
        .and_then(|config| ModelLoader::with_threads(config.model.onnx_threads).load(&config.model))
    {
        Ok(classifier) => ChurnPredictor::new(classifier),
        Err(e) => {
            warn!(error = ?e, "No classifier available. Running in dry-run mode.");
            return run_dry_mode(count, at_risk_rate);
        }
    };

    let mut generator = CustomerGenerator::new();
    let mut rng = rand::thread_rng();
    let mut verdicts: HashMap<(&'static str, String), u64> = HashMap::new();

    for i in 0..count {
        let (profile, record) = if rng.gen_bool(at_risk_rate) {
            ("at_risk", generator.generate_at_risk())
        } else {
            ("loyal", generator.generate_loyal())
        };

        let result = predictor.predict(&record)?;
        let verdict = result.verdict();

        info!(
            sample = i + 1,
            profile = profile,
            tenure = record.tenure_months,
            contract = %record.contract,
            monthly = record.monthly_charges,
            "{}",
            verdict.message()
        );

        *verdicts.entry((profile, verdict.verdict)).or_insert(0) += 1;
    }

    let mut summary: Vec<_> = verdicts.into_iter().collect();
    summary.sort();
    for ((profile, verdict), n) in summary {
        info!("{:>8} customers {:<20} {:>5}", profile, verdict, n);
    }

    Ok(())
}

fn run_dry_mode(count: u64, at_risk_rate: f64) -> anyhow::Result<()> {
    let mut generator = CustomerGenerator::new();
    let mut rng = rand::thread_rng();

    for _ in 0..count {
        let record = if rng.gen_bool(at_risk_rate) {
            generator.generate_at_risk()
        } else {
            generator.generate_loyal()
        };

        // One JSON record per line, ready for POST /api/predict
        println!("{}", serde_json::to_string(&record)?);
    }

    Ok(())
}
