//! HTML rendering of the prediction form

use crate::types::customer::{ContractType, CustomerRecord, YesNo};
use crate::types::prediction::{ChurnLabel, Verdict};
use std::fmt::Write;

/// What to show under the form
#[derive(Debug, Clone)]
pub enum Outcome {
    Verdict(Verdict),
    Error(String),
}

/// Render the full page, with `record` pre-filled in the form
pub fn render_page(record: &CustomerRecord, outcome: Option<&Outcome>) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Customer Churn Prediction</title>\n");
    let _ = writeln!(html, "<style>{}</style>", CSS);
    html.push_str("</head>\n<body>\n<main>\n");
    html.push_str("<h1>📊 Customer Churn Prediction</h1>\n");
    html.push_str(
        "<p class=\"subtitle\">Predict whether a customer is likely to leave the service</p>\n",
    );

    html.push_str("<form class=\"card\" method=\"post\" action=\"/predict\">\n");
    yes_no_field(&mut html, "SeniorCitizen", "Senior Citizen", record.senior_citizen);
    yes_no_field(&mut html, "Partner", "Has Partner?", record.partner);
    yes_no_field(&mut html, "Dependents", "Has Dependents?", record.dependents);
    number_field(
        &mut html,
        "tenure",
        "Tenure (months)",
        &record.tenure_months.to_string(),
        "1",
    );
    yes_no_field(&mut html, "OnlineSecurity", "Online Security", record.online_security);
    yes_no_field(&mut html, "TechSupport", "Tech Support", record.tech_support);
    contract_field(&mut html, record.contract);
    yes_no_field(
        &mut html,
        "PaperlessBilling",
        "Paperless Billing",
        record.paperless_billing,
    );
    number_field(
        &mut html,
        "MonthlyCharges",
        "Monthly Charges",
        &format!("{:.2}", record.monthly_charges),
        "0.01",
    );
    number_field(
        &mut html,
        "TotalCharges",
        "Total Charges",
        &format!("{:.2}", record.total_charges),
        "0.01",
    );
    html.push_str("<button type=\"submit\">Predict Churn</button>\n");
    html.push_str("</form>\n");

    if let Some(outcome) = outcome {
        render_outcome(&mut html, outcome);
    }

    html.push_str("<footer>Built with Rust &amp; Machine Learning<br>End-to-End ML Deployment</footer>\n");
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_outcome(html: &mut String, outcome: &Outcome) {
    match outcome {
        Outcome::Verdict(verdict) => {
            let (class, icon) = match verdict.label {
                ChurnLabel::Churn => ("alert error", "⚠️"),
                ChurnLabel::NoChurn => ("alert success", "✅"),
            };
            let _ = writeln!(
                html,
                "<div class=\"{}\" role=\"status\">{} {}</div>",
                class,
                icon,
                html_escape(&verdict.message())
            );
        }
        Outcome::Error(message) => {
            let _ = writeln!(
                html,
                "<div class=\"alert error\" role=\"alert\">{}</div>",
                html_escape(message)
            );
        }
    }
}

fn yes_no_field(html: &mut String, name: &str, label: &str, current: YesNo) {
    let _ = writeln!(html, "<label for=\"{name}\">{label}</label>");
    let _ = writeln!(html, "<select id=\"{name}\" name=\"{name}\">");
    for option in YesNo::OPTIONS {
        option_tag(html, option.label(), option == current);
    }
    html.push_str("</select>\n");
}

fn contract_field(html: &mut String, current: ContractType) {
    html.push_str("<label for=\"Contract\">Contract Type</label>\n");
    html.push_str("<select id=\"Contract\" name=\"Contract\">\n");
    for option in ContractType::OPTIONS {
        option_tag(html, option.label(), option == current);
    }
    html.push_str("</select>\n");
}

fn option_tag(html: &mut String, value: &str, selected: bool) {
    let selected = if selected { " selected" } else { "" };
    let _ = writeln!(html, "<option value=\"{value}\"{selected}>{value}</option>");
}

fn number_field(html: &mut String, name: &str, label: &str, value: &str, step: &str) {
    let _ = writeln!(html, "<label for=\"{name}\">{label}</label>");
    let _ = writeln!(
        html,
        "<input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"0\" step=\"{step}\" value=\"{value}\" required>"
    );
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS: &str = r#"
body { background: #0e1117; color: #ffffff; font-family: sans-serif; }
main { max-width: 640px; margin: 0 auto; padding: 1.5rem; }
h1 { text-align: center; }
.subtitle, footer { text-align: center; color: #9ca3af; }
.card { background: #161b22; padding: 25px; border-radius: 16px; display: grid; gap: 0.5rem; }
select, input, button { padding: 0.5rem; border-radius: 8px; }
button { height: 3em; font-size: 16px; background: #2563eb; color: #ffffff; border: none; }
.alert { margin-top: 1rem; padding: 1rem; border-radius: 8px; }
.error { background: #3f1d1d; }
.success { background: #14321f; }
footer { font-size: 13px; margin-top: 25px; }
"#;
