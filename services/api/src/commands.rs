use crate::infra::load_catalog;
use bodyplan::config::AppConfig;
use bodyplan::error::AppError;
use bodyplan::workflows::consultation::{
    ConsultationRequest, ConsultationServiceError, DecisionRecord, IntakeGuard,
    MissingCombinationsReport, ProgramResolver, RuleStore,
};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Body weight in kilograms
    #[arg(long)]
    pub(crate) weight_kg: f64,
    /// Height in centimetres
    #[arg(long)]
    pub(crate) height_cm: f64,
    /// Body-fat percentage
    #[arg(long)]
    pub(crate) body_fat: f64,
    /// Biological sex used for body-fat thresholds (male or female)
    #[arg(long)]
    pub(crate) sex: String,
    /// Rule override CSV applied on top of the seeded rules
    #[arg(long)]
    pub(crate) rules_csv: Option<PathBuf>,
    /// Print the full decision record as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RulesArgs {
    /// Rule override CSV applied on top of the seeded rules
    #[arg(long)]
    pub(crate) rules_csv: Option<PathBuf>,
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let overrides = overrides_path(args.rules_csv.clone())?;
    let catalog = load_catalog(overrides.as_deref())?;
    let decision = classify(&args, ProgramResolver::new(catalog))?;
    println!("{}", render_decision(&decision, args.json)?);
    Ok(())
}

pub(crate) fn run_missing_rules(args: RulesArgs) -> Result<(), AppError> {
    let overrides = overrides_path(args.rules_csv)?;
    let catalog = load_catalog(overrides.as_deref())?;
    let report = MissingCombinationsReport::build(catalog.as_ref())?;
    println!("{}", render_missing(&report));
    Ok(())
}

fn overrides_path(explicit: Option<PathBuf>) -> Result<Option<PathBuf>, AppError> {
    match explicit {
        Some(path) => Ok(Some(path)),
        None => Ok(AppConfig::load()?.rules.overrides_csv),
    }
}

fn classify<S: RuleStore>(
    args: &ClassifyArgs,
    resolver: ProgramResolver<S>,
) -> Result<DecisionRecord, AppError> {
    let request = ConsultationRequest {
        weight_kg: args.weight_kg,
        height_cm: args.height_cm,
        body_fat_percent: args.body_fat,
        sex: Some(args.sex.clone()),
        notes: None,
    };
    let measurements = IntakeGuard::default()
        .measurements_from_request(&request)
        .map_err(ConsultationServiceError::from)?;

    Ok(resolver.resolve(&measurements)?)
}

fn render_decision(decision: &DecisionRecord, as_json: bool) -> Result<String, AppError> {
    if as_json {
        return Ok(serde_json::to_string_pretty(decision)?);
    }

    let inputs = decision.inputs();
    let mut lines = vec![
        format!(
            "Inputs: {} kg, {} cm, {}% body fat, {}",
            inputs.weight_kg,
            inputs.height_cm,
            inputs.body_fat_percent,
            inputs.sex.label()
        ),
        decision.summary(),
    ];
    if let Some(edge_case) = decision.edge_case() {
        lines.push(format!("Reason: {}", edge_case.reason));
    }
    Ok(lines.join("\n"))
}

fn render_missing(report: &MissingCombinationsReport) -> String {
    let mut lines = vec![format!(
        "Rule table v{}: {} of {} realistic combinations covered",
        report.table_version,
        report.covered,
        report.covered + report.missing.len()
    )];

    if report.is_complete() {
        lines.push("All realistic combinations have an active rule.".to_string());
    } else {
        for entry in &report.missing {
            lines.push(format!(
                "  missing {} (canonical program {})",
                entry.combination, entry.program_code
            ));
        }
    }
    lines.join("\n")
}
