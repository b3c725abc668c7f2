use crate::infra::{load_rules, parse_yes_no};
use clap::Args;
use eligibility::config::AppConfig;
use eligibility::engine::ClauseEngine;
use eligibility::error::AppError;
use eligibility::screening::{
    screen_submission, ApplicantAttributes, EligibilityCheckView, EligibilityService,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Applicant nationality as entered on the intake form
    #[arg(long, default_value = "CountryX")]
    pub(crate) nationality: String,
    /// Applicant age in years
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(0..=120))]
    pub(crate) age: u8,
    /// Whether the applicant holds a job offer (yes/no)
    #[arg(long, default_value = "yes", value_parser = parse_yes_no, action = clap::ArgAction::Set)]
    pub(crate) has_job_offer: bool,
    /// Whether the offered salary meets the minimum (yes/no)
    #[arg(long, default_value = "yes", value_parser = parse_yes_no, action = clap::ArgAction::Set)]
    pub(crate) salary_meets_minimum: bool,
    /// Whether the applicant has the required skills (yes/no)
    #[arg(long, default_value = "yes", value_parser = parse_yes_no, action = clap::ArgAction::Set)]
    pub(crate) has_required_skills: bool,
    /// Whether the applicant has a clean record (yes/no)
    #[arg(long, default_value = "yes", value_parser = parse_yes_no, action = clap::ArgAction::Set)]
    pub(crate) has_clean_record: bool,
    /// Consult this rule file instead of the configured one
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// List the facts asserted for the check
    #[arg(long)]
    pub(crate) show_facts: bool,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let rules_path = match args.rules {
        Some(ref path) => path.clone(),
        None => AppConfig::load()?.rules.path,
    };
    let rules = load_rules(&rules_path)?;

    let engine = Arc::new(ClauseEngine::new());
    let service = EligibilityService::new(engine, &rules)?;
    println!("Rule set loaded from {}", rules_path.display());

    let submission = ApplicantAttributes {
        nationality: args.nationality,
        age: args.age,
        has_job_offer: args.has_job_offer,
        salary_meets_minimum: args.salary_meets_minimum,
        has_required_skills: args.has_required_skills,
        has_clean_record: args.has_clean_record,
    };
    let attributes = match screen_submission(submission) {
        Ok(attributes) => attributes,
        Err(violation) => {
            println!("Submission rejected: {violation}");
            return Ok(());
        }
    };

    match service.evaluate(&attributes) {
        Ok(result) => {
            if result.eligible {
                println!("Applicant {} is ELIGIBLE", result.applicant_id);
            } else {
                println!("Applicant {} is NOT ELIGIBLE", result.applicant_id);
            }
            if args.show_facts {
                println!("Facts asserted for this check:");
                for fact in &result.asserted_facts {
                    println!("  - {fact}");
                }
            }
            let view = EligibilityCheckView::from_result(&result);
            match serde_json::to_string_pretty(&view) {
                Ok(json) => println!("Check payload:\n{json}"),
                Err(err) => println!("Check payload unavailable: {err}"),
            }
        }
        Err(error) => {
            println!("Evaluation unavailable: {error}");
            if args.show_facts && !error.asserted_facts.is_empty() {
                println!("Facts asserted before the failure:");
                for fact in &error.asserted_facts {
                    println!("  - {fact}");
                }
            }
        }
    }

    Ok(())
}
