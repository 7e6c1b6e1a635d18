//! Prediction command

use anyhow::Result;
use clap::Args;

use crate::client::{ApiClient, PredictRequest};
use crate::output::{print_report, OutputFormat};

/// Attributes for one individual, using the survey's own labels.
/// Multi-word labels need quoting, e.g. --job-type "Farming and Fishing".
#[derive(Args)]
pub struct PredictArgs {
    /// Country of residence (Kenya, Rwanda, Tanzania, Uganda)
    #[arg(long)]
    pub country: String,

    /// Survey year (2016, 2017, 2018)
    #[arg(long)]
    pub year: i64,

    /// Location type (Rural, Urban)
    #[arg(long, default_value = "Rural")]
    pub location_type: String,

    /// Cellphone access (Yes, No)
    #[arg(long, default_value = "Yes")]
    pub cellphone_access: String,

    /// Household size (1-20)
    #[arg(long, default_value_t = 5)]
    pub household_size: i64,

    /// Age of the respondent (16-100)
    #[arg(long, default_value_t = 30)]
    pub age: i64,

    /// Gender of the respondent (Female, Male)
    #[arg(long)]
    pub gender: String,

    /// Relationship with the head of household
    #[arg(long, default_value = "Head of Household")]
    pub relationship_with_head: String,

    /// Marital status
    #[arg(long, default_value = "Married/Living together")]
    pub marital_status: String,

    /// Education level
    #[arg(long, default_value = "Primary education")]
    pub education_level: String,

    /// Job type
    #[arg(long, default_value = "Self employed")]
    pub job_type: String,
}

/// Submit the attributes and print the prediction
pub async fn run(client: &ApiClient, args: PredictArgs, format: OutputFormat) -> Result<()> {
    let request = PredictRequest {
        country: args.country,
        year: args.year,
        location_type: args.location_type,
        cellphone_access: args.cellphone_access,
        household_size: args.household_size,
        age_of_respondent: args.age,
        gender_of_respondent: args.gender,
        relationship_with_head: args.relationship_with_head,
        marital_status: args.marital_status,
        education_level: args.education_level,
        job_type: args.job_type,
    };

    let report = client.predict(&request).await?;
    print_report(&report, format);

    Ok(())
}
