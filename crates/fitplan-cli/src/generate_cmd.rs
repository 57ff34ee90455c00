//! `fitplan prompt` and `fitplan generate`: the pipeline without the web page.

use std::io::Write;

use anyhow::{Context, Result};

use fitplan_core::pipeline::PlanPipeline;
use fitplan_core::prompt::build_prompt;

use crate::profile_args::ProfileArgs;

/// Print the filled prompt. Needs no API key and makes no network call.
pub fn run_prompt(args: &ProfileArgs, out: &mut impl Write) -> Result<()> {
    let request = args.to_request()?;
    let prompt = build_prompt(&request).context("failed to build prompt")?;
    out.write_all(prompt.as_bytes())?;
    Ok(())
}

/// Generate one plan and print it as markdown, or as HTML with `html`.
pub async fn run_generate(
    pipeline: &PlanPipeline,
    args: &ProfileArgs,
    html: bool,
    out: &mut impl Write,
) -> Result<()> {
    let request = args.to_request()?;
    eprintln!("Generation in progress...");

    let plan = match pipeline.generate(&request).await {
        Ok(plan) => plan,
        Err(e) => {
            tracing::debug!(error = %e, "generation failed");
            anyhow::bail!("{}", e.user_notice());
        }
    };

    let body = if html { &plan.html } else { &plan.markdown };
    out.write_all(body.as_bytes())?;
    if !body.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    eprintln!("{}", fitplan_core::pipeline::SUCCESS_NOTICE);
    Ok(())
}
